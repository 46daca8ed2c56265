//! Signed document access.

use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use std::fs;
use std::path::Path;

use vendor_risk::operations;
use vendor_risk::storage::DocumentStore;
use vendor_risk::ui;

use super::{load_config, open_documents, open_repository};

/// Print a signed URL for a vendor's latest certificate, or for a document path.
pub fn cmd_url(target: &str) -> Result<()> {
    let config = load_config()?;
    let documents = open_documents(&config)?;

    let path = if documents.local_path(target).is_ok_and(|p| p.is_file()) {
        target.to_string()
    } else {
        let repo = open_repository()?;
        let details = operations::get_vendor(&repo, target)?;
        details
            .assessments
            .iter()
            .find_map(|a| a.certificate.as_ref())
            .map(|c| c.path.clone())
            .with_context(|| format!("{} has no uploaded certificate", details.vendor.name))?
    };

    println!("{}", documents.signed_url(&path, Utc::now())?);
    Ok(())
}

pub fn cmd_fetch(url: &str, output: &Path) -> Result<()> {
    let config = load_config()?;
    let documents = open_documents(&config)?;
    let source = documents.resolve(url, Utc::now())?;

    if output.exists() {
        anyhow::bail!("{} already exists", output.display());
    }
    fs::copy(&source, output)
        .with_context(|| format!("Failed to copy document to {}", output.display()))?;

    if !ui::is_quiet() {
        println!("{} Saved {}", "✓".green(), output.display());
    }
    Ok(())
}
