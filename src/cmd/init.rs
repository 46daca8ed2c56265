//! `vendor-risk init`: create the project directory, config, store, and signing key.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::io::IsTerminal;
use std::path::Path;

use vendor_risk::config::Config;
use vendor_risk::paths::{CONFIG_FILE, LOCKS_DIR, ROOT_DIR, SIGNING_KEY_FILE};
use vendor_risk::repository::{JsonFileRepository, VendorRepository};
use vendor_risk::storage::signing;
use vendor_risk::ui;

pub fn cmd_init(name: Option<String>, reviewer: Option<String>, force: bool) -> Result<()> {
    let config_path = Path::new(CONFIG_FILE);
    if config_path.exists() && !force {
        println!("{}", "vendor-risk already initialized.".yellow());
        println!("Use {} to overwrite config.md.", "--force".cyan());
        return Ok(());
    }

    let name = match name {
        Some(name) => name,
        None if std::io::stdin().is_terminal() => dialoguer::Input::new()
            .with_prompt("Organization name")
            .interact_text()?,
        None => anyhow::bail!("--name is required when not running interactively"),
    };

    let mut config = Config::with_organization(name.trim());
    config.organization.reviewer = reviewer.filter(|r| !r.trim().is_empty());
    config.validate()?;

    fs::create_dir_all(LOCKS_DIR).with_context(|| format!("Failed to create {}", LOCKS_DIR))?;
    fs::create_dir_all(&config.storage.uploads_dir).with_context(|| {
        format!(
            "Failed to create uploads directory {}",
            config.storage.uploads_dir.display()
        )
    })?;
    fs::write(config_path, config.to_markdown()?)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    let created_key = signing::ensure_key_file(Path::new(SIGNING_KEY_FILE))?;
    write_gitignore()?;

    // Materialise an empty store so later commands find a valid file.
    let repo = JsonFileRepository::open_default();
    repo.transaction(|_| Ok(()))?;

    if !ui::is_quiet() {
        println!(
            "{} Initialized vendor-risk for {}",
            "✓".green(),
            config.organization.name.cyan()
        );
        println!("  {} {}", "config:".dimmed(), CONFIG_FILE);
        println!("  {} {}", "store:".dimmed(), repo.path().display());
        if created_key {
            println!("  {} {}", "signing key:".dimmed(), SIGNING_KEY_FILE);
        }
    }
    Ok(())
}

/// Keep the signing key, locks, and uploads out of version control.
fn write_gitignore() -> Result<()> {
    let path = Path::new(ROOT_DIR).join(".gitignore");
    if path.exists() {
        return Ok(());
    }
    fs::write(&path, ".signing-key\n.locks/\nuploads/\n")
        .with_context(|| format!("Failed to write {}", path.display()))
}
