//! Command module structure for the vendor-risk CLI

use anyhow::Result;
use std::path::Path;

use vendor_risk::config::Config;
use vendor_risk::paths::{CONFIG_FILE, ROOT_DIR};
use vendor_risk::repository::JsonFileRepository;
use vendor_risk::storage::LocalDocumentStore;

pub mod assess;
pub mod config;
pub mod document;
pub mod init;
pub mod question;
pub mod review;
pub mod vendor;

/// Ensure vendor-risk is initialized in the current directory.
pub fn ensure_initialized() -> Result<()> {
    if !Path::new(ROOT_DIR).is_dir() || !Path::new(CONFIG_FILE).exists() {
        anyhow::bail!("vendor-risk not initialized. Run `vendor-risk init` first.");
    }
    Ok(())
}

/// Load the merged configuration of an initialized project.
pub fn load_config() -> Result<Config> {
    ensure_initialized()?;
    Config::load()
}

pub fn open_repository() -> Result<JsonFileRepository> {
    ensure_initialized()?;
    Ok(JsonFileRepository::open_default())
}

pub fn open_documents(config: &Config) -> Result<LocalDocumentStore> {
    LocalDocumentStore::from_config(&config.storage)
}
