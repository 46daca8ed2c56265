//! JSON file implementation of [`VendorRepository`].

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::store::{Store, STORE_VERSION};
use super::VendorRepository;
use crate::lock::StoreLock;

const LOCK_NAME: &str = "store";
const LOCK_TIMEOUT: Duration = Duration::from_secs(10);

/// Store kept in a single JSON file, replaced atomically on every write.
pub struct JsonFileRepository {
    path: PathBuf,
    locks_dir: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: PathBuf, locks_dir: PathBuf) -> Self {
        Self { path, locks_dir }
    }

    /// Repository at the default project locations.
    pub fn open_default() -> Self {
        Self::new(
            PathBuf::from(crate::paths::STORE_FILE),
            PathBuf::from(crate::paths::LOCKS_DIR),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Store> {
        if !self.path.exists() {
            return Ok(Store::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read store from {}", self.path.display()))?;
        let store: Store = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse store {}", self.path.display()))?;

        if store.version > STORE_VERSION {
            anyhow::bail!(
                "Store {} has version {}, but this build only understands version {}",
                self.path.display(),
                store.version,
                STORE_VERSION
            );
        }

        Ok(store)
    }

    fn write(&self, store: &Store) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;

        let content = serde_json::to_string_pretty(store).context("Failed to serialize store")?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        tmp.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write {}", tmp.path().display()))?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to replace store {}", self.path.display()))?;

        log::debug!(
            "Wrote store {} ({} vendors, {} assessments)",
            self.path.display(),
            store.vendors.len(),
            store.assessments.len()
        );
        Ok(())
    }
}

impl VendorRepository for JsonFileRepository {
    fn load(&self) -> Result<Store> {
        self.read()
    }

    fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Store) -> Result<T>,
    {
        let _lock = StoreLock::acquire(&self.locks_dir, LOCK_NAME, LOCK_TIMEOUT)?;
        let mut store = self.read()?;
        let result = f(&mut store)?;
        self.write(&store)?;
        Ok(result)
    }
}
