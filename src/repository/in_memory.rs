use std::sync::Mutex;

use anyhow::{anyhow, Result};

use super::store::Store;
use super::VendorRepository;

/// In-memory implementation of VendorRepository for testing.
#[derive(Default)]
pub struct InMemoryRepository {
    store: Mutex<Store>,
}

impl InMemoryRepository {
    /// Create a new empty InMemoryRepository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new InMemoryRepository with a pre-populated store.
    pub fn with_store(store: Store) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }
}

impl VendorRepository for InMemoryRepository {
    fn load(&self) -> Result<Store> {
        let store = self
            .store
            .lock()
            .map_err(|_| anyhow!("In-memory store lock poisoned"))?;
        Ok(store.clone())
    }

    fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Store) -> Result<T>,
    {
        let mut guard = self
            .store
            .lock()
            .map_err(|_| anyhow!("In-memory store lock poisoned"))?;
        let mut working = guard.clone();
        let result = f(&mut working)?;
        *guard = working;
        Ok(result)
    }
}
