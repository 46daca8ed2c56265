//! Persistence of vendors, assessment history, and the question bank.
//!
//! Everything lives in one [`Store`] document. Writers go through
//! [`VendorRepository::transaction`], which applies a closure to a working
//! copy and commits it only if the closure succeeds, so a vendor's mirrored
//! rating and its newest snapshot are always written together.

pub mod file;
pub mod in_memory;
pub mod store;

pub use file::JsonFileRepository;
pub use in_memory::InMemoryRepository;
pub use store::{Store, VendorFilter, FIND_LIMIT, SEARCH_LIMIT};

use anyhow::Result;

/// A storage backend for the [`Store`] document.
pub trait VendorRepository {
    /// Read a consistent copy of the store.
    fn load(&self) -> Result<Store>;

    /// Apply `f` to the store and commit the result atomically.
    ///
    /// If `f` returns an error nothing is written.
    fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Store) -> Result<T>;
}
