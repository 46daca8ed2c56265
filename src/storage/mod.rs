//! Certificate and document storage.
//!
//! Uploaded files are stored under a bucket, addressed by a path relative to
//! that bucket. The path is what gets persisted on an assessment; access is
//! granted later through time-limited signed URLs.

pub mod local;
pub mod signing;

pub use local::{sanitize_segment, LocalDocumentStore};
pub use signing::UrlSigner;

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Document type tag used for ISO-27001 certificates.
pub const ISO27001_DOCUMENT: &str = "iso27001";

/// Storage backend for vendor documents.
pub trait DocumentStore {
    /// Store `source` for `vendor_name` and return its bucket-relative path.
    ///
    /// An empty file is not stored and yields `None`.
    fn upload(&self, source: &Path, vendor_name: &str, document_type: &str)
        -> Result<Option<String>>;

    /// Mint a URL granting read access to `path` until the configured TTL elapses.
    fn signed_url(&self, path: &str, now: DateTime<Utc>) -> Result<String>;

    /// Check a signed URL and return the local file it grants access to.
    fn resolve(&self, signed_url: &str, now: DateTime<Utc>) -> Result<PathBuf>;
}
