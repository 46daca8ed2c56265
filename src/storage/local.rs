//! Filesystem-backed document store.

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Read};
use std::path::{Component, Path, PathBuf};
use url::Url;

use super::signing::UrlSigner;
use super::DocumentStore;
use crate::config::StorageConfig;
use crate::paths::SIGNING_KEY_FILE;

/// Replace every non-alphanumeric character with `-` and lower-case the rest.
pub fn sanitize_segment(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

/// Stores documents under `<uploads_dir>/<bucket>/<vendor>/<type>-<millis>.<ext>`.
pub struct LocalDocumentStore {
    bucket_dir: PathBuf,
    bucket: String,
    base_url: Url,
    /// `base_url` joined with the bucket, percent-encoded as issued URLs are
    url_prefix: String,
    ttl_secs: i64,
    signer: UrlSigner,
}

impl LocalDocumentStore {
    pub fn new(config: &StorageConfig, signer: UrlSigner) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid storage.base_url '{}'", config.base_url))?;
        let ttl_secs = i64::try_from(config.signed_url_ttl_secs)
            .context("storage.signed_url_ttl_secs is too large")?;
        let url_prefix = base_url
            .join(&format!("{}/", config.bucket))
            .with_context(|| format!("Invalid storage.bucket '{}'", config.bucket))?
            .to_string();

        Ok(Self {
            bucket_dir: config.uploads_dir.join(&config.bucket),
            bucket: config.bucket.clone(),
            base_url,
            url_prefix,
            ttl_secs,
            signer,
        })
    }

    /// Store configured from `config`, with the signing key taken from the
    /// configured environment variable or the project key file.
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        let signer = UrlSigner::from_env_or_file(&config.signing_key_env, Path::new(SIGNING_KEY_FILE))?;
        Self::new(config, signer)
    }

    /// Absolute location of a stored document.
    pub fn local_path(&self, path: &str) -> Result<PathBuf> {
        check_relative(path)?;
        Ok(self.bucket_dir.join(path))
    }
}

impl DocumentStore for LocalDocumentStore {
    fn upload(
        &self,
        source: &Path,
        vendor_name: &str,
        document_type: &str,
    ) -> Result<Option<String>> {
        let metadata = fs::metadata(source)
            .with_context(|| format!("Failed to upload {} file: {}", document_type, source.display()))?;
        if !metadata.is_file() {
            anyhow::bail!("Failed to upload {} file: {} is not a file", document_type, source.display());
        }
        if metadata.len() == 0 {
            log::info!("Skipping empty {} upload {}", document_type, source.display());
            return Ok(None);
        }

        let document_type = sanitize_segment(document_type.trim());
        if document_type.is_empty() {
            anyhow::bail!("Document type must not be empty");
        }
        let vendor_dir = sanitize_segment(vendor_name.trim());
        if vendor_dir.is_empty() {
            anyhow::bail!("Vendor name must not be empty");
        }
        let extension = source
            .extension()
            .map(|e| sanitize_segment(&e.to_string_lossy()))
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| "bin".to_string());

        let dir = self.bucket_dir.join(&vendor_dir);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create upload directory {}", dir.display()))?;

        let mut input = File::open(source)
            .with_context(|| format!("Failed to upload {} file: {}", document_type, source.display()))?;

        // Never overwrite: step the timestamp until the name is free.
        let mut millis = Utc::now().timestamp_millis();
        loop {
            let file_name = format!("{}-{}.{}", document_type, millis, extension);
            let target = dir.join(&file_name);
            let output = match OpenOptions::new().write(true).create_new(true).open(&target) {
                Ok(output) => output,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    millis += 1;
                    continue;
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Failed to upload {} file to {}", document_type, target.display())
                    })
                }
            };
            copy_or_remove(&mut input, output, &target).with_context(|| {
                format!("Failed to upload {} file to {}", document_type, target.display())
            })?;
            let path = format!("{}/{}", vendor_dir, file_name);
            log::info!("Uploaded {} to {}/{}", source.display(), self.bucket, path);
            return Ok(Some(path));
        }
    }

    fn signed_url(&self, path: &str, now: DateTime<Utc>) -> Result<String> {
        check_relative(path)?;
        if !self.bucket_dir.join(path).is_file() {
            anyhow::bail!("Document not found: {}", path);
        }

        let expires = now
            .timestamp()
            .checked_add(self.ttl_secs)
            .context("Signed URL expiry is out of range")?;
        let mut url = self
            .base_url
            .join(&format!("{}/{}", self.bucket, path))
            .with_context(|| format!("Failed to build URL for {}", path))?;
        url.query_pairs_mut()
            .append_pair("expires", &expires.to_string())
            .append_pair("signature", &self.signer.sign(path, expires));

        Ok(url.to_string())
    }

    fn resolve(&self, signed_url: &str, now: DateTime<Utc>) -> Result<PathBuf> {
        let url = Url::parse(signed_url).with_context(|| format!("Invalid URL '{}'", signed_url))?;

        let mut expires = None;
        let mut signature = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "expires" => expires = Some(value.into_owned()),
                "signature" => signature = Some(value.into_owned()),
                _ => {}
            }
        }
        let expires: i64 = expires
            .context("Signed URL is missing 'expires'")?
            .parse()
            .context("Signed URL has an invalid 'expires'")?;
        let signature = signature.context("Signed URL is missing 'signature'")?;

        let mut bare = url.clone();
        bare.set_query(None);
        bare.set_fragment(None);
        let path = bare
            .as_str()
            .strip_prefix(&self.url_prefix)
            .with_context(|| format!("URL was not issued for {}", self.url_prefix))?
            .to_string();

        if !self.signer.verify(&path, expires, &signature) {
            anyhow::bail!("Invalid signature for {}", path);
        }
        if now.timestamp() > expires {
            let expired_at = Utc
                .timestamp_opt(expires, 0)
                .single()
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| expires.to_string());
            anyhow::bail!("Signed URL expired at {}", expired_at);
        }

        let local = self.local_path(&path)?;
        if !local.is_file() {
            anyhow::bail!("Document not found: {}", path);
        }
        Ok(local)
    }
}

/// Copy `input` into a freshly created `target`, removing it if the copy fails.
fn copy_or_remove(input: &mut impl Read, mut output: File, target: &Path) -> io::Result<u64> {
    match io::copy(input, &mut output) {
        Ok(written) => Ok(written),
        Err(e) => {
            drop(output);
            if let Err(remove) = fs::remove_file(target) {
                log::warn!("Failed to remove partial upload {}: {}", target.display(), remove);
            }
            Err(e)
        }
    }
}

/// Reject absolute paths and any path that could leave the bucket.
fn check_relative(path: &str) -> Result<()> {
    let candidate = Path::new(path);
    let ok = !path.is_empty()
        && candidate
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if !ok {
        anyhow::bail!("Invalid document path '{}'", path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn store(tmp: &TempDir) -> LocalDocumentStore {
        let config = StorageConfig {
            uploads_dir: tmp.path().join("uploads"),
            ..Default::default()
        };
        LocalDocumentStore::new(&config, UrlSigner::new(b"test-key").unwrap()).unwrap()
    }

    fn write_source(tmp: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = tmp.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_sanitize_segment() {
        assert_eq!(sanitize_segment("Acme Corp, Ltd."), "acme-corp--ltd-");
        assert_eq!(sanitize_segment("ABC123"), "abc123");
    }

    #[test]
    fn test_upload_layout() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let source = write_source(&tmp, "cert.PDF", "certificate");

        let path = store.upload(&source, "Acme Corp", "iso27001").unwrap().unwrap();
        let (dir, file) = path.split_once('/').unwrap();
        assert_eq!(dir, "acme-corp");
        assert!(file.starts_with("iso27001-"));
        assert!(file.ends_with(".pdf"));

        let local = tmp.path().join("uploads").join("vendor-uploads").join(&path);
        assert_eq!(fs::read_to_string(local).unwrap(), "certificate");
    }

    #[test]
    fn test_upload_never_overwrites() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let source = write_source(&tmp, "cert.pdf", "one");

        let first = store.upload(&source, "Acme", "iso27001").unwrap().unwrap();
        let second = store.upload(&source, "Acme", "iso27001").unwrap().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_empty_upload_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let source = write_source(&tmp, "empty.pdf", "");
        assert_eq!(store.upload(&source, "Acme", "iso27001").unwrap(), None);
    }

    #[test]
    fn test_missing_upload_fails() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let err = store
            .upload(&tmp.path().join("nope.pdf"), "Acme", "iso27001")
            .unwrap_err();
        assert!(err.to_string().contains("Failed to upload iso27001 file"));
    }

    #[test]
    fn test_signed_url_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let source = write_source(&tmp, "cert.pdf", "certificate");
        let path = store.upload(&source, "Acme", "iso27001").unwrap().unwrap();

        let now = Utc::now();
        let url = store.signed_url(&path, now).unwrap();
        assert!(url.starts_with("vendor-risk://documents/vendor-uploads/acme/iso27001-"));
        assert!(url.contains("expires="));
        assert!(url.contains("signature="));

        let resolved = store.resolve(&url, now + Duration::seconds(60)).unwrap();
        assert_eq!(fs::read_to_string(resolved).unwrap(), "certificate");
    }

    #[test]
    fn test_expired_url_rejected() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let source = write_source(&tmp, "cert.pdf", "certificate");
        let path = store.upload(&source, "Acme", "iso27001").unwrap().unwrap();

        let now = Utc::now();
        let url = store.signed_url(&path, now).unwrap();
        let err = store.resolve(&url, now + Duration::seconds(3601)).unwrap_err();
        assert!(err.to_string().contains("expired"));
    }

    #[test]
    fn test_tampered_url_rejected() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        write_source(&tmp, "a.pdf", "a");
        let path = store
            .upload(&tmp.path().join("a.pdf"), "Acme", "iso27001")
            .unwrap()
            .unwrap();

        let now = Utc::now();
        let url = store.signed_url(&path, now).unwrap();
        let tampered = url.replace("/acme/", "/globex/");
        assert!(store.resolve(&tampered, now).is_err());

        let later = url.replace("expires=", "expires=9");
        assert!(store.resolve(&later, now).is_err());
    }

    #[test]
    fn test_path_traversal_rejected() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        assert!(store.signed_url("../secret.txt", Utc::now()).is_err());
        assert!(store.signed_url("/etc/passwd", Utc::now()).is_err());
        assert!(store.local_path("acme/../../x").is_err());
    }

    #[test]
    fn test_signed_url_for_missing_document() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let err = store.signed_url("acme/nope.pdf", Utc::now()).unwrap_err();
        assert!(err.to_string().contains("Document not found"));
    }

    #[test]
    fn test_signed_url_round_trip_with_encoded_bucket() {
        let tmp = TempDir::new().unwrap();
        let config = StorageConfig {
            uploads_dir: tmp.path().join("uploads"),
            bucket: "vendor uploads".to_string(),
            ..Default::default()
        };
        let store = LocalDocumentStore::new(&config, UrlSigner::new(b"test-key").unwrap()).unwrap();
        let source = write_source(&tmp, "cert.pdf", "certificate");
        let path = store.upload(&source, "Acme", "iso27001").unwrap().unwrap();

        let now = Utc::now();
        let url = store.signed_url(&path, now).unwrap();
        assert!(url.starts_with("vendor-risk://documents/vendor%20uploads/acme/"));

        let resolved = store.resolve(&url, now).unwrap();
        assert_eq!(fs::read_to_string(resolved).unwrap(), "certificate");
    }

    #[test]
    fn test_signed_url_expiry_overflow_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let config = StorageConfig {
            uploads_dir: tmp.path().join("uploads"),
            signed_url_ttl_secs: i64::MAX as u64,
            ..Default::default()
        };
        let store = LocalDocumentStore::new(&config, UrlSigner::new(b"test-key").unwrap()).unwrap();
        let source = write_source(&tmp, "cert.pdf", "certificate");
        let path = store.upload(&source, "Acme", "iso27001").unwrap().unwrap();

        let err = store.signed_url(&path, Utc::now()).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    /// Yields some bytes, then fails.
    struct BrokenReader {
        sent: bool,
    }

    impl Read for BrokenReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.sent {
                return Err(io::Error::new(ErrorKind::Other, "disk went away"));
            }
            self.sent = true;
            let chunk = b"partial";
            buf[..chunk.len()].copy_from_slice(chunk);
            Ok(chunk.len())
        }
    }

    #[test]
    fn test_failed_copy_removes_partial_file() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("iso27001-1.pdf");
        let output = OpenOptions::new().write(true).create_new(true).open(&target).unwrap();

        let err = copy_or_remove(&mut BrokenReader { sent: false }, output, &target).unwrap_err();
        assert_eq!(err.to_string(), "disk went away");
        assert!(!target.exists());
    }

    #[test]
    fn test_successful_copy_keeps_file() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("iso27001-1.pdf");
        let output = OpenOptions::new().write(true).create_new(true).open(&target).unwrap();

        let written = copy_or_remove(&mut &b"certificate"[..], output, &target).unwrap();
        assert_eq!(written, 11);
        assert_eq!(fs::read_to_string(&target).unwrap(), "certificate");
    }
}
