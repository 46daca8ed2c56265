//! HMAC-SHA256 signing of document URLs.

use anyhow::{anyhow, Context, Result};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use std::fs;
use std::path::Path;

type HmacSha256 = Hmac<Sha256>;

/// Signs `(path, expires)` pairs with a secret key.
#[derive(Clone)]
pub struct UrlSigner {
    mac: HmacSha256,
}

impl UrlSigner {
    pub fn new(key: &[u8]) -> Result<Self> {
        if key.is_empty() {
            anyhow::bail!("Signing key must not be empty");
        }
        let mac = HmacSha256::new_from_slice(key).map_err(|e| anyhow!("HMAC error: {}", e))?;
        Ok(Self { mac })
    }

    /// Load the key from the environment variable `env_var`, falling back to
    /// the contents of `key_file`.
    pub fn from_env_or_file(env_var: &str, key_file: &Path) -> Result<Self> {
        if let Some(key) = std::env::var(env_var).ok().filter(|k| !k.trim().is_empty()) {
            log::debug!("Using signing key from ${}", env_var);
            return Self::new(key.trim().as_bytes());
        }

        let key = fs::read_to_string(key_file).with_context(|| {
            format!(
                "No signing key: set ${} or create {} (vendor-risk init does this)",
                env_var,
                key_file.display()
            )
        })?;
        Self::new(key.trim().as_bytes())
            .with_context(|| format!("Invalid signing key in {}", key_file.display()))
    }

    /// Hex signature of `path` and `expires` (unix seconds).
    pub fn sign(&self, path: &str, expires: i64) -> String {
        let mut mac = self.mac.clone();
        mac.update(message(path, expires).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Constant-time check of a hex signature.
    pub fn verify(&self, path: &str, expires: i64, signature: &str) -> bool {
        let Ok(expected) = hex::decode(signature) else {
            return false;
        };
        let mut mac = self.mac.clone();
        mac.update(message(path, expires).as_bytes());
        mac.verify_slice(&expected).is_ok()
    }
}

fn message(path: &str, expires: i64) -> String {
    format!("{}\n{}", path, expires)
}

/// Generate a random 256-bit key, hex encoded.
pub fn generate_key() -> String {
    let mut key = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut key);
    hex::encode(key)
}

/// Write a fresh key to `path` unless one exists. Returns whether a key was written.
pub fn ensure_key_file(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, generate_key())
        .with_context(|| format!("Failed to write signing key {}", path.display()))?;
    Ok(true)
}
