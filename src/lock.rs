//! Lock file operations guarding the vendor store.
//!
//! A lock is a file created exclusively under `.vendor-risk/.locks` holding
//! the owning process ID. It is removed when the guard is dropped. A lock
//! older than [`STALE_LOCK_AGE`] is assumed to belong to a crashed process
//! and is taken over: it is renamed aside first, so only one waiter can claim
//! it, and restored if it turns out to be a live lock after all.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

/// Locks older than this are considered abandoned.
pub const STALE_LOCK_AGE: Duration = Duration::from_secs(60);

const RETRY_INTERVAL: Duration = Duration::from_millis(25);

/// Exclusive lock held for the lifetime of the value.
#[derive(Debug)]
pub struct StoreLock {
    path: PathBuf,
}

impl StoreLock {
    /// Acquire the lock named `name` in `locks_dir`, waiting up to `timeout`.
    pub fn acquire(locks_dir: &Path, name: &str, timeout: Duration) -> Result<Self> {
        fs::create_dir_all(locks_dir).with_context(|| {
            format!("Failed to create locks directory {}", locks_dir.display())
        })?;
        let path = lock_path(locks_dir, name);
        let started = Instant::now();

        loop {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    write!(file, "{}", std::process::id())
                        .with_context(|| format!("Failed to write lock {}", path.display()))?;
                    log::debug!("Acquired lock {}", path.display());
                    return Ok(Self { path });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if is_stale(&path) && take_over_stale(&path) {
                        continue;
                    }
                    if started.elapsed() >= timeout {
                        anyhow::bail!(
                            "Timed out waiting for lock {} (held by pid {:?})",
                            path.display(),
                            read_lock(&path).ok().flatten()
                        );
                    }
                    thread::sleep(RETRY_INTERVAL);
                }
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to create lock {}", path.display()))
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            log::warn!("Failed to remove lock {}: {}", self.path.display(), e);
        }
    }
}

/// Read the PID from a lock file
pub fn read_lock(path: &Path) -> Result<Option<u32>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    let pid: u32 = content.trim().parse()?;
    Ok(Some(pid))
}

/// Check if a named lock is currently held
pub fn is_locked(locks_dir: &Path, name: &str) -> bool {
    lock_path(locks_dir, name).exists()
}

fn is_stale(path: &Path) -> bool {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|modified| modified.elapsed().ok())
        .map(|age| age > STALE_LOCK_AGE)
        .unwrap_or(false)
}

/// Claim a stale lock by renaming it aside. Returns `true` when the caller
/// should retry creating the lock.
fn take_over_stale(path: &Path) -> bool {
    let aside = path.with_extension(format!("stale-{}", std::process::id()));
    match fs::rename(path, &aside) {
        Ok(()) => {}
        // Someone else claimed it first
        Err(e) if e.kind() == ErrorKind::NotFound => return true,
        Err(e) => {
            log::warn!("Failed to move stale lock {}: {}", path.display(), e);
            return false;
        }
    }

    // Between our staleness check and the rename another waiter may have
    // replaced the stale lock with its own live one.
    if !is_stale(&aside) {
        log::debug!("Lock {} was renewed before takeover; restoring it", path.display());
        if let Err(e) = fs::hard_link(&aside, path) {
            log::warn!("Failed to restore lock {}: {}", path.display(), e);
        }
        let _ = fs::remove_file(&aside);
        return true;
    }

    log::warn!(
        "Removed stale lock {} held by pid {:?}",
        path.display(),
        read_lock(&aside).ok().flatten()
    );
    if let Err(e) = fs::remove_file(&aside) {
        log::warn!("Failed to remove stale lock {}: {}", aside.display(), e);
    }
    true
}

fn lock_path(locks_dir: &Path, name: &str) -> PathBuf {
    locks_dir.join(format!("{}.lock", name))
}
