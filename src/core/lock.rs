//! Per-repository mutation locks.
//!
//! Checkout and refresh rewrite the working tree; two of them racing on the
//! same repository would corrupt it. [`MutationLock`] serializes mutating
//! operations per identifier with an advisory file lock. Operations on
//! different identifiers stay independent.
//!
//! The lock is released when the guard drops.

use crate::core::error::{GitSwitchError, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Bound on how long a mutating operation waits for its turn.
pub const LOCK_TIMEOUT: Duration = Duration::from_secs(5 * 60);

#[derive(Debug)]
pub struct MutationLock {
    file: File,
}

impl MutationLock {
    /// Acquire the lock for one repository identifier, waiting up to
    /// [`LOCK_TIMEOUT`].
    pub fn acquire(lock_dir: &Path, identifier: &str) -> Result<Self> {
        Self::acquire_with_timeout(lock_dir, identifier, LOCK_TIMEOUT)
    }

    pub fn acquire_with_timeout(
        lock_dir: &Path,
        identifier: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let path = lock_path(lock_dir, identifier);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        let start = Instant::now();
        let mut sleep_duration = Duration::from_millis(10);
        let max_sleep = Duration::from_millis(500);

        loop {
            match file.try_lock_exclusive() {
                Ok(()) => return Ok(MutationLock { file }),
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                    if start.elapsed() >= timeout {
                        return Err(GitSwitchError::lock_unavailable(identifier));
                    }
                    std::thread::sleep(sleep_duration);
                    sleep_duration = (sleep_duration * 2).min(max_sleep);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

impl Drop for MutationLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

fn lock_path(lock_dir: &Path, identifier: &str) -> PathBuf {
    // Identifiers contain path separators; hash them into a flat name.
    let digest = md5::compute(identifier.as_bytes());
    lock_dir.join(format!("{digest:x}.lock"))
}
