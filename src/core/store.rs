//! Expiring key-value storage for cached state.
//!
//! This module defines the [`TransientStore`] contract the status cache and
//! the deferred-purge flag are built on, plus [`FileStore`], the JSON-file
//! implementation used by the CLI. Each deployment gets its own namespace
//! directory derived from the content root, so two installations never share
//! cached state.
//!
//! # Failure Semantics
//! Store failures are never surfaced to callers: a failed read degrades to a
//! miss and a failed write is logged, so the system always falls back to
//! recomputation.

use crate::core::dirs::get_cache_directory;
use crate::core::error::Result;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Expiring key-value store. Values are JSON; a missing or expired key
/// reads as `None`.
pub trait TransientStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value, ttl: Duration);
    fn delete(&self, key: &str);
}

#[derive(Serialize, Deserialize, Debug)]
struct TransientEntry {
    expires_at: DateTime<Utc>,
    value: Value,
}

/// One JSON file per key inside a per-deployment namespace directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        FileStore { dir }
    }

    /// Store namespaced to a deployment, keyed by its content root.
    pub fn for_content_root(content_root: &Path) -> Result<Self> {
        let namespace = format!(
            "{:x}",
            md5::compute(content_root.to_string_lossy().as_bytes())
        );
        Ok(FileStore {
            dir: get_cache_directory()?.join(namespace),
        })
    }

    /// Directory holding this store's entries (also used for lock files).
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl TransientStore for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        let path = self.entry_path(key);
        let content = std::fs::read_to_string(&path).ok()?;
        let entry: TransientEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("Discarding unreadable store entry '{key}': {err}");
                let _ = std::fs::remove_file(&path);
                return None;
            }
        };

        if entry.expires_at <= Utc::now() {
            log::debug!("Store entry '{key}' expired");
            let _ = std::fs::remove_file(&path);
            return None;
        }

        Some(entry.value)
    }

    fn set(&self, key: &str, value: Value, ttl: Duration) {
        let ttl = ChronoDuration::from_std(ttl).unwrap_or_else(|_| ChronoDuration::seconds(0));
        let entry = TransientEntry {
            expires_at: Utc::now() + ttl,
            value,
        };

        if let Err(err) = std::fs::create_dir_all(&self.dir) {
            log::warn!("Failed to create store directory '{}': {err}", self.dir.display());
            return;
        }
        let path = self.entry_path(key);
        match serde_json::to_string_pretty(&entry) {
            Ok(json) => {
                if let Err(err) = std::fs::write(&path, json) {
                    log::warn!("Failed to write store entry '{key}': {err}");
                }
            }
            Err(err) => log::warn!("Failed to serialize store entry '{key}': {err}"),
        }
    }

    fn delete(&self, key: &str) {
        let path = self.entry_path(key);
        if let Err(err) = std::fs::remove_file(&path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to delete store entry '{key}': {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> FileStore {
        FileStore::new(dir.path().join("store"))
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.set("example", json!({"branch": "main"}), Duration::from_secs(60));
        assert_eq!(store.get("example"), Some(json!({"branch": "main"})));
    }

    #[test]
    fn test_missing_key_reads_as_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(store(&dir).get("nope"), None);
    }

    #[test]
    fn test_expired_entry_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.set("ephemeral", json!(true), Duration::from_secs(0));
        assert_eq!(store.get("ephemeral"), None);
        // The stale file is cleaned up on read.
        assert!(!store.dir().join("ephemeral.json").exists());
    }

    #[test]
    fn test_delete_removes_entry() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.set("gone", json!(1), Duration::from_secs(60));
        store.delete("gone");
        assert_eq!(store.get("gone"), None);

        // Deleting again is a no-op.
        store.delete("gone");
    }

    #[test]
    fn test_corrupt_entry_degrades_to_miss() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        std::fs::create_dir_all(store.dir()).unwrap();
        std::fs::write(store.dir().join("bad.json"), "{ not json").unwrap();
        assert_eq!(store.get("bad"), None);
    }

    #[test]
    fn test_namespaces_differ_per_content_root() {
        let a = FileStore::for_content_root(Path::new("/var/www/a")).unwrap();
        let b = FileStore::for_content_root(Path::new("/var/www/b")).unwrap();
        assert_ne!(a.dir(), b.dir());
    }
}
