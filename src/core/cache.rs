//! TTL-bounded repository status cache.
//!
//! All repositories share one store entry holding a map from identifier to
//! [`RepoStatus`]. Every read loads the whole map, every write rewrites it
//! and resets the shared TTL, matching the single-transient layout of the
//! system this replaces. Invalidating one entry therefore renews the clock
//! on its siblings, never the other way around.
//!
//! # Public API
//! - [`StatusCache`]: `get` / `put` / `invalidate` keyed by repo identifier
//! - [`STATUS_CACHE_KEY`]: the store key holding the whole map

use crate::core::status::RepoStatus;
use crate::core::store::TransientStore;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Store key under which the whole status map is persisted.
pub const STATUS_CACHE_KEY: &str = "git-switch-status";

/// Freshness window for the whole status map.
pub const STATUS_TTL: Duration = Duration::from_secs(3 * 60);

pub struct StatusCache {
    store: Arc<dyn TransientStore>,
    ttl: Duration,
}

impl StatusCache {
    pub fn new(store: Arc<dyn TransientStore>) -> Self {
        StatusCache {
            store,
            ttl: STATUS_TTL,
        }
    }

    #[cfg(test)]
    fn with_ttl(store: Arc<dyn TransientStore>, ttl: Duration) -> Self {
        StatusCache { store, ttl }
    }

    pub fn get(&self, identifier: &str) -> Option<RepoStatus> {
        let status = self.read_map().remove(identifier);
        if status.is_some() {
            log::debug!("Status cache hit for '{identifier}'");
        }
        status
    }

    pub fn put(&self, identifier: &str, status: RepoStatus) {
        let mut map = self.read_map();
        map.insert(identifier.to_string(), status);
        self.write_map(map);
    }

    pub fn invalidate(&self, identifier: &str) {
        let mut map = self.read_map();
        map.remove(identifier);
        self.write_map(map);
        log::debug!("Status cache invalidated for '{identifier}'");
    }

    /// Load the whole map, dropping entries that were never fully
    /// populated (null, false, or otherwise unparseable values).
    fn read_map(&self) -> BTreeMap<String, RepoStatus> {
        let raw = match self.store.get(STATUS_CACHE_KEY) {
            Some(Value::Object(map)) => map,
            Some(_) | None => return BTreeMap::new(),
        };

        raw.into_iter()
            .filter_map(|(identifier, value)| match value {
                Value::Null | Value::Bool(false) => None,
                value => serde_json::from_value::<RepoStatus>(value)
                    .ok()
                    .map(|status| (identifier, status)),
            })
            .collect()
    }

    fn write_map(&self, map: BTreeMap<String, RepoStatus>) {
        match serde_json::to_value(&map) {
            Ok(value) => self.store.set(STATUS_CACHE_KEY, value, self.ttl),
            Err(err) => log::warn!("Failed to serialize status cache: {err}"),
        }
    }
}
