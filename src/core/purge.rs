//! Deferred downstream-cache purging.
//!
//! Mutating a working tree invalidates downstream artifacts (rendered CSS,
//! page caches) that are expensive to rebuild inside the mutating call.
//! Instead of purging synchronously, mutations set a short-lived flag; the
//! next invocation consumes the flag once and runs every registered purge
//! hook against every configured site.
//!
//! # Public API
//! - [`DeferredPurge`]: `schedule` / `consume_if_set`
//! - [`PurgeHook`]: best-effort per-site callback

use crate::core::error::Result;
use crate::core::settings::SiteSettings;
use crate::core::store::TransientStore;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Store key for the pending-purge flag.
pub const PURGE_FLAG_KEY: &str = "force_purge_cache";

/// How long a scheduled purge stays pending before it is forgotten.
pub const PURGE_FLAG_TTL: Duration = Duration::from_secs(15 * 60);

/// Callback invoked once per site during purge execution. Failures are
/// logged and skipped, never propagated.
pub type PurgeHook = Box<dyn Fn(&SiteSettings) -> Result<()>>;

pub struct DeferredPurge {
    store: Arc<dyn TransientStore>,
    sites: Vec<SiteSettings>,
    hooks: Vec<PurgeHook>,
}

impl DeferredPurge {
    pub fn new(store: Arc<dyn TransientStore>, sites: Vec<SiteSettings>) -> Self {
        DeferredPurge {
            store,
            sites,
            hooks: Vec::new(),
        }
    }

    pub fn register_hook(&mut self, hook: PurgeHook) {
        self.hooks.push(hook);
    }

    /// Flag that downstream caches must be purged on the next invocation.
    pub fn schedule(&self) {
        self.store
            .set(PURGE_FLAG_KEY, Value::Bool(true), PURGE_FLAG_TTL);
        log::debug!("Deferred purge scheduled");
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self.store.get(PURGE_FLAG_KEY), Some(Value::Bool(true)))
    }

    /// Consume the flag if set, running every hook for every site.
    ///
    /// Returns whether a purge ran. The flag is cleared before the hooks
    /// run, so a crashing hook cannot cause a purge storm.
    pub fn consume_if_set(&self) -> bool {
        if !self.is_scheduled() {
            return false;
        }
        self.store.delete(PURGE_FLAG_KEY);

        for site in &self.sites {
            for hook in &self.hooks {
                if let Err(err) = hook(site) {
                    log::debug!("Purge hook skipped for site '{}': {err}", site.name);
                }
            }
        }
        log::debug!("Deferred purge executed for {} site(s)", self.sites.len());
        true
    }
}
