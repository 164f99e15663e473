//! Authorization tokens for mutating operations.
//!
//! Branch-switch requests carry a short token bound to the exact
//! (repository, branch) pair it was minted for, so a token issued for one
//! switch target can never be replayed against another. Tokens are derived
//! from a configured secret over a sliding time window and are additionally
//! single-use: a successful switch records the token in a store-backed
//! ledger and later verifications reject it.
//!
//! Remote-triggered refresh requests use a simpler scheme, a shared deploy
//! secret compared verbatim.

use crate::core::error::{GitSwitchError, Result};
use crate::core::store::TransientStore;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

/// How long a minted token stays valid.
pub const TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Store key holding the consumed-token ledger.
const USED_TOKENS_KEY: &str = "git-switch-used-nonces";

pub struct Authorizer {
    nonce_secret: String,
    deploy_secret: Option<String>,
    store: Arc<dyn TransientStore>,
}

impl Authorizer {
    pub fn new(
        nonce_secret: String,
        deploy_secret: Option<String>,
        store: Arc<dyn TransientStore>,
    ) -> Self {
        Authorizer {
            nonce_secret,
            deploy_secret,
            store,
        }
    }

    /// Mint a token authorizing one switch of `identifier` to `branch`.
    pub fn mint(&self, identifier: &str, branch: &str) -> String {
        self.token_for(self.current_tick(), identifier, branch)
    }

    /// Verify a token against the pair it claims to authorize.
    ///
    /// Tokens from the current and the previous time window are accepted,
    /// consumed tokens are not.
    pub fn verify(&self, identifier: &str, branch: &str, token: &str) -> Result<()> {
        let tick = self.current_tick();
        let matches = token == self.token_for(tick, identifier, branch)
            || token == self.token_for(tick - 1, identifier, branch);
        if !matches {
            return Err(GitSwitchError::Unauthorized);
        }
        if self.used_tokens().iter().any(|used| used == token) {
            log::debug!("Rejecting replayed token for '{identifier}'");
            return Err(GitSwitchError::Unauthorized);
        }
        Ok(())
    }

    /// Record a token as spent. Called after the switch it authorized.
    pub fn consume(&self, token: &str) {
        let mut used = self.used_tokens();
        used.push(token.to_string());
        match serde_json::to_value(&used) {
            Ok(value) => self.store.set(USED_TOKENS_KEY, value, TOKEN_LIFETIME),
            Err(err) => log::warn!("Failed to persist consumed token: {err}"),
        }
    }

    /// Check a remote-trigger secret against the configured deploy secret.
    pub fn verify_deploy_secret(&self, provided: &str) -> Result<()> {
        match &self.deploy_secret {
            Some(secret) if !provided.is_empty() && provided == secret => Ok(()),
            _ => Err(GitSwitchError::Unauthorized),
        }
    }

    fn used_tokens(&self) -> Vec<String> {
        self.store
            .get(USED_TOKENS_KEY)
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default()
    }

    /// Tokens roll over at half the lifetime, so a freshly minted token is
    /// always good for at least half of it.
    fn current_tick(&self) -> i64 {
        Utc::now().timestamp() / (TOKEN_LIFETIME.as_secs() as i64 / 2)
    }

    fn token_for(&self, tick: i64, identifier: &str, branch: &str) -> String {
        let digest = md5::compute(
            format!(
                "{tick}|switch-branch|{identifier}|{branch}|{}",
                self.nonce_secret
            )
            .as_bytes(),
        );
        format!("{digest:x}")[..10].to_string()
    }
}
