//! The switch/refresh orchestrator.
//!
//! [`GitSwitch`] composes the registry, command runner, parser, status cache
//! and deferred purge into the three operator-facing operations:
//!
//! - [`GitSwitch::status`]: cached repository status, recomputed on miss
//! - [`GitSwitch::switch_branch`]: token-authorized forced checkout
//! - [`GitSwitch::refresh`]: fetch remotes and hard-sync the current branch
//!
//! Mutating operations hold a per-repository lock, invalidate the status
//! cache after dispatching their git commands, and schedule the deferred
//! purge before returning, so a later `status` call sees either fresh data
//! or a miss. The checkout and reset commands themselves are not
//! exit-checked; git reports trouble through its output and the runner logs
//! the exit code.

use crate::core::auth::Authorizer;
use crate::core::cache::StatusCache;
use crate::core::error::{GitSwitchError, Result};
use crate::core::lock::MutationLock;
use crate::core::parser::{parse_remote_branches, parse_status};
use crate::core::purge::{DeferredPurge, PurgeHook};
use crate::core::registry::{validate_branch_name, RepoConfig, RepoRegistry};
use crate::core::runner::{EnvOverrides, Runner};
use crate::core::settings::Settings;
use crate::core::status::RepoStatus;
use crate::core::store::{FileStore, TransientStore};
use std::path::PathBuf;
use std::sync::Arc;

/// Callback fired after a successful branch switch: `(branch, identifier)`.
pub type SwitchHook = Box<dyn Fn(&str, &str)>;

/// Callback invalidating process-level bytecode/opcode caches.
pub type RuntimeResetHook = Box<dyn Fn()>;

pub struct GitSwitch {
    registry: RepoRegistry,
    runner: Runner,
    cache: StatusCache,
    auth: Authorizer,
    purge: DeferredPurge,
    lock_dir: PathBuf,
    switch_hooks: Vec<SwitchHook>,
    runtime_reset_hooks: Vec<RuntimeResetHook>,
}

impl GitSwitch {
    /// Build an orchestrator over the default file-backed store for this
    /// deployment.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let store = FileStore::for_content_root(&settings.content_root)?;
        let lock_dir = store.dir().join("locks");
        Ok(Self::with_store(settings, Arc::new(store), lock_dir))
    }

    /// Build an orchestrator over an explicit store and lock directory.
    pub fn with_store(
        settings: &Settings,
        store: Arc<dyn TransientStore>,
        lock_dir: PathBuf,
    ) -> Self {
        GitSwitch {
            registry: RepoRegistry::from_settings(settings),
            runner: Runner::new(settings.command_timeout()),
            cache: StatusCache::new(store.clone()),
            auth: Authorizer::new(
                settings.nonce_secret.clone(),
                settings.deploy_secret.clone(),
                store.clone(),
            ),
            purge: DeferredPurge::new(store, settings.purge_sites()),
            lock_dir,
            switch_hooks: Vec::new(),
            runtime_reset_hooks: Vec::new(),
        }
    }

    pub fn registry(&self) -> &RepoRegistry {
        &self.registry
    }

    pub fn authorizer(&self) -> &Authorizer {
        &self.auth
    }

    pub fn runner(&self) -> &Runner {
        &self.runner
    }

    pub fn on_switch(&mut self, hook: SwitchHook) {
        self.switch_hooks.push(hook);
    }

    pub fn on_runtime_reset(&mut self, hook: RuntimeResetHook) {
        self.runtime_reset_hooks.push(hook);
    }

    pub fn register_purge_hook(&mut self, hook: PurgeHook) {
        self.purge.register_hook(hook);
    }

    /// Consume a pending deferred purge, if any. Run once at the start of
    /// every invocation.
    pub fn consume_pending_purge(&self) -> bool {
        self.purge.consume_if_set()
    }

    /// Status of one repository, served from cache within the TTL window.
    pub fn status(&self, identifier: &str) -> Result<RepoStatus> {
        let repo = self.registry.resolve(identifier)?;
        if let Some(status) = self.cache.get(identifier) {
            return Ok(status);
        }
        self.fetch_status(&repo)
    }

    /// Statuses of every registered repository. Repositories whose status
    /// cannot be read are omitted rather than failing the whole listing.
    pub fn all_statuses(&self) -> Vec<(String, RepoStatus)> {
        self.registry
            .list()
            .into_iter()
            .filter_map(|identifier| match self.status(&identifier) {
                Ok(status) => Some((identifier, status)),
                Err(err) => {
                    log::debug!("Omitting '{identifier}' from listing: {err}");
                    None
                }
            })
            .collect()
    }

    /// Forcibly check out `branch` in the identified repository.
    ///
    /// The token must have been minted for exactly this (identifier,
    /// branch) pair and not used before. The checkout's own exit status is
    /// not checked; cache invalidation and purge scheduling happen
    /// regardless.
    pub fn switch_branch(&self, identifier: &str, branch: &str, token: &str) -> Result<()> {
        let repo = self.registry.resolve(identifier)?;
        validate_branch_name(branch)?;
        self.auth.verify(identifier, branch, token)?;

        let _lock = MutationLock::acquire(&self.lock_dir, identifier)?;

        // A switch is only meaningful against a repository we can read.
        self.status(identifier).map_err(|err| match err {
            GitSwitchError::NotAGitRepo => GitSwitchError::CannotSwitch,
            other => other,
        })?;

        let env = ssh_env(&repo);
        let steps = vec![
            git(&["checkout", "-f", branch]),
            git(&["submodule", "update", "--init"]),
        ];
        self.runner.run_steps(&repo.absolute_path, &steps, &env)?;

        for hook in &self.runtime_reset_hooks {
            hook();
        }
        self.cache.invalidate(identifier);
        self.purge.schedule();
        self.auth.consume(token);

        for hook in &self.switch_hooks {
            hook(branch, identifier);
        }
        log::info!("Switched '{identifier}' to branch '{branch}'");
        Ok(())
    }

    /// Update remotes and hard-sync the identified repository onto its
    /// current branch. Detached working trees are fetched but never
    /// cleaned, reset or pulled.
    pub fn refresh(&self, identifier: &str) -> Result<()> {
        let repo = self.registry.resolve(identifier)?;
        let _lock = MutationLock::acquire(&self.lock_dir, identifier)?;
        let env = ssh_env(&repo);

        self.runner.run_steps(
            &repo.absolute_path,
            &[
                git(&["remote", "update"]),
                git(&["fetch", "origin"]),
                git(&["remote", "prune", "origin"]),
            ],
            &env,
        )?;

        self.cache.invalidate(identifier);
        let status = self.fetch_status(&repo);

        let destructive = match &status {
            Ok(status) if !status.is_detached() => self.runner.run_steps(
                &repo.absolute_path,
                &[
                    git(&["clean", "-fd"]),
                    git(&["reset", "--hard"]),
                    git(&["pull", "-f", "origin", status.branch.as_str()]),
                    git(&["submodule", "update", "--init", "--recursive"]),
                ],
                &env,
            ),
            _ => Ok(()),
        };

        self.cache.invalidate(identifier);
        self.purge.schedule();
        log::info!("Refreshed '{identifier}'");

        destructive?;
        status.map(|_| ())
    }

    /// Run the status and remote-branch commands and cache the combined
    /// record. Nothing is cached on failure.
    fn fetch_status(&self, repo: &RepoConfig) -> Result<RepoStatus> {
        let env = ssh_env(repo);
        let lines = match self.runner.run(&repo.absolute_path, &git(&["status"]), &env) {
            Ok(lines) => lines,
            Err(err @ GitSwitchError::CommandTimedOut { .. }) => return Err(err),
            Err(err) => {
                log::debug!("Status command failed for '{}': {err}", repo.identifier);
                return Err(GitSwitchError::NotAGitRepo);
            }
        };
        let parsed = parse_status(&lines)?;

        let remote = match self.runner.run(
            &repo.absolute_path,
            &git(&["branch", "-r", "--sort=-committerdate"]),
            &env,
        ) {
            Ok(branch_lines) => parse_remote_branches(&branch_lines),
            Err(err @ GitSwitchError::CommandTimedOut { .. }) => return Err(err),
            Err(_) => Vec::new(),
        };

        let status = RepoStatus {
            branch: parsed.branch,
            dirty: parsed.dirty,
            status: lines,
            remote,
        };
        self.cache.put(&repo.identifier, status.clone());
        Ok(status)
    }
}

fn git(args: &[&str]) -> Vec<String> {
    std::iter::once("git")
        .chain(args.iter().copied())
        .map(str::to_string)
        .collect()
}

fn ssh_env(repo: &RepoConfig) -> EnvOverrides {
    match &repo.ssh_key_path {
        Some(key) => vec![(
            "GIT_SSH_COMMAND".to_string(),
            format!("ssh -i {} -o IdentitiesOnly=yes", key.display()),
        )],
        None => Vec::new(),
    }
}
