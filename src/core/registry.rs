//! Resolution of repository identifiers to filesystem locations.
//!
//! The registry maps each configured identifier to its working tree path and
//! optional SSH identity. Identifiers are path segments relative to the
//! content root (`themes/storefront`, `plugins/checkout`). When no explicit
//! repositories are configured, the registry falls back to a single implicit
//! entry derived from the active theme.
//!
//! # Public API
//! - [`RepoRegistry`]: identifier enumeration and resolution
//! - [`RepoConfig`]: resolved per-repository configuration
//! - [`validate_identifier`] / [`validate_branch_name`]: argv-safety allow-lists

use crate::core::error::{GitSwitchError, Result};
use crate::core::settings::{RepoSettings, Settings};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Resolved configuration for one managed repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoConfig {
    pub identifier: String,
    pub absolute_path: PathBuf,
    pub ssh_key_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct RepoRegistry {
    content_root: PathBuf,
    app_root: PathBuf,
    repos: BTreeMap<String, RepoSettings>,
}

impl RepoRegistry {
    pub fn from_settings(settings: &Settings) -> Self {
        let mut repos = settings.repos.clone();

        // Legacy single-repo mode: the active theme stands in when no
        // explicit repositories are configured.
        if repos.is_empty() {
            if let Some(theme) = &settings.active_theme {
                repos.insert(format!("themes/{theme}"), RepoSettings::default());
            }
        }

        RepoRegistry {
            content_root: settings.content_root.clone(),
            app_root: settings.app_root(),
            repos,
        }
    }

    /// All configured identifiers, in stable order.
    pub fn list(&self) -> Vec<String> {
        self.repos.keys().cloned().collect()
    }

    /// Resolve an identifier to its repository configuration.
    ///
    /// The working tree path is not checked for existence; a missing
    /// directory surfaces later as a status failure.
    pub fn resolve(&self, identifier: &str) -> Result<RepoConfig> {
        validate_identifier(identifier)?;

        let repo = self
            .repos
            .get(identifier)
            .ok_or_else(|| GitSwitchError::unknown_repo(identifier))?;

        let ssh_key_path = repo.ssh_key.as_ref().map(|key| {
            if key.is_absolute() {
                key.clone()
            } else {
                self.app_root.join(key)
            }
        });

        Ok(RepoConfig {
            identifier: identifier.to_string(),
            absolute_path: self.content_root.join(identifier),
            ssh_key_path,
        })
    }
}

/// Validate a repository identifier against the allow-list.
///
/// Identifiers become filesystem path segments and argv elements, so they are
/// restricted to ASCII alphanumerics plus `.`, `_`, `-` and `/`, must not
/// start with `-` or `.`, and must not contain a `..` segment.
pub fn validate_identifier(identifier: &str) -> Result<()> {
    let valid = !identifier.is_empty()
        && !identifier.starts_with('-')
        && !identifier.starts_with('.')
        && !identifier.ends_with('/')
        && identifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '/'))
        && identifier.split('/').all(|seg| !seg.is_empty() && seg != "..");

    if valid {
        Ok(())
    } else {
        Err(GitSwitchError::invalid_repo_identifier(identifier))
    }
}

/// Validate a branch name against the allow-list.
///
/// Branch names are passed as argv elements to git; the same character set
/// applies as for identifiers, minus the path restrictions git itself
/// enforces elsewhere.
pub fn validate_branch_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with('-')
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '/'));

    if valid {
        Ok(())
    } else {
        Err(GitSwitchError::invalid_branch_name(name))
    }
}
