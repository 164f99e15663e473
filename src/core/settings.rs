use crate::core::dirs::get_config_directory;
use crate::core::error::{GitSwitchError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default subprocess timeout when `command_timeout_secs` is absent.
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 120;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct RepoSettings {
    /// SSH private key used for this repository's remote operations,
    /// resolved relative to `app_root` when not absolute.
    #[serde(default)]
    pub ssh_key: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SiteSettings {
    pub name: String,
    pub root: PathBuf,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Settings {
    /// Root under which every repository identifier is resolved.
    pub content_root: PathBuf,

    /// Application root; relative SSH key paths are resolved against it.
    /// Defaults to the parent of `content_root`.
    #[serde(default)]
    pub app_root: Option<PathBuf>,

    /// Currently selected theme, used as the implicit single repository
    /// when no explicit `repos` are configured.
    #[serde(default)]
    pub active_theme: Option<String>,

    /// Secret used to mint and verify branch-switch tokens.
    pub nonce_secret: String,

    /// Secret authorizing remote-triggered refresh/deploy requests.
    #[serde(default)]
    pub deploy_secret: Option<String>,

    /// Explicit repository map: identifier -> per-repo settings.
    #[serde(default)]
    pub repos: BTreeMap<String, RepoSettings>,

    /// Sites whose downstream caches are purged after a mutation.
    #[serde(default)]
    pub sites: Vec<SiteSettings>,

    /// Commands (argv vectors) run in each site root during a purge.
    #[serde(default)]
    pub purge_commands: Vec<Vec<String>>,

    /// Subprocess timeout in seconds; 0 disables the timeout.
    #[serde(default)]
    pub command_timeout_secs: Option<u64>,
}

impl Settings {
    /// Default location of the settings file.
    pub fn default_path() -> Result<PathBuf> {
        Ok(get_config_directory()?.join("settings.json"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GitSwitchError::config_not_found(path));
        }
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.nonce_secret.is_empty() {
            return Err(GitSwitchError::config("nonce_secret must not be empty"));
        }
        if self.content_root.as_os_str().is_empty() {
            return Err(GitSwitchError::config("content_root must not be empty"));
        }
        if self.repos.is_empty() && self.active_theme.is_none() {
            return Err(GitSwitchError::config(
                "either repos or active_theme must be configured",
            ));
        }
        Ok(())
    }

    /// Application root, falling back to the parent of `content_root`.
    pub fn app_root(&self) -> PathBuf {
        self.app_root.clone().unwrap_or_else(|| {
            self.content_root
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.content_root.clone())
        })
    }

    /// Effective subprocess timeout; `None` means unlimited.
    pub fn command_timeout(&self) -> Option<std::time::Duration> {
        match self.command_timeout_secs {
            Some(0) => None,
            Some(secs) => Some(std::time::Duration::from_secs(secs)),
            None => Some(std::time::Duration::from_secs(
                DEFAULT_COMMAND_TIMEOUT_SECS,
            )),
        }
    }

    /// Sites to purge; a single implicit site when none are configured.
    pub fn purge_sites(&self) -> Vec<SiteSettings> {
        if self.sites.is_empty() {
            vec![SiteSettings {
                name: "default".to_string(),
                root: self.content_root.clone(),
            }]
        } else {
            self.sites.clone()
        }
    }
}
