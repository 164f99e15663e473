use crate::core::error::{GitSwitchError, Result};
use std::path::PathBuf;

pub fn get_config_directory() -> Result<PathBuf> {
    let base = match std::env::consts::OS {
        "linux" | "freebsd" | "netbsd" | "openbsd" => std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs::home_dir().unwrap_or_default().join(".config")),
        "macos" => dirs::home_dir()
            .unwrap_or_default()
            .join("Library/Application Support"),
        "windows" => dirs::config_dir().unwrap_or_default(),
        _ => dirs::config_dir().unwrap_or_default(),
    };

    if base.as_os_str().is_empty() {
        return Err(GitSwitchError::ConfigDirectoryNotFound);
    }

    Ok(base.join("git-switch"))
}

pub fn get_cache_directory() -> Result<PathBuf> {
    let base = match std::env::consts::OS {
        "linux" | "freebsd" | "netbsd" | "openbsd" => std::env::var("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs::home_dir().unwrap_or_default().join(".cache")),
        "macos" => dirs::home_dir().unwrap_or_default().join("Library/Caches"),
        "windows" => dirs::cache_dir().unwrap_or_default(),
        _ => dirs::cache_dir().unwrap_or_default(),
    };

    Ok(base.join("git-switch"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_directory_is_namespaced() {
        let dir = get_cache_directory().unwrap();
        assert!(dir.to_string_lossy().contains("git-switch"));
    }
}
