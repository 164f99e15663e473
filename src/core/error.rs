//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`GitSwitchError`] which provides comprehensive error handling
//! for all git-switch operations. It uses `thiserror` for ergonomic error definitions
//! and includes specialized error constructors for common failure scenarios.
//!
//! # Public API
//! - [`GitSwitchError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, GitSwitchError>`
//!
//! # Error Categories
//! - **Repository state**: not a git repository, unknown identifier
//! - **Authorization**: token and deploy-secret failures
//! - **Command execution**: subprocess spawn failures and timeouts
//! - **Configuration**: missing or malformed settings
//! - **Validation**: branch-name and identifier allow-list rejections

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for git-switch
#[derive(Error, Debug)]
pub enum GitSwitchError {
    // Repository state errors
    #[error("Can't interact with Git")]
    NotAGitRepo,

    #[error("Unknown repository: {identifier}")]
    UnknownRepo { identifier: String },

    // Authorization errors
    #[error("You can't do this.")]
    Unauthorized,

    #[error("Can't switch without a valid repository status")]
    CannotSwitch,

    // Command execution errors
    #[error("Command '{program}' timed out after {seconds}s")]
    CommandTimedOut { program: String, seconds: u64 },

    #[error("Another operation is already running on '{identifier}'")]
    LockUnavailable { identifier: String },

    // Validation errors
    #[error("Invalid branch name: '{name}'")]
    InvalidBranchName { name: String },

    #[error("Invalid repository identifier: '{identifier}'")]
    InvalidRepoIdentifier { identifier: String },

    // Configuration errors
    #[error("Settings file does not exist at '{path}'")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid settings: {message}")]
    Config { message: String },

    #[error("Could not determine the configuration directory")]
    ConfigDirectoryNotFound,

    // Wrapped errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using GitSwitchError
pub type Result<T> = std::result::Result<T, GitSwitchError>;

impl GitSwitchError {
    /// Create an unknown repository error
    pub fn unknown_repo(identifier: impl Into<String>) -> Self {
        Self::UnknownRepo {
            identifier: identifier.into(),
        }
    }

    /// Create a command timeout error
    pub fn command_timed_out(program: impl Into<String>, seconds: u64) -> Self {
        Self::CommandTimedOut {
            program: program.into(),
            seconds,
        }
    }

    /// Create a lock unavailable error
    pub fn lock_unavailable(identifier: impl Into<String>) -> Self {
        Self::LockUnavailable {
            identifier: identifier.into(),
        }
    }

    /// Create an invalid branch name error
    pub fn invalid_branch_name(name: impl Into<String>) -> Self {
        Self::InvalidBranchName { name: name.into() }
    }

    /// Create an invalid repository identifier error
    pub fn invalid_repo_identifier(identifier: impl Into<String>) -> Self {
        Self::InvalidRepoIdentifier {
            identifier: identifier.into(),
        }
    }

    /// Create a settings validation error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a settings file not found error
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_a_git_repo_display() {
        let err = GitSwitchError::NotAGitRepo;
        assert_eq!(err.to_string(), "Can't interact with Git");
    }

    #[test]
    fn test_unauthorized_display() {
        let err = GitSwitchError::Unauthorized;
        assert_eq!(err.to_string(), "You can't do this.");
    }

    #[test]
    fn test_unknown_repo_error() {
        let err = GitSwitchError::unknown_repo("themes/missing");
        assert_eq!(err.to_string(), "Unknown repository: themes/missing");
    }

    #[test]
    fn test_command_timed_out_error() {
        let err = GitSwitchError::command_timed_out("git", 120);
        assert_eq!(err.to_string(), "Command 'git' timed out after 120s");
    }

    #[test]
    fn test_invalid_branch_name_error() {
        let err = GitSwitchError::invalid_branch_name("bad;name");
        assert!(err.to_string().contains("bad;name"));
    }

    #[test]
    fn test_config_not_found_error() {
        let err = GitSwitchError::config_not_found("/etc/git-switch/settings.json");
        assert!(err.to_string().contains("/etc/git-switch/settings.json"));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_lock_unavailable_error() {
        let err = GitSwitchError::lock_unavailable("themes/storefront");
        assert!(err.to_string().contains("themes/storefront"));
    }
}
