//! Git Switch - inspect and switch the git state of deployed code directories.
//!
//! This library provides the core functionality for git-switch: executing git
//! against managed working trees, parsing status output into structured
//! records, caching those records with a short TTL, switching branches under
//! authorization, and deferring downstream cache purges to the next
//! invocation.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module, which
//! provides:
//! - The [`core::GitSwitch`] orchestrator (status / switch / refresh)
//! - Status parsing and the [`core::RepoStatus`] record
//! - Repository identifier resolution and validation
//! - The transient store, status cache and deferred purge
//! - Error handling and result types

pub mod commands;
pub mod core;

// Re-export the core public API for external users
pub use crate::core::{
    parse_remote_branches,
    parse_status,
    // Output helpers
    print_error,
    print_info,
    print_section_header,
    print_success,

    validate_branch_name,
    validate_identifier,

    Authorizer,

    DeferredPurge,
    EnvOverrides,
    FileStore,
    // Error handling
    GitSwitchError,

    // Orchestration
    GitSwitch,
    ParsedStatus,
    PurgeHook,

    // Repository resolution
    RepoConfig,
    RepoRegistry,
    RepoSettings,
    // Status records
    RepoStatus,
    Result,
    // Command execution
    Runner,
    RuntimeResetHook,

    // Configuration
    Settings,
    SiteSettings,
    // Caching
    StatusCache,
    SwitchHook,
    TransientStore,

    DETACHED_BRANCH,
    PURGE_FLAG_KEY,
    PURGE_FLAG_TTL,
    STATUS_CACHE_KEY,
    STATUS_TTL,
    TOKEN_LIFETIME,
};
