//! Repository status records.
//!
//! This module defines [`RepoStatus`], the parsed snapshot of one managed
//! repository: its current branch, dirty flag, the raw `git status` output it
//! was derived from, and the remote branches available as switch targets.
//!
//! # Public API
//! - [`RepoStatus`]: Parsed repository snapshot, serialized into the status cache

use serde::{Deserialize, Serialize};

/// Branch name reported when the working tree has no current branch.
pub const DETACHED_BRANCH: &str = "detached";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoStatus {
    /// Current branch, or `"detached"` when no branch line was found.
    pub branch: String,
    /// Whether the working tree has uncommitted changes.
    pub dirty: bool,
    /// Raw `git status` output lines, order preserved.
    pub status: Vec<String>,
    /// Remote branch names, most recently committed first, prefix stripped.
    pub remote: Vec<String>,
}

impl RepoStatus {
    pub fn is_detached(&self) -> bool {
        self.branch == DETACHED_BRANCH
    }

    /// Marker appended to the branch in listings: `*` when dirty.
    pub fn dirty_marker(&self) -> &'static str {
        if self.dirty {
            "*"
        } else {
            ""
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_and_marker() {
        let status = RepoStatus {
            branch: DETACHED_BRANCH.to_string(),
            dirty: true,
            status: vec![],
            remote: vec![],
        };
        assert!(status.is_detached());
        assert_eq!(status.dirty_marker(), "*");

        let clean = RepoStatus {
            branch: "main".to_string(),
            dirty: false,
            status: vec![],
            remote: vec![],
        };
        assert!(!clean.is_detached());
        assert_eq!(clean.dirty_marker(), "");
    }
}
