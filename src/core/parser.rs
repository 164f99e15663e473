//! Parsing of raw git command output into structured records.
//!
//! Pure functions that turn the line-oriented output of `git status` and
//! `git branch -r` into the pieces of a [`RepoStatus`]. No subprocess
//! execution happens here; callers feed in whatever the command runner
//! captured.
//!
//! # Public API
//! - [`parse_status`]: branch name and dirty flag from `git status` output
//! - [`parse_remote_branches`]: cleaned remote branch names from `git branch -r` output
//!
//! # Failure Signals
//! Git surfaces failure to these callers only through output shape: an empty
//! capture or a leading `fatal:` line. Both map to
//! [`GitSwitchError::NotAGitRepo`].

use crate::core::error::{GitSwitchError, Result};
use crate::core::status::DETACHED_BRANCH;

const BRANCH_PREFIX: &str = "On branch ";
const CLEAN_MARKER: &str = "nothing to commit";
const HEAD_POINTER_MARKER: &str = "HEAD ->";

/// Branch name and dirty flag parsed from `git status` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStatus {
    pub branch: String,
    pub dirty: bool,
}

/// Parse `git status` output lines.
///
/// Fails with [`GitSwitchError::NotAGitRepo`] when the output is empty or its
/// first line contains `fatal`. The branch comes from a leading
/// `On branch <name>` line; without one the status is reported as detached.
/// The tree is clean only when the last non-empty line says so.
pub fn parse_status(lines: &[String]) -> Result<ParsedStatus> {
    let first = match lines.first() {
        Some(line) => line,
        None => return Err(GitSwitchError::NotAGitRepo),
    };
    if first.contains("fatal") {
        return Err(GitSwitchError::NotAGitRepo);
    }

    let branch = match first.strip_prefix(BRANCH_PREFIX) {
        Some(name) => name.trim().to_string(),
        None => DETACHED_BRANCH.to_string(),
    };

    let dirty = !lines
        .iter()
        .rev()
        .find(|line| !line.trim().is_empty())
        .map(|line| line.contains(CLEAN_MARKER))
        .unwrap_or(false);

    Ok(ParsedStatus { branch, dirty })
}

/// Parse `git branch -r` output lines into switch-target branch names.
///
/// Input order is preserved. Entries naming the symbolic HEAD pointer are
/// dropped entirely; the remaining names are trimmed and have their leading
/// `<remote>/` prefix removed.
pub fn parse_remote_branches(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .filter(|line| !line.contains(HEAD_POINTER_MARKER))
        .map(strip_remote_prefix)
        .map(str::to_string)
        .collect()
}

fn strip_remote_prefix(name: &str) -> &str {
    match name.split_once('/') {
        Some((_, rest)) => rest,
        None => name,
    }
}
