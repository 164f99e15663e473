//! Deployment and git repository setup utilities
//!
//! Provides functions for creating managed-content-root deployments with
//! real git repositories in various states, plus a pre-configured CLI
//! command builder with isolated cache and settings locations.

#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Identifier of the single repository every fixture deployment manages.
pub const REPO_ID: &str = "themes/demo";

pub const NONCE_SECRET: &str = "integration-nonce-secret";
pub const DEPLOY_SECRET: &str = "integration-deploy-secret";

/// A throwaway deployment: a content root with one managed repository, a
/// settings file pointing at it, and a private cache home. The TempDir must
/// be kept alive for the duration of the test to prevent cleanup.
pub struct TestDeployment {
    pub temp_dir: TempDir,
    pub content_root: PathBuf,
    pub repo_path: PathBuf,
    pub settings_path: PathBuf,
    pub cache_home: PathBuf,
}

impl TestDeployment {
    /// CLI command wired to this deployment's settings and cache home.
    pub fn command(&self) -> Result<Command> {
        use assert_cmd::prelude::*;

        let mut cmd = Command::cargo_bin("git-switch")?;
        cmd.arg("--config")
            .arg(&self.settings_path)
            .env("XDG_CACHE_HOME", &self.cache_home);
        Ok(cmd)
    }
}

/// Sets up a deployment whose repository has one commit on `main`.
pub fn setup_deployment() -> Result<TestDeployment> {
    let temp_dir = TempDir::new()?;
    let content_root = temp_dir.path().join("content");
    let repo_path = content_root.join(REPO_ID);
    let cache_home = temp_dir.path().join("cache");
    fs::create_dir_all(&repo_path)?;
    fs::create_dir_all(&cache_home)?;

    run_git(&repo_path, &["init", "-b", "main"])?;
    run_git(&repo_path, &["config", "user.name", "Test User"])?;
    run_git(&repo_path, &["config", "user.email", "test@example.com"])?;
    create_file(&repo_path, "style.css", "body {}\n")?;
    git_add(&repo_path, "style.css")?;
    git_commit(&repo_path, "Initial commit")?;

    let settings_path = temp_dir.path().join("settings.json");
    fs::write(
        &settings_path,
        format!(
            r#"{{
                "content_root": {:?},
                "nonce_secret": "{NONCE_SECRET}",
                "deploy_secret": "{DEPLOY_SECRET}",
                "active_theme": "demo"
            }}"#,
            content_root.to_string_lossy()
        ),
    )?;

    Ok(TestDeployment {
        temp_dir,
        content_root,
        repo_path,
        settings_path,
        cache_home,
    })
}

/// Sets up a deployment whose repository also has a local bare `origin`
/// with `main` and `feature-x` pushed, so remote-branch listings and pulls
/// work.
pub fn setup_deployment_with_remote() -> Result<TestDeployment> {
    let deployment = setup_deployment()?;
    let remote_path = deployment.temp_dir.path().join("remote.git");

    run_git(
        deployment.temp_dir.path(),
        &["init", "--bare", "-b", "main", remote_path.to_string_lossy().as_ref()],
    )?;
    run_git(
        &deployment.repo_path,
        &[
            "remote",
            "add",
            "origin",
            remote_path.to_string_lossy().as_ref(),
        ],
    )?;
    run_git(&deployment.repo_path, &["push", "-u", "origin", "main"])?;
    run_git(&deployment.repo_path, &["branch", "feature-x"])?;
    run_git(&deployment.repo_path, &["push", "origin", "feature-x"])?;
    run_git(&deployment.repo_path, &["fetch", "origin"])?;

    Ok(deployment)
}

/// Runs a git command in the given repository
pub fn run_git(repo_path: &Path, args: &[&str]) -> Result<()> {
    Command::new("git").args(args).current_dir(repo_path).output()?;
    Ok(())
}

/// Creates a file with specified content in the repository
pub fn create_file(repo_path: &Path, filename: &str, content: &str) -> Result<()> {
    fs::write(repo_path.join(filename), content)?;
    Ok(())
}

/// Adds a file to the git index
pub fn git_add(repo_path: &Path, filename: &str) -> Result<()> {
    run_git(repo_path, &["add", filename])
}

/// Creates a git commit with the specified message
pub fn git_commit(repo_path: &Path, message: &str) -> Result<()> {
    run_git(repo_path, &["commit", "-m", message])
}

/// Current branch of a repository, `HEAD` when detached.
pub fn current_branch(repo_path: &Path) -> Result<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .current_dir(repo_path)
        .output()?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Mints a switch token through the CLI and returns it.
pub fn mint_nonce(deployment: &TestDeployment, repo: &str, branch: &str) -> Result<String> {
    let output = deployment
        .command()?
        .arg("nonce")
        .arg(repo)
        .arg(branch)
        .output()?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
