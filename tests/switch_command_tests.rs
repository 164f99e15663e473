use assert_cmd::prelude::*;
use predicates::prelude::*;

mod common;
use common::repository::*;

#[cfg(test)]
mod switch_command_tests {
    use super::*;

    #[test]
    fn test_switch_with_minted_nonce() -> anyhow::Result<()> {
        let deployment = setup_deployment()?;
        run_git(&deployment.repo_path, &["branch", "feature-x"])?;

        let nonce = mint_nonce(&deployment, REPO_ID, "feature-x")?;
        assert!(!nonce.is_empty());

        deployment
            .command()?
            .arg("switch")
            .arg(REPO_ID)
            .arg("feature-x")
            .arg("--nonce")
            .arg(&nonce)
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Switched 'themes/demo' to branch 'feature-x'",
            ));

        assert_eq!(current_branch(&deployment.repo_path)?, "feature-x");
        Ok(())
    }

    #[test]
    fn test_switch_with_garbage_nonce_fails() -> anyhow::Result<()> {
        let deployment = setup_deployment()?;
        run_git(&deployment.repo_path, &["branch", "feature-x"])?;

        deployment
            .command()?
            .arg("switch")
            .arg(REPO_ID)
            .arg("feature-x")
            .arg("--nonce")
            .arg("0000000000")
            .assert()
            .failure()
            .stdout(predicate::str::contains("You can't do this."));

        assert_eq!(current_branch(&deployment.repo_path)?, "main");
        Ok(())
    }

    #[test]
    fn test_nonce_is_bound_to_branch() -> anyhow::Result<()> {
        let deployment = setup_deployment()?;
        run_git(&deployment.repo_path, &["branch", "feature-x"])?;

        // Token minted for another branch must not authorize this switch.
        let nonce = mint_nonce(&deployment, REPO_ID, "develop")?;

        deployment
            .command()?
            .arg("switch")
            .arg(REPO_ID)
            .arg("feature-x")
            .arg("--nonce")
            .arg(&nonce)
            .assert()
            .failure()
            .stdout(predicate::str::contains("You can't do this."));

        assert_eq!(current_branch(&deployment.repo_path)?, "main");
        Ok(())
    }

    #[test]
    fn test_nonce_is_single_use() -> anyhow::Result<()> {
        let deployment = setup_deployment()?;
        run_git(&deployment.repo_path, &["branch", "feature-x"])?;

        let nonce = mint_nonce(&deployment, REPO_ID, "feature-x")?;

        deployment
            .command()?
            .arg("switch")
            .arg(REPO_ID)
            .arg("feature-x")
            .arg("--nonce")
            .arg(&nonce)
            .assert()
            .success();

        deployment
            .command()?
            .arg("switch")
            .arg(REPO_ID)
            .arg("feature-x")
            .arg("--nonce")
            .arg(&nonce)
            .assert()
            .failure()
            .stdout(predicate::str::contains("You can't do this."));

        Ok(())
    }

    #[test]
    fn test_switch_unknown_repo_fails() -> anyhow::Result<()> {
        let deployment = setup_deployment()?;

        deployment
            .command()?
            .arg("switch")
            .arg("themes/other")
            .arg("main")
            .arg("--nonce")
            .arg("0000000000")
            .assert()
            .failure()
            .stdout(predicate::str::contains("Unknown repository"));

        Ok(())
    }

    #[test]
    fn test_switch_rejects_unsafe_branch_name() -> anyhow::Result<()> {
        let deployment = setup_deployment()?;

        let nonce = mint_nonce(&deployment, REPO_ID, "feature-x")?;
        deployment
            .command()?
            .arg("switch")
            .arg(REPO_ID)
            .arg("bad;name")
            .arg("--nonce")
            .arg(&nonce)
            .assert()
            .failure()
            .stdout(predicate::str::contains("Invalid branch name"));

        Ok(())
    }

    #[test]
    fn test_switch_discards_local_changes() -> anyhow::Result<()> {
        let deployment = setup_deployment()?;
        run_git(&deployment.repo_path, &["branch", "feature-x"])?;
        create_file(&deployment.repo_path, "style.css", "body { color: red }\n")?;

        let nonce = mint_nonce(&deployment, REPO_ID, "feature-x")?;
        deployment
            .command()?
            .arg("switch")
            .arg(REPO_ID)
            .arg("feature-x")
            .arg("--nonce")
            .arg(&nonce)
            .assert()
            .success();

        // Forced checkout drops the uncommitted edit.
        let content = std::fs::read_to_string(deployment.repo_path.join("style.css"))?;
        assert_eq!(content, "body {}\n");
        Ok(())
    }
}
