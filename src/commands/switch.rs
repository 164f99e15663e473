use crate::core::{error::Result, print_success, switcher::GitSwitch};

pub fn execute_switch(switch: &GitSwitch, repo: &str, branch: &str, nonce: &str) -> Result<()> {
    switch.switch_branch(repo, branch, nonce)?;
    print_success(&format!("Switched '{repo}' to branch '{branch}'"));
    Ok(())
}
