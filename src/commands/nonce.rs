use crate::core::{error::Result, registry::validate_branch_name, switcher::GitSwitch};

/// Mint a single-use switch token for a (repository, branch) pair.
///
/// The token is printed bare so it can be pasted into a switch link or a
/// script.
pub fn execute_nonce(switch: &GitSwitch, repo: &str, branch: &str) -> Result<()> {
    switch.registry().resolve(repo)?;
    validate_branch_name(branch)?;

    println!("{}", switch.authorizer().mint(repo, branch));
    Ok(())
}
