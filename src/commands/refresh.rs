use crate::core::{error::Result, switcher::GitSwitch};

pub fn execute_refresh(switch: &GitSwitch, repo: &str, secret: &str) -> Result<()> {
    switch.authorizer().verify_deploy_secret(secret)?;
    switch.refresh(repo)?;
    // Plain acknowledgment, kept machine-readable for deploy webhooks.
    println!("Refreshed.");
    Ok(())
}
