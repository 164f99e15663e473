//! CLI command implementations.
//!
//! Each command is a thin wrapper over [`GitSwitch`](crate::core::GitSwitch):
//! it runs one orchestrator operation and formats the result for the
//! terminal.

pub mod nonce;
pub mod refresh;
pub mod repos;
pub mod status;
pub mod switch;

pub use nonce::execute_nonce;
pub use refresh::execute_refresh;
pub use repos::execute_repos;
pub use status::execute_status;
pub use switch::execute_switch;

use crate::core::error::Result;
use crate::core::settings::Settings;
use crate::core::switcher::GitSwitch;

/// Build the orchestrator for a loaded settings file, wiring the configured
/// purge commands in as purge hooks.
pub fn build_switch(settings: &Settings) -> Result<GitSwitch> {
    let mut switch = GitSwitch::from_settings(settings)?;

    for argv in &settings.purge_commands {
        let argv = argv.clone();
        let runner = switch.runner().clone();
        switch.register_purge_hook(Box::new(move |site| {
            runner.run(&site.root, &argv, &Vec::new()).map(|_| ())
        }));
    }

    Ok(switch)
}
