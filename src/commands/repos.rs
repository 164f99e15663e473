use crate::core::{error::Result, print_info, print_section_header, switcher::GitSwitch};

pub fn execute_repos(switch: &GitSwitch) -> Result<()> {
    let identifiers = switch.registry().list();
    if identifiers.is_empty() {
        print_info("No repositories configured.");
        return Ok(());
    }

    print_section_header("Configured repositories");
    for identifier in identifiers {
        println!("  {identifier}");
    }
    println!();
    Ok(())
}
