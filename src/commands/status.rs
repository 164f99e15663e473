use crate::core::{
    error::Result,
    print_info, print_section_header,
    status::RepoStatus,
    switcher::GitSwitch,
};
use colored::*;

pub fn execute_status(switch: &GitSwitch, repo: Option<&str>) -> Result<()> {
    match repo {
        Some(identifier) => {
            let status = switch.status(identifier)?;
            print_single_status(identifier, &status);
            Ok(())
        }
        None => {
            let statuses = switch.all_statuses();
            if statuses.is_empty() {
                print_info("No repository status available.");
                return Ok(());
            }

            print_section_header("Repositories");
            for (identifier, status) in &statuses {
                println!("{}", format_listing_line(identifier, status));
            }
            println!();
            Ok(())
        }
    }
}

/// One listing row: `identifier  git(branch)*`.
fn format_listing_line(identifier: &str, status: &RepoStatus) -> String {
    format!(
        "{}  {}{}{}{}{}",
        identifier.white(),
        "git(".bright_black(),
        status.branch.blue(),
        ")".bright_black(),
        status.dirty_marker().red(),
        if status.remote.is_empty() {
            String::new()
        } else {
            format!("  {} remote branch(es)", status.remote.len())
                .bright_black()
                .to_string()
        }
    )
}

fn print_single_status(identifier: &str, status: &RepoStatus) {
    print_section_header(identifier);
    println!(
        "On branch {}{}",
        status.branch.blue(),
        status.dirty_marker().red()
    );

    if !status.remote.is_empty() {
        println!("\n{}", "Switch targets:".white());
        for branch in &status.remote {
            if branch == &status.branch {
                println!("  {} {}", "*".white(), branch.blue());
            } else {
                println!("    {}", branch.blue());
            }
        }
    }
    println!();
}
