use clap::{Parser, Subcommand};
use git_switch::commands::*;
use git_switch::core::{error::Result, print_error, settings::Settings};
use std::env;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "git-switch")]
#[command(about = "Inspect and switch the git state of deployed code directories")]
#[command(version = "0.1.0")]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Path to the settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the status of one repository, or all of them
    Status {
        /// Repository identifier (e.g. "themes/storefront")
        repo: Option<String>,
    },
    /// Switch a repository to a branch
    Switch {
        /// Repository identifier
        repo: String,
        /// Target branch
        branch: String,
        /// Authorization token minted for this repository and branch
        #[arg(long)]
        nonce: String,
    },
    /// Fetch remotes and hard-sync a repository onto its current branch
    Refresh {
        /// Repository identifier
        repo: String,
        /// Deploy secret authorizing the refresh
        #[arg(long)]
        secret: String,
    },
    /// Mint a switch token for a repository and branch
    Nonce {
        /// Repository identifier
        repo: String,
        /// Target branch
        branch: String,
    },
    /// List configured repositories
    Repos,
}

fn main() {
    let cli = Cli::parse();

    // Configure logging based on --debug flag
    if cli.debug {
        env::set_var("RUST_LOG", "debug");
    } else {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    if let Err(e) = run(cli) {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => Settings::default_path()?,
    };
    let settings = Settings::load(&config_path)?;
    let switch = build_switch(&settings)?;

    // A mutation in an earlier invocation may have left a purge pending.
    switch.consume_pending_purge();

    match cli.command {
        Commands::Status { repo } => execute_status(&switch, repo.as_deref()),
        Commands::Switch {
            repo,
            branch,
            nonce,
        } => execute_switch(&switch, &repo, &branch, &nonce),
        Commands::Refresh { repo, secret } => execute_refresh(&switch, &repo, &secret),
        Commands::Nonce { repo, branch } => execute_nonce(&switch, &repo, &branch),
        Commands::Repos => execute_repos(&switch),
    }
}
