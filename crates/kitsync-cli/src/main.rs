//! kitsync CLI
//!
//! The command-line interface for the reconciliation job. One `run` pass is
//! intended to be invoked periodically by an external scheduler; `status`
//! and `init` support inspection and setup.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Run { dry_run }) => commands::run_reconcile(&cli.config, dry_run),
        Some(Commands::Status) => commands::run_status(&cli.config),
        Some(Commands::Init { force }) => commands::run_init(&cli.config, force),
        None => {
            println!("{} reconciliation job", "kitsync".green().bold());
            println!();
            println!("Run {} for available commands.", "kitsync --help".cyan());
            Ok(())
        }
    }
}
