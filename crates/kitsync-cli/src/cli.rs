//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// kitsync - keep a served JSON dataset and its local replica convergent
#[derive(Parser, Debug)]
#[command(name = "kitsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "kitsync.toml")]
    pub config: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run one reconciliation pass over all tracked artifacts
    ///
    /// Fetches each artifact from the serving endpoint, compares effective
    /// edit instants, and pulls, pushes, or does nothing per artifact.
    /// Artifact-level failures are logged and never abort the run.
    Run {
        /// Evaluate decisions without taking side effects
        #[arg(long)]
        dry_run: bool,
    },

    /// Show local instants, watermarks and snapshot counts
    Status,

    /// Write a default configuration file and create the data directories
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}
