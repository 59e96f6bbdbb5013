//! One reconciliation pass
//!
//! Artifact-level failures are printed and logged but never change the exit
//! code: once a pass starts, it completes and the process exits normally.
//! Only startup failures (unreadable config, lock already held) are fatal.

use std::path::Path;
use std::time::Duration;

use colored::Colorize;

use kitsync_core::{
    HttpFetcher, ReconcileEngine, ReconcileOptions, RunLock, SyncAction,
};
use kitsync_publish::GitPublisher;

use crate::commands::load_config;
use crate::error::Result;

pub fn run_reconcile(config_path: &Path, dry_run: bool) -> Result<()> {
    let config = load_config(config_path)?;

    // Concurrent invocations would interleave writes to the same replica.
    let _lock = RunLock::acquire(&config.data_dir)?;

    let fetcher = HttpFetcher::new(
        config.base_url.clone(),
        Duration::from_secs(config.timeout_secs),
    )?;
    let publisher = GitPublisher::new(
        &config.git.repo_root,
        &config.git.remote,
        &config.git.branch,
    );

    let engine = ReconcileEngine::new(config, Box::new(fetcher), Box::new(publisher));
    let report = engine.run_with_options(ReconcileOptions { dry_run });

    for artifact in &report.artifacts {
        let action = match artifact.action {
            SyncAction::Pull => "pull".green().bold(),
            SyncAction::Push => "push".yellow().bold(),
            SyncAction::None => "none".dimmed(),
        };
        let prefix = if dry_run { "[dry-run] " } else { "" };
        println!("{prefix}{:<16} {}", artifact.artifact, action);
        for error in &artifact.errors {
            println!("  {} {}", "!".red().bold(), error);
        }
    }

    if report.is_quiet() {
        println!("{}", "Replicas are convergent; nothing to do.".dimmed());
    }

    Ok(())
}
