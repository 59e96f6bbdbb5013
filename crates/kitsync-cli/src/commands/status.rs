//! Read-only overview of replica state

use std::fs;
use std::path::Path;

use colored::Colorize;

use kitsync_core::{timestamp, SnapshotArchiver, WatermarkStore};

use crate::commands::load_config;
use crate::error::Result;

pub fn run_status(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let watermarks = WatermarkStore::new(&config.watermark_dir);
    let snapshots = SnapshotArchiver::new(&config.snapshot_dir);

    println!("{}", "artifact         local edit                 watermark                  snapshots".bold());

    for spec in &config.artifacts {
        let local_instant = fs::read(config.local_path(spec))
            .ok()
            .and_then(|raw| serde_json::from_slice(&raw).ok())
            .and_then(|json: serde_json::Value| spec.kind.effective_instant(&json));

        let local = match local_instant {
            Some(instant) => timestamp::format(instant).normal(),
            None => "-".dimmed(),
        };
        let watermark = match watermarks.get(&spec.name) {
            Some(instant) => timestamp::format(instant).normal(),
            None => "-".dimmed(),
        };

        println!(
            "{:<16} {:<26} {:<26} {}",
            spec.name,
            local,
            watermark,
            snapshots.count(&spec.name)
        );
    }

    Ok(())
}
