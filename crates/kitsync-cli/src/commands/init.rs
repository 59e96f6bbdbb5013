//! Write a default configuration and create the state directories

use std::fs;
use std::path::Path;

use colored::Colorize;

use kitsync_core::Config;

use crate::error::{CliError, Result};

pub fn run_init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        return Err(CliError::user(format!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        )));
    }

    let config = Config::default();
    fs::write(config_path, config.to_toml()?)?;

    fs::create_dir_all(&config.data_dir)?;
    fs::create_dir_all(&config.watermark_dir)?;
    fs::create_dir_all(&config.snapshot_dir)?;

    println!(
        "{} wrote {} and created the data directories",
        "initialized".green().bold(),
        config_path.display()
    );
    Ok(())
}
