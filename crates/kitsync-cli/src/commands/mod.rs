//! Command implementations

mod init;
mod run;
mod status;

pub use init::run_init;
pub use run::run_reconcile;
pub use status::run_status;

use std::path::Path;

use kitsync_core::Config;

use crate::error::Result;

/// Load the configuration, falling back to the default deployment when the
/// file does not exist. Parse failures are real errors.
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Ok(Config::load(path)?)
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        Ok(Config::default())
    }
}
