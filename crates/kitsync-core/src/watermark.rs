//! Persisted per-artifact sync watermarks
//!
//! A watermark records the remote effective instant as of the last
//! successful pull. It is an auxiliary durability aid for out-of-band
//! inspection — the engine's decision always compares freshly extracted
//! instants, never the watermark. A missing or corrupt record reads as "no
//! watermark", not as an error.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::{io, timestamp, Error, Result};

/// One small text file per artifact, containing a single RFC 3339 instant.
#[derive(Debug, Clone)]
pub struct WatermarkStore {
    dir: PathBuf,
}

impl WatermarkStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn record_path(&self, artifact: &str) -> PathBuf {
        self.dir.join(format!("{artifact}.watermark"))
    }

    /// Read the stored watermark for an artifact.
    pub fn get(&self, artifact: &str) -> Option<DateTime<Utc>> {
        let path = self.record_path(artifact);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(artifact, path = %path.display(), "unreadable watermark: {e}");
                return None;
            }
        };

        let parsed = timestamp::parse(Some(raw.trim()));
        if parsed.is_none() {
            warn!(artifact, path = %path.display(), "corrupt watermark record: {raw:?}");
        }
        parsed
    }

    /// Persist the watermark for an artifact, overwriting any previous value.
    pub fn set(&self, artifact: &str, instant: DateTime<Utc>) -> Result<()> {
        let path = self.record_path(artifact);
        io::write_atomic(&path, timestamp::format(instant).as_bytes()).map_err(|e| {
            Error::WatermarkIo {
                path,
                message: e.to_string(),
            }
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
