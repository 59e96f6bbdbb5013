//! Timestamped archival copies of pulled artifact content
//!
//! Snapshots are append-only: one file per capture, named by artifact and
//! second-resolution capture instant, never mutated or deleted. A name
//! collision (two captures of one artifact within the same second) is
//! surfaced as an error; the engine downgrades it to a log line.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct SnapshotArchiver {
    dir: PathBuf,
}

impl SnapshotArchiver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write `raw` to a new snapshot named `{artifact}_{YYYYMMDD_HHMMSS}.json`.
    ///
    /// Never overwrites: an existing snapshot with the same name yields
    /// `Error::SnapshotExists`.
    pub fn save(
        &self,
        artifact: &str,
        raw: &[u8],
        captured_at: DateTime<Utc>,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| Error::io(&self.dir, e))?;

        let name = format!("{artifact}_{}.json", captured_at.format("%Y%m%d_%H%M%S"));
        let path = self.dir.join(name);

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| {
                if e.kind() == ErrorKind::AlreadyExists {
                    Error::SnapshotExists { path: path.clone() }
                } else {
                    Error::io(&path, e)
                }
            })?;

        file.write_all(raw).map_err(|e| Error::io(&path, e))?;
        file.sync_all().map_err(|e| Error::io(&path, e))?;

        Ok(path)
    }

    /// Number of snapshots stored for an artifact.
    pub fn count(&self, artifact: &str) -> usize {
        let prefix = format!("{artifact}_");
        match fs::read_dir(&self.dir) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .filter(|e| {
                    let name = e.file_name();
                    let name = name.to_string_lossy();
                    name.starts_with(&prefix) && name.ends_with(".json")
                })
                .count(),
            Err(_) => 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[test]
    fn save_writes_named_snapshot() {
        let dir = tempdir().unwrap();
        let archiver = SnapshotArchiver::new(dir.path().join("snapshots"));
        let captured = Utc.with_ymd_and_hms(2024, 1, 10, 12, 30, 45).unwrap();

        let path = archiver
            .save("first_aid_kit", b"{\"home\": {}}", captured)
            .unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "first_aid_kit_20240110_123045.json"
        );
        assert_eq!(fs::read(&path).unwrap(), b"{\"home\": {}}");
    }

    #[test]
    fn save_never_overwrites_an_existing_snapshot() {
        let dir = tempdir().unwrap();
        let archiver = SnapshotArchiver::new(dir.path());
        let captured = Utc.with_ymd_and_hms(2024, 1, 10, 12, 30, 45).unwrap();

        let path = archiver.save("first_aid_kit", b"first", captured).unwrap();

        match archiver.save("first_aid_kit", b"second", captured) {
            Err(Error::SnapshotExists { path: p }) => assert_eq!(p, path),
            other => panic!("expected SnapshotExists, got {other:?}"),
        }
        assert_eq!(fs::read(&path).unwrap(), b"first");
    }

    #[test]
    fn count_filters_by_artifact_prefix() {
        let dir = tempdir().unwrap();
        let archiver = SnapshotArchiver::new(dir.path());
        let t1 = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 1).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 2).unwrap();

        archiver.save("first_aid_kit", b"{}", t1).unwrap();
        archiver.save("first_aid_kit", b"{}", t2).unwrap();
        archiver.save("firstIAiditem", b"{}", t1).unwrap();

        assert_eq!(archiver.count("first_aid_kit"), 2);
        assert_eq!(archiver.count("firstIAiditem"), 1);
        assert_eq!(archiver.count("unknown"), 0);
    }

    #[test]
    fn count_is_zero_for_missing_directory() {
        let dir = tempdir().unwrap();
        let archiver = SnapshotArchiver::new(dir.path().join("nope"));
        assert_eq!(archiver.count("first_aid_kit"), 0);
    }
}
