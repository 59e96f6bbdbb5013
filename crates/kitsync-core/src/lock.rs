//! Single-invocation run lock
//!
//! The local replicas, watermark records and snapshot directory have no
//! internal locking, so at most one reconciliation job may run at a time.
//! The lock is an advisory exclusive lock on a file in the data dir; a
//! second invocation fails fast instead of interleaving writes.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::{Error, Result};

/// Held for the duration of a run; released on drop.
#[derive(Debug)]
pub struct RunLock {
    file: File,
    path: PathBuf,
}

impl RunLock {
    /// Acquire the exclusive run lock under `dir`.
    ///
    /// Fails with `Error::LockHeld` if another invocation already holds it.
    pub fn acquire(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        let path = dir.join("kitsync.lock");

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| Error::io(&path, e))?;

        file.try_lock_exclusive()
            .map_err(|_| Error::LockHeld { path: path.clone() })?;

        debug!(path = %path.display(), "run lock acquired");
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}
