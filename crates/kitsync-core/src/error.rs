//! Error types for kitsync-core

use std::path::PathBuf;

/// Result type for kitsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in kitsync-core operations
///
/// Artifact-level failures (transport, malformed content, watermark reads)
/// are downgraded to "missing information" inside the engine; nothing here
/// aborts a reconciliation run once it has started.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Remote endpoint unreachable, timed out, or returned a non-success status
    #[error("Transport error for {artifact}: {message}")]
    Transport { artifact: String, message: String },

    /// Content failed to parse or had an unexpected shape
    #[error("Malformed content for {artifact}: {message}")]
    MalformedContent { artifact: String, message: String },

    /// Watermark record could not be written
    #[error("Watermark I/O error at {path}: {message}")]
    WatermarkIo { path: PathBuf, message: String },

    /// A snapshot with the same capture name already exists
    #[error("Snapshot already exists at {path}")]
    SnapshotExists { path: PathBuf },

    /// Another invocation holds the run lock
    #[error("Another kitsync invocation holds the lock at {path}")]
    LockHeld { path: PathBuf },

    /// HTTP client construction failed
    #[error("Failed to build HTTP client: {message}")]
    HttpClient { message: String },

    /// Configuration file failed to parse
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// I/O error with path context
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML serialization error
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
