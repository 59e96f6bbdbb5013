//! Core reconciliation logic for kitsync
//!
//! Keeps a remotely served JSON dataset and its local on-disk replica
//! convergent using last-write-wins conflict resolution over per-record edit
//! timestamps. Each run fetches the tracked artifacts, compares effective
//! edit instants, and decides per artifact whether to pull the remote copy,
//! push the local one, or do nothing. Pulled content is archived as an
//! immutable timestamped snapshot and the per-artifact watermark is advanced;
//! any change to the local replica triggers the publish channel.

pub mod artifact;
pub mod config;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod io;
pub mod lock;
pub mod snapshot;
pub mod timestamp;
pub mod watermark;

pub use artifact::ArtifactKind;
pub use config::{ArtifactSpec, Config, GitSection};
pub use engine::{
    ArtifactReport, ReconcileEngine, ReconcileOptions, ReconcileReport, SyncAction,
};
pub use error::{Error, Result};
pub use fetch::{Fetch, HttpFetcher};
pub use lock::RunLock;
pub use snapshot::SnapshotArchiver;
pub use watermark::WatermarkStore;
