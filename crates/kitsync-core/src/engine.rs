//! Reconciliation engine
//!
//! Last-write-wins between the remote and local replica of each tracked
//! artifact. Per invocation the engine fetches the remote copy, derives the
//! effective edit instants of both sides, and decides to pull, push, or do
//! nothing. Artifacts are evaluated independently — a failure on one never
//! blocks the other — and every failure is downgraded to a logged,
//! per-artifact error so the run always completes.

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use kitsync_publish::{PublishClient, PublishOutcome};

use crate::config::{ArtifactSpec, Config};
use crate::fetch::Fetch;
use crate::snapshot::SnapshotArchiver;
use crate::watermark::WatermarkStore;
use crate::{io, timestamp};

/// Direction chosen for one artifact in one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// Remote wins: overwrite the local replica with the remote bytes.
    Pull,
    /// Local wins: refresh the local timestamp(s) and republish.
    Push,
    /// Equal or both unknown: no side effects.
    None,
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pull => write!(f, "pull"),
            Self::Push => write!(f, "push"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Last-write-wins decision over the two effective instants.
///
/// A pull requires the remote instant to be strictly greater than the local
/// one (or the local side to have none); symmetrically for push.
pub fn decide(remote: Option<DateTime<Utc>>, local: Option<DateTime<Utc>>) -> SyncAction {
    match (remote, local) {
        (Some(r), Some(l)) if r > l => SyncAction::Pull,
        (Some(_), None) => SyncAction::Pull,
        (Some(r), Some(l)) if l > r => SyncAction::Push,
        (None, Some(_)) => SyncAction::Push,
        _ => SyncAction::None,
    }
}

/// Outcome of reconciling one artifact.
#[derive(Debug, Clone)]
pub struct ArtifactReport {
    pub artifact: String,
    pub action: SyncAction,
    pub remote_instant: Option<DateTime<Utc>>,
    pub local_instant: Option<DateTime<Utc>>,
    /// Failures downgraded to observability events; never fatal to the run.
    pub errors: Vec<String>,
}

/// Report from a full reconciliation pass.
#[derive(Debug, Clone, Default)]
pub struct ReconcileReport {
    pub artifacts: Vec<ArtifactReport>,
}

impl ReconcileReport {
    /// True when the pass changed nothing and recorded no errors.
    pub fn is_quiet(&self) -> bool {
        self.artifacts
            .iter()
            .all(|a| a.action == SyncAction::None && a.errors.is_empty())
    }
}

/// Options for a reconciliation pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    /// Evaluate decisions but take no side effects.
    pub dry_run: bool,
}

/// Coordinates fetch, comparison and side effects for every tracked artifact.
pub struct ReconcileEngine {
    config: Config,
    fetcher: Box<dyn Fetch>,
    publisher: Box<dyn PublishClient>,
    watermarks: WatermarkStore,
    snapshots: SnapshotArchiver,
}

impl ReconcileEngine {
    pub fn new(
        config: Config,
        fetcher: Box<dyn Fetch>,
        publisher: Box<dyn PublishClient>,
    ) -> Self {
        let watermarks = WatermarkStore::new(&config.watermark_dir);
        let snapshots = SnapshotArchiver::new(&config.snapshot_dir);
        Self {
            config,
            fetcher,
            publisher,
            watermarks,
            snapshots,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn watermarks(&self) -> &WatermarkStore {
        &self.watermarks
    }

    /// Run one reconciliation pass over all configured artifacts.
    pub fn run(&self) -> ReconcileReport {
        self.run_with_options(ReconcileOptions::default())
    }

    /// Run one pass with options.
    pub fn run_with_options(&self, options: ReconcileOptions) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        for spec in &self.config.artifacts {
            report.artifacts.push(self.reconcile_artifact(spec, options));
        }
        report
    }

    fn reconcile_artifact(&self, spec: &ArtifactSpec, options: ReconcileOptions) -> ArtifactReport {
        let mut errors = Vec::new();

        let remote_raw = match self.fetcher.fetch(spec) {
            Ok(raw) => Some(raw),
            Err(e) => {
                warn!(artifact = %spec.name, "remote unavailable this run: {e}");
                errors.push(e.to_string());
                None
            }
        };
        let remote_json = remote_raw
            .as_deref()
            .and_then(|raw| parse_content(&spec.name, "remote", raw));
        let remote_instant = remote_json
            .as_ref()
            .and_then(|v| spec.kind.effective_instant(v));

        let local_path = self.config.local_path(spec);
        // Absent or unreadable local replica reads as "no information".
        let local_raw = fs::read(&local_path).ok();
        let local_json = local_raw
            .as_deref()
            .and_then(|raw| parse_content(&spec.name, "local", raw));
        let local_instant = local_json
            .as_ref()
            .and_then(|v| spec.kind.effective_instant(v));

        let action = decide(remote_instant, local_instant);
        debug!(
            artifact = %spec.name,
            ?remote_instant,
            ?local_instant,
            %action,
            "reconciliation decision"
        );

        if options.dry_run {
            if action != SyncAction::None {
                info!(artifact = %spec.name, "[dry-run] would {action}");
            }
            return ArtifactReport {
                artifact: spec.name.clone(),
                action,
                remote_instant,
                local_instant,
                errors,
            };
        }

        match action {
            SyncAction::Pull => {
                if let (Some(raw), Some(instant)) = (remote_raw.as_deref(), remote_instant) {
                    self.apply_pull(spec, &local_path, raw, instant, &mut errors);
                }
            }
            SyncAction::Push => {
                if let Some(content) = local_json {
                    self.apply_push(spec, &local_path, content, &mut errors);
                }
            }
            SyncAction::None => {}
        }

        ArtifactReport {
            artifact: spec.name.clone(),
            action,
            remote_instant,
            local_instant,
            errors,
        }
    }

    /// Remote wins: overwrite the local replica with the remote bytes,
    /// advance the watermark, archive a snapshot, publish.
    fn apply_pull(
        &self,
        spec: &ArtifactSpec,
        local_path: &Path,
        raw: &[u8],
        remote_instant: DateTime<Utc>,
        errors: &mut Vec<String>,
    ) {
        info!(
            artifact = %spec.name,
            instant = %timestamp::format(remote_instant),
            "pulling remote replica"
        );

        if let Err(e) = io::write_atomic(local_path, raw) {
            error!(artifact = %spec.name, "failed to write local replica: {e}");
            errors.push(e.to_string());
            return;
        }

        if let Err(e) = self.watermarks.set(&spec.name, remote_instant) {
            warn!(artifact = %spec.name, "failed to persist watermark: {e}");
            errors.push(e.to_string());
        }

        match self.snapshots.save(&spec.name, raw, Utc::now()) {
            Ok(path) => debug!(artifact = %spec.name, path = %path.display(), "snapshot archived"),
            Err(e) => {
                warn!(artifact = %spec.name, "snapshot not archived: {e}");
                errors.push(e.to_string());
            }
        }

        let message = format!(
            "Sync {}: pull remote edit {}",
            spec.name,
            timestamp::format(remote_instant)
        );
        self.publish(spec, local_path, &message, errors);
    }

    /// Local wins: refresh the timestamp field(s) to now and republish.
    /// No snapshot and no watermark change for a push.
    fn apply_push(
        &self,
        spec: &ArtifactSpec,
        local_path: &Path,
        mut content: Value,
        errors: &mut Vec<String>,
    ) {
        let now = Utc::now();
        spec.kind.stamp(&mut content, now);
        info!(
            artifact = %spec.name,
            instant = %timestamp::format(now),
            "pushing local replica with refreshed timestamp"
        );

        let serialized = match serde_json::to_vec_pretty(&content) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(artifact = %spec.name, "failed to serialize local replica: {e}");
                errors.push(e.to_string());
                return;
            }
        };
        if let Err(e) = io::write_atomic(local_path, &serialized) {
            error!(artifact = %spec.name, "failed to write local replica: {e}");
            errors.push(e.to_string());
            return;
        }

        let message = format!("Sync {}: push local state", spec.name);
        self.publish(spec, local_path, &message, errors);
    }

    fn publish(
        &self,
        spec: &ArtifactSpec,
        local_path: &Path,
        message: &str,
        errors: &mut Vec<String>,
    ) {
        match self
            .publisher
            .publish(&[local_path.to_path_buf()], message)
        {
            PublishOutcome::Committed => info!(artifact = %spec.name, "published"),
            PublishOutcome::NoOp => debug!(artifact = %spec.name, "nothing staged, publish skipped"),
            PublishOutcome::Failed { step, output } => {
                error!(artifact = %spec.name, %step, "publish failed:\n{output}");
                errors.push(format!("publish failed at {step}: {}", output.trim()));
            }
        }
    }
}

fn parse_content(artifact: &str, side: &str, raw: &[u8]) -> Option<Value> {
    match serde_json::from_slice(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(artifact, side, "malformed JSON content: {e}");
            None
        }
    }
}
