//! Configuration for the reconciliation job
//!
//! One explicit `Config` value is constructed at process start and passed
//! into each component; there is no process-wide mutable state. Every field
//! has a serde default describing the original deployment, so an empty TOML
//! file is a valid configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactKind;
use crate::{Error, Result};

fn default_base_url() -> String {
    "https://first-aid-tracker.onrender.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_watermark_dir() -> PathBuf {
    PathBuf::from("data/watermarks")
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("data/snapshots")
}

fn default_repo_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

/// One tracked artifact: where it is served, where it lives locally, and how
/// its edit timestamp is derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactSpec {
    /// Artifact name, used for watermark and snapshot file names
    pub name: String,
    /// Retrieval path relative to the endpoint base URL
    pub remote_path: String,
    /// File name of the local replica under the data dir
    pub local_file: String,
    /// Structural kind for timestamp extraction
    pub kind: ArtifactKind,
}

/// Version-control publish channel settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitSection {
    /// Repository containing the local replicas
    #[serde(default = "default_repo_root")]
    pub repo_root: PathBuf,
    /// Remote to push to
    #[serde(default = "default_remote")]
    pub remote: String,
    /// Branch to push
    #[serde(default = "default_branch")]
    pub branch: String,
}

impl Default for GitSection {
    fn default() -> Self {
        Self {
            repo_root: default_repo_root(),
            remote: default_remote(),
            branch: default_branch(),
        }
    }
}

/// Reconciliation job configuration, parsed from a TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the serving endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Timeout applied to every remote fetch, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Directory holding the local artifact replicas (and the run lock)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Directory holding one watermark record per artifact
    #[serde(default = "default_watermark_dir")]
    pub watermark_dir: PathBuf,
    /// Directory holding timestamped snapshots of pulled content
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,
    /// Publish channel settings
    #[serde(default)]
    pub git: GitSection,
    /// Artifacts reconciled on each run
    #[serde(default = "default_artifacts")]
    pub artifacts: Vec<ArtifactSpec>,
}

fn default_artifacts() -> Vec<ArtifactSpec> {
    vec![
        ArtifactSpec {
            name: "first_aid_kit".to_string(),
            remote_path: "download/first_aid_kit.json".to_string(),
            local_file: "first_aid_kit.json".to_string(),
            kind: ArtifactKind::KitDataset,
        },
        ArtifactSpec {
            name: "firstIAiditem".to_string(),
            remote_path: "download/firstIAiditem.json".to_string(),
            local_file: "firstIAiditem.json".to_string(),
            kind: ArtifactKind::ItemCatalog,
        },
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            data_dir: default_data_dir(),
            watermark_dir: default_watermark_dir(),
            snapshot_dir: default_snapshot_dir(),
            git: GitSection::default(),
            artifacts: default_artifacts(),
        }
    }
}

impl Config {
    /// Load the configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Serialize the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Path of an artifact's local replica.
    pub fn local_path(&self, spec: &ArtifactSpec) -> PathBuf {
        self.data_dir.join(&spec.local_file)
    }
}
