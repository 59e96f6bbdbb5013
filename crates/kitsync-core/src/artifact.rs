//! Tracked artifact kinds and effective-instant extraction
//!
//! The two artifact shapes differ in where their edit timestamp lives, so
//! extraction is polymorphic over the kind. Partially malformed content
//! (non-object top level, missing fields, unparsable timestamps) yields "no
//! effective instant" rather than failing the run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::timestamp;

/// Structural kind of a tracked artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    /// Mapping of kit id to a kit record, each with its own `last_edited`.
    /// The effective instant is the maximum across all kit records.
    KitDataset,
    /// Single record whose top-level `last_edited` is the effective instant.
    ItemCatalog,
}

impl ArtifactKind {
    /// Derive the single effective edit instant from the artifact's content.
    pub fn effective_instant(&self, content: &Value) -> Option<DateTime<Utc>> {
        match self {
            Self::KitDataset => {
                let kits = content.as_object()?;
                kits.values().filter_map(record_last_edited).max()
            }
            Self::ItemCatalog => record_last_edited(content),
        }
    }

    /// Rewrite the artifact's timestamp field(s) to `instant`, leaving all
    /// other content untouched.
    ///
    /// For a kit dataset every kit record object is stamped, consistent with
    /// the max-aggregation used by extraction. Non-object records are left
    /// alone.
    pub fn stamp(&self, content: &mut Value, instant: DateTime<Utc>) {
        let stamp = Value::String(timestamp::format(instant));
        match self {
            Self::KitDataset => {
                if let Some(kits) = content.as_object_mut() {
                    for record in kits.values_mut() {
                        if let Some(obj) = record.as_object_mut() {
                            obj.insert("last_edited".to_string(), stamp.clone());
                        }
                    }
                }
            }
            Self::ItemCatalog => {
                if let Some(obj) = content.as_object_mut() {
                    obj.insert("last_edited".to_string(), stamp);
                }
            }
        }
    }
}

fn record_last_edited(record: &Value) -> Option<DateTime<Utc>> {
    timestamp::parse(record.get("last_edited")?.as_str())
}
