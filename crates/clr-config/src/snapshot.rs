//! Configuration snapshots for auditing results.
//!
//! A snapshot records exactly which configuration content produced a reading,
//! so a stored result can be traced back to its coefficients later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

use crate::resolve::ConfigSource;

/// A frozen snapshot of configuration provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Schema version of the configuration.
    pub schema_version: String,

    /// Path the config was loaded from.
    #[serde(default)]
    pub path: Option<String>,

    /// How the path was resolved.
    pub source: String,

    /// SHA-256 of the raw file content.
    pub content_hash: String,

    /// Model name.
    pub name: String,

    /// Number of features the model consumes.
    pub feature_count: usize,
}

impl ConfigSnapshot {
    pub fn new(
        content: &str,
        path: Option<&Path>,
        source: ConfigSource,
        name: &str,
        feature_count: usize,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            path: path.map(|p| p.display().to_string()),
            source: source.to_string(),
            content_hash: hash_content(content),
            name: name.to_string(),
            feature_count,
        }
    }

    /// True when both snapshots came from identical config content.
    pub fn same_content(&self, other: &ConfigSnapshot) -> bool {
        self.content_hash == other.content_hash
    }
}

/// Hex-encoded SHA-256 of config content.
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
