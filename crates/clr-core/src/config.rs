//! Loading models and state snapshots from disk.
//!
//! Every loaded model comes with a [`ConfigSnapshot`] recording where the
//! file was found and a hash of its exact content.

use std::path::{Path, PathBuf};

use clr_config::{
    resolve_model_path, ConfigSnapshot, ConfigSource, LightGbmConfig, ModelConfig, ValidationError,
};
use serde_json::Value;
use tracing::info;

use crate::encode::{RawSnapshot, RawValue};
use crate::error::{Error, Result};

/// A parsed configuration plus its provenance.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub config: T,
    pub snapshot: ConfigSnapshot,
}

/// Resolve, read and parse a linear model config.
pub fn load_model_config(cli_path: Option<&Path>) -> Result<Loaded<ModelConfig>> {
    let (path, source, content) = read_resolved(cli_path)?;
    let config = if is_toml(&path) {
        ModelConfig::from_toml_str(&content)?
    } else {
        ModelConfig::from_str(&content)?
    };
    let snapshot = ConfigSnapshot::new(
        &content,
        Some(path.as_path()),
        source,
        &config.name,
        config.required_features.len(),
    );
    info!(
        path = %path.display(),
        %source,
        model = %config.name,
        content_hash = %snapshot.content_hash,
        "loaded model config"
    );
    Ok(Loaded { config, snapshot })
}

/// Resolve, read and parse a LightGBM-style config.
pub fn load_lightgbm_config(cli_path: Option<&Path>) -> Result<Loaded<LightGbmConfig>> {
    let (path, source, content) = read_resolved(cli_path)?;
    let config = if is_toml(&path) {
        LightGbmConfig::from_toml_str(&content)?
    } else {
        LightGbmConfig::from_str(&content)?
    };
    let snapshot = ConfigSnapshot::new(
        &content,
        Some(path.as_path()),
        source,
        &config.name,
        config.feature_names.len(),
    );
    info!(
        path = %path.display(),
        %source,
        model = %config.name,
        content_hash = %snapshot.content_hash,
        "loaded lightgbm config"
    );
    Ok(Loaded { config, snapshot })
}

fn read_resolved(cli_path: Option<&Path>) -> Result<(PathBuf, ConfigSource, String)> {
    let resolved = resolve_model_path(cli_path);
    let path = resolved.path.ok_or(Error::ModelNotFound)?;
    let content = std::fs::read_to_string(&path).map_err(|e| {
        ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    Ok((path, resolved.source, content))
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false)
}

/// Read a states file: a JSON object of entity id → string or number.
pub fn load_states(path: &Path) -> Result<RawSnapshot> {
    let content = std::fs::read_to_string(path)?;
    parse_states(&content)
}

/// Parse a states payload.
///
/// `null` entries are dropped so the feature reads as missing. Arrays and
/// nested objects are rejected.
pub fn parse_states(content: &str) -> Result<RawSnapshot> {
    let parsed: Value =
        serde_json::from_str(content).map_err(|e| Error::InvalidStates(e.to_string()))?;
    let Value::Object(entries) = parsed else {
        return Err(Error::InvalidStates(
            "expected a JSON object of entity id to state".to_string(),
        ));
    };

    let mut snapshot = RawSnapshot::new();
    for (entity, value) in entries {
        if value.is_null() {
            continue;
        }
        let raw = RawValue::from_json(&value).ok_or_else(|| {
            Error::InvalidStates(format!("state of '{}' must be a string or number", entity))
        })?;
        snapshot.insert(entity, raw);
    }
    Ok(snapshot)
}
