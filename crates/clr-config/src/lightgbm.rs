//! LightGBM-style model configuration.
//!
//! The exported artifact is reduced to an intercept and one weight per
//! feature, applied in `feature_names` order.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::features::{casefold_state_mappings, FeatureType, FeatureTypes, StateMappings};
use crate::validate::ValidationError;

/// Intercept plus weight vector of a LightGBM-style artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ModelPayload {
    #[serde(default)]
    pub intercept: f64,
    pub weights: Vec<f64>,
}

/// Persisted configuration for a LightGBM-style sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LightGbmConfig {
    pub schema_version: String,

    pub name: String,

    /// Fixed order in which `model_payload.weights` apply.
    pub feature_names: Vec<String>,

    pub model_payload: ModelPayload,

    #[serde(default = "default_threshold")]
    pub threshold: f64,

    #[serde(default)]
    pub feature_types: FeatureTypes,

    #[serde(default)]
    pub state_mappings: StateMappings,
}

fn default_threshold() -> f64 {
    crate::DEFAULT_THRESHOLD
}

impl LightGbmConfig {
    /// Load a LightGBM config from a JSON or TOML file (chosen by extension).
    pub fn from_file(path: &Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let is_toml = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);
        if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_str(&content)
        }
    }

    /// Parse a LightGBM config from a JSON string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> Result<Self, ValidationError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))?;
        Ok(config.normalized())
    }

    /// Parse a LightGBM config from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ValidationError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ValidationError::ParseError(format!("Invalid TOML: {}", e)))?;
        Ok(config.normalized())
    }

    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.state_mappings = casefold_state_mappings(self.state_mappings);
        self
    }

    pub fn feature_type(&self, feature: &str) -> FeatureType {
        self.feature_types
            .get(feature)
            .copied()
            .unwrap_or(FeatureType::Numeric)
    }

    pub fn resolved_feature_types(&self) -> FeatureTypes {
        self.feature_names
            .iter()
            .map(|feature| (feature.clone(), self.feature_type(feature)))
            .collect()
    }
}
