//! Linear model configuration types.
//!
//! A `ModelConfig` is the persisted record for one calibrated logistic
//! regression sensor: the linear model, the feature typing decided at
//! configuration time, and the Platt calibration applied on top.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::features::{
    casefold_state_mappings, CoefficientSet, FeatureType, FeatureTypes, StateMappings,
};
use crate::validate::ValidationError;

/// Platt calibration applied in logit space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CalibrationParams {
    #[serde(default = "default_slope")]
    pub slope: f64,
    #[serde(default)]
    pub intercept: f64,
}

fn default_slope() -> f64 {
    1.0
}

impl Default for CalibrationParams {
    fn default() -> Self {
        Self::identity()
    }
}

impl CalibrationParams {
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    /// `slope = 1, intercept = 0`: leaves probabilities unchanged.
    pub fn identity() -> Self {
        Self {
            slope: 1.0,
            intercept: 0.0,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.slope == 1.0 && self.intercept == 0.0
    }
}

/// Persisted configuration for a calibrated logistic regression sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ModelConfig {
    pub schema_version: String,

    /// Display name; unique per host instance.
    pub name: String,

    /// Free-form label for what the probability predicts.
    #[serde(default)]
    pub goal: Option<String>,

    #[serde(default)]
    pub intercept: f64,

    pub coefficients: CoefficientSet,

    /// Features that must be observed for a reading to be available.
    pub required_features: Vec<String>,

    #[serde(default)]
    pub feature_types: FeatureTypes,

    /// Only categorical features carry a table.
    #[serde(default)]
    pub state_mappings: StateMappings,

    #[serde(default)]
    pub calibration: CalibrationParams,

    /// Percentage-scale cut-off for `is_above_threshold`.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    crate::DEFAULT_THRESHOLD
}

impl ModelConfig {
    /// Load a model config from a JSON or TOML file (chosen by extension).
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

    /// Parse a model config from a JSON string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> Result<Self, ValidationError> {
        let config: ModelConfig = serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))?;
        Ok(config.normalized())
    }

    /// Parse a model config from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ValidationError> {
        let config: ModelConfig = toml::from_str(content)
            .map_err(|e| ValidationError::ParseError(format!("Invalid TOML: {}", e)))?;
        Ok(config.normalized())
    }

    /// Trim the name and casefold state-table keys.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.state_mappings = casefold_state_mappings(self.state_mappings);
        self
    }

    /// Declared type of a feature; undeclared features are numeric.
    pub fn feature_type(&self, feature: &str) -> FeatureType {
        self.feature_types
            .get(feature)
            .copied()
            .unwrap_or(FeatureType::Numeric)
    }

    /// Feature types for every required feature, filling in the numeric default.
    pub fn resolved_feature_types(&self) -> FeatureTypes {
        self.required_features
            .iter()
            .map(|feature| (feature.clone(), self.feature_type(feature)))
            .collect()
    }
}
