//! Configuration validation errors and semantic validation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::features::{validate_categorical_mappings, FeatureTypes, StateMappings};
use crate::lightgbm::LightGbmConfig;
use crate::model::ModelConfig;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Stable per-field error codes reported back to whoever edits the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorCode {
    Required,
    InvalidCoefficients,
    CoefficientMismatch,
    InvalidFeatureTypes,
    InvalidStateMappings,
    MissingCategoricalMappings,
    InvalidNumber,
    InvalidThreshold,
    WeightCountMismatch,
    DuplicateFeature,
}

impl FieldErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldErrorCode::Required => "required",
            FieldErrorCode::InvalidCoefficients => "invalid_coefficients",
            FieldErrorCode::CoefficientMismatch => "coefficient_mismatch",
            FieldErrorCode::InvalidFeatureTypes => "invalid_feature_types",
            FieldErrorCode::InvalidStateMappings => "invalid_state_mappings",
            FieldErrorCode::MissingCategoricalMappings => "missing_categorical_mappings",
            FieldErrorCode::InvalidNumber => "invalid_number",
            FieldErrorCode::InvalidThreshold => "invalid_threshold",
            FieldErrorCode::WeightCountMismatch => "weight_count_mismatch",
            FieldErrorCode::DuplicateFeature => "duplicate_feature",
        }
    }
}

impl std::fmt::Display for FieldErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field name → error code, one code per field (first failure wins).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, FieldErrorCode>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error unless the field already has one.
    pub fn insert(&mut self, field: impl Into<String>, code: FieldErrorCode) {
        self.0.entry(field.into()).or_insert(code);
    }

    pub fn get(&self, field: &str) -> Option<FieldErrorCode> {
        self.0.get(field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FieldErrorCode)> {
        self.0.iter().map(|(field, code)| (field.as_str(), *code))
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> ValidationResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::FieldErrors(self))
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, code) in &self.0 {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", field, code)?;
            first = false;
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },

    #[error("Invalid fields: {0}")]
    FieldErrors(FieldErrors),
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::VersionMismatch { .. } => 66,
            ValidationError::FieldErrors(_) => 67,
        }
    }

    /// Field-level codes, when this is a field report.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ValidationError::FieldErrors(errors) => Some(errors),
            _ => None,
        }
    }
}

fn check_schema_version(actual: &str) -> ValidationResult<()> {
    if actual != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: actual.to_string(),
        });
    }
    Ok(())
}

/// Validate a linear model configuration semantically.
pub fn validate_model_config(config: &ModelConfig) -> ValidationResult<()> {
    check_schema_version(&config.schema_version)?;

    let mut errors = FieldErrors::new();

    if config.name.trim().is_empty() {
        errors.insert("name", FieldErrorCode::Required);
    }

    check_feature_list("required_features", &config.required_features, &mut errors);

    let coefficients_well_formed = config
        .coefficients
        .iter()
        .all(|(name, weight)| !name.is_empty() && weight.is_finite());
    if !coefficients_well_formed {
        errors.insert("coefficients", FieldErrorCode::InvalidCoefficients);
    } else {
        let required: BTreeSet<&str> = config.required_features.iter().map(String::as_str).collect();
        let weighted: BTreeSet<&str> = config.coefficients.keys().map(String::as_str).collect();
        if required != weighted {
            errors.insert("coefficients", FieldErrorCode::CoefficientMismatch);
        }
    }

    check_finite("intercept", config.intercept, &mut errors);
    check_finite("calibration_slope", config.calibration.slope, &mut errors);
    check_finite("calibration_intercept", config.calibration.intercept, &mut errors);
    check_threshold(config.threshold, &mut errors);

    check_mappings(
        &config.required_features,
        &config.feature_types,
        &config.resolved_feature_types(),
        &config.state_mappings,
        &mut errors,
    );

    errors.into_result()
}

/// Validate a LightGBM-style configuration semantically.
pub fn validate_lightgbm_config(config: &LightGbmConfig) -> ValidationResult<()> {
    check_schema_version(&config.schema_version)?;

    let mut errors = FieldErrors::new();

    if config.name.trim().is_empty() {
        errors.insert("name", FieldErrorCode::Required);
    }

    check_feature_list("feature_names", &config.feature_names, &mut errors);

    let payload = &config.model_payload;
    if payload.weights.len() != config.feature_names.len() {
        errors.insert("model_payload", FieldErrorCode::WeightCountMismatch);
    } else if !payload.intercept.is_finite() || payload.weights.iter().any(|w| !w.is_finite()) {
        errors.insert("model_payload", FieldErrorCode::InvalidNumber);
    }

    check_threshold(config.threshold, &mut errors);

    check_mappings(
        &config.feature_names,
        &config.feature_types,
        &config.resolved_feature_types(),
        &config.state_mappings,
        &mut errors,
    );

    errors.into_result()
}

fn check_feature_list(field: &str, features: &[String], errors: &mut FieldErrors) {
    if features.is_empty() || features.iter().any(|f| f.trim().is_empty()) {
        errors.insert(field, FieldErrorCode::Required);
        return;
    }
    let unique: BTreeSet<&str> = features.iter().map(String::as_str).collect();
    if unique.len() != features.len() {
        errors.insert(field, FieldErrorCode::DuplicateFeature);
    }
}

fn check_finite(field: &str, value: f64, errors: &mut FieldErrors) {
    if !value.is_finite() {
        errors.insert(field, FieldErrorCode::InvalidNumber);
    }
}

fn check_threshold(threshold: f64, errors: &mut FieldErrors) {
    if !threshold.is_finite() || !(0.0..=100.0).contains(&threshold) {
        errors.insert("threshold", FieldErrorCode::InvalidThreshold);
    }
}

fn check_mappings(
    features: &[String],
    declared: &FeatureTypes,
    resolved: &FeatureTypes,
    mappings: &StateMappings,
    errors: &mut FieldErrors,
) {
    if declared.keys().any(|name| !features.contains(name)) {
        errors.insert("feature_types", FieldErrorCode::InvalidFeatureTypes);
    }

    let tables_well_formed = mappings.iter().all(|(feature, table)| {
        !feature.is_empty()
            && table
                .iter()
                .all(|(state, value)| !state.is_empty() && value.is_finite())
    });
    if !tables_well_formed {
        errors.insert("state_mappings", FieldErrorCode::InvalidStateMappings);
        return;
    }

    let missing = validate_categorical_mappings(resolved, mappings);
    if !missing.is_empty() {
        tracing::debug!(missing = ?missing, "categorical features lack state tables");
        errors.insert("state_mappings", FieldErrorCode::MissingCategoricalMappings);
    }
}
