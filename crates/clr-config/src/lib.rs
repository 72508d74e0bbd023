//! Calibrated logistic regression configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for persisted model configuration (linear and LightGBM-style)
//! - Parsers for raw configuration payloads with field-level error codes
//! - Semantic validation
//! - Config resolution (CLI → env → XDG → system)
//! - Config snapshots for auditing which configuration produced a result

pub mod features;
pub mod lightgbm;
pub mod model;
pub mod parse;
pub mod resolve;
pub mod snapshot;
pub mod validate;

pub use features::{
    casefold, validate_categorical_mappings, CoefficientSet, FeatureType, FeatureTypes,
    StateMappings, StateTable,
};
pub use lightgbm::{LightGbmConfig, ModelPayload};
pub use model::{CalibrationParams, ModelConfig};
pub use resolve::{resolve_model_path, ConfigSource, ModelPath};
pub use snapshot::ConfigSnapshot;
pub use validate::{FieldErrorCode, FieldErrors, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";

/// Default decision threshold on the 0-100 percentage scale.
pub const DEFAULT_THRESHOLD: f64 = 50.0;
