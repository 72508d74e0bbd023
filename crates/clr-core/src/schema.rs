//! JSON Schema export for configuration and output types.
//!
//! ```bash
//! clr schema --list
//! clr schema CalibratedReading
//! ```

use schemars::schema_for;
use serde_json::Value;
use std::collections::BTreeMap;

pub use crate::encode::{EncodedFeatures, RawValue, SnapshotInspection};
pub use crate::lightgbm::InferenceResult;
pub use crate::outcome::{Decision, UnavailableReason};
pub use crate::scoring::{CalibratedReading, CalibratedScore};
pub use clr_config::{CalibrationParams, FeatureType, FieldErrors, LightGbmConfig, ModelConfig};

/// Available schema types with their descriptions.
pub fn available_schemas() -> Vec<(&'static str, &'static str)> {
    vec![
        // Configuration
        ("ModelConfig", "Calibrated logistic regression model configuration"),
        ("LightGbmConfig", "LightGBM-style model configuration"),
        ("CalibrationParams", "Platt calibration slope and intercept"),
        ("FeatureType", "Numeric or categorical feature"),
        ("FieldErrors", "Field-level configuration error codes"),
        // Inputs
        ("RawValue", "Observed entity state (string or number)"),
        // Outputs
        ("CalibratedScore", "Linear score with base and calibrated probability"),
        (
            "CalibratedReading",
            "Calibrated model evaluated against a state snapshot",
        ),
        ("InferenceResult", "LightGBM-style percentage score and decision"),
        ("Decision", "Positive/negative decision against the threshold"),
        ("UnavailableReason", "Why a reading carries no value"),
        ("EncodedFeatures", "Encoded feature values and missing features"),
        (
            "SnapshotInspection",
            "Inferred feature types and default state mappings",
        ),
    ]
}

/// Generate JSON Schema for a type by name.
pub fn generate_schema(type_name: &str) -> Option<Value> {
    let schema = match type_name {
        "ModelConfig" => schema_for!(ModelConfig),
        "LightGbmConfig" => schema_for!(LightGbmConfig),
        "CalibrationParams" => schema_for!(CalibrationParams),
        "FeatureType" => schema_for!(FeatureType),
        "FieldErrors" => schema_for!(FieldErrors),
        "RawValue" => schema_for!(RawValue),
        "CalibratedScore" => schema_for!(CalibratedScore),
        "CalibratedReading" => schema_for!(CalibratedReading),
        "InferenceResult" => schema_for!(InferenceResult),
        "Decision" => schema_for!(Decision),
        "UnavailableReason" => schema_for!(UnavailableReason),
        "EncodedFeatures" => schema_for!(EncodedFeatures),
        "SnapshotInspection" => schema_for!(SnapshotInspection),
        _ => return None,
    };
    Some(schema.to_value())
}

/// Every schema keyed by type name.
pub fn generate_all_schemas() -> BTreeMap<String, Value> {
    available_schemas()
        .into_iter()
        .filter_map(|(name, _)| generate_schema(name).map(|schema| (name.to_string(), schema)))
        .collect()
}
