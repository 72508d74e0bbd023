//! Feature encoding and calibrated scoring for probability sensors.
//!
//! Raw entity states go through the [`encode`] module to become numeric
//! features; [`scoring`] turns them into a calibrated probability and
//! [`lightgbm`] into a percentage score with a decision. Configuration is
//! loaded and validated by `clr-config`; numeric primitives live in
//! `clr-math`.

pub mod config;
pub mod encode;
pub mod error;
pub mod exit_codes;
pub mod lightgbm;
pub mod logging;
pub mod outcome;
pub mod output;
pub mod schema;
pub mod scoring;

pub use encode::{
    encode, encode_snapshot, infer_feature_types, infer_state_mappings, inspect_snapshot,
    parse_numeric_value, EncodedFeatures, FeatureValues, RawSnapshot, RawValue,
};
pub use error::{Error, ErrorCategory, Result};
pub use exit_codes::ExitCode;
pub use lightgbm::{run_lightgbm_inference, InferenceResult, LightGbmModel, LightGbmModelSpec};
pub use outcome::{Decision, UnavailableReason};
pub use scoring::{
    base_probability, calibrated_probability, linear_score, CalibratedModel, CalibratedReading,
    CalibratedScore,
};
