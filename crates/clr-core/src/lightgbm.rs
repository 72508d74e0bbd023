//! LightGBM-style inference.
//!
//! The exported model is a weight vector applied in a fixed feature order.
//! Output is on the percentage scale (0-100) with a positive/negative
//! decision, distinct from the 0..1 probabilities of [`crate::scoring`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use clr_config::validate::validate_lightgbm_config;
use clr_config::{FeatureTypes, LightGbmConfig, ModelPayload, StateMappings};
use clr_math::stable_sigmoid;

use crate::encode::{encode_snapshot, FeatureValues, RawSnapshot};
use crate::error::{Error, Result};
use crate::outcome::{Decision, UnavailableReason};

/// Ordered feature list plus its weight payload.
#[derive(Debug, Clone, PartialEq)]
pub struct LightGbmModelSpec {
    feature_names: Vec<String>,
    payload: ModelPayload,
}

impl LightGbmModelSpec {
    /// Rejects empty or duplicate feature names and a weight count that
    /// differs from the feature count.
    pub fn new(feature_names: Vec<String>, payload: ModelPayload) -> Result<Self> {
        if feature_names.is_empty() {
            return Err(Error::InvalidModel("feature list is empty".to_string()));
        }
        if let Some(blank) = feature_names.iter().position(|f| f.trim().is_empty()) {
            return Err(Error::InvalidModel(format!("feature #{} has no name", blank)));
        }
        let mut seen = BTreeSet::new();
        for name in &feature_names {
            if !seen.insert(name.as_str()) {
                return Err(Error::InvalidModel(format!("duplicate feature '{}'", name)));
            }
        }
        if payload.weights.len() != feature_names.len() {
            return Err(Error::WeightCountMismatch {
                features: feature_names.len(),
                weights: payload.weights.len(),
            });
        }
        if !payload.intercept.is_finite() || payload.weights.iter().any(|w| !w.is_finite()) {
            return Err(Error::InvalidModel(
                "payload contains a non-finite number".to_string(),
            ));
        }
        Ok(Self {
            feature_names,
            payload,
        })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn intercept(&self) -> f64 {
        self.payload.intercept
    }

    pub fn weights(&self) -> &[f64] {
        &self.payload.weights
    }
}

/// Outcome of one LightGBM-style inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InferenceResult {
    pub available: bool,
    /// Probability on the 0-100 scale.
    pub native_value: Option<f64>,
    pub linear_score: Option<f64>,
    pub raw_probability: Option<f64>,
    pub is_above_threshold: Option<bool>,
    pub decision: Option<Decision>,
    pub unavailable_reason: Option<UnavailableReason>,
    #[serde(default)]
    pub missing_features: Vec<String>,
}

impl InferenceResult {
    fn unavailable(missing_features: Vec<String>) -> Self {
        Self::unavailable_because(UnavailableReason::MissingOrUnmappedFeatures, missing_features)
    }

    fn unavailable_because(reason: UnavailableReason, missing_features: Vec<String>) -> Self {
        Self {
            available: false,
            native_value: None,
            linear_score: None,
            raw_probability: None,
            is_above_threshold: None,
            decision: None,
            unavailable_reason: Some(reason),
            missing_features,
        }
    }
}

/// Score encoded features against a LightGBM-style model.
///
/// Any entry in `missing_features`, or a model feature absent from
/// `feature_values`, makes the result unavailable.
pub fn run_lightgbm_inference(
    feature_values: &FeatureValues,
    missing_features: &[String],
    model: &LightGbmModelSpec,
    threshold: f64,
) -> InferenceResult {
    let mut missing = missing_features.to_vec();
    for name in &model.feature_names {
        if !feature_values.contains_key(name) && !missing.contains(name) {
            missing.push(name.clone());
        }
    }
    if !missing.is_empty() {
        debug!(missing = ?missing, "inference unavailable");
        return InferenceResult::unavailable(missing);
    }

    let mut linear_score = model.payload.intercept;
    for (name, weight) in model.feature_names.iter().zip(&model.payload.weights) {
        // presence checked above
        linear_score += weight * feature_values.get(name).copied().unwrap_or(0.0);
    }
    if !linear_score.is_finite() {
        debug!(linear_score, "inference unavailable: score overflowed");
        return InferenceResult::unavailable_because(UnavailableReason::NonFiniteScore, Vec::new());
    }
    let raw_probability = stable_sigmoid(linear_score);
    let native_value = raw_probability * 100.0;
    let is_above_threshold = native_value > threshold;

    InferenceResult {
        available: true,
        native_value: Some(native_value),
        linear_score: Some(linear_score),
        raw_probability: Some(raw_probability),
        is_above_threshold: Some(is_above_threshold),
        decision: Some(Decision::from_flag(is_above_threshold)),
        unavailable_reason: None,
        missing_features: Vec::new(),
    }
}

/// A validated LightGBM-style model with its encoding tables.
#[derive(Debug, Clone, PartialEq)]
pub struct LightGbmModel {
    name: String,
    spec: LightGbmModelSpec,
    feature_types: FeatureTypes,
    state_mappings: StateMappings,
    threshold: f64,
}

impl LightGbmModel {
    pub fn from_config(config: &LightGbmConfig) -> Result<Self> {
        validate_lightgbm_config(config)?;
        let spec = LightGbmModelSpec::new(config.feature_names.clone(), config.model_payload.clone())?;
        Ok(Self {
            name: config.name.clone(),
            spec,
            feature_types: config.resolved_feature_types(),
            state_mappings: config.state_mappings.clone(),
            threshold: config.threshold,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spec(&self) -> &LightGbmModelSpec {
        &self.spec
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Encode a raw snapshot in feature order and run inference.
    pub fn evaluate(&self, snapshot: &RawSnapshot) -> InferenceResult {
        let encoded = encode_snapshot(
            &self.spec.feature_names,
            snapshot,
            &self.feature_types,
            &self.state_mappings,
        );
        run_lightgbm_inference(&encoded.values, &encoded.missing, &self.spec, self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::RawValue;

    fn spec() -> LightGbmModelSpec {
        LightGbmModelSpec::new(
            vec!["event_count".to_string(), "on_ratio".to_string()],
            ModelPayload {
                intercept: -1.0,
                weights: vec![0.4, 0.3],
            },
        )
        .unwrap()
    }

    fn values(pairs: &[(&str, f64)]) -> FeatureValues {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn missing_features_make_result_unavailable() {
        let result = run_lightgbm_inference(
            &values(&[("event_count", 4.0)]),
            &["on_ratio".to_string()],
            &spec(),
            70.0,
        );
        assert!(!result.available);
        assert_eq!(result.native_value, None);
        assert_eq!(result.decision, None);
        assert_eq!(
            result.unavailable_reason,
            Some(UnavailableReason::MissingOrUnmappedFeatures)
        );
        assert_eq!(result.missing_features, vec!["on_ratio"]);
    }

    #[test]
    fn absent_value_counts_as_missing() {
        let result = run_lightgbm_inference(&values(&[("event_count", 4.0)]), &[], &spec(), 70.0);
        assert!(!result.available);
        assert_eq!(result.missing_features, vec!["on_ratio"]);
    }

    #[test]
    fn payload_weights_drive_probability() {
        let result = run_lightgbm_inference(
            &values(&[("event_count", 4.0), ("on_ratio", 0.5)]),
            &[],
            &spec(),
            75.0,
        );
        let expected_linear: f64 = -1.0 + 0.4 * 4.0 + 0.3 * 0.5;
        let expected_prob = 1.0 / (1.0 + (-expected_linear).exp());

        assert!(result.available);
        assert_eq!(result.linear_score, Some(expected_linear));
        assert_eq!(result.raw_probability, Some(expected_prob));
        assert_eq!(result.native_value, Some(expected_prob * 100.0));
        assert_eq!(result.is_above_threshold, Some(false));
        assert_eq!(result.decision, Some(Decision::Negative));
    }

    #[test]
    fn low_threshold_flips_decision() {
        let result = run_lightgbm_inference(
            &values(&[("event_count", 4.0), ("on_ratio", 0.5)]),
            &[],
            &spec(),
            50.0,
        );
        assert_eq!(result.decision, Some(Decision::Positive));
    }

    #[test]
    fn overflowing_score_is_unavailable() {
        let model = LightGbmModelSpec::new(
            vec!["a".to_string(), "b".to_string()],
            ModelPayload {
                intercept: 0.0,
                weights: vec![10.0, -10.0],
            },
        )
        .unwrap();

        let nan = run_lightgbm_inference(&values(&[("a", 1e308), ("b", 1e308)]), &[], &model, 50.0);
        assert!(!nan.available);
        assert_eq!(nan.native_value, None);
        assert_eq!(nan.decision, None);
        assert_eq!(nan.unavailable_reason, Some(UnavailableReason::NonFiniteScore));
        assert!(nan.missing_features.is_empty());

        let inf = run_lightgbm_inference(&values(&[("a", 1e308), ("b", 0.0)]), &[], &model, 50.0);
        assert_eq!(inf.unavailable_reason, Some(UnavailableReason::NonFiniteScore));
    }

    #[test]
    fn spec_rejects_weight_count_mismatch() {
        let err = LightGbmModelSpec::new(
            vec!["a".to_string(), "b".to_string()],
            ModelPayload {
                intercept: 0.0,
                weights: vec![1.0],
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::WeightCountMismatch {
                features: 2,
                weights: 1
            }
        ));
    }

    #[test]
    fn spec_rejects_duplicates_and_empty() {
        let payload = ModelPayload {
            intercept: 0.0,
            weights: vec![1.0, 1.0],
        };
        assert!(LightGbmModelSpec::new(vec!["a".into(), "a".into()], payload.clone()).is_err());
        assert!(LightGbmModelSpec::new(vec![], ModelPayload { intercept: 0.0, weights: vec![] }).is_err());
        assert!(LightGbmModelSpec::new(vec!["a".into(), " ".into()], payload).is_err());
    }

    #[test]
    fn model_evaluates_categorical_snapshot() {
        let config = LightGbmConfig::from_str(
            r#"{
                "schema_version": "1.0.0",
                "name": "Bedroom",
                "feature_names": ["event_count", "binary_sensor.door"],
                "model_payload": {"intercept": -1.0, "weights": [0.4, 0.3]},
                "threshold": 75.0,
                "feature_types": {"binary_sensor.door": "categorical"},
                "state_mappings": {"binary_sensor.door": {"open": 1, "closed": 0}}
            }"#,
        )
        .unwrap();
        let model = LightGbmModel::from_config(&config).unwrap();
        let snapshot = RawSnapshot::from([
            ("event_count".to_string(), RawValue::Number(4.0)),
            ("binary_sensor.door".to_string(), "Open".into()),
        ]);
        let result = model.evaluate(&snapshot);
        assert!(result.available);
        assert_eq!(result.linear_score, Some(-1.0 + 0.4 * 4.0 + 0.3 * 1.0));
    }
}
