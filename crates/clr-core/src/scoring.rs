//! Linear scoring and Platt calibration.
//!
//! All functions are pure: configuration travels in as immutable values and
//! identical inputs produce bit-identical outputs. Coefficients live in an
//! ordered map, so the summation order is fixed.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use clr_config::validate::validate_model_config;
use clr_config::{CalibrationParams, CoefficientSet, FeatureTypes, ModelConfig, StateMappings};
use clr_math::{logit, stable_sigmoid};

use crate::encode::{encode_snapshot, FeatureValues, RawSnapshot};
use crate::error::Result;
use crate::outcome::UnavailableReason;

/// `intercept + Σ weight × value`, summed in coefficient order.
///
/// A feature missing from `features` contributes 0.0.
pub fn linear_score(features: &FeatureValues, coefficients: &CoefficientSet, intercept: f64) -> f64 {
    let mut score = intercept;
    for (feature, weight) in coefficients {
        score += weight * features.get(feature).copied().unwrap_or(0.0);
    }
    score
}

/// Returns `(probability, linear_score)`.
pub fn base_probability(
    features: &FeatureValues,
    coefficients: &CoefficientSet,
    intercept: f64,
) -> (f64, f64) {
    let score = linear_score(features, coefficients, intercept);
    (stable_sigmoid(score), score)
}

/// Platt recalibration in logit space: `σ(slope · logit(p) + intercept)`.
///
/// `p` is clamped away from 0 and 1 first, so the result is finite for any
/// `p` other than NaN.
pub fn calibrated_probability(probability: f64, slope: f64, intercept: f64) -> f64 {
    stable_sigmoid(slope * logit(probability) + intercept)
}

/// One scored feature vector, probabilities on the 0..1 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CalibratedScore {
    pub linear_score: f64,
    pub base_probability: f64,
    pub probability: f64,
}

/// Result of evaluating a configured model against a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CalibratedReading {
    pub name: String,
    pub available: bool,
    pub probability: Option<f64>,
    pub base_probability: Option<f64>,
    pub linear_score: Option<f64>,
    /// `probability × 100 > threshold`.
    pub is_above_threshold: Option<bool>,
    pub threshold: f64,
    pub feature_values: FeatureValues,
    pub missing_features: Vec<String>,
    pub unavailable_reason: Option<UnavailableReason>,
}

impl CalibratedReading {
    /// Probability on the 0-100 scale.
    pub fn percentage(&self) -> Option<f64> {
        self.probability.map(|p| p * 100.0)
    }
}

/// A validated calibrated logistic regression model.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibratedModel {
    name: String,
    intercept: f64,
    coefficients: CoefficientSet,
    required_features: Vec<String>,
    feature_types: FeatureTypes,
    state_mappings: StateMappings,
    calibration: CalibrationParams,
    threshold: f64,
}

impl CalibratedModel {
    /// Validate a persisted config and freeze it for scoring.
    ///
    /// Fails when any categorical feature lacks a state table.
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        validate_model_config(config)?;
        Ok(Self {
            name: config.name.clone(),
            intercept: config.intercept,
            coefficients: config.coefficients.clone(),
            required_features: config.required_features.clone(),
            feature_types: config.resolved_feature_types(),
            state_mappings: config.state_mappings.clone(),
            calibration: config.calibration,
            threshold: config.threshold,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn required_features(&self) -> &[String] {
        &self.required_features
    }

    pub fn calibration(&self) -> CalibrationParams {
        self.calibration
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Score already-encoded features.
    pub fn score(&self, features: &FeatureValues) -> CalibratedScore {
        let (base, linear) = base_probability(features, &self.coefficients, self.intercept);
        let probability =
            calibrated_probability(base, self.calibration.slope, self.calibration.intercept);
        CalibratedScore {
            linear_score: linear,
            base_probability: base,
            probability,
        }
    }

    /// Encode a raw snapshot and score it.
    pub fn evaluate(&self, snapshot: &RawSnapshot) -> CalibratedReading {
        let encoded = encode_snapshot(
            &self.required_features,
            snapshot,
            &self.feature_types,
            &self.state_mappings,
        );

        if !encoded.is_complete() {
            debug!(
                model = %self.name,
                missing = ?encoded.missing,
                "reading unavailable"
            );
            return CalibratedReading {
                name: self.name.clone(),
                available: false,
                probability: None,
                base_probability: None,
                linear_score: None,
                is_above_threshold: None,
                threshold: self.threshold,
                feature_values: encoded.values,
                missing_features: encoded.missing,
                unavailable_reason: Some(UnavailableReason::MissingOrUnmappedFeatures),
            };
        }

        let score = self.score(&encoded.values);
        if !score.linear_score.is_finite() {
            debug!(
                model = %self.name,
                linear_score = score.linear_score,
                "reading unavailable: score overflowed"
            );
            return CalibratedReading {
                name: self.name.clone(),
                available: false,
                probability: None,
                base_probability: None,
                linear_score: None,
                is_above_threshold: None,
                threshold: self.threshold,
                feature_values: encoded.values,
                missing_features: Vec::new(),
                unavailable_reason: Some(UnavailableReason::NonFiniteScore),
            };
        }
        debug!(
            model = %self.name,
            linear_score = score.linear_score,
            probability = score.probability,
            "reading computed"
        );
        CalibratedReading {
            name: self.name.clone(),
            available: true,
            probability: Some(score.probability),
            base_probability: Some(score.base_probability),
            linear_score: Some(score.linear_score),
            is_above_threshold: Some(score.probability * 100.0 > self.threshold),
            threshold: self.threshold,
            feature_values: encoded.values,
            missing_features: Vec::new(),
            unavailable_reason: None,
        }
    }
}
