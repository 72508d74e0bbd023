//! Parsers for raw configuration payloads.
//!
//! Configuration editors hand over loosely typed text (JSON snippets,
//! comma-separated lists). Each parser either returns the typed value or the
//! single [`FieldErrorCode`] to show next to the offending field.

use serde_json::Value;
use std::collections::BTreeSet;

use crate::features::{casefold, CoefficientSet, FeatureType, FeatureTypes, StateMappings, StateTable};
use crate::validate::FieldErrorCode;

/// Parse a finite `f64` from text, ignoring surrounding whitespace.
///
/// `"nan"`, `"inf"` and friends parse but are rejected as non-finite.
pub fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerce a JSON scalar to a finite number.
///
/// Numbers pass through, numeric strings are parsed and booleans map to 1/0.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_finite(s),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Parse required feature ids from a selector list or a comma-separated string.
///
/// Blank entries are dropped; anything else yields an empty list.
pub fn parse_required_features(raw: &Value) -> Vec<String> {
    match raw {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Parse a coefficients JSON object (`{"sensor.a": 0.5, ...}`).
pub fn parse_coefficients(raw: &str) -> Result<CoefficientSet, FieldErrorCode> {
    let parsed: Value =
        serde_json::from_str(raw).map_err(|_| FieldErrorCode::InvalidCoefficients)?;
    let object = parsed
        .as_object()
        .ok_or(FieldErrorCode::InvalidCoefficients)?;

    let mut coefficients = CoefficientSet::new();
    for (feature, weight) in object {
        if feature.is_empty() {
            return Err(FieldErrorCode::InvalidCoefficients);
        }
        let weight = coerce_number(weight).ok_or(FieldErrorCode::InvalidCoefficients)?;
        coefficients.insert(feature.clone(), weight);
    }
    Ok(coefficients)
}

/// Parse feature types for exactly the selected features.
pub fn parse_feature_types(
    raw: &str,
    required_features: &[String],
) -> Result<FeatureTypes, FieldErrorCode> {
    let parsed: Value =
        serde_json::from_str(raw).map_err(|_| FieldErrorCode::InvalidFeatureTypes)?;
    let object = parsed
        .as_object()
        .ok_or(FieldErrorCode::InvalidFeatureTypes)?;

    let selected: BTreeSet<&str> = required_features.iter().map(String::as_str).collect();
    let provided: BTreeSet<&str> = object.keys().map(String::as_str).collect();
    if selected != provided {
        return Err(FieldErrorCode::InvalidFeatureTypes);
    }

    let mut feature_types = FeatureTypes::new();
    for (feature, ty) in object {
        let ty: FeatureType = ty
            .as_str()
            .ok_or(FieldErrorCode::InvalidFeatureTypes)?
            .parse()
            .map_err(|_| FieldErrorCode::InvalidFeatureTypes)?;
        feature_types.insert(feature.clone(), ty);
    }
    Ok(feature_types)
}

/// Parse nested state mapping JSON (`{"binary_sensor.w": {"on": 1, "off": 0}}`).
///
/// Blank input means "no mappings". State keys are casefolded.
pub fn parse_state_mappings(raw: &str) -> Result<StateMappings, FieldErrorCode> {
    if raw.trim().is_empty() {
        return Ok(StateMappings::new());
    }
    let parsed: Value =
        serde_json::from_str(raw).map_err(|_| FieldErrorCode::InvalidStateMappings)?;
    let object = parsed
        .as_object()
        .ok_or(FieldErrorCode::InvalidStateMappings)?;

    let mut mappings = StateMappings::new();
    for (feature, states) in object {
        if feature.is_empty() {
            return Err(FieldErrorCode::InvalidStateMappings);
        }
        let states = states
            .as_object()
            .ok_or(FieldErrorCode::InvalidStateMappings)?;

        let mut table = StateTable::new();
        for (state, encoded) in states {
            if state.is_empty() {
                return Err(FieldErrorCode::InvalidStateMappings);
            }
            let encoded = coerce_number(encoded).ok_or(FieldErrorCode::InvalidStateMappings)?;
            table.insert(casefold(state), encoded);
        }
        mappings.insert(feature.clone(), table);
    }
    Ok(mappings)
}
