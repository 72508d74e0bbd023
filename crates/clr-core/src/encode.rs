//! Feature encoding: raw entity states → model inputs.
//!
//! Feature typing and default state tables are decided once, at configuration
//! time, from an observed snapshot. At scoring time the persisted tables are
//! only consulted, never re-inferred.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;

use clr_config::parse::parse_finite;
pub use clr_config::{
    casefold, validate_categorical_mappings, FeatureType, FeatureTypes, StateMappings, StateTable,
};

/// Encoded model inputs keyed by feature name.
pub type FeatureValues = BTreeMap<String, f64>;

/// Raw observed states keyed by feature name.
pub type RawSnapshot = BTreeMap<String, RawValue>;

/// Host placeholder states meaning "no observation".
pub const PLACEHOLDER_STATES: [&str; 2] = ["unknown", "unavailable"];

/// Boolean-like vocabularies as (activates, deactivates) pairs.
const KNOWN_STATE_PAIRS: [(&str, &str); 4] = [
    ("on", "off"),
    ("true", "false"),
    ("home", "away"),
    ("open", "closed"),
];

/// An observed state as reported by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Convert a JSON scalar; `null`, arrays and objects are not states.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(RawValue::Number),
            Value::String(s) => Some(RawValue::Text(s.clone())),
            Value::Bool(b) => Some(RawValue::Text(b.to_string())),
            _ => None,
        }
    }

    /// The value as a state label.
    ///
    /// Numbers use the shortest `Display` form, so an integral value drops
    /// its fraction: `1.0` is the label `"1"` and matches a table key `"1"`,
    /// never `"1.0"`.
    pub fn as_state(&self) -> Cow<'_, str> {
        match self {
            RawValue::Number(n) => Cow::Owned(n.to_string()),
            RawValue::Text(s) => Cow::Borrowed(s.as_str()),
        }
    }

    /// True for the host's "unknown"/"unavailable" placeholders.
    pub fn is_placeholder(&self) -> bool {
        match self {
            RawValue::Number(_) => false,
            RawValue::Text(s) => {
                let folded = casefold(s.trim());
                PLACEHOLDER_STATES.contains(&folded.as_str())
            }
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

/// Parse a finite number from a raw state; `None` means "not numeric".
pub fn parse_numeric_value(raw: &RawValue) -> Option<f64> {
    match raw {
        RawValue::Number(n) => Some(*n).filter(|v| v.is_finite()),
        RawValue::Text(s) => parse_finite(s),
    }
}

/// Numeric if the observed state parses as a finite number.
pub fn infer_feature_type(raw: &RawValue) -> FeatureType {
    if parse_numeric_value(raw).is_some() {
        FeatureType::Numeric
    } else {
        FeatureType::Categorical
    }
}

/// Infer a type for every feature in an observed snapshot.
pub fn infer_feature_types(snapshot: &RawSnapshot) -> FeatureTypes {
    snapshot
        .iter()
        .map(|(feature, raw)| (feature.clone(), infer_feature_type(raw)))
        .collect()
}

/// Built-in table for boolean-like states, e.g. `"away"` → `{home: 1, away: 0}`.
pub fn infer_default_state_mapping(raw: &str) -> Option<StateTable> {
    let folded = casefold(raw);
    KNOWN_STATE_PAIRS
        .iter()
        .find(|(active, inactive)| folded == *active || folded == *inactive)
        .map(|(active, inactive)| {
            StateTable::from([(active.to_string(), 1.0), (inactive.to_string(), 0.0)])
        })
}

/// Default tables for every snapshot state found in the built-in vocabulary.
pub fn infer_state_mappings(snapshot: &RawSnapshot) -> StateMappings {
    snapshot
        .iter()
        .filter_map(|(feature, raw)| {
            infer_default_state_mapping(&raw.as_state()).map(|table| (feature.clone(), table))
        })
        .collect()
}

/// Degenerate single-entry table `{observed state: 1.0}`.
///
/// Every other state of the feature then encodes to 0.0.
pub fn fallback_state_mapping(raw: &str) -> StateTable {
    StateTable::from([(casefold(raw), 1.0)])
}

/// Fill in tables for categorical features that have none.
///
/// Uses the built-in vocabulary first and the single-entry fallback second.
/// Features absent from the snapshot are left untouched.
pub fn complete_state_mappings(
    feature_types: &FeatureTypes,
    snapshot: &RawSnapshot,
    mappings: &StateMappings,
) -> StateMappings {
    let mut completed = mappings.clone();
    for feature in validate_categorical_mappings(feature_types, mappings) {
        let Some(raw) = snapshot.get(&feature) else {
            continue;
        };
        let state = raw.as_state();
        let table = infer_default_state_mapping(&state).unwrap_or_else(|| {
            tracing::debug!(feature = %feature, state = %state, "using single-state fallback mapping");
            fallback_state_mapping(&state)
        });
        completed.insert(feature, table);
    }
    completed
}

/// Encode one raw state.
///
/// Numeric features yield `None` when the state does not parse. Categorical
/// states missing from the feature's table encode to 0.0; a feature with no
/// table at all yields `None`.
pub fn encode(
    feature: &str,
    raw: &RawValue,
    feature_type: FeatureType,
    mappings: &StateMappings,
) -> Option<f64> {
    match feature_type {
        FeatureType::Numeric => parse_numeric_value(raw),
        FeatureType::Categorical => {
            let table = mappings.get(feature)?;
            let state = casefold(&raw.as_state());
            Some(table.get(&state).copied().unwrap_or(0.0))
        }
    }
}

/// Result of encoding a snapshot for a fixed feature list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EncodedFeatures {
    pub values: FeatureValues,
    /// In feature-list order.
    pub missing: Vec<String>,
}

impl EncodedFeatures {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Encode every required feature of a snapshot.
///
/// A feature is missing when the snapshot has no state for it, the state is
/// a host placeholder, or [`encode`] yields `None`. Undeclared features are
/// treated as numeric.
pub fn encode_snapshot(
    required: &[String],
    snapshot: &RawSnapshot,
    feature_types: &FeatureTypes,
    mappings: &StateMappings,
) -> EncodedFeatures {
    let mut encoded = EncodedFeatures::default();
    for feature in required {
        let feature_type = feature_types
            .get(feature)
            .copied()
            .unwrap_or(FeatureType::Numeric);
        let value = snapshot
            .get(feature)
            .filter(|raw| !raw.is_placeholder())
            .and_then(|raw| encode(feature, raw, feature_type, mappings));
        match value {
            Some(v) => {
                encoded.values.insert(feature.clone(), v);
            }
            None => encoded.missing.push(feature.clone()),
        }
    }
    encoded
}

/// Configuration-time view of an observed snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SnapshotInspection {
    pub feature_types: FeatureTypes,
    pub state_mappings: StateMappings,
    /// Categorical features that still need a table, sorted.
    pub missing_mappings: Vec<String>,
}

/// Infer types and default tables for a snapshot.
///
/// With `fallback`, unrecognized categorical states get the single-entry table.
pub fn inspect_snapshot(snapshot: &RawSnapshot, fallback: bool) -> SnapshotInspection {
    let feature_types = infer_feature_types(snapshot);
    let mut state_mappings = infer_state_mappings(snapshot);
    if fallback {
        state_mappings = complete_state_mappings(&feature_types, snapshot, &state_mappings);
    }
    let missing_mappings = validate_categorical_mappings(&feature_types, &state_mappings);
    SnapshotInspection {
        feature_types,
        state_mappings,
        missing_mappings,
    }
}
