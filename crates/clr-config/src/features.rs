//! Feature typing and categorical mapping tables.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Feature name → linear weight.
///
/// Ordered so that weighted sums are accumulated in a stable order.
pub type CoefficientSet = BTreeMap<String, f64>;

/// Casefolded raw state → encoded value for one categorical feature.
pub type StateTable = BTreeMap<String, f64>;

/// Feature name → state table.
pub type StateMappings = BTreeMap<String, StateTable>;

/// Feature name → declared type.
pub type FeatureTypes = BTreeMap<String, FeatureType>;

/// How a feature's raw state becomes a model input.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum FeatureType {
    /// Raw state parses as a finite number.
    Numeric,
    /// Raw state is a label looked up in a state table.
    Categorical,
}

impl FeatureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureType::Numeric => "numeric",
            FeatureType::Categorical => "categorical",
        }
    }
}

impl std::str::FromStr for FeatureType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match casefold(s.trim()).as_str() {
            "numeric" => Ok(FeatureType::Numeric),
            "categorical" => Ok(FeatureType::Categorical),
            _ => Err(format!("unknown feature type: {}", s)),
        }
    }
}

impl std::fmt::Display for FeatureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a raw state for table lookups.
///
/// Unicode default case folding, so `"STRASSE"` and `"straße"` compare equal.
/// Whitespace is left alone.
pub fn casefold(raw: &str) -> String {
    caseless::default_case_fold_str(raw)
}

/// Re-key every state table through [`casefold`].
///
/// When two keys fold to the same state the later key (in byte order) wins.
pub fn casefold_state_mappings(mappings: StateMappings) -> StateMappings {
    mappings
        .into_iter()
        .map(|(feature, table)| {
            let folded = table
                .into_iter()
                .map(|(state, value)| (casefold(&state), value))
                .collect();
            (feature, folded)
        })
        .collect()
}

/// Categorical features whose state table is absent or empty, sorted.
pub fn validate_categorical_mappings(
    feature_types: &FeatureTypes,
    state_mappings: &StateMappings,
) -> Vec<String> {
    let mut missing: Vec<String> = feature_types
        .iter()
        .filter(|(_, ty)| **ty == FeatureType::Categorical)
        .filter(|(feature, _)| {
            state_mappings
                .get(feature.as_str())
                .map_or(true, |table| table.is_empty())
        })
        .map(|(feature, _)| feature.clone())
        .collect();
    missing.sort();
    missing
}
