//! Shared result vocabulary for both model families.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Why a reading carries no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    /// At least one required feature was absent, a placeholder, or not encodable.
    MissingOrUnmappedFeatures,
    /// The linear score overflowed to an infinity or NaN.
    NonFiniteScore,
}

impl UnavailableReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnavailableReason::MissingOrUnmappedFeatures => "missing_or_unmapped_features",
            UnavailableReason::NonFiniteScore => "non_finite_score",
        }
    }
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary decision against the configured threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Positive,
    Negative,
}

impl Decision {
    pub fn from_flag(above_threshold: bool) -> Self {
        if above_threshold {
            Decision::Positive
        } else {
            Decision::Negative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Positive => "positive",
            Decision::Negative => "negative",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
