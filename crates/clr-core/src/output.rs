//! Output formats for CLI payloads.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::encode::SnapshotInspection;
use crate::lightgbm::InferenceResult;
use crate::scoring::CalibratedReading;

/// Supported output formats for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON (default)
    #[default]
    Json,

    /// One-line summary for quick checks
    Summary,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Summary => write!(f, "summary"),
        }
    }
}

/// Payloads with a one-line human summary.
pub trait Summary {
    fn summary_line(&self) -> String;
}

impl Summary for CalibratedReading {
    fn summary_line(&self) -> String {
        match (self.percentage(), self.is_above_threshold) {
            (Some(pct), Some(above)) => format!(
                "{}: {:.2}% ({} threshold {:.1})",
                self.name,
                pct,
                if above { "above" } else { "at or below" },
                self.threshold
            ),
            _ => format!(
                "{}: unavailable ({}; missing: {})",
                self.name,
                self.unavailable_reason
                    .map(|r| r.as_str())
                    .unwrap_or("unknown"),
                self.missing_features.join(", ")
            ),
        }
    }
}

impl Summary for InferenceResult {
    fn summary_line(&self) -> String {
        match (self.native_value, self.decision) {
            (Some(value), Some(decision)) => format!("{:.2}% {}", value, decision),
            _ => format!(
                "unavailable ({}; missing: {})",
                self.unavailable_reason
                    .map(|r| r.as_str())
                    .unwrap_or("unknown"),
                self.missing_features.join(", ")
            ),
        }
    }
}

impl Summary for SnapshotInspection {
    fn summary_line(&self) -> String {
        let categorical = self
            .feature_types
            .values()
            .filter(|t| **t == clr_config::FeatureType::Categorical)
            .count();
        let mut line = format!(
            "{} features ({} categorical), {} mapped",
            self.feature_types.len(),
            categorical,
            self.state_mappings.len()
        );
        if !self.missing_mappings.is_empty() {
            line.push_str(&format!("; unmapped: {}", self.missing_mappings.join(", ")));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::{Decision, UnavailableReason};

    #[test]
    fn test_format_display() {
        assert_eq!(OutputFormat::default().to_string(), "json");
        assert_eq!(OutputFormat::Summary.to_string(), "summary");
    }

    #[test]
    fn test_inference_summary() {
        let result = InferenceResult {
            available: true,
            native_value: Some(68.0),
            linear_score: Some(0.75),
            raw_probability: Some(0.68),
            is_above_threshold: Some(false),
            decision: Some(Decision::Negative),
            unavailable_reason: None,
            missing_features: vec![],
        };
        assert_eq!(result.summary_line(), "68.00% negative");
    }

    #[test]
    fn test_unavailable_reading_summary() {
        let reading = CalibratedReading {
            name: "Kitchen".to_string(),
            available: false,
            probability: None,
            base_probability: None,
            linear_score: None,
            is_above_threshold: None,
            threshold: 50.0,
            feature_values: Default::default(),
            missing_features: vec!["sensor.a".to_string()],
            unavailable_reason: Some(UnavailableReason::MissingOrUnmappedFeatures),
        };
        assert_eq!(
            reading.summary_line(),
            "Kitchen: unavailable (missing_or_unmapped_features; missing: sensor.a)"
        );
    }
}
