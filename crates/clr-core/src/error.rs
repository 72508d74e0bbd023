//! Error types for the scoring workspace.
//!
//! Encoding and scoring never fail on data-shape problems; an unusable
//! snapshot produces an unavailable reading instead. Errors here are the
//! configuration-time and I/O failures the CLI reports.

use clr_config::{FieldErrors, ValidationError};
use serde::Serialize;
use thiserror::Error;

/// Result type alias for clr operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Model configuration could not be loaded or failed validation.
    Config,
    /// Model structure is unusable (weights vs. features).
    Model,
    /// Caller-supplied input such as a states file.
    Input,
    /// File I/O and serialization.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Model => write!(f, "model"),
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("invalid model configuration: {0}")]
    Config(#[from] ValidationError),

    #[error("no model configuration found (pass --model or set CLR_MODEL)")]
    ModelNotFound,

    // Model errors (20-29)
    #[error("feature list has {features} entries but payload has {weights} weights")]
    WeightCountMismatch { features: usize, weights: usize },

    #[error("invalid model: {0}")]
    InvalidModel(String),

    // Input errors (30-39)
    #[error("invalid states file: {0}")]
    InvalidStates(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Stable error code, grouped by category:
    /// - 10-19: configuration
    /// - 20-29: model structure
    /// - 30-39: caller input
    /// - 60-69: I/O
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::ModelNotFound => 11,
            Error::WeightCountMismatch { .. } => 20,
            Error::InvalidModel(_) => 21,
            Error::InvalidStates(_) => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(ValidationError::IoError(_)) => ErrorCategory::Io,
            Error::Config(_) | Error::ModelNotFound => ErrorCategory::Config,
            Error::WeightCountMismatch { .. } | Error::InvalidModel(_) => ErrorCategory::Model,
            Error::InvalidStates(_) => ErrorCategory::Input,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Field-level codes, when the error came from payload validation.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Error::Config(err) => err.field_errors(),
            _ => None,
        }
    }

    /// Structured form for machine-readable output.
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code(),
            category: self.category(),
            message: self.to_string(),
            field_errors: self.field_errors().cloned(),
        }
    }
}

/// Serializable error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub code: u32,
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<FieldErrors>,
}
