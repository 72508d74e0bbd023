//! Exit codes for the `clr` CLI.
//!
//! Ranges:
//! - 0-9: evaluation outcomes
//! - 10-19: user/configuration errors
//! - 20-29: internal errors

use clr_config::ValidationError;

use crate::error::Error;

/// Process exit statuses. Stable contract for scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Command succeeded; for evaluations, the reading is available.
    Available = 0,

    /// Evaluation ran but required features were missing or unmapped.
    Unavailable = 1,

    /// Invalid arguments or input files.
    ArgsError = 10,

    /// Model configuration missing or invalid.
    ConfigError = 11,

    /// Internal error (bug).
    InternalError = 20,

    /// I/O error.
    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_error(self) -> bool {
        (self as i32) >= 10
    }

    /// Name for JSON output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Available => "OK_AVAILABLE",
            ExitCode::Unavailable => "OK_UNAVAILABLE",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }

    /// Exit status for an evaluation outcome.
    pub fn for_availability(available: bool) -> Self {
        if available {
            ExitCode::Available
        } else {
            ExitCode::Unavailable
        }
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::Config(ValidationError::IoError(_)) => ExitCode::IoError,
            Error::Config(_)
            | Error::ModelNotFound
            | Error::WeightCountMismatch { .. }
            | Error::InvalidModel(_) => ExitCode::ConfigError,
            Error::InvalidStates(_) => ExitCode::ArgsError,
            Error::Io(_) => ExitCode::IoError,
            Error::Json(_) => ExitCode::InternalError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
