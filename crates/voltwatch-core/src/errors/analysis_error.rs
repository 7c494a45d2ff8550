//! Analysis errors raised by the detectors, STL, and spectrogram.

use super::error_code::{self, VoltwatchErrorCode};

/// Errors that can occur while analysing a series.
///
/// A zero spread is not an error; the trend-residual detector falls back to
/// the standard deviation and never reports it here.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("Insufficient data for {operation}: need at least {required} points, got {actual}")]
    InsufficientData {
        operation: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl AnalysisError {
    /// Shorthand used by parameter validation.
    pub fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter { name, value, reason }
    }

    /// Shorthand used when a series is too short for an operation.
    pub fn too_short(operation: &'static str, required: usize, actual: usize) -> Self {
        Self::InsufficientData {
            operation,
            required,
            actual,
        }
    }
}

impl VoltwatchErrorCode for AnalysisError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientData { .. } => error_code::INSUFFICIENT_DATA,
            Self::InvalidParameter { .. } => error_code::INVALID_PARAMETER,
        }
    }
}
