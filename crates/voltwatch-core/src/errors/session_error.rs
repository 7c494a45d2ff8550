//! Session errors: everything a dashboard panel can fail with.

use super::error_code::VoltwatchErrorCode;
use super::{AnalysisError, ConfigError, SeriesError};

/// Errors that can occur while a session runs an analysis.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Series error: {0}")]
    Series(#[from] SeriesError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl VoltwatchErrorCode for SessionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Analysis(e) => e.error_code(),
            Self::Series(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_taken_from_the_source_error() {
        let err: SessionError = SeriesError::EmptySelection {
            area: "NO4".to_string(),
            group: "solar".to_string(),
        }
        .into();
        assert_eq!(err.error_code(), "EMPTY_SELECTION");
        assert_eq!(
            err.display_string(),
            "[EMPTY_SELECTION] Series error: No data for price area NO4 and production group solar"
        );
    }

    #[test]
    fn test_analysis_error_converts() {
        let err: SessionError = AnalysisError::too_short("density detection", 6, 2).into();
        assert_eq!(err.error_code(), "INSUFFICIENT_DATA");
    }
}
