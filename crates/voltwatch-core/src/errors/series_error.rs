//! Series construction and selection errors.

use super::error_code::{self, VoltwatchErrorCode};

/// Errors that can occur while building or selecting a series.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeriesError {
    #[error("Duplicate timestamp in series: {timestamp}")]
    DuplicateTimestamp { timestamp: String },

    #[error("Sampling step must be positive, got {seconds}s")]
    InvalidStep { seconds: i64 },

    #[error("No data for price area {area} and production group {group}")]
    EmptySelection { area: String, group: String },

    #[error("Timestamp out of range at sample {index}")]
    TimestampOutOfRange { index: usize },

    #[error("Invalid calendar month: {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("Unknown price area: {0}")]
    UnknownPriceArea(String),

    #[error("Unknown production group: {0}")]
    UnknownProductionGroup(String),
}

impl VoltwatchErrorCode for SeriesError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptySelection { .. } => error_code::EMPTY_SELECTION,
            _ => error_code::SERIES_ERROR,
        }
    }
}
