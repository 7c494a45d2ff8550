//! VoltwatchErrorCode trait for presenting failures to a UI layer.

/// Every error enum implements this to expose a stable, machine-readable
/// code next to its human-readable message.
pub trait VoltwatchErrorCode {
    /// Returns the error code string (e.g., "INSUFFICIENT_DATA").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted display string: `[ERROR_CODE] message`.
    fn display_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Error code constants.
pub const INSUFFICIENT_DATA: &str = "INSUFFICIENT_DATA";
pub const INVALID_PARAMETER: &str = "INVALID_PARAMETER";
pub const SERIES_ERROR: &str = "SERIES_ERROR";
pub const EMPTY_SELECTION: &str = "EMPTY_SELECTION";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
