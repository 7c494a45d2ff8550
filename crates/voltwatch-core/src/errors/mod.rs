//! Error handling for voltwatch.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod analysis_error;
pub mod config_error;
pub mod error_code;
pub mod series_error;
pub mod session_error;

pub use analysis_error::AnalysisError;
pub use config_error::ConfigError;
pub use error_code::VoltwatchErrorCode;
pub use series_error::SeriesError;
pub use session_error::SessionError;
