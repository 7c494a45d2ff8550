//! voltwatch-core: shared types, errors, configuration, and tracing setup
//! for the voltwatch analysis engine.
//!
//! This crate holds no algorithms. Everything numeric lives in
//! `voltwatch-analysis`.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::VoltwatchConfig;
pub use errors::{AnalysisError, ConfigError, SeriesError, SessionError, VoltwatchErrorCode};
pub use types::{Month, PriceArea, ProductionGroup, Sample, Series};
