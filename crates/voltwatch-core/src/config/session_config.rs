//! Session configuration.

use serde::{Deserialize, Serialize};

use crate::errors::SeriesError;
use crate::types::PriceArea;

/// Configuration for the analysis session.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SessionConfig {
    /// Price area selected when a session starts, e.g. "NO3". Default: NO1.
    pub default_area: Option<String>,
}

impl SessionConfig {
    /// Returns the configured starting area, defaulting to NO1.
    pub fn effective_default_area(&self) -> Result<PriceArea, SeriesError> {
        match self.default_area.as_deref() {
            Some(code) => code.parse(),
            None => Ok(PriceArea::default()),
        }
    }
}
