//! Spectrogram configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_WINDOW_LENGTH, DEFAULT_WINDOW_OVERLAP};

/// Configuration for the short-time spectrogram.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SpectrogramConfig {
    /// Window length in hours. Default: 168 (one week).
    pub window_length: Option<usize>,
    /// Fraction of each window shared with the next. Default: 0.5.
    pub window_overlap: Option<f64>,
}

impl SpectrogramConfig {
    pub fn effective_window_length(&self) -> usize {
        self.window_length.unwrap_or(DEFAULT_WINDOW_LENGTH)
    }

    pub fn effective_window_overlap(&self) -> f64 {
        self.window_overlap.unwrap_or(DEFAULT_WINDOW_OVERLAP)
    }
}
