//! Trend-residual detector configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SIGMA_THRESHOLD, DEFAULT_TREND_KEEP_FRACTION};

/// Configuration for the trend-residual (DCT + SPC) detector.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TrendResidualConfig {
    /// Fraction of the lowest DCT coefficients kept as trend. Default: 0.02.
    pub trend_keep_fraction: Option<f64>,
    /// Control-limit width in robust sigmas. Default: 3.0.
    pub sigma_threshold: Option<f64>,
}

impl TrendResidualConfig {
    /// Returns the effective keep fraction, defaulting to 0.02.
    pub fn effective_trend_keep_fraction(&self) -> f64 {
        self.trend_keep_fraction.unwrap_or(DEFAULT_TREND_KEEP_FRACTION)
    }

    /// Returns the effective sigma threshold, defaulting to 3.0.
    pub fn effective_sigma_threshold(&self) -> f64 {
        self.sigma_threshold.unwrap_or(DEFAULT_SIGMA_THRESHOLD)
    }
}
