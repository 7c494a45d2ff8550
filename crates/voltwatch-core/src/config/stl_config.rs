//! STL decomposition configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_STL_PERIOD, DEFAULT_STL_ROBUST, DEFAULT_STL_SEASONAL, DEFAULT_STL_TREND,
};

/// Configuration for STL. Smoother lengths are in samples and must be odd.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StlConfig {
    /// Seasonal period in samples. Default: 24.
    pub period: Option<usize>,
    /// Seasonal smoother length. Default: 13.
    pub seasonal: Option<usize>,
    /// Trend smoother length. Default: 365.
    pub trend: Option<usize>,
    /// Low-pass smoother length. Default: smallest odd number above `period`.
    pub low_pass: Option<usize>,
    /// Use robustness iterations. Default: true.
    pub robust: Option<bool>,
}

impl StlConfig {
    pub fn effective_period(&self) -> usize {
        self.period.unwrap_or(DEFAULT_STL_PERIOD)
    }

    pub fn effective_seasonal(&self) -> usize {
        self.seasonal.unwrap_or(DEFAULT_STL_SEASONAL)
    }

    pub fn effective_trend(&self) -> usize {
        self.trend.unwrap_or(DEFAULT_STL_TREND)
    }

    /// Returns the low-pass length, derived from the period when unset.
    pub fn effective_low_pass(&self) -> usize {
        self.low_pass
            .unwrap_or_else(|| default_low_pass(self.effective_period()))
    }

    pub fn effective_robust(&self) -> bool {
        self.robust.unwrap_or(DEFAULT_STL_ROBUST)
    }
}

/// Smallest odd integer strictly greater than `period`.
pub fn default_low_pass(period: usize) -> usize {
    let candidate = period + 1;
    if candidate % 2 == 0 {
        candidate + 1
    } else {
        candidate
    }
}
