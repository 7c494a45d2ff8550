//! Density (local outlier factor) detector configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CONTAMINATION, DEFAULT_NEIGHBOR_COUNT};

/// Configuration for the density-based detector.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DensityConfig {
    /// Target outlier fraction. Default: 0.01.
    pub contamination: Option<f64>,
    /// Neighbours per point. Default: 20.
    pub neighbor_count: Option<usize>,
}

impl DensityConfig {
    pub fn effective_contamination(&self) -> f64 {
        self.contamination.unwrap_or(DEFAULT_CONTAMINATION)
    }

    pub fn effective_neighbor_count(&self) -> usize {
        self.neighbor_count.unwrap_or(DEFAULT_NEIGHBOR_COUNT)
    }
}
