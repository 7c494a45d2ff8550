//! Shared constants: dashboard defaults and numeric floors.

/// Scale factor turning a median absolute deviation into a normal-consistent sigma.
pub const MAD_TO_SIGMA: f64 = 1.4826;

/// Relative floor under which a spread estimate counts as zero.
pub const SPREAD_NOISE_FLOOR: f64 = 1e-12;

/// Added to mean reachability distances so duplicate points keep a finite density.
pub const LOF_DISTANCE_EPSILON: f64 = 1e-10;

/// Smallest neighbourhood the density detector will use.
pub const MIN_NEIGHBOR_COUNT: usize = 5;

// Trend-residual detector defaults.
pub const DEFAULT_TREND_KEEP_FRACTION: f64 = 0.02;
pub const DEFAULT_SIGMA_THRESHOLD: f64 = 3.0;

// Density detector defaults.
pub const DEFAULT_CONTAMINATION: f64 = 0.01;
pub const DEFAULT_NEIGHBOR_COUNT: usize = 20;

// STL defaults (hourly production data, daily cycle).
pub const DEFAULT_STL_PERIOD: usize = 24;
pub const DEFAULT_STL_SEASONAL: usize = 13;
pub const DEFAULT_STL_TREND: usize = 365;
pub const DEFAULT_STL_ROBUST: bool = true;

// Spectrogram defaults: one-week windows, half overlap.
pub const DEFAULT_WINDOW_LENGTH: usize = 24 * 7;
pub const DEFAULT_WINDOW_OVERLAP: f64 = 0.5;
