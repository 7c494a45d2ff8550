//! Outlier detection over a single hourly series.
//!
//! Two independent detectors:
//! - Trend-residual: DCT low-pass trend, robust SPC limits on the residual
//! - Density: local outlier factor in value space with a contamination-percentile cutoff

pub mod density;
pub mod robust;
pub mod trend_residual;
pub mod types;

pub use density::{detect_density, DensityParams, DensityReport, DensitySummary};
pub use trend_residual::{
    detect_trend_residual, ControlLimits, TrendResidualParams, TrendResidualReport,
    TrendResidualSummary,
};
pub use types::{OutlierMask, OutlierMethod, OutlierPoint};
