//! Trend-residual outlier detection (DCT low-pass + robust SPC limits).
//!
//! The lowest `keep` DCT coefficients of the series form a smooth seasonal
//! trend. The residual (SATV, seasonally adjusted variation) is tested
//! against `center ± sigma_threshold × robust_sigma`, where the center is
//! the residual median and the sigma comes from its MAD.

use serde::{Deserialize, Serialize};
use voltwatch_core::config::TrendResidualConfig;
use voltwatch_core::errors::AnalysisError;
use voltwatch_core::types::Series;

use super::robust::{robust_spread, SpreadSource};
use super::types::{collect_points, OutlierMask, OutlierMethod, OutlierPoint};
use crate::preprocess::fill_missing;
use crate::transform::low_frequency_part;

const OPERATION: &str = "trend-residual detection";

/// Parameters of the trend-residual detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendResidualParams {
    /// Fraction of the lowest DCT coefficients kept as trend, in (0, 0.5].
    pub trend_keep_fraction: f64,
    /// Control-limit half-width in robust sigmas, at least 1.0.
    pub sigma_threshold: f64,
}

impl Default for TrendResidualParams {
    fn default() -> Self {
        Self::from_config(&TrendResidualConfig::default())
    }
}

impl TrendResidualParams {
    pub fn from_config(config: &TrendResidualConfig) -> Self {
        Self {
            trend_keep_fraction: config.effective_trend_keep_fraction(),
            sigma_threshold: config.effective_sigma_threshold(),
        }
    }

    /// Reject out-of-range parameters. Nothing is clamped.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let fraction = self.trend_keep_fraction;
        if !(fraction > 0.0 && fraction <= 0.5) {
            return Err(AnalysisError::invalid(
                "trend_keep_fraction",
                fraction,
                "must be in (0, 0.5]",
            ));
        }
        if self.sigma_threshold.is_nan() || self.sigma_threshold < 1.0 {
            return Err(AnalysisError::invalid(
                "sigma_threshold",
                self.sigma_threshold,
                "must be at least 1.0",
            ));
        }
        Ok(())
    }

    /// Number of DCT coefficients kept for a series of `n` points. Always ≥ 1.
    pub fn keep_count(&self, n: usize) -> usize {
        ((self.trend_keep_fraction * n as f64).floor() as usize).max(1)
    }
}

/// Lower and upper control limits on the series scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlLimits {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

/// Fixed-shape summary of one detector run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResidualSummary {
    pub n_points: usize,
    pub n_outliers: usize,
    pub outlier_fraction: f64,
    /// Median of the residual.
    pub satv_center: f64,
    /// Robust sigma of the residual (std fallback when the MAD is zero).
    pub robust_sigma: f64,
    /// Lower residual bound.
    pub satv_lower: f64,
    /// Upper residual bound.
    pub satv_upper: f64,
    /// DCT coefficients kept for the trend.
    pub trend_coefficients: usize,
}

/// Everything the trend-residual view draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResidualReport {
    /// Input values with missing slots filled.
    pub values: Vec<f64>,
    pub trend: Vec<f64>,
    pub residual: Vec<f64>,
    pub limits: ControlLimits,
    pub mask: OutlierMask,
    pub summary: TrendResidualSummary,
}

impl TrendResidualReport {
    /// Flagged samples with their timestamps, for overlaying on a chart.
    pub fn outlier_points(&self, series: &Series) -> Vec<OutlierPoint> {
        collect_points(series, &self.values, &self.mask, OutlierMethod::TrendResidual)
    }
}

/// Run the trend-residual detector on `series`.
pub fn detect_trend_residual(
    series: &Series,
    params: &TrendResidualParams,
) -> Result<TrendResidualReport, AnalysisError> {
    params.validate()?;
    if series.is_empty() {
        return Err(AnalysisError::too_short(OPERATION, 1, 0));
    }

    let values = fill_missing(series)?;
    let n = values.len();
    let keep = params.keep_count(n);

    let trend = low_frequency_part(&values, keep);
    let residual: Vec<f64> = values.iter().zip(&trend).map(|(v, t)| v - t).collect();

    let scale = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let spread = robust_spread(&residual, scale);
    if spread.source == SpreadSource::StdFallback {
        tracing::debug!(sigma = spread.sigma, "residual MAD is zero, using standard deviation");
    }

    let (satv_lower, satv_upper, mask) = if spread.source == SpreadSource::Degenerate {
        // Constant residual: nothing can lie outside it.
        (spread.center, spread.center, OutlierMask::none(n))
    } else {
        let half_width = params.sigma_threshold * spread.sigma;
        let lower = spread.center - half_width;
        let upper = spread.center + half_width;
        let flags = residual.iter().map(|&r| r < lower || r > upper).collect();
        (lower, upper, OutlierMask::new(flags))
    };

    let limits = ControlLimits {
        lower: trend.iter().map(|t| t + satv_lower).collect(),
        upper: trend.iter().map(|t| t + satv_upper).collect(),
    };

    let n_outliers = mask.count();
    let summary = TrendResidualSummary {
        n_points: n,
        n_outliers,
        outlier_fraction: mask.fraction(),
        satv_center: spread.center,
        robust_sigma: spread.sigma,
        satv_lower,
        satv_upper,
        trend_coefficients: keep,
    };

    tracing::debug!(
        n_points = n,
        n_outliers,
        keep,
        sigma = spread.sigma,
        "trend-residual detection complete"
    );

    Ok(TrendResidualReport {
        values,
        trend,
        residual,
        limits,
        mask,
        summary,
    })
}
