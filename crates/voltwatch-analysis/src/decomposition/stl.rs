//! Seasonal-trend decomposition by LOESS (Cleveland et al., 1990).
//!
//! The series is split into `seasonal + trend + residual`. Each inner pass
//! smooths the cycle-subseries of the detrended series, removes their
//! low-frequency leakage with a low-pass filter, and re-estimates the trend
//! from the deseasonalised series. Robust runs repeat the inner loop with
//! bisquare weights that discount large residuals.

use serde::{Deserialize, Serialize};
use voltwatch_core::config::StlConfig;
use voltwatch_core::constants::SPREAD_NOISE_FLOOR;
use voltwatch_core::errors::AnalysisError;
use voltwatch_core::types::Series;

use super::loess::{fit_at, moving_average, smooth};
use crate::outliers::robust::median;
use crate::preprocess::fill_missing;

const OPERATION: &str = "STL decomposition";

/// Parameters of the decomposition. Smoother lengths are in samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StlParams {
    /// Samples per seasonal cycle, at least 2.
    pub period: usize,
    /// Cycle-subseries smoother length, odd and at least 3.
    pub seasonal: usize,
    /// Trend smoother length, odd and at least 3.
    pub trend: usize,
    /// Low-pass smoother length, odd and greater than `period`.
    pub low_pass: usize,
    pub robust: bool,
}

impl Default for StlParams {
    fn default() -> Self {
        Self::from_config(&StlConfig::default())
    }
}

impl StlParams {
    pub fn from_config(config: &StlConfig) -> Self {
        Self {
            period: config.effective_period(),
            seasonal: config.effective_seasonal(),
            trend: config.effective_trend(),
            low_pass: config.effective_low_pass(),
            robust: config.effective_robust(),
        }
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.period < 2 {
            return Err(AnalysisError::invalid(
                "period",
                self.period as f64,
                "must be at least 2",
            ));
        }
        for (name, length) in [("seasonal", self.seasonal), ("trend", self.trend)] {
            if length < 3 || length % 2 == 0 {
                return Err(AnalysisError::invalid(
                    name,
                    length as f64,
                    "must be odd and at least 3",
                ));
            }
        }
        if self.low_pass <= self.period || self.low_pass % 2 == 0 {
            return Err(AnalysisError::invalid(
                "low_pass",
                self.low_pass as f64,
                "must be odd and greater than period",
            ));
        }
        Ok(())
    }

    fn inner_iterations(&self) -> usize {
        if self.robust {
            2
        } else {
            5
        }
    }

    fn outer_iterations(&self) -> usize {
        if self.robust {
            15
        } else {
            0
        }
    }
}

/// The three additive components plus the final robustness weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StlDecomposition {
    /// Input values with missing slots filled.
    pub observed: Vec<f64>,
    pub seasonal: Vec<f64>,
    pub trend: Vec<f64>,
    pub residual: Vec<f64>,
    /// Robustness weight per sample; all 1.0 for non-robust runs.
    pub weights: Vec<f64>,
}

impl StlDecomposition {
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// Series with the seasonal component removed.
    pub fn seasonally_adjusted(&self) -> Vec<f64> {
        self.observed
            .iter()
            .zip(&self.seasonal)
            .map(|(y, s)| y - s)
            .collect()
    }
}

/// Decompose `series` into seasonal, trend and residual components.
pub fn decompose_stl(series: &Series, params: &StlParams) -> Result<StlDecomposition, AnalysisError> {
    params.validate()?;
    let required = 2 * params.period;
    if series.len() < required {
        return Err(AnalysisError::too_short(OPERATION, required, series.len()));
    }

    let observed = fill_missing(series)?;
    let n = observed.len();
    let scale = observed.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));

    let mut seasonal = vec![0.0; n];
    let mut trend = vec![0.0; n];
    let mut weights = vec![1.0; n];
    let outer = params.outer_iterations();

    for pass in 0..=outer {
        let robustness = (pass > 0).then_some(weights.as_slice());
        inner_loop(&observed, params, robustness, &mut seasonal, &mut trend);
        if pass < outer {
            let residual: Vec<f64> = (0..n).map(|i| observed[i] - seasonal[i] - trend[i]).collect();
            weights = robustness_weights(&residual, scale);
        }
    }

    let residual: Vec<f64> = (0..n).map(|i| observed[i] - seasonal[i] - trend[i]).collect();

    tracing::debug!(
        n_points = n,
        period = params.period,
        robust = params.robust,
        passes = outer + 1,
        "STL decomposition complete"
    );

    Ok(StlDecomposition {
        observed,
        seasonal,
        trend,
        residual,
        weights,
    })
}

fn inner_loop(
    y: &[f64],
    params: &StlParams,
    robustness: Option<&[f64]>,
    seasonal: &mut [f64],
    trend: &mut [f64],
) {
    let n = y.len();
    for _ in 0..params.inner_iterations() {
        let detrended: Vec<f64> = (0..n).map(|i| y[i] - trend[i]).collect();
        let cycle = smooth_cycle_subseries(&detrended, params.period, params.seasonal, robustness);
        let low = low_pass(&cycle, params.period, params.low_pass);
        for i in 0..n {
            seasonal[i] = cycle[params.period + i] - low[i];
        }
        let deseasonalised: Vec<f64> = (0..n).map(|i| y[i] - seasonal[i]).collect();
        trend.copy_from_slice(&smooth(&deseasonalised, robustness, params.trend));
    }
}

/// Smooth each cycle-subseries and extend it by one cycle at both ends.
///
/// Output length is `len + 2 × period`; entry `p × period + j` is position
/// `p − 1` of subseries `j`.
fn smooth_cycle_subseries(
    y: &[f64],
    period: usize,
    span: usize,
    robustness: Option<&[f64]>,
) -> Vec<f64> {
    let mut cycle = vec![0.0; y.len() + 2 * period];
    for phase in 0..period.min(y.len()) {
        let values: Vec<f64> = y.iter().skip(phase).step_by(period).copied().collect();
        let sub_weights: Option<Vec<f64>> =
            robustness.map(|rw| rw.iter().skip(phase).step_by(period).copied().collect());
        let m = values.len();

        for p in 0..m + 2 {
            let x = p as f64 - 1.0;
            let nearest = (p.saturating_sub(1)).min(m - 1);
            let fitted = fit_at(&values, sub_weights.as_deref(), span, x).unwrap_or(values[nearest]);
            cycle[p * period + phase] = fitted;
        }
    }
    cycle
}

/// Low-pass filter of the extended cycle: MA(period), MA(period), MA(3), LOESS.
///
/// Returns exactly `cycle.len() − 2 × period` values.
fn low_pass(cycle: &[f64], period: usize, span: usize) -> Vec<f64> {
    let first = moving_average(cycle, period);
    let second = moving_average(&first, period);
    let third = moving_average(&second, 3);
    smooth(&third, None, span)
}

/// Bisquare weights on residuals scaled by six times their median magnitude.
///
/// A residual spread under the noise floor leaves every weight at 1.
fn robustness_weights(residual: &[f64], scale: f64) -> Vec<f64> {
    let magnitude: Vec<f64> = residual.iter().map(|r| r.abs()).collect();
    let h = 6.0 * median(&magnitude);
    if h <= SPREAD_NOISE_FLOOR * scale.max(1.0) {
        return vec![1.0; residual.len()];
    }

    let upper = 0.999 * h;
    let lower = 0.001 * h;
    residual
        .iter()
        .map(|r| {
            let r = r.abs();
            if r <= lower {
                1.0
            } else if r <= upper {
                let u = r / h;
                (1.0 - u * u).powi(2)
            } else {
                0.0
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::f64::consts::TAU;

    fn hourly(values: &[f64]) -> Series {
        Series::hourly(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(), values)
    }

    fn params(period: usize, trend: usize, robust: bool) -> StlParams {
        StlParams {
            period,
            seasonal: 7,
            trend,
            low_pass: voltwatch_core::config::stl_config::default_low_pass(period),
            robust,
        }
    }

    #[test]
    fn test_defaults_match_dashboard() {
        let p = StlParams::default();
        assert_eq!((p.period, p.seasonal, p.trend, p.low_pass, p.robust), (24, 13, 365, 25, true));
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let mut p = params(24, 49, false);
        p.seasonal = 8;
        assert!(matches!(p.validate(), Err(AnalysisError::InvalidParameter { name: "seasonal", .. })));
        let mut p = params(24, 49, false);
        p.low_pass = 23;
        assert!(matches!(p.validate(), Err(AnalysisError::InvalidParameter { name: "low_pass", .. })));
        let mut p = params(24, 49, false);
        p.period = 1;
        assert!(matches!(p.validate(), Err(AnalysisError::InvalidParameter { name: "period", .. })));
    }

    #[test]
    fn test_requires_two_full_cycles() {
        let err = decompose_stl(&hourly(&[1.0; 30]), &params(24, 49, false)).unwrap_err();
        assert_eq!(err, AnalysisError::too_short("STL decomposition", 48, 30));
    }

    #[test]
    fn test_subseries_extension_length() {
        let y: Vec<f64> = (0..50).map(|i| (i % 5) as f64).collect();
        let cycle = smooth_cycle_subseries(&y, 5, 7, None);
        assert_eq!(cycle.len(), 60);
        // Constant subseries stay constant, extensions included.
        for (i, c) in cycle.iter().enumerate() {
            assert!((c - (i % 5) as f64).abs() < 1e-9, "cycle[{i}] = {c}");
        }
        assert_eq!(low_pass(&cycle, 5, 7).len(), 50);
    }

    #[test]
    fn test_periodic_signal_goes_to_seasonal() {
        let values: Vec<f64> = (0..480).map(|i| (TAU * i as f64 / 24.0).sin()).collect();
        let stl = decompose_stl(&hourly(&values), &params(24, 49, false)).unwrap();
        for i in 0..values.len() {
            assert!((stl.seasonal[i] - values[i]).abs() < 1e-6, "seasonal[{i}]");
            assert!(stl.trend[i].abs() < 1e-6, "trend[{i}]");
        }
    }

    #[test]
    fn test_linear_trend_is_recovered() {
        let values: Vec<f64> = (0..480)
            .map(|i| 0.01 * i as f64 + 2.0 * (TAU * i as f64 / 24.0).sin())
            .collect();
        let stl = decompose_stl(&hourly(&values), &params(24, 49, false)).unwrap();
        for i in 0..values.len() {
            assert!((stl.trend[i] - 0.01 * i as f64).abs() < 1e-6, "trend[{i}]");
        }
    }

    #[test]
    fn test_components_sum_to_observed() {
        let values: Vec<f64> = (0..240)
            .map(|i| 5.0 + (TAU * i as f64 / 24.0).cos() + 0.3 * ((i * 13) % 11) as f64)
            .collect();
        let stl = decompose_stl(&hourly(&values), &StlParams::default()).unwrap();
        assert_eq!(stl.len(), 240);
        for i in 0..stl.len() {
            let total = stl.seasonal[i] + stl.trend[i] + stl.residual[i];
            assert!((total - stl.observed[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_robust_run_downweights_spike() {
        let mut values: Vec<f64> = (0..240)
            .map(|i| (TAU * i as f64 / 24.0).sin() + 0.05 * ((i * 7) % 5) as f64)
            .collect();
        values[100] += 30.0;
        let stl = decompose_stl(&hourly(&values), &params(24, 49, true)).unwrap();
        assert!(stl.weights[100] < 0.01, "spike weight {}", stl.weights[100]);
        let median_weight = {
            let mut w = stl.weights.clone();
            w.sort_by(|a, b| a.total_cmp(b));
            w[w.len() / 2]
        };
        assert!(median_weight > 0.5);
    }

    #[test]
    fn test_non_robust_weights_are_one() {
        let values: Vec<f64> = (0..96).map(|i| (i % 24) as f64).collect();
        let stl = decompose_stl(&hourly(&values), &params(24, 49, false)).unwrap();
        assert!(stl.weights.iter().all(|&w| w == 1.0));
    }

    #[test]
    fn test_robustness_weights_degenerate_residual() {
        assert_eq!(robustness_weights(&[0.0, 0.0, 0.0], 10.0), vec![1.0, 1.0, 1.0]);
    }
}
