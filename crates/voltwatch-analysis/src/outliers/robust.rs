//! Robust location and spread estimates.

use statrs::statistics::Statistics;
use voltwatch_core::constants::{MAD_TO_SIGMA, SPREAD_NOISE_FLOOR};

/// Location and sigma of a residual, plus how the sigma was obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobustSpread {
    pub center: f64,
    pub sigma: f64,
    pub source: SpreadSource,
}

/// Estimator that produced [`RobustSpread::sigma`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadSource {
    /// 1.4826 × median absolute deviation.
    Mad,
    /// Population standard deviation, used when the MAD is zero.
    StdFallback,
    /// Both estimates are zero: the residual is constant.
    Degenerate,
}

/// Median of a slice. NaN for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    percentile(&sorted, 50.0)
}

/// Percentile of sorted data using linear interpolation between ranks.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;

    if upper >= sorted.len() {
        sorted[sorted.len() - 1]
    } else if lower == upper {
        sorted[lower]
    } else {
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}

/// Median, then MAD-based sigma with a standard-deviation fallback.
///
/// Estimates at or below `SPREAD_NOISE_FLOOR × max(1, scale)` count as zero,
/// so floating-point noise in an otherwise constant residual is not
/// mistaken for spread.
pub fn robust_spread(values: &[f64], scale: f64) -> RobustSpread {
    let center = median(values);
    let deviations: Vec<f64> = values.iter().map(|v| (v - center).abs()).collect();
    let mad_sigma = MAD_TO_SIGMA * median(&deviations);
    let floor = SPREAD_NOISE_FLOOR * scale.abs().max(1.0);

    if mad_sigma > floor {
        return RobustSpread {
            center,
            sigma: mad_sigma,
            source: SpreadSource::Mad,
        };
    }

    let std = values.iter().population_std_dev();
    if std > floor {
        RobustSpread {
            center,
            sigma: std,
            source: SpreadSource::StdFallback,
        }
    } else {
        RobustSpread {
            center,
            sigma: 0.0,
            source: SpreadSource::Degenerate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&sorted, 50.0), 3.0);
        assert!((percentile(&sorted, 10.0) - 1.4).abs() < 1e-12);
        assert!(percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn test_mad_sigma_of_symmetric_data() {
        let spread = robust_spread(&[-2.0, -1.0, 0.0, 1.0, 2.0], 2.0);
        assert_eq!(spread.source, SpreadSource::Mad);
        assert_eq!(spread.center, 0.0);
        assert!((spread.sigma - 1.4826).abs() < 1e-12);
    }

    #[test]
    fn test_zero_mad_falls_back_to_std() {
        // More than half the values equal: MAD is zero, std is not.
        let values = [0.0, 0.0, 0.0, 0.0, 0.0, 10.0];
        let spread = robust_spread(&values, 10.0);
        assert_eq!(spread.source, SpreadSource::StdFallback);
        let expected = values.iter().population_std_dev();
        assert!((spread.sigma - expected).abs() < 1e-12);
    }

    #[test]
    fn test_constant_values_are_degenerate() {
        let spread = robust_spread(&[5.0; 10], 5.0);
        assert_eq!(spread.source, SpreadSource::Degenerate);
        assert_eq!(spread.sigma, 0.0);
    }

    #[test]
    fn test_floating_noise_is_degenerate() {
        let values: Vec<f64> = (0..20).map(|i| 1e-15 * (i % 3) as f64).collect();
        let spread = robust_spread(&values, 100.0);
        assert_eq!(spread.source, SpreadSource::Degenerate);
    }
}
