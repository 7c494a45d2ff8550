//! Degree-1 LOESS on an integer grid, the smoother behind every STL pass.
//!
//! Each fit uses the `span` points nearest the target position with tricube
//! distance weights, optionally multiplied by robustness weights. The target
//! may lie outside the data, which the cycle-subseries pass uses to extend
//! each subseries by one position at either end.

/// Tricube weight of a point at distance `r` from a target with bandwidth `h`.
fn tricube(r: f64, h: f64) -> f64 {
    let upper = 0.999 * h;
    let lower = 0.001 * h;
    if r > upper {
        0.0
    } else if r <= lower {
        1.0
    } else {
        let u = r / h;
        (1.0 - u * u * u).powi(3)
    }
}

/// Locally linear estimate at position `x` (index units, may be fractional
/// or outside `0..len`).
///
/// Returns `None` when every point in the neighbourhood carries zero weight.
pub(crate) fn fit_at(y: &[f64], robustness: Option<&[f64]>, span: usize, x: f64) -> Option<f64> {
    let n = y.len();
    if n == 0 {
        return None;
    }
    let q = span.clamp(1, n);

    // Window of q contiguous points nearest x.
    let center = x.round().clamp(0.0, (n - 1) as f64) as usize;
    let left = center.saturating_sub((q - 1) / 2).min(n - q);
    let right = left + q - 1;

    let mut h = (x - left as f64).max(right as f64 - x);
    if span > n {
        h += ((span - n) / 2) as f64;
    }

    let mut weights: Vec<f64> = (left..=right)
        .map(|j| {
            let w = tricube((j as f64 - x).abs(), h);
            match robustness {
                Some(rw) => w * rw[j],
                None => w,
            }
        })
        .collect();

    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return None;
    }
    for w in &mut weights {
        *w /= total;
    }

    if h > 0.0 {
        let mean: f64 = weights
            .iter()
            .zip(left..=right)
            .map(|(w, j)| w * j as f64)
            .sum();
        let spread: f64 = weights
            .iter()
            .zip(left..=right)
            .map(|(w, j)| w * (j as f64 - mean).powi(2))
            .sum();
        let range = (n - 1) as f64;
        if spread.sqrt() > 0.001 * range {
            let slope = (x - mean) / spread;
            for (w, j) in weights.iter_mut().zip(left..=right) {
                *w *= slope * (j as f64 - mean) + 1.0;
            }
        }
    }

    Some(weights.iter().zip(&y[left..=right]).map(|(w, v)| w * v).sum())
}

/// Smooth `y` at every index. Positions where the fit fails keep their input value.
pub(crate) fn smooth(y: &[f64], robustness: Option<&[f64]>, span: usize) -> Vec<f64> {
    (0..y.len())
        .map(|i| fit_at(y, robustness, span, i as f64).unwrap_or(y[i]))
        .collect()
}

/// Trailing moving average of width `window`; output length `len − window + 1`.
pub(crate) fn moving_average(y: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || y.len() < window {
        return Vec::new();
    }
    let width = window as f64;
    let mut sum: f64 = y[..window].iter().sum();
    let mut out = Vec::with_capacity(y.len() - window + 1);
    out.push(sum / width);
    for i in window..y.len() {
        sum += y[i] - y[i - window];
        out.push(sum / width);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tricube_cutoffs() {
        assert_eq!(tricube(0.0, 10.0), 1.0);
        assert_eq!(tricube(10.0, 10.0), 0.0);
        let mid = tricube(5.0, 10.0);
        assert!((mid - (1.0 - 0.125_f64).powi(3)).abs() < 1e-12);
    }

    #[test]
    fn test_linear_data_is_reproduced() {
        let y: Vec<f64> = (0..30).map(|i| 2.0 * i as f64 - 7.0).collect();
        let fitted = smooth(&y, None, 7);
        for (f, v) in fitted.iter().zip(&y) {
            assert!((f - v).abs() < 1e-9, "{f} vs {v}");
        }
    }

    #[test]
    fn test_linear_extrapolation_beyond_edges() {
        let y: Vec<f64> = (0..10).map(|i| 3.0 + 0.5 * i as f64).collect();
        let before = fit_at(&y, None, 5, -1.0).unwrap();
        let after = fit_at(&y, None, 5, 10.0).unwrap();
        assert!((before - 2.5).abs() < 1e-9);
        assert!((after - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_robustness_weights_fail_the_fit() {
        let y = [1.0, 2.0, 3.0];
        let rw = [0.0, 0.0, 0.0];
        assert_eq!(fit_at(&y, Some(&rw), 3, 1.0), None);
        assert_eq!(smooth(&y, Some(&rw), 3), y.to_vec());
    }

    #[test]
    fn test_span_longer_than_series() {
        let y = [4.0, 4.0, 4.0, 4.0];
        let fitted = smooth(&y, None, 365);
        assert!(fitted.iter().all(|v| (v - 4.0).abs() < 1e-12));
    }

    #[test]
    fn test_moving_average_lengths() {
        let y = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(moving_average(&y, 2), vec![1.5, 2.5, 3.5, 4.5]);
        assert_eq!(moving_average(&y, 5), vec![3.0]);
        assert!(moving_average(&y, 6).is_empty());
    }
}
