//! Missing-value filling shared by every analysis.
//!
//! Gaps are filled by linear interpolation in time between the nearest
//! valid neighbours. Leading and trailing gaps take the nearest valid value.

use voltwatch_core::errors::AnalysisError;
use voltwatch_core::types::Series;

/// Return the series values with every missing slot filled.
///
/// Fails with `InsufficientData` when the series holds no valid value.
pub fn fill_missing(series: &Series) -> Result<Vec<f64>, AnalysisError> {
    let values = series.values();
    let valid = series.valid_count();
    if valid == 0 {
        return Err(AnalysisError::too_short("missing-value interpolation", 1, 0));
    }
    if valid == values.len() {
        return Ok(values);
    }

    let hours = series.elapsed_hours();
    let n = values.len();

    // next_valid[i]: first index >= i holding a finite value.
    let mut next_valid = vec![None; n];
    let mut upcoming = None;
    for i in (0..n).rev() {
        if values[i].is_finite() {
            upcoming = Some(i);
        }
        next_valid[i] = upcoming;
    }

    let mut filled = Vec::with_capacity(n);
    let mut previous: Option<usize> = None;
    for i in 0..n {
        if values[i].is_finite() {
            filled.push(values[i]);
            previous = Some(i);
            continue;
        }
        let value = match (previous, next_valid[i]) {
            (Some(p), Some(q)) => {
                let span = hours[q] - hours[p];
                let w = if span > 0.0 { (hours[i] - hours[p]) / span } else { 0.0 };
                values[p] + w * (values[q] - values[p])
            }
            (Some(p), None) => values[p],
            (None, Some(q)) => values[q],
            (None, None) => unreachable!("series has at least one valid value"),
        };
        filled.push(value);
    }

    tracing::debug!(missing = n - valid, total = n, "filled missing values");
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use voltwatch_core::types::Sample;

    fn hourly(values: &[f64]) -> Series {
        Series::hourly(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(), values)
    }

    #[test]
    fn test_interior_gap_is_linear() {
        let filled = fill_missing(&hourly(&[1.0, f64::NAN, f64::NAN, 4.0])).unwrap();
        assert_eq!(filled, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_edges_take_nearest_valid() {
        let filled = fill_missing(&hourly(&[f64::NAN, 2.0, 5.0, f64::NAN])).unwrap();
        assert_eq!(filled, vec![2.0, 2.0, 5.0, 5.0]);
    }

    #[test]
    fn test_interpolation_follows_time_not_position() {
        let t0 = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let series = Series::new(vec![
            Sample::new(t0, 0.0),
            Sample::missing(t0 + Duration::hours(1)),
            Sample::new(t0 + Duration::hours(4), 8.0),
        ])
        .unwrap();
        let filled = fill_missing(&series).unwrap();
        assert!((filled[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_missing_is_insufficient() {
        let err = fill_missing(&hourly(&[f64::NAN, f64::NAN])).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData { actual: 0, .. }));
    }

    #[test]
    fn test_complete_series_is_unchanged() {
        let values = [3.0, 1.0, 4.0, 1.0, 5.0];
        assert_eq!(fill_missing(&hourly(&values)).unwrap(), values.to_vec());
    }
}
