//! Time-indexed numeric series: the single input shape every analysis consumes.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::SeriesError;

use super::month::Month;

/// One observation. A non-finite value marks the slot as missing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// A slot with no usable value.
    pub fn missing(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            value: f64::NAN,
        }
    }

    pub fn is_missing(&self) -> bool {
        !self.value.is_finite()
    }
}

/// Ordered samples with strictly increasing timestamps.
///
/// The ordering invariant is established at construction; every accessor
/// can rely on it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Series {
    name: Option<String>,
    samples: Vec<Sample>,
}

impl Series {
    /// Build a series from samples in any order.
    ///
    /// Samples are sorted by timestamp. A repeated timestamp is rejected
    /// rather than silently merged.
    pub fn new(mut samples: Vec<Sample>) -> Result<Self, SeriesError> {
        samples.sort_by_key(|s| s.timestamp);
        if let Some(pair) = samples.windows(2).find(|w| w[0].timestamp == w[1].timestamp) {
            return Err(SeriesError::DuplicateTimestamp {
                timestamp: pair[0].timestamp.to_rfc3339(),
            });
        }
        Ok(Self {
            name: None,
            samples,
        })
    }

    /// Build a regular series starting at `start`, one value per `step`.
    pub fn regular(
        start: DateTime<Utc>,
        step: Duration,
        values: &[f64],
    ) -> Result<Self, SeriesError> {
        let step_ms = step.num_milliseconds();
        if step_ms <= 0 {
            return Err(SeriesError::InvalidStep {
                seconds: step.num_seconds(),
            });
        }
        let samples = values
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                i64::try_from(i)
                    .ok()
                    .and_then(|i| step_ms.checked_mul(i))
                    .and_then(|ms| start.checked_add_signed(Duration::milliseconds(ms)))
                    .map(|timestamp| Sample::new(timestamp, value))
                    .ok_or(SeriesError::TimestampOutOfRange { index: i })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: None,
            samples,
        })
    }

    /// Build an hourly series starting at `start`.
    pub fn hourly(start: DateTime<Utc>, values: &[f64]) -> Self {
        let samples = values
            .iter()
            .enumerate()
            .map(|(i, &value)| Sample::new(start + Duration::hours(i as i64), value))
            .collect();
        Self {
            name: None,
            samples,
        }
    }

    /// Attach a display name (e.g. the column or production group).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.samples.iter().map(|s| s.timestamp).collect()
    }

    /// Raw values, missing slots included as non-finite numbers.
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    /// Number of samples holding a usable value.
    pub fn valid_count(&self) -> usize {
        self.samples.iter().filter(|s| !s.is_missing()).count()
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.samples.first().map(|s| s.timestamp)
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.samples.last().map(|s| s.timestamp)
    }

    /// Hours elapsed since the first sample, one entry per sample.
    pub fn elapsed_hours(&self) -> Vec<f64> {
        let Some(start) = self.start() else {
            return Vec::new();
        };
        self.samples
            .iter()
            .map(|s| (s.timestamp - start).num_milliseconds() as f64 / 3_600_000.0)
            .collect()
    }

    /// Samples with `start <= timestamp < end`. Empty when `end <= start`.
    pub fn between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Series {
        let lo = self.samples.partition_point(|s| s.timestamp < start);
        let hi = self.samples.partition_point(|s| s.timestamp < end).max(lo);
        Series {
            name: self.name.clone(),
            samples: self.samples[lo..hi].to_vec(),
        }
    }

    /// Samples from the start of `first` through the end of `last`.
    ///
    /// Both months are inclusive; a range whose `last` precedes `first`
    /// selects nothing.
    pub fn months(&self, first: Month, last: Month) -> Result<Series, SeriesError> {
        let (start, _) = first.bounds()?;
        let (_, end) = last.bounds()?;
        Ok(self.between(start, end))
    }

    /// Distinct months the samples fall in, oldest first.
    pub fn available_months(&self) -> Vec<Month> {
        let mut months: Vec<Month> = self.samples.iter().map(|s| Month::of(s.timestamp)).collect();
        months.dedup();
        months
    }

    /// Samples of the month holding the first sample. Empty for an empty series.
    pub fn first_month(&self) -> Result<Series, SeriesError> {
        match self.start() {
            Some(start) => {
                let month = Month::of(start);
                self.months(month, month)
            }
            None => Ok(self.clone()),
        }
    }

    /// Place the series on a regular grid of `step` from its first to its
    /// last timestamp.
    ///
    /// Absent grid slots become missing samples; samples that fall between
    /// grid points are dropped.
    pub fn fill_gaps(&self, step: Duration) -> Result<Series, SeriesError> {
        let step_ms = step.num_milliseconds();
        if step_ms <= 0 {
            return Err(SeriesError::InvalidStep {
                seconds: step.num_seconds(),
            });
        }
        let (Some(start), Some(end)) = (self.start(), self.end()) else {
            return Ok(self.clone());
        };

        let slots = ((end - start).num_milliseconds() / step_ms) as usize + 1;
        let mut grid: Vec<Sample> = (0..slots)
            .map(|i| Sample::missing(start + Duration::milliseconds(step_ms * i as i64)))
            .collect();

        let mut dropped = 0usize;
        for sample in &self.samples {
            let offset = (sample.timestamp - start).num_milliseconds();
            if offset % step_ms == 0 {
                grid[(offset / step_ms) as usize].value = sample.value;
            } else {
                dropped += 1;
            }
        }

        let inserted = slots.saturating_sub(self.samples.len() - dropped);
        if inserted > 0 || dropped > 0 {
            tracing::debug!(inserted, dropped, slots, "placed series on regular grid");
        }

        Ok(Series {
            name: self.name.clone(),
            samples: grid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_new_sorts_samples() {
        let series = Series::new(vec![
            Sample::new(t0() + Duration::hours(2), 3.0),
            Sample::new(t0(), 1.0),
            Sample::new(t0() + Duration::hours(1), 2.0),
        ])
        .unwrap();
        assert_eq!(series.values(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_new_rejects_duplicate_timestamps() {
        let result = Series::new(vec![Sample::new(t0(), 1.0), Sample::new(t0(), 2.0)]);
        assert!(matches!(result, Err(SeriesError::DuplicateTimestamp { .. })));
    }

    #[test]
    fn test_regular_rejects_non_positive_step() {
        let result = Series::regular(t0(), Duration::zero(), &[1.0, 2.0]);
        assert_eq!(result, Err(SeriesError::InvalidStep { seconds: 0 }));
    }

    #[test]
    fn test_regular_offsets_by_whole_steps() {
        let series = Series::regular(t0(), Duration::minutes(15), &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(series.end(), Some(t0() + Duration::minutes(30)));
    }

    #[test]
    fn test_regular_reports_timestamp_overflow() {
        let result = Series::regular(t0(), Duration::days(100_000_000), &[1.0, 2.0, 3.0]);
        assert_eq!(result, Err(SeriesError::TimestampOutOfRange { index: 1 }));
    }

    #[test]
    fn test_valid_count_skips_non_finite() {
        let series = Series::hourly(t0(), &[1.0, f64::NAN, f64::INFINITY, 4.0]);
        assert_eq!(series.len(), 4);
        assert_eq!(series.valid_count(), 2);
    }

    #[test]
    fn test_fill_gaps_inserts_missing_slots() {
        let series = Series::new(vec![
            Sample::new(t0(), 1.0),
            Sample::new(t0() + Duration::hours(3), 4.0),
        ])
        .unwrap()
        .with_name("temperature_2m");
        let filled = series.fill_gaps(Duration::hours(1)).unwrap();
        assert_eq!(filled.len(), 4);
        assert_eq!(filled.valid_count(), 2);
        assert!(filled.samples()[1].is_missing());
        assert_eq!(filled.name(), Some("temperature_2m"));
    }

    #[test]
    fn test_fill_gaps_drops_off_grid_samples() {
        let series = Series::new(vec![
            Sample::new(t0(), 1.0),
            Sample::new(t0() + Duration::minutes(30), 9.0),
            Sample::new(t0() + Duration::hours(1), 2.0),
        ])
        .unwrap();
        let filled = series.fill_gaps(Duration::hours(1)).unwrap();
        assert_eq!(filled.values(), vec![1.0, 2.0]);
    }

    /// Hourly values from 2021-11-30 00:00 to 2022-01-01 23:00.
    fn across_new_year() -> Series {
        let start = Utc.with_ymd_and_hms(2021, 11, 30, 0, 0, 0).unwrap();
        let hours = 24 * 33;
        let values: Vec<f64> = (0..hours).map(|h| h as f64).collect();
        Series::hourly(start, &values).with_name("temperature_2m")
    }

    #[test]
    fn test_between_is_half_open() {
        let series = Series::hourly(t0(), &[0.0, 1.0, 2.0, 3.0]);
        let window = series.between(t0() + Duration::hours(1), t0() + Duration::hours(3));
        assert_eq!(window.values(), vec![1.0, 2.0]);
        assert!(series.between(t0() + Duration::hours(3), t0()).is_empty());
    }

    #[test]
    fn test_months_spans_december_rollover() {
        let series = across_new_year();
        let december = Month::new(2021, 12).unwrap();
        let january = Month::new(2022, 1).unwrap();

        let dec = series.months(december, december).unwrap();
        assert_eq!(dec.len(), 24 * 31);
        assert_eq!(dec.start(), Some(Utc.with_ymd_and_hms(2021, 12, 1, 0, 0, 0).unwrap()));
        assert_eq!(dec.end(), Some(Utc.with_ymd_and_hms(2021, 12, 31, 23, 0, 0).unwrap()));
        assert_eq!(dec.name(), Some("temperature_2m"));

        let both = series.months(december, january).unwrap();
        assert_eq!(both.len(), 24 * 32);
    }

    #[test]
    fn test_months_empty_ranges() {
        let series = across_new_year();
        let december = Month::new(2021, 12).unwrap();
        let november = Month::new(2021, 11).unwrap();
        assert!(series.months(december, november).unwrap().is_empty());

        let march = Month::new(2022, 3).unwrap();
        assert!(series.months(march, march).unwrap().is_empty());
    }

    #[test]
    fn test_available_and_first_month() {
        let series = across_new_year();
        let labels: Vec<String> = series.available_months().iter().map(|m| m.to_string()).collect();
        assert_eq!(labels, vec!["2021-11", "2021-12", "2022-01"]);

        let first = series.first_month().unwrap();
        assert_eq!(first.values(), (0..24).map(|h| h as f64).collect::<Vec<_>>());
        assert!(Series::default().first_month().unwrap().is_empty());
    }

    #[test]
    fn test_elapsed_hours() {
        let series = Series::hourly(t0(), &[0.0, 0.0, 0.0]);
        assert_eq!(series.elapsed_hours(), vec![0.0, 1.0, 2.0]);
        assert!(Series::default().elapsed_hours().is_empty());
    }
}
