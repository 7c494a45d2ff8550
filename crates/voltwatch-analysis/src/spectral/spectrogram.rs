//! Short-time power spectrum of an hourly series.
//!
//! Segments of `window_length` samples advance by
//! `window_length − floor(window_length × window_overlap)`. Each segment is
//! tapered with a symmetric Hann window and transformed with an FFT. Power
//! is the one-sided density `|X_k|² / Σw²` at 1 sample/hour.

use std::f64::consts::TAU;

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use serde::{Deserialize, Serialize};
use voltwatch_core::config::SpectrogramConfig;
use voltwatch_core::errors::AnalysisError;
use voltwatch_core::types::Series;

use crate::preprocess::fill_missing;

/// Sampling frequency in samples per hour.
const SAMPLE_RATE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrogramParams {
    /// Samples per segment, at least 2.
    pub window_length: usize,
    /// Fraction of a segment shared with the next, in [0, 1).
    pub window_overlap: f64,
}

impl Default for SpectrogramParams {
    fn default() -> Self {
        Self::from_config(&SpectrogramConfig::default())
    }
}

impl SpectrogramParams {
    pub fn from_config(config: &SpectrogramConfig) -> Self {
        Self {
            window_length: config.effective_window_length(),
            window_overlap: config.effective_window_overlap(),
        }
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.window_length < 2 {
            return Err(AnalysisError::invalid(
                "window_length",
                self.window_length as f64,
                "must be at least 2",
            ));
        }
        if !(self.window_overlap >= 0.0 && self.window_overlap < 1.0) {
            return Err(AnalysisError::invalid(
                "window_overlap",
                self.window_overlap,
                "must be in [0, 1)",
            ));
        }
        Ok(())
    }

    /// Samples shared by consecutive segments.
    pub fn overlap_samples(&self) -> usize {
        (self.window_length as f64 * self.window_overlap).floor() as usize
    }

    /// Distance between segment starts. Always at least 1 for valid params.
    pub fn step(&self) -> usize {
        self.window_length - self.overlap_samples()
    }
}

/// Power per (segment, frequency bin).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrogram {
    /// Bin frequencies in cycles per hour, `0 ..= 0.5`.
    pub frequencies: Vec<f64>,
    /// Segment centres in hours since the first sample.
    pub times: Vec<f64>,
    /// `power[segment][bin]`.
    pub power: Vec<Vec<f64>>,
}

impl Spectrogram {
    pub fn segment_count(&self) -> usize {
        self.times.len()
    }

    /// Index of the bin with the most power in `segment`.
    pub fn peak_bin(&self, segment: usize) -> Option<usize> {
        let row = self.power.get(segment)?;
        row.iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
    }

    /// Power of each bin averaged over all segments.
    pub fn mean_power(&self) -> Vec<f64> {
        let bins = self.frequencies.len();
        let mut mean = vec![0.0; bins];
        if self.power.is_empty() {
            return mean;
        }
        for row in &self.power {
            for (m, p) in mean.iter_mut().zip(row) {
                *m += p;
            }
        }
        let segments = self.power.len() as f64;
        mean.iter_mut().for_each(|m| *m /= segments);
        mean
    }
}

/// Symmetric Hann window of length `n`.
fn hann(n: usize) -> Vec<f64> {
    let denom = (n - 1) as f64;
    (0..n)
        .map(|i| 0.5 - 0.5 * (TAU * i as f64 / denom).cos())
        .collect()
}

/// Compute the spectrogram of `series`.
///
/// A series shorter than one window is zero-padded to a single segment.
pub fn compute_spectrogram(
    series: &Series,
    params: &SpectrogramParams,
) -> Result<Spectrogram, AnalysisError> {
    params.validate()?;
    if series.is_empty() {
        return Err(AnalysisError::too_short("spectrogram", 1, 0));
    }

    let mut values = fill_missing(series)?;
    let nfft = params.window_length;
    if values.len() < nfft {
        tracing::debug!(len = values.len(), nfft, "zero-padding series to one window");
        values.resize(nfft, 0.0);
    }

    let step = params.step();
    let window = hann(nfft);
    let window_energy: f64 = window.iter().map(|w| w * w).sum();
    let bins = nfft / 2 + 1;

    let frequencies: Vec<f64> = (0..bins)
        .map(|k| k as f64 * SAMPLE_RATE / nfft as f64)
        .collect();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(nfft);

    let segments = (values.len() - nfft) / step + 1;
    let mut times = Vec::with_capacity(segments);
    let mut power = Vec::with_capacity(segments);
    let mut buffer = vec![Complex::new(0.0, 0.0); nfft];

    for segment in 0..segments {
        let start = segment * step;
        for (slot, (x, w)) in buffer
            .iter_mut()
            .zip(values[start..start + nfft].iter().zip(&window))
        {
            *slot = Complex::new(x * w, 0.0);
        }
        fft.process(&mut buffer);

        let row: Vec<f64> = (0..bins)
            .map(|k| {
                let density = buffer[k].norm_sqr() / (SAMPLE_RATE * window_energy);
                let nyquist = nfft % 2 == 0 && k == nfft / 2;
                if k == 0 || nyquist {
                    density
                } else {
                    2.0 * density
                }
            })
            .collect();

        power.push(row);
        times.push((start as f64 + nfft as f64 / 2.0) / SAMPLE_RATE);
    }

    tracing::debug!(segments, bins, step, "spectrogram complete");

    Ok(Spectrogram {
        frequencies,
        times,
        power,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn hourly(values: &[f64]) -> Series {
        Series::hourly(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(), values)
    }

    fn params(window_length: usize, window_overlap: f64) -> SpectrogramParams {
        SpectrogramParams {
            window_length,
            window_overlap,
        }
    }

    #[test]
    fn test_step_and_overlap() {
        assert_eq!(params(168, 0.5).step(), 84);
        assert_eq!(params(10, 0.25).overlap_samples(), 2);
        assert_eq!(params(10, 0.0).step(), 10);
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let series = hourly(&[1.0; 10]);
        for bad in [params(1, 0.5), params(8, 1.0), params(8, -0.1), params(8, f64::NAN)] {
            let err = compute_spectrogram(&series, &bad).unwrap_err();
            assert!(matches!(err, AnalysisError::InvalidParameter { .. }), "{bad:?}");
        }
    }

    #[test]
    fn test_hann_is_symmetric_with_zero_ends() {
        let w = hann(9);
        assert_eq!(w[0], 0.0);
        assert!((w[4] - 1.0).abs() < 1e-12);
        for i in 0..9 {
            assert!((w[i] - w[8 - i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_segment_layout() {
        let spec = compute_spectrogram(&hourly(&vec![0.0; 100]), &params(20, 0.5)).unwrap();
        // Starts 0, 10, …, 80.
        assert_eq!(spec.segment_count(), 9);
        assert_eq!(spec.times[0], 10.0);
        assert_eq!(spec.times[8], 90.0);
        assert_eq!(spec.frequencies.len(), 11);
        assert_eq!(spec.frequencies[10], 0.5);
    }

    #[test]
    fn test_short_series_is_zero_padded() {
        let spec = compute_spectrogram(&hourly(&[1.0, 2.0, 3.0]), &params(16, 0.5)).unwrap();
        assert_eq!(spec.segment_count(), 1);
        assert_eq!(spec.power[0].len(), 9);
    }

    #[test]
    fn test_daily_cycle_peaks_at_one_per_day() {
        let values: Vec<f64> = (0..24 * 28)
            .map(|i| (TAU * i as f64 / 24.0).sin())
            .collect();
        let spec = compute_spectrogram(&hourly(&values), &params(168, 0.5)).unwrap();
        // 168 / 24 = bin 7.
        for segment in 0..spec.segment_count() {
            assert_eq!(spec.peak_bin(segment), Some(7));
        }
        let peak_freq = spec.frequencies[7];
        assert!((peak_freq - 1.0 / 24.0).abs() < 1e-12);
    }

    #[test]
    fn test_total_power_matches_parseval() {
        let values: Vec<f64> = (0..64).map(|i| ((i * 17) % 9) as f64 - 4.0).collect();
        let spec = compute_spectrogram(&hourly(&values), &params(64, 0.0)).unwrap();
        let window = hann(64);
        let energy: f64 = values.iter().zip(&window).map(|(x, w)| (x * w).powi(2)).sum();
        let window_energy: f64 = window.iter().map(|w| w * w).sum();
        // Σ_k |X_k|² = N Σ |x w|²; the one-sided doubling accounts for the mirrored bins.
        let total: f64 = spec.power[0].iter().sum();
        let expected = 64.0 * energy / window_energy;
        assert!((total - expected).abs() < 1e-9 * expected.max(1.0));
    }
}
