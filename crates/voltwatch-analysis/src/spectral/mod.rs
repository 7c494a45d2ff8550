//! Spectral analysis.

pub mod spectrogram;

pub use spectrogram::{compute_spectrogram, Spectrogram, SpectrogramParams};
