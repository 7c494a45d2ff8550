//! Orthonormal DCT-II and its inverse (DCT-III), computed through a
//! 2N-point FFT of the even extension.
//!
//! Coefficient `k` of the forward transform is
//! `c_k · Σ_j x_j cos(π k (2j + 1) / 2N)` with `c_0 = √(1/N)` and
//! `c_k = √(2/N)` otherwise, so the transform matrix is orthogonal and
//! the inverse is its transpose.

use std::f64::consts::PI;

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Orthonormal DCT-II. Coefficients run from lowest to highest frequency.
pub fn dct_ortho(input: &[f64]) -> Vec<f64> {
    let n = input.len();
    if n == 0 {
        return Vec::new();
    }

    // Even extension: x_0 … x_{N-1}, x_{N-1} … x_0
    let mut buffer: Vec<Complex<f64>> = input
        .iter()
        .chain(input.iter().rev())
        .map(|&x| Complex::new(x, 0.0))
        .collect();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(2 * n);
    fft.process(&mut buffer);

    let n_f = n as f64;
    let first_scale = (1.0 / n_f).sqrt();
    let rest_scale = (2.0 / n_f).sqrt();

    (0..n)
        .map(|k| {
            let twiddle = Complex::from_polar(1.0, -PI * k as f64 / (2.0 * n_f));
            let raw = 0.5 * (twiddle * buffer[k]).re;
            raw * if k == 0 { first_scale } else { rest_scale }
        })
        .collect()
}

/// Orthonormal DCT-III, the exact inverse of [`dct_ortho`].
pub fn idct_ortho(coeffs: &[f64]) -> Vec<f64> {
    let n = coeffs.len();
    if n == 0 {
        return Vec::new();
    }

    let n_f = n as f64;
    let first_scale = (1.0 / n_f).sqrt();
    let rest_scale = (2.0 / n_f).sqrt();

    let mut buffer: Vec<Complex<f64>> = vec![Complex::new(0.0, 0.0); 2 * n];
    for (k, &c) in coeffs.iter().enumerate() {
        let scaled = c * if k == 0 { first_scale } else { rest_scale };
        buffer[k] = Complex::from_polar(scaled, PI * k as f64 / (2.0 * n_f));
    }

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_inverse(2 * n);
    fft.process(&mut buffer);

    buffer.iter().take(n).map(|c| c.re).collect()
}

/// Reconstruct `values` from its `keep` lowest DCT coefficients.
///
/// `keep` is clamped to `[1, N]`.
pub fn low_frequency_part(values: &[f64], keep: usize) -> Vec<f64> {
    let mut coeffs = dct_ortho(values);
    let keep = keep.clamp(1, coeffs.len().max(1));
    for c in coeffs.iter_mut().skip(keep) {
        *c = 0.0;
    }
    idct_ortho(&coeffs)
}
