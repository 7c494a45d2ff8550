//! Frequency transforms.

pub mod dct;

pub use dct::{dct_ortho, idct_ortho, low_frequency_part};
