//! Seasonal-trend decomposition.

mod loess;
pub mod stl;

pub use stl::{decompose_stl, StlDecomposition, StlParams};
