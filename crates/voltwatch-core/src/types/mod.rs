//! Domain types shared across voltwatch crates.

pub mod area;
pub mod month;
pub mod series;

pub use area::{PriceArea, ProductionGroup};
pub use month::Month;
pub use series::{Sample, Series};
