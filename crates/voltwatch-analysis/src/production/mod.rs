//! Production dataset aggregation: per-group series, yearly shares, and
//! monthly hourly lines for one price area.

pub mod aggregate;
pub mod types;

pub use aggregate::{
    available_areas, available_groups, group_totals, monthly_hourly, production_series,
};
pub use types::{GroupTotal, ProductionRecord};
