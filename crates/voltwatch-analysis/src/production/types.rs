//! Production dataset rows and aggregate shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use voltwatch_core::types::{PriceArea, ProductionGroup};

/// One hourly production row, as delivered by the Elhub
/// `PRODUCTION_PER_GROUP_MBA_HOUR` dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    #[serde(rename = "pricearea")]
    pub price_area: PriceArea,
    #[serde(rename = "productiongroup")]
    pub production_group: ProductionGroup,
    #[serde(rename = "starttime")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "quantitykwh")]
    pub quantity_kwh: f64,
}

impl ProductionRecord {
    pub fn new(
        price_area: PriceArea,
        production_group: ProductionGroup,
        start_time: DateTime<Utc>,
        quantity_kwh: f64,
    ) -> Self {
        Self {
            price_area,
            production_group,
            start_time,
            quantity_kwh,
        }
    }
}

/// Yearly total of one production group within an area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTotal {
    pub group: ProductionGroup,
    pub kwh: f64,
    /// Fraction of the area total, in [0, 1].
    pub share: f64,
}
