//! Price areas and production groups of the Elhub production dataset.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SeriesError;

/// Norwegian electricity bidding zone.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum PriceArea {
    #[default]
    #[serde(rename = "NO1")]
    No1,
    #[serde(rename = "NO2")]
    No2,
    #[serde(rename = "NO3")]
    No3,
    #[serde(rename = "NO4")]
    No4,
    #[serde(rename = "NO5")]
    No5,
}

impl PriceArea {
    pub const ALL: [PriceArea; 5] = [
        PriceArea::No1,
        PriceArea::No2,
        PriceArea::No3,
        PriceArea::No4,
        PriceArea::No5,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::No1 => "NO1",
            Self::No2 => "NO2",
            Self::No3 => "NO3",
            Self::No4 => "NO4",
            Self::No5 => "NO5",
        }
    }

    /// Reference city whose weather stands in for the whole area.
    pub fn reference_city(&self) -> &'static str {
        match self {
            Self::No1 => "Oslo",
            Self::No2 => "Kristiansand",
            Self::No3 => "Trondheim",
            Self::No4 => "Tromsø",
            Self::No5 => "Bergen",
        }
    }

    /// WGS84 (latitude, longitude) of the reference city.
    pub fn coordinates(&self) -> (f64, f64) {
        match self {
            Self::No1 => (59.91390, 10.75220),
            Self::No2 => (58.14670, 7.99560),
            Self::No3 => (63.43050, 10.39510),
            Self::No4 => (69.64920, 18.95600),
            Self::No5 => (60.39299, 5.32415),
        }
    }
}

impl fmt::Display for PriceArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PriceArea {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|area| area.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| SeriesError::UnknownPriceArea(s.to_string()))
    }
}

/// Production group as reported by Elhub (`productiongroup`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductionGroup {
    Hydro,
    Wind,
    Solar,
    Thermal,
    Other,
}

impl ProductionGroup {
    pub const ALL: [ProductionGroup; 5] = [
        ProductionGroup::Hydro,
        ProductionGroup::Wind,
        ProductionGroup::Solar,
        ProductionGroup::Thermal,
        ProductionGroup::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Hydro => "hydro",
            Self::Wind => "wind",
            Self::Solar => "solar",
            Self::Thermal => "thermal",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ProductionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProductionGroup {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|group| group.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| SeriesError::UnknownProductionGroup(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_area_parse_is_case_insensitive() {
        assert_eq!("no3".parse::<PriceArea>().unwrap(), PriceArea::No3);
        assert_eq!(" NO5 ".parse::<PriceArea>().unwrap(), PriceArea::No5);
    }

    #[test]
    fn test_unknown_price_area_is_rejected() {
        let err = "SE3".parse::<PriceArea>().unwrap_err();
        assert_eq!(err, SeriesError::UnknownPriceArea("SE3".to_string()));
    }

    #[test]
    fn test_every_area_has_norwegian_coordinates() {
        for area in PriceArea::ALL {
            let (lat, lon) = area.coordinates();
            assert!((57.0..72.0).contains(&lat), "{area} latitude {lat}");
            assert!((4.0..32.0).contains(&lon), "{area} longitude {lon}");
        }
    }

    #[test]
    fn test_production_group_round_trips_through_display() {
        for group in ProductionGroup::ALL {
            assert_eq!(group.to_string().parse::<ProductionGroup>().unwrap(), group);
        }
        assert_eq!("Wind".parse::<ProductionGroup>().unwrap(), ProductionGroup::Wind);
    }
}
