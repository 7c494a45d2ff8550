//! Filtering and totals over production records.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Duration, Utc};
use voltwatch_core::errors::SeriesError;
use voltwatch_core::types::{Month, PriceArea, ProductionGroup, Sample, Series};

use super::types::{GroupTotal, ProductionRecord};

/// Hourly series of one area and production group.
///
/// Rows sharing a start time are summed. The result sits on a regular hourly
/// grid; hours without rows become missing samples.
pub fn production_series(
    records: &[ProductionRecord],
    area: PriceArea,
    group: ProductionGroup,
) -> Result<Series, SeriesError> {
    let hourly = sum_by_hour(
        records
            .iter()
            .filter(|r| r.price_area == area && r.production_group == group),
    );
    if hourly.is_empty() {
        return Err(SeriesError::EmptySelection {
            area: area.to_string(),
            group: group.to_string(),
        });
    }
    series_from_hours(hourly, group)?.fill_gaps(Duration::hours(1))
}

/// Per-group production of `area` during calendar `year`, largest first.
///
/// Empty when the area has no rows in that year.
pub fn group_totals(records: &[ProductionRecord], area: PriceArea, year: i32) -> Vec<GroupTotal> {
    let (start, end) = match (year_start(year), year_start(year + 1)) {
        (Some(start), Some(end)) => (start, end),
        _ => return Vec::new(),
    };

    let mut sums: BTreeMap<ProductionGroup, f64> = BTreeMap::new();
    for record in records.iter().filter(|r| {
        r.price_area == area
            && r.start_time >= start
            && r.start_time < end
            && r.quantity_kwh.is_finite()
    }) {
        *sums.entry(record.production_group).or_insert(0.0) += record.quantity_kwh;
    }

    let area_total: f64 = sums.values().sum();
    let mut totals: Vec<GroupTotal> = sums
        .into_iter()
        .map(|(group, kwh)| GroupTotal {
            group,
            kwh,
            share: if area_total > 0.0 { kwh / area_total } else { 0.0 },
        })
        .collect();
    totals.sort_by(|a, b| b.kwh.total_cmp(&a.kwh).then(a.group.cmp(&b.group)));
    totals
}

/// Hourly production per group for one calendar month, one series per group.
///
/// An empty `groups` slice selects every group. Groups without rows in the
/// month are left out, so the result may be empty.
pub fn monthly_hourly(
    records: &[ProductionRecord],
    area: PriceArea,
    year: i32,
    month: u32,
    groups: &[ProductionGroup],
) -> Result<Vec<Series>, SeriesError> {
    let (start, end) = Month::new(year, month)?.bounds()?;

    let mut by_group: BTreeMap<ProductionGroup, Vec<&ProductionRecord>> = BTreeMap::new();
    for record in records.iter().filter(|r| {
        r.price_area == area
            && r.start_time >= start
            && r.start_time < end
            && (groups.is_empty() || groups.contains(&r.production_group))
    }) {
        by_group.entry(record.production_group).or_default().push(record);
    }

    by_group
        .into_iter()
        .map(|(group, rows)| series_from_hours(sum_by_hour(rows.into_iter()), group))
        .collect()
}

/// Production groups present for `area`, sorted.
pub fn available_groups(records: &[ProductionRecord], area: PriceArea) -> Vec<ProductionGroup> {
    records
        .iter()
        .filter(|r| r.price_area == area)
        .map(|r| r.production_group)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Price areas present in the records, sorted.
pub fn available_areas(records: &[ProductionRecord]) -> Vec<PriceArea> {
    records
        .iter()
        .map(|r| r.price_area)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn sum_by_hour<'a>(
    rows: impl Iterator<Item = &'a ProductionRecord>,
) -> BTreeMap<DateTime<Utc>, f64> {
    let mut hourly = BTreeMap::new();
    for row in rows {
        *hourly.entry(row.start_time).or_insert(0.0) += row.quantity_kwh;
    }
    hourly
}

fn series_from_hours(
    hourly: BTreeMap<DateTime<Utc>, f64>,
    group: ProductionGroup,
) -> Result<Series, SeriesError> {
    let samples = hourly
        .into_iter()
        .map(|(timestamp, kwh)| Sample::new(timestamp, kwh))
        .collect();
    Ok(Series::new(samples)?.with_name(group.name()))
}

fn year_start(year: i32) -> Option<DateTime<Utc>> {
    let (start, _) = Month::new(year, 1).ok()?.bounds().ok()?;
    Some(start)
}
