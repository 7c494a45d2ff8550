//! Core types shared by both detectors.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use voltwatch_core::types::Series;

/// Boolean flag per input sample, aligned with the series it was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutlierMask(Vec<bool>);

impl OutlierMask {
    pub fn new(flags: Vec<bool>) -> Self {
        Self(flags)
    }

    /// A mask with nothing flagged.
    pub fn none(len: usize) -> Self {
        Self(vec![false; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of flagged samples.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&flag| flag).count()
    }

    pub fn is_outlier(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    /// Indices of flagged samples, ascending.
    pub fn indices(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, &flag)| flag.then_some(i))
            .collect()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// Flagged fraction; zero for an empty mask.
    pub fn fraction(&self) -> f64 {
        if self.0.is_empty() {
            0.0
        } else {
            self.count() as f64 / self.0.len() as f64
        }
    }
}

impl From<Vec<bool>> for OutlierMask {
    fn from(flags: Vec<bool>) -> Self {
        Self(flags)
    }
}

/// Which detector flagged a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierMethod {
    TrendResidual,
    LocalOutlierFactor,
}

impl OutlierMethod {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TrendResidual => "trend_residual",
            Self::LocalOutlierFactor => "local_outlier_factor",
        }
    }
}

impl fmt::Display for OutlierMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One flagged sample, ready to be drawn on top of the series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierPoint {
    /// Index into the original series.
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    /// The (missing-filled) value that was flagged.
    pub value: f64,
    pub method: OutlierMethod,
}

/// Pair each flagged index with its timestamp and filled value.
pub(crate) fn collect_points(
    series: &Series,
    values: &[f64],
    mask: &OutlierMask,
    method: OutlierMethod,
) -> Vec<OutlierPoint> {
    let samples = series.samples();
    mask.indices()
        .into_iter()
        .filter(|&i| i < samples.len() && i < values.len())
        .map(|i| OutlierPoint {
            index: i,
            timestamp: samples[i].timestamp,
            value: values[i],
            method,
        })
        .collect()
}
