//! Density-based outlier detection with the local outlier factor (LOF).
//!
//! Every value is a point on the real line. A point's local reachability
//! density is compared with that of its k nearest neighbours; points much
//! sparser than their neighbourhood score well above 1. The offset is the
//! `contamination` percentile of the negated scores, interpolated linearly;
//! points whose negated score falls strictly below it are outliers.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use voltwatch_core::config::DensityConfig;
use voltwatch_core::constants::{LOF_DISTANCE_EPSILON, MIN_NEIGHBOR_COUNT};
use voltwatch_core::errors::AnalysisError;
use voltwatch_core::types::Series;

use super::robust::percentile;
use super::types::{collect_points, OutlierMask, OutlierMethod, OutlierPoint};
use crate::preprocess::fill_missing;

const OPERATION: &str = "density detection";

/// Smallest series the detector accepts: one point plus `MIN_NEIGHBOR_COUNT` neighbours.
pub const MIN_DENSITY_POINTS: usize = MIN_NEIGHBOR_COUNT + 1;

/// Parameters of the density detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityParams {
    /// Target outlier fraction, in (0, 0.5).
    pub contamination: f64,
    /// Neighbours per point, at least 5. Clamped to N − 1 for short series.
    pub neighbor_count: usize,
}

impl Default for DensityParams {
    fn default() -> Self {
        Self::from_config(&DensityConfig::default())
    }
}

impl DensityParams {
    pub fn from_config(config: &DensityConfig) -> Self {
        Self {
            contamination: config.effective_contamination(),
            neighbor_count: config.effective_neighbor_count(),
        }
    }

    /// Reject out-of-range parameters. Nothing is clamped here.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !(self.contamination > 0.0 && self.contamination < 0.5) {
            return Err(AnalysisError::invalid(
                "contamination",
                self.contamination,
                "must be in (0, 0.5)",
            ));
        }
        if self.neighbor_count < MIN_NEIGHBOR_COUNT {
            return Err(AnalysisError::invalid(
                "neighbor_count",
                self.neighbor_count as f64,
                "must be at least 5",
            ));
        }
        Ok(())
    }

    /// Neighbourhood size actually used for `n` points: `[5, n − 1]`.
    pub fn effective_neighbors(&self, n: usize) -> usize {
        self.neighbor_count
            .min(n.saturating_sub(1))
            .max(MIN_NEIGHBOR_COUNT)
    }
}

/// Fixed-shape summary of one detector run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensitySummary {
    pub n_points: usize,
    pub n_outliers: usize,
    /// Realised outlier fraction.
    pub outlier_fraction: f64,
    /// Neighbourhood size after clamping.
    pub neighbor_count: usize,
    /// Smallest flagged value; absent when nothing is flagged.
    pub min_outlier: Option<f64>,
    /// Largest flagged value; absent when nothing is flagged.
    pub max_outlier: Option<f64>,
}

/// Everything the density view draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityReport {
    /// Input values with missing slots filled.
    pub values: Vec<f64>,
    /// Local outlier factor per point; about 1 inside dense regions.
    pub scores: Vec<f64>,
    /// Points scoring strictly above this are outliers.
    pub score_cutoff: f64,
    pub mask: OutlierMask,
    pub summary: DensitySummary,
}

impl DensityReport {
    pub fn outlier_points(&self, series: &Series) -> Vec<OutlierPoint> {
        collect_points(series, &self.values, &self.mask, OutlierMethod::LocalOutlierFactor)
    }
}

/// Run the density detector on `series`.
pub fn detect_density(
    series: &Series,
    params: &DensityParams,
) -> Result<DensityReport, AnalysisError> {
    params.validate()?;
    if series.len() < MIN_DENSITY_POINTS {
        return Err(AnalysisError::too_short(OPERATION, MIN_DENSITY_POINTS, series.len()));
    }

    let values = fill_missing(series)?;
    let n = values.len();
    let k = params.effective_neighbors(n);
    if k != params.neighbor_count {
        tracing::debug!(requested = params.neighbor_count, used = k, "clamped neighbour count");
    }

    let scores = local_outlier_factors(&values, k);

    let score_cutoff = score_cutoff(&scores, params.contamination);
    let mask = OutlierMask::new(scores.iter().map(|&s| s > score_cutoff).collect());

    let flagged = mask.indices();
    let min_outlier = flagged.iter().map(|&i| values[i]).reduce(f64::min);
    let max_outlier = flagged.iter().map(|&i| values[i]).reduce(f64::max);

    let summary = DensitySummary {
        n_points: n,
        n_outliers: flagged.len(),
        outlier_fraction: mask.fraction(),
        neighbor_count: k,
        min_outlier,
        max_outlier,
    };

    tracing::debug!(
        n_points = n,
        n_outliers = summary.n_outliers,
        score_cutoff,
        k,
        "density detection complete"
    );

    Ok(DensityReport {
        values,
        scores,
        score_cutoff,
        mask,
        summary,
    })
}

/// LOF cutoff for a contamination fraction.
///
/// The offset is the `100 × contamination` percentile of the negated scores;
/// a negated score strictly below it is an outlier, so the cutoff on the
/// scores themselves is the negated offset, compared strictly.
fn score_cutoff(scores: &[f64], contamination: f64) -> f64 {
    let mut negated: Vec<f64> = scores.iter().map(|s| -s).collect();
    negated.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    -percentile(&negated, 100.0 * contamination)
}

/// Neighbour lists of a 1-D point set.
struct Neighborhoods {
    /// `indices[i]`: the k nearest neighbours of point i, nearest first.
    indices: Vec<Vec<usize>>,
    /// Distance from each point to its k-th nearest neighbour.
    k_distance: Vec<f64>,
}

/// k nearest neighbours of every point, excluding the point itself.
///
/// In one dimension the neighbours of a point are a contiguous run of the
/// sorted order, so a two-pointer walk outward from each point finds them
/// in O(k). Equal distances prefer the lower value.
fn nearest_neighbors(values: &[f64], k: usize) -> Neighborhoods {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut indices = vec![Vec::new(); n];
    let mut k_distance = vec![0.0; n];

    for (pos, &point) in order.iter().enumerate() {
        let x = values[point];
        let mut neighbors = Vec::with_capacity(k);
        let mut left = pos.checked_sub(1);
        let mut right = pos + 1;
        let mut farthest = 0.0_f64;

        while neighbors.len() < k {
            let left_dist = left.map(|l| x - values[order[l]]);
            let right_dist = (right < n).then(|| values[order[right]] - x);
            let take_left = match (left_dist, right_dist) {
                (Some(l), Some(r)) => l <= r,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };
            if take_left {
                if let (Some(l), Some(d)) = (left, left_dist) {
                    neighbors.push(order[l]);
                    farthest = farthest.max(d);
                    left = l.checked_sub(1);
                }
            } else if let Some(d) = right_dist {
                neighbors.push(order[right]);
                farthest = farthest.max(d);
                right += 1;
            }
        }

        indices[point] = neighbors;
        k_distance[point] = farthest;
    }

    Neighborhoods {
        indices,
        k_distance,
    }
}

/// Local outlier factor of every value with neighbourhood size `k`.
fn local_outlier_factors(values: &[f64], k: usize) -> Vec<f64> {
    let hood = nearest_neighbors(values, k);

    let lrd: Vec<f64> = values
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let neighbors = &hood.indices[i];
            let total: f64 = neighbors
                .iter()
                .map(|&o| hood.k_distance[o].max((x - values[o]).abs()))
                .sum();
            1.0 / (total / neighbors.len() as f64 + LOF_DISTANCE_EPSILON)
        })
        .collect();

    hood.indices
        .iter()
        .enumerate()
        .map(|(i, neighbors)| {
            let mean_neighbor_lrd =
                neighbors.iter().map(|&o| lrd[o]).sum::<f64>() / neighbors.len() as f64;
            mean_neighbor_lrd / lrd[i]
        })
        .collect()
}
