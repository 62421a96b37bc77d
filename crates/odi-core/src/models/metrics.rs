//! Clustering quality metrics of one fit.

use serde::{Deserialize, Serialize};

use crate::config::ClusteringMethod;

/// Computed over the opportunity-score feature space of the key outcomes.
///
/// Silhouette values are NaN when undefined (single segment, or no more
/// samples than segments).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationMetrics {
    pub method: ClusteringMethod,
    pub k: usize,
    pub random_seed: u64,
    pub silhouette_mean: f64,
    /// Mean silhouette per cluster id `0..k`; NaN for empty clusters.
    pub silhouette_by_cluster: Vec<f64>,
    /// Percentage of respondents per cluster id `0..k`.
    pub cluster_sizes_pct: Vec<f64>,
    pub min_cluster_pct: f64,
}

impl SegmentationMetrics {
    pub fn max_cluster_pct(&self) -> f64 {
        self.cluster_sizes_pct
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn has_silhouette(&self) -> bool {
        self.silhouette_mean.is_finite()
    }
}
