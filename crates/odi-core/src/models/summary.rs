//! Companion summary artifact of a full segmentation run.

use serde::{Deserialize, Serialize};

use crate::config::SegmentBuilderConfig;

/// The best viable configuration found for one segment count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentCountSummary {
    pub k: usize,
    /// Mean silhouette, 4 decimals.
    pub silhouette: f64,
    /// Segment size percentages, 1 decimal.
    pub segment_sizes: Vec<f64>,
    /// Weighted selection score, 4 decimals.
    pub combined_score: f64,
    pub config: SegmentBuilderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationSummary {
    pub per_segment_count: Vec<SegmentCountSummary>,
    /// Segment count of the selected configuration.
    pub recommended: usize,
    pub candidates_evaluated: usize,
    pub engine_version: String,
}

impl SegmentationSummary {
    pub fn recommended_entry(&self) -> Option<&SegmentCountSummary> {
        self.per_segment_count
            .iter()
            .find(|s| s.k == self.recommended)
    }
}
