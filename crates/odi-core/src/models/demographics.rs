//! Per-segment demographic breakdowns.

use serde::{Deserialize, Serialize};

/// Share of a segment's respondents that gave one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub label: String,
    /// Percentage of respondents with a valid answer, 1 decimal.
    pub pct: f64,
}

/// Answer distribution of one codebook dimension, largest share first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionBreakdown {
    pub dimension: String,
    pub shares: Vec<CategoryShare>,
}

impl DimensionBreakdown {
    pub fn share(&self, label: &str) -> Option<f64> {
        self.shares.iter().find(|s| s.label == label).map(|s| s.pct)
    }
}
