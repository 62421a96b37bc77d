//! Per-segment outcome characterization.

use serde::{Deserialize, Serialize};

use crate::types::{OutcomeId, SegmentId};

/// Aggregate scores of one outcome within one segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeScore {
    pub outcome_id: OutcomeId,
    /// Satisfaction Top-2-Box percentage, 1 decimal.
    pub sat_t2b: f64,
    /// Importance Top-2-Box percentage, 1 decimal.
    pub imp_t2b: f64,
    /// Aggregate opportunity on the 0-20 scale, 2 decimals.
    pub opportunity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub segment_id: SegmentId,
    /// Share of all respondents, 1 decimal.
    pub size_pct: f64,
    pub outcomes: Vec<OutcomeScore>,
}

impl Segment {
    pub fn outcome(&self, outcome_id: OutcomeId) -> Option<&OutcomeScore> {
        self.outcomes.iter().find(|o| o.outcome_id == outcome_id)
    }
}

/// Segments ordered by id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SegmentModel {
    pub segments: Vec<Segment>,
}

impl SegmentModel {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn get_segment(&self, segment_id: SegmentId) -> Option<&Segment> {
        self.segments.iter().find(|s| s.segment_id == segment_id)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Sum of segment size percentages; ~100 up to rounding.
    pub fn total_size_pct(&self) -> f64 {
        self.segments.iter().map(|s| s.size_pct).sum()
    }
}
