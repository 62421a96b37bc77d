//! Opportunity zones and the zoned segment model.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::demographics::DimensionBreakdown;
use super::segment_model::OutcomeScore;
use crate::types::SegmentId;

/// Where a segment-outcome pair falls on the importance x satisfaction grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    #[serde(rename = "UNDER")]
    Underserved,
    #[serde(rename = "OVER")]
    Overserved,
    #[serde(rename = "TABLE")]
    TableStakes,
    #[serde(rename = "APPROP")]
    AppropriatelyServed,
}

impl Zone {
    pub const ALL: [Zone; 4] = [
        Self::Underserved,
        Self::Overserved,
        Self::TableStakes,
        Self::AppropriatelyServed,
    ];

    /// Short wire code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Underserved => "UNDER",
            Self::Overserved => "OVER",
            Self::TableStakes => "TABLE",
            Self::AppropriatelyServed => "APPROP",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Underserved => "UNDERSERVED",
            Self::Overserved => "OVERSERVED",
            Self::TableStakes => "TABLE_STAKES",
            Self::AppropriatelyServed => "APPROPRIATELY_SERVED",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZonedOutcome {
    #[serde(flatten)]
    pub score: OutcomeScore,
    pub zone: Zone,
    /// Outcome statement, filled in by enrichment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Outcomes of one zone, with the zone's share of the segment's outcomes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ZoneBucket {
    pub pct: f64,
    pub outcomes: Vec<ZonedOutcome>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ZoneBuckets {
    pub underserved: ZoneBucket,
    pub overserved: ZoneBucket,
    pub table_stakes: ZoneBucket,
    pub appropriate: ZoneBucket,
}

impl ZoneBuckets {
    pub fn bucket(&self, zone: Zone) -> &ZoneBucket {
        match zone {
            Zone::Underserved => &self.underserved,
            Zone::Overserved => &self.overserved,
            Zone::TableStakes => &self.table_stakes,
            Zone::AppropriatelyServed => &self.appropriate,
        }
    }

    pub fn bucket_mut(&mut self, zone: Zone) -> &mut ZoneBucket {
        match zone {
            Zone::Underserved => &mut self.underserved,
            Zone::Overserved => &mut self.overserved,
            Zone::TableStakes => &mut self.table_stakes,
            Zone::AppropriatelyServed => &mut self.appropriate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZonedSegment {
    pub segment_id: SegmentId,
    pub size_pct: f64,
    pub outcomes: Vec<ZonedOutcome>,
    pub zones: ZoneBuckets,
    /// Demographic profile of the segment's respondents, filled in by
    /// enrichment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demographics: Option<Vec<DimensionBreakdown>>,
}

impl ZonedSegment {
    /// Every zoned outcome, including the copies held in the zone buckets.
    pub fn outcomes_mut(&mut self) -> impl Iterator<Item = &mut ZonedOutcome> {
        let ZoneBuckets {
            underserved,
            overserved,
            table_stakes,
            appropriate,
        } = &mut self.zones;
        self.outcomes.iter_mut().chain(
            [underserved, overserved, table_stakes, appropriate]
                .into_iter()
                .flat_map(|bucket| bucket.outcomes.iter_mut()),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ZonedSegmentModel {
    pub segments: Vec<ZonedSegment>,
}

impl ZonedSegmentModel {
    pub fn get_segment(&self, segment_id: SegmentId) -> Option<&ZonedSegment> {
        self.segments.iter().find(|s| s.segment_id == segment_id)
    }
}
