//! Respondent to segment mapping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{RespondentId, SegmentId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub respondent_id: RespondentId,
    pub segment_id: SegmentId,
}

/// Assignments in response-table row order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentAssignments {
    entries: Vec<Assignment>,
}

impl SegmentAssignments {
    pub fn new(entries: Vec<Assignment>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.entries.iter()
    }

    pub fn segment_of(&self, respondent: RespondentId) -> Option<SegmentId> {
        self.entries
            .iter()
            .find(|a| a.respondent_id == respondent)
            .map(|a| a.segment_id)
    }

    pub fn respondents_in(&self, segment: SegmentId) -> Vec<RespondentId> {
        self.entries
            .iter()
            .filter(|a| a.segment_id == segment)
            .map(|a| a.respondent_id)
            .collect()
    }

    pub fn segment_sizes(&self) -> BTreeMap<SegmentId, usize> {
        let mut sizes = BTreeMap::new();
        for a in &self.entries {
            *sizes.entry(a.segment_id).or_insert(0) += 1;
        }
        sizes
    }

    /// Distinct segment ids, ascending.
    pub fn unique_segments(&self) -> Vec<SegmentId> {
        self.segment_sizes().into_keys().collect()
    }

    /// Segment id to its respondents, in row order.
    pub fn by_segment(&self) -> BTreeMap<SegmentId, Vec<RespondentId>> {
        let mut grouped: BTreeMap<SegmentId, Vec<RespondentId>> = BTreeMap::new();
        for a in &self.entries {
            grouped.entry(a.segment_id).or_default().push(a.respondent_id);
        }
        grouped
    }
}

impl FromIterator<Assignment> for SegmentAssignments {
    fn from_iter<I: IntoIterator<Item = Assignment>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
