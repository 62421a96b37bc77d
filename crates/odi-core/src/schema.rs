//! Column naming conventions and the closed registry of pipeline artifacts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::OutcomeId;

pub const RESPONDENT_ID_COLUMN: &str = "respondentId";
pub const SEGMENT_ID_COLUMN: &str = "segmentId";
pub const IMPORTANCE_PREFIX: &str = "outcomeImportance_";
pub const SATISFACTION_PREFIX: &str = "outcomeSatisfaction_";
pub const OPPORTUNITY_PREFIX: &str = "opportunity_";
pub const COMPONENT_PREFIX: &str = "pc_";

/// Which rating a wide-format column carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingKind {
    Importance,
    Satisfaction,
}

impl RatingKind {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Importance => IMPORTANCE_PREFIX,
            Self::Satisfaction => SATISFACTION_PREFIX,
        }
    }
}

pub fn importance_column(outcome: OutcomeId) -> String {
    format!("{IMPORTANCE_PREFIX}{outcome}")
}

pub fn satisfaction_column(outcome: OutcomeId) -> String {
    format!("{SATISFACTION_PREFIX}{outcome}")
}

pub fn opportunity_column(outcome: OutcomeId) -> String {
    format!("{OPPORTUNITY_PREFIX}{outcome}")
}

/// 1-based principal component label, `pc_1`, `pc_2`, ...
pub fn component_label(index: usize) -> String {
    format!("{COMPONENT_PREFIX}{}", index + 1)
}

/// Parse a rating column name back into its kind and outcome id.
///
/// Returns `None` for anything that is not `outcomeImportance_<id>` or
/// `outcomeSatisfaction_<id>` with a non-negative integer id.
pub fn parse_rating_column(name: &str) -> Option<(RatingKind, OutcomeId)> {
    for kind in [RatingKind::Importance, RatingKind::Satisfaction] {
        if let Some(rest) = name.strip_prefix(kind.prefix()) {
            return rest.parse::<u32>().ok().map(|id| (kind, OutcomeId::new(id)));
        }
    }
    None
}

/// Named intermediate artifacts written into the pipeline context.
///
/// Each key is written at most once per fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKey {
    StandardizedImportance,
    ComponentCount,
    FactorLoadings,
    KeyOutcomes,
    OpportunityProfiles,
    SegmentLabels,
    SegmentedTable,
    SegmentProfiles,
    SegmentSizes,
}

impl ArtifactKey {
    pub const ALL: [ArtifactKey; 9] = [
        Self::StandardizedImportance,
        Self::ComponentCount,
        Self::FactorLoadings,
        Self::KeyOutcomes,
        Self::OpportunityProfiles,
        Self::SegmentLabels,
        Self::SegmentedTable,
        Self::SegmentProfiles,
        Self::SegmentSizes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::StandardizedImportance => "standardized_importance",
            Self::ComponentCount => "component_count",
            Self::FactorLoadings => "factor_loadings",
            Self::KeyOutcomes => "key_outcomes",
            Self::OpportunityProfiles => "opportunity_profiles",
            Self::SegmentLabels => "segment_labels",
            Self::SegmentedTable => "segmented_table",
            Self::SegmentProfiles => "segment_profiles",
            Self::SegmentSizes => "segment_sizes",
        }
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
