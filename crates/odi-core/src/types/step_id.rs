//! Identifiers of the fixed pipeline stages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The eight segmentation stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    ValidatePreflight,
    StandardizeImportance,
    ComputePcaComponents,
    ComputeFactorLoadings,
    SelectKeyOutcomes,
    ComputeOpportunityProfiles,
    AssignSegments,
    CharacterizeSegments,
}

impl StepId {
    pub const ORDER: [StepId; 8] = [
        Self::ValidatePreflight,
        Self::StandardizeImportance,
        Self::ComputePcaComponents,
        Self::ComputeFactorLoadings,
        Self::SelectKeyOutcomes,
        Self::ComputeOpportunityProfiles,
        Self::AssignSegments,
        Self::CharacterizeSegments,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::ValidatePreflight => "validate_preflight",
            Self::StandardizeImportance => "standardize_importance",
            Self::ComputePcaComponents => "compute_pca_components",
            Self::ComputeFactorLoadings => "compute_factor_loadings",
            Self::SelectKeyOutcomes => "select_key_outcomes",
            Self::ComputeOpportunityProfiles => "compute_opportunity_profiles",
            Self::AssignSegments => "assign_segments",
            Self::CharacterizeSegments => "characterize_segments",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
