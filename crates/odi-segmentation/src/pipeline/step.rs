//! The closed set of pipeline stages.

use odi_core::config::{PcaMethod, SegmentBuilderConfig};
use odi_core::errors::StepError;
use odi_core::types::StepId;

use super::context::PipelineContext;
use super::steps::{
    assign_segments, characterize, factor_loadings, key_outcomes, opportunity_profiles,
    pca_components, preflight, standardize,
};

/// One stage plus the configuration it runs with.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    ValidatePreflight {
        num_segments: usize,
        min_per_segment: usize,
        strict: bool,
    },
    StandardizeImportance,
    ComputePcaComponents {
        method: PcaMethod,
    },
    ComputeFactorLoadings,
    SelectKeyOutcomes {
        max_outcomes_per_component: usize,
        max_cross_loading: f64,
        min_primary_loading: f64,
    },
    ComputeOpportunityProfiles,
    AssignSegments {
        num_segments: usize,
        seed: u64,
    },
    CharacterizeSegments {
        top_box_threshold: u8,
    },
}

impl Step {
    /// The fixed eight-stage sequence for a builder configuration.
    pub fn sequence(config: &SegmentBuilderConfig) -> Vec<Step> {
        vec![
            Step::ValidatePreflight {
                num_segments: config.num_segments,
                min_per_segment: config.min_respondents_per_segment,
                strict: config.strict_preflight,
            },
            Step::StandardizeImportance,
            Step::ComputePcaComponents {
                method: config.pca_method,
            },
            Step::ComputeFactorLoadings,
            Step::SelectKeyOutcomes {
                max_outcomes_per_component: config.max_outcomes_per_component,
                max_cross_loading: config.max_cross_loading,
                min_primary_loading: config.min_primary_loading,
            },
            Step::ComputeOpportunityProfiles,
            Step::AssignSegments {
                num_segments: config.num_segments,
                seed: config.random_seed,
            },
            Step::CharacterizeSegments {
                top_box_threshold: config.top_box_threshold,
            },
        ]
    }

    pub fn id(&self) -> StepId {
        match self {
            Self::ValidatePreflight { .. } => StepId::ValidatePreflight,
            Self::StandardizeImportance => StepId::StandardizeImportance,
            Self::ComputePcaComponents { .. } => StepId::ComputePcaComponents,
            Self::ComputeFactorLoadings => StepId::ComputeFactorLoadings,
            Self::SelectKeyOutcomes { .. } => StepId::SelectKeyOutcomes,
            Self::ComputeOpportunityProfiles => StepId::ComputeOpportunityProfiles,
            Self::AssignSegments { .. } => StepId::AssignSegments,
            Self::CharacterizeSegments { .. } => StepId::CharacterizeSegments,
        }
    }

    pub fn run(&self, ctx: &mut PipelineContext) -> Result<(), StepError> {
        match *self {
            Self::ValidatePreflight {
                num_segments,
                min_per_segment,
                strict,
            } => preflight::run(ctx, num_segments, min_per_segment, strict),
            Self::StandardizeImportance => standardize::run(ctx),
            Self::ComputePcaComponents { method } => pca_components::run(ctx, method),
            Self::ComputeFactorLoadings => factor_loadings::run(ctx),
            Self::SelectKeyOutcomes {
                max_outcomes_per_component,
                max_cross_loading,
                min_primary_loading,
            } => {
                let thresholds =
                    key_outcomes::LoadingThresholds::new(max_cross_loading, min_primary_loading)?;
                key_outcomes::run(ctx, max_outcomes_per_component, thresholds)
            }
            Self::ComputeOpportunityProfiles => opportunity_profiles::run(ctx),
            Self::AssignSegments { num_segments, seed } => {
                assign_segments::run(ctx, num_segments, seed)
            }
            Self::CharacterizeSegments { top_box_threshold } => {
                characterize::run(ctx, top_box_threshold)
            }
        }
    }
}
