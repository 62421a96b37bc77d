//! 8-step segmentation pipeline.
//!
//! Step 1: Preflight → Step 2: Standardize → Step 3: PCA component count →
//! Step 4: Factor loadings → Step 5: Key outcomes → Step 6: Opportunity
//! profiles → Step 7: Assign segments → Step 8: Characterize segments
//!
//! Each step reads artifacts written by earlier steps from the
//! [`PipelineContext`] and writes its own; no step may run out of order.

pub mod artifacts;
pub mod context;
pub mod runner;
pub mod step;
pub mod steps;

pub use artifacts::{
    FactorLoadings, OpportunityProfiles, SegmentProfileRow, SegmentSize, SegmentedTable,
    StandardizedImportance,
};
pub use context::{PipelineContext, PipelineOutputs};
pub use runner::{PipelineRunner, RunReport, StepTiming};
pub use step::Step;
