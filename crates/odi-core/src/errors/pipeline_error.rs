//! Pipeline run errors.

use super::error_code::{self, ErrorCode};
use super::StepError;
use crate::types::StepId;

/// A stage failure, tagged with the stage that raised it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("Step {step} failed: {source}")]
    StepFailed {
        step: StepId,
        #[source]
        source: StepError,
    },
}

impl PipelineError {
    /// The stage that raised the failure.
    pub fn step(&self) -> StepId {
        match self {
            Self::StepFailed { step, .. } => *step,
        }
    }
}

impl ErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::StepFailed { source, .. } => match source.error_code() {
                error_code::INSUFFICIENT_SAMPLE => error_code::INSUFFICIENT_SAMPLE,
                _ => error_code::STEP_FAILED,
            },
        }
    }
}
