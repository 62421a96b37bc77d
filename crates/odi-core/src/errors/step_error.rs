//! Failures raised inside a single pipeline stage.

use super::error_code::{self, ErrorCode};
use super::{ContextError, OpportunityError, TableError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StepError {
    #[error("Input {what} is empty")]
    EmptyInput { what: &'static str },

    #[error("No importance columns found")]
    NoImportanceColumns,

    #[error(
        "Insufficient sample: {respondents} respondents for {segments} segments \
         (need at least {required})"
    )]
    InsufficientSample {
        respondents: usize,
        segments: usize,
        required: usize,
    },

    #[error("Component count must be at least 1")]
    ZeroComponents,

    #[error(
        "Loading thresholds must satisfy 0 <= max_cross_loading < min_primary_loading <= 1, \
         got max_cross_loading={max_cross}, min_primary_loading={min_primary}"
    )]
    InvalidLoadingThresholds { max_cross: f64, min_primary: f64 },

    #[error("Segment count must be between 1 and {respondents}, got {requested}")]
    InvalidSegmentCount { requested: usize, respondents: usize },

    #[error("Top-2-Box threshold must be in [1, 5], got {threshold}")]
    InvalidTopBoxThreshold { threshold: u8 },

    #[error("Numeric failure: {message}")]
    Numeric { message: String },

    #[error("Context error: {0}")]
    Context(#[from] ContextError),

    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("Opportunity error: {0}")]
    Opportunity(#[from] OpportunityError),
}

impl ErrorCode for StepError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientSample { .. } => error_code::INSUFFICIENT_SAMPLE,
            Self::Context(e) => e.error_code(),
            Self::Table(e) => e.error_code(),
            Self::Opportunity(e) => e.error_code(),
            _ => error_code::STEP_FAILED,
        }
    }
}
