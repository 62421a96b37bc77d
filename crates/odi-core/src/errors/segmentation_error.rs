//! Segment Builder errors.

use super::error_code::{self, ErrorCode};
use super::{ConfigError, PipelineError};

#[derive(Debug, thiserror::Error)]
pub enum SegmentationError {
    #[error("Invalid input: response table has no respondents")]
    EmptyInput,

    #[error("Invalid input: response table has no rating columns")]
    NoRatingColumns,

    #[error(
        "Invalid input: {importance} importance columns and {satisfaction} satisfaction \
         columns are not paired one-to-one"
    )]
    UnpairedColumns {
        importance: usize,
        satisfaction: usize,
    },

    #[error("Invalid input: {respondents} respondents cannot form {segments} segments")]
    TooFewRespondents { respondents: usize, segments: usize },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Segmentation fit failed: {source}")]
    FitFailed {
        #[from]
        source: PipelineError,
    },

    #[error("Segment Builder must be fitted before reading {view}")]
    NotFitted { view: &'static str },
}

impl ErrorCode for SegmentationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::FitFailed { source } => match source.error_code() {
                error_code::INSUFFICIENT_SAMPLE => error_code::INSUFFICIENT_SAMPLE,
                _ => error_code::FIT_FAILED,
            },
            Self::NotFitted { .. } => error_code::NOT_FITTED,
            _ => error_code::INVALID_INPUT,
        }
    }
}
