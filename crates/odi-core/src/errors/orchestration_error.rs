//! Parameter sweep errors.

use super::error_code::{self, ErrorCode};
use super::{ConfigError, SegmentationError};

#[derive(Debug, thiserror::Error)]
pub enum OrchestrationError {
    #[error("Invalid orchestration config: {0}")]
    Config(#[from] ConfigError),

    #[error("Combination {index} ({combination}) failed: {source}")]
    CombinationFailed {
        index: usize,
        combination: String,
        #[source]
        source: SegmentationError,
    },

    #[error("Orchestration cancelled after {completed} combinations")]
    Cancelled { completed: usize },

    #[error("Failed to build worker pool: {message}")]
    ThreadPool { message: String },
}

impl ErrorCode for OrchestrationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Cancelled { .. } => error_code::CANCELLED,
            _ => error_code::ORCHESTRATION_ERROR,
        }
    }
}
