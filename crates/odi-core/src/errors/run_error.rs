//! Errors of the end-to-end segmentation entry point.

use super::error_code::ErrorCode;
use super::{ConfigError, LoadError, OrchestrationError, SegmentationError, SelectionError};

/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Orchestration error: {0}")]
    Orchestration(#[from] OrchestrationError),

    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),

    #[error("Segmentation error: {0}")]
    Segmentation(#[from] SegmentationError),
}

impl ErrorCode for RunError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Load(e) => e.error_code(),
            Self::Orchestration(e) => e.error_code(),
            Self::Selection(e) => e.error_code(),
            Self::Segmentation(e) => e.error_code(),
        }
    }
}
