//! Selection errors.

use super::error_code::{self, ErrorCode};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectionError {
    #[error("No orchestration results to select from")]
    NoResults,

    #[error(
        "No configuration meets constraints: {candidates} candidates, none with \
         min segment size >= {min_segment_size_percent}% and silhouette >= {min_silhouette}"
    )]
    NoViableConfiguration {
        candidates: usize,
        min_segment_size_percent: f64,
        min_silhouette: f64,
    },
}

impl ErrorCode for SelectionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NoViableConfiguration { .. } => error_code::NO_VIABLE_CONFIGURATION,
            Self::NoResults => error_code::SELECTION_ERROR,
        }
    }
}
