//! Segment model enrichment errors.

use super::error_code::{self, ErrorCode};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnrichError {
    #[error("A codebook is required to summarise respondent demographics")]
    MissingCodebook,

    #[error("No segment assignments found; cannot summarise demographics")]
    MissingAssignments,
}

impl ErrorCode for EnrichError {
    fn error_code(&self) -> &'static str {
        error_code::ENRICH_ERROR
    }
}
