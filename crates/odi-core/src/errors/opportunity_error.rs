//! Opportunity formula input errors.

use super::error_code::{self, ErrorCode};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OpportunityError {
    #[error("{field} must be a percentage in [0, 100], got {value}")]
    PercentageOutOfRange { field: &'static str, value: f64 },
}

impl ErrorCode for OpportunityError {
    fn error_code(&self) -> &'static str {
        error_code::OPPORTUNITY_ERROR
    }
}
