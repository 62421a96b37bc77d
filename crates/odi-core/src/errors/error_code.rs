//! Stable error codes for callers that branch on failure kind.

/// Every error enum implements this to expose a structured code string.
pub trait ErrorCode {
    /// Returns the error code string (e.g., "CONFIG_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const TABLE_ERROR: &str = "TABLE_ERROR";
pub const LOAD_ERROR: &str = "LOAD_ERROR";
pub const DUPLICATE_RESPONSES: &str = "DUPLICATE_RESPONSES";
pub const CONTEXT_ERROR: &str = "CONTEXT_ERROR";
pub const STEP_FAILED: &str = "STEP_FAILED";
pub const INSUFFICIENT_SAMPLE: &str = "INSUFFICIENT_SAMPLE";
pub const OPPORTUNITY_ERROR: &str = "OPPORTUNITY_ERROR";
pub const INVALID_INPUT: &str = "INVALID_INPUT";
pub const FIT_FAILED: &str = "FIT_FAILED";
pub const NOT_FITTED: &str = "NOT_FITTED";
pub const ORCHESTRATION_ERROR: &str = "ORCHESTRATION_ERROR";
pub const CANCELLED: &str = "CANCELLED";
pub const NO_VIABLE_CONFIGURATION: &str = "NO_VIABLE_CONFIGURATION";
pub const SELECTION_ERROR: &str = "SELECTION_ERROR";
pub const ENRICH_ERROR: &str = "ENRICH_ERROR";
