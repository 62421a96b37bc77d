//! Error handling for ODI segmentation.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod context_error;
pub mod enrich_error;
pub mod error_code;
pub mod load_error;
pub mod opportunity_error;
pub mod orchestration_error;
pub mod pipeline_error;
pub mod run_error;
pub mod segmentation_error;
pub mod selection_error;
pub mod step_error;
pub mod table_error;

pub use config_error::ConfigError;
pub use context_error::ContextError;
pub use enrich_error::EnrichError;
pub use error_code::ErrorCode;
pub use load_error::LoadError;
pub use opportunity_error::OpportunityError;
pub use orchestration_error::OrchestrationError;
pub use pipeline_error::PipelineError;
pub use run_error::RunError;
pub use segmentation_error::SegmentationError;
pub use selection_error::SelectionError;
pub use step_error::StepError;
pub use table_error::TableError;
