//! Identifiers, collection aliases, and the wide response table.

pub mod collections;
pub mod identifiers;
pub mod responses;
pub mod step_id;

pub use identifiers::{OutcomeId, RespondentId, SegmentId};
pub use responses::ResponseTable;
pub use step_id::StepId;
