//! Fitted outputs: segment model, metrics, assignments, zones, run summary.
//! Enrichment inputs: outcome statements, codebook, respondent attributes.

pub mod assignments;
pub mod codebook;
pub mod demographics;
pub mod metrics;
pub mod outcomes;
pub mod respondents;
pub mod segment_model;
pub mod summary;
pub mod zone;

pub use assignments::{Assignment, SegmentAssignments};
pub use codebook::{Codebook, Dimension, DimensionKind};
pub use demographics::{CategoryShare, DimensionBreakdown};
pub use metrics::SegmentationMetrics;
pub use outcomes::{OutcomeCatalog, OutcomeDefinition};
pub use respondents::{Respondent, Respondents};
pub use segment_model::{OutcomeScore, Segment, SegmentModel};
pub use summary::{SegmentCountSummary, SegmentationSummary};
pub use zone::{Zone, ZoneBucket, ZoneBuckets, ZonedOutcome, ZonedSegment, ZonedSegmentModel};
