//! ODI segmentation engine.
//!
//! Standardize importance ratings, reduce them with PCA, pick key outcomes,
//! score individual opportunity, cluster respondents with k-means, and
//! characterize each segment. The orchestrator sweeps builder parameters,
//! the selector picks the best viable configuration, and the zone
//! classifier tags each segment outcome. Enrichment attaches outcome
//! statements and per-segment demographic breakdowns.

pub mod api;
pub mod builder;
pub mod enrich;
pub mod linalg;
pub mod loaders;
pub mod opportunity;
pub mod orchestrator;
pub mod pipeline;
pub mod selection;
pub mod zones;

pub use api::{segment, segment_file, SegmentationOutput};
pub use builder::SegmentBuilder;
pub use enrich::{enrich, EnrichmentSources};
pub use orchestrator::{OrchestrationResult, OrchestrationRun, Orchestrator};
pub use selection::{Selection, Selector};
pub use zones::ZoneClassifier;
