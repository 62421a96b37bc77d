//! Configuration system for ODI segmentation.
//! Serde records with compiled defaults; rules files in YAML, JSON, or TOML.

pub mod orchestration_config;
pub mod rules_config;
pub mod segment_builder_config;
pub mod selection_config;
pub mod zone_config;

pub use orchestration_config::{
    describe_combination, Combination, Constraint, ConstraintKind, FailurePolicy,
    OrchestrationConfig, ParamValue, SweepParameter,
};
pub use rules_config::RulesConfig;
pub use segment_builder_config::{ClusteringMethod, PcaMethod, SegmentBuilderConfig};
pub use selection_config::SelectionRules;
pub use zone_config::ZoneRules;
