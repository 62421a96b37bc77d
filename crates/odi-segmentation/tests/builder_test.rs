//! Segment Builder integration tests: coverage, determinism, validation.

mod common;

use std::collections::BTreeSet;

use odi_core::config::{PcaMethod, SegmentBuilderConfig};
use odi_core::errors::{ErrorCode, PipelineError, SegmentationError, StepError};
use odi_core::models::SegmentModel;
use odi_core::types::{ResponseTable, StepId};
use odi_segmentation::SegmentBuilder;

fn fitted(n: usize, k: usize, seed: u64) -> SegmentBuilder {
    let config = SegmentBuilderConfig::default()
        .with_num_segments(k)
        .with_seed(seed);
    let mut builder = SegmentBuilder::new(config).unwrap();
    builder.fit(common::two_group_survey(n)).unwrap();
    builder
}

#[test]
fn test_assignments_cover_every_respondent() {
    for k in [2, 3, 4] {
        let builder = fitted(120, k, 10);
        let assignments = builder.assignments().unwrap();
        assert_eq!(assignments.len(), 120);

        let respondents: BTreeSet<_> = assignments.iter().map(|a| a.respondent_id).collect();
        assert_eq!(respondents.len(), 120);
        assert!(assignments.unique_segments().iter().all(|&s| s < k));
    }
}

#[test]
fn test_segment_sizes_sum_to_hundred() {
    for k in [2, 3] {
        let model = fitted(120, k, 3).model().unwrap().clone();
        assert!((model.total_size_pct() - 100.0).abs() <= 0.1);
        for segment in &model.segments {
            assert_eq!(segment.outcomes.len(), common::OUTCOMES as usize);
        }
    }
}

#[test]
fn test_well_separated_groups_score_high() {
    let builder = fitted(120, 2, 10);
    let metrics = builder.metrics().unwrap();
    assert!(metrics.has_silhouette());
    assert!(metrics.silhouette_mean > 0.5);
    assert!((metrics.min_cluster_pct - 50.0).abs() < 1e-9);
}

#[test]
fn test_same_seed_is_deterministic() {
    let a = fitted(90, 3, 12);
    let b = fitted(90, 3, 12);
    assert_eq!(a.assignments().unwrap(), b.assignments().unwrap());
    assert_eq!(a.metrics().unwrap(), b.metrics().unwrap());
    assert_eq!(a.model().unwrap(), b.model().unwrap());
}

#[test]
fn test_refit_replaces_previous_state() {
    let mut builder = fitted(60, 2, 1);
    builder.fit(common::two_group_survey(40)).unwrap();
    assert_eq!(builder.assignments().unwrap().len(), 40);
}

#[test]
fn test_single_segment_has_undefined_silhouette() {
    let builder = fitted(30, 1, 1);
    let metrics = builder.metrics().unwrap();
    assert!(metrics.silhouette_mean.is_nan());
    assert_eq!(metrics.cluster_sizes_pct, vec![100.0]);
}

#[test]
fn test_variance_threshold_method() {
    let config = SegmentBuilderConfig::default()
        .with_num_segments(2)
        .with_pca_method(PcaMethod::VarianceThreshold);
    let mut builder = SegmentBuilder::new(config).unwrap();
    builder.fit(common::two_group_survey(80)).unwrap();
    assert!(!builder.outputs().unwrap().key_outcomes.is_empty());
}

#[test]
fn test_model_json_round_trip() {
    let model = fitted(120, 3, 6).model().unwrap().clone();
    let json = serde_json::to_string(&model).unwrap();
    let back: SegmentModel = serde_json::from_str(&json).unwrap();
    assert_eq!(back, model);
}

#[test]
fn test_strict_preflight_fails_with_stage() {
    let config = SegmentBuilderConfig::default()
        .with_num_segments(3)
        .with_strict_preflight(true);
    let mut builder = SegmentBuilder::new(config).unwrap();
    let err = builder.fit(common::two_group_survey(100)).unwrap_err();

    assert_eq!(err.error_code(), "INSUFFICIENT_SAMPLE");
    match err {
        SegmentationError::FitFailed {
            source: PipelineError::StepFailed { step, source },
        } => {
            assert_eq!(step, StepId::ValidatePreflight);
            assert!(matches!(source, StepError::InsufficientSample { required: 180, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!builder.is_fitted());
}

#[test]
fn test_empty_table_rejected_before_pipeline() {
    let mut builder = SegmentBuilder::new(SegmentBuilderConfig::default()).unwrap();
    let err = builder.fit(ResponseTable::new(Vec::new()).unwrap()).unwrap_err();
    assert!(matches!(err, SegmentationError::EmptyInput));
    assert!(matches!(
        builder.model(),
        Err(SegmentationError::NotFitted { .. })
    ));
}
