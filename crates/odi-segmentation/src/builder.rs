//! Segment Builder — validates input, runs the eight-stage pipeline once,
//! and exposes the fitted model, metrics, and assignments.
//!
//! Views are derived lazily from the pipeline outputs on first access and
//! cached until the next `fit`.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use odi_core::config::SegmentBuilderConfig;
use odi_core::errors::{PipelineError, SegmentationError};
use odi_core::models::{
    Assignment, OutcomeScore, Segment, SegmentAssignments, SegmentModel, SegmentationMetrics,
};
use odi_core::types::collections::FxHashSet;
use odi_core::types::{ResponseTable, SegmentId, StepId};
use tracing::{debug, info};

use crate::linalg::{round_to, silhouette, Silhouette};
use crate::pipeline::{PipelineContext, PipelineOutputs, PipelineRunner, RunReport, Step};

/// Builds segments for one configuration.
pub struct SegmentBuilder {
    config: SegmentBuilderConfig,
    fitted: Option<FittedState>,
}

struct FittedState {
    outputs: PipelineOutputs,
    report: RunReport,
    model: OnceLock<SegmentModel>,
    metrics: OnceLock<SegmentationMetrics>,
    assignments: OnceLock<SegmentAssignments>,
}

impl SegmentBuilder {
    pub fn new(config: SegmentBuilderConfig) -> Result<Self, SegmentationError> {
        config.validate()?;
        Ok(Self {
            config,
            fitted: None,
        })
    }

    pub fn config(&self) -> &SegmentBuilderConfig {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Run the full pipeline over `responses`.
    ///
    /// Any previous fit is discarded first, so a failed fit leaves the
    /// builder unfitted.
    pub fn fit(&mut self, responses: impl Into<Arc<ResponseTable>>) -> Result<(), SegmentationError> {
        self.fitted = None;
        let responses = responses.into();
        validate_input(&responses, self.config.num_segments)?;

        let runner = PipelineRunner::new(Step::sequence(&self.config));
        let mut ctx = PipelineContext::new(responses);
        let report = runner.run(&mut ctx)?;
        // Every slot is written once the final stage succeeds.
        let outputs = ctx.into_outputs().map_err(|e| PipelineError::StepFailed {
            step: StepId::CharacterizeSegments,
            source: e.into(),
        })?;

        info!(
            segments = self.config.num_segments,
            seed = self.config.random_seed,
            key_outcomes = outputs.key_outcomes.len(),
            total_ms = report.total_ms,
            "segment builder fitted"
        );
        self.fitted = Some(FittedState {
            outputs,
            report,
            model: OnceLock::new(),
            metrics: OnceLock::new(),
            assignments: OnceLock::new(),
        });
        Ok(())
    }

    /// Per-segment Top-2-Box and opportunity scores with segment sizes.
    pub fn model(&self) -> Result<&SegmentModel, SegmentationError> {
        let state = self.state("model")?;
        Ok(state.model.get_or_init(|| build_model(&state.outputs)))
    }

    /// Cluster quality over the opportunity feature space.
    pub fn metrics(&self) -> Result<&SegmentationMetrics, SegmentationError> {
        let state = self.state("metrics")?;
        Ok(state
            .metrics
            .get_or_init(|| build_metrics(&self.config, &state.outputs)))
    }

    /// Respondent to segment mapping, in clustering row order.
    pub fn assignments(&self) -> Result<&SegmentAssignments, SegmentationError> {
        let state = self.state("assignments")?;
        Ok(state.assignments.get_or_init(|| {
            let profiles = &state.outputs.opportunity_profiles;
            profiles
                .ratings
                .respondent_ids()
                .iter()
                .zip(&state.outputs.segment_labels)
                .map(|(&respondent_id, &segment_id)| Assignment {
                    respondent_id,
                    segment_id,
                })
                .collect()
        }))
    }

    /// Step timings of the last fit.
    pub fn run_report(&self) -> Result<&RunReport, SegmentationError> {
        Ok(&self.state("run report")?.report)
    }

    /// Raw pipeline outputs of the last fit.
    pub fn outputs(&self) -> Result<&PipelineOutputs, SegmentationError> {
        Ok(&self.state("pipeline outputs")?.outputs)
    }

    fn state(&self, view: &'static str) -> Result<&FittedState, SegmentationError> {
        self.fitted
            .as_ref()
            .ok_or(SegmentationError::NotFitted { view })
    }
}

/// Preconditions checked before any stage runs.
fn validate_input(responses: &ResponseTable, num_segments: usize) -> Result<(), SegmentationError> {
    if responses.is_empty() {
        return Err(SegmentationError::EmptyInput);
    }
    let importance = responses.importance_count();
    let satisfaction = responses.satisfaction_count();
    if importance == 0 && satisfaction == 0 {
        return Err(SegmentationError::NoRatingColumns);
    }
    if !responses.is_paired() {
        return Err(SegmentationError::UnpairedColumns {
            importance,
            satisfaction,
        });
    }
    if responses.len() < num_segments {
        return Err(SegmentationError::TooFewRespondents {
            respondents: responses.len(),
            segments: num_segments,
        });
    }
    Ok(())
}

fn build_model(outputs: &PipelineOutputs) -> SegmentModel {
    let mut segments: BTreeMap<SegmentId, Segment> = outputs
        .segment_sizes
        .iter()
        .map(|size| {
            let segment = Segment {
                segment_id: size.segment_id,
                size_pct: size.size_pct,
                outcomes: Vec::new(),
            };
            (size.segment_id, segment)
        })
        .collect();
    for row in &outputs.segment_profiles {
        if let Some(segment) = segments.get_mut(&row.segment_id) {
            segment.outcomes.push(OutcomeScore {
                outcome_id: row.outcome_id,
                sat_t2b: row.sat_t2b,
                imp_t2b: row.imp_t2b,
                opportunity: round_to(row.opportunity, 2),
            });
        }
    }
    SegmentModel::new(segments.into_values().collect())
}

fn build_metrics(config: &SegmentBuilderConfig, outputs: &PipelineOutputs) -> SegmentationMetrics {
    let k = config.num_segments;
    let labels = &outputs.segment_labels;
    let features = outputs.opportunity_profiles.scores.view();
    let n = labels.len();

    let distinct: FxHashSet<SegmentId> = labels.iter().copied().collect();
    let sil = if k > 1 && n > k && distinct.len() > 1 {
        silhouette(features, labels, k)
    } else {
        debug!(k, samples = n, "silhouette undefined for this fit");
        Silhouette::undefined(k)
    };

    let mut counts = vec![0usize; k];
    for &label in labels {
        if let Some(count) = counts.get_mut(label) {
            *count += 1;
        }
    }
    let cluster_sizes_pct: Vec<f64> = counts
        .iter()
        .map(|&c| if n == 0 { 0.0 } else { c as f64 / n as f64 * 100.0 })
        .collect();
    let min_cluster_pct = cluster_sizes_pct
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min);

    SegmentationMetrics {
        method: config.clustering_method,
        k,
        random_seed: config.random_seed,
        silhouette_mean: sil.mean,
        silhouette_by_cluster: sil.per_cluster,
        cluster_sizes_pct,
        min_cluster_pct,
    }
}

#[cfg(test)]
mod tests {
    use odi_core::types::{OutcomeId, RespondentId};

    use super::*;

    fn small_config() -> SegmentBuilderConfig {
        SegmentBuilderConfig::default()
            .with_num_segments(2)
            .with_seed(3)
            .with_loading_thresholds(0.4, 0.5)
    }

    #[test]
    fn test_views_require_fit() {
        let builder = SegmentBuilder::new(small_config()).unwrap();
        assert!(matches!(
            builder.model(),
            Err(SegmentationError::NotFitted { view: "model" })
        ));
        assert!(matches!(
            builder.metrics(),
            Err(SegmentationError::NotFitted { view: "metrics" })
        ));
        assert!(builder.assignments().is_err());
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let config = SegmentBuilderConfig::default().with_loading_thresholds(0.5, 0.4);
        assert!(matches!(
            SegmentBuilder::new(config),
            Err(SegmentationError::Config(_))
        ));
    }

    #[test]
    fn test_unpaired_columns_rejected() {
        let ids = (1..=4).map(RespondentId::new).collect();
        let mut table = ResponseTable::new(ids).unwrap();
        table
            .insert_importance(OutcomeId::new(1), vec![1, 2, 3, 4])
            .unwrap();
        let mut builder = SegmentBuilder::new(small_config()).unwrap();
        assert!(matches!(
            builder.fit(table),
            Err(SegmentationError::UnpairedColumns {
                importance: 1,
                satisfaction: 0
            })
        ));
        assert!(!builder.is_fitted());
    }

    #[test]
    fn test_fewer_respondents_than_segments() {
        let mut table = ResponseTable::new(vec![RespondentId::new(1)]).unwrap();
        table
            .insert_outcome(OutcomeId::new(1), vec![3], vec![2])
            .unwrap();
        let mut builder = SegmentBuilder::new(small_config()).unwrap();
        assert!(matches!(
            builder.fit(table),
            Err(SegmentationError::TooFewRespondents {
                respondents: 1,
                segments: 2
            })
        ));
    }

    #[test]
    fn test_fit_produces_all_views() {
        let table = crate::pipeline::steps::fixtures::patterned_table(80);
        let mut builder = SegmentBuilder::new(small_config()).unwrap();
        builder.fit(table).unwrap();

        let assignments = builder.assignments().unwrap();
        assert_eq!(assignments.len(), 80);
        assert!(assignments.iter().all(|a| a.segment_id < 2));

        let metrics = builder.metrics().unwrap();
        assert_eq!(metrics.k, 2);
        assert_eq!(metrics.cluster_sizes_pct.len(), 2);
        let total: f64 = metrics.cluster_sizes_pct.iter().sum();
        assert!((total - 100.0).abs() < 1e-9);

        let model = builder.model().unwrap();
        assert!((model.total_size_pct() - 100.0).abs() <= 0.1);
        assert_eq!(builder.run_report().unwrap().timings.len(), 8);
    }
}
