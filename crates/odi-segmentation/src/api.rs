//! High-level entry point: sweep, select, refit, classify.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use odi_core::config::{ParamValue, RulesConfig, SegmentBuilderConfig, SweepParameter};
use odi_core::constants::VERSION;
use odi_core::errors::{ConfigError, EnrichError, RunError};
use odi_core::models::{
    SegmentCountSummary, SegmentationMetrics, SegmentationSummary, ZonedSegmentModel,
};
use odi_core::types::{RespondentId, ResponseTable, SegmentId};
use serde::Serialize;
use tracing::info;

use crate::builder::SegmentBuilder;
use crate::enrich::{enrich, EnrichmentSources};
use crate::linalg::round_to;
use crate::loaders::load_responses_file;
use crate::orchestrator::Orchestrator;
use crate::selection::Selector;
use crate::zones::ZoneClassifier;

/// Everything a segmentation run produces.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentationOutput {
    pub model: ZonedSegmentModel,
    pub assignments: BTreeMap<SegmentId, Vec<RespondentId>>,
    pub metrics: SegmentationMetrics,
    pub summary: SegmentationSummary,
    /// Configuration of the selected fit.
    pub config: SegmentBuilderConfig,
}

impl SegmentationOutput {
    /// Attach outcome statements and demographics to the zoned model.
    pub fn enrich(&mut self, sources: &EnrichmentSources<'_>) -> Result<(), EnrichError> {
        enrich(&mut self.model, &self.assignments, sources)
    }
}

/// [`segment`] over a JSON Lines responses file.
pub fn segment_file(
    path: &Path,
    rules: &RulesConfig,
    num_segments: Option<usize>,
) -> Result<SegmentationOutput, RunError> {
    let responses = load_responses_file(path)?;
    segment(responses, rules, num_segments)
}

/// Segment `responses` with the sweep, selection, and zone rules of `rules`.
///
/// `num_segments` pins the segment count, replacing whatever the sweep
/// would otherwise explore.
pub fn segment(
    responses: impl Into<Arc<ResponseTable>>,
    rules: &RulesConfig,
    num_segments: Option<usize>,
) -> Result<SegmentationOutput, RunError> {
    rules.validate()?;
    let responses = responses.into();

    let mut orchestration = rules.orchestration.clone();
    if let Some(k) = num_segments {
        let k = i64::try_from(k).map_err(|_| {
            ConfigError::validation("num_segments", format!("{k} is out of range"))
        })?;
        orchestration
            .parameters
            .insert(SweepParameter::NumSegments, vec![ParamValue::Int(k)]);
    }

    let orchestrator = Orchestrator::new(orchestration)?;
    let run = orchestrator.run(Arc::clone(&responses))?;

    let selector = Selector::new(rules.selection_rules.clone())?;
    let selection = selector.select(&run.results)?;
    let per_segment_count = selector
        .best_per_segment_count(&run.results)
        .into_iter()
        .map(|best| SegmentCountSummary {
            k: best.result.metrics.k,
            silhouette: round_to(best.result.metrics.silhouette_mean, 4),
            segment_sizes: best
                .result
                .metrics
                .cluster_sizes_pct
                .iter()
                .map(|pct| round_to(*pct, 1))
                .collect(),
            combined_score: round_to(best.score, 4),
            config: best.result.config.clone(),
        })
        .collect();
    let summary = SegmentationSummary {
        per_segment_count,
        recommended: selection.result.metrics.k,
        candidates_evaluated: run.results.len(),
        engine_version: VERSION.to_string(),
    };
    let winner = selection.result.config.clone();

    // The sweep keeps metrics and model only; refit for assignments.
    let mut builder = SegmentBuilder::new(winner)?;
    builder.fit(responses)?;
    let classifier = ZoneClassifier::new(rules.zone_classification.clone())?;
    let model = classifier.classify_model(builder.model()?);
    let assignments = builder.assignments()?.by_segment();
    let metrics = builder.metrics()?.clone();

    info!(
        segments = metrics.k,
        seed = metrics.random_seed,
        candidates = summary.candidates_evaluated,
        "segmentation complete"
    );
    Ok(SegmentationOutput {
        model,
        assignments,
        metrics,
        summary,
        config: builder.config().clone(),
    })
}
