//! Selector — hard floors, then a weighted silhouette/balance score.

use std::collections::BTreeMap;

use odi_core::config::SelectionRules;
use odi_core::constants::SILHOUETTE_CEILING;
use odi_core::errors::{ConfigError, SelectionError};
use odi_core::models::SegmentationMetrics;
use tracing::{debug, info};

use crate::orchestrator::OrchestrationResult;

/// The winning result with its score and the candidate counts it beat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection<'a> {
    pub result: &'a OrchestrationResult,
    pub score: f64,
    /// Results considered.
    pub candidates: usize,
    /// Results that passed both floors.
    pub viable: usize,
}

#[derive(Debug, Clone)]
pub struct Selector {
    rules: SelectionRules,
}

impl Selector {
    pub fn new(rules: SelectionRules) -> Result<Self, ConfigError> {
        rules.validate()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &SelectionRules {
        &self.rules
    }

    /// Both floors hold. Undefined (NaN) silhouettes never pass.
    pub fn passes(&self, metrics: &SegmentationMetrics) -> bool {
        metrics.min_cluster_pct >= self.rules.min_segment_size_percent
            && metrics.silhouette_mean >= self.rules.min_silhouette
    }

    /// `w_sil * min(silhouette / 0.5, 1) + w_bal * (1 - (max% - min%) / 100)`
    pub fn score(&self, metrics: &SegmentationMetrics) -> f64 {
        let silhouette = (metrics.silhouette_mean / SILHOUETTE_CEILING).min(1.0);
        let spread = metrics.max_cluster_pct() - metrics.min_cluster_pct;
        let balance = 1.0 - spread / 100.0;
        self.rules.silhouette_weight * silhouette + self.rules.balance_weight * balance
    }

    /// Highest-scoring viable result; ties keep the earliest in input order.
    pub fn select<'a>(
        &self,
        results: &'a [OrchestrationResult],
    ) -> Result<Selection<'a>, SelectionError> {
        if results.is_empty() {
            return Err(SelectionError::NoResults);
        }
        let selection = self.best_of(results.iter()).ok_or(SelectionError::NoViableConfiguration {
            candidates: results.len(),
            min_segment_size_percent: self.rules.min_segment_size_percent,
            min_silhouette: self.rules.min_silhouette,
        })?;
        info!(
            index = selection.result.index,
            k = selection.result.metrics.k,
            score = selection.score,
            viable = selection.viable,
            candidates = selection.candidates,
            "selected configuration"
        );
        Ok(selection)
    }

    /// Best viable result for each explored segment count, ordered by k.
    ///
    /// Segment counts with no viable result are left out.
    pub fn best_per_segment_count<'a>(
        &self,
        results: &'a [OrchestrationResult],
    ) -> Vec<Selection<'a>> {
        let mut by_k: BTreeMap<usize, Vec<&'a OrchestrationResult>> = BTreeMap::new();
        for result in results {
            by_k.entry(result.metrics.k).or_default().push(result);
        }
        by_k.into_values()
            .filter_map(|group| self.best_of(group.into_iter()))
            .collect()
    }

    fn best_of<'a>(
        &self,
        results: impl Iterator<Item = &'a OrchestrationResult>,
    ) -> Option<Selection<'a>> {
        let mut best: Option<(&'a OrchestrationResult, f64)> = None;
        let mut candidates = 0;
        let mut viable = 0;
        for result in results {
            candidates += 1;
            if !self.passes(&result.metrics) {
                debug!(
                    index = result.index,
                    min_cluster_pct = result.metrics.min_cluster_pct,
                    silhouette = result.metrics.silhouette_mean,
                    "result below selection floors"
                );
                continue;
            }
            viable += 1;
            let score = self.score(&result.metrics);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((result, score));
            }
        }
        best.map(|(result, score)| Selection {
            result,
            score,
            candidates,
            viable,
        })
    }
}
