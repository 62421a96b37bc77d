//! Property tests for opportunity scoring, the context, sweeps, and selection.

use std::collections::BTreeMap;
use std::sync::Arc;

use proptest::prelude::*;

use odi_core::config::{
    ClusteringMethod, Constraint, OrchestrationConfig, ParamValue, SegmentBuilderConfig,
    SelectionRules, SweepParameter,
};
use odi_core::errors::ContextError;
use odi_core::models::{SegmentModel, SegmentationMetrics};
use odi_core::types::{RespondentId, ResponseTable};
use odi_segmentation::opportunity::{aggregate_opportunity, individual_opportunity};
use odi_segmentation::pipeline::PipelineContext;
use odi_segmentation::{OrchestrationResult, Orchestrator, Selector};

fn result(index: usize, silhouette: f64, sizes: Vec<f64>) -> OrchestrationResult {
    let min = sizes.iter().copied().fold(f64::INFINITY, f64::min);
    OrchestrationResult {
        index,
        combination: Default::default(),
        config: SegmentBuilderConfig::default().with_num_segments(sizes.len()),
        metrics: SegmentationMetrics {
            method: ClusteringMethod::Kmeans,
            k: sizes.len(),
            random_seed: 0,
            silhouette_mean: silhouette,
            silhouette_by_cluster: vec![silhouette; sizes.len()],
            cluster_sizes_pct: sizes,
            min_cluster_pct: min,
        },
        model: SegmentModel::default(),
    }
}

/// Size percentages of `k` clusters summing to 100.
fn sizes_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1u32..100, 2..5).prop_map(|weights| {
        let total: u32 = weights.iter().sum();
        weights
            .iter()
            .map(|w| f64::from(*w) / f64::from(total) * 100.0)
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_individual_opportunity(imp in 1u8..=5, sat in 1u8..=5) {
        let opp = individual_opportunity(imp, sat);
        if sat >= imp {
            prop_assert_eq!(opp, imp);
        } else {
            prop_assert_eq!(opp, 2 * imp - sat);
        }
        prop_assert!((1..=10).contains(&opp));
    }

    #[test]
    fn prop_aggregate_opportunity_bounds(imp in 0.0f64..=100.0, sat in 0.0f64..=100.0) {
        let opp = aggregate_opportunity(imp, sat).unwrap();
        prop_assert!((0.0..=20.0).contains(&opp));
        prop_assert!(opp >= imp / 10.0);
    }

    #[test]
    fn prop_aggregate_opportunity_rejects_out_of_range(
        imp in prop_oneof![-1000.0f64..-0.001, 100.001f64..1000.0],
        sat in 0.0f64..=100.0,
    ) {
        prop_assert!(aggregate_opportunity(imp, sat).is_err());
        prop_assert!(aggregate_opportunity(sat, imp).is_err());
    }

    #[test]
    fn prop_context_slots_write_once(first in 0usize..10, second in 0usize..10) {
        let table = ResponseTable::new(vec![RespondentId::new(1)]).unwrap();
        let mut ctx = PipelineContext::new(Arc::new(table));
        prop_assert!(ctx.set_component_count(first).is_ok());
        let is_already_written = matches!(
            ctx.set_component_count(second),
            Err(ContextError::AlreadyWritten { .. })
        );
        prop_assert!(is_already_written);
        prop_assert_eq!(ctx.component_count().unwrap(), first);
    }

    #[test]
    fn prop_grid_size_is_product(a in 1usize..5, b in 1usize..5, c in 1usize..4) {
        let mut parameters = BTreeMap::new();
        parameters.insert(
            SweepParameter::NumSegments,
            (0..a).map(|i| ParamValue::Int(i as i64 + 2)).collect(),
        );
        parameters.insert(
            SweepParameter::RandomSeed,
            (0..b).map(|i| ParamValue::Int(i as i64)).collect(),
        );
        parameters.insert(
            SweepParameter::TopBoxThreshold,
            (0..c).map(|i| ParamValue::Int(i as i64 + 3)).collect(),
        );
        let unconstrained = Orchestrator::new(OrchestrationConfig::new(parameters.clone())).unwrap();
        prop_assert_eq!(unconstrained.count_configs(), a * b * c);
        prop_assert_eq!(unconstrained.valid_config_count(), a * b * c);

        let constrained = Orchestrator::new(
            OrchestrationConfig::new(parameters).with_constraint(Constraint::less_than(
                SweepParameter::RandomSeed,
                SweepParameter::NumSegments,
            )),
        )
        .unwrap();
        prop_assert!(constrained.valid_config_count() <= unconstrained.valid_config_count());
    }

    #[test]
    fn prop_selection_never_below_floors(
        candidates in prop::collection::vec((-0.2f64..0.9, sizes_strategy()), 1..8),
    ) {
        let rules = SelectionRules::default();
        let selector = Selector::new(rules.clone()).unwrap();
        let results: Vec<OrchestrationResult> = candidates
            .into_iter()
            .enumerate()
            .map(|(i, (sil, sizes))| result(i, sil, sizes))
            .collect();
        if let Ok(selection) = selector.select(&results) {
            prop_assert!(selection.result.metrics.min_cluster_pct >= rules.min_segment_size_percent);
            prop_assert!(selection.result.metrics.silhouette_mean >= rules.min_silhouette);
            for other in results.iter().filter(|r| selector.passes(&r.metrics)) {
                prop_assert!(selector.score(&other.metrics) <= selection.score);
            }
        } else {
            prop_assert!(results.iter().all(|r| !selector.passes(&r.metrics)));
        }
    }
}
