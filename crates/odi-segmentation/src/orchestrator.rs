//! Orchestrator — sweeps Segment Builder parameters over a grid.
//!
//! The grid is the cartesian product of every parameter's candidate values,
//! enumerated in parameter order, then filtered by the configured
//! constraints. Each surviving combination overrides a base configuration and
//! runs one independent fit against the shared, read-only response table.
//! Results always come back in enumeration order, whether the sweep ran
//! sequentially or on a bounded worker pool.

use std::sync::Arc;
use std::time::Instant;

use odi_core::config::{
    describe_combination, Combination, FailurePolicy, OrchestrationConfig, SegmentBuilderConfig,
};
use odi_core::errors::{OrchestrationError, SegmentationError};
use odi_core::models::{SegmentModel, SegmentationMetrics};
use odi_core::traits::{Cancellable, CancellationToken};
use odi_core::types::ResponseTable;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::builder::SegmentBuilder;
use crate::linalg::round_to;

/// One successful fit of the sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestrationResult {
    /// Position in the filtered enumeration order.
    pub index: usize,
    pub combination: Combination,
    pub config: SegmentBuilderConfig,
    pub metrics: SegmentationMetrics,
    pub model: SegmentModel,
}

/// A combination whose fit failed under [`FailurePolicy::Skip`].
#[derive(Debug)]
pub struct CombinationFailure {
    pub index: usize,
    pub combination: Combination,
    pub error: SegmentationError,
}

#[derive(Debug)]
pub struct OrchestrationRun {
    pub results: Vec<OrchestrationResult>,
    pub failures: Vec<CombinationFailure>,
    pub elapsed_ms: f64,
}

impl OrchestrationRun {
    pub fn attempted(&self) -> usize {
        self.results.len() + self.failures.len()
    }
}

pub struct Orchestrator {
    config: OrchestrationConfig,
    base: SegmentBuilderConfig,
    cancellation: Option<CancellationToken>,
}

impl Orchestrator {
    pub fn new(config: OrchestrationConfig) -> Result<Self, OrchestrationError> {
        config.validate()?;
        for constraint in config.inert_constraints() {
            warn!(
                %constraint,
                "constraint references a parameter that is not swept and will always pass"
            );
        }
        Ok(Self {
            config,
            base: SegmentBuilderConfig::default(),
            cancellation: None,
        })
    }

    /// Configuration that sweep values are applied on top of.
    pub fn with_base_config(mut self, base: SegmentBuilderConfig) -> Self {
        self.base = base;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn config(&self) -> &OrchestrationConfig {
        &self.config
    }

    /// Full cartesian product, before constraint filtering.
    pub fn combinations(&self) -> Vec<Combination> {
        let mut grid = vec![Combination::new()];
        for (&parameter, values) in &self.config.parameters {
            grid = grid
                .iter()
                .flat_map(|partial| {
                    values.iter().map(move |value| {
                        let mut next = partial.clone();
                        next.insert(parameter, value.clone());
                        next
                    })
                })
                .collect();
        }
        grid
    }

    /// Combinations satisfying every constraint, in enumeration order.
    pub fn valid_combinations(&self) -> Vec<Combination> {
        self.combinations()
            .into_iter()
            .filter(|combination| self.config.constraints.iter().all(|c| c.check(combination)))
            .collect()
    }

    pub fn count_configs(&self) -> usize {
        self.config.parameters.values().map(Vec::len).product()
    }

    pub fn valid_config_count(&self) -> usize {
        self.valid_combinations().len()
    }

    /// Fit every valid combination against `responses`.
    pub fn run(
        &self,
        responses: impl Into<Arc<ResponseTable>>,
    ) -> Result<OrchestrationRun, OrchestrationError> {
        let responses = responses.into();
        let combinations = self.valid_combinations();
        let start = Instant::now();
        info!(
            total = self.count_configs(),
            valid = combinations.len(),
            workers = ?self.config.parallelism,
            "starting parameter sweep"
        );

        let attempts = match self.config.parallelism {
            None => self.run_sequential(&combinations, &responses)?,
            Some(workers) => self.run_parallel(&combinations, &responses, workers)?,
        };

        let mut results = Vec::new();
        let mut failures = Vec::new();
        for (index, outcome) in attempts.into_iter().enumerate() {
            let combination = combinations[index].clone();
            match outcome {
                Ok(fit) => results.push(OrchestrationResult {
                    index,
                    combination,
                    config: fit.config,
                    metrics: fit.metrics,
                    model: fit.model,
                }),
                Err(error) => failures.push(CombinationFailure {
                    index,
                    combination,
                    error,
                }),
            }
        }

        let elapsed_ms = round_to(start.elapsed().as_secs_f64() * 1000.0, 2);
        info!(
            succeeded = results.len(),
            failed = failures.len(),
            elapsed_ms,
            "parameter sweep finished"
        );
        Ok(OrchestrationRun {
            results,
            failures,
            elapsed_ms,
        })
    }

    fn run_sequential(
        &self,
        combinations: &[Combination],
        responses: &Arc<ResponseTable>,
    ) -> Result<Vec<Result<Fit, SegmentationError>>, OrchestrationError> {
        let mut attempts = Vec::with_capacity(combinations.len());
        for (index, combination) in combinations.iter().enumerate() {
            if self.is_cancelled() {
                return Err(OrchestrationError::Cancelled {
                    completed: attempts.len(),
                });
            }
            let attempt = self.fit_combination(combination, responses);
            attempts.push(self.apply_policy(index, combination, attempt)?);
        }
        Ok(attempts)
    }

    fn run_parallel(
        &self,
        combinations: &[Combination],
        responses: &Arc<ResponseTable>,
        workers: usize,
    ) -> Result<Vec<Result<Fit, SegmentationError>>, OrchestrationError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| OrchestrationError::ThreadPool {
                message: e.to_string(),
            })?;

        // None marks a combination skipped after cancellation.
        let raw: Vec<Option<Result<Fit, SegmentationError>>> = pool.install(|| {
            combinations
                .par_iter()
                .map(|combination| {
                    if self.is_cancelled() {
                        return None;
                    }
                    Some(self.fit_combination(combination, responses))
                })
                .collect()
        });

        if raw.iter().any(Option::is_none) {
            return Err(OrchestrationError::Cancelled {
                completed: raw.iter().filter(|r| r.is_some()).count(),
            });
        }

        // Applying the policy in index order reports the lowest-index failure.
        raw.into_iter()
            .flatten()
            .enumerate()
            .map(|(index, attempt)| self.apply_policy(index, &combinations[index], attempt))
            .collect()
    }

    fn apply_policy(
        &self,
        index: usize,
        combination: &Combination,
        attempt: Result<Fit, SegmentationError>,
    ) -> Result<Result<Fit, SegmentationError>, OrchestrationError> {
        match attempt {
            Ok(fit) => Ok(Ok(fit)),
            Err(error) => match self.config.failure_policy {
                FailurePolicy::Abort => Err(OrchestrationError::CombinationFailed {
                    index,
                    combination: describe_combination(combination),
                    source: error,
                }),
                FailurePolicy::Skip => {
                    warn!(
                        index,
                        combination = %describe_combination(combination),
                        error = %error,
                        "combination failed, skipping"
                    );
                    Ok(Err(error))
                }
            },
        }
    }

    fn fit_combination(
        &self,
        combination: &Combination,
        responses: &Arc<ResponseTable>,
    ) -> Result<Fit, SegmentationError> {
        let config = self.base.with_overrides(combination)?;
        debug!(combination = %describe_combination(combination), "fitting combination");
        let mut builder = SegmentBuilder::new(config)?;
        builder.fit(Arc::clone(responses))?;
        Ok(Fit {
            metrics: builder.metrics()?.clone(),
            model: builder.model()?.clone(),
            config: builder.config().clone(),
        })
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(Cancellable::is_cancelled)
    }
}

struct Fit {
    config: SegmentBuilderConfig,
    metrics: SegmentationMetrics,
    model: SegmentModel,
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use odi_core::config::{Constraint, ParamValue, SweepParameter};

    use super::*;
    use crate::pipeline::steps::fixtures::patterned_table;

    fn sweep(pairs: &[(SweepParameter, Vec<ParamValue>)]) -> OrchestrationConfig {
        OrchestrationConfig::new(pairs.iter().cloned().collect::<BTreeMap<_, _>>())
    }

    fn segments_and_seeds() -> OrchestrationConfig {
        sweep(&[
            (
                SweepParameter::NumSegments,
                vec![ParamValue::Int(2), ParamValue::Int(3)],
            ),
            (
                SweepParameter::RandomSeed,
                vec![ParamValue::Int(1), ParamValue::Int(2)],
            ),
        ])
    }

    #[test]
    fn test_grid_enumeration() {
        let orchestrator = Orchestrator::new(segments_and_seeds()).unwrap();
        assert_eq!(orchestrator.count_configs(), 4);
        let combos = orchestrator.valid_combinations();
        assert_eq!(combos.len(), 4);
        // Parameter order: num_segments varies slowest.
        assert_eq!(combos[0][&SweepParameter::NumSegments], ParamValue::Int(2));
        assert_eq!(combos[1][&SweepParameter::RandomSeed], ParamValue::Int(2));
        assert_eq!(combos[2][&SweepParameter::NumSegments], ParamValue::Int(3));
    }

    #[test]
    fn test_constraint_filters_grid() {
        let config = segments_and_seeds().with_constraint(Constraint::less_than(
            SweepParameter::RandomSeed,
            SweepParameter::NumSegments,
        ));
        let orchestrator = Orchestrator::new(config).unwrap();
        assert_eq!(orchestrator.count_configs(), 4);
        assert_eq!(orchestrator.valid_config_count(), 3);
    }

    #[test]
    fn test_constraint_on_unswept_parameter_passes() {
        let config = segments_and_seeds().with_constraint(Constraint::less_than(
            SweepParameter::MaxCrossLoading,
            SweepParameter::MinPrimaryLoading,
        ));
        let orchestrator = Orchestrator::new(config).unwrap();
        assert_eq!(orchestrator.valid_config_count(), 4);
    }

    #[test]
    fn test_run_returns_results_in_order() {
        let orchestrator = Orchestrator::new(segments_and_seeds()).unwrap();
        let run = orchestrator.run(patterned_table(40)).unwrap();
        assert_eq!(run.results.len(), 4);
        assert!(run.failures.is_empty());
        let ks: Vec<usize> = run.results.iter().map(|r| r.metrics.k).collect();
        assert_eq!(ks, vec![2, 2, 3, 3]);
        assert!(run.results.iter().enumerate().all(|(i, r)| r.index == i));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let table = Arc::new(patterned_table(40));
        let sequential = Orchestrator::new(segments_and_seeds())
            .unwrap()
            .run(Arc::clone(&table))
            .unwrap();
        let parallel = Orchestrator::new(segments_and_seeds().with_parallelism(3))
            .unwrap()
            .run(table)
            .unwrap();
        assert_eq!(sequential.results, parallel.results);
    }

    #[test]
    fn test_abort_policy_surfaces_failure() {
        let config = sweep(&[(
            SweepParameter::NumSegments,
            vec![ParamValue::Int(2), ParamValue::Int(50)],
        )]);
        let err = Orchestrator::new(config)
            .unwrap()
            .run(patterned_table(20))
            .unwrap_err();
        assert!(matches!(
            err,
            OrchestrationError::CombinationFailed {
                index: 1,
                source: SegmentationError::TooFewRespondents { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_skip_policy_collects_failures() {
        let config = sweep(&[(
            SweepParameter::NumSegments,
            vec![ParamValue::Int(50), ParamValue::Int(2)],
        )])
        .with_failure_policy(FailurePolicy::Skip);
        let run = Orchestrator::new(config)
            .unwrap()
            .run(patterned_table(20))
            .unwrap();
        assert_eq!(run.results.len(), 1);
        assert_eq!(run.results[0].index, 1);
        assert_eq!(run.failures.len(), 1);
        assert_eq!(run.failures[0].index, 0);
        assert_eq!(run.attempted(), 2);
    }

    #[test]
    fn test_bad_override_is_a_combination_failure() {
        let config = sweep(&[(
            SweepParameter::PcaMethod,
            vec![ParamValue::Text("scree".into())],
        )]);
        let err = Orchestrator::new(config)
            .unwrap()
            .run(patterned_table(20))
            .unwrap_err();
        assert!(matches!(
            err,
            OrchestrationError::CombinationFailed {
                source: SegmentationError::Config(_),
                ..
            }
        ));
    }

    #[test]
    fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let orchestrator = Orchestrator::new(segments_and_seeds())
            .unwrap()
            .with_cancellation(token);
        let err = orchestrator.run(patterned_table(20)).unwrap_err();
        assert!(matches!(err, OrchestrationError::Cancelled { completed: 0 }));
    }

    #[test]
    fn test_empty_value_list_rejected() {
        let config = sweep(&[(SweepParameter::NumSegments, vec![])]);
        assert!(matches!(
            Orchestrator::new(config),
            Err(OrchestrationError::Config(_))
        ));
    }
}
