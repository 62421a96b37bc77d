//! Step 5: Key outcomes — per component, the strongest outcomes that load
//! cleanly on it.

use odi_core::errors::StepError;
use odi_core::types::OutcomeId;
use tracing::debug;

use crate::pipeline::{FactorLoadings, PipelineContext};

/// Validated pair of loading thresholds: `0 <= max_cross < min_primary <= 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadingThresholds {
    max_cross: f64,
    min_primary: f64,
}

impl LoadingThresholds {
    pub fn new(max_cross: f64, min_primary: f64) -> Result<Self, StepError> {
        let valid = (0.0..=1.0).contains(&max_cross)
            && (0.0..=1.0).contains(&min_primary)
            && max_cross < min_primary;
        if !valid {
            return Err(StepError::InvalidLoadingThresholds {
                max_cross,
                min_primary,
            });
        }
        Ok(Self {
            max_cross,
            min_primary,
        })
    }

    pub fn max_cross(self) -> f64 {
        self.max_cross
    }

    pub fn min_primary(self) -> f64 {
        self.min_primary
    }
}

pub fn run(
    ctx: &mut PipelineContext,
    max_outcomes_per_component: usize,
    thresholds: LoadingThresholds,
) -> Result<(), StepError> {
    let loadings = ctx.factor_loadings()?;
    if loadings.values.is_empty() {
        return Err(StepError::EmptyInput {
            what: "factor loadings",
        });
    }
    let selected = select_key_outcomes(loadings, max_outcomes_per_component, thresholds);
    debug!(
        selected = selected.len(),
        max_cross = thresholds.max_cross(),
        min_primary = thresholds.min_primary(),
        "selected key outcomes"
    );
    ctx.set_key_outcomes(selected)?;
    Ok(())
}

/// Greedy per-component selection.
///
/// Outcomes are ranked by absolute loading; one is accepted when its loading
/// reaches `min_primary` and its largest loading on any other component stays
/// below `max_cross`. A component with no acceptable outcome contributes its
/// strongest one. The combined list is deduplicated in first-seen order.
pub fn select_key_outcomes(
    loadings: &FactorLoadings,
    max_outcomes_per_component: usize,
    thresholds: LoadingThresholds,
) -> Vec<OutcomeId> {
    let mut selected: Vec<OutcomeId> = Vec::new();

    for c in 0..loadings.n_components() {
        let column = loadings.component(c);
        let mut ranked: Vec<usize> = (0..loadings.outcomes.len()).collect();
        ranked.sort_by(|&a, &b| column[b].abs().total_cmp(&column[a].abs()));

        let mut accepted: Vec<usize> = Vec::new();
        for &i in &ranked {
            if accepted.len() >= max_outcomes_per_component {
                break;
            }
            if column[i].abs() < thresholds.min_primary {
                continue;
            }
            if loadings.max_cross_loading(i, c) < thresholds.max_cross {
                accepted.push(i);
            }
        }
        if accepted.is_empty() {
            accepted.extend(ranked.first().copied());
        }

        for i in accepted {
            let outcome = loadings.outcomes[i];
            if !selected.contains(&outcome) {
                selected.push(outcome);
            }
        }
    }
    selected
}
