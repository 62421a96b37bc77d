//! Step 3: PCA component count — how many components to retain.

use odi_core::config::PcaMethod;
use odi_core::constants::{KAISER_EIGENVALUE_FLOOR, VARIANCE_RATIO_TARGET};
use odi_core::errors::StepError;
use tracing::debug;

use crate::linalg::fit_pca;
use crate::pipeline::PipelineContext;

pub fn run(ctx: &mut PipelineContext, method: PcaMethod) -> Result<(), StepError> {
    let z = ctx.standardized_importance()?;
    if z.values.is_empty() {
        return Err(StepError::EmptyInput {
            what: "standardized importance",
        });
    }
    let fit = fit_pca(z.values.view())?;
    let count = select_component_count(&fit.eigenvalues, method);
    debug!(method = %method, count, "selected component count");
    ctx.set_component_count(count)?;
    Ok(())
}

/// Apply the retention rule to descending eigenvalues.
///
/// The variance rule returns 1 when no prefix reaches the target, which only
/// happens for degenerate all-zero spectra.
pub fn select_component_count(eigenvalues: &[f64], method: PcaMethod) -> usize {
    match method {
        PcaMethod::Kaiser => eigenvalues
            .iter()
            .filter(|&&e| e > KAISER_EIGENVALUE_FLOOR)
            .count(),
        PcaMethod::VarianceThreshold => {
            let total: f64 = eigenvalues.iter().sum();
            let mut cumulative = 0.0;
            eigenvalues
                .iter()
                .position(|e| {
                    cumulative += e / total;
                    cumulative >= VARIANCE_RATIO_TARGET
                })
                .map_or(1, |i| i + 1)
        }
    }
}
