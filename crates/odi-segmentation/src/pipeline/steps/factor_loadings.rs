//! Step 4: Factor loadings — PCA restricted to the retained components.

use odi_core::errors::StepError;
use odi_core::schema;
use tracing::debug;

use crate::linalg::fit_pca;
use crate::pipeline::{FactorLoadings, PipelineContext};

pub fn run(ctx: &mut PipelineContext) -> Result<(), StepError> {
    let n_components = ctx.component_count()?;
    if n_components == 0 {
        return Err(StepError::ZeroComponents);
    }
    let z = ctx.standardized_importance()?;
    if z.values.is_empty() {
        return Err(StepError::EmptyInput {
            what: "standardized importance",
        });
    }

    let fit = fit_pca(z.values.view())?;
    let values = fit.loadings(n_components);
    let loadings = FactorLoadings {
        outcomes: z.outcomes.clone(),
        components: (0..values.ncols()).map(schema::component_label).collect(),
        values,
    };
    debug!(
        outcomes = loadings.outcomes.len(),
        components = loadings.n_components(),
        "computed factor loadings"
    );
    ctx.set_factor_loadings(loadings)?;
    Ok(())
}
