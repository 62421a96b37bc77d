//! Step 2: Standardize importance — population z-score per importance column.

use ndarray::Array2;
use odi_core::errors::StepError;
use tracing::debug;

use crate::linalg::standardize_columns;
use crate::pipeline::{PipelineContext, StandardizedImportance};

pub fn run(ctx: &mut PipelineContext) -> Result<(), StepError> {
    let standardized = standardize_importance(ctx)?;
    debug!(
        respondents = standardized.values.nrows(),
        columns = standardized.outcomes.len(),
        "standardized importance"
    );
    ctx.set_standardized_importance(standardized)?;
    Ok(())
}

fn standardize_importance(ctx: &PipelineContext) -> Result<StandardizedImportance, StepError> {
    let table = ctx.responses();
    if table.is_empty() {
        return Err(StepError::EmptyInput {
            what: "response table",
        });
    }
    if table.importance_count() == 0 {
        return Err(StepError::NoImportanceColumns);
    }

    let outcomes = table.importance_outcomes();
    let mut raw = Array2::<f64>::zeros((table.len(), outcomes.len()));
    for (j, (_, column)) in table.importance_columns().enumerate() {
        for (i, &rating) in column.iter().enumerate() {
            raw[[i, j]] = f64::from(rating);
        }
    }

    Ok(StandardizedImportance {
        outcomes,
        values: standardize_columns(raw.view()),
    })
}
