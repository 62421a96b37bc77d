//! Step 6: Opportunity profiles — per-respondent opportunity on key outcomes.

use ndarray::Array2;
use odi_core::errors::{StepError, TableError};
use tracing::debug;

use crate::opportunity::individual_opportunity;
use crate::pipeline::{OpportunityProfiles, PipelineContext};

pub fn run(ctx: &mut PipelineContext) -> Result<(), StepError> {
    let keys = ctx.key_outcomes()?.to_vec();
    if keys.is_empty() {
        return Err(StepError::EmptyInput {
            what: "key outcomes",
        });
    }
    let ratings = ctx.responses().select_outcomes(&keys)?;

    let mut scores = Array2::<f64>::zeros((ratings.len(), keys.len()));
    for (j, &outcome) in keys.iter().enumerate() {
        let (imp, sat) = ratings
            .importance(outcome)
            .zip(ratings.satisfaction(outcome))
            .ok_or_else(|| TableError::MissingColumn {
                name: odi_core::schema::opportunity_column(outcome),
            })?;
        for (i, (&imp, &sat)) in imp.iter().zip(sat).enumerate() {
            scores[[i, j]] = f64::from(individual_opportunity(imp, sat));
        }
    }

    debug!(
        respondents = ratings.len(),
        outcomes = keys.len(),
        "computed opportunity profiles"
    );
    ctx.set_opportunity_profiles(OpportunityProfiles {
        ratings,
        outcomes: keys,
        scores,
    })?;
    Ok(())
}
