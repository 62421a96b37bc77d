//! Step 7: Assign segments — k-means over opportunity profiles, joined back
//! onto the full response table.

use odi_core::constants::KMEANS_MAX_ITERATIONS;
use odi_core::errors::StepError;
use odi_core::types::collections::FxHashMap;
use odi_core::types::{RespondentId, SegmentId};
use tracing::{debug, warn};

use crate::linalg::kmeans;
use crate::pipeline::{PipelineContext, SegmentedTable};

pub fn run(ctx: &mut PipelineContext, num_segments: usize, seed: u64) -> Result<(), StepError> {
    let profiles = ctx.opportunity_profiles()?;
    if profiles.scores.is_empty() {
        return Err(StepError::EmptyInput {
            what: "opportunity profiles",
        });
    }
    if num_segments == 0 {
        return Err(StepError::InvalidSegmentCount {
            requested: 0,
            respondents: profiles.scores.nrows(),
        });
    }

    let fit = kmeans(profiles.scores.view(), num_segments, seed, KMEANS_MAX_ITERATIONS)?;
    debug!(
        segments = num_segments,
        respondents = fit.labels.len(),
        iterations = fit.iterations,
        inertia = fit.inertia,
        "k-means converged"
    );

    let lookup: FxHashMap<RespondentId, SegmentId> = profiles
        .ratings
        .respondent_ids()
        .iter()
        .copied()
        .zip(fit.labels.iter().copied())
        .collect();
    let table = ctx.responses_arc();
    let segment_ids: Vec<Option<SegmentId>> = table
        .respondent_ids()
        .iter()
        .map(|id| lookup.get(id).copied())
        .collect();
    let segmented = SegmentedTable { table, segment_ids };
    let unmatched = segmented.unmatched();
    if unmatched > 0 {
        warn!(unmatched, "rows in the response table could not be assigned a segment");
    }

    ctx.set_segment_labels(fit.labels)?;
    ctx.set_segmented_table(segmented)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use odi_core::types::OutcomeId;

    use super::*;
    use crate::pipeline::steps::{fixtures, opportunity_profiles};

    fn prepared(n: usize) -> PipelineContext {
        let mut ctx = fixtures::context(n);
        ctx.set_key_outcomes(vec![OutcomeId::new(1), OutcomeId::new(3)])
            .unwrap();
        opportunity_profiles::run(&mut ctx).unwrap();
        ctx
    }

    #[test]
    fn test_every_respondent_labeled() {
        let mut ctx = prepared(40);
        run(&mut ctx, 3, 10).unwrap();
        let labels = ctx.segment_labels().unwrap();
        assert_eq!(labels.len(), 40);
        assert!(labels.iter().all(|&l| l < 3));

        let segmented = ctx.segmented_table().unwrap();
        assert_eq!(segmented.unmatched(), 0);
        assert_eq!(segmented.segment_ids.len(), 40);
        assert_eq!(segmented.segment_ids[0], Some(labels[0]));
    }

    #[test]
    fn test_same_seed_same_labels() {
        let mut a = prepared(40);
        let mut b = prepared(40);
        run(&mut a, 3, 7).unwrap();
        run(&mut b, 3, 7).unwrap();
        assert_eq!(a.segment_labels().unwrap(), b.segment_labels().unwrap());
    }

    #[test]
    fn test_zero_segments_rejected() {
        let mut ctx = prepared(10);
        assert!(matches!(
            run(&mut ctx, 0, 1),
            Err(StepError::InvalidSegmentCount { requested: 0, .. })
        ));
    }
}
