//! Step 8: Characterize segments — top-box shares and aggregate opportunity
//! per segment and outcome, plus segment sizes.

use std::collections::BTreeMap;

use odi_core::constants::{RATING_MAX, RATING_MIN};
use odi_core::errors::{StepError, TableError};
use odi_core::schema;
use odi_core::types::SegmentId;
use tracing::debug;

use crate::linalg::round_to;
use crate::opportunity::aggregate_opportunity;
use crate::pipeline::{PipelineContext, SegmentProfileRow, SegmentSize};

pub fn run(ctx: &mut PipelineContext, top_box_threshold: u8) -> Result<(), StepError> {
    if !(RATING_MIN..=RATING_MAX).contains(&top_box_threshold) {
        return Err(StepError::InvalidTopBoxThreshold {
            threshold: top_box_threshold,
        });
    }
    let segmented = ctx.segmented_table()?;
    let table = segmented.table.as_ref();

    // Row indices per segment; unlabeled rows are left out.
    let mut members: BTreeMap<SegmentId, Vec<usize>> = BTreeMap::new();
    for (row, label) in segmented.segment_ids.iter().enumerate() {
        if let Some(label) = label {
            members.entry(*label).or_default().push(row);
        }
    }
    let labeled: usize = members.values().map(Vec::len).sum();
    if labeled == 0 {
        return Err(StepError::EmptyInput {
            what: "segmented respondents",
        });
    }

    let outcomes = table.paired_outcomes();
    let mut profiles = Vec::with_capacity(members.len() * outcomes.len());
    for (&segment_id, rows) in &members {
        for &outcome_id in &outcomes {
            let imp = table
                .importance(outcome_id)
                .ok_or_else(|| missing(schema::importance_column(outcome_id)))?;
            let sat = table
                .satisfaction(outcome_id)
                .ok_or_else(|| missing(schema::satisfaction_column(outcome_id)))?;
            let imp_t2b = top_box_pct(imp, rows, top_box_threshold);
            let sat_t2b = top_box_pct(sat, rows, top_box_threshold);
            profiles.push(SegmentProfileRow {
                segment_id,
                outcome_id,
                sat_t2b,
                imp_t2b,
                opportunity: aggregate_opportunity(imp_t2b, sat_t2b)?,
            });
        }
    }

    let sizes: Vec<SegmentSize> = members
        .iter()
        .map(|(&segment_id, rows)| SegmentSize {
            segment_id,
            respondents: rows.len(),
            size_pct: round_to(rows.len() as f64 / labeled as f64 * 100.0, 1),
        })
        .collect();

    debug!(
        segments = sizes.len(),
        outcomes = outcomes.len(),
        "characterized segments"
    );
    ctx.set_segment_profiles(profiles)?;
    ctx.set_segment_sizes(sizes)?;
    Ok(())
}

fn missing(name: String) -> TableError {
    TableError::MissingColumn { name }
}

/// Percentage of `rows` rating at or above `threshold`, to one decimal.
fn top_box_pct(ratings: &[u8], rows: &[usize], threshold: u8) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    let hits = rows.iter().filter(|&&r| ratings[r] >= threshold).count();
    round_to(hits as f64 / rows.len() as f64 * 100.0, 1)
}
