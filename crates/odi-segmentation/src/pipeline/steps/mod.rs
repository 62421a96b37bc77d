//! Stage implementations, one module per step.

pub mod assign_segments;
pub mod characterize;
pub mod factor_loadings;
pub mod key_outcomes;
pub mod opportunity_profiles;
pub mod pca_components;
pub mod preflight;
pub mod standardize;

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use odi_core::types::{OutcomeId, RespondentId, ResponseTable};

    use crate::pipeline::PipelineContext;

    fn rating(v: usize) -> u8 {
        (v % 5 + 1) as u8
    }

    /// Outcomes 1-2 move together, 3-4 move together, outcome 5 is noise.
    fn importance(outcome: u32, i: usize) -> u8 {
        match outcome {
            1 => rating(i),
            2 => rating(i + usize::from(i % 7 == 0)),
            3 => rating(i / 5),
            4 => rating(i / 5 + usize::from(i % 11 == 0)),
            _ => rating(i * 3 + i / 7),
        }
    }

    /// Table with `n` respondents and five outcomes of patterned ratings.
    pub fn patterned_table(n: usize) -> ResponseTable {
        let ids = (0..n as i64).map(|i| RespondentId::new(1000 + i)).collect();
        let mut table = ResponseTable::new(ids).unwrap();
        for outcome in 1..=5u32 {
            let imp = (0..n).map(|i| importance(outcome, i)).collect();
            let sat = (0..n).map(|i| rating(i * 2 + outcome as usize)).collect();
            table.insert_outcome(OutcomeId::new(outcome), imp, sat).unwrap();
        }
        table
    }

    pub fn context(n: usize) -> PipelineContext {
        PipelineContext::new(Arc::new(patterned_table(n)))
    }
}
