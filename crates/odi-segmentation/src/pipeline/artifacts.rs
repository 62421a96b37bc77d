//! Typed intermediate artifacts passed between pipeline steps.

use std::sync::Arc;

use ndarray::{Array2, ArrayView1};
use odi_core::schema;
use odi_core::types::{OutcomeId, ResponseTable, SegmentId};

/// Z-scored importance ratings: rows follow the response table, columns
/// follow `outcomes`.
#[derive(Debug, Clone)]
pub struct StandardizedImportance {
    pub outcomes: Vec<OutcomeId>,
    pub values: Array2<f64>,
}

impl StandardizedImportance {
    pub fn column_names(&self) -> Vec<String> {
        self.outcomes.iter().map(|o| schema::importance_column(*o)).collect()
    }
}

/// PCA loadings: one row per importance column, one column per component.
#[derive(Debug, Clone)]
pub struct FactorLoadings {
    pub outcomes: Vec<OutcomeId>,
    /// `pc_1` .. `pc_n`.
    pub components: Vec<String>,
    pub values: Array2<f64>,
}

impl FactorLoadings {
    pub fn n_components(&self) -> usize {
        self.components.len()
    }

    /// Loadings of every outcome on component `c`.
    pub fn component(&self, c: usize) -> ArrayView1<'_, f64> {
        self.values.column(c)
    }

    /// Largest absolute loading of row `outcome_idx` on any component other
    /// than `c`; 0 with a single component.
    pub fn max_cross_loading(&self, outcome_idx: usize, c: usize) -> f64 {
        self.values
            .row(outcome_idx)
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != c)
            .map(|(_, v)| v.abs())
            .fold(0.0, f64::max)
    }
}

/// Raw ratings of the key outcomes plus their individual opportunity scores.
#[derive(Debug, Clone)]
pub struct OpportunityProfiles {
    /// Response table projected onto the key outcomes.
    pub ratings: ResponseTable,
    /// Key outcomes, in selection order.
    pub outcomes: Vec<OutcomeId>,
    /// Rows follow `ratings`, columns follow `outcomes`; values in 1-10.
    pub scores: Array2<f64>,
}

impl OpportunityProfiles {
    pub fn column_names(&self) -> Vec<String> {
        let mut names = self.ratings.column_names();
        names.extend(self.outcomes.iter().map(|o| schema::opportunity_column(*o)));
        names
    }
}

/// Full response table with a segment label per row.
///
/// A `None` label marks a row that failed to match a clustered respondent.
#[derive(Debug, Clone)]
pub struct SegmentedTable {
    pub table: Arc<ResponseTable>,
    pub segment_ids: Vec<Option<SegmentId>>,
}

impl SegmentedTable {
    pub fn column_names(&self) -> Vec<String> {
        let mut names = self.table.column_names();
        names.push(schema::SEGMENT_ID_COLUMN.to_string());
        names
    }

    pub fn unmatched(&self) -> usize {
        self.segment_ids.iter().filter(|s| s.is_none()).count()
    }
}

/// Top-2-Box characterization of one outcome within one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentProfileRow {
    pub segment_id: SegmentId,
    pub outcome_id: OutcomeId,
    pub sat_t2b: f64,
    pub imp_t2b: f64,
    pub opportunity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSize {
    pub segment_id: SegmentId,
    pub respondents: usize,
    pub size_pct: f64,
}
