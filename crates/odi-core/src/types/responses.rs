//! Wide-format survey responses: one row per respondent, one importance and
//! one satisfaction column per outcome.

use std::collections::BTreeMap;

use crate::constants::{RATING_MAX, RATING_MIN};
use crate::errors::TableError;
use crate::schema::{self, RatingKind};
use crate::types::collections::FxHashSet;
use crate::types::{OutcomeId, RespondentId};

/// Column-major wide response table.
///
/// Rows are addressed by position; `respondent_ids()[i]` owns row `i` of every
/// column. Outcome columns are kept sorted ascending by outcome id. Ratings are
/// validated into `[1, 5]` on insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseTable {
    respondent_ids: Vec<RespondentId>,
    importance: BTreeMap<OutcomeId, Vec<u8>>,
    satisfaction: BTreeMap<OutcomeId, Vec<u8>>,
}

impl ResponseTable {
    /// Create a table with the given row index and no rating columns.
    pub fn new(respondent_ids: Vec<RespondentId>) -> Result<Self, TableError> {
        let mut seen = FxHashSet::default();
        for id in &respondent_ids {
            if !seen.insert(*id) {
                return Err(TableError::DuplicateRespondent { respondent: *id });
            }
        }
        Ok(Self {
            respondent_ids,
            importance: BTreeMap::new(),
            satisfaction: BTreeMap::new(),
        })
    }

    pub fn insert_importance(
        &mut self,
        outcome: OutcomeId,
        ratings: Vec<u8>,
    ) -> Result<(), TableError> {
        self.insert(RatingKind::Importance, outcome, ratings)
    }

    pub fn insert_satisfaction(
        &mut self,
        outcome: OutcomeId,
        ratings: Vec<u8>,
    ) -> Result<(), TableError> {
        self.insert(RatingKind::Satisfaction, outcome, ratings)
    }

    /// Insert both rating columns for one outcome.
    pub fn insert_outcome(
        &mut self,
        outcome: OutcomeId,
        importance: Vec<u8>,
        satisfaction: Vec<u8>,
    ) -> Result<(), TableError> {
        self.insert_importance(outcome, importance)?;
        self.insert_satisfaction(outcome, satisfaction)
    }

    /// Insert a column addressed by its wide-format name.
    pub fn insert_column(&mut self, name: &str, ratings: Vec<u8>) -> Result<(), TableError> {
        let (kind, outcome) =
            schema::parse_rating_column(name).ok_or_else(|| TableError::UnrecognizedColumn {
                name: name.to_string(),
            })?;
        self.insert(kind, outcome, ratings)
    }

    fn insert(
        &mut self,
        kind: RatingKind,
        outcome: OutcomeId,
        ratings: Vec<u8>,
    ) -> Result<(), TableError> {
        let column = column_name(kind, outcome);
        if ratings.len() != self.respondent_ids.len() {
            return Err(TableError::LengthMismatch {
                column,
                expected: self.respondent_ids.len(),
                actual: ratings.len(),
            });
        }
        if let Some((row, &value)) = ratings
            .iter()
            .enumerate()
            .find(|(_, v)| !(RATING_MIN..=RATING_MAX).contains(*v))
        {
            return Err(TableError::RatingOutOfRange { column, row, value });
        }
        let target = match kind {
            RatingKind::Importance => &mut self.importance,
            RatingKind::Satisfaction => &mut self.satisfaction,
        };
        if target.contains_key(&outcome) {
            return Err(TableError::DuplicateColumn { name: column });
        }
        target.insert(outcome, ratings);
        Ok(())
    }

    pub fn respondent_ids(&self) -> &[RespondentId] {
        &self.respondent_ids
    }

    /// Number of respondents (rows).
    pub fn len(&self) -> usize {
        self.respondent_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.respondent_ids.is_empty()
    }

    pub fn importance_count(&self) -> usize {
        self.importance.len()
    }

    pub fn satisfaction_count(&self) -> usize {
        self.satisfaction.len()
    }

    pub fn importance(&self, outcome: OutcomeId) -> Option<&[u8]> {
        self.importance.get(&outcome).map(Vec::as_slice)
    }

    pub fn satisfaction(&self, outcome: OutcomeId) -> Option<&[u8]> {
        self.satisfaction.get(&outcome).map(Vec::as_slice)
    }

    /// Importance columns in ascending outcome order.
    pub fn importance_columns(&self) -> impl Iterator<Item = (OutcomeId, &[u8])> {
        self.importance.iter().map(|(id, col)| (*id, col.as_slice()))
    }

    /// Satisfaction columns in ascending outcome order.
    pub fn satisfaction_columns(&self) -> impl Iterator<Item = (OutcomeId, &[u8])> {
        self.satisfaction.iter().map(|(id, col)| (*id, col.as_slice()))
    }

    pub fn importance_outcomes(&self) -> Vec<OutcomeId> {
        self.importance.keys().copied().collect()
    }

    pub fn satisfaction_outcomes(&self) -> Vec<OutcomeId> {
        self.satisfaction.keys().copied().collect()
    }

    /// Outcomes that carry both an importance and a satisfaction column.
    pub fn paired_outcomes(&self) -> Vec<OutcomeId> {
        self.importance
            .keys()
            .filter(|id| self.satisfaction.contains_key(id))
            .copied()
            .collect()
    }

    /// True when importance and satisfaction columns cover the same outcomes.
    pub fn is_paired(&self) -> bool {
        self.importance.len() == self.satisfaction.len()
            && self.importance.keys().all(|id| self.satisfaction.contains_key(id))
    }

    /// Wide-format column names: respondent id, satisfaction, then importance.
    pub fn column_names(&self) -> Vec<String> {
        std::iter::once(schema::RESPONDENT_ID_COLUMN.to_string())
            .chain(self.satisfaction.keys().map(|id| schema::satisfaction_column(*id)))
            .chain(self.importance.keys().map(|id| schema::importance_column(*id)))
            .collect()
    }

    /// Project the table down to the given outcomes, keeping both rating
    /// columns of each.
    pub fn select_outcomes(&self, outcomes: &[OutcomeId]) -> Result<Self, TableError> {
        let mut selected = Self {
            respondent_ids: self.respondent_ids.clone(),
            importance: BTreeMap::new(),
            satisfaction: BTreeMap::new(),
        };
        for &outcome in outcomes {
            let importance = self.importance.get(&outcome).ok_or_else(|| {
                TableError::MissingColumn {
                    name: schema::importance_column(outcome),
                }
            })?;
            let satisfaction = self.satisfaction.get(&outcome).ok_or_else(|| {
                TableError::MissingColumn {
                    name: schema::satisfaction_column(outcome),
                }
            })?;
            selected.importance.insert(outcome, importance.clone());
            selected.satisfaction.insert(outcome, satisfaction.clone());
        }
        Ok(selected)
    }
}

fn column_name(kind: RatingKind, outcome: OutcomeId) -> String {
    match kind {
        RatingKind::Importance => schema::importance_column(outcome),
        RatingKind::Satisfaction => schema::satisfaction_column(outcome),
    }
}
