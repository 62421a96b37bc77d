//! Outcome statements keyed by outcome id.

use serde::{Deserialize, Serialize};

use crate::types::OutcomeId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeDefinition {
    pub id: OutcomeId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutcomeCatalog {
    outcomes: Vec<OutcomeDefinition>,
}

impl OutcomeCatalog {
    pub fn new(outcomes: Vec<OutcomeDefinition>) -> Self {
        Self { outcomes }
    }

    /// Statement of `id`; the first definition wins if an id repeats.
    pub fn text(&self, id: OutcomeId) -> Option<&str> {
        self.outcomes
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OutcomeDefinition> {
        self.outcomes.iter()
    }
}
