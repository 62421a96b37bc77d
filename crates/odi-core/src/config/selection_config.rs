//! Acceptance floors and scoring weights for picking the final segmentation.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionRules {
    /// Smallest acceptable segment, as a percentage of respondents.
    pub min_segment_size_percent: f64,
    /// Smallest acceptable mean silhouette.
    pub min_silhouette: f64,
    pub silhouette_weight: f64,
    pub balance_weight: f64,
}

impl Default for SelectionRules {
    fn default() -> Self {
        Self {
            min_segment_size_percent: 10.0,
            min_silhouette: 0.25,
            silhouette_weight: 0.6,
            balance_weight: 0.4,
        }
    }
}

impl SelectionRules {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.min_segment_size_percent) {
            return Err(ConfigError::validation(
                "selection_rules.min_segment_size_percent",
                "must be between 0 and 100",
            ));
        }
        if !(-1.0..=1.0).contains(&self.min_silhouette) {
            return Err(ConfigError::validation(
                "selection_rules.min_silhouette",
                "must be between -1.0 and 1.0",
            ));
        }
        for (field, weight) in [
            ("selection_rules.silhouette_weight", self.silhouette_weight),
            ("selection_rules.balance_weight", self.balance_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::validation(field, "must be a non-negative number"));
            }
        }
        Ok(())
    }
}
