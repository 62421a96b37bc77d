//! Thresholds for the opportunity-zone rule.

use serde::{Deserialize, Serialize};

use crate::constants::AGGREGATE_OPPORTUNITY_MAX;
use crate::errors::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneRules {
    /// Aggregate opportunity (0-20) at or above which an outcome is high-opportunity.
    pub opportunity_threshold: f64,
    /// Importance Top-2-Box percentage at or above which an outcome is important.
    pub importance_threshold: f64,
    /// Satisfaction Top-2-Box percentage at or above which an outcome is satisfied.
    pub satisfaction_threshold: f64,
}

impl Default for ZoneRules {
    fn default() -> Self {
        Self {
            opportunity_threshold: 10.0,
            importance_threshold: 60.0,
            satisfaction_threshold: 50.0,
        }
    }
}

impl ZoneRules {
    /// Opportunity lies on the aggregate 0-20 scale; the Top-2-Box
    /// thresholds are percentages.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value, max) in [
            (
                "zone_classification.opportunity_threshold",
                self.opportunity_threshold,
                AGGREGATE_OPPORTUNITY_MAX,
            ),
            (
                "zone_classification.importance_threshold",
                self.importance_threshold,
                100.0,
            ),
            (
                "zone_classification.satisfaction_threshold",
                self.satisfaction_threshold,
                100.0,
            ),
        ] {
            if !(0.0..=max).contains(&value) {
                return Err(ConfigError::validation(
                    field,
                    format!("{value} is outside [0, {max}]"),
                ));
            }
        }
        Ok(())
    }
}
