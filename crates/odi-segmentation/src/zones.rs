//! Zone Classifier.

use odi_core::config::ZoneRules;
use odi_core::errors::ConfigError;
use odi_core::models::{
    Segment, SegmentModel, Zone, ZoneBuckets, ZonedOutcome, ZonedSegment, ZonedSegmentModel,
};

use crate::linalg::round_to;

#[derive(Debug, Clone)]
pub struct ZoneClassifier {
    rules: ZoneRules,
}

impl ZoneClassifier {
    pub fn new(rules: ZoneRules) -> Result<Self, ConfigError> {
        rules.validate()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &ZoneRules {
        &self.rules
    }

    /// Rules are checked in order; the first match wins.
    pub fn classify(&self, importance: f64, satisfaction: f64, opportunity: f64) -> Zone {
        let high_opp = opportunity >= self.rules.opportunity_threshold;
        let high_imp = importance >= self.rules.importance_threshold;
        let high_sat = satisfaction >= self.rules.satisfaction_threshold;

        if high_opp && !high_sat {
            Zone::Underserved
        } else if high_imp && high_sat {
            Zone::TableStakes
        } else if !high_opp && high_sat && !high_imp {
            Zone::Overserved
        } else {
            Zone::AppropriatelyServed
        }
    }

    pub fn classify_segment(&self, segment: &Segment) -> ZonedSegment {
        let outcomes: Vec<ZonedOutcome> = segment
            .outcomes
            .iter()
            .map(|score| ZonedOutcome {
                zone: self.classify(score.imp_t2b, score.sat_t2b, score.opportunity),
                score: score.clone(),
                description: None,
            })
            .collect();

        let mut zones = ZoneBuckets::default();
        for outcome in &outcomes {
            zones.bucket_mut(outcome.zone).outcomes.push(outcome.clone());
        }
        let total = outcomes.len();
        for zone in Zone::ALL {
            let bucket = zones.bucket_mut(zone);
            bucket.pct = if total == 0 {
                0.0
            } else {
                round_to(bucket.outcomes.len() as f64 / total as f64 * 100.0, 1)
            };
        }

        ZonedSegment {
            segment_id: segment.segment_id,
            size_pct: segment.size_pct,
            outcomes,
            zones,
            demographics: None,
        }
    }

    pub fn classify_model(&self, model: &SegmentModel) -> ZonedSegmentModel {
        ZonedSegmentModel {
            segments: model
                .segments
                .iter()
                .map(|s| self.classify_segment(s))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use odi_core::models::OutcomeScore;
    use odi_core::types::OutcomeId;

    use super::*;

    fn classifier() -> ZoneClassifier {
        ZoneClassifier::new(ZoneRules::default()).unwrap()
    }

    #[test]
    fn test_each_zone() {
        let c = classifier();
        assert_eq!(c.classify(80.0, 30.0, 13.0), Zone::Underserved);
        assert_eq!(c.classify(80.0, 70.0, 9.0), Zone::TableStakes);
        assert_eq!(c.classify(40.0, 70.0, 4.0), Zone::Overserved);
        assert_eq!(c.classify(40.0, 30.0, 4.0), Zone::AppropriatelyServed);
    }

    #[test]
    fn test_underserved_checked_before_table_stakes() {
        // High opportunity and high satisfaction is not underserved.
        let c = classifier();
        assert_eq!(c.classify(90.0, 50.0, 13.0), Zone::TableStakes);
        assert_eq!(c.classify(40.0, 50.0, 13.0), Zone::AppropriatelyServed);
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let c = classifier();
        assert_eq!(c.classify(60.0, 49.9, 10.0), Zone::Underserved);
        assert_eq!(c.classify(60.0, 50.0, 0.0), Zone::TableStakes);
    }

    #[test]
    fn test_out_of_range_rules_rejected() {
        let rules = ZoneRules {
            opportunity_threshold: -5.0,
            importance_threshold: -10.0,
            satisfaction_threshold: 250.0,
        };
        assert!(ZoneClassifier::new(rules).is_err());
    }

    #[test]
    fn test_segment_buckets() {
        let score = |id, imp, sat, opp| OutcomeScore {
            outcome_id: OutcomeId::new(id),
            sat_t2b: sat,
            imp_t2b: imp,
            opportunity: opp,
        };
        let segment = Segment {
            segment_id: 1,
            size_pct: 42.5,
            outcomes: vec![
                score(1, 80.0, 30.0, 13.0),
                score(2, 85.0, 20.0, 15.0),
                score(3, 40.0, 70.0, 4.0),
            ],
        };
        let zoned = classifier().classify_segment(&segment);
        assert_eq!(zoned.segment_id, 1);
        assert_eq!(zoned.outcomes.len(), 3);
        assert_eq!(zoned.zones.underserved.outcomes.len(), 2);
        assert_eq!(zoned.zones.underserved.pct, 66.7);
        assert_eq!(zoned.zones.overserved.pct, 33.3);
        assert_eq!(zoned.zones.table_stakes.pct, 0.0);
        assert_eq!(zoned.zones.bucket(Zone::AppropriatelyServed).outcomes.len(), 0);
    }
}
