//! Enrichment of a zoned segment model with outcome statements and
//! per-segment demographic breakdowns.
//!
//! Demographics are computed for categorical codebook dimensions only.
//! Answers listed as missing codes are dropped before percentages are
//! taken; codes absent from the option map are labelled `Unknown (<code>)`.

use std::collections::BTreeMap;

use odi_core::errors::EnrichError;
use odi_core::models::{
    CategoryShare, Codebook, Dimension, DimensionBreakdown, OutcomeCatalog, Respondent,
    Respondents, ZonedSegmentModel,
};
use odi_core::types::collections::{FxHashMap, FxHashSet};
use odi_core::types::{RespondentId, SegmentId};
use tracing::{debug, info, warn};

use crate::linalg::round_to;

/// Optional inputs to [`enrich`]. Respondents require a codebook.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnrichmentSources<'a> {
    pub outcomes: Option<&'a OutcomeCatalog>,
    pub respondents: Option<&'a Respondents>,
    pub codebook: Option<&'a Codebook>,
}

impl<'a> EnrichmentSources<'a> {
    pub fn with_outcomes(mut self, outcomes: &'a OutcomeCatalog) -> Self {
        self.outcomes = Some(outcomes);
        self
    }

    pub fn with_demographics(mut self, respondents: &'a Respondents, codebook: &'a Codebook) -> Self {
        self.respondents = Some(respondents);
        self.codebook = Some(codebook);
        self
    }
}

/// Attach outcome statements and demographic breakdowns to `model`.
///
/// Inputs are checked before anything is written, so a failed call leaves
/// the model untouched.
pub fn enrich(
    model: &mut ZonedSegmentModel,
    assignments: &BTreeMap<SegmentId, Vec<RespondentId>>,
    sources: &EnrichmentSources<'_>,
) -> Result<(), EnrichError> {
    let demographics = match sources.respondents {
        Some(respondents) => {
            let codebook = sources.codebook.ok_or(EnrichError::MissingCodebook)?;
            if assignments.values().all(Vec::is_empty) {
                return Err(EnrichError::MissingAssignments);
            }
            Some((respondents, codebook))
        }
        None => None,
    };

    if let Some(outcomes) = sources.outcomes {
        describe_outcomes(model, outcomes);
    }
    if let Some((respondents, codebook)) = demographics {
        for segment in &mut model.segments {
            let members = assignments
                .get(&segment.segment_id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            segment.demographics = Some(segment_demographics(members, respondents, codebook));
            debug!(segment = segment.segment_id, members = members.len(), "segment demographics");
        }
        info!(
            segments = model.segments.len(),
            dimensions = codebook.categorical().count(),
            "added demographic breakdowns"
        );
    }
    Ok(())
}

fn describe_outcomes(model: &mut ZonedSegmentModel, outcomes: &OutcomeCatalog) {
    let mut missing = FxHashSet::default();
    for segment in &mut model.segments {
        for outcome in segment.outcomes_mut() {
            let id = outcome.score.outcome_id;
            let text = match outcomes.text(id) {
                Some(text) => text.to_string(),
                None => {
                    if missing.insert(id) {
                        warn!(outcome = %id, "no statement for outcome");
                    }
                    format!("Outcome {id} (description missing)")
                }
            };
            outcome.description = Some(text);
        }
    }
}

/// Breakdowns for one segment, in codebook order.
pub fn segment_demographics(
    members: &[RespondentId],
    respondents: &Respondents,
    codebook: &Codebook,
) -> Vec<DimensionBreakdown> {
    if members.is_empty() {
        return Vec::new();
    }
    let ids: FxHashSet<RespondentId> = members.iter().copied().collect();
    let in_segment: Vec<&Respondent> = respondents
        .iter()
        .filter(|r| ids.contains(&r.respondent_id))
        .collect();

    codebook
        .categorical()
        .filter_map(|dimension| {
            if !respondents.has_attribute(&dimension.id) {
                warn!(dimension = %dimension.id, "dimension not present in respondent data");
                return None;
            }
            Some(DimensionBreakdown {
                dimension: dimension.name.clone(),
                shares: shares(dimension, &in_segment),
            })
        })
        .collect()
}

/// Percentage per label, largest first; equal shares keep code order.
fn shares(dimension: &Dimension, respondents: &[&Respondent]) -> Vec<CategoryShare> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for code in respondents.iter().filter_map(|r| r.code(&dimension.id)) {
        if !dimension.is_missing_code(&code) {
            *counts.entry(code).or_default() += 1;
        }
    }
    let total: usize = counts.values().sum();
    if total == 0 {
        return Vec::new();
    }

    let mut by_label: Vec<(String, usize)> = Vec::new();
    let mut position: FxHashMap<String, usize> = FxHashMap::default();
    for (code, count) in counts {
        let label = match dimension.label(&code) {
            Some(label) => label.to_string(),
            None => format!("Unknown ({code})"),
        };
        match position.get(&label) {
            Some(&i) => by_label[i].1 += count,
            None => {
                position.insert(label.clone(), by_label.len());
                by_label.push((label, count));
            }
        }
    }

    let mut shares: Vec<CategoryShare> = by_label
        .into_iter()
        .map(|(label, count)| CategoryShare {
            label,
            pct: round_to(count as f64 / total as f64 * 100.0, 1),
        })
        .collect();
    shares.sort_by(|a, b| b.pct.total_cmp(&a.pct));
    shares
}

#[cfg(test)]
mod tests {
    use odi_core::config::ZoneRules;
    use odi_core::models::{OutcomeDefinition, OutcomeScore, Segment, SegmentModel, Zone};
    use odi_core::types::OutcomeId;

    use super::*;
    use crate::zones::ZoneClassifier;

    fn model() -> ZonedSegmentModel {
        let score = |id, imp, sat, opp| OutcomeScore {
            outcome_id: OutcomeId::new(id),
            sat_t2b: sat,
            imp_t2b: imp,
            opportunity: opp,
        };
        let segments = (0..2)
            .map(|segment_id| Segment {
                segment_id,
                size_pct: 50.0,
                outcomes: vec![score(1, 80.0, 30.0, 13.0), score(2, 40.0, 70.0, 4.0)],
            })
            .collect();
        ZoneClassifier::new(ZoneRules::default())
            .unwrap()
            .classify_model(&SegmentModel::new(segments))
    }

    fn catalog() -> OutcomeCatalog {
        OutcomeCatalog::new(vec![OutcomeDefinition {
            id: OutcomeId::new(1),
            text: "Minimize the time to find a slot".to_string(),
        }])
    }

    fn codebook() -> Codebook {
        serde_json::from_str(
            r#"[
                {"id": "D1", "name": "Gender", "type": "categorical",
                 "options": {"1": "Female", "2": "Male", "9": "No Response"},
                 "missing_codes": ["9"]},
                {"id": "D2", "name": "Region", "type": "categorical",
                 "options": {"1": "North", "2": "South"}},
                {"id": "D3", "name": "Income", "type": "categorical",
                 "options": {"1": "Low"}},
                {"id": "D4", "name": "Comments", "type": "text"}
            ]"#,
        )
        .unwrap()
    }

    fn respondents() -> Respondents {
        let lines = [
            r#"{"respondentId": 1, "D1": 1, "D2": 1, "D4": "fine"}"#,
            r#"{"respondentId": 2, "D1": 1, "D2": 2}"#,
            r#"{"respondentId": 3, "D1": 2, "D2": 1}"#,
            r#"{"respondentId": 4, "D1": 9, "D2": 7}"#,
            r#"{"respondentId": 5, "D1": 2, "D2": 2}"#,
            r#"{"respondentId": 6, "D1": 9}"#,
        ];
        Respondents::new(
            lines
                .iter()
                .map(|l| serde_json::from_str(l).unwrap())
                .collect(),
        )
    }

    fn assignments() -> BTreeMap<SegmentId, Vec<RespondentId>> {
        let ids = |v: &[i64]| v.iter().map(|&i| RespondentId::new(i)).collect();
        BTreeMap::from([(0, ids(&[1, 2, 3, 4])), (1, ids(&[5, 6]))])
    }

    #[test]
    fn test_descriptions_with_fallback() {
        let mut model = model();
        let catalog = catalog();
        let sources = EnrichmentSources::default().with_outcomes(&catalog);
        enrich(&mut model, &assignments(), &sources).unwrap();

        let segment = &mut model.segments[0];
        assert_eq!(
            segment.outcomes[0].description.as_deref(),
            Some("Minimize the time to find a slot")
        );
        assert_eq!(
            segment.outcomes[1].description.as_deref(),
            Some("Outcome 2 (description missing)")
        );
        // Bucket copies are described too.
        assert_eq!(segment.zones.bucket(Zone::Underserved).outcomes.len(), 1);
        assert!(segment.outcomes_mut().all(|o| o.description.is_some()));
        assert!(segment.demographics.is_none());
    }

    #[test]
    fn test_demographic_shares() {
        let mut model = model();
        let (respondents, codebook) = (respondents(), codebook());
        let sources = EnrichmentSources::default().with_demographics(&respondents, &codebook);
        enrich(&mut model, &assignments(), &sources).unwrap();

        let first = model.segments[0].demographics.as_ref().unwrap();
        // Income has no answers in the data; Comments is free text.
        let names: Vec<&str> = first.iter().map(|b| b.dimension.as_str()).collect();
        assert_eq!(names, vec!["Gender", "Region"]);

        // Respondent 4 answered "No Response", which is excluded.
        let gender = &first[0];
        assert_eq!(gender.shares[0].label, "Female");
        assert_eq!(gender.share("Female"), Some(66.7));
        assert_eq!(gender.share("Male"), Some(33.3));
        assert_eq!(gender.share("No Response"), None);

        let region = &first[1];
        assert_eq!(region.share("North"), Some(50.0));
        assert_eq!(region.share("South"), Some(25.0));
        assert_eq!(region.share("Unknown (7)"), Some(25.0));

        let second = model.segments[1].demographics.as_ref().unwrap();
        assert_eq!(second[0].share("Male"), Some(100.0));
        assert_eq!(second[1].share("South"), Some(100.0));
        assert!(model.segments[0].outcomes[0].description.is_none());
    }

    #[test]
    fn test_only_missing_codes_gives_empty_breakdown() {
        let respondents = Respondents::new(vec![
            serde_json::from_str(r#"{"respondentId": 1, "D1": 9, "D2": 1}"#).unwrap(),
        ]);
        let breakdowns =
            segment_demographics(&[RespondentId::new(1)], &respondents, &codebook());
        assert!(breakdowns[0].shares.is_empty());
        assert_eq!(breakdowns[1].share("North"), Some(100.0));
    }

    #[test]
    fn test_segment_without_members() {
        let mut model = model();
        let (respondents, codebook) = (respondents(), codebook());
        let mut assignments = assignments();
        assignments.remove(&1);
        let sources = EnrichmentSources::default().with_demographics(&respondents, &codebook);
        enrich(&mut model, &assignments, &sources).unwrap();
        assert_eq!(model.segments[1].demographics, Some(Vec::new()));
    }

    #[test]
    fn test_respondents_without_codebook() {
        let mut model = model();
        let untouched = model.clone();
        let (catalog, respondents) = (catalog(), respondents());
        let sources = EnrichmentSources {
            outcomes: Some(&catalog),
            respondents: Some(&respondents),
            codebook: None,
        };
        let err = enrich(&mut model, &assignments(), &sources).unwrap_err();
        assert_eq!(err, EnrichError::MissingCodebook);
        assert_eq!(model, untouched);
    }

    #[test]
    fn test_demographics_need_assignments() {
        let mut model = model();
        let (respondents, codebook) = (respondents(), codebook());
        let sources = EnrichmentSources::default().with_demographics(&respondents, &codebook);
        let err = enrich(&mut model, &BTreeMap::new(), &sources).unwrap_err();
        assert_eq!(err, EnrichError::MissingAssignments);
    }
}
