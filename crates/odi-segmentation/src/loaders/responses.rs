//! JSON Lines responses loader.
//!
//! One record per line:
//!
//! ```json
//! {"respondentId": 17, "outcomeId": 3, "importance": 5, "satisfaction": 2}
//! ```
//!
//! Records are validated strictly (no coercion of out-of-range ratings) and
//! pivoted into a wide [`ResponseTable`] with respondents and outcomes sorted
//! ascending. Every respondent must rate every outcome exactly once.

use std::collections::{BTreeMap, BTreeSet};
use std::io::BufRead;
use std::path::Path;

use odi_core::constants::{RATING_MAX, RATING_MIN};
use odi_core::errors::LoadError;
use odi_core::types::{OutcomeId, RespondentId, ResponseTable};
use serde::Deserialize;
use tracing::{debug, info};

use super::{open, parse_error};

/// One respondent's ratings of one outcome.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    pub respondent_id: i64,
    pub outcome_id: u32,
    pub importance: i64,
    pub satisfaction: i64,
}

pub fn load_responses_file(path: &Path) -> Result<ResponseTable, LoadError> {
    let table = read_responses(open(path)?, &path.display().to_string())?;
    info!(
        path = %path.display(),
        respondents = table.len(),
        outcomes = table.importance_count(),
        "loaded responses"
    );
    Ok(table)
}

pub fn load_responses<R: BufRead>(reader: R) -> Result<ResponseTable, LoadError> {
    read_responses(reader, "<input>")
}

fn read_responses<R: BufRead>(reader: R, source_name: &str) -> Result<ResponseTable, LoadError> {
    let mut ratings: BTreeMap<(RespondentId, OutcomeId), (u8, u8)> = BTreeMap::new();
    let mut duplicates: BTreeSet<(RespondentId, OutcomeId)> = BTreeSet::new();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|source| LoadError::Io {
            path: source_name.to_string(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let record: ResponseRecord =
            serde_json::from_str(&line).map_err(|e| parse_error(line_no, &e))?;
        let importance = rating(line_no, "importance", record.importance)?;
        let satisfaction = rating(line_no, "satisfaction", record.satisfaction)?;
        let key = (
            RespondentId::new(record.respondent_id),
            OutcomeId::new(record.outcome_id),
        );
        if ratings.insert(key, (importance, satisfaction)).is_some() {
            duplicates.insert(key);
        }
    }

    if !duplicates.is_empty() {
        return Err(LoadError::DuplicatePairs {
            pairs: duplicates.into_iter().collect(),
        });
    }
    if ratings.is_empty() {
        return Err(LoadError::Empty {
            what: "response records",
        });
    }
    debug!(records = ratings.len(), "parsed response records");
    pivot(&ratings)
}

fn rating(line: usize, field: &'static str, value: i64) -> Result<u8, LoadError> {
    u8::try_from(value)
        .ok()
        .filter(|v| (RATING_MIN..=RATING_MAX).contains(v))
        .ok_or(LoadError::RatingOutOfRange { line, field, value })
}

/// Long to wide, rejecting any (respondent, outcome) cell without a rating.
fn pivot(ratings: &BTreeMap<(RespondentId, OutcomeId), (u8, u8)>) -> Result<ResponseTable, LoadError> {
    let respondents: BTreeSet<RespondentId> = ratings.keys().map(|(r, _)| *r).collect();
    let outcomes: BTreeSet<OutcomeId> = ratings.keys().map(|(_, o)| *o).collect();

    let mut missing = Vec::new();
    let mut columns: Vec<(OutcomeId, Vec<u8>, Vec<u8>)> = Vec::with_capacity(outcomes.len());
    for &outcome in &outcomes {
        let mut importance = Vec::with_capacity(respondents.len());
        let mut satisfaction = Vec::with_capacity(respondents.len());
        for &respondent in &respondents {
            match ratings.get(&(respondent, outcome)) {
                Some(&(imp, sat)) => {
                    importance.push(imp);
                    satisfaction.push(sat);
                }
                None => missing.push((respondent, outcome)),
            }
        }
        columns.push((outcome, importance, satisfaction));
    }
    if !missing.is_empty() {
        missing.sort();
        return Err(LoadError::MissingPairs { pairs: missing });
    }

    let mut table = ResponseTable::new(respondents.into_iter().collect())?;
    for (outcome, importance, satisfaction) in columns {
        table.insert_outcome(outcome, importance, satisfaction)?;
    }
    Ok(table)
}
