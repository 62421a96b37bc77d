//! JSON Lines respondents loader.
//!
//! One record per line, `respondentId` plus any demographic attributes:
//!
//! ```json
//! {"respondentId": 17, "D1": 2, "D2": 4}
//! ```

use std::collections::BTreeSet;
use std::io::BufRead;
use std::path::Path;

use odi_core::errors::LoadError;
use odi_core::models::{Respondent, Respondents};
use tracing::info;

use super::{open, parse_error};

pub fn load_respondents_file(path: &Path) -> Result<Respondents, LoadError> {
    let respondents = read_respondents(open(path)?, &path.display().to_string())?;
    info!(path = %path.display(), respondents = respondents.len(), "loaded respondents");
    Ok(respondents)
}

pub fn load_respondents<R: BufRead>(reader: R) -> Result<Respondents, LoadError> {
    read_respondents(reader, "<input>")
}

fn read_respondents<R: BufRead>(reader: R, source_name: &str) -> Result<Respondents, LoadError> {
    let mut records = Vec::new();
    let mut seen = BTreeSet::new();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|source| LoadError::Io {
            path: source_name.to_string(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let record: Respondent =
            serde_json::from_str(&line).map_err(|e| parse_error(line_no, &e))?;
        if !seen.insert(record.respondent_id) {
            return Err(LoadError::Parse {
                line: line_no,
                message: format!("duplicate respondentId {}", record.respondent_id),
            });
        }
        records.push(record);
    }
    if records.is_empty() {
        return Err(LoadError::Empty {
            what: "respondents",
        });
    }
    Ok(Respondents::new(records))
}
