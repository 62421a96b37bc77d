//! Outcome statements loader.
//!
//! A JSON array of `{"id": 1, "text": "Minimize the time it takes to ..."}`.

use std::io::Read;
use std::path::Path;

use odi_core::errors::LoadError;
use odi_core::models::{OutcomeCatalog, OutcomeDefinition};
use tracing::info;

use super::{open, read_json_array};

pub fn load_outcomes_file(path: &Path) -> Result<OutcomeCatalog, LoadError> {
    let catalog = load_outcomes(open(path)?)?;
    info!(path = %path.display(), outcomes = catalog.len(), "loaded outcome statements");
    Ok(catalog)
}

/// Statements must be non-blank.
pub fn load_outcomes<R: Read>(reader: R) -> Result<OutcomeCatalog, LoadError> {
    let outcomes: Vec<OutcomeDefinition> = read_json_array(reader)?;
    for (index, outcome) in outcomes.iter().enumerate() {
        if outcome.text.trim().is_empty() {
            return Err(LoadError::InvalidRecord {
                index: index + 1,
                message: format!("outcome {} has empty text", outcome.id),
            });
        }
    }
    Ok(OutcomeCatalog::new(outcomes))
}
