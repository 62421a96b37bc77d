//! Input loaders.

pub mod codebook;
pub mod outcomes;
pub mod respondents;
pub mod responses;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use odi_core::errors::LoadError;

pub use codebook::{load_codebook, load_codebook_file};
pub use outcomes::{load_outcomes, load_outcomes_file};
pub use respondents::{load_respondents, load_respondents_file};
pub use responses::{load_responses, load_responses_file, ResponseRecord};

fn open(path: &Path) -> Result<BufReader<File>, LoadError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })
}

fn parse_error(line: usize, error: &serde_json::Error) -> LoadError {
    LoadError::Parse {
        line,
        message: error.to_string(),
    }
}

/// Parse a whole JSON document that must be a top-level array.
fn read_json_array<T, R>(reader: R) -> Result<Vec<T>, LoadError>
where
    T: serde::de::DeserializeOwned,
    R: std::io::Read,
{
    serde_json::from_reader(reader).map_err(|e| parse_error(e.line(), &e))
}
