//! Input loading errors: responses, outcome statements, codebook, respondents.

use super::error_code::{self, ErrorCode};
use super::TableError;
use crate::types::{OutcomeId, RespondentId};

/// Errors raised while reading survey inputs. Line numbers are 1-based.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Line {line}: {field} = {value} is outside [1, 5]")]
    RatingOutOfRange {
        line: usize,
        field: &'static str,
        value: i64,
    },

    #[error("{} duplicate (respondent, outcome) pairs: {}", .pairs.len(), format_pairs(.pairs))]
    DuplicatePairs { pairs: Vec<(RespondentId, OutcomeId)> },

    #[error("{} (respondent, outcome) pairs have no rating: {}", .pairs.len(), format_pairs(.pairs))]
    MissingPairs { pairs: Vec<(RespondentId, OutcomeId)> },

    #[error("Record {index}: {message}")]
    InvalidRecord { index: usize, message: String },

    #[error("No {what} found")]
    Empty { what: &'static str },

    #[error("Table error: {0}")]
    Table(#[from] TableError),
}

/// Render pairs as `(r, o)` items, truncated after the first ten.
fn format_pairs(pairs: &[(RespondentId, OutcomeId)]) -> String {
    const SHOWN: usize = 10;
    let mut rendered: Vec<String> = pairs
        .iter()
        .take(SHOWN)
        .map(|(r, o)| format!("({r}, {o})"))
        .collect();
    if pairs.len() > SHOWN {
        rendered.push(format!("... and {} more", pairs.len() - SHOWN));
    }
    rendered.join(", ")
}

impl ErrorCode for LoadError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicatePairs { .. } => error_code::DUPLICATE_RESPONSES,
            Self::Table(e) => e.error_code(),
            _ => error_code::LOAD_ERROR,
        }
    }
}
