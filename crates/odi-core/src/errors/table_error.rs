//! Wide response table construction errors.

use super::error_code::{self, ErrorCode};
use crate::types::RespondentId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    #[error("Respondent {respondent} appears more than once")]
    DuplicateRespondent { respondent: RespondentId },

    #[error("Column {column} has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Column {column} row {row}: rating {value} outside [1, 5]")]
    RatingOutOfRange { column: String, row: usize, value: u8 },

    #[error("Unrecognized column name: {name}")]
    UnrecognizedColumn { name: String },

    #[error("Column {name} already present")]
    DuplicateColumn { name: String },

    #[error("Required column missing: {name}")]
    MissingColumn { name: String },
}

impl ErrorCode for TableError {
    fn error_code(&self) -> &'static str {
        error_code::TABLE_ERROR
    }
}
