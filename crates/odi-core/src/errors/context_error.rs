//! Pipeline context errors.

use super::error_code::{self, ErrorCode};
use crate::schema::ArtifactKey;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("Missing artifact: {key}")]
    MissingArtifact { key: ArtifactKey },

    #[error("Artifact already written: {key}")]
    AlreadyWritten { key: ArtifactKey },
}

impl ErrorCode for ContextError {
    fn error_code(&self) -> &'static str {
        error_code::CONTEXT_ERROR
    }
}
