//! JSON Patch (RFC 6902) application over `serde_json::Value` documents.
//!
//! Operations are applied in order to a private copy of the input; the copy is
//! only returned when every operation succeeds.

use common::domain::DomainError;
use json_patch::PatchErrorKind;
use serde_json::Value;
use thiserror::Error;

pub use json_patch::{Patch, PatchOperation};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatchError {
    #[error("test failed at path '{path}'")]
    TestFailed { path: String },

    #[error("no value at path '{path}'")]
    PathNotFound { path: String },

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("malformed patch document: {0}")]
    Malformed(String),
}

impl From<json_patch::PatchError> for PatchError {
    fn from(error: json_patch::PatchError) -> Self {
        let path = error.path.to_string();
        match error.kind {
            PatchErrorKind::TestFailed => PatchError::TestFailed { path },
            PatchErrorKind::CannotMoveInsideItself => {
                PatchError::InvalidOperation(error.to_string())
            }
            _ => PatchError::PathNotFound { path },
        }
    }
}

impl From<PatchError> for DomainError {
    fn from(error: PatchError) -> Self {
        match error {
            PatchError::TestFailed { path } => DomainError::PatchTestFailed(path),
            PatchError::PathNotFound { path } => DomainError::PatchPathNotFound(path),
            other => DomainError::PatchMalformed(other.to_string()),
        }
    }
}

/// Decode an `application/json-patch+json` body
pub fn parse_patch(body: &[u8]) -> Result<Vec<PatchOperation>, PatchError> {
    serde_json::from_slice::<Patch>(body)
        .map(|patch| patch.0)
        .map_err(|e| PatchError::Malformed(e.to_string()))
}

/// Apply `operations` in order to a copy of `document`
pub fn apply(document: &Value, operations: &[PatchOperation]) -> Result<Value, PatchError> {
    let mut working = document.clone();
    json_patch::patch(&mut working, operations)?;
    Ok(working)
}
