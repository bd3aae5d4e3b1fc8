use crate::domain::device::DeviceId;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// The kind of mutation rejected by the in-use rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    Update,
    Delete,
}

impl OperationType {
    fn rejection_hint(&self) -> &'static str {
        match self {
            OperationType::Delete => "The device cannot be deleted.",
            OperationType::Update => "These field(s) cannot be updated.",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationType::Update => f.write_str("UPDATE"),
            OperationType::Delete => f.write_str("DELETE"),
        }
    }
}

/// A single violated field constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Device with id {0} not found")]
    DeviceNotFound(DeviceId),

    #[error(
        "Device with id {id} is being used. {} Change the current state of the device.",
        .operation.rejection_hint()
    )]
    DeviceInUse {
        id: DeviceId,
        operation: OperationType,
    },

    #[error("Validation failed: {}", format_field_errors(.0))]
    ValidationFailed(Vec<FieldError>),

    #[error("Patch test failed: {0}")]
    PatchTestFailed(String),

    #[error("Patch path not found: {0}")]
    PatchPathNotFound(String),

    #[error("Patch result is not a valid device: {0}")]
    PatchResultInvalid(String),

    #[error("Malformed patch: {0}")]
    PatchMalformed(String),

    #[error("Repository error: {0}")]
    RepositoryError(#[from] anyhow::Error),
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_use_message_distinguishes_operation() {
        let delete = DomainError::DeviceInUse {
            id: 3,
            operation: OperationType::Delete,
        };
        let update = DomainError::DeviceInUse {
            id: 3,
            operation: OperationType::Update,
        };

        assert_eq!(
            delete.to_string(),
            "Device with id 3 is being used. The device cannot be deleted. Change the current state of the device."
        );
        assert_eq!(
            update.to_string(),
            "Device with id 3 is being used. These field(s) cannot be updated. Change the current state of the device."
        );
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            DomainError::DeviceNotFound(42).to_string(),
            "Device with id 42 not found"
        );
    }

    #[test]
    fn test_validation_message_lists_fields() {
        let error = DomainError::ValidationFailed(vec![
            FieldError {
                field: "name".to_string(),
                message: "length is lower than 2".to_string(),
            },
            FieldError {
                field: "brand".to_string(),
                message: "length is lower than 2".to_string(),
            },
        ]);
        let message = error.to_string();
        assert!(message.contains("name: length is lower than 2"));
        assert!(message.contains("brand: "));
    }
}
