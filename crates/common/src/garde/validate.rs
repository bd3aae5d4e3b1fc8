//! Garde validation utilities.

use crate::domain::{DomainError, FieldError};
use ::garde::{Report, Validate};

/// Convert garde validation report to DomainError
pub fn validate_struct<T>(value: &T) -> Result<(), DomainError>
where
    T: Validate,
    T::Context: Default,
{
    value
        .validate()
        .map_err(|report| DomainError::ValidationFailed(field_errors(&report)))
}

/// One entry per violated field. A field failing several rules keeps the first message.
fn field_errors(report: &Report) -> Vec<FieldError> {
    let mut errors: Vec<FieldError> = Vec::new();
    for (path, error) in report.iter() {
        let field = path.to_string();
        if errors.iter().any(|e| e.field == field) {
            continue;
        }
        errors.push(FieldError {
            field,
            message: error.message().to_string(),
        });
    }
    errors
}
