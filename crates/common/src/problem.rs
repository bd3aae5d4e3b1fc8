//! Mapping of domain errors to externally visible problem responses.

use crate::domain::DomainError;
use chrono::{DateTime, Utc};
use http::StatusCode;
use serde::Serialize;

/// Media type of JSON Patch request bodies
pub const JSON_PATCH_MEDIA_TYPE: &str = "application/json-patch+json";

/// Problem categories exposed to API consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemType {
    SystemError,
    InvalidParameter,
    IncomprehensiveMessage,
    ResourceNotFound,
    EntityInUse,
    BusinessError,
}

impl ProblemType {
    pub fn uri(&self) -> &'static str {
        match self {
            ProblemType::SystemError => "/error",
            ProblemType::InvalidParameter => "/invalid-parameter",
            ProblemType::IncomprehensiveMessage => "/incomprehensive-message",
            ProblemType::ResourceNotFound => "/resource-not-found",
            ProblemType::EntityInUse => "/entity-in-use",
            ProblemType::BusinessError => "/business-error",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ProblemType::SystemError => "System error.",
            ProblemType::InvalidParameter => "Invalid parameter.",
            ProblemType::IncomprehensiveMessage => "Incomprehensive message.",
            ProblemType::ResourceNotFound => "Resource not found.",
            ProblemType::EntityInUse => "Entity already in use.",
            ProblemType::BusinessError => "Business rule violation.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemError {
    pub user_message: String,
    pub detail: String,
}

/// Problem response body
#[derive(Debug, Clone, Serialize)]
pub struct Problem {
    pub status: u16,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub problem_type: &'static str,
    pub title: &'static str,
    pub errors: Vec<ProblemError>,
}

impl Problem {
    fn new(status: StatusCode, problem_type: ProblemType, errors: Vec<ProblemError>) -> Self {
        Self {
            status: status.as_u16(),
            timestamp: Utc::now(),
            problem_type: problem_type.uri(),
            title: problem_type.title(),
            errors,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Convert domain error to a problem response
pub fn domain_error_to_problem(error: &DomainError) -> Problem {
    let single = |user_message: String| {
        vec![ProblemError {
            user_message,
            detail: format!("{:?}", error),
        }]
    };

    match error {
        DomainError::DeviceNotFound(_) => Problem::new(
            StatusCode::NOT_FOUND,
            ProblemType::ResourceNotFound,
            single(error.to_string()),
        ),

        DomainError::DeviceInUse { .. } => Problem::new(
            StatusCode::CONFLICT,
            ProblemType::EntityInUse,
            single(error.to_string()),
        ),

        DomainError::ValidationFailed(fields) => Problem::new(
            StatusCode::BAD_REQUEST,
            ProblemType::BusinessError,
            fields
                .iter()
                .map(|field| ProblemError {
                    user_message: format!("{}: {}", field.field, field.message),
                    detail: format!("{:?}", field),
                })
                .collect(),
        ),

        DomainError::PatchTestFailed(_)
        | DomainError::PatchPathNotFound(_)
        | DomainError::PatchResultInvalid(_)
        | DomainError::PatchMalformed(_) => Problem::new(
            StatusCode::BAD_REQUEST,
            ProblemType::IncomprehensiveMessage,
            single(error.to_string()),
        ),

        DomainError::RepositoryError(_) => Problem::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ProblemType::SystemError,
            single("An unexpected internal error occurred.".to_string()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldError, OperationType};

    #[test]
    fn test_not_found_maps_to_404() {
        let problem = domain_error_to_problem(&DomainError::DeviceNotFound(1));
        assert_eq!(problem.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(problem.problem_type, "/resource-not-found");
        assert_eq!(problem.errors[0].user_message, "Device with id 1 not found");
    }

    #[test]
    fn test_in_use_maps_to_conflict() {
        let problem = domain_error_to_problem(&DomainError::DeviceInUse {
            id: 1,
            operation: OperationType::Delete,
        });
        assert_eq!(problem.status, 409);
        assert_eq!(problem.title, "Entity already in use.");
        assert!(problem.errors[0].user_message.contains("cannot be deleted"));
    }

    #[test]
    fn test_lookup_and_in_use_types_differ_from_business_error() {
        let not_found = domain_error_to_problem(&DomainError::DeviceNotFound(3));
        let in_use = domain_error_to_problem(&DomainError::DeviceInUse {
            id: 3,
            operation: OperationType::Update,
        });
        assert_eq!(not_found.problem_type, ProblemType::ResourceNotFound.uri());
        assert_eq!(in_use.problem_type, ProblemType::EntityInUse.uri());
        assert_ne!(in_use.problem_type, ProblemType::BusinessError.uri());
    }

    #[test]
    fn test_validation_has_one_entry_per_field() {
        let problem = domain_error_to_problem(&DomainError::ValidationFailed(vec![
            FieldError {
                field: "name".to_string(),
                message: "length is lower than 2".to_string(),
            },
            FieldError {
                field: "brand".to_string(),
                message: "length is lower than 2".to_string(),
            },
        ]));
        assert_eq!(problem.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(problem.problem_type, "/business-error");
        assert_eq!(problem.errors.len(), 2);
    }

    #[test]
    fn test_patch_errors_map_to_bad_request() {
        for error in [
            DomainError::PatchTestFailed("/state".to_string()),
            DomainError::PatchPathNotFound("/missing".to_string()),
            DomainError::PatchResultInvalid("unknown field `color`".to_string()),
            DomainError::PatchMalformed("expected an array".to_string()),
        ] {
            let problem = domain_error_to_problem(&error);
            assert_eq!(problem.status, 400);
            assert_eq!(problem.problem_type, "/incomprehensive-message");
        }
    }

    #[test]
    fn test_repository_error_hides_internals() {
        let problem = domain_error_to_problem(&DomainError::RepositoryError(anyhow::anyhow!(
            "connection reset"
        )));
        assert_eq!(problem.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!problem.errors[0].user_message.contains("connection reset"));
    }

    #[test]
    fn test_problem_serializes_type_field() {
        let problem = domain_error_to_problem(&DomainError::DeviceNotFound(9));
        let value = serde_json::to_value(&problem).unwrap();
        assert_eq!(value["type"], "/resource-not-found");
        assert_eq!(value["status"], 404);
        assert!(value["errors"][0]["userMessage"].is_string());
    }
}
