use axum::http::StatusCode;

use crate::api::rest::problem::{Problem, ProblemResponse, ValidationError};
use crate::contract::schema::{FieldError, ValidationFailure};
use crate::domain::error::DomainError;

/// Helper to create a ProblemResponse with less boilerplate
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    instance: &str,
) -> ProblemResponse {
    let problem = Problem::new(status, title, detail)
        .with_type(format!("https://errors.example.com/{code}"))
        .with_code(code)
        .with_instance(instance);
    ProblemResponse(problem)
}

fn validation_problem(errors: &[FieldError], instance: &str) -> ProblemResponse {
    let mut resp = from_parts(
        StatusCode::BAD_REQUEST,
        "PATIENTS_VALIDATION",
        "Validation error",
        "One or more fields are invalid",
        instance,
    );
    resp.0 = resp.0.with_errors(
        errors
            .iter()
            .map(|e| ValidationError {
                detail: e.message.clone(),
                pointer: e.pointer.clone(),
            })
            .collect(),
    );
    resp
}

pub fn map_validation_failure(f: &ValidationFailure, instance: &str) -> ProblemResponse {
    validation_problem(&f.errors, instance)
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::Validation { field, message } => validation_problem(
            &[FieldError::new(format!("/{field}"), message.clone())],
            instance,
        ),
        DomainError::TooManyDependants { max, .. } => validation_problem(
            &[FieldError::new(
                "/dependants",
                format!("At most {max} dependants are allowed"),
            )],
            instance,
        ),
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "PATIENTS_CREATE_FAILED",
                "Internal error",
                "Failed to create patient and dependants",
                instance,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_errors_stay_opaque() {
        let e = DomainError::database("UNIQUE constraint failed: patients.id");
        let resp = map_domain_error(&e, "/patients");
        assert_eq!(resp.0.status, 500);
        assert_eq!(resp.0.detail, "Failed to create patient and dependants");
        assert!(!resp.0.detail.contains("UNIQUE"));
    }

    #[test]
    fn dependant_limit_points_at_the_list() {
        let resp = map_domain_error(&DomainError::too_many_dependants(5, 4), "/patients");
        assert_eq!(resp.0.status, 400);
        let errors = resp.0.errors.unwrap();
        assert_eq!(errors[0].pointer, "/dependants");
    }
}
