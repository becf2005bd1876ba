use thiserror::Error;

use crate::contract::schema::{FieldError, ValidationFailure};

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatientIntakeError {
    #[error("Validation error: {}", .errors.iter().map(|e| e.pointer.as_str()).collect::<Vec<_>>().join(", "))]
    Validation { errors: Vec<FieldError> },

    #[error("Failed to create patient and dependants")]
    CreationFailed,
}

impl PatientIntakeError {
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::Validation { errors }
    }

    pub fn creation_failed() -> Self {
        Self::CreationFailed
    }
}

impl From<ValidationFailure> for PatientIntakeError {
    fn from(f: ValidationFailure) -> Self {
        Self::validation(f.errors)
    }
}
