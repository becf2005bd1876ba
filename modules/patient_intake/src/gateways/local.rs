use std::sync::Arc;

use async_trait::async_trait;

use crate::contract::{
    client::PatientIntakeApi,
    error::PatientIntakeError,
    model::{NewPatient, Patient},
    schema::FieldError,
};
use crate::domain::{error::DomainError, service::Service};

/// Local implementation of the PatientIntakeApi trait that delegates to the domain service
pub struct PatientIntakeLocalClient {
    service: Arc<Service>,
}

impl PatientIntakeLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl PatientIntakeApi for PatientIntakeLocalClient {
    async fn create_patient(&self, new_patient: NewPatient) -> Result<Patient, PatientIntakeError> {
        self.service
            .create_patient(new_patient)
            .await
            .map_err(PatientIntakeError::from)
    }
}

/// Storage details never cross the module boundary.
impl From<DomainError> for PatientIntakeError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation { field, message } => {
                PatientIntakeError::validation(vec![FieldError::new(format!("/{field}"), message)])
            }
            DomainError::TooManyDependants { max, .. } => {
                PatientIntakeError::validation(vec![FieldError::new(
                    "/dependants",
                    format!("At most {max} dependants are allowed"),
                )])
            }
            DomainError::Database { .. } => PatientIntakeError::creation_failed(),
        }
    }
}
