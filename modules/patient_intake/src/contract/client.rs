use async_trait::async_trait;

use crate::contract::{
    error::PatientIntakeError,
    model::{NewPatient, Patient},
};

/// Public API of the patient_intake module for in-process callers.
#[async_trait]
pub trait PatientIntakeApi: Send + Sync {
    /// Create the patient and all of its dependants in one step.
    async fn create_patient(&self, new_patient: NewPatient) -> Result<Patient, PatientIntakeError>;
}
