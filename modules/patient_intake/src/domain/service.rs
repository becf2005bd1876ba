use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::contract::model::{Coverage, NewPatient, Patient};
use crate::domain::error::DomainError;
use crate::domain::repo::PatientsRepository;

/// Domain service for patient intake.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn PatientsRepository>,
    config: ServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_dependants: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { max_dependants: 20 }
    }
}

impl Service {
    pub fn new(repo: Arc<dyn PatientsRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    // Names and ID numbers stay out of the span fields.
    #[instrument(
        name = "patient_intake.service.create_patient",
        skip(self, new_patient),
        fields(
            payment_type = %new_patient.coverage.payment_type(),
            dependants = new_patient.coverage.dependants().len()
        )
    )]
    pub async fn create_patient(&self, new_patient: NewPatient) -> Result<Patient, DomainError> {
        info!("Creating new patient");

        self.validate_new_patient(&new_patient)?;

        let patient = Patient {
            id: Uuid::new_v4(),
            full_name: new_patient.full_name,
            id_number: new_patient.id_number,
            coverage: new_patient.coverage,
            created_at: Utc::now(),
        };

        let stored = self
            .repo
            .insert_with_dependants(patient)
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to create patient and dependants");
                DomainError::database(e.to_string())
            })?;

        info!("Successfully created patient with id={}", stored.id);
        Ok(stored)
    }

    /// Re-checks the invariants of a typed patient for callers that did not
    /// go through the form schema.
    fn validate_new_patient(&self, p: &NewPatient) -> Result<(), DomainError> {
        if p.full_name.trim().is_empty() {
            return Err(DomainError::validation("patientFullName", "Required"));
        }
        if p.id_number.trim().is_empty() {
            return Err(DomainError::validation("patientIdNumber", "Required"));
        }

        if let Coverage::MedicalAid(cover) = &p.coverage {
            let required = [
                ("medicalAidHolderFullName", &cover.holder_full_name),
                ("medicalAidHolderIdNumber", &cover.holder_id_number),
                ("medicalAidHolderPhone", &cover.holder_phone),
                ("homeAddress", &cover.home_address),
                ("medicalAidNumber", &cover.number),
            ];
            if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
                return Err(DomainError::validation(*field, "Required"));
            }

            let count = cover.dependants.len();
            if count > self.config.max_dependants {
                return Err(DomainError::too_many_dependants(
                    count,
                    self.config.max_dependants,
                ));
            }
        }

        debug!("Patient passed validation");
        Ok(())
    }
}
