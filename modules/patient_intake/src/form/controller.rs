use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::contract::{
    client::PatientIntakeApi,
    error::PatientIntakeError,
    model::Patient,
    schema::{parse_patient, SchemaRules},
};
use crate::form::state::{FormState, Notification};

/// Result of one submit: the state to render next plus what happened.
#[derive(Debug)]
pub struct Submission {
    pub state: FormState,
    pub result: Result<Patient, PatientIntakeError>,
}

pub struct FormController {
    client: Arc<dyn PatientIntakeApi>,
    rules: SchemaRules,
}

impl FormController {
    pub fn new(client: Arc<dyn PatientIntakeApi>, rules: SchemaRules) -> Self {
        Self { client, rules }
    }

    /// Validate and send the form once. Values are never modified; only the
    /// submitting flag and the notification change.
    ///
    /// Callers that render the busy label pass a state that already went
    /// through [`FormState::begin_submit`]; any other state is begun here.
    #[instrument(
        name = "patient_intake.form.submit",
        skip(self, state),
        fields(payment_type = %state.values.payment_type, has_dependants = state.has_dependants)
    )]
    pub async fn submit(&self, state: FormState) -> Submission {
        let state = state.begin_submit();

        let result = match parse_patient(&state.values, state.has_dependants, &self.rules) {
            Ok(new_patient) => self.client.create_patient(new_patient).await,
            Err(failure) => {
                debug!(invalid = ?failure.pointers(), "Form rejected by validation");
                Err(failure.into())
            }
        };

        let notification = match &result {
            Ok(patient) => {
                info!(patient_id = %patient.id, "Form submitted");
                Notification::DataSent
            }
            Err(e) => {
                warn!(error = %e, "Form submission failed");
                Notification::SendFailed
            }
        };

        Submission {
            state: state.finish_submit(notification),
            result,
        }
    }
}
