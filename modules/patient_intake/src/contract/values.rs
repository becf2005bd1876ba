use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::contract::model::{Gender, MedicalAidName, PaymentType};

/// Raw value tree of the intake form, as entered and as sent over the wire.
///
/// Medical-aid fields are all optional here; which of them are required is
/// decided when the tree is turned into a [`NewPatient`](crate::contract::model::NewPatient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientFormValues {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub patient_full_name: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub patient_id_number: String,

    pub payment_type: PaymentType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_aid_holder_full_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_aid_holder_id_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_aid_holder_phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_aid_holder_second_phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_aid_name: Option<MedicalAidName>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_aid_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_aid_plan: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub dependants: Vec<DependantFormValues>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DependantFormValues {
    #[serde(default)]
    pub dependant_full_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependant_gender: Option<Gender>,

    #[serde(default)]
    #[validate(custom(function = "valid_date_of_birth"))]
    pub dependant_date_of_birth: String,
}

impl DependantFormValues {
    /// The entry appended by "Add dependant".
    pub fn blank() -> Self {
        Self {
            dependant_full_name: String::new(),
            dependant_gender: Some(Gender::Male),
            dependant_date_of_birth: String::new(),
        }
    }
}

impl PatientFormValues {
    /// Values of a freshly opened form.
    pub fn initial(scheme: MedicalAidName) -> Self {
        Self {
            patient_full_name: String::new(),
            patient_id_number: String::new(),
            payment_type: PaymentType::MedicalAid,
            home_address: Some(String::new()),
            medical_aid_holder_full_name: Some(String::new()),
            medical_aid_holder_id_number: Some(String::new()),
            medical_aid_holder_phone: Some(String::new()),
            medical_aid_holder_second_phone: Some(String::new()),
            medical_aid_name: Some(scheme),
            medical_aid_number: Some(String::new()),
            medical_aid_plan: Some(String::new()),
            dependants: vec![DependantFormValues::blank()],
        }
    }

    /// Drop every medical-aid field and the dependant list.
    pub fn clear_medical_aid(&mut self) {
        self.home_address = None;
        self.medical_aid_holder_full_name = None;
        self.medical_aid_holder_id_number = None;
        self.medical_aid_holder_phone = None;
        self.medical_aid_holder_second_phone = None;
        self.medical_aid_name = None;
        self.medical_aid_number = None;
        self.medical_aid_plan = None;
        self.dependants.clear();
    }

    /// The tree that is actually submitted.
    ///
    /// Dependants only survive for MEDICAL_AID with `has_dependants` set;
    /// CASH additionally loses all medical-aid fields.
    pub fn submission(&self, has_dependants: bool) -> Self {
        let mut out = self.clone();
        match out.payment_type {
            PaymentType::Cash => out.clear_medical_aid(),
            PaymentType::MedicalAid if !has_dependants => out.dependants.clear(),
            PaymentType::MedicalAid => {}
        }
        out
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some(Cow::from("Required"));
        return Err(err);
    }
    Ok(())
}

/// Empty is allowed; anything else must be a real `YYYY-MM-DD` date.
fn valid_date_of_birth(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || parse_date(value).is_some() {
        return Ok(());
    }
    let mut err = ValidationError::new("date");
    err.message = Some(Cow::from("Expected a date in YYYY-MM-DD form"));
    Err(err)
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    // chrono accepts unpadded fields; the form always sends ten characters
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
