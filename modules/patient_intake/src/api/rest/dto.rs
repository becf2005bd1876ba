use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::model::{Coverage, Dependant, Gender, MedicalAidName, Patient, PaymentType};
use crate::contract::values::PatientFormValues;

/// REST DTO for submitting the intake form
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientReq {
    #[serde(flatten)]
    pub form: PatientFormValues,
    /// Dependants are only kept when this is true.
    #[serde(default)]
    pub has_dependants: bool,
}

/// REST DTO for a stored patient
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientDto {
    pub id: Uuid,
    pub patient_full_name: String,
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
    pub dependants: Vec<DependantDto>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DependantDto {
    pub dependant_full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependant_gender: Option<Gender>,
    pub dependant_date_of_birth: String,
}

/// One entry of the scheme picker
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MedicalAidSchemeDto {
    pub value: MedicalAidName,
    pub label: String,
}

impl From<Dependant> for DependantDto {
    fn from(d: Dependant) -> Self {
        Self {
            dependant_full_name: d.full_name,
            dependant_gender: d.gender,
            dependant_date_of_birth: d.date_of_birth,
        }
    }
}

impl From<Patient> for PatientDto {
    fn from(p: Patient) -> Self {
        let payment_type = p.coverage.payment_type();
        let mut dto = Self {
            id: p.id,
            patient_full_name: p.full_name,
            patient_id_number: p.id_number,
            payment_type,
            home_address: None,
            medical_aid_holder_full_name: None,
            medical_aid_holder_id_number: None,
            medical_aid_holder_phone: None,
            medical_aid_holder_second_phone: None,
            medical_aid_name: None,
            medical_aid_number: None,
            medical_aid_plan: None,
            dependants: Vec::new(),
            created_at: p.created_at,
        };
        if let Coverage::MedicalAid(c) = p.coverage {
            dto.home_address = Some(c.home_address);
            dto.medical_aid_holder_full_name = Some(c.holder_full_name);
            dto.medical_aid_holder_id_number = Some(c.holder_id_number);
            dto.medical_aid_holder_phone = Some(c.holder_phone);
            dto.medical_aid_holder_second_phone = c.holder_second_phone;
            dto.medical_aid_name = c.scheme;
            dto.medical_aid_number = Some(c.number);
            dto.medical_aid_plan = c.plan;
            dto.dependants = c.dependants.into_iter().map(DependantDto::from).collect();
        }
        dto
    }
}

impl From<MedicalAidName> for MedicalAidSchemeDto {
    fn from(name: MedicalAidName) -> Self {
        Self {
            value: name,
            label: name.label(),
        }
    }
}
