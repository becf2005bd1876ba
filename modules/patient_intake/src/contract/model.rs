use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Wire value that does not name any variant of a closed set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    Cash,
    MedicalAid,
}

impl PaymentType {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentType::Cash => "CASH",
            PaymentType::MedicalAid => "MEDICAL_AID",
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CASH" => Ok(PaymentType::Cash),
            "MEDICAL_AID" => Ok(PaymentType::MedicalAid),
            other => Err(UnknownVariant::new("payment type", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
        }
    }
}

impl FromStr for Gender {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MALE" => Ok(Gender::Male),
            "FEMALE" => Ok(Gender::Female),
            other => Err(UnknownVariant::new("gender", other)),
        }
    }
}

/// Known South African medical-aid schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MedicalAidName {
    Discovery,
    Bonitas,
    Momentum,
    Medihelp,
    Gems,
    Bestmed,
    Profmed,
    Sisonke,
    CapeMedicalPlan,
    Hosmed,
    Keyhealth,
    LaHealth,
    Medshield,
    Spectramed,
    Thebemed,
    Fedhealth,
    Genesis,
    NationalHealthcareGroup,
    Other,
}

impl MedicalAidName {
    /// Every scheme, in display order.
    pub const ALL: [MedicalAidName; 19] = [
        MedicalAidName::Discovery,
        MedicalAidName::Bonitas,
        MedicalAidName::Momentum,
        MedicalAidName::Medihelp,
        MedicalAidName::Gems,
        MedicalAidName::Bestmed,
        MedicalAidName::Profmed,
        MedicalAidName::Sisonke,
        MedicalAidName::CapeMedicalPlan,
        MedicalAidName::Hosmed,
        MedicalAidName::Keyhealth,
        MedicalAidName::LaHealth,
        MedicalAidName::Medshield,
        MedicalAidName::Spectramed,
        MedicalAidName::Thebemed,
        MedicalAidName::Fedhealth,
        MedicalAidName::Genesis,
        MedicalAidName::NationalHealthcareGroup,
        MedicalAidName::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MedicalAidName::Discovery => "DISCOVERY",
            MedicalAidName::Bonitas => "BONITAS",
            MedicalAidName::Momentum => "MOMENTUM",
            MedicalAidName::Medihelp => "MEDIHELP",
            MedicalAidName::Gems => "GEMS",
            MedicalAidName::Bestmed => "BESTMED",
            MedicalAidName::Profmed => "PROFMED",
            MedicalAidName::Sisonke => "SISONKE",
            MedicalAidName::CapeMedicalPlan => "CAPE_MEDICAL_PLAN",
            MedicalAidName::Hosmed => "HOSMED",
            MedicalAidName::Keyhealth => "KEYHEALTH",
            MedicalAidName::LaHealth => "LA_HEALTH",
            MedicalAidName::Medshield => "MEDSHIELD",
            MedicalAidName::Spectramed => "SPECTRAMED",
            MedicalAidName::Thebemed => "THEBEMED",
            MedicalAidName::Fedhealth => "FEDHEALTH",
            MedicalAidName::Genesis => "GENESIS",
            MedicalAidName::NationalHealthcareGroup => "NATIONAL_HEALTHCARE_GROUP",
            MedicalAidName::Other => "OTHER",
        }
    }

    /// Human readable name, e.g. "CAPE MEDICAL PLAN".
    pub fn label(self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for MedicalAidName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MedicalAidName {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MedicalAidName::ALL
            .into_iter()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("medical aid", s))
    }
}

/// A person covered under the patient's medical aid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependant {
    pub full_name: String,
    pub gender: Option<Gender>,
    /// `YYYY-MM-DD` or empty.
    pub date_of_birth: String,
}

/// Coverage details of a MEDICAL_AID patient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicalAidCover {
    pub home_address: String,
    pub holder_full_name: String,
    pub holder_id_number: String,
    pub holder_phone: String,
    pub holder_second_phone: Option<String>,
    pub scheme: Option<MedicalAidName>,
    pub number: String,
    pub plan: Option<String>,
    pub dependants: Vec<Dependant>,
}

/// How a patient pays. A cash patient carries no medical-aid data at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coverage {
    Cash,
    MedicalAid(MedicalAidCover),
}

impl Coverage {
    pub fn payment_type(&self) -> PaymentType {
        match self {
            Coverage::Cash => PaymentType::Cash,
            Coverage::MedicalAid(_) => PaymentType::MedicalAid,
        }
    }

    pub fn medical_aid(&self) -> Option<&MedicalAidCover> {
        match self {
            Coverage::Cash => None,
            Coverage::MedicalAid(cover) => Some(cover),
        }
    }

    pub fn dependants(&self) -> &[Dependant] {
        match self {
            Coverage::Cash => &[],
            Coverage::MedicalAid(cover) => &cover.dependants,
        }
    }
}

/// Validated data for creating a patient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPatient {
    pub full_name: String,
    pub id_number: String,
    pub coverage: Coverage,
}

/// A stored patient record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    pub id: Uuid,
    pub full_name: String,
    pub id_number: String,
    pub coverage: Coverage,
    pub created_at: DateTime<Utc>,
}
