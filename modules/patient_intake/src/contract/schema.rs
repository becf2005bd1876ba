//! Turns a raw [`PatientFormValues`] tree into a typed [`NewPatient`].

use std::cmp::Ordering;

use thiserror::Error;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::contract::model::{
    Coverage, Dependant, MedicalAidCover, NewPatient, PaymentType,
};
use crate::contract::values::{DependantFormValues, PatientFormValues};

/// One rejected field, addressed by a JSON pointer into the wire payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub pointer: String,
    pub message: String,
}

impl FieldError {
    pub fn new(pointer: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            pointer: pointer.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} field(s) failed validation", .errors.len())]
pub struct ValidationFailure {
    pub errors: Vec<FieldError>,
}

impl ValidationFailure {
    pub fn pointers(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.pointer.as_str()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct SchemaRules {
    pub max_dependants: usize,
}

impl Default for SchemaRules {
    fn default() -> Self {
        Self { max_dependants: 20 }
    }
}

/// Fields a MEDICAL_AID submission cannot leave empty.
fn required_for_medical_aid(v: &PatientFormValues) -> [(&'static str, Option<&String>); 5] {
    [
        ("/medicalAidHolderFullName", v.medical_aid_holder_full_name.as_ref()),
        ("/medicalAidHolderIdNumber", v.medical_aid_holder_id_number.as_ref()),
        ("/medicalAidHolderPhone", v.medical_aid_holder_phone.as_ref()),
        ("/homeAddress", v.home_address.as_ref()),
        ("/medicalAidNumber", v.medical_aid_number.as_ref()),
    ]
}

/// Validate the submitted tree and build the typed patient.
///
/// Dependant suppression happens here and nowhere else: without
/// `has_dependants` (or for CASH) the list is dropped before validation.
pub fn parse_patient(
    values: &PatientFormValues,
    has_dependants: bool,
    rules: &SchemaRules,
) -> Result<NewPatient, ValidationFailure> {
    let values = values.submission(has_dependants);

    let mut errors = Vec::new();
    if let Err(errs) = values.validate() {
        collect(&errs, "", &mut errors);
    }

    if values.payment_type == PaymentType::MedicalAid {
        for (pointer, value) in required_for_medical_aid(&values) {
            if is_blank(value) {
                errors.push(FieldError::new(pointer, "Required"));
            }
        }
        if values.dependants.len() > rules.max_dependants {
            errors.push(FieldError::new(
                "/dependants",
                format!("At most {} dependants are allowed", rules.max_dependants),
            ));
        }
    }

    if !errors.is_empty() {
        errors.sort_by(|a, b| compare_pointers(&a.pointer, &b.pointer));
        return Err(ValidationFailure { errors });
    }

    let coverage = match values.payment_type {
        PaymentType::Cash => Coverage::Cash,
        PaymentType::MedicalAid => Coverage::MedicalAid(MedicalAidCover {
            home_address: values.home_address.unwrap_or_default(),
            holder_full_name: values.medical_aid_holder_full_name.unwrap_or_default(),
            holder_id_number: values.medical_aid_holder_id_number.unwrap_or_default(),
            holder_phone: values.medical_aid_holder_phone.unwrap_or_default(),
            holder_second_phone: non_blank(values.medical_aid_holder_second_phone),
            scheme: values.medical_aid_name,
            number: values.medical_aid_number.unwrap_or_default(),
            plan: non_blank(values.medical_aid_plan),
            dependants: values.dependants.into_iter().map(Dependant::from).collect(),
        }),
    };

    Ok(NewPatient {
        full_name: values.patient_full_name,
        id_number: values.patient_id_number,
        coverage,
    })
}

impl From<DependantFormValues> for Dependant {
    fn from(v: DependantFormValues) -> Self {
        Self {
            full_name: v.dependant_full_name,
            gender: v.dependant_gender,
            date_of_birth: v.dependant_date_of_birth.trim().to_string(),
        }
    }
}

fn is_blank(value: Option<&String>) -> bool {
    value.map_or(true, |s| s.trim().is_empty())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let pointer = format!("{prefix}/{}", camel_case(field));
        match kind {
            ValidationErrorsKind::Field(list) => {
                for e in list {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    out.push(FieldError::new(pointer.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &pointer, out),
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    collect(inner, &format!("{pointer}/{idx}"), out);
                }
            }
        }
    }
}

/// Segment-wise order; list indexes compare as numbers so `/dependants/2`
/// sorts before `/dependants/10`.
fn compare_pointers(a: &str, b: &str) -> Ordering {
    let mut left = a.split('/');
    let mut right = b.split('/');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (x.parse::<usize>(), y.parse::<usize>()) {
                    (Ok(i), Ok(j)) => i.cmp(&j),
                    _ => x.cmp(y),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

/// `patient_full_name` -> `patientFullName`
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
