use crate::contract::model::{Gender, MedicalAidName, PaymentType};
use crate::contract::values::{DependantFormValues, PatientFormValues};

/// Free-text fields of the patient part of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    PatientFullName,
    PatientIdNumber,
    HomeAddress,
    MedicalAidHolderFullName,
    MedicalAidHolderIdNumber,
    MedicalAidHolderPhone,
    MedicalAidHolderSecondPhone,
    MedicalAidNumber,
    MedicalAidPlan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependantField {
    FullName,
    DateOfBirth,
}

/// Outcome shown to the user after a submit. Never carries field detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    DataSent,
    SendFailed,
}

impl Notification {
    pub fn message(self) -> &'static str {
        match self {
            Notification::DataSent => "Data sent",
            Notification::SendFailed => "Error sending data",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    SetText(TextField, String),
    SetPaymentType(PaymentType),
    SetMedicalAidName(Option<MedicalAidName>),
    SetHasDependants(bool),
    AppendDependant,
    /// Out-of-range positions are ignored.
    RemoveDependant(usize),
    SetDependantText {
        index: usize,
        field: DependantField,
        value: String,
    },
    SetDependantGender {
        index: usize,
        gender: Option<Gender>,
    },
    DismissNotification,
}

/// Everything the intake form shows. Each transition yields a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub values: PatientFormValues,
    /// UI-only toggle; never persisted.
    pub has_dependants: bool,
    pub submitting: bool,
    pub notification: Option<Notification>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(MedicalAidName::Gems)
    }
}

impl FormState {
    pub fn new(default_scheme: MedicalAidName) -> Self {
        Self {
            values: PatientFormValues::initial(default_scheme),
            has_dependants: false,
            submitting: false,
            notification: None,
        }
    }

    /// Start from an existing value tree, e.g. one loaded from a file.
    pub fn with_values(values: PatientFormValues, has_dependants: bool) -> Self {
        Self {
            values,
            has_dependants,
            submitting: false,
            notification: None,
        }
    }

    pub fn apply(mut self, event: FormEvent) -> Self {
        let v = &mut self.values;
        match event {
            FormEvent::SetText(field, value) => match field {
                TextField::PatientFullName => v.patient_full_name = value,
                TextField::PatientIdNumber => v.patient_id_number = value,
                TextField::HomeAddress => v.home_address = Some(value),
                TextField::MedicalAidHolderFullName => v.medical_aid_holder_full_name = Some(value),
                TextField::MedicalAidHolderIdNumber => v.medical_aid_holder_id_number = Some(value),
                TextField::MedicalAidHolderPhone => v.medical_aid_holder_phone = Some(value),
                TextField::MedicalAidHolderSecondPhone => {
                    v.medical_aid_holder_second_phone = Some(value)
                }
                TextField::MedicalAidNumber => v.medical_aid_number = Some(value),
                TextField::MedicalAidPlan => v.medical_aid_plan = Some(value),
            },
            FormEvent::SetPaymentType(payment_type) => {
                v.payment_type = payment_type;
                // switching back to MEDICAL_AID does not restore anything
                if payment_type == PaymentType::Cash {
                    v.clear_medical_aid();
                }
            }
            FormEvent::SetMedicalAidName(name) => v.medical_aid_name = name,
            FormEvent::SetHasDependants(on) => self.has_dependants = on,
            FormEvent::AppendDependant => v.dependants.push(DependantFormValues::blank()),
            FormEvent::RemoveDependant(index) => {
                if index < v.dependants.len() {
                    v.dependants.remove(index);
                }
            }
            FormEvent::SetDependantText {
                index,
                field,
                value,
            } => {
                if let Some(d) = v.dependants.get_mut(index) {
                    match field {
                        DependantField::FullName => d.dependant_full_name = value,
                        DependantField::DateOfBirth => d.dependant_date_of_birth = value,
                    }
                }
            }
            FormEvent::SetDependantGender { index, gender } => {
                if let Some(d) = v.dependants.get_mut(index) {
                    d.dependant_gender = gender;
                }
            }
            FormEvent::DismissNotification => self.notification = None,
        }
        self
    }

    pub fn medical_aid_visible(&self) -> bool {
        self.values.payment_type == PaymentType::MedicalAid
    }

    pub fn dependants_visible(&self) -> bool {
        self.medical_aid_visible() && self.has_dependants
    }

    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            "Submitting..."
        } else {
            "Submit"
        }
    }

    /// The state to render while a submission is in flight. Hand the
    /// result to [`FormController::submit`](crate::form::FormController::submit).
    pub fn begin_submit(mut self) -> Self {
        self.submitting = true;
        self.notification = None;
        self
    }

    pub(crate) fn finish_submit(mut self, notification: Notification) -> Self {
        self.submitting = false;
        self.notification = Some(notification);
        self
    }
}
