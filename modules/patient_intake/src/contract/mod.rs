pub mod client;
pub mod error;
pub mod model;
pub mod schema;
pub mod values;

pub use client::PatientIntakeApi;
pub use error::PatientIntakeError;
pub use model::{
    Coverage, Dependant, Gender, MedicalAidCover, MedicalAidName, NewPatient, Patient,
    PaymentType,
};
pub use schema::{FieldError, ValidationFailure};
pub use values::{DependantFormValues, PatientFormValues};
