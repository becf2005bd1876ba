//! Form controller: an explicit state value, pure transitions and the
//! submit step that hands a validated patient to a [`PatientIntakeApi`].
//!
//! [`PatientIntakeApi`]: crate::contract::client::PatientIntakeApi

pub mod controller;
pub mod state;

pub use controller::{FormController, Submission};
pub use state::{DependantField, FormEvent, FormState, Notification, TextField};
