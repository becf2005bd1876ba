//! Patient intake module.
//!
//! Collects a patient's identity, payment method, optional medical-aid
//! coverage and dependants, validates the submission and persists it in a
//! single create.

pub mod contract;
pub use contract::{client, error, model, schema, values};

pub mod config;
pub mod module;

pub mod form;

pub mod api;
pub mod domain;
pub mod gateways;
pub mod infra;

pub use module::PatientIntakeModule;
