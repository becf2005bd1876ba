use crate::contract::model::Patient;

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait::async_trait]
pub trait PatientsRepository: Send + Sync {
    /// Store the patient row and one row per dependant atomically.
    /// Returns the record as written.
    async fn insert_with_dependants(&self, patient: Patient) -> anyhow::Result<Patient>;
}
