//! SeaORM-backed repository implementation for the domain port.
//!
//! Generic over the connection so tests and the server can hand in any
//! `DatabaseConnection`; each create opens its own transaction on it.

use anyhow::Context;
use sea_orm::{ActiveModelTrait, ConnectionTrait, TransactionTrait};

use crate::contract::model::Patient;
use crate::domain::repo::PatientsRepository;
use crate::infra::storage::mapper;

pub struct SeaOrmPatientsRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmPatientsRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> PatientsRepository for SeaOrmPatientsRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn insert_with_dependants(&self, patient: Patient) -> anyhow::Result<Patient> {
        // Dropping `txn` on an early return rolls everything back.
        let txn = self.conn.begin().await.context("begin transaction failed")?;

        let row = mapper::patient_to_active(&patient)
            .insert(&txn)
            .await
            .context("insert patient failed")?;

        let mut dependant_rows = Vec::with_capacity(patient.coverage.dependants().len());
        for (position, d) in patient.coverage.dependants().iter().enumerate() {
            let stored = mapper::dependant_to_active(patient.id, position, d)
                .insert(&txn)
                .await
                .with_context(|| format!("insert dependant #{position} failed"))?;
            dependant_rows.push(stored);
        }

        txn.commit().await.context("commit failed")?;

        mapper::rows_to_contract(row, dependant_rows)
    }
}
