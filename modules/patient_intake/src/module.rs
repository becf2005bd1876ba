use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::PatientIntakeConfig;
use crate::contract::client::PatientIntakeApi;
use crate::contract::schema::SchemaRules;
use crate::domain::service::{Service, ServiceConfig};
use crate::form::{FormController, FormState};
use crate::gateways::local::PatientIntakeLocalClient;
use crate::infra::storage::{migrations::Migrator, SeaOrmPatientsRepository};

/// Wires storage, domain service, local client and REST routes together.
#[derive(Clone)]
pub struct PatientIntakeModule {
    service: Arc<Service>,
    client: Arc<dyn PatientIntakeApi>,
    config: PatientIntakeConfig,
}

impl PatientIntakeModule {
    /// Run migrations on `db` and build the module around it.
    pub async fn init(db: DatabaseConnection, cfg: PatientIntakeConfig) -> anyhow::Result<Self> {
        info!("Initializing patient_intake module");
        debug!(
            "Loaded patient_intake config: max_dependants={}, default_medical_aid_name={}",
            cfg.max_dependants, cfg.default_medical_aid_name
        );

        Self::migrate(&db).await?;

        let repo = Arc::new(SeaOrmPatientsRepository::new(db));
        let service = Arc::new(Service::new(
            repo,
            ServiceConfig {
                max_dependants: cfg.max_dependants,
            },
        ));
        let client: Arc<dyn PatientIntakeApi> =
            Arc::new(PatientIntakeLocalClient::new(service.clone()));

        Ok(Self {
            service,
            client,
            config: cfg,
        })
    }

    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running patient_intake database migrations");
        Migrator::up(db, None).await?;
        info!("Patient intake database migrations completed successfully");
        Ok(())
    }

    pub fn client(&self) -> Arc<dyn PatientIntakeApi> {
        self.client.clone()
    }

    pub fn form_controller(&self) -> FormController {
        FormController::new(
            self.client.clone(),
            SchemaRules {
                max_dependants: self.config.max_dependants,
            },
        )
    }

    /// A blank form with the configured default scheme.
    pub fn blank_form(&self) -> FormState {
        FormState::new(self.config.default_medical_aid_name)
    }

    pub fn register_rest(&self, router: Router) -> Router {
        info!("Registering patient_intake REST routes");
        routes::register_routes(router, self.service.clone())
    }

    pub fn openapi(&self) -> utoipa::openapi::OpenApi {
        routes::openapi()
    }
}
