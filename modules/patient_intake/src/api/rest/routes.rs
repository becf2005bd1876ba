use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use utoipa::OpenApi;

use crate::api::rest::{dto, handlers, problem};
use crate::contract::{model, values};
use crate::domain::service::Service;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::create_patient, handlers::list_medical_aid_schemes),
    components(schemas(
        dto::CreatePatientReq,
        dto::PatientDto,
        dto::DependantDto,
        dto::MedicalAidSchemeDto,
        values::PatientFormValues,
        values::DependantFormValues,
        model::PaymentType,
        model::Gender,
        model::MedicalAidName,
        problem::Problem,
        problem::ValidationError,
    )),
    tags((name = "patients", description = "Patient intake"))
)]
pub struct PatientIntakeApiDoc;

pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    router
        .route("/patients", post(handlers::create_patient))
        .route("/medical-aid-schemes", get(handlers::list_medical_aid_schemes))
        .layer(Extension(service))
}

pub fn openapi() -> utoipa::openapi::OpenApi {
    PatientIntakeApiDoc::openapi()
}
