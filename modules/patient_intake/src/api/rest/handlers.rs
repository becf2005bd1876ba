use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    http::{HeaderMap, StatusCode, Uri},
    response::Json,
    Extension,
};
use tracing::{error, info, warn};

use crate::api::rest::dto::{CreatePatientReq, MedicalAidSchemeDto, PatientDto};
use crate::api::rest::error::{from_parts, map_domain_error, map_validation_failure};
use crate::api::rest::problem::{Problem, ProblemResponse};
use crate::contract::model::MedicalAidName;
use crate::contract::schema::{parse_patient, SchemaRules};
use crate::domain::service::Service;

fn request_id(headers: &HeaderMap) -> Option<&str> {
    headers.get("x-request-id").and_then(|v| v.to_str().ok())
}

/// Submit the intake form
#[utoipa::path(
    post,
    path = "/patients",
    tag = "patients",
    request_body = CreatePatientReq,
    responses(
        (status = 201, description = "Patient and dependants created", body = PatientDto),
        (status = 400, description = "Invalid submission", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Persistence failed", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn create_patient(
    uri: Uri,
    headers: HeaderMap,
    Extension(svc): Extension<Arc<Service>>,
    payload: Result<Json<CreatePatientReq>, JsonRejection>,
) -> Result<(StatusCode, Json<PatientDto>), ProblemResponse> {
    let req_id = request_id(&headers);

    let Json(req) = payload.map_err(|rejection| {
        warn!("Rejected patient payload: {}", rejection.body_text());
        from_parts(
            StatusCode::BAD_REQUEST,
            "PATIENTS_MALFORMED",
            "Malformed request",
            rejection.body_text(),
            uri.path(),
        )
        .with_request_id(req_id)
    })?;

    let rules = SchemaRules {
        max_dependants: svc.config().max_dependants,
    };
    let new_patient = parse_patient(&req.form, req.has_dependants, &rules).map_err(|failure| {
        info!(invalid = ?failure.pointers(), "Patient submission failed validation");
        map_validation_failure(&failure, uri.path()).with_request_id(req_id)
    })?;

    match svc.create_patient(new_patient).await {
        Ok(patient) => Ok((StatusCode::CREATED, Json(PatientDto::from(patient)))),
        Err(e) => {
            error!("Failed to create patient: {}", e);
            Err(map_domain_error(&e, uri.path()).with_request_id(req_id))
        }
    }
}

/// List the medical-aid schemes the form offers
#[utoipa::path(
    get,
    path = "/medical-aid-schemes",
    tag = "patients",
    responses(
        (status = 200, description = "Known schemes with display labels", body = [MedicalAidSchemeDto])
    )
)]
pub async fn list_medical_aid_schemes() -> Json<Vec<MedicalAidSchemeDto>> {
    Json(
        MedicalAidName::ALL
            .into_iter()
            .map(MedicalAidSchemeDto::from)
            .collect(),
    )
}
