use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::auth::AuthUser;
use crate::certificates::{CertificateRequest, NewCertificate};
use crate::certificates_repo::CertificatesRepository;
use crate::web::AppState;

use super::{internal_error, not_found, require_logbook, validate};

pub async fn list_certificates(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(logbook_id): Path<i32>,
) -> impl IntoResponse {
    if let Err(response) = require_logbook(&state, &auth_user.user_id, logbook_id).await {
        return response;
    }

    let repo = CertificatesRepository::new(state.pool);
    match repo.list(&auth_user.user_id, logbook_id).await {
        Ok(certificates) => Json(certificates).into_response(),
        Err(e) => internal_error("Failed to list certificates", e),
    }
}

pub async fn create_certificate(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(logbook_id): Path<i32>,
    Json(request): Json<CertificateRequest>,
) -> impl IntoResponse {
    if let Err(response) = validate(&request) {
        return response;
    }
    if let Err(response) = require_logbook(&state, &auth_user.user_id, logbook_id).await {
        return response;
    }

    let repo = CertificatesRepository::new(state.pool);
    match repo
        .create(NewCertificate::new(&auth_user.user_id, logbook_id, request))
        .await
    {
        Ok(certificate) => (StatusCode::CREATED, Json(certificate)).into_response(),
        Err(e) => internal_error("Failed to create certificate", e),
    }
}

pub async fn get_certificate(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((logbook_id, certificate_id)): Path<(i32, i32)>,
) -> impl IntoResponse {
    let repo = CertificatesRepository::new(state.pool);

    match repo.get(&auth_user.user_id, logbook_id, certificate_id).await {
        Ok(Some(certificate)) => Json(certificate).into_response(),
        Ok(None) => not_found("Certificate not found"),
        Err(e) => internal_error("Failed to get certificate", e),
    }
}

pub async fn update_certificate(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((logbook_id, certificate_id)): Path<(i32, i32)>,
    Json(request): Json<CertificateRequest>,
) -> impl IntoResponse {
    if let Err(response) = validate(&request) {
        return response;
    }

    let repo = CertificatesRepository::new(state.pool);
    match repo
        .update(&auth_user.user_id, logbook_id, certificate_id, request)
        .await
    {
        Ok(Some(certificate)) => Json(certificate).into_response(),
        Ok(None) => not_found("Certificate not found"),
        Err(e) => internal_error("Failed to update certificate", e),
    }
}

pub async fn delete_certificate(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((logbook_id, certificate_id)): Path<(i32, i32)>,
) -> impl IntoResponse {
    let repo = CertificatesRepository::new(state.pool);

    match repo
        .delete(&auth_user.user_id, logbook_id, certificate_id)
        .await
    {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found("Certificate not found"),
        Err(e) => internal_error("Failed to delete certificate", e),
    }
}
