use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::auth::AuthUser;
use crate::endorsements::{EndorsementRequest, NewEndorsement};
use crate::endorsements_repo::EndorsementsRepository;
use crate::web::AppState;

use super::{internal_error, not_found, require_logbook, validate};

pub async fn list_endorsements(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(logbook_id): Path<i32>,
) -> impl IntoResponse {
    if let Err(response) = require_logbook(&state, &auth_user.user_id, logbook_id).await {
        return response;
    }

    let repo = EndorsementsRepository::new(state.pool);
    match repo.list(&auth_user.user_id, logbook_id).await {
        Ok(endorsements) => Json(endorsements).into_response(),
        Err(e) => internal_error("Failed to list endorsements", e),
    }
}

pub async fn create_endorsement(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(logbook_id): Path<i32>,
    Json(request): Json<EndorsementRequest>,
) -> impl IntoResponse {
    if let Err(response) = validate(&request) {
        return response;
    }
    if let Err(response) = require_logbook(&state, &auth_user.user_id, logbook_id).await {
        return response;
    }

    let repo = EndorsementsRepository::new(state.pool);
    match repo
        .create(NewEndorsement::new(&auth_user.user_id, logbook_id, request))
        .await
    {
        Ok(endorsement) => (StatusCode::CREATED, Json(endorsement)).into_response(),
        Err(e) => internal_error("Failed to create endorsement", e),
    }
}

pub async fn get_endorsement(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((logbook_id, endorsement_id)): Path<(i32, i32)>,
) -> impl IntoResponse {
    let repo = EndorsementsRepository::new(state.pool);

    match repo.get(&auth_user.user_id, logbook_id, endorsement_id).await {
        Ok(Some(endorsement)) => Json(endorsement).into_response(),
        Ok(None) => not_found("Endorsement not found"),
        Err(e) => internal_error("Failed to get endorsement", e),
    }
}

pub async fn update_endorsement(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((logbook_id, endorsement_id)): Path<(i32, i32)>,
    Json(request): Json<EndorsementRequest>,
) -> impl IntoResponse {
    if let Err(response) = validate(&request) {
        return response;
    }

    let repo = EndorsementsRepository::new(state.pool);
    match repo
        .update(&auth_user.user_id, logbook_id, endorsement_id, request)
        .await
    {
        Ok(Some(endorsement)) => Json(endorsement).into_response(),
        Ok(None) => not_found("Endorsement not found"),
        Err(e) => internal_error("Failed to update endorsement", e),
    }
}

pub async fn delete_endorsement(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((logbook_id, endorsement_id)): Path<(i32, i32)>,
) -> impl IntoResponse {
    let repo = EndorsementsRepository::new(state.pool);

    match repo
        .delete(&auth_user.user_id, logbook_id, endorsement_id)
        .await
    {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found("Endorsement not found"),
        Err(e) => internal_error("Failed to delete endorsement", e),
    }
}
