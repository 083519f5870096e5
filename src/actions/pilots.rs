use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::auth::AuthUser;
use crate::pilots::{NewPilot, PilotRequest};
use crate::pilots_repo::PilotsRepository;
use crate::web::AppState;

use super::{internal_error, is_unique_violation, json_error, not_found, require_logbook, validate};

pub async fn get_pilot(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(logbook_id): Path<i32>,
) -> impl IntoResponse {
    if let Err(response) = require_logbook(&state, &auth_user.user_id, logbook_id).await {
        return response;
    }

    let repo = PilotsRepository::new(state.pool);
    match repo.get_for_logbook(&auth_user.user_id, logbook_id).await {
        Ok(Some(pilot)) => Json(pilot).into_response(),
        Ok(None) => not_found("Pilot not found"),
        Err(e) => internal_error("Failed to get pilot", e),
    }
}

/// A logbook has at most one pilot; a second create answers 409
pub async fn create_pilot(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(logbook_id): Path<i32>,
    Json(request): Json<PilotRequest>,
) -> impl IntoResponse {
    if let Err(response) = validate(&request) {
        return response;
    }
    if let Err(response) = require_logbook(&state, &auth_user.user_id, logbook_id).await {
        return response;
    }

    let repo = PilotsRepository::new(state.pool);
    match repo
        .create(NewPilot::new(&auth_user.user_id, logbook_id, request))
        .await
    {
        Ok(pilot) => (StatusCode::CREATED, Json(pilot)).into_response(),
        Err(e) if is_unique_violation(&e) => json_error(
            StatusCode::CONFLICT,
            "This logbook already has a pilot",
        )
        .into_response(),
        Err(e) => internal_error("Failed to create pilot", e),
    }
}

pub async fn update_pilot(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(logbook_id): Path<i32>,
    Json(request): Json<PilotRequest>,
) -> impl IntoResponse {
    if let Err(response) = validate(&request) {
        return response;
    }
    if let Err(response) = require_logbook(&state, &auth_user.user_id, logbook_id).await {
        return response;
    }

    let repo = PilotsRepository::new(state.pool);
    match repo
        .update_for_logbook(&auth_user.user_id, logbook_id, request)
        .await
    {
        Ok(Some(pilot)) => Json(pilot).into_response(),
        Ok(None) => not_found("Pilot not found"),
        Err(e) => internal_error("Failed to update pilot", e),
    }
}

pub async fn delete_pilot(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(logbook_id): Path<i32>,
) -> impl IntoResponse {
    if let Err(response) = require_logbook(&state, &auth_user.user_id, logbook_id).await {
        return response;
    }

    let repo = PilotsRepository::new(state.pool);
    match repo.delete_for_logbook(&auth_user.user_id, logbook_id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found("Pilot not found"),
        Err(e) => internal_error("Failed to delete pilot", e),
    }
}
