use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::aircraft::{AircraftRequest, NewAircraft};
use crate::aircraft_repo::AircraftRepository;
use crate::auth::AuthUser;
use crate::web::AppState;

use super::{internal_error, not_found, require_logbook, validate};

pub async fn list_aircraft(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(logbook_id): Path<i32>,
) -> impl IntoResponse {
    if let Err(response) = require_logbook(&state, &auth_user.user_id, logbook_id).await {
        return response;
    }

    let repo = AircraftRepository::new(state.pool);
    match repo.list(&auth_user.user_id, logbook_id).await {
        Ok(aircraft) => Json(aircraft).into_response(),
        Err(e) => internal_error("Failed to list aircraft", e),
    }
}

pub async fn create_aircraft(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(logbook_id): Path<i32>,
    Json(request): Json<AircraftRequest>,
) -> impl IntoResponse {
    if let Err(response) = validate(&request) {
        return response;
    }
    if let Err(response) = require_logbook(&state, &auth_user.user_id, logbook_id).await {
        return response;
    }

    let repo = AircraftRepository::new(state.pool);
    match repo
        .create(NewAircraft::new(&auth_user.user_id, logbook_id, request))
        .await
    {
        Ok(aircraft) => (StatusCode::CREATED, Json(aircraft)).into_response(),
        Err(e) => internal_error("Failed to create aircraft", e),
    }
}

pub async fn get_aircraft(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((logbook_id, aircraft_id)): Path<(i32, i32)>,
) -> impl IntoResponse {
    let repo = AircraftRepository::new(state.pool);

    match repo.get(&auth_user.user_id, logbook_id, aircraft_id).await {
        Ok(Some(aircraft)) => Json(aircraft).into_response(),
        Ok(None) => not_found("Aircraft not found"),
        Err(e) => internal_error("Failed to get aircraft", e),
    }
}

pub async fn update_aircraft(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((logbook_id, aircraft_id)): Path<(i32, i32)>,
    Json(request): Json<AircraftRequest>,
) -> impl IntoResponse {
    if let Err(response) = validate(&request) {
        return response;
    }

    let repo = AircraftRepository::new(state.pool);
    match repo
        .update(&auth_user.user_id, logbook_id, aircraft_id, request)
        .await
    {
        Ok(Some(aircraft)) => Json(aircraft).into_response(),
        Ok(None) => not_found("Aircraft not found"),
        Err(e) => internal_error("Failed to update aircraft", e),
    }
}

/// Deleting an aircraft also deletes the flights logged in it
pub async fn delete_aircraft(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((logbook_id, aircraft_id)): Path<(i32, i32)>,
) -> impl IntoResponse {
    let repo = AircraftRepository::new(state.pool);

    match repo.delete(&auth_user.user_id, logbook_id, aircraft_id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found("Aircraft not found"),
        Err(e) => internal_error("Failed to delete aircraft", e),
    }
}
