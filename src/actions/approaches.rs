use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::approaches::{ApproachRequest, NewApproach};
use crate::approaches_repo::ApproachesRepository;
use crate::auth::AuthUser;
use crate::flights_repo::FlightsRepository;
use crate::web::AppState;

use super::{internal_error, not_found, validate};

async fn require_flight(
    state: &AppState,
    owner: &str,
    logbook_id: i32,
    flight_id: i32,
) -> Result<(), Response> {
    let repo = FlightsRepository::new(state.pool.clone());

    match repo.get(owner, logbook_id, flight_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(not_found("Flight not found")),
        Err(e) => Err(internal_error("Failed to get flight", e)),
    }
}

pub async fn list_approaches(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((logbook_id, flight_id)): Path<(i32, i32)>,
) -> impl IntoResponse {
    if let Err(response) = require_flight(&state, &auth_user.user_id, logbook_id, flight_id).await
    {
        return response;
    }

    let repo = ApproachesRepository::new(state.pool);
    match repo.list(&auth_user.user_id, flight_id).await {
        Ok(approaches) => Json(approaches).into_response(),
        Err(e) => internal_error("Failed to list approaches", e),
    }
}

pub async fn create_approach(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((logbook_id, flight_id)): Path<(i32, i32)>,
    Json(request): Json<ApproachRequest>,
) -> impl IntoResponse {
    if let Err(response) = validate(&request) {
        return response;
    }
    if let Err(response) = require_flight(&state, &auth_user.user_id, logbook_id, flight_id).await
    {
        return response;
    }

    let repo = ApproachesRepository::new(state.pool);
    match repo
        .create(NewApproach::new(&auth_user.user_id, flight_id, request))
        .await
    {
        Ok(approach) => (StatusCode::CREATED, Json(approach)).into_response(),
        Err(e) => internal_error("Failed to create approach", e),
    }
}

pub async fn get_approach(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((logbook_id, flight_id, approach_id)): Path<(i32, i32, i32)>,
) -> impl IntoResponse {
    if let Err(response) = require_flight(&state, &auth_user.user_id, logbook_id, flight_id).await
    {
        return response;
    }

    let repo = ApproachesRepository::new(state.pool);
    match repo.get(&auth_user.user_id, flight_id, approach_id).await {
        Ok(Some(approach)) => Json(approach).into_response(),
        Ok(None) => not_found("Approach not found"),
        Err(e) => internal_error("Failed to get approach", e),
    }
}

pub async fn update_approach(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((logbook_id, flight_id, approach_id)): Path<(i32, i32, i32)>,
    Json(request): Json<ApproachRequest>,
) -> impl IntoResponse {
    if let Err(response) = validate(&request) {
        return response;
    }
    if let Err(response) = require_flight(&state, &auth_user.user_id, logbook_id, flight_id).await
    {
        return response;
    }

    let repo = ApproachesRepository::new(state.pool);
    match repo
        .update(&auth_user.user_id, flight_id, approach_id, request)
        .await
    {
        Ok(Some(approach)) => Json(approach).into_response(),
        Ok(None) => not_found("Approach not found"),
        Err(e) => internal_error("Failed to update approach", e),
    }
}

pub async fn delete_approach(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((logbook_id, flight_id, approach_id)): Path<(i32, i32, i32)>,
) -> impl IntoResponse {
    if let Err(response) = require_flight(&state, &auth_user.user_id, logbook_id, flight_id).await
    {
        return response;
    }

    let repo = ApproachesRepository::new(state.pool);
    match repo.delete(&auth_user.user_id, flight_id, approach_id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found("Approach not found"),
        Err(e) => internal_error("Failed to delete approach", e),
    }
}
