use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::aircraft_repo::AircraftRepository;
use crate::auth::AuthUser;
use crate::flights::{FlightRequest, NewFlight};
use crate::flights_repo::FlightsRepository;
use crate::web::AppState;

use super::{bad_request, internal_error, not_found, require_logbook, validate};

/// A flight may only reference an aircraft from the same logbook
async fn check_aircraft(
    state: &AppState,
    owner: &str,
    logbook_id: i32,
    aircraft_id: i32,
) -> Result<(), Response> {
    let repo = AircraftRepository::new(state.pool.clone());

    match repo.get(owner, logbook_id, aircraft_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(bad_request("aircraft_id does not refer to an aircraft in this logbook")),
        Err(e) => Err(internal_error("Failed to get aircraft", e)),
    }
}

pub async fn list_flights(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(logbook_id): Path<i32>,
) -> impl IntoResponse {
    if let Err(response) = require_logbook(&state, &auth_user.user_id, logbook_id).await {
        return response;
    }

    let repo = FlightsRepository::new(state.pool);
    match repo.list(&auth_user.user_id, logbook_id).await {
        Ok(flights) => Json(flights).into_response(),
        Err(e) => internal_error("Failed to list flights", e),
    }
}

pub async fn create_flight(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(logbook_id): Path<i32>,
    Json(request): Json<FlightRequest>,
) -> impl IntoResponse {
    if let Err(response) = validate(&request) {
        return response;
    }
    if let Err(response) = require_logbook(&state, &auth_user.user_id, logbook_id).await {
        return response;
    }
    if let Err(response) =
        check_aircraft(&state, &auth_user.user_id, logbook_id, request.aircraft_id).await
    {
        return response;
    }

    let repo = FlightsRepository::new(state.pool);
    match repo
        .create(NewFlight::new(&auth_user.user_id, logbook_id, request))
        .await
    {
        Ok(flight) => (StatusCode::CREATED, Json(flight)).into_response(),
        Err(e) => internal_error("Failed to create flight", e),
    }
}

pub async fn get_flight(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((logbook_id, flight_id)): Path<(i32, i32)>,
) -> impl IntoResponse {
    let repo = FlightsRepository::new(state.pool);

    match repo.get(&auth_user.user_id, logbook_id, flight_id).await {
        Ok(Some(flight)) => Json(flight).into_response(),
        Ok(None) => not_found("Flight not found"),
        Err(e) => internal_error("Failed to get flight", e),
    }
}

pub async fn update_flight(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((logbook_id, flight_id)): Path<(i32, i32)>,
    Json(request): Json<FlightRequest>,
) -> impl IntoResponse {
    if let Err(response) = validate(&request) {
        return response;
    }
    if let Err(response) =
        check_aircraft(&state, &auth_user.user_id, logbook_id, request.aircraft_id).await
    {
        return response;
    }

    let repo = FlightsRepository::new(state.pool);
    match repo
        .update(&auth_user.user_id, logbook_id, flight_id, request)
        .await
    {
        Ok(Some(flight)) => Json(flight).into_response(),
        Ok(None) => not_found("Flight not found"),
        Err(e) => internal_error("Failed to update flight", e),
    }
}

pub async fn delete_flight(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((logbook_id, flight_id)): Path<(i32, i32)>,
) -> impl IntoResponse {
    let repo = FlightsRepository::new(state.pool);

    match repo.delete(&auth_user.user_id, logbook_id, flight_id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found("Flight not found"),
        Err(e) => internal_error("Failed to delete flight", e),
    }
}
