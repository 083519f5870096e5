use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::info;

use crate::auth::AuthUser;
use crate::logbooks::{LogbookRequest, NewLogbook};
use crate::logbooks_repo::LogbooksRepository;
use crate::web::AppState;

use super::{internal_error, not_found, validate};

pub async fn list_logbooks(State(state): State<AppState>, auth_user: AuthUser) -> impl IntoResponse {
    let repo = LogbooksRepository::new(state.pool);

    match repo.list(&auth_user.user_id).await {
        Ok(logbooks) => Json(logbooks).into_response(),
        Err(e) => internal_error("Failed to list logbooks", e),
    }
}

pub async fn create_logbook(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<LogbookRequest>,
) -> impl IntoResponse {
    if let Err(response) = validate(&request) {
        return response;
    }

    let repo = LogbooksRepository::new(state.pool);
    match repo.create(NewLogbook::new(&auth_user.user_id, request)).await {
        Ok(logbook) => {
            info!("Created logbook {} for {}", logbook.id, auth_user.user_id);
            (StatusCode::CREATED, Json(logbook)).into_response()
        }
        Err(e) => internal_error("Failed to create logbook", e),
    }
}

pub async fn get_logbook(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(logbook_id): Path<i32>,
) -> impl IntoResponse {
    let repo = LogbooksRepository::new(state.pool);

    match repo.get(&auth_user.user_id, logbook_id).await {
        Ok(Some(logbook)) => Json(logbook).into_response(),
        Ok(None) => not_found("Logbook not found"),
        Err(e) => internal_error("Failed to get logbook", e),
    }
}

pub async fn update_logbook(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(logbook_id): Path<i32>,
    Json(request): Json<LogbookRequest>,
) -> impl IntoResponse {
    if let Err(response) = validate(&request) {
        return response;
    }

    let repo = LogbooksRepository::new(state.pool);
    match repo.update(&auth_user.user_id, logbook_id, request).await {
        Ok(Some(logbook)) => Json(logbook).into_response(),
        Ok(None) => not_found("Logbook not found"),
        Err(e) => internal_error("Failed to update logbook", e),
    }
}

/// Deletes the logbook and everything recorded in it
pub async fn delete_logbook(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(logbook_id): Path<i32>,
) -> impl IntoResponse {
    let repo = LogbooksRepository::new(state.pool);

    match repo.delete(&auth_user.user_id, logbook_id).await {
        Ok(true) => {
            info!("Deleted logbook {} for {}", logbook_id, auth_user.user_id);
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => not_found("Logbook not found"),
        Err(e) => internal_error("Failed to delete logbook", e),
    }
}
