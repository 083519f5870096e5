use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::auth::AuthUser;
use crate::certificates_repo::CertificatesRepository;
use crate::ratings::{NewRating, RatingRequest};
use crate::ratings_repo::RatingsRepository;
use crate::web::AppState;

use super::{internal_error, not_found, validate};

async fn require_certificate(
    state: &AppState,
    owner: &str,
    logbook_id: i32,
    certificate_id: i32,
) -> Result<(), Response> {
    let repo = CertificatesRepository::new(state.pool.clone());

    match repo.get(owner, logbook_id, certificate_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(not_found("Certificate not found")),
        Err(e) => Err(internal_error("Failed to get certificate", e)),
    }
}

pub async fn list_ratings(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((logbook_id, certificate_id)): Path<(i32, i32)>,
) -> impl IntoResponse {
    if let Err(response) =
        require_certificate(&state, &auth_user.user_id, logbook_id, certificate_id).await
    {
        return response;
    }

    let repo = RatingsRepository::new(state.pool);
    match repo.list(&auth_user.user_id, certificate_id).await {
        Ok(ratings) => Json(ratings).into_response(),
        Err(e) => internal_error("Failed to list ratings", e),
    }
}

pub async fn create_rating(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((logbook_id, certificate_id)): Path<(i32, i32)>,
    Json(request): Json<RatingRequest>,
) -> impl IntoResponse {
    if let Err(response) = validate(&request) {
        return response;
    }
    if let Err(response) =
        require_certificate(&state, &auth_user.user_id, logbook_id, certificate_id).await
    {
        return response;
    }

    let repo = RatingsRepository::new(state.pool);
    match repo
        .create(NewRating::new(&auth_user.user_id, certificate_id, request))
        .await
    {
        Ok(rating) => (StatusCode::CREATED, Json(rating)).into_response(),
        Err(e) => internal_error("Failed to create rating", e),
    }
}

pub async fn get_rating(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((logbook_id, certificate_id, rating_id)): Path<(i32, i32, i32)>,
) -> impl IntoResponse {
    if let Err(response) =
        require_certificate(&state, &auth_user.user_id, logbook_id, certificate_id).await
    {
        return response;
    }

    let repo = RatingsRepository::new(state.pool);
    match repo.get(&auth_user.user_id, certificate_id, rating_id).await {
        Ok(Some(rating)) => Json(rating).into_response(),
        Ok(None) => not_found("Rating not found"),
        Err(e) => internal_error("Failed to get rating", e),
    }
}

pub async fn update_rating(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((logbook_id, certificate_id, rating_id)): Path<(i32, i32, i32)>,
    Json(request): Json<RatingRequest>,
) -> impl IntoResponse {
    if let Err(response) = validate(&request) {
        return response;
    }
    if let Err(response) =
        require_certificate(&state, &auth_user.user_id, logbook_id, certificate_id).await
    {
        return response;
    }

    let repo = RatingsRepository::new(state.pool);
    match repo
        .update(&auth_user.user_id, certificate_id, rating_id, request)
        .await
    {
        Ok(Some(rating)) => Json(rating).into_response(),
        Ok(None) => not_found("Rating not found"),
        Err(e) => internal_error("Failed to update rating", e),
    }
}

pub async fn delete_rating(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((logbook_id, certificate_id, rating_id)): Path<(i32, i32, i32)>,
) -> impl IntoResponse {
    if let Err(response) =
        require_certificate(&state, &auth_user.user_id, logbook_id, certificate_id).await
    {
        return response;
    }

    let repo = RatingsRepository::new(state.pool);
    match repo.delete(&auth_user.user_id, certificate_id, rating_id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found("Rating not found"),
        Err(e) => internal_error("Failed to delete rating", e),
    }
}
