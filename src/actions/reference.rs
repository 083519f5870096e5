//! Lookup tables used to fill pick lists in clients

use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::reference_repo::ReferenceRepository;
use crate::web::AppState;

use super::internal_error;

pub async fn list_approach_types(State(state): State<AppState>) -> impl IntoResponse {
    match ReferenceRepository::new(state.pool).approach_types().await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => internal_error("Failed to list approach types", e),
    }
}

pub async fn list_certificate_types(State(state): State<AppState>) -> impl IntoResponse {
    match ReferenceRepository::new(state.pool).certificate_types().await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => internal_error("Failed to list certificate types", e),
    }
}

pub async fn list_currency_types(State(state): State<AppState>) -> impl IntoResponse {
    match ReferenceRepository::new(state.pool).currency_types().await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => internal_error("Failed to list currency types", e),
    }
}

pub async fn list_endorsement_types(State(state): State<AppState>) -> impl IntoResponse {
    match ReferenceRepository::new(state.pool).endorsement_types().await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => internal_error("Failed to list endorsement types", e),
    }
}

pub async fn list_engine_types(State(state): State<AppState>) -> impl IntoResponse {
    match ReferenceRepository::new(state.pool).engine_types().await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => internal_error("Failed to list engine types", e),
    }
}

pub async fn list_gear_types(State(state): State<AppState>) -> impl IntoResponse {
    match ReferenceRepository::new(state.pool).gear_types().await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => internal_error("Failed to list gear types", e),
    }
}

pub async fn list_rating_types(State(state): State<AppState>) -> impl IntoResponse {
    match ReferenceRepository::new(state.pool).rating_types().await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => internal_error("Failed to list rating types", e),
    }
}

pub async fn list_categories_and_classes(State(state): State<AppState>) -> impl IntoResponse {
    match ReferenceRepository::new(state.pool)
        .categories_and_classes()
        .await
    {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => internal_error("Failed to list categories and classes", e),
    }
}
