use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::web::AppState;

use super::internal_error;

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub user_id: String,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct TokenView {
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Who the bearer token belongs to and when it expires
pub async fn get_session(auth_user: AuthUser) -> impl IntoResponse {
    Json(SessionView {
        expires_at: auth_user.claims.expires_at(),
        user_id: auth_user.user_id,
    })
}

/// Exchange a still-valid token for a fresh one with the configured lifetime
pub async fn refresh_session(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> impl IntoResponse {
    let token = match state.jwt.generate_token(&auth_user.user_id) {
        Ok(token) => token,
        Err(e) => return internal_error("Failed to issue token", e),
    };

    let expires_at = state
        .jwt
        .verify_token(&token)
        .ok()
        .and_then(|claims| claims.expires_at());

    (StatusCode::OK, Json(TokenView { token, expires_at })).into_response()
}
