//! Router-level checks for HTTPS enforcement and bearer authentication.
//!
//! These requests are answered before any handler touches the database, so the
//! pool points at a server that does not exist.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use config::Map;
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use http_body_util::BodyExt;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

use flightbook::auth::JwtService;
use flightbook::settings::Settings;
use flightbook::web::{AppState, build_router};

const SIGNING_KEY: &str = "api-auth-test-key";

fn settings() -> Settings {
    let dir = TempDir::new().unwrap();
    let mut env = Map::new();
    env.insert(
        "FLIGHTBOOK_DATABASE__URL".to_string(),
        "postgres://127.0.0.1:1/unused".to_string(),
    );
    env.insert(
        "FLIGHTBOOK_TOKEN__SIGNING_KEY".to_string(),
        SIGNING_KEY.to_string(),
    );
    Settings::load_with_env(dir.path(), "test", Some(env)).unwrap()
}

fn app(settings: &Settings) -> Router {
    let pool = Pool::builder()
        .min_idle(Some(0))
        .connection_timeout(Duration::from_millis(100))
        .build_unchecked(ConnectionManager::<PgConnection>::new(
            settings.database.url.as_str(),
        ));
    build_router(AppState::new(pool, settings), &settings.cors)
}

fn token(settings: &Settings, user_id: &str) -> String {
    JwtService::new(&settings.token)
        .generate_token(user_id)
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn secure_get(uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .uri(uri)
        .header("x-forwarded-proto", "https")
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let settings = settings();
    let response = app(&settings)
        .oneshot(secure_get("/api/v1/logbooks").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
    let body = json_body(response).await;
    assert_eq!(body["error"], "Missing authorization token");
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let settings = settings();
    let response = app(&settings)
        .oneshot(
            secure_get("/api/v1/reference/gear-types")
                .header(header::AUTHORIZATION, "Bearer not-a-real-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn test_token_signed_with_another_key_is_unauthorized() {
    let settings = settings();
    let mut other = settings.token.clone();
    other.signing_key = "some-other-key".to_string();
    let forged = JwtService::new(&other).generate_token("intruder").unwrap();

    let response = app(&settings)
        .oneshot(
            secure_get("/api/v1/session")
                .header(header::AUTHORIZATION, format!("Bearer {}", forged))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_plain_http_is_forbidden_even_with_valid_token() {
    let settings = settings();
    let response = app(&settings)
        .oneshot(
            Request::builder()
                .uri("/api/v1/session")
                .header(
                    header::AUTHORIZATION,
                    format!("Bearer {}", token(&settings, "user-1")),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["error"], "HTTPS is required");
}

#[tokio::test]
async fn test_plain_http_is_forbidden_before_authentication() {
    let settings = settings();
    let response = app(&settings)
        .oneshot(
            Request::builder()
                .uri("/api/v1/logbooks")
                .header("x-forwarded-proto", "http")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_session_reports_token_subject() {
    let settings = settings();
    let response = app(&settings)
        .oneshot(
            secure_get("/api/v1/session")
                .header(
                    header::AUTHORIZATION,
                    format!("Bearer {}", token(&settings, "user-42")),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["user_id"], "user-42");
    assert!(body["expires_at"].is_string());
}

#[tokio::test]
async fn test_refresh_issues_a_token_for_the_same_user() {
    let settings = settings();
    let response = app(&settings)
        .oneshot(
            secure_get("/api/v1/session/refresh")
                .method("POST")
                .header(
                    header::AUTHORIZATION,
                    format!("Bearer {}", token(&settings, "user-7")),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let refreshed = body["token"].as_str().unwrap();
    let claims = JwtService::new(&settings.token)
        .verify_token(refreshed)
        .unwrap();
    assert_eq!(claims.sub, "user-7");
}

#[tokio::test]
async fn test_unknown_route_is_json_not_found() {
    let settings = settings();
    let response = app(&settings)
        .oneshot(secure_get("/nowhere").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn test_cors_preflight_is_answered() {
    let settings = settings();
    let response = app(&settings)
        .oneshot(
            secure_get("/api/v1/logbooks")
                .method("OPTIONS")
                .header(header::ORIGIN, "https://logbook.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert!(
        response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}
