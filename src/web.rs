use anyhow::{Context, Result};
use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Request, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::actions;
use crate::auth::{self, JwtService};
use crate::settings::{CorsSettings, ServerSettings, Settings};

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// How inbound requests must arrive.
#[derive(Debug, Clone, Copy)]
pub struct HttpsPolicy {
    pub required: bool,
    pub trust_forwarded_proto: bool,
}

impl From<&ServerSettings> for HttpsPolicy {
    fn from(server: &ServerSettings) -> Self {
        Self {
            required: server.require_https,
            trust_forwarded_proto: server.trust_forwarded_proto,
        }
    }
}

// App state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub jwt: Arc<JwtService>,
    pub https: HttpsPolicy,
}

impl AppState {
    pub fn new(pool: PgPool, settings: &Settings) -> Self {
        Self {
            pool,
            jwt: Arc::new(JwtService::new(&settings.token)),
            https: HttpsPolicy::from(&settings.server),
        }
    }
}

/// Build the connection pool. Fails when the database cannot be reached.
pub fn create_pool(url: &str, max_connections: u32) -> Result<PgPool> {
    let manager = ConnectionManager::<PgConnection>::new(url);
    Pool::builder()
        .max_size(max_connections)
        .build(manager)
        .context("Failed to create database connection pool")
}

fn forwarded_proto_is_https(headers: &HeaderMap) -> bool {
    if let Some(proto) = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
    {
        // Proxies append; the first hop is the client-facing one
        let first = proto.split(',').next().unwrap_or_default().trim();
        return first.eq_ignore_ascii_case("https");
    }

    headers
        .get(header::FORWARDED)
        .and_then(|v| v.to_str().ok())
        .and_then(|forwarded| forwarded.split(',').next())
        .map(|element| {
            element.split(';').any(|pair| {
                pair.trim()
                    .split_once('=')
                    .is_some_and(|(key, value)| {
                        key.trim().eq_ignore_ascii_case("proto")
                            && value.trim().trim_matches('"').eq_ignore_ascii_case("https")
                    })
            })
        })
        .unwrap_or(false)
}

/// Whether the request reached us over a secure transport.
pub fn is_secure_request<B>(request: &Request<B>, policy: &HttpsPolicy) -> bool {
    if request.uri().scheme_str() == Some("https") {
        return true;
    }
    policy.trust_forwarded_proto && forwarded_proto_is_https(request.headers())
}

// Rejects plain-HTTP requests before CORS or authentication run
async fn require_https_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if state.https.required && !is_secure_request(&request, &state.https) {
        warn!(
            "Rejected insecure request {} {}",
            request.method(),
            request.uri().path()
        );
        return actions::json_error(StatusCode::FORBIDDEN, "HTTPS is required").into_response();
    }
    next.run(request).await
}

// Middleware for request logging with correlation ID
async fn request_logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = Uuid::new_v4().to_string()[..8].to_string();
    let start_time = Instant::now();

    info!("Started {} {} [{}]", method, path, request_id);

    let response = next.run(request).await;
    let duration = start_time.elapsed();
    let status = response.status();

    metrics::counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "status" => status.as_u16().to_string()
    )
    .increment(1);
    metrics::histogram!("http_request_duration_seconds").record(duration.as_secs_f64());

    info!(
        "Completed {} {} [{}] {} in {:.2}ms",
        method,
        path,
        request_id,
        status.as_u16(),
        duration.as_secs_f64() * 1000.0
    );

    response
}

// Middleware to capture HTTP errors to Sentry
async fn sentry_error_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    if response.status().is_server_error() {
        let status = response.status();
        error!("HTTP {} error on {} {}", status.as_u16(), method, uri);

        sentry::configure_scope(|scope| {
            scope.set_tag("http.method", method.as_str());
            scope.set_tag("http.url", uri.to_string());
            scope.set_tag("http.status_code", status.as_u16().to_string());
        });

        sentry::capture_message(
            &format!("HTTP {} error on {} {}", status.as_u16(), method, uri),
            sentry::Level::Error,
        );
    }

    response
}

pub fn cors_layer(settings: &CorsSettings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .allowed_origins
        .iter()
        .filter(|origin| origin.as_str() != "*")
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    if settings.allowed_origins.is_empty() || settings.allowed_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    if origins.is_empty() {
        warn!("No valid CORS origins configured, cross-origin requests are denied");
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

fn api_router(state: AppState) -> Router<AppState> {
    use axum::routing::{delete, post};

    Router::new()
        .route("/session", get(actions::get_session))
        .route("/session/refresh", post(actions::refresh_session))
        // Logbooks
        .route(
            "/logbooks",
            get(actions::list_logbooks).post(actions::create_logbook),
        )
        .route(
            "/logbooks/{logbook_id}",
            get(actions::get_logbook)
                .put(actions::update_logbook)
                .delete(actions::delete_logbook),
        )
        // Pilot (one per logbook)
        .route(
            "/logbooks/{logbook_id}/pilot",
            get(actions::get_pilot)
                .post(actions::create_pilot)
                .put(actions::update_pilot)
                .delete(actions::delete_pilot),
        )
        // Aircraft
        .route(
            "/logbooks/{logbook_id}/aircraft",
            get(actions::list_aircraft).post(actions::create_aircraft),
        )
        .route(
            "/logbooks/{logbook_id}/aircraft/{aircraft_id}",
            get(actions::get_aircraft)
                .put(actions::update_aircraft)
                .delete(actions::delete_aircraft),
        )
        // Flights and approaches
        .route(
            "/logbooks/{logbook_id}/flights",
            get(actions::list_flights).post(actions::create_flight),
        )
        .route(
            "/logbooks/{logbook_id}/flights/{flight_id}",
            get(actions::get_flight)
                .put(actions::update_flight)
                .delete(actions::delete_flight),
        )
        .route(
            "/logbooks/{logbook_id}/flights/{flight_id}/approaches",
            get(actions::list_approaches).post(actions::create_approach),
        )
        .route(
            "/logbooks/{logbook_id}/flights/{flight_id}/approaches/{approach_id}",
            get(actions::get_approach)
                .put(actions::update_approach)
                .delete(actions::delete_approach),
        )
        // Certificates and ratings
        .route(
            "/logbooks/{logbook_id}/certificates",
            get(actions::list_certificates).post(actions::create_certificate),
        )
        .route(
            "/logbooks/{logbook_id}/certificates/{certificate_id}",
            get(actions::get_certificate)
                .put(actions::update_certificate)
                .delete(actions::delete_certificate),
        )
        .route(
            "/logbooks/{logbook_id}/certificates/{certificate_id}/ratings",
            get(actions::list_ratings).post(actions::create_rating),
        )
        .route(
            "/logbooks/{logbook_id}/certificates/{certificate_id}/ratings/{rating_id}",
            get(actions::get_rating)
                .put(actions::update_rating)
                .delete(actions::delete_rating),
        )
        // Endorsements
        .route(
            "/logbooks/{logbook_id}/endorsements",
            get(actions::list_endorsements).post(actions::create_endorsement),
        )
        .route(
            "/logbooks/{logbook_id}/endorsements/{endorsement_id}",
            get(actions::get_endorsement)
                .put(actions::update_endorsement)
                .delete(actions::delete_endorsement),
        )
        // Currencies
        .route(
            "/logbooks/{logbook_id}/currencies",
            get(actions::list_currencies).post(actions::create_currency),
        )
        .route(
            "/logbooks/{logbook_id}/currencies/{currency_id}",
            delete(actions::delete_currency),
        )
        // Reference data
        .route("/reference/approach-types", get(actions::list_approach_types))
        .route(
            "/reference/certificate-types",
            get(actions::list_certificate_types),
        )
        .route("/reference/currency-types", get(actions::list_currency_types))
        .route(
            "/reference/endorsement-types",
            get(actions::list_endorsement_types),
        )
        .route("/reference/engine-types", get(actions::list_engine_types))
        .route("/reference/gear-types", get(actions::list_gear_types))
        .route("/reference/rating-types", get(actions::list_rating_types))
        .route(
            "/reference/categories-and-classes",
            get(actions::list_categories_and_classes),
        )
        .route_layer(middleware::from_fn_with_state(state, auth::require_bearer))
}

/// Build the full application: HTTPS enforcement, then CORS, then bearer
/// authentication in front of the `/api/v1` routes.
pub fn build_router(state: AppState, cors: &CorsSettings) -> Router {
    Router::new()
        .nest("/api/v1", api_router(state.clone()))
        .fallback(|| async { actions::json_error(StatusCode::NOT_FOUND, "Not Found") })
        .layer(cors_layer(cors))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_https_middleware,
        ))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(middleware::from_fn(sentry_error_middleware))
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Unable to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Unable to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Received shutdown signal, finishing in-flight requests");
}

pub async fn start_web_server(settings: &Settings, pool: PgPool) -> Result<()> {
    sentry::configure_scope(|scope| {
        scope.set_tag("operation", "web-server");
    });

    let address = settings.http_address();
    info!("Starting web server on {}", address);
    if !settings.server.require_https {
        warn!("HTTPS enforcement is disabled; do not expose this listener publicly");
    }

    let app_state = AppState::new(pool, settings);
    let app = build_router(app_state, &settings.cors);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Web server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Web server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(trust: bool) -> HttpsPolicy {
        HttpsPolicy {
            required: true,
            trust_forwarded_proto: trust,
        }
    }

    fn request_with(name: &str, value: &str) -> Request<()> {
        Request::builder()
            .uri("/api/v1/logbooks")
            .header(name, value)
            .body(())
            .unwrap()
    }

    #[test]
    fn test_plain_request_is_not_secure() {
        let request = Request::builder().uri("/api/v1").body(()).unwrap();
        assert!(!is_secure_request(&request, &policy(true)));
    }

    #[test]
    fn test_https_scheme_is_secure() {
        let request = Request::builder()
            .uri("https://logbook.example/api/v1")
            .body(())
            .unwrap();
        assert!(is_secure_request(&request, &policy(false)));
    }

    #[test]
    fn test_forwarded_proto_headers() {
        assert!(is_secure_request(
            &request_with("x-forwarded-proto", "https"),
            &policy(true)
        ));
        assert!(is_secure_request(
            &request_with("x-forwarded-proto", "HTTPS, http"),
            &policy(true)
        ));
        assert!(!is_secure_request(
            &request_with("x-forwarded-proto", "http"),
            &policy(true)
        ));
        assert!(is_secure_request(
            &request_with("forwarded", "for=192.0.2.60;proto=https;by=203.0.113.43"),
            &policy(true)
        ));
        assert!(!is_secure_request(
            &request_with("forwarded", "for=192.0.2.60;proto=http"),
            &policy(true)
        ));
    }

    #[test]
    fn test_forwarded_headers_ignored_when_untrusted() {
        assert!(!is_secure_request(
            &request_with("x-forwarded-proto", "https"),
            &policy(false)
        ));
    }

    async fn allowed_origin(origins: &[&str], origin: &str) -> Option<HeaderValue> {
        use tower::ServiceExt;

        let settings = CorsSettings {
            allowed_origins: origins.iter().map(|o| o.to_string()).collect(),
        };
        let app: Router = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(cors_layer(&settings));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .cloned()
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let value = allowed_origin(&["https://logbook.example"], "https://logbook.example").await;
        assert_eq!(value.unwrap(), "https://logbook.example");
    }

    #[tokio::test]
    async fn test_cors_rejects_other_origins() {
        let value = allowed_origin(&["https://logbook.example"], "https://evil.example").await;
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_cors_is_permissive_without_origins_or_with_wildcard() {
        let value = allowed_origin(&[], "https://anywhere.example").await;
        assert_eq!(value.unwrap(), "*");

        let value = allowed_origin(&["*"], "https://anywhere.example").await;
        assert_eq!(value.unwrap(), "*");
    }

    #[tokio::test]
    async fn test_cors_denies_all_when_every_origin_is_invalid() {
        let value = allowed_origin(&["https://logbook.example\n"], "https://evil.example").await;
        assert!(value.is_none());

        let value = allowed_origin(&["https://logbook.example\n"], "https://logbook.example").await;
        assert!(value.is_none());
    }
}
