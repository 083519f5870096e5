pub mod aircraft;
pub mod approaches;
pub mod certificates;
pub mod currencies;
pub mod endorsements;
pub mod flights;
pub mod logbooks;
pub mod pilots;
pub mod ratings;
pub mod reference;
pub mod session;

pub use aircraft::*;
pub use approaches::*;
pub use certificates::*;
pub use currencies::*;
pub use endorsements::*;
pub use flights::*;
pub use logbooks::*;
pub use pilots::*;
pub use ratings::*;
pub use reference::*;
pub use session::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::error;

use crate::logbooks::Logbook;
use crate::logbooks_repo::LogbooksRepository;
use crate::validation::Validate;
use crate::web::AppState;

/// JSON error body used by every handler: `{"error": "..."}`
pub fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (status, Json(serde_json::json!({ "error": message })))
}

/// Log a repository failure and answer 500 without leaking details
pub(crate) fn internal_error(message: &str, e: anyhow::Error) -> Response {
    error!("{}: {:#}", message, e);
    json_error(StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}

pub(crate) fn bad_request(message: &str) -> Response {
    json_error(StatusCode::BAD_REQUEST, message).into_response()
}

pub(crate) fn not_found(message: &str) -> Response {
    json_error(StatusCode::NOT_FOUND, message).into_response()
}

/// Whether a repository error was caused by a unique constraint
pub fn is_unique_violation(e: &anyhow::Error) -> bool {
    matches!(
        e.downcast_ref::<DieselError>(),
        Some(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _))
    )
}

pub(crate) fn validate<T: Validate>(request: &T) -> Result<(), Response> {
    request.validate().map_err(|message| bad_request(&message))
}

/// Resolve a logbook owned by the caller. Foreign and unknown ids are both 404.
pub(crate) async fn require_logbook(
    state: &AppState,
    owner: &str,
    logbook_id: i32,
) -> Result<Logbook, Response> {
    let repo = LogbooksRepository::new(state.pool.clone());

    match repo.get(owner, logbook_id).await {
        Ok(Some(logbook)) => Ok(logbook),
        Ok(None) => Err(not_found("Logbook not found")),
        Err(e) => Err(internal_error("Failed to get logbook", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_is_detected_through_anyhow() {
        let violation = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_string()),
        );
        assert!(is_unique_violation(&anyhow::Error::from(violation)));

        let other = DieselError::NotFound;
        assert!(!is_unique_violation(&anyhow::Error::from(other)));
        assert!(!is_unique_violation(&anyhow::anyhow!("pool timed out")));
    }
}
