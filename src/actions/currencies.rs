use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use tracing::warn;

use crate::auth::AuthUser;
use crate::currencies::{self, CurrencyRequest, CurrencyView, NewCurrency};
use crate::currencies_repo::CurrenciesRepository;
use crate::flights_repo::FlightsRepository;
use crate::reference_repo::ReferenceRepository;
use crate::web::AppState;

use super::{bad_request, internal_error, not_found, require_logbook};

/// Recompute every tracked currency from the flight history, persist the
/// results, and return them
pub async fn list_currencies(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(logbook_id): Path<i32>,
) -> impl IntoResponse {
    let owner = auth_user.user_id.as_str();
    if let Err(response) = require_logbook(&state, owner, logbook_id).await {
        return response;
    }

    let currencies_repo = CurrenciesRepository::new(state.pool.clone());
    let flights_repo = FlightsRepository::new(state.pool.clone());
    let today = Utc::now().date_naive();

    let tracked = match currencies_repo.list_with_types(owner, logbook_id).await {
        Ok(tracked) => tracked,
        Err(e) => return internal_error("Failed to list currencies", e),
    };
    if tracked.is_empty() {
        return Json(Vec::<CurrencyView>::new()).into_response();
    }

    let history = match flights_repo
        .currency_history(owner, logbook_id, currencies::history_start(today))
        .await
    {
        Ok(history) => history,
        Err(e) => return internal_error("Failed to load flight history", e),
    };

    let mut views = Vec::with_capacity(tracked.len());
    for (currency, currency_type) in tracked {
        let status = match currencies::compute(
            &currency_type,
            currency.is_night_currency,
            &history,
            today,
        ) {
            Ok(status) => status,
            Err(e) => {
                warn!(
                    "Skipping currency {} with type '{}': {}",
                    currency.id, currency_type.label, e
                );
                views.push(CurrencyView {
                    currency,
                    currency_type,
                    expires_on: None,
                });
                continue;
            }
        };

        let currency = match currencies_repo.update_status(&currency, status).await {
            Ok(updated) => updated,
            Err(e) => return internal_error("Failed to update currency", e),
        };
        views.push(CurrencyView {
            currency,
            currency_type,
            expires_on: status.expires_on,
        });
    }

    Json(views).into_response()
}

pub async fn create_currency(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(logbook_id): Path<i32>,
    Json(request): Json<CurrencyRequest>,
) -> impl IntoResponse {
    let owner = auth_user.user_id.as_str();
    if let Err(response) = require_logbook(&state, owner, logbook_id).await {
        return response;
    }

    let reference_repo = ReferenceRepository::new(state.pool.clone());
    let currency_type = match reference_repo
        .get_currency_type(request.currency_type_id)
        .await
    {
        Ok(Some(currency_type)) => currency_type,
        Ok(None) => return bad_request("currency_type_id does not refer to a currency type"),
        Err(e) => return internal_error("Failed to get currency type", e),
    };

    let today = Utc::now().date_naive();
    let flights_repo = FlightsRepository::new(state.pool.clone());
    let history = match flights_repo
        .currency_history(owner, logbook_id, currencies::history_start(today))
        .await
    {
        Ok(history) => history,
        Err(e) => return internal_error("Failed to load flight history", e),
    };

    let status = match currencies::compute(
        &currency_type,
        request.is_night_currency,
        &history,
        today,
    ) {
        Ok(status) => status,
        Err(e) => return internal_error("Failed to compute currency", e),
    };

    let currencies_repo = CurrenciesRepository::new(state.pool);
    match currencies_repo
        .create(NewCurrency::new(owner, logbook_id, &request, &status))
        .await
    {
        Ok(currency) => (
            StatusCode::CREATED,
            Json(CurrencyView {
                currency,
                currency_type,
                expires_on: status.expires_on,
            }),
        )
            .into_response(),
        Err(e) => internal_error("Failed to create currency", e),
    }
}

pub async fn delete_currency(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((logbook_id, currency_id)): Path<(i32, i32)>,
) -> impl IntoResponse {
    let repo = CurrenciesRepository::new(state.pool);

    match repo.delete(&auth_user.user_id, logbook_id, currency_id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found("Currency not found"),
        Err(e) => internal_error("Failed to delete currency", e),
    }
}
