//! Recency-of-experience tracking.
//!
//! A currency row records whether the pilot currently meets one
//! [`CurrencyType`]'s requirement. The status is derived from the logbook's
//! flight history by [`compute`] and persisted whenever it is read.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::aircraft::is_tailwheel_gear;
use crate::reference::CurrencyType;

/// Takeoffs and landings needed for passenger-carrying currency
pub const PASSENGER_LANDINGS: i64 = 3;
pub const PASSENGER_WINDOW_DAYS: i64 = 90;
pub const INSTRUMENT_APPROACHES: i64 = 6;
pub const INSTRUMENT_HOLDS: i64 = 1;
pub const INSTRUMENT_WINDOW_MONTHS: u32 = 6;
pub const FLIGHT_REVIEW_MONTHS: u32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyCalculation {
    /// Takeoffs and landings in the preceding 90 days
    Passenger,
    /// Approaches and holds in the preceding six calendar months, or an IPC
    Instrument,
    /// Flight review or check ride in the preceding 24 calendar months
    FlightReview,
}

impl TryFrom<i32> for CurrencyCalculation {
    type Error = anyhow::Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CurrencyCalculation::Passenger),
            2 => Ok(CurrencyCalculation::Instrument),
            3 => Ok(CurrencyCalculation::FlightReview),
            other => Err(anyhow::anyhow!("Unknown currency calculation type {}", other)),
        }
    }
}

impl From<CurrencyCalculation> for i32 {
    fn from(value: CurrencyCalculation) -> Self {
        match value {
            CurrencyCalculation::Passenger => 1,
            CurrencyCalculation::Instrument => 2,
            CurrencyCalculation::FlightReview => 3,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::currencies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Currency {
    pub id: i32,
    pub logbook_id: i32,
    pub currency_type_id: i32,
    pub user_id: Option<String>,
    pub days_remaining: i32,
    pub is_current: bool,
    pub is_night_currency: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyRequest {
    pub currency_type_id: i32,
    #[serde(default)]
    pub is_night_currency: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::currencies)]
pub struct NewCurrency {
    pub logbook_id: i32,
    pub currency_type_id: i32,
    pub user_id: Option<String>,
    pub days_remaining: i32,
    pub is_current: bool,
    pub is_night_currency: bool,
}

impl NewCurrency {
    pub fn new(
        user_id: &str,
        logbook_id: i32,
        request: &CurrencyRequest,
        status: &CurrencyStatus,
    ) -> Self {
        Self {
            logbook_id,
            currency_type_id: request.currency_type_id,
            user_id: Some(user_id.to_string()),
            days_remaining: status.days_remaining,
            is_current: status.is_current,
            is_night_currency: request.is_night_currency,
        }
    }
}

/// A currency with its type and freshly computed expiry, as returned by the API
#[derive(Debug, Clone, Serialize)]
pub struct CurrencyView {
    #[serde(flatten)]
    pub currency: Currency,
    pub currency_type: CurrencyType,
    pub expires_on: Option<NaiveDate>,
}

/// The parts of a flight and its aircraft the currency rules look at
#[derive(Debug, Clone, PartialEq)]
pub struct FlightHistoryEntry {
    pub flight_date: NaiveDate,
    pub landings_day: i32,
    pub landings_night: i32,
    pub holds: i32,
    pub approaches: i64,
    pub is_check_ride: bool,
    pub is_flight_review: bool,
    pub is_instrument_proficiency_check: bool,
    pub aircraft_category: Option<String>,
    pub aircraft_class: Option<String>,
    pub gear_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyStatus {
    pub expires_on: Option<NaiveDate>,
    pub days_remaining: i32,
    pub is_current: bool,
}

impl CurrencyStatus {
    fn from_expiry(expires_on: Option<NaiveDate>, today: NaiveDate) -> Self {
        match expires_on {
            Some(expiry) if expiry >= today => CurrencyStatus {
                expires_on,
                days_remaining: i32::try_from((expiry - today).num_days()).unwrap_or(i32::MAX),
                is_current: true,
            },
            _ => CurrencyStatus {
                expires_on,
                days_remaining: 0,
                is_current: false,
            },
        }
    }
}

/// Earliest flight date any rule can still count on `today`
pub fn history_start(today: NaiveDate) -> NaiveDate {
    let back = today
        .checked_sub_months(Months::new(FLIGHT_REVIEW_MONTHS))
        .unwrap_or(NaiveDate::MIN);
    first_of_month(back)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the calendar month `months` after `date`'s month
fn end_of_month_after(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    first_of_month(date)
        .checked_add_months(Months::new(months + 1))?
        .pred_opt()
}

fn matches_label(required: Option<&str>, actual: Option<&str>) -> bool {
    match required {
        None => true,
        Some(required) => actual.is_some_and(|actual| actual.trim().eq_ignore_ascii_case(required.trim())),
    }
}

fn matches_aircraft(currency_type: &CurrencyType, entry: &FlightHistoryEntry) -> bool {
    matches_label(
        currency_type.aircraft_category.as_deref(),
        entry.aircraft_category.as_deref(),
    ) && matches_label(
        currency_type.aircraft_class.as_deref(),
        entry.aircraft_class.as_deref(),
    ) && (!currency_type.requires_tailwheel
        || entry.gear_type.as_deref().is_some_and(is_tailwheel_gear))
}

/// Matching flights up to `today`, most recent first
fn qualifying_flights<'a>(
    currency_type: &CurrencyType,
    history: &'a [FlightHistoryEntry],
    today: NaiveDate,
) -> Vec<&'a FlightHistoryEntry> {
    let mut flights: Vec<&FlightHistoryEntry> = history
        .iter()
        .filter(|entry| entry.flight_date <= today && matches_aircraft(currency_type, entry))
        .collect();
    flights.sort_by(|a, b| b.flight_date.cmp(&a.flight_date));
    flights
}

fn passenger_expiry(
    currency_type: &CurrencyType,
    is_night: bool,
    history: &[FlightHistoryEntry],
    today: NaiveDate,
) -> Option<NaiveDate> {
    let window_start = today - Duration::days(PASSENGER_WINDOW_DAYS);
    // Counts are summed in i64 so stored i32 values cannot overflow
    let mut landings: i64 = 0;

    for entry in qualifying_flights(currency_type, history, today) {
        if entry.flight_date < window_start {
            break;
        }
        landings += if is_night {
            i64::from(entry.landings_night)
        } else {
            i64::from(entry.landings_day) + i64::from(entry.landings_night)
        };
        if landings >= PASSENGER_LANDINGS {
            return Some(entry.flight_date + Duration::days(PASSENGER_WINDOW_DAYS));
        }
    }
    None
}

fn instrument_expiry(
    currency_type: &CurrencyType,
    history: &[FlightHistoryEntry],
    today: NaiveDate,
) -> Option<NaiveDate> {
    let flights = qualifying_flights(currency_type, history, today);

    let window_start = first_of_month(
        today
            .checked_sub_months(Months::new(INSTRUMENT_WINDOW_MONTHS))
            .unwrap_or(NaiveDate::MIN),
    );
    let mut approaches: i64 = 0;
    let mut holds: i64 = 0;
    let mut by_experience = None;
    for entry in &flights {
        if entry.flight_date < window_start {
            break;
        }
        approaches = approaches.saturating_add(entry.approaches);
        holds += i64::from(entry.holds);
        if approaches >= INSTRUMENT_APPROACHES && holds >= INSTRUMENT_HOLDS {
            by_experience = end_of_month_after(entry.flight_date, INSTRUMENT_WINDOW_MONTHS);
            break;
        }
    }

    let by_check = flights
        .iter()
        .find(|entry| entry.is_instrument_proficiency_check)
        .and_then(|entry| end_of_month_after(entry.flight_date, INSTRUMENT_WINDOW_MONTHS));

    by_experience.max(by_check)
}

fn flight_review_expiry(history: &[FlightHistoryEntry], today: NaiveDate) -> Option<NaiveDate> {
    history
        .iter()
        .filter(|entry| {
            entry.flight_date <= today && (entry.is_flight_review || entry.is_check_ride)
        })
        .map(|entry| entry.flight_date)
        .max()
        .and_then(|date| end_of_month_after(date, FLIGHT_REVIEW_MONTHS))
}

/// Evaluate one currency against the flight history as of `today`.
///
/// Flight reviews count in any aircraft; the other rules only count flights in
/// aircraft matching the currency type's category, class and gear.
pub fn compute(
    currency_type: &CurrencyType,
    is_night: bool,
    history: &[FlightHistoryEntry],
    today: NaiveDate,
) -> anyhow::Result<CurrencyStatus> {
    let expiry = match CurrencyCalculation::try_from(currency_type.calculation_type)? {
        CurrencyCalculation::Passenger => {
            passenger_expiry(currency_type, is_night, history, today)
        }
        CurrencyCalculation::Instrument => instrument_expiry(currency_type, history, today),
        CurrencyCalculation::FlightReview => flight_review_expiry(history, today),
    };

    Ok(CurrencyStatus::from_expiry(expiry, today))
}
