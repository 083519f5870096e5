use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::validation::{self, Validate};

/// Airport identifiers are stored in `VARCHAR(5)`
pub const MAX_AIRPORT_CODE_LEN: usize = 5;

/// One logged flight. Times are decimal hours.
#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::flights)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Flight {
    pub id: i32,
    pub aircraft_id: i32,
    pub logbook_id: i32,
    pub user_id: Option<String>,
    pub flight_date: NaiveDate,
    pub departure_code: String,
    pub destination_code: String,
    pub route: Option<String>,
    pub remarks: Option<String>,
    pub flight_time_total: BigDecimal,
    pub flight_time_day: BigDecimal,
    pub flight_time_night: BigDecimal,
    pub flight_time_cross_country: BigDecimal,
    pub flight_time_actual_instrument: BigDecimal,
    pub flight_time_simulated_instrument: BigDecimal,
    pub flight_time_solo: BigDecimal,
    pub flight_time_dual: BigDecimal,
    pub flight_time_pic: BigDecimal,
    pub number_of_landings_day: i32,
    pub number_of_landings_night: i32,
    pub number_of_holds: i32,
    pub is_check_ride: bool,
    pub is_flight_review: bool,
    pub is_instrument_proficiency_check: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::flights, treat_none_as_null = true)]
pub struct FlightRequest {
    pub aircraft_id: i32,
    pub flight_date: NaiveDate,
    pub departure_code: String,
    pub destination_code: String,
    pub route: Option<String>,
    pub remarks: Option<String>,
    #[serde(default)]
    pub flight_time_total: BigDecimal,
    #[serde(default)]
    pub flight_time_day: BigDecimal,
    #[serde(default)]
    pub flight_time_night: BigDecimal,
    #[serde(default)]
    pub flight_time_cross_country: BigDecimal,
    #[serde(default)]
    pub flight_time_actual_instrument: BigDecimal,
    #[serde(default)]
    pub flight_time_simulated_instrument: BigDecimal,
    #[serde(default)]
    pub flight_time_solo: BigDecimal,
    #[serde(default)]
    pub flight_time_dual: BigDecimal,
    #[serde(default)]
    pub flight_time_pic: BigDecimal,
    #[serde(default)]
    pub number_of_landings_day: i32,
    #[serde(default)]
    pub number_of_landings_night: i32,
    #[serde(default)]
    pub number_of_holds: i32,
    #[serde(default)]
    pub is_check_ride: bool,
    #[serde(default)]
    pub is_flight_review: bool,
    #[serde(default)]
    pub is_instrument_proficiency_check: bool,
}

/// Flight times are stored as `NUMERIC(8, 2)`
pub const MAX_TIME_SCALE: i64 = 2;
pub const MAX_TIME_EXCLUSIVE: i64 = 1_000_000;

/// Landing and hold counts per flight
pub const MAX_COUNT_PER_FLIGHT: i32 = 10_000;

fn valid_hours(field: &str, value: &BigDecimal) -> Result<(), String> {
    if *value < BigDecimal::default() {
        return Err(format!("{} must not be negative", field));
    }
    if *value >= BigDecimal::from(MAX_TIME_EXCLUSIVE) {
        return Err(format!("{} must be less than {}", field, MAX_TIME_EXCLUSIVE));
    }
    if value.with_scale(MAX_TIME_SCALE) != *value {
        return Err(format!(
            "{} must have at most {} decimal places",
            field, MAX_TIME_SCALE
        ));
    }
    Ok(())
}

impl Validate for FlightRequest {
    fn validate(&self) -> Result<(), String> {
        validation::required_max_length(
            "departure_code",
            &self.departure_code,
            MAX_AIRPORT_CODE_LEN,
        )?;
        validation::required_max_length(
            "destination_code",
            &self.destination_code,
            MAX_AIRPORT_CODE_LEN,
        )?;

        let times = [
            ("flight_time_total", &self.flight_time_total),
            ("flight_time_day", &self.flight_time_day),
            ("flight_time_night", &self.flight_time_night),
            ("flight_time_cross_country", &self.flight_time_cross_country),
            (
                "flight_time_actual_instrument",
                &self.flight_time_actual_instrument,
            ),
            (
                "flight_time_simulated_instrument",
                &self.flight_time_simulated_instrument,
            ),
            ("flight_time_solo", &self.flight_time_solo),
            ("flight_time_dual", &self.flight_time_dual),
            ("flight_time_pic", &self.flight_time_pic),
        ];
        for (field, value) in times {
            valid_hours(field, value)?;
        }

        let counts = [
            ("number_of_landings_day", self.number_of_landings_day),
            ("number_of_landings_night", self.number_of_landings_night),
            ("number_of_holds", self.number_of_holds),
        ];
        for (field, value) in counts {
            validation::non_negative(field, value)?;
            validation::at_most(field, value, MAX_COUNT_PER_FLIGHT)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::flights)]
pub struct NewFlight {
    pub logbook_id: i32,
    pub user_id: Option<String>,
    #[diesel(embed)]
    pub fields: FlightRequest,
}

impl NewFlight {
    pub fn new(user_id: &str, logbook_id: i32, fields: FlightRequest) -> Self {
        Self {
            logbook_id,
            user_id: Some(user_id.to_string()),
            fields,
        }
    }
}
