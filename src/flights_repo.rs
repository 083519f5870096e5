use anyhow::Result;
use diesel::prelude::*;
use std::collections::HashMap;

use crate::currencies::FlightHistoryEntry;
use crate::flights::{Flight, FlightRequest, NewFlight};
use crate::web::PgPool;

#[derive(Clone)]
pub struct FlightsRepository {
    pool: PgPool,
}

impl FlightsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Flights in a logbook, most recent first
    pub async fn list(&self, owner: &str, logbook_id: i32) -> Result<Vec<Flight>> {
        use crate::schema::flights;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let results = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let rows: Vec<Flight> = flights::table
                .filter(flights::logbook_id.eq(logbook_id))
                .filter(flights::user_id.eq(owner))
                .order((flights::flight_date.desc(), flights::id.desc()))
                .select(Flight::as_select())
                .load(&mut conn)?;

            Ok::<Vec<Flight>, anyhow::Error>(rows)
        })
        .await??;

        Ok(results)
    }

    pub async fn get(&self, owner: &str, logbook_id: i32, flight_id: i32) -> Result<Option<Flight>> {
        use crate::schema::flights;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let row = flights::table
                .filter(flights::id.eq(flight_id))
                .filter(flights::logbook_id.eq(logbook_id))
                .filter(flights::user_id.eq(owner))
                .select(Flight::as_select())
                .first(&mut conn)
                .optional()?;

            Ok::<Option<Flight>, anyhow::Error>(row)
        })
        .await??;

        Ok(result)
    }

    pub async fn create(&self, new_flight: NewFlight) -> Result<Flight> {
        use crate::schema::flights;

        let pool = self.pool.clone();

        let created = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let row = diesel::insert_into(flights::table)
                .values(&new_flight)
                .returning(Flight::as_returning())
                .get_result(&mut conn)?;

            Ok::<Flight, anyhow::Error>(row)
        })
        .await??;

        Ok(created)
    }

    pub async fn update(
        &self,
        owner: &str,
        logbook_id: i32,
        flight_id: i32,
        changes: FlightRequest,
    ) -> Result<Option<Flight>> {
        use crate::schema::flights;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let row = diesel::update(
                flights::table
                    .filter(flights::id.eq(flight_id))
                    .filter(flights::logbook_id.eq(logbook_id))
                    .filter(flights::user_id.eq(owner)),
            )
            .set(&changes)
            .returning(Flight::as_returning())
            .get_result(&mut conn)
            .optional()?;

            Ok::<Option<Flight>, anyhow::Error>(row)
        })
        .await??;

        Ok(result)
    }

    pub async fn delete(&self, owner: &str, logbook_id: i32, flight_id: i32) -> Result<bool> {
        use crate::schema::flights;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let rows_affected = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let rows = diesel::delete(
                flights::table
                    .filter(flights::id.eq(flight_id))
                    .filter(flights::logbook_id.eq(logbook_id))
                    .filter(flights::user_id.eq(owner)),
            )
            .execute(&mut conn)?;

            Ok::<usize, anyhow::Error>(rows)
        })
        .await??;

        Ok(rows_affected > 0)
    }

    /// Flights logged on or after `since`, joined with the aircraft flown and the
    /// number of approaches logged on each. Input to the currency rules.
    pub async fn currency_history(
        &self,
        owner: &str,
        logbook_id: i32,
        since: chrono::NaiveDate,
    ) -> Result<Vec<FlightHistoryEntry>> {
        use crate::schema::{aircraft, approaches, flights};

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let results = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            type HistoryRow = (
                i32,
                chrono::NaiveDate,
                i32,
                i32,
                i32,
                bool,
                bool,
                bool,
                Option<String>,
                Option<String>,
                Option<String>,
            );

            let rows: Vec<HistoryRow> = flights::table
                .inner_join(aircraft::table)
                .filter(flights::logbook_id.eq(logbook_id))
                .filter(flights::user_id.eq(&owner))
                .filter(flights::flight_date.ge(since))
                .order((flights::flight_date.desc(), flights::id.desc()))
                .select((
                    flights::id,
                    flights::flight_date,
                    flights::number_of_landings_day,
                    flights::number_of_landings_night,
                    flights::number_of_holds,
                    flights::is_check_ride,
                    flights::is_flight_review,
                    flights::is_instrument_proficiency_check,
                    aircraft::aircraft_category,
                    aircraft::aircraft_class,
                    aircraft::gear_type,
                ))
                .load(&mut conn)?;

            let flight_ids: Vec<i32> = rows.iter().map(|row| row.0).collect();
            let approach_counts: HashMap<i32, i64> = approaches::table
                .filter(approaches::flight_id.eq_any(&flight_ids))
                .group_by(approaches::flight_id)
                .select((approaches::flight_id, diesel::dsl::count(approaches::id)))
                .load::<(i32, i64)>(&mut conn)?
                .into_iter()
                .collect();

            let history = rows
                .into_iter()
                .map(
                    |(
                        id,
                        flight_date,
                        landings_day,
                        landings_night,
                        holds,
                        is_check_ride,
                        is_flight_review,
                        is_instrument_proficiency_check,
                        aircraft_category,
                        aircraft_class,
                        gear_type,
                    )| FlightHistoryEntry {
                        flight_date,
                        landings_day,
                        landings_night,
                        holds,
                        approaches: approach_counts.get(&id).copied().unwrap_or(0),
                        is_check_ride,
                        is_flight_review,
                        is_instrument_proficiency_check,
                        aircraft_category,
                        aircraft_class,
                        gear_type,
                    },
                )
                .collect();

            Ok::<Vec<FlightHistoryEntry>, anyhow::Error>(history)
        })
        .await??;

        Ok(results)
    }
}
