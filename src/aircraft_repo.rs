use anyhow::Result;
use diesel::prelude::*;

use crate::aircraft::{Aircraft, AircraftRequest, NewAircraft};
use crate::web::PgPool;

#[derive(Clone)]
pub struct AircraftRepository {
    pool: PgPool,
}

impl AircraftRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All aircraft in a logbook, ordered by identifier
    pub async fn list(&self, owner: &str, logbook_id: i32) -> Result<Vec<Aircraft>> {
        use crate::schema::aircraft;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let results = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let rows: Vec<Aircraft> = aircraft::table
                .filter(aircraft::logbook_id.eq(logbook_id))
                .filter(aircraft::user_id.eq(owner))
                .order(aircraft::aircraft_identifier.asc())
                .select(Aircraft::as_select())
                .load(&mut conn)?;

            Ok::<Vec<Aircraft>, anyhow::Error>(rows)
        })
        .await??;

        Ok(results)
    }

    pub async fn get(
        &self,
        owner: &str,
        logbook_id: i32,
        aircraft_id: i32,
    ) -> Result<Option<Aircraft>> {
        use crate::schema::aircraft;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let row = aircraft::table
                .filter(aircraft::id.eq(aircraft_id))
                .filter(aircraft::logbook_id.eq(logbook_id))
                .filter(aircraft::user_id.eq(owner))
                .select(Aircraft::as_select())
                .first(&mut conn)
                .optional()?;

            Ok::<Option<Aircraft>, anyhow::Error>(row)
        })
        .await??;

        Ok(result)
    }

    pub async fn create(&self, new_aircraft: NewAircraft) -> Result<Aircraft> {
        use crate::schema::aircraft;

        let pool = self.pool.clone();

        let created = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let row = diesel::insert_into(aircraft::table)
                .values(&new_aircraft)
                .returning(Aircraft::as_returning())
                .get_result(&mut conn)?;

            Ok::<Aircraft, anyhow::Error>(row)
        })
        .await??;

        Ok(created)
    }

    pub async fn update(
        &self,
        owner: &str,
        logbook_id: i32,
        aircraft_id: i32,
        changes: AircraftRequest,
    ) -> Result<Option<Aircraft>> {
        use crate::schema::aircraft;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let row = diesel::update(
                aircraft::table
                    .filter(aircraft::id.eq(aircraft_id))
                    .filter(aircraft::logbook_id.eq(logbook_id))
                    .filter(aircraft::user_id.eq(owner)),
            )
            .set(&changes)
            .returning(Aircraft::as_returning())
            .get_result(&mut conn)
            .optional()?;

            Ok::<Option<Aircraft>, anyhow::Error>(row)
        })
        .await??;

        Ok(result)
    }

    /// Delete an aircraft and, through the cascade, every flight flown in it
    pub async fn delete(&self, owner: &str, logbook_id: i32, aircraft_id: i32) -> Result<bool> {
        use crate::schema::aircraft;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let rows_affected = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let rows = diesel::delete(
                aircraft::table
                    .filter(aircraft::id.eq(aircraft_id))
                    .filter(aircraft::logbook_id.eq(logbook_id))
                    .filter(aircraft::user_id.eq(owner)),
            )
            .execute(&mut conn)?;

            Ok::<usize, anyhow::Error>(rows)
        })
        .await??;

        Ok(rows_affected > 0)
    }
}
