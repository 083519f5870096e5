use anyhow::Result;
use diesel::prelude::*;

use crate::pilots::{NewPilot, Pilot, PilotRequest};
use crate::web::PgPool;

/// Repository for the one-to-one pilot record of a logbook
pub struct PilotsRepository {
    pool: PgPool,
}

impl PilotsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_for_logbook(&self, owner: &str, logbook_id: i32) -> Result<Option<Pilot>> {
        use crate::schema::pilots;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let pilot = pilots::table
                .filter(pilots::logbook_id.eq(logbook_id))
                .filter(pilots::user_id.eq(owner))
                .select(Pilot::as_select())
                .first(&mut conn)
                .optional()?;

            Ok::<Option<Pilot>, anyhow::Error>(pilot)
        })
        .await??;

        Ok(result)
    }

    /// Insert the pilot for a logbook. A second pilot for the same logbook fails
    /// with a unique violation from `idx_pilots_logbook_id`.
    pub async fn create(&self, new_pilot: NewPilot) -> Result<Pilot> {
        use crate::schema::pilots;

        let pool = self.pool.clone();

        let pilot = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let pilot = diesel::insert_into(pilots::table)
                .values(&new_pilot)
                .returning(Pilot::as_returning())
                .get_result(&mut conn)?;

            Ok::<Pilot, anyhow::Error>(pilot)
        })
        .await??;

        Ok(pilot)
    }

    pub async fn update_for_logbook(
        &self,
        owner: &str,
        logbook_id: i32,
        changes: PilotRequest,
    ) -> Result<Option<Pilot>> {
        use crate::schema::pilots;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let pilot = diesel::update(
                pilots::table
                    .filter(pilots::logbook_id.eq(logbook_id))
                    .filter(pilots::user_id.eq(owner)),
            )
            .set(&changes)
            .returning(Pilot::as_returning())
            .get_result(&mut conn)
            .optional()?;

            Ok::<Option<Pilot>, anyhow::Error>(pilot)
        })
        .await??;

        Ok(result)
    }

    pub async fn delete_for_logbook(&self, owner: &str, logbook_id: i32) -> Result<bool> {
        use crate::schema::pilots;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let rows_affected = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let rows = diesel::delete(
                pilots::table
                    .filter(pilots::logbook_id.eq(logbook_id))
                    .filter(pilots::user_id.eq(owner)),
            )
            .execute(&mut conn)?;

            Ok::<usize, anyhow::Error>(rows)
        })
        .await??;

        Ok(rows_affected > 0)
    }
}
