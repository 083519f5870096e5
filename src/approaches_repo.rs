use anyhow::Result;
use diesel::prelude::*;

use crate::approaches::{Approach, ApproachRequest, NewApproach};
use crate::web::PgPool;

/// Approaches are reached through their flight; callers check the flight
/// belongs to the logbook before using this repository.
#[derive(Clone)]
pub struct ApproachesRepository {
    pool: PgPool,
}

impl ApproachesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, owner: &str, flight_id: i32) -> Result<Vec<Approach>> {
        use crate::schema::approaches;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let results = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let rows: Vec<Approach> = approaches::table
                .filter(approaches::flight_id.eq(flight_id))
                .filter(approaches::user_id.eq(owner))
                .order(approaches::id.asc())
                .select(Approach::as_select())
                .load(&mut conn)?;

            Ok::<Vec<Approach>, anyhow::Error>(rows)
        })
        .await??;

        Ok(results)
    }

    pub async fn get(&self, owner: &str, flight_id: i32, approach_id: i32) -> Result<Option<Approach>> {
        use crate::schema::approaches;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let row = approaches::table
                .filter(approaches::id.eq(approach_id))
                .filter(approaches::flight_id.eq(flight_id))
                .filter(approaches::user_id.eq(owner))
                .select(Approach::as_select())
                .first(&mut conn)
                .optional()?;

            Ok::<Option<Approach>, anyhow::Error>(row)
        })
        .await??;

        Ok(result)
    }

    pub async fn create(&self, new_approach: NewApproach) -> Result<Approach> {
        use crate::schema::approaches;

        let pool = self.pool.clone();

        let created = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let row = diesel::insert_into(approaches::table)
                .values(&new_approach)
                .returning(Approach::as_returning())
                .get_result(&mut conn)?;

            Ok::<Approach, anyhow::Error>(row)
        })
        .await??;

        Ok(created)
    }

    pub async fn update(
        &self,
        owner: &str,
        flight_id: i32,
        approach_id: i32,
        changes: ApproachRequest,
    ) -> Result<Option<Approach>> {
        use crate::schema::approaches;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let row = diesel::update(
                approaches::table
                    .filter(approaches::id.eq(approach_id))
                    .filter(approaches::flight_id.eq(flight_id))
                    .filter(approaches::user_id.eq(owner)),
            )
            .set(&changes)
            .returning(Approach::as_returning())
            .get_result(&mut conn)
            .optional()?;

            Ok::<Option<Approach>, anyhow::Error>(row)
        })
        .await??;

        Ok(result)
    }

    pub async fn delete(&self, owner: &str, flight_id: i32, approach_id: i32) -> Result<bool> {
        use crate::schema::approaches;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let rows_affected = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let rows = diesel::delete(
                approaches::table
                    .filter(approaches::id.eq(approach_id))
                    .filter(approaches::flight_id.eq(flight_id))
                    .filter(approaches::user_id.eq(owner)),
            )
            .execute(&mut conn)?;

            Ok::<usize, anyhow::Error>(rows)
        })
        .await??;

        Ok(rows_affected > 0)
    }
}
