use anyhow::Result;
use diesel::prelude::*;

use crate::endorsements::{Endorsement, EndorsementRequest, NewEndorsement};
use crate::web::PgPool;

#[derive(Clone)]
pub struct EndorsementsRepository {
    pool: PgPool,
}

impl EndorsementsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Endorsements in a logbook, most recent first
    pub async fn list(&self, owner: &str, logbook_id: i32) -> Result<Vec<Endorsement>> {
        use crate::schema::endorsements;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let results = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let rows: Vec<Endorsement> = endorsements::table
                .filter(endorsements::logbook_id.eq(logbook_id))
                .filter(endorsements::user_id.eq(owner))
                .order((endorsements::endorsement_date.desc(), endorsements::id.desc()))
                .select(Endorsement::as_select())
                .load(&mut conn)?;

            Ok::<Vec<Endorsement>, anyhow::Error>(rows)
        })
        .await??;

        Ok(results)
    }

    pub async fn get(
        &self,
        owner: &str,
        logbook_id: i32,
        endorsement_id: i32,
    ) -> Result<Option<Endorsement>> {
        use crate::schema::endorsements;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let row = endorsements::table
                .filter(endorsements::id.eq(endorsement_id))
                .filter(endorsements::logbook_id.eq(logbook_id))
                .filter(endorsements::user_id.eq(owner))
                .select(Endorsement::as_select())
                .first(&mut conn)
                .optional()?;

            Ok::<Option<Endorsement>, anyhow::Error>(row)
        })
        .await??;

        Ok(result)
    }

    pub async fn create(&self, new_endorsement: NewEndorsement) -> Result<Endorsement> {
        use crate::schema::endorsements;

        let pool = self.pool.clone();

        let created = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let row = diesel::insert_into(endorsements::table)
                .values(&new_endorsement)
                .returning(Endorsement::as_returning())
                .get_result(&mut conn)?;

            Ok::<Endorsement, anyhow::Error>(row)
        })
        .await??;

        Ok(created)
    }

    pub async fn update(
        &self,
        owner: &str,
        logbook_id: i32,
        endorsement_id: i32,
        changes: EndorsementRequest,
    ) -> Result<Option<Endorsement>> {
        use crate::schema::endorsements;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let row = diesel::update(
                endorsements::table
                    .filter(endorsements::id.eq(endorsement_id))
                    .filter(endorsements::logbook_id.eq(logbook_id))
                    .filter(endorsements::user_id.eq(owner)),
            )
            .set(&changes)
            .returning(Endorsement::as_returning())
            .get_result(&mut conn)
            .optional()?;

            Ok::<Option<Endorsement>, anyhow::Error>(row)
        })
        .await??;

        Ok(result)
    }

    pub async fn delete(&self, owner: &str, logbook_id: i32, endorsement_id: i32) -> Result<bool> {
        use crate::schema::endorsements;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let rows_affected = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let rows = diesel::delete(
                endorsements::table
                    .filter(endorsements::id.eq(endorsement_id))
                    .filter(endorsements::logbook_id.eq(logbook_id))
                    .filter(endorsements::user_id.eq(owner)),
            )
            .execute(&mut conn)?;

            Ok::<usize, anyhow::Error>(rows)
        })
        .await??;

        Ok(rows_affected > 0)
    }
}
