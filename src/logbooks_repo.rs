use anyhow::Result;
use diesel::prelude::*;

use crate::logbooks::{Logbook, LogbookRequest, NewLogbook};
use crate::web::PgPool;

/// Repository for logbooks. Every query is scoped to the owning user.
#[derive(Clone)]
pub struct LogbooksRepository {
    pool: PgPool,
}

impl LogbooksRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All logbooks belonging to a user, oldest first
    pub async fn list(&self, owner: &str) -> Result<Vec<Logbook>> {
        use crate::schema::logbooks;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let results = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let logbooks: Vec<Logbook> = logbooks::table
                .filter(logbooks::user_id.eq(owner))
                .order(logbooks::id.asc())
                .select(Logbook::as_select())
                .load(&mut conn)?;

            Ok::<Vec<Logbook>, anyhow::Error>(logbooks)
        })
        .await??;

        Ok(results)
    }

    pub async fn get(&self, owner: &str, logbook_id: i32) -> Result<Option<Logbook>> {
        use crate::schema::logbooks;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let logbook = logbooks::table
                .filter(logbooks::id.eq(logbook_id))
                .filter(logbooks::user_id.eq(owner))
                .select(Logbook::as_select())
                .first(&mut conn)
                .optional()?;

            Ok::<Option<Logbook>, anyhow::Error>(logbook)
        })
        .await??;

        Ok(result)
    }

    pub async fn create(&self, new_logbook: NewLogbook) -> Result<Logbook> {
        use crate::schema::logbooks;

        let pool = self.pool.clone();

        let logbook = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let logbook = diesel::insert_into(logbooks::table)
                .values(&new_logbook)
                .returning(Logbook::as_returning())
                .get_result(&mut conn)?;

            Ok::<Logbook, anyhow::Error>(logbook)
        })
        .await??;

        Ok(logbook)
    }

    /// Replace the editable fields. Returns None when the logbook is not the user's.
    pub async fn update(
        &self,
        owner: &str,
        logbook_id: i32,
        changes: LogbookRequest,
    ) -> Result<Option<Logbook>> {
        use crate::schema::logbooks;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let logbook = diesel::update(
                logbooks::table
                    .filter(logbooks::id.eq(logbook_id))
                    .filter(logbooks::user_id.eq(owner)),
            )
            .set(&changes)
            .returning(Logbook::as_returning())
            .get_result(&mut conn)
            .optional()?;

            Ok::<Option<Logbook>, anyhow::Error>(logbook)
        })
        .await??;

        Ok(result)
    }

    /// Delete a logbook. Owned records go with it through ON DELETE CASCADE.
    pub async fn delete(&self, owner: &str, logbook_id: i32) -> Result<bool> {
        use crate::schema::logbooks;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let rows_affected = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let rows = diesel::delete(
                logbooks::table
                    .filter(logbooks::id.eq(logbook_id))
                    .filter(logbooks::user_id.eq(owner)),
            )
            .execute(&mut conn)?;

            Ok::<usize, anyhow::Error>(rows)
        })
        .await??;

        Ok(rows_affected > 0)
    }
}
