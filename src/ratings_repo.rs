use anyhow::Result;
use diesel::prelude::*;

use crate::ratings::{NewRating, Rating, RatingRequest};
use crate::web::PgPool;

#[derive(Clone)]
pub struct RatingsRepository {
    pool: PgPool,
}

impl RatingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, owner: &str, certificate_id: i32) -> Result<Vec<Rating>> {
        use crate::schema::ratings;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let results = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let rows: Vec<Rating> = ratings::table
                .filter(ratings::certificate_id.eq(certificate_id))
                .filter(ratings::user_id.eq(owner))
                .order(ratings::rating_date.asc())
                .select(Rating::as_select())
                .load(&mut conn)?;

            Ok::<Vec<Rating>, anyhow::Error>(rows)
        })
        .await??;

        Ok(results)
    }

    pub async fn get(&self, owner: &str, certificate_id: i32, rating_id: i32) -> Result<Option<Rating>> {
        use crate::schema::ratings;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let row = ratings::table
                .filter(ratings::id.eq(rating_id))
                .filter(ratings::certificate_id.eq(certificate_id))
                .filter(ratings::user_id.eq(owner))
                .select(Rating::as_select())
                .first(&mut conn)
                .optional()?;

            Ok::<Option<Rating>, anyhow::Error>(row)
        })
        .await??;

        Ok(result)
    }

    pub async fn create(&self, new_rating: NewRating) -> Result<Rating> {
        use crate::schema::ratings;

        let pool = self.pool.clone();

        let created = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let row = diesel::insert_into(ratings::table)
                .values(&new_rating)
                .returning(Rating::as_returning())
                .get_result(&mut conn)?;

            Ok::<Rating, anyhow::Error>(row)
        })
        .await??;

        Ok(created)
    }

    pub async fn update(
        &self,
        owner: &str,
        certificate_id: i32,
        rating_id: i32,
        changes: RatingRequest,
    ) -> Result<Option<Rating>> {
        use crate::schema::ratings;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let row = diesel::update(
                ratings::table
                    .filter(ratings::id.eq(rating_id))
                    .filter(ratings::certificate_id.eq(certificate_id))
                    .filter(ratings::user_id.eq(owner)),
            )
            .set(&changes)
            .returning(Rating::as_returning())
            .get_result(&mut conn)
            .optional()?;

            Ok::<Option<Rating>, anyhow::Error>(row)
        })
        .await??;

        Ok(result)
    }

    pub async fn delete(&self, owner: &str, certificate_id: i32, rating_id: i32) -> Result<bool> {
        use crate::schema::ratings;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let rows_affected = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let rows = diesel::delete(
                ratings::table
                    .filter(ratings::id.eq(rating_id))
                    .filter(ratings::certificate_id.eq(certificate_id))
                    .filter(ratings::user_id.eq(owner)),
            )
            .execute(&mut conn)?;

            Ok::<usize, anyhow::Error>(rows)
        })
        .await??;

        Ok(rows_affected > 0)
    }
}
