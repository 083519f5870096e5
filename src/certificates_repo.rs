use anyhow::Result;
use diesel::prelude::*;

use crate::certificates::{Certificate, CertificateRequest, NewCertificate};
use crate::web::PgPool;

#[derive(Clone)]
pub struct CertificatesRepository {
    pool: PgPool,
}

impl CertificatesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, owner: &str, logbook_id: i32) -> Result<Vec<Certificate>> {
        use crate::schema::certificates;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let results = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let rows: Vec<Certificate> = certificates::table
                .filter(certificates::logbook_id.eq(logbook_id))
                .filter(certificates::user_id.eq(owner))
                .order(certificates::certificate_date.asc())
                .select(Certificate::as_select())
                .load(&mut conn)?;

            Ok::<Vec<Certificate>, anyhow::Error>(rows)
        })
        .await??;

        Ok(results)
    }

    pub async fn get(
        &self,
        owner: &str,
        logbook_id: i32,
        certificate_id: i32,
    ) -> Result<Option<Certificate>> {
        use crate::schema::certificates;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let row = certificates::table
                .filter(certificates::id.eq(certificate_id))
                .filter(certificates::logbook_id.eq(logbook_id))
                .filter(certificates::user_id.eq(owner))
                .select(Certificate::as_select())
                .first(&mut conn)
                .optional()?;

            Ok::<Option<Certificate>, anyhow::Error>(row)
        })
        .await??;

        Ok(result)
    }

    pub async fn create(&self, new_certificate: NewCertificate) -> Result<Certificate> {
        use crate::schema::certificates;

        let pool = self.pool.clone();

        let created = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let row = diesel::insert_into(certificates::table)
                .values(&new_certificate)
                .returning(Certificate::as_returning())
                .get_result(&mut conn)?;

            Ok::<Certificate, anyhow::Error>(row)
        })
        .await??;

        Ok(created)
    }

    pub async fn update(
        &self,
        owner: &str,
        logbook_id: i32,
        certificate_id: i32,
        changes: CertificateRequest,
    ) -> Result<Option<Certificate>> {
        use crate::schema::certificates;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let row = diesel::update(
                certificates::table
                    .filter(certificates::id.eq(certificate_id))
                    .filter(certificates::logbook_id.eq(logbook_id))
                    .filter(certificates::user_id.eq(owner)),
            )
            .set(&changes)
            .returning(Certificate::as_returning())
            .get_result(&mut conn)
            .optional()?;

            Ok::<Option<Certificate>, anyhow::Error>(row)
        })
        .await??;

        Ok(result)
    }

    /// Delete a certificate together with its ratings
    pub async fn delete(&self, owner: &str, logbook_id: i32, certificate_id: i32) -> Result<bool> {
        use crate::schema::certificates;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let rows_affected = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let rows = diesel::delete(
                certificates::table
                    .filter(certificates::id.eq(certificate_id))
                    .filter(certificates::logbook_id.eq(logbook_id))
                    .filter(certificates::user_id.eq(owner)),
            )
            .execute(&mut conn)?;

            Ok::<usize, anyhow::Error>(rows)
        })
        .await??;

        Ok(rows_affected > 0)
    }
}
