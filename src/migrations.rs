//! Embedded schema migrations and the check that all of them have been applied.

use anyhow::{Context, Result};
use diesel::PgConnection;
use diesel::migration::{Migration, MigrationName, MigrationSource};
use diesel::pg::Pg;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use std::collections::HashSet;
use tracing::{info, warn};

use crate::web::PgPool;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Known versions that have not been applied, in known order.
pub fn missing_migrations(known: &[String], applied: &[String]) -> Vec<String> {
    let applied: HashSet<&str> = applied.iter().map(String::as_str).collect();
    known
        .iter()
        .filter(|version| !applied.contains(version.as_str()))
        .cloned()
        .collect()
}

/// True when every known migration has been applied. Extra applied versions
/// (from a newer build) do not make the schema incomplete.
pub fn is_complete(known: &[String], applied: &[String]) -> bool {
    missing_migrations(known, applied).is_empty()
}

/// Versions of every migration embedded in this binary, oldest first
pub fn known_versions() -> Result<Vec<String>> {
    let migrations: Vec<Box<dyn Migration<Pg>>> = MigrationSource::<Pg>::migrations(&MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("Failed to read embedded migrations: {}", e))?;

    let mut versions: Vec<String> = migrations
        .iter()
        .map(|migration| migration.name().version().to_string())
        .collect();
    versions.sort();
    Ok(versions)
}

/// Versions recorded in `__diesel_schema_migrations`
pub fn applied_versions(conn: &mut PgConnection) -> Result<Vec<String>> {
    let applied = conn
        .applied_migrations()
        .map_err(|e| anyhow::anyhow!("Failed to read migration history: {}", e))?;
    Ok(applied.iter().map(|version| version.to_string()).collect())
}

/// Versions known to this binary but not yet applied to the database. Read-only.
pub fn pending_versions(conn: &mut PgConnection) -> Result<Vec<String>> {
    let known = known_versions()?;
    let applied = applied_versions(conn)?;
    Ok(missing_migrations(&known, &applied))
}

pub fn all_migrations_applied(conn: &mut PgConnection) -> Result<bool> {
    Ok(pending_versions(conn)?.is_empty())
}

/// Apply pending migrations, returning the versions applied
pub async fn run_pending_migrations(pool: &PgPool) -> Result<Vec<String>> {
    let pool = pool.clone();

    let applied = tokio::task::spawn_blocking(move || {
        let mut conn = pool
            .get()
            .context("Failed to get database connection for migrations")?;

        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;

        Ok::<Vec<String>, anyhow::Error>(applied.iter().map(|v| v.to_string()).collect())
    })
    .await??;

    if applied.is_empty() {
        info!("Database schema is up to date");
    } else {
        for version in &applied {
            info!("Applied migration {}", version);
        }
    }

    Ok(applied)
}

/// Fail unless every embedded migration is recorded as applied
pub async fn verify_migrations(pool: &PgPool) -> Result<()> {
    let pool = pool.clone();

    let pending = tokio::task::spawn_blocking(move || {
        let mut conn = pool
            .get()
            .context("Failed to get database connection for migration check")?;
        pending_versions(&mut conn)
    })
    .await??;

    if !pending.is_empty() {
        warn!("Unapplied migrations: {}", pending.join(", "));
        anyhow::bail!(
            "Database schema is incomplete: {} migration(s) not applied",
            pending.len()
        );
    }

    Ok(())
}
