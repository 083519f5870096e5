use anyhow::{Context, Result};
use tracing::{info, warn};

use flightbook::settings::Settings;
use flightbook::{migrations, web};

/// Apply pending migrations and exit
pub async fn handle_migrate(settings: &Settings) -> Result<()> {
    let pool = web::create_pool(&settings.database.url, 1)?;

    let applied = migrations::run_pending_migrations(&pool).await?;
    info!("Applied {} migration(s)", applied.len());

    migrations::verify_migrations(&pool).await
}

/// Report unapplied migrations without changing the database.
/// Fails (non-zero exit) when any are pending.
pub async fn handle_check_migrations(settings: &Settings) -> Result<()> {
    let pool = web::create_pool(&settings.database.url, 1)?;

    let pending = tokio::task::spawn_blocking(move || {
        let mut conn = pool
            .get()
            .context("Failed to get database connection for migration check")?;
        migrations::pending_versions(&mut conn)
    })
    .await??;

    if pending.is_empty() {
        info!("All migrations have been applied");
        return Ok(());
    }

    for version in &pending {
        warn!("Pending migration {}", version);
    }
    anyhow::bail!("{} migration(s) pending", pending.len())
}
