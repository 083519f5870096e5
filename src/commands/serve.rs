use anyhow::{Context, Result};
use tracing::{error, info};

use flightbook::settings::Settings;
use flightbook::{metrics, migrations, seed, web};

/// Bring the database up to date, seed reference data, then serve the API.
/// Every step before the listener is bound is fatal on failure.
pub async fn handle_serve(settings: &Settings) -> Result<()> {
    sentry::configure_scope(|scope| {
        scope.set_tag("operation", "serve");
    });

    info!(
        "Starting flightbook ({} environment)",
        settings.environment
    );

    let pool = web::create_pool(&settings.database.url, settings.database.max_connections)?;

    let applied = migrations::run_pending_migrations(&pool)
        .await
        .context("Failed to migrate database")?;
    migrations::verify_migrations(&pool).await?;

    let seeded = seed::ensure_seed_data(&pool)
        .await
        .context("Failed to seed reference data")?;

    if let Some(port) = settings.metrics.port {
        let handle = metrics::init_metrics()?;
        metrics::initialize_startup_metrics(applied.len(), seeded);
        tokio::spawn(async move {
            if let Err(e) = metrics::start_metrics_server(handle, port).await {
                error!("Metrics server stopped: {:#}", e);
            }
        });
    }

    web::start_web_server(settings, pool).await
}
