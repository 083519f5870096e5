use anyhow::{Context, Result};
use axum::{Router, routing::get};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tracing::info;

/// Buckets: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s, 10s
const HTTP_DURATION_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Install the Prometheus recorder. Returns a handle that renders metrics for scraping.
pub fn init_metrics() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            HTTP_DURATION_BUCKETS,
        )
        .context("Failed to set buckets for http_request_duration_seconds")?
        .install_recorder()
        .context("Failed to install Prometheus recorder")
}

/// Register startup counters so they appear in queries before the first event
pub fn initialize_startup_metrics(migrations_applied: usize, seed_rows_inserted: usize) {
    metrics::counter!("startup_migrations_applied_total").absolute(migrations_applied as u64);
    metrics::counter!("startup_seed_rows_inserted_total").absolute(seed_rows_inserted as u64);
    metrics::gauge!("process.is_up").set(1.0);
}

/// Background task to update process metrics
/// Updates uptime and memory usage metrics every 5 seconds
pub async fn process_metrics_task() {
    let start_time = Instant::now();

    loop {
        metrics::gauge!("process.uptime.seconds").set(start_time.elapsed().as_secs() as f64);

        // Resident memory from procfs (Linux only)
        #[cfg(target_os = "linux")]
        {
            if let Ok(status) = std::fs::read_to_string("/proc/self/status")
                && let Some(line) = status.lines().find(|line| line.starts_with("VmRSS:"))
                && let Some(kb_str) = line.split_whitespace().nth(1)
                && let Ok(kb) = kb_str.parse::<f64>()
            {
                metrics::gauge!("process.memory.bytes").set(kb * 1024.0);
            }
        }

        tokio::time::sleep(Duration::from_secs(5)).await;
    }
}

/// Serve `/metrics` on its own port, separate from the API listener
pub async fn start_metrics_server(handle: PrometheusHandle, port: u16) -> Result<()> {
    tokio::spawn(process_metrics_task());

    let app = Router::new().route("/metrics", get(move || std::future::ready(handle.render())));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting metrics server on http://{}/metrics", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind metrics server on {}", addr))?;

    axum::serve(listener, app)
        .await
        .context("Metrics server failed")
}
