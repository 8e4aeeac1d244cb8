//! Blog Worker - polls the API and marks unprocessed posts as processed.
//!
//! Each cycle fetches `GET /posts?unprocessed=true`, spends a fixed delay on
//! every post, then calls `PATCH /posts/{id}`. Failures are logged and left for
//! the next cycle.

use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use blog::worker::{self, ApiClient, PollSettings};
use blog::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("worker_starting");

    // Load configuration from environment
    let config = Config::from_env();
    info!(
        api_base_url = %config.api_base_url,
        poll_interval_secs = config.poll_interval_secs,
        processing_delay_secs = config.processing_delay_secs,
        request_timeout_ms = config.request_timeout_ms,
        "config_loaded"
    );

    let client = ApiClient::new(&config.api_base_url, config.request_timeout())
        .context("Failed to create API client")?;

    let settings = PollSettings {
        poll_interval: config.poll_interval(),
        processing_delay: config.processing_delay(),
    };

    worker::run(client, settings, shutdown_signal()).await;

    info!("worker_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
