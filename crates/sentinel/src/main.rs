//! Server Sentinel - crash-prediction monitoring daemon
//!
//! Polls a live server-metrics feed and an external crash-prediction
//! endpoint, derives per-metric and system-wide status, and serves the
//! reconciled dashboard state over HTTP.

use anyhow::Result;
use sentinel_lib::{
    feed::HttpFeedClient,
    health::{components, HealthRegistry},
    observability::{MonitorMetrics, StructuredLogger},
    predictor::HttpPredictionClient,
    service::{MonitorService, ServiceConfig},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;

const SENTINEL_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting server-sentinel");

    // Load configuration
    let config = config::SentinelConfig::load()?;
    info!(
        instance = %config.instance_name,
        feed = %config.feed_endpoint,
        predict = %config.predict_endpoint,
        "Sentinel configured"
    );

    // Initialize health registry
    let health_registry = HealthRegistry::new();
    health_registry.register(components::FEED).await;
    health_registry.register(components::PREDICTOR).await;
    health_registry.register(components::BUFFER).await;

    // Initialize metrics and structured logging
    let metrics = MonitorMetrics::new();
    let logger = StructuredLogger::new(&config.instance_name);
    logger.log_startup(SENTINEL_VERSION);

    // Backend collaborators
    let timeout = Duration::from_secs(config.request_timeout_secs);
    let feed = Arc::new(HttpFeedClient::new(&config.feed_endpoint, timeout)?);
    let predictor = Arc::new(HttpPredictionClient::new(&config.predict_endpoint, timeout)?);

    // The shared reconciliation service and its derived-state stream
    let service_config = ServiceConfig {
        feed_interval: Duration::from_secs(config.feed_interval_secs),
        predict_interval: Duration::from_secs(config.predict_interval_secs),
        ..Default::default()
    };
    let (service, snapshot_rx) = MonitorService::new(
        feed,
        predictor,
        service_config,
        health_registry.clone(),
        metrics.clone(),
        logger.clone(),
    );

    // Shutdown fan-out for the poll loops
    let (shutdown_tx, _) = broadcast::channel(1);
    let feed_handle = tokio::spawn(service.clone().run_feed_loop(shutdown_tx.subscribe()));
    let predict_handle = tokio::spawn(service.clone().run_prediction_loop(shutdown_tx.subscribe()));

    // Mark ready once the loops are running
    health_registry.set_ready(true).await;

    // Start the API server
    let app_state = Arc::new(api::AppState::new(
        health_registry.clone(),
        metrics.clone(),
        snapshot_rx,
    ));
    let _api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    logger.log_shutdown("SIGINT received");

    // Stop the poll loops before exiting; in-flight ticks are dropped
    let _ = shutdown_tx.send(());
    let _ = feed_handle.await;
    let _ = predict_handle.await;

    info!("Shutdown complete");
    Ok(())
}
