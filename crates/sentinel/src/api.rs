//! HTTP API: health checks, Prometheus metrics, and the dashboard
//! read endpoints consumed by presentation surfaces

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use sentinel_lib::{
    health::{ComponentStatus, HealthRegistry},
    observability::MonitorMetrics,
    service::DashboardSnapshot,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub health_registry: HealthRegistry,
    pub metrics: MonitorMetrics,
    pub snapshot: watch::Receiver<DashboardSnapshot>,
}

impl AppState {
    pub fn new(
        health_registry: HealthRegistry,
        metrics: MonitorMetrics,
        snapshot: watch::Receiver<DashboardSnapshot>,
    ) -> Self {
        Self {
            health_registry,
            metrics,
            snapshot,
        }
    }
}

/// Health check - 200 while operational, 503 when unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Degraded => StatusCode::OK, // still operational
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check - 200 once the poll loops are running
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder.encode(&metric_families, &mut buffer).unwrap();

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Reconciled prediction status (the status banner's data)
#[derive(Debug, Serialize)]
struct StatusView {
    #[serde(flatten)]
    prediction: sentinel_lib::predictor::ReconciledStatus,
    stale: bool,
    updated_at: i64,
}

async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snap = state.snapshot.borrow().clone();
    Json(StatusView {
        prediction: snap.prediction,
        stale: snap.prediction_stale,
        updated_at: snap.updated_at,
    })
}

/// Per-metric records, alerts, and the aggregate score
#[derive(Debug, Serialize)]
struct ParametersView {
    parameters: Vec<sentinel_lib::engine::MetricStatusRecord>,
    alerts: Vec<sentinel_lib::engine::Alert>,
    performance_score: u8,
    updated_at: i64,
}

async fn parameters(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snap = state.snapshot.borrow().clone();
    Json(ParametersView {
        parameters: snap.parameters,
        alerts: snap.alerts,
        performance_score: snap.performance_score,
        updated_at: snap.updated_at,
    })
}

/// Composite stress series with its danger flag
#[derive(Debug, Serialize)]
struct StressView {
    stress: Vec<sentinel_lib::engine::StressPoint>,
    danger: bool,
    updated_at: i64,
}

async fn stress(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snap = state.snapshot.borrow().clone();
    Json(StressView {
        stress: snap.stress,
        danger: snap.danger,
        updated_at: snap.updated_at,
    })
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/api/v1/status", get(status))
        .route("/api/v1/parameters", get(parameters))
        .route("/api/v1/stress", get(stress))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
