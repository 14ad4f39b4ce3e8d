//! Integration tests for the daemon API endpoints

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use sentinel_lib::{
    engine::classify_all,
    health::{components, ComponentStatus, HealthRegistry},
    models::{MetricSample, METRIC_COUNT},
    observability::MonitorMetrics,
    predictor::ReconciledStatus,
    service::DashboardSnapshot,
};
use std::sync::Arc;
use tokio::sync::watch;
use tower::ServiceExt;

#[derive(Clone)]
pub struct AppState {
    pub health_registry: HealthRegistry,
    pub metrics: MonitorMetrics,
    pub snapshot: watch::Receiver<DashboardSnapshot>,
}

async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;
    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status_code, Json(health))
}

async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;
    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(readiness))
}

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

async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snap = state.snapshot.borrow().clone();
    Json(serde_json::json!({
        "overall": snap.prediction.overall,
        "probability_percent": snap.prediction.probability_percent,
        "time_frame": snap.prediction.time_frame,
        "recommendations": snap.prediction.recommendations,
        "stale": snap.prediction_stale,
    }))
}

async fn parameters(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snap = state.snapshot.borrow().clone();
    Json(serde_json::json!({
        "parameters": snap.parameters,
        "alerts": snap.alerts,
        "performance_score": snap.performance_score,
    }))
}

fn create_test_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/api/v1/status", get(status))
        .route("/api/v1/parameters", get(parameters))
        .with_state(state)
}

fn placeholder_snapshot() -> DashboardSnapshot {
    DashboardSnapshot {
        parameters: classify_all(&[]),
        stress: Vec::new(),
        danger: false,
        alerts: Vec::new(),
        performance_score: 100,
        prediction: ReconciledStatus::waiting_for_data(),
        prediction_stale: false,
        updated_at: 0,
    }
}

async fn setup_test_app() -> (Router, Arc<AppState>, watch::Sender<DashboardSnapshot>) {
    let health_registry = HealthRegistry::new();
    health_registry.register(components::FEED).await;
    health_registry.register(components::PREDICTOR).await;

    let (tx, rx) = watch::channel(placeholder_snapshot());
    let metrics = MonitorMetrics::new();
    let state = Arc::new(AppState {
        health_registry,
        metrics,
        snapshot: rx,
    });
    let router = create_test_router(state.clone());

    (router, state, tx)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_healthz_returns_ok_when_healthy() {
    let (app, _state, _tx) = setup_test_app().await;

    let (status, health) = get_json(app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");
    assert!(health["components"]["feed_poller"].is_object());
    assert!(health["components"]["predictor"].is_object());
}

#[tokio::test]
async fn test_healthz_returns_ok_when_degraded() {
    let (app, state, _tx) = setup_test_app().await;

    state
        .health_registry
        .set_degraded(components::FEED, "Live feed poll failed")
        .await;

    // Degraded still returns 200 (operational)
    let (status, health) = get_json(app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "degraded");
}

#[tokio::test]
async fn test_healthz_returns_503_when_unhealthy() {
    let (app, state, _tx) = setup_test_app().await;

    state
        .health_registry
        .set_unhealthy(components::PREDICTOR, "Endpoint unreachable")
        .await;

    let (status, health) = get_json(app, "/healthz").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(health["status"], "unhealthy");
}

#[tokio::test]
async fn test_readyz_tracks_readiness() {
    let (app, state, _tx) = setup_test_app().await;

    let (status, readiness) = get_json(app.clone(), "/readyz").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(readiness["ready"], false);

    state.health_registry.set_ready(true).await;
    let (status, readiness) = get_json(app, "/readyz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(readiness["ready"], true);
}

#[tokio::test]
async fn test_metrics_endpoint_returns_prometheus_format() {
    let (app, state, _tx) = setup_test_app().await;

    state.metrics.observe_feed_latency(0.002);
    state.metrics.set_history_samples(7);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("text/plain"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let metrics_text = String::from_utf8(body.to_vec()).unwrap();

    assert!(metrics_text.contains("sentinel_feed_poll_latency_seconds"));
    assert!(metrics_text.contains("sentinel_history_samples"));
}

#[tokio::test]
async fn test_status_serves_the_safe_default_before_data() {
    let (app, _state, _tx) = setup_test_app().await;

    let (status, body) = get_json(app, "/api/v1/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overall"], "Online");
    assert_eq!(body["probability_percent"], 1);
    assert_eq!(body["time_frame"], "N/A");
    assert_eq!(body["recommendations"][0], "Waiting for data...");
    assert_eq!(body["stale"], false);
}

#[tokio::test]
async fn test_parameters_reflect_the_published_snapshot() {
    let (app, _state, tx) = setup_test_app().await;

    // Publish derived state for one sample with cpu critical
    let mut values = [1.0; METRIC_COUNT];
    values[0] = 92.0;
    let history = vec![MetricSample::new(values)];
    tx.send_modify(|snap| {
        snap.parameters = classify_all(&history);
        snap.performance_score = 80;
    });

    let (status, body) = get_json(app, "/api/v1/parameters").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["parameters"][0]["metric"], "cpu");
    assert_eq!(body["parameters"][0]["value"], 92.0);
    assert_eq!(body["parameters"][0]["status"], "critical");
    assert_eq!(body["performance_score"], 80);
}
