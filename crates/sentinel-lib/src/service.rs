//! Polling service and shared derived-state stream
//!
//! One `MonitorService` owns the rolling history and both poll loops
//! (live feed and prediction, independent cadences) and publishes an
//! immutable [`DashboardSnapshot`] through a watch channel. Every
//! consumer subscribes to the same stream; nothing re-polls on its own
//! and no consumer can mutate core state.

use crate::buffer::{AppendOutcome, SnapshotBuffer, HISTORY_CAPACITY};
use crate::engine::{
    active_alerts, classify_all, compute_stress, has_danger, performance_score, Alert,
    MetricStatusRecord, StressPoint,
};
use crate::feed::FeedSource;
use crate::health::{components, HealthRegistry};
use crate::models::MetricSample;
use crate::observability::{MonitorMetrics, StructuredLogger};
use crate::predictor::{reconcile, PredictionApi, ReconciledStatus};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch, RwLock};
use tokio::time::{interval, Instant};
use tracing::{debug, info, warn};

/// Default live feed poll cadence
pub const DEFAULT_FEED_INTERVAL: Duration = Duration::from_secs(3);

/// Default prediction poll cadence
pub const DEFAULT_PREDICT_INTERVAL: Duration = Duration::from_secs(5);

/// Configuration for the polling service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Interval between live feed polls
    pub feed_interval: Duration,
    /// Interval between prediction polls
    pub predict_interval: Duration,
    /// Rolling history capacity
    pub history_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            feed_interval: DEFAULT_FEED_INTERVAL,
            predict_interval: DEFAULT_PREDICT_INTERVAL,
            history_capacity: HISTORY_CAPACITY,
        }
    }
}

/// The complete derived state, replaced wholesale on every recompute
///
/// Consumers receive this read-only; the service is the only writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Per-metric status records in wire order
    pub parameters: Vec<MetricStatusRecord>,
    /// Composite stress series over the visible window
    pub stress: Vec<StressPoint>,
    /// True when the smoothed stress crossed the danger threshold
    pub danger: bool,
    /// Active per-metric alerts
    pub alerts: Vec<Alert>,
    /// Aggregate 0-100 health score
    pub performance_score: u8,
    /// Latest reconciled crash prediction
    pub prediction: ReconciledStatus,
    /// True when `prediction` is a retained last-known-good value that
    /// the endpoint has since failed to refresh
    pub prediction_stale: bool,
    /// Unix timestamp of the last change
    pub updated_at: i64,
}

impl DashboardSnapshot {
    /// Placeholder state shown before any data arrives
    fn initial() -> Self {
        Self {
            parameters: classify_all(&[]),
            stress: Vec::new(),
            danger: false,
            alerts: Vec::new(),
            performance_score: 100,
            prediction: ReconciledStatus::waiting_for_data(),
            prediction_stale: false,
            updated_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// Shared reconciliation service driving both poll loops
pub struct MonitorService {
    feed: Arc<dyn FeedSource>,
    predictor: Arc<dyn PredictionApi>,
    config: ServiceConfig,
    history: RwLock<SnapshotBuffer>,
    snapshot_tx: watch::Sender<DashboardSnapshot>,
    /// Whether a real prediction has ever been published (controls the
    /// stale-retention path)
    has_prediction: AtomicBool,
    /// Whether the danger flag is currently raised (edge-triggered log)
    danger_active: AtomicBool,
    health: HealthRegistry,
    metrics: MonitorMetrics,
    logger: StructuredLogger,
}

impl MonitorService {
    pub fn new(
        feed: Arc<dyn FeedSource>,
        predictor: Arc<dyn PredictionApi>,
        config: ServiceConfig,
        health: HealthRegistry,
        metrics: MonitorMetrics,
        logger: StructuredLogger,
    ) -> (Arc<Self>, watch::Receiver<DashboardSnapshot>) {
        let (snapshot_tx, snapshot_rx) = watch::channel(DashboardSnapshot::initial());
        let history = RwLock::new(SnapshotBuffer::with_capacity(config.history_capacity));

        let service = Arc::new(Self {
            feed,
            predictor,
            config,
            history,
            snapshot_tx,
            has_prediction: AtomicBool::new(false),
            danger_active: AtomicBool::new(false),
            health,
            metrics,
            logger,
        });

        (service, snapshot_rx)
    }

    /// Subscribe to the derived-state stream
    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Run the live feed poll loop until shutdown
    ///
    /// The first tick fires immediately; ticks are serialized because
    /// the loop body awaits its fetch before the next tick is taken.
    pub async fn run_feed_loop(self: Arc<Self>, mut shutdown: broadcast::Receiver<()>) {
        info!(
            interval_secs = self.config.feed_interval.as_secs(),
            "Starting live feed poll loop"
        );

        let mut ticker = interval(self.config.feed_interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.feed_tick().await;
                }
                _ = shutdown.recv() => {
                    info!("Shutting down live feed poll loop");
                    break;
                }
            }
        }
    }

    /// Run the prediction poll loop until shutdown
    pub async fn run_prediction_loop(self: Arc<Self>, mut shutdown: broadcast::Receiver<()>) {
        info!(
            interval_secs = self.config.predict_interval.as_secs(),
            "Starting prediction poll loop"
        );

        let mut ticker = interval(self.config.predict_interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.predict_tick().await;
                }
                _ = shutdown.recv() => {
                    info!("Shutting down prediction poll loop");
                    break;
                }
            }
        }
    }

    /// One live feed cycle: fetch, validate, append, re-derive
    pub async fn feed_tick(&self) {
        let start = Instant::now();

        match self.feed.fetch_latest().await {
            Ok(Some(raw)) => {
                self.metrics
                    .observe_feed_latency(start.elapsed().as_secs_f64());

                let (outcome, snapshot, len) = {
                    let mut history = self.history.write().await;
                    let outcome = history.append(&raw);
                    (outcome, history.snapshot(), history.len())
                };

                match outcome {
                    AppendOutcome::Accepted => {
                        self.metrics.inc_samples_accepted();
                        self.metrics.set_history_samples(len as i64);
                        self.publish_derived(&snapshot);
                        self.health.set_healthy(components::FEED).await;
                        self.health.set_healthy(components::BUFFER).await;
                    }
                    AppendOutcome::RejectedIncomplete => {
                        self.metrics.inc_samples_rejected();
                        self.logger.log_sample_rejected("incomplete");
                    }
                    AppendOutcome::RejectedSentinel => {
                        self.metrics.inc_samples_rejected();
                        self.logger.log_sample_rejected("all_zero_sentinel");
                    }
                }
            }
            Ok(None) => {
                debug!("Live feed produced no new sample this tick");
                self.health.set_healthy(components::FEED).await;
            }
            Err(e) => {
                self.metrics.inc_feed_errors();
                self.logger.log_poll_failure("live_feed", &e.to_string());
                self.health
                    .set_degraded(components::FEED, e.to_string())
                    .await;
            }
        }
    }

    /// One prediction cycle: snapshot the history, call the endpoint,
    /// reconcile and publish
    pub async fn predict_tick(&self) {
        let history = self.history.read().await.snapshot();
        if history.is_empty() {
            debug!("Skipping prediction, no history yet");
            return;
        }

        let start = Instant::now();

        match self.predictor.predict(&history).await {
            Ok(response) => {
                self.metrics
                    .observe_prediction_latency(start.elapsed().as_secs_f64());
                self.metrics.inc_predictions_received();

                // Reconcile against tiers derived from the same history
                // snapshot the endpoint saw
                let records = classify_all(&history);
                let status = reconcile(&response, &records);

                self.logger.log_prediction(
                    status.probability,
                    &status.overall.to_string(),
                    &status.time_frame,
                );

                if response.probability.is_some() {
                    self.has_prediction.store(true, Ordering::SeqCst);
                }

                self.snapshot_tx.send_modify(|snap| {
                    snap.prediction = status;
                    snap.prediction_stale = false;
                    snap.updated_at = chrono::Utc::now().timestamp();
                });
                self.health.set_healthy(components::PREDICTOR).await;
            }
            Err(e) => {
                self.metrics.inc_prediction_errors();
                self.logger.log_poll_failure("prediction", &e.to_string());
                self.health
                    .set_degraded(components::PREDICTOR, e.to_string())
                    .await;

                if self.has_prediction.load(Ordering::SeqCst) {
                    // Keep the last known-good value, visibly stale
                    self.snapshot_tx.send_modify(|snap| {
                        snap.prediction_stale = true;
                        snap.updated_at = chrono::Utc::now().timestamp();
                    });
                } else {
                    self.snapshot_tx.send_modify(|snap| {
                        snap.prediction = ReconciledStatus::waiting_for_data();
                        snap.prediction_stale = false;
                        snap.updated_at = chrono::Utc::now().timestamp();
                    });
                }
            }
        }
    }

    /// Recompute everything derived from the history and publish it
    fn publish_derived(&self, history: &[MetricSample]) {
        let parameters = classify_all(history);
        let stress = compute_stress(history);
        let danger = has_danger(&stress);
        let alerts = active_alerts(&parameters);
        let score = performance_score(&parameters);

        if danger && !self.danger_active.swap(true, Ordering::SeqCst) {
            let peak = stress.iter().map(|p| p.smoothed).fold(0.0, f64::max);
            self.logger.log_danger(peak);
        } else if !danger {
            self.danger_active.store(false, Ordering::SeqCst);
        }

        self.metrics.set_performance_score(score as i64);
        self.metrics.set_danger(danger);
        if !alerts.is_empty() {
            warn!(alerts = alerts.len(), "Metrics above warning thresholds");
        }

        self.snapshot_tx.send_modify(|snap| {
            snap.parameters = parameters;
            snap.stress = stress;
            snap.danger = danger;
            snap.alerts = alerts;
            snap.performance_score = score;
            snap.updated_at = chrono::Utc::now().timestamp();
        });
    }
}
