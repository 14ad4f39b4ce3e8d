//! Observability infrastructure for the monitoring daemon
//!
//! Provides:
//! - Prometheus metrics (poll latencies, history size, sample and error
//!   counters, performance score, danger flag)
//! - Structured logging with stable `event =` fields via tracing

use prometheus::{
    register_histogram, register_int_counter, register_int_gauge, Histogram, IntCounter, IntGauge,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for network poll latencies (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<MonitorMetricsInner> = OnceLock::new();

/// Inner structure holding the actual Prometheus metrics
struct MonitorMetricsInner {
    feed_poll_latency_seconds: Histogram,
    prediction_latency_seconds: Histogram,
    history_samples: IntGauge,
    performance_score: IntGauge,
    stress_danger: IntGauge,
    samples_accepted: IntCounter,
    samples_rejected: IntCounter,
    feed_errors: IntCounter,
    prediction_errors: IntCounter,
    predictions_received: IntCounter,
}

impl MonitorMetricsInner {
    fn new() -> Self {
        Self {
            feed_poll_latency_seconds: register_histogram!(
                "sentinel_feed_poll_latency_seconds",
                "Time spent fetching the live metrics feed",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register feed_poll_latency_seconds"),

            prediction_latency_seconds: register_histogram!(
                "sentinel_prediction_latency_seconds",
                "Time spent calling the crash-prediction endpoint",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            history_samples: register_int_gauge!(
                "sentinel_history_samples",
                "Number of samples in the rolling history buffer"
            )
            .expect("Failed to register history_samples"),

            performance_score: register_int_gauge!(
                "sentinel_performance_score",
                "Current aggregate performance score (0-100)"
            )
            .expect("Failed to register performance_score"),

            stress_danger: register_int_gauge!(
                "sentinel_stress_danger",
                "1 when the smoothed stress index crosses the danger threshold"
            )
            .expect("Failed to register stress_danger"),

            samples_accepted: register_int_counter!(
                "sentinel_samples_accepted_total",
                "Total feed samples accepted into the history"
            )
            .expect("Failed to register samples_accepted_total"),

            samples_rejected: register_int_counter!(
                "sentinel_samples_rejected_total",
                "Total feed samples rejected at the buffer boundary"
            )
            .expect("Failed to register samples_rejected_total"),

            feed_errors: register_int_counter!(
                "sentinel_feed_errors_total",
                "Total live feed poll failures"
            )
            .expect("Failed to register feed_errors_total"),

            prediction_errors: register_int_counter!(
                "sentinel_prediction_errors_total",
                "Total prediction poll failures"
            )
            .expect("Failed to register prediction_errors_total"),

            predictions_received: register_int_counter!(
                "sentinel_predictions_received_total",
                "Total successful prediction responses"
            )
            .expect("Failed to register predictions_received_total"),
        }
    }
}

/// Metrics handle for the monitoring daemon
///
/// A lightweight handle to the global metrics instance; clones share
/// the same underlying registry.
#[derive(Clone)]
pub struct MonitorMetrics {
    _private: (),
}

impl Default for MonitorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitorMetrics {
    /// Create a metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(MonitorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &MonitorMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn observe_feed_latency(&self, duration_secs: f64) {
        self.inner().feed_poll_latency_seconds.observe(duration_secs);
    }

    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    pub fn set_history_samples(&self, count: i64) {
        self.inner().history_samples.set(count);
    }

    pub fn set_performance_score(&self, score: i64) {
        self.inner().performance_score.set(score);
    }

    pub fn set_danger(&self, danger: bool) {
        self.inner().stress_danger.set(danger as i64);
    }

    pub fn inc_samples_accepted(&self) {
        self.inner().samples_accepted.inc();
    }

    pub fn inc_samples_rejected(&self) {
        self.inner().samples_rejected.inc();
    }

    pub fn inc_feed_errors(&self) {
        self.inner().feed_errors.inc();
    }

    pub fn inc_prediction_errors(&self) {
        self.inner().prediction_errors.inc();
    }

    pub fn inc_predictions_received(&self) {
        self.inner().predictions_received.inc();
    }
}

/// Structured logger for significant service events
///
/// Emits consistent `event =` fields so log pipelines can filter on
/// predictions, rejected samples, and danger transitions.
#[derive(Clone)]
pub struct StructuredLogger {
    instance: String,
}

impl StructuredLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    /// Log a sample rejected at the buffer boundary
    pub fn log_sample_rejected(&self, reason: &str) {
        info!(
            event = "sample_rejected",
            instance = %self.instance,
            reason = %reason,
            "Rejected live feed sample"
        );
    }

    /// Log a reconciled prediction
    pub fn log_prediction(&self, probability: f64, overall: &str, time_frame: &str) {
        info!(
            event = "prediction_reconciled",
            instance = %self.instance,
            probability = probability,
            overall = %overall,
            time_frame = %time_frame,
            "Reconciled crash prediction"
        );
    }

    /// Log the composite stress index crossing the danger threshold
    pub fn log_danger(&self, smoothed: f64) {
        warn!(
            event = "stress_danger",
            instance = %self.instance,
            smoothed = smoothed,
            "Composite stress crossed the danger threshold"
        );
    }

    /// Log a failed poll for one of the two concerns
    pub fn log_poll_failure(&self, concern: &str, error: &str) {
        warn!(
            event = "poll_failed",
            instance = %self.instance,
            concern = %concern,
            error = %error,
            "Poll failed, will retry on the next tick"
        );
    }

    /// Log daemon startup
    pub fn log_startup(&self, version: &str) {
        info!(
            event = "sentinel_started",
            instance = %self.instance,
            version = %version,
            "Server sentinel started"
        );
    }

    /// Log daemon shutdown
    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "sentinel_shutdown",
            instance = %self.instance,
            reason = %reason,
            "Server sentinel shutting down"
        );
    }
}
