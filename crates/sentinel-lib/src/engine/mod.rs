//! Derived-state engine over the rolling history
//!
//! This module provides:
//! - Per-metric status tiers and trend classification against the
//!   static threshold table
//! - Alert derivation and the aggregate performance score
//! - The composite cross-metric stress index with its danger flag

mod classify;
mod stress;

pub use classify::{
    active_alerts, classify, classify_all, performance_score, threshold, Alert,
    MetricStatusRecord, Threshold, Tier, Trend, SPARKLINE_LEN, TREND_DELTA, UPTIME_TREND_DELTA,
};
pub use stress::{compute_stress, has_danger, StressPoint, DANGER_THRESHOLD, SMOOTHING_WINDOW};
