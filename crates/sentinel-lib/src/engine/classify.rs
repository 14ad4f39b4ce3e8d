//! Per-metric status classification
//!
//! Maps each metric's recent window to a severity tier and a trend
//! label using a static threshold table. Uptime is exempt from tiering:
//! higher uptime is never bad.

use crate::models::{MetricName, MetricSample};
use serde::{Deserialize, Serialize};

/// Number of trailing values kept for the sparkline and trend window
pub const SPARKLINE_LEN: usize = 5;

/// Minimum change between consecutive values to register a trend
pub const TREND_DELTA: f64 = 2.0;

/// Uptime moves slowly and monotonically, so it gets a tighter delta
pub const UPTIME_TREND_DELTA: f64 = 1.0;

/// Severity tier of a metric, ordered from benign to urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Normal,
    Warning,
    Critical,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Normal => write!(f, "normal"),
            Tier::Warning => write!(f, "warning"),
            Tier::Critical => write!(f, "critical"),
        }
    }
}

/// Direction of change relative to the previous value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// Warning and critical cut-offs for one metric (inclusive)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    pub warning: f64,
    pub critical: f64,
}

/// Static per-metric threshold table, fixed per deployment
///
/// Returns `None` for uptime, which is exempt from tiering.
pub fn threshold(metric: MetricName) -> Option<Threshold> {
    let t = match metric {
        MetricName::Cpu => Threshold { warning: 70.0, critical: 85.0 },
        MetricName::Memory => Threshold { warning: 75.0, critical: 90.0 },
        MetricName::Disk => Threshold { warning: 80.0, critical: 90.0 },
        MetricName::Temperature => Threshold { warning: 52.0, critical: 55.0 },
        MetricName::Errors => Threshold { warning: 5.0, critical: 10.0 },
        MetricName::ResponseTime => Threshold { warning: 180.0, critical: 220.0 },
        MetricName::Network => Threshold { warning: 80.0, critical: 95.0 },
        MetricName::Uptime => return None,
        MetricName::Processes => Threshold { warning: 400.0, critical: 600.0 },
        MetricName::Threads => Threshold { warning: 150.0, critical: 200.0 },
    };
    Some(t)
}

/// Derived status for one metric, replaced wholesale on every recompute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricStatusRecord {
    pub metric: MetricName,
    pub value: f64,
    pub trend: Trend,
    pub status: Tier,
    /// Last up-to-5 values, chronological, left-padded with zeros
    pub sparkline: [f64; SPARKLINE_LEN],
}

/// Classify one metric from its recent window (newest value last)
///
/// Pure function: an empty window yields a zero-valued normal record,
/// which doubles as the pre-data placeholder.
pub fn classify(metric: MetricName, window: &[f64]) -> MetricStatusRecord {
    let value = window.last().copied().unwrap_or(0.0);
    let previous = if window.len() > 1 {
        window[window.len() - 2]
    } else {
        value
    };

    let delta = if metric == MetricName::Uptime {
        UPTIME_TREND_DELTA
    } else {
        TREND_DELTA
    };
    let trend = if value > previous + delta {
        Trend::Up
    } else if value < previous - delta {
        Trend::Down
    } else {
        Trend::Stable
    };

    let status = match threshold(metric) {
        None => Tier::Normal,
        Some(t) if value >= t.critical => Tier::Critical,
        Some(t) if value >= t.warning => Tier::Warning,
        Some(_) => Tier::Normal,
    };

    let mut sparkline = [0.0; SPARKLINE_LEN];
    let tail = &window[window.len().saturating_sub(SPARKLINE_LEN)..];
    sparkline[SPARKLINE_LEN - tail.len()..].copy_from_slice(tail);

    MetricStatusRecord {
        metric,
        value,
        trend,
        status,
        sparkline,
    }
}

/// Classify every metric from the rolling history
pub fn classify_all(history: &[MetricSample]) -> Vec<MetricStatusRecord> {
    MetricName::ALL
        .iter()
        .map(|&metric| {
            let window: Vec<f64> = history
                .iter()
                .rev()
                .take(SPARKLINE_LEN)
                .rev()
                .map(|s| s.get(metric))
                .collect();
            classify(metric, &window)
        })
        .collect()
}

/// One active alert derived from a metric's current tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub metric: MetricName,
    pub severity: Tier,
    pub value: f64,
    pub message: String,
}

fn alert_message(metric: MetricName, severity: Tier) -> String {
    let base = match metric {
        MetricName::Cpu => "High CPU usage detected",
        MetricName::Memory => "Memory usage elevated",
        MetricName::Disk => "Disk space running low",
        MetricName::Temperature => "High temperature detected",
        MetricName::Errors => "High error rate",
        MetricName::ResponseTime => "Slow response time",
        MetricName::Network => "Network usage elevated",
        MetricName::Uptime => "Uptime anomaly",
        MetricName::Processes => "Process count high",
        MetricName::Threads => "Thread count high",
    };
    match severity {
        Tier::Critical => format!("Critical: {}", base),
        _ => base.to_string(),
    }
}

/// Alerts for every metric at warning tier or above
///
/// At most one alert per metric, in wire order, so the set is bounded
/// and deduplicated by construction.
pub fn active_alerts(records: &[MetricStatusRecord]) -> Vec<Alert> {
    records
        .iter()
        .filter(|r| r.status > Tier::Normal)
        .map(|r| Alert {
            metric: r.metric,
            severity: r.status,
            value: r.value,
            message: alert_message(r.metric, r.status),
        })
        .collect()
}

/// Weighted deductions for the performance score
const SCORE_WEIGHTS: [(MetricName, u32); 5] = [
    (MetricName::Cpu, 20),
    (MetricName::Memory, 25),
    (MetricName::Temperature, 15),
    (MetricName::Errors, 20),
    (MetricName::ResponseTime, 15),
];

/// Aggregate 0-100 health score
///
/// Starts at 100; each weighted metric deducts its full weight at
/// critical and half at warning.
pub fn performance_score(records: &[MetricStatusRecord]) -> u8 {
    let mut score: i64 = 100;
    for (metric, weight) in SCORE_WEIGHTS {
        let tier = records
            .iter()
            .find(|r| r.metric == metric)
            .map(|r| r.status)
            .unwrap_or(Tier::Normal);
        score -= match tier {
            Tier::Critical => weight as i64,
            Tier::Warning => (weight / 2) as i64,
            Tier::Normal => 0,
        };
    }
    score.max(0) as u8
}
