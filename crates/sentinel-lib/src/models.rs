//! Core data models for the monitoring service

use serde::{Deserialize, Serialize};

/// Number of metrics carried by every sample
pub const METRIC_COUNT: usize = 10;

/// A raw row as delivered by the live feed: at least [`METRIC_COUNT`]
/// entries, any of which may be null before the feed is warmed up
pub type RawSample = Vec<Option<f64>>;

/// The tracked metrics, in wire order
///
/// The index of each variant is a contract with the live feed and the
/// prediction endpoint; reordering breaks every downstream consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    Cpu,
    Memory,
    Disk,
    Temperature,
    Errors,
    ResponseTime,
    Network,
    Uptime,
    Processes,
    Threads,
}

impl MetricName {
    /// All metrics in wire order
    pub const ALL: [MetricName; METRIC_COUNT] = [
        MetricName::Cpu,
        MetricName::Memory,
        MetricName::Disk,
        MetricName::Temperature,
        MetricName::Errors,
        MetricName::ResponseTime,
        MetricName::Network,
        MetricName::Uptime,
        MetricName::Processes,
        MetricName::Threads,
    ];

    /// Position of this metric within a sample row
    pub fn index(self) -> usize {
        match self {
            MetricName::Cpu => 0,
            MetricName::Memory => 1,
            MetricName::Disk => 2,
            MetricName::Temperature => 3,
            MetricName::Errors => 4,
            MetricName::ResponseTime => 5,
            MetricName::Network => 6,
            MetricName::Uptime => 7,
            MetricName::Processes => 8,
            MetricName::Threads => 9,
        }
    }

    /// Wire name (matches the serde representation)
    pub fn as_str(self) -> &'static str {
        match self {
            MetricName::Cpu => "cpu",
            MetricName::Memory => "memory",
            MetricName::Disk => "disk",
            MetricName::Temperature => "temperature",
            MetricName::Errors => "errors",
            MetricName::ResponseTime => "response_time",
            MetricName::Network => "network",
            MetricName::Uptime => "uptime",
            MetricName::Processes => "processes",
            MetricName::Threads => "threads",
        }
    }

    /// Human-readable label for display surfaces
    pub fn label(self) -> &'static str {
        match self {
            MetricName::Cpu => "CPU Load",
            MetricName::Memory => "Memory Usage",
            MetricName::Disk => "Disk Space",
            MetricName::Temperature => "Temperature",
            MetricName::Errors => "Error Rate",
            MetricName::ResponseTime => "Response Time",
            MetricName::Network => "Network Usage",
            MetricName::Uptime => "Uptime",
            MetricName::Processes => "Processes",
            MetricName::Threads => "Active Threads",
        }
    }

    /// Display unit for the raw value
    pub fn unit(self) -> &'static str {
        match self {
            MetricName::Cpu | MetricName::Memory | MetricName::Disk => "%",
            MetricName::Temperature => "°C",
            MetricName::ResponseTime => "ms",
            MetricName::Network => "GB",
            MetricName::Uptime => "days",
            MetricName::Errors | MetricName::Processes | MetricName::Threads => "",
        }
    }
}

impl std::fmt::Display for MetricName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One accepted metric snapshot: a fixed-order tuple of readings
///
/// Serializes as a plain JSON array so the rolling history can be posted
/// to the prediction endpoint unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricSample([f64; METRIC_COUNT]);

impl MetricSample {
    pub fn new(values: [f64; METRIC_COUNT]) -> Self {
        Self(values)
    }

    /// Reading for a single metric
    pub fn get(&self, metric: MetricName) -> f64 {
        self.0[metric.index()]
    }

    /// All readings in wire order
    pub fn values(&self) -> &[f64; METRIC_COUNT] {
        &self.0
    }
}

impl From<[f64; METRIC_COUNT]> for MetricSample {
    fn from(values: [f64; METRIC_COUNT]) -> Self {
        Self(values)
    }
}
