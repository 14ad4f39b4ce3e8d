//! Reconciliation of external predictions with local classification
//!
//! One canonical probability-to-status mapping is used by every
//! consumer, and the recommendation list is assembled in a fixed
//! priority order and capped.

use super::client::{LastSpike, PredictionResponse};
use crate::engine::{MetricStatusRecord, Tier};
use crate::models::MetricName;
use serde::{Deserialize, Serialize};

/// Upper bound on the displayed recommendation list
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Display status of the whole system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallStatus {
    Online,
    Warning,
    Critical,
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverallStatus::Online => write!(f, "Online"),
            OverallStatus::Warning => write!(f, "Warning"),
            OverallStatus::Critical => write!(f, "Critical"),
        }
    }
}

/// Canonical probability banding
pub fn status_for(probability: f64) -> OverallStatus {
    if probability > 0.7 {
        OverallStatus::Critical
    } else if probability > 0.3 {
        OverallStatus::Warning
    } else {
        OverallStatus::Online
    }
}

/// Canonical probability-to-time-frame banding
pub fn time_frame_for(probability: f64) -> &'static str {
    if probability > 0.7 {
        "1 hour"
    } else if probability > 0.5 {
        "6 hours"
    } else if probability > 0.3 {
        "12 hours"
    } else {
        "24 hours"
    }
}

/// Display-ready merge of the external prediction and the local tiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledStatus {
    pub overall: OverallStatus,
    pub probability: f64,
    pub probability_percent: u8,
    pub time_frame: String,
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_spike: Option<LastSpike>,
}

impl ReconciledStatus {
    /// Safe default used whenever no usable prediction exists
    ///
    /// Displays 1% rather than 0% so the banner signals "pipeline
    /// alive, no verdict yet" instead of certainty.
    pub fn waiting_for_data() -> Self {
        Self {
            overall: OverallStatus::Online,
            probability: 0.0,
            probability_percent: 1,
            time_frame: "N/A".to_string(),
            recommendations: vec!["Waiting for data...".to_string()],
            last_spike: None,
        }
    }
}

fn tier_of(records: &[MetricStatusRecord], metric: MetricName) -> Tier {
    records
        .iter()
        .find(|r| r.metric == metric)
        .map(|r| r.status)
        .unwrap_or(Tier::Normal)
}

/// Merge a prediction response with the current metric tiers
///
/// A response without a probability is treated as malformed and maps to
/// the safe default. Pure: identical inputs yield identical output.
pub fn reconcile(response: &PredictionResponse, records: &[MetricStatusRecord]) -> ReconciledStatus {
    let probability = match response.probability {
        Some(p) => p,
        None => return ReconciledStatus::waiting_for_data(),
    };

    let mut recommendations = Vec::new();
    if let Some(reason) = response.reason.as_deref() {
        if !reason.is_empty() {
            recommendations.push(reason.to_string());
        }
    }

    match tier_of(records, MetricName::Cpu) {
        Tier::Critical => recommendations.push("Reduce CPU-intensive tasks immediately".into()),
        Tier::Warning => recommendations.push("Monitor CPU usage and prepare to scale".into()),
        Tier::Normal => {}
    }
    if tier_of(records, MetricName::Memory) == Tier::Critical {
        recommendations.push("Increase memory allocation or check for memory leaks".into());
    }
    if tier_of(records, MetricName::Disk) >= Tier::Warning {
        recommendations.push("Free up disk space or add storage".into());
    }
    if tier_of(records, MetricName::Errors) == Tier::Critical {
        recommendations.push("Critical: Investigate increasing error rate".into());
    }
    if tier_of(records, MetricName::ResponseTime) == Tier::Critical {
        recommendations.push("Optimize response time - service degradation detected".into());
    }
    if tier_of(records, MetricName::Temperature) == Tier::Critical {
        recommendations.push("Check cooling systems immediately".into());
    }

    recommendations.truncate(MAX_RECOMMENDATIONS);
    if recommendations.is_empty() {
        recommendations.push("System operating within normal parameters".into());
    }

    let last_spike = response
        .last_spike
        .clone()
        .filter(|spike| spike.metric.is_some());

    ReconciledStatus {
        overall: status_for(probability),
        probability,
        probability_percent: (probability * 100.0).round().clamp(0.0, 100.0) as u8,
        time_frame: time_frame_for(probability).to_string(),
        recommendations,
        last_spike,
    }
}
