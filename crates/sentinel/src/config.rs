//! Daemon configuration

use anyhow::Result;
use serde::Deserialize;

/// Sentinel configuration, from `SENTINEL_*` environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct SentinelConfig {
    /// Instance name used in structured log events
    #[serde(default = "default_instance_name")]
    pub instance_name: String,

    /// API server port for the dashboard read API and health/metrics
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Live metrics feed endpoint
    #[serde(default = "default_feed_endpoint")]
    pub feed_endpoint: String,

    /// Crash-prediction endpoint
    #[serde(default = "default_predict_endpoint")]
    pub predict_endpoint: String,

    /// Live feed poll interval in seconds
    #[serde(default = "default_feed_interval")]
    pub feed_interval_secs: u64,

    /// Prediction poll interval in seconds
    #[serde(default = "default_predict_interval")]
    pub predict_interval_secs: u64,

    /// Outbound HTTP request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_instance_name() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string())
}

fn default_api_port() -> u16 {
    8080
}

fn default_feed_endpoint() -> String {
    "http://localhost:5000/live-sequence".to_string()
}

fn default_predict_endpoint() -> String {
    "http://localhost:5001/predict".to_string()
}

fn default_feed_interval() -> u64 {
    3
}

fn default_predict_interval() -> u64 {
    5
}

fn default_request_timeout() -> u64 {
    10
}

impl SentinelConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("SENTINEL"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|_| SentinelConfig {
            instance_name: default_instance_name(),
            api_port: default_api_port(),
            feed_endpoint: default_feed_endpoint(),
            predict_endpoint: default_predict_endpoint(),
            feed_interval_secs: default_feed_interval(),
            predict_interval_secs: default_predict_interval(),
            request_timeout_secs: default_request_timeout(),
        }))
    }
}
