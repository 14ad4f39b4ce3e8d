//! API client for the Server Sentinel daemon

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use url::Url;

/// HTTP client for the daemon's read API
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        response.json().await.context("Failed to parse response")
    }
}

// API response types (mirrors of the daemon's read API)

#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub overall: String,
    pub probability: f64,
    pub probability_percent: u8,
    pub time_frame: String,
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub last_spike: Option<LastSpike>,
    pub stale: bool,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LastSpike {
    pub metric: Option<String>,
    pub change: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParametersResponse {
    pub parameters: Vec<ParameterRecord>,
    pub alerts: Vec<Alert>,
    pub performance_score: u8,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParameterRecord {
    pub metric: String,
    pub value: f64,
    pub trend: String,
    pub status: String,
    pub sparkline: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Alert {
    pub metric: String,
    pub severity: String,
    pub value: f64,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StressResponse {
    pub stress: Vec<StressPoint>,
    pub danger: bool,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StressPoint {
    pub index: usize,
    pub stress: f64,
    pub smoothed: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub components: std::collections::HashMap<String, ComponentHealth>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComponentHealth {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    pub last_check_timestamp: i64,
}
