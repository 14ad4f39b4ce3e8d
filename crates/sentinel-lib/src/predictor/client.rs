//! HTTP client for the prediction endpoint

use crate::models::MetricSample;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Failure taxonomy for prediction calls
///
/// Every variant reconciles to the same safe default; the split exists
/// for logging and the error counters.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("prediction request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("prediction endpoint returned status {0}")]
    Status(StatusCode),
    #[error("prediction response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Interface to the prediction service
#[async_trait]
pub trait PredictionApi: Send + Sync {
    /// Submit the rolling history and return the raw prediction
    async fn predict(&self, sequence: &[MetricSample])
        -> Result<PredictionResponse, PredictionError>;
}

/// Request body: the client's current rolling buffer
#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    sequence: &'a [MetricSample],
}

/// The metric the model blames for the most recent jump
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastSpike {
    #[serde(default)]
    pub metric: Option<String>,
    #[serde(default)]
    pub change: Option<String>,
}

/// Wire shape of the prediction response
///
/// Canonical field names are snake_case; `timeFrame` is accepted as a
/// compatibility alias and never emitted. Every field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionResponse {
    #[serde(default)]
    pub probability: Option<f64>,
    #[serde(default, alias = "timeFrame")]
    pub time_frame: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub will_fail: Option<bool>,
    #[serde(default)]
    pub last_spike: Option<LastSpike>,
}

/// HTTP client for the prediction endpoint
pub struct HttpPredictionClient {
    client: Client,
    endpoint: Url,
}

impl HttpPredictionClient {
    pub fn new(endpoint: &str, timeout: Duration) -> anyhow::Result<Self> {
        use anyhow::Context;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        let endpoint = Url::parse(endpoint).context("Invalid prediction URL")?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl PredictionApi for HttpPredictionClient {
    async fn predict(
        &self,
        sequence: &[MetricSample],
    ) -> Result<PredictionResponse, PredictionError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&PredictRequest { sequence })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PredictionError::Status(response.status()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::METRIC_COUNT;

    fn history() -> Vec<MetricSample> {
        (0..5)
            .map(|i| MetricSample::new([i as f64 + 1.0; METRIC_COUNT]))
            .collect()
    }

    fn client_for(server: &mockito::ServerGuard) -> HttpPredictionClient {
        HttpPredictionClient::new(&format!("{}/predict", server.url()), Duration::from_secs(2))
            .unwrap()
    }

    #[tokio::test]
    async fn test_predict_posts_sequence_and_decodes() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/predict")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"sequence": [[1.0,1.0,1.0,1.0,1.0,1.0,1.0,1.0,1.0,1.0],[2.0,2.0,2.0,2.0,2.0,2.0,2.0,2.0,2.0,2.0],[3.0,3.0,3.0,3.0,3.0,3.0,3.0,3.0,3.0,3.0],[4.0,4.0,4.0,4.0,4.0,4.0,4.0,4.0,4.0,4.0],[5.0,5.0,5.0,5.0,5.0,5.0,5.0,5.0,5.0,5.0]]}"#.to_string(),
            ))
            .with_status(200)
            .with_body(
                r#"{"probability": 0.62, "reason": "cpu increased by +40.0%",
                    "will_fail": true, "last_spike": {"metric": "cpu", "change": "+40.0%"}}"#,
            )
            .create_async()
            .await;

        let response = client_for(&server).predict(&history()).await.unwrap();
        assert_eq!(response.probability, Some(0.62));
        assert_eq!(response.will_fail, Some(true));
        assert_eq!(
            response.last_spike.unwrap().metric.as_deref(),
            Some("cpu")
        );
    }

    #[tokio::test]
    async fn test_camel_case_time_frame_alias() {
        let response: PredictionResponse =
            serde_json::from_str(r#"{"probability": 0.2, "timeFrame": "24 hours"}"#).unwrap();
        assert_eq!(response.time_frame.as_deref(), Some("24 hours"));

        let canonical: PredictionResponse =
            serde_json::from_str(r#"{"probability": 0.2, "time_frame": "24 hours"}"#).unwrap();
        assert_eq!(canonical.time_frame.as_deref(), Some("24 hours"));
    }

    #[tokio::test]
    async fn test_all_fields_optional() {
        let response: PredictionResponse = serde_json::from_str("{}").unwrap();
        assert!(response.probability.is_none());
        assert!(response.reason.is_none());
        assert!(response.last_spike.is_none());
    }

    #[tokio::test]
    async fn test_non_2xx_is_a_status_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/predict")
            .with_status(503)
            .create_async()
            .await;

        let err = client_for(&server).predict(&history()).await.unwrap_err();
        assert!(matches!(err, PredictionError::Status(s) if s.as_u16() == 503));
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/predict")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = client_for(&server).predict(&history()).await.unwrap_err();
        assert!(matches!(err, PredictionError::Decode(_)));
    }
}
