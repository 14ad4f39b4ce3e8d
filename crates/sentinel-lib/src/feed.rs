//! Live feed client
//!
//! Polls the backend's append-only metrics feed. The feed returns its
//! own trailing sequence, but only the newest row is consumed; the
//! service maintains its own bounded history.

use crate::models::RawSample;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;
use url::Url;

/// Source of raw metric rows
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch the newest row, if the feed produced one
    ///
    /// `Ok(None)` means "no update this tick" (absent, empty, or
    /// malformed sequence); `Err` means the fetch itself failed.
    async fn fetch_latest(&self) -> Result<Option<RawSample>>;
}

/// Wire shape of the live feed response
#[derive(Debug, Default, Deserialize)]
struct LiveSequenceResponse {
    #[serde(default)]
    sequence: Vec<RawSample>,
}

/// HTTP client for the live feed endpoint
pub struct HttpFeedClient {
    client: Client,
    endpoint: Url,
}

impl HttpFeedClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        let endpoint = Url::parse(endpoint).context("Invalid live feed URL")?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl FeedSource for HttpFeedClient {
    async fn fetch_latest(&self) -> Result<Option<RawSample>> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .context("Failed to reach live feed")?;

        if !response.status().is_success() {
            anyhow::bail!("Live feed returned status {}", response.status());
        }

        let body = response
            .bytes()
            .await
            .context("Failed to read live feed body")?;

        // A body the feed cannot parse is "no update", not a failure
        let parsed: LiveSequenceResponse = match serde_json::from_slice(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Malformed live feed payload, skipping tick");
                return Ok(None);
            }
        };

        Ok(parsed.sequence.into_iter().next_back())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(server: &mockito::ServerGuard) -> HttpFeedClient {
        HttpFeedClient::new(&format!("{}/live-sequence", server.url()), Duration::from_secs(2))
            .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_latest_returns_last_row() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/live-sequence")
            .with_status(200)
            .with_body(
                r#"{"sequence": [[1,1,1,1,1,1,1,1,1,1], [60,65,70,48,2,150,40,5,120,300]]}"#,
            )
            .create_async()
            .await;

        let row = client_for(&server).fetch_latest().await.unwrap().unwrap();
        assert_eq!(row[0], Some(60.0));
        assert_eq!(row[9], Some(300.0));
    }

    #[tokio::test]
    async fn test_null_fields_survive_parsing() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/live-sequence")
            .with_status(200)
            .with_body(r#"{"sequence": [[60,null,70,48,2,150,40,5,120,300]]}"#)
            .create_async()
            .await;

        let row = client_for(&server).fetch_latest().await.unwrap().unwrap();
        assert_eq!(row[1], None);
    }

    #[tokio::test]
    async fn test_empty_sequence_is_no_update() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/live-sequence")
            .with_status(200)
            .with_body(r#"{"sequence": []}"#)
            .create_async()
            .await;

        assert!(client_for(&server).fetch_latest().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_sequence_is_no_update() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/live-sequence")
            .with_status(200)
            .with_body(r#"{}"#)
            .create_async()
            .await;

        assert!(client_for(&server).fetch_latest().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_body_is_no_update() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/live-sequence")
            .with_status(200)
            .with_body("not json at all")
            .create_async()
            .await;

        assert!(client_for(&server).fetch_latest().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_server_error_is_a_failed_tick() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/live-sequence")
            .with_status(500)
            .create_async()
            .await;

        assert!(client_for(&server).fetch_latest().await.is_err());
    }
}
