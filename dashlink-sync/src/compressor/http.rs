//! HTTP compressor client.
//!
//! Talks to the dashboard's REST compressor resource:
//! - `POST {base}/compressor` with `{"content": .., "dependencies": [..]}`
//!   answers `{"data": "<token>"}`
//! - `GET {base}/compressor/{token}?dependencies=a,b` answers
//!   `{"data": <content>}`

use super::service::{CompressorConfig, StateCompressor};
use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use dashlink_types::LocatorToken;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct StoreRequest<'a> {
    content: &'a Value,
    dependencies: &'a [String],
}

#[derive(Debug, Deserialize)]
struct StoreResponse {
    data: String,
}

#[derive(Debug, Deserialize)]
struct FetchResponse {
    #[serde(default)]
    data: Value,
}

/// Compressor backed by the REST service.
pub struct HttpCompressor {
    config: CompressorConfig,
    client: Client,
}

impl HttpCompressor {
    /// Creates a new client.
    pub fn new(config: CompressorConfig) -> SyncResult<Self> {
        if config.base_url.is_empty() {
            return Err(SyncError::Config("compressor base_url is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SyncError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &CompressorConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/compressor", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl StateCompressor for HttpCompressor {
    fn backend_name(&self) -> &'static str {
        "HTTP"
    }

    async fn store(&self, content: &Value, dependencies: &[String]) -> SyncResult<LocatorToken> {
        let response = self
            .client
            .post(self.endpoint())
            .json(&StoreRequest {
                content,
                dependencies,
            })
            .send()
            .await
            .map_err(|e| SyncError::Network(format!("compress request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SyncError::Compressor {
                status: status.as_u16(),
                message,
            });
        }

        let body: StoreResponse = response
            .json()
            .await
            .map_err(|e| SyncError::Network(format!("failed to parse compress response: {e}")))?;

        debug!("Compressed payload into token {}", body.data);
        Ok(LocatorToken::new(body.data))
    }

    async fn fetch(&self, token: &LocatorToken, dependencies: &[String]) -> SyncResult<Value> {
        let url = format!("{}/{}", self.endpoint(), urlencoding::encode(token.as_str()));
        let mut request = self.client.get(url);
        if !dependencies.is_empty() {
            request = request.query(&[("dependencies", dependencies.join(","))]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SyncError::Network(format!("decompress request failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SyncError::TokenNotFound(token.to_string()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SyncError::Compressor {
                status: status.as_u16(),
                message,
            });
        }

        let body: FetchResponse = response
            .json()
            .await
            .map_err(|e| SyncError::Network(format!("failed to parse decompress response: {e}")))?;

        debug!("Resolved token {}", token);
        Ok(body.data)
    }
}
