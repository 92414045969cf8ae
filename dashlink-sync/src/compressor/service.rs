//! Compressor service abstraction.
//!
//! The compressor turns an arbitrary JSON payload into a short opaque token
//! and back. It is the only place layouts are encoded for locators; the engine
//! never compresses anything itself.

use crate::error::SyncResult;
use async_trait::async_trait;
use dashlink_types::LocatorToken;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Configuration for the HTTP compressor client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressorConfig {
    /// Base URL of the REST API the compressor endpoint lives under.
    pub base_url: String,
    /// Request timeout (in seconds).
    pub timeout_secs: u64,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/jax".to_string(),
            timeout_secs: 30,
        }
    }
}

/// A remote service that stores payloads behind short tokens.
///
/// `dependencies` names sub-parts of the payload that the service keeps
/// separately resolvable. It must be passed identically to `store` and
/// `fetch` for the same payload.
#[async_trait]
pub trait StateCompressor: Send + Sync {
    /// Returns the name of the compressor backend.
    fn backend_name(&self) -> &'static str;

    /// Stores `content` and returns its token.
    async fn store(&self, content: &Value, dependencies: &[String]) -> SyncResult<LocatorToken>;

    /// Resolves a token back into its content.
    async fn fetch(&self, token: &LocatorToken, dependencies: &[String]) -> SyncResult<Value>;
}
