//! In-memory compressor.
//!
//! Issues sequential tokens (`T1`, `T2`, ...) and hands out the same token
//! again for identical content and dependencies. Useful for offline hosts and
//! for tests that need predictable locators.

use super::service::StateCompressor;
use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use dashlink_types::LocatorToken;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    by_content: HashMap<String, LocatorToken>,
    by_token: HashMap<LocatorToken, Value>,
    next_token: u64,
    store_calls: usize,
    fetch_calls: usize,
    failing: bool,
}

/// Compressor that keeps every payload in process memory.
#[derive(Debug, Default)]
pub struct MemoryCompressor {
    inner: Mutex<Inner>,
}

impl MemoryCompressor {
    /// Creates an empty compressor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with a network error (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    /// Number of `store` calls seen so far, including failed ones.
    pub fn store_calls(&self) -> usize {
        self.lock().store_calls
    }

    /// Number of `fetch` calls seen so far, including failed ones.
    pub fn fetch_calls(&self) -> usize {
        self.lock().fetch_calls
    }

    /// Returns the stored content for a token without counting a fetch.
    pub fn peek(&self, token: &LocatorToken) -> Option<Value> {
        self.lock().by_token.get(token).cloned()
    }

    /// Stores a payload under a caller-chosen token.
    ///
    /// `store` skips tokens taken this way.
    pub fn insert(&self, token: LocatorToken, content: Value) {
        self.lock().by_token.insert(token, content);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl StateCompressor for MemoryCompressor {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn store(&self, content: &Value, dependencies: &[String]) -> SyncResult<LocatorToken> {
        let mut inner = self.lock();
        inner.store_calls += 1;
        if inner.failing {
            return Err(SyncError::Network("memory compressor is failing".to_string()));
        }

        let key = format!("{}|{}", dependencies.join(","), serde_json::to_string(content)?);
        if let Some(token) = inner.by_content.get(&key) {
            return Ok(token.clone());
        }

        // Tokens registered through `insert` are never reissued.
        let token = loop {
            inner.next_token += 1;
            let candidate = LocatorToken::new(format!("T{}", inner.next_token));
            if !inner.by_token.contains_key(&candidate) {
                break candidate;
            }
        };
        inner.by_content.insert(key, token.clone());
        inner.by_token.insert(token.clone(), content.clone());
        Ok(token)
    }

    async fn fetch(&self, token: &LocatorToken, _dependencies: &[String]) -> SyncResult<Value> {
        let mut inner = self.lock();
        inner.fetch_calls += 1;
        if inner.failing {
            return Err(SyncError::Network("memory compressor is failing".to_string()));
        }

        inner
            .by_token
            .get(token)
            .cloned()
            .ok_or_else(|| SyncError::TokenNotFound(token.to_string()))
    }
}
