//! Fetch abstraction for the external JSON boundary.
//!
//! This module defines the `Fetch` trait to abstract retrieval of a
//! JSON-like value for a url, enabling testability with mock
//! implementations instead of runtime patching. The concurrency core
//! never calls it; consumers treat it as an opaque lookup.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Result, VolleyError};

/// Trait for fetching a JSON-like value for a url.
///
/// This abstraction allows for different implementations (production vs.
/// testing); consumers hold a `Fetch` capability rather than a concrete
/// client.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetch the JSON value at `url`.
    ///
    /// # Errors
    /// Returns `UpstreamNotFound` if the endpoint has no resource for
    /// the url; transport-level failures surface as `HttpClient` errors.
    async fn fetch(&self, url: &str) -> Result<serde_json::Value>;
}

// ============================================================================
// Production Implementation using reqwest
// ============================================================================

/// Production fetch client using reqwest.
#[derive(Clone)]
pub struct ReqwestFetchClient {
    client: reqwest::Client,
}

impl ReqwestFetchClient {
    /// Create a new reqwest-based fetch client.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for ReqwestFetchClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetch for ReqwestFetchClient {
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<serde_json::Value> {
        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::error!(url, error = %e, "Fetch request failed");
            e
        })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!(url, "Upstream returned not found");
            return Err(VolleyError::UpstreamNotFound {
                url: url.to_string(),
            });
        }

        let value = response.error_for_status()?.json::<serde_json::Value>().await?;
        tracing::debug!(url, "Fetched upstream value");
        Ok(value)
    }
}

// ============================================================================
// Test/Mock Implementation
// ============================================================================

/// Mock fetch client for testing.
///
/// Allows configuring predetermined payloads for specific urls without
/// making actual HTTP calls. Multiple responses for the same url are
/// returned in FIFO order; every call is recorded.
///
/// # Example
/// ```ignore
/// let mock = MockFetchClient::new();
/// mock.add_response("http://example.com", Ok(serde_json::json!({"payload": true})));
/// ```
#[derive(Clone, Default)]
pub struct MockFetchClient {
    responses: Arc<Mutex<HashMap<String, Vec<Result<serde_json::Value>>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockFetchClient {
    /// Create a new mock fetch client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predetermined response for a url.
    pub fn add_response(&self, url: &str, response: Result<serde_json::Value>) {
        self.responses
            .lock()
            .entry(url.to_string())
            .or_default()
            .push(response);
    }

    /// Get all urls that have been fetched from this mock client.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Get the number of fetches made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl Fetch for MockFetchClient {
    async fn fetch(&self, url: &str) -> Result<serde_json::Value> {
        self.calls.lock().push(url.to_string());

        let response = {
            let mut responses = self.responses.lock();
            match responses.get_mut(url) {
                Some(queue) if !queue.is_empty() => Some(queue.remove(0)),
                _ => None,
            }
        };

        match response {
            Some(response) => response,
            // No payload configured: behave like an unknown url upstream.
            None => Err(VolleyError::UpstreamNotFound {
                url: url.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_client_returns_canned_payload() {
        let mock = MockFetchClient::new();
        mock.add_response("http://example.com", Ok(json!({"payload": true})));

        let value = mock.fetch("http://example.com").await.unwrap();
        assert_eq!(value, json!({"payload": true}));

        let calls = mock.calls();
        assert_eq!(calls, vec!["http://example.com".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_client_multiple_responses_fifo() {
        let mock = MockFetchClient::new();
        mock.add_response("http://example.com/a", Ok(json!({"n": 1})));
        mock.add_response("http://example.com/a", Ok(json!({"n": 2})));

        assert_eq!(mock.fetch("http://example.com/a").await.unwrap(), json!({"n": 1}));
        assert_eq!(mock.fetch("http://example.com/a").await.unwrap(), json!({"n": 2}));
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_client_unknown_url_is_not_found() {
        let mock = MockFetchClient::new();
        let err = mock.fetch("http://example.com/missing").await.unwrap_err();
        assert!(matches!(err, VolleyError::UpstreamNotFound { .. }));
    }

    #[tokio::test]
    async fn test_mock_client_injected_through_trait_object() {
        let mock = MockFetchClient::new();
        mock.add_response("http://holberton.io", Ok(json!({"payload": false})));

        // Consumers hold the capability, not the concrete client.
        let client: Arc<dyn Fetch> = Arc::new(mock.clone());
        let value = client.fetch("http://holberton.io").await.unwrap();
        assert_eq!(value, json!({"payload": false}));
        assert_eq!(mock.call_count(), 1);
    }
}
