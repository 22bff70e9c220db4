//! Cache-aware fetch.
//!
//! # Design
//! `HttpFetcher` is the only component that writes to the `ResponseCache`.
//! A hit returns without touching the transport. A miss performs exactly one
//! transport call and, on a 2xx JSON body, exactly one cache write. Non-2xx
//! responses are never cached.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::cache::ResponseCache;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};

#[derive(Clone)]
pub struct HttpFetcher {
    transport: Arc<dyn Transport>,
    cache: Arc<ResponseCache>,
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl HttpFetcher {
    pub fn new(transport: Arc<dyn Transport>, cache: Arc<ResponseCache>) -> Self {
        Self { transport, cache }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Fetch `url` and decode it as `T`, serving from the cache when fresh.
    pub async fn fetch_cached<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        if let Some(payload) = self.cache.get(url) {
            return decode(url, payload);
        }

        debug!(url, "cache miss, fetching");
        let response = self.transport.execute(HttpRequest::get(url)).await?;
        check_status(&response, url)?;

        let payload: Value =
            serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        self.cache.put(url, payload.clone());
        decode(url, payload)
    }
}

fn check_status(response: &HttpResponse, url: &str) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::upstream(response.status, url))
}

fn decode<T: DeserializeOwned>(url: &str, payload: Value) -> Result<T, ApiError> {
    serde_json::from_value(payload).map_err(|e| ApiError::Deserialization {
        url: url.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use crate::test_support::{ScriptedTransport, BASE_URL};
    use serde_json::json;
    use std::time::Duration;

    fn fetcher(transport: Arc<ScriptedTransport>, enabled: bool) -> HttpFetcher {
        let cache = ResponseCache::new(&CacheConfig {
            enabled,
            ttl: Duration::from_secs(60),
        });
        HttpFetcher::new(transport, Arc::new(cache))
    }

    fn url(path: &str) -> String {
        format!("{BASE_URL}{path}")
    }

    #[tokio::test]
    async fn miss_then_hit_makes_one_network_call() {
        let transport = ScriptedTransport::new();
        transport.json("/move/tackle", json!({"name": "tackle"}));
        let fetcher = fetcher(transport.clone(), true);

        let first: Value = fetcher.fetch_cached(&url("/move/tackle")).await.unwrap();
        let second: Value = fetcher.fetch_cached(&url("/move/tackle")).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(transport.calls_to("/move/tackle"), 1);
        assert_eq!(fetcher.cache().stats().keys, vec![url("/move/tackle")]);
    }

    #[tokio::test]
    async fn disabled_cache_calls_network_every_time() {
        let transport = ScriptedTransport::new();
        transport.json("/move/tackle", json!({"name": "tackle"}));
        let fetcher = fetcher(transport.clone(), false);

        let _: Value = fetcher.fetch_cached(&url("/move/tackle")).await.unwrap();
        let _: Value = fetcher.fetch_cached(&url("/move/tackle")).await.unwrap();

        assert_eq!(transport.calls_to("/move/tackle"), 2);
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_error_and_not_cached() {
        let transport = ScriptedTransport::new();
        transport.status("/pokemon/nope", 404, "Not Found".to_string());
        let fetcher = fetcher(transport.clone(), true);

        let err = fetcher
            .fetch_cached::<Value>(&url("/pokemon/nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Upstream { status: 404, .. }));
        assert_eq!(err.url(), url("/pokemon/nope"));
        assert_eq!(err.to_string(), "API Error: 404 Not Found");
        assert_eq!(fetcher.cache().stats().count, 0);

        let _ = fetcher.fetch_cached::<Value>(&url("/pokemon/nope")).await;
        assert_eq!(transport.calls_to("/pokemon/nope"), 2);
    }

    #[tokio::test]
    async fn bad_json_is_deserialization_error() {
        let transport = ScriptedTransport::new();
        transport.status("/move/x", 200, "not json".to_string());
        let fetcher = fetcher(transport, true);

        let err = fetcher.fetch_cached::<Value>(&url("/move/x")).await.unwrap_err();
        assert!(matches!(err, ApiError::Deserialization { .. }));
        assert_eq!(fetcher.cache().stats().count, 0);
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        let transport = ScriptedTransport::new();
        transport.fail("/move/x", "connection reset");
        let fetcher = fetcher(transport, true);

        let err = fetcher.fetch_cached::<Value>(&url("/move/x")).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport { .. }));
        assert_eq!(err.to_string(), "connection reset");
    }
}
