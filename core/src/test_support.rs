//! Scripted in-memory transport for unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::cache::ResponseCache;
use crate::client::ResourceClient;
use crate::config::CacheConfig;
use crate::error::ApiError;
use crate::fetcher::HttpFetcher;
use crate::http::{HttpRequest, HttpResponse, Transport};

pub const BASE_URL: &str = "http://catalog.test/api/v2";

#[derive(Debug, Clone)]
enum Reply {
    Status(u16, String),
    Fail(String),
}

/// Answers from a fixed url → reply table and records every call. Unknown
/// urls answer 404. With a latency set, every call sleeps that long first.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<String>>,
    latency: Mutex<Option<Duration>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer `path` (relative to `BASE_URL`) with 200 and `body`.
    pub fn json(&self, path: &str, body: Value) -> &Self {
        self.status(path, 200, body.to_string())
    }

    pub fn status(&self, path: &str, status: u16, body: String) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .insert(format!("{BASE_URL}{path}"), Reply::Status(status, body));
        self
    }

    /// Fail `path` without any HTTP status.
    pub fn fail(&self, path: &str, message: &str) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .insert(format!("{BASE_URL}{path}"), Reply::Fail(message.to_string()));
        self
    }

    pub fn latency(&self, per_call: Duration) -> &Self {
        *self.latency.lock().unwrap() = Some(per_call);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        let url = format!("{BASE_URL}{path}");
        self.calls.lock().unwrap().iter().filter(|c| **c == url).count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.calls.lock().unwrap().push(request.url.clone());
        let reply = self.replies.lock().unwrap().get(&request.url).cloned();
        let latency = *self.latency.lock().unwrap();
        if let Some(per_call) = latency {
            tokio::time::sleep(per_call).await;
        }
        match reply {
            Some(Reply::Status(status, body)) => Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body,
            }),
            Some(Reply::Fail(message)) => Err(ApiError::Transport {
                url: request.url,
                message,
            }),
            None => Ok(HttpResponse {
                status: 404,
                headers: Vec::new(),
                body: "Not Found".to_string(),
            }),
        }
    }
}

pub fn client(transport: Arc<ScriptedTransport>) -> ResourceClient {
    client_with_cache(transport, true)
}

pub fn client_with_cache(transport: Arc<ScriptedTransport>, enabled: bool) -> ResourceClient {
    let cache = Arc::new(ResponseCache::new(&CacheConfig {
        enabled,
        ..CacheConfig::default()
    }));
    ResourceClient::new(BASE_URL, HttpFetcher::new(transport, cache))
}

/// A minimal `/pokemon/{id}` payload.
pub fn pokemon_json(
    id: u32,
    name: &str,
    types: &[&str],
    stats: &[(&str, u32)],
    base_experience: u32,
) -> Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "base_experience": base_experience,
        "height": 4,
        "weight": 60,
        "sprites": {
            "front_default": format!("https://img.test/{id}.png"),
            "other": {"official-artwork": {"front_default": format!("https://art.test/{id}.png")}}
        },
        "types": types.iter().enumerate().map(|(i, t)| serde_json::json!({
            "slot": i + 1,
            "type": {"name": t, "url": format!("https://pokeapi.co/api/v2/type/{t}/")}
        })).collect::<Vec<_>>(),
        "stats": stats.iter().map(|(stat, value)| serde_json::json!({
            "base_stat": value,
            "effort": 0,
            "stat": {"name": stat, "url": ""}
        })).collect::<Vec<_>>(),
        "abilities": [],
        "moves": []
    })
}
