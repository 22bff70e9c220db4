//! In-memory response cache keyed by request identity.
//!
//! # Design
//! Entries are evicted lazily: a lookup that finds an expired entry removes
//! it and reports a miss. There is no background sweep. The stale check and
//! the removal happen in one `remove_if` call with no suspension point in
//! between, so a fresh `put` racing the eviction is never lost.
//!
//! The clock is `tokio::time::Instant`, which lets tests drive expiry with a
//! paused runtime.

use std::time::Duration;

use dashmap::DashMap;
use serde_json::Value;
use tokio::time::Instant;
use tracing::debug;

use crate::config::CacheConfig;

/// A stored payload plus the moment it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub payload: Value,
    pub stored_at: Instant,
}

impl CacheEntry {
    /// Valid iff `now - stored_at < ttl`.
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.stored_at) < ttl
    }
}

/// Snapshot of cache contents for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub count: usize,
    /// Sorted ascending.
    pub keys: Vec<String>,
}

#[derive(Debug)]
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    enabled: bool,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            enabled: config.enabled,
            ttl: config.ttl,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the payload stored under `key` if it is still fresh. An
    /// expired entry is removed as a side effect.
    pub fn get(&self, key: &str) -> Option<Value> {
        if !self.enabled {
            return None;
        }

        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if entry.is_fresh(now, self.ttl) {
                debug!(key, "cache hit");
                return Some(entry.payload.clone());
            }
        }

        if self
            .entries
            .remove_if(key, |_, entry| !entry.is_fresh(now, self.ttl))
            .is_some()
        {
            debug!(key, "cache entry expired");
        }
        None
    }

    /// Stores `payload` under `key`, overwriting any previous entry.
    pub fn put(&self, key: &str, payload: Value) {
        if !self.enabled {
            return;
        }
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                payload,
                stored_at: Instant::now(),
            },
        );
    }

    /// Removes one entry, or every entry when `key` is `None`.
    pub fn invalidate(&self, key: Option<&str>) {
        match key {
            Some(key) => {
                self.entries.remove(key);
            }
            None => self.entries.clear(),
        }
    }

    pub fn stats(&self) -> CacheStats {
        let mut keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        CacheStats {
            count: keys.len(),
            keys,
        }
    }
}
