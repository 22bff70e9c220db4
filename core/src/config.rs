//! Runtime configuration.
//!
//! Defaults mirror the public catalog service. `Config::from_env` overlays
//! `DEX_*` environment variables on top of the defaults.

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub api: ApiConfig,
    pub pagination: PaginationConfig,
    pub cache: CacheConfig,
    pub moves: MovesConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    /// Per-request timeout applied by the reqwest transport.
    pub timeout: Duration,
    /// Carried for callers; the fetch path performs no retries.
    pub retry_attempts: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaginationConfig {
    pub default_page_size: usize,
    pub page_size_options: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovesConfig {
    /// Upper bound on move lookups per detail record.
    pub max_fetch_count: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            retry_attempts: 3,
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            page_size_options: vec![10, 20, 50],
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_secs(5 * 60), // 5 minutes
        }
    }
}

impl Default for MovesConfig {
    fn default() -> Self {
        Self {
            max_fetch_count: 20,
        }
    }
}

impl Config {
    /// Defaults overlaid with `DEX_*` environment variables. Values that fail
    /// to parse are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("DEX_API_URL").filter(|v| !v.trim().is_empty()) {
            config.api.base_url = url;
        }
        if let Some(ms) = lookup("DEX_API_TIMEOUT_MS").and_then(|v| v.parse::<u64>().ok()) {
            config.api.timeout = Duration::from_millis(ms);
        }
        if let Some(enabled) = lookup("DEX_CACHE_ENABLED").and_then(|v| v.parse::<bool>().ok()) {
            config.cache.enabled = enabled;
        }
        if let Some(ms) = lookup("DEX_CACHE_TTL_MS").and_then(|v| v.parse::<u64>().ok()) {
            config.cache.ttl = Duration::from_millis(ms);
        }
        if let Some(size) = lookup("DEX_PAGE_SIZE")
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|size| *size > 0)
        {
            config.pagination.default_page_size = size;
        }
        if let Some(max) = lookup("DEX_MAX_MOVES").and_then(|v| v.parse::<usize>().ok()) {
            config.moves.max_fetch_count = max;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_match_public_service() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://pokeapi.co/api/v2");
        assert_eq!(config.api.timeout, Duration::from_secs(10));
        assert_eq!(config.api.retry_attempts, 3);
        assert_eq!(config.pagination.default_page_size, 10);
        assert_eq!(config.pagination.page_size_options, vec![10, 20, 50]);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl, Duration::from_millis(300_000));
        assert_eq!(config.moves.max_fetch_count, 20);
    }

    #[test]
    fn env_overrides_apply() {
        let config = Config::from_lookup(lookup(&[
            ("DEX_API_URL", "http://localhost:9000/api/v2"),
            ("DEX_API_TIMEOUT_MS", "2500"),
            ("DEX_CACHE_ENABLED", "false"),
            ("DEX_CACHE_TTL_MS", "1000"),
            ("DEX_PAGE_SIZE", "20"),
            ("DEX_MAX_MOVES", "5"),
        ]));
        assert_eq!(config.api.base_url, "http://localhost:9000/api/v2");
        assert_eq!(config.api.timeout, Duration::from_millis(2500));
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.ttl, Duration::from_secs(1));
        assert_eq!(config.pagination.default_page_size, 20);
        assert_eq!(config.moves.max_fetch_count, 5);
    }

    #[test]
    fn unparsable_values_are_ignored() {
        let config = Config::from_lookup(lookup(&[
            ("DEX_API_URL", "  "),
            ("DEX_CACHE_ENABLED", "yes"),
            ("DEX_PAGE_SIZE", "0"),
            ("DEX_MAX_MOVES", "lots"),
        ]));
        assert_eq!(config, Config::default());
    }
}
