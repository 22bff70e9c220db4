//! Typed access to the catalog's resource families.
//!
//! # Design
//! Each resource family has a pure `*_url` builder and an async fetcher that
//! delegates to `HttpFetcher`. Keeping the builders separate makes the
//! request identity (and therefore the cache key) testable without I/O.
//! `ResourceClient` is cheap to clone; clones share one cache.

use std::fmt::Display;
use std::sync::Arc;

use futures::future::try_join_all;

use crate::cache::{CacheStats, ResponseCache};
use crate::config::Config;
use crate::endpoint::{self, EndpointBuilder};
use crate::error::ApiError;
use crate::fetcher::HttpFetcher;
use crate::http::ReqwestTransport;
use crate::types::{EvolutionChainResponse, MoveDetail, Pokemon, PokemonListResponse, PokemonSpecies};

#[derive(Debug, Clone)]
pub struct ResourceClient {
    endpoints: EndpointBuilder,
    fetcher: HttpFetcher,
}

impl ResourceClient {
    pub fn new(base_url: &str, fetcher: HttpFetcher) -> Self {
        Self {
            endpoints: EndpointBuilder::new(base_url),
            fetcher,
        }
    }

    /// One cache and one reqwest transport, wired from `config`.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config.api.timeout)?;
        let cache = ResponseCache::new(&config.cache);
        let fetcher = HttpFetcher::new(Arc::new(transport), Arc::new(cache));
        Ok(Self::new(&config.api.base_url, fetcher))
    }

    pub fn base_url(&self) -> &str {
        self.endpoints.base_url()
    }

    pub fn list_url(&self, limit: usize, offset: usize) -> String {
        self.endpoints
            .build(endpoint::POKEMON, [("limit", limit), ("offset", offset)])
    }

    pub fn pokemon_url(&self, id_or_name: impl Display) -> String {
        self.endpoints
            .path(&format!("{}/{id_or_name}", endpoint::POKEMON))
    }

    pub fn species_url(&self, id_or_name: impl Display) -> String {
        self.endpoints
            .path(&format!("{}/{id_or_name}", endpoint::POKEMON_SPECIES))
    }

    pub fn evolution_chain_url(&self, id: u32) -> String {
        self.endpoints
            .path(&format!("{}/{id}", endpoint::EVOLUTION_CHAIN))
    }

    pub fn move_url(&self, name: &str) -> String {
        self.endpoints.path(&format!("{}/{name}", endpoint::MOVE))
    }

    pub async fn list(&self, limit: usize, offset: usize) -> Result<PokemonListResponse, ApiError> {
        self.fetcher.fetch_cached(&self.list_url(limit, offset)).await
    }

    pub async fn pokemon(&self, id_or_name: impl Display) -> Result<Pokemon, ApiError> {
        self.fetcher.fetch_cached(&self.pokemon_url(id_or_name)).await
    }

    pub async fn species(&self, id_or_name: impl Display) -> Result<PokemonSpecies, ApiError> {
        self.fetcher.fetch_cached(&self.species_url(id_or_name)).await
    }

    pub async fn evolution_chain(&self, id: u32) -> Result<EvolutionChainResponse, ApiError> {
        self.fetcher
            .fetch_cached(&self.evolution_chain_url(id))
            .await
    }

    pub async fn move_detail(&self, name: &str) -> Result<MoveDetail, ApiError> {
        self.fetcher.fetch_cached(&self.move_url(name)).await
    }

    /// Fetch every name concurrently. All-or-nothing: the first failure
    /// fails the whole batch.
    pub async fn batch(&self, names: &[String]) -> Result<Vec<Pokemon>, ApiError> {
        try_join_all(names.iter().map(|name| self.pokemon(name))).await
    }

    /// Drop one cached response, or all of them.
    pub fn clear_cache(&self, url: Option<&str>) {
        self.fetcher.cache().invalidate(url);
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.fetcher.cache().stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{self, pokemon_json, ScriptedTransport, BASE_URL};
    use serde_json::json;

    fn client() -> ResourceClient {
        test_support::client(ScriptedTransport::new())
    }

    #[test]
    fn builds_list_url() {
        assert_eq!(
            client().list_url(10, 20),
            format!("{BASE_URL}/pokemon?limit=10&offset=20")
        );
    }

    #[test]
    fn builds_entity_urls() {
        let c = client();
        assert_eq!(c.pokemon_url(25), format!("{BASE_URL}/pokemon/25"));
        assert_eq!(c.pokemon_url("pikachu"), format!("{BASE_URL}/pokemon/pikachu"));
        assert_eq!(c.species_url(25), format!("{BASE_URL}/pokemon-species/25"));
        assert_eq!(c.evolution_chain_url(10), format!("{BASE_URL}/evolution-chain/10"));
        assert_eq!(c.move_url("thunder-shock"), format!("{BASE_URL}/move/thunder-shock"));
    }

    #[tokio::test]
    async fn list_decodes_page() {
        let transport = ScriptedTransport::new();
        transport.json(
            "/pokemon?limit=2&offset=0",
            json!({
                "count": 1302,
                "next": "n",
                "previous": null,
                "results": [
                    {"name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/"},
                    {"name": "ivysaur", "url": "https://pokeapi.co/api/v2/pokemon/2/"}
                ]
            }),
        );
        let page = test_support::client(transport).list(2, 0).await.unwrap();
        assert_eq!(page.count, 1302);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[1].name, "ivysaur");
    }

    #[tokio::test]
    async fn batch_preserves_input_order() {
        let transport = ScriptedTransport::new();
        transport
            .json("/pokemon/a", pokemon_json(1, "a", &[], &[], 1))
            .json("/pokemon/b", pokemon_json(2, "b", &[], &[], 1));
        let c = test_support::client(transport);

        let names = vec!["b".to_string(), "a".to_string()];
        let batch = c.batch(&names).await.unwrap();
        let ids: Vec<u32> = batch.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn batch_fails_when_any_item_fails() {
        let transport = ScriptedTransport::new();
        transport.json("/pokemon/a", pokemon_json(1, "a", &[], &[], 1));
        let c = test_support::client(transport);

        let names = vec!["a".to_string(), "ghost".to_string()];
        let err = c.batch(&names).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test(start_paused = true)]
    async fn batch_fetches_concurrently() {
        let per_call = std::time::Duration::from_millis(50);
        let transport = ScriptedTransport::new();
        transport.latency(per_call);
        let names: Vec<String> = (1..=5).map(|i| format!("p{i}")).collect();
        for (id, name) in (1..).zip(&names) {
            transport.json(&format!("/pokemon/{name}"), pokemon_json(id, name, &[], &[], 1));
        }
        let c = test_support::client(transport.clone());

        let started = tokio::time::Instant::now();
        let batch = c.batch(&names).await.unwrap();
        let elapsed = started.elapsed();

        assert_eq!(batch.len(), 5);
        assert_eq!(transport.calls().len(), 5);
        assert!(elapsed < per_call * 2, "took {elapsed:?}");
    }

    #[tokio::test]
    async fn empty_batch_is_empty() {
        let batch = client().batch(&[]).await.unwrap();
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn clear_cache_forces_refetch() {
        let transport = ScriptedTransport::new();
        transport.json("/move/tackle", json!({"id": 33, "name": "tackle", "type": {"name": "normal"}}));
        let c = test_support::client(transport.clone());

        c.move_detail("tackle").await.unwrap();
        c.move_detail("tackle").await.unwrap();
        assert_eq!(c.cache_stats().count, 1);

        c.clear_cache(Some(&c.move_url("tackle")));
        c.move_detail("tackle").await.unwrap();
        assert_eq!(transport.calls_to("/move/tackle"), 2);

        c.clear_cache(None);
        assert_eq!(c.cache_stats().count, 0);
    }
}
