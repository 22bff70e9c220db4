//! Catalog client core for the species browser.
//!
//! # Overview
//! Fetches pages and single entities from the upstream REST catalog, caches
//! responses in memory with a TTL, and turns raw payloads into view models
//! for a list view (rows + page stats) and a detail view (moves and
//! evolution line resolved through extra lookups).
//!
//! # Design
//! - `ResponseCache` is an explicit instance created once and shared by all
//!   clones of a `ResourceClient`; nothing else writes to it.
//! - `Transport` is the I/O seam. Production uses reqwest; tests script it.
//! - Request identities come from `EndpointBuilder` and double as cache keys.
//! - Whole-unit failures are `ApiError`s and reach the controllers. Failures
//!   of one move or one evolution stage degrade to placeholders.

pub mod aggregate;
pub mod cache;
pub mod client;
pub mod config;
pub mod controller;
pub mod endpoint;
pub mod error;
pub mod fetcher;
pub mod format;
pub mod http;
pub mod model;
pub mod stat_meta;
pub mod transform;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregate::compute_stats;
pub use cache::{CacheStats, ResponseCache};
pub use client::ResourceClient;
pub use config::Config;
pub use controller::{DetailController, ListController, LoadState};
pub use endpoint::EndpointBuilder;
pub use error::{ApiError, EnrichmentFailure};
pub use fetcher::HttpFetcher;
pub use http::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use model::{
    Ability, BaseStats, CollectionStats, DetailRecord, LineageStage, MoveSummary, SortDirection,
    SortField, TableRow, TopScorer,
};
pub use transform::{batch_to_table_rows, to_detail_record, to_table_row};
