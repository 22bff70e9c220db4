//! Error types for the catalog client.
//!
//! # Design
//! `ApiError` covers failures that affect a whole requested unit (one page,
//! one entity) and always propagates to the caller. `EnrichmentFailure`
//! covers failures of a single sub-fetch while building a detail record; the
//! transformer logs it and substitutes a fallback value, so it never leaves
//! the crate as an `Err`.

use thiserror::Error;

/// Errors returned by the fetch layer.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The upstream answered with a non-2xx status. Never cached.
    #[error("{message}")]
    Upstream {
        status: u16,
        url: String,
        message: String,
    },

    /// No HTTP response was obtained at all (connect, timeout, body read).
    #[error("{message}")]
    Transport { url: String, message: String },

    /// The body was not JSON, or did not have the expected shape.
    #[error("failed to decode response from {url}: {message}")]
    Deserialization { url: String, message: String },
}

impl ApiError {
    /// Build an `Upstream` error with the canonical reason phrase for `status`.
    pub fn upstream(status: u16, url: &str) -> Self {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("");
        ApiError::Upstream {
            status,
            url: url.to_string(),
            message: format!("API Error: {status} {reason}").trim_end().to_string(),
        }
    }

    /// The request identity that failed.
    pub fn url(&self) -> &str {
        match self {
            ApiError::Upstream { url, .. }
            | ApiError::Transport { url, .. }
            | ApiError::Deserialization { url, .. } => url,
        }
    }

    /// HTTP status, when the upstream produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A sub-fetch failure inside detail enrichment.
#[derive(Debug, Clone, Error)]
pub enum EnrichmentFailure {
    /// A single move lookup failed; the move falls back to the "normal" type.
    #[error("move {name} could not be resolved: {source}")]
    Move { name: String, source: ApiError },

    /// A single evolution stage lookup failed; the stage keeps its name only.
    #[error("evolution stage {name} could not be resolved: {source}")]
    LineageStage { name: String, source: ApiError },

    /// Species or chain resolution failed; the lineage is empty.
    #[error("no evolution chain for pokemon {pokemon_id}: {reason}")]
    LineageAbsent { pokemon_id: u32, reason: String },
}
