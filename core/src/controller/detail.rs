use tracing::{info, warn};

use super::{user_message, LoadState};
use crate::client::ResourceClient;
use crate::model::DetailRecord;
use crate::transform::to_detail_record;

const FALLBACK_MESSAGE: &str = "Failed to fetch Pokemon details";

/// Detail view for one entity, identified by id or name.
#[derive(Debug)]
pub struct DetailController {
    client: ResourceClient,
    max_moves: usize,
    identity: Option<String>,
    record: Option<DetailRecord>,
    state: LoadState,
}

impl DetailController {
    pub fn new(client: ResourceClient, max_moves: usize) -> Self {
        Self {
            client,
            max_moves,
            identity: None,
            record: None,
            state: LoadState::Idle,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn record(&self) -> Option<&DetailRecord> {
        self.record.as_ref()
    }

    /// Show `identity`. Loads only when it differs from the current one.
    pub async fn select(&mut self, identity: &str) {
        if self.identity.as_deref() == Some(identity) {
            return;
        }
        self.identity = Some(identity.to_string());
        self.load().await;
    }

    /// Load the current identity again.
    pub async fn retry(&mut self) {
        if self.identity.is_some() {
            self.load().await;
        }
    }

    async fn load(&mut self) {
        let Some(identity) = self.identity.clone() else {
            return;
        };
        self.state = LoadState::Loading;
        info!(%identity, "loading detail");

        match self.client.pokemon(&identity).await {
            Ok(pokemon) => {
                let record = to_detail_record(&self.client, &pokemon, self.max_moves).await;
                self.record = Some(record);
                self.state = LoadState::Ready;
            }
            Err(err) => {
                warn!(%identity, error = %err, "detail load failed");
                self.record = None;
                self.state = LoadState::Errored(user_message(&err, FALLBACK_MESSAGE));
            }
        }
    }
}
