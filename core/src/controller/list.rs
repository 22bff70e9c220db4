use tracing::{info, warn};

use super::{user_message, LoadState};
use crate::aggregate::compute_stats;
use crate::client::ResourceClient;
use crate::error::ApiError;
use crate::model::{CollectionStats, SortDirection, SortField, TableRow};
use crate::transform::batch_to_table_rows;

const FALLBACK_MESSAGE: &str = "Failed to fetch Pokemon";

/// Paginated, client-side sortable list of table rows.
///
/// Changing page refetches; changing sort only reorders rows already held.
/// Stats always describe the current page alone.
#[derive(Debug)]
pub struct ListController {
    client: ResourceClient,
    page_size: usize,
    page: usize,
    total_count: usize,
    rows: Vec<TableRow>,
    stats: CollectionStats,
    sort_field: SortField,
    sort_direction: SortDirection,
    state: LoadState,
}

impl ListController {
    pub fn new(client: ResourceClient, page_size: usize) -> Self {
        Self {
            client,
            page_size: page_size.max(1),
            page: 0,
            total_count: 0,
            rows: Vec::new(),
            stats: CollectionStats::default(),
            sort_field: SortField::Name,
            sort_direction: SortDirection::Asc,
            state: LoadState::Idle,
        }
    }

    /// Start on `page` instead of the first one. Does not fetch.
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
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

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn total_pages(&self) -> usize {
        self.total_count.div_ceil(self.page_size)
    }

    pub fn sort_field(&self) -> SortField {
        self.sort_field
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Rows of the current page in the active sort order.
    pub fn rows(&self) -> Vec<TableRow> {
        let mut rows = self.rows.clone();
        sort_rows(&mut rows, self.sort_field, self.sort_direction);
        rows
    }

    pub fn stats(&self) -> &CollectionStats {
        &self.stats
    }

    /// Re-selecting the active field flips direction; a new field starts
    /// ascending.
    pub fn toggle_sort(&mut self, field: SortField) {
        if field == self.sort_field {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Asc;
        }
    }

    /// Load the current page. Used for the initial load and for retries.
    pub async fn refetch(&mut self) {
        self.state = LoadState::Loading;
        let offset = self.page.saturating_mul(self.page_size);
        info!(page = self.page, offset, limit = self.page_size, "loading page");

        match self.fetch_page(offset).await {
            Ok(rows) => {
                self.stats = compute_stats(&rows);
                self.rows = rows;
                self.state = LoadState::Ready;
            }
            Err(err) => {
                warn!(page = self.page, error = %err, "page load failed");
                self.state = LoadState::Errored(user_message(&err, FALLBACK_MESSAGE));
            }
        }
    }

    /// Advance and load, unless already on the last page.
    pub async fn next_page(&mut self) -> bool {
        if self.page.saturating_add(1).saturating_mul(self.page_size) >= self.total_count {
            return false;
        }
        self.page += 1;
        self.refetch().await;
        true
    }

    /// Go back and load, unless already on the first page.
    pub async fn prev_page(&mut self) -> bool {
        if self.page == 0 {
            return false;
        }
        self.page -= 1;
        self.refetch().await;
        true
    }

    async fn fetch_page(&mut self, offset: usize) -> Result<Vec<TableRow>, ApiError> {
        let listing = self.client.list(self.page_size, offset).await?;
        self.total_count = listing.count;

        let names: Vec<String> = listing.results.into_iter().map(|r| r.name).collect();
        let pokemon = self.client.batch(&names).await?;
        Ok(batch_to_table_rows(&pokemon))
    }
}

/// Stable sort of `rows` by `field`.
pub fn sort_rows(rows: &mut [TableRow], field: SortField, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ordering = match field {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Hp => a.hp.cmp(&b.hp),
            SortField::Speed => a.speed.cmp(&b.speed),
            SortField::BaseExperience => a.base_experience.cmp(&b.base_experience),
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}
