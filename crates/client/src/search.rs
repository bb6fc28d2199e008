//! Navbar search suggestions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use metamoviex_core::types::{MediaKind, TimeWindow};
use metamoviex_metadata::models::MediaSummary;
use metamoviex_metadata::provider::MediaApi;
use tracing::debug;

use crate::ClientError;

/// Queries shorter than this show trending titles instead of results.
pub const MIN_QUERY_LEN: usize = 2;
pub const SUGGESTION_LIMIT: usize = 9;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, PartialEq)]
pub enum Suggestions {
    Trending(Vec<MediaSummary>),
    Results(Vec<MediaSummary>),
}

impl Suggestions {
    pub fn items(&self) -> &[MediaSummary] {
        match self {
            Self::Trending(items) | Self::Results(items) => items,
        }
    }
}

/// Debounced search box shared by every keystroke handler.
///
/// Each call to [`SearchBox::suggest`] supersedes the ones before it; a
/// superseded call returns `Ok(None)` instead of results.
#[derive(Debug)]
pub struct SearchBox {
    generation: AtomicU64,
    debounce: Duration,
}

impl Default for SearchBox {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl SearchBox {
    pub fn new(debounce: Duration) -> Self {
        Self {
            generation: AtomicU64::new(0),
            debounce,
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    pub async fn suggest(
        &self,
        api: &dyn MediaApi,
        query: &str,
    ) -> Result<Option<Suggestions>, ClientError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let query = query.trim();

        if query.chars().count() < MIN_QUERY_LEN {
            let trending = api.trending(MediaKind::Movie, TimeWindow::Week).await?;
            if !self.is_current(generation) {
                return Ok(None);
            }
            return Ok(Some(Suggestions::Trending(
                trending.results.into_iter().take(SUGGESTION_LIMIT).collect(),
            )));
        }

        if !self.debounce.is_zero() {
            tokio::time::sleep(self.debounce).await;
        }
        if !self.is_current(generation) {
            debug!(query, "search superseded before sending");
            return Ok(None);
        }

        let found = api.search_movies(query).await?;
        if !self.is_current(generation) {
            debug!(query, "search superseded before reply");
            return Ok(None);
        }
        Ok(Some(Suggestions::Results(
            found.results.into_iter().take(SUGGESTION_LIMIT).collect(),
        )))
    }
}
