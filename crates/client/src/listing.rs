//! Filter and pagination state of the listing pages.
//!
//! A fetch is split into a [`PageRequest`] (built from the current filters)
//! and [`Listing::apply`] (merging the reply). Every request carries a
//! generation number, and only a reply to the most recent request is
//! merged, so a slow early reply cannot overwrite a newer one.

use chrono::NaiveDate;
use metamoviex_metadata::MetadataError;
use metamoviex_metadata::discover::{DiscoverFilters, Preset};
use metamoviex_metadata::models::{Genre, MediaSummary, Paged, PersonSummary};
use metamoviex_metadata::provider::MediaApi;
use tracing::{debug, warn};

use crate::ClientError;

#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub generation: u64,
    pub page: u32,
    pub append: bool,
    pub params: Vec<(&'static str, String)>,
}

/// Outcome of merging a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// First page of a new search; holds the item count.
    Replaced(usize),
    /// Next page appended; holds the number of new items.
    Appended(usize),
    /// A newer request was issued since; the reply was dropped.
    Stale,
    /// The request failed; items and page counter are unchanged.
    Failed,
}

#[derive(Debug, Clone)]
pub struct Listing {
    preset: Preset,
    pub filters: DiscoverFilters,
    genres: Vec<Genre>,
    items: Vec<MediaSummary>,
    page: u32,
    total_pages: u32,
    generation: u64,
    loading: bool,
    today: NaiveDate,
}

impl Listing {
    pub fn new(preset: Preset, today: NaiveDate) -> Self {
        Self {
            preset,
            filters: preset.default_filters(today),
            genres: Vec::new(),
            items: Vec::new(),
            page: 0,
            total_pages: 0,
            generation: 0,
            loading: false,
            today,
        }
    }

    pub fn preset(&self) -> Preset {
        self.preset
    }

    pub fn items(&self) -> &[MediaSummary] {
        &self.items
    }

    pub fn genres(&self) -> &[Genre] {
        &self.genres
    }

    /// Last page successfully merged, `0` before the first search.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }

    /// Restore the preset's starting filters.
    pub fn reset_filters(&mut self) {
        self.filters = self.preset.default_filters(self.today);
    }

    fn next_request(&mut self, page: u32, append: bool) -> PageRequest {
        self.generation += 1;
        self.loading = true;
        PageRequest {
            generation: self.generation,
            page,
            append,
            params: self.preset.params(&self.filters, page, self.today),
        }
    }

    /// Request for page 1 under the current filters.
    pub fn prepare_search(&mut self) -> PageRequest {
        self.next_request(1, false)
    }

    /// Request for the page after the last merged one.
    pub fn prepare_load_more(&mut self) -> PageRequest {
        let page = self.page + 1;
        self.next_request(page, true)
    }

    pub fn apply(
        &mut self,
        request: &PageRequest,
        reply: Result<Paged<MediaSummary>, MetadataError>,
    ) -> Applied {
        if request.generation != self.generation {
            debug!(
                generation = request.generation,
                latest = self.generation,
                "dropping stale listing reply"
            );
            return Applied::Stale;
        }
        self.loading = false;

        let paged = match reply {
            Ok(paged) => paged,
            Err(e) => {
                warn!(preset = ?self.preset, page = request.page, error = %e, "listing fetch failed");
                return Applied::Failed;
            }
        };

        self.page = request.page;
        self.total_pages = paged.total_pages;
        let count = paged.results.len();
        if request.append {
            self.items.extend(paged.results);
            Applied::Appended(count)
        } else {
            self.items = paged.results;
            Applied::Replaced(count)
        }
    }

    /// Run a fresh search from page 1, replacing the items.
    pub async fn search(&mut self, api: &dyn MediaApi) -> Applied {
        let request = self.prepare_search();
        let reply = api.discover(self.preset.kind(), &request.params).await;
        self.apply(&request, reply)
    }

    /// Fetch the next page and append it.
    pub async fn load_more(&mut self, api: &dyn MediaApi) -> Applied {
        let request = self.prepare_load_more();
        let reply = api.discover(self.preset.kind(), &request.params).await;
        self.apply(&request, reply)
    }

    pub async fn load_genres(&mut self, api: &dyn MediaApi) -> Result<(), ClientError> {
        self.genres = api.genres(self.preset.kind()).await?;
        Ok(())
    }
}

/// Popular people, one page at a time.
#[derive(Debug, Clone, Default)]
pub struct PeopleBrowser {
    page: u32,
    total_pages: u32,
    people: Vec<PersonSummary>,
}

impl PeopleBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> u32 {
        self.page.max(1)
    }

    pub fn people(&self) -> &[PersonSummary] {
        &self.people
    }

    /// Fetch `page` and replace the current people. The page only changes on success.
    pub async fn go_to(&mut self, api: &dyn MediaApi, page: u32) -> Result<(), ClientError> {
        let page = page.max(1);
        let paged = api.popular_people(page).await?;
        self.page = page;
        self.total_pages = paged.total_pages;
        self.people = paged.results;
        Ok(())
    }

    pub async fn load(&mut self, api: &dyn MediaApi) -> Result<(), ClientError> {
        self.go_to(api, self.page()).await
    }

    pub async fn next(&mut self, api: &dyn MediaApi) -> Result<(), ClientError> {
        let mut next = self.page() + 1;
        if self.total_pages > 0 {
            next = next.min(self.total_pages);
        }
        self.go_to(api, next).await
    }

    pub async fn previous(&mut self, api: &dyn MediaApi) -> Result<(), ClientError> {
        self.go_to(api, self.page().saturating_sub(1)).await
    }
}
