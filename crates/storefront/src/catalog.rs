//! Paginated catalog feed.
//!
//! Fetches the product catalog page-by-page, keyed by the active
//! (search-term, category) filter pair, growing one flat list as the view's
//! proximity trigger requests more. Pages are cached for 60 seconds by
//! (filter, cursor) so repeated mounts within that window reuse results
//! instead of re-fetching, and at most one fetch is in flight at a time so
//! pages are always appended in cursor order.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use clementine_core::{CategoryId, Product};
use moka::sync::Cache;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::data::{DataService, DataServiceError, ProductPage};

/// Products requested per page.
pub const PAGE_SIZE: u32 = 12;

/// How long a fetched page stays fresh.
pub const PAGE_FRESHNESS: Duration = Duration::from_secs(60);

const PAGE_CACHE_CAPACITY: u64 = 200;

/// Category half of a [`FilterKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    /// No category restriction ("All").
    #[default]
    All,
    Category(CategoryId),
}

/// The (search term, category) pair that scopes a paginated catalog query.
///
/// Changing the active key discards accumulated pages and restarts from
/// cursor 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FilterKey {
    /// Free-text search term; empty means unfiltered.
    pub search: String,
    pub category: CategoryFilter,
}

impl FilterKey {
    /// Key matching the whole catalog.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Key for a search term within a category filter.
    #[must_use]
    pub fn new(search: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            search: search.into(),
            category,
        }
    }
}

/// Catalog fetch failure. Retryable: already-loaded pages stay intact and
/// the next [`CatalogFeed::load_next_page`] call tries again.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("catalog page fetch failed: {0}")]
pub struct CatalogError(#[from] pub DataServiceError);

/// Outcome of a [`CatalogFeed::load_next_page`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLoad {
    /// A page was appended to the feed.
    Appended {
        /// Products added by this page.
        count: usize,
    },
    /// Nothing to do: a fetch was already in flight or the feed is
    /// exhausted.
    Skipped,
    /// The filter changed while the fetch was in flight; the late response
    /// was discarded.
    Stale,
}

struct FeedState {
    filter: FilterKey,
    products: Vec<Product>,
    next_cursor: u32,
    has_more: bool,
    total: u64,
    loading: bool,
    /// Bumped on every filter change; late responses from an older
    /// generation are discarded instead of corrupting the list.
    generation: u64,
    last_error: Option<CatalogError>,
}

/// The lazily-growing product feed behind the home page.
///
/// One instance lives for the whole session; clones share state.
pub struct CatalogFeed<S> {
    inner: Arc<CatalogFeedInner<S>>,
}

// Manual impl: `S` itself need not be `Clone`.
impl<S> Clone for CatalogFeed<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct CatalogFeedInner<S> {
    data: Arc<S>,
    pages: Cache<(FilterKey, u32), ProductPage>,
    state: Mutex<FeedState>,
}

impl<S: DataService> CatalogFeed<S> {
    /// Create a feed over the whole catalog (empty search, all categories).
    #[must_use]
    pub fn new(data: Arc<S>) -> Self {
        let pages = Cache::builder()
            .max_capacity(PAGE_CACHE_CAPACITY)
            .time_to_live(PAGE_FRESHNESS)
            .build();

        Self {
            inner: Arc::new(CatalogFeedInner {
                data,
                pages,
                state: Mutex::new(FeedState {
                    filter: FilterKey::all(),
                    products: Vec::new(),
                    next_cursor: 0,
                    has_more: true,
                    total: 0,
                    loading: false,
                    generation: 0,
                    last_error: None,
                }),
            }),
        }
    }

    /// Switch the active filter key.
    ///
    /// A changed key discards accumulated products and restarts from cursor
    /// 0; setting the current key again is a no-op. Cached pages survive
    /// filter changes, so flipping back within the freshness window reuses
    /// them.
    pub fn set_filter(&self, filter: FilterKey) {
        let mut state = self.lock_state();
        if state.filter == filter {
            return;
        }
        debug!(?filter, "catalog filter changed, resetting feed");
        state.filter = filter;
        state.products.clear();
        state.next_cursor = 0;
        state.has_more = true;
        state.total = 0;
        state.loading = false;
        state.generation += 1;
        state.last_error = None;
    }

    /// Fetch and append the next page, if one is due.
    ///
    /// Call this from the proximity trigger. Skips when a fetch is already
    /// in flight or the feed is exhausted, serves fresh cached pages without
    /// touching the backend, and discards responses whose filter no longer
    /// matches the active one.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the backend fetch fails. Loaded pages
    /// are left intact and the call may simply be retried.
    #[instrument(skip(self))]
    pub async fn load_next_page(&self) -> Result<PageLoad, CatalogError> {
        let (filter, cursor, generation) = {
            let mut state = self.lock_state();
            if state.loading || !state.has_more {
                return Ok(PageLoad::Skipped);
            }
            state.loading = true;
            (state.filter.clone(), state.next_cursor, state.generation)
        };

        let page = match self.fetch_page(&filter, cursor).await {
            Ok(page) => page,
            Err(error) => {
                let mut state = self.lock_state();
                if state.generation == generation {
                    state.loading = false;
                    state.last_error = Some(CatalogError(error.clone()));
                }
                warn!(%error, cursor, "catalog page fetch failed");
                return Err(CatalogError(error));
            }
        };

        let mut state = self.lock_state();
        if state.generation != generation {
            // Filter changed mid-flight; the reset already cleared loading.
            return Ok(PageLoad::Stale);
        }
        let count = page.products.len();
        state.has_more = count == PAGE_SIZE as usize;
        state.total = page.total;
        state.next_cursor = cursor + 1;
        state.products.extend(page.products);
        state.loading = false;
        state.last_error = None;
        debug!(cursor, count, has_more = state.has_more, "catalog page appended");
        Ok(PageLoad::Appended { count })
    }

    /// Fetch one page, via the freshness cache.
    async fn fetch_page(
        &self,
        filter: &FilterKey,
        cursor: u32,
    ) -> Result<ProductPage, DataServiceError> {
        let key = (filter.clone(), cursor);
        if let Some(page) = self.inner.pages.get(&key) {
            debug!(cursor, "catalog page served from cache");
            return Ok(page);
        }
        let page = self.inner.data.list_products(filter, cursor, PAGE_SIZE).await?;
        self.inner.pages.insert(key, page.clone());
        Ok(page)
    }

    /// The accumulated products for the active filter, in cursor order.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.lock_state().products.clone()
    }

    /// The active filter key.
    #[must_use]
    pub fn filter(&self) -> FilterKey {
        self.lock_state().filter.clone()
    }

    /// Whether more pages may exist.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.lock_state().has_more
    }

    /// Whether a fetch is currently in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lock_state().loading
    }

    /// Total records matching the active filter, as reported by the last
    /// page.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.lock_state().total
    }

    /// The error from the most recent failed fetch, cleared by the next
    /// successful one.
    #[must_use]
    pub fn last_error(&self) -> Option<CatalogError> {
        self.lock_state().last_error.clone()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, FeedState> {
        self.inner.state.lock().expect("feed state lock poisoned")
    }
}
