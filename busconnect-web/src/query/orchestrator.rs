//! Journey listing orchestration.
//!
//! [`JourneySearch`] owns everything that shapes one listing: search
//! fields, reduced filters, sort, and paging. Every user action produces a
//! [`PendingRequest`]; the caller sends it (or lets [`JourneySearch::run`]
//! do so) and hands the outcome back to [`JourneySearch::resolve`].
//!
//! Requests are numbered. Only the most recently issued request may update
//! the state, so a slow response to an older query can never overwrite the
//! results of a newer one.

use tracing::{debug, error, warn};

use crate::api::{ApiError, BusApi, Journey, JourneyPage};
use crate::pagination::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS, Pagination};

use super::error::QueryError;
use super::params::{FilterParams, JourneyQuery, SearchParams};
use super::sort::SortOption;

/// Message shown whenever a listing request fails.
pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch journeys. Please try again later.";

/// Where the listing is in its request cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    /// Nothing requested yet.
    Idle,
    /// A request is in flight.
    Searching,
    /// The latest request succeeded.
    Results,
    /// The latest request failed; holds the user-facing message.
    Error(String),
}

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// A request ready to send to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub token: RequestToken,
    pub query: JourneyQuery,
}

/// State of one journey listing.
#[derive(Debug, Clone)]
pub struct JourneySearch {
    search: SearchParams,
    filters: FilterParams,
    sort: SortOption,
    current_page: usize,
    items_per_page: usize,
    total_items: usize,
    journeys: Vec<Journey>,
    status: SearchStatus,
    last_issued: u64,
}

impl Default for JourneySearch {
    fn default() -> Self {
        Self::new()
    }
}

impl JourneySearch {
    /// An idle listing: no search, no filters, default sort, page 1.
    pub fn new() -> Self {
        Self {
            search: SearchParams::default(),
            filters: FilterParams::default(),
            sort: SortOption::default(),
            current_page: 1,
            items_per_page: DEFAULT_PAGE_SIZE,
            total_items: 0,
            journeys: Vec::new(),
            status: SearchStatus::Idle,
            last_issued: 0,
        }
    }

    /// Rebuild a listing from state carried elsewhere, e.g. a page URL.
    ///
    /// The listing is still idle; call [`refresh`](Self::refresh) to load it.
    pub fn restore(
        search: SearchParams,
        filters: FilterParams,
        sort: SortOption,
        page: usize,
        items_per_page: usize,
    ) -> Result<Self, QueryError> {
        validate_page_size(items_per_page)?;
        validate_page(page, items_per_page)?;

        Ok(Self {
            search,
            filters,
            sort,
            current_page: page,
            items_per_page,
            ..Self::new()
        })
    }

    pub fn status(&self) -> &SearchStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Searching
    }

    /// Journeys from the latest successful response.
    pub fn journeys(&self) -> &[Journey] {
        &self.journeys
    }

    pub fn search_params(&self) -> &SearchParams {
        &self.search
    }

    pub fn filters(&self) -> &FilterParams {
        &self.filters
    }

    pub fn sort(&self) -> SortOption {
        self.sort
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.total_items, self.items_per_page, self.current_page)
    }

    /// The merged request for the current state.
    pub fn query(&self) -> JourneyQuery {
        JourneyQuery {
            search: self.search.clone(),
            filters: self.filters.clone(),
            sort: self.sort,
            limit: self.items_per_page,
            // Every path that sets the page or page size keeps this in range.
            offset: self.pagination().offset().unwrap_or_default(),
        }
    }

    fn issue(&mut self) -> PendingRequest {
        self.last_issued += 1;
        self.status = SearchStatus::Searching;
        PendingRequest {
            token: RequestToken(self.last_issued),
            query: self.query(),
        }
    }

    /// Request the current state as-is (first load, or a reload).
    pub fn refresh(&mut self) -> PendingRequest {
        self.issue()
    }

    /// First load: whatever the listing holds, usually just the default sort.
    pub fn initial_load(&mut self) -> PendingRequest {
        self.refresh()
    }

    /// New search from the search form. Returns to page 1.
    pub fn submit_search(&mut self, params: SearchParams) -> PendingRequest {
        self.search = params;
        self.current_page = 1;
        self.issue()
    }

    /// New filters from the filter panel. Returns to page 1.
    pub fn change_filters(&mut self, filters: FilterParams) -> PendingRequest {
        self.filters = filters;
        self.current_page = 1;
        self.issue()
    }

    /// New sort order. Stays on the current page.
    pub fn change_sort(&mut self, sort: SortOption) -> PendingRequest {
        self.sort = sort;
        self.issue()
    }

    pub fn change_page(&mut self, page: usize) -> Result<PendingRequest, QueryError> {
        validate_page(page, self.items_per_page)?;
        self.current_page = page;
        Ok(self.issue())
    }

    /// New page size. Returns to page 1.
    pub fn change_items_per_page(&mut self, n: usize) -> Result<PendingRequest, QueryError> {
        validate_page_size(n)?;
        self.items_per_page = n;
        self.current_page = 1;
        Ok(self.issue())
    }

    /// Apply the outcome of a request.
    ///
    /// Returns `false` (and changes nothing) if a newer request has been
    /// issued since `token`. On success the backend's `total` and `limit`
    /// replace the local values.
    pub fn resolve(&mut self, token: RequestToken, outcome: Result<JourneyPage, ApiError>) -> bool {
        if token != RequestToken(self.last_issued) {
            debug!(?token, latest = self.last_issued, "discarding superseded response");
            return false;
        }

        match outcome {
            Ok(page) => {
                debug!(
                    total = page.total,
                    limit = page.limit,
                    offset = page.offset,
                    returned = page.journeys.len(),
                    "journey listing loaded"
                );
                self.journeys = page.journeys;
                self.total_items = page.total;
                if validate_page(self.current_page, page.limit).is_ok() {
                    self.items_per_page = page.limit;
                } else {
                    warn!(limit = page.limit, "ignoring echoed limit out of range for current page");
                }
                self.status = SearchStatus::Results;
            }
            Err(e) => {
                error!(error = %e, "error fetching journeys");
                self.journeys.clear();
                self.status = SearchStatus::Error(FETCH_ERROR_MESSAGE.to_string());
            }
        }

        true
    }

    /// Send `pending` through `api` and apply the outcome.
    pub async fn run<A: BusApi>(&mut self, pending: PendingRequest, api: &A) -> bool {
        let outcome = api.search_journeys(&pending.query).await;
        self.resolve(pending.token, outcome)
    }
}

/// Page numbers start at 1, and the page's offset must be representable.
fn validate_page(page: usize, items_per_page: usize) -> Result<(), QueryError> {
    if page == 0 {
        return Err(QueryError::InvalidPage);
    }
    match (page - 1).checked_mul(items_per_page) {
        Some(_) => Ok(()),
        None => Err(QueryError::PageOutOfRange(page)),
    }
}

fn validate_page_size(n: usize) -> Result<(), QueryError> {
    if !PAGE_SIZE_OPTIONS.contains(&n) {
        return Err(QueryError::InvalidPageSize(n));
    }
    Ok(())
}
