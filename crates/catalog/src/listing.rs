//! Page-level listing controller.
//!
//! Owns the listing state (criteria, sort key, current page) and derives the
//! displayed page as `paginate(sort(filter(catalog, criteria), key), page, size)`.
//!
//! The filtered+sorted sequence is cached and keyed by `(criteria, key)`.
//! Page navigation only re-slices the cached sequence; any criteria or key
//! edit resets the page to 1.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::criteria::{FilterCriteria, PriceRange};
use crate::filter::filter;
use crate::paginate::paginate;
use crate::product::Product;
use crate::sort::{SortKey, sort};

/// Products per listing page.
pub const DEFAULT_PAGE_SIZE: usize = 12;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ListingError {
    #[error("page {page} is out of range (total pages: {total_pages})")]
    PageOutOfRange { page: usize, total_pages: usize },

    #[error("page size must be greater than zero")]
    InvalidPageSize,
}

/// Listing request as received from the outside (all fields optional).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingQuery {
    pub criteria: FilterCriteria,
    pub sort: SortKey,
    pub page: usize,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            criteria: FilterCriteria::default(),
            sort: SortKey::default(),
            page: 1,
        }
    }
}

/// Rendered listing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingView<'a> {
    pub items: Vec<&'a Product>,
    pub sort: SortKey,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    /// 1-based position of the first shown item ("Showing 13-14 of 14"); 0 when empty.
    pub showing_from: usize,
    pub showing_to: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub active_filter_count: usize,
}

/// Cached filter+sort result and the inputs it was derived from.
#[derive(Debug)]
struct Derivation<'a> {
    criteria: FilterCriteria,
    sort_key: SortKey,
    products: Vec<&'a Product>,
}

#[derive(Debug)]
pub struct ListingController<'a> {
    catalog: &'a Catalog,
    criteria: FilterCriteria,
    sort_key: SortKey,
    current_page: usize,
    page_size: usize,
    derived: Derivation<'a>,
    pipeline_runs: u64,
}

impl<'a> ListingController<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        let criteria = FilterCriteria::default();
        let sort_key = SortKey::default();
        let derived = derive(catalog, &criteria, sort_key);
        Self {
            catalog,
            criteria,
            sort_key,
            current_page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            derived,
            pipeline_runs: 1,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Result<Self, ListingError> {
        if page_size == 0 {
            return Err(ListingError::InvalidPageSize);
        }
        self.page_size = page_size;
        self.current_page = 1;
        Ok(self)
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of filter+sort derivations performed so far.
    pub fn pipeline_runs(&self) -> u64 {
        self.pipeline_runs
    }

    /// The full filtered and sorted sequence (all pages).
    pub fn results(&self) -> &[&'a Product] {
        &self.derived.products
    }

    pub fn total_count(&self) -> usize {
        self.derived.products.len()
    }

    pub fn total_pages(&self) -> usize {
        self.total_count().div_ceil(self.page_size)
    }

    // ---- criteria / sort edits (always reset to page 1) ----

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.on_inputs_changed();
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
        self.on_inputs_changed();
    }

    pub fn clear_filters(&mut self) {
        self.set_criteria(FilterCriteria::default());
    }

    pub fn toggle_category(&mut self, token: impl Into<String>) {
        self.criteria.toggle_category(token);
        self.on_inputs_changed();
    }

    pub fn toggle_brand(&mut self, token: impl Into<String>) {
        self.criteria.toggle_brand(token);
        self.on_inputs_changed();
    }

    pub fn toggle_rating(&mut self, threshold: f64) {
        self.criteria.toggle_rating(threshold);
        self.on_inputs_changed();
    }

    pub fn set_price_range(&mut self, range: PriceRange) {
        self.criteria.set_price_range(range);
        self.on_inputs_changed();
    }

    /// Apply an external listing request: new criteria and sort key, then the
    /// requested page. A page outside the new result leaves the controller
    /// untouched.
    pub fn apply_query(&mut self, query: ListingQuery) -> Result<(), ListingError> {
        let unchanged = self.derived.criteria == query.criteria && self.derived.sort_key == query.sort;
        let candidate = (!unchanged).then(|| derive(self.catalog, &query.criteria, query.sort));

        let matched = candidate.as_ref().map_or(self.total_count(), |d| d.products.len());
        let total_pages = matched.div_ceil(self.page_size);
        if query.page != 1 && (query.page < 1 || query.page > total_pages) {
            tracing::warn!(page = query.page, total_pages, "rejected listing query");
            return Err(ListingError::PageOutOfRange { page: query.page, total_pages });
        }

        self.criteria = query.criteria;
        self.sort_key = query.sort;
        if let Some(derived) = candidate {
            self.install(derived);
        }
        self.current_page = query.page;
        Ok(())
    }

    // ---- page navigation (never re-runs filter/sort) ----

    pub fn go_to_page(&mut self, page: usize) -> Result<(), ListingError> {
        let total_pages = self.total_pages();
        if page < 1 || page > total_pages {
            tracing::warn!(page, total_pages, "rejected listing navigation");
            return Err(ListingError::PageOutOfRange { page, total_pages });
        }
        tracing::debug!(from = self.current_page, to = page, "listing page changed");
        self.current_page = page;
        Ok(())
    }

    pub fn next_page(&mut self) -> Result<(), ListingError> {
        self.go_to_page(self.current_page + 1)
    }

    pub fn previous_page(&mut self) -> Result<(), ListingError> {
        self.go_to_page(self.current_page.saturating_sub(1))
    }

    pub fn view(&self) -> ListingView<'a> {
        let page = paginate(&self.derived.products, self.current_page, self.page_size);
        let total_count = self.total_count();
        let (showing_from, showing_to) = if page.items.is_empty() {
            (0, 0)
        } else {
            (page.start_index + 1, page.start_index + page.items.len())
        };

        ListingView {
            items: page.items.to_vec(),
            sort: self.sort_key,
            current_page: self.current_page,
            total_pages: page.total_pages,
            total_count,
            showing_from,
            showing_to,
            has_previous: self.current_page > 1,
            has_next: self.current_page < page.total_pages,
            active_filter_count: self.criteria.active_filter_count(),
        }
    }

    fn on_inputs_changed(&mut self) {
        self.current_page = 1;

        let cached = &self.derived;
        if cached.criteria == self.criteria && cached.sort_key == self.sort_key {
            return;
        }

        let derived = derive(self.catalog, &self.criteria, self.sort_key);
        self.install(derived);
    }

    fn install(&mut self, derived: Derivation<'a>) {
        self.derived = derived;
        self.pipeline_runs += 1;
        tracing::debug!(
            sort = %self.sort_key,
            active_filters = self.criteria.active_filter_count(),
            matched = self.derived.products.len(),
            "listing recomputed"
        );
    }
}

fn derive<'a>(catalog: &'a Catalog, criteria: &FilterCriteria, sort_key: SortKey) -> Derivation<'a> {
    Derivation {
        criteria: criteria.clone(),
        sort_key,
        products: sort(filter(catalog, criteria), sort_key),
    }
}
