use serde::{Deserialize, Serialize};

use crate::customer::Customer;

use super::filter::{filter_customers, StatusFilter};
use super::pagination::{clamp_page, paginate, total_pages, Page, PAGE_SIZE};

/// Presentation-owned inputs of the listing pipeline.
///
/// `search` is the committed (already debounced) term, not the raw input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub search: String,
    pub status: StatusFilter,
    /// 1-based page request.
    pub page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: StatusFilter::All,
            page: 1,
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits a new search term. A changed term goes back to page 1.
    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term != self.search {
            self.search = term;
            self.page = 1;
        }
    }

    /// Changes the status filter. A changed filter goes back to page 1.
    pub fn set_status(&mut self, status: StatusFilter) {
        if status != self.status {
            self.status = status;
            self.page = 1;
        }
    }

    /// Requests a page; the request is clamped on the next `apply`.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    pub fn next_page(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Runs the search and status filters, ignoring pagination.
    pub fn filtered<'a>(&self, customers: &'a [Customer]) -> Vec<&'a Customer> {
        filter_customers(customers, &self.search, self.status)
    }

    /// Filters, clamps the page into range and slices it.
    ///
    /// The clamped page is written back so that a shrinking result set moves
    /// the state to the last existing page instead of an empty one.
    pub fn apply<'a>(&mut self, customers: &'a [Customer]) -> Page<&'a Customer> {
        let filtered = self.filtered(customers);
        self.page = clamp_page(self.page, total_pages(filtered.len(), PAGE_SIZE));
        paginate(&filtered, self.page, PAGE_SIZE)
    }
}
