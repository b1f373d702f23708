//! Search, status filter and pagination over a cached customer list.
//!
//! Everything here is pure and synchronous. The debounce that feeds
//! `FilterState::search` lives in the async shell.

mod filter;
mod pagination;
mod state;

pub use filter::{filter_customers, normalize_term, StatusFilter};
pub use pagination::{
    clamp_page, page_window, paginate, total_pages, Page, MAX_PAGE_BUTTONS, PAGE_SIZE,
};
pub use state::FilterState;
