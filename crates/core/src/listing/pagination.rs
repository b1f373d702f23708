use std::ops::RangeInclusive;

use serde::Serialize;

/// Number of customers shown per page.
pub const PAGE_SIZE: usize = 10;

/// Maximum number of page buttons in the page-number control.
pub const MAX_PAGE_BUTTONS: usize = 5;

/// Returns the number of pages needed for `count` items, never less than 1.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Clamps a 1-based page request into `[1, total_pages]`.
pub fn clamp_page(requested: usize, total_pages: usize) -> usize {
    requested.clamp(1, total_pages.max(1))
}

/// Returns the page numbers to show in the page-number control.
///
/// Prefers `current - 2 ..= current + 2`, shifted so that the window stays
/// inside `[1, total_pages]` and still shows `max_buttons` pages when there
/// are enough of them.
pub fn page_window(current: usize, total_pages: usize, max_buttons: usize) -> RangeInclusive<usize> {
    let total = total_pages.max(1);
    let width = max_buttons.clamp(1, total);
    let current = clamp_page(current, total);

    let start = current
        .saturating_sub(width / 2)
        .max(1)
        .min(total + 1 - width);
    start..=start + width - 1
}

/// One page of a filtered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number, already clamped.
    pub current_page: usize,
    pub total_pages: usize,
    /// Item count across every page.
    pub total_items: usize,
    /// Zero-based offset of the first item on this page.
    pub start_index: usize,
    /// Exclusive end offset of this page.
    pub end_index: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Page numbers for the page-number control.
    pub fn window(&self) -> RangeInclusive<usize> {
        page_window(self.current_page, self.total_pages, MAX_PAGE_BUTTONS)
    }

    /// Maps the items of the page, keeping the bounds.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            total_pages: self.total_pages,
            total_items: self.total_items,
            start_index: self.start_index,
            end_index: self.end_index,
        }
    }
}

/// Slices `items` into the requested page.
///
/// Out-of-range requests are clamped to the nearest existing page instead of
/// producing an empty page.
pub fn paginate<T: Clone>(items: &[T], requested_page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_pages(total_items, page_size);
    let current_page = clamp_page(requested_page, total_pages);

    let start_index = (current_page - 1) * page_size;
    let end_index = (start_index + page_size).min(total_items);

    Page {
        items: items[start_index..end_index].to_vec(),
        current_page,
        total_pages,
        total_items,
        start_index,
        end_index,
    }
}
