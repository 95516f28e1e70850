//! Page-based pagination math shared by every list endpoint.
//!
//! All lists use the same page size (20). A request past the last page is
//! clamped to the last page rather than returning an empty result, and an
//! empty collection still reports one (empty) page — clients can always
//! render `page`/`total` without special cases.

use serde::Serialize;
use utoipa::ToSchema;

/// Items per page for every paginated endpoint.
pub const PAGE_SIZE: i64 = 20;

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Pagination {
    /// Page actually served (after clamping)
    pub page: i64,

    /// Total number of pages (at least 1)
    pub total: i64,
}

/// Resolved window into a collection of `total_items` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Page served after clamping to the last page
    pub page: i64,

    /// Total number of pages (at least 1)
    pub total_pages: i64,

    /// SQL OFFSET for this page
    pub offset: i64,

    /// SQL LIMIT for this page
    pub limit: i64,
}

/// Compute the window for `requested_page` over `total_items` rows.
///
/// `requested_page` must already be validated to be >= 1.
pub fn page_window(total_items: i64, requested_page: i64) -> PageWindow {
    let total_pages = ((total_items + PAGE_SIZE - 1) / PAGE_SIZE).max(1);
    let page = requested_page.min(total_pages);

    PageWindow {
        page,
        total_pages,
        offset: (page - 1) * PAGE_SIZE,
        limit: PAGE_SIZE,
    }
}

impl From<PageWindow> for Pagination {
    fn from(window: PageWindow) -> Self {
        Pagination {
            page: window.page,
            total: window.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collection_is_one_empty_page() {
        let window = page_window(0, 1);

        assert_eq!(window.page, 1);
        assert_eq!(window.total_pages, 1);
        assert_eq!(window.offset, 0);
    }

    #[test]
    fn exact_multiple_of_page_size() {
        let window = page_window(40, 2);

        assert_eq!(window.total_pages, 2);
        assert_eq!(window.page, 2);
        assert_eq!(window.offset, 20);
    }

    #[test]
    fn partial_last_page_counts_as_a_page() {
        let window = page_window(41, 3);

        assert_eq!(window.total_pages, 3);
        assert_eq!(window.offset, 40);
    }

    #[test]
    fn requests_past_the_end_clamp_to_last_page() {
        let window = page_window(25, 99);

        assert_eq!(window.total_pages, 2);
        assert_eq!(window.page, 2);
        assert_eq!(window.offset, 20);
    }

    #[test]
    fn first_page_of_small_collection() {
        let window = page_window(3, 1);

        assert_eq!(window.page, 1);
        assert_eq!(window.total_pages, 1);
        assert_eq!(window.offset, 0);
        assert_eq!(window.limit, PAGE_SIZE);
    }
}
