//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Maximum page size accepted from clients.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Default page size when the client does not specify one.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Clamped pagination parameters (1-indexed pages).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Page size.
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationParams {
    /// Creates clamped parameters: page ≥ 1, 1 ≤ limit ≤ `MAX_PAGE_SIZE`.
    #[must_use]
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Returns the parameters with out-of-range values clamped.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self::new(self.page, self.limit)
    }

    /// Number of rows to skip.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }
}

/// A page of results with pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total number of items across all pages.
    pub total: u64,
    /// Current page (1-indexed).
    pub page: u64,
    /// Page size.
    pub limit: u64,
    /// Total number of pages (at least 1).
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// Builds a page envelope from items, a total count and the parameters
    /// that produced them.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, params: PaginationParams) -> Self {
        let total_pages = if total == 0 {
            1
        } else {
            total.div_ceil(params.limit)
        };
        Self {
            items,
            total,
            page: params.page,
            limit: params.limit,
            total_pages,
        }
    }

    /// Maps the items to another type, keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0, 1, 1)]
    #[case(1, 20, 1, 20)]
    #[case(5, 500, 5, 100)]
    #[case(3, 50, 3, 50)]
    fn test_clamping(
        #[case] page: u64,
        #[case] limit: u64,
        #[case] expected_page: u64,
        #[case] expected_limit: u64,
    ) {
        let params = PaginationParams::new(page, limit);
        assert_eq!(params.page, expected_page);
        assert_eq!(params.limit, expected_limit);
    }

    #[test]
    fn test_offset() {
        assert_eq!(PaginationParams::new(1, 20).offset(), 0);
        assert_eq!(PaginationParams::new(3, 20).offset(), 40);
    }

    #[rstest]
    #[case(0, 20, 1)]
    #[case(1, 20, 1)]
    #[case(20, 20, 1)]
    #[case(21, 20, 2)]
    #[case(100, 7, 15)]
    fn test_total_pages(#[case] total: u64, #[case] limit: u64, #[case] expected: u64) {
        let page = Paginated::<u8>::new(vec![], total, PaginationParams::new(1, limit));
        assert_eq!(page.total_pages, expected);
    }
}
