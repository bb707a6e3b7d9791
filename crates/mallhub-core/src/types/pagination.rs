//! Pagination query normalization for list operations.

use serde::{Deserialize, Serialize};

/// Page size used when the caller supplies none (or an invalid one).
pub const DEFAULT_LIMIT: i64 = 10;
/// First page; pages are 0-indexed.
pub const DEFAULT_PAGE: i64 = 0;
/// Upper bound on the page size.
pub const MAX_LIMIT: i64 = 100;

/// Raw pagination parameters as decoded from the query string.
///
/// Always call [`Query::normalize`] before handing the query to a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Query {
    /// Page number (0-based).
    #[serde(default)]
    pub page: i64,
    /// Items per page.
    #[serde(default)]
    pub limit: i64,
}

impl Query {
    /// Create a query with explicit values; still needs normalizing.
    pub fn new(page: i64, limit: i64) -> Self {
        Self { page, limit }
    }

    /// Replace absent or out-of-range values with the documented defaults.
    pub fn normalize(self) -> Self {
        let limit = if self.limit <= 0 {
            DEFAULT_LIMIT
        } else {
            self.limit.min(MAX_LIMIT)
        };
        let page = if self.page < 0 { DEFAULT_PAGE } else { self.page };
        Self { page, limit }
    }

    /// SQL `OFFSET` for this page. Saturates, so a huge page is just empty.
    pub fn offset(&self) -> i64 {
        self.limit.saturating_mul(self.page)
    }
}

/// One page of results together with the full matching count.
#[derive(Debug, Clone)]
pub struct Paged<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total number of matching rows across all pages.
    pub total: i64,
    /// The normalized query that produced this page.
    pub query: Query,
}

impl<T> Paged<T> {
    /// Create a page.
    pub fn new(items: Vec<T>, total: i64, query: Query) -> Self {
        Self {
            items,
            total,
            query,
        }
    }

    /// Convert every item, keeping the paging information.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            query: self.query,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_defaults() {
        let q = Query::default().normalize();
        assert_eq!(q.page, DEFAULT_PAGE);
        assert_eq!(q.limit, DEFAULT_LIMIT);
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn test_normalize_invalid_values() {
        let q = Query::new(-3, -1).normalize();
        assert_eq!(q.page, 0);
        assert_eq!(q.limit, 10);
    }

    #[test]
    fn test_normalize_caps_limit() {
        let q = Query::new(2, 5000).normalize();
        assert_eq!(q.limit, MAX_LIMIT);
        assert_eq!(q.offset(), 200);
    }

    #[test]
    fn test_offset_is_limit_times_page() {
        let q = Query::new(3, 20).normalize();
        assert_eq!(q.offset(), 60);
    }

    #[test]
    fn test_offset_saturates_on_huge_page() {
        let q = Query::new(i64::MAX, 0).normalize();
        assert_eq!(q.offset(), i64::MAX);

        let q = Query::new(i64::MAX / 50, 100).normalize();
        assert_eq!(q.offset(), i64::MAX);
    }
}
