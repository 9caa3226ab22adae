//! Common types used across the platform

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default page size used by the listing pages
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Upper bound on page size for listings
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Pagination parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl Pagination {
    /// Build pagination from optional query values, clamping to sane bounds
    pub fn from_query(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
        }
    }

    /// Row offset for SQL `OFFSET`
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }

    /// Row count for SQL `LIMIT`
    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }

    /// Number of pages needed for `total` rows (at least one)
    pub fn total_pages(&self, total: u64) -> u32 {
        let pages = total.div_ceil(u64::from(self.limit));
        pages.max(1) as u32
    }
}

/// Paginated response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: u64, pagination: Pagination) -> Self {
        Self {
            success: true,
            data,
            total,
            page: pagination.page,
            limit: pagination.limit,
            total_pages: pagination.total_pages(total),
        }
    }
}

/// Envelope for single-object responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Inclusive date range for queries; either side may be open
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Both bounds present and start after end
    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(s), Some(e)) if s > e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_clamps() {
        let p = Pagination::from_query(Some(0), Some(1000));
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, MAX_PAGE_LIMIT);

        let p = Pagination::from_query(None, None);
        assert_eq!(p, Pagination::default());
    }

    #[test]
    fn test_pagination_offset_and_pages() {
        let p = Pagination::from_query(Some(3), Some(10));
        assert_eq!(p.offset(), 20);
        assert_eq!(p.total_pages(0), 1);
        assert_eq!(p.total_pages(10), 1);
        assert_eq!(p.total_pages(11), 2);
    }

    #[test]
    fn test_date_range_inverted() {
        let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
        assert!(!DateRange::new(Some(d(1, 1)), Some(d(1, 31))).is_inverted());
        assert!(!DateRange::new(Some(d(1, 1)), Some(d(1, 1))).is_inverted());
        assert!(!DateRange::default().is_inverted());
        assert!(DateRange::new(Some(d(2, 1)), Some(d(1, 1))).is_inverted());
    }
}
