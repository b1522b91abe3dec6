//! Pagination helpers shared by the song listing and the lyrics endpoint
//!
//! Pages are 1-based. A request for a page that lies entirely beyond the data
//! is an error ([`PageOutOfRange`]), except for the first page of an empty
//! collection, which is simply empty.

use std::ops::Range;
use thiserror::Error;

/// First page number.
pub const FIRST_PAGE: u32 = 1;

/// The requested page starts past the last item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Page out of range: page {page} with size {page_size} exceeds {total} items")]
pub struct PageOutOfRange {
    pub page: u32,
    pub page_size: u32,
    pub total: usize,
}

/// Compute the half-open window `[start, end)` for a 1-based page.
///
/// `page` and `page_size` below 1 are treated as 1.
///
/// # Examples
///
/// ```
/// use core_library::repositories::pagination::paginate;
///
/// assert_eq!(paginate(5, 2, 3).unwrap(), 3..5);
/// assert!(paginate(5, 3, 3).is_err());
/// assert_eq!(paginate(0, 1, 3).unwrap(), 0..0);
/// ```
pub fn paginate(total: usize, page: u32, page_size: u32) -> Result<Range<usize>, PageOutOfRange> {
    let page = page.max(FIRST_PAGE);
    let page_size = page_size.max(1);

    let start = (page as usize - 1).saturating_mul(page_size as usize);
    if start >= total && !(page == FIRST_PAGE && total == 0) {
        return Err(PageOutOfRange {
            page,
            page_size,
            total,
        });
    }

    let end = start.saturating_add(page_size as usize).min(total);
    Ok(start..end)
}

/// Parse a positive page or page-size query parameter.
///
/// Missing, empty, zero, negative and non-numeric values all yield `default`.
pub fn parse_page_param(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|value| *value > 0)
        .map(|value| u32::try_from(value).unwrap_or(u32::MAX))
        .unwrap_or(default)
}

/// Pagination request parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Current page number (1-based)
    pub page: u32,
    /// Number of items per page
    pub page_size: u32,
}

impl PageRequest {
    /// Create a new page request
    ///
    /// # Examples
    ///
    /// ```
    /// use core_library::repositories::PageRequest;
    ///
    /// let request = PageRequest::new(2, 20);
    /// assert_eq!(request.page, 2);
    /// assert_eq!(request.offset(), 20);
    /// ```
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(FIRST_PAGE),
            page_size: page_size.max(1),
        }
    }

    /// Build a request from raw query parameters, coercing bad input to defaults
    pub fn from_params(page: Option<&str>, page_size: Option<&str>, default_size: u32) -> Self {
        Self::new(
            parse_page_param(page, FIRST_PAGE),
            parse_page_param(page_size, default_size),
        )
    }

    /// Calculate the SQL OFFSET value
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }

    /// Get the LIMIT value (same as page_size)
    pub fn limit(&self) -> u32 {
        self.page_size
    }

    /// Window of this page over `total` items
    pub fn window(&self, total: usize) -> Result<Range<usize>, PageOutOfRange> {
        paginate(total, self.page, self.page_size)
    }
}

/// One page of query results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items in the current page
    pub items: Vec<T>,
    /// Total number of matching items across all pages
    pub total: u64,
    /// Current page number
    pub page: u32,
    /// Number of items per page
    pub page_size: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            page_size: request.page_size,
        }
    }
}
