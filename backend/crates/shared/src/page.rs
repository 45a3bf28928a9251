//! Pagination primitives
//!
//! Page-number pagination shared by every list endpoint. Pages are 1-based;
//! a page past the end of the collection yields an empty result set, never
//! an error.

use serde::{Deserialize, Serialize};

/// Default page size when a service does not configure one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

fn default_page() -> u32 {
    1
}

/// Query-string pagination parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    /// 1-based page number. Values below 1 are clamped to 1.
    #[serde(default = "default_page")]
    pub page: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self { page: 1 }
    }
}

impl PageParams {
    pub fn new(page: u32) -> Self {
        Self { page }
    }

    /// Page number clamped to the valid range.
    #[inline]
    pub fn page(&self) -> u32 {
        self.page.max(1)
    }

    /// SQL OFFSET for the given page size.
    #[inline]
    pub fn offset(&self, page_size: u32) -> i64 {
        i64::from(self.page() - 1) * i64::from(page_size)
    }

    /// SQL LIMIT for the given page size.
    #[inline]
    pub fn limit(&self, page_size: u32) -> i64 {
        i64::from(page_size)
    }
}

/// One page of results plus collection metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    /// Total number of matching records (across all pages)
    pub count: i64,
    /// The page that was requested
    pub page: u32,
    /// Configured page size
    pub page_size: u32,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(count: i64, params: PageParams, page_size: u32, results: Vec<T>) -> Self {
        Self {
            count,
            page: params.page(),
            page_size,
            results,
        }
    }

    /// Map the items while keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            count: self.count,
            page: self.page,
            page_size: self.page_size,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}
