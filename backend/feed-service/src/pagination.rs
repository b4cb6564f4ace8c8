//! Page-number pagination shared by every feed and listing endpoint.
//!
//! Inputs are normalized permissively: anything missing, non-numeric, or not
//! positive falls back to the defaults instead of failing the request.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Raw `pageId` / `pageSize` query parameters, kept as strings so that
/// garbage values normalize instead of rejecting the request.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page_id: Option<String>,
    pub page_size: Option<String>,
}

/// A normalized 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
}

impl PageRequest {
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: if page == 0 { DEFAULT_PAGE } else { page },
            page_size: if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size },
        }
    }

    pub fn normalize(page: Option<&str>, page_size: Option<&str>, default_page_size: u64) -> Self {
        Self {
            page: positive(page).unwrap_or(DEFAULT_PAGE),
            page_size: positive(page_size).unwrap_or_else(|| default_page_size.max(1)),
        }
    }

    pub fn from_params(params: &PageParams, default_page_size: u64) -> Self {
        Self::normalize(
            params.page_id.as_deref(),
            params.page_size.as_deref(),
            default_page_size,
        )
    }

    /// Rows to skip, clamped to what PostgreSQL accepts.
    pub fn offset(&self) -> i64 {
        let skip = (self.page - 1).saturating_mul(self.page_size);
        i64::try_from(skip).unwrap_or(i64::MAX)
    }

    pub fn limit(&self) -> i64 {
        i64::try_from(self.page_size).unwrap_or(i64::MAX)
    }

    pub fn cursor(&self, total_matches: u64) -> Cursor {
        next_page(self.page, total_matches, self.page_size)
    }
}

/// Pagination state returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cursor {
    pub has_next_page: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_id: Option<u64>,
}

/// `has_next_page = page < ceil(total / page_size)`.
///
/// Computed as `page * page_size < total`, which is the same predicate
/// without division. Zero matches never have a next page.
pub fn next_page(page: u64, total_matches: u64, page_size: u64) -> Cursor {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let has_next_page = page.saturating_mul(page_size) < total_matches;

    Cursor {
        has_next_page,
        next_page_id: has_next_page.then(|| page + 1),
    }
}
