//! Page/limit handling shared by every list endpoint.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Raw `?page=&limit=` query values.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    /// True when the caller asked for a page explicitly.
    pub fn is_requested(&self) -> bool {
        self.page.is_some() || self.limit.is_some()
    }

    pub fn resolve(&self) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(DEFAULT_PAGE),
            self.limit.unwrap_or(DEFAULT_LIMIT),
        )
    }
}

/// A clamped page window: `page >= 1`, `1 <= limit <= MAX_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    limit: i64,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Saturates for huge pages; SQLite then returns no rows.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub items_per_page: i64,
}

impl Pagination {
    pub fn new(request: PageRequest, total_items: i64) -> Self {
        let limit = request.limit();
        Self {
            current_page: request.page(),
            total_pages: (total_items + limit - 1) / limit,
            total_items,
            items_per_page: limit,
        }
    }
}
