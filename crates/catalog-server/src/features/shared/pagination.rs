//! Page-based pagination for the admin list endpoints
//!
//! Countries, users and contact requests are listed one page at a time.
//! The response carries the page slice as `data` and a
//! `{"pagination": {...}}` object as `meta`.

use serde::{Deserialize, Serialize};
use serde_json::json;

pub const DEFAULT_PER_PAGE: i64 = 20;

pub const MAX_PER_PAGE: i64 = 100;

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page must be 1 or greater")]
    InvalidPage,
    #[error("per_page must be between 1 and {MAX_PER_PAGE}")]
    InvalidPerPage,
}

/// Requested page, as given by the caller
///
/// Absent values fall back to page 1 and [`DEFAULT_PER_PAGE`]. Explicit
/// out-of-range values are rejected by [`PaginationParams::validate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationParams {
    page: Option<i64>,
    per_page: Option<i64>,
}

impl PaginationParams {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self { page, per_page }
    }

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
    }

    /// Rows to skip for `OFFSET`
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.per_page()
    }

    pub fn validate(&self) -> Result<(), PaginationError> {
        if self.page.is_some_and(|page| page < 1) {
            return Err(PaginationError::InvalidPage);
        }
        if self
            .per_page
            .is_some_and(|per_page| !(1..=MAX_PER_PAGE).contains(&per_page))
        {
            return Err(PaginationError::InvalidPerPage);
        }
        Ok(())
    }
}

/// Position of a page within the full result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMetadata {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMetadata {
    pub fn new(params: &PaginationParams, total: i64) -> Self {
        let page = params.page();
        let per_page = params.per_page();
        let total = total.max(0);
        let pages = (total + per_page - 1) / per_page;

        Self {
            page,
            per_page,
            total,
            pages,
            has_next: page < pages,
            has_prev: page > 1,
        }
    }
}

/// One page of results plus its metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMetadata,
}

impl<T> Paginated<T> {
    pub fn from_items(items: Vec<T>, params: &PaginationParams, total: i64) -> Self {
        Self {
            items,
            pagination: PaginationMetadata::new(params, total),
        }
    }

    /// Split into the `data` and `meta` parts of the response envelope
    pub fn into_parts(self) -> (Vec<T>, serde_json::Value) {
        (self.items, json!({ "pagination": self.pagination }))
    }
}
