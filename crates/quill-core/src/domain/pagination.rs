use serde::{Deserialize, Serialize};

use crate::error::DomainError;

pub const DEFAULT_PAGE_LIMIT: u64 = 9;
pub const DEFAULT_RECENT_LIMIT: u64 = 50;
pub const MAX_PAGE_LIMIT: u64 = 100;

/// A validated page request: `page >= 1`, `1 <= limit <= 100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Result<Self, DomainError> {
        Self::with_default_limit(page, limit, DEFAULT_PAGE_LIMIT)
    }

    pub fn with_default_limit(
        page: Option<u64>,
        limit: Option<u64>,
        default_limit: u64,
    ) -> Result<Self, DomainError> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(default_limit);

        if page == 0 {
            return Err(DomainError::validation("page must be at least 1"));
        }
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(DomainError::validation(format!(
                "limit must be between 1 and {MAX_PAGE_LIMIT}"
            )));
        }

        Ok(Self { page, limit })
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Pagination metadata returned alongside a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(total: u64, request: PageRequest) -> Self {
        Self {
            total,
            page: request.page,
            limit: request.limit,
            total_pages: total.div_ceil(request.limit),
        }
    }
}
