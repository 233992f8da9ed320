//! Pagination types for list endpoints.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MSG_INVALID_FIELDS};
use crate::errors::{AppError, AppResult};

/// `?per=&page=` query parameters, both 1-based positive integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Items per page (capped at 100)
    #[serde(default = "default_per")]
    pub per: u64,
    #[serde(default = "default_page")]
    pub page: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_per() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    /// Reject zero page or page size, and pages whose offset the store
    /// cannot bind (SQL offsets are signed 64-bit)
    pub fn validate(self) -> AppResult<Self> {
        if self.per == 0 || self.page == 0 {
            return Err(AppError::validation(MSG_INVALID_FIELDS));
        }

        let offset = (self.page - 1).checked_mul(self.limit());
        if !matches!(offset, Some(n) if n <= i64::MAX as u64) {
            return Err(AppError::validation(MSG_INVALID_FIELDS));
        }
        Ok(self)
    }

    /// Calculate offset for database query
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit())
    }

    /// Get limit capped at maximum
    pub fn limit(&self) -> u64 {
        self.per.min(MAX_PAGE_SIZE)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            per: DEFAULT_PAGE_SIZE,
            page: DEFAULT_PAGE_NUMBER,
        }
    }
}
