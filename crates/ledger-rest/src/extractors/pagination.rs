//! Pagination extractor.

use ledger_core::{LedgerError, PageRequest};
use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters for pagination.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// Page number, starting at 0.
    #[serde(default)]
    pub page: Option<usize>,
    /// Page size, at least 1; larger values are capped.
    #[serde(default)]
    pub size: Option<usize>,
}

impl TryFrom<PaginationQuery> for PageRequest {
    type Error = LedgerError;

    fn try_from(query: PaginationQuery) -> Result<Self, Self::Error> {
        let size = query.size.unwrap_or(PageRequest::DEFAULT_SIZE);
        if size == 0 {
            return Err(LedgerError::invalid_parameter(
                "size: Page size must be at least 1",
            ));
        }
        let request = PageRequest::new(query.page.unwrap_or(0), size);
        if request.checked_offset().is_none() {
            return Err(LedgerError::invalid_parameter(
                "page: Page number is out of range",
            ));
        }
        Ok(request)
    }
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: Some(0),
            size: Some(PageRequest::DEFAULT_SIZE),
        }
    }
}
