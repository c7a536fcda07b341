//! The skip/limit window of the case list.

use crate::error::CoreError;

/// Cases per page when the request names no limit.
pub const DEFAULT_LIMIT: i64 = 50;

/// Largest page served; larger requests are cut down to it.
pub const MAX_LIMIT: i64 = 500;

/// A validated `skip`/`limit` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: i64,
    pub limit: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Page {
    /// Build a page from raw query values.
    ///
    /// A negative `skip` or a `limit` below one is rejected. A `limit` above
    /// [`MAX_LIMIT`] is served as [`MAX_LIMIT`].
    pub fn new(skip: Option<i64>, limit: Option<i64>) -> Result<Self, CoreError> {
        let skip = skip.unwrap_or(0);
        if skip < 0 {
            return Err(CoreError::Validation(format!(
                "skip must not be negative, got {skip}"
            )));
        }
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if limit < 1 {
            return Err(CoreError::Validation(format!(
                "limit must be at least 1, got {limit}"
            )));
        }
        Ok(Self {
            skip,
            limit: limit.min(MAX_LIMIT),
        })
    }

    /// Whether rows remain past this page out of `total` matches.
    pub fn has_more(&self, total: i64) -> bool {
        self.skip.saturating_add(self.limit) < total
    }
}
