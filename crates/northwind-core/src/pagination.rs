//! Offset/limit windows for paged selects.

use crate::{NorthwindError, NorthwindResult};
use serde::{Deserialize, Serialize};

/// A validated `(offset, limit)` window over a result set.
///
/// A `limit` of zero is a valid, empty window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetLimit {
    offset: u32,
    limit: u32,
}

impl OffsetLimit {
    /// Validates raw caller input.
    ///
    /// Fails with an invalid argument error when either value is negative
    /// or does not fit a store-side `INT`.
    pub fn try_new(offset: i64, limit: i64) -> NorthwindResult<Self> {
        Ok(Self {
            offset: non_negative("offset", offset)?,
            limit: non_negative("limit", limit)?,
        })
    }

    /// Number of rows to skip.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    /// Maximum number of rows to return.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Whether the window can never contain a row.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.limit == 0
    }
}

fn non_negative(argument: &str, value: i64) -> NorthwindResult<u32> {
    if value < 0 {
        return Err(NorthwindError::invalid_argument(
            argument,
            "Must be greater than or equal to zero.",
        ));
    }
    i32::try_from(value)
        .ok()
        .and_then(|value| u32::try_from(value).ok())
        .ok_or_else(|| {
            NorthwindError::invalid_argument(argument, format!("Must not exceed {}.", i32::MAX))
        })
}
