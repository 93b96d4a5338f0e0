//! Outcome of a by-identifier lookup.
//!
//! A lookup that finds nothing is an expected result, so it is modelled as a
//! variant instead of an error. Callers that would rather bubble it up use
//! [`Lookup::into_result`].

use crate::{NorthwindError, NorthwindResult};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use thiserror::Error;

/// The kind of entity a lookup addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Product,
    ProductCategory,
    Employee,
}

impl EntityKind {
    /// Human-readable entity name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Product => "Product",
            Self::ProductCategory => "Product category",
            Self::Employee => "Employee",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// No row matched the requested identifier.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[error("{kind} with id {id} not found")]
pub struct EntityNotFound {
    pub kind: EntityKind,
    pub id: i32,
}

impl EntityNotFound {
    #[must_use]
    pub const fn new(kind: EntityKind, id: i32) -> Self {
        Self { kind, id }
    }
}

/// Result of a lookup by identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// Exactly one matching row.
    Found(T),
    /// Zero rows matched.
    NotFound(EntityNotFound),
}

impl<T> Lookup<T> {
    /// Returns the found value, discarding the not-found details.
    #[must_use]
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound(_) => None,
        }
    }

    /// Whether a row matched.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Converts not-found into [`NorthwindError::NotFound`].
    pub fn into_result(self) -> NorthwindResult<T> {
        match self {
            Self::Found(value) => Ok(value),
            Self::NotFound(missing) => Err(NorthwindError::NotFound(missing)),
        }
    }

    /// Maps the found value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Self::Found(value) => Lookup::Found(f(value)),
            Self::NotFound(missing) => Lookup::NotFound(missing),
        }
    }
}
