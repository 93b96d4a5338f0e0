//! Product category transfer object.

use crate::CategoryId;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One row of `Categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ProductCategory {
    /// Store-assigned identifier; ignored on insert.
    pub id: CategoryId,

    #[validate(length(max = 15), custom(function = crate::validation::rules::not_blank))]
    pub name: String,

    pub description: Option<String>,

    /// Raw picture bytes as stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<Vec<u8>>,
}

impl ProductCategory {
    /// Creates a category that has not been stored yet.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::default(),
            name: name.into(),
            description: None,
            picture: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
