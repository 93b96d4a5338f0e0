//! Product transfer object.

use crate::{CategoryId, ProductId, SupplierId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One row of `Products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Product {
    /// Store-assigned identifier; ignored on insert.
    pub id: ProductId,

    #[validate(length(max = 40), custom(function = crate::validation::rules::not_blank))]
    pub name: String,

    pub supplier_id: Option<SupplierId>,

    pub category_id: Option<CategoryId>,

    #[validate(length(max = 20))]
    pub quantity_per_unit: Option<String>,

    /// Money column.
    pub unit_price: Option<Decimal>,

    pub units_in_stock: Option<i16>,

    pub units_on_order: Option<i16>,

    pub reorder_level: Option<i16>,

    pub discontinued: bool,
}

impl Product {
    /// Creates a product that has not been stored yet.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ProductId::default(),
            name: name.into(),
            supplier_id: None,
            category_id: None,
            quantity_per_unit: None,
            unit_price: None,
            units_in_stock: None,
            units_on_order: None,
            reorder_level: None,
            discontinued: false,
        }
    }

    /// Sets the unit price.
    #[must_use]
    pub fn with_unit_price(mut self, price: Decimal) -> Self {
        self.unit_price = Some(price);
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
}
