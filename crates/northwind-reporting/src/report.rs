//! Product report contracts.

use crate::currency::LocalCurrencyEnricher;
use async_trait::async_trait;
use northwind_core::{NorthwindError, NorthwindResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product name with its unit price. An unpriced product keeps `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPrice {
    pub name: String,
    pub price: Option<Decimal>,
}

/// A product price together with the supplier's country, before enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSupplierPrice {
    pub name: String,
    pub price: Option<Decimal>,
    pub country: String,
}

/// A product price converted into the supplier country's currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLocalPrice {
    pub name: String,
    pub price: Option<Decimal>,
    /// Official country name.
    pub country: String,
    pub local_price: Option<Decimal>,
    pub currency_symbol: String,
}

/// Rows of one report, in the order the store returned them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductReport<T> {
    products: Vec<T>,
}

impl<T> ProductReport<T> {
    #[must_use]
    pub fn new(products: Vec<T>) -> Self {
        Self { products }
    }

    #[must_use]
    pub fn products(&self) -> &[T] {
        &self.products
    }

    #[must_use]
    pub fn into_products(self) -> Vec<T> {
        self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl<T> IntoIterator for ProductReport<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ProductReport<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}

/// Product reports, independent of where the data lives.
#[async_trait]
pub trait ProductReportService: Send + Sync {
    /// Products still in release, by name.
    async fn current_products(&self) -> NorthwindResult<ProductReport<ProductPrice>>;

    /// The `count` most expensive priced products, most expensive first.
    async fn most_expensive_products(&self, count: u32)
        -> NorthwindResult<ProductReport<ProductPrice>>;

    /// Products priced strictly below `price`.
    async fn products_with_price_less_than(
        &self,
        price: Decimal,
    ) -> NorthwindResult<ProductReport<ProductPrice>>;

    /// Products priced strictly between `min` and `max`.
    ///
    /// `min > max` is an invalid argument.
    async fn products_with_price_between(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> NorthwindResult<ProductReport<ProductPrice>>;

    /// Products priced above the average unit price.
    async fn products_with_price_above_average(&self)
        -> NorthwindResult<ProductReport<ProductPrice>>;

    /// Products with fewer units in stock than on order.
    async fn products_with_units_in_stock_deficit(
        &self,
    ) -> NorthwindResult<ProductReport<ProductPrice>>;

    /// Current products with prices in each supplier country's currency.
    ///
    /// Every row is fetched first; one failed currency lookup fails the report.
    async fn current_products_with_local_prices(
        &self,
        enricher: &LocalCurrencyEnricher,
    ) -> NorthwindResult<ProductReport<ProductLocalPrice>>;
}

pub(crate) fn check_price_range(min: Decimal, max: Decimal) -> NorthwindResult<()> {
    if min > max {
        return Err(NorthwindError::invalid_argument(
            "min",
            format!("Must not exceed max ({max})."),
        ));
    }
    Ok(())
}
