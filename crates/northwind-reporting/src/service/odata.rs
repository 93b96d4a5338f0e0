//! Reports served from an OData v4 Northwind feed.

use crate::continuation::follow_continuations;
use crate::currency::LocalCurrencyEnricher;
use crate::odata::{ODataClient, QueryOptions};
use crate::report::{
    check_price_range, ProductLocalPrice, ProductPrice, ProductReport, ProductReportService,
    ProductSupplierPrice,
};
use async_trait::async_trait;
use futures::TryStreamExt;
use northwind_core::NorthwindResult;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

const PRODUCTS: &str = "Products";
const ABOVE_AVERAGE: &str = "Products_Above_Average_Prices";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ODataProduct {
    product_name: String,
    unit_price: Option<Decimal>,
}

impl From<ODataProduct> for ProductPrice {
    fn from(row: ODataProduct) -> Self {
        Self {
            name: row.product_name,
            price: row.unit_price,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ODataSupplier {
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ODataProductWithSupplier {
    product_name: String,
    unit_price: Option<Decimal>,
    supplier: Option<ODataSupplier>,
}

impl ODataProductWithSupplier {
    /// Rows without a supplier country have no local currency to price in.
    fn into_supplier_price(self) -> Option<ProductSupplierPrice> {
        let country = self.supplier?.country?;
        Some(ProductSupplierPrice {
            name: self.product_name,
            price: self.unit_price,
            country,
        })
    }
}

/// Runs each report as an OData query and follows every next link.
#[derive(Debug, Clone)]
pub struct ODataProductReportService {
    client: ODataClient,
}

impl ODataProductReportService {
    #[must_use]
    pub fn new(client: ODataClient) -> Self {
        Self { client }
    }

    async fn collect<R, T>(&self, entity_set: &str, options: QueryOptions) -> NorthwindResult<Vec<T>>
    where
        R: for<'de> Deserialize<'de> + Send + 'static,
        T: From<R>,
    {
        let query = Arc::new(self.client.query::<R>(entity_set, &options)?);
        debug!("Running OData report {}", query.url());
        let rows: Vec<R> = follow_continuations(query).try_collect().await?;
        Ok(rows.into_iter().map(T::from).collect())
    }

    async fn prices(
        &self,
        entity_set: &str,
        options: QueryOptions,
    ) -> NorthwindResult<ProductReport<ProductPrice>> {
        let rows = self.collect::<ODataProduct, _>(entity_set, options).await?;
        Ok(ProductReport::new(rows))
    }
}

fn current() -> QueryOptions {
    QueryOptions::new()
        .filter("Discontinued eq false")
        .order_by("ProductName")
}

#[async_trait]
impl ProductReportService for ODataProductReportService {
    async fn current_products(&self) -> NorthwindResult<ProductReport<ProductPrice>> {
        self.prices(PRODUCTS, current()).await
    }

    async fn most_expensive_products(
        &self,
        count: u32,
    ) -> NorthwindResult<ProductReport<ProductPrice>> {
        let options = QueryOptions::new()
            .filter("UnitPrice ne null")
            .order_by("UnitPrice desc")
            .top(count);
        self.prices(PRODUCTS, options).await
    }

    async fn products_with_price_less_than(
        &self,
        price: Decimal,
    ) -> NorthwindResult<ProductReport<ProductPrice>> {
        let options = QueryOptions::new()
            .filter(format!("UnitPrice lt {price}"))
            .order_by("ProductName");
        self.prices(PRODUCTS, options).await
    }

    async fn products_with_price_between(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> NorthwindResult<ProductReport<ProductPrice>> {
        check_price_range(min, max)?;
        let options = QueryOptions::new()
            .filter(format!("UnitPrice gt {min} and UnitPrice lt {max}"))
            .order_by("ProductName");
        self.prices(PRODUCTS, options).await
    }

    async fn products_with_price_above_average(
        &self,
    ) -> NorthwindResult<ProductReport<ProductPrice>> {
        self.prices(ABOVE_AVERAGE, QueryOptions::new().order_by("UnitPrice"))
            .await
    }

    async fn products_with_units_in_stock_deficit(
        &self,
    ) -> NorthwindResult<ProductReport<ProductPrice>> {
        let options = QueryOptions::new()
            .filter("UnitsInStock lt UnitsOnOrder")
            .order_by("ProductName");
        self.prices(PRODUCTS, options).await
    }

    async fn current_products_with_local_prices(
        &self,
        enricher: &LocalCurrencyEnricher,
    ) -> NorthwindResult<ProductReport<ProductLocalPrice>> {
        let options = QueryOptions::new()
            .filter("Discontinued eq false and SupplierID ne null")
            .order_by("ProductName")
            .expand("Supplier($select=Country)");
        let rows: Vec<ODataProductWithSupplier> = self.collect(PRODUCTS, options).await?;
        let priced: Vec<ProductSupplierPrice> = rows
            .into_iter()
            .filter_map(ODataProductWithSupplier::into_supplier_price)
            .collect();
        Ok(ProductReport::new(enricher.enrich(priced).await?))
    }
}
