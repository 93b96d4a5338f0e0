//! Reports served by stored procedures.

use crate::currency::LocalCurrencyEnricher;
use crate::report::{
    check_price_range, ProductLocalPrice, ProductPrice, ProductReport, ProductReportService,
    ProductSupplierPrice,
};
use async_trait::async_trait;
use futures::TryStreamExt;
use northwind_core::NorthwindResult;
use northwind_dao::store::{map_rows, ProcedureCall, ProcedureStore, SqlType, StoreRow};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::debug;

fn product_price(row: &StoreRow) -> NorthwindResult<ProductPrice> {
    Ok(ProductPrice {
        name: row.get("ProductName")?,
        price: row.get_opt("UnitPrice")?,
    })
}

fn product_supplier_price(row: &StoreRow) -> NorthwindResult<ProductSupplierPrice> {
    Ok(ProductSupplierPrice {
        name: row.get("ProductName")?,
        price: row.get_opt("UnitPrice")?,
        country: row.get_opt("Country")?.unwrap_or_default(),
    })
}

/// Runs each report as one stored procedure.
#[derive(Clone)]
pub struct SqlProductReportService {
    store: Arc<dyn ProcedureStore>,
}

impl SqlProductReportService {
    #[must_use]
    pub fn new(store: Arc<dyn ProcedureStore>) -> Self {
        Self { store }
    }

    async fn prices(&self, call: ProcedureCall) -> NorthwindResult<ProductReport<ProductPrice>> {
        debug!("Running report {}", call);
        let rows: Vec<ProductPrice> = map_rows(self.store.query(call), product_price)
            .try_collect()
            .await?;
        Ok(ProductReport::new(rows))
    }
}

impl std::fmt::Debug for SqlProductReportService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlProductReportService").finish_non_exhaustive()
    }
}

#[async_trait]
impl ProductReportService for SqlProductReportService {
    async fn current_products(&self) -> NorthwindResult<ProductReport<ProductPrice>> {
        self.prices(ProcedureCall::new("Products_In_Release")).await
    }

    async fn most_expensive_products(
        &self,
        count: u32,
    ) -> NorthwindResult<ProductReport<ProductPrice>> {
        self.prices(ProcedureCall::new("Most_Expensive_Products").param("Count", SqlType::Int, count))
            .await
    }

    async fn products_with_price_less_than(
        &self,
        price: Decimal,
    ) -> NorthwindResult<ProductReport<ProductPrice>> {
        self.prices(
            ProcedureCall::new("Products_With_Price_Less_Than").param("Price", SqlType::Money, price),
        )
        .await
    }

    async fn products_with_price_between(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> NorthwindResult<ProductReport<ProductPrice>> {
        check_price_range(min, max)?;
        self.prices(
            ProcedureCall::new("Products_With_Price_Restriction")
                .param("MinPrice", SqlType::Money, min)
                .param("MaxPrice", SqlType::Money, max),
        )
        .await
    }

    async fn products_with_price_above_average(
        &self,
    ) -> NorthwindResult<ProductReport<ProductPrice>> {
        self.prices(ProcedureCall::new("Products_Above_Average_Price"))
            .await
    }

    async fn products_with_units_in_stock_deficit(
        &self,
    ) -> NorthwindResult<ProductReport<ProductPrice>> {
        self.prices(ProcedureCall::new("Products_With_UnitsInStock_Deficit"))
            .await
    }

    async fn current_products_with_local_prices(
        &self,
        enricher: &LocalCurrencyEnricher,
    ) -> NorthwindResult<ProductReport<ProductLocalPrice>> {
        let call = ProcedureCall::new("Products_With_Local_Price");
        debug!("Running report {}", call);
        let rows: Vec<ProductSupplierPrice> =
            map_rows(self.store.query(call), product_supplier_price)
                .try_collect()
                .await?;
        Ok(ProductReport::new(enricher.enrich(rows).await?))
    }
}
