//! Runs one command against the configured backend.

use crate::cli::{Command, Report};
use crate::di::build_store_module;
use northwind_config::{AppConfig, CurrencyConfig, ReportStorage};
use northwind_core::NorthwindResult;
use northwind_reporting::{
    LocalCurrencyEnricher, ODataClient, ODataProductReportService, ProductLocalPrice, ProductPrice,
    ProductReport, ProductReportService, SqlProductReportService,
};
use rust_decimal::Decimal;
use std::io::Write;
use std::time::Duration;
use tracing::info;

/// Executes `command` and writes report lines to stdout.
pub async fn execute(config: &AppConfig, command: Command) -> NorthwindResult<()> {
    match command {
        Command::Migrate => migrate(config).await,
        Command::Report(report) => {
            let service = report_service(config).await?;
            let lines = render_report(
                service.as_ref(),
                &report,
                &config.currency,
                config.reporting.request_timeout(),
            )
            .await?;

            let mut out = std::io::stdout().lock();
            for line in lines {
                writeln!(out, "{line}")
                    .map_err(|e| northwind_core::NorthwindError::internal(e.to_string()))?;
            }
            Ok(())
        }
    }
}

async fn migrate(config: &AppConfig) -> NorthwindResult<()> {
    let module = build_store_module(&config.database).await?;
    let pool = module.pool();
    pool.health_check().await?;
    pool.run_migrations().await?;
    pool.close().await;
    Ok(())
}

/// Builds the report backend named by `reporting.storage`.
pub async fn report_service(config: &AppConfig) -> NorthwindResult<Box<dyn ProductReportService>> {
    info!(storage = %config.reporting.storage, "Selecting report backend");
    match config.reporting.storage {
        ReportStorage::OData => {
            let client =
                ODataClient::new(&config.reporting.odata_url, config.reporting.request_timeout())?;
            Ok(Box::new(ODataProductReportService::new(client)))
        }
        ReportStorage::Sql => {
            let module = build_store_module(&config.database).await?;
            module.pool().health_check().await?;
            Ok(Box::new(SqlProductReportService::new(module.store())))
        }
    }
}

/// Runs `report` and formats it: a header line, then one line per product.
///
/// Currency clients are only built for the local-price report, so the other
/// reports run without an exchange access key.
pub async fn render_report(
    service: &dyn ProductReportService,
    report: &Report,
    currency: &CurrencyConfig,
    timeout: Duration,
) -> NorthwindResult<Vec<String>> {
    let header = format!("Report - {}", report.header());
    let rows = match *report {
        Report::CurrentProducts => price_lines(service.current_products().await?),
        Report::MostExpensiveProducts { count } => {
            price_lines(service.most_expensive_products(count).await?)
        }
        Report::PriceLessThanProducts { price } => {
            price_lines(service.products_with_price_less_than(price).await?)
        }
        Report::PriceBetweenProducts { min, max } => {
            price_lines(service.products_with_price_between(min, max).await?)
        }
        Report::PriceAboveAverageProducts => {
            price_lines(service.products_with_price_above_average().await?)
        }
        Report::UnitsInStockDeficit => {
            price_lines(service.products_with_units_in_stock_deficit().await?)
        }
        Report::CurrentProductsLocalPrices => {
            let enricher = LocalCurrencyEnricher::from_config(currency, timeout)?;
            local_price_lines(service.current_products_with_local_prices(&enricher).await?)
        }
    };
    info!(rows = rows.len(), report = %report.header(), "Report complete");

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(header);
    lines.extend(rows);
    Ok(lines)
}

fn money(price: Option<Decimal>) -> String {
    price.map_or_else(|| "n/a".to_string(), |price| format!("{price:.2}"))
}

fn price_lines(report: ProductReport<ProductPrice>) -> Vec<String> {
    report
        .into_iter()
        .map(|product| format!("{}, {}", product.name, money(product.price)))
        .collect()
}

fn local_price_lines(report: ProductReport<ProductLocalPrice>) -> Vec<String> {
    report
        .into_iter()
        .map(|product| {
            format!(
                "{}, {}$, {}, {}{}",
                product.name,
                money(product.price),
                product.country,
                money(product.local_price),
                product.currency_symbol
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use northwind_dao::store::SqlValue;
    use northwind_dao::testing::FakeProcedureStore;
    use northwind_dao::StoreRow;
    use std::sync::Arc;

    fn service(store: &FakeProcedureStore) -> SqlProductReportService {
        SqlProductReportService::new(Arc::new(store.clone()))
    }

    async fn render(store: &FakeProcedureStore, report: Report) -> NorthwindResult<Vec<String>> {
        render_report(
            &service(store),
            &report,
            &CurrencyConfig::default(),
            Duration::from_secs(1),
        )
        .await
    }

    #[tokio::test]
    async fn test_price_report_lines() {
        let store = FakeProcedureStore::new();
        store.script(
            "Products_With_UnitsInStock_Deficit",
            vec![
                StoreRow::new()
                    .with("ProductName", "Gorgonzola Telino")
                    .with("UnitPrice", Decimal::new(125_000, 4)),
                StoreRow::new()
                    .with("ProductName", "Mystery Tea")
                    .with("UnitPrice", SqlValue::Null),
            ],
        );

        let lines = render(&store, Report::UnitsInStockDeficit).await.unwrap();

        assert_eq!(
            lines,
            [
                "Report - Products with units in stock deficit",
                "Gorgonzola Telino, 12.50",
                "Mystery Tea, n/a",
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_report_prints_header_only() {
        let store = FakeProcedureStore::new();
        store.script("Most_Expensive_Products", Vec::new());

        let lines = render(&store, Report::MostExpensiveProducts { count: 3 })
            .await
            .unwrap();

        assert_eq!(lines, ["Report - 3 most expensive products"]);
    }

    #[tokio::test]
    async fn test_local_prices_need_access_key() {
        let store = FakeProcedureStore::new();

        let err = render(&store, Report::CurrentProductsLocalPrices)
            .await
            .unwrap_err();

        assert_eq!(err.error_code(), "MISSING_ARGUMENT");
        assert_eq!(store.call_count(), 0);
    }

    #[test]
    fn test_local_price_line_format() {
        let lines = local_price_lines(ProductReport::new(vec![ProductLocalPrice {
            name: "Ikura".to_string(),
            price: Some(Decimal::new(31, 0)),
            country: "Japan".to_string(),
            local_price: Some(Decimal::new(46_505, 1)),
            currency_symbol: "¥".to_string(),
        }]));
        assert_eq!(lines, ["Ikura, 31.00$, Japan, 4650.50¥"]);
    }
}
