//! Command-line arguments.

use clap::{Parser, Subcommand};
use northwind_config::ReportStorage;
use rust_decimal::Decimal;

#[derive(Debug, Parser)]
#[command(name = "northwind-reports", version, about = "Northwind product reports")]
pub struct Cli {
    /// Directory holding `default.toml` and its overrides.
    #[arg(long, env = "NORTHWIND_CONFIG_DIR", default_value = "./config")]
    pub config_dir: String,

    /// Overrides `reporting.storage` (`odata` or `sql`).
    #[arg(long)]
    pub storage: Option<ReportStorage>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    #[command(flatten)]
    Report(Report),

    /// Create the Northwind schema and stored procedures.
    Migrate,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Report {
    /// Products still in release.
    CurrentProducts,
    /// The most expensive products.
    MostExpensiveProducts { count: u32 },
    /// Products cheaper than a price.
    PriceLessThanProducts { price: Decimal },
    /// Products priced between two bounds, both exclusive.
    PriceBetweenProducts { min: Decimal, max: Decimal },
    /// Products priced above the average.
    PriceAboveAverageProducts,
    /// Products with fewer units in stock than on order.
    UnitsInStockDeficit,
    /// Current products priced in each supplier's local currency.
    CurrentProductsLocalPrices,
}

impl Report {
    /// Title printed above the report rows.
    #[must_use]
    pub fn header(&self) -> String {
        match self {
            Self::CurrentProducts => "Current products".to_string(),
            Self::MostExpensiveProducts { count } => format!("{count} most expensive products"),
            Self::PriceLessThanProducts { price } => {
                format!("Products with price less than {price}")
            }
            Self::PriceBetweenProducts { min, max } => {
                format!("Products with price between {min} and {max}")
            }
            Self::PriceAboveAverageProducts => "Products with price above average".to_string(),
            Self::UnitsInStockDeficit => "Products with units in stock deficit".to_string(),
            Self::CurrentProductsLocalPrices => "Current products with local prices".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_price_between() {
        let cli = Cli::try_parse_from(["northwind-reports", "price-between-products", "10", "20.5"])
            .unwrap();
        assert_eq!(
            cli.command,
            Command::Report(Report::PriceBetweenProducts {
                min: Decimal::new(10, 0),
                max: Decimal::new(205, 1),
            })
        );
        assert_eq!(cli.storage, None);
    }

    #[test]
    fn test_parse_storage_override() {
        let cli = Cli::try_parse_from(["northwind-reports", "--storage", "sql", "current-products"])
            .unwrap();
        assert_eq!(cli.storage, Some(ReportStorage::Sql));
        assert_eq!(cli.command, Command::Report(Report::CurrentProducts));
    }

    #[test]
    fn test_rejects_non_numeric_count() {
        assert!(Cli::try_parse_from(["northwind-reports", "most-expensive-products", "ten"]).is_err());
    }

    #[test]
    fn test_headers() {
        assert_eq!(
            Report::MostExpensiveProducts { count: 10 }.header(),
            "10 most expensive products"
        );
        assert_eq!(
            Report::PriceLessThanProducts {
                price: Decimal::new(5, 0)
            }
            .header(),
            "Products with price less than 5"
        );
    }
}
