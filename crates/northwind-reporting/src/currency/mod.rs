//! Country currency and exchange-rate services.
//!
//! Both are remote boundaries; the reports only see the traits.

mod currency_layer;
mod enricher;
mod rest_countries;

pub use currency_layer::CurrencyLayerClient;
pub use enricher::LocalCurrencyEnricher;
pub use rest_countries::RestCountriesClient;

use async_trait::async_trait;
use northwind_core::NorthwindResult;
use rust_decimal::Decimal;

/// The currency used in one country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalCurrency {
    /// Official country name.
    pub country_name: String,
    /// ISO 4217 code, e.g. `EUR`.
    pub currency_code: String,
    pub currency_symbol: String,
}

/// Resolves a country name to its local currency.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CountryCurrencyService: Send + Sync {
    /// `country` may be a common name, official name or alternative spelling.
    async fn local_currency(&self, country: &str) -> NorthwindResult<LocalCurrency>;
}

/// Looks up currency exchange rates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CurrencyExchangeService: Send + Sync {
    /// Units of `target` per one unit of `base`.
    async fn exchange_rate(&self, base: &str, target: &str) -> NorthwindResult<Decimal>;
}
