//! Converts supplier-country product prices into local currency.

use super::{
    CountryCurrencyService, CurrencyExchangeService, CurrencyLayerClient, RestCountriesClient,
};
use crate::report::{ProductLocalPrice, ProductSupplierPrice};
use northwind_config::CurrencyConfig;
use northwind_core::NorthwindResult;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Adds a local price and currency symbol to each product row.
pub struct LocalCurrencyEnricher {
    countries: Arc<dyn CountryCurrencyService>,
    exchange: Arc<dyn CurrencyExchangeService>,
    base_currency: String,
}

impl LocalCurrencyEnricher {
    /// `base_currency` is the currency report prices are quoted in.
    #[must_use]
    pub fn new(
        countries: Arc<dyn CountryCurrencyService>,
        exchange: Arc<dyn CurrencyExchangeService>,
        base_currency: impl Into<String>,
    ) -> Self {
        Self {
            countries,
            exchange,
            base_currency: base_currency.into(),
        }
    }

    /// Wires the REST Countries and currencylayer clients from configuration.
    pub fn from_config(config: &CurrencyConfig, timeout: Duration) -> NorthwindResult<Self> {
        let countries = RestCountriesClient::new(&config.country_service_url, timeout)?;
        let exchange = CurrencyLayerClient::new(
            &config.exchange_service_url,
            config.access_key.as_deref(),
            timeout,
        )?;
        Ok(Self::new(
            Arc::new(countries),
            Arc::new(exchange),
            config.base_currency.clone(),
        ))
    }

    #[must_use]
    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    /// Enriches every row in order. The first failed lookup aborts the batch.
    pub async fn enrich(
        &self,
        products: Vec<ProductSupplierPrice>,
    ) -> NorthwindResult<Vec<ProductLocalPrice>> {
        info!(rows = products.len(), "Enriching product prices");

        let mut enriched = Vec::with_capacity(products.len());
        for product in products {
            enriched.push(self.enrich_one(product).await?);
        }
        Ok(enriched)
    }

    async fn enrich_one(&self, product: ProductSupplierPrice) -> NorthwindResult<ProductLocalPrice> {
        let currency = self.countries.local_currency(&product.country).await?;
        let rate = self
            .exchange
            .exchange_rate(&self.base_currency, &currency.currency_code)
            .await?;
        debug!(
            product = %product.name,
            currency = %currency.currency_code,
            %rate,
            "Resolved local currency"
        );

        Ok(ProductLocalPrice {
            local_price: product.price.map(|price| price * rate),
            name: product.name,
            price: product.price,
            country: currency.country_name,
            currency_symbol: currency.currency_symbol,
        })
    }
}

impl std::fmt::Debug for LocalCurrencyEnricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalCurrencyEnricher")
            .field("base_currency", &self.base_currency)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::{LocalCurrency, MockCountryCurrencyService, MockCurrencyExchangeService};
    use mockall::predicate::eq;
    use northwind_core::NorthwindError;
    use rust_decimal::Decimal;

    fn row(name: &str, price: Option<i64>, country: &str) -> ProductSupplierPrice {
        ProductSupplierPrice {
            name: name.to_string(),
            price: price.map(|p| Decimal::new(p, 0)),
            country: country.to_string(),
        }
    }

    fn germany() -> LocalCurrency {
        LocalCurrency {
            country_name: "Federal Republic of Germany".to_string(),
            currency_code: "EUR".to_string(),
            currency_symbol: "€".to_string(),
        }
    }

    #[tokio::test]
    async fn test_enrich_converts_each_row() {
        let mut countries = MockCountryCurrencyService::new();
        countries
            .expect_local_currency()
            .with(eq("Germany"))
            .times(2)
            .returning(|_| Ok(germany()));

        let mut exchange = MockCurrencyExchangeService::new();
        exchange
            .expect_exchange_rate()
            .with(eq("USD"), eq("EUR"))
            .times(2)
            .returning(|_, _| Ok(Decimal::new(9, 1)));

        let enricher = LocalCurrencyEnricher::new(Arc::new(countries), Arc::new(exchange), "USD");
        let enriched = enricher
            .enrich(vec![
                row("Original Frankfurter grüne Soße", Some(13), "Germany"),
                row("Thüringer Rostbratwurst", None, "Germany"),
            ])
            .await
            .unwrap();

        assert_eq!(enriched.len(), 2);
        assert_eq!(enriched[0].local_price, Some(Decimal::new(117, 1)));
        assert_eq!(enriched[0].country, "Federal Republic of Germany");
        assert_eq!(enriched[0].currency_symbol, "€");
        assert_eq!(enriched[1].price, None);
        assert_eq!(enriched[1].local_price, None);
    }

    #[tokio::test]
    async fn test_failed_lookup_aborts_batch() {
        let mut countries = MockCountryCurrencyService::new();
        countries
            .expect_local_currency()
            .with(eq("Germany"))
            .returning(|_| Ok(germany()));
        countries
            .expect_local_currency()
            .with(eq("Atlantis"))
            .returning(|_| Err(NorthwindError::external("restcountries", "HTTP error 404")));

        let mut exchange = MockCurrencyExchangeService::new();
        exchange
            .expect_exchange_rate()
            .times(1)
            .returning(|_, _| Ok(Decimal::ONE));

        let enricher = LocalCurrencyEnricher::new(Arc::new(countries), Arc::new(exchange), "USD");
        let err = enricher
            .enrich(vec![
                row("Tofu", Some(23), "Germany"),
                row("Ikura", Some(31), "Atlantis"),
                row("Konbu", Some(6), "Germany"),
            ])
            .await
            .unwrap_err();

        assert_eq!(err.error_code(), "EXTERNAL_SERVICE_ERROR");
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_lookups() {
        let enricher = LocalCurrencyEnricher::new(
            Arc::new(MockCountryCurrencyService::new()),
            Arc::new(MockCurrencyExchangeService::new()),
            "USD",
        );
        assert!(enricher.enrich(Vec::new()).await.unwrap().is_empty());
    }

    #[test]
    fn test_from_config_requires_access_key() {
        let config = CurrencyConfig {
            access_key: None,
            ..CurrencyConfig::default()
        };
        let err = LocalCurrencyEnricher::from_config(&config, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, NorthwindError::MissingArgument(ref a) if a == "currency.access_key"));
    }
}
