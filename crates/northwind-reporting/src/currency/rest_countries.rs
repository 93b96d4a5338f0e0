//! REST Countries client.

use super::{CountryCurrencyService, LocalCurrency};
use async_trait::async_trait;
use northwind_core::{NorthwindError, NorthwindResult};
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

const SERVICE: &str = "restcountries";

#[derive(Debug, Deserialize)]
struct CountryDto {
    name: CountryNameDto,
    #[serde(default)]
    currencies: BTreeMap<String, CurrencyDesignation>,
    #[serde(rename = "altSpellings", default)]
    alt_spellings: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CountryNameDto {
    common: String,
    official: String,
}

#[derive(Debug, Deserialize)]
struct CurrencyDesignation {
    #[serde(default)]
    symbol: String,
}

impl CountryDto {
    fn matches(&self, country: &str) -> bool {
        self.name.common == country
            || self.name.official == country
            || self.alt_spellings.iter().any(|s| s == country)
    }
}

/// `GET {base}/name/{country}` against a REST Countries v3.1 service.
#[derive(Clone)]
pub struct RestCountriesClient {
    client: Client,
    base_url: Url,
}

impl RestCountriesClient {
    pub fn new(base_url: &str, timeout: Duration) -> NorthwindResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NorthwindError::Internal(format!("Failed to create HTTP client: {e}")))?;
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> NorthwindResult<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/')).map_err(|e| {
            NorthwindError::invalid_argument("currency.country_service_url", e.to_string())
        })?;
        Ok(Self { client, base_url })
    }

    fn country_url(&self, country: &str) -> NorthwindResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| NorthwindError::external(SERVICE, "base URL cannot hold a path"))?
            .pop_if_empty()
            .extend(["name", country]);
        Ok(url)
    }
}

impl std::fmt::Debug for RestCountriesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestCountriesClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CountryCurrencyService for RestCountriesClient {
    async fn local_currency(&self, country: &str) -> NorthwindResult<LocalCurrency> {
        let url = self.country_url(country)?;
        debug!("Looking up currency of {}", country);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| NorthwindError::external(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NorthwindError::external(
                SERVICE,
                format!("HTTP error {status} for '{country}': {body}"),
            ));
        }

        let countries: Vec<CountryDto> = response
            .json()
            .await
            .map_err(|e| NorthwindError::external(SERVICE, format!("JSON parse error: {e}")))?;

        let dto = countries
            .into_iter()
            .find(|c| c.matches(country))
            .ok_or_else(|| NorthwindError::external(SERVICE, format!("no country named '{country}'")))?;

        let (code, designation) = dto.currencies.into_iter().next().ok_or_else(|| {
            NorthwindError::external(SERVICE, format!("'{country}' has no currency"))
        })?;

        Ok(LocalCurrency {
            country_name: dto.name.official,
            currency_code: code,
            currency_symbol: designation.symbol,
        })
    }
}
