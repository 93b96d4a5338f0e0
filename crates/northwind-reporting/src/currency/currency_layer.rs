//! currencylayer `live` endpoint client.

use super::CurrencyExchangeService;
use async_trait::async_trait;
use northwind_core::{NorthwindError, NorthwindResult};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

const SERVICE: &str = "currencylayer";

#[derive(Debug, Deserialize)]
struct LiveResponse {
    #[serde(default)]
    quotes: HashMap<String, Decimal>,
    error: Option<LiveError>,
}

#[derive(Debug, Deserialize)]
struct LiveError {
    code: i64,
    #[serde(default)]
    info: String,
}

/// `GET {base}/live?access_key=..&source=BASE`.
#[derive(Clone)]
pub struct CurrencyLayerClient {
    client: Client,
    base_url: String,
    access_key: String,
}

impl CurrencyLayerClient {
    /// Fails with `MissingArgument("currency.access_key")` when no key is configured.
    pub fn new(base_url: &str, access_key: Option<&str>, timeout: Duration) -> NorthwindResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NorthwindError::Internal(format!("Failed to create HTTP client: {e}")))?;
        Self::with_client(client, base_url, access_key)
    }

    pub fn with_client(
        client: Client,
        base_url: &str,
        access_key: Option<&str>,
    ) -> NorthwindResult<Self> {
        let access_key = access_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| NorthwindError::missing_argument("currency.access_key"))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key: access_key.to_string(),
        })
    }
}

impl std::fmt::Debug for CurrencyLayerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrencyLayerClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CurrencyExchangeService for CurrencyLayerClient {
    async fn exchange_rate(&self, base: &str, target: &str) -> NorthwindResult<Decimal> {
        if base == target {
            return Ok(Decimal::ONE);
        }
        debug!("Fetching {}/{} exchange rate", base, target);

        let response = self
            .client
            .get(format!("{}/live", self.base_url))
            .query(&[("access_key", self.access_key.as_str()), ("source", base)])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| NorthwindError::external(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NorthwindError::external(SERVICE, format!("HTTP error {status}: {body}")));
        }

        let live: LiveResponse = response
            .json()
            .await
            .map_err(|e| NorthwindError::external(SERVICE, format!("JSON parse error: {e}")))?;

        if let Some(error) = live.error {
            return Err(NorthwindError::external(
                SERVICE,
                format!("error {}: {}", error.code, error.info),
            ));
        }

        live.quotes
            .get(&format!("{base}{target}"))
            .copied()
            .ok_or_else(|| NorthwindError::external(SERVICE, format!("no quote for {base}{target}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_same_currency_needs_no_request() {
        let client =
            CurrencyLayerClient::new("http://127.0.0.1:9", Some("key"), Duration::from_millis(10))
                .unwrap();
        assert_eq!(client.exchange_rate("USD", "USD").await.unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_access_key_required() {
        for key in [None, Some(""), Some("  ")] {
            let err = CurrencyLayerClient::new("http://api.currencylayer.com", key, Duration::from_secs(1))
                .unwrap_err();
            assert_eq!(err.error_code(), "MISSING_ARGUMENT");
        }
    }
}
