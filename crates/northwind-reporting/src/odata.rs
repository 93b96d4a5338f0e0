//! Minimal OData v4 JSON client.
//!
//! Queries are plain GETs with `$filter`, `$orderby`, `$top`, `$select`
//! and `$expand` options. A response carries its rows in `value` and, when
//! the server truncated the result, the next page's address in
//! `@odata.nextLink`, which becomes the continuation token.

use crate::continuation::{ContinuationToken, PagedQuery, QueryPage};
use async_trait::async_trait;
use northwind_core::{NorthwindError, NorthwindResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::marker::PhantomData;
use std::time::Duration;
use tracing::debug;
use url::Url;

const SERVICE: &str = "odata";

/// System query options for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    filter: Option<String>,
    order_by: Option<String>,
    top: Option<u32>,
    select: Option<String>,
    expand: Option<String>,
}

impl QueryOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    #[must_use]
    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    #[must_use]
    pub fn top(mut self, top: u32) -> Self {
        self.top = Some(top);
        self
    }

    #[must_use]
    pub fn select(mut self, select: impl Into<String>) -> Self {
        self.select = Some(select.into());
        self
    }

    #[must_use]
    pub fn expand(mut self, expand: impl Into<String>) -> Self {
        self.expand = Some(expand.into());
        self
    }

    fn apply(&self, url: &mut Url) {
        let mut pairs = url.query_pairs_mut();
        if let Some(filter) = &self.filter {
            pairs.append_pair("$filter", filter);
        }
        if let Some(order_by) = &self.order_by {
            pairs.append_pair("$orderby", order_by);
        }
        if let Some(top) = self.top {
            pairs.append_pair("$top", &top.to_string());
        }
        if let Some(select) = &self.select {
            pairs.append_pair("$select", select);
        }
        if let Some(expand) = &self.expand {
            pairs.append_pair("$expand", expand);
        }
    }
}

#[derive(Deserialize)]
struct ODataPage<T> {
    value: Vec<T>,
    #[serde(rename = "@odata.nextLink", alias = "odata.nextLink", default)]
    next_link: Option<String>,
}

/// Client bound to one OData service root.
#[derive(Clone)]
pub struct ODataClient {
    client: Client,
    service_root: Url,
}

impl ODataClient {
    /// Creates a client for the service at `service_root`.
    pub fn new(service_root: &str, timeout: Duration) -> NorthwindResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NorthwindError::Internal(format!("Failed to create HTTP client: {e}")))?;
        Self::with_client(client, service_root)
    }

    /// Creates a client with a preconfigured HTTP client.
    pub fn with_client(client: Client, service_root: &str) -> NorthwindResult<Self> {
        if service_root.trim().is_empty() {
            return Err(NorthwindError::missing_argument("reporting.odata_url"));
        }
        let service_root = Url::parse(&format!("{}/", service_root.trim_end_matches('/')))
            .map_err(|e| NorthwindError::invalid_argument("reporting.odata_url", e.to_string()))?;
        Ok(Self {
            client,
            service_root,
        })
    }

    #[must_use]
    pub fn service_root(&self) -> &Url {
        &self.service_root
    }

    /// Builds a paged query over `entity_set`.
    pub fn query<T>(&self, entity_set: &str, options: &QueryOptions) -> NorthwindResult<ODataQuery<T>> {
        let mut url = self
            .service_root
            .join(entity_set)
            .map_err(|e| NorthwindError::invalid_argument("entity_set", e.to_string()))?;
        options.apply(&mut url);
        Ok(ODataQuery {
            client: self.clone(),
            first: url,
            _rows: PhantomData,
        })
    }

    async fn get_page<T: DeserializeOwned>(&self, url: Url) -> NorthwindResult<QueryPage<T>> {
        debug!("OData GET {}", url);

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| NorthwindError::external(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NorthwindError::external(
                SERVICE,
                format!("HTTP error {status}: {body}"),
            ));
        }

        let page: ODataPage<T> = response
            .json()
            .await
            .map_err(|e| NorthwindError::external(SERVICE, format!("JSON parse error: {e}")))?;

        Ok(QueryPage {
            items: page.value,
            continuation: page.next_link.map(ContinuationToken::new),
        })
    }

    /// Resolves a next link against the service root, refusing links that
    /// point outside it.
    fn resolve(&self, token: &ContinuationToken) -> NorthwindResult<Url> {
        let url = self
            .service_root
            .join(token.as_str())
            .map_err(|e| NorthwindError::external(SERVICE, format!("invalid continuation: {e}")))?;
        if !url.as_str().starts_with(self.service_root.as_str()) {
            return Err(NorthwindError::external(
                SERVICE,
                format!("continuation {url} is outside {}", self.service_root),
            ));
        }
        Ok(url)
    }
}

impl std::fmt::Debug for ODataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ODataClient")
            .field("service_root", &self.service_root.as_str())
            .finish_non_exhaustive()
    }
}

/// One OData query; feeds [`crate::follow_continuations`].
pub struct ODataQuery<T> {
    client: ODataClient,
    first: Url,
    _rows: PhantomData<fn() -> T>,
}

impl<T> ODataQuery<T> {
    /// Address of the first page.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.first
    }
}

#[async_trait]
impl<T> PagedQuery<T> for ODataQuery<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn first_page(&self) -> NorthwindResult<QueryPage<T>> {
        self.client.get_page(self.first.clone()).await
    }

    async fn next_page(&self, token: &ContinuationToken) -> NorthwindResult<QueryPage<T>> {
        let url = self.client.resolve(token)?;
        self.client.get_page(url).await
    }
}
