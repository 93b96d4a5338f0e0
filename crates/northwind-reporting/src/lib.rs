//! # Northwind Reporting
//!
//! Read-only product reports. The same [`ProductReportService`] contract is
//! served either from an OData feed ([`ODataProductReportService`]) or from
//! stored procedures ([`SqlProductReportService`]).
//!
//! OData results arrive in pages; [`follow_continuations`] turns a paged
//! query into one lazy stream. The local-price report additionally runs
//! every row through a [`LocalCurrencyEnricher`].

pub mod continuation;
pub mod currency;
pub mod odata;
pub mod report;
pub mod service;

pub use continuation::{follow_continuations, ContinuationToken, PagedQuery, QueryPage};
pub use currency::{
    CountryCurrencyService, CurrencyExchangeService, CurrencyLayerClient, LocalCurrency,
    LocalCurrencyEnricher, RestCountriesClient,
};
pub use odata::{ODataClient, ODataQuery, QueryOptions};
pub use report::{
    ProductLocalPrice, ProductPrice, ProductReport, ProductReportService, ProductSupplierPrice,
};
pub use service::{ODataProductReportService, SqlProductReportService};
