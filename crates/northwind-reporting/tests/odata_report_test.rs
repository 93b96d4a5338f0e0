//! OData report tests against a mock feed.

use northwind_reporting::{
    CurrencyLayerClient, LocalCurrencyEnricher, ODataClient, ODataProductReportService,
    ProductReportService, RestCountriesClient,
};
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service(server: &MockServer) -> ODataProductReportService {
    let client = ODataClient::new(&format!("{}/odata", server.uri()), Duration::from_secs(5))
        .expect("client");
    ODataProductReportService::new(client)
}

fn product(name: &str, price: f64) -> serde_json::Value {
    json!({ "ProductName": name, "UnitPrice": price })
}

#[tokio::test]
async fn test_current_products_follow_next_links() {
    let server = MockServer::start().await;
    let next = |token: u32| format!("{}/odata/Products?$skiptoken={token}", server.uri());

    Mock::given(method("GET"))
        .and(path("/odata/Products"))
        .and(query_param("$filter", "Discontinued eq false"))
        .and(query_param("$orderby", "ProductName"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [product("Alice Mutton", 39.0), product("Aniseed Syrup", 10.0)],
            "@odata.nextLink": next(2)
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/odata/Products"))
        .and(query_param("$skiptoken", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [product("Boston Crab Meat", 18.4), product("Camembert Pierrot", 34.0)],
            "@odata.nextLink": next(4)
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/odata/Products"))
        .and(query_param("$skiptoken", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{ "ProductName": "Chai", "UnitPrice": null }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let report = service(&server).current_products().await.expect("report");

    let names: Vec<&str> = report.products().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "Alice Mutton",
            "Aniseed Syrup",
            "Boston Crab Meat",
            "Camembert Pierrot",
            "Chai"
        ]
    );
    assert_eq!(report.products()[2].price, Some(Decimal::new(184, 1)));
    assert_eq!(report.products()[4].price, None);
}

#[tokio::test]
async fn test_most_expensive_products_sends_top() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/odata/Products"))
        .and(query_param("$top", "2"))
        .and(query_param("$orderby", "UnitPrice desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [product("Côte de Blaye", 263.5), product("Thüringer Rostbratwurst", 123.79)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let report = service(&server)
        .most_expensive_products(2)
        .await
        .expect("report");

    assert_eq!(report.len(), 2);
    assert_eq!(report.products()[0].name, "Côte de Blaye");
}

#[tokio::test]
async fn test_feed_error_is_external_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/odata/Products_Above_Average_Prices"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = service(&server)
        .products_with_price_above_average()
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "EXTERNAL_SERVICE_ERROR");
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn test_local_prices_skip_products_without_supplier() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/odata/Products"))
        .and(query_param("$filter", "Discontinued eq false and SupplierID ne null"))
        .and(query_param("$expand", "Supplier($select=Country)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                { "ProductName": "Chai", "UnitPrice": 18.0, "Supplier": { "Country": "UK" } },
                { "ProductName": "Chang", "UnitPrice": 19.0, "Supplier": null }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3.1/name/UK"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "name": { "common": "United Kingdom", "official": "United Kingdom" },
            "currencies": { "GBP": { "name": "British pound", "symbol": "£" } },
            "altSpellings": ["GB", "UK"]
        }])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/live"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "quotes": { "USDGBP": 0.5 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let timeout = Duration::from_secs(5);
    let enricher = LocalCurrencyEnricher::new(
        Arc::new(RestCountriesClient::new(&format!("{}/v3.1", server.uri()), timeout).expect("client")),
        Arc::new(CurrencyLayerClient::new(&server.uri(), Some("secret"), timeout).expect("client")),
        "USD",
    );

    let report = service(&server)
        .current_products_with_local_prices(&enricher)
        .await
        .expect("report");

    assert_eq!(report.len(), 1);
    let chai = &report.products()[0];
    assert_eq!(chai.name, "Chai");
    assert_eq!(chai.country, "United Kingdom");
    assert_eq!(chai.currency_symbol, "£");
    assert_eq!(chai.local_price.map(|p| p.normalize()), Some(Decimal::new(9, 0)));
}
