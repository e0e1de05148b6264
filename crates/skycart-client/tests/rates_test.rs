use httpmock::prelude::*;
use serde_json::json;
use skycart_client::{ApiSettings, FrankfurterRates, RatesProvider, RatesSource};
use skycart_core::{Currency, RatesOrigin, RatesSnapshot};

fn source(server: &MockServer) -> FrankfurterRates {
    let settings = ApiSettings {
        rates_url: server.url("/latest?from=EUR&to=USD,GBP"),
        ..ApiSettings::default()
    };
    FrankfurterRates::from_settings(&settings).unwrap()
}

fn latest_body() -> serde_json::Value {
    json!({
        "amount": 1.0,
        "base": "EUR",
        "date": "2024-05-10",
        "rates": {"GBP": 0.8589, "USD": 1.0783}
    })
}

#[tokio::test]
async fn test_fetch_live_rates() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/latest")
                .query_param("from", "EUR")
                .query_param("to", "USD,GBP");
            then.status(200).json_body(latest_body());
        })
        .await;

    let snapshot = source(&server).fetch_rates().await.unwrap();

    mock.assert_async().await;
    assert_eq!(snapshot.origin, RatesOrigin::Live);
    assert_eq!(snapshot.rates.get(Currency::Usd), 1.0783);
    assert_eq!(snapshot.rates.get(Currency::Gbp), 0.8589);
    assert_eq!(snapshot.rates.get(Currency::Eur), 1.0);
    assert_eq!(snapshot.date_label(), "2024-05-10");
}

#[tokio::test]
async fn test_provider_falls_back_when_offline() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/latest");
            then.status(500);
        })
        .await;

    let provider = RatesProvider::new(source(&server));
    let snapshot = provider.latest().await;

    assert_eq!(snapshot, RatesSnapshot::fallback());
    assert_eq!(snapshot.rates.get(Currency::Usd), 1.08);
    assert_eq!(snapshot.rates.get(Currency::Gbp), 0.86);
    assert_eq!(snapshot.date_label(), "offline");
}

#[tokio::test]
async fn test_provider_serves_cache_after_outage() {
    let server = MockServer::start_async().await;
    let mut live = server
        .mock_async(|when, then| {
            when.method(GET).path("/latest");
            then.status(200).json_body(latest_body());
        })
        .await;

    let provider = RatesProvider::new(source(&server));
    let first = provider.latest().await;
    assert_eq!(first.origin, RatesOrigin::Live);

    live.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/latest");
            then.status(502);
        })
        .await;

    let second = provider.latest().await;
    assert_eq!(second.origin, RatesOrigin::Cached);
    assert_eq!(second.rates, first.rates);
    assert_eq!(second.date_label(), "2024-05-10");
}

#[tokio::test]
async fn test_provider_rejects_malformed_table() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/latest");
            then.status(200).json_body(json!({
                "amount": 1.0,
                "base": "EUR",
                "date": "2024-05-10",
                "rates": {"USD": 1.07}
            }));
        })
        .await;

    let snapshot = RatesProvider::new(source(&server)).latest().await;
    assert_eq!(snapshot.origin, RatesOrigin::Fallback);
}
