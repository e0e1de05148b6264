use httpmock::prelude::*;
use httpmock::Method::PATCH;
use serde_json::json;
use skycart_client::{load_catalog, ApiSettings, ClientError, ProductApi, ProductSource, StockSink};

fn api(server: &MockServer) -> ProductApi {
    let settings = ApiSettings {
        products_url: server.base_url(),
        ..ApiSettings::default()
    };
    ProductApi::from_settings(&settings).unwrap()
}

#[tokio::test]
async fn test_fetch_products_drops_invalid_records() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/products");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!([
                    {"id": 1, "name": "Still Water", "price": 3.0, "image": "https://img/1.png", "stock": 12, "category": "Drinks"},
                    {"id": 2, "name": "Club Sandwich", "price": 9.5, "image": "https://img/2.png", "stock": 4, "category": "Food"},
                    {"id": 3, "name": "Mystery"},
                    {"id": 4, "name": "Bad price", "price": -2.0, "image": "", "stock": 1, "category": "Food"}
                ]));
        })
        .await;

    let products = api(&server).fetch_products().await.unwrap();

    mock.assert_async().await;
    let ids: Vec<u64> = products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(products[1].name, "Club Sandwich");
    assert_eq!(products[1].stock, 4);
}

#[tokio::test]
async fn test_fetch_products_error_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/products");
            then.status(503);
        })
        .await;

    let err = api(&server).fetch_products().await.unwrap_err();
    assert!(matches!(err, ClientError::UnexpectedStatus { status: 503, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_load_catalog_degrades_to_empty() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/products");
            then.status(200).body("not json");
        })
        .await;

    let products = load_catalog(&api(&server)).await;
    assert!(products.is_empty());
}

#[tokio::test]
async fn test_update_stock_patches_product() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/products/7")
                .json_body(json!({"stock": 3}));
            then.status(200).json_body(json!({"id": 7, "stock": 3}));
        })
        .await;

    api(&server).update_stock(7, 3).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_update_stock_failure_names_product() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PATCH).path("/products/9");
            then.status(404);
        })
        .await;

    let err = api(&server).update_stock(9, 0).await.unwrap_err();
    match err {
        ClientError::StockUpdateFailed { product_id, reason } => {
            assert_eq!(product_id, 9);
            assert!(reason.contains("404"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
