//! # Products API
//!
//! Catalogue source and stock-update sink backed by a json-server style API.
//!
//! ```text
//! ┌──────────────┐   GET   {base}/products        ┌──────────────────────┐
//! │  ProductApi  │ ──────────────────────────────►│   products API       │
//! │              │   PATCH {base}/products/{id}   │                      │
//! │              │ ──────────────────────────────►│   {"stock": n}       │
//! └──────────────┘                                └──────────────────────┘
//! ```
//!
//! Records that do not decode, fail [`validate_product`] or repeat an earlier
//! id are dropped with a warning instead of failing the whole catalogue.

use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use skycart_core::validation::validate_product;
use skycart_core::{Product, ProductId};
use tracing::{debug, info, instrument, warn};

use crate::config::ApiSettings;
use crate::error::{ClientError, ClientResult};
use crate::http::{build_client, ensure_success, join_url, read_json};

// =============================================================================
// Traits
// =============================================================================

/// Anything that can list the catalogue.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch_products(&self) -> ClientResult<Vec<Product>>;
}

/// Anything that can record a product's new stock level.
#[async_trait]
pub trait StockSink: Send + Sync {
    async fn update_stock(&self, product_id: ProductId, new_stock: u32) -> ClientResult<()>;
}

/// Fetches the catalogue, degrading to an empty list on any failure.
#[instrument(skip(source))]
pub async fn load_catalog<S: ProductSource + ?Sized>(source: &S) -> Vec<Product> {
    match source.fetch_products().await {
        Ok(products) => products,
        Err(e) => {
            warn!(error = %e, "Catalogue unavailable, showing no products");
            Vec::new()
        }
    }
}

// =============================================================================
// HTTP Implementation
// =============================================================================

#[derive(Debug, Serialize)]
struct StockPatch {
    stock: u32,
}

/// Products API client.
#[derive(Debug, Clone)]
pub struct ProductApi {
    client: Client,
    base_url: String,
}

impl ProductApi {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        ProductApi {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn from_settings(settings: &ApiSettings) -> ClientResult<Self> {
        Ok(Self::new(build_client(settings)?, settings.products_url.clone()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Decodes each record on its own so one bad record does not sink the list.
///
/// Ids are unique in the result; a later record reusing an id is dropped.
fn decode_products(records: Vec<Value>) -> Vec<Product> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter_map(|record| {
            let product: Product = match serde_json::from_value(record) {
                Ok(p) => p,
                Err(e) => {
                    warn!(error = %e, "Dropping undecodable product record");
                    return None;
                }
            };
            if let Err(e) = validate_product(&product) {
                warn!(product_id = product.id, error = %e, "Dropping invalid product");
                return None;
            }
            if !seen.insert(product.id) {
                warn!(
                    product_id = product.id,
                    name = %product.name,
                    "Dropping product with duplicate id"
                );
                return None;
            }
            Some(product)
        })
        .collect()
}

#[async_trait]
impl ProductSource for ProductApi {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_products(&self) -> ClientResult<Vec<Product>> {
        let url = join_url(&self.base_url, "products");
        debug!(url = %url, "Fetching products");

        let response = self.client.get(&url).send().await?;
        let records: Vec<Value> = read_json(response).await?;
        let total = records.len();
        let products = decode_products(records);

        info!(count = products.len(), dropped = total - products.len(), "Fetched products");
        Ok(products)
    }
}

#[async_trait]
impl StockSink for ProductApi {
    #[instrument(skip(self))]
    async fn update_stock(&self, product_id: ProductId, new_stock: u32) -> ClientResult<()> {
        let url = join_url(&self.base_url, &format!("products/{}", product_id));

        let result = async {
            let response = self
                .client
                .patch(&url)
                .json(&StockPatch { stock: new_stock })
                .send()
                .await?;
            ensure_success(response)?;
            Ok::<(), ClientError>(())
        }
        .await;

        result.map_err(|e| {
            warn!(error = %e, "Stock update rejected");
            ClientError::StockUpdateFailed {
                product_id,
                reason: e.to_string(),
            }
        })?;

        debug!("Stock updated");
        Ok(())
    }
}
