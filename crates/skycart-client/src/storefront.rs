//! # Storefront
//!
//! The shopping session and the orchestration around it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Storefront                                                             │
//! │    open()          ── join! ──► catalogue  +  rates  ──► Session        │
//! │    refresh_rates() ─────────► rates provider ──► session.rates          │
//! │    checkout()      ─────────► Checkout ──ok──► clear cart, new stock    │
//! │                                                                         │
//! │  Session (plain value, owned by the caller)                             │
//! │    products · rates · cart · customer type · currency · seat · filter   │
//! │    engine() snapshots customer type + currency + rates for pricing      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use skycart_core::{
    categories, filter_products, Cart, CartLine, CartSummary, CategoryFilter, CoreError,
    CoreResult, Currency, CustomerType, PricingEngine, Product, ProductId, RatesSnapshot, Seat,
    StockUpdate, ValidationError,
};
use tracing::{debug, info, instrument, warn};

use crate::checkout::{Checkout, Receipt, Tender};
use crate::config::{SessionSettings, StorefrontConfig};
use crate::error::ClientResult;
use crate::http::build_client;
use crate::products::{load_catalog, ProductApi, ProductSource, StockSink};
use crate::rates::{FrankfurterRates, RatesProvider, RatesSource};

// =============================================================================
// Session
// =============================================================================

/// Everything one shopper's screen depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub products: Vec<Product>,
    pub rates: RatesSnapshot,
    pub cart: Cart,
    pub customer_type: CustomerType,
    pub currency: Currency,
    pub seat: Seat,
    pub filter: CategoryFilter,
}

impl Session {
    pub fn new(products: Vec<Product>, rates: RatesSnapshot, settings: &SessionSettings) -> Self {
        Session {
            products,
            rates,
            cart: Cart::new(),
            customer_type: settings.customer_type,
            currency: settings.currency,
            seat: settings.seat,
            filter: CategoryFilter::All,
        }
    }

    /// Pricing snapshot of the current selections.
    pub fn engine(&self) -> PricingEngine {
        PricingEngine::new(self.customer_type, self.currency, self.rates.rates)
    }

    pub fn product(&self, product_id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    // =========================================================================
    // Cart Edits
    // =========================================================================

    /// Adds one unit, refusing to go past the product's stock.
    pub fn add(&mut self, product_id: ProductId) -> CoreResult<u32> {
        let product = self.product(product_id).ok_or_else(|| unknown_product(product_id))?;
        self.cart = self.cart.try_add_one(product)?;
        Ok(self.cart.quantity(product_id))
    }

    pub fn remove(&mut self, product_id: ProductId) {
        self.cart = self.cart.remove_one(product_id);
    }

    pub fn remove_all(&mut self, product_id: ProductId) {
        self.cart = self.cart.remove_all(product_id);
    }

    pub fn clear(&mut self) {
        self.cart = self.cart.clear();
    }

    // =========================================================================
    // Views
    // =========================================================================

    pub fn visible_products(&self) -> Vec<&Product> {
        filter_products(&self.products, &self.filter)
    }

    pub fn categories(&self) -> Vec<String> {
        categories(&self.products)
    }

    pub fn lines(&self) -> Vec<CartLine> {
        self.cart.lines(&self.products, &self.engine())
    }

    pub fn summary(&self) -> CartSummary {
        self.cart.summary(&self.products, &self.engine())
    }

    /// The cart total in every supported currency.
    pub fn totals_in_all_currencies(&self) -> [(Currency, f64); 3] {
        Currency::ALL.map(|c| {
            let engine = self.engine().with_currency(c);
            (c, self.cart.grand_total(&self.products, &engine))
        })
    }

    /// Lowers cart quantities that no longer fit in stock.
    ///
    /// Returns true when the cart changed.
    pub fn clamp_cart_to_stock(&mut self) -> bool {
        let clamped = self.cart.clamp_to_stock(&self.products);
        if clamped == self.cart {
            return false;
        }
        warn!(
            before = self.cart.total_quantity(),
            after = clamped.total_quantity(),
            "Cart reduced to available stock"
        );
        self.cart = clamped;
        true
    }

    /// Writes pushed stock levels back into the local catalogue.
    pub fn apply_stock_updates(&mut self, updates: &[StockUpdate]) {
        for update in updates {
            if let Some(p) = self.products.iter_mut().find(|p| p.id == update.product_id) {
                p.stock = update.new_stock;
            }
        }
    }
}

fn unknown_product(product_id: ProductId) -> CoreError {
    ValidationError::InvalidFormat {
        field: "product_id".to_string(),
        reason: format!("no product #{} in the catalogue", product_id),
    }
    .into()
}

// =============================================================================
// Storefront
// =============================================================================

/// Remote collaborators wired together.
pub struct Storefront<A, R> {
    catalog: A,
    rates: RatesProvider<R>,
    checkout: Checkout<A>,
}

impl Storefront<ProductApi, FrankfurterRates> {
    /// Wires the HTTP collaborators from configuration, sharing one client.
    pub fn from_config(config: &StorefrontConfig) -> ClientResult<Self> {
        let client = build_client(&config.api)?;
        let api = ProductApi::new(client.clone(), config.api.products_url.clone());
        let rates = FrankfurterRates::new(client, config.api.rates_url.clone());
        Ok(Storefront::new(api, rates))
    }
}

impl<A, R> Storefront<A, R>
where
    A: ProductSource + StockSink + Clone,
    R: RatesSource,
{
    pub fn new(catalog: A, rates: R) -> Self {
        Storefront {
            checkout: Checkout::new(catalog.clone()),
            catalog,
            rates: RatesProvider::new(rates),
        }
    }

    pub fn rates(&self) -> &RatesProvider<R> {
        &self.rates
    }

    /// Fetches catalogue and rates concurrently. Never fails.
    #[instrument(skip_all)]
    pub async fn open(&self, settings: &SessionSettings) -> Session {
        let (products, rates) = tokio::join!(load_catalog(&self.catalog), self.rates.latest());
        info!(
            products = products.len(),
            rates_date = %rates.date_label(),
            "Session opened"
        );
        Session::new(products, rates, settings)
    }

    /// Re-fetches the catalogue, keeping the cart within the new stock.
    pub async fn reload_catalog(&self, session: &mut Session) {
        session.products = load_catalog(&self.catalog).await;
        session.clamp_cart_to_stock();
    }

    pub async fn refresh_rates(&self, session: &mut Session) {
        session.rates = self.rates.latest().await;
        debug!(origin = ?session.rates.origin, "Rates refreshed");
    }

    /// Pays for the session's cart.
    ///
    /// On success the cart is emptied and the pushed stock levels are applied
    /// to the local catalogue. On failure the session is left untouched.
    pub async fn checkout(&self, session: &mut Session, tender: &Tender) -> ClientResult<Receipt> {
        let receipt = self
            .checkout
            .complete(
                &session.cart,
                &session.products,
                &session.engine(),
                tender,
                session.seat,
            )
            .await?;

        session.apply_stock_updates(&receipt.stock_updates);
        session.clear();
        Ok(receipt)
    }
}
