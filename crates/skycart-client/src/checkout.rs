//! # Checkout
//!
//! Turns a cart into a paid order.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Checkout::complete                             │
//! │                                                                         │
//! │  1. Price lines with ONE engine snapshot     (empty → EmptyCart)        │
//! │     every quantity must fit in stock         (else InsufficientStock)   │
//! │  2. Validate the tender                                                 │
//! │       Cash: tendered ≥ total and tendered > 0 → change                  │
//! │       Card: number / expiry / cvv / name                                │
//! │  3. Push max(stock - qty, 0) for every line, concurrently               │
//! │       any failure → error, caller keeps the cart                        │
//! │  4. Issue a Receipt                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};
use skycart_core::validation::{validate_card, validate_cash_tender};
use skycart_core::{
    Cart, CardDetails, CartLine, CoreError, CustomerType, Money, PaymentMethod, PricingEngine,
    Product, Seat, StockUpdate,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::ClientResult;
use crate::products::StockSink;

// =============================================================================
// Tender
// =============================================================================

/// What the customer hands over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Tender {
    /// Cash in the display currency.
    Cash { tendered: f64 },
    Card(CardDetails),
}

impl Tender {
    pub fn method(&self) -> PaymentMethod {
        match self {
            Tender::Cash { .. } => PaymentMethod::Cash,
            Tender::Card(_) => PaymentMethod::Card,
        }
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// Proof of a completed checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub seat: Seat,
    pub customer_type: CustomerType,
    pub lines: Vec<CartLine>,
    pub total: Money,
    pub method: PaymentMethod,
    /// Change handed back, cash only.
    pub change: Option<Money>,
    pub card_last_four: Option<String>,
    /// Stock levels pushed for this order.
    pub stock_updates: Vec<StockUpdate>,
}

// =============================================================================
// Checkout
// =============================================================================

/// Runs checkouts against a stock sink.
#[derive(Debug, Clone)]
pub struct Checkout<K> {
    sink: K,
}

impl<K: StockSink> Checkout<K> {
    pub fn new(sink: K) -> Self {
        Checkout { sink }
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Validates payment, records the new stock levels and issues a receipt.
    ///
    /// Nothing is mutated on failure; the cart is the caller's to keep.
    #[instrument(skip_all, fields(seat = %seat, method = %tender.method()))]
    pub async fn complete(
        &self,
        cart: &Cart,
        products: &[Product],
        engine: &PricingEngine,
        tender: &Tender,
        seat: Seat,
    ) -> ClientResult<Receipt> {
        let lines = cart.lines(products, engine);
        if lines.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        if let Some((product, requested)) = cart.over_stock(products) {
            warn!(
                product_id = product.id,
                available = product.stock,
                requested,
                "Checkout refused, cart exceeds stock"
            );
            return Err(CoreError::InsufficientStock {
                product_id: product.id,
                name: product.name.clone(),
                available: product.stock,
                requested,
            }
            .into());
        }

        let total = cart.grand_total(products, engine);
        let currency = engine.currency();

        let (change, card_last_four) = match tender {
            Tender::Cash { tendered } => {
                let change = validate_cash_tender(total, *tendered)?;
                (Some(Money::new(change, currency)), None)
            }
            Tender::Card(card) => {
                validate_card(card)?;
                (None, Some(card.last_four()))
            }
        };

        let stock_updates = cart.stock_updates(products);
        try_join_all(
            stock_updates
                .iter()
                .map(|u| self.sink.update_stock(u.product_id, u.new_stock)),
        )
        .await
        .map_err(|e| {
            warn!(error = %e, "Checkout aborted, stock push failed");
            e
        })?;

        let receipt = Receipt {
            id: Uuid::new_v4(),
            issued_at: Utc::now(),
            seat,
            customer_type: engine.customer_type(),
            lines,
            total: Money::new(total, currency),
            method: tender.method(),
            change,
            card_last_four,
            stock_updates,
        };

        info!(receipt_id = %receipt.id, total = %receipt.total, "Checkout completed");
        Ok(receipt)
    }
}
