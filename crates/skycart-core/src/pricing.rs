//! # Pricing Engine
//!
//! The one place a displayed or charged price is computed.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  base price (USD) ──► × discount multiplier ──► convert USD → target    │
//! │                                                                         │
//! │  100 USD, Crew, USD   →  100 × 0.8            =  80.00 USD              │
//! │  100 USD, Crew, EUR   →  100 × 0.8 ÷ 1.08     =  74.07 EUR              │
//! │   20 USD, Happy hour  →   20 × 0.7 ÷ 1.08     =  12.96 EUR              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Rule
//! A [`PricingEngine`] copies the rate table in when it is built. Every
//! price produced by one engine value therefore uses the same rates, even if
//! fresh rates arrive while a listing or a checkout total is being computed.
//! Build a new engine to pick up new rates.

use serde::{Deserialize, Serialize};

use crate::currency::{convert, Currency, Rates};
use crate::discount::CustomerType;
use crate::money::Money;
use crate::types::Product;

/// Currency product prices are authored in.
pub const BASE_CURRENCY: Currency = Currency::Usd;

/// Discounts `base_price` for `customer_type`, then converts it from the
/// base currency to `target`.
///
/// Returns full precision; round only for display.
///
/// ## Example
/// ```rust
/// use skycart_core::currency::{Currency, Rates};
/// use skycart_core::discount::CustomerType;
/// use skycart_core::pricing::final_price;
///
/// let p = final_price(100.0, CustomerType::Crew, Currency::Usd, &Rates::FALLBACK);
/// assert!((p - 80.0).abs() < 1e-9);
/// ```
pub fn final_price(
    base_price: f64,
    customer_type: CustomerType,
    target: Currency,
    rates: &Rates,
) -> f64 {
    let discounted = base_price * customer_type.multiplier();
    convert(discounted, BASE_CURRENCY, target, rates)
}

/// Immutable pricing context: who is buying, what they pay in, at which rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingEngine {
    customer_type: CustomerType,
    currency: Currency,
    rates: Rates,
}

impl PricingEngine {
    pub fn new(customer_type: CustomerType, currency: Currency, rates: Rates) -> Self {
        PricingEngine {
            customer_type,
            currency,
            rates,
        }
    }

    #[inline]
    pub fn customer_type(&self) -> CustomerType {
        self.customer_type
    }

    #[inline]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    #[inline]
    pub fn rates(&self) -> &Rates {
        &self.rates
    }

    /// Same customer and rates, different display currency.
    pub fn with_currency(&self, currency: Currency) -> Self {
        PricingEngine { currency, ..*self }
    }

    /// Same currency and rates, different customer tier.
    pub fn with_customer_type(&self, customer_type: CustomerType) -> Self {
        PricingEngine {
            customer_type,
            ..*self
        }
    }

    /// Final unit price for a base-currency amount.
    #[inline]
    pub fn final_price(&self, base_price: f64) -> f64 {
        final_price(base_price, self.customer_type, self.currency, &self.rates)
    }

    /// Final unit price of `product`.
    pub fn unit_price(&self, product: &Product) -> f64 {
        self.final_price(product.price)
    }

    /// Final unit price of `product` as [`Money`].
    pub fn quote(&self, product: &Product) -> Money {
        Money::new(self.unit_price(product), self.currency)
    }

    /// Re-expresses an amount already in the engine's currency in every
    /// supported currency, using the engine's rates.
    pub fn in_all_currencies(&self, amount: f64) -> [(Currency, f64); 3] {
        crate::currency::convert_all(amount, self.currency, &self.rates)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
