//! # skycart-core: Pure Storefront Logic for SkyCart
//!
//! This crate is the **heart** of SkyCart, the in-flight shop. It holds the
//! price computation and the cart math as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SkyCart Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile UI                                    │   │
//! │  │    Catalogue ──► Pay bar ──► Payment screen ──► Success         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    skycart-client                               │   │
//! │  │    products API, FX rates, stock updates, checkout              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ plain values (products, rates)        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ skycart-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────┐       │   │
//! │  │   │ currency │  │ discount │  │ pricing  │  │   cart   │       │   │
//! │  │   │ convert  │─►│ customer │─►│ engine   │─►│ totals   │       │   │
//! │  │   │ Rates    │  │ type     │  │          │  │          │       │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └──────────┘       │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO SHARED MUTABLE STATE                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`currency`] - Currencies, EUR-pivoted rate table, conversion
//! - [`discount`] - Customer types and their price multipliers
//! - [`pricing`] - The single authoritative price computation
//! - [`cart`] - Cart quantities, line totals, grand total
//! - [`money`] - Currency-tagged amounts for display
//! - [`types`] - Product, stock updates, payment method, category filter
//! - [`validation`] - Payment form, seat and product validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use skycart_core::{Cart, Currency, CustomerType, PricingEngine, Product, Rates};
//!
//! let sandwich = Product {
//!     id: 7,
//!     name: "Club Sandwich".into(),
//!     price: 20.0,
//!     image: String::new(),
//!     stock: 10,
//!     category: "Food".into(),
//! };
//! let cart = Cart::new().add_one(7).add_one(7).add_one(7);
//! let engine = PricingEngine::new(CustomerType::HappyHour, Currency::Eur, Rates::FALLBACK);
//!
//! let total = cart.grand_total(&[sandwich], &engine);
//! assert!((total - 3.0 * (20.0 * 0.7 / 1.08)).abs() < 1e-9);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod currency;
pub mod discount;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine, CartSummary};
pub use currency::{convert, convert_all, Currency, Rates, RatesOrigin, RatesSnapshot};
pub use discount::{discount_multiplier, CustomerType};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{final_price, PricingEngine, BASE_CURRENCY};
pub use types::*;
pub use validation::{CardDetails, CashTender, Seat};
