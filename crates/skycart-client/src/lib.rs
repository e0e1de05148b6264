//! # skycart-client: Remote Collaborators for SkyCart
//!
//! Everything that leaves the process: the products API, the exchange-rate
//! feed, stock updates and the checkout flow built on them. Pricing itself
//! stays in [`skycart_core`]; this crate only feeds it values.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      skycart-client (THIS CRATE)                        │
//! │                                                                         │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────────────────┐    │
//! │  │  products    │   │    rates     │   │       checkout           │    │
//! │  │ ProductSource│   │ RatesSource  │   │ tender → stock → receipt │    │
//! │  │ StockSink    │   │ RatesProvider│   │                          │    │
//! │  └──────┬───────┘   └──────┬───────┘   └────────────┬─────────────┘    │
//! │         └──────────────────┼────────────────────────┘                  │
//! │                            ▼                                            │
//! │                   ┌──────────────────┐                                  │
//! │                   │   storefront     │   Session value + Storefront     │
//! │                   └────────┬─────────┘                                  │
//! │                            ▼                                            │
//! │                     skycart-core (pure)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - `storefront.toml` + environment overrides
//! - [`error`] - Client error types
//! - [`http`] - Shared reqwest client
//! - [`products`] - Catalogue source and stock-update sink
//! - [`rates`] - Live rates with cache and offline fallback
//! - [`checkout`] - Payment validation, stock push, receipts
//! - [`storefront`] - Session state and orchestration

pub mod checkout;
pub mod config;
pub mod error;
pub mod http;
pub mod products;
pub mod rates;
pub mod storefront;

pub use checkout::{Checkout, Receipt, Tender};
pub use config::{ApiSettings, SessionSettings, StorefrontConfig};
pub use error::{ClientError, ClientResult};
pub use products::{load_catalog, ProductApi, ProductSource, StockSink};
pub use rates::{FrankfurterRates, RatesProvider, RatesSource};
pub use storefront::{Session, Storefront};
