//! # Error Types
//!
//! Domain-specific error types for skycart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  skycart-core errors (this file)                                       │
//! │  ├── CoreError        - Domain rule violations                         │
//! │  └── ValidationError  - Payment / seat / product input failures        │
//! │                                                                         │
//! │  skycart-client errors (separate crate)                                │
//! │  └── ClientError      - Network, decoding, config failures             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → UI                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unknown customer types are NOT errors: they price as Retail. Unknown
//! currency codes ARE errors: they never make it past parsing.

use thiserror::Error;

use crate::currency::Currency;
use crate::types::ProductId;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// Adding one more unit would exceed the product's stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Tap "+" on "Sandwich" (in cart: 3, stock: 3)
    ///      │
    ///      ▼
    /// InsufficientStock { name: "Sandwich", available: 3, requested: 4 }
    ///      │
    ///      ▼
    /// UI keeps the "+" button disabled
    /// ```
    #[error("Insufficient stock for {name} (#{product_id}): available {available}, requested {requested}")]
    InsufficientStock {
        product_id: ProductId,
        name: String,
        available: u32,
        requested: u32,
    },

    /// An exchange rate is zero, negative or not a number.
    #[error("Invalid exchange rate for {currency}: {value}")]
    InvalidRate { currency: Currency, value: f64 },

    /// Two amounts in different currencies were combined.
    #[error("Currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch { expected: Currency, found: Currency },

    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the payment forms, the seat picker and product ingestion.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be longer than {min} characters")]
    TooShort { field: String, min: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (card number, expiry, seat...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Cash handed over does not cover the total.
    #[error("You need to pay at least {required:.2}, got {tendered:.2}")]
    InsufficientTender { required: f64, tendered: f64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
