//! # Money Module
//!
//! Provides the `Money` type: an amount tagged with the currency it is in.
//!
//! ## Precision Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Pricing runs at full f64 precision                                     │
//! │                                                                         │
//! │    3 × (20 × 0.7 ÷ 1.08) = 38.888888...   ← what the engine returns     │
//! │                                                                         │
//! │  Rounding to two decimals happens ONLY when showing the number:         │
//! │                                                                         │
//! │    Money::new(38.888.., EUR).to_string() = "38.89 €"                    │
//! │    Money::new(38.888.., EUR).to_cents()  = 3889                         │
//! │                                                                         │
//! │  Rounding each line first and then summing drifts from the real total.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use skycart_core::currency::Currency;
//! use skycart_core::money::Money;
//!
//! let unit = Money::new(12.5, Currency::Gbp);
//! let line = unit * 3;
//! assert_eq!(line.to_string(), "37.50 £");
//! assert_eq!(line.to_cents(), 3750);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Mul;
use ts_rs::TS;

use crate::currency::{convert, Currency, Rates};
use crate::error::{CoreError, CoreResult};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in a specific currency.
///
/// ## Design Decisions
/// - **f64 amount**: matches the full-precision contract of the pricing engine
/// - **currency carried alongside**: totals in different currencies cannot be
///   summed by accident (see [`Money::checked_add`])
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money {
    amount: f64,
    currency: Currency,
}

impl Money {
    /// Creates a Money value.
    #[inline]
    pub const fn new(amount: f64, currency: Currency) -> Self {
        Money { amount, currency }
    }

    /// Zero in `currency`.
    #[inline]
    pub const fn zero(currency: Currency) -> Self {
        Money::new(0.0, currency)
    }

    /// Full-precision amount.
    #[inline]
    pub const fn amount(&self) -> f64 {
        self.amount
    }

    #[inline]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.amount == 0.0
    }

    /// Amount in hundredths, rounded half away from zero.
    ///
    /// ## Example
    /// ```rust
    /// use skycart_core::currency::Currency;
    /// use skycart_core::money::Money;
    ///
    /// assert_eq!(Money::new(86.4, Currency::Usd).to_cents(), 8640);
    /// assert_eq!(Money::new(0.005, Currency::Usd).to_cents(), 1);
    /// ```
    pub fn to_cents(&self) -> i64 {
        (self.amount * 100.0).round() as i64
    }

    /// Re-expresses this value in another currency.
    pub fn convert_to(&self, target: Currency, rates: &Rates) -> Money {
        Money::new(convert(self.amount, self.currency, target, rates), target)
    }

    /// Adds two values of the same currency.
    ///
    /// ## Errors
    /// `CurrencyMismatch` when the currencies differ.
    pub fn checked_add(self, other: Money) -> CoreResult<Money> {
        if self.currency != other.currency {
            return Err(CoreError::CurrencyMismatch {
                expected: self.currency,
                found: other.currency,
            });
        }
        Ok(Money::new(self.amount + other.amount, self.currency))
    }

    /// Formats with the ISO code instead of the symbol ("38.89 EUR").
    pub fn with_code(&self) -> String {
        format!("{:.2} {}", self.amount, self.currency.code())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Two decimals followed by the currency symbol, e.g. `"108.00 $"`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency.symbol())
    }
}

/// Multiplication by a cart quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        Money::new(self.amount * f64::from(qty), self.currency)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::new(108.0, Currency::Usd).to_string(), "108.00 $");
        assert_eq!(Money::new(38.888888, Currency::Eur).to_string(), "38.89 €");
        assert_eq!(Money::zero(Currency::Gbp).to_string(), "0.00 £");
        assert_eq!(Money::new(86.4, Currency::Usd).with_code(), "86.40 USD");
    }

    #[test]
    fn test_to_cents() {
        assert_eq!(Money::new(38.888888, Currency::Eur).to_cents(), 3889);
        assert_eq!(Money::new(0.0, Currency::Eur).to_cents(), 0);
        assert_eq!(Money::new(19.99, Currency::Usd).to_cents(), 1999);
    }

    #[test]
    fn test_multiply_quantity() {
        let line = Money::new(2.5, Currency::Usd) * 4;
        assert_eq!(line.amount(), 10.0);
        assert_eq!(line.currency(), Currency::Usd);
        assert!((Money::new(9.99, Currency::Usd) * 0).is_zero());
    }

    #[test]
    fn test_checked_add() {
        let a = Money::new(1.5, Currency::Eur);
        let b = Money::new(2.25, Currency::Eur);
        assert_eq!(a.checked_add(b).unwrap().amount(), 3.75);

        let usd = Money::new(1.0, Currency::Usd);
        assert_eq!(
            a.checked_add(usd),
            Err(CoreError::CurrencyMismatch {
                expected: Currency::Eur,
                found: Currency::Usd,
            })
        );
    }

    #[test]
    fn test_convert_to() {
        let eur = Money::new(100.0, Currency::Eur);
        let usd = eur.convert_to(Currency::Usd, &Rates::FALLBACK);
        assert_eq!(usd.currency(), Currency::Usd);
        assert!((usd.amount() - 108.0).abs() < 1e-9);
    }
}
