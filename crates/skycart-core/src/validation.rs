//! # Validation Module
//!
//! Input validation for the payment screen and for incoming product data.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form input (as the user types)                               │
//! │  ├── format_card_number / format_expiry / format_cvv                   │
//! │  └── parse_tendered_amount                                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Confirm button                                               │
//! │  ├── validate_card                                                     │
//! │  ├── validate_cash_tender                                              │
//! │  └── Seat::from_str                                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Checkout                                                     │
//! │  └── re-validates the tender against the freshly computed total        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use skycart_core::validation::{format_card_number, validate_cash_tender};
//!
//! assert_eq!(format_card_number("4111111111111111"), "4111 1111 1111 1111");
//! assert!(validate_cash_tender(38.89, 50.0).is_ok());
//! assert!(validate_cash_tender(38.89, 20.0).is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::Product;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Product Validators
// =============================================================================

/// Validates a product record received from the products API.
///
/// ## Rules
/// - Name must not be blank
/// - Price must be finite and non-negative (zero is a free item)
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    if product.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if !product.price.is_finite() || product.price < 0.0 {
        return Err(ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: format!("must be a non-negative number, got {}", product.price),
        });
    }

    Ok(())
}

// =============================================================================
// Cash
// =============================================================================

/// Parses the amount typed into the cash form.
///
/// The first comma is read as the decimal separator, and the leading number
/// is taken with any trailing text ignored ("12abc" is 12). No leading number,
/// or a non-finite one, counts as 0, so an empty field never errors.
pub fn parse_tendered_amount(input: &str) -> f64 {
    let cleaned = input.trim_start().replacen(',', ".", 1);
    numeric_prefix(&cleaned)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Longest prefix of `s` shaped like `[+-]digits[.digits][e[+-]digits]`.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut mantissa_end = int_end;
    if bytes.get(int_end) == Some(&b'.') {
        mantissa_end = digits_from(int_end + 1);
    }
    // A mantissa needs at least one digit.
    if !s[end..mantissa_end].bytes().any(|b| b.is_ascii_digit()) {
        return "";
    }
    end = mantissa_end;

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    &s[..end]
}

/// Outcome of handing over cash for a total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashTender {
    pub total: f64,
    pub tendered: f64,
    /// `tendered - total`; negative means money is still missing.
    pub change: f64,
}

impl CashTender {
    pub fn evaluate(total: f64, tendered: f64) -> Self {
        CashTender {
            total,
            tendered,
            change: tendered - total,
        }
    }

    /// Enough cash, and some cash at all.
    pub fn is_sufficient(&self) -> bool {
        self.tendered >= self.total && self.tendered > 0.0
    }

    /// Amount still to pay, 0 when sufficient.
    pub fn missing(&self) -> f64 {
        if self.change < 0.0 {
            -self.change
        } else {
            0.0
        }
    }
}

/// Validates a cash payment and returns the change to give back.
///
/// Note that a zero total still requires a positive tender.
pub fn validate_cash_tender(total: f64, tendered: f64) -> ValidationResult<f64> {
    let tender = CashTender::evaluate(total, tendered);
    if !tender.is_sufficient() {
        return Err(ValidationError::InsufficientTender {
            required: total,
            tendered,
        });
    }
    Ok(tender.change)
}

// =============================================================================
// Card
// =============================================================================

/// Card details as keyed into the card form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardDetails {
    /// Grouped digits, e.g. "4111 1111 1111 1111".
    pub number: String,
    /// "MM/YY".
    pub expiry: String,
    pub cvv: String,
    pub name: String,
}

impl CardDetails {
    /// Builds details from raw keystrokes, applying the form's formatters.
    pub fn from_input(number: &str, expiry: &str, cvv: &str, name: &str) -> Self {
        CardDetails {
            number: format_card_number(number),
            expiry: format_expiry(expiry),
            cvv: format_cvv(cvv),
            name: name.to_string(),
        }
    }

    /// Last four digits, for receipts.
    pub fn last_four(&self) -> String {
        let digits: Vec<char> = self.number.chars().filter(|c| c.is_ascii_digit()).collect();
        digits[digits.len().saturating_sub(4)..].iter().collect()
    }
}

fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Keeps up to 16 digits and groups them by four.
pub fn format_card_number(raw: &str) -> String {
    let digits: Vec<char> = digits_only(raw).chars().take(16).collect();
    digits
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Turns "1226" into "12/26"; at most five characters.
pub fn format_expiry(raw: &str) -> String {
    let digits = digits_only(raw);
    let formatted = if digits.len() >= 3 {
        let tail: String = digits[2..].chars().take(2).collect();
        format!("{}/{}{}", &digits[..2], tail, &digits[2 + tail.len()..])
    } else {
        digits
    };
    formatted.chars().take(5).collect()
}

/// Keeps up to three digits.
pub fn format_cvv(raw: &str) -> String {
    digits_only(raw).chars().take(3).collect()
}

/// Validates card details before a card payment is accepted.
///
/// ## Rules
/// - 16 digits once spaces are removed
/// - Expiry `MM/YY`, month 01-12
/// - CVV of 3 or 4 digits
/// - Cardholder name longer than 2 characters once trimmed
pub fn validate_card(card: &CardDetails) -> ValidationResult<()> {
    let number: String = card.number.chars().filter(|c| !c.is_whitespace()).collect();
    if number.len() != 16 || !number.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "card number".to_string(),
            reason: "must contain 16 digits".to_string(),
        });
    }

    validate_expiry(&card.expiry)?;

    let cvv_ok = (3..=4).contains(&card.cvv.len()) && card.cvv.chars().all(|c| c.is_ascii_digit());
    if !cvv_ok {
        return Err(ValidationError::InvalidFormat {
            field: "cvv".to_string(),
            reason: "must be 3 or 4 digits".to_string(),
        });
    }

    let name = card.name.trim();
    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "cardholder name".to_string(),
        });
    }
    if name.chars().count() <= 2 {
        return Err(ValidationError::TooShort {
            field: "cardholder name".to_string(),
            min: 2,
        });
    }

    Ok(())
}

fn validate_expiry(expiry: &str) -> ValidationResult<()> {
    let invalid = || ValidationError::InvalidFormat {
        field: "expiry".to_string(),
        reason: "must be MM/YY".to_string(),
    };

    let (month, year) = expiry.split_once('/').ok_or_else(invalid)?;
    let two_digits = |s: &str| s.len() == 2 && s.chars().all(|c| c.is_ascii_digit());
    if !two_digits(month) || !two_digits(year) {
        return Err(invalid());
    }

    let month: i64 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(ValidationError::OutOfRange {
            field: "expiry month".to_string(),
            min: 1,
            max: 12,
        });
    }

    Ok(())
}

// =============================================================================
// Seat
// =============================================================================

/// A cabin seat: one row letter and a number from 1 to 99.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Seat {
    row: char,
    number: u8,
}

impl Seat {
    pub fn new(row: char, number: u8) -> ValidationResult<Self> {
        if !row.is_ascii_alphabetic() {
            return Err(ValidationError::InvalidFormat {
                field: "seat row".to_string(),
                reason: "must be a letter".to_string(),
            });
        }
        if !(1..=99).contains(&number) {
            return Err(ValidationError::OutOfRange {
                field: "seat number".to_string(),
                min: 1,
                max: 99,
            });
        }
        Ok(Seat {
            row: row.to_ascii_uppercase(),
            number,
        })
    }

    #[inline]
    pub fn row(&self) -> char {
        self.row
    }

    #[inline]
    pub fn number(&self) -> u8 {
        self.number
    }
}

impl Default for Seat {
    fn default() -> Self {
        Seat { row: 'A', number: 1 }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.number)
    }
}

impl FromStr for Seat {
    type Err = ValidationError;

    /// Parses "A5", "c12"...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let row = chars.next().ok_or_else(|| ValidationError::Required {
            field: "seat".to_string(),
        })?;

        let digits = chars.as_str();
        if digits.is_empty() || digits.len() > 2 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidFormat {
                field: "seat".to_string(),
                reason: "expected a row letter followed by a 1-2 digit number, e.g. A5".to_string(),
            });
        }

        let number: u8 = digits.parse().map_err(|_| ValidationError::InvalidFormat {
            field: "seat".to_string(),
            reason: format!("invalid seat number '{}'", digits),
        })?;
        Seat::new(row, number)
    }
}

impl TryFrom<String> for Seat {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Seat> for String {
    fn from(seat: Seat) -> Self {
        seat.to_string()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
