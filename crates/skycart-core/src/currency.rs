//! # Currency Module
//!
//! The three currencies the storefront sells in, the exchange-rate table,
//! and the conversion between them.
//!
//! ## EUR-Pivoted Rates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Rates are "units of X per 1 EUR", EUR pinned to 1                      │
//! │                                                                         │
//! │      USD ──÷ rates[USD]──►  EUR  ──× rates[GBP]──►  GBP                 │
//! │                                                                         │
//! │  100 EUR → USD  =  100 × 1.08          = 108.00                         │
//! │  108 USD → GBP  =  108 ÷ 1.08 × 0.86   =  86.00                         │
//! │  Same currency  =  amount unchanged (no float round trip)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use skycart_core::currency::{convert, Currency, Rates};
//!
//! let rates = Rates::FALLBACK;
//! let usd = convert(100.0, Currency::Eur, Currency::Usd, &rates);
//! assert!((usd - 108.0).abs() < 1e-9);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};

// =============================================================================
// Currency
// =============================================================================

/// A currency the storefront can display and charge in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Euro, the pivot of the rate table.
    Eur,
    /// US dollar, the currency product prices are authored in.
    Usd,
    /// Pound sterling.
    Gbp,
}

impl Currency {
    /// Every supported currency, in picker order.
    pub const ALL: [Currency; 3] = [Currency::Usd, Currency::Eur, Currency::Gbp];

    /// ISO 4217 code.
    pub const fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
        }
    }

    /// Display symbol.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Currency::Eur => "€",
            Currency::Usd => "$",
            Currency::Gbp => "£",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    /// Parses an ISO code, case-insensitively. Anything outside the three
    /// supported codes is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EUR" => Ok(Currency::Eur),
            "USD" => Ok(Currency::Usd),
            "GBP" => Ok(Currency::Gbp),
            _ => Err(ValidationError::NotAllowed {
                field: "currency".to_string(),
                allowed: Currency::ALL.iter().map(|c| c.code().to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Rates
// =============================================================================

/// Exchange-rate table: units of each currency per 1 EUR.
///
/// ## Invariants
/// - `get(Currency::Eur) == 1.0`
/// - every other rate is finite and strictly positive
///
/// Fields are private; the only ways in are [`Rates::new`], [`Rates::FALLBACK`]
/// and deserialisation, all of which uphold the invariants. A `Rates` value is
/// `Copy`, so handing one to the pricing engine is handing it a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<Currency, f64>", into = "BTreeMap<Currency, f64>")]
pub struct Rates {
    usd: f64,
    gbp: f64,
}

impl Rates {
    /// Offline default used when no rates were ever fetched.
    pub const FALLBACK: Rates = Rates {
        usd: 1.08,
        gbp: 0.86,
    };

    /// Builds a rate table from the USD and GBP rates against EUR.
    ///
    /// ## Example
    /// ```rust
    /// use skycart_core::currency::{Currency, Rates};
    ///
    /// let rates = Rates::new(1.1, 0.85).unwrap();
    /// assert_eq!(rates.get(Currency::Eur), 1.0);
    /// assert!(Rates::new(0.0, 0.85).is_err());
    /// ```
    pub fn new(usd: f64, gbp: f64) -> CoreResult<Self> {
        check_rate(Currency::Usd, usd)?;
        check_rate(Currency::Gbp, gbp)?;
        Ok(Rates { usd, gbp })
    }

    /// Units of `currency` per 1 EUR.
    #[inline]
    pub const fn get(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Eur => 1.0,
            Currency::Usd => self.usd,
            Currency::Gbp => self.gbp,
        }
    }
}

impl Default for Rates {
    fn default() -> Self {
        Rates::FALLBACK
    }
}

fn check_rate(currency: Currency, value: f64) -> CoreResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CoreError::InvalidRate { currency, value })
    }
}

impl TryFrom<BTreeMap<Currency, f64>> for Rates {
    type Error = CoreError;

    fn try_from(map: BTreeMap<Currency, f64>) -> Result<Self, Self::Error> {
        if let Some(&eur) = map.get(&Currency::Eur) {
            if eur != 1.0 {
                return Err(CoreError::InvalidRate {
                    currency: Currency::Eur,
                    value: eur,
                });
            }
        }

        let usd = map.get(&Currency::Usd).copied().unwrap_or(f64::NAN);
        let gbp = map.get(&Currency::Gbp).copied().unwrap_or(f64::NAN);
        Rates::new(usd, gbp)
    }
}

impl From<Rates> for BTreeMap<Currency, f64> {
    fn from(rates: Rates) -> Self {
        Currency::ALL.iter().map(|&c| (c, rates.get(c))).collect()
    }
}

// =============================================================================
// Conversion
// =============================================================================

/// Converts `amount` from one currency to another through EUR.
///
/// Same-currency conversion returns `amount` bit-for-bit.
pub fn convert(amount: f64, from: Currency, to: Currency, rates: &Rates) -> f64 {
    if from == to {
        return amount;
    }

    let in_eur = match from {
        Currency::Eur => amount,
        other => amount / rates.get(other),
    };

    match to {
        Currency::Eur => in_eur,
        other => in_eur * rates.get(other),
    }
}

/// Expresses `amount` in every supported currency, in [`Currency::ALL`] order.
///
/// The pay bar shows the running total as "$ | € | £" side by side.
pub fn convert_all(amount: f64, from: Currency, rates: &Rates) -> [(Currency, f64); 3] {
    Currency::ALL.map(|to| (to, convert(amount, from, to, rates)))
}

// =============================================================================
// Rates Snapshot
// =============================================================================

/// Where a rates snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RatesOrigin {
    /// Fetched just now.
    Live,
    /// Last-known-good snapshot, reused after a failed fetch.
    Cached,
    /// Built-in default, no fetch ever succeeded.
    Fallback,
}

/// An immutable rate table plus its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatesSnapshot {
    pub rates: Rates,
    /// Publication date reported by the rates source; `None` when offline.
    pub date: Option<NaiveDate>,
    pub origin: RatesOrigin,
}

impl RatesSnapshot {
    /// The built-in offline snapshot.
    pub const fn fallback() -> Self {
        RatesSnapshot {
            rates: Rates::FALLBACK,
            date: None,
            origin: RatesOrigin::Fallback,
        }
    }

    /// Date label for display ("2024-05-10" or "offline").
    pub fn date_label(&self) -> String {
        self.date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "offline".to_string())
    }
}

impl Default for RatesSnapshot {
    fn default() -> Self {
        RatesSnapshot::fallback()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
