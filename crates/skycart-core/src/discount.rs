//! # Discount Policy
//!
//! Maps a customer type to the price multiplier applied before conversion.
//!
//! ```text
//! ┌──────────────────────────────┬────────────┬──────────────┐
//! │ Customer type                │ Multiplier │ Effect       │
//! ├──────────────────────────────┼────────────┼──────────────┤
//! │ Retail (and anything else)   │ 1.0        │ full price   │
//! │ Crew                         │ 0.8        │ 20% off      │
//! │ Happy hour                   │ 0.7        │ 30% off      │
//! │ Business invitation          │ 0.0        │ free         │
//! │ Tourist invitation           │ 0.0        │ free         │
//! └──────────────────────────────┴────────────┴──────────────┘
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A discount tier selected in the pay bar.
///
/// Serialised as its display label. Deserialising never fails: an
/// unrecognised label becomes [`CustomerType::Retail`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum CustomerType {
    #[default]
    Retail,
    Crew,
    HappyHour,
    BusinessInvitation,
    TouristInvitation,
}

impl CustomerType {
    /// Every tier, in picker order.
    pub const ALL: [CustomerType; 5] = [
        CustomerType::Retail,
        CustomerType::Crew,
        CustomerType::HappyHour,
        CustomerType::BusinessInvitation,
        CustomerType::TouristInvitation,
    ];

    /// Resolves a label. Total: unknown labels fall back to Retail.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Retail" => CustomerType::Retail,
            "Crew" => CustomerType::Crew,
            "Happy hour" => CustomerType::HappyHour,
            "Business invitation" => CustomerType::BusinessInvitation,
            "Tourist invitation" => CustomerType::TouristInvitation,
            _ => CustomerType::Retail,
        }
    }

    /// Display label, as shown in the customer-type picker.
    pub const fn label(&self) -> &'static str {
        match self {
            CustomerType::Retail => "Retail",
            CustomerType::Crew => "Crew",
            CustomerType::HappyHour => "Happy hour",
            CustomerType::BusinessInvitation => "Business invitation",
            CustomerType::TouristInvitation => "Tourist invitation",
        }
    }

    /// Price multiplier in `[0, 1]`.
    pub const fn multiplier(&self) -> f64 {
        match self {
            CustomerType::Retail => 1.0,
            CustomerType::Crew => 0.8,
            CustomerType::HappyHour => 0.7,
            CustomerType::BusinessInvitation | CustomerType::TouristInvitation => 0.0,
        }
    }

    /// True for the invitation tiers, which pay nothing.
    pub const fn is_complimentary(&self) -> bool {
        matches!(
            self,
            CustomerType::BusinessInvitation | CustomerType::TouristInvitation
        )
    }
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&str> for CustomerType {
    fn from(label: &str) -> Self {
        CustomerType::from_label(label)
    }
}

impl From<String> for CustomerType {
    fn from(label: String) -> Self {
        CustomerType::from_label(&label)
    }
}

impl From<CustomerType> for &'static str {
    fn from(customer_type: CustomerType) -> Self {
        customer_type.label()
    }
}

/// Multiplier for a raw customer-type label.
///
/// ## Example
/// ```rust
/// use skycart_core::discount::discount_multiplier;
///
/// assert_eq!(discount_multiplier("Crew"), 0.8);
/// assert_eq!(discount_multiplier("VIP"), 1.0); // unknown → Retail
/// ```
pub fn discount_multiplier(label: &str) -> f64 {
    CustomerType::from_label(label).multiplier()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_multipliers() {
        assert_eq!(discount_multiplier("Retail"), 1.0);
        assert_eq!(discount_multiplier("Crew"), 0.8);
        assert_eq!(discount_multiplier("Happy hour"), 0.7);
        assert_eq!(discount_multiplier("Business invitation"), 0.0);
        assert_eq!(discount_multiplier("Tourist invitation"), 0.0);
    }

    #[test]
    fn test_unknown_labels_price_as_retail() {
        for label in ["", "crew", "HAPPY HOUR", "VIP", "Happy Hour", "🛫"] {
            assert_eq!(discount_multiplier(label), 1.0, "label {label:?}");
            assert_eq!(CustomerType::from_label(label), CustomerType::Retail);
        }
    }

    #[test]
    fn test_multipliers_in_unit_interval() {
        for t in CustomerType::ALL {
            let m = t.multiplier();
            assert!((0.0..=1.0).contains(&m), "{t} → {m}");
        }
    }

    #[test]
    fn test_label_round_trip() {
        for t in CustomerType::ALL {
            assert_eq!(CustomerType::from_label(t.label()), t);
        }
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&CustomerType::HappyHour).unwrap();
        assert_eq!(json, r#""Happy hour""#);

        let parsed: CustomerType = serde_json::from_str(r#""Tourist invitation""#).unwrap();
        assert_eq!(parsed, CustomerType::TouristInvitation);

        let unknown: CustomerType = serde_json::from_str(r#""Platinum""#).unwrap();
        assert_eq!(unknown, CustomerType::Retail);
    }

    #[test]
    fn test_complimentary_tiers() {
        assert!(CustomerType::BusinessInvitation.is_complimentary());
        assert!(CustomerType::TouristInvitation.is_complimentary());
        assert!(!CustomerType::Crew.is_complimentary());
    }
}
