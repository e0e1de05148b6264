//! # Domain Types
//!
//! Core domain types used throughout SkyCart.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  StockUpdate    │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (integer)   │   │  product_id     │   │  Cash           │       │
//! │  │  name           │   │  new_stock      │   │  Card           │       │
//! │  │  price (USD)    │   └─────────────────┘   └─────────────────┘       │
//! │  │  image          │                                                    │
//! │  │  stock          │   ┌─────────────────┐                             │
//! │  │  category       │   │ CategoryFilter  │                             │
//! │  └─────────────────┘   │  All | Only(..) │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Products arrive as JSON from the products API; their shape here matches
//! that wire format field for field.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Product
// =============================================================================

/// Identifier of a product in the catalogue.
pub type ProductId = u64;

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Price in the base currency (USD), before any discount.
    pub price: f64,

    /// Image URL.
    pub image: String,

    /// Units available. Only changed by the stock-update sink after checkout.
    pub stock: u32,

    /// Category label used by the catalogue filter.
    pub category: String,
}

impl Product {
    /// Checks if `quantity` units can be taken from stock.
    #[inline]
    pub fn can_sell(&self, quantity: u32) -> bool {
        quantity <= self.stock
    }

    /// True when nothing is left.
    #[inline]
    pub fn is_sold_out(&self) -> bool {
        self.stock == 0
    }
}

// =============================================================================
// Stock Update
// =============================================================================

/// New stock level to push for one product after a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockUpdate {
    pub product_id: ProductId,
    pub new_stock: u32,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer settles the bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PaymentMethod {
    /// Cash handed to the crew; change is given back.
    Cash,
    /// Card details keyed into the form.
    Card,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "Cash"),
            PaymentMethod::Card => write!(f, "Card"),
        }
    }
}

// =============================================================================
// Catalogue Filtering
// =============================================================================

/// Which products the catalogue grid shows.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryFilter {
    /// "All Products".
    #[default]
    All,
    /// Only products whose category matches exactly.
    Only(String),
}

impl CategoryFilter {
    /// Parses the picker value; `"All"` selects everything.
    pub fn from_label(label: &str) -> Self {
        if label == "All" {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(label.to_string())
        }
    }

    /// Label shown on the filter pill.
    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::All => "All Products",
            CategoryFilter::Only(category) => category,
        }
    }

    /// Checks whether `product` passes this filter.
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => product.category == *category,
        }
    }
}

/// Distinct categories, in order of first appearance.
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for product in products {
        if !seen.iter().any(|c| *c == product.category) {
            seen.push(product.category.clone());
        }
    }
    seen
}

/// Products passing `filter`, in catalogue order.
pub fn filter_products<'a>(products: &'a [Product], filter: &CategoryFilter) -> Vec<&'a Product> {
    products.iter().filter(|p| filter.matches(p)).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
