//! # Cart Aggregator
//!
//! Per-product quantities plus the totals derived from them.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  User Action             Operation              Result                  │
//! │  ───────────             ─────────              ──────                  │
//! │                                                                         │
//! │  Tap "+" ──────────────► add_one(id) ─────────► qty + 1                 │
//! │                                                                         │
//! │  Tap "-" ──────────────► remove_one(id) ──────► max(qty - 1, 0)         │
//! │                                                                         │
//! │  Tap trash icon ───────► remove_all(id) ──────► entry gone              │
//! │                                                                         │
//! │  "Empty cart" / paid ──► clear() ─────────────► {}                      │
//! │                                                                         │
//! │  Every operation takes &self and returns a NEW Cart. Screens holding    │
//! │  an older Cart value keep seeing exactly what they were given.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stock
//! [`Cart::add_one`] does not look at stock. Callers that must never exceed
//! stock (the catalogue's "+" button) use [`Cart::try_add_one`] instead.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::currency::Currency;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::PricingEngine;
use crate::types::{Product, ProductId, StockUpdate};

// =============================================================================
// Cart
// =============================================================================

/// Quantities keyed by product id.
///
/// ## Invariants
/// - A missing key means quantity 0.
/// - Stored quantities are always ≥ 1; an entry that drops to 0 is removed,
///   so two carts with the same quantities compare equal. Deserialisation
///   drops zero entries too.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "CartRepr")]
pub struct Cart {
    quantities: BTreeMap<ProductId, u32>,
}

/// Wire shape of a [`Cart`], before zero entries are dropped.
#[derive(Deserialize)]
struct CartRepr {
    #[serde(default)]
    quantities: BTreeMap<ProductId, u32>,
}

impl From<CartRepr> for Cart {
    fn from(repr: CartRepr) -> Self {
        let mut quantities = repr.quantities;
        quantities.retain(|_, qty| *qty > 0);
        Cart { quantities }
    }
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Quantity of `product_id` (0 if absent).
    #[inline]
    pub fn quantity(&self, product_id: ProductId) -> u32 {
        self.quantities.get(&product_id).copied().unwrap_or(0)
    }

    /// Returns a cart with one more unit of `product_id`.
    #[must_use]
    pub fn add_one(&self, product_id: ProductId) -> Cart {
        let mut next = self.clone();
        let qty = next.quantities.entry(product_id).or_insert(0);
        *qty = qty.saturating_add(1);
        next
    }

    /// Like [`Cart::add_one`], but refuses to go past `product.stock`.
    ///
    /// ## Errors
    /// `InsufficientStock` when the cart already holds every unit in stock.
    pub fn try_add_one(&self, product: &Product) -> CoreResult<Cart> {
        let requested = self.quantity(product.id).saturating_add(1);
        if !product.can_sell(requested) {
            return Err(CoreError::InsufficientStock {
                product_id: product.id,
                name: product.name.clone(),
                available: product.stock,
                requested,
            });
        }
        Ok(self.add_one(product.id))
    }

    /// Returns a cart with one unit fewer of `product_id`, floored at 0.
    #[must_use]
    pub fn remove_one(&self, product_id: ProductId) -> Cart {
        let mut next = self.clone();
        match next.quantities.get(&product_id).copied() {
            Some(qty) if qty > 1 => {
                next.quantities.insert(product_id, qty - 1);
            }
            Some(_) => {
                next.quantities.remove(&product_id);
            }
            None => {}
        }
        next
    }

    /// Returns a cart without any unit of `product_id`.
    #[must_use]
    pub fn remove_all(&self, product_id: ProductId) -> Cart {
        let mut next = self.clone();
        next.quantities.remove(&product_id);
        next
    }

    /// Returns an empty cart.
    #[must_use]
    pub fn clear(&self) -> Cart {
        Cart::new()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    /// Number of distinct products in the cart.
    pub fn item_count(&self) -> usize {
        self.quantities.len()
    }

    /// Sum of all quantities.
    pub fn total_quantity(&self) -> u64 {
        self.quantities.values().map(|&q| u64::from(q)).sum()
    }

    /// Iterates `(product_id, quantity)` pairs in id order.
    pub fn entries(&self) -> impl Iterator<Item = (ProductId, u32)> + '_ {
        self.quantities.iter().map(|(&id, &q)| (id, q))
    }

    // =========================================================================
    // Derived Totals
    // =========================================================================

    /// `quantity × unit price` for one product.
    pub fn line_total(&self, product: &Product, engine: &PricingEngine) -> f64 {
        let qty = self.quantity(product.id);
        if qty == 0 {
            return 0.0;
        }
        f64::from(qty) * engine.unit_price(product)
    }

    /// Sum of the line totals of every product in `products`.
    ///
    /// Returns 0 for an empty cart or an empty product list. Products the cart
    /// does not hold contribute nothing; cart entries missing from `products`
    /// are not priced.
    pub fn grand_total(&self, products: &[Product], engine: &PricingEngine) -> f64 {
        products
            .iter()
            .map(|p| self.line_total(p, engine))
            .sum()
    }

    /// Products with a positive quantity, in the order of `products`.
    pub fn items_in_cart<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products
            .iter()
            .filter(|p| self.quantity(p.id) > 0)
            .collect()
    }

    /// Priced lines for every product in the cart, in the order of `products`.
    pub fn lines(&self, products: &[Product], engine: &PricingEngine) -> Vec<CartLine> {
        self.items_in_cart(products)
            .into_iter()
            .map(|p| {
                let quantity = self.quantity(p.id);
                let unit_price = engine.unit_price(p);
                CartLine {
                    product: p.clone(),
                    quantity,
                    unit_price,
                    line_total: f64::from(quantity) * unit_price,
                    currency: engine.currency(),
                }
            })
            .collect()
    }

    /// Totals for the pay bar and the payment screen.
    pub fn summary(&self, products: &[Product], engine: &PricingEngine) -> CartSummary {
        let items = self.items_in_cart(products);
        CartSummary {
            item_count: items.len(),
            total_quantity: items.iter().map(|p| u64::from(self.quantity(p.id))).sum(),
            total: Money::new(self.grand_total(products, engine), engine.currency()),
        }
    }

    /// First product whose cart quantity exceeds its stock.
    pub fn over_stock<'a>(&self, products: &'a [Product]) -> Option<(&'a Product, u32)> {
        products
            .iter()
            .map(|p| (p, self.quantity(p.id)))
            .find(|(p, qty)| !p.can_sell(*qty))
    }

    /// Returns a cart where no quantity exceeds the stock in `products`.
    ///
    /// Entries for products missing from `products` are kept as they are.
    #[must_use]
    pub fn clamp_to_stock(&self, products: &[Product]) -> Cart {
        let mut next = self.clone();
        for product in products {
            if let Some(qty) = next.quantities.get_mut(&product.id) {
                *qty = (*qty).min(product.stock);
            }
        }
        next.quantities.retain(|_, qty| *qty > 0);
        next
    }

    /// New stock level for every product in the cart: `max(stock - qty, 0)`.
    pub fn stock_updates(&self, products: &[Product]) -> Vec<StockUpdate> {
        self.items_in_cart(products)
            .into_iter()
            .map(|p| StockUpdate {
                product_id: p.id,
                new_stock: p.stock.saturating_sub(self.quantity(p.id)),
            })
            .collect()
    }
}

// =============================================================================
// Derived Views
// =============================================================================

/// One priced row of the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
    /// Final unit price in `currency`.
    pub unit_price: f64,
    pub line_total: f64,
    pub currency: Currency,
}

impl CartLine {
    pub fn unit_money(&self) -> Money {
        Money::new(self.unit_price, self.currency)
    }

    pub fn line_money(&self) -> Money {
        Money::new(self.line_total, self.currency)
    }
}

/// Cart totals summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartSummary {
    pub item_count: usize,
    pub total_quantity: u64,
    pub total: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::Rates;
    use crate::discount::CustomerType;

    const EPS: f64 = 1e-9;

    fn test_product(id: ProductId, price: f64, stock: u32) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            price,
            image: format!("https://example.com/{}.png", id),
            stock,
            category: "Food".to_string(),
        }
    }

    fn retail_usd() -> PricingEngine {
        PricingEngine::new(CustomerType::Retail, Currency::Usd, Rates::FALLBACK)
    }

    #[test]
    fn test_add_one_creates_and_increments() {
        let cart = Cart::new().add_one(7);
        assert_eq!(cart.quantity(7), 1);

        let cart = cart.add_one(7).add_one(7);
        assert_eq!(cart.quantity(7), 3);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_operations_do_not_mutate_input() {
        let original = Cart::new().add_one(1);
        let _ = original.add_one(1);
        let _ = original.remove_one(1);
        let _ = original.remove_all(1);
        let _ = original.clear();
        assert_eq!(original.quantity(1), 1);
    }

    #[test]
    fn test_remove_one_floors_at_zero() {
        let cart = Cart::new().add_one(3).add_one(3);
        let cart = cart.remove_one(3);
        assert_eq!(cart.quantity(3), 1);

        let cart = cart.remove_one(3);
        assert_eq!(cart.quantity(3), 0);
        assert!(cart.is_empty());

        // Idempotent at zero, including for products never added.
        let again = cart.remove_one(3).remove_one(99);
        assert_eq!(again.quantity(3), 0);
        assert_eq!(again, cart);
    }

    #[test]
    fn test_remove_all_and_clear() {
        let cart = Cart::new().add_one(1).add_one(1).add_one(2);
        let cart = cart.remove_all(1);
        assert_eq!(cart.quantity(1), 0);
        assert_eq!(cart.quantity(2), 1);

        assert!(cart.clear().is_empty());
        assert_eq!(cart.remove_all(42), cart);
    }

    #[test]
    fn test_try_add_one_respects_stock() {
        let product = test_product(5, 3.0, 2);
        let cart = Cart::new().try_add_one(&product).unwrap();
        let cart = cart.try_add_one(&product).unwrap();
        assert_eq!(cart.quantity(5), 2);

        let err = cart.try_add_one(&product).unwrap_err();
        assert_eq!(
            err,
            CoreError::InsufficientStock {
                product_id: 5,
                name: "Product 5".to_string(),
                available: 2,
                requested: 3,
            }
        );

        let sold_out = test_product(6, 3.0, 0);
        assert!(Cart::new().try_add_one(&sold_out).is_err());
    }

    #[test]
    fn test_line_total_happy_hour_in_eur() {
        let product = test_product(7, 20.0, 10);
        let cart = Cart::new().add_one(7).add_one(7).add_one(7);
        let engine = PricingEngine::new(CustomerType::HappyHour, Currency::Eur, Rates::FALLBACK);

        let total = cart.line_total(&product, &engine);
        assert!((total - 3.0 * (20.0 * 0.7 / 1.08)).abs() < EPS);
        assert!((total - 38.888_888_888).abs() < 1e-6);
    }

    #[test]
    fn test_line_total_for_absent_product_is_zero() {
        let cart = Cart::new().add_one(1);
        assert_eq!(cart.line_total(&test_product(2, 10.0, 5), &retail_usd()), 0.0);
    }

    #[test]
    fn test_grand_total_sums_lines() {
        let products = vec![test_product(1, 2.5, 10), test_product(2, 4.0, 10)];
        let cart = Cart::new().add_one(1).add_one(1).add_one(2);
        assert!((cart.grand_total(&products, &retail_usd()) - 9.0).abs() < EPS);
    }

    #[test]
    fn test_grand_total_empty_inputs_are_zero() {
        let products = vec![test_product(1, 2.5, 10)];
        assert_eq!(Cart::new().grand_total(&products, &retail_usd()), 0.0);
        assert_eq!(Cart::new().add_one(1).grand_total(&[], &retail_usd()), 0.0);
    }

    #[test]
    fn test_grand_total_is_linear_in_quantities() {
        let products = vec![
            test_product(1, 3.99, 50),
            test_product(2, 12.5, 50),
            test_product(3, 0.75, 50),
        ];
        let cart = Cart::new().add_one(1).add_one(2).add_one(2).add_one(3);
        let doubled = cart
            .entries()
            .fold(cart.clone(), |acc, (id, qty)| (0..qty).fold(acc, |c, _| c.add_one(id)));
        assert_eq!(doubled.quantity(2), 4);

        for t in CustomerType::ALL {
            for c in Currency::ALL {
                let engine = PricingEngine::new(t, c, Rates::new(1.0921, 0.8412).unwrap());
                let single = cart.grand_total(&products, &engine);
                let double = doubled.grand_total(&products, &engine);
                assert!((double - 2.0 * single).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_items_in_cart_is_stable_filter() {
        let products = vec![
            test_product(9, 1.0, 5),
            test_product(3, 1.0, 5),
            test_product(5, 1.0, 5),
        ];
        let cart = Cart::new().add_one(5).add_one(9);
        let ids: Vec<_> = cart.items_in_cart(&products).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![9, 5]);
    }

    #[test]
    fn test_items_in_cart_skips_zero_quantity() {
        let products = vec![test_product(1, 1.0, 5), test_product(2, 1.0, 5)];
        let cart = Cart::new().add_one(1).remove_one(1).add_one(2).add_one(2);
        let items = cart.items_in_cart(&products);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 2);
    }

    #[test]
    fn test_lines_and_summary() {
        let products = vec![test_product(1, 10.0, 5), test_product(2, 5.0, 5)];
        let cart = Cart::new().add_one(2).add_one(2).add_one(1);
        let engine = PricingEngine::new(CustomerType::Crew, Currency::Usd, Rates::FALLBACK);

        let lines = cart.lines(&products, &engine);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product.id, 1);
        assert!((lines[0].unit_price - 8.0).abs() < EPS);
        assert!((lines[1].line_total - 8.0).abs() < EPS);
        assert_eq!(lines[1].line_money().to_string(), "8.00 $");

        let summary = cart.summary(&products, &engine);
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.total_quantity, 3);
        assert!((summary.total.amount() - 16.0).abs() < EPS);
        assert_eq!(summary.total.currency(), Currency::Usd);
    }

    #[test]
    fn test_stock_updates_floor_at_zero() {
        let products = vec![
            test_product(1, 1.0, 5),
            test_product(2, 1.0, 1),
            test_product(3, 1.0, 9),
        ];
        // Cart holding more than stock can only come from add_one; still never negative.
        let cart = Cart::new().add_one(1).add_one(1).add_one(2).add_one(2);
        let updates = cart.stock_updates(&products);
        assert_eq!(
            updates,
            vec![
                StockUpdate { product_id: 1, new_stock: 3 },
                StockUpdate { product_id: 2, new_stock: 0 },
            ]
        );
    }

    #[test]
    fn test_cart_serde_round_trip() {
        let cart = Cart::new().add_one(7).add_one(7).add_one(2);
        let json = serde_json::to_string(&cart).unwrap();
        assert_eq!(json, r#"{"quantities":{"2":1,"7":2}}"#);
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }

    #[test]
    fn test_deserialize_drops_zero_entries() {
        let cart: Cart = serde_json::from_str(r#"{"quantities":{"7":0,"3":2}}"#).unwrap();
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.quantity(7), 0);
        assert_eq!(cart, Cart::new().add_one(3).add_one(3));

        let cart: Cart = serde_json::from_str(r#"{"quantities":{"7":0}}"#).unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart, Cart::new());
    }

    #[test]
    fn test_over_stock_and_clamp() {
        let products = vec![test_product(1, 1.0, 5), test_product(2, 1.0, 1), test_product(3, 1.0, 0)];
        let cart = Cart::new().add_one(1).add_one(2).add_one(2).add_one(3);

        let (product, qty) = cart.over_stock(&products).unwrap();
        assert_eq!((product.id, qty), (2, 2));

        let clamped = cart.clamp_to_stock(&products);
        assert_eq!(clamped.quantity(1), 1);
        assert_eq!(clamped.quantity(2), 1);
        assert_eq!(clamped.quantity(3), 0);
        assert_eq!(clamped.item_count(), 2);
        assert!(clamped.over_stock(&products).is_none());
    }
}
