//! # Cart Module
//!
//! The in-memory, per-session shopping cart.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Cart Lifecycle                               │
//! │                                                                     │
//! │  ┌──────────┐      ┌──────────┐      ┌──────────┐                  │
//! │  │  Empty   │─────►│  Lines   │─────►│ Checkout │──► cleared       │
//! │  │  Cart    │      │  added   │      │ (db tx)  │                  │
//! │  └──────────┘      └──────────┘      └──────────┘                  │
//! │       ▲                 │                                           │
//! │       │            adjust / clear                                   │
//! │       │                 │                                           │
//! │       └─────────────────┘                                           │
//! │                                                                     │
//! │  Edit-reload seeds a fresh cart from a voided sale's items,        │
//! │  tagged with the original sale id for the UI/audit trail only.     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by `product_id` (re-adding merges quantities)
//! - Every quantity is positive; an adjustment to zero removes the line
//! - Unit prices are snapshotted at add-time and never re-read
//! - Every mutation is gated by the stock snapshot supplied by the caller;
//!   a failed mutation leaves the cart unchanged
//!
//! Stock snapshots here are advisory (fast-fail, good UX). The
//! authoritative check is the conditional stock write the coordinator
//! issues at commit time.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, SaleItem};
use crate::validation::validate_quantity;
use crate::MAX_CART_LINES;

// =============================================================================
// Cart Line
// =============================================================================

/// One product/quantity/price entry in the cart.
///
/// Ephemeral: exists only inside a [`Cart`], never persisted directly.
/// The unit price is frozen when the line is created, so a later product
/// reprice does not change what this customer pays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Product reference (UUID).
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Price in cents at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Quantity requested. Always positive.
    pub quantity: i64,
}

impl CartLine {
    /// Creates a line from a product snapshot and quantity.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price_cents: product.price_cents,
            quantity,
        }
    }

    /// Line subtotal in cents (unit price × quantity).
    #[inline]
    pub fn subtotal_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }

    /// Line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents())
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart: an ordered collection of [`CartLine`]s keyed by
/// product id, with an exact running total.
///
/// One cart per session; carts are never shared across sessions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,

    /// Set when this cart was seeded from a voided sale (edit-reload).
    /// Carried for UI/audit display only; has no storage effect.
    editing_sale_id: Option<String>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            editing_sale_id: None,
        }
    }

    /// Seeds a cart from a voided sale's items for edit-reload.
    ///
    /// The committed price snapshots carry over unchanged, and the cart is
    /// tagged with the originating sale id. A later checkout creates an
    /// entirely new sale; the original stays VOID.
    pub fn from_sale_items(sale_id: impl Into<String>, items: &[SaleItem]) -> Self {
        Cart {
            lines: items
                .iter()
                .map(|item| CartLine {
                    product_id: item.product_id.clone(),
                    name: item.name_snapshot.clone(),
                    unit_price_cents: item.unit_price_cents,
                    quantity: item.quantity,
                })
                .collect(),
            editing_sale_id: Some(sale_id.into()),
        }
    }

    /// Adds a product to the cart, merging with an existing line.
    ///
    /// ## Behavior
    /// - `qty <= 0` fails validation before anything else
    /// - If the product is already in the cart the quantities merge
    /// - The merged quantity is checked against `product.stock` (the
    ///   caller's freshly-read snapshot); a shortfall fails with
    ///   `InsufficientStock` and leaves the cart untouched
    pub fn add_item(&mut self, product: &Product, qty: i64) -> CoreResult<()> {
        validate_quantity(qty)?;

        if let Some(pos) = self.lines.iter().position(|l| l.product_id == product.id) {
            let merged = self.lines[pos].quantity + qty;
            validate_quantity(merged)?;
            Self::check_stock(product, merged)?;
            self.lines[pos].quantity = merged;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        Self::check_stock(product, qty)?;
        self.lines.push(CartLine::from_product(product, qty));
        Ok(())
    }

    /// Adjusts the quantity of the line at `line_index` by `delta`.
    ///
    /// ## Behavior
    /// - A resulting quantity of zero or less removes the line entirely
    /// - Increases are re-validated against `available`, the live stock
    ///   snapshot the caller just read from the product store
    /// - Decreases need no stock check
    pub fn adjust_quantity(
        &mut self,
        line_index: usize,
        delta: i64,
        available: i64,
    ) -> CoreResult<()> {
        let line = self
            .lines
            .get(line_index)
            .ok_or(CoreError::LineNotFound { index: line_index })?;

        let new_qty = line.quantity + delta;

        if new_qty <= 0 {
            self.lines.remove(line_index);
            return Ok(());
        }

        if delta > 0 {
            validate_quantity(new_qty)?;
            if new_qty > available {
                return Err(CoreError::InsufficientStock {
                    product_id: line.product_id.clone(),
                    name: line.name.clone(),
                    available,
                    requested: new_qty,
                });
            }
        }

        self.lines[line_index].quantity = new_qty;
        Ok(())
    }

    /// Cart total in cents: exact sum of `unit_price × quantity`.
    ///
    /// Deterministic integer arithmetic; no rounding, no drift.
    pub fn total_cents(&self) -> i64 {
        self.lines.iter().map(|l| l.subtotal_cents()).sum()
    }

    /// Cart total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents())
    }

    /// Computes the change for a cash payment without mutating the cart.
    ///
    /// Fails with `InsufficientCash` when `cash_tendered < total`;
    /// otherwise returns `cash_tendered − total` (zero when exact).
    pub fn cash_change(&self, cash_tendered: Money) -> CoreResult<Money> {
        let total = self.total();
        if cash_tendered < total {
            return Err(CoreError::InsufficientCash {
                tendered: cash_tendered,
                total,
            });
        }
        Ok((cash_tendered - total).max_zero())
    }

    /// Empties all lines and drops the edit-reload tag. Idempotent.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.editing_sale_id = None;
    }

    /// Returns the lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of unique lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The sale this cart was reloaded from, if any.
    pub fn editing_sale_id(&self) -> Option<&str> {
        self.editing_sale_id.as_deref()
    }

    fn check_stock(product: &Product, requested: i64) -> CoreResult<()> {
        if requested > product.stock {
            return Err(CoreError::InsufficientStock {
                product_id: product.id.clone(),
                name: product.name.clone(),
                available: product.stock,
                requested,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_product(id: &str, price_cents: i64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            barcode: Some(format!("59000000{id}")),
            name: format!("Product {id}"),
            description: None,
            price_cents,
            stock,
            category: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_item() {
        let mut cart = Cart::new();
        let product = test_product("1", 999, 10);

        cart.add_item(&product, 2).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.total_cents(), 1998);
    }

    #[test]
    fn test_add_same_product_merges_quantity() {
        let mut cart = Cart::new();
        let product = test_product("1", 999, 10);

        cart.add_item(&product, 2).unwrap();
        cart.add_item(&product, 3).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut cart = Cart::new();
        let product = test_product("1", 999, 10);

        assert!(matches!(
            cart.add_item(&product, 0),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            cart.add_item(&product, -3),
            Err(CoreError::Validation(_))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_merge_beyond_stock_leaves_cart_unchanged() {
        let mut cart = Cart::new();
        let product = test_product("1", 999, 5);

        cart.add_item(&product, 4).unwrap();
        let err = cart.add_item(&product, 2).unwrap_err();

        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 5,
                requested: 6,
                ..
            }
        ));
        // The failed merge must not have touched the existing line.
        assert_eq!(cart.total_quantity(), 4);
    }

    #[test]
    fn test_adjust_quantity_to_zero_removes_line() {
        let mut cart = Cart::new();
        let product = test_product("1", 999, 10);

        cart.add_item(&product, 1).unwrap();
        cart.adjust_quantity(0, -1, 10).unwrap();

        assert!(cart.is_empty());
    }

    #[test]
    fn test_adjust_quantity_increase_revalidates_stock() {
        let mut cart = Cart::new();
        let product = test_product("1", 999, 3);

        cart.add_item(&product, 3).unwrap();
        // Stock dropped to 3 elsewhere; +1 must fail against the snapshot.
        let err = cart.adjust_quantity(0, 1, 3).unwrap_err();

        assert!(matches!(err, CoreError::InsufficientStock { .. }));
        assert_eq!(cart.total_quantity(), 3);
    }

    #[test]
    fn test_adjust_quantity_decrease_skips_stock_check() {
        let mut cart = Cart::new();
        let product = test_product("1", 999, 10);

        cart.add_item(&product, 5).unwrap();
        // Available 0 is irrelevant when the quantity goes down.
        cart.adjust_quantity(0, -2, 0).unwrap();

        assert_eq!(cart.total_quantity(), 3);
    }

    #[test]
    fn test_adjust_unknown_index() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.adjust_quantity(0, 1, 10),
            Err(CoreError::LineNotFound { index: 0 })
        ));
    }

    #[test]
    fn test_total_is_exact() {
        let mut cart = Cart::new();
        let a = test_product("a", 1000, 100); // $10.00
        let b = test_product("b", 500, 100); // $5.00

        cart.add_item(&a, 2).unwrap();
        cart.add_item(&b, 1).unwrap();

        assert_eq!(cart.total(), Money::from_cents(2500));
    }

    #[test]
    fn test_cash_change() {
        let mut cart = Cart::new();
        let a = test_product("a", 1000, 100);
        let b = test_product("b", 500, 100);
        cart.add_item(&a, 2).unwrap();
        cart.add_item(&b, 1).unwrap();

        let change = cart.cash_change(Money::from_cents(3000)).unwrap();
        assert_eq!(change, Money::from_cents(500));

        // Exact payment: zero change
        let exact = cart.cash_change(Money::from_cents(2500)).unwrap();
        assert!(exact.is_zero());

        let err = cart.cash_change(Money::from_cents(2000)).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientCash { .. }));
        // cash_change never mutates
        assert_eq!(cart.total_cents(), 2500);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut cart = Cart::new();
        let product = test_product("1", 999, 10);

        cart.add_item(&product, 2).unwrap();
        cart.clear();
        assert!(cart.is_empty());
        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_seed_from_sale_items() {
        let items = vec![
            SaleItem {
                id: "i1".to_string(),
                sale_id: "s1".to_string(),
                product_id: "p1".to_string(),
                name_snapshot: "Coffee".to_string(),
                unit_price_cents: 250,
                quantity: 2,
                subtotal_cents: 500,
            },
            SaleItem {
                id: "i2".to_string(),
                sale_id: "s1".to_string(),
                product_id: "p2".to_string(),
                name_snapshot: "Sugar".to_string(),
                unit_price_cents: 150,
                quantity: 1,
                subtotal_cents: 150,
            },
        ];

        let cart = Cart::from_sale_items("s1", &items);

        assert_eq!(cart.editing_sale_id(), Some("s1"));
        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.total_cents(), 650);

        let mut cart = cart;
        cart.clear();
        assert_eq!(cart.editing_sale_id(), None);
    }
}
