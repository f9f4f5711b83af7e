//! # Domain Types
//!
//! Core domain types used throughout StoreX.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐   │
//! │  │    Product      │   │      Sale       │   │    SaleItem     │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │   │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  sale_id (FK)   │   │
//! │  │  barcode        │   │  status         │   │  product_id     │   │
//! │  │  price_cents    │   │  total_cents    │   │  unit_price     │   │
//! │  │  stock          │   │  user_id        │   │  quantity       │   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘   │
//! │                                                                     │
//! │  Sale 1──N SaleItem: items are written atomically with their sale  │
//! │  and never modified afterwards, even when the sale is voided.      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// Owned by the product store. The `stock` field is mutated only through
/// the store's atomic conditional decrement/increment primitives, so it is
/// never negative — including under concurrent checkouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Barcode (EAN-13, UPC-A, etc.).
    pub barcode: Option<String>,

    /// Display name shown to cashier and on the sale record.
    pub name: String,

    /// Optional description for product details.
    pub description: Option<String>,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Current stock level. Invariant: `stock >= 0` at all times.
    pub stock: i64,

    /// Free-text category label.
    pub category: Option<String>,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Sale Status
// =============================================================================

/// The status of a sale transaction.
///
/// A sale is created `Completed` by a successful checkout. The only
/// transition is `Completed → Void`; it is never reversed and the row is
/// never deleted. Sales form an append-only audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum SaleStatus {
    /// Sale has been paid and committed.
    Completed,
    /// Sale was voided; its stock has been restored.
    Void,
}

// =============================================================================
// Sale
// =============================================================================

/// A committed sale transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub total_cents: i64,
    pub cash_cents: i64,
    pub change_cents: i64,
    /// The cashier the sale is attributed to.
    pub user_id: String,
    pub status: SaleStatus,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns the cash tendered as Money.
    #[inline]
    pub fn cash(&self) -> Money {
        Money::from_cents(self.cash_cents)
    }

    /// Returns the change given as Money.
    #[inline]
    pub fn change(&self) -> Money {
        Money::from_cents(self.change_cents)
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a committed sale.
///
/// Uses the snapshot pattern: the product name and unit price are frozen
/// at checkout time. The product may later be repriced or deleted without
/// altering historical sale items — `product_id` is a reference, not an
/// owning foreign key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub name_snapshot: String,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Quantity sold.
    pub quantity: i64,
    /// Line subtotal (unit_price × quantity), as committed.
    pub subtotal_cents: i64,
}

impl SaleItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sale_status_transition_is_one_way() {
        // Only two states exist; voiding never produces a new Completed.
        assert_ne!(SaleStatus::Completed, SaleStatus::Void);
    }

    #[test]
    fn test_money_accessors() {
        let item = SaleItem {
            id: "i1".to_string(),
            sale_id: "s1".to_string(),
            product_id: "p1".to_string(),
            name_snapshot: "Coffee".to_string(),
            unit_price_cents: 250,
            quantity: 3,
            subtotal_cents: 750,
        };
        assert_eq!(item.unit_price().cents(), 250);
        assert_eq!(item.subtotal().cents(), 750);
    }
}
