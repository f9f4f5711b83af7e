//! # Stock Validator
//!
//! Advisory availability checks against live inventory.
//!
//! ## Two-Phase Stock Enforcement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Phase 1 (here): advisory pre-check                                    │
//! │     Reads the CURRENT product row and compares stock to the request.   │
//! │     Fast feedback, no side effects. Can be stale a millisecond later.  │
//! │                                                                         │
//! │  Phase 2 (coordinator): authoritative conditional write                │
//! │     UPDATE products SET stock = stock - ? WHERE id = ? AND stock >= ?  │
//! │     Evaluated atomically by SQLite inside the checkout transaction.    │
//! │                                                                         │
//! │  Passing phase 1 never guarantees phase 2; phase 2 alone guarantees    │
//! │  stock never goes negative.                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::TxResult;
use crate::repository::product::ProductRepository;
use storex_core::{CoreError, Product};

/// Advisory stock validation against the live product store.
#[derive(Debug, Clone)]
pub struct StockValidator {
    products: ProductRepository,
}

impl StockValidator {
    /// Creates a new StockValidator.
    pub fn new(pool: SqlitePool) -> Self {
        StockValidator {
            products: ProductRepository::new(pool),
        }
    }

    /// Checks that `requested` units of a product are available right now.
    ///
    /// Always reads the current row, never a cached or cart-time value.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The live row, for callers that want the snapshot
    /// * `Err(Core(ProductNotFound))` - No such product
    /// * `Err(Core(InsufficientStock))` - Not enough stock at read time
    pub async fn check_availability(&self, product_id: &str, requested: i64) -> TxResult<Product> {
        let product = self
            .products
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        if product.stock < requested {
            debug!(
                product_id = %product_id,
                available = product.stock,
                requested,
                "Stock check failed"
            );
            return Err(CoreError::InsufficientStock {
                product_id: product.id.clone(),
                name: product.name.clone(),
                available: product.stock,
                requested,
            }
            .into());
        }

        Ok(product)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
