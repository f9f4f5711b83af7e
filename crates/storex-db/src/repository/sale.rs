//! # Sale Repository
//!
//! Read side of the sale audit trail.
//!
//! ## Why Read-Only
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Sale Write Paths                                     │
//! │                                                                         │
//! │  Writes (INSERT sale + items, status flip COMPLETED → VOID) happen     │
//! │  ONLY inside coordinator transactions, never through this repo.        │
//! │  Sales are never UPDATEd otherwise and never DELETEd; the table is     │
//! │  the append-only audit trail.                                          │
//! │                                                                         │
//! │  This repository serves the history screen, receipt lookup, and the    │
//! │  item fetch the edit-reload flow needs.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;

use crate::error::DbResult;
use storex_core::{Sale, SaleItem};

const SALE_COLUMNS: &str = "id, created_at, total_cents, cash_cents, change_cents, user_id, status";

const ITEM_COLUMNS: &str =
    "id, sale_id, product_id, name_snapshot, unit_price_cents, quantity, subtotal_cents";

/// Repository for sale read operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1");
        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Lists sales, newest first. Voided sales are included; they are part
    /// of the history.
    pub async fn list_all(&self, limit: u32) -> DbResult<Vec<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales ORDER BY created_at DESC LIMIT ?1");
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Gets all items for a sale, in insertion order.
    pub async fn get_items(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        // rowid preserves insertion order; ids are UUIDs and do not
        let sql =
            format!("SELECT {ITEM_COLUMNS} FROM sale_items WHERE sale_id = ?1 ORDER BY rowid");
        let items = sqlx::query_as::<_, SaleItem>(&sql)
            .bind(sale_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Counts all sales (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
