//! # Transaction Coordinator
//!
//! Atomic checkout, void, and edit-reload over the sale audit trail.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Checkout Flow                                    │
//! │                                                                         │
//! │  New                                                                    │
//! │   │  checkout(cart, cash, session)                                     │
//! │   ▼                                                                     │
//! │  Validating ── empty cart / short cash / stale stock ──► Failed        │
//! │   │                                      (nothing persisted)           │
//! │   ▼                                                                     │
//! │  Committing (one sqlx transaction)                                     │
//! │   │   INSERT sale (COMPLETED)                                          │
//! │   │   per line:                                                        │
//! │   │     INSERT sale_item (frozen snapshot)                             │
//! │   │     UPDATE products SET stock = stock - qty                        │
//! │   │       WHERE id = ? AND stock >= qty   ◄── authoritative guard      │
//! │   │         └─ 0 rows → ROLLBACK → StockConflict                       │
//! │   ▼                                                                     │
//! │  Committed ──── void_sale ────► Void (one-way, stock restored)         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - A failed operation persists nothing: the transaction either commits
//!   whole or rolls back whole (sqlx also rolls back on drop)
//! - `stock >= 0` always; the conditional decrement is evaluated
//!   atomically by SQLite, never as read-then-write in application code
//! - Sales are append-only; the only update ever issued against a sale
//!   row is the conditional COMPLETED → VOID flip
//! - Voiding flips status *first* (conditionally), so a lost race or a
//!   repeated void fails before any stock is touched: double-restock is
//!   structurally impossible

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{TxError, TxResult};
use crate::repository::product::{increment_stock_tx, try_decrement_stock_tx};
use crate::stock::StockValidator;
use storex_core::{Cart, CoreError, Money, Sale, SaleItem, SaleStatus, Session};

/// The result of a committed checkout: the sale header plus its frozen
/// line items, ready for receipt rendering.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

impl Receipt {
    /// Change due to the customer.
    #[inline]
    pub fn change(&self) -> Money {
        self.sale.change()
    }
}

/// Coordinates the multi-statement units of work: checkout, void, and
/// edit-reload. Owns its transactions; repositories stay single-statement.
#[derive(Debug, Clone)]
pub struct Coordinator {
    pool: SqlitePool,
    validator: StockValidator,
}

impl Coordinator {
    /// Creates a new Coordinator.
    pub fn new(pool: SqlitePool) -> Self {
        Coordinator {
            validator: StockValidator::new(pool.clone()),
            pool,
        }
    }

    /// Commits a cart as a new COMPLETED sale.
    ///
    /// ## Steps
    /// 1. Reject an empty cart before touching storage
    /// 2. Compute change; `cash_tendered < total` → `InsufficientCash`
    /// 3. Advisory re-validation of every line against live stock
    /// 4. One transaction: sale header, line snapshots, and the
    ///    conditional stock decrement per line
    ///
    /// A zero-row decrement means another terminal won the stock between
    /// validation and commit; everything rolls back and `StockConflict`
    /// is returned. The caller's cart is never touched, so a refresh and
    /// retry is cheap.
    pub async fn checkout(
        &self,
        cart: &Cart,
        cash_tendered: Money,
        session: &Session,
    ) -> TxResult<Receipt> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        let change = cart.cash_change(cash_tendered).map_err(TxError::Core)?;

        debug!(
            lines = cart.line_count(),
            total = %cart.total(),
            user_id = %session.user_id,
            "Validating checkout"
        );

        // Fail fast on obviously stale carts. No side effects here; the
        // conditional write below is the real guard.
        for line in cart.lines() {
            self.validator
                .check_availability(&line.product_id, line.quantity)
                .await?;
        }

        let now = Utc::now();
        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            total_cents: cart.total_cents(),
            cash_cents: cash_tendered.cents(),
            change_cents: change.cents(),
            user_id: session.user_id.clone(),
            status: SaleStatus::Completed,
        };

        let mut tx = self.pool.begin().await?;

        insert_sale_tx(&mut tx, &sale).await?;

        let mut items = Vec::with_capacity(cart.line_count());
        for line in cart.lines() {
            if !try_decrement_stock_tx(&mut tx, &line.product_id, line.quantity).await? {
                warn!(
                    sale_id = %sale.id,
                    product_id = %line.product_id,
                    "Stock conflict during commit; rolling back"
                );
                tx.rollback().await.map_err(crate::error::DbError::from)?;
                return Err(TxError::StockConflict {
                    product_id: line.product_id.clone(),
                });
            }

            let item = SaleItem {
                id: Uuid::new_v4().to_string(),
                sale_id: sale.id.clone(),
                product_id: line.product_id.clone(),
                name_snapshot: line.name.clone(),
                unit_price_cents: line.unit_price_cents,
                quantity: line.quantity,
                subtotal_cents: line.subtotal_cents(),
            };
            insert_item_tx(&mut tx, &item).await?;
            items.push(item);
        }

        tx.commit().await?;

        info!(
            sale_id = %sale.id,
            total = %sale.total(),
            change = %sale.change(),
            user_id = %sale.user_id,
            "Sale committed"
        );

        Ok(Receipt { sale, items })
    }

    /// Voids a COMPLETED sale and restores its stock, atomically.
    ///
    /// The status flip runs first as a conditional update. Zero rows means
    /// the sale is missing or already VOID; the operation fails with
    /// `SaleNotFound` before any stock is restored. Products deleted since
    /// the sale simply have no row to restore; the void still succeeds.
    pub async fn void_sale(&self, sale_id: &str) -> TxResult<Sale> {
        let mut tx = self.pool.begin().await?;

        let flipped = sqlx::query(
            r#"
            UPDATE sales
            SET status = 'VOID'
            WHERE id = ?1 AND status = 'COMPLETED'
            "#,
        )
        .bind(sale_id)
        .execute(&mut *tx)
        .await?;

        if flipped.rows_affected() == 0 {
            return Err(TxError::SaleNotFound(sale_id.to_string()));
        }

        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, name_snapshot,
                   unit_price_cents, quantity, subtotal_cents
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(sale_id)
        .fetch_all(&mut *tx)
        .await?;

        for item in &items {
            let restored = increment_stock_tx(&mut tx, &item.product_id, item.quantity).await?;
            if !restored {
                debug!(
                    sale_id = %sale_id,
                    product_id = %item.product_id,
                    "Product gone; skipping stock restore"
                );
            }
        }

        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, created_at, total_cents, cash_cents, change_cents, user_id, status
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(sale_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(sale_id = %sale_id, items = items.len(), "Sale voided, stock restored");

        Ok(sale)
    }

    /// Voids a sale and returns a fresh cart seeded from its items, for
    /// the correct-a-mistake workflow.
    ///
    /// The returned cart carries the committed price snapshots and the
    /// originating sale id tag. A later checkout commits an entirely new
    /// sale; the voided one stays in the history untouched. If the void
    /// fails, the failure propagates unchanged and nothing is reloaded.
    pub async fn edit_reload(&self, sale_id: &str) -> TxResult<Cart> {
        let sale = self.void_sale(sale_id).await?;

        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, name_snapshot,
                   unit_price_cents, quantity, subtotal_cents
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(&sale.id)
        .fetch_all(&self.pool)
        .await
        .map_err(crate::error::DbError::from)?;

        info!(sale_id = %sale_id, lines = items.len(), "Sale reloaded for editing");

        Ok(Cart::from_sale_items(sale.id, &items))
    }
}

// =============================================================================
// Transaction-scoped inserts
// =============================================================================

async fn insert_sale_tx(tx: &mut Transaction<'_, Sqlite>, sale: &Sale) -> TxResult<()> {
    sqlx::query(
        r#"
        INSERT INTO sales (
            id, created_at, total_cents, cash_cents, change_cents, user_id, status
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&sale.id)
    .bind(sale.created_at)
    .bind(sale.total_cents)
    .bind(sale.cash_cents)
    .bind(sale.change_cents)
    .bind(&sale.user_id)
    .bind(sale.status)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn insert_item_tx(tx: &mut Transaction<'_, Sqlite>, item: &SaleItem) -> TxResult<()> {
    sqlx::query(
        r#"
        INSERT INTO sale_items (
            id, sale_id, product_id, name_snapshot,
            unit_price_cents, quantity, subtotal_cents
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&item.id)
    .bind(&item.sale_id)
    .bind(&item.product_id)
    .bind(&item.name_snapshot)
    .bind(item.unit_price_cents)
    .bind(item.quantity)
    .bind(item.subtotal_cents)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::generate_product_id;
    use storex_core::Product;

    fn product(name: &str, price_cents: i64, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: generate_product_id(),
            barcode: None,
            name: name.to_string(),
            description: None,
            price_cents,
            stock,
            category: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn session() -> Session {
        Session::new("u-1", "dina")
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn stock_of(db: &Database, id: &str) -> i64 {
        db.products().get_by_id(id).await.unwrap().unwrap().stock
    }

    /// A×2 @ $10.00 + B×1 @ $5.00, stock 10/5, cash $30.00.
    #[tokio::test]
    async fn test_checkout_happy_path() {
        let db = test_db().await;
        let a = product("Widget A", 1000, 10);
        let b = product("Widget B", 500, 5);
        db.products().insert(&a).await.unwrap();
        db.products().insert(&b).await.unwrap();

        let mut cart = Cart::new();
        cart.add_item(&a, 2).unwrap();
        cart.add_item(&b, 1).unwrap();

        let receipt = db
            .coordinator()
            .checkout(&cart, Money::from_cents(3000), &session())
            .await
            .unwrap();

        assert_eq!(receipt.sale.total_cents, 2500);
        assert_eq!(receipt.change(), Money::from_cents(500));
        assert_eq!(receipt.sale.status, SaleStatus::Completed);
        assert_eq!(receipt.sale.user_id, "u-1");
        assert_eq!(receipt.items.len(), 2);

        assert_eq!(stock_of(&db, &a.id).await, 8);
        assert_eq!(stock_of(&db, &b.id).await, 4);

        // Round-trips through the read repository
        let stored = db.sales().get_by_id(&receipt.sale.id).await.unwrap().unwrap();
        assert_eq!(stored.total_cents, 2500);
        let items = db.sales().get_items(&receipt.sale.id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name_snapshot, "Widget A");
        assert_eq!(items[0].subtotal_cents, 2000);
    }

    #[tokio::test]
    async fn test_checkout_insufficient_cash_mutates_nothing() {
        let db = test_db().await;
        let a = product("Widget A", 1000, 10);
        let b = product("Widget B", 500, 5);
        db.products().insert(&a).await.unwrap();
        db.products().insert(&b).await.unwrap();

        let mut cart = Cart::new();
        cart.add_item(&a, 2).unwrap();
        cart.add_item(&b, 1).unwrap();

        let err = db
            .coordinator()
            .checkout(&cart, Money::from_cents(2000), &session())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TxError::Core(CoreError::InsufficientCash { .. })
        ));
        assert_eq!(stock_of(&db, &a.id).await, 10);
        assert_eq!(stock_of(&db, &b.id).await, 5);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_checkout_empty_cart() {
        let db = test_db().await;
        let err = db
            .coordinator()
            .checkout(&Cart::new(), Money::from_cents(1000), &session())
            .await
            .unwrap_err();

        assert!(matches!(err, TxError::Core(CoreError::EmptyCart)));
    }

    #[tokio::test]
    async fn test_checkout_stale_cart_rejected() {
        let db = test_db().await;
        let a = product("Widget A", 1000, 3);
        db.products().insert(&a).await.unwrap();

        let mut cart = Cart::new();
        cart.add_item(&a, 3).unwrap();

        // Another terminal drains the stock after the cart was built
        assert!(db.products().try_decrement_stock(&a.id, 2).await.unwrap());

        let err = db
            .coordinator()
            .checkout(&cart, Money::from_cents(5000), &session())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TxError::Core(CoreError::InsufficientStock { .. })
        ));
        assert_eq!(stock_of(&db, &a.id).await, 1);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    /// Two concurrent single-unit checkouts against stock 1: exactly one
    /// commits and stock ends at zero, never negative.
    #[tokio::test]
    async fn test_concurrent_checkout_one_winner() {
        let path = std::env::temp_dir().join(format!("storex-race-{}.db", Uuid::new_v4()));
        let db = Database::new(DbConfig::new(&path).max_connections(5))
            .await
            .unwrap();

        let a = product("Last One", 1500, 1);
        db.products().insert(&a).await.unwrap();

        let mut cart = Cart::new();
        cart.add_item(&a, 1).unwrap();

        let coord = db.coordinator();
        let cash = Money::from_cents(1500);
        let sess = session();
        let (left, right) = tokio::join!(
            coord.checkout(&cart, cash, &sess),
            coord.checkout(&cart, cash, &sess),
        );

        let wins = [&left, &right].iter().filter(|r| r.is_ok()).count();
        assert_eq!(wins, 1, "exactly one checkout must commit");

        // The loser sees either the advisory check or the commit guard,
        // depending on interleaving
        for result in [left, right] {
            if let Err(err) = result {
                assert!(matches!(
                    err,
                    TxError::StockConflict { .. }
                        | TxError::Core(CoreError::InsufficientStock { .. })
                ));
            }
        }

        assert_eq!(stock_of(&db, &a.id).await, 0);
        assert_eq!(db.sales().count().await.unwrap(), 1);

        db.close().await;
        std::fs::remove_file(&path).ok();
    }

    /// Ten terminals, stock 3: committed decrements never exceed the
    /// initial stock, no matter how many callers race.
    #[tokio::test]
    async fn test_oversell_blocked_across_terminals() {
        let path = std::env::temp_dir().join(format!("storex-swarm-{}.db", Uuid::new_v4()));
        let db = Database::new(DbConfig::new(&path).max_connections(5))
            .await
            .unwrap();

        let a = product("Scarce", 1000, 3);
        db.products().insert(&a).await.unwrap();

        let mut cart = Cart::new();
        cart.add_item(&a, 1).unwrap();

        let mut handles = Vec::new();
        for i in 0..10 {
            let coord = db.coordinator();
            let cart = cart.clone();
            let sess = Session::new(format!("u-{i}"), "cashier");
            handles.push(tokio::spawn(async move {
                coord.checkout(&cart, Money::from_cents(1000), &sess).await
            }));
        }

        let mut commits = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                commits += 1;
            }
        }

        assert_eq!(commits, 3, "every unit of stock sells exactly once");
        assert_eq!(stock_of(&db, &a.id).await, 0);
        assert_eq!(db.sales().count().await.unwrap(), 3);

        db.close().await;
        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_void_restores_stock_exactly_once() {
        let db = test_db().await;
        let a = product("Widget A", 1000, 10);
        db.products().insert(&a).await.unwrap();

        let mut cart = Cart::new();
        cart.add_item(&a, 4).unwrap();

        let receipt = db
            .coordinator()
            .checkout(&cart, Money::from_cents(4000), &session())
            .await
            .unwrap();
        assert_eq!(stock_of(&db, &a.id).await, 6);

        let voided = db.coordinator().void_sale(&receipt.sale.id).await.unwrap();
        assert_eq!(voided.status, SaleStatus::Void);
        assert_eq!(stock_of(&db, &a.id).await, 10);

        // Second void must fail without touching stock
        let err = db
            .coordinator()
            .void_sale(&receipt.sale.id)
            .await
            .unwrap_err();
        assert!(matches!(err, TxError::SaleNotFound(_)));
        assert_eq!(stock_of(&db, &a.id).await, 10);

        // History keeps the row and its items
        let stored = db.sales().get_by_id(&receipt.sale.id).await.unwrap().unwrap();
        assert_eq!(stored.status, SaleStatus::Void);
        assert_eq!(db.sales().get_items(&receipt.sale.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_void_unknown_sale() {
        let db = test_db().await;
        let err = db.coordinator().void_sale("no-such-sale").await.unwrap_err();
        assert!(matches!(err, TxError::SaleNotFound(_)));
    }

    #[tokio::test]
    async fn test_void_survives_deleted_product() {
        let db = test_db().await;
        let a = product("Discontinued", 700, 3);
        db.products().insert(&a).await.unwrap();

        let mut cart = Cart::new();
        cart.add_item(&a, 2).unwrap();
        let receipt = db
            .coordinator()
            .checkout(&cart, Money::from_cents(1400), &session())
            .await
            .unwrap();

        db.products().delete(&a.id).await.unwrap();

        // No product row to restore into; the void still commits
        let voided = db.coordinator().void_sale(&receipt.sale.id).await.unwrap();
        assert_eq!(voided.status, SaleStatus::Void);
    }

    #[tokio::test]
    async fn test_edit_reload_roundtrip_is_stock_neutral() {
        let db = test_db().await;
        let a = product("Widget A", 1000, 10);
        let b = product("Widget B", 500, 5);
        db.products().insert(&a).await.unwrap();
        db.products().insert(&b).await.unwrap();

        let mut cart = Cart::new();
        cart.add_item(&a, 2).unwrap();
        cart.add_item(&b, 1).unwrap();

        let receipt = db
            .coordinator()
            .checkout(&cart, Money::from_cents(3000), &session())
            .await
            .unwrap();

        let reloaded = db.coordinator().edit_reload(&receipt.sale.id).await.unwrap();
        assert_eq!(reloaded.editing_sale_id(), Some(receipt.sale.id.as_str()));
        assert_eq!(reloaded.total_cents(), 2500);
        // Void restored the stock
        assert_eq!(stock_of(&db, &a.id).await, 10);

        // Re-checkout unchanged: stock-neutral end-to-end
        let second = db
            .coordinator()
            .checkout(&reloaded, Money::from_cents(2500), &session())
            .await
            .unwrap();

        assert_ne!(second.sale.id, receipt.sale.id);
        assert_eq!(stock_of(&db, &a.id).await, 8);
        assert_eq!(stock_of(&db, &b.id).await, 4);

        let original = db.sales().get_by_id(&receipt.sale.id).await.unwrap().unwrap();
        assert_eq!(original.status, SaleStatus::Void);
        let fresh = db.sales().get_by_id(&second.sale.id).await.unwrap().unwrap();
        assert_eq!(fresh.status, SaleStatus::Completed);
        assert_eq!(db.sales().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_reports_count_completed_only() {
        let db = test_db().await;
        let a = product("Widget A", 1000, 10);
        db.products().insert(&a).await.unwrap();

        let mut cart = Cart::new();
        cart.add_item(&a, 1).unwrap();

        let kept = db
            .coordinator()
            .checkout(&cart, Money::from_cents(1000), &session())
            .await
            .unwrap();
        let voided = db
            .coordinator()
            .checkout(&cart, Money::from_cents(1000), &session())
            .await
            .unwrap();
        db.coordinator().void_sale(&voided.sale.id).await.unwrap();

        assert_eq!(db.reports().today_revenue().await.unwrap().cents(), 1000);
        assert_eq!(db.reports().today_sales_count().await.unwrap(), 1);

        let top = db.reports().top_products(5).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].units_sold, 1);
        assert_eq!(top[0].revenue_cents, 1000);

        let days = db.reports().sales_last_7_days().await.unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].sales_count, 1);

        // The voided sale is still visible in plain history
        assert_eq!(db.sales().list_all(10).await.unwrap().len(), 2);
        let _ = kept;
    }
}
