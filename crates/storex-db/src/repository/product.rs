//! # Product Repository
//!
//! Database operations for the live catalog and inventory.
//!
//! ## Stock Primitives
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Why the decrement is conditional                           │
//! │                                                                         │
//! │  ❌ WRONG: read-then-write (race window)                               │
//! │     let p = get_by_id(id);             ← terminal B sells here         │
//! │     UPDATE products SET stock = p.stock - qty                          │
//! │                                                                         │
//! │  ✅ CORRECT: single conditional statement                              │
//! │     UPDATE products SET stock = stock - qty                            │
//! │     WHERE id = ? AND stock >= qty                                      │
//! │                                                                         │
//! │  rows_affected == 0 means the stock is gone: the caller's              │
//! │  transaction rolls back instead of overselling.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The same statements are exposed both on the pool (for admin restock)
//! and as `*_tx` variants that run inside a coordinator transaction.

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use storex_core::Product;

const PRODUCT_COLUMNS: &str = "id, barcode, name, description, price_cents, stock, category, \
                               created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let results = repo.search("coffee", 20).await?;
/// let product = repo.get_by_barcode("5901234123457").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products ordered by name.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name");
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Searches products by name, barcode, or category substring.
    ///
    /// ## Arguments
    /// * `query` - Search term (can be partial)
    /// * `limit` - Maximum results to return
    ///
    /// An empty query lists products up to `limit`.
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Product>> {
        let query = query.trim();

        debug!(query = %query, limit = %limit, "Searching products");

        // LIKE wildcards are not part of the search language; a query
        // that is nothing but wildcards is an empty query
        let cleaned = query.replace(['%', '_'], "");

        if cleaned.is_empty() {
            let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name LIMIT ?1");
            let products = sqlx::query_as::<_, Product>(&sql)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?;
            return Ok(products);
        }

        let pattern = format!("%{cleaned}%");

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE name LIKE ?1 OR barcode LIKE ?1 OR category LIKE ?1 \
             ORDER BY name LIMIT ?2"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(&pattern)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets a product by its barcode (the scan path).
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE barcode = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(barcode)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product
    /// * `Err(DbError::UniqueViolation)` - Barcode already exists
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, barcode, name, description,
                price_cents, stock, category,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&product.id)
        .bind(&product.barcode)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(&product.category)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    /// Updates an existing product's catalog fields.
    ///
    /// Stock is deliberately NOT written here; it moves only through the
    /// atomic increment/decrement primitives below.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                barcode = ?2,
                name = ?3,
                description = ?4,
                price_cents = ?5,
                category = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.barcode)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(&product.category)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Deletes a product from the catalog.
    ///
    /// Sale history is unaffected: sale_items reference products by id
    /// without a foreign key and carry their own name/price snapshots.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Atomically decrements stock, only if enough remains.
    ///
    /// ## Returns
    /// * `Ok(true)` - Stock was decremented
    /// * `Ok(false)` - Not enough stock (or product gone); nothing written
    pub async fn try_decrement_stock(&self, id: &str, qty: i64) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock - ?2, updated_at = ?3
            WHERE id = ?1 AND stock >= ?2
            "#,
        )
        .bind(id)
        .bind(qty)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Atomically increments stock (restock, or void restore).
    ///
    /// ## Returns
    /// * `Ok(true)` - Stock was incremented
    /// * `Ok(false)` - Product no longer exists
    pub async fn increment_stock(&self, id: &str, qty: i64) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock + ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(qty)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Transaction-scoped statements
// =============================================================================
//
// The coordinator runs the same conditional stock statements inside its
// own sqlx transaction. Free functions taking `&mut Transaction` keep the
// SQL in one place without the repository holding a transaction.

/// Conditional stock decrement inside an open transaction.
pub(crate) async fn try_decrement_stock_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: &str,
    qty: i64,
) -> DbResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock = stock - ?2, updated_at = ?3
        WHERE id = ?1 AND stock >= ?2
        "#,
    )
    .bind(id)
    .bind(qty)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Stock restore inside an open transaction. Returns false when the
/// product row no longer exists.
pub(crate) async fn increment_stock_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: &str,
    qty: i64,
) -> DbResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock = stock + ?2, updated_at = ?3
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .bind(qty)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn sample_product(name: &str, barcode: &str, price_cents: i64, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: generate_product_id(),
            barcode: Some(barcode.to_string()),
            name: name.to_string(),
            description: None,
            price_cents,
            stock,
            category: Some("Grocery".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.products();

        let product = sample_product("Arabica Coffee", "5901234123457", 1250, 8);
        repo.insert(&product).await.unwrap();

        let found = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Arabica Coffee");
        assert_eq!(found.price_cents, 1250);
        assert_eq!(found.stock, 8);

        let scanned = repo.get_by_barcode("5901234123457").await.unwrap().unwrap();
        assert_eq!(scanned.id, product.id);
    }

    #[tokio::test]
    async fn test_duplicate_barcode_rejected() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&sample_product("A", "111", 100, 1)).await.unwrap();
        let err = repo
            .insert(&sample_product("B", "111", 200, 1))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_search_matches_name_and_category() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&sample_product("Arabica Coffee", "111", 1250, 8))
            .await
            .unwrap();
        repo.insert(&sample_product("Green Tea", "222", 450, 20))
            .await
            .unwrap();

        let hits = repo.search("coffee", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Arabica Coffee");

        // Category substring matches both
        let hits = repo.search("Grocery", 10).await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_search_wildcard_only_behaves_like_empty_query() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&sample_product("Arabica Coffee", "111", 1250, 8))
            .await
            .unwrap();
        repo.insert(&sample_product("Green Tea", "222", 450, 20))
            .await
            .unwrap();

        // Wildcard characters carry no meaning in a search term; "%%" and
        // "_" list the catalog exactly like "" does, via the same branch
        let empty = repo.search("", 10).await.unwrap();
        let wildcards = repo.search("%%", 10).await.unwrap();
        let underscore = repo.search("_", 10).await.unwrap();

        assert_eq!(empty.len(), 2);
        assert_eq!(wildcards.len(), empty.len());
        assert_eq!(underscore.len(), empty.len());

        // Stripping still applies inside a real term
        let hits = repo.search("%coffee%", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn test_try_decrement_stock_is_conditional() {
        let db = test_db().await;
        let repo = db.products();

        let product = sample_product("Milk", "333", 300, 2);
        repo.insert(&product).await.unwrap();

        assert!(repo.try_decrement_stock(&product.id, 2).await.unwrap());
        // Nothing left; the conditional write must refuse
        assert!(!repo.try_decrement_stock(&product.id, 1).await.unwrap());

        let found = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(found.stock, 0);
    }

    #[tokio::test]
    async fn test_increment_stock_on_missing_product() {
        let db = test_db().await;
        let repo = db.products();

        assert!(!repo.increment_stock("no-such-id", 5).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing_product() {
        let db = test_db().await;
        let err = db.products().delete("no-such-id").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
