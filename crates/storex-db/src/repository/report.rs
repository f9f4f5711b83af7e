//! # Report Repository
//!
//! Aggregate reporting queries over the sale audit trail.
//!
//! All aggregates count COMPLETED sales only: a voided sale has had its
//! stock restored and its revenue never happened, so it must not appear
//! in totals. The VOID rows remain visible in the sale history itself.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::DbResult;
use storex_core::Money;

/// One row of the top-sellers report.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TopProduct {
    pub product_id: String,
    /// Name as committed on the sale items (the product may be gone).
    pub name_snapshot: String,
    pub units_sold: i64,
    pub revenue_cents: i64,
}

impl TopProduct {
    pub fn revenue(&self) -> Money {
        Money::from_cents(self.revenue_cents)
    }
}

/// One day of the sales-by-day report.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DailySales {
    /// Calendar day, `YYYY-MM-DD` (UTC).
    pub day: String,
    pub sales_count: i64,
    pub revenue_cents: i64,
}

/// Repository for reporting queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Total revenue of today's completed sales.
    pub async fn today_revenue(&self) -> DbResult<Money> {
        let cents: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total_cents), 0)
            FROM sales
            WHERE status = 'COMPLETED'
            AND date(created_at) = date('now')
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::from_cents(cents))
    }

    /// Number of completed sales today.
    pub async fn today_sales_count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM sales
            WHERE status = 'COMPLETED'
            AND date(created_at) = date('now')
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Best-selling products by units, across all completed sales.
    ///
    /// Grouped by the committed snapshots, so deleted products still
    /// report under the name they sold as.
    pub async fn top_products(&self, limit: u32) -> DbResult<Vec<TopProduct>> {
        let rows = sqlx::query_as::<_, TopProduct>(
            r#"
            SELECT
                si.product_id,
                si.name_snapshot,
                SUM(si.quantity) AS units_sold,
                SUM(si.subtotal_cents) AS revenue_cents
            FROM sale_items si
            INNER JOIN sales s ON s.id = si.sale_id
            WHERE s.status = 'COMPLETED'
            GROUP BY si.product_id, si.name_snapshot
            ORDER BY units_sold DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Completed sales per day over the last seven days, oldest first.
    pub async fn sales_last_7_days(&self) -> DbResult<Vec<DailySales>> {
        let rows = sqlx::query_as::<_, DailySales>(
            r#"
            SELECT
                date(created_at) AS day,
                COUNT(*) AS sales_count,
                COALESCE(SUM(total_cents), 0) AS revenue_cents
            FROM sales
            WHERE status = 'COMPLETED'
            AND date(created_at) >= date('now', '-6 days')
            GROUP BY day
            ORDER BY day
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
