//! # storex-db: Storage Layer for StoreX POS
//!
//! This crate provides database access for the StoreX transaction core.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        StoreX Data Flow                                 │
//! │                                                                         │
//! │  Terminal action (checkout, void, edit)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     storex-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌────────────────┐   ┌───────────────┐  │   │
//! │  │   │   Database    │   │  Coordinator   │   │  Migrations   │  │   │
//! │  │   │   (pool.rs)   │   │ (atomic tx:    │   │  (embedded)   │  │   │
//! │  │   │               │   │  checkout,     │   │               │  │   │
//! │  │   │ SqlitePool    │◄──│  void, reload) │   │ 001_init.sql  │  │   │
//! │  │   │               │   ├────────────────┤   │               │  │   │
//! │  │   │               │◄──│  Repositories  │   │               │  │   │
//! │  │   └───────────────┘   └────────────────┘   └───────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL mode)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and transaction error types
//! - [`repository`] - Read/write repositories (product, sale, report)
//! - [`stock`] - Advisory stock validation against live inventory
//! - [`coordinator`] - Atomic checkout, void, and edit-reload
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storex_db::{Database, DbConfig};
//!
//! let config = DbConfig::new("path/to/storex.db");
//! let db = Database::new(config).await?;
//!
//! // Repositories for reads
//! let products = db.products().search("coffee", 20).await?;
//!
//! // Coordinator for the money path
//! let receipt = db.coordinator().checkout(&cart, cash, &session).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod coordinator;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod stock;

// =============================================================================
// Re-exports
// =============================================================================

pub use coordinator::{Coordinator, Receipt};
pub use error::{DbError, DbResult, TxError, TxResult};
pub use pool::{Database, DbConfig};
pub use stock::StockValidator;

// Repository re-exports for convenience
pub use repository::product::ProductRepository;
pub use repository::report::ReportRepository;
pub use repository::sale::SaleRepository;
