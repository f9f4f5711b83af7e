//! # Repository Module
//!
//! Database repository implementations for StoreX.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Caller                                                                 │
//! │       │                                                                 │
//! │       │  db.products().search("coffee", 20)                             │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── search(&self, query, limit)                                       │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, product)                                            │
//! │  └── try_decrement_stock(&self, id, qty)                               │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Multi-statement atomic writes (checkout, void) do NOT live here; they
//! belong to the [`crate::coordinator`], which owns its transactions.
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog CRUD and atomic stock primitives
//! - [`sale::SaleRepository`] - Read side of the sale audit trail
//! - [`report::ReportRepository`] - Aggregate reporting queries

pub mod product;
pub mod report;
pub mod sale;
