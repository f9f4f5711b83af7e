//! # Error Types
//!
//! Domain-specific error types for storex-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  storex-core errors (this file)                                     │
//! │  ├── CoreError        - Business-rule rejections                    │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  storex-db errors (separate crate)                                  │
//! │  ├── DbError          - Database operation failures                 │
//! │  └── TxError          - Coordinator outcomes (adds StockConflict,   │
//! │                         SaleNotFound, Persistence)                  │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → TxError → caller               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, amounts, etc.)
//! 3. Errors are enum variants, never String
//! 4. Every rejection is distinguishable by kind so the caller can decide
//!    whether to retry or correct input

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations. None of them has side
/// effects: when one is returned, no cart or storage state has changed.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Requested quantity exceeds the observed stock snapshot.
    ///
    /// ## User Workflow
    /// ```text
    /// Add to cart (qty: 5)
    ///      │
    ///      ▼
    /// Check stock: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { name: "Coffee", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Only 3 Coffee in stock"
    /// ```
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        name: String,
        available: i64,
        requested: i64,
    },

    /// Cash tendered does not cover the cart total.
    #[error("Insufficient cash: tendered {tendered}, total {total}")]
    InsufficientCash { tendered: Money, total: Money },

    /// Checkout was attempted on an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// A cart line index does not exist.
    #[error("No cart line at index {index}")]
    LineNotFound { index: usize },

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input doesn't meet requirements. Used for early
/// validation before business logic runs — notably for the cash and
/// quantity text fields, which are parsed to typed values here rather
/// than with exception-style control flow inside the transactional core.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., non-numeric cash input).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
