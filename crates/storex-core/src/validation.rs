//! # Validation Module
//!
//! Input validation utilities for StoreX.
//!
//! ## Validation Strategy
//! Validation happens in layers: the UI gives immediate feedback, this
//! module enforces the business rules, and the database schema is the
//! final backstop (NOT NULL, CHECK constraints). The cash and quantity
//! text fields are parsed here into typed values — invalid text becomes a
//! [`ValidationError`], never a panic or exception-driven branch inside
//! the transactional core.
//!
//! ## Usage
//! ```rust
//! use storex_core::validation::{parse_cash_amount, validate_quantity};
//!
//! // Parse the tender field before checkout
//! let cash = parse_cash_amount("1,250.50").unwrap();
//! assert_eq!(cash.cents(), 125_050);
//!
//! // Validate quantity before a cart operation
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Text Parsers
// =============================================================================

/// Parses a quantity text field (e.g. the "*3" suffix of a search entry).
pub fn parse_quantity(text: &str) -> ValidationResult<i64> {
    let text = text.trim();

    let qty: i64 = text.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "quantity".to_string(),
        reason: "must be a whole number".to_string(),
    })?;

    validate_quantity(qty)?;
    Ok(qty)
}

/// Parses a cash amount entered as text into exact [`Money`].
///
/// Accepts thousands separators and an optional fractional part of up to
/// two digits. Parsing is pure integer math; no floating point.
///
/// ## Example
/// ```rust
/// use storex_core::validation::parse_cash_amount;
///
/// assert_eq!(parse_cash_amount("30").unwrap().cents(), 3000);
/// assert_eq!(parse_cash_amount("1,000").unwrap().cents(), 100_000);
/// assert_eq!(parse_cash_amount("12.5").unwrap().cents(), 1250);
/// assert!(parse_cash_amount("12.345").is_err());
/// assert!(parse_cash_amount("abc").is_err());
/// ```
pub fn parse_cash_amount(text: &str) -> ValidationResult<Money> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();

    if cleaned.is_empty() {
        return Err(ValidationError::Required {
            field: "cash".to_string(),
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "cash".to_string(),
        reason: reason.to_string(),
    };

    let (major_text, minor_text) = match cleaned.split_once('.') {
        Some((major, minor)) => (major, Some(minor)),
        None => (cleaned.as_str(), None),
    };

    if major_text.is_empty() || !major_text.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("must be a non-negative amount"));
    }

    let major: i64 = major_text
        .parse()
        .map_err(|_| invalid("amount is too large"))?;

    let minor: i64 = match minor_text {
        None | Some("") => 0,
        Some(minor) => {
            if minor.len() > 2 || !minor.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid("at most two decimal places"));
            }
            // "5" means 50 cents, "05" means 5 cents
            let parsed: i64 = minor.parse().map_err(|_| invalid("bad decimals"))?;
            if minor.len() == 1 {
                parsed * 10
            } else {
                parsed
            }
        }
    };

    Ok(Money::from_major_minor(major, minor))
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a barcode.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 32 characters
/// - Digits only (EAN/UPC family)
pub fn validate_barcode(barcode: &str) -> ValidationResult<()> {
    let barcode = barcode.trim();

    if barcode.is_empty() {
        return Err(ValidationError::Required {
            field: "barcode".to_string(),
        });
    }

    if barcode.len() > 32 {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: 32,
        });
    }

    if !barcode.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
