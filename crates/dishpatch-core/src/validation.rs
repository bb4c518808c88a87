//! # Validation Module
//!
//! Input validation utilities for dishpatch.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: External caller (HTTP layer, excluded)                        │
//! │  ├── Form/type parsing                                                  │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                        │
//! │  └── Runs before any transaction is opened                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL / CHECK constraints                                       │
//! │  └── Foreign key constraints                                            │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use dishpatch_core::validation::{validate_quantity, validate_fee_cents};
//!
//! validate_quantity(5).unwrap();
//! validate_fee_cents(350).unwrap();
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::{MAX_ITEM_QUANTITY, MAX_TEXT_LEN};

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an order-line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a menu-item price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (promotional items)
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a delivery fee in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free delivery)
pub fn validate_fee_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "fee".to_string(),
        });
    }

    Ok(())
}

/// Validates the nested-report threshold.
///
/// ## Rules
/// - Must be non-negative (>= 0); zero means "any active order"
pub fn validate_min_orders(min_orders: i64) -> ValidationResult<()> {
    if min_orders < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "min_orders".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a name-like free-text field (customer name, restaurant name,
/// menu item name, area).
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most MAX_TEXT_LEN characters
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    // chars, not bytes: multibyte names must not hit the limit early
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }

    Ok(())
}

/// Validates a delivery drop-off location.
///
/// Same rules as [`validate_name`], kept separate so call sites read as the
/// business rule they enforce.
pub fn validate_location(location: &str) -> ValidationResult<()> {
    validate_name("location", location)
}

// =============================================================================
// Unit Tests
// =============================================================================
