//! # Validation Module
//!
//! Field-level rules shared by pricing overrides and checkout.
//!
//! ## Where Rules Apply
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Points                                  │
//! │                                                                         │
//! │  Pricing override (env / TOML / JSON patch)                            │
//! │  ├── validate_currency      currency code                              │
//! │  └── validate_amount        cell price, base prices, surcharges        │
//! │           │                                                             │
//! │           ▼  rejected fields are reported, the rest still apply         │
//! │                                                                         │
//! │  Checkout                                                               │
//! │  └── validate_quantity      boards per order line                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_AMOUNT_CENTS, MAX_BOARD_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a currency code and returns it trimmed and upper-cased.
///
/// ## Example
/// ```rust
/// use boardworks_core::validation::validate_currency;
///
/// assert_eq!(validate_currency(" cad ").unwrap(), "CAD");
/// assert!(validate_currency("   ").is_err());
/// ```
pub fn validate_currency(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "currency".to_string(),
        });
    }

    Ok(code.to_uppercase())
}

/// Validates a configured or catalog amount. Zero is allowed (free extras).
///
/// ## Rules
/// - Must not be negative
/// - Must not exceed [`MAX_AMOUNT_CENTS`]
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<Money> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    if amount.cents() > MAX_AMOUNT_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT_CENTS,
        });
    }

    Ok(amount)
}

/// Validates a checkout quantity.
///
/// ## Rules
/// - Must be at least 1
/// - Must not exceed [`MAX_BOARD_QUANTITY`]
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 || qty > MAX_BOARD_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::from(MAX_BOARD_QUANTITY),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
