//! # Error Types
//!
//! Domain-specific error types for boardworks-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  boardworks-core errors (this file)                                     │
//! │  ├── CoreError        - Rule and order-shape failures                   │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  boardworks-quote errors (app crate)                                    │
//! │  └── QuoteError       - I/O, file parsing, wraps CoreError              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → QuoteError → stderr                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! The engines are total functions. These degrade to defaults instead:
//! - Unknown material token → default cell price, best-effort label
//! - Missing board strips in the ETA → zero complexity days
//! - Empty cart → `None`
//! - Bad pricing patch field → field rejected, rest of the patch applied

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Lead-time rules are internally inconsistent.
    ///
    /// ## When This Occurs
    /// - A production or shipping range has `min > max`
    /// - `cells_per_extra_day` is zero
    /// - Shipping minimum is zero (a delivery date could land on "today")
    #[error("Invalid lead-time rules: {reason}")]
    InvalidLeadTimeRules { reason: String },

    /// Saved board JSON could not be turned into a board configuration.
    #[error("Malformed board details: {reason}")]
    MalformedBoard { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Also used to report individual rejected fields of a pricing patch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Value has the wrong JSON type.
    #[error("{field} must be {expected}")]
    WrongType { field: String, expected: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Two entries normalize to the same key.
    #[error("{field} is listed more than once ({first:?} and {second:?})")]
    Duplicate {
        field: String,
        first: String,
        second: String,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
