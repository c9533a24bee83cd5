//! # Error Types
//!
//! Domain-specific error types for checkout-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  checkout-core errors (this file)                                      │
//! │  ├── PriceError        - a line price could not be parsed              │
//! │  ├── DiscountRejected  - a code failed registry checks (with reason)   │
//! │  ├── DiscountError     - illegal discount state transition             │
//! │  ├── ValidationError   - input rule violations                         │
//! │  └── CoreError         - umbrella, `#[from]` all of the above          │
//! │                                                                         │
//! │  checkout-cli errors (separate crate)                                  │
//! │  └── CliError          - I/O, settings, snapshot decoding              │
//! │                                                                         │
//! │  None of these abort a total: the composer recovers each one locally   │
//! │  and records a `CheckoutIssue` instead.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Umbrella error for callers that want a single error type.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    InvalidPrice(#[from] PriceError),

    #[error(transparent)]
    DiscountRejected(#[from] DiscountRejected),

    #[error(transparent)]
    Discount(#[from] DiscountError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Price Error
// =============================================================================

/// A raw price value could not be turned into a non-negative amount.
///
/// ## Recovery
/// Never fatal. The aggregator substitutes zero for the offending line and
/// reports the line id so the UI can flag it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("price is empty")]
    Empty,

    #[error("price '{0}' is not a number")]
    NotNumeric(String),

    #[error("price '{0}' is negative")]
    Negative(String),

    #[error("price '{0}' is out of range")]
    OutOfRange(String),
}

// =============================================================================
// Discount Errors
// =============================================================================

/// Why the code registry refused a discount code.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    #[error("code not found")]
    NotFound,

    #[error("code is no longer active")]
    Inactive,

    #[error("code is not valid yet")]
    NotYetValid,

    #[error("code has expired")]
    Expired,

    #[error("code has reached its usage limit")]
    UsageLimitReached,

    #[error("order must be at least {minimum} to use this code")]
    BelowMinimumOrder { minimum: Money },

    /// The registry row itself is invalid (percentage over 100%, negative amount).
    #[error("code is misconfigured")]
    Misconfigured,
}

/// A discount code that failed validation.
///
/// ## User Workflow
/// ```text
/// Enter "SAVE20" ──► registry check ──► Expired
///                                          │
///                                          ▼
///        UI shows: "Discount code SAVE20 was rejected: code has expired"
///                                          │
///                                          ▼
///                    Totals computed as if no code was entered
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
#[error("Discount code {code} was rejected: {reason}")]
pub struct DiscountRejected {
    pub code: String,
    pub reason: RejectionReason,
}

impl DiscountRejected {
    pub fn new(code: impl Into<String>, reason: RejectionReason) -> Self {
        DiscountRejected {
            code: code.into(),
            reason,
        }
    }
}

/// Discount lifecycle misuse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscountError {
    /// The requested step does not apply to the current state.
    #[error("cannot {action} while discount is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    /// A validation result arrived for a code other than the one pending.
    #[error("validation result for {received} does not match pending code {pending}")]
    StaleResult { pending: String, received: String },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
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

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
