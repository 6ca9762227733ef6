//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  till-core errors (this file)                                          │
//! │  ├── CoreError        - Domain failures and invariant violations       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  till-store errors (separate crate)                                    │
//! │  └── StoreError       - Key-value store failures                       │
//! │                                                                         │
//! │  till-terminal errors (app)                                            │
//! │  └── ApiError         - What the UI layer sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → UI                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Kinds of Failure
//! - `InvalidAmount` is an invariant violation: some upstream code fed a
//!   negative or non-finite number into money math. Treat as a bug.
//! - Everything else is a recoverable local condition. The cart reducer
//!   reports these as rejections and leaves its state untouched.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Money math was handed a negative or non-finite input.
    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// Adding to a line would take it past its inventory ceiling.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart holds v1 × 2 (ceiling 5)
    ///      │
    ///      ▼
    /// add v1 × 4 → combined 6
    ///      │
    ///      ▼
    /// QuantityExceedsStock { variant_id: "v1", requested: 6, available: 5 }
    ///      │
    ///      ▼
    /// Cart still holds v1 × 2 (no partial add)
    /// ```
    #[error("Quantity {requested} for {variant_id} exceeds available stock ({available})")]
    QuantityExceedsStock {
        variant_id: String,
        requested: i64,
        available: i64,
    },

    /// No line with this variant in the cart.
    #[error("Line not found: {0}")]
    LineNotFound(String),

    /// Discount parameters are out of range.
    #[error("Invalid discount: {reason}")]
    InvalidDiscount { reason: String },

    /// Checkout was attempted on a cart with no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// A refund was submitted with no line having a positive quantity.
    #[error("No lines selected for refund")]
    NoSelection,

    /// Cash handed over does not cover the sale total.
    #[error("Tendered {tendered} does not cover total {total}")]
    InsufficientTender { total: i64, tendered: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Shorthand for an [`CoreError::InvalidAmount`].
    pub fn invalid_amount(reason: impl Into<String>) -> Self {
        CoreError::InvalidAmount {
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
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

    /// Invalid format (e.g., bad currency code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
