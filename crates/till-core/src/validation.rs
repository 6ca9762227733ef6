//! # Validation Module
//!
//! Input checks shared by the cart, register and configuration.
//!
//! ## Where Checks Happen
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: UI                                                            │
//! │  └── Steppers, disabled buttons, max quantities                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: till-core (THIS MODULE)                                      │
//! │  └── Reducer and register reject bad input with ValidationError        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend services                                             │
//! │  └── Authoritative; their failure message is shown verbatim            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use till_core::validation::{validate_currency_code, validate_quantity};
//!
//! validate_quantity(5).unwrap();
//! validate_currency_code("AUD").unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest label a cashier can give a parked sale.
pub const MAX_LABEL_LENGTH: usize = 80;

/// Longest merchant identifier accepted from configuration.
pub const MAX_MERCHANT_ID_LENGTH: usize = 64;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - No fixed upper bound; the inventory ceiling is the limit
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price in minor units. Zero is allowed (free items).
///
/// ```rust
/// use till_core::validation::validate_price_minor;
///
/// assert!(validate_price_minor(1099).is_ok());
/// assert!(validate_price_minor(0).is_ok());
/// assert!(validate_price_minor(-100).is_err());
/// ```
pub fn validate_price_minor(minor: i64) -> ValidationResult<()> {
    if minor < 0 {
        return Err(ValidationError::OutOfRange {
            field: "unit price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates an amount that may be zero but never negative.
pub fn validate_non_negative_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates an ISO 4217 style currency code: exactly three ASCII letters.
///
/// Case is not checked; callers upper-case before storing.
pub fn validate_currency_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "currency".to_string(),
        });
    }

    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidFormat {
            field: "currency".to_string(),
            reason: "must be three letters".to_string(),
        });
    }

    Ok(())
}

/// Validates a parked-sale label. Blank is fine (a default is generated).
pub fn validate_label(label: &str) -> ValidationResult<()> {
    if label.trim().chars().count() > MAX_LABEL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "label".to_string(),
            max: MAX_LABEL_LENGTH,
        });
    }

    Ok(())
}

/// Validates the merchant identifier used to namespace storage keys.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - Letters, digits, hyphens and underscores only
pub fn validate_merchant_id(merchant_id: &str) -> ValidationResult<()> {
    let merchant_id = merchant_id.trim();

    if merchant_id.is_empty() {
        return Err(ValidationError::Required {
            field: "merchant id".to_string(),
        });
    }

    if merchant_id.len() > MAX_MERCHANT_ID_LENGTH {
        return Err(ValidationError::TooLong {
            field: "merchant id".to_string(),
            max: MAX_MERCHANT_ID_LENGTH,
        });
    }

    if !merchant_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "merchant id".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(5000).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_price_minor() {
        assert!(validate_price_minor(0).is_ok());
        assert!(validate_price_minor(1099).is_ok());
        assert!(validate_price_minor(-1).is_err());
    }

    #[test]
    fn test_validate_non_negative_amount() {
        assert!(validate_non_negative_amount("float", Money::zero()).is_ok());
        assert_eq!(
            validate_non_negative_amount("float", Money::from_minor(-5)),
            Err(ValidationError::OutOfRange {
                field: "float".to_string(),
                min: 0,
                max: i64::MAX,
            })
        );
    }

    #[test]
    fn test_validate_currency_code() {
        assert!(validate_currency_code("AUD").is_ok());
        assert!(validate_currency_code("usd").is_ok());

        assert!(validate_currency_code("").is_err());
        assert!(validate_currency_code("AU").is_err());
        assert!(validate_currency_code("AUDD").is_err());
        assert!(validate_currency_code("A1D").is_err());
    }

    #[test]
    fn test_validate_label() {
        assert!(validate_label("").is_ok());
        assert!(validate_label("Table 4").is_ok());
        assert!(validate_label(&"x".repeat(MAX_LABEL_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_merchant_id() {
        assert!(validate_merchant_id("merchant_42").is_ok());
        assert!(validate_merchant_id("").is_err());
        assert!(validate_merchant_id("has space").is_err());
        assert!(validate_merchant_id(&"m".repeat(65)).is_err());
    }
}
