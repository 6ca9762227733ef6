//! # API Error Type
//!
//! What the UI layer receives when a session operation fails.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Session operation                                                      │
//! │       │                                                                 │
//! │       ├── CoreError      (rejected input, empty cart, no selection)     │
//! │       ├── StoreError     (store unreachable at startup)                 │
//! │       ├── ConfigError    (bad terminal.toml / TILL_* value)             │
//! │       └── ServiceFailure (backend said no; message kept verbatim)       │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │  ApiError { code: "SERVICE_REJECTED", message: "Card declined" }        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;
use till_core::CoreError;
use till_store::StoreError;

use crate::services::ServiceFailure;

/// API error returned from session operations.
///
/// ```json
/// { "code": "INSUFFICIENT_STOCK", "message": "Quantity 6 for v1 exceeds available stock (5)" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Referenced line or record does not exist
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Key-value store failure
    StorageError,

    /// Operation not allowed in the current state
    BusinessLogic,

    /// Programming error upstream
    Internal,

    /// Cart operation failed
    CartError,

    /// Not enough stock for the requested quantity
    InsufficientStock,

    /// Tender problem
    PaymentError,

    /// The sale, void or refund service refused the request
    ServiceRejected,

    /// Terminal configuration is unusable
    ConfigError,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{resource} not found: {id}"))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn business(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BusinessLogic, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidAmount { reason } => {
                tracing::error!(%reason, "Money invariant violated");
                ApiError::new(ErrorCode::Internal, "Amount calculation failed")
            }
            err @ CoreError::QuantityExceedsStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            CoreError::LineNotFound(id) => ApiError::not_found("Cart line", &id),
            err @ CoreError::InvalidDiscount { .. } => ApiError::validation(err.to_string()),
            err @ CoreError::EmptyCart => ApiError::new(ErrorCode::CartError, err.to_string()),
            err @ CoreError::NoSelection => ApiError::validation(err.to_string()),
            err @ CoreError::InsufficientTender { .. } => {
                ApiError::new(ErrorCode::PaymentError, err.to_string())
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

/// Converts store errors to API errors. Details go to the log only.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "Store operation failed");
        let message = match err {
            StoreError::ConnectionFailed(_) => "Local storage unavailable",
            StoreError::MigrationFailed(_) => "Local storage migration failed",
            StoreError::QueryFailed(_) | StoreError::Internal(_) => "Local storage operation failed",
            StoreError::Serialization(_) => "Stored data could not be read",
        };
        ApiError::new(ErrorCode::StorageError, message)
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

/// Backend refusals pass through unchanged.
impl From<ServiceFailure> for ApiError {
    fn from(err: ServiceFailure) -> Self {
        ApiError::new(ErrorCode::ServiceRejected, err.message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Failures loading or saving `terminal.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config could not be written: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("No config path available")]
    NoConfigPath,
}

pub type ConfigResult<T> = Result<T, ConfigError>;
