//! # External Sale Services
//!
//! The backend owns completed sales. The session builds request payloads
//! and hands them to whatever implements [`SaleService`]; it never retries
//! and never changes local state when a call fails.
//!
//! ```text
//! Session ── SaleRequest ──► create_sale ──► Ok(SaleRecord) | Err("Card declined")
//!         ── VoidRequest ──► void_sale   ──► Ok(())         | Err(message)
//!         ── RefundRequest ► refund_sale ──► Ok(())         | Err(message)
//! ```

use async_trait::async_trait;
use thiserror::Error;

use till_core::sale::{RefundRequest, SaleRecord, SaleRequest, VoidRequest};

/// A refusal from the backend, with the message to show the cashier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ServiceFailure {
    pub message: String,
}

impl ServiceFailure {
    pub fn new(message: impl Into<String>) -> Self {
        ServiceFailure {
            message: message.into(),
        }
    }
}

/// Sale creation, void and refund endpoints.
#[async_trait]
pub trait SaleService: Send + Sync {
    /// Records a sale; returns the order snapshot on success.
    async fn create_sale(&self, request: SaleRequest) -> Result<SaleRecord, ServiceFailure>;

    /// Voids a completed sale.
    async fn void_sale(&self, request: VoidRequest) -> Result<(), ServiceFailure>;

    /// Refunds some or all lines of a completed sale.
    async fn refund_sale(&self, request: RefundRequest) -> Result<(), ServiceFailure>;
}
