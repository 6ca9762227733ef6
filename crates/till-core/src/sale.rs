//! # Sale Records and Requests
//!
//! The data crossing the boundary to the sale, void and refund services.
//!
//! ```text
//!   CartState ──► SaleRequest ──► [sale creation service] ──► SaleRecord
//!                                                                  │
//!   RefundRequest ◄── refund calculator ◄──────────────────────────┤
//!   VoidRequest   ◄── cashier                                      │
//!   Reconciliation ◄── register (today's SaleRecords) ◄────────────┘
//! ```
//!
//! The backend is the source of truth for completed sales; these types
//! only mirror the fields the register needs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::{CartState, PaymentMethod, Price};
use crate::discount::Discount;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Sale Record (read side)
// =============================================================================

/// Backend status of a completed sale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleStatus {
    #[default]
    Completed,
    Voided,
}

/// One line of a completed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecordLine {
    pub id: String,
    pub descriptor: String,
    pub quantity: i64,
    #[serde(default)]
    pub refunded_quantity: i64,
    pub unit_price: Money,
}

/// A payment against a sale. `description` is `"Cash"` for cash tenders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalePayment {
    pub description: String,
    pub paid: Money,
}

/// A refund already issued against a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleRefund {
    pub amount: Money,
    #[ts(as = "String")]
    pub created_date: DateTime<Utc>,
}

/// A completed sale as returned by the backend (the "order snapshot").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub id: String,
    pub code: String,
    #[serde(default)]
    pub status: SaleStatus,
    #[ts(as = "String")]
    pub created_date: DateTime<Utc>,
    pub lines: Vec<SaleRecordLine>,
    pub payments: Vec<SalePayment>,
    #[serde(default)]
    pub refunds: Vec<SaleRefund>,
}

impl SaleRecord {
    pub fn is_voided(&self) -> bool {
        self.status == SaleStatus::Voided
    }
}

// =============================================================================
// Requests (write side)
// =============================================================================

/// One line of a sale creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequestLine {
    pub id: String,
    pub merchant_ref: String,
    /// Absent for custom lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    pub descriptor: String,
    pub quantity: i64,
    pub unit_price: Price,
}

/// Payload for the sale creation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_email: Option<String>,
    pub lines: Vec<SaleRequestLine>,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<Discount>,
}

impl SaleRequest {
    /// Builds the creation payload from the live cart.
    ///
    /// Blank email and notes are sent as absent. Custom lines carry no
    /// variant id.
    pub fn from_cart(merchant_ref: &str, state: &CartState) -> CoreResult<Self> {
        if state.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let lines = state
            .lines
            .iter()
            .map(|line| SaleRequestLine {
                id: Uuid::new_v4().to_string(),
                merchant_ref: merchant_ref.to_string(),
                variant_id: (!line.is_custom).then(|| line.variant_id.clone()),
                descriptor: line.descriptor(),
                quantity: line.quantity,
                unit_price: line.unit_price.clone(),
            })
            .collect();

        Ok(SaleRequest {
            buyer_email: non_blank(&state.buyer_email),
            lines,
            payment_method: state.payment_method,
            notes: non_blank(&state.notes),
            discount: state.discount.clone(),
        })
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Payload for the void service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VoidRequest {
    pub order_id: String,
}

/// One `{lineId, quantity}` pair of a refund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RefundLineRequest {
    pub line_id: String,
    pub quantity: i64,
}

/// Payload for the refund service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    pub order_id: String,
    pub lines: Vec<RefundLineRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartLine;
    use crate::inventory::StockCeiling;

    fn catalog_line() -> CartLine {
        CartLine {
            product_id: Some("p1".to_string()),
            variant_id: "v1".to_string(),
            product_name: "Tee".to_string(),
            variant_name: "Large".to_string(),
            image: None,
            unit_price: Price::new(Money::from_minor(3500), "AUD"),
            quantity: 2,
            max_quantity: StockCeiling::Limited(4),
            is_custom: false,
            for_object_ref: Some("ref-v1".to_string()),
        }
    }

    #[test]
    fn test_request_from_cart() {
        let state = CartState {
            lines: vec![
                catalog_line(),
                CartLine::custom("Alteration", Price::new(Money::from_minor(1000), "AUD"), 1),
            ],
            buyer_email: "  ".to_string(),
            notes: "hem 2cm".to_string(),
            ..CartState::default()
        };

        let request = SaleRequest::from_cart("merchant-7", &state).unwrap();
        assert_eq!(request.buyer_email, None);
        assert_eq!(request.notes.as_deref(), Some("hem 2cm"));
        assert_eq!(request.lines.len(), 2);
        assert_eq!(request.lines[0].variant_id.as_deref(), Some("v1"));
        assert_eq!(request.lines[0].descriptor, "Tee - Large");
        assert_eq!(request.lines[0].merchant_ref, "merchant-7");
        assert_eq!(request.lines[1].variant_id, None);

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("buyerEmail").is_none());
        assert!(json["lines"][1].get("variantId").is_none());
    }

    #[test]
    fn test_request_from_empty_cart_fails() {
        assert_eq!(
            SaleRequest::from_cart("m", &CartState::default()),
            Err(CoreError::EmptyCart)
        );
    }
}
