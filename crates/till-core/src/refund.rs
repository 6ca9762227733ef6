//! # Refund Calculator
//!
//! Works out what can still be refunded on a completed sale and what a
//! selection is worth.
//!
//! ```text
//! SaleRecordLine { quantity: 5, refunded_quantity: 2 }
//!        │
//!        ▼
//! RefundableLine { max_refundable: 3 }
//!        │
//!        ▼  requested 5 → clamped to 3
//! contribution = unit_price × 3
//! ```
//!
//! The calculator clamps over-requests instead of failing. The UI already
//! stops the cashier going past the maximum; this is the backstop.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{checked_sum, Money};
use crate::sale::{RefundLineRequest, RefundRequest, SaleRecord};

/// A sale line with quantity left to refund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RefundableLine {
    pub line_id: String,
    pub descriptor: String,
    pub unit_price: Money,
    pub max_refundable: i64,
}

/// Requested refund quantity per line id.
pub type RefundSelection = BTreeMap<String, i64>;

/// Lines where `quantity - refunded_quantity > 0`, in sale order.
pub fn eligible_lines(sale: &SaleRecord) -> Vec<RefundableLine> {
    sale.lines
        .iter()
        .filter_map(|line| {
            let remaining = line.quantity.saturating_sub(line.refunded_quantity);
            (remaining > 0).then(|| RefundableLine {
                line_id: line.id.clone(),
                descriptor: line.descriptor.clone(),
                unit_price: line.unit_price,
                max_refundable: remaining,
            })
        })
        .collect()
}

/// Quantity that will actually be refunded for a request: 0..=max.
fn clamped(requested: i64, line: &RefundableLine) -> i64 {
    requested.clamp(0, line.max_refundable)
}

/// What one line of a selection refunds after clamping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineRefundAmount {
    pub line_id: String,
    /// Requested quantity clamped to `0..=max_refundable`.
    pub quantity: i64,
    /// `unit_price × quantity`.
    pub amount: Money,
}

/// Per-line breakdown of a selection, in sale order.
///
/// Lines that are not eligible, and lines whose clamped quantity is zero,
/// are left out.
pub fn line_refund_amounts(
    eligible: &[RefundableLine],
    requested: &RefundSelection,
) -> CoreResult<Vec<LineRefundAmount>> {
    eligible
        .iter()
        .filter_map(|line| {
            let quantity = clamped(requested.get(&line.line_id).copied().unwrap_or(0), line);
            (quantity > 0).then_some((line, quantity))
        })
        .map(|(line, quantity)| {
            Ok(LineRefundAmount {
                line_id: line.line_id.clone(),
                quantity,
                amount: line.unit_price.multiply_quantity(quantity)?,
            })
        })
        .collect()
}

/// Value of a selection, each line clamped to its refundable maximum.
///
/// Selections for lines that are not eligible are ignored.
///
/// ## Errors
/// `InvalidAmount` if the sale's figures overflow.
pub fn compute_refund_total(eligible: &[RefundableLine], requested: &RefundSelection) -> CoreResult<Money> {
    let lines = line_refund_amounts(eligible, requested)?;
    checked_sum(lines.iter().map(|l| &l.amount))
}

/// Selects every eligible line at its maximum.
pub fn select_all_for_full_refund(eligible: &[RefundableLine]) -> RefundSelection {
    eligible
        .iter()
        .map(|line| (line.line_id.clone(), line.max_refundable))
        .collect()
}

/// Builds the refund service payload from a selection.
///
/// Only lines with a positive clamped quantity are sent; blank reasons are
/// dropped.
///
/// ## Errors
/// `NoSelection` when no line ends up with a quantity above zero;
/// `InvalidAmount` if a line's value overflows.
pub fn build_refund_request(
    sale: &SaleRecord,
    requested: &RefundSelection,
    reason: Option<&str>,
) -> CoreResult<RefundRequest> {
    let lines: Vec<RefundLineRequest> = line_refund_amounts(&eligible_lines(sale), requested)?
        .into_iter()
        .map(|line| RefundLineRequest {
            line_id: line.line_id,
            quantity: line.quantity,
        })
        .collect();

    if lines.is_empty() {
        return Err(CoreError::NoSelection);
    }

    Ok(RefundRequest {
        order_id: sale.id.clone(),
        lines,
        reason: reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sale::{SalePayment, SaleRecordLine, SaleStatus};
    use chrono::Utc;

    fn sale() -> SaleRecord {
        SaleRecord {
            id: "order-1".to_string(),
            code: "A1001".to_string(),
            status: SaleStatus::Completed,
            created_date: Utc::now(),
            lines: vec![
                SaleRecordLine {
                    id: "l1".to_string(),
                    descriptor: "Bowl".to_string(),
                    quantity: 5,
                    refunded_quantity: 2,
                    unit_price: Money::from_minor(1200),
                },
                SaleRecordLine {
                    id: "l2".to_string(),
                    descriptor: "Plate".to_string(),
                    quantity: 1,
                    refunded_quantity: 1,
                    unit_price: Money::from_minor(900),
                },
                SaleRecordLine {
                    id: "l3".to_string(),
                    descriptor: "Cup".to_string(),
                    quantity: 2,
                    refunded_quantity: 0,
                    unit_price: Money::from_minor(450),
                },
            ],
            payments: vec![SalePayment {
                description: "Cash".to_string(),
                paid: Money::from_minor(7800),
            }],
            refunds: vec![],
        }
    }

    #[test]
    fn test_eligible_lines_skip_fully_refunded() {
        let eligible = eligible_lines(&sale());
        let ids: Vec<_> = eligible.iter().map(|l| l.line_id.as_str()).collect();
        assert_eq!(ids, vec!["l1", "l3"]);
        assert_eq!(eligible[0].max_refundable, 3);
    }

    #[test]
    fn test_over_request_is_clamped() {
        let eligible = eligible_lines(&sale());
        let selection = RefundSelection::from([("l1".to_string(), 5)]);
        // 3 units' worth, not 5
        assert_eq!(compute_refund_total(&eligible, &selection).unwrap().minor(), 3 * 1200);
    }

    #[test]
    fn test_total_never_exceeds_full_refund() {
        let eligible = eligible_lines(&sale());
        let ceiling = compute_refund_total(&eligible, &select_all_for_full_refund(&eligible)).unwrap();
        assert_eq!(ceiling.minor(), 3 * 1200 + 2 * 450);

        let greedy = RefundSelection::from([
            ("l1".to_string(), 100),
            ("l2".to_string(), 100),
            ("l3".to_string(), 100),
            ("ghost".to_string(), 100),
        ]);
        assert!(compute_refund_total(&eligible, &greedy).unwrap() <= ceiling);
        let negative = RefundSelection::from([("l1".to_string(), -3)]);
        assert_eq!(compute_refund_total(&eligible, &negative).unwrap(), Money::zero());
    }

    #[test]
    fn test_line_breakdown_clamps_each_line() {
        let eligible = eligible_lines(&sale());
        let selection = RefundSelection::from([
            ("l1".to_string(), 5),
            ("l2".to_string(), 1),
            ("l3".to_string(), -4),
        ]);

        let lines = line_refund_amounts(&eligible, &selection).unwrap();
        assert_eq!(
            lines,
            vec![LineRefundAmount {
                line_id: "l1".to_string(),
                quantity: 3,
                amount: Money::from_minor(3600),
            }]
        );
        assert_eq!(compute_refund_total(&eligible, &selection).unwrap(), Money::from_minor(3600));

        let both = RefundSelection::from([("l1".to_string(), 1), ("l3".to_string(), 2)]);
        let amounts: Vec<i64> = line_refund_amounts(&eligible, &both)
            .unwrap()
            .iter()
            .map(|l| l.amount.minor())
            .collect();
        assert_eq!(amounts, vec![1200, 900]);
    }

    #[test]
    fn test_overflowing_sale_figures_error() {
        let mut huge = sale();
        huge.lines[0].unit_price = Money::from_minor(i64::MAX / 2);
        let eligible = eligible_lines(&huge);
        let selection = RefundSelection::from([("l1".to_string(), 3)]);
        assert!(matches!(
            compute_refund_total(&eligible, &selection),
            Err(CoreError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_build_request() {
        let selection = RefundSelection::from([
            ("l1".to_string(), 9),
            ("l3".to_string(), 0),
        ]);
        let request = build_refund_request(&sale(), &selection, Some(" chipped ")).unwrap();
        assert_eq!(request.order_id, "order-1");
        assert_eq!(
            request.lines,
            vec![RefundLineRequest {
                line_id: "l1".to_string(),
                quantity: 3
            }]
        );
        assert_eq!(request.reason.as_deref(), Some("chipped"));
    }

    #[test]
    fn test_build_request_without_selection() {
        let zeroes = RefundSelection::from([("l1".to_string(), 0), ("l2".to_string(), 4)]);
        assert_eq!(
            build_refund_request(&sale(), &zeroes, None),
            Err(CoreError::NoSelection)
        );
        assert_eq!(
            build_refund_request(&sale(), &RefundSelection::new(), None),
            Err(CoreError::NoSelection)
        );
    }
}
