//! # Register Session
//!
//! The cash drawer's "open for the day" record and end-of-day
//! reconciliation.
//!
//! ## Reconciliation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Sales feed (backend)                                                   │
//! │       │                                                                 │
//! │       ▼  keep: created today (local) AND not voided                     │
//! │  ┌─────────────┐                                                        │
//! │  │ first       │── "Cash" ─────► cash bucket                           │
//! │  │ payment     │── anything else ► terminal bucket                      │
//! │  └─────────────┘                                                        │
//! │                                                                         │
//! │  refunds_today = Σ refunds dated today across today's sales            │
//! │  expected_cash = opening_float + cash_total − refunds_today             │
//! │  variance      = counted − expected_cash   (0 Balanced, >0 Over, <0 Short)
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The register never keeps a running balance. Everything is derived from
//! the feed each time it is asked.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::sale::SaleRecord;
use crate::validation::{validate_currency_code, validate_non_negative_amount};

/// Payment description the backend uses for cash tenders.
pub const CASH_PAYMENT_DESCRIPTION: &str = "Cash";

/// Calendar day of a timestamp in the machine's local time zone.
pub fn local_day(ts: DateTime<Utc>) -> NaiveDate {
    ts.with_timezone(&Local).date_naive()
}

// =============================================================================
// Session
// =============================================================================

/// An open cash drawer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSession {
    #[ts(as = "String")]
    pub opened_at_timestamp: DateTime<Utc>,
    pub opening_float_minor_units: Money,
    pub currency_code: String,
}

impl RegisterSession {
    /// Opens a drawer with a non-negative float.
    pub fn open(opening_float: Money, currency_code: &str, now: DateTime<Utc>) -> CoreResult<Self> {
        validate_non_negative_amount("opening float", opening_float)?;
        validate_currency_code(currency_code)?;

        Ok(RegisterSession {
            opened_at_timestamp: now,
            opening_float_minor_units: opening_float,
            currency_code: currency_code.trim().to_ascii_uppercase(),
        })
    }

    /// True when the session was opened on a different local day.
    pub fn is_stale(&self, today: NaiveDate) -> bool {
        local_day(self.opened_at_timestamp) != today
    }
}

// =============================================================================
// Reconciliation
// =============================================================================

/// Where counted cash landed relative to expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VarianceStatus {
    Balanced,
    Over,
    Short,
}

impl VarianceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            VarianceStatus::Balanced => "Balanced",
            VarianceStatus::Over => "Over",
            VarianceStatus::Short => "Short",
        }
    }
}

/// Counted minus expected cash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Variance {
    pub amount: Money,
    pub status: VarianceStatus,
}

/// End-of-day figures for one register session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub opening_float: Money,
    pub cash_total: Money,
    pub terminal_total: Money,
    pub refunds_today: Money,
    pub grand_total: Money,
    pub expected_cash: Money,
    pub sale_count: usize,
    pub currency_code: String,
}

impl Reconciliation {
    /// Compares a physical count against expected cash.
    pub fn variance(&self, counted_cash: Money) -> Variance {
        let amount = counted_cash - self.expected_cash;
        let status = match amount.minor() {
            0 => VarianceStatus::Balanced,
            n if n > 0 => VarianceStatus::Over,
            _ => VarianceStatus::Short,
        };
        Variance { amount, status }
    }
}

/// Derives today's figures from the sales feed.
///
/// A sale with no payments counts towards `sale_count` but neither bucket.
pub fn reconcile(session: &RegisterSession, sales: &[SaleRecord], today: NaiveDate) -> Reconciliation {
    let todays_sales: Vec<&SaleRecord> = sales
        .iter()
        .filter(|sale| !sale.is_voided() && local_day(sale.created_date) == today)
        .collect();

    let mut cash_total = Money::zero();
    let mut terminal_total = Money::zero();
    for payment in todays_sales.iter().filter_map(|sale| sale.payments.first()) {
        if payment.description == CASH_PAYMENT_DESCRIPTION {
            cash_total += payment.paid;
        } else {
            terminal_total += payment.paid;
        }
    }

    let refunds_today: Money = todays_sales
        .iter()
        .flat_map(|sale| sale.refunds.iter())
        .filter(|refund| local_day(refund.created_date) == today)
        .map(|refund| refund.amount)
        .sum();

    let opening_float = session.opening_float_minor_units;

    Reconciliation {
        opening_float,
        cash_total,
        terminal_total,
        refunds_today,
        grand_total: cash_total + terminal_total,
        expected_cash: opening_float + cash_total - refunds_today,
        sale_count: todays_sales.len(),
        currency_code: session.currency_code.clone(),
    }
}
