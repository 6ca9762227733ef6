//! # Cart Engine
//!
//! The transaction in progress, as a reducer over an immutable state value.
//!
//! ## Reducer Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Transitions                               │
//! │                                                                         │
//! │  UI Intent               CartAction                State Change          │
//! │  ─────────               ──────────                ────────────          │
//! │                                                                         │
//! │  Tap product ──────────► AddItem(line) ──────────► merge or append     │
//! │                                                    (reject if over      │
//! │                                                     ceiling, no clamp)  │
//! │  Edit quantity ────────► UpdateQuantity ─────────► set verbatim,        │
//! │                                                    <= 0 removes         │
//! │  Remove ───────────────► RemoveItem ─────────────► drop line            │
//! │  Payment / email / ────► Set* ───────────────────► replace field        │
//! │  notes / discount                                                       │
//! │  Toggle % / fixed ─────► SwitchDiscountKind ─────► discount = None      │
//! │  Resume parked sale ───► Restore(snapshot) ──────► replace everything   │
//! │  New sale ─────────────► Clear ──────────────────► initial state        │
//! │                                                                         │
//! │  Totals are derived on every read, never stored.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ceiling Asymmetry
//! `AddItem` rejects a merge that would overflow the line's ceiling and
//! leaves the cart unchanged. `UpdateQuantity` does not look at the
//! ceiling at all; callers clamp with
//! [`crate::inventory::clamp_quantity`] before dispatching.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::discount::{compute_discount, Discount, DiscountKind};
use crate::error::{CoreError, CoreResult};
use crate::inventory::{can_add, max_allowed, CatalogProduct, CatalogVariant, StockCeiling};
use crate::money::{checked_sum, split_proportionally, Money};
use crate::validation::{validate_price_minor, validate_quantity};

// =============================================================================
// Price & Payment Method
// =============================================================================

/// A unit price snapshot with its currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub amount_minor_units: Money,
    pub currency_code: String,
}

impl Price {
    pub fn new(amount: Money, currency_code: impl Into<String>) -> Self {
        Price {
            amount_minor_units: amount,
            currency_code: currency_code.into(),
        }
    }
}

/// How the customer is paying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Notes and coins into the drawer.
    #[default]
    Cash,
    /// Card on a standalone terminal.
    ExternalTerminal,
}

// =============================================================================
// Cart Line
// =============================================================================

/// One purchasable line. `variant_id` is unique within a cart.
///
/// ## Snapshot Pattern
/// The unit price and ceiling are frozen when the line is created. A
/// price change in the catalog afterwards does not touch the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// None for custom lines.
    pub product_id: Option<String>,
    pub variant_id: String,
    pub product_name: String,
    pub variant_name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub unit_price: Price,
    pub quantity: i64,
    pub max_quantity: StockCeiling,
    pub is_custom: bool,
    /// Opaque catalog reference, None for custom lines.
    pub for_object_ref: Option<String>,
}

impl CartLine {
    /// Snapshots a catalog variant into a cart line.
    pub fn from_catalog(product: &CatalogProduct, variant: &CatalogVariant, quantity: i64) -> Self {
        CartLine {
            product_id: Some(product.product_id.clone()),
            variant_id: variant.variant_id.clone(),
            product_name: product.name.clone(),
            variant_name: variant.name.clone(),
            image: variant.image.clone(),
            unit_price: variant.default_price.clone(),
            quantity,
            max_quantity: max_allowed(&variant.inventory),
            is_custom: false,
            for_object_ref: Some(variant.object_ref.clone()),
        }
    }

    /// A manually keyed item with no catalog identity.
    ///
    /// Gets a fresh `custom-<uuid>` variant token and no ceiling.
    pub fn custom(name: impl Into<String>, unit_price: Price, quantity: i64) -> Self {
        let name = name.into();
        CartLine {
            product_id: None,
            variant_id: format!("custom-{}", Uuid::new_v4()),
            product_name: name.clone(),
            variant_name: name,
            image: None,
            unit_price,
            quantity,
            max_quantity: StockCeiling::Unlimited,
            is_custom: true,
            for_object_ref: None,
        }
    }

    /// Unit price × quantity; `InvalidAmount` if that overflows.
    pub fn line_total(&self) -> CoreResult<Money> {
        self.unit_price.amount_minor_units.multiply_quantity(self.quantity)
    }

    /// Name for receipts and the sale request.
    pub fn descriptor(&self) -> String {
        if self.is_custom || self.variant_name.is_empty() || self.variant_name == self.product_name {
            self.product_name.clone()
        } else {
            format!("{} - {}", self.product_name, self.variant_name)
        }
    }
}

// =============================================================================
// Cart State
// =============================================================================

/// The live transaction for one merchant session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    pub lines: Vec<CartLine>,
    pub payment_method: PaymentMethod,
    pub buyer_email: String,
    pub notes: String,
    pub discount: Option<Discount>,
}

impl CartState {
    /// Looks up a line by variant.
    pub fn line(&self, variant_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.variant_id == variant_id)
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Every transition the cart understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    AddItem(CartLine),
    UpdateQuantity { variant_id: String, quantity: i64 },
    RemoveItem { variant_id: String },
    SetPaymentMethod(PaymentMethod),
    SetBuyerEmail(String),
    SetNotes(String),
    SetDiscount(Option<Discount>),
    SwitchDiscountKind(DiscountKind),
    Restore(CartState),
    Clear,
}

/// Applies an action, or explains why it was refused.
///
/// The input state is never modified; on success a new state is returned.
pub fn try_reduce(state: &CartState, action: CartAction) -> CoreResult<CartState> {
    match action {
        CartAction::AddItem(line) => add_item(state, line),

        CartAction::UpdateQuantity {
            variant_id,
            quantity,
        } => {
            let mut next = state.clone();
            if quantity <= 0 {
                next.lines.retain(|l| l.variant_id != variant_id);
            } else if let Some(line) = next.lines.iter_mut().find(|l| l.variant_id == variant_id) {
                line.quantity = quantity;
            }
            Ok(next)
        }

        CartAction::RemoveItem { variant_id } => {
            let mut next = state.clone();
            next.lines.retain(|l| l.variant_id != variant_id);
            Ok(next)
        }

        CartAction::SetPaymentMethod(method) => Ok(CartState {
            payment_method: method,
            ..state.clone()
        }),

        CartAction::SetBuyerEmail(email) => Ok(CartState {
            buyer_email: email,
            ..state.clone()
        }),

        CartAction::SetNotes(notes) => Ok(CartState {
            notes,
            ..state.clone()
        }),

        CartAction::SetDiscount(discount) => {
            if let Some(d) = &discount {
                d.validate()?;
            }
            Ok(CartState {
                discount,
                ..state.clone()
            })
        }

        // Switching type discards the value instead of converting it.
        CartAction::SwitchDiscountKind(_) => Ok(CartState {
            discount: None,
            ..state.clone()
        }),

        CartAction::Restore(snapshot) => {
            validate_snapshot(&snapshot)?;
            Ok(snapshot)
        }

        CartAction::Clear => Ok(CartState::default()),
    }
}

/// Applies an action; a refused action returns the state unchanged.
pub fn reduce(state: &CartState, action: CartAction) -> CartState {
    try_reduce(state, action).unwrap_or_else(|_| state.clone())
}

/// A restored cart must be one the reducer could have built: positive
/// quantities, non-negative prices, a valid discount.
fn validate_snapshot(snapshot: &CartState) -> CoreResult<()> {
    for line in &snapshot.lines {
        validate_quantity(line.quantity)?;
        validate_price_minor(line.unit_price.amount_minor_units.minor())?;
    }
    if let Some(discount) = &snapshot.discount {
        discount.validate()?;
    }
    Ok(())
}

fn add_item(state: &CartState, line: CartLine) -> CoreResult<CartState> {
    validate_quantity(line.quantity)?;
    validate_price_minor(line.unit_price.amount_minor_units.minor())?;

    let mut next = state.clone();
    match next.lines.iter_mut().find(|l| l.variant_id == line.variant_id) {
        Some(existing) => {
            if !can_add(existing.quantity, line.quantity, existing.max_quantity) {
                let available = match existing.max_quantity {
                    StockCeiling::Limited(max) => max,
                    StockCeiling::Unlimited => i64::MAX,
                };
                return Err(CoreError::QuantityExceedsStock {
                    variant_id: line.variant_id,
                    requested: existing.quantity.saturating_add(line.quantity),
                    available,
                });
            }
            existing.quantity = existing
                .quantity
                .checked_add(line.quantity)
                .ok_or_else(|| CoreError::invalid_amount("line quantity overflows"))?;
        }
        None => next.lines.push(line),
    }
    Ok(next)
}

// =============================================================================
// Derived Totals
// =============================================================================

/// Share of the cart discount carried by one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineDiscount {
    pub variant_id: String,
    pub amount: Money,
}

/// Cart totals summary, recomputed on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub subtotal: Money,
    pub discount_amount: Money,
    pub total: Money,
    /// Sum of quantities.
    pub item_count: i64,
    /// Number of distinct lines.
    pub line_count: usize,
    pub currency_code: String,
    /// Discount allocated across lines by line total.
    pub line_discounts: Vec<LineDiscount>,
}

impl CartTotals {
    /// Derives totals from a state.
    ///
    /// The currency comes from the first line; an empty cart uses
    /// `default_currency`. Mixed-currency carts are not supported.
    pub fn compute(state: &CartState, default_currency: &str) -> CoreResult<Self> {
        let line_totals = state
            .lines
            .iter()
            .map(CartLine::line_total)
            .collect::<CoreResult<Vec<Money>>>()?;
        let subtotal = checked_sum(&line_totals)?;
        let item_count = state
            .lines
            .iter()
            .try_fold(0i64, |acc, l| acc.checked_add(l.quantity))
            .ok_or_else(|| CoreError::invalid_amount("item count overflows"))?;
        let discount_amount = compute_discount(subtotal, state.discount.as_ref())?;
        let shares = split_proportionally(discount_amount, &line_totals)?;

        Ok(CartTotals {
            subtotal,
            discount_amount,
            total: subtotal - discount_amount,
            item_count,
            line_count: state.lines.len(),
            currency_code: state
                .lines
                .first()
                .map_or_else(|| default_currency.to_string(), |l| l.unit_price.currency_code.clone()),
            line_discounts: state
                .lines
                .iter()
                .zip(shares)
                .map(|(line, amount)| LineDiscount {
                    variant_id: line.variant_id.clone(),
                    amount,
                })
                .collect(),
        })
    }
}

// =============================================================================
// Engine
// =============================================================================

/// What happened to a dispatched action.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartOutcome {
    Applied,
    /// Refused; the cart is exactly as it was.
    Rejected(CoreError),
}

impl CartOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, CartOutcome::Applied)
    }
}

/// Holds the current cart value and swaps it on every dispatch.
#[derive(Debug, Clone)]
pub struct CartEngine {
    state: CartState,
    default_currency: String,
}

impl CartEngine {
    /// Creates an engine with an empty cart.
    pub fn new(default_currency: impl Into<String>) -> Self {
        CartEngine {
            state: CartState::default(),
            default_currency: default_currency.into(),
        }
    }

    /// Current state.
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Runs an action through the reducer.
    pub fn dispatch(&mut self, action: CartAction) -> CartOutcome {
        match try_reduce(&self.state, action) {
            Ok(next) => {
                self.state = next;
                CartOutcome::Applied
            }
            Err(err) => CartOutcome::Rejected(err),
        }
    }

    /// Derived totals for the current state.
    pub fn totals(&self) -> CoreResult<CartTotals> {
        CartTotals::compute(&self.state, &self.default_currency)
    }

    /// Currency used when the cart is empty.
    pub fn default_currency(&self) -> &str {
        &self.default_currency
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discount::DiscountValue;
    use crate::money::Percent;

    fn line(variant_id: &str, price: i64, quantity: i64, max: StockCeiling) -> CartLine {
        CartLine {
            product_id: Some(format!("p-{variant_id}")),
            variant_id: variant_id.to_string(),
            product_name: "Candle".to_string(),
            variant_name: variant_id.to_string(),
            image: None,
            unit_price: Price::new(Money::from_minor(price), "AUD"),
            quantity,
            max_quantity: max,
            is_custom: false,
            for_object_ref: Some(format!("ref-{variant_id}")),
        }
    }

    #[test]
    fn test_add_same_variant_merges() {
        let mut engine = CartEngine::new("AUD");
        let _ = engine.dispatch(CartAction::AddItem(line("v1", 1000, 2, StockCeiling::Limited(5))));
        let outcome = engine.dispatch(CartAction::AddItem(line("v1", 1000, 3, StockCeiling::Limited(5))));

        assert!(outcome.is_applied());
        assert_eq!(engine.state().lines.len(), 1);
        assert_eq!(engine.state().lines[0].quantity, 5);
    }

    #[test]
    fn test_add_over_ceiling_rejected_unchanged() {
        let mut engine = CartEngine::new("AUD");
        let _ = engine.dispatch(CartAction::AddItem(line("v1", 1000, 2, StockCeiling::Limited(5))));
        let before = engine.state().clone();

        let outcome = engine.dispatch(CartAction::AddItem(line("v1", 1000, 4, StockCeiling::Limited(5))));

        assert_eq!(
            outcome,
            CartOutcome::Rejected(CoreError::QuantityExceedsStock {
                variant_id: "v1".to_string(),
                requested: 6,
                available: 5,
            })
        );
        assert_eq!(engine.state(), &before);
        assert_eq!(engine.state().lines[0].quantity, 2);
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let state = CartState::default();
        assert!(try_reduce(&state, CartAction::AddItem(line("v1", 100, 0, StockCeiling::Unlimited))).is_err());
        assert_eq!(reduce(&state, CartAction::AddItem(line("v1", 100, -1, StockCeiling::Unlimited))), state);
    }

    #[test]
    fn test_update_quantity_ignores_ceiling() {
        let state = reduce(
            &CartState::default(),
            CartAction::AddItem(line("v1", 100, 1, StockCeiling::Limited(2))),
        );
        let next = reduce(
            &state,
            CartAction::UpdateQuantity {
                variant_id: "v1".to_string(),
                quantity: 9,
            },
        );
        assert_eq!(next.lines[0].quantity, 9);
        // Input state is untouched.
        assert_eq!(state.lines[0].quantity, 1);
    }

    #[test]
    fn test_update_quantity_zero_or_negative_removes() {
        let state = reduce(
            &CartState::default(),
            CartAction::AddItem(line("v1", 100, 3, StockCeiling::Unlimited)),
        );
        for q in [0, -4] {
            let next = reduce(
                &state,
                CartAction::UpdateQuantity {
                    variant_id: "v1".to_string(),
                    quantity: q,
                },
            );
            assert!(next.is_empty());
        }
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let state = reduce(
            &CartState::default(),
            CartAction::AddItem(line("v1", 100, 1, StockCeiling::Unlimited)),
        );
        let next = reduce(
            &state,
            CartAction::RemoveItem {
                variant_id: "nope".to_string(),
            },
        );
        assert_eq!(next, state);
    }

    #[test]
    fn test_switch_discount_kind_clears_discount() {
        let mut engine = CartEngine::new("AUD");
        let fixed = Discount::fixed(Money::from_minor(500), "promo").unwrap();
        let _ = engine.dispatch(CartAction::SetDiscount(Some(fixed)));
        assert!(engine.state().discount.is_some());

        let _ = engine.dispatch(CartAction::SwitchDiscountKind(DiscountKind::Percentage));
        assert_eq!(engine.state().discount, None);

        let pct = Discount::percentage(Percent::from_whole(10), "promo").unwrap();
        let _ = engine.dispatch(CartAction::SetDiscount(Some(pct)));
        let _ = engine.dispatch(CartAction::SwitchDiscountKind(DiscountKind::Fixed));
        assert_eq!(engine.state().discount, None);
    }

    #[test]
    fn test_set_invalid_discount_rejected() {
        let mut engine = CartEngine::new("AUD");
        let bogus = Discount {
            value: crate::discount::DiscountValue::Percentage(Percent::from_whole(101)),
            reason: String::new(),
        };
        let outcome = engine.dispatch(CartAction::SetDiscount(Some(bogus)));
        assert!(matches!(outcome, CartOutcome::Rejected(CoreError::InvalidDiscount { .. })));
        assert_eq!(engine.state().discount, None);
    }

    #[test]
    fn test_field_setters_and_clear() {
        let mut engine = CartEngine::new("AUD");
        let _ = engine.dispatch(CartAction::AddItem(line("v1", 100, 1, StockCeiling::Unlimited)));
        let _ = engine.dispatch(CartAction::SetPaymentMethod(PaymentMethod::ExternalTerminal));
        let _ = engine.dispatch(CartAction::SetBuyerEmail("a@example.com".to_string()));
        let _ = engine.dispatch(CartAction::SetNotes("gift wrap".to_string()));

        assert_eq!(engine.state().payment_method, PaymentMethod::ExternalTerminal);
        assert_eq!(engine.state().buyer_email, "a@example.com");
        assert_eq!(engine.state().notes, "gift wrap");

        let _ = engine.dispatch(CartAction::Clear);
        assert_eq!(engine.state(), &CartState::default());
        assert_eq!(engine.state().payment_method, PaymentMethod::Cash);
    }

    #[test]
    fn test_restore_replaces_everything() {
        let mut engine = CartEngine::new("AUD");
        let _ = engine.dispatch(CartAction::AddItem(line("v1", 100, 1, StockCeiling::Unlimited)));
        let snapshot = CartState {
            lines: vec![line("v9", 250, 4, StockCeiling::Limited(10))],
            notes: "held".to_string(),
            ..CartState::default()
        };
        let _ = engine.dispatch(CartAction::Restore(snapshot.clone()));
        assert_eq!(engine.state(), &snapshot);
    }

    #[test]
    fn test_restore_rejects_impossible_snapshot() {
        let mut engine = CartEngine::new("AUD");
        let _ = engine.dispatch(CartAction::AddItem(line("v1", 100, 1, StockCeiling::Unlimited)));
        let before = engine.state().clone();

        let zero_line = CartState {
            lines: vec![line("v9", 250, 0, StockCeiling::Unlimited)],
            ..CartState::default()
        };
        assert!(!engine.dispatch(CartAction::Restore(zero_line)).is_applied());

        let bad_discount = CartState {
            lines: vec![line("v9", 250, 1, StockCeiling::Unlimited)],
            discount: Some(Discount {
                value: DiscountValue::Percentage(Percent::from_bps(20_000)),
                reason: "typo".to_string(),
            }),
            ..CartState::default()
        };
        assert!(!engine.dispatch(CartAction::Restore(bad_discount)).is_applied());

        assert_eq!(engine.state(), &before);
        assert!(engine.totals().is_ok());
    }

    #[test]
    fn test_extreme_quantity_totals_error_instead_of_panicking() {
        let mut engine = CartEngine::new("AUD");
        let _ = engine.dispatch(CartAction::AddItem(line("v1", 100, 1, StockCeiling::Unlimited)));
        let _ = engine.dispatch(CartAction::UpdateQuantity {
            variant_id: "v1".to_string(),
            quantity: i64::MAX / 10,
        });
        assert!(matches!(engine.totals(), Err(CoreError::InvalidAmount { .. })));

        // Two lines whose quantities alone overflow the item count.
        let mut engine = CartEngine::new("AUD");
        let _ = engine.dispatch(CartAction::AddItem(line("v1", 0, i64::MAX, StockCeiling::Unlimited)));
        let _ = engine.dispatch(CartAction::AddItem(line("v2", 0, 1, StockCeiling::Unlimited)));
        assert!(engine.totals().is_err());
    }

    #[test]
    fn test_merge_overflow_rejected() {
        let mut engine = CartEngine::new("AUD");
        let _ = engine.dispatch(CartAction::AddItem(line("v1", 1, i64::MAX, StockCeiling::Unlimited)));
        let outcome = engine.dispatch(CartAction::AddItem(line("v1", 1, 1, StockCeiling::Unlimited)));
        assert!(!outcome.is_applied());
        assert_eq!(engine.state().lines[0].quantity, i64::MAX);

        let mut engine = CartEngine::new("AUD");
        let _ = engine.dispatch(CartAction::AddItem(line("v2", 1, i64::MAX, StockCeiling::Limited(5))));
        assert!(matches!(
            engine.dispatch(CartAction::AddItem(line("v2", 1, 1, StockCeiling::Limited(5)))),
            CartOutcome::Rejected(CoreError::QuantityExceedsStock { .. })
        ));
    }

    #[test]
    fn test_totals() {
        let mut engine = CartEngine::new("USD");
        let _ = engine.dispatch(CartAction::AddItem(line("v1", 2500, 2, StockCeiling::Unlimited)));
        let _ = engine.dispatch(CartAction::AddItem(line("v2", 5000, 1, StockCeiling::Unlimited)));
        let pct = Discount::percentage(Percent::from_whole(15), "staff").unwrap();
        let _ = engine.dispatch(CartAction::SetDiscount(Some(pct)));

        let totals = engine.totals().unwrap();
        assert_eq!(totals.subtotal.minor(), 10000);
        assert_eq!(totals.discount_amount.minor(), 1500);
        assert_eq!(totals.total.minor(), 8500);
        assert_eq!(totals.item_count, 3);
        assert_eq!(totals.line_count, 2);
        assert_eq!(totals.currency_code, "AUD");
        let allocated: Money = totals.line_discounts.iter().map(|d| d.amount).sum();
        assert_eq!(allocated, totals.discount_amount);
    }

    #[test]
    fn test_fixed_discount_over_subtotal_zero_total() {
        let mut engine = CartEngine::new("AUD");
        let _ = engine.dispatch(CartAction::AddItem(line("v1", 3000, 1, StockCeiling::Unlimited)));
        let fixed = Discount::fixed(Money::from_minor(5000), "voucher").unwrap();
        let _ = engine.dispatch(CartAction::SetDiscount(Some(fixed)));

        let totals = engine.totals().unwrap();
        assert_eq!(totals.discount_amount.minor(), 3000);
        assert_eq!(totals.total, Money::zero());
    }

    #[test]
    fn test_empty_cart_uses_default_currency() {
        let totals = CartEngine::new("NZD").totals().unwrap();
        assert_eq!(totals.currency_code, "NZD");
        assert_eq!(totals.total, Money::zero());
        assert!(totals.line_discounts.is_empty());
    }

    #[test]
    fn test_custom_line() {
        let a = CartLine::custom("Gift card", Price::new(Money::from_minor(2000), "AUD"), 1);
        let b = CartLine::custom("Gift card", Price::new(Money::from_minor(2000), "AUD"), 1);
        assert!(a.is_custom);
        assert_eq!(a.max_quantity, StockCeiling::Unlimited);
        assert_eq!(a.for_object_ref, None);
        assert!(a.variant_id.starts_with("custom-"));
        assert_ne!(a.variant_id, b.variant_id);
        assert_eq!(a.descriptor(), "Gift card");
    }

    #[test]
    fn test_state_json_round_trip() {
        let state = CartState {
            lines: vec![line("v1", 100, 2, StockCeiling::Limited(3))],
            payment_method: PaymentMethod::ExternalTerminal,
            buyer_email: "b@example.com".to_string(),
            notes: String::new(),
            discount: Some(Discount::fixed(Money::from_minor(50), "x").unwrap()),
        };
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"paymentMethod\":\"EXTERNAL_TERMINAL\""));
        assert!(json.contains("\"amountMinorUnits\":100"));
        let back: CartState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
