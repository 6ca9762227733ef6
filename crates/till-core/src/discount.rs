//! # Discount Engine
//!
//! Turns a cart-level discount into an amount off the subtotal.
//!
//! ```text
//! subtotal ──┬── None                 → 0
//!            ├── Percentage(bps)      → percent_of(subtotal, bps)
//!            └── Fixed(amount)        → min(amount, subtotal)
//!
//! Guarantee: 0 <= discount <= subtotal
//! ```
//!
//! ## Type Switch Policy
//! Switching the discount dialog between percentage and fixed clears the
//! discount rather than converting the entered value. The cart reducer
//! implements this through `CartAction::SwitchDiscountKind`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{percent_of, Money, Percent};

/// Which of the two discount shapes the cashier picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountKind {
    Percentage,
    Fixed,
}

/// The value half of a discount, tagged by kind.
///
/// Serialized as `{"kind": "PERCENTAGE", "value": 1500}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountValue {
    /// Percentage of the subtotal, 0..=100%.
    Percentage(Percent),
    /// Flat amount in minor units, >= 0.
    Fixed(Money),
}

/// A cart-level discount with the reason shown on the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub value: DiscountValue,
    pub reason: String,
}

impl Discount {
    /// A validated percentage discount.
    pub fn percentage(pct: Percent, reason: impl Into<String>) -> CoreResult<Self> {
        let discount = Discount {
            value: DiscountValue::Percentage(pct),
            reason: reason.into(),
        };
        discount.validate()?;
        Ok(discount)
    }

    /// A validated fixed-amount discount.
    pub fn fixed(amount: Money, reason: impl Into<String>) -> CoreResult<Self> {
        let discount = Discount {
            value: DiscountValue::Fixed(amount),
            reason: reason.into(),
        };
        discount.validate()?;
        Ok(discount)
    }

    /// Returns which shape this discount has.
    pub fn kind(&self) -> DiscountKind {
        match self.value {
            DiscountValue::Percentage(_) => DiscountKind::Percentage,
            DiscountValue::Fixed(_) => DiscountKind::Fixed,
        }
    }

    /// Checks the range rules: percentage within 0..=100%, fixed >= 0.
    pub fn validate(&self) -> CoreResult<()> {
        match self.value {
            DiscountValue::Percentage(pct) if pct > Percent::FULL => {
                Err(CoreError::InvalidDiscount {
                    reason: format!("percentage {}% exceeds 100%", pct.percentage()),
                })
            }
            DiscountValue::Fixed(amount) if amount.is_negative() => {
                Err(CoreError::InvalidDiscount {
                    reason: format!("fixed amount {} is negative", amount.minor()),
                })
            }
            _ => Ok(()),
        }
    }
}

/// Computes the discount amount for a subtotal.
///
/// ## Example
/// ```rust
/// use till_core::discount::{compute_discount, Discount};
/// use till_core::money::{Money, Percent};
///
/// let fifteen = Discount::percentage(Percent::from_whole(15), "staff").unwrap();
/// let amount = compute_discount(Money::from_minor(10000), Some(&fifteen)).unwrap();
/// assert_eq!(amount.minor(), 1500);
/// ```
///
/// ## Errors
/// `InvalidAmount` for a negative subtotal, `InvalidDiscount` for an
/// out-of-range discount. Neither happens with a cart built through the
/// reducer.
pub fn compute_discount(subtotal: Money, discount: Option<&Discount>) -> CoreResult<Money> {
    if subtotal.is_negative() {
        return Err(CoreError::invalid_amount(format!(
            "subtotal {} is negative",
            subtotal.minor()
        )));
    }

    let Some(discount) = discount else {
        return Ok(Money::zero());
    };
    discount.validate()?;

    let amount = match discount.value {
        DiscountValue::Percentage(pct) => percent_of(subtotal, pct)?,
        DiscountValue::Fixed(amount) => amount,
    };

    // Clamp so the total can never go below zero.
    Ok(std::cmp::min(amount, subtotal))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_discount_is_zero() {
        assert_eq!(compute_discount(Money::from_minor(5000), None).unwrap(), Money::zero());
    }

    #[test]
    fn test_percentage_discount() {
        let d = Discount::percentage(Percent::from_whole(15), "loyalty").unwrap();
        assert_eq!(compute_discount(Money::from_minor(10000), Some(&d)).unwrap().minor(), 1500);
    }

    #[test]
    fn test_fixed_discount_clamped_to_subtotal() {
        let d = Discount::fixed(Money::from_minor(5000), "damaged box").unwrap();
        assert_eq!(compute_discount(Money::from_minor(3000), Some(&d)).unwrap().minor(), 3000);
    }

    #[test]
    fn test_full_percentage_takes_everything() {
        let d = Discount::percentage(Percent::FULL, "comp").unwrap();
        assert_eq!(compute_discount(Money::from_minor(4321), Some(&d)).unwrap().minor(), 4321);
    }

    #[test]
    fn test_discount_always_within_subtotal() {
        let discounts = [
            Discount::percentage(Percent::from_bps(0), "").unwrap(),
            Discount::percentage(Percent::from_bps(3333), "").unwrap(),
            Discount::percentage(Percent::FULL, "").unwrap(),
            Discount::fixed(Money::zero(), "").unwrap(),
            Discount::fixed(Money::from_minor(1), "").unwrap(),
            Discount::fixed(Money::from_minor(1_000_000), "").unwrap(),
        ];
        for subtotal in [0_i64, 1, 99, 10_000, 123_457] {
            let subtotal = Money::from_minor(subtotal);
            for d in &discounts {
                let amount = compute_discount(subtotal, Some(d)).unwrap();
                assert!(amount >= Money::zero() && amount <= subtotal);
            }
        }
    }

    #[test]
    fn test_out_of_range_discounts_rejected() {
        assert!(matches!(
            Discount::percentage(Percent::from_bps(10_001), "too much"),
            Err(CoreError::InvalidDiscount { .. })
        ));
        assert!(matches!(
            Discount::fixed(Money::from_minor(-1), "negative"),
            Err(CoreError::InvalidDiscount { .. })
        ));
    }

    #[test]
    fn test_serialized_shape() {
        let d = Discount::percentage(Percent::from_whole(15), "staff").unwrap();
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"value": {"kind": "PERCENTAGE", "value": 1500}, "reason": "staff"})
        );
        assert_eq!(d.kind(), DiscountKind::Percentage);
    }
}
