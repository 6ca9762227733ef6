//! # Money Module
//!
//! The `Money` and `Percent` types plus the integer helpers every total in
//! the register is built from.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (cents, pence, yen...)               │
//! │    Discount 15% of 10000 = (10000 × 1500 + 5000) / 10000 = 1500         │
//! │    Every intermediate stays an integer. Rounding happens once.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Helpers
//! - [`percent_of`] - percentage of an amount, round-half-up
//! - [`capped_subtract`] - subtraction that never goes below zero
//! - [`split_proportionally`] - largest-remainder allocation
//! - [`change_due`] - cash change for a tendered amount
//! - [`format_money`] - display string for a minor-unit amount
//!
//! ## Usage
//! ```rust
//! use till_core::money::{percent_of, Money, Percent};
//!
//! let subtotal = Money::from_minor(10000);
//! let discount = percent_of(subtotal, Percent::from_whole(15)).unwrap();
//! assert_eq!(discount.minor(), 1500);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the currency's smallest unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: variance and refund arithmetic can go negative
/// - **Single field tuple struct**: serializes as a plain JSON number
/// - **No currency inside**: carts are single-currency; the code travels
///   alongside in [`crate::cart::Price`]
///
/// ## Where Money is Used
/// ```text
/// CartLine.unit_price ──► line total ──► subtotal ──► discount ──► total
///                                                                  │
/// SaleRecord.payments ──► cash/terminal buckets ──► expected cash ◄┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(299);
    /// assert_eq!(unit_price.multiply_quantity(3).unwrap().minor(), 897);
    /// assert!(unit_price.multiply_quantity(i64::MAX).is_err());
    /// ```
    ///
    /// ## Errors
    /// `InvalidAmount` when the product does not fit in i64.
    pub fn multiply_quantity(&self, qty: i64) -> CoreResult<Self> {
        self.0
            .checked_mul(qty)
            .map(Money)
            .ok_or_else(|| CoreError::invalid_amount(format!("{} x {qty} overflows", self.0)))
    }

    /// Sum of two amounts, or `InvalidAmount` on overflow.
    pub fn checked_add(self, other: Money) -> CoreResult<Self> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or_else(|| CoreError::invalid_amount("sum overflows"))
    }
}

/// Sums amounts, failing instead of wrapping.
pub fn checked_sum<'a>(amounts: impl IntoIterator<Item = &'a Money>) -> CoreResult<Money> {
    amounts
        .into_iter()
        .try_fold(Money::zero(), |acc, m| acc.checked_add(*m))
}

/// Debug-oriented display with two decimals and no currency.
///
/// Use [`format_money`] for anything a customer sees.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Percent
// =============================================================================

/// A percentage in basis points (1 bps = 0.01%).
///
/// ## Why Basis Points?
/// The discount dialog accepts values like `12.5`. Storing `1250` keeps
/// the percentage exact and lets [`percent_of`] stay integer-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percent(u32);

impl Percent {
    /// 100%.
    pub const FULL: Percent = Percent(10_000);

    /// Creates a percentage from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percent(bps)
    }

    /// Creates a percentage from a whole number (`15` → 15%).
    #[inline]
    pub const fn from_whole(pct: u32) -> Self {
        Percent(pct.saturating_mul(100))
    }

    /// Converts UI input such as `12.5` into basis points.
    ///
    /// Fails with `InvalidAmount` on NaN, infinities and negatives.
    pub fn from_percentage(pct: f64) -> CoreResult<Self> {
        if !pct.is_finite() {
            return Err(CoreError::invalid_amount("percentage must be finite"));
        }
        if pct < 0.0 {
            return Err(CoreError::invalid_amount("percentage must not be negative"));
        }
        let bps = (pct * 100.0).round();
        if bps > u32::MAX as f64 {
            return Err(CoreError::invalid_amount("percentage is too large"));
        }
        Ok(Percent(bps as u32))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Percentage of an amount, rounded half-up.
///
/// `round(amount × pct / 100)` computed as `(amount × bps + 5000) / 10000`
/// in i128. For non-negative amounts this matches `Math.round` exactly.
///
/// ## Errors
/// `InvalidAmount` when `amount` is negative or the result overflows.
pub fn percent_of(amount: Money, pct: Percent) -> CoreResult<Money> {
    if amount.is_negative() {
        return Err(CoreError::invalid_amount(format!(
            "cannot take a percentage of negative amount {}",
            amount.minor()
        )));
    }

    let scaled = (amount.minor() as i128 * pct.bps() as i128 + 5_000) / 10_000;
    i64::try_from(scaled)
        .map(Money::from_minor)
        .map_err(|_| CoreError::invalid_amount("percentage result overflows"))
}

/// `max(0, a - b)`.
#[inline]
pub fn capped_subtract(a: Money, b: Money) -> Money {
    std::cmp::max(Money::zero(), a - b)
}

/// Splits `total` across `weights` in proportion, largest remainder first.
///
/// The parts always sum to `total`. Ties on the remainder go to the
/// earlier weight so the allocation is deterministic.
///
/// ## Example
/// ```rust
/// use till_core::money::{split_proportionally, Money};
///
/// let parts = split_proportionally(
///     Money::from_minor(100),
///     &[Money::from_minor(1), Money::from_minor(1), Money::from_minor(1)],
/// )
/// .unwrap();
/// assert_eq!(parts, vec![Money::from_minor(34), Money::from_minor(33), Money::from_minor(33)]);
/// ```
///
/// ## Errors
/// `InvalidAmount` for negative inputs, or a non-zero total with nothing
/// to weigh it against.
pub fn split_proportionally(total: Money, weights: &[Money]) -> CoreResult<Vec<Money>> {
    if total.is_negative() || weights.iter().any(Money::is_negative) {
        return Err(CoreError::invalid_amount("cannot split negative amounts"));
    }

    let weight_sum: i128 = weights.iter().map(|w| w.minor() as i128).sum();
    if weight_sum == 0 {
        if total.is_zero() {
            return Ok(vec![Money::zero(); weights.len()]);
        }
        return Err(CoreError::invalid_amount(
            "cannot split a non-zero amount across zero weights",
        ));
    }

    let total_i = total.minor() as i128;
    let mut parts = Vec::with_capacity(weights.len());
    let mut remainders = Vec::with_capacity(weights.len());
    for (idx, weight) in weights.iter().enumerate() {
        let product = total_i * weight.minor() as i128;
        parts.push(product / weight_sum);
        remainders.push((idx, product % weight_sum));
    }

    let allocated: i128 = parts.iter().sum();
    let leftover = (total_i - allocated) as usize;
    remainders.sort_by_key(|&(idx, rem)| (Reverse(rem), idx));
    for &(idx, _) in remainders.iter().take(leftover) {
        if let Some(part) = parts.get_mut(idx) {
            *part += 1;
        }
    }

    // Each part is bounded by `total`, so it fits back into i64.
    Ok(parts.into_iter().map(|p| Money::from_minor(p as i64)).collect())
}

/// Change to hand back for a cash payment.
pub fn change_due(total: Money, tendered: Money) -> CoreResult<Money> {
    if tendered < total {
        return Err(CoreError::InsufficientTender {
            total: total.minor(),
            tendered: tendered.minor(),
        });
    }
    Ok(tendered - total)
}

/// Number of minor-unit digits for an ISO 4217 code.
pub fn minor_unit_exponent(currency_code: &str) -> u32 {
    match currency_code.to_ascii_uppercase().as_str() {
        "JPY" | "KRW" | "VND" | "CLP" | "ISK" | "UGX" | "XAF" | "XOF" => 0,
        "BHD" | "KWD" | "OMR" | "JOD" | "TND" | "LYD" | "IQD" => 3,
        _ => 2,
    }
}

/// Formats a minor-unit amount for display, e.g. `AUD 138.00`.
///
/// Locale-specific symbols and grouping belong to the UI; this is the
/// plain, unambiguous form used on receipts and in logs.
pub fn format_money(amount: Money, currency_code: &str) -> String {
    let code = currency_code.to_ascii_uppercase();
    let exponent = minor_unit_exponent(&code);
    let sign = if amount.is_negative() { "-" } else { "" };
    let abs = amount.minor().unsigned_abs();

    if exponent == 0 {
        return format!("{sign}{code} {abs}");
    }

    let divisor = 10_u64.pow(exponent);
    format!(
        "{sign}{code} {}.{:0width$}",
        abs / divisor,
        abs % divisor,
        width = exponent as usize
    )
}

// =============================================================================
// Unit Tests
// =============================================================================
