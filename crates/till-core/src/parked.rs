//! # Parked Sales
//!
//! Held carts, so the register can serve the next customer and come back.
//!
//! ```text
//! live cart ── park(label?) ──► ParkedSale appended (live cart cleared by caller)
//!                                      │
//!              ┌───────────────────────┴────────────────────┐
//!              ▼                                            ▼
//!     take(id) → CartState (entry gone)             discard(id) (entry gone)
//! ```
//!
//! This is the in-memory list only. Persistence lives in
//! `till_store::ParkedSaleRepository`, which writes this list through to the
//! key-value store after every change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::CartState;

/// An immutable snapshot of a held cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ParkedSale {
    pub id: String,
    pub label: String,
    #[ts(as = "String")]
    pub parked_at_timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub cart: CartState,
}

/// Label used when the cashier does not type one: `Sale (3 items)`.
///
/// Pluralized on the number of lines, not the number of units.
pub fn default_label(line_count: usize) -> String {
    let suffix = if line_count == 1 { "" } else { "s" };
    format!("Sale ({line_count} item{suffix})")
}

/// Held carts in the order they were parked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParkedSales {
    entries: Vec<ParkedSale>,
}

impl ParkedSales {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an already-ordered list.
    pub fn from_entries(entries: Vec<ParkedSale>) -> Self {
        ParkedSales { entries }
    }

    /// Snapshots `state` and appends it. No deduplication.
    ///
    /// A blank label falls back to [`default_label`].
    pub fn park(&mut self, state: &CartState, label: Option<&str>, now: DateTime<Utc>) -> ParkedSale {
        let label = match label.map(str::trim) {
            Some(l) if !l.is_empty() => l.to_string(),
            _ => default_label(state.lines.len()),
        };

        let parked = ParkedSale {
            id: Uuid::new_v4().to_string(),
            label,
            parked_at_timestamp: now,
            cart: state.clone(),
        };
        self.entries.push(parked.clone());
        parked
    }

    /// Removes an entry and hands back its cart.
    pub fn take(&mut self, id: &str) -> Option<CartState> {
        let idx = self.entries.iter().position(|p| p.id == id)?;
        Some(self.entries.remove(idx).cart)
    }

    /// Removes an entry without returning it. False if it was not there.
    pub fn discard(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|p| p.id != id);
        self.entries.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&ParkedSale> {
        self.entries.iter().find(|p| p.id == id)
    }

    pub fn entries(&self) -> &[ParkedSale] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
