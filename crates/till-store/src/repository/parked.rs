//! # Parked Sale Repository
//!
//! The merchant's held carts, loaded once and written through on change.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use till_core::cart::CartState;
use till_core::parked::{ParkedSale, ParkedSales};

use crate::error::StoreResult;
use crate::kv::{parked_sales_key, KeyValueStore};

/// Held carts for one merchant.
pub struct ParkedSaleRepository {
    store: Arc<dyn KeyValueStore>,
    key: String,
    sales: ParkedSales,
}

impl ParkedSaleRepository {
    /// Loads the persisted list. Never fails; unreadable data means none.
    pub async fn load(store: Arc<dyn KeyValueStore>, merchant_id: &str) -> Self {
        let key = parked_sales_key(merchant_id);

        let sales = match store.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<ParkedSales>(&raw) {
                Ok(sales) => sales,
                Err(e) => {
                    warn!(key = %key, error = %e, "Discarding unreadable parked sales");
                    ParkedSales::new()
                }
            },
            Ok(None) => ParkedSales::new(),
            Err(e) => {
                warn!(key = %key, error = %e, "Could not read parked sales");
                ParkedSales::new()
            }
        };

        debug!(key = %key, count = sales.len(), "Parked sales loaded");
        ParkedSaleRepository { store, key, sales }
    }

    /// Held carts, oldest first.
    pub fn list(&self) -> &[ParkedSale] {
        self.sales.entries()
    }

    pub fn get(&self, id: &str) -> Option<&ParkedSale> {
        self.sales.get(id)
    }

    pub fn len(&self) -> usize {
        self.sales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }

    /// Snapshots a cart into the list.
    pub async fn park(&mut self, state: &CartState, label: Option<&str>, now: DateTime<Utc>) -> ParkedSale {
        let parked = self.sales.park(state, label, now);
        info!(id = %parked.id, label = %parked.label, "Sale parked");
        self.write_through().await;
        parked
    }

    /// Removes an entry and returns its cart, `None` if the id is unknown.
    pub async fn restore(&mut self, id: &str) -> Option<CartState> {
        let cart = self.sales.take(id)?;
        info!(id = %id, "Parked sale restored");
        self.write_through().await;
        Some(cart)
    }

    /// Removes an entry. False if the id is unknown.
    pub async fn discard(&mut self, id: &str) -> bool {
        if !self.sales.discard(id) {
            return false;
        }
        info!(id = %id, "Parked sale discarded");
        self.write_through().await;
        true
    }

    async fn write_through(&self) {
        if let Err(e) = self.persist().await {
            warn!(key = %self.key, error = %e, "Parked sales not persisted");
        }
    }

    async fn persist(&self) -> StoreResult<()> {
        let raw = serde_json::to_string(&self.sales)?;
        self.store.set(&self.key, &raw).await
    }
}
