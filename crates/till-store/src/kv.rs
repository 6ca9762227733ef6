//! # Key-Value Store
//!
//! The persistence seam. Repositories only see this trait, so the same
//! code runs against SQLite on a register and an in-memory map in tests.
//!
//! ```text
//!   ParkedSaleRepository ─┐
//!                         ├──► dyn KeyValueStore ──┬──► SqliteStore (kv_store table)
//!   RegisterRepository  ──┘                        └──► MemoryStore (HashMap)
//! ```
//!
//! Values are opaque strings; repositories store JSON.

use async_trait::async_trait;

use crate::error::StoreResult;

/// String-keyed document storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a value, `None` when nothing is stored under `key`.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Inserts or replaces a value.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removes a value. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> StoreResult<()>;
}

/// Storage key for the parked sales of one merchant.
pub fn parked_sales_key(merchant_id: &str) -> String {
    format!("pos-parked-sales-{merchant_id}")
}

/// Storage key for the register session of one merchant.
pub fn register_key(merchant_id: &str) -> String {
    format!("pos-register-{merchant_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_namespaced_by_merchant() {
        assert_eq!(parked_sales_key("m1"), "pos-parked-sales-m1");
        assert_eq!(register_key("m1"), "pos-register-m1");
        assert_ne!(register_key("m1"), register_key("m2"));
    }
}
