//! # Register Repository
//!
//! The merchant's open cash drawer, if any.
//!
//! ```text
//! load_at(today)
//!   ├── nothing stored            → closed
//!   ├── unreadable                → closed (warn!)
//!   ├── opened on another day     → closed, stored value removed
//!   └── opened today              → open
//! ```

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use till_core::error::CoreResult;
use till_core::money::Money;
use till_core::register::RegisterSession;

use crate::error::StoreResult;
use crate::kv::{register_key, KeyValueStore};

/// Open/closed register state for one merchant.
pub struct RegisterRepository {
    store: Arc<dyn KeyValueStore>,
    key: String,
    session: Option<RegisterSession>,
}

impl RegisterRepository {
    /// Loads the persisted session, dropping one opened before `today`.
    pub async fn load_at(store: Arc<dyn KeyValueStore>, merchant_id: &str, today: NaiveDate) -> Self {
        let key = register_key(merchant_id);

        let stored = match store.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<RegisterSession>(&raw) {
                Ok(session) => Some(session),
                Err(e) => {
                    warn!(key = %key, error = %e, "Discarding unreadable register session");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key = %key, error = %e, "Could not read register session");
                None
            }
        };

        let mut repo = RegisterRepository {
            store,
            key,
            session: None,
        };

        match stored {
            Some(session) if session.is_stale(today) => {
                debug!(
                    opened_at = %session.opened_at_timestamp,
                    "Dropping register session from a previous day"
                );
                repo.clear_stored().await;
            }
            other => repo.session = other,
        }

        repo
    }

    /// The open session, `None` when the drawer is closed.
    pub fn current(&self) -> Option<&RegisterSession> {
        self.session.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Opens the drawer, replacing any session already open.
    pub async fn open(&mut self, opening_float: Money, currency_code: &str, now: DateTime<Utc>) -> CoreResult<RegisterSession> {
        let session = RegisterSession::open(opening_float, currency_code, now)?;
        info!(
            opening_float = opening_float.minor(),
            currency = %session.currency_code,
            "Register opened"
        );

        self.session = Some(session.clone());
        if let Err(e) = self.persist(&session).await {
            warn!(key = %self.key, error = %e, "Register session not persisted");
        }
        Ok(session)
    }

    /// Closes the drawer. Returns the session that was open.
    pub async fn close(&mut self) -> Option<RegisterSession> {
        let closed = self.session.take();
        if closed.is_some() {
            info!("Register closed");
        }
        self.clear_stored().await;
        closed
    }

    async fn persist(&self, session: &RegisterSession) -> StoreResult<()> {
        let raw = serde_json::to_string(session)?;
        self.store.set(&self.key, &raw).await
    }

    async fn clear_stored(&self) {
        if let Err(e) = self.store.remove(&self.key).await {
            warn!(key = %self.key, error = %e, "Register session not removed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::sqlite::SqliteStore;
    use chrono::{Duration, Local, TimeZone};
    use till_core::register::local_day;

    fn local_noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(y, m, d, 12, 0, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    async fn open_close_cycle(store: Arc<dyn KeyValueStore>) {
        let now = local_noon(2026, 5, 2);
        let today = local_day(now);

        let mut repo = RegisterRepository::load_at(store.clone(), "m1", today).await;
        assert!(!repo.is_open());

        let session = repo.open(Money::from_minor(10000), "AUD", now).await.unwrap();

        let reloaded = RegisterRepository::load_at(store.clone(), "m1", today).await;
        assert_eq!(reloaded.current(), Some(&session));

        assert_eq!(repo.close().await, Some(session));
        let after = RegisterRepository::load_at(store, "m1", today).await;
        assert!(after.current().is_none());
    }

    #[tokio::test]
    async fn test_open_close_memory() {
        open_close_cycle(Arc::new(MemoryStore::new())).await;
    }

    #[tokio::test]
    async fn test_open_close_sqlite() {
        open_close_cycle(Arc::new(SqliteStore::in_memory().await.unwrap())).await;
    }

    #[tokio::test]
    async fn test_stale_session_is_discarded() {
        let store = Arc::new(MemoryStore::new());
        let yesterday = local_noon(2026, 5, 1);

        let mut repo = RegisterRepository::load_at(store.clone(), "m1", local_day(yesterday)).await;
        repo.open(Money::from_minor(5000), "AUD", yesterday).await.unwrap();

        let today = local_day(yesterday + Duration::days(1));
        let next_day = RegisterRepository::load_at(store.clone(), "m1", today).await;
        assert!(next_day.current().is_none());
        assert_eq!(store.get(&register_key("m1")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_session_loads_closed() {
        let store = Arc::new(MemoryStore::new());
        store.set(&register_key("m1"), "[1,2,3]").await.unwrap();

        let repo = RegisterRepository::load_at(store, "m1", local_day(Utc::now())).await;
        assert!(!repo.is_open());
    }

    #[tokio::test]
    async fn test_negative_float_rejected() {
        let store = Arc::new(MemoryStore::new());
        let mut repo = RegisterRepository::load_at(store.clone(), "m1", local_day(Utc::now())).await;

        assert!(repo.open(Money::from_minor(-100), "AUD", Utc::now()).await.is_err());
        assert!(!repo.is_open());
        assert!(store.is_empty().await);
    }
}
