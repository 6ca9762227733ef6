//! # till-store: Persisted Register State for Till POS
//!
//! Keeps the two things a register must remember across a restart: the
//! held (parked) carts and whether the cash drawer is open.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  till-terminal Session                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   till-store (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────────────┐      ┌─────────────────────────────┐  │   │
//! │  │   │ Repositories       │      │ KeyValueStore               │  │   │
//! │  │   │ ParkedSaleRepo     │─────►│  ├── SqliteStore (durable)  │  │   │
//! │  │   │ RegisterRepo       │      │  └── MemoryStore (tests)    │  │   │
//! │  │   └────────────────────┘      └─────────────────────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  kv_store table (migrations/sqlite)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`kv`] - The store trait and key naming
//! - [`memory`] - In-memory backend
//! - [`sqlite`] - SQLite backend and pool configuration
//! - [`migrations`] - Embedded migrations
//! - [`repository`] - Parked sales and register session
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use till_store::{ParkedSaleRepository, SqliteStore, StoreConfig};
//!
//! let store = Arc::new(SqliteStore::connect(StoreConfig::new("till.db")).await?);
//! let mut parked = ParkedSaleRepository::load(store, "merchant-1").await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod kv;
pub mod memory;
pub mod migrations;
pub mod repository;
pub mod sqlite;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use kv::KeyValueStore;
pub use memory::MemoryStore;
pub use repository::{ParkedSaleRepository, RegisterRepository};
pub use sqlite::{SqliteStore, StoreConfig};
