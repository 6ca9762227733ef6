//! # Repository Module
//!
//! Per-merchant documents on top of a [`crate::KeyValueStore`].
//!
//! ## Load and Write-Through
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  load(store, merchant)                                                  │
//! │    ├── missing value     → empty                                        │
//! │    ├── corrupt JSON      → empty  (warn!)                               │
//! │    └── store error       → empty  (warn!)                               │
//! │                                                                         │
//! │  every mutation                                                         │
//! │    1. change the in-memory value                                        │
//! │    2. write it through to the store                                     │
//! │    3. write fails? warn! and keep the in-memory change (no retry)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two registers for the same merchant are not coordinated; the last write
//! wins.
//!
//! ## Available Repositories
//!
//! - [`ParkedSaleRepository`] - held carts (`pos-parked-sales-<merchant>`)
//! - [`RegisterRepository`] - open drawer (`pos-register-<merchant>`)

pub mod parked;
pub mod register;

pub use parked::ParkedSaleRepository;
pub use register::RegisterRepository;
