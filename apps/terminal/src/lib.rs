//! # Till Terminal
//!
//! The register as a UI layer sees it: one [`Session`] per merchant,
//! built from a [`TerminalConfig`] and a [`SaleService`] backend.
//!
//! ## Module Organization
//! ```text
//! till_terminal/
//! ├── lib.rs        ◄─── You are here
//! ├── session.rs    ◄─── Session: cart, parked sales, drawer, checkout
//! ├── services.rs   ◄─── SaleService trait (create / void / refund)
//! ├── config.rs     ◄─── terminal.toml + TILL_* overrides
//! ├── telemetry.rs  ◄─── tracing subscriber
//! └── error.rs      ◄─── ApiError returned to the UI
//! ```
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. TerminalConfig::load(None)                                          │
//! │       defaults → terminal.toml → TILL_* env → validate                  │
//! │                                                                         │
//! │  2. init_tracing(Some(&config.logging.filter))                          │
//! │                                                                         │
//! │  3. Session::from_config(&config, backend)                              │
//! │       ├── storage.backend = "sqlite" → SqliteStore (WAL, migrations)   │
//! │       └── storage.backend = "memory" → MemoryStore                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod services;
pub mod session;
pub mod telemetry;

pub use config::{StorageBackend, TerminalConfig};
pub use error::{ApiError, ConfigError, ErrorCode};
pub use services::{SaleService, ServiceFailure};
pub use session::{CheckoutReceipt, ScanFeedback, Session};
pub use telemetry::init_tracing;
