//! # till-core: Pure Transaction Logic for Till POS
//!
//! Everything a register decides on its own, with no I/O: the cart
//! reducer, discount and total math, inventory ceilings, parked sales,
//! the register session and refunds.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Till POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  till-terminal (Session)                        │   │
//! │  │   scan ──► cart ──► checkout ──► void / refund ──► close out    │   │
//! │  └──────────────┬──────────────────────────────┬───────────────────┘   │
//! │                 │                              │                        │
//! │  ┌──────────────▼──────────────────┐  ┌────────▼────────────────────┐  │
//! │  │   ★ till-core (THIS CRATE) ★    │  │        till-store           │  │
//! │  │                                 │  │  key-value store (SQLite /  │  │
//! │  │  money     discount   cart      │  │  memory), parked sales and  │  │
//! │  │  inventory parked     register  │  │  register repositories      │  │
//! │  │  sale      refund     validation│  └─────────────────────────────┘  │
//! │  │                                 │                                    │
//! │  │  NO I/O • NO CLOCK • NO NETWORK │   "now" and "today" are always    │
//! │  └─────────────────────────────────┘   passed in by the caller         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - `Money` in minor units, `Percent` in basis points, formatting
//! - [`discount`] - Cart-level percentage or fixed discounts
//! - [`cart`] - Cart state, actions, reducer, totals
//! - [`inventory`] - Stock ceilings and barcode matching
//! - [`parked`] - Held carts
//! - [`register`] - Cash drawer session and reconciliation
//! - [`sale`] - Sale records and service request payloads
//! - [`refund`] - Refundable quantities and refund totals
//! - [`validation`] - Input rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use till_core::cart::{CartAction, CartEngine, CartLine, Price};
//! use till_core::discount::Discount;
//! use till_core::money::{Money, Percent};
//!
//! let mut cart = CartEngine::new("AUD");
//! let mug = CartLine::custom("Mug", Price::new(Money::from_minor(2000), "AUD"), 3);
//! assert!(cart.dispatch(CartAction::AddItem(mug)).is_applied());
//!
//! let discount = Discount::percentage(Percent::from_whole(10), "loyalty").unwrap();
//! let _ = cart.dispatch(CartAction::SetDiscount(Some(discount)));
//!
//! let totals = cart.totals().unwrap();
//! assert_eq!(totals.total.minor(), 5400);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod discount;
pub mod error;
pub mod inventory;
pub mod money;
pub mod parked;
pub mod refund;
pub mod register;
pub mod sale;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartAction, CartEngine, CartLine, CartOutcome, CartState, CartTotals, PaymentMethod, Price};
pub use discount::{Discount, DiscountKind, DiscountValue};
pub use error::{CoreError, CoreResult, ValidationError};
pub use inventory::{CatalogProduct, CatalogVariant, InventoryRecord, ScanOutcome, StockCeiling, StockLevel};
pub use money::{Money, Percent};
pub use parked::{ParkedSale, ParkedSales};
pub use refund::{LineRefundAmount, RefundSelection, RefundableLine};
pub use register::{Reconciliation, RegisterSession, Variance, VarianceStatus};
pub use sale::{RefundRequest, SaleRecord, SaleRequest, VoidRequest};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency used when configuration does not name one.
pub const DEFAULT_CURRENCY: &str = "AUD";
