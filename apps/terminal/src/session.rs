//! # Register Session
//!
//! One merchant's till: the live cart, its parked sales, the cash drawer
//! and the backend calls that complete, void and refund sales.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Session::open(merchant, currency, store, service)                      │
//! │    ├── ParkedSaleRepository::load   (corrupt → none)                    │
//! │    └── RegisterRepository::load_at  (yesterday's drawer → closed)      │
//! │                                                                         │
//! │  scan / add / set quantity / discount ──► CartEngine (pure reducer)    │
//! │                                                                         │
//! │  park ──► snapshot + clear      resume ──► Restore(snapshot)            │
//! │                                                                         │
//! │  checkout ──► SaleRequest ──► SaleService                               │
//! │     ├── Err(message) → cart untouched, message shown verbatim           │
//! │     └── Ok(sale)     → receipt; cart kept until new_sale()              │
//! │                                                                         │
//! │  void / refund ──► SaleService (nothing local changes)                  │
//! │  reconcile(today's sales) ──► expected cash, variance                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A session holds no global state. Two sessions for the same merchant do
//! not coordinate; the store keeps whichever wrote last.

use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use till_core::cart::{CartAction, CartEngine, CartLine, CartOutcome, CartState, CartTotals, Price};
use till_core::inventory::{
    can_add, clamp_quantity, max_allowed, scan_barcode, CatalogProduct, CatalogVariant, ScanOutcome, StockCeiling,
};
use till_core::money::{change_due, Money};
use till_core::parked::ParkedSale;
use till_core::refund::{build_refund_request, compute_refund_total, eligible_lines, RefundSelection};
use till_core::register::{reconcile, Reconciliation, RegisterSession};
use till_core::sale::{SaleRecord, SaleRequest, VoidRequest};
use till_core::validation::{validate_currency_code, validate_label, validate_merchant_id};
use till_core::{CoreError, PaymentMethod};
use till_store::{KeyValueStore, MemoryStore, ParkedSaleRepository, RegisterRepository, SqliteStore, StoreConfig};

use crate::config::{StorageBackend, TerminalConfig};
use crate::error::ApiError;
use crate::services::SaleService;

// =============================================================================
// Results
// =============================================================================

/// What a barcode scan did to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanFeedback {
    /// One unit added; `quantity` is the line's new quantity.
    #[serde(rename_all = "camelCase")]
    Added { variant_id: String, quantity: i64 },

    /// No variant carries this code.
    NoMatch,

    /// The variant exists but one more unit would pass its ceiling.
    #[serde(rename_all = "camelCase")]
    OutOfStock {
        variant_id: String,
        in_cart: i64,
        ceiling: StockCeiling,
    },
}

/// A completed checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub sale: SaleRecord,
    pub total: Money,
    /// Cash sales with a tendered amount only.
    pub change_due: Option<Money>,
}

// =============================================================================
// Session
// =============================================================================

/// A merchant's register.
pub struct Session {
    merchant_id: String,
    cart: CartEngine,
    parked: ParkedSaleRepository,
    register: RegisterRepository,
    sales: Arc<dyn SaleService>,
    completed: Option<SaleRecord>,
}

impl Session {
    /// Opens a session using the local calendar day.
    pub async fn open(
        merchant_id: &str,
        default_currency: &str,
        store: Arc<dyn KeyValueStore>,
        sales: Arc<dyn SaleService>,
    ) -> Result<Self, ApiError> {
        Self::open_at(merchant_id, default_currency, store, sales, Local::now().date_naive()).await
    }

    /// Opens a session as of `today` (staleness of a stored drawer is
    /// judged against it).
    pub async fn open_at(
        merchant_id: &str,
        default_currency: &str,
        store: Arc<dyn KeyValueStore>,
        sales: Arc<dyn SaleService>,
        today: NaiveDate,
    ) -> Result<Self, ApiError> {
        validate_merchant_id(merchant_id).map_err(CoreError::from)?;
        validate_currency_code(default_currency).map_err(CoreError::from)?;

        let parked = ParkedSaleRepository::load(store.clone(), merchant_id).await;
        let register = RegisterRepository::load_at(store, merchant_id, today).await;

        info!(
            merchant_id = %merchant_id,
            parked = parked.len(),
            register_open = register.is_open(),
            "Session opened"
        );

        Ok(Session {
            merchant_id: merchant_id.to_string(),
            cart: CartEngine::new(default_currency.trim().to_ascii_uppercase()),
            parked,
            register,
            sales,
            completed: None,
        })
    }

    /// Connects the configured store and opens a session on it.
    pub async fn from_config(config: &TerminalConfig, sales: Arc<dyn SaleService>) -> Result<Self, ApiError> {
        config.validate()?;

        let store: Arc<dyn KeyValueStore> = match config.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
            StorageBackend::Sqlite => {
                let path = config.database_path();
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| ApiError::from(crate::error::ConfigError::from(e)))?;
                }
                Arc::new(SqliteStore::connect(StoreConfig::new(path)).await?)
            }
        };

        Self::open(config.merchant_id(), config.currency_code(), store, sales).await
    }

    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// The live cart.
    pub fn cart(&self) -> &CartState {
        self.cart.state()
    }

    /// Totals for the live cart.
    pub fn totals(&self) -> Result<CartTotals, ApiError> {
        Ok(self.cart.totals()?)
    }

    /// Runs a cart action. Rejections leave the cart as it was.
    pub fn dispatch(&mut self, action: CartAction) -> CartOutcome {
        let outcome = self.cart.dispatch(action);
        if let CartOutcome::Rejected(err) = &outcome {
            debug!(error = %err, "Cart action rejected");
        }
        outcome
    }

    /// Adds `quantity` of a catalog variant.
    ///
    /// Checked against the variant's current stock first: the reducer only
    /// guards lines already in the cart, so an out-of-stock variant would
    /// otherwise go in as a new line.
    pub fn add_catalog_item(
        &mut self,
        product: &CatalogProduct,
        variant: &CatalogVariant,
        quantity: i64,
    ) -> CartOutcome {
        let ceiling = max_allowed(&variant.inventory);
        let in_cart = self
            .cart
            .state()
            .line(&variant.variant_id)
            .map_or(0, |l| l.quantity);

        if let StockCeiling::Limited(available) = ceiling {
            if !can_add(in_cart, quantity, ceiling) {
                debug!(
                    variant_id = %variant.variant_id,
                    in_cart,
                    quantity,
                    available,
                    "Add blocked by stock"
                );
                return CartOutcome::Rejected(CoreError::QuantityExceedsStock {
                    variant_id: variant.variant_id.clone(),
                    requested: in_cart.saturating_add(quantity),
                    available,
                });
            }
        }

        self.dispatch(CartAction::AddItem(CartLine::from_catalog(product, variant, quantity)))
    }

    /// Adds a keyed-in item priced in the session's default currency.
    pub fn add_custom_item(&mut self, name: &str, unit_price: Money, quantity: i64) -> CartOutcome {
        let price = Price::new(unit_price, self.cart.default_currency());
        self.dispatch(CartAction::AddItem(CartLine::custom(name.trim(), price, quantity)))
    }

    /// Looks up a scanned code and adds one unit if it fits.
    pub fn scan(&mut self, catalog: &[CatalogProduct], code: &str) -> ScanFeedback {
        let outcome = scan_barcode(catalog, code, &self.cart.state().lines);
        match outcome {
            ScanOutcome::NoMatch => {
                debug!(code = %code, "Scan matched nothing");
                ScanFeedback::NoMatch
            }
            ScanOutcome::Rejected {
                variant,
                ceiling,
                in_cart,
                ..
            } => ScanFeedback::OutOfStock {
                variant_id: variant.variant_id.clone(),
                in_cart,
                ceiling,
            },
            ScanOutcome::Matched { product, variant } => {
                let variant_id = variant.variant_id.clone();
                let outcome = self.add_catalog_item(product, variant, 1);
                let line = self.cart.state().line(&variant_id);
                let in_cart = line.map_or(0, |l| l.quantity);

                match outcome {
                    CartOutcome::Applied => ScanFeedback::Added {
                        variant_id,
                        quantity: in_cart,
                    },
                    // The line's snapshotted ceiling can be tighter than today's stock.
                    CartOutcome::Rejected(CoreError::QuantityExceedsStock { available, .. }) => {
                        ScanFeedback::OutOfStock {
                            variant_id,
                            in_cart,
                            ceiling: StockCeiling::Limited(available),
                        }
                    }
                    CartOutcome::Rejected(_) => ScanFeedback::OutOfStock {
                        ceiling: line.map_or(StockCeiling::Unlimited, |l| l.max_quantity),
                        variant_id,
                        in_cart,
                    },
                }
            }
        }
    }

    /// Sets a line's quantity, clamped to the line's ceiling. Zero or less
    /// removes the line.
    pub fn set_line_quantity(&mut self, variant_id: &str, requested: i64) -> CartOutcome {
        let Some(line) = self.cart.state().line(variant_id) else {
            return CartOutcome::Rejected(CoreError::LineNotFound(variant_id.to_string()));
        };

        let quantity = clamp_quantity(requested, line.max_quantity);
        if quantity != requested {
            debug!(variant_id = %variant_id, requested, quantity, "Quantity clamped to stock");
        }

        self.dispatch(CartAction::UpdateQuantity {
            variant_id: variant_id.to_string(),
            quantity,
        })
    }

    // =========================================================================
    // Parked Sales
    // =========================================================================

    /// Held carts, oldest first.
    pub fn parked_sales(&self) -> &[ParkedSale] {
        self.parked.list()
    }

    /// Holds the live cart and starts an empty one.
    pub async fn park(&mut self, label: Option<&str>) -> Result<ParkedSale, ApiError> {
        if self.cart.state().is_empty() {
            return Err(CoreError::EmptyCart.into());
        }
        if let Some(label) = label {
            validate_label(label).map_err(CoreError::from)?;
        }

        let parked = self.parked.park(self.cart.state(), label, Utc::now()).await;
        self.new_sale();
        Ok(parked)
    }

    /// Replaces the live cart with a parked one and removes it from the list.
    ///
    /// A snapshot the cart refuses stays parked and the live cart is kept.
    pub async fn resume(&mut self, parked_id: &str) -> Result<(), ApiError> {
        let snapshot = self
            .parked
            .get(parked_id)
            .map(|p| p.cart.clone())
            .ok_or_else(|| ApiError::not_found("Parked sale", parked_id))?;

        let had_items = !self.cart.state().is_empty();
        if let CartOutcome::Rejected(err) = self.dispatch(CartAction::Restore(snapshot)) {
            warn!(parked_id = %parked_id, error = %err, "Parked sale could not be restored");
            return Err(err.into());
        }
        if had_items {
            warn!("Live cart replaced by a parked sale");
        }

        self.completed = None;
        let _ = self.parked.restore(parked_id).await;
        Ok(())
    }

    /// Drops a parked sale.
    pub async fn discard_parked(&mut self, parked_id: &str) -> Result<(), ApiError> {
        if self.parked.discard(parked_id).await {
            Ok(())
        } else {
            Err(ApiError::not_found("Parked sale", parked_id))
        }
    }

    // =========================================================================
    // Register
    // =========================================================================

    /// The open drawer, if any.
    pub fn register(&self) -> Option<&RegisterSession> {
        self.register.current()
    }

    /// Opens the drawer with a counted float, in the session currency
    /// unless another is given.
    pub async fn open_register(
        &mut self,
        opening_float: Money,
        currency_code: Option<&str>,
    ) -> Result<RegisterSession, ApiError> {
        let currency = currency_code.unwrap_or(self.cart.default_currency()).to_string();
        Ok(self.register.open(opening_float, &currency, Utc::now()).await?)
    }

    /// Closes the drawer.
    pub async fn close_register(&mut self) -> Option<RegisterSession> {
        self.register.close().await
    }

    /// Today's figures for the open drawer.
    pub fn reconcile(&self, sales: &[SaleRecord]) -> Result<Reconciliation, ApiError> {
        self.reconcile_at(sales, Local::now().date_naive())
    }

    /// Figures for the open drawer as of `today`.
    pub fn reconcile_at(&self, sales: &[SaleRecord], today: NaiveDate) -> Result<Reconciliation, ApiError> {
        let session = self
            .register
            .current()
            .ok_or_else(|| ApiError::business("Register is not open"))?;
        Ok(reconcile(session, sales, today))
    }

    // =========================================================================
    // Sales
    // =========================================================================

    /// The sale completed from the live cart, until `new_sale`.
    pub fn completed_sale(&self) -> Option<&SaleRecord> {
        self.completed.as_ref()
    }

    /// Submits the live cart to the sale service.
    ///
    /// For cash with `tendered`, the tender is checked before anything is
    /// sent. On failure the cart is left exactly as it was.
    pub async fn checkout(&mut self, tendered: Option<Money>) -> Result<CheckoutReceipt, ApiError> {
        if let Some(done) = &self.completed {
            return Err(ApiError::business(format!(
                "Sale {} is already complete; start a new sale",
                done.code
            )));
        }

        let totals = self.cart.totals()?;
        let request = SaleRequest::from_cart(&self.merchant_id, self.cart.state())?;

        let change = match (self.cart.state().payment_method, tendered) {
            (PaymentMethod::Cash, Some(tendered)) => Some(change_due(totals.total, tendered)?),
            _ => None,
        };

        info!(
            lines = request.lines.len(),
            total = totals.total.minor(),
            method = ?request.payment_method,
            "Submitting sale"
        );

        let sale = self.sales.create_sale(request).await.map_err(|e| {
            warn!(message = %e, "Sale rejected");
            ApiError::from(e)
        })?;

        info!(sale_id = %sale.id, code = %sale.code, "Sale completed");
        self.completed = Some(sale.clone());

        Ok(CheckoutReceipt {
            sale,
            total: totals.total,
            change_due: change,
        })
    }

    /// Clears the cart for the next customer.
    pub fn new_sale(&mut self) {
        self.completed = None;
        let _ = self.dispatch(CartAction::Clear);
    }

    /// Voids a completed sale.
    pub async fn void(&self, sale: &SaleRecord) -> Result<(), ApiError> {
        if sale.is_voided() {
            return Err(ApiError::business(format!("Sale {} is already voided", sale.code)));
        }

        self.sales
            .void_sale(VoidRequest {
                order_id: sale.id.clone(),
            })
            .await?;

        info!(sale_id = %sale.id, "Sale voided");
        Ok(())
    }

    /// Refunds a selection of a sale's lines; returns the amount refunded.
    ///
    /// Over-requests are clamped to what is left on each line.
    pub async fn refund(
        &self,
        sale: &SaleRecord,
        selection: &RefundSelection,
        reason: Option<&str>,
    ) -> Result<Money, ApiError> {
        let request = build_refund_request(sale, selection, reason)?;
        let amount = compute_refund_total(&eligible_lines(sale), selection)?;

        self.sales.refund_sale(request).await?;

        info!(sale_id = %sale.id, amount = amount.minor(), "Refund issued");
        Ok(amount)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
