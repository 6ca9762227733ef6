//! # Inventory Guard
//!
//! Stock ceilings for cart lines and the barcode-scan decision.
//!
//! ## Where the Guard Sits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UI intent ──► InventoryGuard (this module) ──► CartAction ──► reducer  │
//! │                    │                                                    │
//! │                    ├── max_allowed(record)    → ceiling at add time     │
//! │                    ├── can_add(in_cart, n, c) → pre-check for adds      │
//! │                    ├── clamp_quantity(q, c)   → before UpdateQuantity   │
//! │                    └── scan_barcode(...)      → match / reject / none   │
//! │                                                                         │
//! │  The reducer itself only re-checks the ceiling on AddItem.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::{CartLine, Price};

// =============================================================================
// Ceiling
// =============================================================================

/// Maximum quantity a line may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum StockCeiling {
    /// Inventory is not tracked, or the line is a custom item.
    Unlimited,
    /// On hand minus committed. Zero or negative means out of stock.
    Limited(i64),
}

impl StockCeiling {
    /// True when nothing more can be added at all.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, StockCeiling::Limited(n) if *n <= 0)
    }
}

/// Stock figures for one variant, as supplied by the catalog query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    pub track_inventory: bool,
    pub qty_on_hand: i64,
    pub qty_committed: i64,
    #[serde(default)]
    pub low_stock_threshold: Option<i64>,
}

impl InventoryRecord {
    /// A record for an item whose stock is not tracked.
    pub fn untracked() -> Self {
        InventoryRecord {
            track_inventory: false,
            qty_on_hand: 0,
            qty_committed: 0,
            low_stock_threshold: None,
        }
    }
}

/// Ceiling for a variant: unlimited when untracked, else on hand − committed.
pub fn max_allowed(record: &InventoryRecord) -> StockCeiling {
    if !record.track_inventory {
        return StockCeiling::Unlimited;
    }
    StockCeiling::Limited(record.qty_on_hand - record.qty_committed)
}

/// Whether `requested` more units fit on top of what the cart already holds.
///
/// A combined quantity that overflows i64 never fits a limited ceiling.
pub fn can_add(existing_in_cart: i64, requested: i64, ceiling: StockCeiling) -> bool {
    match ceiling {
        StockCeiling::Unlimited => true,
        StockCeiling::Limited(max) => existing_in_cart
            .checked_add(requested)
            .is_some_and(|combined| combined <= max),
    }
}

/// Clamps a quantity edit to the ceiling.
///
/// `UpdateQuantity` trusts its input, so callers run edits through here
/// first. A result of zero or less removes the line.
pub fn clamp_quantity(requested: i64, ceiling: StockCeiling) -> i64 {
    match ceiling {
        StockCeiling::Unlimited => requested,
        StockCeiling::Limited(max) => requested.min(max),
    }
}

// =============================================================================
// Stock Level
// =============================================================================

/// Badge shown next to a product in search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockLevel {
    Untracked,
    InStock,
    LowStock,
    OutOfStock,
}

/// Classifies available stock against the low-stock threshold.
pub fn stock_level(record: &InventoryRecord) -> StockLevel {
    match max_allowed(record) {
        StockCeiling::Unlimited => StockLevel::Untracked,
        StockCeiling::Limited(available) if available <= 0 => StockLevel::OutOfStock,
        StockCeiling::Limited(available) => match record.low_stock_threshold {
            Some(threshold) if available <= threshold => StockLevel::LowStock,
            _ => StockLevel::InStock,
        },
    }
}

// =============================================================================
// Catalog & Barcode Scan
// =============================================================================

/// A purchasable variant as returned by the catalog query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogVariant {
    pub variant_id: String,
    pub name: String,
    /// Barcode / SKU printed on the item.
    #[serde(default)]
    pub code: Option<String>,
    pub default_price: Price,
    #[serde(default)]
    pub image: Option<String>,
    pub inventory: InventoryRecord,
    /// Opaque catalog reference passed through to the sale service.
    pub object_ref: String,
}

/// A product and its variants, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub product_id: String,
    pub name: String,
    pub variants: Vec<CatalogVariant>,
}

/// Result of looking up a scanned code.
///
/// `NoMatch` and `Rejected` both block the add; the UI shows different
/// feedback for each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome<'a> {
    /// Nothing in the catalog carries this code.
    NoMatch,
    /// Found and one more unit fits.
    Matched {
        product: &'a CatalogProduct,
        variant: &'a CatalogVariant,
    },
    /// Found, but the ceiling does not allow one more unit.
    Rejected {
        product: &'a CatalogProduct,
        variant: &'a CatalogVariant,
        ceiling: StockCeiling,
        in_cart: i64,
    },
}

/// Matches a scanned code against the catalog.
///
/// The first variant, in catalog iteration order, whose code equals the
/// trimmed input case-insensitively wins. Duplicate codes further down
/// are never considered.
pub fn scan_barcode<'a>(
    catalog: &'a [CatalogProduct],
    scanned: &str,
    lines: &[CartLine],
) -> ScanOutcome<'a> {
    let needle = scanned.trim().to_lowercase();
    if needle.is_empty() {
        return ScanOutcome::NoMatch;
    }

    let found = catalog.iter().find_map(|product| {
        product
            .variants
            .iter()
            .find(|variant| {
                variant
                    .code
                    .as_deref()
                    .is_some_and(|code| code.trim().to_lowercase() == needle)
            })
            .map(|variant| (product, variant))
    });

    let Some((product, variant)) = found else {
        return ScanOutcome::NoMatch;
    };

    let ceiling = max_allowed(&variant.inventory);
    let in_cart = lines
        .iter()
        .find(|line| line.variant_id == variant.variant_id)
        .map_or(0, |line| line.quantity);

    if can_add(in_cart, 1, ceiling) {
        ScanOutcome::Matched { product, variant }
    } else {
        ScanOutcome::Rejected {
            product,
            variant,
            ceiling,
            in_cart,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn tracked(on_hand: i64, committed: i64) -> InventoryRecord {
        InventoryRecord {
            track_inventory: true,
            qty_on_hand: on_hand,
            qty_committed: committed,
            low_stock_threshold: Some(3),
        }
    }

    fn variant(id: &str, code: Option<&str>, inventory: InventoryRecord) -> CatalogVariant {
        CatalogVariant {
            variant_id: id.to_string(),
            name: format!("Variant {id}"),
            code: code.map(str::to_string),
            default_price: Price::new(Money::from_minor(500), "AUD"),
            image: None,
            inventory,
            object_ref: format!("ref-{id}"),
        }
    }

    fn catalog() -> Vec<CatalogProduct> {
        vec![
            CatalogProduct {
                product_id: "p1".to_string(),
                name: "Mug".to_string(),
                variants: vec![
                    variant("v1", Some("MUG-RED"), tracked(5, 0)),
                    variant("v2", Some("MUG-BLUE"), tracked(2, 2)),
                ],
            },
            CatalogProduct {
                product_id: "p2".to_string(),
                name: "Poster".to_string(),
                variants: vec![
                    variant("v3", Some("mug-red"), InventoryRecord::untracked()),
                    variant("v4", None, InventoryRecord::untracked()),
                ],
            },
        ]
    }

    #[test]
    fn test_max_allowed() {
        assert_eq!(max_allowed(&InventoryRecord::untracked()), StockCeiling::Unlimited);
        assert_eq!(max_allowed(&tracked(10, 3)), StockCeiling::Limited(7));
        assert_eq!(max_allowed(&tracked(1, 4)), StockCeiling::Limited(-3));
        assert!(StockCeiling::Limited(0).is_exhausted());
        assert!(!StockCeiling::Unlimited.is_exhausted());
    }

    #[test]
    fn test_can_add() {
        assert!(can_add(100, 100, StockCeiling::Unlimited));
        assert!(can_add(2, 3, StockCeiling::Limited(5)));
        assert!(!can_add(2, 4, StockCeiling::Limited(5)));
        assert!(!can_add(0, 1, StockCeiling::Limited(0)));
        assert!(!can_add(0, 1, StockCeiling::Limited(-2)));
        assert!(!can_add(i64::MAX, 1, StockCeiling::Limited(i64::MAX)));
    }

    #[test]
    fn test_clamp_quantity() {
        assert_eq!(clamp_quantity(9, StockCeiling::Limited(5)), 5);
        assert_eq!(clamp_quantity(3, StockCeiling::Limited(5)), 3);
        assert_eq!(clamp_quantity(50, StockCeiling::Unlimited), 50);
    }

    #[test]
    fn test_stock_level() {
        assert_eq!(stock_level(&InventoryRecord::untracked()), StockLevel::Untracked);
        assert_eq!(stock_level(&tracked(10, 0)), StockLevel::InStock);
        assert_eq!(stock_level(&tracked(3, 0)), StockLevel::LowStock);
        assert_eq!(stock_level(&tracked(2, 2)), StockLevel::OutOfStock);
    }

    #[test]
    fn test_scan_first_match_wins_case_insensitive() {
        let catalog = catalog();
        match scan_barcode(&catalog, "  mug-Red ", &[]) {
            ScanOutcome::Matched { product, variant } => {
                assert_eq!(product.product_id, "p1");
                assert_eq!(variant.variant_id, "v1");
            }
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn test_scan_out_of_stock_is_rejected_not_missing() {
        let catalog = catalog();
        match scan_barcode(&catalog, "MUG-BLUE", &[]) {
            ScanOutcome::Rejected { variant, ceiling, in_cart, .. } => {
                assert_eq!(variant.variant_id, "v2");
                assert_eq!(ceiling, StockCeiling::Limited(0));
                assert_eq!(in_cart, 0);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_scan_counts_units_already_in_cart() {
        let catalog = catalog();
        let product = &catalog[0];
        let line = CartLine::from_catalog(product, &product.variants[0], 5);
        assert!(matches!(
            scan_barcode(&catalog, "MUG-RED", &[line]),
            ScanOutcome::Rejected { in_cart: 5, .. }
        ));
    }

    #[test]
    fn test_scan_no_match() {
        let catalog = catalog();
        assert_eq!(scan_barcode(&catalog, "NOPE", &[]), ScanOutcome::NoMatch);
        assert_eq!(scan_barcode(&catalog, "   ", &[]), ScanOutcome::NoMatch);
    }
}
