//! # Stock Ledger
//!
//! Per-product-per-day movement records and their derived quantities.
//!
//! ## Derivation Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Derivation (per product)                       │
//! │                                                                         │
//! │   opening ──┐                                                           │
//! │             ├──► total ──┐                                              │
//! │  receipts ──┘            │                                              │
//! │                          ├──► closing ──┐                               │
//! │  salesOffice ──┐         │              ├──► balance                    │
//! │                ├─► totalSales ──────────┘         ▲                     │
//! │  Σ vehicleSales┘                        dispatch ─┘ (subtracted)        │
//! │                                                                         │
//! │  revenue = totalSales × unitPrice                                       │
//! │                                                                         │
//! │  Derived values are NEVER stored. Every read recomputes them from       │
//! │  the five recorded fields, so no view can drift from another.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Field Semantics
//! Receipts, office sales, per-vehicle sales, and the physical closing count
//! are **replace** slots: the last entry for the day wins. Dispatch is an
//! **accumulator**: batches add up. The `set_*` / `apply_*` naming keeps the
//! asymmetry visible at call sites.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::Catalog;
use crate::error::{LedgerError, LedgerResult};
use crate::money::Rupee;
use crate::price::PriceCatalog;
use crate::validation::{validate_catalog_id, validate_dispatch_quantity, validate_set_quantity};

// =============================================================================
// Stock Entry
// =============================================================================

/// The recorded movement fields for one product on one business day.
///
/// Only raw inputs live here; everything else is derived on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockEntry {
    pub product_id: String,

    /// Units on hand at day start (carried from the prior day's balance
    /// or seeded).
    pub opening: i64,

    /// Units received from the factory during the day.
    pub receipts: i64,

    /// Units sold over the office counter.
    pub sales_office: i64,

    /// Units sold per vehicle (vehicleId → units).
    pub vehicle_sales: BTreeMap<String, i64>,

    /// Units dispatched to vehicles so far (accumulates across batches).
    pub dispatch: i64,

    /// Operator's end-of-day physical count, when one was taken.
    pub closing_actual: Option<i64>,
}

impl StockEntry {
    fn new(product_id: &str) -> Self {
        Self {
            product_id: product_id.to_string(),
            opening: 0,
            receipts: 0,
            sales_office: 0,
            vehicle_sales: BTreeMap::new(),
            dispatch: 0,
            closing_actual: None,
        }
    }

    /// opening + receipts.
    pub fn total(&self) -> i64 {
        self.opening + self.receipts
    }

    /// Office sales plus all vehicle sales.
    pub fn total_sales(&self) -> i64 {
        self.sales_office + self.vehicle_sales.values().sum::<i64>()
    }

    /// Stock left after today's sales, before dispatch is removed.
    pub fn closing(&self) -> i64 {
        self.total() - self.total_sales()
    }

    /// Units physically remaining and unassigned to any vehicle.
    ///
    /// May go negative through over-sale; that state is surfaced by the
    /// exception scan rather than rejected here.
    pub fn balance(&self) -> i64 {
        self.closing() - self.dispatch
    }

    /// Physical count minus expected closing, when a count exists.
    pub fn variance(&self) -> Option<i64> {
        self.closing_actual.map(|actual| actual - self.closing())
    }
}

// =============================================================================
// Stock Snapshot
// =============================================================================

/// The full derived view of one product's day, produced by
/// [`StockLedger::snapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockSnapshot {
    pub product_id: String,
    pub product_name: String,
    pub opening: i64,
    pub receipts: i64,
    pub total: i64,
    pub sales_office: i64,
    pub vehicle_sales_total: i64,
    pub total_sales: i64,
    pub closing: i64,
    pub dispatch: i64,
    pub balance: i64,
    pub closing_actual: Option<i64>,
    pub variance: Option<i64>,
    pub unit_price: Rupee,
    pub revenue: Rupee,
}

// =============================================================================
// Stock Ledger
// =============================================================================

/// One business day's stock entries, one per active catalog product.
///
/// ## Invariants
/// - Recorded fields are non-negative (enforced on write)
/// - Dispatch never exceeds closing (enforced on `apply_dispatch`)
/// - Derived fields are recomputed on every read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockLedger {
    entries: BTreeMap<String, StockEntry>,
}

impl StockLedger {
    /// A fresh ledger with a zeroed entry per active catalog product.
    pub fn for_catalog(catalog: &Catalog) -> Self {
        let entries = catalog
            .active_products()
            .map(|p| (p.id.clone(), StockEntry::new(&p.id)))
            .collect();
        Self { entries }
    }

    /// The raw entry for a product, if tracked this day.
    pub fn entry(&self, product_id: &str) -> Option<&StockEntry> {
        self.entries.get(product_id)
    }

    fn entry_mut(&mut self, product_id: &str) -> LedgerResult<&mut StockEntry> {
        self.entries
            .get_mut(product_id)
            .ok_or_else(|| LedgerError::not_found("Product", product_id))
    }

    fn require_entry(&self, product_id: &str) -> LedgerResult<&StockEntry> {
        self.entries
            .get(product_id)
            .ok_or_else(|| LedgerError::not_found("Product", product_id))
    }

    /// Overrides a product's opening stock (day-start seed).
    pub fn seed_opening(&mut self, product_id: &str, qty: i64) -> LedgerResult<()> {
        validate_set_quantity("opening", qty)?;
        self.entry_mut(product_id)?.opening = qty;
        Ok(())
    }

    /// Replaces the day's receipts for a product.
    pub fn set_receipts(&mut self, product_id: &str, qty: i64) -> LedgerResult<()> {
        validate_set_quantity("receipts", qty)?;
        self.entry_mut(product_id)?.receipts = qty;
        Ok(())
    }

    /// Replaces the day's office-counter sales for a product.
    pub fn set_office_sales(&mut self, product_id: &str, qty: i64) -> LedgerResult<()> {
        validate_set_quantity("office sales", qty)?;
        self.entry_mut(product_id)?.sales_office = qty;
        Ok(())
    }

    /// Replaces one vehicle's sales of a product.
    ///
    /// ## Behavior
    /// - The previous value for that (product, vehicle) slot is overwritten
    /// - Zero clears the slot
    pub fn set_vehicle_sales(
        &mut self,
        product_id: &str,
        vehicle_id: &str,
        qty: i64,
    ) -> LedgerResult<()> {
        validate_catalog_id("vehicleId", vehicle_id)?;
        validate_set_quantity("vehicle sales", qty)?;

        let entry = self.entry_mut(product_id)?;
        if qty == 0 {
            entry.vehicle_sales.remove(vehicle_id);
        } else {
            entry.vehicle_sales.insert(vehicle_id.to_string(), qty);
        }
        Ok(())
    }

    /// Records the operator's end-of-day physical count for a product.
    pub fn set_closing_count(&mut self, product_id: &str, qty: i64) -> LedgerResult<()> {
        validate_set_quantity("closing count", qty)?;
        self.entry_mut(product_id)?.closing_actual = Some(qty);
        Ok(())
    }

    /// Adds a dispatched quantity to the product's accumulator.
    ///
    /// ## Rules
    /// - qty must be strictly positive (`InvalidInput`)
    /// - The resulting balance must stay non-negative
    ///   (`InsufficientBalance`, with available vs requested)
    ///
    /// The registry performs the same check before committing an entry;
    /// this one stands on its own so no caller can bypass it.
    pub fn apply_dispatch(&mut self, product_id: &str, qty: i64) -> LedgerResult<()> {
        validate_dispatch_quantity(qty)?;

        let entry = self.entry_mut(product_id)?;
        let available = entry.balance();
        if qty > available {
            return Err(LedgerError::InsufficientBalance {
                product_id: product_id.to_string(),
                available,
                requested: qty,
            });
        }

        entry.dispatch += qty;
        Ok(())
    }

    /// A product's current balance (closing minus dispatch).
    pub fn balance(&self, product_id: &str) -> LedgerResult<i64> {
        Ok(self.require_entry(product_id)?.balance())
    }

    /// The derived view of one product's day.
    ///
    /// Pure with respect to ledger state: identical state yields an
    /// identical snapshot. Products without a usable price record render a
    /// zero unit price rather than failing the read.
    pub fn snapshot(
        &self,
        catalog: &Catalog,
        prices: &PriceCatalog,
        product_id: &str,
    ) -> LedgerResult<StockSnapshot> {
        let entry = self.require_entry(product_id)?;
        let product = catalog.require_product(product_id)?;
        let unit_price = prices
            .unit_price(catalog, product_id)
            .unwrap_or_else(|_| Rupee::zero());
        let total_sales = entry.total_sales();

        Ok(StockSnapshot {
            product_id: entry.product_id.clone(),
            product_name: product.name.clone(),
            opening: entry.opening,
            receipts: entry.receipts,
            total: entry.total(),
            sales_office: entry.sales_office,
            vehicle_sales_total: entry.vehicle_sales.values().sum(),
            total_sales,
            closing: entry.closing(),
            dispatch: entry.dispatch,
            balance: entry.balance(),
            closing_actual: entry.closing_actual,
            variance: entry.variance(),
            unit_price,
            revenue: unit_price.multiply_quantity(total_sales),
        })
    }

    /// Snapshots for every tracked product, in catalog order.
    pub fn snapshots(
        &self,
        catalog: &Catalog,
        prices: &PriceCatalog,
    ) -> LedgerResult<Vec<StockSnapshot>> {
        let mut out = Vec::with_capacity(self.entries.len());
        for product in catalog.active_products() {
            if self.entries.contains_key(&product.id) {
                out.push(self.snapshot(catalog, prices, &product.id)?);
            }
        }
        Ok(out)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
