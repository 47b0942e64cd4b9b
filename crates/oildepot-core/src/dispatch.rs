//! # Dispatch Registry
//!
//! Append-only dispatch events and their aggregations.
//!
//! ## Entry Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Dispatch Entry Lifecycle                             │
//! │                                                                         │
//! │  Operator submits (route, vehicle, lines)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  resolve route/vehicle/products against Catalog                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  drop zero lines ── nothing left? ──► InvalidInput                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  pre-check every product's balance ──► InsufficientBalance              │
//! │       │              (no state touched on failure)                      │
//! │       ▼                                                                 │
//! │  apply each line to StockLedger, append immutable entry                 │
//! │                                                                         │
//! │  TRANSACTIONAL: all lines commit or none do.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Entries are never mutated after creation, only aggregated: per-route
//! summaries for the dispatch log and a vehicle × product grid for the
//! day-end loading sheet.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::error::{LedgerError, LedgerResult};
use crate::stock::StockLedger;
use crate::validation::validate_dispatch_quantity;

// =============================================================================
// Dispatch Entry
// =============================================================================

/// One product line within a dispatch entry.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DispatchLine {
    pub product_id: String,
    pub quantity: i64,
}

/// An immutable record of stock loaded onto a vehicle for a route.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DispatchEntry {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// When the entry was committed.
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,

    pub route_id: String,
    pub vehicle_id: String,

    /// Positive-quantity lines, in submission order.
    pub lines: Vec<DispatchLine>,
}

fn generate_entry_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Aggregation Views
// =============================================================================

/// Summed dispatched quantity of one product within a route summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RouteProductTotal {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
}

/// A route's dispatch activity for the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RouteDispatchSummary {
    pub route_id: String,
    pub route_name: String,

    /// Registration numbers of the vehicles used, in first-use order.
    pub vehicles: Vec<String>,

    /// Per-product totals, in first-dispatch order.
    pub products: Vec<RouteProductTotal>,

    pub total_dispatched: i64,
}

/// One product row of the vehicle × product grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GridRow {
    pub product_id: String,
    pub product_name: String,

    /// Cell quantities aligned with `DispatchGrid::vehicles`.
    pub quantities: Vec<i64>,

    pub total: i64,
}

/// The day's vehicle × product loading grid.
///
/// ## Invariants
/// - Columns ordered lexically by vehicle id
/// - `rows` sorted by product name (ties by product id)
/// - Σ row totals = Σ `vehicle_totals` = `grand_total`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DispatchGrid {
    /// Registration numbers of all dispatched vehicles.
    pub vehicles: Vec<String>,

    pub rows: Vec<GridRow>,

    /// Column totals aligned with `vehicles`.
    pub vehicle_totals: Vec<i64>,

    pub grand_total: i64,
}

// =============================================================================
// Dispatch Registry
// =============================================================================

/// The day's append-only sequence of dispatch entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchRegistry {
    entries: Vec<DispatchEntry>,
}

impl DispatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries in creation order.
    pub fn entries(&self) -> &[DispatchEntry] {
        &self.entries
    }

    /// Validates and commits a dispatch entry.
    ///
    /// ## Behavior
    /// - Zero-quantity lines are dropped; negative ones are rejected
    /// - Rejects with `InvalidInput` when no positive line remains
    /// - Route, vehicle, and every product must exist (`NotFound`)
    /// - Every product's summed requested quantity is checked against its
    ///   ledger balance before anything is applied; on failure neither the
    ///   ledger nor the registry changes
    ///
    /// Returns the committed entry.
    pub fn add_entry(
        &mut self,
        catalog: &Catalog,
        ledger: &mut StockLedger,
        route_id: &str,
        vehicle_id: &str,
        lines: Vec<DispatchLine>,
    ) -> LedgerResult<&DispatchEntry> {
        catalog.require_route(route_id)?;
        catalog.require_vehicle(vehicle_id)?;

        let lines: Vec<DispatchLine> = lines.into_iter().filter(|l| l.quantity != 0).collect();
        if lines.is_empty() {
            return Err(LedgerError::invalid_input("no product quantities supplied"));
        }

        // Aggregate per product so a product split across lines is checked
        // against its balance once, with the combined quantity.
        let mut requested: Vec<(&str, i64)> = Vec::new();
        for line in &lines {
            validate_dispatch_quantity(line.quantity)?;
            catalog.require_product(&line.product_id)?;
            match requested.iter_mut().find(|(id, _)| *id == line.product_id) {
                Some((_, qty)) => *qty += line.quantity,
                None => requested.push((&line.product_id, line.quantity)),
            }
        }

        for &(product_id, qty) in &requested {
            let available = ledger.balance(product_id)?;
            if qty > available {
                return Err(LedgerError::InsufficientBalance {
                    product_id: product_id.to_string(),
                    available,
                    requested: qty,
                });
            }
        }

        // Pre-checked above; per-line application cannot overdraw.
        for line in &lines {
            ledger.apply_dispatch(&line.product_id, line.quantity)?;
        }

        self.entries.push(DispatchEntry {
            id: generate_entry_id(),
            timestamp: Utc::now(),
            route_id: route_id.to_string(),
            vehicle_id: vehicle_id.to_string(),
            lines,
        });
        // Just pushed, so the registry cannot be empty here.
        self.entries
            .last()
            .ok_or_else(|| LedgerError::InconsistentAggregate {
                detail: "dispatch entry vanished after append".to_string(),
            })
    }

    /// Per-route dispatch totals, in catalog route order.
    ///
    /// Routes with nothing dispatched are omitted. Vehicles appear in
    /// first-use order; products in first-dispatch order.
    pub fn summary_by_route(&self, catalog: &Catalog) -> Vec<RouteDispatchSummary> {
        let mut summaries = Vec::new();

        for route in catalog.routes() {
            let mut vehicles: Vec<String> = Vec::new();
            let mut products: Vec<RouteProductTotal> = Vec::new();
            let mut total = 0;

            for entry in self.entries.iter().filter(|e| e.route_id == route.id) {
                let number = catalog
                    .vehicle(&entry.vehicle_id)
                    .map(|v| v.number.clone())
                    .unwrap_or_else(|| entry.vehicle_id.clone());
                if !vehicles.contains(&number) {
                    vehicles.push(number);
                }

                for line in &entry.lines {
                    total += line.quantity;
                    match products.iter_mut().find(|p| p.product_id == line.product_id) {
                        Some(product) => product.quantity += line.quantity,
                        None => products.push(RouteProductTotal {
                            product_id: line.product_id.clone(),
                            product_name: catalog
                                .product(&line.product_id)
                                .map(|p| p.name.clone())
                                .unwrap_or_else(|| line.product_id.clone()),
                            quantity: line.quantity,
                        }),
                    }
                }
            }

            if total > 0 {
                summaries.push(RouteDispatchSummary {
                    route_id: route.id.clone(),
                    route_name: route.name.clone(),
                    vehicles,
                    products,
                    total_dispatched: total,
                });
            }
        }

        summaries
    }

    /// The vehicle × product grid over all of the day's entries.
    ///
    /// Fails with `InconsistentAggregate` if the row and column totals
    /// disagree; that cannot happen through this code path and would mean
    /// the aggregation itself is defective.
    pub fn vehicle_product_grid(&self, catalog: &Catalog) -> LedgerResult<DispatchGrid> {
        // Distinct vehicles, sorted lexically by id.
        let mut vehicles: Vec<(String, String)> = Vec::new();
        for entry in &self.entries {
            if !vehicles.iter().any(|(id, _)| *id == entry.vehicle_id) {
                let number = catalog
                    .vehicle(&entry.vehicle_id)
                    .map(|v| v.number.clone())
                    .unwrap_or_else(|| entry.vehicle_id.clone());
                vehicles.push((entry.vehicle_id.clone(), number));
            }
        }
        vehicles.sort_by(|a, b| a.0.cmp(&b.0));

        // Distinct products, sorted by display name with id as tiebreaker.
        let mut product_keys: Vec<(String, String)> = Vec::new();
        for entry in &self.entries {
            for line in &entry.lines {
                if !product_keys.iter().any(|(id, _)| *id == line.product_id) {
                    let name = catalog
                        .product(&line.product_id)
                        .map(|p| p.name.clone())
                        .unwrap_or_else(|| line.product_id.clone());
                    product_keys.push((line.product_id.clone(), name));
                }
            }
        }
        product_keys.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        let mut rows = Vec::with_capacity(product_keys.len());
        let mut vehicle_totals = vec![0; vehicles.len()];

        for (product_id, product_name) in product_keys {
            let mut quantities = vec![0; vehicles.len()];
            for entry in &self.entries {
                let Some(col) = vehicles.iter().position(|(id, _)| *id == entry.vehicle_id)
                else {
                    continue;
                };
                for line in entry.lines.iter().filter(|l| l.product_id == product_id) {
                    quantities[col] += line.quantity;
                    vehicle_totals[col] += line.quantity;
                }
            }
            let total = quantities.iter().sum();
            rows.push(GridRow {
                product_id,
                product_name,
                quantities,
                total,
            });
        }

        let grand_total: i64 = vehicle_totals.iter().sum();
        let row_sum: i64 = rows.iter().map(|r| r.total).sum();
        if row_sum != grand_total {
            return Err(LedgerError::InconsistentAggregate {
                detail: format!(
                    "grid row totals ({row_sum}) disagree with column totals ({grand_total})"
                ),
            });
        }

        Ok(DispatchGrid {
            vehicles: vehicles.into_iter().map(|(_, number)| number).collect(),
            rows,
            vehicle_totals,
            grand_total,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
