//! # Report Builders
//!
//! Deterministic presentation views over the day's computed state: the
//! dashboard KPI block, per-route performance rows, and the two shareable
//! WhatsApp texts (daily summary and price update). Everything here is a
//! pure function of its inputs; identical inputs produce byte-identical
//! output, which the tests pin down against golden strings.
//!
//! Sharing, clipboard, and delivery of the generated texts live outside
//! this crate.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::{Catalog, ProductCategory};
use crate::dispatch::DispatchRegistry;
use crate::money::Rupee;
use crate::price::PriceCatalog;
use crate::reconcile::CashTotals;
use crate::stock::{StockLedger, StockSnapshot};

/// How many products the daily summary's top list shows.
pub const TOP_PRODUCT_COUNT: usize = 3;

// =============================================================================
// Dashboard KPIs
// =============================================================================

/// The day-level figures shown at the top of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardKpis {
    /// Σ snapshot revenue across all products.
    pub total_sales: Rupee,
    pub total_cash: Rupee,
    pub total_cheque: Rupee,
    pub total_online: Rupee,
    pub total_discounts: Rupee,
    pub total_expenses: Rupee,
    pub net_cash: Rupee,
    pub cash_over_short: Rupee,
    /// Products whose physical count disagrees with the book closing.
    pub stock_discrepancy_count: usize,
}

impl DashboardKpis {
    /// Combines stock revenue, reconciliation totals, and the discrepancy
    /// count into the dashboard block.
    pub fn assemble(
        total_sales: Rupee,
        cash: &CashTotals,
        stock_discrepancy_count: usize,
    ) -> Self {
        Self {
            total_sales,
            total_cash: cash.cash,
            total_cheque: cash.cheque,
            total_online: cash.online,
            total_discounts: cash.discounts,
            total_expenses: cash.expenses,
            net_cash: cash.net_cash,
            cash_over_short: cash.cash_over_short,
            stock_discrepancy_count,
        }
    }
}

/// Counts products with a recorded physical count that misses the book
/// closing.
pub fn stock_discrepancy_count(snapshots: &[StockSnapshot]) -> usize {
    snapshots
        .iter()
        .filter(|s| s.variance.is_some_and(|v| v != 0))
        .count()
}

// =============================================================================
// Route Performance
// =============================================================================

/// One route-and-vehicle row of the day's delivery performance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RoutePerformance {
    pub route_id: String,
    pub route_name: String,
    pub vehicle_id: String,
    pub vehicle_number: String,
    pub dispatched: i64,
    pub sold: i64,
    pub returns: i64,
    /// `dispatched − sold − returns`; negative when a vehicle sold more
    /// than it was loaded with.
    pub on_truck_remaining: i64,
    pub sales_amount: Rupee,
}

/// Builds performance rows for every (route, vehicle) pair that dispatched,
/// in catalog route order, vehicles in first-use order within a route.
///
/// A vehicle's recorded sales and returns attribute to the route of its
/// first dispatch entry of the day; on any later route the vehicle shows
/// its dispatched quantity with zero sales.
pub fn route_performance(
    catalog: &Catalog,
    ledger: &StockLedger,
    prices: &PriceCatalog,
    registry: &DispatchRegistry,
    returns: &BTreeMap<String, i64>,
) -> Vec<RoutePerformance> {
    let mut rows = Vec::new();

    for route in catalog.routes() {
        let mut vehicle_ids: Vec<&str> = Vec::new();
        for entry in registry.entries().iter().filter(|e| e.route_id == route.id) {
            if !vehicle_ids.contains(&entry.vehicle_id.as_str()) {
                vehicle_ids.push(&entry.vehicle_id);
            }
        }

        for vehicle_id in vehicle_ids {
            let dispatched: i64 = registry
                .entries()
                .iter()
                .filter(|e| e.route_id == route.id && e.vehicle_id == vehicle_id)
                .flat_map(|e| e.lines.iter())
                .map(|l| l.quantity)
                .sum();

            let attributed_here = registry
                .entries()
                .iter()
                .find(|e| e.vehicle_id == vehicle_id)
                .is_some_and(|first| first.route_id == route.id);

            let (sold, returned, sales_amount) = if attributed_here {
                let mut sold = 0;
                let mut amount = Rupee::zero();
                for product in catalog.active_products() {
                    let Some(entry) = ledger.entry(&product.id) else {
                        continue;
                    };
                    let qty = entry.vehicle_sales.get(vehicle_id).copied().unwrap_or(0);
                    if qty != 0 {
                        sold += qty;
                        let unit_price = prices
                            .unit_price(catalog, &product.id)
                            .unwrap_or_else(|_| Rupee::zero());
                        amount += unit_price.multiply_quantity(qty);
                    }
                }
                let returned = returns.get(vehicle_id).copied().unwrap_or(0);
                (sold, returned, amount)
            } else {
                (0, 0, Rupee::zero())
            };

            rows.push(RoutePerformance {
                route_id: route.id.clone(),
                route_name: route.name.clone(),
                vehicle_id: vehicle_id.to_string(),
                vehicle_number: catalog
                    .vehicle(vehicle_id)
                    .map(|v| v.number.clone())
                    .unwrap_or_else(|| vehicle_id.to_string()),
                dispatched,
                sold,
                returns: returned,
                on_truck_remaining: dispatched - sold - returned,
                sales_amount,
            });
        }
    }

    rows
}

// =============================================================================
// Daily Summary Text
// =============================================================================

/// The shareable end-of-day summary.
///
/// Section order is fixed: overview, collection, top products by revenue
/// (ties broken by product id), route performance in the order given,
/// variance line, hashtags. No trailing newline.
pub fn daily_summary_text(
    date: NaiveDate,
    products: &[StockSnapshot],
    routes: &[RoutePerformance],
    kpis: &DashboardKpis,
) -> String {
    let total_units: i64 = products.iter().map(|p| p.total_sales).sum();

    let mut ranked: Vec<&StockSnapshot> = products.iter().collect();
    ranked.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    let top_products = ranked
        .iter()
        .take(TOP_PRODUCT_COUNT)
        .map(|p| {
            let short_name: Vec<&str> = p.product_name.split(' ').take(2).collect();
            format!("• {}: {} units", short_name.join(" "), p.total_sales)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let route_summary = routes
        .iter()
        .map(|r| format!("• {}: {}", r.route_name, r.sales_amount))
        .collect::<Vec<_>>()
        .join("\n");

    let variance_line = if kpis.cash_over_short.is_zero() {
        "✅ Cash Balanced".to_string()
    } else {
        let direction = if kpis.cash_over_short.is_positive() {
            "OVER"
        } else {
            "SHORT"
        };
        format!(
            "⚠️ Cash Variance: {} {}",
            kpis.cash_over_short.abs(),
            direction
        )
    };

    format!(
        concat!(
            "🛢️ Daily Summary - {date}\n",
            "\n",
            "📊 SALES OVERVIEW\n",
            "Total Sales: {total_sales}\n",
            "Units Sold: {units}\n",
            "Active Routes: {active_routes}\n",
            "\n",
            "💰 COLLECTION\n",
            "Cash: {cash}\n",
            "Cheque: {cheque}\n",
            "Online: {online}\n",
            "Discounts: {discounts}\n",
            "\n",
            "🏆 TOP PRODUCTS\n",
            "{top_products}\n",
            "\n",
            "🚛 ROUTE PERFORMANCE\n",
            "{route_summary}\n",
            "\n",
            "{variance_line}\n",
            "\n",
            "#OilBusiness #DailySummary",
        ),
        date = date.format("%d/%m/%Y"),
        total_sales = kpis.total_sales,
        units = total_units,
        active_routes = routes.len(),
        cash = kpis.total_cash,
        cheque = kpis.total_cheque,
        online = kpis.total_online,
        discounts = kpis.total_discounts,
        top_products = top_products,
        route_summary = route_summary,
        variance_line = variance_line,
    )
}

// =============================================================================
// Pricing Update Text
// =============================================================================

/// One line of the price update message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceLine {
    pub name: String,
    pub pack_label: String,
    pub unit_price: Rupee,
}

/// The shareable price list, grouped by category.
///
/// Categories are derived from each line's product name and rendered in
/// first-seen order, items within a category in input order, one blank
/// line after each category block. No trailing newline.
pub fn pricing_update_text(date: NaiveDate, lines: &[PriceLine]) -> String {
    let mut groups: Vec<(ProductCategory, Vec<&PriceLine>)> = Vec::new();
    for line in lines {
        let category = ProductCategory::from_product_name(&line.name);
        match groups.iter_mut().find(|(c, _)| *c == category) {
            Some((_, items)) => items.push(line),
            None => groups.push((category, vec![line])),
        }
    }

    let mut message = format!("🛢️ Price Update - {}\n\n", date.format("%d/%m/%Y"));
    for (category, items) in groups {
        message.push_str(&category.display_name().to_uppercase());
        message.push('\n');
        for item in items {
            message.push_str(&format!("• {} - {}\n", item.pack_label, item.unit_price));
        }
        message.push('\n');
    }
    message.push_str("#PriceUpdate #OilRates");

    message
}

// =============================================================================
// Unit Tests
// =============================================================================
