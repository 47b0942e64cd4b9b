//! # Day Store
//!
//! The arena of open business days and the single entry point for every
//! mutation and read.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Day Store Operations                              │
//! │                                                                         │
//! │  Operator Action           Store Operation         Day State Change     │
//! │  ───────────────           ───────────────         ────────────────     │
//! │                                                                         │
//! │  Start of day ───────────► open_day() ───────────► carry prior balance  │
//! │                                                                         │
//! │  Stock entry form ───────► record_receipts() ────► replace field        │
//! │                            record_office_sales()                        │
//! │                            record_vehicle_sales()                       │
//! │                                                                         │
//! │  Loading sheet ──────────► add_dispatch() ───────► append + accumulate  │
//! │                                                                         │
//! │  Evening count ──────────► record_closing_count()─► replace field       │
//! │                                                                         │
//! │  Accounts page ──────────► reconcile_route() ────► store, terminal      │
//! │                                                                         │
//! │  Dashboard / reports ────► snapshots, kpis, ... ─► (read only)          │
//! │                                                                         │
//! │  NOTE: All operations lock the arena exclusively; mutations are atomic  │
//! │        because every core operation validates before touching state.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use oildepot_core::validation::validate_set_quantity;
use oildepot_core::{
    exceptions, reconcile, report, ActualBreakdown, Catalog, CashReconciliation, DashboardKpis,
    DispatchGrid, DispatchLine, ExceptionRecord, ExpectedBreakdown, ExpenseEntry, LedgerError,
    LedgerResult, PriceLine, RouteCashSummary, RouteDispatchSummary, RoutePerformance, Rupee,
    StockSnapshot,
};

use crate::day::BusinessDay;

/// Thread-safe arena of business days.
///
/// ## Thread Safety
/// Days live behind `Arc<Mutex<..>>`: one writer at a time, which is the
/// operating model of a single-depot ledger. The catalog is immutable
/// reference data and sits outside the lock.
#[derive(Debug)]
pub struct DayStore {
    catalog: Catalog,
    days: Arc<Mutex<BTreeMap<NaiveDate, BusinessDay>>>,
}

impl DayStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            days: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    /// A store over the built-in depot dataset.
    pub fn with_default_catalog() -> Self {
        Self::new(Catalog::with_defaults())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Executes a function with read access to one day.
    fn with_day<F, R>(&self, date: NaiveDate, f: F) -> LedgerResult<R>
    where
        F: FnOnce(&BusinessDay) -> LedgerResult<R>,
    {
        let days = self.days.lock().expect("day store mutex poisoned");
        let day = days
            .get(&date)
            .ok_or_else(|| LedgerError::not_found("Business day", date.to_string()))?;
        f(day)
    }

    /// Executes a function with write access to one day.
    fn with_day_mut<F, R>(&self, date: NaiveDate, f: F) -> LedgerResult<R>
    where
        F: FnOnce(&mut BusinessDay) -> LedgerResult<R>,
    {
        let mut days = self.days.lock().expect("day store mutex poisoned");
        let day = days
            .get_mut(&date)
            .ok_or_else(|| LedgerError::not_found("Business day", date.to_string()))?;
        f(day)
    }

    // =========================================================================
    // Day Lifecycle
    // =========================================================================

    /// Opens a business day.
    ///
    /// ## Behavior
    /// - Opening stock is carried from the latest prior day's balances
    ///   (zero stock when this is the first day)
    /// - Prices are carried from the latest prior day (seed rates when none)
    /// - Re-opening an existing day fails with `InvalidInput`
    pub fn open_day(&self, date: NaiveDate) -> LedgerResult<()> {
        let mut days = self.days.lock().expect("day store mutex poisoned");
        if days.contains_key(&date) {
            return Err(LedgerError::invalid_input(format!(
                "business day {date} is already open"
            )));
        }

        let day = match days.range(..date).next_back() {
            Some((prior_date, prior)) => {
                debug!(%date, from = %prior_date, "Carrying forward opening stock and prices");
                BusinessDay::following(&self.catalog, date, prior)?
            }
            None => BusinessDay::first(&self.catalog, date, Utc::now()),
        };
        days.insert(date, day);
        info!(%date, "Opened business day");
        Ok(())
    }

    // =========================================================================
    // Stock Mutations
    // =========================================================================

    /// Overrides a product's opening stock for the day.
    pub fn seed_opening(&self, date: NaiveDate, product_id: &str, qty: i64) -> LedgerResult<()> {
        self.with_day_mut(date, |day| {
            day.stock.seed_opening(product_id, qty)?;
            debug!(%date, product_id = %product_id, qty = %qty, "Seeded opening stock");
            Ok(())
        })
    }

    /// Replaces the day's received quantity for a product.
    pub fn record_receipts(&self, date: NaiveDate, product_id: &str, qty: i64) -> LedgerResult<()> {
        self.with_day_mut(date, |day| {
            day.stock.set_receipts(product_id, qty)?;
            debug!(%date, product_id = %product_id, qty = %qty, "Recorded receipts");
            Ok(())
        })
    }

    /// Replaces the day's office-counter sales for a product.
    pub fn record_office_sales(
        &self,
        date: NaiveDate,
        product_id: &str,
        qty: i64,
    ) -> LedgerResult<()> {
        self.with_day_mut(date, |day| {
            day.stock.set_office_sales(product_id, qty)?;
            debug!(%date, product_id = %product_id, qty = %qty, "Recorded office sales");
            Ok(())
        })
    }

    /// Replaces one vehicle's sales of a product.
    pub fn record_vehicle_sales(
        &self,
        date: NaiveDate,
        product_id: &str,
        vehicle_id: &str,
        qty: i64,
    ) -> LedgerResult<()> {
        self.catalog.require_vehicle(vehicle_id)?;
        self.with_day_mut(date, |day| {
            day.stock.set_vehicle_sales(product_id, vehicle_id, qty)?;
            debug!(%date, product_id = %product_id, vehicle_id = %vehicle_id, qty = %qty, "Recorded vehicle sales");
            Ok(())
        })
    }

    /// Records the operator's end-of-day physical count for a product.
    pub fn record_closing_count(
        &self,
        date: NaiveDate,
        product_id: &str,
        qty: i64,
    ) -> LedgerResult<()> {
        self.with_day_mut(date, |day| {
            day.stock.set_closing_count(product_id, qty)?;
            debug!(%date, product_id = %product_id, qty = %qty, "Recorded closing count");
            Ok(())
        })
    }

    /// Replaces the units a vehicle returned to the depot. Zero clears the
    /// slot.
    pub fn record_vehicle_returns(
        &self,
        date: NaiveDate,
        vehicle_id: &str,
        qty: i64,
    ) -> LedgerResult<()> {
        self.catalog.require_vehicle(vehicle_id)?;
        validate_set_quantity("returns", qty)?;
        self.with_day_mut(date, |day| {
            if qty == 0 {
                day.returns.remove(vehicle_id);
            } else {
                day.returns.insert(vehicle_id.to_string(), qty);
            }
            debug!(%date, vehicle_id = %vehicle_id, qty = %qty, "Recorded vehicle returns");
            Ok(())
        })
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Commits a dispatch entry, returning its id.
    ///
    /// Validation and atomicity live in the registry: either every line
    /// clears its balance check and commits, or nothing changes.
    pub fn add_dispatch(
        &self,
        date: NaiveDate,
        route_id: &str,
        vehicle_id: &str,
        lines: Vec<DispatchLine>,
    ) -> LedgerResult<String> {
        self.with_day_mut(date, |day| {
            let entry =
                day.dispatch
                    .add_entry(&self.catalog, &mut day.stock, route_id, vehicle_id, lines)?;
            let entry_id = entry.id.clone();
            info!(%date, route_id = %route_id, vehicle_id = %vehicle_id, entry_id = %entry_id, "Dispatch committed");
            Ok(entry_id)
        })
    }

    // =========================================================================
    // Pricing
    // =========================================================================

    /// Updates a product's rate for the day, returning the new unit price.
    pub fn update_price(
        &self,
        date: NaiveDate,
        product_id: &str,
        base_rate_per_kg: f64,
        conversion_factor: f64,
    ) -> LedgerResult<Rupee> {
        self.with_day_mut(date, |day| {
            let unit_price = day.prices.update_price(
                &self.catalog,
                product_id,
                base_rate_per_kg,
                conversion_factor,
                Utc::now(),
            )?;
            info!(%date, product_id = %product_id, unit_price = %unit_price, "Updated price");
            Ok(unit_price)
        })
    }

    // =========================================================================
    // Reconciliation
    // =========================================================================

    /// Reconciles a route's cash for the day.
    ///
    /// ## Behavior
    /// - Route and vehicle must exist (`NotFound`)
    /// - A route reconciles at most once per day; a second attempt fails
    ///   with `InvalidInput` and leaves the stored record untouched
    ///
    /// Returns the computed summary.
    pub fn reconcile_route(
        &self,
        date: NaiveDate,
        route_id: &str,
        vehicle_id: &str,
        expected: ExpectedBreakdown,
        actual: ActualBreakdown,
        expenses: Vec<ExpenseEntry>,
    ) -> LedgerResult<RouteCashSummary> {
        self.catalog.require_route(route_id)?;
        self.catalog.require_vehicle(vehicle_id)?;
        self.with_day_mut(date, |day| {
            if day.reconciliations.contains_key(route_id) {
                return Err(LedgerError::invalid_input(format!(
                    "route {route_id} already reconciled for {date}"
                )));
            }

            let rec = CashReconciliation::new(route_id, vehicle_id, expected, actual, expenses);
            let summary = rec.summary;
            info!(
                %date,
                route_id = %route_id,
                status = ?summary.status,
                cash_over_short = %summary.cash_over_short,
                "Route reconciled"
            );
            day.reconciliations.insert(route_id.to_string(), rec);
            Ok(summary)
        })
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// One product's derived stock view.
    pub fn snapshot(&self, date: NaiveDate, product_id: &str) -> LedgerResult<StockSnapshot> {
        self.with_day(date, |day| {
            day.stock.snapshot(&self.catalog, &day.prices, product_id)
        })
    }

    /// All products' derived stock views, in catalog order.
    pub fn snapshots(&self, date: NaiveDate) -> LedgerResult<Vec<StockSnapshot>> {
        self.with_day(date, |day| day.stock.snapshots(&self.catalog, &day.prices))
    }

    /// Per-route dispatch totals, routes with no dispatches omitted.
    pub fn route_summaries(&self, date: NaiveDate) -> LedgerResult<Vec<RouteDispatchSummary>> {
        self.with_day(date, |day| Ok(day.dispatch.summary_by_route(&self.catalog)))
    }

    /// The day's vehicle × product loading grid.
    pub fn dispatch_grid(&self, date: NaiveDate) -> LedgerResult<DispatchGrid> {
        self.with_day(date, |day| day.dispatch.vehicle_product_grid(&self.catalog))
    }

    /// Stored reconciliations, in catalog route order.
    pub fn route_reconciliations(&self, date: NaiveDate) -> LedgerResult<Vec<CashReconciliation>> {
        self.with_day(date, |day| {
            Ok(self
                .catalog
                .routes()
                .iter()
                .filter_map(|route| day.reconciliations.get(&route.id).cloned())
                .collect())
        })
    }

    /// The dashboard KPI block for the day.
    pub fn dashboard_kpis(&self, date: NaiveDate) -> LedgerResult<DashboardKpis> {
        self.with_day(date, |day| Ok(Self::assemble_kpis(&self.catalog, day)?.1))
    }

    /// Delivery performance rows per (route, vehicle) pair.
    pub fn route_performance(&self, date: NaiveDate) -> LedgerResult<Vec<RoutePerformance>> {
        self.with_day(date, |day| {
            Ok(report::route_performance(
                &self.catalog,
                &day.stock,
                &day.prices,
                &day.dispatch,
                &day.returns,
            ))
        })
    }

    /// The day's anomaly scan.
    pub fn exceptions(&self, date: NaiveDate) -> LedgerResult<Vec<ExceptionRecord>> {
        self.with_day(date, |day| {
            let snapshots = day.stock.snapshots(&self.catalog, &day.prices)?;
            let recs: Vec<CashReconciliation> = day.reconciliations.values().cloned().collect();
            Ok(exceptions::scan(
                &self.catalog,
                &snapshots,
                &day.dispatch,
                &recs,
            ))
        })
    }

    /// The shareable end-of-day summary text.
    pub fn daily_summary_text(&self, date: NaiveDate) -> LedgerResult<String> {
        self.with_day(date, |day| {
            let (snapshots, kpis) = Self::assemble_kpis(&self.catalog, day)?;
            let routes = report::route_performance(
                &self.catalog,
                &day.stock,
                &day.prices,
                &day.dispatch,
                &day.returns,
            );
            Ok(report::daily_summary_text(date, &snapshots, &routes, &kpis))
        })
    }

    /// The shareable price list text, products in catalog order.
    pub fn pricing_update_text(&self, date: NaiveDate) -> LedgerResult<String> {
        self.with_day(date, |day| {
            let mut lines = Vec::new();
            for product in self.catalog.active_products() {
                let unit_price = day.prices.unit_price(&self.catalog, &product.id)?;
                lines.push(PriceLine {
                    name: product.name.clone(),
                    pack_label: product.pack_label.clone(),
                    unit_price,
                });
            }
            Ok(report::pricing_update_text(date, &lines))
        })
    }

    /// Snapshots plus the KPI block derived from them and the stored
    /// reconciliations.
    fn assemble_kpis(
        catalog: &Catalog,
        day: &BusinessDay,
    ) -> LedgerResult<(Vec<StockSnapshot>, DashboardKpis)> {
        let snapshots = day.stock.snapshots(catalog, &day.prices)?;
        let total_sales: Rupee = snapshots.iter().map(|s| s.revenue).sum();
        let recs: Vec<CashReconciliation> = day.reconciliations.values().cloned().collect();
        let cash = reconcile::aggregate(&recs);
        let kpis = DashboardKpis::assemble(
            total_sales,
            &cash,
            report::stock_discrepancy_count(&snapshots),
        );
        Ok((snapshots, kpis))
    }
}

impl Default for DayStore {
    fn default() -> Self {
        Self::with_default_catalog()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use oildepot_core::{CashStatus, ExpenseType};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn line(product_id: &str, quantity: i64) -> DispatchLine {
        DispatchLine {
            product_id: product_id.to_string(),
            quantity,
        }
    }

    fn rupees(amount: i64) -> Rupee {
        Rupee::from_rupees(amount)
    }

    fn expense(amount: i64) -> ExpenseEntry {
        ExpenseEntry {
            expense_type: ExpenseType::Diesel,
            amount: rupees(amount),
            notes: Some("Fuel for route".to_string()),
        }
    }

    #[test]
    fn test_open_day_twice_fails() {
        let store = DayStore::with_default_catalog();
        store.open_day(date(11)).unwrap();

        let err = store.open_day(date(11)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input: business day 2024-03-11 is already open"
        );
    }

    #[test]
    fn test_mutation_on_unopened_day_fails() {
        let store = DayStore::with_default_catalog();
        let err = store.record_receipts(date(11), "SF_30KG", 10).unwrap_err();
        assert_eq!(err.to_string(), "Business day not found: 2024-03-11");
    }

    #[test]
    fn test_unknown_vehicle_rejected_before_state_change() {
        let store = DayStore::with_default_catalog();
        store.open_day(date(11)).unwrap();

        let err = store
            .record_vehicle_sales(date(11), "SF_30KG", "VH_9999", 5)
            .unwrap_err();
        assert_eq!(err.to_string(), "Vehicle not found: VH_9999");

        let snapshot = store.snapshot(date(11), "SF_30KG").unwrap();
        assert_eq!(snapshot.vehicle_sales_total, 0);
    }

    #[test]
    fn test_stock_entry_flow() {
        let store = DayStore::with_default_catalog();
        store.open_day(date(11)).unwrap();

        store.seed_opening(date(11), "SF_30KG", 50).unwrap();
        store.record_receipts(date(11), "SF_30KG", 10).unwrap();
        store.record_office_sales(date(11), "SF_30KG", 15).unwrap();
        store
            .record_vehicle_sales(date(11), "SF_30KG", "VH_2259", 7)
            .unwrap();

        let snapshot = store.snapshot(date(11), "SF_30KG").unwrap();
        assert_eq!(snapshot.total, 60);
        assert_eq!(snapshot.total_sales, 22);
        assert_eq!(snapshot.closing, 38);
        assert_eq!(snapshot.balance, 38);
        assert_eq!(snapshot.revenue, rupees(85_800));
    }

    #[test]
    fn test_dispatch_updates_grid_and_balance() {
        let store = DayStore::with_default_catalog();
        store.open_day(date(11)).unwrap();
        store.seed_opening(date(11), "SF_30KG", 50).unwrap();
        store.seed_opening(date(11), "SF_5L", 30).unwrap();

        let entry_id = store
            .add_dispatch(
                date(11),
                "ROUTE_UTHUKOTAI",
                "VH_2259",
                vec![line("SF_30KG", 20), line("SF_5L", 10)],
            )
            .unwrap();
        assert!(!entry_id.is_empty());

        assert_eq!(store.snapshot(date(11), "SF_30KG").unwrap().balance, 30);

        let grid = store.dispatch_grid(date(11)).unwrap();
        assert_eq!(grid.grand_total, 30);
        assert_eq!(grid.vehicles, vec!["2259"]);

        let summaries = store.route_summaries(date(11)).unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].route_id, "ROUTE_UTHUKOTAI");
        assert_eq!(summaries[0].total_dispatched, 30);
    }

    #[test]
    fn test_over_dispatch_rejected_atomically() {
        let store = DayStore::with_default_catalog();
        store.open_day(date(11)).unwrap();
        store.seed_opening(date(11), "SF_30KG", 50).unwrap();
        store.seed_opening(date(11), "SF_5L", 5).unwrap();

        let err = store
            .add_dispatch(
                date(11),
                "ROUTE_ECR",
                "VH_5149",
                vec![line("SF_30KG", 20), line("SF_5L", 8)],
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));

        assert_eq!(store.snapshot(date(11), "SF_30KG").unwrap().dispatch, 0);
        assert_eq!(store.snapshot(date(11), "SF_5L").unwrap().dispatch, 0);
        assert!(store.route_summaries(date(11)).unwrap().is_empty());
    }

    #[test]
    fn test_vehicle_returns_feed_route_performance() {
        let store = DayStore::with_default_catalog();
        store.open_day(date(11)).unwrap();
        store.seed_opening(date(11), "SF_30KG", 50).unwrap();
        store
            .add_dispatch(
                date(11),
                "ROUTE_UTHUKOTAI",
                "VH_2259",
                vec![line("SF_30KG", 20)],
            )
            .unwrap();
        store
            .record_vehicle_sales(date(11), "SF_30KG", "VH_2259", 15)
            .unwrap();

        let err = store
            .record_vehicle_returns(date(11), "VH_9999", 3)
            .unwrap_err();
        assert_eq!(err.to_string(), "Vehicle not found: VH_9999");

        let err = store
            .record_vehicle_returns(date(11), "VH_2259", -3)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input: returns must be non-negative (got -3)"
        );

        // Neither rejected call touched the slot
        let rows = store.route_performance(date(11)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].returns, 0);
        assert_eq!(rows[0].on_truck_remaining, 5);

        store
            .record_vehicle_returns(date(11), "VH_2259", 3)
            .unwrap();
        let rows = store.route_performance(date(11)).unwrap();
        assert_eq!(rows[0].dispatched, 20);
        assert_eq!(rows[0].sold, 15);
        assert_eq!(rows[0].returns, 3);
        assert_eq!(rows[0].on_truck_remaining, 2);

        // Replace semantics: zero clears the slot
        store
            .record_vehicle_returns(date(11), "VH_2259", 0)
            .unwrap();
        let rows = store.route_performance(date(11)).unwrap();
        assert_eq!(rows[0].returns, 0);
        assert_eq!(rows[0].on_truck_remaining, 5);
    }

    #[test]
    fn test_carry_forward_across_days() {
        let store = DayStore::with_default_catalog();
        store.open_day(date(11)).unwrap();
        store.seed_opening(date(11), "SF_30KG", 50).unwrap();
        store.record_office_sales(date(11), "SF_30KG", 10).unwrap();
        store
            .add_dispatch(
                date(11),
                "ROUTE_PONNERI",
                "VH_3083",
                vec![line("SF_30KG", 15)],
            )
            .unwrap();
        store
            .update_price(date(11), "SF_30KG", 132.0, 30.0)
            .unwrap();

        store.open_day(date(12)).unwrap();

        // Opening = 50 - 10 - 15 = 25; the new rate follows the calendar
        let snapshot = store.snapshot(date(12), "SF_30KG").unwrap();
        assert_eq!(snapshot.opening, 25);
        assert_eq!(snapshot.dispatch, 0);
        assert_eq!(snapshot.unit_price, rupees(3_960));
    }

    #[test]
    fn test_reconcile_route_is_terminal() {
        let store = DayStore::with_default_catalog();
        store.open_day(date(11)).unwrap();

        let expected = ExpectedBreakdown {
            cash: rupees(120_000),
            cheque: rupees(15_000),
            online: rupees(8_000),
            discount: rupees(2_000),
        };
        let actual = ActualBreakdown {
            cash: rupees(118_000),
            cheque: rupees(15_000),
            online: rupees(8_000),
        };

        let summary = store
            .reconcile_route(
                date(11),
                "ROUTE_UTHUKOTAI",
                "VH_2259",
                expected,
                actual,
                vec![expense(4_000)],
            )
            .unwrap();
        assert_eq!(summary.cash_over_short, rupees(-6_000));
        assert_eq!(summary.status, CashStatus::Short);

        let err = store
            .reconcile_route(
                date(11),
                "ROUTE_UTHUKOTAI",
                "VH_2259",
                expected,
                actual,
                Vec::new(),
            )
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input: route ROUTE_UTHUKOTAI already reconciled for 2024-03-11"
        );

        // The stored record still reflects the first submission
        let recs = store.route_reconciliations(date(11)).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].expenses_total(), rupees(4_000));
    }

    #[test]
    fn test_dashboard_kpis_aggregate_day() {
        let store = DayStore::with_default_catalog();
        store.open_day(date(11)).unwrap();

        store.seed_opening(date(11), "SF_30KG", 50).unwrap();
        store.record_office_sales(date(11), "SF_30KG", 22).unwrap();
        store.record_closing_count(date(11), "SF_30KG", 27).unwrap();

        store
            .reconcile_route(
                date(11),
                "ROUTE_UTHUKOTAI",
                "VH_2259",
                ExpectedBreakdown {
                    cash: rupees(120_000),
                    cheque: rupees(15_000),
                    online: rupees(8_000),
                    discount: rupees(2_000),
                },
                ActualBreakdown {
                    cash: rupees(118_000),
                    cheque: rupees(15_000),
                    online: rupees(8_000),
                },
                vec![expense(4_000)],
            )
            .unwrap();
        store
            .reconcile_route(
                date(11),
                "ROUTE_KALPAKKAM",
                "VH_4080",
                ExpectedBreakdown {
                    cash: rupees(95_000),
                    cheque: rupees(8_000),
                    online: rupees(3_000),
                    discount: rupees(1_200),
                },
                ActualBreakdown {
                    cash: rupees(96_000),
                    cheque: rupees(8_000),
                    online: rupees(3_000),
                },
                Vec::new(),
            )
            .unwrap();

        let kpis = store.dashboard_kpis(date(11)).unwrap();
        assert_eq!(kpis.total_sales, rupees(85_800));
        assert_eq!(kpis.total_cash, rupees(214_000));
        assert_eq!(kpis.total_cheque, rupees(23_000));
        assert_eq!(kpis.total_online, rupees(11_000));
        assert_eq!(kpis.total_discounts, rupees(3_200));
        assert_eq!(kpis.total_expenses, rupees(4_000));
        assert_eq!(kpis.net_cash, rupees(210_000));
        assert_eq!(kpis.cash_over_short, rupees(-5_000));
        // 27 counted vs 28 calculated
        assert_eq!(kpis.stock_discrepancy_count, 1);
    }

    #[test]
    fn test_report_texts_render() {
        let store = DayStore::with_default_catalog();
        store.open_day(date(11)).unwrap();
        store.seed_opening(date(11), "SF_30KG", 50).unwrap();
        store.record_office_sales(date(11), "SF_30KG", 22).unwrap();

        let summary = store.daily_summary_text(date(11)).unwrap();
        assert!(summary.starts_with("🛢️ Daily Summary - 11/03/2024"));
        assert!(summary.contains("Total Sales: ₹85,800"));
        assert!(summary.contains("• Sunflower 30kg: 22 units"));
        assert!(summary.ends_with("#OilBusiness #DailySummary"));

        let pricing = store.pricing_update_text(date(11)).unwrap();
        assert!(pricing.starts_with("🛢️ Price Update - 11/03/2024"));
        assert!(pricing.contains("SUNFLOWER\n• 30kg Can - ₹3,900"));
        assert!(pricing.contains("PALMSTAR\n• 30kg Can - ₹2,850"));
        assert!(pricing.contains("LAMP OIL\n• 5L - ₹405"));
        assert!(pricing.ends_with("#PriceUpdate #OilRates"));
    }

    #[test]
    fn test_exceptions_surface_open_routes() {
        let store = DayStore::with_default_catalog();
        store.open_day(date(11)).unwrap();
        store.seed_opening(date(11), "SF_30KG", 50).unwrap();
        store
            .add_dispatch(
                date(11),
                "ROUTE_ECR",
                "VH_5149",
                vec![line("SF_30KG", 10)],
            )
            .unwrap();

        let records = store.exceptions(date(11)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "day_not_closed:ROUTE_ECR");
    }
}
