//! # Business Day
//!
//! One calendar date's complete ledger state: prices, stock, dispatches,
//! reconciliations, and vehicle returns. A day is created either from
//! nothing (seed rates, zero stock) or from the latest prior day, carrying
//! its prices and closing balances forward.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use oildepot_core::{
    Catalog, CashReconciliation, DispatchRegistry, LedgerResult, PriceCatalog, StockLedger,
};

/// A single date's records.
///
/// ## Invariants
/// - `reconciliations` holds at most one record per route, and a stored
///   record is never replaced
/// - `returns` maps vehicle id to returned units, set semantics
#[derive(Debug, Clone)]
pub struct BusinessDay {
    pub date: NaiveDate,
    pub prices: PriceCatalog,
    pub stock: StockLedger,
    pub dispatch: DispatchRegistry,
    pub reconciliations: BTreeMap<String, CashReconciliation>,
    pub returns: BTreeMap<String, i64>,
}

impl BusinessDay {
    /// The very first day: default category rates, zero stock everywhere.
    pub fn first(catalog: &Catalog, date: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            date,
            prices: PriceCatalog::seed_rates(catalog, date, now),
            stock: StockLedger::for_catalog(catalog),
            dispatch: DispatchRegistry::new(),
            reconciliations: BTreeMap::new(),
            returns: BTreeMap::new(),
        }
    }

    /// A day that continues from `prior`: prices carried as-is, each
    /// product's opening stock set to the prior day's balance.
    ///
    /// A negative prior balance opens at zero; the shortfall stays on the
    /// prior day as an exception rather than becoming negative stock.
    pub fn following(catalog: &Catalog, date: NaiveDate, prior: &BusinessDay) -> LedgerResult<Self> {
        let mut stock = StockLedger::for_catalog(catalog);
        for product in catalog.active_products() {
            if let Some(entry) = prior.stock.entry(&product.id) {
                let opening = entry.balance().max(0);
                if opening > 0 {
                    stock.seed_opening(&product.id, opening)?;
                }
            }
        }

        Ok(Self {
            date,
            prices: prior.prices.carried_forward(date),
            stock,
            dispatch: DispatchRegistry::new(),
            reconciliations: BTreeMap::new(),
            returns: BTreeMap::new(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn test_first_day_seeds_rates_and_zero_stock() {
        let catalog = Catalog::with_defaults();
        let day = BusinessDay::first(&catalog, date(11), Utc::now());

        let snapshot = day.stock.snapshot(&catalog, &day.prices, "SF_30KG").unwrap();
        assert_eq!(snapshot.opening, 0);
        assert_eq!(snapshot.unit_price.rupees(), 3_900);
        assert!(day.dispatch.entries().is_empty());
        assert!(day.reconciliations.is_empty());
    }

    #[test]
    fn test_following_day_carries_balances_and_prices() {
        let catalog = Catalog::with_defaults();
        let mut first = BusinessDay::first(&catalog, date(11), Utc::now());
        first.stock.seed_opening("SF_30KG", 50).unwrap();
        first.stock.set_office_sales("SF_30KG", 10).unwrap();
        first
            .prices
            .update_price(&catalog, "SF_30KG", 132.0, 30.0, Utc::now())
            .unwrap();

        let next = BusinessDay::following(&catalog, date(12), &first).unwrap();

        // Opening = prior closing - dispatch = 40
        let snapshot = next.stock.snapshot(&catalog, &next.prices, "SF_30KG").unwrap();
        assert_eq!(snapshot.opening, 40);
        assert_eq!(snapshot.sales_office, 0);

        // Updated price survives the day boundary, original stamp intact
        assert_eq!(snapshot.unit_price.rupees(), 3_960);
        let record = next.prices.record("SF_30KG").unwrap();
        assert_eq!(record.effective_date, date(11));
    }

    #[test]
    fn test_following_day_clamps_negative_balance() {
        let catalog = Catalog::with_defaults();
        let mut first = BusinessDay::first(&catalog, date(11), Utc::now());
        first.stock.seed_opening("SF_1L", 10).unwrap();
        first.stock.set_office_sales("SF_1L", 15).unwrap();
        assert_eq!(first.stock.balance("SF_1L").unwrap(), -5);

        let next = BusinessDay::following(&catalog, date(12), &first).unwrap();
        let snapshot = next.stock.snapshot(&catalog, &next.prices, "SF_1L").unwrap();
        assert_eq!(snapshot.opening, 0);
    }
}
