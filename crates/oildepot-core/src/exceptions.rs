//! # Exception Scan
//!
//! Day-end anomaly detection over the assembled day: stock snapshots, the
//! dispatch registry, and stored reconciliations. The scan is pure and
//! deterministic; running it twice over the same day yields identical
//! records in identical order.
//!
//! ## Checks
//! | Kind            | Severity | Fires when                                       |
//! |-----------------|----------|--------------------------------------------------|
//! | `stock_variance`| high     | balance < 0, or physical count ≠ book closing    |
//! | `route_mismatch`| medium   | reconciled collections differ from expected      |
//! | `high_discount` | medium   | discount above 5% of a route's gross sales       |
//! | `day_not_closed`| low      | route dispatched but never reconciled            |
//!
//! Records are emitted kind by kind in the order above, products and routes
//! in catalog order within a kind.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::Catalog;
use crate::dispatch::DispatchRegistry;
use crate::reconcile::CashReconciliation;
use crate::stock::StockSnapshot;

/// Discount share of gross sales above which a route is flagged.
pub const HIGH_DISCOUNT_PERCENT: i64 = 5;

// =============================================================================
// Exception Records
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ExceptionKind {
    StockVariance,
    RouteMismatch,
    HighDiscount,
    DayNotClosed,
}

impl ExceptionKind {
    pub fn severity(&self) -> Severity {
        match self {
            ExceptionKind::StockVariance => Severity::High,
            ExceptionKind::RouteMismatch | ExceptionKind::HighDiscount => Severity::Medium,
            ExceptionKind::DayNotClosed => Severity::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// One flagged anomaly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionRecord {
    /// Stable identifier, `{kind}:{subject id}`. The two stock variance
    /// checks suffix their subject with `:balance` or `:count`, keeping
    /// ids distinct when one product trips both.
    pub id: String,
    pub kind: ExceptionKind,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    /// Preformatted figure for display, when the anomaly has one.
    pub value: Option<String>,
}

impl ExceptionRecord {
    fn new(
        kind: ExceptionKind,
        subject: &str,
        title: impl Into<String>,
        description: String,
        value: Option<String>,
    ) -> Self {
        let key = match kind {
            ExceptionKind::StockVariance => "stock_variance",
            ExceptionKind::RouteMismatch => "route_mismatch",
            ExceptionKind::HighDiscount => "high_discount",
            ExceptionKind::DayNotClosed => "day_not_closed",
        };
        Self {
            id: format!("{key}:{subject}"),
            kind,
            severity: kind.severity(),
            title: title.into(),
            description,
            value,
        }
    }
}

// =============================================================================
// Scan
// =============================================================================

/// Scans an assembled day for anomalies.
///
/// `snapshots` is taken in the order given; `StockLedger::snapshots` already
/// yields catalog order. Routes are visited in catalog order.
pub fn scan(
    catalog: &Catalog,
    snapshots: &[StockSnapshot],
    registry: &DispatchRegistry,
    reconciliations: &[CashReconciliation],
) -> Vec<ExceptionRecord> {
    let mut records = Vec::new();

    for snapshot in snapshots {
        if snapshot.balance < 0 {
            records.push(ExceptionRecord::new(
                ExceptionKind::StockVariance,
                &format!("{}:balance", snapshot.product_id),
                "Negative balance",
                format!(
                    "{} has sold or dispatched more than the available stock",
                    snapshot.product_name
                ),
                Some(format!("{} units", snapshot.balance)),
            ));
        }
        if let Some(variance) = snapshot.variance {
            if variance != 0 {
                records.push(ExceptionRecord::new(
                    ExceptionKind::StockVariance,
                    &format!("{}:count", snapshot.product_id),
                    "Stock count variance",
                    format!(
                        "{} physical count differs from the calculated closing",
                        snapshot.product_name
                    ),
                    Some(format!("{variance} units")),
                ));
            }
        }
    }

    for route in catalog.routes() {
        let Some(rec) = reconciliations.iter().find(|r| r.route_id == route.id) else {
            continue;
        };
        if !rec.route_delta().is_zero() {
            records.push(ExceptionRecord::new(
                ExceptionKind::RouteMismatch,
                &route.id,
                "Collection mismatch",
                format!("{} actual collections differ from expected", route.name),
                Some(rec.route_delta().to_string()),
            ));
        }
    }

    for route in catalog.routes() {
        let Some(rec) = reconciliations.iter().find(|r| r.route_id == route.id) else {
            continue;
        };
        let discount = rec.expected.discount.rupees();
        let gross = rec.expected.gross_sales().rupees();
        if discount * 100 > gross * HIGH_DISCOUNT_PERCENT {
            records.push(ExceptionRecord::new(
                ExceptionKind::HighDiscount,
                &route.id,
                "High discount",
                format!(
                    "{} discount exceeds {HIGH_DISCOUNT_PERCENT}% of gross sales",
                    route.name
                ),
                Some(rec.expected.discount.to_string()),
            ));
        }
    }

    for route in catalog.routes() {
        let dispatched = registry.entries().iter().any(|e| e.route_id == route.id);
        let reconciled = reconciliations.iter().any(|r| r.route_id == route.id);
        if dispatched && !reconciled {
            records.push(ExceptionRecord::new(
                ExceptionKind::DayNotClosed,
                &route.id,
                "Route not reconciled",
                format!("{} has dispatches but no cash reconciliation", route.name),
                None,
            ));
        }
    }

    records
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DispatchLine;
    use crate::money::Rupee;
    use crate::price::PriceCatalog;
    use crate::reconcile::{ActualBreakdown, ExpectedBreakdown};
    use crate::stock::StockLedger;
    use chrono::{NaiveDate, Utc};

    fn rupees(amount: i64) -> Rupee {
        Rupee::from_rupees(amount)
    }

    fn prices(catalog: &Catalog) -> PriceCatalog {
        let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        PriceCatalog::seed_rates(catalog, date, Utc::now())
    }

    fn reconciliation(
        route_id: &str,
        vehicle_id: &str,
        expected: ExpectedBreakdown,
        actual: ActualBreakdown,
    ) -> CashReconciliation {
        CashReconciliation::new(route_id, vehicle_id, expected, actual, Vec::new())
    }

    #[test]
    fn test_clean_day_has_no_exceptions() {
        let catalog = Catalog::with_defaults();
        let prices = prices(&catalog);
        let mut ledger = StockLedger::for_catalog(&catalog);
        ledger.seed_opening("SF_30KG", 50).unwrap();
        ledger.set_office_sales("SF_30KG", 10).unwrap();

        let snapshots = ledger.snapshots(&catalog, &prices).unwrap();
        let registry = DispatchRegistry::new();

        let records = scan(&catalog, &snapshots, &registry, &[]);
        assert!(records.is_empty());
    }

    #[test]
    fn test_full_day_scan_order() {
        let catalog = Catalog::with_defaults();
        let prices = prices(&catalog);
        let mut ledger = StockLedger::for_catalog(&catalog);

        // SF_30KG oversold: closing 10 - 15 = -5
        ledger.seed_opening("SF_30KG", 10).unwrap();
        ledger.set_office_sales("SF_30KG", 15).unwrap();

        // SF_5L counted two units short
        ledger.seed_opening("SF_5L", 60).unwrap();
        ledger.set_closing_count("SF_5L", 58).unwrap();

        // Dispatches on two routes
        ledger.seed_opening("SF_15L", 10).unwrap();
        ledger.seed_opening("PS_5L", 10).unwrap();
        let mut registry = DispatchRegistry::new();
        registry
            .add_entry(
                &catalog,
                &mut ledger,
                "ROUTE_UTHUKOTAI",
                "VH_2259",
                vec![DispatchLine {
                    product_id: "SF_15L".to_string(),
                    quantity: 5,
                }],
            )
            .unwrap();
        registry
            .add_entry(
                &catalog,
                &mut ledger,
                "ROUTE_ECR",
                "VH_5149",
                vec![DispatchLine {
                    product_id: "PS_5L".to_string(),
                    quantity: 3,
                }],
            )
            .unwrap();

        // Uthukota reconciled with a +1000 delta and a 10% discount;
        // ECR left open.
        let recs = vec![reconciliation(
            "ROUTE_UTHUKOTAI",
            "VH_2259",
            ExpectedBreakdown {
                cash: rupees(9_000),
                cheque: Rupee::zero(),
                online: Rupee::zero(),
                discount: rupees(1_000),
            },
            ActualBreakdown {
                cash: rupees(10_000),
                cheque: Rupee::zero(),
                online: Rupee::zero(),
            },
        )];

        let snapshots = ledger.snapshots(&catalog, &prices).unwrap();
        let records = scan(&catalog, &snapshots, &registry, &recs);

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "stock_variance:SF_30KG:balance",
                "stock_variance:SF_5L:count",
                "route_mismatch:ROUTE_UTHUKOTAI",
                "high_discount:ROUTE_UTHUKOTAI",
                "day_not_closed:ROUTE_ECR",
            ]
        );

        assert_eq!(records[0].severity, Severity::High);
        assert_eq!(records[0].value.as_deref(), Some("-5 units"));
        assert_eq!(records[1].value.as_deref(), Some("-2 units"));
        assert_eq!(records[2].severity, Severity::Medium);
        assert_eq!(records[2].value.as_deref(), Some("₹1,000"));
        assert_eq!(records[3].value.as_deref(), Some("₹1,000"));
        assert_eq!(records[4].severity, Severity::Low);
        assert_eq!(records[4].value, None);

        // Determinism: a second scan is identical
        let again = scan(&catalog, &snapshots, &registry, &recs);
        assert_eq!(records, again);
    }

    #[test]
    fn test_variance_checks_keep_distinct_ids() {
        let catalog = Catalog::with_defaults();
        let prices = prices(&catalog);
        let mut ledger = StockLedger::for_catalog(&catalog);

        // Oversold and miscounted at once: closing 10 - 15 = -5, counted 0
        ledger.seed_opening("SF_30KG", 10).unwrap();
        ledger.set_office_sales("SF_30KG", 15).unwrap();
        ledger.set_closing_count("SF_30KG", 0).unwrap();

        let snapshots = ledger.snapshots(&catalog, &prices).unwrap();
        let records = scan(&catalog, &snapshots, &DispatchRegistry::new(), &[]);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "stock_variance:SF_30KG:balance");
        assert_eq!(records[1].id, "stock_variance:SF_30KG:count");
        assert_eq!(records[0].value.as_deref(), Some("-5 units"));
        assert_eq!(records[1].value.as_deref(), Some("5 units"));
    }

    #[test]
    fn test_high_discount_boundary() {
        let catalog = Catalog::with_defaults();

        // Exactly 5% of gross (500 of 10000): not flagged
        let at_limit = reconciliation(
            "ROUTE_PONNERI",
            "VH_3083",
            ExpectedBreakdown {
                cash: rupees(9_500),
                cheque: Rupee::zero(),
                online: Rupee::zero(),
                discount: rupees(500),
            },
            ActualBreakdown {
                cash: rupees(9_500),
                cheque: Rupee::zero(),
                online: Rupee::zero(),
            },
        );
        let records = scan(&catalog, &[], &DispatchRegistry::new(), &[at_limit]);
        assert!(records.is_empty());

        // 501 of 10001: flagged
        let over_limit = reconciliation(
            "ROUTE_PONNERI",
            "VH_3083",
            ExpectedBreakdown {
                cash: rupees(9_500),
                cheque: Rupee::zero(),
                online: Rupee::zero(),
                discount: rupees(501),
            },
            ActualBreakdown {
                cash: rupees(9_500),
                cheque: Rupee::zero(),
                online: Rupee::zero(),
            },
        );
        let records = scan(&catalog, &[], &DispatchRegistry::new(), &[over_limit]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, ExceptionKind::HighDiscount);
        assert_eq!(records[0].value.as_deref(), Some("₹501"));
    }

    #[test]
    fn test_day_not_closed_requires_dispatch() {
        let catalog = Catalog::with_defaults();
        // No dispatches anywhere: an unreconciled route is not flagged
        let records = scan(&catalog, &[], &DispatchRegistry::new(), &[]);
        assert!(records.is_empty());
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ExceptionKind::DayNotClosed).unwrap();
        assert_eq!(json, "\"day_not_closed\"");
        let json = serde_json::to_string(&Severity::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }
}
