//! # Cash Reconciliation Engine
//!
//! Pure arithmetic over a route's expected and actual cash flows. Nothing in
//! this module mutates state or fails on well-typed input; callers validate
//! identifiers before building the records handed in here.
//!
//! ## Reconciliation Arithmetic
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                  Route Cash Reconciliation                       │
//! │                                                                  │
//! │  expected (from sales entry)        actual (counted at depot)    │
//! │  cash, cheque, online, discount     cash, cheque, online         │
//! │          │                                  │                    │
//! │          ▼                                  ▼                    │
//! │  expectedCashFromSales              netCashInHand                │
//! │  = cash + cheque + online           = actual.cash                │
//! │    + discount                         − Σ expenses               │
//! │    − actual.cheque                          │                    │
//! │    − actual.online                          │                    │
//! │    − discount                               │                    │
//! │          │                                  │                    │
//! │          └──────────────┬───────────────────┘                    │
//! │                         ▼                                        │
//! │        cashOverShort = netCashInHand − expectedCashFromSales     │
//! │                                                                  │
//! │        = 0 → BALANCED      > 0 → OVER      < 0 → SHORT           │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Aggregation across routes sums the per-route variance rather than
//! re-deriving it from summed totals, so the dashboard figure is additive
//! over routes by construction.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Rupee;

// =============================================================================
// Breakdowns
// =============================================================================

/// Collections a route's sales entries say should have come in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedBreakdown {
    pub cash: Rupee,
    pub cheque: Rupee,
    pub online: Rupee,
    pub discount: Rupee,
}

impl ExpectedBreakdown {
    /// Collectable total: cash + cheque + online, discount excluded.
    pub fn total(&self) -> Rupee {
        self.cash + self.cheque + self.online
    }

    /// Sales value before the discount was given away.
    pub fn gross_sales(&self) -> Rupee {
        self.total() + self.discount
    }
}

/// Collections actually counted when the vehicle returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ActualBreakdown {
    pub cash: Rupee,
    pub cheque: Rupee,
    pub online: Rupee,
}

impl ActualBreakdown {
    pub fn total(&self) -> Rupee {
        self.cash + self.cheque + self.online
    }
}

// =============================================================================
// Expenses
// =============================================================================

/// What a route expense was spent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseType {
    Diesel,
    Toll,
    Parking,
    Other,
}

/// One cash outlay paid from the vehicle's takings during the route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseEntry {
    pub expense_type: ExpenseType,
    pub amount: Rupee,
    pub notes: Option<String>,
}

fn expenses_total(expenses: &[ExpenseEntry]) -> Rupee {
    expenses.iter().map(|e| e.amount).sum()
}

// =============================================================================
// Reconciliation Result
// =============================================================================

/// Which side of zero the cash variance landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CashStatus {
    Balanced,
    Over,
    Short,
}

impl CashStatus {
    pub fn from_delta(delta: Rupee) -> Self {
        if delta.is_zero() {
            CashStatus::Balanced
        } else if delta.is_positive() {
            CashStatus::Over
        } else {
            CashStatus::Short
        }
    }
}

/// The computed outcome of reconciling one route's cash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RouteCashSummary {
    pub net_cash_in_hand: Rupee,
    pub expected_cash_from_sales: Rupee,
    pub cash_over_short: Rupee,
    pub status: CashStatus,
}

/// Reconciles one route's day.
///
/// ## Rules
/// - `netCashInHand = actual.cash − Σ expenses`
/// - `expectedCashFromSales = (expected.cash + expected.cheque +
///   expected.online + expected.discount) − actual.cheque − actual.online −
///   expected.discount`
/// - `cashOverShort = netCashInHand − expectedCashFromSales`
///
/// Never fails; an all-zero input reconciles to a balanced zero.
pub fn reconcile_route(
    expected: &ExpectedBreakdown,
    actual: &ActualBreakdown,
    expenses: &[ExpenseEntry],
) -> RouteCashSummary {
    let net_cash_in_hand = actual.cash - expenses_total(expenses);
    let expected_cash_from_sales =
        expected.gross_sales() - actual.cheque - actual.online - expected.discount;
    let cash_over_short = net_cash_in_hand - expected_cash_from_sales;

    RouteCashSummary {
        net_cash_in_hand,
        expected_cash_from_sales,
        cash_over_short,
        status: CashStatus::from_delta(cash_over_short),
    }
}

// =============================================================================
// Reconciliation Record
// =============================================================================

/// A route's reconciled day. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CashReconciliation {
    pub route_id: String,
    pub vehicle_id: String,
    pub expected: ExpectedBreakdown,
    pub actual: ActualBreakdown,
    pub expenses: Vec<ExpenseEntry>,
    pub summary: RouteCashSummary,
}

impl CashReconciliation {
    pub fn new(
        route_id: impl Into<String>,
        vehicle_id: impl Into<String>,
        expected: ExpectedBreakdown,
        actual: ActualBreakdown,
        expenses: Vec<ExpenseEntry>,
    ) -> Self {
        let summary = reconcile_route(&expected, &actual, &expenses);
        Self {
            route_id: route_id.into(),
            vehicle_id: vehicle_id.into(),
            expected,
            actual,
            expenses,
            summary,
        }
    }

    pub fn expected_total(&self) -> Rupee {
        self.expected.total()
    }

    pub fn actual_total(&self) -> Rupee {
        self.actual.total()
    }

    /// Signed collection mismatch: actual total minus expected total.
    pub fn route_delta(&self) -> Rupee {
        self.actual_total() - self.expected_total()
    }

    pub fn expenses_total(&self) -> Rupee {
        expenses_total(&self.expenses)
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Day-level cash figures summed across reconciled routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CashTotals {
    /// Σ actual cash counted.
    pub cash: Rupee,
    /// Σ actual cheques received.
    pub cheque: Rupee,
    /// Σ actual online payments received.
    pub online: Rupee,
    /// Σ discounts granted (expected side).
    pub discounts: Rupee,
    /// Σ route expenses.
    pub expenses: Rupee,
    /// Cash minus expenses.
    pub net_cash: Rupee,
    /// Σ per-route cashOverShort.
    pub cash_over_short: Rupee,
}

impl CashTotals {
    pub fn status(&self) -> CashStatus {
        CashStatus::from_delta(self.cash_over_short)
    }
}

/// Sums reconciliations into day totals.
///
/// `cash_over_short` is the sum of the per-route variances, not a
/// re-derivation from the summed breakdowns, keeping the dashboard figure
/// additive over routes.
pub fn aggregate(reconciliations: &[CashReconciliation]) -> CashTotals {
    let mut totals = CashTotals::default();
    for rec in reconciliations {
        totals.cash += rec.actual.cash;
        totals.cheque += rec.actual.cheque;
        totals.online += rec.actual.online;
        totals.discounts += rec.expected.discount;
        totals.expenses += rec.expenses_total();
        totals.cash_over_short += rec.summary.cash_over_short;
    }
    totals.net_cash = totals.cash - totals.expenses;
    totals
}

// =============================================================================
// Unit Tests
// =============================================================================
