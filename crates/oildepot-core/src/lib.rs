//! # oildepot-core: Pure Business Logic for the Oil Depot Ledger
//!
//! This crate is the **heart** of the depot ledger. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Oil Depot Ledger Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Operator UI / Report Sharing (external)              │   │
//! │  │    stock entry ──► dispatch log ──► accounts ──► reports        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 oildepot-store (Day Arena)                      │   │
//! │  │    open_day, record_*, add_dispatch, reconcile_route, reads     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ oildepot-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │   stock   │  │ dispatch  │  │ reconcile │  │   │
//! │  │   │   price   │  │  ledger   │  │ registry  │  │  engine   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                 │   │
//! │  │   │   money   │  │  report   │  │exceptions │                 │   │
//! │  │   │   Rupee   │  │  builders │  │   scan    │                 │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Reference data (products, routes, vehicles) and the
//!   built-in depot dataset
//! - [`money`] - Rupee type with integer arithmetic (no floating point!)
//! - [`price`] - Per-kg base rates, unit price derivation, price history
//! - [`stock`] - The daily stock ledger and its derived snapshot
//! - [`dispatch`] - Append-only dispatch entries and their aggregations
//! - [`reconcile`] - Expected-vs-actual cash reconciliation per route
//! - [`exceptions`] - Day-end anomaly scan
//! - [`report`] - Dashboard KPIs, route performance, shareable text reports
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every derivation is deterministic - same input =
//!    same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are whole rupees (i64); no
//!    paise, no floats past the price boundary
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{NaiveDate, Utc};
//! use oildepot_core::catalog::Catalog;
//! use oildepot_core::price::PriceCatalog;
//! use oildepot_core::stock::StockLedger;
//!
//! let catalog = Catalog::with_defaults();
//! let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
//! let prices = PriceCatalog::seed_rates(&catalog, date, Utc::now());
//!
//! // A day in the life of one product
//! let mut ledger = StockLedger::for_catalog(&catalog);
//! ledger.seed_opening("SF_30KG", 50).unwrap();
//! ledger.set_receipts("SF_30KG", 10).unwrap();
//! ledger.set_office_sales("SF_30KG", 15).unwrap();
//! ledger.set_vehicle_sales("SF_30KG", "VH_2259", 7).unwrap();
//!
//! let snapshot = ledger.snapshot(&catalog, &prices, "SF_30KG").unwrap();
//! assert_eq!(snapshot.closing, 38);
//! assert_eq!(snapshot.revenue.rupees(), 85_800); // 22 units × ₹3,900
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod dispatch;
pub mod error;
pub mod exceptions;
pub mod money;
pub mod price;
pub mod reconcile;
pub mod report;
pub mod stock;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use oildepot_core::Rupee` instead of
// `use oildepot_core::money::Rupee`

pub use catalog::{Catalog, Product, ProductCategory, Route, Vehicle};
pub use dispatch::{
    DispatchEntry, DispatchGrid, DispatchLine, DispatchRegistry, GridRow, RouteDispatchSummary,
    RouteProductTotal,
};
pub use error::{ErrorKind, LedgerError, LedgerResult};
pub use exceptions::{ExceptionKind, ExceptionRecord, Severity};
pub use money::Rupee;
pub use price::{PriceCatalog, PriceRecord};
pub use reconcile::{
    ActualBreakdown, CashReconciliation, CashStatus, CashTotals, ExpectedBreakdown, ExpenseEntry,
    ExpenseType, RouteCashSummary,
};
pub use report::{DashboardKpis, PriceLine, RoutePerformance};
pub use stock::{StockLedger, StockSnapshot};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Discount share of gross sales above which the exception scan flags a
/// route, in percent.
pub use exceptions::HIGH_DISCOUNT_PERCENT;

/// Number of products the daily summary's top list shows.
pub use report::TOP_PRODUCT_COUNT;
