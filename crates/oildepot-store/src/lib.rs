//! # oildepot-store: Day State Layer for the Oil Depot Ledger
//!
//! This crate owns the mutable state of the depot: one [`BusinessDay`] per
//! calendar date, held in a thread-safe [`DayStore`]. Every mutation and
//! read the UI performs goes through the store; all arithmetic stays in
//! `oildepot-core`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Oil Depot Data Flow                               │
//! │                                                                         │
//! │  UI Command (record_receipts, add_dispatch, reconcile_route, ...)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  oildepot-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐         ┌─────────────────────────────┐   │   │
//! │  │   │   DayStore    │         │       BusinessDay           │   │   │
//! │  │   │  (store.rs)   │         │        (day.rs)             │   │   │
//! │  │   │               │         │                             │   │   │
//! │  │   │ Catalog       │  owns   │ StockLedger                 │   │   │
//! │  │   │ Mutex arena  ─┼────────►│ PriceCatalog                │   │   │
//! │  │   │ per date      │         │ DispatchRegistry            │   │   │
//! │  │   │               │         │ reconciliations, returns    │   │   │
//! │  │   └───────────────┘         └─────────────────────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  oildepot-core (pure derivations: snapshots, reconcile, reports)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`day`] - One business day's state and the day-to-day carry rules
//! - [`store`] - The date-keyed arena and its operation surface
//!
//! ## Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use oildepot_store::DayStore;
//!
//! # fn main() -> Result<(), oildepot_core::LedgerError> {
//! let store = DayStore::with_default_catalog();
//! let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
//!
//! store.open_day(date)?;
//! store.record_receipts(date, "SF_30KG", 60)?;
//! store.record_office_sales(date, "SF_30KG", 22)?;
//!
//! let snapshot = store.snapshot(date, "SF_30KG")?;
//! assert_eq!(snapshot.closing, 38);
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod day;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use day::BusinessDay;
pub use store::DayStore;
