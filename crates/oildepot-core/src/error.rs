//! # Error Types
//!
//! Domain-specific error types for oildepot-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  oildepot-core errors (this file)                                       │
//! │  └── LedgerError      - All ledger/reconciliation failures              │
//! │                                                                         │
//! │  oildepot-store (separate crate)                                        │
//! │  └── reuses LedgerError - the store adds no foreign failure sources     │
//! │                                                                         │
//! │  UI layer (external)                                                    │
//! │  └── maps ErrorKind 1:1 to user-facing messages (serialized)            │
//! │                                                                         │
//! │  Flow: validation → LedgerError → ErrorKind + message → Frontend        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, available vs requested)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to exactly one user-facing kind

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Ledger Error
// =============================================================================

/// Ledger and reconciliation errors.
///
/// Every failure the engine can produce falls into one of four kinds
/// (see [`ErrorKind`]). Mutating operations fail atomically: when an
/// operation returns an error, prior state is untouched.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Input rejected before any state change.
    ///
    /// ## When This Occurs
    /// - Negative quantity where a non-negative one is required
    /// - Zero/negative rate or conversion factor on a price update
    /// - Dispatch entry with no positive product quantities
    /// - Write against a route-day already marked reconciled
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Referenced entity is not part of the catalog or store.
    ///
    /// ## When This Occurs
    /// - Product/route/vehicle id outside the catalog's closed set
    /// - Product exists but is inactive (price lookups)
    /// - Business day never opened in the store
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Dispatch would drive a product's balance negative.
    ///
    /// ## When This Occurs
    /// - A dispatch line requests more units than the product's current
    ///   balance (closing minus already-dispatched)
    ///
    /// ## User Workflow
    /// ```text
    /// Dispatch entry (SF_5L, qty: 8)
    ///      │
    ///      ▼
    /// Check balance: available=5
    ///      │
    ///      ▼
    /// InsufficientBalance { product_id: "SF_5L", available: 5, requested: 8 }
    ///      │
    ///      ▼
    /// UI shows: "Only 5 units of SF_5L available"
    /// ```
    #[error("Insufficient balance for {product_id}: available {available}, requested {requested}")]
    InsufficientBalance {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// An aggregation invariant failed.
    ///
    /// Indicates a programming defect (e.g. grid row totals disagreeing
    /// with column totals), not bad user input. Callers should log it and
    /// treat the day's aggregates as suspect rather than retry.
    #[error("Inconsistent aggregate: {detail}")]
    InconsistentAggregate { detail: String },
}

impl LedgerError {
    /// Shorthand for an [`LedgerError::InvalidInput`] with a formatted reason.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Shorthand for an [`LedgerError::NotFound`] for a given entity noun.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// The user-visible kind this error maps to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            Self::InconsistentAggregate { .. } => ErrorKind::InconsistentAggregate,
        }
    }
}

// =============================================================================
// Error Kind (UI contract)
// =============================================================================

/// Machine-readable error category surfaced to the UI layer.
///
/// The UI maps each kind 1:1 to a presentation (toast, inline field error,
/// fatal banner); the human-readable detail comes from the error's Display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    InsufficientBalance,
    InconsistentAggregate,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with LedgerError.
pub type LedgerResult<T> = Result<T, LedgerError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LedgerError::InsufficientBalance {
            product_id: "SF_5L".to_string(),
            available: 5,
            requested: 8,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance for SF_5L: available 5, requested 8"
        );

        let err = LedgerError::not_found("Product", "SF_99L");
        assert_eq!(err.to_string(), "Product not found: SF_99L");

        let err = LedgerError::invalid_input("no product quantities supplied");
        assert_eq!(err.to_string(), "Invalid input: no product quantities supplied");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            LedgerError::invalid_input("x").kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            LedgerError::not_found("Route", "ROUTE_X").kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            LedgerError::InconsistentAggregate {
                detail: "grid".to_string()
            }
            .kind(),
            ErrorKind::InconsistentAggregate
        );
    }

    #[test]
    fn test_kind_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&ErrorKind::InsufficientBalance).unwrap();
        assert_eq!(json, "\"INSUFFICIENT_BALANCE\"");
    }
}
