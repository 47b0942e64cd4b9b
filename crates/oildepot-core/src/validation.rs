//! # Validation Module
//!
//! Input validation utilities for the Oildepot ledger.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI layer (external)                                           │
//! │  ├── Basic format checks (empty fields, numerics)                       │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Store operation (oildepot-store)                              │
//! │  ├── Catalog membership (product/route/vehicle ids)                     │
//! │  └── Day lifecycle (open, reconciled)                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Component operation (this crate)                              │
//! │  ├── THIS MODULE: quantity/rate/id rules                                │
//! │  └── Balance checks (StockLedger, DispatchRegistry)                     │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use oildepot_core::validation::{validate_set_quantity, validate_dispatch_quantity};
//!
//! // Replace-semantics slots accept zero
//! validate_set_quantity("receipts", 0).unwrap();
//!
//! // Dispatch lines must be strictly positive
//! assert!(validate_dispatch_quantity(0).is_err());
//! ```

use crate::error::{LedgerError, LedgerResult};

// =============================================================================
// Quantity Validators
// =============================================================================

/// Validates a quantity for a replace-semantics slot
/// (receipts, office sales, vehicle sales, closing count, returns, opening).
///
/// ## Rules
/// - Must be non-negative (>= 0); zero clears the slot for the day
pub fn validate_set_quantity(field: &str, qty: i64) -> LedgerResult<()> {
    if qty < 0 {
        return Err(LedgerError::invalid_input(format!(
            "{field} must be non-negative (got {qty})"
        )));
    }

    Ok(())
}

/// Validates a dispatch line quantity.
///
/// ## Rules
/// - Must be strictly positive (> 0); dispatch accumulates, so a zero
///   line carries no information and a negative one would un-dispatch
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Dispatch Log: Add Entry                                                │
/// │                                                                         │
/// │  Operator enters quantity: 8                                            │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_dispatch_quantity(8) ← THIS FUNCTION                          │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "dispatch quantity must be positive"       │
/// │       │                                                                 │
/// │       └── OK → balance check → apply to ledger                          │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_dispatch_quantity(qty: i64) -> LedgerResult<()> {
    if qty <= 0 {
        return Err(LedgerError::invalid_input(format!(
            "dispatch quantity must be positive (got {qty})"
        )));
    }

    Ok(())
}

// =============================================================================
// Price Validators
// =============================================================================

/// Validates a price component (base rate per kg or conversion factor).
///
/// ## Rules
/// - Must be finite and strictly positive
///
/// ## Example
/// ```rust
/// use oildepot_core::validation::validate_rate;
///
/// assert!(validate_rate("baseRatePerKg", 130.0).is_ok());
/// assert!(validate_rate("baseRatePerKg", 0.0).is_err());
/// assert!(validate_rate("conversionFactor", -13.6).is_err());
/// ```
pub fn validate_rate(field: &str, value: f64) -> LedgerResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(LedgerError::invalid_input(format!(
            "{field} must be a positive number (got {value})"
        )));
    }

    Ok(())
}

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a catalog identifier (product, route, or vehicle id).
///
/// ## Rules
/// - Must not be empty
/// - Only letters, numbers, hyphens, and underscores
///
/// ## Example
/// ```rust
/// use oildepot_core::validation::validate_catalog_id;
///
/// assert!(validate_catalog_id("productId", "SF_30KG").is_ok());
/// assert!(validate_catalog_id("routeId", "").is_err());
/// assert!(validate_catalog_id("vehicleId", "VH 2259").is_err());
/// ```
pub fn validate_catalog_id(field: &str, id: &str) -> LedgerResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(LedgerError::invalid_input(format!("{field} must not be empty")));
    }

    if !id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(LedgerError::invalid_input(format!(
            "{field} '{id}' is malformed: only letters, numbers, hyphens, and underscores are allowed"
        )));
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
