//! # Price Module
//!
//! Per-product pricing: base rate per kg, pack conversion factor, and the
//! derived unit price.
//!
//! ## Derivation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  unitPrice = baseRatePerKg × conversionFactor                           │
//! │                                                                         │
//! │  Sunflower 30kg Can:  130 ₹/kg × 30.0 kg/unit = ₹3,900                  │
//! │  Sunflower 15L Tin:   130 ₹/kg × 13.6 kg/unit = ₹1,768                  │
//! │  Palmstar 15L Tin:     95 ₹/kg × 13.6 kg/unit = ₹1,292                  │
//! │                                                                         │
//! │  The product is rounded to whole rupees at exactly one point            │
//! │  (Rupee::from_f64_rounded); unit price is never stored, always          │
//! │  re-derived from the two rate components.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Updates are last-write-wins per product; every superseded record is kept
//! in a timestamped history.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::{Catalog, ProductCategory};
use crate::error::{LedgerError, LedgerResult};
use crate::money::Rupee;
use crate::validation::validate_rate;

// =============================================================================
// Price Record
// =============================================================================

/// The price components for one product.
///
/// `conversion_factor` is snapshotted from the catalog at record time so a
/// later catalog change cannot silently reprice history.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    pub product_id: String,

    /// Selling rate in rupees per kilogram.
    pub base_rate_per_kg: f64,

    /// Kilograms per pack unit, copied at record time.
    pub conversion_factor: f64,

    /// Business date the record took effect.
    #[ts(as = "String")]
    pub effective_date: NaiveDate,

    /// Audit timestamp of the last update to this record.
    #[ts(as = "String")]
    pub last_updated: DateTime<Utc>,
}

impl PriceRecord {
    /// The derived whole-rupee unit price.
    #[inline]
    pub fn unit_price(&self) -> Rupee {
        Rupee::from_f64_rounded(self.base_rate_per_kg * self.conversion_factor)
    }
}

/// Standard selling rate per kilogram for a product family, used when a
/// business day opens with no prior pricing.
pub const fn default_rate_per_kg(category: ProductCategory) -> f64 {
    match category {
        ProductCategory::Sunflower => 130.0,
        ProductCategory::Palmstar => 95.0,
        ProductCategory::Lamp => 90.0,
    }
}

// =============================================================================
// Price Catalog
// =============================================================================

/// Current price record per product plus the history of superseded records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceCatalog {
    /// Business date updates are stamped with.
    effective_date: NaiveDate,

    /// Current record per product id.
    current: BTreeMap<String, PriceRecord>,

    /// Superseded records, oldest first.
    history: Vec<PriceRecord>,
}

impl PriceCatalog {
    /// An empty catalog for the given business date.
    pub fn new(effective_date: NaiveDate) -> Self {
        Self {
            effective_date,
            current: BTreeMap::new(),
            history: Vec::new(),
        }
    }

    /// Seeds one record per active catalog product from the per-category
    /// default rates.
    pub fn seed_rates(catalog: &Catalog, effective_date: NaiveDate, now: DateTime<Utc>) -> Self {
        let mut price_catalog = Self::new(effective_date);
        for product in catalog.active_products() {
            price_catalog.current.insert(
                product.id.clone(),
                PriceRecord {
                    product_id: product.id.clone(),
                    base_rate_per_kg: default_rate_per_kg(product.category),
                    conversion_factor: product.conversion_factor_kg_per_unit,
                    effective_date,
                    last_updated: now,
                },
            );
        }
        price_catalog
    }

    /// Clones this catalog for a new business day. Existing records keep
    /// their original effective dates; only fresh updates get stamped with
    /// the new date.
    pub fn carried_forward(&self, effective_date: NaiveDate) -> Self {
        Self {
            effective_date,
            current: self.current.clone(),
            history: self.history.clone(),
        }
    }

    /// The unit price for a product.
    ///
    /// Fails with `NotFound` when the product id is unknown, the product is
    /// inactive, or no price record exists for it.
    pub fn unit_price(&self, catalog: &Catalog, product_id: &str) -> LedgerResult<Rupee> {
        let product = catalog.require_product(product_id)?;
        if !product.active {
            return Err(LedgerError::not_found("Product", product_id));
        }

        self.current
            .get(product_id)
            .map(PriceRecord::unit_price)
            .ok_or_else(|| LedgerError::not_found("Price record", product_id))
    }

    /// Replaces a product's price components.
    ///
    /// ## Rules
    /// - Both components must be positive (`InvalidInput` otherwise)
    /// - The product must exist in the catalog (`NotFound` otherwise)
    /// - The superseded record, if any, is appended to history
    /// - Unit price is re-derived, never supplied by the caller
    ///
    /// Returns the new unit price.
    pub fn update_price(
        &mut self,
        catalog: &Catalog,
        product_id: &str,
        base_rate_per_kg: f64,
        conversion_factor: f64,
        now: DateTime<Utc>,
    ) -> LedgerResult<Rupee> {
        validate_rate("baseRatePerKg", base_rate_per_kg)?;
        validate_rate("conversionFactor", conversion_factor)?;
        catalog.require_product(product_id)?;

        let record = PriceRecord {
            product_id: product_id.to_string(),
            base_rate_per_kg,
            conversion_factor,
            effective_date: self.effective_date,
            last_updated: now,
        };
        let unit_price = record.unit_price();

        if let Some(previous) = self.current.insert(product_id.to_string(), record) {
            self.history.push(previous);
        }

        Ok(unit_price)
    }

    /// The current record for a product, if any.
    pub fn record(&self, product_id: &str) -> Option<&PriceRecord> {
        self.current.get(product_id)
    }

    /// Superseded records for a product, oldest first.
    pub fn history(&self, product_id: &str) -> Vec<&PriceRecord> {
        self.history
            .iter()
            .filter(|r| r.product_id == product_id)
            .collect()
    }

    /// Current records, ordered by product id.
    pub fn records(&self) -> impl Iterator<Item = &PriceRecord> {
        self.current.values()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 25).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn seeded() -> (Catalog, PriceCatalog) {
        let catalog = Catalog::with_defaults();
        let prices = PriceCatalog::seed_rates(&catalog, day(), now());
        (catalog, prices)
    }

    #[test]
    fn test_unit_price_derivation() {
        let (catalog, prices) = seeded();

        assert_eq!(
            prices.unit_price(&catalog, "SF_30KG").unwrap(),
            Rupee::from_rupees(3900)
        );
        assert_eq!(
            prices.unit_price(&catalog, "SF_15L").unwrap(),
            Rupee::from_rupees(1768)
        );
        assert_eq!(
            prices.unit_price(&catalog, "PS_15L").unwrap(),
            Rupee::from_rupees(1292)
        );
    }

    #[test]
    fn test_unit_price_rounds_to_whole_rupees() {
        let (catalog, prices) = seeded();

        // 130 × 0.91 = 118.3 and 130 × 0.39 = 50.7
        assert_eq!(
            prices.unit_price(&catalog, "SF_1L").unwrap(),
            Rupee::from_rupees(118)
        );
        assert_eq!(
            prices.unit_price(&catalog, "SF_425").unwrap(),
            Rupee::from_rupees(51)
        );
    }

    #[test]
    fn test_seed_covers_every_active_product() {
        let (catalog, prices) = seeded();
        for product in catalog.active_products() {
            assert!(prices.unit_price(&catalog, &product.id).is_ok());
        }
        assert_eq!(prices.records().count(), 15);
    }

    #[test]
    fn test_unknown_and_inactive_products_fail() {
        let (catalog, prices) = seeded();
        assert!(matches!(
            prices.unit_price(&catalog, "SF_99L"),
            Err(LedgerError::NotFound { .. })
        ));

        let mut products: Vec<Product> = catalog.products().to_vec();
        products[0].active = false;
        let retired_id = products[0].id.clone();
        let catalog = Catalog::new(
            products,
            catalog.routes().to_vec(),
            catalog.vehicles().to_vec(),
        )
        .unwrap();

        assert!(matches!(
            prices.unit_price(&catalog, &retired_id),
            Err(LedgerError::NotFound { .. })
        ));
    }

    #[test]
    fn test_update_price_validations() {
        let (catalog, mut prices) = seeded();

        assert!(matches!(
            prices.update_price(&catalog, "SF_5L", 0.0, 4.5, now()),
            Err(LedgerError::InvalidInput { .. })
        ));
        assert!(matches!(
            prices.update_price(&catalog, "SF_5L", 132.0, -4.5, now()),
            Err(LedgerError::InvalidInput { .. })
        ));
        assert!(matches!(
            prices.update_price(&catalog, "SF_99L", 132.0, 4.5, now()),
            Err(LedgerError::NotFound { .. })
        ));

        // Failed updates leave the current price untouched
        assert_eq!(
            prices.unit_price(&catalog, "SF_5L").unwrap(),
            Rupee::from_rupees(585)
        );
    }

    #[test]
    fn test_update_replaces_and_keeps_history() {
        let (catalog, mut prices) = seeded();

        let new_price = prices
            .update_price(&catalog, "SF_30KG", 132.0, 30.0, now())
            .unwrap();
        assert_eq!(new_price, Rupee::from_rupees(3960));
        assert_eq!(
            prices.unit_price(&catalog, "SF_30KG").unwrap(),
            Rupee::from_rupees(3960)
        );

        let history = prices.history("SF_30KG");
        assert_eq!(history.len(), 1);
        assert!((history[0].base_rate_per_kg - 130.0).abs() < 1e-9);

        prices
            .update_price(&catalog, "SF_30KG", 135.0, 30.0, now())
            .unwrap();
        let history = prices.history("SF_30KG");
        assert_eq!(history.len(), 2);
        assert!((history[1].base_rate_per_kg - 132.0).abs() < 1e-9);
    }

    #[test]
    fn test_carry_forward_keeps_effective_dates() {
        let (catalog, mut prices) = seeded();
        prices
            .update_price(&catalog, "PS_5L", 97.0, 4.5, now())
            .unwrap();

        let next_day = day().succ_opt().unwrap();
        let carried = prices.carried_forward(next_day);

        let record = carried.record("PS_5L").unwrap();
        assert_eq!(record.effective_date, day());
        assert_eq!(carried.history("PS_5L").len(), 1);
    }
}
