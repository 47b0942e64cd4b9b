//! # Catalog Module
//!
//! Static reference data: products, routes, and vehicles.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalog Types                                   │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Route       │   │    Vehicle      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name           │   │  name           │   │  number         │       │
//! │  │  category       │   └─────────────────┘   │  active         │       │
//! │  │  pack_label     │                         └─────────────────┘       │
//! │  │  kg_per_unit    │   ┌─────────────────┐                             │
//! │  │  active         │   │ ProductCategory │                             │
//! │  └─────────────────┘   │  Sunflower      │                             │
//! │                        │  Palmstar       │                             │
//! │                        │  Lamp           │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The catalog is read-only input to every other component: ledger and
//! dispatch operations resolve ids against its closed set, reports iterate
//! routes in catalog order, and the price catalog seeds from its categories.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{LedgerError, LedgerResult};
use crate::validation::validate_catalog_id;

// =============================================================================
// Product Category
// =============================================================================

/// Product family, used for pricing defaults and report grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductCategory {
    Sunflower,
    Palmstar,
    Lamp,
}

impl ProductCategory {
    /// Human-readable category name as it appears in report text.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Sunflower => "Sunflower",
            Self::Palmstar => "Palmstar",
            Self::Lamp => "Lamp Oil",
        }
    }

    /// Classifies a product display name by keyword.
    ///
    /// ## Rules
    /// First match wins: a name containing "Sunflower" is Sunflower, one
    /// containing "Palmstar" is Palmstar, anything else is Lamp. The price
    /// update message relies on this when grouping free-form price lines.
    pub fn from_product_name(name: &str) -> Self {
        if name.contains("Sunflower") {
            Self::Sunflower
        } else if name.contains("Palmstar") {
            Self::Palmstar
        } else {
            Self::Lamp
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// An oil product pack sold and dispatched by the depot.
///
/// Immutable reference data once created; only `active` may toggle.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Business identifier (e.g. "SF_30KG").
    pub id: String,

    /// Display name shown in logs and reports.
    pub name: String,

    /// Product family.
    pub category: ProductCategory,

    /// Pack size label (e.g. "30kg Can", "1L Pouch").
    pub pack_label: String,

    /// Kilograms per pack unit; multiplies the per-kg base rate into a
    /// unit price.
    pub conversion_factor_kg_per_unit: f64,

    /// Whether the product is currently sold (soft delete).
    pub active: bool,
}

// =============================================================================
// Route
// =============================================================================

/// A fixed delivery line served by one or more vehicles.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Route {
    /// Business identifier (e.g. "ROUTE_ECR").
    pub id: String,

    /// Display name shown in summaries.
    pub name: String,
}

// =============================================================================
// Vehicle
// =============================================================================

/// A delivery vehicle identified by its registration number.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Vehicle {
    /// Business identifier (e.g. "VH_2259").
    pub id: String,

    /// Registration number shown in logs (e.g. "2259").
    pub number: String,

    /// Whether the vehicle is in service.
    pub active: bool,
}

// =============================================================================
// Catalog
// =============================================================================

/// The closed reference set every operation resolves ids against.
///
/// ## Invariants
/// - Ids are well-formed and unique within their kind
/// - Iteration order of `routes()` is the catalog order used by reports
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    routes: Vec<Route>,
    vehicles: Vec<Vehicle>,
}

impl Catalog {
    /// Builds a catalog from explicit reference lists.
    ///
    /// Rejects malformed ids with `InvalidInput` and duplicate ids within a
    /// kind with `InvalidInput`.
    pub fn new(
        products: Vec<Product>,
        routes: Vec<Route>,
        vehicles: Vec<Vehicle>,
    ) -> LedgerResult<Self> {
        check_unique("productId", products.iter().map(|p| p.id.as_str()))?;
        check_unique("routeId", routes.iter().map(|r| r.id.as_str()))?;
        check_unique("vehicleId", vehicles.iter().map(|v| v.id.as_str()))?;

        Ok(Self {
            products,
            routes,
            vehicles,
        })
    }

    /// The depot's standard reference data (see tables below).
    pub fn with_defaults() -> Self {
        let products = DEFAULT_PRODUCTS
            .iter()
            .map(|&(id, name, category, pack_label, kg_per_unit)| Product {
                id: id.to_string(),
                name: name.to_string(),
                category,
                pack_label: pack_label.to_string(),
                conversion_factor_kg_per_unit: kg_per_unit,
                active: true,
            })
            .collect();

        let routes = DEFAULT_ROUTES
            .iter()
            .map(|&(id, name)| Route {
                id: id.to_string(),
                name: name.to_string(),
            })
            .collect();

        let vehicles = DEFAULT_VEHICLES
            .iter()
            .map(|&(id, number)| Vehicle {
                id: id.to_string(),
                number: number.to_string(),
                active: true,
            })
            .collect();

        Self {
            products,
            routes,
            vehicles,
        }
    }

    /// All products in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Active products in catalog order.
    pub fn active_products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.active)
    }

    /// Looks up a product by id.
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Looks up a product by id, failing with `NotFound` when absent.
    pub fn require_product(&self, id: &str) -> LedgerResult<&Product> {
        self.product(id)
            .ok_or_else(|| LedgerError::not_found("Product", id))
    }

    /// All routes, in the catalog order used by reports.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Looks up a route by id.
    pub fn route(&self, id: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.id == id)
    }

    /// Looks up a route by id, failing with `NotFound` when absent.
    pub fn require_route(&self, id: &str) -> LedgerResult<&Route> {
        self.route(id)
            .ok_or_else(|| LedgerError::not_found("Route", id))
    }

    /// All vehicles in catalog order.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Looks up a vehicle by id.
    pub fn vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    /// Looks up a vehicle by id, failing with `NotFound` when absent.
    pub fn require_vehicle(&self, id: &str) -> LedgerResult<&Vehicle> {
        self.vehicle(id)
            .ok_or_else(|| LedgerError::not_found("Vehicle", id))
    }
}

fn check_unique<'a>(field: &str, ids: impl Iterator<Item = &'a str>) -> LedgerResult<()> {
    let mut seen: Vec<&str> = Vec::new();
    for id in ids {
        validate_catalog_id(field, id)?;
        if seen.contains(&id) {
            return Err(LedgerError::invalid_input(format!(
                "{field} '{id}' appears more than once"
            )));
        }
        seen.push(id);
    }
    Ok(())
}

// =============================================================================
// Default Dataset
// =============================================================================
//
// The depot's standing reference data. Conversion factors are kg per pack
// unit (density-rounded for litre packs).

const DEFAULT_ROUTES: &[(&str, &str)] = &[
    ("ROUTE_UTHUKOTAI", "Uthukota"),
    ("ROUTE_ARAKONAM", "Arakonam"),
    ("ROUTE_ACHARAPAKKAM", "Acharapakkam"),
    ("ROUTE_KALPAKKAM", "Kalpakkam"),
    ("ROUTE_POONAMALLEE", "Poonamali"),
    ("ROUTE_PONNERI", "Ponneri"),
    ("ROUTE_ECR", "ECR"),
];

const DEFAULT_VEHICLES: &[(&str, &str)] = &[
    ("VH_2259", "2259"),
    ("VH_5149", "5149"),
    ("VH_3083", "3083"),
    ("VH_4080", "4080"),
    ("VH_0456", "0456"),
];

const DEFAULT_PRODUCTS: &[(&str, &str, ProductCategory, &str, f64)] = &[
    // Sunflower
    ("SF_30KG", "Sunflower 30kg Can", ProductCategory::Sunflower, "30kg Can", 30.0),
    ("SF_15KG", "Sunflower 15kg Tin", ProductCategory::Sunflower, "15kg Tin", 15.0),
    ("SF_15L", "Sunflower 15L Tin", ProductCategory::Sunflower, "15L Tin", 13.6),
    ("SF_5L", "Sunflower 5L Can", ProductCategory::Sunflower, "5L Can", 4.5),
    ("SF_1L", "Sunflower 1L Pouch", ProductCategory::Sunflower, "1L Pouch", 0.91),
    ("SF_850", "Sunflower 850ml", ProductCategory::Sunflower, "850ml", 0.77),
    ("SF_425", "Sunflower 425ml", ProductCategory::Sunflower, "425ml", 0.39),
    // Palmstar
    ("PS_30KG", "Palmstar 30kg Can", ProductCategory::Palmstar, "30kg Can", 30.0),
    ("PS_15L", "Palmstar 15L Tin", ProductCategory::Palmstar, "15L Tin", 13.6),
    ("PS_5L", "Palmstar 5L Can", ProductCategory::Palmstar, "5L Can", 4.5),
    ("PS_1L", "Palmstar 1L Pouch", ProductCategory::Palmstar, "1L Pouch", 0.91),
    ("PS_850", "Palmstar 850ml", ProductCategory::Palmstar, "850ml", 0.77),
    ("PS_425", "Palmstar 425ml", ProductCategory::Palmstar, "425ml", 0.39),
    // Lamp oil
    ("LAMP_5L", "Lamp Oil 5L", ProductCategory::Lamp, "5L", 4.5),
    ("LAMP_1L", "Lamp Oil 1L", ProductCategory::Lamp, "1L", 0.91),
];

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_shape() {
        let catalog = Catalog::with_defaults();
        assert_eq!(catalog.products().len(), 15);
        assert_eq!(catalog.routes().len(), 7);
        assert_eq!(catalog.vehicles().len(), 5);
        assert_eq!(catalog.active_products().count(), 15);
    }

    #[test]
    fn test_lookups() {
        let catalog = Catalog::with_defaults();

        let product = catalog.require_product("SF_15L").unwrap();
        assert_eq!(product.name, "Sunflower 15L Tin");
        assert_eq!(product.category, ProductCategory::Sunflower);
        assert!((product.conversion_factor_kg_per_unit - 13.6).abs() < 1e-9);

        let route = catalog.require_route("ROUTE_ECR").unwrap();
        assert_eq!(route.name, "ECR");

        let vehicle = catalog.require_vehicle("VH_0456").unwrap();
        assert_eq!(vehicle.number, "0456");
    }

    #[test]
    fn test_lookup_not_found() {
        let catalog = Catalog::with_defaults();

        let err = catalog.require_product("SF_99KG").unwrap_err();
        assert_eq!(err.to_string(), "Product not found: SF_99KG");
        assert!(catalog.route("ROUTE_NOWHERE").is_none());
        assert!(catalog.require_vehicle("VH_9999").is_err());
    }

    #[test]
    fn test_routes_keep_catalog_order() {
        let catalog = Catalog::with_defaults();
        let names: Vec<&str> = catalog.routes().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Uthukota",
                "Arakonam",
                "Acharapakkam",
                "Kalpakkam",
                "Poonamali",
                "Ponneri",
                "ECR"
            ]
        );
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let routes = vec![
            Route {
                id: "ROUTE_A".to_string(),
                name: "A".to_string(),
            },
            Route {
                id: "ROUTE_A".to_string(),
                name: "A again".to_string(),
            },
        ];
        let err = Catalog::new(Vec::new(), routes, Vec::new()).unwrap_err();
        assert!(err.to_string().contains("appears more than once"));
    }

    #[test]
    fn test_category_from_product_name() {
        assert_eq!(
            ProductCategory::from_product_name("Sunflower 5L Can"),
            ProductCategory::Sunflower
        );
        assert_eq!(
            ProductCategory::from_product_name("Palmstar 850ml"),
            ProductCategory::Palmstar
        );
        assert_eq!(
            ProductCategory::from_product_name("Lamp Oil 1L"),
            ProductCategory::Lamp
        );
        assert_eq!(
            ProductCategory::from_product_name("Groundnut 1L"),
            ProductCategory::Lamp
        );
    }

    #[test]
    fn test_category_display_names() {
        assert_eq!(ProductCategory::Sunflower.display_name(), "Sunflower");
        assert_eq!(ProductCategory::Lamp.display_name(), "Lamp Oil");
    }
}
