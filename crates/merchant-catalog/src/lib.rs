//! # Merchant Catalog
//!
//! This crate provides the static reference data behind merchant entitlements:
//! which regions exist, which countries belong to them, which modules the
//! platform offers, and how each region sells those modules.
//!
//! ## Overview
//!
//! The merchant-catalog crate handles:
//! - **Regions**: Country groupings with currency, payment methods, plans,
//!   compliance tags and a per-module strategy (`core` / `addon` / `na`)
//! - **Modules**: Every feature area of the dashboard with its category and features
//! - **Verticals**: The business purposes a merchant can pick during onboarding
//! - **Countries**: Country name to ISO code mapping
//! - **Validation**: Consistency checks over the catalog
//!
//! ## Architecture
//!
//! ```text
//! Country ──lookup──→ Region
//!                       ├─ Currency, PaymentMethods, Plans, Compliance
//!                       ├─ modules: ModuleId → ModuleStatus
//!                       └─ addon_pricing: ModuleId → monthly price
//! ModuleId ──→ Module (name, category, icon, features)
//! BusinessPurpose ──→ recommended ModuleIds
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use merchant_catalog::{country_code, lookup_region_by_country, ModuleId, ModuleStatus};
//!
//! let region = lookup_region_by_country("Saudi Arabia").expect("MENA country");
//! assert_eq!(region.status(ModuleId::Ior), Some(ModuleStatus::Addon));
//! assert_eq!(country_code("Saudi Arabia"), "SA");
//! ```
//!
//! All data is immutable and lookups are pure.

pub mod countries;
pub mod modules;
pub mod regions;
pub mod validate;
pub mod verticals;

// Re-export main types for convenience
pub use countries::{country_code, known_countries, UNKNOWN_COUNTRY_CODE};
pub use modules::{module, modules, modules_in_category, Module, ModuleCategory, ModuleId};
pub use regions::{
    lookup_region_by_country, region, regions, Currency, ModuleStatus, PaymentMethod,
    PricingPlan, Region, RegionId,
};
pub use validate::{catalog_issues, validate_catalog, validate_region, CatalogError};
pub use verticals::BusinessPurpose;
