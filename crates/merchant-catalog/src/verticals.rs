//! Business verticals
//!
//! The merchant picks a vertical during onboarding. It does not change which
//! modules a region offers; it drives UI specialization such as which modules
//! are recommended first.

use crate::modules::ModuleId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The merchant's industry, selected during onboarding.
///
/// # Examples
///
/// ```
/// use merchant_catalog::BusinessPurpose;
///
/// let purpose = BusinessPurpose::parse("real-estate").unwrap();
/// assert_eq!(purpose, BusinessPurpose::RealEstate);
/// assert_eq!(purpose.as_str(), "real_estate");
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BusinessPurpose {
    /// Online retail
    Ecommerce,
    /// Restaurants and cafés
    Restaurant,
    /// Property agencies
    RealEstate,
    /// Importer of record and cross-border logistics
    Ior,
    /// Brick-and-mortar retail
    Retail,
    /// Grocery and convenience
    Grocery,
    /// Fashion and apparel
    Fashion,
    /// Consumer electronics
    Electronics,
    /// Pharmacies
    Pharmacy,
    /// Salons and spas
    Beauty,
    /// Clinics
    Healthcare,
    /// Courses and tutoring
    Education,
    /// Dealerships and workshops
    Automotive,
    /// Hotels and rentals
    Hospitality,
    /// Professional services
    Services,
    /// B2B wholesale
    Wholesale,
}

impl BusinessPurpose {
    /// All verticals, in onboarding display order.
    pub const ALL: [BusinessPurpose; 16] = [
        BusinessPurpose::Ecommerce,
        BusinessPurpose::Restaurant,
        BusinessPurpose::RealEstate,
        BusinessPurpose::Ior,
        BusinessPurpose::Retail,
        BusinessPurpose::Grocery,
        BusinessPurpose::Fashion,
        BusinessPurpose::Electronics,
        BusinessPurpose::Pharmacy,
        BusinessPurpose::Beauty,
        BusinessPurpose::Healthcare,
        BusinessPurpose::Education,
        BusinessPurpose::Automotive,
        BusinessPurpose::Hospitality,
        BusinessPurpose::Services,
        BusinessPurpose::Wholesale,
    ];

    /// Parse a vertical (case-insensitive, `-` and `_` interchangeable).
    ///
    /// # Returns
    ///
    /// `Some(BusinessPurpose)` if valid, `None` otherwise
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "ecommerce" | "e_commerce" => Some(BusinessPurpose::Ecommerce),
            "restaurant" => Some(BusinessPurpose::Restaurant),
            "real_estate" => Some(BusinessPurpose::RealEstate),
            "ior" | "logistics" => Some(BusinessPurpose::Ior),
            "retail" => Some(BusinessPurpose::Retail),
            "grocery" => Some(BusinessPurpose::Grocery),
            "fashion" => Some(BusinessPurpose::Fashion),
            "electronics" => Some(BusinessPurpose::Electronics),
            "pharmacy" => Some(BusinessPurpose::Pharmacy),
            "beauty" => Some(BusinessPurpose::Beauty),
            "healthcare" => Some(BusinessPurpose::Healthcare),
            "education" => Some(BusinessPurpose::Education),
            "automotive" => Some(BusinessPurpose::Automotive),
            "hospitality" => Some(BusinessPurpose::Hospitality),
            "services" => Some(BusinessPurpose::Services),
            "wholesale" => Some(BusinessPurpose::Wholesale),
            _ => None,
        }
    }

    /// Get the stable string form, as persisted.
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessPurpose::Ecommerce => "ecommerce",
            BusinessPurpose::Restaurant => "restaurant",
            BusinessPurpose::RealEstate => "real_estate",
            BusinessPurpose::Ior => "ior",
            BusinessPurpose::Retail => "retail",
            BusinessPurpose::Grocery => "grocery",
            BusinessPurpose::Fashion => "fashion",
            BusinessPurpose::Electronics => "electronics",
            BusinessPurpose::Pharmacy => "pharmacy",
            BusinessPurpose::Beauty => "beauty",
            BusinessPurpose::Healthcare => "healthcare",
            BusinessPurpose::Education => "education",
            BusinessPurpose::Automotive => "automotive",
            BusinessPurpose::Hospitality => "hospitality",
            BusinessPurpose::Services => "services",
            BusinessPurpose::Wholesale => "wholesale",
        }
    }

    /// Get a human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            BusinessPurpose::Ecommerce => "E-commerce",
            BusinessPurpose::Restaurant => "Restaurant",
            BusinessPurpose::RealEstate => "Real Estate",
            BusinessPurpose::Ior => "Importer of Record",
            BusinessPurpose::Retail => "Retail Store",
            BusinessPurpose::Grocery => "Grocery",
            BusinessPurpose::Fashion => "Fashion",
            BusinessPurpose::Electronics => "Electronics",
            BusinessPurpose::Pharmacy => "Pharmacy",
            BusinessPurpose::Beauty => "Beauty & Wellness",
            BusinessPurpose::Healthcare => "Healthcare",
            BusinessPurpose::Education => "Education",
            BusinessPurpose::Automotive => "Automotive",
            BusinessPurpose::Hospitality => "Hospitality",
            BusinessPurpose::Services => "Professional Services",
            BusinessPurpose::Wholesale => "Wholesale",
        }
    }

    /// Modules the dashboard surfaces first for this vertical.
    ///
    /// This is a hint only; availability is still decided by the region and
    /// purchased add-ons.
    pub fn recommended_modules(&self) -> &'static [ModuleId] {
        use ModuleId::*;
        match self {
            BusinessPurpose::Ecommerce => &[Storefront, Products, Orders, Marketing, DeliveryTracking],
            BusinessPurpose::Restaurant => &[Pos, KitchenDisplay, Reservations, DeliveryTracking, Loyalty],
            BusinessPurpose::RealEstate => &[PropertyListings, Crm, Marketing],
            BusinessPurpose::Ior => &[Ior, Orders, DeliveryTracking, MultiCurrency],
            BusinessPurpose::Retail => &[Pos, Inventory, Branches, Loyalty],
            BusinessPurpose::Grocery => &[Pos, Inventory, DeliveryTracking, WhatsappCommerce],
            BusinessPurpose::Fashion => &[Storefront, Products, Loyalty, Marketing],
            BusinessPurpose::Electronics => &[Storefront, Products, Inventory, Erp],
            BusinessPurpose::Pharmacy => &[Pos, Inventory, DeliveryTracking],
            BusinessPurpose::Beauty => &[Reservations, Pos, Loyalty, Crm],
            BusinessPurpose::Healthcare => &[Reservations, Crm, Customers],
            BusinessPurpose::Education => &[Storefront, Customers, Marketing],
            BusinessPurpose::Automotive => &[Crm, Inventory, Branches],
            BusinessPurpose::Hospitality => &[Reservations, Pos, Loyalty],
            BusinessPurpose::Services => &[Crm, Customers, Reservations],
            BusinessPurpose::Wholesale => &[Erp, Inventory, MultiCurrency, Orders],
        }
    }
}

impl fmt::Display for BusinessPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
