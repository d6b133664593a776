//! Platform modules
//!
//! This module defines every feature area of the merchant dashboard that can
//! be shown, sold as an add-on, or hidden per region.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a platform module.
///
/// The snake_case string form is stable: it is what the module-status API
/// returns and what the purchased add-on list is persisted as.
///
/// # Examples
///
/// ```
/// use merchant_catalog::ModuleId;
///
/// assert_eq!(ModuleId::parse("kitchen-display"), Some(ModuleId::KitchenDisplay));
/// assert_eq!(ModuleId::Zatca.as_str(), "zatca");
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ModuleId {
    /// Online storefront and theme
    Storefront,
    /// Product catalog management
    Products,
    /// Order management
    Orders,
    /// Customer directory
    Customers,
    /// Stock and warehouse tracking
    Inventory,
    /// Point of sale
    Pos,
    /// Customer relationship management
    Crm,
    /// Enterprise resource planning
    Erp,
    /// Loyalty points and rewards
    Loyalty,
    /// Campaigns and promotions
    Marketing,
    /// Reports and dashboards
    Analytics,
    /// Multi-branch management
    Branches,
    /// Kitchen display system
    KitchenDisplay,
    /// Table reservations
    Reservations,
    /// Last-mile delivery tracking
    DeliveryTracking,
    /// Real-estate property listings
    PropertyListings,
    /// Importer of record (cross-border logistics)
    Ior,
    /// Saudi ZATCA e-invoicing
    Zatca,
    /// EU VAT invoicing
    VatInvoicing,
    /// South Asia GST invoicing
    GstInvoicing,
    /// Multi-currency pricing
    MultiCurrency,
    /// WhatsApp commerce channel
    WhatsappCommerce,
}

impl ModuleId {
    /// All module identifiers, in catalog order.
    pub const ALL: [ModuleId; 22] = [
        ModuleId::Storefront,
        ModuleId::Products,
        ModuleId::Orders,
        ModuleId::Customers,
        ModuleId::Inventory,
        ModuleId::Pos,
        ModuleId::Crm,
        ModuleId::Erp,
        ModuleId::Loyalty,
        ModuleId::Marketing,
        ModuleId::Analytics,
        ModuleId::Branches,
        ModuleId::KitchenDisplay,
        ModuleId::Reservations,
        ModuleId::DeliveryTracking,
        ModuleId::PropertyListings,
        ModuleId::Ior,
        ModuleId::Zatca,
        ModuleId::VatInvoicing,
        ModuleId::GstInvoicing,
        ModuleId::MultiCurrency,
        ModuleId::WhatsappCommerce,
    ];

    /// Parse a module identifier (case-insensitive, `-` and `_` interchangeable).
    ///
    /// Returns `None` for identifiers that are not in the catalog.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == normalized)
    }

    /// Get the stable string identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleId::Storefront => "storefront",
            ModuleId::Products => "products",
            ModuleId::Orders => "orders",
            ModuleId::Customers => "customers",
            ModuleId::Inventory => "inventory",
            ModuleId::Pos => "pos",
            ModuleId::Crm => "crm",
            ModuleId::Erp => "erp",
            ModuleId::Loyalty => "loyalty",
            ModuleId::Marketing => "marketing",
            ModuleId::Analytics => "analytics",
            ModuleId::Branches => "branches",
            ModuleId::KitchenDisplay => "kitchen_display",
            ModuleId::Reservations => "reservations",
            ModuleId::DeliveryTracking => "delivery_tracking",
            ModuleId::PropertyListings => "property_listings",
            ModuleId::Ior => "ior",
            ModuleId::Zatca => "zatca",
            ModuleId::VatInvoicing => "vat_invoicing",
            ModuleId::GstInvoicing => "gst_invoicing",
            ModuleId::MultiCurrency => "multi_currency",
            ModuleId::WhatsappCommerce => "whatsapp_commerce",
        }
    }

    /// Get the catalog entry for this module.
    pub fn module(&self) -> &'static Module {
        // MODULES is ordered exactly like ModuleId::ALL
        &MODULES[*self as usize]
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category label used to group modules in the sidebar.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ModuleCategory {
    /// Selling channels and catalog
    Commerce,
    /// Day-to-day operations
    Operations,
    /// Customer engagement
    Engagement,
    /// Finance and back office
    Finance,
    /// Regulatory compliance
    Compliance,
    /// Shipping and cross-border logistics
    Logistics,
    /// Industry-specific modules
    Vertical,
}

impl ModuleCategory {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ModuleCategory::Commerce => "Commerce",
            ModuleCategory::Operations => "Operations",
            ModuleCategory::Engagement => "Engagement",
            ModuleCategory::Finance => "Finance",
            ModuleCategory::Compliance => "Compliance",
            ModuleCategory::Logistics => "Logistics",
            ModuleCategory::Vertical => "Industry",
        }
    }
}

/// A purchasable or visible feature area of the platform.
#[derive(Debug, Clone, Serialize)]
pub struct Module {
    /// Unique identifier
    pub id: ModuleId,

    /// Display name
    pub name: &'static str,

    /// Sidebar category
    pub category: ModuleCategory,

    /// Icon glyph
    pub icon: &'static str,

    /// Feature names, in display order
    pub features: &'static [&'static str],
}

static MODULES: [Module; 22] = [
    Module {
        id: ModuleId::Storefront,
        name: "Online Store",
        category: ModuleCategory::Commerce,
        icon: "🛍️",
        features: &["Theme editor", "Custom domain", "SEO settings", "Mobile checkout"],
    },
    Module {
        id: ModuleId::Products,
        name: "Products",
        category: ModuleCategory::Commerce,
        icon: "📦",
        features: &["Variants", "Collections", "Bulk import", "Digital products"],
    },
    Module {
        id: ModuleId::Orders,
        name: "Orders",
        category: ModuleCategory::Commerce,
        icon: "🧾",
        features: &["Order timeline", "Refunds", "Invoices", "Abandoned carts"],
    },
    Module {
        id: ModuleId::Customers,
        name: "Customers",
        category: ModuleCategory::Engagement,
        icon: "👥",
        features: &["Customer profiles", "Segments", "Order history"],
    },
    Module {
        id: ModuleId::Inventory,
        name: "Inventory",
        category: ModuleCategory::Operations,
        icon: "🏬",
        features: &["Stock levels", "Low-stock alerts", "Transfers", "Stocktakes"],
    },
    Module {
        id: ModuleId::Pos,
        name: "Point of Sale",
        category: ModuleCategory::Operations,
        icon: "💳",
        features: &["Offline mode", "Receipt printing", "Cash drawer", "Staff shifts"],
    },
    Module {
        id: ModuleId::Crm,
        name: "CRM",
        category: ModuleCategory::Engagement,
        icon: "🤝",
        features: &["Pipelines", "Tasks", "Customer notes", "Email sync"],
    },
    Module {
        id: ModuleId::Erp,
        name: "ERP",
        category: ModuleCategory::Finance,
        icon: "🏭",
        features: &["Purchasing", "Suppliers", "General ledger", "Cost centers"],
    },
    Module {
        id: ModuleId::Loyalty,
        name: "Loyalty",
        category: ModuleCategory::Engagement,
        icon: "⭐",
        features: &["Points", "Tiers", "Rewards", "Referral codes"],
    },
    Module {
        id: ModuleId::Marketing,
        name: "Marketing",
        category: ModuleCategory::Engagement,
        icon: "📣",
        features: &["Discount codes", "Email campaigns", "SMS campaigns"],
    },
    Module {
        id: ModuleId::Analytics,
        name: "Analytics",
        category: ModuleCategory::Finance,
        icon: "📊",
        features: &["Sales reports", "Live dashboard", "Export to CSV"],
    },
    Module {
        id: ModuleId::Branches,
        name: "Branches",
        category: ModuleCategory::Operations,
        icon: "🏢",
        features: &["Branch inventory", "Branch staff", "Per-branch reports"],
    },
    Module {
        id: ModuleId::KitchenDisplay,
        name: "Kitchen Display",
        category: ModuleCategory::Vertical,
        icon: "👨‍🍳",
        features: &["Ticket queue", "Prep timers", "Station routing"],
    },
    Module {
        id: ModuleId::Reservations,
        name: "Reservations",
        category: ModuleCategory::Vertical,
        icon: "📅",
        features: &["Table map", "Booking widget", "Waitlist"],
    },
    Module {
        id: ModuleId::DeliveryTracking,
        name: "Delivery Tracking",
        category: ModuleCategory::Logistics,
        icon: "🚚",
        features: &["Live driver map", "ETA notifications", "Proof of delivery"],
    },
    Module {
        id: ModuleId::PropertyListings,
        name: "Property Listings",
        category: ModuleCategory::Vertical,
        icon: "🏠",
        features: &["Listings", "Viewings", "Lead capture", "Agent assignment"],
    },
    Module {
        id: ModuleId::Ior,
        name: "Importer of Record",
        category: ModuleCategory::Logistics,
        icon: "🌍",
        features: &["Customs clearance", "Duty calculation", "Shipment refunds", "HS codes"],
    },
    Module {
        id: ModuleId::Zatca,
        name: "ZATCA E-Invoicing",
        category: ModuleCategory::Compliance,
        icon: "🧮",
        features: &["Phase 2 integration", "QR invoices", "Credit notes"],
    },
    Module {
        id: ModuleId::VatInvoicing,
        name: "EU VAT Invoicing",
        category: ModuleCategory::Compliance,
        icon: "🇪🇺",
        features: &["OSS reporting", "Reverse charge", "VAT ID validation"],
    },
    Module {
        id: ModuleId::GstInvoicing,
        name: "GST Invoicing",
        category: ModuleCategory::Compliance,
        icon: "🧾",
        features: &["GSTIN validation", "E-way bills", "GSTR exports"],
    },
    Module {
        id: ModuleId::MultiCurrency,
        name: "Multi-Currency",
        category: ModuleCategory::Finance,
        icon: "💱",
        features: &["Price lists", "Auto FX rates", "Rounding rules"],
    },
    Module {
        id: ModuleId::WhatsappCommerce,
        name: "WhatsApp Commerce",
        category: ModuleCategory::Commerce,
        icon: "💬",
        features: &["Catalog sharing", "Order via chat", "Broadcasts"],
    },
];

/// All modules in catalog order.
pub fn modules() -> &'static [Module] {
    &MODULES
}

/// Look up a module by identifier.
pub fn module(id: ModuleId) -> &'static Module {
    id.module()
}

/// All modules belonging to a category, in catalog order.
pub fn modules_in_category(category: ModuleCategory) -> impl Iterator<Item = &'static Module> {
    MODULES.iter().filter(move |m| m.category == category)
}
