//! Regions and per-region module strategy
//!
//! A region groups countries that share a currency, payment methods,
//! compliance requirements and, most importantly, a module strategy: which
//! modules are included, which are sold as add-ons and which are not offered.

use crate::modules::ModuleId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// Identifier of a region.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RegionId {
    /// Middle East and North Africa
    Mena,
    /// Europe
    Europe,
    /// South Asia
    SouthAsia,
    /// Everywhere else we sell
    Global,
}

impl RegionId {
    /// All region identifiers.
    pub const ALL: [RegionId; 4] = [
        RegionId::Mena,
        RegionId::Europe,
        RegionId::SouthAsia,
        RegionId::Global,
    ];

    /// Parse a region identifier (case-insensitive, `-` and `_` interchangeable).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "mena" => Some(RegionId::Mena),
            "europe" | "eu" => Some(RegionId::Europe),
            "south_asia" => Some(RegionId::SouthAsia),
            "global" => Some(RegionId::Global),
            _ => None,
        }
    }

    /// Get string representation of the region.
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionId::Mena => "mena",
            RegionId::Europe => "europe",
            RegionId::SouthAsia => "south_asia",
            RegionId::Global => "global",
        }
    }

    /// Get the catalog entry for this region.
    pub fn region(&self) -> &'static Region {
        // regions() is ordered exactly like RegionId::ALL
        &regions()[*self as usize]
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a module within a region.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ModuleStatus {
    /// Included with every plan
    Core,

    /// Available for purchase
    Addon,

    /// Not offered in this region
    #[serde(rename = "na")]
    NotApplicable,
}

impl ModuleStatus {
    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleStatus::Core => "core",
            ModuleStatus::Addon => "addon",
            ModuleStatus::NotApplicable => "na",
        }
    }
}

/// Currency used for pricing in a region.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Currency {
    /// ISO 4217 code
    pub code: &'static str,
    /// Display symbol
    pub symbol: &'static str,
}

/// A payment method offered at checkout.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PaymentMethod {
    pub name: &'static str,
    pub icon: &'static str,
}

/// A subscription plan as marketed in a region.
#[derive(Debug, Clone, Serialize)]
pub struct PricingPlan {
    /// Plan name
    pub name: &'static str,

    /// Price as displayed (e.g. "SAR 199/mo")
    pub price: &'static str,

    /// Who the plan is for
    pub target: &'static str,

    /// Headline features
    pub features: &'static [&'static str],

    /// Highlighted as the most popular plan
    pub popular: bool,
}

/// A geo-economic grouping of countries sharing a module strategy.
///
/// # Examples
///
/// ```
/// use merchant_catalog::{lookup_region_by_country, ModuleId, ModuleStatus, RegionId};
///
/// let region = lookup_region_by_country("Saudi Arabia").unwrap();
/// assert_eq!(region.id, RegionId::Mena);
/// assert_eq!(region.status(ModuleId::Ior), Some(ModuleStatus::Addon));
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Region {
    /// Region identifier
    pub id: RegionId,

    /// Display name
    pub name: &'static str,

    /// Flag glyph
    pub flag: &'static str,

    /// Member country names (exact match is used for lookup)
    pub countries: &'static [&'static str],

    /// Pricing currency
    pub currency: Currency,

    /// Module strategy; modules absent from the map are not available
    pub modules: BTreeMap<ModuleId, ModuleStatus>,

    /// Monthly price of each add-on module, in `currency` major units
    pub addon_pricing: BTreeMap<ModuleId, u32>,

    /// Payment methods offered
    pub payment_methods: &'static [PaymentMethod],

    /// Marketed plans
    pub plans: &'static [PricingPlan],

    /// Compliance standards the region's merchants are held to
    pub compliance: &'static [&'static str],

    /// Marketing tagline
    pub tagline: &'static str,
}

impl Region {
    /// Recorded status of a module, `None` when the region does not list it.
    pub fn status(&self, module: ModuleId) -> Option<ModuleStatus> {
        self.modules.get(&module).copied()
    }

    /// Monthly add-on price of a module, `None` when it is not priced here.
    pub fn addon_price(&self, module: ModuleId) -> Option<u32> {
        self.addon_pricing.get(&module).copied()
    }

    /// Check whether a country belongs to this region.
    pub fn contains_country(&self, country: &str) -> bool {
        self.countries.iter().any(|c| *c == country)
    }

    /// Modules with the given status, in identifier order.
    pub fn modules_with_status(&self, status: ModuleStatus) -> impl Iterator<Item = ModuleId> + '_ {
        self.modules
            .iter()
            .filter(move |(_, s)| **s == status)
            .map(|(id, _)| *id)
    }
}

/// All regions, in `RegionId::ALL` order.
pub fn regions() -> &'static [Region] {
    static REGIONS: OnceLock<Vec<Region>> = OnceLock::new();
    REGIONS.get_or_init(build_regions)
}

/// Look up a region by identifier.
pub fn region(id: RegionId) -> &'static Region {
    id.region()
}

/// Find the region whose country list contains `country` (exact match).
///
/// Returns `None` when no region claims the country.
pub fn lookup_region_by_country(country: &str) -> Option<&'static Region> {
    regions().iter().find(|r| r.contains_country(country))
}

fn strategy(
    core: &[ModuleId],
    addons: &[(ModuleId, u32)],
    na: &[ModuleId],
) -> (BTreeMap<ModuleId, ModuleStatus>, BTreeMap<ModuleId, u32>) {
    let mut modules = BTreeMap::new();
    let mut pricing = BTreeMap::new();
    for id in core {
        modules.insert(*id, ModuleStatus::Core);
    }
    for (id, price) in addons {
        modules.insert(*id, ModuleStatus::Addon);
        pricing.insert(*id, *price);
    }
    for id in na {
        modules.insert(*id, ModuleStatus::NotApplicable);
    }
    (modules, pricing)
}

fn build_regions() -> Vec<Region> {
    use ModuleId::*;

    let (mena_modules, mena_pricing) = strategy(
        &[
            Storefront,
            Products,
            Orders,
            Customers,
            Inventory,
            Pos,
            Analytics,
            Zatca,
            MultiCurrency,
            WhatsappCommerce,
        ],
        &[
            (Crm, 79),
            (Erp, 189),
            (Loyalty, 59),
            (Marketing, 69),
            (Branches, 109),
            (KitchenDisplay, 89),
            (Reservations, 59),
            (DeliveryTracking, 69),
            (PropertyListings, 149),
            (Ior, 229),
        ],
        &[VatInvoicing, GstInvoicing],
    );

    let (europe_modules, europe_pricing) = strategy(
        &[
            Storefront,
            Products,
            Orders,
            Customers,
            Inventory,
            Analytics,
            VatInvoicing,
            MultiCurrency,
        ],
        &[
            (Pos, 29),
            (Crm, 25),
            (Erp, 59),
            (Loyalty, 19),
            (Marketing, 25),
            (Branches, 35),
            (KitchenDisplay, 29),
            (Reservations, 19),
            (DeliveryTracking, 25),
            (PropertyListings, 45),
            (WhatsappCommerce, 15),
        ],
        &[Ior, Zatca, GstInvoicing],
    );

    let (south_asia_modules, south_asia_pricing) = strategy(
        &[
            Storefront,
            Products,
            Orders,
            Customers,
            Pos,
            Analytics,
            GstInvoicing,
            WhatsappCommerce,
        ],
        &[
            (Inventory, 399),
            (Crm, 699),
            (Erp, 1999),
            (Loyalty, 499),
            (Marketing, 699),
            (Branches, 999),
            (KitchenDisplay, 799),
            (Reservations, 499),
            (DeliveryTracking, 699),
            (PropertyListings, 1299),
            (MultiCurrency, 499),
            (Ior, 2499),
        ],
        &[Zatca, VatInvoicing],
    );

    // Global leaves regional compliance modules unlisted rather than `na`
    let (global_modules, global_pricing) = strategy(
        &[
            Storefront,
            Products,
            Orders,
            Customers,
            Inventory,
            Analytics,
            MultiCurrency,
        ],
        &[
            (Pos, 29),
            (Crm, 29),
            (Erp, 69),
            (Loyalty, 19),
            (Marketing, 29),
            (Branches, 39),
            (KitchenDisplay, 29),
            (Reservations, 19),
            (DeliveryTracking, 29),
            (PropertyListings, 49),
            (WhatsappCommerce, 19),
            (Ior, 79),
        ],
        &[],
    );

    vec![
        Region {
            id: RegionId::Mena,
            name: "Middle East & North Africa",
            flag: "🌙",
            countries: &[
                "Saudi Arabia",
                "United Arab Emirates",
                "Kuwait",
                "Qatar",
                "Bahrain",
                "Oman",
                "Jordan",
                "Egypt",
                "Morocco",
            ],
            currency: Currency {
                code: "SAR",
                symbol: "﷼",
            },
            modules: mena_modules,
            addon_pricing: mena_pricing,
            payment_methods: &[
                PaymentMethod { name: "Mada", icon: "💳" },
                PaymentMethod { name: "Apple Pay", icon: "🍎" },
                PaymentMethod { name: "STC Pay", icon: "📱" },
                PaymentMethod { name: "Tabby", icon: "🛒" },
                PaymentMethod { name: "Cash on Delivery", icon: "💵" },
            ],
            plans: &[
                PricingPlan {
                    name: "Starter",
                    price: "SAR 149/mo",
                    target: "New online sellers",
                    features: &["Online store", "ZATCA e-invoicing", "WhatsApp orders"],
                    popular: false,
                },
                PricingPlan {
                    name: "Growth",
                    price: "SAR 399/mo",
                    target: "Growing brands with a physical shop",
                    features: &["Everything in Starter", "POS", "Multi-currency", "Analytics"],
                    popular: true,
                },
                PricingPlan {
                    name: "Enterprise",
                    price: "Contact sales",
                    target: "Multi-branch retailers",
                    features: &["Everything in Growth", "Dedicated success manager", "Custom SLAs"],
                    popular: false,
                },
            ],
            compliance: &["ZATCA", "PDPL", "VAT"],
            tagline: "Built for Gulf commerce, ZATCA-ready from day one",
        },
        Region {
            id: RegionId::Europe,
            name: "Europe",
            flag: "🇪🇺",
            countries: &[
                "United Kingdom",
                "Germany",
                "France",
                "Spain",
                "Italy",
                "Netherlands",
                "Ireland",
                "Sweden",
            ],
            currency: Currency {
                code: "EUR",
                symbol: "€",
            },
            modules: europe_modules,
            addon_pricing: europe_pricing,
            payment_methods: &[
                PaymentMethod { name: "Card", icon: "💳" },
                PaymentMethod { name: "SEPA Direct Debit", icon: "🏦" },
                PaymentMethod { name: "Klarna", icon: "🛍️" },
                PaymentMethod { name: "PayPal", icon: "🅿️" },
                PaymentMethod { name: "Apple Pay", icon: "🍎" },
            ],
            plans: &[
                PricingPlan {
                    name: "Starter",
                    price: "€39/mo",
                    target: "Independent sellers",
                    features: &["Online store", "EU VAT invoicing", "GDPR tooling"],
                    popular: false,
                },
                PricingPlan {
                    name: "Growth",
                    price: "€99/mo",
                    target: "Cross-border brands",
                    features: &["Everything in Starter", "Multi-currency", "Inventory"],
                    popular: true,
                },
                PricingPlan {
                    name: "Enterprise",
                    price: "Contact sales",
                    target: "Retail chains",
                    features: &["Everything in Growth", "SSO", "Custom SLAs"],
                    popular: false,
                },
            ],
            compliance: &["GDPR", "PSD2", "EU VAT"],
            tagline: "Sell across the EU with VAT handled for you",
        },
        Region {
            id: RegionId::SouthAsia,
            name: "South Asia",
            flag: "🌏",
            countries: &["India", "Pakistan", "Bangladesh", "Sri Lanka", "Nepal"],
            currency: Currency {
                code: "INR",
                symbol: "₹",
            },
            modules: south_asia_modules,
            addon_pricing: south_asia_pricing,
            payment_methods: &[
                PaymentMethod { name: "UPI", icon: "📲" },
                PaymentMethod { name: "JazzCash", icon: "📱" },
                PaymentMethod { name: "bKash", icon: "📱" },
                PaymentMethod { name: "Card", icon: "💳" },
                PaymentMethod { name: "Cash on Delivery", icon: "💵" },
            ],
            plans: &[
                PricingPlan {
                    name: "Starter",
                    price: "₹999/mo",
                    target: "Home businesses",
                    features: &["Online store", "GST invoicing", "WhatsApp orders"],
                    popular: true,
                },
                PricingPlan {
                    name: "Growth",
                    price: "₹2,999/mo",
                    target: "Shops going omnichannel",
                    features: &["Everything in Starter", "POS", "Analytics"],
                    popular: false,
                },
            ],
            compliance: &["GST", "DPDP"],
            tagline: "Start selling with UPI and GST built in",
        },
        Region {
            id: RegionId::Global,
            name: "Global",
            flag: "🌐",
            countries: &[
                "United States",
                "Canada",
                "Australia",
                "Singapore",
                "Japan",
                "Brazil",
                "South Africa",
            ],
            currency: Currency {
                code: "USD",
                symbol: "$",
            },
            modules: global_modules,
            addon_pricing: global_pricing,
            payment_methods: &[
                PaymentMethod { name: "Stripe", icon: "💳" },
                PaymentMethod { name: "PayPal", icon: "🅿️" },
                PaymentMethod { name: "Apple Pay", icon: "🍎" },
                PaymentMethod { name: "Google Pay", icon: "🤖" },
            ],
            plans: &[
                PricingPlan {
                    name: "Basic",
                    price: "$29/mo",
                    target: "Solo founders",
                    features: &["Online store", "Unlimited products"],
                    popular: false,
                },
                PricingPlan {
                    name: "Pro",
                    price: "$79/mo",
                    target: "Scaling brands",
                    features: &["Everything in Basic", "Inventory", "Multi-currency"],
                    popular: true,
                },
                PricingPlan {
                    name: "Enterprise",
                    price: "Contact sales",
                    target: "High-volume merchants",
                    features: &["Everything in Pro", "Dedicated infrastructure"],
                    popular: false,
                },
            ],
            compliance: &["PCI DSS", "SOC 2"],
            tagline: "One dashboard for selling anywhere",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regions_ordered_like_ids() {
        for (idx, id) in RegionId::ALL.iter().enumerate() {
            assert_eq!(regions()[idx].id, *id);
            assert_eq!(id.region().id, *id);
        }
    }

    #[test]
    fn test_lookup_every_listed_country() {
        for region in regions() {
            for country in region.countries {
                let found = lookup_region_by_country(country).unwrap();
                assert_eq!(found.id, region.id, "country {country}");
            }
        }
    }

    #[test]
    fn test_lookup_unknown_country() {
        assert!(lookup_region_by_country("Nonexistent Country").is_none());
        assert!(lookup_region_by_country("").is_none());
        // Exact match only
        assert!(lookup_region_by_country("saudi arabia").is_none());
    }

    #[test]
    fn test_saudi_arabia_is_mena_with_zatca() {
        let region = lookup_region_by_country("Saudi Arabia").unwrap();
        assert_eq!(region.id, RegionId::Mena);
        assert_ne!(region.status(ModuleId::Zatca), Some(ModuleStatus::NotApplicable));
        assert!(region.status(ModuleId::Zatca).is_some());
    }

    #[test]
    fn test_mena_ior_is_addon_with_price() {
        let mena = region(RegionId::Mena);
        assert_eq!(mena.status(ModuleId::Ior), Some(ModuleStatus::Addon));
        assert_eq!(mena.addon_price(ModuleId::Ior), Some(229));
        assert_eq!(mena.addon_price(ModuleId::Storefront), None);
    }

    #[test]
    fn test_global_leaves_compliance_unlisted() {
        let global = region(RegionId::Global);
        assert_eq!(global.status(ModuleId::Zatca), None);
        assert_eq!(global.modules_with_status(ModuleStatus::NotApplicable).count(), 0);
    }

    #[test]
    fn test_module_status_serializes_na() {
        let json = serde_json::to_string(&ModuleStatus::NotApplicable).unwrap();
        assert_eq!(json, "\"na\"");
    }

    #[test]
    fn test_region_parsing() {
        assert_eq!(RegionId::parse("south-asia"), Some(RegionId::SouthAsia));
        assert_eq!(RegionId::parse("MENA"), Some(RegionId::Mena));
        assert_eq!(RegionId::parse("antarctica"), None);
    }
}
