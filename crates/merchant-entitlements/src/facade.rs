//! Read-only entitlement queries
//!
//! [`EntitlementView`] wraps one state snapshot and answers the questions UI
//! code asks: is this module visible, is it locked behind a purchase, what
//! does it cost. Every answer is recomputed from the snapshot on each call,
//! so a view can never disagree with the state it was taken from.

use crate::state::EntitlementState;
use merchant_catalog::{Currency, ModuleId, ModuleStatus};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Effective status of a module for the current merchant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ModuleAvailability {
    /// Included, either by the region or because it was purchased
    Core,
    /// Purchasable add-on, not yet purchased
    Addon,
    /// Not offered in the merchant's region
    #[serde(rename = "na")]
    NotApplicable,
    /// The region does not list the module at all
    Unlisted,
    /// No region resolved yet (no country, or an unknown one)
    Unresolved,
}

impl ModuleAvailability {
    /// String form used by the dashboard: `core`, `addon`, `na` or `unknown`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleAvailability::Core => "core",
            ModuleAvailability::Addon => "addon",
            ModuleAvailability::NotApplicable => "na",
            ModuleAvailability::Unlisted | ModuleAvailability::Unresolved => "unknown",
        }
    }
}

impl fmt::Display for ModuleAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ModuleStatus> for ModuleAvailability {
    fn from(status: ModuleStatus) -> Self {
        match status {
            ModuleStatus::Core => ModuleAvailability::Core,
            ModuleStatus::Addon => ModuleAvailability::Addon,
            ModuleStatus::NotApplicable => ModuleAvailability::NotApplicable,
        }
    }
}

/// An add-on the merchant can still buy.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct AddonOffer {
    pub module: ModuleId,
    /// Monthly price in `currency` major units
    pub price: u32,
    pub currency: Currency,
}

/// Derived, read-only queries over an entitlement snapshot.
///
/// # Examples
///
/// ```
/// use merchant_entitlements::{EntitlementStore, MemoryStorage, ModuleAvailability};
/// use merchant_catalog::ModuleId;
/// use std::sync::Arc;
///
/// let store = EntitlementStore::new(Arc::new(MemoryStorage::new()));
///
/// // Nothing resolved yet: everything is shown
/// assert!(store.view().is_module_available(ModuleId::Ior));
///
/// store.set_country("Saudi Arabia");
/// assert_eq!(store.view().module_status(ModuleId::Ior), ModuleAvailability::Addon);
///
/// store.purchase_addon(ModuleId::Ior);
/// assert_eq!(store.view().module_status(ModuleId::Ior), ModuleAvailability::Core);
/// ```
#[derive(Debug, Clone)]
pub struct EntitlementView {
    state: Arc<EntitlementState>,
}

impl EntitlementView {
    /// Create a view over a snapshot.
    pub fn new(state: Arc<EntitlementState>) -> Self {
        Self { state }
    }

    /// The underlying snapshot.
    pub fn state(&self) -> &EntitlementState {
        &self.state
    }

    /// Whether a module should be shown.
    ///
    /// With no resolved region everything is shown. Purchased modules are
    /// always shown. Otherwise the module must be listed by the region with
    /// a status other than `na`.
    pub fn is_module_available(&self, module: ModuleId) -> bool {
        let Some(region) = self.state.region() else {
            return true;
        };
        if self.is_addon_purchased(module) {
            return true;
        }
        matches!(
            region.status(module),
            Some(ModuleStatus::Core) | Some(ModuleStatus::Addon)
        )
    }

    /// Effective status of a module.
    pub fn module_status(&self, module: ModuleId) -> ModuleAvailability {
        let Some(region) = self.state.region() else {
            return ModuleAvailability::Unresolved;
        };
        if self.is_addon_purchased(module) {
            return ModuleAvailability::Core;
        }
        region
            .status(module)
            .map(ModuleAvailability::from)
            .unwrap_or(ModuleAvailability::Unlisted)
    }

    /// Whether a module is in the purchased add-on set.
    pub fn is_addon_purchased(&self, module: ModuleId) -> bool {
        self.state.purchased_addons().contains(&module)
    }

    /// All modules that should be shown, in catalog order.
    pub fn available_modules(&self) -> Vec<ModuleId> {
        ModuleId::ALL
            .into_iter()
            .filter(|m| self.is_module_available(*m))
            .collect()
    }

    /// Modules shown but locked: add-ons of the region not yet purchased.
    pub fn purchasable_addons(&self) -> Vec<AddonOffer> {
        let Some(region) = self.state.region() else {
            return Vec::new();
        };
        region
            .modules_with_status(ModuleStatus::Addon)
            .filter(|m| !self.is_addon_purchased(*m))
            .filter_map(|module| {
                region.addon_price(module).map(|price| AddonOffer {
                    module,
                    price,
                    currency: region.currency,
                })
            })
            .collect()
    }

    /// Monthly price of an add-on in the merchant's region.
    ///
    /// `None` when no region is resolved or the module is not an add-on there.
    pub fn addon_price(&self, module: ModuleId) -> Option<u32> {
        self.state.region()?.addon_price(module)
    }

    /// Sum of the monthly prices of purchased add-ons.
    ///
    /// Purchased modules that the region includes as core (or does not price)
    /// cost nothing.
    pub fn monthly_addon_total(&self) -> u32 {
        self.state
            .purchased_addons()
            .iter()
            .filter_map(|m| self.addon_price(*m))
            .sum()
    }

    /// Pricing currency of the resolved region.
    pub fn currency(&self) -> Option<Currency> {
        self.state.region().map(|r| r.currency)
    }

    /// Modules recommended for the merchant's vertical that are available.
    pub fn recommended_modules(&self) -> Vec<ModuleId> {
        self.state
            .business_purpose()
            .map(|purpose| {
                purpose
                    .recommended_modules()
                    .iter()
                    .copied()
                    .filter(|m| self.is_module_available(*m))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::{apply, EntitlementAction};
    use chrono::Utc;
    use merchant_catalog::{lookup_region_by_country, region, BusinessPurpose, RegionId};

    fn view_after(actions: &[EntitlementAction]) -> EntitlementView {
        let mut state = EntitlementState::default();
        for action in actions {
            state = apply(&state, action, Utc::now()).state;
        }
        EntitlementView::new(Arc::new(state))
    }

    #[test]
    fn test_unresolved_region_shows_everything() {
        let view = view_after(&[]);
        for module in ModuleId::ALL {
            assert!(view.is_module_available(module));
            assert_eq!(view.module_status(module), ModuleAvailability::Unresolved);
        }
        assert_eq!(view.module_status(ModuleId::Ior).as_str(), "unknown");
    }

    #[test]
    fn test_unknown_country_shows_everything() {
        let view = view_after(&[EntitlementAction::SetCountry("Nonexistent Country".into())]);
        assert!(view.is_module_available(ModuleId::Zatca));
        assert!(view.currency().is_none());
    }

    #[test]
    fn test_mena_ior_addon_then_purchased() {
        let view = view_after(&[EntitlementAction::SetCountry("Saudi Arabia".into())]);
        assert_eq!(view.module_status(ModuleId::Ior), ModuleAvailability::Addon);
        assert!(!view.is_addon_purchased(ModuleId::Ior));

        let view = view_after(&[
            EntitlementAction::SetCountry("Saudi Arabia".into()),
            EntitlementAction::PurchaseAddon(ModuleId::Ior),
        ]);
        assert_eq!(view.module_status(ModuleId::Ior), ModuleAvailability::Core);
        assert!(view.is_addon_purchased(ModuleId::Ior));
    }

    #[test]
    fn test_purchase_overrides_na() {
        let view = view_after(&[
            EntitlementAction::SetCountry("Germany".into()),
            EntitlementAction::PurchaseAddon(ModuleId::Zatca),
        ]);
        assert_eq!(
            region(RegionId::Europe).status(ModuleId::Zatca),
            Some(ModuleStatus::NotApplicable)
        );
        assert!(view.is_module_available(ModuleId::Zatca));
        assert_eq!(view.module_status(ModuleId::Zatca), ModuleAvailability::Core);
    }

    #[test]
    fn test_availability_matches_region_status_when_not_purchased() {
        for country in ["Saudi Arabia", "France", "India", "Canada"] {
            let view = view_after(&[EntitlementAction::SetCountry(country.into())]);
            let region = lookup_region_by_country(country).unwrap();
            for module in ModuleId::ALL {
                let expected = !matches!(
                    region.status(module),
                    None | Some(ModuleStatus::NotApplicable)
                );
                assert_eq!(view.is_module_available(module), expected, "{country}/{module}");
            }
        }
    }

    #[test]
    fn test_unlisted_module_is_unknown_and_hidden() {
        let view = view_after(&[EntitlementAction::SetCountry("Canada".into())]);
        assert_eq!(view.module_status(ModuleId::Zatca), ModuleAvailability::Unlisted);
        assert!(!view.is_module_available(ModuleId::Zatca));
    }

    #[test]
    fn test_purchasable_addons_exclude_purchased() {
        let view = view_after(&[
            EntitlementAction::SetCountry("Saudi Arabia".into()),
            EntitlementAction::PurchaseAddon(ModuleId::Crm),
        ]);
        let offers = view.purchasable_addons();
        assert!(offers.iter().any(|o| o.module == ModuleId::Ior && o.price == 229));
        assert!(!offers.iter().any(|o| o.module == ModuleId::Crm));
        assert!(offers.iter().all(|o| o.currency.code == "SAR"));
    }

    #[test]
    fn test_monthly_addon_total() {
        let view = view_after(&[
            EntitlementAction::SetCountry("Saudi Arabia".into()),
            EntitlementAction::PurchaseAddon(ModuleId::Ior),
            EntitlementAction::PurchaseAddon(ModuleId::Crm),
            // Core in MENA, so free
            EntitlementAction::PurchaseAddon(ModuleId::Pos),
        ]);
        assert_eq!(view.monthly_addon_total(), 229 + 79);
        assert_eq!(view.addon_price(ModuleId::Pos), None);
    }

    #[test]
    fn test_recommended_modules_filtered_by_availability() {
        let view = view_after(&[
            EntitlementAction::SetCountry("Germany".into()),
            EntitlementAction::SetBusinessPurpose(BusinessPurpose::Ior),
        ]);
        // IOR is `na` in Europe
        let recommended = view.recommended_modules();
        assert!(!recommended.contains(&ModuleId::Ior));
        assert!(recommended.contains(&ModuleId::Orders));

        assert!(view_after(&[]).recommended_modules().is_empty());
    }

    #[test]
    fn test_available_modules_with_region() {
        let view = view_after(&[EntitlementAction::SetCountry("India".into())]);
        let available = view.available_modules();
        assert!(available.contains(&ModuleId::GstInvoicing));
        assert!(!available.contains(&ModuleId::Zatca));
    }
}
