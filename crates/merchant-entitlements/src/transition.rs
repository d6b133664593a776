//! Pure state transitions
//!
//! `apply` maps (current state, action) to the next state, the slices that
//! must be written to storage, and the change to announce. It performs no
//! I/O, so every rule of the entitlement model is testable without a store.

use crate::events::EntitlementChange;
use crate::state::EntitlementState;
use crate::storage::StateSlice;
use chrono::{DateTime, Utc};
use merchant_catalog::{BusinessPurpose, ModuleId};
use std::collections::BTreeSet;

/// A requested mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntitlementAction {
    /// Select a country (the empty string clears it)
    SetCountry(String),
    /// Select a business vertical
    SetBusinessPurpose(BusinessPurpose),
    /// Mark onboarding complete
    CompleteOnboarding,
    /// Add a module to the purchased set
    PurchaseAddon(ModuleId),
    /// Remove a module from the purchased set
    RemoveAddon(ModuleId),
    /// Replace the purchased set wholesale
    ReplaceAddons(BTreeSet<ModuleId>),
    /// Clear everything (logout)
    Reset,
}

/// Result of applying an action.
#[derive(Debug, Clone)]
pub struct Transition {
    /// The next state
    pub state: EntitlementState,
    /// Slices to persist from `state`
    pub dirty: Vec<StateSlice>,
    /// Change to announce
    pub change: EntitlementChange,
}

/// Apply an action to a state.
///
/// Slices are reported dirty whenever the action targets them, even if the
/// value did not change (purchasing an owned add-on still persists).
pub fn apply(current: &EntitlementState, action: &EntitlementAction, now: DateTime<Utc>) -> Transition {
    let mut state = current.clone();

    let (dirty, change) = match action {
        EntitlementAction::SetCountry(country) => {
            state.set_country(Some(country.clone()));
            (
                vec![StateSlice::Country],
                EntitlementChange::CountryChanged {
                    country: state.country().map(str::to_string),
                    region: state.region_id(),
                },
            )
        }
        EntitlementAction::SetBusinessPurpose(purpose) => {
            state.set_business_purpose(Some(*purpose));
            (
                vec![StateSlice::BusinessPurpose],
                EntitlementChange::BusinessPurposeChanged { purpose: *purpose },
            )
        }
        EntitlementAction::CompleteOnboarding => {
            state.set_onboarded(true);
            (vec![StateSlice::Onboarded], EntitlementChange::OnboardingCompleted)
        }
        EntitlementAction::PurchaseAddon(module) => {
            state.purchased_addons_mut().insert(*module);
            (
                vec![StateSlice::PurchasedAddons],
                EntitlementChange::AddonPurchased { module: *module },
            )
        }
        EntitlementAction::RemoveAddon(module) => {
            state.purchased_addons_mut().remove(module);
            (
                vec![StateSlice::PurchasedAddons],
                EntitlementChange::AddonRemoved { module: *module },
            )
        }
        EntitlementAction::ReplaceAddons(modules) => {
            *state.purchased_addons_mut() = modules.clone();
            (
                vec![StateSlice::PurchasedAddons],
                EntitlementChange::AddonsReplaced {
                    modules: modules.clone(),
                },
            )
        }
        EntitlementAction::Reset => {
            state = EntitlementState::default();
            (StateSlice::ALL.to_vec(), EntitlementChange::Reset)
        }
    };

    state.touch(now);

    Transition {
        state,
        dirty,
        change,
    }
}
