//! Entitlement state and its persisted representation
//!
//! [`EntitlementState`] is the one mutable entity of the entitlement system.
//! Its fields are private: the resolved region and country code are derived
//! from the country and can only change together with it, through
//! [`crate::transition::apply`].

use crate::storage::{KeyValueStorage, StateSlice};
use chrono::{DateTime, Utc};
use merchant_catalog::{
    country_code, lookup_region_by_country, BusinessPurpose, ModuleId, Region, RegionId,
    UNKNOWN_COUNTRY_CODE,
};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// The merchant session's resolved configuration.
///
/// # Examples
///
/// ```
/// use merchant_entitlements::EntitlementState;
///
/// let state = EntitlementState::default();
/// assert!(state.country().is_none());
/// assert!(state.region_id().is_none());
/// assert_eq!(state.country_code(), "??");
/// assert!(!state.is_onboarded());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct EntitlementState {
    country: Option<String>,
    region: Option<RegionId>,
    country_code: &'static str,
    purchased_addons: BTreeSet<ModuleId>,
    business_purpose: Option<BusinessPurpose>,
    onboarded: bool,
    updated_at: DateTime<Utc>,
}

impl Default for EntitlementState {
    fn default() -> Self {
        Self {
            country: None,
            region: None,
            country_code: UNKNOWN_COUNTRY_CODE,
            purchased_addons: BTreeSet::new(),
            business_purpose: None,
            onboarded: false,
            updated_at: Utc::now(),
        }
    }
}

impl EntitlementState {
    /// Selected country, `None` until one is chosen.
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// Region resolved from the country.
    pub fn region_id(&self) -> Option<RegionId> {
        self.region
    }

    /// Catalog entry of the resolved region.
    pub fn region(&self) -> Option<&'static Region> {
        self.region.map(|id| id.region())
    }

    /// ISO alpha-2 code of the country, `"??"` when unknown or unset.
    pub fn country_code(&self) -> &'static str {
        self.country_code
    }

    /// Purchased add-on modules.
    pub fn purchased_addons(&self) -> &BTreeSet<ModuleId> {
        &self.purchased_addons
    }

    /// Selected business vertical.
    pub fn business_purpose(&self) -> Option<BusinessPurpose> {
        self.business_purpose
    }

    /// Whether onboarding was completed.
    pub fn is_onboarded(&self) -> bool {
        self.onboarded
    }

    /// Time of the last mutation (or of loading).
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(crate) fn set_country(&mut self, country: Option<String>) {
        // Kept verbatim; only the empty string means unset
        let country = country.filter(|c| !c.is_empty());
        self.region = country
            .as_deref()
            .and_then(lookup_region_by_country)
            .map(|r| r.id);
        self.country_code = country
            .as_deref()
            .map(country_code)
            .unwrap_or(UNKNOWN_COUNTRY_CODE);
        self.country = country;
    }

    pub(crate) fn purchased_addons_mut(&mut self) -> &mut BTreeSet<ModuleId> {
        &mut self.purchased_addons
    }

    pub(crate) fn set_business_purpose(&mut self, purpose: Option<BusinessPurpose>) {
        self.business_purpose = purpose;
    }

    pub(crate) fn set_onboarded(&mut self, onboarded: bool) {
        self.onboarded = onboarded;
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    /// Load state from storage.
    ///
    /// Never fails: unreadable or malformed slices fall back to their
    /// defaults (no country, no add-ons, no vertical, not onboarded).
    pub fn load(storage: &dyn KeyValueStorage) -> Self {
        let mut state = Self::default();

        if let Some(country) = read_slice(storage, StateSlice::Country) {
            state.set_country(Some(country));
        }

        if let Some(raw) = read_slice(storage, StateSlice::PurchasedAddons) {
            state.purchased_addons = decode_addons(&raw);
        }

        if let Some(raw) = read_slice(storage, StateSlice::BusinessPurpose) {
            state.business_purpose = BusinessPurpose::parse(&raw);
            if state.business_purpose.is_none() {
                warn!(value = %raw, "Ignoring unknown persisted business purpose");
            }
        }

        state.onboarded =
            read_slice(storage, StateSlice::Onboarded).as_deref() == Some("true");

        debug!(
            country = ?state.country,
            region = ?state.region,
            addons = state.purchased_addons.len(),
            onboarded = state.onboarded,
            "Loaded entitlement state"
        );

        state
    }

    /// Persisted form of a slice, `None` when the key should be absent.
    pub fn encode_slice(&self, slice: StateSlice) -> Option<String> {
        match slice {
            StateSlice::Country => self.country.clone(),
            StateSlice::PurchasedAddons => {
                let ids: Vec<&str> = self.purchased_addons.iter().map(|m| m.as_str()).collect();
                // A Vec<&str> always serializes
                Some(serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string()))
            }
            StateSlice::BusinessPurpose => self.business_purpose.map(|p| p.as_str().to_string()),
            StateSlice::Onboarded => self.onboarded.then(|| "true".to_string()),
        }
    }
}

fn read_slice(storage: &dyn KeyValueStorage, slice: StateSlice) -> Option<String> {
    match storage.get(slice.key()) {
        Ok(value) => value,
        Err(e) => {
            debug!(key = slice.key(), error = %e, "Storage read failed, using default");
            None
        }
    }
}

/// Decode the persisted add-on list. Unknown ids are dropped.
fn decode_addons(raw: &str) -> BTreeSet<ModuleId> {
    let ids: Vec<String> = match serde_json::from_str(raw) {
        Ok(ids) => ids,
        Err(e) => {
            warn!(error = %e, "Ignoring malformed persisted add-on list");
            return BTreeSet::new();
        }
    };

    ids.iter()
        .filter_map(|id| {
            let parsed = ModuleId::parse(id);
            if parsed.is_none() {
                warn!(module = %id, "Ignoring unknown persisted add-on");
            }
            parsed
        })
        .collect()
}
