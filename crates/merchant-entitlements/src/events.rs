//! Entitlement change events
//!
//! Every store mutation broadcasts one [`EntitlementEvent`] in addition to
//! invoking the plain change listeners. Consumers that need to know *what*
//! changed (analytics, audit, sidebar animations) subscribe to these.

use chrono::{DateTime, Utc};
use merchant_catalog::{BusinessPurpose, ModuleId, RegionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// What a mutation changed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntitlementChange {
    /// Country was set; region is the freshly resolved one
    CountryChanged {
        country: Option<String>,
        region: Option<RegionId>,
    },
    /// Business vertical was selected
    BusinessPurposeChanged { purpose: BusinessPurpose },
    /// Onboarding was completed
    OnboardingCompleted,
    /// An add-on was purchased
    AddonPurchased { module: ModuleId },
    /// An add-on was removed
    AddonRemoved { module: ModuleId },
    /// The purchased set was replaced by a module-status refresh
    AddonsReplaced { modules: BTreeSet<ModuleId> },
    /// All state was cleared
    Reset,
}

impl EntitlementChange {
    /// Event type string, e.g. `"addon_purchased"`.
    pub fn event_type(&self) -> &'static str {
        match self {
            EntitlementChange::CountryChanged { .. } => "country_changed",
            EntitlementChange::BusinessPurposeChanged { .. } => "business_purpose_changed",
            EntitlementChange::OnboardingCompleted => "onboarding_completed",
            EntitlementChange::AddonPurchased { .. } => "addon_purchased",
            EntitlementChange::AddonRemoved { .. } => "addon_removed",
            EntitlementChange::AddonsReplaced { .. } => "addons_replaced",
            EntitlementChange::Reset => "reset",
        }
    }
}

/// Event envelope broadcast by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitlementEvent {
    /// Unique event ID
    pub id: Uuid,

    /// What changed
    pub change: EntitlementChange,

    /// Timestamp of the mutation
    pub timestamp: DateTime<Utc>,
}

impl EntitlementEvent {
    /// Create a new event.
    pub fn new(change: EntitlementChange, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            change,
            timestamp,
        }
    }

    /// Get the topic for this event.
    ///
    /// Topics are structured as: `entitlements.{event_type}`
    pub fn topic(&self) -> String {
        format!("entitlements.{}", self.change.event_type())
    }
}
