//! Integration tests for the entitlement store.
//!
//! These tests drive the store through its public API only: onboarding
//! scenarios, reloads from durable storage, module refreshes against
//! scripted sources, and concurrent use.
//!
//! Scenarios:
//! 1. Saudi merchant resolves to MENA with ZATCA included
//! 2. IOR add-on is locked until purchased
//! 3. No country means every module is shown
//! 4. Unknown country resolves to no region
//! 5. Failed refresh leaves purchased add-ons untouched

use async_trait::async_trait;
use merchant_catalog::{BusinessPurpose, ModuleId, ModuleStatus, RegionId};
use merchant_entitlements::{
    EntitlementConfig, EntitlementError, EntitlementStore, KeyValueStorage, MemoryStorage,
    ModuleAvailability, ModuleSourceError, ModuleStatusRecord, ModuleStatusSource,
    RefreshOutcome,
};
use std::collections::{BTreeSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// Source that always fails.
struct FailingSource;

#[async_trait]
impl ModuleStatusSource for FailingSource {
    async fn fetch_module_statuses(&self) -> Result<Vec<ModuleStatusRecord>, ModuleSourceError> {
        Err(ModuleSourceError::new("connection refused"))
    }
}

/// Source that returns a fixed list.
struct FixedSource(Vec<ModuleStatusRecord>);

#[async_trait]
impl ModuleStatusSource for FixedSource {
    async fn fetch_module_statuses(&self) -> Result<Vec<ModuleStatusRecord>, ModuleSourceError> {
        Ok(self.0.clone())
    }
}

/// Source whose responses are released by the test, one per call.
struct GatedSource {
    gates: Mutex<VecDeque<oneshot::Receiver<Vec<ModuleStatusRecord>>>>,
    started: AtomicUsize,
}

impl GatedSource {
    fn new(gates: Vec<oneshot::Receiver<Vec<ModuleStatusRecord>>>) -> Self {
        Self {
            gates: Mutex::new(gates.into()),
            started: AtomicUsize::new(0),
        }
    }

    async fn wait_for_calls(&self, calls: usize) {
        while self.started.load(Ordering::SeqCst) < calls {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl ModuleStatusSource for GatedSource {
    async fn fetch_module_statuses(&self) -> Result<Vec<ModuleStatusRecord>, ModuleSourceError> {
        let gate = self.gates.lock().unwrap().pop_front();
        self.started.fetch_add(1, Ordering::SeqCst);
        match gate {
            Some(rx) => rx.await.map_err(ModuleSourceError::new),
            None => Err(ModuleSourceError::new("no response scripted")),
        }
    }
}

fn memory_store() -> EntitlementStore {
    EntitlementStore::new(Arc::new(MemoryStorage::new()))
}

fn active(keys: &[&str]) -> Vec<ModuleStatusRecord> {
    keys.iter().map(|k| ModuleStatusRecord::new(*k, true)).collect()
}

// =============================================================================
// Onboarding scenarios
// =============================================================================

#[test]
fn test_saudi_merchant_resolves_to_mena() {
    let store = memory_store();
    store.set_country("Saudi Arabia");

    let state = store.snapshot();
    assert_eq!(state.region_id(), Some(RegionId::Mena));
    assert_eq!(state.region_id().map(|r| r.as_str()), Some("mena"));
    assert_eq!(state.country_code(), "SA");

    let view = store.view();
    assert!(view.is_module_available(ModuleId::Zatca));
    assert_ne!(
        state.region().and_then(|r| r.status(ModuleId::Zatca)),
        Some(ModuleStatus::NotApplicable)
    );
}

#[test]
fn test_ior_addon_unlocks_after_purchase() {
    let store = memory_store();
    store.set_country("Saudi Arabia");

    assert_eq!(store.view().module_status(ModuleId::Ior), ModuleAvailability::Addon);
    assert_eq!(store.view().module_status(ModuleId::Ior).as_str(), "addon");
    assert!(!store.view().is_addon_purchased(ModuleId::Ior));

    store.purchase_addon(ModuleId::Ior);

    let view = store.view();
    assert_eq!(view.module_status(ModuleId::Ior), ModuleAvailability::Core);
    assert!(view.is_addon_purchased(ModuleId::Ior));
    assert_eq!(view.monthly_addon_total(), 229);
}

#[test]
fn test_no_country_shows_everything() {
    let store = memory_store();
    let view = store.view();

    assert!(store.snapshot().region_id().is_none());
    for module in ModuleId::ALL {
        assert!(view.is_module_available(module));
    }
    assert_eq!(view.module_status(ModuleId::Pos).as_str(), "unknown");
    // Identifiers outside the catalog never reach the view
    assert!(ModuleId::parse("anything-unknown-id").is_none());
}

#[test]
fn test_unknown_country_has_no_region() {
    let store = memory_store();
    store.set_country("Nonexistent Country");

    let state = store.snapshot();
    assert_eq!(state.country(), Some("Nonexistent Country"));
    assert!(state.region_id().is_none());
    assert_eq!(state.country_code(), "??");
    assert!(store.view().is_module_available(ModuleId::Zatca));
}

#[test]
fn test_full_onboarding_flow() {
    let store = memory_store();

    store.set_country("India");
    store.set_business_purpose(BusinessPurpose::Restaurant);
    store.purchase_addon(ModuleId::KitchenDisplay);
    store.complete_onboarding();
    store.complete_onboarding();

    let state = store.snapshot();
    assert!(state.is_onboarded());
    assert_eq!(state.business_purpose(), Some(BusinessPurpose::Restaurant));

    let view = store.view();
    assert!(view.is_module_available(ModuleId::GstInvoicing));
    assert!(!view.is_module_available(ModuleId::Zatca));
    assert_eq!(view.currency().map(|c| c.code), Some("INR"));
    assert!(view.recommended_modules().contains(&ModuleId::KitchenDisplay));
}

#[test]
fn test_addon_set_semantics() {
    let store = memory_store();

    store.purchase_addon(ModuleId::Crm);
    store.purchase_addon(ModuleId::Crm);
    assert_eq!(store.snapshot().purchased_addons().len(), 1);

    store.remove_addon(ModuleId::Loyalty);
    assert_eq!(
        store.snapshot().purchased_addons(),
        &BTreeSet::from([ModuleId::Crm])
    );
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_state_survives_reload_from_shared_storage() {
    let storage = Arc::new(MemoryStorage::new());

    let store = EntitlementStore::new(storage.clone());
    store.set_country("Saudi Arabia");
    store.purchase_addon(ModuleId::Ior);
    store.set_business_purpose(BusinessPurpose::Ior);
    store.complete_onboarding();
    let before = store.snapshot();
    drop(store);

    let reloaded = EntitlementStore::new(storage);
    let after = reloaded.snapshot();
    assert_eq!(after.country(), before.country());
    assert_eq!(after.region_id(), before.region_id());
    assert_eq!(after.purchased_addons(), before.purchased_addons());
    assert_eq!(after.business_purpose(), before.business_purpose());
    assert!(after.is_onboarded());
}

#[test]
fn test_country_is_persisted_exactly_as_given() {
    let storage = Arc::new(MemoryStorage::new());

    let store = EntitlementStore::new(storage.clone());
    store.set_country(" Saudi Arabia ");
    assert!(store.snapshot().region_id().is_none());
    assert_eq!(store.snapshot().country_code(), "??");
    assert_eq!(
        storage.get("merchantCountry").unwrap(),
        Some(" Saudi Arabia ".to_string())
    );
    drop(store);

    let reloaded = EntitlementStore::new(storage.clone());
    assert_eq!(reloaded.snapshot().country(), Some(" Saudi Arabia "));
    assert!(reloaded.snapshot().region_id().is_none());

    // The empty string clears the country
    reloaded.set_country("");
    assert!(reloaded.snapshot().country().is_none());
    assert_eq!(storage.get("merchantCountry").unwrap(), None);
}

#[test]
fn test_state_survives_reload_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = EntitlementConfig::default().with_storage_dir(dir.path());

    let store = EntitlementStore::from_config(&config);
    store.set_country("Germany");
    store.purchase_addon(ModuleId::MultiCurrency);
    drop(store);

    let reloaded = EntitlementStore::from_config(&config);
    let state = reloaded.snapshot();
    assert_eq!(state.country(), Some("Germany"));
    assert_eq!(state.region_id(), Some(RegionId::Europe));
    assert!(state.purchased_addons().contains(&ModuleId::MultiCurrency));

    reloaded.reset();
    let cleared = EntitlementStore::from_config(&config);
    assert!(cleared.snapshot().country().is_none());
    assert!(cleared.snapshot().purchased_addons().is_empty());
}

#[test]
fn test_legacy_storage_values_are_tolerated() {
    let storage = Arc::new(MemoryStorage::with_entries([
        ("merchantCountry", "Kuwait"),
        ("purchasedAddons", r#"["crm","retired_module"]"#),
        ("businessPurpose", "ecommerce"),
    ]));

    let store = EntitlementStore::new(storage.clone());
    let state = store.snapshot();
    assert_eq!(state.region_id(), Some(RegionId::Mena));
    assert_eq!(state.purchased_addons(), &BTreeSet::from([ModuleId::Crm]));
    assert!(!state.is_onboarded());

    // The next write drops the unknown id from storage too
    store.purchase_addon(ModuleId::Loyalty);
    assert_eq!(
        storage.get("purchasedAddons").unwrap(),
        Some(r#"["crm","loyalty"]"#.to_string())
    );
}

// =============================================================================
// Module refresh
// =============================================================================

#[tokio::test]
async fn test_failed_refresh_keeps_addons() {
    let store = memory_store().with_module_source(Arc::new(FailingSource));
    store.purchase_addon(ModuleId::Ior);
    store.purchase_addon(ModuleId::Crm);
    let before = store.snapshot().purchased_addons().clone();

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let _sub = store.subscribe(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let err = store.refresh_modules().await.unwrap_err();
    assert!(matches!(err, EntitlementError::Refresh(_)));
    assert!(err.is_retryable());
    assert_eq!(store.snapshot().purchased_addons(), &before);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_refresh_replaces_addons_with_active_modules() {
    let records = vec![
        ModuleStatusRecord::new("ior", true),
        ModuleStatusRecord::new("loyalty", true),
        ModuleStatusRecord::new("crm", false),
        ModuleStatusRecord::new("drone_delivery", true),
    ];
    let store = memory_store().with_module_source(Arc::new(FixedSource(records)));
    store.purchase_addon(ModuleId::Crm);

    let outcome = store.refresh_modules().await.unwrap();
    assert_eq!(
        outcome,
        RefreshOutcome::Applied {
            active: 2,
            unknown: vec!["drone_delivery".to_string()],
        }
    );
    assert_eq!(
        store.snapshot().purchased_addons(),
        &BTreeSet::from([ModuleId::Ior, ModuleId::Loyalty])
    );
}

#[tokio::test]
async fn test_stale_refresh_is_discarded() {
    let (first_tx, first_rx) = oneshot::channel();
    let (second_tx, second_rx) = oneshot::channel();
    let source = Arc::new(GatedSource::new(vec![first_rx, second_rx]));
    let store = Arc::new(memory_store().with_module_source(source.clone()));

    let first = tokio::spawn({
        let store = store.clone();
        async move { store.refresh_modules().await }
    });
    source.wait_for_calls(1).await;

    let second = tokio::spawn({
        let store = store.clone();
        async move { store.refresh_modules().await }
    });
    source.wait_for_calls(2).await;

    // The newer request resolves first
    second_tx.send(active(&["ior"])).unwrap();
    let outcome = second.await.unwrap().unwrap();
    assert!(matches!(outcome, RefreshOutcome::Applied { active: 1, .. }));

    // The older one resolves last and must not win
    first_tx.send(active(&["crm", "erp"])).unwrap();
    let outcome = first.await.unwrap().unwrap();
    assert_eq!(outcome, RefreshOutcome::Superseded { generation: 1 });

    assert_eq!(
        store.snapshot().purchased_addons(),
        &BTreeSet::from([ModuleId::Ior])
    );
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_purchases_are_all_kept() {
    let store = memory_store();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let _sub = store.subscribe(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let modules = [
        ModuleId::Crm,
        ModuleId::Erp,
        ModuleId::Loyalty,
        ModuleId::Marketing,
        ModuleId::Analytics,
        ModuleId::Branches,
    ];

    std::thread::scope(|scope| {
        for module in modules {
            let store = &store;
            scope.spawn(move || store.purchase_addon(module));
        }
    });

    assert_eq!(store.snapshot().purchased_addons().len(), modules.len());
    assert_eq!(calls.load(Ordering::SeqCst), modules.len());
}

#[tokio::test]
async fn test_event_stream_follows_mutation_order() {
    let store = memory_store();
    let mut events = store.events();

    store.set_country("Oman");
    store.purchase_addon(ModuleId::Ior);
    store.reset();

    let topics: Vec<String> = vec![
        events.recv().await.unwrap().topic(),
        events.recv().await.unwrap().topic(),
        events.recv().await.unwrap().topic(),
    ];
    assert_eq!(
        topics,
        vec![
            "entitlements.country_changed",
            "entitlements.addon_purchased",
            "entitlements.reset",
        ]
    );
}
