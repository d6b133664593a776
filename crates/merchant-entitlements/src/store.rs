//! Observable entitlement store
//!
//! The store owns the entitlement state of one merchant session. Mutations
//! run the pure transition, persist the slices it touched, publish the new
//! snapshot, broadcast the change event and then notify listeners, in that
//! order.
//!
//! # Concurrency
//!
//! Writers are serialized by a mutex; readers take the current snapshot
//! (`Arc<EntitlementState>`) without waiting on storage I/O. Events are sent
//! while the write lock is held, so the event stream is in commit order.
//! Listeners run after all locks are released, so they may read the store or
//! even mutate it again.

use crate::config::EntitlementConfig;
use crate::error::{EntitlementError, EntitlementResult};
use crate::events::EntitlementEvent;
use crate::facade::EntitlementView;
use crate::source::{active_modules, ModuleStatusSource};
use crate::state::EntitlementState;
use crate::storage::{FileStorage, KeyValueStorage, MemoryStorage, StateSlice};
use crate::transition::{apply, EntitlementAction};
use chrono::Utc;
use merchant_catalog::{BusinessPurpose, ModuleId};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

type Listener = Arc<dyn Fn() + Send + Sync>;
type ListenerMap = Mutex<HashMap<Uuid, Listener>>;

/// Handle for a registered change listener.
///
/// Dropping the handle does not unregister the listener; call
/// [`Subscription::unsubscribe`].
#[derive(Debug)]
pub struct Subscription {
    id: Uuid,
    listeners: Weak<ListenerMap>,
}

impl Subscription {
    /// Subscription ID.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Remove the listener.
    ///
    /// Returns `false` if it was already removed or the store is gone.
    pub fn unsubscribe(self) -> bool {
        match self.listeners.upgrade() {
            Some(listeners) => listeners.lock().remove(&self.id).is_some(),
            None => false,
        }
    }
}

/// Result of a successful `refresh_modules` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The purchased set was replaced
    Applied {
        /// Number of active modules now purchased
        active: usize,
        /// Active module keys that are not in the catalog
        unknown: Vec<String>,
    },
    /// A newer refresh started before this one resolved; its result was discarded
    Superseded { generation: u64 },
}

/// Entitlement store for one merchant session.
///
/// There is deliberately no process-wide instance: create one store per
/// session and share it with `Arc`.
///
/// # Examples
///
/// ```
/// use merchant_entitlements::{EntitlementStore, MemoryStorage};
/// use merchant_catalog::{ModuleId, RegionId};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// let store = EntitlementStore::new(Arc::new(MemoryStorage::new()));
///
/// let calls = Arc::new(AtomicUsize::new(0));
/// let counter = calls.clone();
/// let subscription = store.subscribe(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// store.set_country("Saudi Arabia");
/// assert_eq!(store.snapshot().region_id(), Some(RegionId::Mena));
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
///
/// subscription.unsubscribe();
/// store.purchase_addon(ModuleId::Ior);
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// ```
pub struct EntitlementStore {
    /// Durable slice storage
    storage: Arc<dyn KeyValueStorage>,
    /// Current snapshot
    state: RwLock<Arc<EntitlementState>>,
    /// Serializes mutations
    write_lock: Mutex<()>,
    /// Change listeners
    listeners: Arc<ListenerMap>,
    /// Typed change events
    events: broadcast::Sender<EntitlementEvent>,
    /// Authoritative module-status provider
    source: Option<Arc<dyn ModuleStatusSource>>,
    /// Generation of the most recently started refresh
    refresh_generation: AtomicU64,
}

impl std::fmt::Debug for EntitlementStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntitlementStore")
            .field("state", &self.snapshot())
            .field("listeners", &self.listeners.lock().len())
            .field("has_source", &self.source.is_some())
            .finish()
    }
}

impl EntitlementStore {
    /// Create a store, loading any persisted state from `storage`.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_event_capacity(storage, EntitlementConfig::default().event_capacity)
    }

    /// Create with a custom event channel capacity.
    pub fn with_event_capacity(storage: Arc<dyn KeyValueStorage>, capacity: usize) -> Self {
        let state = EntitlementState::load(storage.as_ref());
        let (events, _) = broadcast::channel(capacity.max(1));

        Self {
            storage,
            state: RwLock::new(Arc::new(state)),
            write_lock: Mutex::new(()),
            listeners: Arc::new(Mutex::new(HashMap::new())),
            events,
            source: None,
            refresh_generation: AtomicU64::new(0),
        }
    }

    /// Create a store from configuration.
    ///
    /// If the storage directory cannot be opened the store falls back to
    /// in-memory storage rather than failing.
    pub fn from_config(config: &EntitlementConfig) -> Self {
        let storage: Arc<dyn KeyValueStorage> = match &config.storage_dir {
            Some(dir) => match FileStorage::open(dir) {
                Ok(storage) => Arc::new(storage),
                Err(e) => {
                    warn!(
                        dir = %dir.display(),
                        error = %e,
                        "Storage directory unavailable, keeping entitlements in memory"
                    );
                    Arc::new(MemoryStorage::new())
                }
            },
            None => Arc::new(MemoryStorage::new()),
        };

        Self::with_event_capacity(storage, config.event_capacity)
    }

    /// Attach the module-status source used by [`Self::refresh_modules`].
    pub fn with_module_source(mut self, source: Arc<dyn ModuleStatusSource>) -> Self {
        self.source = Some(source);
        self
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Current state. The snapshot is immutable; later mutations produce a
    /// new one.
    pub fn snapshot(&self) -> Arc<EntitlementState> {
        self.state.read().clone()
    }

    /// Derived queries over the current snapshot.
    pub fn view(&self) -> EntitlementView {
        EntitlementView::new(self.snapshot())
    }

    /// Register a listener called once after every mutation.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = Uuid::now_v7();
        self.listeners.lock().insert(id, Arc::new(listener));

        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Receive typed change events from now on.
    pub fn events(&self) -> broadcast::Receiver<EntitlementEvent> {
        self.events.subscribe()
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Select the merchant's country. The region is resolved immediately.
    #[instrument(skip(self, country))]
    pub fn set_country(&self, country: impl Into<String>) {
        self.dispatch(EntitlementAction::SetCountry(country.into()));
    }

    /// Select the merchant's business vertical.
    #[instrument(skip(self))]
    pub fn set_business_purpose(&self, purpose: BusinessPurpose) {
        self.dispatch(EntitlementAction::SetBusinessPurpose(purpose));
    }

    /// Select the business vertical from its string form.
    ///
    /// Unknown values are rejected and leave the state untouched.
    pub fn set_business_purpose_str(&self, purpose: &str) -> EntitlementResult<()> {
        let parsed = BusinessPurpose::parse(purpose)
            .ok_or_else(|| EntitlementError::UnknownBusinessPurpose(purpose.to_string()))?;
        self.set_business_purpose(parsed);
        Ok(())
    }

    /// Mark onboarding complete. Calling it again changes nothing.
    #[instrument(skip(self))]
    pub fn complete_onboarding(&self) {
        self.dispatch(EntitlementAction::CompleteOnboarding);
    }

    /// Add a module to the purchased add-ons.
    #[instrument(skip(self))]
    pub fn purchase_addon(&self, module: ModuleId) {
        self.dispatch(EntitlementAction::PurchaseAddon(module));
    }

    /// Purchase an add-on by its string identifier.
    pub fn purchase_addon_str(&self, module: &str) -> EntitlementResult<()> {
        let parsed = ModuleId::parse(module)
            .ok_or_else(|| EntitlementError::UnknownModule(module.to_string()))?;
        self.purchase_addon(parsed);
        Ok(())
    }

    /// Remove a module from the purchased add-ons (no-op if absent).
    #[instrument(skip(self))]
    pub fn remove_addon(&self, module: ModuleId) {
        self.dispatch(EntitlementAction::RemoveAddon(module));
    }

    /// Clear all entitlement state and its persisted slices (logout).
    #[instrument(skip(self))]
    pub fn reset(&self) {
        self.dispatch(EntitlementAction::Reset);
    }

    /// Replace the purchased add-ons with the modules the module-status
    /// source reports as active.
    ///
    /// On fetch failure the state is left unchanged and the error is both
    /// logged and returned. If another refresh starts before this one
    /// resolves, this one's result is discarded.
    #[instrument(skip(self))]
    pub async fn refresh_modules(&self) -> EntitlementResult<RefreshOutcome> {
        let source = self.source.clone().ok_or(EntitlementError::NoModuleSource)?;
        let generation = self.refresh_generation.fetch_add(1, Ordering::SeqCst) + 1;

        let records = match source.fetch_module_statuses().await {
            Ok(records) => records,
            Err(e) => {
                error!(generation, error = %e, "Module refresh failed, keeping current add-ons");
                return Err(EntitlementError::Refresh(e.to_string()));
            }
        };

        let (active, unknown) = active_modules(&records);
        let count = active.len();

        {
            let _guard = self.write_lock.lock();
            let latest = self.refresh_generation.load(Ordering::SeqCst);
            if latest != generation {
                info!(generation, latest, "Discarding superseded module refresh");
                return Ok(RefreshOutcome::Superseded { generation });
            }
            self.commit(&EntitlementAction::ReplaceAddons(active));
        }
        self.notify_listeners();

        info!(generation, active = count, "Module refresh applied");
        Ok(RefreshOutcome::Applied {
            active: count,
            unknown,
        })
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn dispatch(&self, action: EntitlementAction) {
        {
            let _guard = self.write_lock.lock();
            self.commit(&action);
        }
        self.notify_listeners();
    }

    /// Apply, persist, publish and broadcast. Caller must hold `write_lock`.
    fn commit(&self, action: &EntitlementAction) {
        let now = Utc::now();
        let current = self.snapshot();
        let transition = apply(&current, action, now);

        self.persist(&transition.state, &transition.dirty);
        *self.state.write() = Arc::new(transition.state);

        let event = EntitlementEvent::new(transition.change, now);
        debug!(topic = %event.topic(), "Entitlement state changed");

        // No receivers is fine; send never blocks
        let _ = self.events.send(event);
    }

    fn persist(&self, state: &EntitlementState, dirty: &[StateSlice]) {
        for slice in dirty {
            let key = slice.key();
            let result = match state.encode_slice(*slice) {
                Some(value) => self.storage.set(key, &value),
                None => self.storage.remove(key),
            };
            if let Err(e) = result {
                warn!(key, error = %e, "Failed to persist entitlement slice");
            }
        }
    }

    fn notify_listeners(&self) {
        let listeners: Vec<Listener> = self.listeners.lock().values().cloned().collect();
        for listener in listeners {
            listener();
        }
    }
}
