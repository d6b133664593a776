//! # Merchant Entitlements
//!
//! This crate provides the observable entitlement store of the merchant
//! dashboard: which country the merchant operates in, which region that
//! resolves to, which add-on modules were purchased, and which vertical was
//! chosen during onboarding.
//!
//! ## Overview
//!
//! The merchant-entitlements crate handles:
//! - **State**: The merchant's country, region, add-ons, vertical and onboarding flag
//! - **Transitions**: Pure `(state, action) -> state` functions
//! - **Store**: Serialized mutations, snapshot reads, change listeners and events
//! - **Storage**: One key per state slice, in memory or on disk
//! - **Facade**: Derived queries (`is_module_available`, `module_status`, pricing)
//! - **Refresh**: Replacing add-ons from an authoritative module-status source
//!
//! ## Usage
//!
//! ```rust
//! use merchant_entitlements::{EntitlementStore, MemoryStorage, ModuleAvailability};
//! use merchant_catalog::{BusinessPurpose, ModuleId};
//! use std::sync::Arc;
//!
//! let store = EntitlementStore::new(Arc::new(MemoryStorage::new()));
//!
//! store.set_country("United Arab Emirates");
//! store.set_business_purpose(BusinessPurpose::Ior);
//! store.complete_onboarding();
//!
//! let view = store.view();
//! assert_eq!(view.module_status(ModuleId::Zatca), ModuleAvailability::Core);
//! assert_eq!(view.module_status(ModuleId::Ior), ModuleAvailability::Addon);
//! assert!(!view.is_module_available(ModuleId::GstInvoicing));
//! ```
//!
//! ## Events
//!
//! Besides plain listeners, every mutation broadcasts an
//! [`EntitlementEvent`] on topic `entitlements.{event_type}`:
//!
//! ```rust,no_run
//! use merchant_entitlements::{EntitlementStore, MemoryStorage};
//! use std::sync::Arc;
//!
//! async fn watch(store: Arc<EntitlementStore>) {
//!     let mut events = store.events();
//!     while let Ok(event) = events.recv().await {
//!         println!("{}: {:?}", event.topic(), event.change);
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod facade;
pub mod source;
pub mod state;
pub mod storage;
pub mod store;
pub mod transition;

// Re-export main types
pub use config::EntitlementConfig;
pub use error::{EntitlementError, EntitlementResult, StorageError, StorageResult};
pub use events::{EntitlementChange, EntitlementEvent};
pub use facade::{AddonOffer, EntitlementView, ModuleAvailability};
pub use source::{active_modules, ModuleSourceError, ModuleStatusRecord, ModuleStatusSource};
pub use state::EntitlementState;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StateSlice, UnavailableStorage};
pub use store::{EntitlementStore, RefreshOutcome, Subscription};
pub use transition::{apply, EntitlementAction, Transition};
