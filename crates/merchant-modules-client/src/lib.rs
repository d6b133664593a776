//! # Merchant Modules Client
//!
//! HTTP client for the merchant module-status API, the authoritative record
//! of which modules a merchant has active.
//!
//! ## Overview
//!
//! - **Client**: `GET /api/v1/modules/status` with optional bearer auth
//! - **Config**: Endpoint, API key, timeout and retries from the environment
//! - **Retry**: Exponential backoff for transient failures only
//!
//! The client implements [`merchant_entitlements::ModuleStatusSource`], so it
//! can be attached directly to an entitlement store:
//!
//! ```rust,no_run
//! use merchant_entitlements::{EntitlementStore, MemoryStorage};
//! use merchant_modules_client::{ModuleStatusClient, ModuleStatusConfig};
//! use std::sync::Arc;
//!
//! async fn refresh() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ModuleStatusClient::try_new(ModuleStatusConfig::from_env())?;
//!     let store = EntitlementStore::new(Arc::new(MemoryStorage::new()))
//!         .with_module_source(Arc::new(client));
//!
//!     store.refresh_modules().await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod retry;

pub use client::{ModuleStatusClient, ModuleStatusError, MODULE_STATUS_PATH};
pub use config::{ConfigError, ModuleStatusConfig};
pub use retry::{with_retry_if, RetryConfig};
