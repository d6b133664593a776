//! Entitlement store configuration.
//!
//! Configuration is loaded from environment variables with defaults suitable
//! for local development and tests (in-memory storage).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for an [`crate::EntitlementStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitlementConfig {
    /// Directory for file-backed storage; `None` keeps state in memory.
    pub storage_dir: Option<PathBuf>,

    /// Capacity of the change-event broadcast channel.
    pub event_capacity: usize,
}

impl Default for EntitlementConfig {
    fn default() -> Self {
        Self {
            storage_dir: None,
            event_capacity: 256,
        }
    }
}

impl EntitlementConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `MERCHANT_STORAGE_DIR`: directory for persisted slices (default: in-memory)
    /// - `MERCHANT_EVENT_CAPACITY`: event channel capacity (default: 256)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            storage_dir: std::env::var("MERCHANT_STORAGE_DIR")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            event_capacity: std::env::var("MERCHANT_EVENT_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|c: &usize| *c > 0)
                .unwrap_or(default.event_capacity),
        }
    }

    /// Use file-backed storage in `dir`.
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = Some(dir.into());
        self
    }
}
