//! Module-status source
//!
//! The authoritative list of a merchant's active modules lives in a
//! module-status API. The store only depends on this trait; the HTTP client
//! lives in `merchant-modules-client`.

use async_trait::async_trait;
use merchant_catalog::ModuleId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::warn;

/// One module record returned by the module-status API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleStatusRecord {
    /// Module identifier as the API spells it
    #[serde(alias = "moduleKey", alias = "key")]
    pub module_key: String,

    /// Whether the merchant currently has the module
    pub active: bool,
}

impl ModuleStatusRecord {
    /// Create a record.
    pub fn new(module_key: impl Into<String>, active: bool) -> Self {
        Self {
            module_key: module_key.into(),
            active,
        }
    }
}

/// Failure to fetch module statuses.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ModuleSourceError(pub String);

impl ModuleSourceError {
    /// Create an error from any displayable cause.
    pub fn new(message: impl std::fmt::Display) -> Self {
        Self(message.to_string())
    }
}

/// Provider of the authoritative module-status list.
#[async_trait]
pub trait ModuleStatusSource: Send + Sync {
    /// Fetch the status of every module known for the merchant.
    async fn fetch_module_statuses(&self) -> Result<Vec<ModuleStatusRecord>, ModuleSourceError>;
}

/// Active modules of a status list.
///
/// Returns the recognised active modules and the keys that were active but
/// not in the module catalog.
pub fn active_modules(records: &[ModuleStatusRecord]) -> (BTreeSet<ModuleId>, Vec<String>) {
    let mut active = BTreeSet::new();
    let mut unknown = Vec::new();

    for record in records.iter().filter(|r| r.active) {
        match ModuleId::parse(&record.module_key) {
            Some(module) => {
                active.insert(module);
            }
            None => {
                warn!(module_key = %record.module_key, "Skipping unknown active module");
                unknown.push(record.module_key.clone());
            }
        }
    }

    (active, unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_modules_filters_inactive_and_unknown() {
        let records = vec![
            ModuleStatusRecord::new("ior", true),
            ModuleStatusRecord::new("crm", false),
            ModuleStatusRecord::new("kitchen-display", true),
            ModuleStatusRecord::new("hoverboards", true),
        ];

        let (active, unknown) = active_modules(&records);
        assert_eq!(
            active,
            [ModuleId::Ior, ModuleId::KitchenDisplay].into_iter().collect()
        );
        assert_eq!(unknown, vec!["hoverboards".to_string()]);
    }

    #[test]
    fn test_record_accepts_camel_case_key() {
        let record: ModuleStatusRecord =
            serde_json::from_str(r#"{"moduleKey": "pos", "active": true}"#).unwrap();
        assert_eq!(record, ModuleStatusRecord::new("pos", true));

        let record: ModuleStatusRecord =
            serde_json::from_str(r#"{"key": "erp", "active": false}"#).unwrap();
        assert_eq!(record.module_key, "erp");
    }
}
