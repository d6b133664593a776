//! Error types for entitlement operations
//!
//! Most failures in this crate degrade silently by design of the dashboard:
//! storage problems fall back to defaults and unknown countries resolve to no
//! region. The errors here are the ones a caller can act on.

use thiserror::Error;

/// Entitlement store error types.
#[derive(Debug, Error)]
pub enum EntitlementError {
    /// Business purpose string is not one of the known verticals
    #[error("Unknown business purpose: {0}")]
    UnknownBusinessPurpose(String),

    /// Module identifier is not in the module catalog
    #[error("Unknown module: {0}")]
    UnknownModule(String),

    /// No module-status source was configured for this store
    #[error("No module status source configured")]
    NoModuleSource,

    /// Fetching module statuses failed; state was left unchanged
    #[error("Module refresh failed: {0}")]
    Refresh(String),
}

/// Result type for entitlement operations.
pub type EntitlementResult<T> = Result<T, EntitlementError>;

impl EntitlementError {
    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            EntitlementError::UnknownBusinessPurpose(_) => "UNKNOWN_BUSINESS_PURPOSE",
            EntitlementError::UnknownModule(_) => "UNKNOWN_MODULE",
            EntitlementError::NoModuleSource => "NO_MODULE_SOURCE",
            EntitlementError::Refresh(_) => "REFRESH_FAILED",
        }
    }

    /// Check if retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EntitlementError::Refresh(_))
    }
}

/// Durable storage error types.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage is not available in this environment
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// I/O failure in a file-backed store
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
