//! Module-status API configuration.
//!
//! Loaded from environment variables with defaults for local development.

use crate::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required environment variable.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Connection settings for the module-status API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleStatusConfig {
    /// Base URL of the merchant API (e.g., "https://api.example.com").
    pub base_url: String,

    /// API key sent as a bearer token.
    pub api_key: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Retries after the first failed attempt. Zero means a single attempt.
    pub max_retries: u32,
}

impl Default for ModuleStatusConfig {
    /// Returns default configuration suitable for local development.
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            api_key: None,
            timeout_secs: 10,
            max_retries: 0,
        }
    }
}

impl ModuleStatusConfig {
    /// Create a configuration for a base URL with defaults for the rest.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `MODULE_STATUS_API_URL`: API base URL (default: http://localhost:3000)
    /// - `MODULE_STATUS_API_KEY`: Bearer token
    /// - `MODULE_STATUS_TIMEOUT_SECS`: Request timeout in seconds (default: 10)
    /// - `MODULE_STATUS_MAX_RETRIES`: Retries after the first attempt (default: 0)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            base_url: std::env::var("MODULE_STATUS_API_URL").unwrap_or(default.base_url),
            api_key: std::env::var("MODULE_STATUS_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            timeout_secs: std::env::var("MODULE_STATUS_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.timeout_secs),
            max_retries: std::env::var("MODULE_STATUS_MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.max_retries),
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Build a full URL by appending a path to the base URL.
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Retry policy derived from `max_retries`.
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::default().with_max_attempts(self.max_retries.saturating_add(1))
    }

    /// Check that the configuration can be used to build a client.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: "MODULE_STATUS_API_URL".to_string(),
                message: format!("expected an http(s) URL, got {:?}", self.base_url),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "MODULE_STATUS_TIMEOUT_SECS".to_string(),
                message: "timeout must be at least one second".to_string(),
            });
        }
        Ok(())
    }

    /// Validate that production configuration is present.
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if self.api_key.is_none() {
            return Err(ConfigError::MissingEnvVar("MODULE_STATUS_API_KEY".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ModuleStatusConfig::default();
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.retry_config().max_attempts, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_url_joining() {
        let config = ModuleStatusConfig::new("https://api.example.com/");
        assert_eq!(
            config.url("/api/v1/modules/status"),
            "https://api.example.com/api/v1/modules/status"
        );
        assert_eq!(
            config.url("api/v1/modules/status"),
            "https://api.example.com/api/v1/modules/status"
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ModuleStatusConfig::new("ftp://example.com").validate().is_err());

        let mut config = ModuleStatusConfig::default();
        config.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_validate_for_production() {
        let config = ModuleStatusConfig::default();
        assert!(matches!(
            config.validate_for_production(),
            Err(ConfigError::MissingEnvVar(_))
        ));
        assert!(config.with_api_key("key").validate_for_production().is_ok());
    }

    #[test]
    fn test_retries_map_to_attempts() {
        let mut config = ModuleStatusConfig::default();
        config.max_retries = 2;
        assert_eq!(config.retry_config().max_attempts, 3);
    }
}
