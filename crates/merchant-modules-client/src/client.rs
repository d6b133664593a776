//! Module-status API client.
//!
//! Fetches the authoritative list of a merchant's active modules and plugs
//! into [`merchant_entitlements::EntitlementStore::refresh_modules`] as a
//! [`ModuleStatusSource`].

use crate::config::{ConfigError, ModuleStatusConfig};
use crate::retry::{with_retry_if, RetryConfig};
use async_trait::async_trait;
use merchant_entitlements::{ModuleSourceError, ModuleStatusRecord, ModuleStatusSource};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, instrument, warn};

/// Path of the module-status endpoint.
pub const MODULE_STATUS_PATH: &str = "/api/v1/modules/status";

/// Module-status client errors.
#[derive(Debug, Error)]
pub enum ModuleStatusError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error ({status}): {message}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// Invalid response from the API.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Authentication failed.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Client configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ModuleStatusError {
    /// Whether the request may succeed if repeated.
    pub fn is_retryable(&self) -> bool {
        match self {
            ModuleStatusError::RequestFailed(e) => e.is_timeout() || e.is_connect(),
            ModuleStatusError::ApiError { status, .. } => {
                *status >= 500 || *status == StatusCode::TOO_MANY_REQUESTS.as_u16()
            }
            _ => false,
        }
    }
}

/// Response body: either a bare list or wrapped in `modules`.
#[derive(Deserialize)]
#[serde(untagged)]
enum StatusPayload {
    List(Vec<ModuleStatusRecord>),
    Wrapped { modules: Vec<ModuleStatusRecord> },
}

impl StatusPayload {
    fn into_records(self) -> Vec<ModuleStatusRecord> {
        match self {
            StatusPayload::List(records) | StatusPayload::Wrapped { modules: records } => records,
        }
    }
}

/// Module-status API client.
#[derive(Clone)]
pub struct ModuleStatusClient {
    /// HTTP client instance.
    client: Client,

    /// Endpoint configuration.
    config: ModuleStatusConfig,

    /// Retry policy.
    retry: RetryConfig,
}

impl ModuleStatusClient {
    /// Create a client.
    ///
    /// Fails if the configuration is invalid or the HTTP client cannot be
    /// built.
    pub fn try_new(config: ModuleStatusConfig) -> Result<Self, ModuleStatusError> {
        config.validate()?;

        let client = Client::builder().timeout(config.timeout()).build()?;
        let retry = config.retry_config();

        Ok(Self {
            client,
            config,
            retry,
        })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self, ModuleStatusError> {
        Self::try_new(ModuleStatusConfig::from_env())
    }

    /// Override the retry policy.
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Endpoint configuration.
    pub fn config(&self) -> &ModuleStatusConfig {
        &self.config
    }

    /// Fetch the status of every module known for the merchant.
    #[instrument(skip(self), fields(base_url = %self.config.base_url))]
    pub async fn fetch_statuses(&self) -> Result<Vec<ModuleStatusRecord>, ModuleStatusError> {
        let records = with_retry_if(
            &self.retry,
            || self.fetch_once(),
            |e: &ModuleStatusError| e.is_retryable(),
        )
        .await?;
        debug!(count = records.len(), "Fetched module statuses");
        Ok(records)
    }

    async fn fetch_once(&self) -> Result<Vec<ModuleStatusRecord>, ModuleStatusError> {
        let url = self.config.url(MODULE_STATUS_PATH);
        let mut request = self.client.get(&url);

        if let Some(ref api_key) = self.config.api_key {
            request = request.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = request.send().await?;
        let payload: StatusPayload = self.handle_response(response).await?;
        Ok(payload.into_records())
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T>(&self, response: reqwest::Response) -> Result<T, ModuleStatusError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            error!("Module status authentication failed");
            return Err(ModuleStatusError::AuthenticationFailed);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            warn!("Module status API error ({}): {}", status.as_u16(), message);
            return Err(ModuleStatusError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ModuleStatusError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ModuleStatusSource for ModuleStatusClient {
    async fn fetch_module_statuses(&self) -> Result<Vec<ModuleStatusRecord>, ModuleSourceError> {
        self.fetch_statuses().await.map_err(ModuleSourceError::new)
    }
}
