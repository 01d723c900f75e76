//! Error types and retry classification for the catalog crate.
//!
//! This module provides:
//! - [`CatalogError`]: The error enum for all catalog provider operations
//! - [`RetryClass`]: Classification used by the enrichment engine to pick an item outcome

mod retry;

pub use retry::RetryClass;

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while talking to an external catalog provider.
///
/// "Not found" is deliberately absent: lookups that find nothing return
/// `Ok(None)` or an empty collection so callers can treat them as a skip
/// instead of a failure.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
        /// Value of the `Retry-After` header, when the provider sent one
        retry_after: Option<Duration>,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider rejected the bearer credential or client credentials.
    #[error("Unauthorized: {provider} - {message}")]
    Unauthorized {
        /// The provider that rejected the credential
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The credential endpoint answered but the payload is unusable
    /// (missing token, zero or negative validity).
    #[error("Invalid credential from {provider}: {message}")]
    InvalidCredential {
        /// The provider that issued the payload
        provider: String,
        /// What was wrong with it
        message: String,
    },

    /// A provider-specific error occurred (unexpected status, bad JSON).
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The client could not be configured (bad base URL, TLS init failure).
    #[error("Client configuration error: {0}")]
    Configuration(String),

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl CatalogError {
    /// Returns the retry classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use top2000_catalog::errors::{CatalogError, RetryClass};
    ///
    /// let error = CatalogError::RateLimited { provider: "SPOTIFY".to_string(), retry_after: None };
    /// assert_eq!(error.retry_class(), RetryClass::AfterCooldown);
    ///
    /// let error = CatalogError::Timeout { provider: "SPOTIFY".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::RateLimited { .. } => RetryClass::AfterCooldown,

            Self::Timeout { .. }
            | Self::Unauthorized { .. }
            | Self::InvalidCredential { .. }
            | Self::ProviderError { .. }
            | Self::Configuration(_)
            | Self::Network(_) => RetryClass::Never,
        }
    }

    /// Shorthand for `retry_class() == RetryClass::AfterCooldown`.
    pub fn is_throttled(&self) -> bool {
        self.retry_class() == RetryClass::AfterCooldown
    }
}
