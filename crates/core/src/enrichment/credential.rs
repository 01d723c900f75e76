//! Credential lease with a call-count refresh cadence.
//!
//! The lease does not track wall-clock expiry. It refreshes before the first
//! item and again each time `refresh_interval` items have been processed on
//! the current credential. A credential that expires mid-interval makes the
//! provider call fail, which the orchestrator records as a per-item error.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, error};
use top2000_catalog::CatalogProvider;

use super::errors::CredentialError;

/// A bearer token plus its issuance time and declared validity.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    issued_at: DateTime<Utc>,
    validity: Duration,
}

impl Credential {
    /// A credential issued now.
    pub fn new(token: impl Into<String>, validity: Duration) -> Self {
        Self {
            token: token.into(),
            issued_at: Utc::now(),
            validity,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &format_args!("<{} chars>", self.token.len()))
            .field("issued_at", &self.issued_at)
            .field("validity", &self.validity)
            .finish()
    }
}

/// Owns the current credential for one run.
pub struct CredentialLease {
    provider: Arc<dyn CatalogProvider>,
    refresh_interval: usize,
    current: Option<Credential>,
    items_since_refresh: usize,
    refresh_count: usize,
}

impl CredentialLease {
    pub fn new(provider: Arc<dyn CatalogProvider>, refresh_interval: usize) -> Self {
        Self {
            provider,
            // A zero interval would refresh before every item.
            refresh_interval: refresh_interval.max(1),
            current: None,
            items_since_refresh: 0,
            refresh_count: 0,
        }
    }

    pub fn needs_refresh(&self) -> bool {
        self.current.is_none() || self.items_since_refresh >= self.refresh_interval
    }

    /// The credential for the upcoming item, refreshing first when due.
    pub async fn current_credential(&mut self) -> Result<&Credential, CredentialError> {
        if self.needs_refresh() {
            self.refresh().await?;
        }
        self.current
            .as_ref()
            .ok_or_else(|| CredentialError::Malformed("no credential issued".to_string()))
    }

    /// Replace the credential with a freshly issued one.
    ///
    /// On failure the previous credential is discarded, so the lease is left
    /// without a credential rather than with a stale one.
    pub async fn refresh(&mut self) -> Result<&Credential, CredentialError> {
        self.current = None;

        let token = self.provider.request_credential().await.map_err(|e| {
            error!("Credential request to {} failed: {}", self.provider.id(), e);
            CredentialError::Request(e)
        })?;

        if token.access_token.trim().is_empty() {
            return Err(CredentialError::Malformed("empty access token".to_string()));
        }
        let validity = token.validity().ok_or_else(|| {
            CredentialError::Malformed(format!(
                "non-positive validity ({}s)",
                token.expires_in_seconds
            ))
        })?;

        self.items_since_refresh = 0;
        self.refresh_count += 1;
        debug!(
            "Refreshed {} credential #{} ({} chars, valid for {}s)",
            self.provider.id(),
            self.refresh_count,
            token.access_token.len(),
            validity.as_secs()
        );

        Ok(&*self
            .current
            .insert(Credential::new(token.access_token, validity)))
    }

    /// Count one processed item against the current credential.
    pub fn record_item(&mut self) {
        self.items_since_refresh += 1;
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_count
    }
}
