//! Enrichment error types.
//!
//! Per-item failures never surface here; they end up as entries in the
//! [`RunSummary`]. These errors abort or fail the run as a whole.

use thiserror::Error;
use top2000_catalog::CatalogError;

use super::summary::RunSummary;
use crate::errors::Error;

/// A bearer credential could not be obtained.
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("{0}")]
    Request(#[from] CatalogError),

    #[error("Malformed credential: {0}")]
    Malformed(String),
}

/// Run-level failure. Carries the summary built up to the failure point.
#[derive(Error, Debug)]
pub enum EnrichmentError {
    /// Candidates could not be read from the store; nothing was processed.
    #[error("Failed to select candidates: {source}")]
    CandidateSelection {
        source: Error,
        summary: Box<RunSummary>,
    },

    /// Credential refresh failed; the run stopped and nothing was committed.
    #[error("Failed to retrieve access token: {source}")]
    CredentialAcquisition {
        source: CredentialError,
        summary: Box<RunSummary>,
    },

    /// Every item was processed but flushing the staged mutations failed.
    #[error("Failed to commit staged mutations: {source}")]
    Commit {
        source: Error,
        summary: Box<RunSummary>,
    },
}

impl EnrichmentError {
    pub fn summary(&self) -> &RunSummary {
        match self {
            EnrichmentError::CandidateSelection { summary, .. }
            | EnrichmentError::CredentialAcquisition { summary, .. }
            | EnrichmentError::Commit { summary, .. } => summary,
        }
    }

    pub fn is_credential_failure(&self) -> bool {
        matches!(self, EnrichmentError::CredentialAcquisition { .. })
    }
}
