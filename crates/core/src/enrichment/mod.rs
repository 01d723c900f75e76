//! Catalog enrichment module.
//!
//! Walks local records that are missing a catalog attribute and fills it in
//! from the external catalog, one item at a time, under a rate limit and an
//! expiring bearer credential.
//!
//! # Architecture
//!
//! ```text
//! EnrichmentService → EnrichmentOrchestrator
//!                          │
//!        ┌─────────────────┼──────────────────┬──────────────┐
//!        v                 v                  v              v
//! CredentialLease    ChainExecutor          Pacer     BatchCommitter
//!        │                 │                                 │
//!        v                 v                                 v
//!   CatalogProvider (top2000-catalog)               EnrichmentStore
//! ```
//!
//! - **Model** (`model.rs`) - targets, fields, staged mutations
//! - **Normalize** (`normalize.rs`) - title and artist cleanup before search
//! - **Chain** (`chain.rs`, `executor.rs`) - dependent lookups per item
//! - **Credential** (`credential.rs`) - call-count refresh cadence
//! - **Pacer** (`pacer.rs`) - fixed spacing plus throttling cooldown
//! - **Orchestrator** (`orchestrator.rs`) - the batch loop
//! - **Committer** (`committer.rs`) - single deferred flush
//! - **Service** (`service.rs`) - track ids, artist photos, album images
//!
//! # Outcomes
//!
//! Each item ends as updated, skipped (including throttled) or errored.
//! Only a credential failure aborts the run, and only then is nothing
//! committed.

pub mod chain;
pub mod committer;
pub mod config;
pub mod credential;
pub mod errors;
pub mod executor;
pub mod model;
pub mod normalize;
pub mod orchestrator;
pub mod pacer;
pub mod service;
pub mod summary;
pub mod traits;

#[cfg(test)]
mod orchestrator_tests;

pub use chain::{
    ChainValue, FetchPrimaryArtistStep, FetchTrackStep, LookupRequest, LookupStep,
    ResolutionChain, SearchTrackStep, SeedFields,
};
pub use committer::BatchCommitter;
pub use config::{EnrichmentConfig, ThrottlePolicy};
pub use credential::{Credential, CredentialLease};
pub use errors::{CredentialError, EnrichmentError};
pub use executor::{ChainExecution, ChainExecutor, ChainOutcome};
pub use model::{
    CandidateQuery, CommitResult, EnrichmentTarget, StagedMutation, TargetField, TargetKey,
};
pub use normalize::{normalize_artist, normalize_title};
pub use orchestrator::{EnrichmentJob, EnrichmentOrchestrator};
pub use pacer::{FixedIntervalPacer, Pacer};
pub use service::{EnrichmentKind, EnrichmentService};
pub use summary::{ItemOutcome, RunEntry, RunSummary};
pub use traits::{EnrichmentServiceTrait, EnrichmentStore};
