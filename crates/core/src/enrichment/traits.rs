//! Enrichment traits.
//!
//! - `EnrichmentStore` - the record store a run reads candidates from and commits to
//! - `EnrichmentServiceTrait` - the three run triggers

use async_trait::async_trait;

use super::errors::EnrichmentError;
use super::model::{CandidateQuery, CommitResult, EnrichmentTarget, StagedMutation};
use super::summary::RunSummary;
use crate::errors::Result;

/// Record store contract used by enrichment runs.
#[async_trait]
pub trait EnrichmentStore: Send + Sync {
    /// Candidates in store iteration order. Only records whose target
    /// attribute is absent or empty are returned.
    fn select_candidates(&self, query: CandidateQuery) -> Result<Vec<EnrichmentTarget>>;

    /// Apply every mutation in one all-or-nothing operation.
    async fn apply_mutations(&self, mutations: Vec<StagedMutation>) -> Result<CommitResult>;
}

#[async_trait]
pub trait EnrichmentServiceTrait: Send + Sync {
    /// Fill external track ids of songs from a title + artist search.
    async fn sync_track_ids(&self) -> std::result::Result<RunSummary, EnrichmentError>;

    /// Fill artist photos via a song of theirs that already has a track id.
    async fn sync_artist_photos(&self) -> std::result::Result<RunSummary, EnrichmentError>;

    /// Fill album images of songs that already have a track id.
    async fn sync_album_images(&self) -> std::result::Result<RunSummary, EnrichmentError>;
}
