//! Enrichment service - the three configured pipelines.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use top2000_catalog::CatalogProvider;

use super::config::EnrichmentConfig;
use super::errors::EnrichmentError;
use super::orchestrator::{EnrichmentJob, EnrichmentOrchestrator};
use super::pacer::{FixedIntervalPacer, Pacer};
use super::summary::RunSummary;
use super::traits::{EnrichmentServiceTrait, EnrichmentStore};

/// The configured enrichment pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnrichmentKind {
    TrackIds,
    ArtistPhotos,
    AlbumImages,
}

impl EnrichmentKind {
    pub fn job(&self) -> EnrichmentJob {
        match self {
            EnrichmentKind::TrackIds => EnrichmentJob::track_ids(),
            EnrichmentKind::ArtistPhotos => EnrichmentJob::artist_photos(),
            EnrichmentKind::AlbumImages => EnrichmentJob::album_images(),
        }
    }

    /// One-line report returned by the run trigger.
    pub fn completion_message(&self, summary: &RunSummary) -> String {
        match self {
            EnrichmentKind::TrackIds => format!(
                "Bulk update complete. Processed {} songs. Found IDs for {} songs.",
                summary.total, summary.updated
            ),
            EnrichmentKind::ArtistPhotos => format!(
                "Bulk artist photo update complete. Processed {} artists. Updated Photos for {} artists.",
                summary.total, summary.updated
            ),
            EnrichmentKind::AlbumImages => format!(
                "Bulk image update complete. Processed {} songs. Updated ImgUrls for {} songs.",
                summary.total, summary.updated
            ),
        }
    }
}

impl fmt::Display for EnrichmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EnrichmentKind::TrackIds => "track-ids",
            EnrichmentKind::ArtistPhotos => "artist-photos",
            EnrichmentKind::AlbumImages => "album-images",
        };
        f.write_str(name)
    }
}

pub struct EnrichmentService {
    orchestrator: EnrichmentOrchestrator,
}

impl EnrichmentService {
    /// Service paced by a [`FixedIntervalPacer`] built from `config`.
    pub fn new(
        provider: Arc<dyn CatalogProvider>,
        store: Arc<dyn EnrichmentStore>,
        config: EnrichmentConfig,
    ) -> Self {
        let pacer = Arc::new(FixedIntervalPacer::from_config(&config));
        Self::with_pacer(provider, store, pacer, config)
    }

    pub fn with_pacer(
        provider: Arc<dyn CatalogProvider>,
        store: Arc<dyn EnrichmentStore>,
        pacer: Arc<dyn Pacer>,
        config: EnrichmentConfig,
    ) -> Self {
        Self {
            orchestrator: EnrichmentOrchestrator::new(provider, store, pacer, config),
        }
    }

    pub async fn run(&self, kind: EnrichmentKind) -> Result<RunSummary, EnrichmentError> {
        self.orchestrator.run(&kind.job()).await
    }
}

#[async_trait]
impl EnrichmentServiceTrait for EnrichmentService {
    async fn sync_track_ids(&self) -> Result<RunSummary, EnrichmentError> {
        self.run(EnrichmentKind::TrackIds).await
    }

    async fn sync_artist_photos(&self) -> Result<RunSummary, EnrichmentError> {
        self.run(EnrichmentKind::ArtistPhotos).await
    }

    async fn sync_album_images(&self) -> Result<RunSummary, EnrichmentError> {
        self.run(EnrichmentKind::AlbumImages).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_messages() {
        let mut summary = RunSummary::new("track-ids", 3);
        summary.updated = 1;

        assert_eq!(
            EnrichmentKind::TrackIds.completion_message(&summary),
            "Bulk update complete. Processed 3 songs. Found IDs for 1 songs."
        );
        assert_eq!(
            EnrichmentKind::ArtistPhotos.completion_message(&summary),
            "Bulk artist photo update complete. Processed 3 artists. Updated Photos for 1 artists."
        );
        assert_eq!(
            EnrichmentKind::AlbumImages.completion_message(&summary),
            "Bulk image update complete. Processed 3 songs. Updated ImgUrls for 1 songs."
        );
    }

    #[test]
    fn test_kind_jobs() {
        use crate::enrichment::model::{CandidateQuery, TargetField};

        let job = EnrichmentKind::ArtistPhotos.job();
        assert_eq!(job.query, CandidateQuery::ArtistsMissingPhoto);
        assert_eq!(job.target_field, TargetField::ArtistPhoto);
        assert_eq!(job.name, EnrichmentKind::ArtistPhotos.to_string());

        let job = EnrichmentKind::AlbumImages.job();
        assert_eq!(job.target_field, TargetField::SongImageUrl);
        assert_eq!(job.name, "album-images");
    }
}
