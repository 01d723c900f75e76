use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use top2000_core::enrichment::{EnrichmentKind, RunSummary};

use crate::{error::ApiResult, main_lib::AppState};

async fn run_kind(state: &AppState, kind: EnrichmentKind) -> ApiResult<RunSummary> {
    let service = &state.enrichment_service;
    let summary = match kind {
        EnrichmentKind::TrackIds => service.sync_track_ids().await?,
        EnrichmentKind::ArtistPhotos => service.sync_artist_photos().await?,
        EnrichmentKind::AlbumImages => service.sync_album_images().await?,
    };
    Ok(summary)
}

/// Run one pipeline and reply with the one-line completion report.
async fn run_enrichment(
    Path(kind): Path<EnrichmentKind>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<String> {
    let summary = run_kind(&state, kind).await?;
    Ok(kind.completion_message(&summary))
}

/// Same run, full summary as JSON.
async fn run_enrichment_summary(
    Path(kind): Path<EnrichmentKind>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<RunSummary>> {
    let summary = run_kind(&state, kind).await?;
    Ok(Json(summary))
}

async fn bulk_update_track_ids(State(state): State<Arc<AppState>>) -> ApiResult<String> {
    run_enrichment(Path(EnrichmentKind::TrackIds), State(state)).await
}

async fn bulk_update_artist_photos(State(state): State<Arc<AppState>>) -> ApiResult<String> {
    run_enrichment(Path(EnrichmentKind::ArtistPhotos), State(state)).await
}

async fn bulk_update_album_images(State(state): State<Arc<AppState>>) -> ApiResult<String> {
    run_enrichment(Path(EnrichmentKind::AlbumImages), State(state)).await
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/enrichment/{kind}", post(run_enrichment))
        .route("/enrichment/{kind}/summary", post(run_enrichment_summary))
}

/// Bulk-update paths kept for existing callers.
pub fn legacy_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/spotify/bulk-update", post(bulk_update_track_ids))
        .route("/api/artistphoto/bulk-update", post(bulk_update_artist_photos))
        .route("/api/imageupdate/bulk-update", post(bulk_update_album_images))
}
