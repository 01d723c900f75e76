//! Catalog provider trait definition.

use async_trait::async_trait;

use crate::errors::CatalogError;
use crate::models::{AccessToken, Artist, Track, TrackQuery};

use super::capabilities::RateLimit;

/// Trait for external music catalog providers.
///
/// Every lookup takes the bearer token explicitly; providers hold no
/// token state of their own, so the caller decides when to refresh.
///
/// Lookups that find nothing return `Ok(None)` / an empty `Vec`.
/// A throttling response must surface as [`CatalogError::RateLimited`].
///
/// # Example
///
/// ```ignore
/// let token = provider.request_credential().await?;
/// let hits = provider
///     .search_tracks(&TrackQuery::new("Hotel California", "Eagles"), &token.access_token)
///     .await?;
/// ```
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Unique identifier for this provider, e.g. "SPOTIFY".
    fn id(&self) -> &'static str;

    /// Pacing the provider expects from batch callers.
    fn rate_limit(&self) -> RateLimit {
        RateLimit::default()
    }

    /// Obtain a fresh bearer credential using the provider's client credentials.
    async fn request_credential(&self) -> Result<AccessToken, CatalogError>;

    /// Search tracks by title and artist.
    async fn search_tracks(
        &self,
        query: &TrackQuery,
        access_token: &str,
    ) -> Result<Vec<Track>, CatalogError>;

    /// Fetch a single track by its catalog id.
    async fn get_track(
        &self,
        track_id: &str,
        access_token: &str,
    ) -> Result<Option<Track>, CatalogError>;

    /// Fetch a single artist by its catalog id.
    async fn get_artist(
        &self,
        artist_id: &str,
        access_token: &str,
    ) -> Result<Option<Artist>, CatalogError>;
}
