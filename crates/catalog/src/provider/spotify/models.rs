//! Spotify Web API response structures.

use serde::Deserialize;

use crate::models::{AccessToken, AlbumRef, Artist, ArtistRef, Image, Track};

/// Response from the accounts token endpoint (client credentials flow)
#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    // Note: token_type ("Bearer") exists but is not used
}

impl TokenResponse {
    pub fn into_access_token(self) -> Option<AccessToken> {
        Some(AccessToken::new(self.access_token?, self.expires_in?))
    }
}

/// Response from /search?type=track
#[derive(Debug, Deserialize)]
pub(super) struct SearchResponse {
    #[serde(default)]
    pub tracks: Option<TracksPage>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TracksPage {
    #[serde(default)]
    pub items: Vec<TrackObject>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TrackObject {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Vec<SimplifiedArtist>,
    #[serde(default)]
    pub album: Option<AlbumObject>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SimplifiedArtist {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AlbumObject {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageObject>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ImageObject {
    pub url: Option<String>,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

/// Response from /artists/{id}
#[derive(Debug, Deserialize)]
pub(super) struct ArtistObject {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageObject>,
}

/// Error envelope: `{"error": {"status": 401, "message": "..."}}`
#[derive(Debug, Deserialize)]
pub(super) struct ErrorResponse {
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    pub message: Option<String>,
}

fn convert_images(images: Vec<ImageObject>) -> Vec<Image> {
    images
        .into_iter()
        .filter_map(|image| {
            Some(Image {
                url: image.url?,
                height: image.height,
                width: image.width,
            })
        })
        .collect()
}

impl From<TrackObject> for Track {
    fn from(track: TrackObject) -> Self {
        Self {
            id: track.id,
            name: track.name,
            artists: track
                .artists
                .into_iter()
                .map(|artist| ArtistRef {
                    id: artist.id,
                    name: artist.name,
                })
                .collect(),
            album: track.album.map(|album| AlbumRef {
                id: album.id,
                name: album.name,
                images: convert_images(album.images),
            }),
        }
    }
}

impl From<ArtistObject> for Artist {
    fn from(artist: ArtistObject) -> Self {
        Self {
            id: artist.id,
            name: artist.name,
            images: convert_images(artist.images),
        }
    }
}
