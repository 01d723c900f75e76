use serde::{Deserialize, Serialize};

/// Image reference attached to an album or artist.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

/// Minimal artist reference embedded in a track.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtistRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Album reference embedded in a track (only the image metadata is used).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlbumRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
}

/// A track as returned by search or get-by-id.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Track {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub album: Option<AlbumRef>,
}

impl Track {
    /// Non-empty track id, if present.
    pub fn track_id(&self) -> Option<&str> {
        non_empty(self.id.as_deref())
    }

    /// Id of the first listed (primary) artist.
    pub fn primary_artist_id(&self) -> Option<&str> {
        self.artists
            .first()
            .and_then(|artist| non_empty(artist.id.as_deref()))
    }

    /// Largest album image URL.
    pub fn album_image_url(&self) -> Option<&str> {
        self.album
            .as_ref()
            .and_then(|album| largest_image(&album.images))
            .map(|image| image.url.as_str())
    }
}

/// A full artist object as returned by get-artist.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Artist {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
}

impl Artist {
    /// Largest artist photo URL.
    pub fn photo_url(&self) -> Option<&str> {
        largest_image(&self.images).map(|image| image.url.as_str())
    }
}

/// Picks the image with the greatest height, ignoring entries with a blank URL.
///
/// Images without a height sort below any sized image.
pub fn largest_image(images: &[Image]) -> Option<&Image> {
    images
        .iter()
        .filter(|image| !image.url.trim().is_empty())
        .max_by_key(|image| image.height.unwrap_or(0))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
