//! Enrichment domain types.
//!
//! - `TargetKey` / `TargetField` - which record and which attribute a run fills
//! - `CandidateQuery` - the filter a run uses to select candidates
//! - `EnrichmentTarget` - in-memory working copy of a candidate record
//! - `StagedMutation` / `CommitResult` - the deferred write and its outcome

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable key of a record in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum TargetKey {
    Song(i32),
    Artist(i32),
}

impl fmt::Display for TargetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKey::Song(id) => write!(f, "song:{}", id),
            TargetKey::Artist(id) => write!(f, "artist:{}", id),
        }
    }
}

/// Attribute an enrichment run fills in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetField {
    /// External track id of a song.
    SongTrackId,
    /// Album cover url of a song.
    SongImageUrl,
    /// Photo url of an artist.
    ArtistPhoto,
}

impl TargetField {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetField::SongTrackId => "song_track_id",
            TargetField::SongImageUrl => "song_image_url",
            TargetField::ArtistPhoto => "artist_photo",
        }
    }

    /// Whether the field lives on a record with this key.
    pub fn applies_to(&self, key: &TargetKey) -> bool {
        matches!(
            (self, key),
            (TargetField::SongTrackId, TargetKey::Song(_))
                | (TargetField::SongImageUrl, TargetKey::Song(_))
                | (TargetField::ArtistPhoto, TargetKey::Artist(_))
        )
    }
}

impl fmt::Display for TargetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Candidate filter understood by the record store.
///
/// Every variant selects only records whose target attribute is currently
/// absent or empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CandidateQuery {
    /// Songs without an external track id.
    SongsMissingTrackId,
    /// Artists without a photo. Each target carries the title of one of the
    /// artist's songs that already has a track id, when such a song exists.
    ArtistsMissingPhoto,
    /// Songs with a track id but without an album image.
    SongsMissingImage,
}

impl CandidateQuery {
    pub fn target_field(&self) -> TargetField {
        match self {
            CandidateQuery::SongsMissingTrackId => TargetField::SongTrackId,
            CandidateQuery::ArtistsMissingPhoto => TargetField::ArtistPhoto,
            CandidateQuery::SongsMissingImage => TargetField::SongImageUrl,
        }
    }
}

/// Working copy of a candidate record for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentTarget {
    pub key: TargetKey,
    /// Display title that seeds the chain (song title, or the matched song for artists).
    pub title: Option<String>,
    /// Name of the owning artist.
    pub artist: Option<String>,
    /// Known external track id, if any.
    pub external_id: Option<String>,
    /// Current value of the target attribute.
    pub current_value: Option<String>,
}

impl EnrichmentTarget {
    pub fn new(key: TargetKey) -> Self {
        Self {
            key,
            title: None,
            artist: None,
            external_id: None,
            current_value: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn with_current_value(mut self, value: impl Into<String>) -> Self {
        self.current_value = Some(value.into());
        self
    }

    /// True when the target attribute is absent or blank.
    pub fn is_candidate(&self) -> bool {
        is_blank(self.current_value.as_deref())
    }

    /// Set the target attribute on the working copy and return the matching mutation.
    pub fn stage(&mut self, field: TargetField, value: String) -> StagedMutation {
        self.current_value = Some(value.clone());
        StagedMutation {
            key: self.key,
            field,
            value,
        }
    }
}

/// Treats `None`, `""` and whitespace-only strings alike.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map(str::trim).unwrap_or_default().is_empty()
}

/// An in-memory update awaiting the batch commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedMutation {
    pub key: TargetKey,
    pub field: TargetField,
    pub value: String,
}

/// Result of flushing staged mutations to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitResult {
    /// Number of mutations the store applied.
    pub applied: usize,
}
