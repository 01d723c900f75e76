//! Resolution chains - ordered, dependent catalog lookups.
//!
//! A chain is a list of [`LookupStep`]s plus a final projection. Each step
//! turns the previous hop's value into the next [`LookupRequest`]; the first
//! step sees the target's normalized seed fields. A step that cannot build a
//! request (missing id, missing title) ends the chain with "not found".
//!
//! Steps are pure: they never talk to the provider themselves. The
//! [`ChainExecutor`](super::ChainExecutor) performs exactly one round trip per
//! step, which keeps call counting and throttling handling in one place.

use top2000_catalog::{Artist, Track, TrackQuery};

use super::model::{is_blank, EnrichmentTarget};
use super::normalize::{normalize_artist, normalize_title};

/// Normalized fields of a target that seed the first lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedFields {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub track_id: Option<String>,
}

impl SeedFields {
    pub fn from_target(target: &EnrichmentTarget) -> Self {
        Self {
            title: non_blank(target.title.as_deref().map(normalize_title)),
            artist: non_blank(target.artist.as_deref().map(normalize_artist)),
            track_id: non_blank(target.external_id.as_deref().map(|id| id.trim().to_string())),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !is_blank(Some(v.as_str())))
}

/// Output of a hop, and input to the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainValue {
    Seed(SeedFields),
    Track(Track),
    Artist(Artist),
}

/// One external round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupRequest {
    SearchTracks(TrackQuery),
    Track { id: String },
    Artist { id: String },
}

/// A single hop of a resolution chain.
pub trait LookupStep: Send + Sync {
    fn name(&self) -> &'static str;

    /// Build the request for this hop, or `None` when the input lacks what it needs.
    fn request(&self, input: &ChainValue) -> Option<LookupRequest>;
}

/// Search by normalized title and artist; yields the best-matching track.
pub struct SearchTrackStep;

impl LookupStep for SearchTrackStep {
    fn name(&self) -> &'static str {
        "search_track"
    }

    fn request(&self, input: &ChainValue) -> Option<LookupRequest> {
        match input {
            ChainValue::Seed(seed) => {
                let title = seed.title.as_ref()?;
                let artist = seed.artist.as_ref()?;
                Some(LookupRequest::SearchTracks(TrackQuery::new(
                    title.clone(),
                    artist.clone(),
                )))
            }
            _ => None,
        }
    }
}

/// Fetch a track by the id the target already knows.
pub struct FetchTrackStep;

impl LookupStep for FetchTrackStep {
    fn name(&self) -> &'static str {
        "fetch_track"
    }

    fn request(&self, input: &ChainValue) -> Option<LookupRequest> {
        match input {
            ChainValue::Seed(seed) => seed
                .track_id
                .clone()
                .map(|id| LookupRequest::Track { id }),
            ChainValue::Track(track) => track
                .track_id()
                .map(|id| LookupRequest::Track { id: id.to_string() }),
            ChainValue::Artist(_) => None,
        }
    }
}

/// Fetch the primary artist of the previous hop's track.
pub struct FetchPrimaryArtistStep;

impl LookupStep for FetchPrimaryArtistStep {
    fn name(&self) -> &'static str {
        "fetch_primary_artist"
    }

    fn request(&self, input: &ChainValue) -> Option<LookupRequest> {
        match input {
            ChainValue::Track(track) => track
                .primary_artist_id()
                .map(|id| LookupRequest::Artist { id: id.to_string() }),
            _ => None,
        }
    }
}

/// Extracts the target value from the last hop.
pub type Projection = fn(&ChainValue) -> Option<String>;

/// Ordered lookups plus the projection of the final value.
pub struct ResolutionChain {
    name: &'static str,
    steps: Vec<Box<dyn LookupStep>>,
    projection: Projection,
}

impl ResolutionChain {
    pub fn new(name: &'static str, projection: Projection) -> Self {
        Self {
            name,
            steps: Vec::new(),
            projection,
        }
    }

    pub fn with_step(mut self, step: impl LookupStep + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Title + artist search, projecting the matched track's id.
    pub fn track_ids() -> Self {
        Self::new("track_ids", project_track_id).with_step(SearchTrackStep)
    }

    /// Title + artist search of a matched song, then its primary artist's photo.
    pub fn artist_photos() -> Self {
        Self::new("artist_photos", project_artist_photo)
            .with_step(SearchTrackStep)
            .with_step(FetchPrimaryArtistStep)
    }

    /// Fetch by known track id, projecting the album's largest image.
    pub fn album_images() -> Self {
        Self::new("album_images", project_album_image).with_step(FetchTrackStep)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn steps(&self) -> &[Box<dyn LookupStep>] {
        &self.steps
    }

    pub fn project(&self, value: &ChainValue) -> Option<String> {
        (self.projection)(value).filter(|v| !v.trim().is_empty())
    }
}

impl std::fmt::Debug for ResolutionChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let steps: Vec<&str> = self.steps.iter().map(|s| s.name()).collect();
        f.debug_struct("ResolutionChain")
            .field("name", &self.name)
            .field("steps", &steps)
            .finish()
    }
}

pub fn project_track_id(value: &ChainValue) -> Option<String> {
    match value {
        ChainValue::Track(track) => track.track_id().map(str::to_string),
        _ => None,
    }
}

pub fn project_artist_photo(value: &ChainValue) -> Option<String> {
    match value {
        ChainValue::Artist(artist) => artist.photo_url().map(str::to_string),
        _ => None,
    }
}

pub fn project_album_image(value: &ChainValue) -> Option<String> {
    match value {
        ChainValue::Track(track) => track.album_image_url().map(str::to_string),
        _ => None,
    }
}
