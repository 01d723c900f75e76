//! Top2000 Catalog Crate
//!
//! Client side of the external music catalog used to enrich the local
//! Top2000 song and artist records.
//!
//! # Overview
//!
//! - Credential acquisition (client credentials flow)
//! - Track search by title and artist
//! - Track and artist lookups by catalog id
//! - Error classification so batch callers can tell throttling apart
//!   from ordinary failures
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |  Enrichment run  | --> |   TrackQuery     |  (normalized title/artist)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          | CatalogProvider  |  (Spotify)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  Track / Artist  |  (ids, images)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`CatalogProvider`] - Provider trait, one bearer token per call
//! - [`AccessToken`] - Credential returned by the provider
//! - [`Track`], [`Artist`] - Lookup results
//! - [`CatalogError`] - Provider errors with a [`RetryClass`]

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::{CatalogError, RetryClass};

pub use models::{largest_image, AccessToken, AlbumRef, Artist, ArtistRef, Image, Track, TrackQuery};

pub use provider::spotify::{SpotifyConfig, SpotifyProvider};
pub use provider::{CatalogProvider, RateLimit};
