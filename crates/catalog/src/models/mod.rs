//! Catalog models
//!
//! This module contains the provider-agnostic data types returned by catalog providers:
//! - `credential` - Bearer credential payload (AccessToken)
//! - `track` - Tracks, artists and their image metadata
//! - `query` - Search parameters (TrackQuery)

mod credential;
mod query;
mod track;

pub use credential::AccessToken;
pub use query::TrackQuery;
pub use track::{largest_image, AlbumRef, Artist, ArtistRef, Image, Track};
