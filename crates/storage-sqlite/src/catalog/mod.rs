//! SQLite storage for the artist/song catalog and its enrichment queries.

mod model;
mod repository;

pub use model::{ArtistDB, NewArtistDB, NewSongDB, SongCandidateDB, SongDB};
pub use repository::CatalogRepository;
