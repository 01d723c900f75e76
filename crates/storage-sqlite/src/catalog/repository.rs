use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sql_types::{Nullable, Text};
use diesel::SqliteConnection;
use log::debug;

use top2000_core::enrichment::{
    CandidateQuery, CommitResult, EnrichmentStore, EnrichmentTarget, StagedMutation, TargetField,
    TargetKey,
};
use top2000_core::errors::Error;
use top2000_core::Result;

use super::model::{ArtistDB, NewArtistDB, NewSongDB, SongCandidateDB, SongDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{artists, songs};

diesel::define_sql_function! {
    /// SQLite `trim(x, chars)`; yields NULL for a NULL `x`.
    fn trim(x: Nullable<Text>, chars: Text) -> Nullable<Text>;
}

/// Characters a stored value may consist of and still count as blank.
const BLANK_CHARS: &str = " \t\r\n";

/// Record store over the `artists` and `songs` tables.
pub struct CatalogRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl CatalogRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        CatalogRepository { pool, writer }
    }

    fn songs_missing_track_id(&self) -> Result<Vec<EnrichmentTarget>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = songs::table
            .inner_join(artists::table)
            .filter(
                songs::spotify_id
                    .is_null()
                    .or(trim(songs::spotify_id, BLANK_CHARS).eq("")),
            )
            .select((SongCandidateDB::as_select(), artists::name))
            .order(songs::song_id.asc())
            .load::<(SongCandidateDB, String)>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows
            .into_iter()
            .map(|(song, artist)| song.into_target(artist, |s| s.spotify_id.clone()))
            .collect())
    }

    fn songs_missing_image(&self) -> Result<Vec<EnrichmentTarget>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = songs::table
            .inner_join(artists::table)
            .filter(trim(songs::spotify_id, BLANK_CHARS).ne(""))
            .filter(
                songs::img_url
                    .is_null()
                    .or(trim(songs::img_url, BLANK_CHARS).eq("")),
            )
            .select((SongCandidateDB::as_select(), artists::name))
            .order(songs::song_id.asc())
            .load::<(SongCandidateDB, String)>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows
            .into_iter()
            .map(|(song, artist)| song.into_target(artist, |s| s.img_url.clone()))
            .collect())
    }

    /// Artists without a photo, each seeded from its first song (by id)
    /// that already carries a track id.
    fn artists_missing_photo(&self) -> Result<Vec<EnrichmentTarget>> {
        let mut conn = get_connection(&self.pool)?;
        let artists_db = artists::table
            .filter(
                artists::photo
                    .is_null()
                    .or(trim(artists::photo, BLANK_CHARS).eq("")),
            )
            .order(artists::artist_id.asc())
            .load::<ArtistDB>(&mut conn)
            .map_err(StorageError::from)?;
        let linked_songs = songs::table
            .filter(trim(songs::spotify_id, BLANK_CHARS).ne(""))
            .order(songs::song_id.asc())
            .select(SongCandidateDB::as_select())
            .load::<SongCandidateDB>(&mut conn)
            .map_err(StorageError::from)?;

        let mut first_song: HashMap<i32, SongCandidateDB> = HashMap::new();
        for song in linked_songs {
            first_song.entry(song.artist_id).or_insert(song);
        }

        Ok(artists_db
            .into_iter()
            .map(|artist| {
                let song = first_song.get(&artist.artist_id);
                artist.into_target(song)
            })
            .collect())
    }

    pub fn get_artist(&self, id: i32) -> Result<ArtistDB> {
        let mut conn = get_connection(&self.pool)?;
        let artist = artists::table
            .find(id)
            .first::<ArtistDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(artist)
    }

    pub fn get_song(&self, id: i32) -> Result<SongDB> {
        let mut conn = get_connection(&self.pool)?;
        let song = songs::table
            .find(id)
            .select(SongDB::as_select())
            .first::<SongDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(song)
    }

    pub async fn insert_artist(&self, new_artist: NewArtistDB) -> Result<ArtistDB> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<ArtistDB> {
                let artist = diesel::insert_into(artists::table)
                    .values(&new_artist)
                    .returning(ArtistDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(artist)
            })
            .await
    }

    pub async fn insert_song(&self, new_song: NewSongDB) -> Result<SongDB> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<SongDB> {
                let song = diesel::insert_into(songs::table)
                    .values(&new_song)
                    .returning(SongDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(song)
            })
            .await
    }
}

/// Write one staged value. Returns the number of rows touched.
fn apply_mutation(conn: &mut SqliteConnection, mutation: &StagedMutation) -> Result<usize> {
    let value = mutation.value.as_str();
    let affected = match (mutation.key, mutation.field) {
        (TargetKey::Song(id), TargetField::SongTrackId) => {
            diesel::update(songs::table.find(id))
                .set(songs::spotify_id.eq(value))
                .execute(conn)
        }
        (TargetKey::Song(id), TargetField::SongImageUrl) => {
            diesel::update(songs::table.find(id))
                .set(songs::img_url.eq(value))
                .execute(conn)
        }
        (TargetKey::Artist(id), TargetField::ArtistPhoto) => {
            diesel::update(artists::table.find(id))
                .set(artists::photo.eq(value))
                .execute(conn)
        }
        (key, field) => {
            return Err(Error::Repository(format!(
                "{} cannot be written to {}",
                field, key
            )))
        }
    }
    .map_err(StorageError::from)?;
    Ok(affected)
}

#[async_trait]
impl EnrichmentStore for CatalogRepository {
    fn select_candidates(&self, query: CandidateQuery) -> Result<Vec<EnrichmentTarget>> {
        let candidates = match query {
            CandidateQuery::SongsMissingTrackId => self.songs_missing_track_id(),
            CandidateQuery::ArtistsMissingPhoto => self.artists_missing_photo(),
            CandidateQuery::SongsMissingImage => self.songs_missing_image(),
        }?;
        debug!("{:?}: {} candidates", query, candidates.len());
        Ok(candidates)
    }

    async fn apply_mutations(&self, mutations: Vec<StagedMutation>) -> Result<CommitResult> {
        if mutations.is_empty() {
            return Ok(CommitResult { applied: 0 });
        }
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<CommitResult> {
                let mut applied = 0;
                for mutation in &mutations {
                    applied += apply_mutation(conn, mutation)?;
                }
                Ok(CommitResult { applied })
            })
            .await
    }
}
