//! Database models for artists and songs.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use top2000_core::enrichment::model::is_blank;
use top2000_core::enrichment::{EnrichmentTarget, TargetKey};

#[derive(Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::artists)]
#[diesel(primary_key(artist_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct ArtistDB {
    pub artist_id: i32,
    pub name: String,
    pub photo: Option<String>,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::artists)]
#[serde(rename_all = "camelCase")]
pub struct NewArtistDB {
    pub name: String,
    pub photo: Option<String>,
}

#[derive(
    Queryable,
    Identifiable,
    Associations,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(belongs_to(ArtistDB, foreign_key = artist_id))]
#[diesel(table_name = crate::schema::songs)]
#[diesel(primary_key(song_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct SongDB {
    pub song_id: i32,
    pub title: String,
    pub artist_id: i32,
    pub release_year: Option<i32>,
    pub img_url: Option<String>,
    pub lyrics: Option<String>,
    pub spotify_id: Option<String>,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::songs)]
#[serde(rename_all = "camelCase")]
pub struct NewSongDB {
    pub title: String,
    pub artist_id: i32,
    pub release_year: Option<i32>,
    pub img_url: Option<String>,
    pub lyrics: Option<String>,
    pub spotify_id: Option<String>,
}

/// Search-relevant columns of a song; lyrics are never loaded.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::songs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SongCandidateDB {
    pub song_id: i32,
    pub title: String,
    pub artist_id: i32,
    pub img_url: Option<String>,
    pub spotify_id: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !is_blank(Some(v.as_str())))
}

impl SongCandidateDB {
    /// Working copy of this song with `current_value` taken from `current`.
    pub(crate) fn into_target(
        self,
        artist_name: String,
        current: fn(&SongCandidateDB) -> Option<String>,
    ) -> EnrichmentTarget {
        EnrichmentTarget {
            key: TargetKey::Song(self.song_id),
            current_value: non_blank(current(&self)),
            title: Some(self.title),
            artist: Some(artist_name),
            external_id: non_blank(self.spotify_id),
        }
    }
}

impl ArtistDB {
    /// Working copy of this artist, seeded from `song` when one is known.
    pub(crate) fn into_target(self, song: Option<&SongCandidateDB>) -> EnrichmentTarget {
        EnrichmentTarget {
            key: TargetKey::Artist(self.artist_id),
            title: song.map(|s| s.title.clone()),
            artist: Some(self.name),
            external_id: song.and_then(|s| non_blank(s.spotify_id.clone())),
            current_value: non_blank(self.photo),
        }
    }
}
