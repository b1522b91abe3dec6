//! Domain models for the song catalog
//!
//! This module contains the domain models with validation and database mapping.

use crate::error::Result;
use crate::lyrics;
use crate::normalize::{normalize, search_key};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::ops::Range;
use uuid::Uuid;

/// Canonical textual date format (`2006-07-16`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Dotted date format (`2006.07.16`) still accepted on song updates.
pub const LEGACY_DATE_FORMAT: &str = "%Y.%m.%d";

/// Parse a date in the canonical `YYYY-MM-DD` format.
///
/// Month and day must be zero-padded: `2006-7-6` is rejected.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    parse_exact(value, DATE_FORMAT)
}

/// Parse a date in either the canonical or the dotted legacy format.
pub fn parse_date_lenient(value: &str) -> Option<NaiveDate> {
    parse_date(value).or_else(|| parse_exact(value, LEGACY_DATE_FORMAT))
}

/// chrono accepts single-digit `%m`/`%d`; only a value that formats back to
/// itself is a match.
fn parse_exact(value: &str, format: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date = NaiveDate::parse_from_str(value, format).ok()?;
    (date.format(format).to_string() == value).then_some(date)
}

// =============================================================================
// Domain Models
// =============================================================================

/// Music artist (performer or group)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Artist {
    /// Unique identifier
    pub id: String,
    /// Artist name, normalized and unique
    pub name: String,
    /// Lower-cased name for case-insensitive matching
    pub normalized_name: String,
    /// When first created
    pub created_at: i64,
}

impl Artist {
    /// Create a new artist with a normalized name
    pub fn new(name: &str) -> Self {
        let name = normalize(name);
        Self {
            id: Uuid::new_v4().to_string(),
            normalized_name: search_key(&name),
            name,
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Validate artist data
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("artist name cannot be empty".to_string());
        }

        Ok(())
    }
}

/// Song with its persisted lyrics encoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SongDetail {
    /// Unique identifier
    pub id: String,
    /// Owning artist
    pub artist_id: String,
    /// Denormalized artist display name
    pub group_name: String,
    /// Song title, normalized
    pub song_name: String,
    /// Lower-cased title for case-insensitive matching
    pub normalized_song_name: String,
    /// Release date, if known
    pub release_date: Option<NaiveDate>,
    /// Link to the group's page
    pub link: Option<String>,
    /// Persisted lyrics (see [`crate::lyrics`])
    pub text: Option<String>,
    /// Timestamps
    pub created_at: i64,
    pub updated_at: i64,
}

impl SongDetail {
    /// Create a new song owned by `artist`, without lyrics
    pub fn new(artist: &Artist, song_name: &str) -> Self {
        let now = chrono::Utc::now().timestamp();
        let song_name = normalize(song_name);
        Self {
            id: Uuid::new_v4().to_string(),
            artist_id: artist.id.clone(),
            group_name: artist.name.clone(),
            normalized_song_name: search_key(&song_name),
            song_name,
            release_date: None,
            link: None,
            text: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate song data
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.song_name.trim().is_empty() {
            return Err("song name cannot be empty".to_string());
        }

        if self.artist_id.trim().is_empty() {
            return Err("song must reference an artist".to_string());
        }

        Ok(())
    }

    /// Rename the song, keeping the search key in sync
    pub fn rename(&mut self, song_name: &str) {
        self.song_name = normalize(song_name);
        self.normalized_song_name = search_key(&self.song_name);
    }

    /// Move the song to another artist
    pub fn assign_artist(&mut self, artist: &Artist) {
        self.artist_id = artist.id.clone();
        self.group_name = artist.name.clone();
    }

    /// Decoded lyrics; never fails, see [`lyrics::decode`]
    pub fn lyrics(&self) -> SongText {
        lyrics::decode(self.text.as_deref())
    }

    /// Replace the lyrics with the structured encoding of `text`
    pub fn set_lyrics(&mut self, text: &SongText) -> Result<()> {
        self.text = Some(lyrics::encode(text)?);
        Ok(())
    }

    /// Bump `updated_at` to now
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().timestamp();
    }
}

/// Lyrics as an ordered list of verses (reading order)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongText {
    #[serde(default)]
    pub verses: Vec<String>,
}

impl SongText {
    pub fn new(verses: Vec<String>) -> Self {
        Self { verses }
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    /// Verses inside `range`, as produced by the pagination engine
    pub fn window(&self, range: Range<usize>) -> &[String] {
        &self.verses[range]
    }
}

// =============================================================================
// Tests
// =============================================================================
