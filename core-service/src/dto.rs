//! Request and response bodies of the HTTP API

use chrono::NaiveDate;
use core_library::models::{SongDetail, SongText};
use serde::{Deserialize, Serialize};

/// `GET /info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoResponse {
    pub title: String,
    pub version: String,
}

impl Default for InfoResponse {
    fn default() -> Self {
        Self {
            title: "Music info".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// `GET /songs` query string. Numbers stay strings so bad input falls back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSongsParams {
    pub field: Option<String>,
    pub value: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
}

/// `GET /songs/:songName/lyrics` query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LyricsParams {
    pub verse_page: Option<String>,
    pub verse_limit: Option<String>,
}

/// `POST /songs`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSongRequest {
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub song: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub text: Option<SongText>,
}

/// `PUT /songs/:songName`. Blank strings and empty verse lists count as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSongRequest {
    #[serde(default)]
    pub song_name: Option<String>,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub group_link: Option<String>,
    #[serde(default)]
    pub text: Option<SongText>,
}

/// A song as returned by the API, lyrics decoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongResponse {
    pub id: String,
    pub artist_id: String,
    pub group_name: String,
    pub song_name: String,
    pub release_date: Option<NaiveDate>,
    pub link: Option<String>,
    pub text: SongText,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<SongDetail> for SongResponse {
    fn from(song: SongDetail) -> Self {
        let text = song.lyrics();
        Self {
            id: song.id,
            artist_id: song.artist_id,
            group_name: song.group_name,
            song_name: song.song_name,
            release_date: song.release_date,
            link: song.link,
            text,
            created_at: song.created_at,
            updated_at: song.updated_at,
        }
    }
}

/// `GET /songs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongListResponse {
    /// Songs matching the filter across all pages
    pub total_items: u64,
    pub page: u32,
    pub limit: u32,
    pub songs: Vec<SongResponse>,
}

/// `GET /songs/:songName/lyrics`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricsResponse {
    pub song_name: String,
    pub verse_page: u32,
    pub verse_limit: u32,
    pub total_verses: usize,
    pub verses: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_library::models::Artist;

    #[test]
    fn test_song_response_decodes_lyrics() {
        let artist = Artist::new("Muse");
        let mut song = SongDetail::new(&artist, "Hysteria");
        song.text = Some("a\n\nb".to_string());
        song.release_date = NaiveDate::from_ymd_opt(2003, 12, 1);

        let response = SongResponse::from(song);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["text"]["verses"], serde_json::json!(["a", "b"]));
        assert_eq!(json["release_date"], "2003-12-01");
        assert_eq!(json["group_name"], "Muse");
    }

    #[test]
    fn test_new_song_request_defaults() {
        let request: NewSongRequest = serde_json::from_str(r#"{"song":"x"}"#).unwrap();
        assert_eq!(request.group, "");
        assert_eq!(request.song, "x");
        assert!(request.text.is_none());
    }

    #[test]
    fn test_info_response() {
        let info = InfoResponse::default();
        assert_eq!(info.title, "Music info");
        assert!(!info.version.is_empty());
    }
}
