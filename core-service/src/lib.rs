//! Song catalog service façade and HTTP API.
//!
//! [`CatalogService`] owns the request-level workflows (validation,
//! normalization, artist auto-creation, lyrics pagination) on top of the
//! repositories from `core-library`. The [`api`] module exposes it over HTTP
//! with axum; the `songbook` binary wires both to configuration, logging and
//! the SQLite pool.

pub mod api;
pub mod dto;
pub mod error;

pub use api::create_router;
pub use error::{ApiError, Result};

use std::sync::Arc;

use core_library::models::{parse_date, parse_date_lenient, SongDetail};
use core_library::normalize::{normalize, normalize_optional};
use core_library::query::FilterQueryBuilder;
use core_library::repositories::pagination::{parse_page_param, FIRST_PAGE};
use core_library::repositories::{
    paginate, ArtistRepository, PageRequest, SongRepository, SqliteArtistRepository,
    SqliteSongRepository,
};
use core_library::LibraryError;
use core_runtime::config::{ServiceConfig, DEFAULT_SONGS_PAGE_SIZE, DEFAULT_VERSES_PAGE_SIZE};
use sqlx::SqlitePool;
use tracing::{debug, info, instrument};

use dto::{
    InfoResponse, ListSongsParams, LyricsParams, LyricsResponse, NewSongRequest, SongListResponse,
    SongResponse, UpdateSongRequest,
};

/// Default page sizes applied when a request omits them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogSettings {
    pub songs_page_size: u32,
    pub verses_page_size: u32,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            songs_page_size: DEFAULT_SONGS_PAGE_SIZE,
            verses_page_size: DEFAULT_VERSES_PAGE_SIZE,
        }
    }
}

impl From<&ServiceConfig> for CatalogSettings {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            songs_page_size: config.songs_page_size,
            verses_page_size: config.verses_page_size,
        }
    }
}

/// Primary façade used by the HTTP handlers.
#[derive(Clone)]
pub struct CatalogService {
    artists: Arc<dyn ArtistRepository>,
    songs: Arc<dyn SongRepository>,
    settings: CatalogSettings,
}

impl CatalogService {
    /// Create a service from explicit repositories.
    pub fn new(
        artists: Arc<dyn ArtistRepository>,
        songs: Arc<dyn SongRepository>,
        settings: CatalogSettings,
    ) -> Self {
        Self {
            artists,
            songs,
            settings,
        }
    }

    /// Create a service backed by SQLite repositories sharing `pool`.
    pub fn from_pool(pool: SqlitePool, settings: CatalogSettings) -> Self {
        Self::new(
            Arc::new(SqliteArtistRepository::new(pool.clone())),
            Arc::new(SqliteSongRepository::new(pool)),
            settings,
        )
    }

    pub fn settings(&self) -> CatalogSettings {
        self.settings
    }

    pub fn info(&self) -> InfoResponse {
        InfoResponse::default()
    }

    /// Filtered, paginated song listing.
    #[instrument(skip(self))]
    pub async fn list_songs(&self, params: &ListSongsParams) -> Result<SongListResponse> {
        let filter = FilterQueryBuilder::build(params.field.as_deref(), params.value.as_deref())?;
        let request = PageRequest::from_params(
            params.page.as_deref(),
            params.limit.as_deref(),
            self.settings.songs_page_size,
        );

        let page = self.songs.query(filter, request).await?;

        Ok(SongListResponse {
            total_items: page.total,
            page: page.page,
            limit: page.page_size,
            songs: page.items.into_iter().map(SongResponse::from).collect(),
        })
    }

    /// Create a song, creating its artist first when the name is new.
    #[instrument(skip(self, request), fields(group = %request.group, song = %request.song))]
    pub async fn add_song(&self, request: NewSongRequest) -> Result<SongResponse> {
        let group = normalize(&request.group);
        if group.is_empty() {
            return Err(ApiError::BadRequest("artist name cannot be empty".into()));
        }

        let song_name = normalize(&request.song);
        if song_name.is_empty() {
            return Err(ApiError::BadRequest("song name cannot be empty".into()));
        }

        let release_date = match non_blank(request.release_date.as_deref()) {
            Some(raw) => Some(parse_date(raw).ok_or_else(|| invalid_date(raw))?),
            None => None,
        };

        let artist = self.artists.find_or_create(&group).await?;

        let mut song = SongDetail::new(&artist, &song_name);
        song.release_date = release_date;
        song.link = normalize_optional(request.link.as_deref());
        if let Some(text) = request.text.filter(|text| !text.is_empty()) {
            song.set_lyrics(&text)?;
        }

        self.songs.insert(&song).await?;

        info!(song_id = %song.id, artist_id = %artist.id, "Song added");
        Ok(song.into())
    }

    /// Apply a partial update to the song named `song_name`.
    ///
    /// The body is validated before the song is looked up, so an empty or
    /// malformed update answers 400 even when no such song exists.
    #[instrument(skip(self, request))]
    pub async fn update_song(
        &self,
        song_name: &str,
        request: UpdateSongRequest,
    ) -> Result<SongResponse> {
        let new_name = normalize_optional(request.song_name.as_deref());
        let artist_name = normalize_optional(request.artist_name.as_deref());
        let raw_date = non_blank(request.release_date.as_deref());
        let link = normalize_optional(request.group_link.as_deref());
        let text = request.text.filter(|text| !text.is_empty());

        if new_name.is_none()
            && artist_name.is_none()
            && raw_date.is_none()
            && link.is_none()
            && text.is_none()
        {
            return Err(ApiError::BadRequest("No fields to update".into()));
        }

        let release_date = match raw_date {
            Some(raw) => Some(parse_date_lenient(raw).ok_or_else(|| invalid_date(raw))?),
            None => None,
        };

        let mut song = self.require_song(song_name).await?;

        if let Some(artist_name) = artist_name {
            let artist = self
                .artists
                .find_by_name(&artist_name)
                .await?
                .ok_or_else(|| ApiError::NotFound("Artist not found".into()))?;
            song.assign_artist(&artist);
        }
        if let Some(new_name) = new_name {
            song.rename(&new_name);
        }
        if release_date.is_some() {
            song.release_date = release_date;
        }
        if link.is_some() {
            song.link = link;
        }
        if let Some(text) = text {
            song.set_lyrics(&text)?;
        }

        song.touch();
        self.songs.update(&song).await?;

        info!(song_id = %song.id, "Song updated");
        Ok(song.into())
    }

    /// Delete the song named `song_name`. Its artist is kept.
    #[instrument(skip(self))]
    pub async fn delete_song(&self, song_name: &str) -> Result<()> {
        let song = self.require_song(song_name).await?;

        if !self.songs.delete(&song.id).await? {
            return Err(ApiError::NotFound("Song not found".into()));
        }

        info!(song_id = %song.id, "Song deleted");
        Ok(())
    }

    /// One page of verses of the song named `song_name`.
    #[instrument(skip(self))]
    pub async fn lyrics(&self, song_name: &str, params: &LyricsParams) -> Result<LyricsResponse> {
        let song = self.require_song(song_name).await?;
        let text = song.lyrics();

        let verse_page = parse_page_param(params.verse_page.as_deref(), FIRST_PAGE);
        let verse_limit =
            parse_page_param(params.verse_limit.as_deref(), self.settings.verses_page_size);
        let window = paginate(text.len(), verse_page, verse_limit).map_err(LibraryError::from)?;

        debug!(total = text.len(), start = window.start, end = window.end, "Serving verses");

        Ok(LyricsResponse {
            verses: text.window(window).to_vec(),
            total_verses: text.len(),
            song_name: song.song_name,
            verse_page,
            verse_limit,
        })
    }

    async fn require_song(&self, song_name: &str) -> Result<SongDetail> {
        self.songs
            .find_by_name(song_name)
            .await?
            .ok_or_else(|| ApiError::NotFound("Song not found".into()))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn invalid_date(raw: &str) -> ApiError {
    ApiError::BadRequest(format!(
        "invalid release_date '{}', expected YYYY-MM-DD",
        raw
    ))
}
