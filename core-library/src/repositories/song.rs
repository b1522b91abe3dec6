//! Song repository trait and implementation

use crate::error::{LibraryError, Result};
use crate::models::SongDetail;
use crate::normalize::normalize;
use crate::query::{FilterSpec, SongQuerySpec};
use crate::repositories::artist::conflict_or_database;
use crate::repositories::{Page, PageRequest};
use async_trait::async_trait;
use sqlx::{query, query_as, SqlitePool};
use tracing::debug;

/// Song repository interface for data access operations
#[async_trait]
pub trait SongRepository: Send + Sync {
    /// Find a song by its (normalized) name
    ///
    /// Names are unique per artist only; when several artists have a song
    /// with this name, the oldest one is returned.
    async fn find_by_name(&self, song_name: &str) -> Result<Option<SongDetail>>;

    /// Insert a new song
    ///
    /// # Errors
    /// Returns error if:
    /// - The artist already has a song with this name (`Conflict`)
    /// - Song validation fails
    /// - The referenced artist does not exist
    async fn insert(&self, song: &SongDetail) -> Result<()>;

    /// Persist every mutable column of an existing song
    ///
    /// # Errors
    /// Returns error if:
    /// - Song does not exist (`NotFound`)
    /// - The new name collides with another song of the same artist (`Conflict`)
    async fn update(&self, song: &SongDetail) -> Result<()>;

    /// Delete a song by ID
    ///
    /// # Returns
    /// - `Ok(true)` if the song was deleted
    /// - `Ok(false)` if the song was not found
    async fn delete(&self, id: &str) -> Result<bool>;

    /// List songs matching an optional filter, oldest first
    ///
    /// `Page::total` counts every matching song, not only this page.
    ///
    /// # Errors
    /// Returns `PageOutOfRange` when the page starts past the last match.
    async fn query(
        &self,
        filter: Option<FilterSpec>,
        page_request: PageRequest,
    ) -> Result<Page<SongDetail>>;
}

/// SQLite implementation of SongRepository
#[derive(Clone)]
pub struct SqliteSongRepository {
    pool: SqlitePool,
}

impl SqliteSongRepository {
    /// Create a new SqliteSongRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn validate(song: &SongDetail) -> Result<()> {
    song.validate().map_err(|message| LibraryError::InvalidInput {
        field: "song".to_string(),
        message,
    })
}

#[async_trait]
impl SongRepository for SqliteSongRepository {
    async fn find_by_name(&self, song_name: &str) -> Result<Option<SongDetail>> {
        let song = query_as::<_, SongDetail>(
            "SELECT * FROM songs WHERE song_name = ? ORDER BY created_at ASC, rowid ASC LIMIT 1",
        )
        .bind(normalize(song_name))
        .fetch_optional(&self.pool)
        .await?;

        Ok(song)
    }

    async fn insert(&self, song: &SongDetail) -> Result<()> {
        validate(song)?;

        query(
            r#"
            INSERT INTO songs (
                id, artist_id, group_name, song_name, normalized_song_name,
                release_date, link, text, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&song.id)
        .bind(&song.artist_id)
        .bind(&song.group_name)
        .bind(&song.song_name)
        .bind(&song.normalized_song_name)
        .bind(song.release_date)
        .bind(&song.link)
        .bind(&song.text)
        .bind(song.created_at)
        .bind(song.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "Song", &song.song_name))?;

        debug!(song_id = %song.id, song_name = %song.song_name, "Inserted song");
        Ok(())
    }

    async fn update(&self, song: &SongDetail) -> Result<()> {
        validate(song)?;

        let result = query(
            r#"
            UPDATE songs
            SET artist_id = ?, group_name = ?, song_name = ?, normalized_song_name = ?,
                release_date = ?, link = ?, text = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&song.artist_id)
        .bind(&song.group_name)
        .bind(&song.song_name)
        .bind(&song.normalized_song_name)
        .bind(song.release_date)
        .bind(&song.link)
        .bind(&song.text)
        .bind(song.updated_at)
        .bind(&song.id)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "Song", &song.song_name))?;

        if result.rows_affected() == 0 {
            return Err(LibraryError::NotFound {
                entity_type: "Song".to_string(),
                name: song.song_name.clone(),
            });
        }

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = query("DELETE FROM songs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn query(
        &self,
        filter: Option<FilterSpec>,
        page_request: PageRequest,
    ) -> Result<Page<SongDetail>> {
        let spec = SongQuerySpec::build(filter.as_ref());

        let mut count = query_as::<_, (i64,)>(&spec.count_sql);
        for bind in &spec.binds {
            count = count.bind(bind);
        }
        let total = count.fetch_one(&self.pool).await?.0.max(0);

        page_request.window(total as usize)?;

        let mut select = query_as::<_, SongDetail>(&spec.select_sql);
        for bind in &spec.binds {
            select = select.bind(bind);
        }
        let songs = select
            .bind(page_request.limit() as i64)
            .bind(page_request.offset() as i64)
            .fetch_all(&self.pool)
            .await?;

        debug!(
            total,
            returned = songs.len(),
            page = page_request.page,
            "Queried songs"
        );

        Ok(Page::new(songs, total as u64, page_request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;
    use crate::models::{parse_date, Artist, SongText};
    use crate::query::FilterQueryBuilder;
    use crate::repositories::{ArtistRepository, SqliteArtistRepository};

    struct Fixture {
        pool: SqlitePool,
        artists: SqliteArtistRepository,
        songs: SqliteSongRepository,
    }

    async fn setup() -> Fixture {
        let pool = create_test_pool().await.unwrap();
        Fixture {
            artists: SqliteArtistRepository::new(pool.clone()),
            songs: SqliteSongRepository::new(pool.clone()),
            pool,
        }
    }

    impl Fixture {
        async fn add(&self, group: &str, song_name: &str) -> SongDetail {
            let artist = self.artists.find_or_create(group).await.unwrap();
            let song = SongDetail::new(&artist, song_name);
            self.songs.insert(&song).await.unwrap();
            song
        }

        async fn song_count(&self) -> i64 {
            let count: (i64,) = query_as("SELECT COUNT(*) FROM songs")
                .fetch_one(&self.pool)
                .await
                .unwrap();
            count.0
        }
    }

    fn filter(field: &str, value: &str) -> Option<FilterSpec> {
        FilterQueryBuilder::build(Some(field), Some(value)).unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_find_song() {
        let fx = setup().await;
        let artist = fx.artists.find_or_create("Muse").await.unwrap();

        let mut song = SongDetail::new(&artist, "Supermassive Black Hole");
        song.release_date = parse_date("2006-07-16");
        song.link = Some("https://www.youtube.com/watch?v=Xsp3_a-PMTw".to_string());
        song.set_lyrics(&SongText::new(vec!["Ooh baby".into(), "".into()]))
            .unwrap();
        fx.songs.insert(&song).await.unwrap();

        let found = fx
            .songs
            .find_by_name(" Supermassive  Black Hole ")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, song);
        assert_eq!(found.lyrics().verses, vec!["Ooh baby", ""]);
    }

    #[tokio::test]
    async fn test_duplicate_song_for_same_artist_conflicts() {
        let fx = setup().await;
        fx.add("Muse", "Hysteria").await;

        let artist = fx.artists.find_by_name("Muse").await.unwrap().unwrap();
        let err = fx
            .songs
            .insert(&SongDetail::new(&artist, "Hysteria"))
            .await
            .unwrap_err();
        assert!(matches!(err, LibraryError::Conflict { .. }), "got {:?}", err);

        // Same title by another artist is fine
        fx.add("Cover Band", "Hysteria").await;
        assert_eq!(fx.song_count().await, 2);
    }

    #[tokio::test]
    async fn test_find_by_name_prefers_oldest() {
        let fx = setup().await;
        let first = fx.add("Muse", "Hysteria").await;
        fx.add("Cover Band", "Hysteria").await;

        let found = fx.songs.find_by_name("Hysteria").await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
    }

    #[tokio::test]
    async fn test_insert_with_unknown_artist_fails() {
        let fx = setup().await;
        let orphan = SongDetail::new(&Artist::new("Ghost"), "Nothing");
        assert!(fx.songs.insert(&orphan).await.is_err());
    }

    #[tokio::test]
    async fn test_update_song() {
        let fx = setup().await;
        let mut song = fx.add("Muse", "Old Name").await;
        let queen = fx.artists.find_or_create("Queen").await.unwrap();

        song.rename("New Name");
        song.assign_artist(&queen);
        song.release_date = parse_date("1975-10-31");
        song.touch();
        fx.songs.update(&song).await.unwrap();

        let found = fx.songs.find_by_name("New Name").await.unwrap().unwrap();
        assert_eq!(found.id, song.id);
        assert_eq!(found.song_name, "New Name");
        assert_eq!(found.group_name, "Queen");
        assert_eq!(found.release_date, parse_date("1975-10-31"));
        assert!(fx.songs.find_by_name("Old Name").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_rename_collision_conflicts() {
        let fx = setup().await;
        fx.add("Muse", "Hysteria").await;
        let mut other = fx.add("Muse", "Uprising").await;

        other.rename("Hysteria");
        let err = fx.songs.update(&other).await.unwrap_err();
        assert!(matches!(err, LibraryError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_update_missing_song() {
        let fx = setup().await;
        let artist = fx.artists.find_or_create("Muse").await.unwrap();
        let err = fx
            .songs
            .update(&SongDetail::new(&artist, "Never Stored"))
            .await
            .unwrap_err();
        assert!(matches!(err, LibraryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_song_keeps_artist() {
        let fx = setup().await;
        let song = fx.add("Muse", "Hysteria").await;

        assert!(fx.songs.delete(&song.id).await.unwrap());
        assert!(!fx.songs.delete(&song.id).await.unwrap());
        assert!(fx.songs.find_by_name("Hysteria").await.unwrap().is_none());
        assert!(fx.artists.find_by_name("Muse").await.unwrap().is_some());
        assert_eq!(fx.song_count().await, 0);
    }

    #[tokio::test]
    async fn test_query_pagination() {
        let fx = setup().await;
        for i in 1..=5 {
            fx.add("Muse", &format!("Song {}", i)).await;
        }

        let page = fx.songs.query(None, PageRequest::new(2, 3)).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].song_name, "Song 4");

        let err = fx
            .songs
            .query(None, PageRequest::new(3, 3))
            .await
            .unwrap_err();
        assert!(matches!(err, LibraryError::PageOutOfRange(_)));
    }

    #[tokio::test]
    async fn test_query_empty_catalog_first_page() {
        let fx = setup().await;
        let page = fx.songs.query(None, PageRequest::new(1, 10)).await.unwrap();
        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_query_filters() {
        let fx = setup().await;
        let mut dated = fx.add("The Beatles", "Hey Jude").await;
        dated.release_date = parse_date("1968-08-26");
        fx.songs.update(&dated).await.unwrap();
        fx.add("The Beatles", "Let It Be").await;
        fx.add("Кино", "Группа крови").await;

        let page = fx
            .songs
            .query(filter("artist_name", "beatles"), PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_eq!(page.total, 2);

        let page = fx
            .songs
            .query(filter("song_name", "HEY JUDE"), PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, dated.id);

        let page = fx
            .songs
            .query(filter("song_name", "группа%"), PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_eq!(page.total, 1);

        let page = fx
            .songs
            .query(filter("release_date", "1968-08-26"), PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_eq!(page.total, 1);

        let page = fx
            .songs
            .query(filter("artist_name", "nobody"), PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_artist_filter_wildcards_are_literal() {
        let fx = setup().await;
        fx.add("The Beatles", "Hey Jude").await;

        let page = fx
            .songs
            .query(filter("artist_name", "%"), PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }
}
