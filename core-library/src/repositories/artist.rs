//! Artist repository trait and implementation

use crate::error::{LibraryError, Result};
use crate::models::Artist;
use crate::normalize::normalize;
use async_trait::async_trait;
use sqlx::{query, query_as, SqlitePool};
use tracing::{debug, info};

/// Artist repository interface for data access operations
#[async_trait]
pub trait ArtistRepository: Send + Sync {
    /// Find an artist by name
    ///
    /// The name is normalized before lookup, so `"A - B"` finds `"A-B"`.
    ///
    /// # Returns
    /// - `Ok(Some(artist))` if found
    /// - `Ok(None)` if not found
    /// - `Err` if database error occurs
    async fn find_by_name(&self, name: &str) -> Result<Option<Artist>>;

    /// Return the artist with this name, creating it first if needed
    ///
    /// Concurrent callers racing on the same new name all receive the same
    /// row; the `UNIQUE(name)` constraint decides which insert wins.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the normalized name is empty.
    async fn find_or_create(&self, name: &str) -> Result<Artist>;
}

/// SQLite implementation of ArtistRepository
#[derive(Clone)]
pub struct SqliteArtistRepository {
    pool: SqlitePool,
}

impl SqliteArtistRepository {
    /// Create a new SqliteArtistRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArtistRepository for SqliteArtistRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Artist>> {
        let artist = query_as::<_, Artist>("SELECT * FROM artists WHERE name = ?")
            .bind(normalize(name))
            .fetch_optional(&self.pool)
            .await?;

        Ok(artist)
    }

    async fn find_or_create(&self, name: &str) -> Result<Artist> {
        if let Some(artist) = self.find_by_name(name).await? {
            return Ok(artist);
        }

        let candidate = Artist::new(name);
        candidate
            .validate()
            .map_err(|message| LibraryError::InvalidInput {
                field: "group".to_string(),
                message,
            })?;

        let inserted = query(
            r#"
            INSERT INTO artists (id, name, normalized_name, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(name) DO NOTHING
            "#,
        )
        .bind(&candidate.id)
        .bind(&candidate.name)
        .bind(&candidate.normalized_name)
        .bind(candidate.created_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted > 0 {
            info!(artist_id = %candidate.id, name = %candidate.name, "Created artist");
        } else {
            debug!(name = %candidate.name, "Artist created concurrently, reusing it");
        }

        self.find_by_name(&candidate.name)
            .await?
            .ok_or_else(|| LibraryError::NotFound {
                entity_type: "Artist".to_string(),
                name: candidate.name.clone(),
            })
    }
}

/// Map a unique-constraint violation to `Conflict`, anything else to `Database`
pub(crate) fn conflict_or_database(error: sqlx::Error, entity_type: &str, name: &str) -> LibraryError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => LibraryError::Conflict {
            entity_type: entity_type.to_string(),
            name: name.to_string(),
        },
        _ => LibraryError::Database(error),
    }
}
