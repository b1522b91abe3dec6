//! # Repository Pattern Implementation
//!
//! Repository traits and SQLite implementations for the catalog entities.
//!
//! ## Architecture
//!
//! - Traits define the interface for each repository
//! - SQLite implementations use sqlx for async database access
//! - All operations return `Result<T>` for error handling
//! - Listings are paginated via the `Page<T>` wrapper
//!
//! ## Available Repositories
//!
//! - `ArtistRepository` - Artists, created on demand by name
//! - `SongRepository` - Songs with their stored lyrics and filtered listing

pub mod artist;
pub mod pagination;
pub mod song;

pub use artist::{ArtistRepository, SqliteArtistRepository};
pub use pagination::{paginate, Page, PageOutOfRange, PageRequest};
pub use song::{SongRepository, SqliteSongRepository};
