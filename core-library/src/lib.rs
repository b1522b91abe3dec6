//! # Song Catalog Library
//!
//! Owns the catalog database and the text-processing core of the service.
//!
//! ## Overview
//!
//! This crate manages:
//! - Display-name normalization ([`normalize`])
//! - Lyrics storage encoding with legacy raw-text fallback ([`lyrics`])
//! - 1-based pagination shared by listings and lyrics ([`repositories::pagination`])
//! - Filter validation and SQL composition for song listings ([`query`])
//! - SQLite schema, migrations and repositories for artists and songs

pub mod db;
pub mod error;
pub mod lyrics;
pub mod models;
pub mod normalize;
pub mod query;
pub mod repositories;

pub use error::{LibraryError, Result};
pub use models::{Artist, SongDetail, SongText};
pub use query::{FilterQueryBuilder, FilterSpec};
