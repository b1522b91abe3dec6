use crate::repositories::pagination::PageOutOfRange;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{entity_type} not found: {name}")]
    NotFound { entity_type: String, name: String },

    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },

    #[error("{entity_type} already exists: {name}")]
    Conflict { entity_type: String, name: String },

    #[error(transparent)]
    PageOutOfRange(#[from] PageOutOfRange),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LibraryError>;
