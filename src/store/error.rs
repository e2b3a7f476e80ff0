use thiserror::Error;

use crate::config::ConfigError;
use crate::models::RecipeKey;

/// Errors surfaced by the recipe stores.
///
/// Unreadable or mis-shaped file documents are not errors; they read as an
/// empty collection.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode recipes: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Recipe index {index} is out of range ({len} recipe(s) stored)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("The {backend} backend does not support {operation}")]
    Unsupported {
        backend: &'static str,
        operation: &'static str,
    },

    #[error("The {backend} backend cannot address a recipe by {key}")]
    KeyMismatch {
        backend: &'static str,
        key: RecipeKey,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl StoreError {
    /// True when the database rejected a value because its type did not
    /// match the column it was read from or written to.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(
            self,
            StoreError::Database(
                sqlx::Error::ColumnDecode { .. }
                    | sqlx::Error::Decode(_)
                    | sqlx::Error::TypeNotFound { .. }
                    | sqlx::Error::ColumnNotFound(_)
            )
        )
    }
}
