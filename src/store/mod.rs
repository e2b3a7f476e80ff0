//! Recipe persistence.
//!
//! Two interchangeable backends implement [`RecipeStore`]: a JSON document
//! on disk ([`FileStore`]) and a SQLite table ([`TableStore`]). Neither
//! caches anything; each call goes back to the backend.

mod error;
mod file_store;
mod table_store;

pub use error::StoreError;
pub use file_store::FileStore;
pub use table_store::TableStore;

use crate::config::{BackendKind, Config};
use crate::models::{Recipe, RecipeKey, StoredRecipe};

#[allow(async_fn_in_trait)]
pub trait RecipeStore {
    /// Short name used in messages ("file", "table").
    fn backend_name(&self) -> &'static str;

    /// Every stored recipe, in storage order.
    async fn load_all(&self) -> Result<Vec<StoredRecipe>, StoreError>;

    async fn append(&self, recipe: &Recipe) -> Result<(), StoreError>;

    /// Replace the whole record addressed by `key`.
    async fn update(&self, key: RecipeKey, recipe: &Recipe) -> Result<(), StoreError>;
}

/// Append when `key` is `None`, otherwise replace the record at `key`.
pub async fn save_recipe<S: RecipeStore>(
    store: &S,
    key: Option<RecipeKey>,
    recipe: &Recipe,
) -> Result<(), StoreError> {
    match key {
        None => store.append(recipe).await,
        Some(key) => store.update(key, recipe).await,
    }
}

/// The store selected by configuration.
pub enum Backend {
    File(FileStore),
    Table(TableStore),
}

impl Backend {
    pub async fn open(config: &Config) -> Result<Self, StoreError> {
        match config.backend.value {
            BackendKind::File => {
                let store = FileStore::new(config.data_path.value.clone());
                tracing::debug!("Using file backend at '{}'", store.path().display());
                Ok(Backend::File(store))
            }
            BackendKind::Table => {
                let url = config.table.connection_url()?;
                if let Some(parent) = config.table.database.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                tracing::debug!("Using table backend at '{}'", url);
                Ok(Backend::Table(TableStore::open(&url).await?))
            }
        }
    }
}

impl RecipeStore for Backend {
    fn backend_name(&self) -> &'static str {
        match self {
            Backend::File(store) => store.backend_name(),
            Backend::Table(store) => store.backend_name(),
        }
    }

    async fn load_all(&self) -> Result<Vec<StoredRecipe>, StoreError> {
        match self {
            Backend::File(store) => store.load_all().await,
            Backend::Table(store) => store.load_all().await,
        }
    }

    async fn append(&self, recipe: &Recipe) -> Result<(), StoreError> {
        match self {
            Backend::File(store) => store.append(recipe).await,
            Backend::Table(store) => store.append(recipe).await,
        }
    }

    async fn update(&self, key: RecipeKey, recipe: &Recipe) -> Result<(), StoreError> {
        match self {
            Backend::File(store) => store.update(key, recipe).await,
            Backend::Table(store) => store.update(key, recipe).await,
        }
    }
}
