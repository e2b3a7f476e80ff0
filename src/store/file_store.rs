use serde::Serialize;
use std::path::{Path, PathBuf};

use super::{RecipeStore, StoreError};
use crate::models::{Recipe, RecipeKey, StoredRecipe};

/// Recipe collection kept as a single JSON list on disk.
///
/// Every operation re-reads the document; writes replace the whole file.
/// Concurrent writers race and the last full overwrite wins.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every recipe in document order.
    ///
    /// A missing document reads as empty. So does a document that is not
    /// valid JSON or is not a list; both are logged as warnings but never
    /// returned as errors. Entries of a list that are not recipes are
    /// skipped with a warning and the rest are kept.
    pub async fn load_recipes(&self) -> Result<Vec<Recipe>, StoreError> {
        self.ensure_dir().await?;

        let contents = match tokio::fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No recipe document at '{}'", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        Ok(decode_document(&self.path, &contents))
    }

    /// Replace the recipe at `index`. The document is left untouched when
    /// `index` is out of range.
    pub async fn update_at(&self, index: usize, recipe: &Recipe) -> Result<(), StoreError> {
        let mut recipes = self.load_recipes().await?;
        let len = recipes.len();
        let slot = recipes
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfRange { index, len })?;
        *slot = recipe.clone();
        self.persist(&recipes).await
    }

    /// Overwrite the document with `recipes`, four-space indented.
    ///
    /// The write is not atomic: a crash part way through can leave a
    /// truncated document, which then reads as empty.
    pub async fn persist(&self, recipes: &[Recipe]) -> Result<(), StoreError> {
        self.ensure_dir().await?;

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        recipes.serialize(&mut serializer)?;

        tokio::fs::write(&self.path, buf).await?;
        tracing::debug!(
            "Wrote {} recipe(s) to '{}'",
            recipes.len(),
            self.path.display()
        );
        Ok(())
    }

    async fn ensure_dir(&self) -> Result<(), StoreError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                tokio::fs::create_dir_all(parent).await?;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

fn decode_document(path: &Path, contents: &[u8]) -> Vec<Recipe> {
    let value: serde_json::Value = match serde_json::from_slice(contents) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                "Recipe document '{}' is not valid JSON, reading it as empty: {}",
                path.display(),
                e
            );
            return Vec::new();
        }
    };

    let entries = match value {
        serde_json::Value::Array(entries) => entries,
        _ => {
            tracing::warn!(
                "Recipe document '{}' does not hold a list, reading it as empty",
                path.display()
            );
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<Recipe>(entry) {
            Ok(recipe) => Some(recipe),
            Err(e) => {
                tracing::warn!(
                    "Skipping malformed entry {} in recipe document '{}': {}",
                    index,
                    path.display(),
                    e
                );
                None
            }
        })
        .collect()
}

impl RecipeStore for FileStore {
    fn backend_name(&self) -> &'static str {
        "file"
    }

    async fn load_all(&self) -> Result<Vec<StoredRecipe>, StoreError> {
        let recipes = self.load_recipes().await?;
        Ok(recipes
            .into_iter()
            .enumerate()
            .map(|(index, recipe)| StoredRecipe {
                key: RecipeKey::Index(index),
                recipe,
            })
            .collect())
    }

    async fn append(&self, recipe: &Recipe) -> Result<(), StoreError> {
        let mut recipes = self.load_recipes().await?;
        recipes.push(recipe.clone());
        self.persist(&recipes).await
    }

    async fn update(&self, key: RecipeKey, recipe: &Recipe) -> Result<(), StoreError> {
        match key {
            RecipeKey::Index(index) => self.update_at(index, recipe).await,
            RecipeKey::Id(_) => Err(StoreError::KeyMismatch {
                backend: self.backend_name(),
                key,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Nutrition;
    use tempfile::TempDir;

    struct TestContext {
        store: FileStore,
        _temp_dir: TempDir, // Keep alive for duration of test
    }

    fn setup_store() -> TestContext {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("recipes.json");
        TestContext {
            store: FileStore::new(path),
            _temp_dir: temp_dir,
        }
    }

    fn omelette() -> Recipe {
        Recipe::new("Omelette")
            .with_ingredients(["2 eggs", "salt"])
            .with_instructions("Whisk. Cook.")
            .with_serving_size("1 plate")
            .with_nutrition(Nutrition::new(200.0, 14.0, 1.0, 12.0))
    }

    #[tokio::test]
    async fn test_missing_document_reads_empty_and_creates_dir() {
        let ctx = setup_store();
        let dir = ctx.store.path().parent().unwrap().to_path_buf();
        assert!(!dir.exists());

        let recipes = ctx.store.load_all().await.unwrap();
        assert!(recipes.is_empty());
        assert!(dir.is_dir());
        assert!(!ctx.store.path().exists());
    }

    #[tokio::test]
    async fn test_append_then_load_round_trip() {
        let ctx = setup_store();
        ctx.store.append(&omelette()).await.unwrap();

        let recipes = ctx.store.load_all().await.unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].key, RecipeKey::Index(0));
        assert_eq!(recipes[0].recipe, omelette());
    }

    #[tokio::test]
    async fn test_append_preserves_order() {
        let ctx = setup_store();
        ctx.store.append(&Recipe::new("First")).await.unwrap();
        ctx.store.append(&Recipe::new("Second")).await.unwrap();

        let names: Vec<String> = ctx
            .store
            .load_recipes()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    // An unreadable document is treated as "no data" rather than an error.
    #[tokio::test]
    async fn test_invalid_json_reads_empty() {
        let ctx = setup_store();
        std::fs::create_dir_all(ctx.store.path().parent().unwrap()).unwrap();
        std::fs::write(ctx.store.path(), "[{\"name\": \"Broken\"").unwrap();

        assert!(ctx.store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_object_document_reads_empty() {
        let ctx = setup_store();
        std::fs::create_dir_all(ctx.store.path().parent().unwrap()).unwrap();
        std::fs::write(ctx.store.path(), r#"{"name": "Not a list"}"#).unwrap();

        assert!(ctx.store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_of_non_recipes_reads_empty() {
        let ctx = setup_store();
        std::fs::create_dir_all(ctx.store.path().parent().unwrap()).unwrap();
        std::fs::write(ctx.store.path(), "[1, 2, 3]").unwrap();

        assert!(ctx.store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_entries_are_skipped_and_survive_append() {
        let ctx = setup_store();
        std::fs::create_dir_all(ctx.store.path().parent().unwrap()).unwrap();
        std::fs::write(
            ctx.store.path(),
            r#"[{"name": "A", "ingredients": ["x"]}, 7, {"name": "B"}, {"ingredients": ["orphan"]}]"#,
        )
        .unwrap();

        let names = |recipes: Vec<Recipe>| -> Vec<String> {
            recipes.into_iter().map(|r| r.name).collect()
        };
        assert_eq!(names(ctx.store.load_recipes().await.unwrap()), vec!["A", "B"]);

        ctx.store.append(&Recipe::new("C")).await.unwrap();
        assert_eq!(
            names(ctx.store.load_recipes().await.unwrap()),
            vec!["A", "B", "C"]
        );
    }

    #[tokio::test]
    async fn test_null_nutrition_does_not_hide_other_recipes() {
        let ctx = setup_store();
        ctx.store.append(&Recipe::new("Keeper")).await.unwrap();

        let mut broken = Recipe::new("Overflow");
        broken.nutrition.calories = f64::INFINITY;
        ctx.store.append(&broken).await.unwrap();
        let contents = std::fs::read_to_string(ctx.store.path()).unwrap();
        assert!(contents.contains("\"calories\": null"));

        ctx.store.append(&Recipe::new("Next")).await.unwrap();
        let recipes = ctx.store.load_recipes().await.unwrap();
        let names: Vec<&str> = recipes.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Keeper", "Overflow", "Next"]);
        assert_eq!(recipes[1].nutrition.calories, 0.0);
    }

    #[tokio::test]
    async fn test_missing_nutrition_fields_default_on_load() {
        let ctx = setup_store();
        std::fs::create_dir_all(ctx.store.path().parent().unwrap()).unwrap();
        std::fs::write(
            ctx.store.path(),
            r#"[{"name": "Old", "ingredients": ["x"], "instructions": "y", "nutrition": {"fat": 3}}]"#,
        )
        .unwrap();

        let recipes = ctx.store.load_recipes().await.unwrap();
        assert_eq!(recipes[0].nutrition, Nutrition::new(0.0, 3.0, 0.0, 0.0));
        assert_eq!(recipes[0].serving_size, "");
    }

    #[tokio::test]
    async fn test_update_at_replaces_record() {
        let ctx = setup_store();
        ctx.store.append(&omelette()).await.unwrap();

        let mut edited = omelette();
        edited.name = "Cheese Omelette".to_string();
        ctx.store.update(RecipeKey::Index(0), &edited).await.unwrap();

        let recipes = ctx.store.load_recipes().await.unwrap();
        assert_eq!(recipes, vec![edited]);
    }

    #[tokio::test]
    async fn test_update_out_of_range_leaves_document_unchanged() {
        let ctx = setup_store();
        ctx.store.append(&omelette()).await.unwrap();

        let result = ctx.store.update_at(1, &Recipe::new("Ghost")).await;
        assert!(matches!(
            result,
            Err(StoreError::IndexOutOfRange { index: 1, len: 1 })
        ));

        let recipes = ctx.store.load_recipes().await.unwrap();
        assert_eq!(recipes, vec![omelette()]);
    }

    #[tokio::test]
    async fn test_update_by_id_is_rejected() {
        let ctx = setup_store();
        ctx.store.append(&omelette()).await.unwrap();

        let result = ctx.store.update(RecipeKey::Id(1), &omelette()).await;
        assert!(matches!(result, Err(StoreError::KeyMismatch { .. })));
    }

    #[tokio::test]
    async fn test_persist_writes_indented_list() {
        let ctx = setup_store();
        ctx.store.persist(&[Recipe::new("Tea")]).await.unwrap();

        let contents = std::fs::read_to_string(ctx.store.path()).unwrap();
        assert!(contents.starts_with("[\n    {\n        \"name\": \"Tea\""));
    }

    #[tokio::test]
    async fn test_persist_overwrites_previous_contents() {
        let ctx = setup_store();
        ctx.store.append(&Recipe::new("Old")).await.unwrap();
        ctx.store.persist(&[]).await.unwrap();

        assert!(ctx.store.load_all().await.unwrap().is_empty());
        let contents = std::fs::read_to_string(ctx.store.path()).unwrap();
        assert_eq!(contents, "[]");
    }
}
