use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{ConnectOptions, Connection, Row};
use std::str::FromStr;

use super::{RecipeStore, StoreError};
use crate::models::{Nutrition, Recipe, RecipeKey, StoredRecipe};

/// Width of a `recipes` row: id, name, ingredients, instructions,
/// serving_size and the four nutrition columns.
const SCHEMA_COLUMNS: usize = 9;

/// Recipe collection kept as one row per recipe in a SQLite table.
///
/// A connection is opened for each operation and closed before the
/// operation returns, whether or not it succeeded.
pub struct TableStore {
    options: SqliteConnectOptions,
}

impl TableStore {
    pub fn new(options: SqliteConnectOptions) -> Self {
        Self {
            options: options.create_if_missing(true),
        }
    }

    pub fn from_url(url: &str) -> Result<Self, StoreError> {
        Ok(Self::new(SqliteConnectOptions::from_str(url)?))
    }

    /// Connect to `url` and make sure the `recipes` table exists.
    pub async fn open(url: &str) -> Result<Self, StoreError> {
        let store = Self::from_url(url)?;
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        let mut conn = self.connect().await?;
        let result = sqlx::migrate!("./migrations").run(&mut conn).await;
        let closed = conn.close().await;
        result?;
        closed?;
        Ok(())
    }

    /// Insert `recipe` as a new row. The generated id is not returned.
    pub async fn insert(&self, recipe: &Recipe) -> Result<(), StoreError> {
        let mut conn = self.connect().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO recipes (name, ingredients, instructions, serving_size, calories, fat, carbohydrates, protein)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&recipe.name)
        .bind(recipe.ingredients_block())
        .bind(&recipe.instructions)
        .bind(&recipe.serving_size)
        .bind(recipe.nutrition.calories)
        .bind(recipe.nutrition.fat)
        .bind(recipe.nutrition.carbohydrates)
        .bind(recipe.nutrition.protein)
        .execute(&mut conn)
        .await;
        let closed = conn.close().await;
        result?;
        closed?;

        tracing::debug!("Inserted recipe '{}'", recipe.name);
        Ok(())
    }

    async fn connect(&self) -> Result<SqliteConnection, StoreError> {
        Ok(self.options.connect().await?)
    }
}

/// Rebuild a recipe from a full-width row. Narrower rows come from an
/// older schema and yield `None`.
fn recipe_from_row(row: &SqliteRow) -> Result<Option<StoredRecipe>, sqlx::Error> {
    if row.len() < SCHEMA_COLUMNS {
        return Ok(None);
    }

    let amount = |column: &str| -> Result<f64, sqlx::Error> {
        Ok(row.try_get::<Option<f64>, _>(column)?.unwrap_or(0.0))
    };
    let text = |column: &str| -> Result<String, sqlx::Error> {
        Ok(row.try_get::<Option<String>, _>(column)?.unwrap_or_default())
    };

    let recipe = Recipe {
        name: row.try_get("name")?,
        ingredients: split_ingredients_column(&text("ingredients")?),
        instructions: text("instructions")?,
        nutrition: Nutrition {
            calories: amount("calories")?,
            fat: amount("fat")?,
            carbohydrates: amount("carbohydrates")?,
            protein: amount("protein")?,
        },
        serving_size: text("serving_size")?,
    };

    Ok(Some(StoredRecipe {
        key: RecipeKey::Id(row.try_get("id")?),
        recipe,
    }))
}

fn split_ingredients_column(column: &str) -> Vec<String> {
    column
        .split('\n')
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

impl RecipeStore for TableStore {
    fn backend_name(&self) -> &'static str {
        "table"
    }

    async fn load_all(&self) -> Result<Vec<StoredRecipe>, StoreError> {
        let mut conn = self.connect().await?;
        let rows = sqlx::query("SELECT * FROM recipes ORDER BY id")
            .fetch_all(&mut conn)
            .await;
        let closed = conn.close().await;
        let rows = rows?;
        closed?;

        let mut recipes = Vec::with_capacity(rows.len());
        for row in &rows {
            match recipe_from_row(row)? {
                Some(recipe) => recipes.push(recipe),
                None => tracing::debug!(
                    "Skipping recipe row with {} column(s), expected {}",
                    row.len(),
                    SCHEMA_COLUMNS
                ),
            }
        }
        Ok(recipes)
    }

    async fn append(&self, recipe: &Recipe) -> Result<(), StoreError> {
        self.insert(recipe).await
    }

    async fn update(&self, _key: RecipeKey, _recipe: &Recipe) -> Result<(), StoreError> {
        Err(StoreError::Unsupported {
            backend: self.backend_name(),
            operation: "editing recipes",
        })
    }
}
