use serde::{Deserialize, Serialize};
use std::fmt;

use super::nutrition::Nutrition;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub nutrition: Nutrition,
    #[serde(default)]
    pub serving_size: String,
}

impl Recipe {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ingredients: Vec::new(),
            instructions: String::new(),
            nutrition: Nutrition::default(),
            serving_size: String::new(),
        }
    }

    pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients = ingredients.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn with_nutrition(mut self, nutrition: Nutrition) -> Self {
        self.nutrition = nutrition;
        self
    }

    pub fn with_serving_size(mut self, serving_size: impl Into<String>) -> Self {
        self.serving_size = serving_size.into();
        self
    }

    /// Ingredients as a single newline-separated block.
    pub fn ingredients_block(&self) -> String {
        self.ingredients.join("\n")
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.chars().count()))?;

        if !self.serving_size.is_empty() {
            writeln!(f, "Serving Size: {}", self.serving_size)?;
        }

        if !self.ingredients.is_empty() {
            writeln!(f, "\nIngredients:")?;
            for ingredient in &self.ingredients {
                writeln!(f, "  - {}", ingredient)?;
            }
        }

        if !self.instructions.is_empty() {
            writeln!(f, "\nInstructions:\n{}", self.instructions)?;
        }

        writeln!(f, "\nNutrition Facts:")?;
        writeln!(f, "{}", self.nutrition)
    }
}

/// Identity of a record inside a store.
///
/// The file backend identifies records by their position in the document,
/// so reordering the document changes identity. The table backend uses the
/// surrogate key assigned on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum RecipeKey {
    Index(usize),
    Id(i64),
}

impl fmt::Display for RecipeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipeKey::Index(index) => write!(f, "index {}", index),
            RecipeKey::Id(id) => write!(f, "id {}", id),
        }
    }
}

/// A recipe as read back from a store, paired with its identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredRecipe {
    pub key: RecipeKey,
    #[serde(flatten)]
    pub recipe: Recipe,
}
