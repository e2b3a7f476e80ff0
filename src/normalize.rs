//! Conversion of raw form input into canonical [`Recipe`] records.
//!
//! Required-field presence is checked by the caller before normalizing;
//! nothing here rejects input.

use crate::models::{Nutrition, Recipe};

/// Nutrition values as entered; any field may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawNutrition {
    pub calories: Option<f64>,
    pub fat: Option<f64>,
    pub carbohydrates: Option<f64>,
    pub protein: Option<f64>,
}

impl From<Nutrition> for RawNutrition {
    fn from(nutrition: Nutrition) -> Self {
        Self {
            calories: Some(nutrition.calories),
            fat: Some(nutrition.fat),
            carbohydrates: Some(nutrition.carbohydrates),
            protein: Some(nutrition.protein),
        }
    }
}

/// Raw recipe fields exactly as a user supplied them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeInput {
    pub name: String,
    /// One ingredient per line.
    pub ingredients: String,
    pub instructions: String,
    pub nutrition: RawNutrition,
    pub serving_size: String,
}

impl RecipeInput {
    /// Rebuild the raw fields a stored recipe would have been entered with.
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            name: recipe.name.clone(),
            ingredients: recipe.ingredients_block(),
            instructions: recipe.instructions.clone(),
            nutrition: recipe.nutrition.into(),
            serving_size: recipe.serving_size.clone(),
        }
    }
}

pub fn normalize(input: RecipeInput) -> Recipe {
    let nutrition = Nutrition::new(
        input.nutrition.calories.unwrap_or(0.0),
        input.nutrition.fat.unwrap_or(0.0),
        input.nutrition.carbohydrates.unwrap_or(0.0),
        input.nutrition.protein.unwrap_or(0.0),
    );

    Recipe::new(input.name)
        .with_ingredients(split_ingredients(&input.ingredients))
        .with_instructions(input.instructions.trim())
        .with_nutrition(nutrition)
        .with_serving_size(input.serving_size)
}

/// Split a multi-line block into trimmed, non-blank lines in input order.
pub fn split_ingredients(block: &str) -> Vec<String> {
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
