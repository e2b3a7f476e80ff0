//! Selecting a stored recipe and producing its full replacement.
//!
//! The selection is an explicit value handed from one step to the next;
//! nothing about "which recipe is being edited" lives outside it.

use thiserror::Error;

use crate::models::{Recipe, RecipeKey, StoredRecipe};
use crate::normalize::{normalize, RawNutrition, RecipeInput};

#[derive(Debug, Clone, PartialEq)]
pub struct EditSelection {
    pub key: RecipeKey,
    pub current: Recipe,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    /// No recipe at the requested 1-based position.
    #[error("No recipe at position {position} ({count} recipe(s) stored)")]
    NoSuchPosition { position: usize, count: usize },
}

/// The record shown at 1-based `position` in a listing of `records`.
pub fn record_at(
    records: &[StoredRecipe],
    position: usize,
) -> Result<&StoredRecipe, SelectionError> {
    position
        .checked_sub(1)
        .and_then(|index| records.get(index))
        .ok_or(SelectionError::NoSuchPosition {
            position,
            count: records.len(),
        })
}

impl EditSelection {
    /// Pick the recipe shown at 1-based `position` in a listing of `records`.
    pub fn select(records: &[StoredRecipe], position: usize) -> Result<Self, SelectionError> {
        let stored = record_at(records, position)?;
        Ok(Self {
            key: stored.key,
            current: stored.recipe.clone(),
        })
    }

    /// Merge `edits` over the current record and normalize the result.
    ///
    /// Returns the key to write under and the complete replacement record.
    pub fn apply(self, edits: RecipeEdits) -> (RecipeKey, Recipe) {
        let mut input = RecipeInput::from_recipe(&self.current);

        if let Some(name) = edits.name {
            input.name = name;
        }
        if let Some(ingredients) = edits.ingredients {
            input.ingredients = ingredients;
        }
        if let Some(instructions) = edits.instructions {
            input.instructions = instructions;
        }
        if let Some(serving_size) = edits.serving_size {
            input.serving_size = serving_size;
        }
        input.nutrition = RawNutrition {
            calories: edits.nutrition.calories.or(input.nutrition.calories),
            fat: edits.nutrition.fat.or(input.nutrition.fat),
            carbohydrates: edits.nutrition.carbohydrates.or(input.nutrition.carbohydrates),
            protein: edits.nutrition.protein.or(input.nutrition.protein),
        };

        (self.key, normalize(input))
    }
}

/// Replacement values for an edit; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeEdits {
    pub name: Option<String>,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
    pub serving_size: Option<String>,
    pub nutrition: RawNutrition,
}

impl RecipeEdits {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
