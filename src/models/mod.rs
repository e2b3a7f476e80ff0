mod nutrition;
mod recipe;

pub use nutrition::Nutrition;
pub use recipe::{Recipe, RecipeKey, StoredRecipe};
