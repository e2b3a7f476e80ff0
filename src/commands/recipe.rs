use clap::{Args, Subcommand, ValueEnum};

use crate::edit::{record_at, EditSelection, RecipeEdits};
use crate::normalize::{normalize, RawNutrition, RecipeInput};
use crate::store::{save_recipe, RecipeStore, StoreError};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args)]
pub struct RecipeCommand {
    #[command(subcommand)]
    pub command: RecipeSubcommand,
}

/// Nutrition facts per serving
#[derive(Args, Default, Clone)]
pub struct NutritionArgs {
    /// Calories (kcal)
    #[arg(long)]
    pub calories: Option<f64>,

    /// Fat (g)
    #[arg(long)]
    pub fat: Option<f64>,

    /// Carbohydrates (g)
    #[arg(long, visible_alias = "carbs")]
    pub carbohydrates: Option<f64>,

    /// Protein (g)
    #[arg(long)]
    pub protein: Option<f64>,
}

impl NutritionArgs {
    fn to_raw(&self) -> Result<RawNutrition, Box<dyn std::error::Error>> {
        let fields = [
            ("calories", self.calories),
            ("fat", self.fat),
            ("carbohydrates", self.carbohydrates),
            ("protein", self.protein),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(format!("{} must be a finite, non-negative number", field).into());
                }
            }
        }
        Ok(RawNutrition {
            calories: self.calories,
            fat: self.fat,
            carbohydrates: self.carbohydrates,
            protein: self.protein,
        })
    }
}

#[derive(Subcommand)]
pub enum RecipeSubcommand {
    /// Add a new recipe
    Add {
        /// Name of the recipe
        name: String,

        /// Ingredients, one per line
        #[arg(long)]
        ingredients: String,

        /// Cooking instructions
        #[arg(long)]
        instructions: String,

        /// Serving size (e.g. "1 cup", "2 slices")
        #[arg(long)]
        serving_size: String,

        #[command(flatten)]
        nutrition: NutritionArgs,
    },

    /// List all recipes
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a recipe's details
    Show {
        /// Position in the recipe list (starting at 1)
        position: usize,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Replace fields of an existing recipe
    Edit {
        /// Position in the recipe list (starting at 1)
        position: usize,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New ingredients, one per line
        #[arg(long)]
        ingredients: Option<String>,

        /// New instructions
        #[arg(long)]
        instructions: Option<String>,

        /// New serving size
        #[arg(long)]
        serving_size: Option<String>,

        #[command(flatten)]
        nutrition: NutritionArgs,
    },
}

impl RecipeCommand {
    pub async fn run<S: RecipeStore>(&self, store: &S) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            RecipeSubcommand::Add {
                name,
                ingredients,
                instructions,
                serving_size,
                nutrition,
            } => {
                if [name, ingredients, instructions, serving_size]
                    .iter()
                    .any(|field| field.trim().is_empty())
                {
                    return Err("Please fill in all fields.".into());
                }

                let recipe = normalize(RecipeInput {
                    name: name.trim().to_string(),
                    ingredients: ingredients.clone(),
                    instructions: instructions.clone(),
                    nutrition: nutrition.to_raw()?,
                    serving_size: serving_size.trim().to_string(),
                });

                save_recipe(store, None, &recipe).await.map_err(describe)?;
                println!("Recipe '{}' saved!", recipe.name);
                Ok(())
            }

            RecipeSubcommand::List { format } => {
                let records = store.load_all().await.map_err(describe)?;

                if records.is_empty() {
                    println!("No recipes found.");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&records)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<4}  {:<30}  SERVING SIZE", "#", "NAME");
                        println!("{}", "-".repeat(60));
                        for (i, stored) in records.iter().enumerate() {
                            println!(
                                "{:<4}  {:<30}  {}",
                                i + 1,
                                truncate(&stored.recipe.name, 30),
                                stored.recipe.serving_size
                            );
                        }
                        println!("\nTotal: {} recipe(s)", records.len());
                    }
                }
                Ok(())
            }

            RecipeSubcommand::Show { position, format } => {
                let records = store.load_all().await.map_err(describe)?;
                let stored = record_at(&records, *position)?;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(stored)?);
                    }
                    OutputFormat::Text => {
                        print!("{}", stored.recipe);
                    }
                }
                Ok(())
            }

            RecipeSubcommand::Edit {
                position,
                name,
                ingredients,
                instructions,
                serving_size,
                nutrition,
            } => {
                let edits = RecipeEdits {
                    name: name.as_ref().map(|n| n.trim().to_string()),
                    ingredients: ingredients.clone(),
                    instructions: instructions.clone(),
                    serving_size: serving_size.as_ref().map(|s| s.trim().to_string()),
                    nutrition: nutrition.to_raw()?,
                };

                if edits.is_empty() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let blank = |field: &Option<String>| {
                    field.as_deref().is_some_and(|value| value.trim().is_empty())
                };
                if blank(&edits.name)
                    || blank(&edits.ingredients)
                    || blank(&edits.instructions)
                    || blank(&edits.serving_size)
                {
                    return Err("Please fill in all fields.".into());
                }

                let records = store.load_all().await.map_err(describe)?;
                let selection = EditSelection::select(&records, *position)?;
                let (key, recipe) = selection.apply(edits);

                save_recipe(store, Some(key), &recipe)
                    .await
                    .map_err(describe)?;
                println!("Updated recipe:");
                print!("{}", recipe);
                Ok(())
            }
        }
    }
}

fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() > width {
        let head: String = name.chars().take(width - 3).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

/// Type mismatches against the table schema get their own message; every
/// other store failure is reported as-is.
fn describe(err: StoreError) -> Box<dyn std::error::Error> {
    if err.is_type_mismatch() {
        format!("Recipe values do not match the table schema: {}", err).into()
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Nutrition, Recipe};
    use crate::store::FileStore;
    use tempfile::TempDir;

    struct TestContext {
        store: FileStore,
        _temp_dir: TempDir, // Keep alive for duration of test
    }

    fn setup_store() -> TestContext {
        let temp_dir = TempDir::new().unwrap();
        TestContext {
            store: FileStore::new(temp_dir.path().join("data").join("recipes.json")),
            _temp_dir: temp_dir,
        }
    }

    fn add_omelette() -> RecipeCommand {
        RecipeCommand {
            command: RecipeSubcommand::Add {
                name: "Omelette".to_string(),
                ingredients: "2 eggs\nsalt".to_string(),
                instructions: "Whisk. Cook.".to_string(),
                serving_size: "1 plate".to_string(),
                nutrition: NutritionArgs {
                    calories: Some(200.0),
                    fat: Some(14.0),
                    carbohydrates: Some(1.0),
                    protein: Some(12.0),
                },
            },
        }
    }

    fn edit(position: usize, name: Option<&str>) -> RecipeCommand {
        RecipeCommand {
            command: RecipeSubcommand::Edit {
                position,
                name: name.map(String::from),
                ingredients: None,
                instructions: None,
                serving_size: None,
                nutrition: NutritionArgs::default(),
            },
        }
    }

    fn expected_omelette() -> Recipe {
        Recipe::new("Omelette")
            .with_ingredients(["2 eggs", "salt"])
            .with_instructions("Whisk. Cook.")
            .with_serving_size("1 plate")
            .with_nutrition(Nutrition::new(200.0, 14.0, 1.0, 12.0))
    }

    #[tokio::test]
    async fn test_add_then_edit_name() {
        let ctx = setup_store();

        add_omelette().run(&ctx.store).await.unwrap();
        let records = ctx.store.load_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].recipe, expected_omelette());

        edit(1, Some("Cheese Omelette"))
            .run(&ctx.store)
            .await
            .unwrap();
        let records = ctx.store.load_all().await.unwrap();
        assert_eq!(records.len(), 1);
        let mut expected = expected_omelette();
        expected.name = "Cheese Omelette".to_string();
        assert_eq!(records[0].recipe, expected);
    }

    #[tokio::test]
    async fn test_add_rejects_blank_fields() {
        let ctx = setup_store();
        let cmd = RecipeCommand {
            command: RecipeSubcommand::Add {
                name: "Soup".to_string(),
                ingredients: "  \n ".to_string(),
                instructions: "Simmer.".to_string(),
                serving_size: "1 bowl".to_string(),
                nutrition: NutritionArgs::default(),
            },
        };

        let err = cmd.run(&ctx.store).await.unwrap_err();
        assert!(err.to_string().contains("Please fill in all fields"));
        assert!(ctx.store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_rejects_negative_nutrition() {
        let ctx = setup_store();
        let mut cmd = add_omelette();
        if let RecipeSubcommand::Add { nutrition, .. } = &mut cmd.command {
            nutrition.fat = Some(-1.0);
        }

        let err = cmd.run(&ctx.store).await.unwrap_err();
        assert!(err
            .to_string()
            .contains("fat must be a finite, non-negative number"));
    }

    #[tokio::test]
    async fn test_add_rejects_infinite_nutrition_and_keeps_existing() {
        let ctx = setup_store();
        add_omelette().run(&ctx.store).await.unwrap();

        let mut cmd = add_omelette();
        if let RecipeSubcommand::Add { name, nutrition, .. } = &mut cmd.command {
            *name = "Overflow".to_string();
            nutrition.calories = Some(f64::INFINITY);
        }

        let err = cmd.run(&ctx.store).await.unwrap_err();
        assert!(err
            .to_string()
            .contains("calories must be a finite, non-negative number"));

        let records = ctx.store.load_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].recipe, expected_omelette());
    }

    #[test]
    fn test_nutrition_args_reject_nan() {
        let args = NutritionArgs {
            protein: Some(f64::NAN),
            ..NutritionArgs::default()
        };
        assert!(args.to_raw().is_err());
    }

    #[tokio::test]
    async fn test_edit_requires_a_change() {
        let ctx = setup_store();
        add_omelette().run(&ctx.store).await.unwrap();

        let err = edit(1, None).run(&ctx.store).await.unwrap_err();
        assert!(err.to_string().contains("Nothing to update"));
    }

    #[tokio::test]
    async fn test_edit_rejects_blank_replacement() {
        let ctx = setup_store();
        add_omelette().run(&ctx.store).await.unwrap();

        let err = edit(1, Some("   ")).run(&ctx.store).await.unwrap_err();
        assert!(err.to_string().contains("Please fill in all fields"));
        assert_eq!(
            ctx.store.load_all().await.unwrap()[0].recipe,
            expected_omelette()
        );
    }

    #[tokio::test]
    async fn test_edit_unknown_position() {
        let ctx = setup_store();
        add_omelette().run(&ctx.store).await.unwrap();

        let err = edit(2, Some("Ghost")).run(&ctx.store).await.unwrap_err();
        assert!(err.to_string().contains("No recipe at position 2"));
        assert_eq!(
            ctx.store.load_all().await.unwrap()[0].recipe,
            expected_omelette()
        );
    }

    #[tokio::test]
    async fn test_show_unknown_position() {
        let ctx = setup_store();
        let cmd = RecipeCommand {
            command: RecipeSubcommand::Show {
                position: 1,
                format: OutputFormat::Text,
            },
        };
        assert!(cmd.run(&ctx.store).await.is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Short", 30), "Short");
        assert_eq!(truncate("Crème brûlée with caramel", 10), "Crème b...");
    }
}
