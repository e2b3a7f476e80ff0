use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Nutrition facts for one serving.
///
/// Every field reads as 0 when absent or `null` in a stored record, so a
/// decoded value always carries all four numbers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Nutrition {
    #[serde(default, deserialize_with = "amount_or_zero")]
    pub calories: f64,
    #[serde(default, deserialize_with = "amount_or_zero")]
    pub fat: f64,
    #[serde(default, deserialize_with = "amount_or_zero")]
    pub carbohydrates: f64,
    #[serde(default, deserialize_with = "amount_or_zero")]
    pub protein: f64,
}

fn amount_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

impl Nutrition {
    pub fn new(calories: f64, fat: f64, carbohydrates: f64, protein: f64) -> Self {
        Self {
            calories,
            fat,
            carbohydrates,
            protein,
        }
    }
}

impl fmt::Display for Nutrition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  - Calories: {} kcal", self.calories)?;
        writeln!(f, "  - Fat: {} g", self.fat)?;
        writeln!(f, "  - Carbohydrates: {} g", self.carbohydrates)?;
        write!(f, "  - Protein: {} g", self.protein)
    }
}
