use crate::core::types::{ItemId, RecipeId};
use serde::{Deserialize, Serialize};

/// One ingredient line of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientCost {
    pub item: ItemId,
    pub quantity: i32,
}

/// Immutable production rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub ingredients: Vec<IngredientCost>,
    /// Base duration in seconds, before any station speed multiplier
    pub craft_time: f64,
    pub result_item: ItemId,
    pub result_quantity: i32,
    #[serde(default)]
    pub selling_price: f64,
    #[serde(default)]
    pub xp_reward: i32,
    #[serde(default)]
    pub description: String,
}

impl Recipe {
    pub fn new(id: &str, name: &str, result_item: &str, craft_time: f64) -> Self {
        Self {
            id: RecipeId::new(id),
            name: name.to_string(),
            ingredients: Vec::new(),
            craft_time,
            result_item: ItemId::new(result_item),
            result_quantity: 1,
            selling_price: 0.0,
            xp_reward: 0,
            description: String::new(),
        }
    }

    pub fn with_ingredient(mut self, item: &str, quantity: i32) -> Self {
        self.ingredients.push(IngredientCost {
            item: ItemId::new(item),
            quantity,
        });
        self
    }

    pub fn with_result_quantity(mut self, quantity: i32) -> Self {
        self.result_quantity = quantity;
        self
    }

    pub fn with_price(mut self, selling_price: f64, xp_reward: i32) -> Self {
        self.selling_price = selling_price;
        self.xp_reward = xp_reward;
        self
    }
}
