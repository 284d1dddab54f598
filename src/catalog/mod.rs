//! Item and recipe reference data, loaded once per session.

pub mod item;
pub mod recipe;

pub use item::{Item, ItemType};
pub use recipe::{IngredientCost, Recipe};

use crate::core::errors::{CafeError, CafeResult};
use crate::core::types::{ItemId, RecipeId};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Enumerable, immutable catalog of items and recipes
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
    recipes: Vec<Recipe>,
    item_index: HashMap<ItemId, usize>,
    recipe_index: HashMap<RecipeId, usize>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    items: Vec<Item>,
    #[serde(default)]
    recipes: Vec<Recipe>,
}

impl Catalog {
    pub fn new(items: Vec<Item>, recipes: Vec<Recipe>) -> CafeResult<Self> {
        let mut catalog = Self::default();
        for item in items {
            if item.id.is_null() {
                return Err(CafeError::InvalidConfig(format!("item '{}' has an empty id", item.name)));
            }
            if catalog.item_index.contains_key(&item.id) {
                return Err(CafeError::InvalidConfig(format!("duplicate item id '{}'", item.id)));
            }
            catalog.item_index.insert(item.id.clone(), catalog.items.len());
            catalog.items.push(item);
        }

        for recipe in recipes {
            if catalog.recipe_index.contains_key(&recipe.id) {
                return Err(CafeError::InvalidConfig(format!("duplicate recipe id '{}'", recipe.id)));
            }
            if !catalog.item_index.contains_key(&recipe.result_item) {
                return Err(CafeError::MissingConfiguration(format!(
                    "recipe '{}' produces unknown item '{}'",
                    recipe.id, recipe.result_item
                )));
            }
            for line in &recipe.ingredients {
                if !catalog.item_index.contains_key(&line.item) {
                    warn!("[Catalog] Recipe '{}' uses uncatalogued ingredient '{}'", recipe.id, line.item);
                }
            }
            catalog.recipe_index.insert(recipe.id.clone(), catalog.recipes.len());
            catalog.recipes.push(recipe);
        }

        Ok(catalog)
    }

    pub fn from_json_str(json: &str) -> CafeResult<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.items, file.recipes)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> CafeResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The bundled coffee shop menu
    pub fn cafe_menu() -> Self {
        let items = vec![
            Item::new("coffee_beans", "Coffee Beans", ItemType::Ingredient),
            Item::new("milk", "Milk", ItemType::Ingredient),
            Item::new("sugar", "Sugar", ItemType::Ingredient),
            Item::new("cup", "Cup", ItemType::Consumable),
            Item::new("coffee", "Coffee", ItemType::Product).with_description("Fresh black coffee"),
            Item::new("latte", "Latte", ItemType::Product).with_description("Coffee with steamed milk"),
            Item::new("sweet_coffee", "Sweet Coffee", ItemType::Product),
        ];
        let recipes = vec![
            Recipe::new("coffee", "Coffee", "coffee", 3.0)
                .with_ingredient("coffee_beans", 2)
                .with_ingredient("cup", 1)
                .with_price(4.0, 5),
            Recipe::new("latte", "Latte", "latte", 5.0)
                .with_ingredient("coffee_beans", 2)
                .with_ingredient("milk", 1)
                .with_ingredient("cup", 1)
                .with_price(6.0, 8),
            Recipe::new("sweet_coffee", "Sweet Coffee", "sweet_coffee", 4.0)
                .with_ingredient("coffee_beans", 2)
                .with_ingredient("sugar", 1)
                .with_ingredient("cup", 1)
                .with_price(5.0, 6),
        ];
        match Self::new(items, recipes) {
            Ok(catalog) => catalog,
            Err(_) => Self::default(),
        }
    }

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.item_index.get(id).map(|index| &self.items[*index])
    }

    pub fn recipe(&self, id: &RecipeId) -> Option<&Recipe> {
        self.recipe_index.get(id).map(|index| &self.recipes[*index])
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Recipes in catalog order
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn item_name<'a>(&'a self, id: &'a ItemId) -> &'a str {
        self.item(id).map(|item| item.name.as_str()).unwrap_or(id.as_str())
    }
}
