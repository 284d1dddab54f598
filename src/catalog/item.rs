use crate::core::types::ItemId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    Ingredient,
    Product,
    Tool,
    Consumable,
}

/// Immutable item reference data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub item_type: ItemType,
    #[serde(default = "default_stackable")]
    pub stackable: bool,
    #[serde(default)]
    pub description: String,
}

fn default_stackable() -> bool {
    true
}

impl Item {
    pub fn new(id: &str, name: &str, item_type: ItemType) -> Self {
        Self {
            id: ItemId::new(id),
            name: name.to_string(),
            item_type,
            stackable: true,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }
}
