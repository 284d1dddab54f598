use crate::components::buildings::BuiltObject;
use crate::core::types::{ItemId, Position, Rotation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything that survives between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameData {
    pub money: f64,
    pub level: i32,
    pub xp: i32,
    #[serde(default)]
    pub inventory: BTreeMap<ItemId, i32>,
    #[serde(default)]
    pub built_objects: Vec<BuiltObjectData>,
    #[serde(default)]
    pub equipment: Vec<EquipmentSaveData>,
}

impl Default for GameData {
    /// A fresh game
    fn default() -> Self {
        Self {
            money: 100.0,
            level: 1,
            xp: 0,
            inventory: BTreeMap::new(),
            built_objects: Vec::new(),
            equipment: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuiltObjectData {
    pub id: String,
    pub position: [f32; 3],
    pub rotation: [f32; 4],
}

impl From<&BuiltObject> for BuiltObjectData {
    fn from(object: &BuiltObject) -> Self {
        Self {
            id: object.buildable.clone(),
            position: object.position.to_array(),
            rotation: object.rotation.to_array(),
        }
    }
}

impl From<BuiltObjectData> for BuiltObject {
    fn from(data: BuiltObjectData) -> Self {
        Self {
            buildable: data.id,
            position: Position::from_array(data.position),
            rotation: Rotation::from_array(data.rotation),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSaveData {
    pub id: String,
    pub level: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let mut data = GameData::default();
        data.inventory.insert(ItemId::new("milk"), 3);
        data.equipment.push(EquipmentSaveData {
            id: "stove_main".into(),
            level: 2,
        });
        let json: serde_json::Value = serde_json::to_value(&data).unwrap();

        assert_eq!(json["money"], 100.0);
        assert_eq!(json["inventory"]["milk"], 3);
        assert_eq!(json["equipment"][0]["level"], 2);
        assert!(json["built_objects"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_missing_collections_default_to_empty() {
        let data: GameData = serde_json::from_str(r#"{ "money": 5.5, "level": 2, "xp": 40 }"#).unwrap();
        assert_eq!(data.level, 2);
        assert!(data.inventory.is_empty());
        assert!(data.equipment.is_empty());
    }
}
