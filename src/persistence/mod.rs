//! Save games on disk.

pub mod game_data;
pub mod save_system;

pub use game_data::{BuiltObjectData, EquipmentSaveData, GameData};
pub use save_system::SaveSystem;
