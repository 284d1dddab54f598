use super::game_data::GameData;
use crate::core::errors::CafeResult;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SAVE_FILE: &str = "gamedata.json";

/// JSON save file at a fixed path
#[derive(Debug, Clone)]
pub struct SaveSystem {
    path: PathBuf,
}

impl SaveSystem {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        debug!("[Save] Save path: {}", path.display());
        Self { path }
    }

    /// Save file named `gamedata.json` inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_SAVE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn save(&self, data: &GameData) -> CafeResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, json)?;
        info!("[Save] Game saved to {}", self.path.display());
        Ok(())
    }

    /// Read the save file; `None` when there is none yet
    pub fn load(&self) -> CafeResult<Option<GameData>> {
        if !self.exists() {
            info!("[Save] Save file not found. Start new game!");
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        let data: GameData = serde_json::from_str(&raw)?;
        info!("[Save] Game loaded from {}", self.path.display());
        Ok(Some(data))
    }

    /// Saved data or a fresh game, and whether it came from disk
    pub fn load_or_default(&self) -> CafeResult<(GameData, bool)> {
        Ok(match self.load()? {
            Some(data) => (data, true),
            None => (GameData::default(), false),
        })
    }

    pub fn delete(&self) -> CafeResult<()> {
        if self.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::CafeError;
    use crate::core::types::ItemId;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let saves = SaveSystem::in_dir(dir.path());
        assert!(saves.load().unwrap().is_none());

        let (data, from_file) = saves.load_or_default().unwrap();
        assert!(!from_file);
        assert_eq!(data.money, 100.0);
        assert_eq!(data.level, 1);
        assert_eq!(data.xp, 0);
        assert!(data.inventory.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let saves = SaveSystem::new(dir.path().join("nested").join("slot1.json"));
        let mut data = GameData::default();
        data.money = 42.5;
        data.inventory.insert(ItemId::new("coffee_beans"), 12);

        saves.save(&data).unwrap();
        assert!(saves.exists());
        assert_eq!(saves.load().unwrap(), Some(data));

        saves.delete().unwrap();
        assert!(!saves.exists());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let saves = SaveSystem::in_dir(dir.path());
        fs::write(saves.path(), "{ money: ").unwrap();
        assert!(matches!(saves.load(), Err(CafeError::Json(_))));
    }
}
