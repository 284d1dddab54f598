use crate::components::player::PlayerResources;
use crate::core::errors::{CafeError, CafeResult};
use crate::core::event::{CafeEvent, Outbox};
use crate::core::types::{Position, Rotation};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Something the player can buy and place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buildable {
    pub id: String,
    pub name: String,
    pub cost: f64,
    #[serde(default)]
    pub description: String,
}

impl Buildable {
    pub fn new(id: &str, name: &str, cost: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            cost,
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltObject {
    pub buildable: String,
    pub position: Position,
    pub rotation: Rotation,
}

/// Bookkeeping for placed decorations and furniture
#[derive(Debug, Clone, Default)]
pub struct BuildRegistry {
    buildables: Vec<Buildable>,
    placed: Vec<BuiltObject>,
    outbox: Outbox,
}

impl BuildRegistry {
    pub fn new(buildables: Vec<Buildable>) -> Self {
        Self {
            buildables,
            placed: Vec::new(),
            outbox: Outbox::new(),
        }
    }

    pub fn standard() -> Self {
        Self::new(vec![
            Buildable::new("table", "Table", 50.0),
            Buildable::new("chair", "Chair", 20.0),
            Buildable::new("plant", "Potted Plant", 15.0),
            Buildable::new("coffee_machine", "Coffee Machine", 200.0),
        ])
    }

    pub fn buildable(&self, id: &str) -> Option<&Buildable> {
        self.buildables.iter().find(|buildable| buildable.id == id)
    }

    pub fn buildables(&self) -> &[Buildable] {
        &self.buildables
    }

    pub fn placed(&self) -> &[BuiltObject] {
        &self.placed
    }

    /// Pay for and record a new object
    pub fn place(
        &mut self,
        id: &str,
        position: Position,
        rotation: Rotation,
        player: &mut PlayerResources,
    ) -> CafeResult<()> {
        let buildable = self
            .buildable(id)
            .cloned()
            .ok_or_else(|| CafeError::MissingConfiguration(format!("unknown buildable '{}'", id)))?;

        if let Err(err) = player.try_spend_money(buildable.cost) {
            warn!("[Build] Not enough money to build {}: {}", buildable.name, err);
            return Err(err);
        }

        self.placed.push(BuiltObject {
            buildable: buildable.id.clone(),
            position,
            rotation,
        });
        info!("[Build] Placed: {} for {:.2} money.", buildable.name, buildable.cost);
        self.outbox.push(CafeEvent::BuildingPlaced {
            buildable: buildable.id,
            position,
        });
        Ok(())
    }

    /// Replace the placed set with saved objects, skipping unknown ids
    pub fn restore(&mut self, saved: Vec<BuiltObject>) {
        self.placed.clear();
        for object in saved {
            if self.buildable(&object.buildable).is_none() {
                warn!("[Build] Unknown buildable '{}' in save, skipping", object.buildable);
                continue;
            }
            self.placed.push(object);
        }
        info!("[Build] Restored {} built objects", self.placed.len());
    }

    pub fn drain_events(&mut self) -> Vec<CafeEvent> {
        self.outbox.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_spends_money() {
        let mut registry = BuildRegistry::standard();
        let mut player = PlayerResources::new(60.0, vec![100]);

        registry
            .place("table", Position::new(1.0, 0.0, 2.0), Rotation::IDENTITY, &mut player)
            .unwrap();
        assert_eq!(player.money(), 10.0);
        assert_eq!(registry.placed().len(), 1);

        assert!(registry
            .place("chair", Position::default(), Rotation::IDENTITY, &mut player)
            .is_err());
        assert!(registry
            .place("fountain", Position::default(), Rotation::IDENTITY, &mut player)
            .is_err());
        assert_eq!(registry.placed().len(), 1);
        assert_eq!(player.money(), 10.0);
    }

    #[test]
    fn test_restore_skips_unknown() {
        let mut registry = BuildRegistry::standard();
        registry.restore(vec![
            BuiltObject {
                buildable: "plant".into(),
                position: Position::default(),
                rotation: Rotation::IDENTITY,
            },
            BuiltObject {
                buildable: "statue".into(),
                position: Position::default(),
                rotation: Rotation::IDENTITY,
            },
        ]);
        assert_eq!(registry.placed().len(), 1);
        assert_eq!(registry.placed()[0].buildable, "plant");
    }
}
