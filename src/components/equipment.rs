//! Upgradeable kitchen equipment.
//!
//! Every piece of equipment is the same data-driven record; its kind picks the
//! effect its upgrade levels have on the cafe.

use crate::components::inventory::InventoryLedger;
use crate::components::player::PlayerResources;
use crate::core::errors::{CafeError, CafeResult};
use crate::core::event::{CafeEvent, Outbox};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentKind {
    Stove,
    Oven,
    CuttingBoard,
    Refrigerator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeLevel {
    pub cost: f64,
    #[serde(default = "default_speed_multiplier")]
    pub speed_multiplier: f64,
    #[serde(default)]
    pub capacity_increase: i32,
    #[serde(default)]
    pub description: String,
}

fn default_speed_multiplier() -> f64 {
    1.0
}

impl UpgradeLevel {
    pub fn speed(cost: f64, speed_multiplier: f64) -> Self {
        Self {
            cost,
            speed_multiplier,
            capacity_increase: 0,
            description: format!("x{:.2} speed", speed_multiplier),
        }
    }

    pub fn capacity(cost: f64, capacity_increase: i32) -> Self {
        Self {
            cost,
            speed_multiplier: 1.0,
            capacity_increase,
            description: format!("+{} storage", capacity_increase),
        }
    }
}

/// What the current level of a piece of equipment does
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EquipmentEffect {
    SpeedMultiplier(f64),
    InventoryCapacity(i32),
}

#[derive(Debug, Clone)]
pub struct Equipment {
    id: String,
    name: String,
    kind: EquipmentKind,
    level: usize,
    levels: Vec<UpgradeLevel>,
    /// Capacity before upgrades; only meaningful for refrigerators
    base_capacity: i32,
}

impl Equipment {
    pub fn new(id: &str, name: &str, kind: EquipmentKind, levels: Vec<UpgradeLevel>) -> Self {
        let id = if id.trim().is_empty() {
            let generated = Uuid::new_v4().to_string();
            warn!("[Equipment] Generated new ID for {}: {}", name, generated);
            generated
        } else {
            id.to_string()
        };
        Self {
            id,
            name: name.to_string(),
            kind,
            level: 0,
            levels,
            base_capacity: 0,
        }
    }

    pub fn with_base_capacity(mut self, base_capacity: i32) -> Self {
        self.base_capacity = base_capacity;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EquipmentKind {
        self.kind
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn max_level(&self) -> usize {
        self.levels.len()
    }

    pub fn next_upgrade(&self) -> Option<&UpgradeLevel> {
        self.levels.get(self.level)
    }

    pub fn effect(&self) -> EquipmentEffect {
        let unlocked = &self.levels[..self.level.min(self.levels.len())];
        match self.kind {
            EquipmentKind::Refrigerator => EquipmentEffect::InventoryCapacity(
                self.base_capacity + unlocked.iter().map(|level| level.capacity_increase).sum::<i32>(),
            ),
            EquipmentKind::Stove | EquipmentKind::Oven | EquipmentKind::CuttingBoard => {
                EquipmentEffect::SpeedMultiplier(unlocked.iter().map(|level| level.speed_multiplier).product())
            }
        }
    }

    pub fn current_speed_multiplier(&self) -> f64 {
        match self.effect() {
            EquipmentEffect::SpeedMultiplier(multiplier) => multiplier,
            EquipmentEffect::InventoryCapacity(_) => 1.0,
        }
    }

    pub fn can_upgrade(&self, player: &PlayerResources) -> bool {
        match self.next_upgrade() {
            Some(next) if player.money() >= next.cost => true,
            Some(next) => {
                info!(
                    "[Equipment:{}] Not enough money to upgrade. Needed: {:.2}, Have: {:.2}",
                    self.id,
                    next.cost,
                    player.money()
                );
                false
            }
            None => {
                info!("[Equipment:{}] Max upgrade level reached.", self.id);
                false
            }
        }
    }

    fn apply_effects(&self, ledger: &mut InventoryLedger) {
        match self.effect() {
            EquipmentEffect::InventoryCapacity(capacity) => {
                ledger.set_capacity(capacity);
                info!("[Equipment:{}] Level {}. Total inventory capacity: {}", self.id, self.level, capacity);
            }
            EquipmentEffect::SpeedMultiplier(multiplier) => {
                info!("[Equipment:{}] Level {}. Speed multiplier: {:.2}", self.id, self.level, multiplier);
            }
        }
    }
}

/// All equipment installed in the cafe
#[derive(Debug, Clone, Default)]
pub struct EquipmentRack {
    equipment: Vec<Equipment>,
    outbox: Outbox,
}

impl EquipmentRack {
    pub fn new(equipment: Vec<Equipment>) -> Self {
        Self {
            equipment,
            outbox: Outbox::new(),
        }
    }

    /// One of each kind with a small upgrade ladder
    pub fn standard(base_capacity: i32) -> Self {
        Self::new(vec![
            Equipment::new(
                "stove_main",
                "Stove",
                EquipmentKind::Stove,
                vec![
                    UpgradeLevel::speed(50.0, 1.25),
                    UpgradeLevel::speed(120.0, 1.2),
                    UpgradeLevel::speed(300.0, 1.5),
                ],
            ),
            Equipment::new(
                "oven_main",
                "Oven",
                EquipmentKind::Oven,
                vec![UpgradeLevel::speed(80.0, 1.2), UpgradeLevel::speed(200.0, 1.3)],
            ),
            Equipment::new(
                "cutting_board_main",
                "Cutting Board",
                EquipmentKind::CuttingBoard,
                vec![UpgradeLevel::speed(30.0, 1.1)],
            ),
            Equipment::new(
                "refrigerator_main",
                "Refrigerator",
                EquipmentKind::Refrigerator,
                vec![UpgradeLevel::capacity(75.0, 25), UpgradeLevel::capacity(150.0, 50)],
            )
            .with_base_capacity(base_capacity),
        ])
    }

    pub fn get(&self, id: &str) -> Option<&Equipment> {
        self.equipment.iter().find(|equipment| equipment.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Equipment> {
        self.equipment.iter()
    }

    pub fn first_of_kind(&self, kind: EquipmentKind) -> Option<&Equipment> {
        self.equipment.iter().find(|equipment| equipment.kind == kind)
    }

    /// Multiplier the worker cooks with; 1.0 without a stove
    pub fn stove_speed_multiplier(&self) -> f64 {
        self.first_of_kind(EquipmentKind::Stove)
            .map_or(1.0, Equipment::current_speed_multiplier)
    }

    /// Push every piece's current effect into the world
    pub fn apply_all(&self, ledger: &mut InventoryLedger) {
        for equipment in &self.equipment {
            equipment.apply_effects(ledger);
        }
    }

    /// Buy the next level of `id`; returns the new level
    pub fn upgrade(&mut self, id: &str, player: &mut PlayerResources, ledger: &mut InventoryLedger) -> CafeResult<usize> {
        let equipment = self
            .equipment
            .iter_mut()
            .find(|equipment| equipment.id == id)
            .ok_or_else(|| CafeError::MissingConfiguration(format!("equipment '{}' not found", id)))?;

        let cost = match equipment.next_upgrade() {
            Some(next) => next.cost,
            None => {
                return Err(CafeError::InvalidConfig(format!(
                    "equipment '{}' is already at max level {}",
                    id, equipment.level
                )))
            }
        };
        player.try_spend_money(cost)?;

        equipment.level += 1;
        info!("[Equipment:{}] {} upgraded to level {}.", equipment.id, equipment.name, equipment.level);
        equipment.apply_effects(ledger);
        self.outbox.push(CafeEvent::EquipmentUpgraded {
            equipment: equipment.id.clone(),
            kind: equipment.kind,
            level: equipment.level,
        });
        Ok(equipment.level)
    }

    /// Set a level directly, as when loading a save
    pub fn set_level(&mut self, id: &str, level: usize, ledger: &mut InventoryLedger) -> bool {
        let Some(equipment) = self.equipment.iter_mut().find(|equipment| equipment.id == id) else {
            warn!(
                "[Equipment] Equipment with ID {} not found for loading. It might have been removed or its ID changed.",
                id
            );
            return false;
        };
        if level > equipment.levels.len() {
            error!("[Equipment:{}] Attempted to set invalid level {}.", id, level);
            return false;
        }
        equipment.level = level;
        equipment.apply_effects(ledger);
        self.outbox.push(CafeEvent::EquipmentUpgraded {
            equipment: equipment.id.clone(),
            kind: equipment.kind,
            level,
        });
        true
    }

    pub fn drain_events(&mut self) -> Vec<CafeEvent> {
        self.outbox.drain()
    }
}
