//! Configuration for a cafe simulation run.
//!
//! Every timing value is expressed in seconds of simulated time and converted to
//! whole cycles with [`CafeConfig::cycles_for`]. The structs are serde-friendly so a
//! run can be described in a JSON file.

use super::errors::{CafeError, CafeResult};
use super::types::{ItemId, RecipeId};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Whole cycles of `tick_seconds` needed to cover `seconds`
pub fn cycles_for_seconds(seconds: f64, tick_seconds: f64) -> u64 {
    if seconds <= 0.0 || tick_seconds <= 0.0 {
        return 0;
    }
    // Tolerate float noise such as 0.3 / 0.1 = 2.9999999999999996
    let cycles = seconds / tick_seconds;
    (cycles - 1e-9).ceil().max(0.0) as u64
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerConfig {
    pub move_speed: f32,
    pub stopping_distance: f32,
    pub eat_seconds: f64,
    pub min_money_reward: f64,
    pub max_money_reward: f64,
    pub min_xp_reward: i32,
    pub max_xp_reward: i32,
}

impl Default for CustomerConfig {
    fn default() -> Self {
        Self {
            move_speed: 1.5,
            stopping_distance: 0.5,
            eat_seconds: 5.0,
            min_money_reward: 10.0,
            max_money_reward: 30.0,
            min_xp_reward: 5,
            max_xp_reward: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    pub move_speed: f32,
    pub stopping_distance: f32,
    /// Extra time the order intake stays busy after accepting an order
    pub order_intake_seconds: f64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            move_speed: 2.0,
            stopping_distance: 0.5,
            order_intake_seconds: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    pub max_customers: usize,
    pub spawn_interval_seconds: f64,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            max_customers: 5,
            spawn_interval_seconds: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockEntry {
    pub item: ItemId,
    pub quantity: i32,
}

impl StockEntry {
    pub fn new(item: &str, quantity: i32) -> Self {
        Self {
            item: ItemId::new(item),
            quantity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub base_capacity: i32,
    /// Stock added when a new game starts
    pub starting_stock: Vec<StockEntry>,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        // A new game starts with an empty ledger
        Self {
            base_capacity: 100,
            starting_stock: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub starting_money: f64,
    pub xp_to_next_level: Vec<i32>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            starting_money: 100.0,
            xp_to_next_level: vec![100, 250, 500, 1000, 2000],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CafeConfig {
    /// Simulated seconds per cycle
    pub tick_seconds: f64,
    pub max_cycles: Option<u64>,
    pub random_seed: Option<u64>,
    pub autosave_interval_seconds: Option<f64>,
    /// Recipe customers always pick when it is on the menu
    pub signature_recipe: Option<RecipeId>,
    pub customer: CustomerConfig,
    pub worker: WorkerConfig,
    pub spawner: SpawnerConfig,
    pub inventory: InventoryConfig,
    pub player: PlayerConfig,
}

impl Default for CafeConfig {
    fn default() -> Self {
        Self {
            tick_seconds: 0.1,
            max_cycles: None,
            random_seed: Some(42),
            autosave_interval_seconds: Some(300.0),
            signature_recipe: Some(RecipeId::new("coffee")),
            customer: CustomerConfig::default(),
            worker: WorkerConfig::default(),
            spawner: SpawnerConfig::default(),
            inventory: InventoryConfig::default(),
            player: PlayerConfig::default(),
        }
    }
}

impl CafeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tick_seconds(mut self, seconds: f64) -> Self {
        self.tick_seconds = seconds;
        self
    }

    pub fn with_max_cycles(mut self, cycles: Option<u64>) -> Self {
        self.max_cycles = cycles;
        self
    }

    pub fn with_random_seed(mut self, seed: Option<u64>) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn with_autosave_interval(mut self, seconds: Option<f64>) -> Self {
        self.autosave_interval_seconds = seconds;
        self
    }

    pub fn with_signature_recipe(mut self, recipe: Option<RecipeId>) -> Self {
        self.signature_recipe = recipe;
        self
    }

    pub fn with_eat_seconds(mut self, seconds: f64) -> Self {
        self.customer.eat_seconds = seconds;
        self
    }

    pub fn with_money_reward_range(mut self, min: f64, max: f64) -> Self {
        self.customer.min_money_reward = min;
        self.customer.max_money_reward = max;
        self
    }

    pub fn with_xp_reward_range(mut self, min: i32, max: i32) -> Self {
        self.customer.min_xp_reward = min;
        self.customer.max_xp_reward = max;
        self
    }

    pub fn with_move_speeds(mut self, customer: f32, worker: f32) -> Self {
        self.customer.move_speed = customer;
        self.worker.move_speed = worker;
        self
    }

    pub fn with_spawning(mut self, max_customers: usize, interval_seconds: f64) -> Self {
        self.spawner.max_customers = max_customers;
        self.spawner.spawn_interval_seconds = interval_seconds;
        self
    }

    pub fn with_inventory_capacity(mut self, capacity: i32) -> Self {
        self.inventory.base_capacity = capacity;
        self
    }

    pub fn with_starting_stock(mut self, stock: Vec<StockEntry>) -> Self {
        self.inventory.starting_stock = stock;
        self
    }

    pub fn with_starting_money(mut self, money: f64) -> Self {
        self.player.starting_money = money;
        self
    }

    /// Whole cycles needed to cover `seconds` of simulated time
    pub fn cycles_for(&self, seconds: f64) -> u64 {
        cycles_for_seconds(seconds, self.tick_seconds)
    }

    pub fn validate(&self) -> CafeResult<()> {
        if !(self.tick_seconds > 0.0) || !self.tick_seconds.is_finite() {
            return Err(CafeError::InvalidConfig("tick_seconds must be positive and finite".into()));
        }
        if !self.customer.min_money_reward.is_finite() || !self.customer.max_money_reward.is_finite() {
            return Err(CafeError::InvalidConfig("money rewards must be finite".into()));
        }
        if self.customer.min_money_reward > self.customer.max_money_reward {
            return Err(CafeError::InvalidConfig("money reward range is inverted".into()));
        }
        if self.customer.min_xp_reward > self.customer.max_xp_reward {
            return Err(CafeError::InvalidConfig("xp reward range is inverted".into()));
        }
        if self.customer.min_money_reward < 0.0 || self.customer.min_xp_reward < 0 {
            return Err(CafeError::InvalidConfig("rewards cannot be negative".into()));
        }
        if self.customer.move_speed <= 0.0 || self.worker.move_speed <= 0.0 {
            return Err(CafeError::InvalidConfig("move speeds must be positive".into()));
        }
        if self.customer.stopping_distance < 0.0 || self.worker.stopping_distance < 0.0 {
            return Err(CafeError::InvalidConfig("stopping distances cannot be negative".into()));
        }
        if self.inventory.base_capacity < 0 {
            return Err(CafeError::InvalidConfig("inventory capacity cannot be negative".into()));
        }
        if self.player.xp_to_next_level.iter().any(|xp| *xp <= 0) {
            return Err(CafeError::InvalidConfig("level thresholds must be positive".into()));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> CafeResult<Self> {
        let config: CafeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> CafeResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CafeConfig::default();
        assert_eq!(config.customer.eat_seconds, 5.0);
        assert_eq!(config.spawner.max_customers, 5);
        assert_eq!(config.inventory.base_capacity, 100);
        assert_eq!(config.signature_recipe, Some(RecipeId::new("coffee")));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = CafeConfig::new()
            .with_tick_seconds(0.5)
            .with_money_reward_range(1.0, 2.0)
            .with_xp_reward_range(3, 4)
            .with_spawning(2, 1.0);

        assert_eq!(config.tick_seconds, 0.5);
        assert_eq!(config.customer.max_money_reward, 2.0);
        assert_eq!(config.customer.min_xp_reward, 3);
        assert_eq!(config.spawner.max_customers, 2);
    }

    #[test]
    fn test_cycles_for() {
        let config = CafeConfig::default();
        assert_eq!(config.cycles_for(0.0), 0);
        assert_eq!(config.cycles_for(0.3), 3);
        assert_eq!(config.cycles_for(0.25), 3);
        assert_eq!(config.cycles_for(5.0), 50);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = CafeConfig::from_json_str(r#"{ "tick_seconds": 1.0, "customer": { "eat_seconds": 2.0 } }"#)
            .unwrap();
        assert_eq!(config.tick_seconds, 1.0);
        assert_eq!(config.customer.eat_seconds, 2.0);
        assert_eq!(config.customer.max_xp_reward, 15);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let inverted = CafeConfig::new().with_xp_reward_range(10, 1);
        assert!(inverted.validate().is_err());

        let zero_tick = CafeConfig::new().with_tick_seconds(0.0);
        assert!(zero_tick.validate().is_err());

        assert!(CafeConfig::from_json_str("{ not json").is_err());
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let nan_reward = CafeConfig::new().with_money_reward_range(f64::NAN, 10.0);
        assert!(matches!(nan_reward.validate(), Err(CafeError::InvalidConfig(_))));

        let infinite_reward = CafeConfig::new().with_money_reward_range(1.0, f64::INFINITY);
        assert!(matches!(infinite_reward.validate(), Err(CafeError::InvalidConfig(_))));

        let infinite_tick = CafeConfig::new().with_tick_seconds(f64::INFINITY);
        assert!(infinite_tick.validate().is_err());
    }

    #[test]
    fn test_default_starting_stock_is_empty() {
        let config = CafeConfig::default();
        assert!(config.inventory.starting_stock.is_empty());
    }
}
