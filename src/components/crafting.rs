use crate::catalog::Recipe;
use crate::components::inventory::InventoryLedger;
use crate::core::config::cycles_for_seconds;
use crate::core::errors::{CafeError, CafeResult};
use crate::core::event::{CafeEvent, Outbox};
use crate::core::event_scheduler::EventScheduler;
use crate::core::types::{ItemId, RecipeId};
use log::{debug, error, info, warn};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct ActiveCraft {
    result_item: ItemId,
    result_quantity: i32,
    started_cycle: u64,
    duration_cycles: u64,
}

/// Turns recipes into timed production tasks.
///
/// At most one craft per recipe id runs at a time across the whole cafe;
/// crafts of different recipes run side by side. Completion is a timer in
/// cycles, advanced by [`CraftingEngine::tick`].
pub struct CraftingEngine {
    tick_seconds: f64,
    current_cycle: u64,
    active: HashMap<RecipeId, ActiveCraft>,
    completions: EventScheduler<RecipeId>,
    outbox: Outbox,
}

impl CraftingEngine {
    pub fn new(tick_seconds: f64) -> Self {
        Self {
            tick_seconds,
            current_cycle: 0,
            active: HashMap::new(),
            completions: EventScheduler::new(),
            outbox: Outbox::new(),
        }
    }

    pub fn can_craft(&self, recipe: &Recipe, ledger: &InventoryLedger) -> bool {
        recipe
            .ingredients
            .iter()
            .all(|line| ledger.has(&line.item, line.quantity))
    }

    /// Start crafting; logs and returns false when the craft is refused
    pub fn start_craft(&mut self, recipe: &Recipe, speed_multiplier: f64, ledger: &mut InventoryLedger) -> bool {
        match self.try_start_craft(recipe, speed_multiplier, ledger) {
            Ok(_) => true,
            Err(CafeError::IngredientDebitFailed { .. }) => false,
            Err(err) => {
                warn!("[Crafting] Cannot craft '{}': {}", recipe.id, err);
                false
            }
        }
    }

    /// Start crafting and return the craft duration in cycles
    pub fn try_start_craft(
        &mut self,
        recipe: &Recipe,
        speed_multiplier: f64,
        ledger: &mut InventoryLedger,
    ) -> CafeResult<u64> {
        if self.active.contains_key(&recipe.id) {
            return Err(CafeError::CraftAlreadyActive(recipe.id.clone()));
        }

        if let Some(line) = recipe
            .ingredients
            .iter()
            .find(|line| !ledger.has(&line.item, line.quantity))
        {
            return Err(CafeError::InsufficientItems {
                item: line.item.clone(),
                needed: line.quantity,
                held: ledger.count(&line.item),
            });
        }

        // Lines are debited one by one; a failing line leaves earlier debits in place
        for line in &recipe.ingredients {
            if line.quantity <= 0 {
                continue;
            }
            if !ledger.remove(&line.item, line.quantity) {
                error!(
                    "[Crafting] Error removing ingredient {} for recipe {}. Crafting cancelled.",
                    line.item, recipe.id
                );
                return Err(CafeError::IngredientDebitFailed {
                    recipe: recipe.id.clone(),
                    item: line.item.clone(),
                });
            }
        }

        let speed = if speed_multiplier > 0.0 {
            speed_multiplier
        } else {
            warn!(
                "[Crafting] Ignoring non-positive speed multiplier {} for '{}'",
                speed_multiplier, recipe.id
            );
            1.0
        };
        let duration_cycles = cycles_for_seconds(recipe.craft_time / speed, self.tick_seconds).max(1);

        self.active.insert(
            recipe.id.clone(),
            ActiveCraft {
                result_item: recipe.result_item.clone(),
                result_quantity: recipe.result_quantity,
                started_cycle: self.current_cycle,
                duration_cycles,
            },
        );
        self.completions
            .schedule_at(recipe.id.clone(), self.current_cycle + duration_cycles);

        info!(
            "[Crafting] Starting craft: {} ({} cycles at x{:.2} speed)",
            recipe.name, duration_cycles, speed
        );
        self.outbox.push(CafeEvent::CraftStarted {
            recipe: recipe.id.clone(),
            duration_cycles,
        });
        Ok(duration_cycles)
    }

    /// Advance to `cycle`: finish due crafts, then report progress of the rest
    pub fn tick(&mut self, cycle: u64, ledger: &mut InventoryLedger) {
        self.current_cycle = cycle;

        for recipe_id in self.completions.pop_due(cycle) {
            let Some(craft) = self.active.remove(&recipe_id) else {
                continue;
            };
            if let Err(err) = ledger.try_add(&craft.result_item, craft.result_quantity) {
                warn!("[Crafting] Output of '{}' lost: {}", recipe_id, err);
            }
            info!(
                "[Crafting] Crafting '{}' completed. Added {} x {} to inventory.",
                recipe_id, craft.result_quantity, craft.result_item
            );
            self.outbox.push(CafeEvent::CraftProgress {
                recipe: recipe_id.clone(),
                fraction: 1.0,
            });
            self.outbox.push(CafeEvent::CraftCompleted {
                recipe: recipe_id,
                item: craft.result_item,
                quantity: craft.result_quantity,
            });
        }

        let mut running: Vec<(&RecipeId, &ActiveCraft)> = self.active.iter().collect();
        running.sort_by(|a, b| a.0.cmp(b.0));
        for (recipe_id, craft) in running {
            let fraction = Self::fraction(craft, cycle);
            debug!("[Crafting] '{}' at {:.0}%", recipe_id, fraction * 100.0);
            self.outbox.push(CafeEvent::CraftProgress {
                recipe: recipe_id.clone(),
                fraction,
            });
        }
    }

    pub fn is_crafting(&self, recipe: &RecipeId) -> bool {
        self.active.contains_key(recipe)
    }

    /// Elapsed fraction of an active craft
    pub fn progress(&self, recipe: &RecipeId) -> Option<f64> {
        self.active
            .get(recipe)
            .map(|craft| Self::fraction(craft, self.current_cycle))
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn drain_events(&mut self) -> Vec<CafeEvent> {
        self.outbox.drain()
    }

    fn fraction(craft: &ActiveCraft, cycle: u64) -> f64 {
        let elapsed = cycle.saturating_sub(craft.started_cycle) as f64;
        (elapsed / craft.duration_cycles as f64).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latte() -> Recipe {
        Recipe::new("latte", "Latte", "latte", 0.5)
            .with_ingredient("coffee_beans", 2)
            .with_ingredient("milk", 1)
    }

    fn stocked_ledger() -> InventoryLedger {
        let mut ledger = InventoryLedger::new(100);
        ledger.add(&ItemId::new("coffee_beans"), 4);
        ledger.add(&ItemId::new("milk"), 2);
        ledger
    }

    #[test]
    fn test_craft_debits_and_credits() {
        let mut engine = CraftingEngine::new(0.1);
        let mut ledger = stocked_ledger();
        let recipe = latte();

        assert!(engine.can_craft(&recipe, &ledger));
        assert!(engine.start_craft(&recipe, 1.0, &mut ledger));
        assert_eq!(ledger.count(&ItemId::new("coffee_beans")), 2);
        assert_eq!(ledger.count(&ItemId::new("milk")), 1);
        assert!(engine.is_crafting(&recipe.id));

        for cycle in 1..5 {
            engine.tick(cycle, &mut ledger);
            assert!(engine.is_crafting(&recipe.id), "still crafting at cycle {}", cycle);
        }
        assert!((engine.progress(&recipe.id).unwrap() - 0.8).abs() < 1e-9);

        engine.tick(5, &mut ledger);
        assert!(!engine.is_crafting(&recipe.id));
        assert_eq!(ledger.count(&ItemId::new("latte")), 1);

        let events = engine.drain_events();
        assert!(events.iter().any(|event| matches!(event, CafeEvent::CraftCompleted { quantity: 1, .. })));
    }

    #[test]
    fn test_same_recipe_cannot_run_twice() {
        let mut engine = CraftingEngine::new(0.1);
        let mut ledger = stocked_ledger();
        let recipe = latte();

        assert!(engine.start_craft(&recipe, 1.0, &mut ledger));
        assert!(matches!(
            engine.try_start_craft(&recipe, 1.0, &mut ledger),
            Err(CafeError::CraftAlreadyActive(_))
        ));
        // The rejected attempt debited nothing
        assert_eq!(ledger.count(&ItemId::new("coffee_beans")), 2);

        engine.tick(5, &mut ledger);
        assert!(engine.start_craft(&recipe, 1.0, &mut ledger));
    }

    #[test]
    fn test_different_recipes_run_concurrently() {
        let mut engine = CraftingEngine::new(0.1);
        let mut ledger = stocked_ledger();
        let espresso = Recipe::new("espresso", "Espresso", "espresso", 1.0).with_ingredient("coffee_beans", 1);

        assert!(engine.start_craft(&latte(), 1.0, &mut ledger));
        assert!(engine.start_craft(&espresso, 1.0, &mut ledger));
        assert_eq!(engine.active_count(), 2);
    }

    #[test]
    fn test_insufficient_ingredients() {
        let mut engine = CraftingEngine::new(0.1);
        let mut ledger = InventoryLedger::new(100);
        ledger.add(&ItemId::new("coffee_beans"), 1);

        assert!(!engine.can_craft(&latte(), &ledger));
        assert!(!engine.start_craft(&latte(), 1.0, &mut ledger));
        assert_eq!(ledger.count(&ItemId::new("coffee_beans")), 1);
        assert_eq!(engine.active_count(), 0);
    }

    #[test]
    fn test_speed_multiplier_shortens_craft() {
        let mut engine = CraftingEngine::new(0.1);
        let mut ledger = stocked_ledger();
        let duration = engine.try_start_craft(&latte(), 2.5, &mut ledger).unwrap();
        assert_eq!(duration, 2);

        let mut other = CraftingEngine::new(0.1);
        let mut ledger = stocked_ledger();
        assert_eq!(other.try_start_craft(&latte(), 0.0, &mut ledger).unwrap(), 5);
    }

    #[test]
    fn test_duplicate_lines_leave_partial_debit() {
        // Each line passes the pre-check on its own, but together they need 4 beans
        let recipe = Recipe::new("double", "Double Shot", "double", 1.0)
            .with_ingredient("coffee_beans", 2)
            .with_ingredient("coffee_beans", 2);
        let mut engine = CraftingEngine::new(0.1);
        let mut ledger = InventoryLedger::new(100);
        ledger.add(&ItemId::new("coffee_beans"), 3);

        assert!(engine.can_craft(&recipe, &ledger));
        assert!(matches!(
            engine.try_start_craft(&recipe, 1.0, &mut ledger),
            Err(CafeError::IngredientDebitFailed { .. })
        ));
        assert_eq!(ledger.count(&ItemId::new("coffee_beans")), 1);
        assert!(!engine.is_crafting(&recipe.id));
    }

    #[test]
    fn test_zero_time_recipe_completes_next_cycle() {
        let recipe = Recipe::new("water", "Water", "water", 0.0);
        let mut engine = CraftingEngine::new(0.1);
        let mut ledger = InventoryLedger::new(10);
        assert!(engine.start_craft(&recipe, 1.0, &mut ledger));
        engine.tick(1, &mut ledger);
        assert_eq!(ledger.count(&ItemId::new("water")), 1);
    }
}
