use super::config::CafeConfig;
use super::errors::{CafeError, CafeResult};
use super::event::{CafeEvent, EventKind};
use super::event_bus::{CafeObserver, EventBus, SubscriptionId};
use super::types::{CustomerId, Position, Rotation};
use crate::catalog::Catalog;
use crate::components::buildings::{BuildRegistry, BuiltObject};
use crate::components::crafting::CraftingEngine;
use crate::components::customer::{Customer, CustomerContext, Departure};
use crate::components::equipment::EquipmentRack;
use crate::components::inventory::InventoryLedger;
use crate::components::navigation::CafeLayout;
use crate::components::player::PlayerResources;
use crate::components::seating::SeatingRegistry;
use crate::components::spawner::CustomerSpawner;
use crate::components::worker::{Delivery, Worker, WorkerContext};
use crate::persistence::{EquipmentSaveData, GameData, SaveSystem};
use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Running totals for a simulated day
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CafeStats {
    pub customers_spawned: usize,
    pub customers_served: usize,
    pub customers_turned_away: usize,
    pub customers_left_early: usize,
    pub orders_delivered: usize,
}

/// The whole cafe on one logical timeline.
///
/// Every component is owned here and handed to the actors through explicit
/// context structs. One call to [`Cafe::step`] advances one cycle of
/// `tick_seconds`: crafts, the worker, deliveries, customers in spawn order,
/// removal of customers who left, the spawner, auto-save, and finally event
/// publication.
pub struct Cafe {
    config: CafeConfig,
    catalog: Catalog,
    layout: CafeLayout,
    ledger: InventoryLedger,
    crafting: CraftingEngine,
    seating: SeatingRegistry,
    worker: Worker,
    customers: Vec<Customer>,
    spawner: CustomerSpawner,
    player: PlayerResources,
    equipment: EquipmentRack,
    buildings: BuildRegistry,
    save_system: Option<SaveSystem>,
    event_bus: EventBus,
    rng: StdRng,
    current_cycle: u64,
    next_autosave_cycle: Option<u64>,
    engine_events: Vec<CafeEvent>,
    pending_events: Vec<CafeEvent>,
    stats: CafeStats,
}

impl Cafe {
    pub(crate) fn assemble(
        config: CafeConfig,
        catalog: Catalog,
        layout: CafeLayout,
        equipment: EquipmentRack,
        buildings: BuildRegistry,
        save_system: Option<SaveSystem>,
    ) -> CafeResult<Self> {
        config.validate()?;

        let tick = config.tick_seconds;
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let worker_start = layout.worker_idle.or(layout.counter).unwrap_or_default();
        let next_autosave_cycle = match (&save_system, config.autosave_interval_seconds) {
            (Some(_), Some(seconds)) => Some(config.cycles_for(seconds).max(1)),
            _ => None,
        };

        info!(
            "[Cafe] Opening with {} seats, {} recipes, tick {:.3}s",
            layout.seats.len(),
            catalog.recipes().len(),
            tick
        );

        Ok(Self {
            ledger: InventoryLedger::new(config.inventory.base_capacity),
            crafting: CraftingEngine::new(tick),
            seating: SeatingRegistry::new(layout.seats.clone()),
            worker: Worker::new(config.worker.clone(), worker_start, tick),
            customers: Vec::new(),
            spawner: CustomerSpawner::new(&config.spawner, tick),
            player: PlayerResources::new(config.player.starting_money, config.player.xp_to_next_level.clone()),
            equipment,
            buildings,
            save_system,
            event_bus: EventBus::new(),
            rng,
            current_cycle: 0,
            next_autosave_cycle,
            engine_events: Vec::new(),
            pending_events: Vec::new(),
            stats: CafeStats::default(),
            config,
            catalog,
            layout,
        })
    }

    /// Register an observer for the given kinds, or every kind when `kinds` is empty
    pub fn subscribe(&mut self, kinds: &[EventKind], observer: Box<dyn CafeObserver>) -> SubscriptionId {
        self.event_bus.subscribe(kinds, observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> Option<Box<dyn CafeObserver>> {
        self.event_bus.unsubscribe(id)
    }

    /// Run until `max_cycles`; returns the final cycle
    pub fn run(&mut self) -> CafeResult<u64> {
        if self.config.max_cycles.is_none() {
            return Err(CafeError::InvalidConfig(
                "run() needs max_cycles; use run_for() for open-ended simulations".into(),
            ));
        }
        while self.step()? {}
        Ok(self.current_cycle)
    }

    /// Advance `cycles` cycles, stopping early at `max_cycles`
    pub fn run_for(&mut self, cycles: u64) -> CafeResult<u64> {
        for _ in 0..cycles {
            if !self.step()? {
                break;
            }
        }
        Ok(self.current_cycle)
    }

    /// Process one cycle; returns false once `max_cycles` is reached
    pub fn step(&mut self) -> CafeResult<bool> {
        if self.is_finished() {
            return Ok(false);
        }
        self.current_cycle += 1;
        let cycle = self.current_cycle;
        let tick_seconds = self.config.tick_seconds;
        debug!("=== Cafe Cycle {} ===", cycle);

        self.crafting.tick(cycle, &mut self.ledger);

        let mut worker_ctx = WorkerContext {
            tick_seconds,
            catalog: &self.catalog,
            layout: &self.layout,
            seating: &self.seating,
            crafting: &mut self.crafting,
            ledger: &mut self.ledger,
            speed_multiplier: self.equipment.stove_speed_multiplier(),
        };
        if let Some(delivery) = self.worker.tick(&mut worker_ctx) {
            self.route_delivery(delivery);
        }

        for customer in self.customers.iter_mut() {
            let mut ctx = CustomerContext {
                cycle,
                tick_seconds,
                catalog: &self.catalog,
                layout: &self.layout,
                config: &self.config.customer,
                signature_recipe: self.config.signature_recipe.as_ref(),
                worker: &mut self.worker,
                seating: &mut self.seating,
                player: &mut self.player,
                rng: &mut self.rng,
            };
            customer.tick(&mut ctx);
        }

        self.remove_exited_customers();

        if let Some(customer) = self.spawner.tick(
            cycle,
            &self.layout,
            &self.seating,
            &self.config.customer,
            self.worker.id(),
        ) {
            self.stats.customers_spawned += 1;
            self.customers.push(customer);
        }

        self.autosave_if_due(cycle);

        self.collect_events();
        let events = std::mem::take(&mut self.pending_events);
        let published = self.event_bus.publish_all(cycle, events);
        self.event_bus.notify_step_complete(cycle, published);

        Ok(!self.is_finished())
    }

    /// Let a customer in right now, bypassing the spawn timer and limits
    pub fn admit_customer(&mut self) -> Option<CustomerId> {
        let customer = self
            .spawner
            .spawn_now(&self.layout, &self.config.customer, self.worker.id())?;
        let id = customer.id();
        self.stats.customers_spawned += 1;
        self.customers.push(customer);
        Some(id)
    }

    pub fn upgrade_equipment(&mut self, id: &str) -> CafeResult<usize> {
        self.equipment.upgrade(id, &mut self.player, &mut self.ledger)
    }

    pub fn place_building(&mut self, id: &str, position: Position, rotation: Rotation) -> CafeResult<()> {
        self.buildings.place(id, position, rotation, &mut self.player)
    }

    /// Everything a save file records
    pub fn snapshot(&self) -> GameData {
        GameData {
            money: self.player.money(),
            level: self.player.level(),
            xp: self.player.xp(),
            inventory: self.ledger.contents().clone(),
            built_objects: self.buildings.placed().iter().map(Into::into).collect(),
            equipment: self
                .equipment
                .iter()
                .map(|equipment| EquipmentSaveData {
                    id: equipment.id().to_string(),
                    level: equipment.level(),
                })
                .collect(),
        }
    }

    pub fn save(&mut self) -> CafeResult<()> {
        let data = self.snapshot();
        let save_system = self
            .save_system
            .as_ref()
            .ok_or_else(|| CafeError::MissingConfiguration("no save file configured".into()))?;
        save_system.save(&data)?;
        self.engine_events.push(CafeEvent::GameSaved);
        Ok(())
    }

    /// Load the save file, or start a new game when there is none; returns whether a file was read
    pub fn load(&mut self) -> CafeResult<bool> {
        let saved = match &self.save_system {
            Some(save_system) => save_system.load()?,
            None => None,
        };
        let from_file = saved.is_some();
        match saved {
            Some(data) => self.apply_game_data(data),
            None => self.start_new_game(),
        }
        self.engine_events.push(CafeEvent::GameLoaded { from_file });
        Ok(from_file)
    }

    /// Replace player, inventory, equipment and buildings with saved state
    pub fn apply_game_data(&mut self, data: GameData) {
        self.player.restore(data.money, data.level, data.xp);
        for saved in &data.equipment {
            if self.equipment.set_level(&saved.id, saved.level, &mut self.ledger) {
                debug!("[Cafe] Loaded level {} for equipment {}", saved.level, saved.id);
            }
        }
        self.ledger.restore(data.inventory);
        self.buildings
            .restore(data.built_objects.into_iter().map(BuiltObject::from).collect());
        info!("[Cafe] Game loaded!");
    }

    /// Default player values plus the configured starting stock
    pub fn start_new_game(&mut self) {
        let fresh = GameData {
            money: self.config.player.starting_money,
            ..GameData::default()
        };
        self.apply_game_data(fresh);
        self.equipment.apply_all(&mut self.ledger);
        for entry in &self.config.inventory.starting_stock {
            self.ledger.add(&entry.item, entry.quantity);
        }
        info!(
            "[Cafe] New game with {}/{} items in stock",
            self.ledger.current_total(),
            self.ledger.capacity()
        );
    }

    pub fn current_cycle(&self) -> u64 {
        self.current_cycle
    }

    /// Simulated seconds since opening
    pub fn elapsed_seconds(&self) -> f64 {
        self.current_cycle as f64 * self.config.tick_seconds
    }

    pub fn is_finished(&self) -> bool {
        self.config
            .max_cycles
            .map_or(false, |max| self.current_cycle >= max)
    }

    pub fn config(&self) -> &CafeConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn layout(&self) -> &CafeLayout {
        &self.layout
    }

    pub fn inventory(&self) -> &InventoryLedger {
        &self.ledger
    }

    pub fn inventory_mut(&mut self) -> &mut InventoryLedger {
        &mut self.ledger
    }

    pub fn crafting(&self) -> &CraftingEngine {
        &self.crafting
    }

    pub fn seating(&self) -> &SeatingRegistry {
        &self.seating
    }

    pub fn worker(&self) -> &Worker {
        &self.worker
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn customer(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.iter().find(|customer| customer.id() == id)
    }

    pub fn spawner(&self) -> &CustomerSpawner {
        &self.spawner
    }

    pub fn player(&self) -> &PlayerResources {
        &self.player
    }

    pub fn equipment(&self) -> &EquipmentRack {
        &self.equipment
    }

    pub fn buildings(&self) -> &BuildRegistry {
        &self.buildings
    }

    pub fn stats(&self) -> &CafeStats {
        &self.stats
    }

    fn route_delivery(&mut self, delivery: Delivery) {
        match self
            .customers
            .iter_mut()
            .find(|customer| customer.id() == delivery.customer)
        {
            Some(customer) => {
                if customer.deliver_order(&delivery.item) {
                    self.stats.orders_delivered += 1;
                }
            }
            None => warn!(
                "[Cafe] {} left before {} could be delivered to {}",
                delivery.customer, delivery.item, delivery.seat
            ),
        }
    }

    fn remove_exited_customers(&mut self) {
        // Drain first so the exit events of removed customers are not lost
        for customer in self.customers.iter_mut() {
            self.pending_events.extend(customer.drain_events());
        }

        let mut index = 0;
        while index < self.customers.len() {
            if !self.customers[index].is_exited() {
                index += 1;
                continue;
            }
            let customer = self.customers.remove(index);
            match customer.departure() {
                Some(Departure::Served) => self.stats.customers_served += 1,
                Some(Departure::NoSeat) => self.stats.customers_turned_away += 1,
                _ => self.stats.customers_left_early += 1,
            }
            self.spawner.customer_exited();
        }
    }

    fn autosave_if_due(&mut self, cycle: u64) {
        let Some(due) = self.next_autosave_cycle else {
            return;
        };
        if cycle < due {
            return;
        }
        let interval = self
            .config
            .autosave_interval_seconds
            .map_or(1, |seconds| self.config.cycles_for(seconds).max(1));
        self.next_autosave_cycle = Some(cycle + interval);
        match self.save() {
            Ok(()) => info!("[Cafe] Auto-saved at cycle {}", cycle),
            Err(err) => error!("[Cafe] Auto-save failed: {}", err),
        }
    }

    fn collect_events(&mut self) {
        let pending = &mut self.pending_events;
        pending.extend(self.ledger.drain_events());
        pending.extend(self.crafting.drain_events());
        pending.extend(self.seating.drain_events());
        pending.extend(self.worker.drain_events());
        for customer in self.customers.iter_mut() {
            pending.extend(customer.drain_events());
        }
        pending.extend(self.spawner.drain_events());
        pending.extend(self.player.drain_events());
        pending.extend(self.equipment.drain_events());
        pending.extend(self.buildings.drain_events());
        pending.append(&mut self.engine_events);
    }
}
