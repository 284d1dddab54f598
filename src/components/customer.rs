//! Per-customer lifecycle.
//!
//! A customer walks to the counter, waits for the order intake to be free,
//! orders, walks to the seat it was given, waits for the food, eats, pays and
//! leaves. Every failure path ends with the walk to the exit.

use crate::catalog::{Catalog, Recipe};
use crate::components::navigation::{CafeLayout, LinearAgent, NavAgent};
use crate::components::player::PlayerResources;
use crate::components::seating::SeatingRegistry;
use crate::components::worker::Worker;
use crate::core::config::{cycles_for_seconds, CustomerConfig};
use crate::core::event::{CafeEvent, Outbox};
use crate::core::types::{CustomerId, ItemId, Position, RecipeId, SeatId, WorkerId};
use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomerState {
    TravelingToCounter,
    WaitingForOrderSlot,
    Ordering,
    NoSeatAvailable,
    TravelingToSeat,
    Seated,
    WaitingForFood,
    Eating,
    PayingOut,
    TravelingToExit,
    Exited,
}

/// Why a customer left the cafe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departure {
    Served,
    NoSeat,
    NoCounter,
    NoRecipes,
}

/// Everything a customer reads or mutates during one cycle
pub struct CustomerContext<'a> {
    pub cycle: u64,
    pub tick_seconds: f64,
    pub catalog: &'a Catalog,
    pub layout: &'a CafeLayout,
    pub config: &'a CustomerConfig,
    pub signature_recipe: Option<&'a RecipeId>,
    pub worker: &'a mut Worker,
    pub seating: &'a mut SeatingRegistry,
    pub player: &'a mut PlayerResources,
    pub rng: &'a mut StdRng,
}

pub struct Customer {
    id: CustomerId,
    agent: Box<dyn NavAgent>,
    state: CustomerState,
    worker: Option<WorkerId>,
    ordered_recipe: Option<Recipe>,
    assigned_seat: Option<SeatId>,
    received_order: bool,
    eat_until_cycle: Option<u64>,
    payout: Option<(f64, i32)>,
    departure: Option<Departure>,
    outbox: Outbox,
}

impl Customer {
    pub fn new(spawn_point: Position, config: &CustomerConfig) -> Self {
        let agent = LinearAgent::new(spawn_point, config.move_speed, config.stopping_distance);
        Self::with_agent(Box::new(agent))
    }

    pub fn with_agent(agent: Box<dyn NavAgent>) -> Self {
        Self {
            id: CustomerId::new(),
            agent,
            state: CustomerState::TravelingToCounter,
            worker: None,
            ordered_recipe: None,
            assigned_seat: None,
            received_order: false,
            eat_until_cycle: None,
            payout: None,
            departure: None,
            outbox: Outbox::new(),
        }
    }

    /// Attach to the worker and start walking to the counter
    pub fn initialize(&mut self, worker: &WorkerId, layout: &CafeLayout) {
        self.worker = Some(worker.clone());
        match layout.counter {
            Some(counter) => {
                debug!("[Customer:{}] Going to counter.", self.id);
                self.agent.set_destination(counter);
                self.set_state(CustomerState::TravelingToCounter);
            }
            None => {
                error!("[Customer:{}] CounterOrderPoint not found! Customer leaving cafe.", self.id);
                self.departure = Some(Departure::NoCounter);
                self.go_to_exit(layout);
            }
        }
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn state(&self) -> CustomerState {
        self.state
    }

    pub fn position(&self) -> Position {
        self.agent.position()
    }

    pub fn assigned_seat(&self) -> Option<SeatId> {
        self.assigned_seat
    }

    pub fn ordered_recipe(&self) -> Option<&Recipe> {
        self.ordered_recipe.as_ref()
    }

    pub fn has_received_order(&self) -> bool {
        self.received_order
    }

    /// Money and xp paid, once the customer has settled
    pub fn payout(&self) -> Option<(f64, i32)> {
        self.payout
    }

    pub fn departure(&self) -> Option<Departure> {
        self.departure
    }

    pub fn is_exited(&self) -> bool {
        self.state == CustomerState::Exited
    }

    /// Delivery entry point; only the ordered recipe's result item is accepted
    pub fn deliver_order(&mut self, item: &ItemId) -> bool {
        let accepted = self
            .ordered_recipe
            .as_ref()
            .map_or(false, |recipe| &recipe.result_item == item);
        if accepted {
            info!("[Customer:{}] Received {}!", self.id, item);
            self.received_order = true;
        } else {
            warn!("[Customer:{}] Received wrong order ({}), or order unknown.", self.id, item);
        }
        self.outbox.push(CafeEvent::OrderDelivered {
            customer: self.id,
            item: item.clone(),
            accepted,
        });
        accepted
    }

    pub fn tick(&mut self, ctx: &mut CustomerContext<'_>) {
        if self.worker.is_none() || self.is_exited() {
            return;
        }
        self.agent.advance(ctx.tick_seconds);

        // Instant transitions chain within the cycle; waits end it
        loop {
            let before = self.state;
            self.step(ctx);
            if self.state == before || self.state == CustomerState::Seated {
                break;
            }
        }
    }

    pub fn drain_events(&mut self) -> Vec<CafeEvent> {
        self.outbox.drain()
    }

    fn step(&mut self, ctx: &mut CustomerContext<'_>) {
        match self.state {
            CustomerState::TravelingToCounter => {
                if self.agent.has_arrived() {
                    debug!("[Customer:{}] Waiting for worker to take order...", self.id);
                    self.set_state(CustomerState::WaitingForOrderSlot);
                }
            }
            CustomerState::WaitingForOrderSlot => {
                if !ctx.worker.is_taking_order() {
                    self.set_state(CustomerState::Ordering);
                }
            }
            CustomerState::Ordering => self.place_order(ctx),
            CustomerState::NoSeatAvailable => self.go_to_exit(ctx.layout),
            CustomerState::TravelingToSeat => {
                if !self.agent.has_arrived() {
                    return;
                }
                let seat_position = self.assigned_seat.and_then(|seat| ctx.seating.seat_position(seat));
                self.agent.set_enabled(false);
                if let Some(position) = seat_position {
                    self.agent.warp(position);
                }
                debug!("[Customer:{}] Sat down, waiting for order.", self.id);
                self.set_state(CustomerState::Seated);
            }
            CustomerState::Seated => self.set_state(CustomerState::WaitingForFood),
            CustomerState::WaitingForFood => {
                if self.received_order {
                    let eat_cycles = cycles_for_seconds(ctx.config.eat_seconds, ctx.tick_seconds);
                    self.eat_until_cycle = Some(ctx.cycle + eat_cycles);
                    info!("[Customer:{}] Received order. Enjoying!", self.id);
                    self.set_state(CustomerState::Eating);
                }
            }
            CustomerState::Eating => {
                if self.eat_until_cycle.map_or(true, |due| ctx.cycle >= due) {
                    self.set_state(CustomerState::PayingOut);
                }
            }
            CustomerState::PayingOut => self.pay_and_leave(ctx),
            CustomerState::TravelingToExit => {
                if self.agent.has_arrived() {
                    info!("[Customer:{}] Exited cafe.", self.id);
                    self.exit();
                }
            }
            CustomerState::Exited => {}
        }
    }

    fn place_order(&mut self, ctx: &mut CustomerContext<'_>) {
        let Some(recipe) = Self::choose_recipe(ctx) else {
            error!("[Customer:{}] No recipes available! Customer leaving cafe.", self.id);
            self.departure = Some(Departure::NoRecipes);
            self.go_to_exit(ctx.layout);
            return;
        };

        debug!("[Customer:{}] Requesting order for {}.", self.id, recipe.name);
        match ctx.worker.receive_order(self.id, &recipe, ctx.seating) {
            Some(seat) => {
                info!("[Customer:{}] Ordering {}. Going to {}", self.id, recipe.name, seat);
                self.assigned_seat = Some(seat);
                self.ordered_recipe = Some(recipe);
                match ctx.seating.seat_position(seat) {
                    Some(position) => self.agent.set_destination(position),
                    None => warn!("[Customer:{}] {} has no position", self.id, seat),
                }
                self.set_state(CustomerState::TravelingToSeat);
            }
            None => {
                warn!("[Customer:{}] Worker could not assign a table. Customer leaving cafe.", self.id);
                self.ordered_recipe = Some(recipe);
                self.departure = Some(Departure::NoSeat);
                self.set_state(CustomerState::NoSeatAvailable);
            }
        }
    }

    fn choose_recipe(ctx: &mut CustomerContext<'_>) -> Option<Recipe> {
        if let Some(signature) = ctx.signature_recipe.and_then(|id| ctx.catalog.recipe(id)) {
            return Some(signature.clone());
        }
        let recipes = ctx.catalog.recipes();
        if recipes.is_empty() {
            return None;
        }
        let index = ctx.rng.gen_range(0..recipes.len());
        Some(recipes[index].clone())
    }

    fn pay_and_leave(&mut self, ctx: &mut CustomerContext<'_>) {
        let config = ctx.config;
        let money = ctx.rng.gen_range(config.min_money_reward..=config.max_money_reward);
        let xp = ctx.rng.gen_range(config.min_xp_reward..=config.max_xp_reward);
        ctx.player.grant(money, xp);
        self.payout = Some((money, xp));
        self.outbox.push(CafeEvent::CustomerPaid {
            customer: self.id,
            money,
            xp,
        });

        if let Some(seat) = self.assigned_seat {
            ctx.seating.release_seat(seat);
            debug!("[Customer:{}] Vacated {}.", self.id, seat);
        }
        info!("[Customer:{}] Paid {:.2} money and gave {} XP. Leaving cafe.", self.id, money, xp);

        self.departure = Some(Departure::Served);
        self.agent.set_enabled(true);
        self.go_to_exit(ctx.layout);
    }

    fn go_to_exit(&mut self, layout: &CafeLayout) {
        match layout.exit {
            Some(exit) => {
                debug!("[Customer:{}] Going to exit.", self.id);
                self.agent.set_destination(exit);
                self.set_state(CustomerState::TravelingToExit);
            }
            None => {
                error!("[Customer:{}] ExitPoint not found! Despawning in place.", self.id);
                self.exit();
            }
        }
    }

    fn exit(&mut self) {
        self.set_state(CustomerState::Exited);
        self.outbox.push(CafeEvent::CustomerExited { customer: self.id });
    }

    fn set_state(&mut self, state: CustomerState) {
        if self.state == state {
            return;
        }
        debug!("[Customer:{}] {:?} -> {:?}", self.id, self.state, state);
        self.state = state;
        self.outbox.push(CafeEvent::CustomerStateChanged {
            customer: self.id,
            state,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::WorkerConfig;
    use rand::SeedableRng;

    struct Floor {
        catalog: Catalog,
        layout: CafeLayout,
        config: CustomerConfig,
        worker: Worker,
        seating: SeatingRegistry,
        player: PlayerResources,
        rng: StdRng,
        signature: Option<RecipeId>,
    }

    impl Floor {
        fn new(seats: usize) -> Self {
            let layout = CafeLayout::standard()
                .with_seats((0..seats).map(|i| Position::new(i as f32, 0.0, -3.0)).collect());
            Self {
                catalog: Catalog::cafe_menu(),
                seating: SeatingRegistry::new(layout.seats.clone()),
                worker: Worker::new(WorkerConfig::default(), Position::default(), 0.1),
                layout,
                config: CustomerConfig {
                    move_speed: 100.0,
                    eat_seconds: 0.5,
                    ..CustomerConfig::default()
                },
                player: PlayerResources::new(0.0, vec![1000]),
                rng: StdRng::seed_from_u64(7),
                signature: Some(RecipeId::new("coffee")),
            }
        }

        fn tick(&mut self, customer: &mut Customer, cycle: u64) {
            let mut ctx = CustomerContext {
                cycle,
                tick_seconds: 0.1,
                catalog: &self.catalog,
                layout: &self.layout,
                config: &self.config,
                signature_recipe: self.signature.as_ref(),
                worker: &mut self.worker,
                seating: &mut self.seating,
                player: &mut self.player,
                rng: &mut self.rng,
            };
            customer.tick(&mut ctx);
        }

        fn pick_recipe(&mut self) -> Option<Recipe> {
            let mut ctx = CustomerContext {
                cycle: 0,
                tick_seconds: 0.1,
                catalog: &self.catalog,
                layout: &self.layout,
                config: &self.config,
                signature_recipe: self.signature.as_ref(),
                worker: &mut self.worker,
                seating: &mut self.seating,
                player: &mut self.player,
                rng: &mut self.rng,
            };
            Customer::choose_recipe(&mut ctx)
        }

        fn spawn(&self) -> Customer {
            let mut customer = Customer::new(self.layout.entrance.unwrap_or_default(), &self.config);
            customer.initialize(self.worker.id(), &self.layout);
            customer
        }
    }

    #[test]
    fn test_customer_reaches_seat_and_waits() {
        let mut floor = Floor::new(1);
        let mut customer = floor.spawn();

        for cycle in 1..20 {
            floor.tick(&mut customer, cycle);
        }
        assert_eq!(customer.state(), CustomerState::WaitingForFood);
        assert_eq!(customer.assigned_seat(), Some(SeatId(0)));
        assert_eq!(customer.ordered_recipe().map(|r| r.id.clone()), Some(RecipeId::new("coffee")));
        assert_eq!(customer.position(), Position::new(0.0, 0.0, -3.0));
        assert_eq!(floor.worker.queue_len(), 1);
    }

    #[test]
    fn test_wrong_item_is_ignored() {
        let mut floor = Floor::new(1);
        let mut customer = floor.spawn();
        for cycle in 1..20 {
            floor.tick(&mut customer, cycle);
        }

        assert!(!customer.deliver_order(&ItemId::new("latte")));
        floor.tick(&mut customer, 20);
        assert_eq!(customer.state(), CustomerState::WaitingForFood);

        assert!(customer.deliver_order(&ItemId::new("coffee")));
        floor.tick(&mut customer, 21);
        assert_eq!(customer.state(), CustomerState::Eating);
    }

    #[test]
    fn test_customer_pays_and_leaves() {
        let mut floor = Floor::new(1);
        let mut customer = floor.spawn();
        for cycle in 1..20 {
            floor.tick(&mut customer, cycle);
        }
        customer.deliver_order(&ItemId::new("coffee"));
        for cycle in 20..60 {
            floor.tick(&mut customer, cycle);
        }

        assert!(customer.is_exited());
        assert_eq!(customer.departure(), Some(Departure::Served));
        let (money, xp) = customer.payout().unwrap();
        assert!((10.0..=30.0).contains(&money));
        assert!((5..=15).contains(&xp));
        assert_eq!(floor.player.money(), money);
        assert!(!floor.seating.is_occupied(SeatId(0)));
    }

    #[test]
    fn test_no_seat_sends_customer_home() {
        let mut floor = Floor::new(0);
        let mut customer = floor.spawn();
        for cycle in 1..40 {
            floor.tick(&mut customer, cycle);
        }

        assert!(customer.is_exited());
        assert_eq!(customer.departure(), Some(Departure::NoSeat));
        assert!(customer.payout().is_none());
        let states: Vec<CustomerState> = customer
            .drain_events()
            .into_iter()
            .filter_map(|event| match event {
                CafeEvent::CustomerStateChanged { state, .. } => Some(state),
                _ => None,
            })
            .collect();
        assert!(states.contains(&CustomerState::NoSeatAvailable));
        assert!(!states.contains(&CustomerState::Eating));
    }

    #[test]
    fn test_missing_counter_and_exit_despawns_immediately() {
        let mut floor = Floor::new(1);
        floor.layout.counter = None;
        floor.layout.exit = None;
        let customer = floor.spawn();
        assert!(customer.is_exited());
        assert_eq!(customer.departure(), Some(Departure::NoCounter));
    }

    #[test]
    fn test_waits_while_worker_takes_order() {
        let mut floor = Floor::new(2);
        let mut first = floor.spawn();
        let mut second = floor.spawn();

        // Both reach the counter; the first intake blocks the second for the rest of the cycle
        let mut cycle = 1;
        while first.state() != CustomerState::TravelingToSeat {
            floor.tick(&mut first, cycle);
            floor.tick(&mut second, cycle);
            cycle += 1;
        }
        assert_eq!(second.state(), CustomerState::WaitingForOrderSlot);
        assert!(floor.worker.is_taking_order());
    }

    #[test]
    fn test_empty_menu_sends_customer_home() {
        let mut floor = Floor::new(1);
        floor.catalog = Catalog::default();
        let mut customer = floor.spawn();
        for cycle in 1..40 {
            floor.tick(&mut customer, cycle);
        }

        assert!(customer.is_exited());
        assert_eq!(customer.departure(), Some(Departure::NoRecipes));
        assert!(customer.ordered_recipe().is_none());
        assert!(customer.assigned_seat().is_none());
        assert_eq!(floor.worker.queue_len(), 0);
        assert!(!floor.worker.is_taking_order());
        assert!(!floor.seating.is_occupied(SeatId(0)));
    }

    #[test]
    fn test_signature_recipe_is_preferred() {
        let mut floor = Floor::new(1);
        for _ in 0..5 {
            assert_eq!(floor.pick_recipe().map(|r| r.id), Some(RecipeId::new("coffee")));
        }
    }

    #[test]
    fn test_random_recipe_without_usable_signature() {
        for signature in [None, Some(RecipeId::new("tea"))] {
            let mut floor = Floor::new(1);
            floor.signature = signature;

            let mut picked = std::collections::HashSet::new();
            for _ in 0..12 {
                let recipe = floor.pick_recipe().unwrap();
                assert!(floor.catalog.recipe(&recipe.id).is_some());
                picked.insert(recipe.id);
            }
            assert!(picked.len() > 1, "picks should vary across the menu: {:?}", picked);
        }
    }
}
