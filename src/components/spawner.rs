use crate::components::customer::Customer;
use crate::components::navigation::CafeLayout;
use crate::components::seating::SeatingRegistry;
use crate::core::config::{cycles_for_seconds, CustomerConfig, SpawnerConfig};
use crate::core::event::{CafeEvent, Outbox};
use crate::core::types::WorkerId;
use log::{debug, error, info};

/// Periodically lets a new customer in while there is room
pub struct CustomerSpawner {
    max_customers: usize,
    interval_cycles: u64,
    next_spawn_cycle: u64,
    active: usize,
    outbox: Outbox,
}

impl CustomerSpawner {
    pub fn new(config: &SpawnerConfig, tick_seconds: f64) -> Self {
        let interval_cycles = cycles_for_seconds(config.spawn_interval_seconds, tick_seconds).max(1);
        Self {
            max_customers: config.max_customers,
            interval_cycles,
            // The first customer arrives after one full interval
            next_spawn_cycle: interval_cycles,
            active: 0,
            outbox: Outbox::new(),
        }
    }

    pub fn active_customers(&self) -> usize {
        self.active
    }

    pub fn next_spawn_cycle(&self) -> u64 {
        self.next_spawn_cycle
    }

    /// Spawn a customer when the interval elapsed, the cafe has room and a seat is free
    pub fn tick(
        &mut self,
        cycle: u64,
        layout: &CafeLayout,
        seating: &SeatingRegistry,
        customer_config: &CustomerConfig,
        worker: &WorkerId,
    ) -> Option<Customer> {
        if cycle < self.next_spawn_cycle {
            return None;
        }
        self.next_spawn_cycle = cycle + self.interval_cycles;

        if self.active >= self.max_customers {
            debug!("[Spawner] Cafe full ({}/{})", self.active, self.max_customers);
            return None;
        }
        if !seating.has_free_seat() {
            debug!("[Spawner] No free seat, skipping spawn");
            return None;
        }
        self.spawn_now(layout, customer_config, worker)
    }

    /// Spawn at the entrance immediately, ignoring the timer and the limits
    pub fn spawn_now(
        &mut self,
        layout: &CafeLayout,
        customer_config: &CustomerConfig,
        worker: &WorkerId,
    ) -> Option<Customer> {
        let Some(entrance) = layout.entrance else {
            error!("[Spawner] EntrancePoint not set. Customers will not spawn.");
            return None;
        };

        let mut customer = Customer::new(entrance, customer_config);
        customer.initialize(worker, layout);
        self.active += 1;
        info!(
            "[Spawner] Spawning new customer: {}. Active customers: {}",
            customer.id(),
            self.active
        );
        self.outbox.push(CafeEvent::CustomerSpawned {
            customer: customer.id(),
            position: entrance,
        });
        Some(customer)
    }

    pub fn customer_exited(&mut self) {
        self.active = self.active.saturating_sub(1);
        info!("[Spawner] Customer exited. Active customers: {}", self.active);
    }

    pub fn drain_events(&mut self) -> Vec<CafeEvent> {
        self.outbox.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Position;

    fn spawner(max_customers: usize) -> CustomerSpawner {
        let config = SpawnerConfig {
            max_customers,
            spawn_interval_seconds: 1.0,
        };
        CustomerSpawner::new(&config, 0.1)
    }

    #[test]
    fn test_spawns_on_interval_up_to_max() {
        let layout = CafeLayout::standard();
        let seating = SeatingRegistry::new(layout.seats.clone());
        let worker = WorkerId::generate();
        let config = CustomerConfig::default();
        let mut spawner = spawner(2);

        let mut spawned = 0;
        for cycle in 1..=50 {
            if spawner.tick(cycle, &layout, &seating, &config, &worker).is_some() {
                assert_eq!(cycle % 10, 0);
                spawned += 1;
            }
        }
        assert_eq!(spawned, 2);
        assert_eq!(spawner.active_customers(), 2);

        spawner.customer_exited();
        assert!(spawner.tick(60, &layout, &seating, &config, &worker).is_some());
    }

    #[test]
    fn test_no_spawn_without_free_seat_or_entrance() {
        let mut layout = CafeLayout::standard().with_seats(vec![Position::default()]);
        let mut seating = SeatingRegistry::new(layout.seats.clone());
        seating.acquire_seat();
        let worker = WorkerId::generate();
        let config = CustomerConfig::default();
        let mut spawner = spawner(5);

        assert!(spawner.tick(10, &layout, &seating, &config, &worker).is_none());

        seating.release_seat(crate::core::types::SeatId(0));
        layout.entrance = None;
        assert!(spawner.tick(20, &layout, &seating, &config, &worker).is_none());
        assert_eq!(spawner.active_customers(), 0);
    }
}
