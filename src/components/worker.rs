//! The single kitchen worker.
//!
//! The worker owns the order queue and processes one order at a time through
//! confirm, prep, craft and deliver stages. Each stage is a state guarded by a
//! predicate re-evaluated once per cycle from [`Worker::tick`].

use crate::catalog::{Catalog, Recipe};
use crate::components::crafting::CraftingEngine;
use crate::components::inventory::InventoryLedger;
use crate::components::navigation::{CafeLayout, LinearAgent, NavAgent};
use crate::components::order_queue::{Order, OrderQueue};
use crate::components::seating::SeatingRegistry;
use crate::core::config::{cycles_for_seconds, WorkerConfig};
use crate::core::event::{CafeEvent, Outbox};
use crate::core::types::{CustomerId, ItemId, Position, SeatId, WorkerId};
use log::{debug, error, info, warn};

/// Extra slack on top of the stopping distance when deciding whether to travel at all
const ARRIVAL_SLACK: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerState {
    Idle,
    MovingToIdle,
    TakingOrder,
    MovingToCounter,
    MovingToKitchen,
    Crafting,
    Delivering,
    Error,
}

impl WorkerState {
    pub fn label(&self) -> &'static str {
        match self {
            WorkerState::Idle => "Idle",
            WorkerState::MovingToIdle => "Moving to Idle Point",
            WorkerState::TakingOrder => "Taking Order",
            WorkerState::MovingToCounter => "Moving to Counter",
            WorkerState::MovingToKitchen => "Moving to Kitchen",
            WorkerState::Crafting => "Crafting",
            WorkerState::Delivering => "Delivering",
            WorkerState::Error => "Error",
        }
    }
}

/// Finished item on its way to a seated customer
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub customer: CustomerId,
    pub item: ItemId,
    pub seat: SeatId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobStage {
    Confirm,
    TravelToCounter,
    HeadToKitchen,
    TravelToKitchen,
    StartCraft,
    Cooking,
    HeadToSeat,
    TravelToSeat,
}

#[derive(Debug, Clone)]
struct Job {
    order: Order,
    stage: JobStage,
}

enum StageOutcome {
    Advance(JobStage),
    Wait,
    Delivered(Delivery),
    Abandoned,
}

/// Everything the worker reads or mutates during one cycle
pub struct WorkerContext<'a> {
    pub tick_seconds: f64,
    pub catalog: &'a Catalog,
    pub layout: &'a CafeLayout,
    pub seating: &'a SeatingRegistry,
    pub crafting: &'a mut CraftingEngine,
    pub ledger: &'a mut InventoryLedger,
    /// Stove speed multiplier, 1.0 when the kitchen has no stove
    pub speed_multiplier: f64,
}

pub struct Worker {
    id: WorkerId,
    agent: Box<dyn NavAgent>,
    config: WorkerConfig,
    queue: OrderQueue,
    current: Option<Job>,
    state: WorkerState,
    label: String,
    taking_order: bool,
    intake_cycles_left: u64,
    intake_cycles: u64,
    outbox: Outbox,
}

impl Worker {
    pub fn new(config: WorkerConfig, start: Position, tick_seconds: f64) -> Self {
        let agent = LinearAgent::new(start, config.move_speed, config.stopping_distance);
        Self::with_agent(config, Box::new(agent), tick_seconds)
    }

    pub fn with_agent(config: WorkerConfig, agent: Box<dyn NavAgent>, tick_seconds: f64) -> Self {
        let id = WorkerId::generate();
        info!("[Worker:{}] Ready at {:?}", id, agent.position());
        Self {
            id,
            agent,
            intake_cycles: cycles_for_seconds(config.order_intake_seconds, tick_seconds),
            config,
            queue: OrderQueue::new(),
            current: None,
            state: WorkerState::Idle,
            label: WorkerState::Idle.label().to_string(),
            taking_order: false,
            intake_cycles_left: 0,
            outbox: Outbox::new(),
        }
    }

    pub fn id(&self) -> &WorkerId {
        &self.id
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Human readable description of the current task
    pub fn task_label(&self) -> &str {
        &self.label
    }

    pub fn position(&self) -> Position {
        self.agent.position()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn pending_orders(&self) -> impl Iterator<Item = &Order> {
        self.queue.iter()
    }

    pub fn current_order(&self) -> Option<&Order> {
        self.current.as_ref().map(|job| &job.order)
    }

    /// True while an order intake is in progress; customers wait for it to clear
    pub fn is_taking_order(&self) -> bool {
        self.taking_order
    }

    /// Accept an order if a seat can be assigned; `None` means rejected and nothing queued
    pub fn receive_order(
        &mut self,
        customer: CustomerId,
        recipe: &Recipe,
        seating: &mut SeatingRegistry,
    ) -> Option<SeatId> {
        self.taking_order = true;
        self.intake_cycles_left = self.intake_cycles;

        let Some(seat) = seating.acquire_seat() else {
            warn!("[Worker:{}] No free tables for {}. Rejecting order.", self.id, customer);
            self.outbox.push(CafeEvent::OrderRejected {
                customer,
                recipe: recipe.id.clone(),
            });
            if self.current.is_none() {
                self.set_state(WorkerState::Idle, WorkerState::Idle.label().to_string());
            }
            return None;
        };

        self.queue.enqueue(Order {
            customer,
            recipe: recipe.id.clone(),
            result_item: recipe.result_item.clone(),
            seat,
        });
        info!(
            "[Worker:{}] Taking order from {} for {}. Assigning {}. Queue size: {}",
            self.id,
            customer,
            recipe.name,
            seat,
            self.queue.len()
        );
        self.outbox.push(CafeEvent::OrderAccepted {
            customer,
            recipe: recipe.id.clone(),
            seat,
            queue_len: self.queue.len(),
        });
        if self.current.is_none() {
            self.set_state(WorkerState::TakingOrder, WorkerState::TakingOrder.label().to_string());
        }
        Some(seat)
    }

    /// Advance one cycle; returns a delivery when an order reached its seat
    pub fn tick(&mut self, ctx: &mut WorkerContext<'_>) -> Option<Delivery> {
        if self.taking_order {
            if self.intake_cycles_left == 0 {
                self.taking_order = false;
            } else {
                self.intake_cycles_left -= 1;
            }
        }

        self.agent.advance(ctx.tick_seconds);

        if self.current.is_none() {
            match self.queue.dequeue() {
                Some(order) => {
                    debug!(
                        "[Worker:{}] Dequeued order for {} - {}",
                        self.id, order.customer, order.recipe
                    );
                    self.current = Some(Job {
                        order,
                        stage: JobStage::Confirm,
                    });
                }
                None => {
                    self.idle_tick(ctx.layout);
                    return None;
                }
            }
        }

        self.process_job(ctx)
    }

    pub fn drain_events(&mut self) -> Vec<CafeEvent> {
        self.outbox.drain()
    }

    fn idle_tick(&mut self, layout: &CafeLayout) {
        let Some(idle_point) = layout.worker_idle else {
            if self.state != WorkerState::Error {
                error!("[Worker:{}] WorkerIdlePoint not set", self.id);
                self.set_state(WorkerState::Error, "Error (no idle point)".to_string());
            }
            return;
        };

        if self.state == WorkerState::MovingToIdle {
            if self.agent.has_arrived() {
                debug!("[Worker:{}] Arrived at idle point, waiting for orders.", self.id);
                self.set_state(WorkerState::Idle, WorkerState::Idle.label().to_string());
            }
        } else if !self.is_near(&idle_point) {
            self.agent.set_destination(idle_point);
            self.set_state(WorkerState::MovingToIdle, WorkerState::MovingToIdle.label().to_string());
        } else if self.state != WorkerState::Idle {
            self.set_state(WorkerState::Idle, WorkerState::Idle.label().to_string());
        }
    }

    fn process_job(&mut self, ctx: &mut WorkerContext<'_>) -> Option<Delivery> {
        loop {
            let (stage, order) = match self.current.as_ref() {
                Some(job) => (job.stage, job.order.clone()),
                None => return None,
            };
            match self.run_stage(stage, &order, ctx) {
                StageOutcome::Advance(next) => {
                    if let Some(job) = self.current.as_mut() {
                        job.stage = next;
                    }
                }
                StageOutcome::Wait => return None,
                StageOutcome::Delivered(delivery) => {
                    info!("[Worker:{}] Order delivered to {}.", self.id, delivery.customer);
                    self.current = None;
                    self.set_state(WorkerState::Idle, WorkerState::Idle.label().to_string());
                    return Some(delivery);
                }
                StageOutcome::Abandoned => {
                    self.current = None;
                    return None;
                }
            }
        }
    }

    fn run_stage(&mut self, stage: JobStage, order: &Order, ctx: &mut WorkerContext<'_>) -> StageOutcome {
        match stage {
            JobStage::Confirm => {
                let Some(counter) = ctx.layout.counter else {
                    return self.abandon("CounterOrderPoint not set");
                };
                if self.is_near(&counter) {
                    return StageOutcome::Advance(JobStage::HeadToKitchen);
                }
                self.agent.set_destination(counter);
                self.set_state(WorkerState::MovingToCounter, WorkerState::MovingToCounter.label().to_string());
                StageOutcome::Advance(JobStage::TravelToCounter)
            }
            JobStage::TravelToCounter => {
                if self.agent.has_arrived() {
                    debug!("[Worker:{}] Arrived at counter.", self.id);
                    StageOutcome::Advance(JobStage::HeadToKitchen)
                } else {
                    StageOutcome::Wait
                }
            }
            JobStage::HeadToKitchen => {
                let Some(kitchen) = ctx.layout.kitchen else {
                    return self.abandon("KitchenPrepPoint not set! Cannot cook.");
                };
                self.agent.set_destination(kitchen);
                self.set_state(WorkerState::MovingToKitchen, WorkerState::MovingToKitchen.label().to_string());
                StageOutcome::Advance(JobStage::TravelToKitchen)
            }
            JobStage::TravelToKitchen => {
                if self.agent.has_arrived() {
                    debug!("[Worker:{}] Arrived at kitchen prep point.", self.id);
                    StageOutcome::Advance(JobStage::StartCraft)
                } else {
                    StageOutcome::Wait
                }
            }
            JobStage::StartCraft => {
                let Some(recipe) = ctx.catalog.recipe(&order.recipe) else {
                    return self.abandon(&format!("recipe '{}' is not in the catalog", order.recipe));
                };
                self.set_state(WorkerState::Crafting, format!("Crafting {}", recipe.name));
                if ctx.crafting.start_craft(recipe, ctx.speed_multiplier, ctx.ledger) {
                    debug!(
                        "[Worker:{}] Cooking '{}' with stove multiplier {:.2}",
                        self.id, recipe.name, ctx.speed_multiplier
                    );
                    StageOutcome::Advance(JobStage::Cooking)
                } else {
                    warn!(
                        "[Worker:{}] Could not start cooking {}. Order for {} dropped.",
                        self.id, recipe.name, order.customer
                    );
                    self.set_state(WorkerState::Idle, "Idle (No Ingredients)".to_string());
                    StageOutcome::Abandoned
                }
            }
            JobStage::Cooking => {
                if ctx.crafting.is_crafting(&order.recipe) {
                    StageOutcome::Wait
                } else {
                    debug!("[Worker:{}] Cooking of '{}' finished.", self.id, order.recipe);
                    StageOutcome::Advance(JobStage::HeadToSeat)
                }
            }
            JobStage::HeadToSeat => {
                let Some(seat_position) = ctx.seating.seat_position(order.seat) else {
                    return self.abandon(&format!("{} does not exist, cannot deliver", order.seat));
                };
                self.agent.set_destination(seat_position);
                let item_name = ctx.catalog.item_name(&order.result_item).to_string();
                self.set_state(WorkerState::Delivering, format!("Delivering {}", item_name));
                StageOutcome::Advance(JobStage::TravelToSeat)
            }
            JobStage::TravelToSeat => {
                if self.agent.has_arrived() {
                    StageOutcome::Delivered(Delivery {
                        customer: order.customer,
                        item: order.result_item.clone(),
                        seat: order.seat,
                    })
                } else {
                    StageOutcome::Wait
                }
            }
        }
    }

    fn abandon(&mut self, reason: &str) -> StageOutcome {
        error!("[Worker:{}] {}. Abandoning current order.", self.id, reason);
        self.set_state(WorkerState::Error, WorkerState::Error.label().to_string());
        StageOutcome::Abandoned
    }

    fn is_near(&self, point: &Position) -> bool {
        self.agent.position().distance(point) <= self.config.stopping_distance + ARRIVAL_SLACK
    }

    fn set_state(&mut self, state: WorkerState, label: String) {
        if self.state == state && self.label == label {
            return;
        }
        debug!("[Worker:{}] {} -> {}", self.id, self.label, label);
        self.state = state;
        self.label = label.clone();
        self.outbox.push(CafeEvent::WorkerTaskChanged { state, label });
    }
}
