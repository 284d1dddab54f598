use super::types::{CustomerId, ItemId, Position, RecipeId, SeatId};
use crate::components::customer::CustomerState;
use crate::components::equipment::EquipmentKind;
use crate::components::worker::WorkerState;

pub type EventId = u64;

/// Routing key for subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    InventoryChanged,
    CapacityChanged,
    CraftStarted,
    CraftProgress,
    CraftCompleted,
    SeatOccupancyChanged,
    OrderAccepted,
    OrderRejected,
    WorkerTaskChanged,
    CustomerSpawned,
    CustomerStateChanged,
    OrderDelivered,
    CustomerPaid,
    CustomerExited,
    MoneyChanged,
    XpChanged,
    LevelChanged,
    EquipmentUpgraded,
    BuildingPlaced,
    GameSaved,
    GameLoaded,
}

/// Immutable record of something that happened inside the cafe
#[derive(Debug, Clone, PartialEq)]
pub enum CafeEvent {
    InventoryChanged { current_total: i32, capacity: i32 },
    CapacityChanged { capacity: i32 },
    CraftStarted { recipe: RecipeId, duration_cycles: u64 },
    CraftProgress { recipe: RecipeId, fraction: f64 },
    CraftCompleted { recipe: RecipeId, item: ItemId, quantity: i32 },
    SeatOccupancyChanged { seat: SeatId, occupied: bool },
    OrderAccepted { customer: CustomerId, recipe: RecipeId, seat: SeatId, queue_len: usize },
    OrderRejected { customer: CustomerId, recipe: RecipeId },
    WorkerTaskChanged { state: WorkerState, label: String },
    CustomerSpawned { customer: CustomerId, position: Position },
    CustomerStateChanged { customer: CustomerId, state: CustomerState },
    OrderDelivered { customer: CustomerId, item: ItemId, accepted: bool },
    CustomerPaid { customer: CustomerId, money: f64, xp: i32 },
    CustomerExited { customer: CustomerId },
    MoneyChanged { money: f64 },
    XpChanged { xp: i32, xp_to_next_level: Option<i32> },
    LevelChanged { level: i32 },
    EquipmentUpgraded { equipment: String, kind: EquipmentKind, level: usize },
    BuildingPlaced { buildable: String, position: Position },
    GameSaved,
    GameLoaded { from_file: bool },
}

impl CafeEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            CafeEvent::InventoryChanged { .. } => EventKind::InventoryChanged,
            CafeEvent::CapacityChanged { .. } => EventKind::CapacityChanged,
            CafeEvent::CraftStarted { .. } => EventKind::CraftStarted,
            CafeEvent::CraftProgress { .. } => EventKind::CraftProgress,
            CafeEvent::CraftCompleted { .. } => EventKind::CraftCompleted,
            CafeEvent::SeatOccupancyChanged { .. } => EventKind::SeatOccupancyChanged,
            CafeEvent::OrderAccepted { .. } => EventKind::OrderAccepted,
            CafeEvent::OrderRejected { .. } => EventKind::OrderRejected,
            CafeEvent::WorkerTaskChanged { .. } => EventKind::WorkerTaskChanged,
            CafeEvent::CustomerSpawned { .. } => EventKind::CustomerSpawned,
            CafeEvent::CustomerStateChanged { .. } => EventKind::CustomerStateChanged,
            CafeEvent::OrderDelivered { .. } => EventKind::OrderDelivered,
            CafeEvent::CustomerPaid { .. } => EventKind::CustomerPaid,
            CafeEvent::CustomerExited { .. } => EventKind::CustomerExited,
            CafeEvent::MoneyChanged { .. } => EventKind::MoneyChanged,
            CafeEvent::XpChanged { .. } => EventKind::XpChanged,
            CafeEvent::LevelChanged { .. } => EventKind::LevelChanged,
            CafeEvent::EquipmentUpgraded { .. } => EventKind::EquipmentUpgraded,
            CafeEvent::BuildingPlaced { .. } => EventKind::BuildingPlaced,
            CafeEvent::GameSaved => EventKind::GameSaved,
            CafeEvent::GameLoaded { .. } => EventKind::GameLoaded,
        }
    }
}

/// Event as delivered to observers, stamped by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: EventId,
    pub cycle: u64,
    pub payload: CafeEvent,
}

impl Event {
    pub fn new(id: EventId, cycle: u64, payload: CafeEvent) -> Self {
        Self { id, cycle, payload }
    }

    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }
}

/// Buffer of events a component produced since the engine last drained it
#[derive(Debug, Default, Clone)]
pub struct Outbox {
    pending: Vec<CafeEvent>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: CafeEvent) {
        self.pending.push(event);
    }

    pub fn drain(&mut self) -> Vec<CafeEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
