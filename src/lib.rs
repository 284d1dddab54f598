pub mod catalog;
pub mod components;
pub mod core;
pub mod persistence;

// Re-export commonly used types
pub use crate::catalog::{Catalog, Recipe};
pub use crate::core::config::CafeConfig;
pub use crate::core::errors::{CafeError, CafeResult, ErrorKind};
pub use crate::core::event::{CafeEvent, Event, EventId, EventKind};
pub use crate::core::event_bus::{CafeObserver, SubscriptionId};
pub use crate::core::simulation_builder::CafeBuilder;
pub use crate::core::simulation_engine::{Cafe, CafeStats};
pub use crate::core::types::{CustomerId, ItemId, Position, RecipeId, Rotation, SeatId, WorkerId};
pub use crate::persistence::{GameData, SaveSystem};
