pub mod buildings;
pub mod crafting;
pub mod customer;
pub mod equipment;
pub mod inventory;
pub mod navigation;
pub mod order_queue;
pub mod player;
pub mod seating;
pub mod spawner;
pub mod worker;

pub use buildings::{Buildable, BuildRegistry, BuiltObject};
pub use crafting::CraftingEngine;
pub use customer::{Customer, CustomerContext, CustomerState, Departure};
pub use equipment::{Equipment, EquipmentEffect, EquipmentKind, EquipmentRack, UpgradeLevel};
pub use inventory::InventoryLedger;
pub use navigation::{CafeLayout, LinearAgent, NavAgent};
pub use order_queue::{Order, OrderQueue};
pub use player::PlayerResources;
pub use seating::{Seat, SeatingRegistry};
pub use spawner::CustomerSpawner;
pub use worker::{Delivery, Worker, WorkerContext, WorkerState};
