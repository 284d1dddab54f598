pub mod config;
pub mod errors;
pub mod event;
pub mod event_bus;
pub mod event_scheduler;
pub mod simulation_builder;
pub mod simulation_engine;
pub mod types;

#[cfg(test)]
mod tests;
