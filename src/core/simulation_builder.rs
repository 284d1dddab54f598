use super::config::CafeConfig;
use super::errors::CafeResult;
use super::event::EventKind;
use super::event_bus::CafeObserver;
use super::simulation_engine::Cafe;
use crate::catalog::Catalog;
use crate::components::buildings::BuildRegistry;
use crate::components::equipment::EquipmentRack;
use crate::components::navigation::CafeLayout;
use crate::persistence::SaveSystem;

/// Imperative API for assembling a cafe
pub struct CafeBuilder {
    config: CafeConfig,
    catalog: Option<Catalog>,
    layout: Option<CafeLayout>,
    equipment: Option<EquipmentRack>,
    buildings: Option<BuildRegistry>,
    save_system: Option<SaveSystem>,
    /// Observers with the event kinds they listen to
    observers: Vec<(Vec<EventKind>, Box<dyn CafeObserver>)>,
}

impl CafeBuilder {
    pub fn new() -> Self {
        Self {
            config: CafeConfig::default(),
            catalog: None,
            layout: None,
            equipment: None,
            buildings: None,
            save_system: None,
            observers: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: CafeConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the default coffee menu
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_layout(mut self, layout: CafeLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_equipment(mut self, equipment: EquipmentRack) -> Self {
        self.equipment = Some(equipment);
        self
    }

    pub fn with_buildings(mut self, buildings: BuildRegistry) -> Self {
        self.buildings = Some(buildings);
        self
    }

    /// Persist to this file; an existing save is loaded on build
    pub fn with_save_system(mut self, save_system: SaveSystem) -> Self {
        self.save_system = Some(save_system);
        self
    }

    /// Subscribe an observer; an empty `kinds` list means every event
    pub fn with_observer(mut self, kinds: &[EventKind], observer: Box<dyn CafeObserver>) -> Self {
        self.observers.push((kinds.to_vec(), observer));
        self
    }

    /// Validate the configuration, wire up the components and load or start the game
    pub fn build(self) -> CafeResult<Cafe> {
        let equipment = self
            .equipment
            .unwrap_or_else(|| EquipmentRack::standard(self.config.inventory.base_capacity));
        let mut cafe = Cafe::assemble(
            self.config,
            self.catalog.unwrap_or_else(Catalog::cafe_menu),
            self.layout.unwrap_or_else(CafeLayout::standard),
            equipment,
            self.buildings.unwrap_or_else(BuildRegistry::standard),
            self.save_system,
        )?;

        for (kinds, observer) in self.observers {
            cafe.subscribe(&kinds, observer);
        }
        cafe.load()?;
        Ok(cafe)
    }
}

impl Default for CafeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
