// Tests for the Cafe engine loop
#[cfg(test)]
mod tests {
    use crate::core::config::CafeConfig;
    use crate::core::errors::CafeError;
    use crate::core::simulation_builder::CafeBuilder;
    use crate::core::types::{ItemId, Position, Rotation};
    use crate::persistence::SaveSystem;

    fn quiet_config() -> CafeConfig {
        // No automatic spawns and no autosave so each test controls the timeline
        CafeConfig::default()
            .with_spawning(0, 10.0)
            .with_autosave_interval(None)
    }

    #[test]
    fn test_step_advances_cycle() {
        let mut cafe = CafeBuilder::new().with_config(quiet_config()).build().unwrap();

        assert!(cafe.step().unwrap());
        assert_eq!(cafe.current_cycle(), 1);
        assert!((cafe.elapsed_seconds() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_run_with_max_cycles() {
        let config = quiet_config().with_max_cycles(Some(3));
        let mut cafe = CafeBuilder::new().with_config(config).build().unwrap();

        let final_cycle = cafe.run().unwrap();

        assert_eq!(final_cycle, 3, "Should run exactly 3 cycles");
        assert!(cafe.is_finished());
        assert!(!cafe.step().unwrap());
        assert_eq!(cafe.current_cycle(), 3);
    }

    #[test]
    fn test_run_requires_max_cycles() {
        let mut cafe = CafeBuilder::new().with_config(quiet_config()).build().unwrap();
        assert!(matches!(cafe.run(), Err(CafeError::InvalidConfig(_))));

        assert_eq!(cafe.run_for(25).unwrap(), 25);
    }

    #[test]
    fn test_save_without_save_file_fails() {
        let mut cafe = CafeBuilder::new().with_config(quiet_config()).build().unwrap();
        assert!(matches!(cafe.save(), Err(CafeError::MissingConfiguration(_))));
    }

    #[test]
    fn test_upgrades_and_buildings_spend_money() {
        let mut cafe = CafeBuilder::new().with_config(quiet_config()).build().unwrap();

        assert_eq!(cafe.upgrade_equipment("stove_main").unwrap(), 1);
        assert_eq!(cafe.player().money(), 50.0);
        assert!((cafe.equipment().stove_speed_multiplier() - 1.25).abs() < 1e-9);

        cafe.place_building("chair", Position::new(1.0, 0.0, 1.0), Rotation::IDENTITY)
            .unwrap();
        assert_eq!(cafe.player().money(), 30.0);
        assert!(matches!(
            cafe.place_building("table", Position::default(), Rotation::IDENTITY),
            Err(CafeError::InsufficientFunds { .. })
        ));
        assert_eq!(cafe.buildings().placed().len(), 1);
    }

    #[test]
    fn test_fridge_upgrade_raises_capacity() {
        let config = quiet_config().with_starting_money(500.0);
        let mut cafe = CafeBuilder::new().with_config(config).build().unwrap();
        assert_eq!(cafe.inventory().capacity(), 100);

        cafe.upgrade_equipment("refrigerator_main").unwrap();
        assert_eq!(cafe.inventory().capacity(), 125);
    }

    #[test]
    fn test_autosave_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let saves = SaveSystem::in_dir(dir.path());
        let config = quiet_config().with_autosave_interval(Some(1.0));
        let mut cafe = CafeBuilder::new()
            .with_config(config)
            .with_save_system(saves.clone())
            .build()
            .unwrap();
        cafe.inventory_mut().add(&ItemId::new("milk"), 20);

        cafe.run_for(9).unwrap();
        assert!(!saves.exists());

        cafe.run_for(1).unwrap();
        assert!(saves.exists());

        let saved = saves.load().unwrap().unwrap();
        assert_eq!(saved.inventory.get(&ItemId::new("milk")), Some(&20));
    }

    #[test]
    fn test_admit_customer_walks_in() {
        let mut cafe = CafeBuilder::new().with_config(quiet_config()).build().unwrap();
        let id = cafe.admit_customer().unwrap();

        cafe.run_for(5).unwrap();

        let customer = cafe.customer(id).unwrap();
        assert!(customer.position().z > -10.0);
        assert_eq!(cafe.stats().customers_spawned, 1);
        assert_eq!(cafe.spawner().active_customers(), 1);
    }
}
