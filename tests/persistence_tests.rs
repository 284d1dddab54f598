use rcafe::{
    CafeBuilder, CafeConfig, CafeError, CafeEvent, CafeObserver, Event, EventKind, GameData, ItemId, Position,
    Rotation, SaveSystem,
};
use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

#[derive(Clone, Default)]
struct LoadWatcher {
    loads: Rc<RefCell<Vec<bool>>>,
}

impl CafeObserver for LoadWatcher {
    fn on_event(&mut self, event: &Event) {
        if let CafeEvent::GameLoaded { from_file } = event.payload {
            self.loads.borrow_mut().push(from_file);
        }
    }
}

fn config() -> CafeConfig {
    CafeConfig::default()
        .with_spawning(0, 10.0)
        .with_autosave_interval(None)
        .with_starting_money(500.0)
}

#[test]
fn test_missing_save_starts_new_game() {
    let dir = tempfile::tempdir().unwrap();
    let saves = SaveSystem::in_dir(dir.path());
    let watcher = LoadWatcher::default();

    let mut cafe = CafeBuilder::new()
        .with_save_system(saves.clone())
        .with_observer(&[EventKind::GameLoaded], Box::new(watcher.clone()))
        .build()
        .unwrap();
    cafe.step().unwrap();

    assert!(!saves.exists());
    assert_eq!(cafe.player().money(), 100.0);
    assert_eq!(cafe.player().level(), 1);
    assert_eq!(cafe.player().xp(), 0);
    assert_eq!(cafe.inventory().current_total(), 0);
    assert!(cafe.inventory().contents().is_empty());
    assert_eq!(*watcher.loads.borrow(), vec![false]);
}

#[test]
fn test_save_and_reload_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let saves = SaveSystem::in_dir(dir.path());

    let mut cafe = CafeBuilder::new()
        .with_config(config())
        .with_save_system(saves.clone())
        .build()
        .unwrap();
    cafe.upgrade_equipment("stove_main").unwrap();
    cafe.upgrade_equipment("refrigerator_main").unwrap();
    cafe.place_building("plant", Position::new(2.0, 0.0, 4.0), Rotation::IDENTITY)
        .unwrap();
    cafe.inventory_mut().add(&ItemId::new("milk"), 5);
    let expected = cafe.snapshot();
    cafe.save().unwrap();
    assert!(saves.exists());

    let watcher = LoadWatcher::default();
    let mut reloaded = CafeBuilder::new()
        .with_config(config())
        .with_save_system(saves.clone())
        .with_observer(&[], Box::new(watcher.clone()))
        .build()
        .unwrap();
    reloaded.step().unwrap();

    assert_eq!(reloaded.snapshot(), expected);
    assert_eq!(reloaded.player().money(), 500.0 - 50.0 - 75.0 - 15.0);
    assert_eq!(reloaded.inventory().count(&ItemId::new("milk")), 5);
    assert_eq!(reloaded.inventory().capacity(), 125);
    assert_eq!(reloaded.equipment().get("stove_main").unwrap().level(), 1);
    assert_eq!(reloaded.buildings().placed().len(), 1);
    assert_eq!(reloaded.buildings().placed()[0].position, Position::new(2.0, 0.0, 4.0));
    assert_eq!(*watcher.loads.borrow(), vec![true]);
}

#[test]
fn test_save_file_is_plain_json() {
    let dir = tempfile::tempdir().unwrap();
    let saves = SaveSystem::in_dir(dir.path());
    let mut cafe = CafeBuilder::new()
        .with_config(config())
        .with_save_system(saves.clone())
        .build()
        .unwrap();
    cafe.inventory_mut().add(&ItemId::new("coffee_beans"), 12);
    cafe.save().unwrap();

    let json = fs::read_to_string(saves.path()).unwrap();
    let data: GameData = serde_json::from_str(&json).unwrap();
    assert_eq!(data.money, 500.0);
    assert_eq!(data.level, 1);
    assert_eq!(data.equipment.len(), 4);
    assert_eq!(data.inventory.get(&ItemId::new("coffee_beans")), Some(&12));
}

#[test]
fn test_unknown_saved_entries_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let saves = SaveSystem::in_dir(dir.path());
    let mut data = GameData::default();
    data.money = 42.0;
    data.equipment.push(rcafe::persistence::EquipmentSaveData {
        id: "espresso_machine".into(),
        level: 2,
    });
    data.built_objects.push(rcafe::persistence::BuiltObjectData {
        id: "statue".into(),
        position: [0.0, 0.0, 0.0],
        rotation: [0.0, 0.0, 0.0, 1.0],
    });
    saves.save(&data).unwrap();

    let cafe = CafeBuilder::new().with_save_system(saves).build().unwrap();

    assert_eq!(cafe.player().money(), 42.0);
    assert!(cafe.buildings().placed().is_empty());
    assert!(cafe.equipment().iter().all(|equipment| equipment.level() == 0));
}

#[test]
fn test_corrupt_save_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let saves = SaveSystem::in_dir(dir.path());
    fs::write(saves.path(), "{ not json").unwrap();

    let result = CafeBuilder::new().with_save_system(saves).build();
    assert!(matches!(result, Err(CafeError::Json(_))));
}
