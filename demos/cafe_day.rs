use rcafe::components::equipment::EquipmentKind;
use rcafe::core::config::StockEntry;
use rcafe::{CafeBuilder, CafeConfig, CafeEvent, CafeObserver, Event, SaveSystem};
use std::cell::RefCell;
use std::rc::Rc;

/// Tallies what happened during the day and prints a line every report interval
struct DayReport {
    report_interval: u64,
    tally: Rc<RefCell<Tally>>,
}

#[derive(Debug, Default)]
struct Tally {
    spawned: usize,
    orders_accepted: usize,
    orders_rejected: usize,
    crafts_completed: usize,
    revenue: f64,
    xp: i32,
    level: i32,
}

impl CafeObserver for DayReport {
    fn on_event(&mut self, event: &Event) {
        let mut tally = self.tally.borrow_mut();
        match &event.payload {
            CafeEvent::CustomerSpawned { .. } => tally.spawned += 1,
            CafeEvent::OrderAccepted { .. } => tally.orders_accepted += 1,
            CafeEvent::OrderRejected { .. } => tally.orders_rejected += 1,
            CafeEvent::CraftCompleted { .. } => tally.crafts_completed += 1,
            CafeEvent::CustomerPaid { money, xp, .. } => {
                tally.revenue += money;
                tally.xp += xp;
            }
            CafeEvent::LevelChanged { level } => tally.level = *level,
            _ => {}
        }
    }

    fn on_step_complete(&mut self, cycle: u64, _events_published: usize) {
        if cycle % self.report_interval != 0 {
            return;
        }
        let tally = self.tally.borrow();
        println!(
            "📊 cycle {:>5}: {} customers, {} orders ({} rejected), {} drinks, {:.2} earned",
            cycle,
            tally.spawned,
            tally.orders_accepted,
            tally.orders_rejected,
            tally.crafts_completed,
            tally.revenue
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    println!("☕ Opening the cafe");

    // An optional JSON config path as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => CafeConfig::from_json_file(path)?,
        None => CafeConfig::default()
            .with_max_cycles(Some(6000))
            .with_spawning(4, 8.0)
            .with_starting_stock(vec![
                StockEntry::new("coffee_beans", 40),
                StockEntry::new("milk", 20),
                StockEntry::new("sugar", 20),
                StockEntry::new("cup", 20),
            ]),
    };

    println!("Configuration:");
    println!("  Tick: {:.2}s, max cycles: {:?}", config.tick_seconds, config.max_cycles);
    println!(
        "  Spawning: up to {} customers every {:.1}s",
        config.spawner.max_customers, config.spawner.spawn_interval_seconds
    );
    println!(
        "  Rewards: {:.0}-{:.0} money, {}-{} xp",
        config.customer.min_money_reward,
        config.customer.max_money_reward,
        config.customer.min_xp_reward,
        config.customer.max_xp_reward
    );
    println!();

    let save_dir = std::env::temp_dir().join("rcafe");
    let tally = Rc::new(RefCell::new(Tally::default()));
    let report = DayReport {
        report_interval: 500,
        tally: Rc::clone(&tally),
    };

    let mut cafe = CafeBuilder::new()
        .with_config(config)
        .with_save_system(SaveSystem::in_dir(&save_dir))
        .with_observer(&[], Box::new(report))
        .build()?;

    // Saves carry over between runs, so the stove may already be maxed out
    if let Err(err) = cafe.upgrade_equipment("stove_main") {
        log::warn!("Stove upgrade skipped: {}", err);
    }

    let final_cycle = if cafe.config().max_cycles.is_some() {
        cafe.run()?
    } else {
        cafe.run_for(6000)?
    };
    cafe.save()?;

    let stats = cafe.stats();
    let tally = tally.borrow();
    println!();
    println!("📋 Day summary after {} cycles ({:.0}s):", final_cycle, cafe.elapsed_seconds());
    println!("  Customers: {} arrived, {} served, {} turned away, {} left early",
             stats.customers_spawned, stats.customers_served, stats.customers_turned_away, stats.customers_left_early);
    println!("  Orders delivered: {}", stats.orders_delivered);
    println!("  Earned: {:.2} money, {} xp", tally.revenue, tally.xp);
    println!(
        "  Player: {:.2} money, level {}, {} xp",
        cafe.player().money(),
        cafe.player().level(),
        cafe.player().xp()
    );
    if tally.level > 0 {
        println!("  Reached level {} today", tally.level);
    }
    if let Some(stove) = cafe.equipment().first_of_kind(EquipmentKind::Stove) {
        println!("  Stove level {} (x{:.2})", stove.level(), stove.current_speed_multiplier());
    }
    for (item, count) in cafe.inventory().contents() {
        println!("  {:<14} {}", cafe.catalog().item_name(item), count);
    }
    println!("💾 Saved to {}", save_dir.display());

    Ok(())
}
