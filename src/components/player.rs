use crate::core::errors::{CafeError, CafeResult};
use crate::core::event::{CafeEvent, Outbox};
use log::{debug, info, warn};

/// Money, level and experience of the cafe owner.
///
/// `xp_to_next_level[level - 1]` is the experience needed to leave `level`;
/// past the end of the table the player is at max level and xp just accumulates.
#[derive(Debug, Clone)]
pub struct PlayerResources {
    money: f64,
    level: i32,
    xp: i32,
    xp_to_next_level: Vec<i32>,
    outbox: Outbox,
}

impl PlayerResources {
    pub fn new(starting_money: f64, xp_to_next_level: Vec<i32>) -> Self {
        Self {
            money: starting_money,
            level: 1,
            xp: 0,
            xp_to_next_level,
            outbox: Outbox::new(),
        }
    }

    pub fn money(&self) -> f64 {
        self.money
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn xp(&self) -> i32 {
        self.xp
    }

    /// Experience needed to leave the current level, `None` at max level
    pub fn xp_for_current_level(&self) -> Option<i32> {
        let index = usize::try_from(self.level.checked_sub(1)?).ok()?;
        self.xp_to_next_level.get(index).copied()
    }

    pub fn add_money(&mut self, amount: f64) {
        if amount < 0.0 {
            warn!("[Player] Attempted to add a negative amount of money.");
            return;
        }
        self.money += amount;
        debug!("[Player] Added {:.2} money. Current balance: {:.2}", amount, self.money);
        self.outbox.push(CafeEvent::MoneyChanged { money: self.money });
    }

    pub fn spend_money(&mut self, amount: f64) -> bool {
        match self.try_spend_money(amount) {
            Ok(()) => true,
            Err(err) => {
                info!("[Player] {}", err);
                false
            }
        }
    }

    pub fn try_spend_money(&mut self, amount: f64) -> CafeResult<()> {
        if amount < 0.0 {
            return Err(CafeError::InvalidConfig(format!(
                "cannot spend a negative amount of money ({:.2})",
                amount
            )));
        }
        if self.money < amount {
            return Err(CafeError::InsufficientFunds {
                needed: amount,
                available: self.money,
            });
        }
        self.money -= amount;
        debug!("[Player] Spent {:.2} money. Current balance: {:.2}", amount, self.money);
        self.outbox.push(CafeEvent::MoneyChanged { money: self.money });
        Ok(())
    }

    pub fn add_xp(&mut self, amount: i32) {
        if amount < 0 {
            warn!("[Player] Attempted to add a negative amount of XP.");
            return;
        }
        self.xp = self.xp.saturating_add(amount);
        debug!("[Player] Added {} XP. Current XP: {}", amount, self.xp);
        self.level_up_while_possible();
        self.notify_xp();
    }

    /// Payout entry point used by customers
    pub fn grant(&mut self, money: f64, xp: i32) {
        self.add_money(money);
        self.add_xp(xp);
    }

    /// Overwrite everything with saved values, as they are
    pub fn restore(&mut self, money: f64, level: i32, xp: i32) {
        self.money = money;
        self.level = level;
        self.xp = xp;
        self.outbox.push(CafeEvent::MoneyChanged { money: self.money });
        self.outbox.push(CafeEvent::LevelChanged { level: self.level });
        self.notify_xp();
    }

    pub fn drain_events(&mut self) -> Vec<CafeEvent> {
        self.outbox.drain()
    }

    fn level_up_while_possible(&mut self) {
        while let Some(required) = self.xp_for_current_level() {
            if self.xp < required {
                break;
            }
            self.xp -= required;
            self.level += 1;
            info!("[Player] Level Up! Reached Level {}!", self.level);
            self.outbox.push(CafeEvent::LevelChanged { level: self.level });
        }
    }

    fn notify_xp(&mut self) {
        self.outbox.push(CafeEvent::XpChanged {
            xp: self.xp,
            xp_to_next_level: self.xp_for_current_level(),
        });
    }
}
