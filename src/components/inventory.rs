use crate::core::errors::{CafeError, CafeResult};
use crate::core::event::{CafeEvent, Outbox};
use crate::core::types::ItemId;
use log::{debug, info, warn};
use std::collections::BTreeMap;

/// Authoritative item-count store with a capacity ceiling.
///
/// `current_total` always equals the sum of the per-item counts and no count is
/// ever zero or negative: an entry that reaches zero is removed. The ceiling only
/// guards additions; lowering it below the current total evicts nothing.
#[derive(Debug, Clone)]
pub struct InventoryLedger {
    items: BTreeMap<ItemId, i32>,
    current_total: i32,
    capacity: i32,
    outbox: Outbox,
}

impl InventoryLedger {
    pub fn new(capacity: i32) -> Self {
        Self {
            items: BTreeMap::new(),
            current_total: 0,
            capacity,
            outbox: Outbox::new(),
        }
    }

    pub fn has(&self, item: &ItemId, quantity: i32) -> bool {
        if item.is_null() {
            return false;
        }
        if quantity <= 0 {
            return true;
        }
        self.count(item) >= quantity
    }

    pub fn count(&self, item: &ItemId) -> i32 {
        self.items.get(item).copied().unwrap_or(0)
    }

    pub fn current_total(&self) -> i32 {
        self.current_total
    }

    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    pub fn contents(&self) -> &BTreeMap<ItemId, i32> {
        &self.items
    }

    /// Add items; logs and leaves the ledger untouched when the addition is invalid
    pub fn add(&mut self, item: &ItemId, quantity: i32) {
        if let Err(err) = self.try_add(item, quantity) {
            warn!("[Inventory] {}", err);
        }
    }

    pub fn try_add(&mut self, item: &ItemId, quantity: i32) -> CafeResult<()> {
        if item.is_null() {
            return Err(CafeError::MissingConfiguration("attempted to add a null item".into()));
        }
        if quantity <= 0 {
            return Err(CafeError::InvalidConfig(format!(
                "cannot add non-positive quantity {} of {}",
                quantity, item
            )));
        }
        let new_total = match self.current_total.checked_add(quantity) {
            Some(total) if total <= self.capacity => total,
            _ => {
                return Err(CafeError::CapacityExceeded {
                    item: item.clone(),
                    amount: quantity,
                    current: self.current_total,
                    capacity: self.capacity,
                })
            }
        };

        // A single count never exceeds the total, so this cannot overflow
        let count = self.items.entry(item.clone()).or_insert(0);
        *count += quantity;
        self.current_total = new_total;
        debug!(
            "[Inventory] Added {} x {}. Total: {}. Occupied: {}/{}",
            quantity, item, count, self.current_total, self.capacity
        );
        self.notify_inventory_changed();
        Ok(())
    }

    /// Remove items; returns false and mutates nothing when the removal is invalid
    pub fn remove(&mut self, item: &ItemId, quantity: i32) -> bool {
        match self.try_remove(item, quantity) {
            Ok(()) => true,
            Err(err) => {
                warn!("[Inventory] {}", err);
                false
            }
        }
    }

    pub fn try_remove(&mut self, item: &ItemId, quantity: i32) -> CafeResult<()> {
        if item.is_null() {
            return Err(CafeError::MissingConfiguration("attempted to remove a null item".into()));
        }
        if quantity <= 0 {
            return Err(CafeError::InvalidConfig(format!(
                "cannot remove non-positive quantity {} of {}",
                quantity, item
            )));
        }
        let held = self.count(item);
        if held < quantity {
            return Err(CafeError::InsufficientItems {
                item: item.clone(),
                needed: quantity,
                held,
            });
        }

        let remaining = held - quantity;
        if remaining == 0 {
            self.items.remove(item);
        } else {
            self.items.insert(item.clone(), remaining);
        }
        self.current_total -= quantity;
        debug!(
            "[Inventory] Removed {} x {}. Remaining: {}. Occupied: {}/{}",
            quantity, item, remaining, self.current_total, self.capacity
        );
        self.notify_inventory_changed();
        Ok(())
    }

    pub fn set_capacity(&mut self, capacity: i32) {
        self.capacity = capacity;
        if self.current_total > capacity {
            warn!(
                "[Inventory] Capacity lowered to {} below current total {}; nothing evicted",
                capacity, self.current_total
            );
        }
        info!("[Inventory] Max inventory capacity updated to: {}", capacity);
        self.outbox.push(CafeEvent::CapacityChanged { capacity });
    }

    /// Replace the whole ledger with saved contents
    pub fn restore(&mut self, saved: BTreeMap<ItemId, i32>) {
        self.items.clear();
        self.current_total = 0;
        for (item, count) in saved {
            if item.is_null() || count <= 0 {
                warn!("[Inventory] Dropping invalid saved entry {} = {}", item, count);
                continue;
            }
            match self.current_total.checked_add(count) {
                Some(total) => {
                    self.current_total = total;
                    self.items.insert(item, count);
                }
                None => warn!("[Inventory] Dropping saved entry {} = {}: total would overflow", item, count),
            }
        }
        info!("[Inventory] Inventory loaded: {} items, {}/{}", self.items.len(), self.current_total, self.capacity);
        self.notify_inventory_changed();
        self.outbox.push(CafeEvent::CapacityChanged { capacity: self.capacity });
    }

    pub fn drain_events(&mut self) -> Vec<CafeEvent> {
        self.outbox.drain()
    }

    fn notify_inventory_changed(&mut self) {
        self.outbox.push(CafeEvent::InventoryChanged {
            current_total: self.current_total,
            capacity: self.capacity,
        });
    }
}
