use super::event::{Event, EventKind};
use std::collections::{HashMap, HashSet};

pub type SubscriptionId = usize;

/// Presentation-side listener for cafe events
pub trait CafeObserver {
    /// Called for every published event matching the observer's subscription
    fn on_event(&mut self, event: &Event);

    /// Called once per simulation cycle after all events were published
    fn on_step_complete(&mut self, _cycle: u64, _events_published: usize) {}
}

pub struct EventBus {
    observers: HashMap<SubscriptionId, Box<dyn CafeObserver>>,
    subscriptions: HashMap<EventKind, HashSet<SubscriptionId>>,
    /// Observers that receive every kind
    wildcard: HashSet<SubscriptionId>,
    next_subscription: SubscriptionId,
    next_event_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            observers: HashMap::new(),
            subscriptions: HashMap::new(),
            wildcard: HashSet::new(),
            next_subscription: 0,
            next_event_id: 0,
        }
    }

    /// Register an observer for the given event kinds, or for all kinds when `kinds` is empty
    pub fn subscribe(&mut self, kinds: &[EventKind], observer: Box<dyn CafeObserver>) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;

        if kinds.is_empty() {
            self.wildcard.insert(id);
        } else {
            for kind in kinds {
                self.subscriptions
                    .entry(*kind)
                    .or_insert_with(HashSet::new)
                    .insert(id);
            }
        }

        self.observers.insert(id, observer);
        id
    }

    /// Remove an observer; returns it so callers can inspect what it collected
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> Option<Box<dyn CafeObserver>> {
        self.wildcard.remove(&id);
        for subscribers in self.subscriptions.values_mut() {
            subscribers.remove(&id);
        }
        self.observers.remove(&id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Subscribers that should receive an event of this kind, in subscription order
    pub fn route_event(&self, kind: EventKind) -> Vec<SubscriptionId> {
        let mut targets: Vec<SubscriptionId> = self.wildcard.iter().copied().collect();
        if let Some(subscribers) = self.subscriptions.get(&kind) {
            targets.extend(subscribers.iter().copied());
        }
        targets.sort_unstable();
        targets.dedup();
        targets
    }

    /// Stamp and deliver a batch of payloads; returns the number published
    pub fn publish_all(&mut self, cycle: u64, payloads: Vec<super::event::CafeEvent>) -> usize {
        let count = payloads.len();
        for payload in payloads {
            let event = Event::new(self.next_event_id, cycle, payload);
            self.next_event_id += 1;
            self.dispatch(&event);
        }
        count
    }

    fn dispatch(&mut self, event: &Event) {
        for target in self.route_event(event.kind()) {
            if let Some(observer) = self.observers.get_mut(&target) {
                observer.on_event(event);
            }
        }
    }

    pub fn notify_step_complete(&mut self, cycle: u64, events_published: usize) {
        for observer in self.observers.values_mut() {
            observer.on_step_complete(cycle, events_published);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
