use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug)]
pub struct ScheduledEvent<T> {
    pub due_cycle: u64,
    pub sequence_num: u64,
    pub payload: T,
}

impl<T> PartialEq for ScheduledEvent<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due_cycle == other.due_cycle && self.sequence_num == other.sequence_num
    }
}

impl<T> Eq for ScheduledEvent<T> {}

impl<T> PartialOrd for ScheduledEvent<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for ScheduledEvent<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .due_cycle
            .cmp(&self.due_cycle)
            .then_with(|| other.sequence_num.cmp(&self.sequence_num))
    }
}

/// Timer queue ordered by due cycle, FIFO among timers due on the same cycle
pub struct EventScheduler<T> {
    event_queue: BinaryHeap<ScheduledEvent<T>>,
    sequence_counter: u64,
}

impl<T> EventScheduler<T> {
    pub fn new() -> Self {
        Self {
            event_queue: BinaryHeap::new(),
            sequence_counter: 0,
        }
    }

    /// Schedule a payload to fire on `due_cycle`
    pub fn schedule_at(&mut self, payload: T, due_cycle: u64) {
        self.event_queue.push(ScheduledEvent {
            due_cycle,
            sequence_num: self.sequence_counter,
            payload,
        });
        self.sequence_counter += 1;
    }

    /// Pop every payload due at or before `current_cycle`, in firing order
    pub fn pop_due(&mut self, current_cycle: u64) -> Vec<T> {
        let mut due = Vec::new();
        while self
            .event_queue
            .peek()
            .map_or(false, |next| next.due_cycle <= current_cycle)
        {
            if let Some(scheduled) = self.event_queue.pop() {
                due.push(scheduled.payload);
            }
        }
        due
    }
}

impl<T> Default for EventScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
