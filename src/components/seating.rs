use crate::core::event::{CafeEvent, Outbox};
use crate::core::types::{Position, SeatId};
use log::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct Seat {
    pub id: SeatId,
    pub position: Position,
    pub occupied: bool,
}

/// Fixed set of seats handed out first-fit in registration order
#[derive(Debug, Clone, Default)]
pub struct SeatingRegistry {
    seats: Vec<Seat>,
    outbox: Outbox,
}

impl SeatingRegistry {
    pub fn new(positions: impl IntoIterator<Item = Position>) -> Self {
        let seats: Vec<Seat> = positions
            .into_iter()
            .enumerate()
            .map(|(index, position)| Seat {
                id: SeatId(index),
                position,
                occupied: false,
            })
            .collect();
        if seats.is_empty() {
            warn!("[Seating] No seat points registered");
        } else {
            info!("[Seating] Found {} seat points", seats.len());
        }
        Self {
            seats,
            outbox: Outbox::new(),
        }
    }

    /// Mark and return the first free seat, or `None` when every seat is taken
    pub fn acquire_seat(&mut self) -> Option<SeatId> {
        match self.seats.iter_mut().find(|seat| !seat.occupied) {
            Some(seat) => {
                seat.occupied = true;
                let id = seat.id;
                debug!("[Seating] Assigned {}", id);
                self.outbox.push(CafeEvent::SeatOccupancyChanged { seat: id, occupied: true });
                Some(id)
            }
            None => {
                debug!("[Seating] No free table seats available");
                None
            }
        }
    }

    /// Free a seat; releasing a seat that is already free does nothing
    pub fn release_seat(&mut self, seat: SeatId) {
        match self.seats.get_mut(seat.0) {
            Some(entry) if entry.occupied => {
                entry.occupied = false;
                debug!("[Seating] Released {}", seat);
                self.outbox.push(CafeEvent::SeatOccupancyChanged { seat, occupied: false });
            }
            Some(_) => {}
            None => warn!("[Seating] Attempted to release unknown {}", seat),
        }
    }

    pub fn has_free_seat(&self) -> bool {
        self.seats.iter().any(|seat| !seat.occupied)
    }

    pub fn is_occupied(&self, seat: SeatId) -> bool {
        self.seats.get(seat.0).map_or(false, |entry| entry.occupied)
    }

    pub fn seat_position(&self, seat: SeatId) -> Option<Position> {
        self.seats.get(seat.0).map(|entry| entry.position)
    }

    pub fn occupied_count(&self) -> usize {
        self.seats.iter().filter(|seat| seat.occupied).count()
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn drain_events(&mut self) -> Vec<CafeEvent> {
        self.outbox.drain()
    }
}
