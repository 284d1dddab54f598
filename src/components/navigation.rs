use crate::core::types::Position;

/// Move-to-and-arrive capability used by the worker and customers.
///
/// Implementations decide how an agent actually travels; actors only set a
/// destination and poll `has_arrived` once per cycle.
pub trait NavAgent {
    fn set_destination(&mut self, target: Position);

    /// True when there is no destination or the agent is within its stopping distance
    fn has_arrived(&self) -> bool;

    fn position(&self) -> Position;

    /// A disabled agent keeps its position and ignores `advance`
    fn set_enabled(&mut self, enabled: bool);

    fn is_enabled(&self) -> bool;

    /// Teleport to `position`, dropping any destination
    fn warp(&mut self, position: Position);

    /// Advance movement by `dt` seconds of simulated time
    fn advance(&mut self, dt: f64);
}

/// Straight-line agent moving at constant speed
#[derive(Debug, Clone)]
pub struct LinearAgent {
    position: Position,
    destination: Option<Position>,
    speed: f32,
    stopping_distance: f32,
    enabled: bool,
}

impl LinearAgent {
    pub fn new(position: Position, speed: f32, stopping_distance: f32) -> Self {
        Self {
            position,
            destination: None,
            speed,
            stopping_distance,
            enabled: true,
        }
    }

    pub fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }
}

impl NavAgent for LinearAgent {
    fn set_destination(&mut self, target: Position) {
        self.destination = Some(target);
    }

    fn has_arrived(&self) -> bool {
        match self.destination {
            Some(target) => self.position.distance(&target) <= self.stopping_distance,
            None => true,
        }
    }

    fn position(&self) -> Position {
        self.position
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn warp(&mut self, position: Position) {
        self.position = position;
        self.destination = None;
    }

    fn advance(&mut self, dt: f64) {
        if !self.enabled || self.has_arrived() {
            return;
        }
        if let Some(target) = self.destination {
            let step = self.speed * dt as f32;
            self.position = self.position.step_towards(&target, step);
        }
    }
}

/// Named points of the cafe floor plan
#[derive(Debug, Clone, Default)]
pub struct CafeLayout {
    pub entrance: Option<Position>,
    pub counter: Option<Position>,
    pub kitchen: Option<Position>,
    pub worker_idle: Option<Position>,
    pub exit: Option<Position>,
    pub seats: Vec<Position>,
}

impl CafeLayout {
    /// Small default floor plan with two tables of two seats each
    pub fn standard() -> Self {
        Self {
            entrance: Some(Position::new(0.0, 0.0, -10.0)),
            counter: Some(Position::new(0.0, 0.0, 0.0)),
            kitchen: Some(Position::new(0.0, 0.0, 3.0)),
            worker_idle: Some(Position::new(1.5, 0.0, 1.5)),
            exit: Some(Position::new(2.0, 0.0, -10.0)),
            seats: vec![
                Position::new(-4.0, 0.0, -3.0),
                Position::new(-3.0, 0.0, -3.0),
                Position::new(3.0, 0.0, -3.0),
                Position::new(4.0, 0.0, -3.0),
            ],
        }
    }

    pub fn with_seats(mut self, seats: Vec<Position>) -> Self {
        self.seats = seats;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_agent_reaches_target() {
        let mut agent = LinearAgent::new(Position::new(0.0, 0.0, 0.0), 2.0, 0.5);
        assert!(agent.has_arrived());

        agent.set_destination(Position::new(3.0, 0.0, 0.0));
        assert!(!agent.has_arrived());

        agent.advance(0.5);
        assert!((agent.position().x - 1.0).abs() < 1e-5);
        agent.advance(0.8);
        assert!(agent.has_arrived());
    }

    #[test]
    fn test_disabled_agent_does_not_move() {
        let mut agent = LinearAgent::new(Position::default(), 1.0, 0.1);
        agent.set_destination(Position::new(5.0, 0.0, 0.0));
        agent.set_enabled(false);
        agent.advance(1.0);
        assert_eq!(agent.position(), Position::default());

        agent.warp(Position::new(5.0, 0.0, 0.0));
        assert!(agent.has_arrived());
        agent.set_enabled(true);
        agent.advance(1.0);
        assert_eq!(agent.position(), Position::new(5.0, 0.0, 0.0));
    }
}
