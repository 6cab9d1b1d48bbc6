use std::fmt;

use crate::dynamics::state::State;
use crate::vehicle::FlightConfig;

// ---------------------------------------------------------------------------
// Simulation events
// ---------------------------------------------------------------------------

/// Which zero crossings of an event function count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Negative to non-negative.
    Increasing,
    /// Positive to non-positive.
    Decreasing,
    Either,
}

impl Direction {
    /// True if moving from `prev` to `next` crosses zero in this direction.
    pub fn crossed(self, prev: f64, next: f64) -> bool {
        let up = prev < 0.0 && next >= 0.0;
        let down = prev > 0.0 && next <= 0.0;
        match self {
            Direction::Increasing => up,
            Direction::Decreasing => down,
            Direction::Either => up || down,
        }
    }

    /// Sample-resolution check used by the fixed-step engine: has the value
    /// reached the far side of zero, given its value on the first sample?
    pub fn reached(self, value: f64, initial: f64) -> bool {
        match self {
            Direction::Increasing => value >= 0.0,
            Direction::Decreasing => value <= 0.0,
            Direction::Either => value == 0.0 || value.signum() != initial.signum(),
        }
    }
}

type EventFn = dyn Fn(f64, &State, &FlightConfig) -> f64 + Send + Sync;

/// A scalar function of state whose zero crossing is an event.
pub struct Event {
    pub name: String,
    predicate: Box<EventFn>,
    /// Stop the run at the crossing.
    pub terminal: bool,
    pub direction: Direction,
}

impl Event {
    pub fn new<F>(name: impl Into<String>, predicate: F, terminal: bool, direction: Direction) -> Self
    where
        F: Fn(f64, &State, &FlightConfig) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Box::new(predicate),
            terminal,
            direction,
        }
    }

    /// Vehicle falling through the floor altitude. Terminal, decreasing.
    pub fn ground_contact() -> Self {
        Self::new("ground contact", ground_distance, true, Direction::Decreasing)
    }

    /// Altitude passing `altitude` in `direction`. Non-terminal.
    pub fn altitude_crossing(altitude: f64, direction: Direction) -> Self {
        Self::new(
            format!("altitude {:.0} m", altitude),
            move |_, s: &State, _: &FlightConfig| s.altitude() - altitude,
            false,
            direction,
        )
    }

    /// Top of climb: vertical velocity passing through zero from above. Non-terminal.
    pub fn apogee() -> Self {
        Self::new("apogee", |_, s: &State, _: &FlightConfig| s.vel.y, false, Direction::Decreasing)
    }

    pub fn value(&self, t: f64, state: &State, config: &FlightConfig) -> f64 {
        (self.predicate)(t, state, config)
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("terminal", &self.terminal)
            .field("direction", &self.direction)
            .finish()
    }
}

/// Signed height above the floor.
pub fn ground_distance(_t: f64, state: &State, config: &FlightConfig) -> f64 {
    state.altitude() - config.floor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::presets;

    #[test]
    fn decreasing_ignores_rising_crossing() {
        let d = Direction::Decreasing;
        assert!(d.crossed(1.0, -0.5));
        assert!(d.crossed(1.0, 0.0));
        assert!(!d.crossed(-1.0, 0.5));
        assert!(!d.crossed(0.0, -1.0));
    }

    #[test]
    fn increasing_and_either() {
        assert!(Direction::Increasing.crossed(-1.0, 0.0));
        assert!(!Direction::Increasing.crossed(1.0, -1.0));
        assert!(Direction::Either.crossed(1.0, -1.0));
        assert!(Direction::Either.crossed(-1.0, 1.0));
        assert!(!Direction::Either.crossed(1.0, 2.0));
    }

    #[test]
    fn coarse_reached_check() {
        assert!(Direction::Decreasing.reached(0.0, 10.0));
        assert!(Direction::Decreasing.reached(-0.1, 10.0));
        assert!(!Direction::Decreasing.reached(0.1, 10.0));
        assert!(Direction::Either.reached(-2.0, 3.0));
        assert!(!Direction::Either.reached(2.0, 3.0));
    }

    #[test]
    fn ground_contact_measures_height_above_floor() {
        let mut config = presets::baseline();
        config.floor = 5.0;
        let ev = Event::ground_contact();
        assert!(ev.terminal);
        assert_eq!(ev.direction, Direction::Decreasing);
        let s = State::new(0.0, 12.0, 10.0, -1.0);
        assert_eq!(ev.value(0.0, &s, &config), 7.0);
    }

    #[test]
    fn altitude_crossing_is_non_terminal() {
        let ev = Event::altitude_crossing(500.0, Direction::Increasing);
        assert!(!ev.terminal);
        let s = State::new(0.0, 450.0, 0.0, 0.0);
        assert_eq!(ev.value(0.0, &s, &presets::baseline()), -50.0);
        assert_eq!(ev.name, "altitude 500 m");
    }
}
