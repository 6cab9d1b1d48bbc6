use nalgebra::Vector2;

use crate::dynamics::state::{Deriv, State, SPEED_EPS};
use crate::physics::forces::resolve_forces;
use crate::vehicle::FlightConfig;

// ---------------------------------------------------------------------------
// Planar point-mass equations of motion
// ---------------------------------------------------------------------------

/// Instantaneous aerodynamic quantities behind one derivative evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AeroState {
    pub density: f64,       // kg/m^3
    pub dyn_pressure: f64,  // Pa
    pub gamma: f64,         // flight-path angle, rad
    pub alpha: f64,         // angle of attack, rad
    pub cl: f64,
    pub cd: f64,
    pub lift: f64,          // N
    pub drag: f64,          // N
}

impl AeroState {
    pub fn lift_to_drag(&self) -> f64 {
        self.lift / self.drag.max(1e-12)
    }
}

/// Density, dynamic pressure, coefficients and force magnitudes at `state`.
#[inline]
pub fn aero_state(state: &State, config: &FlightConfig) -> AeroState {
    let speed = state.speed() + SPEED_EPS;
    let density = config.atmosphere.density(state.altitude());
    let dyn_pressure = 0.5 * density * speed * speed;

    let gamma = state.flight_path_angle();
    let coeffs = config.aero.coefficients(config.pitch, gamma);

    AeroState {
        density,
        dyn_pressure,
        gamma,
        alpha: config.pitch - gamma,
        cl: coeffs.cl,
        cd: coeffs.cd,
        lift: dyn_pressure * coeffs.cl * config.area,
        drag: dyn_pressure * coeffs.cd * config.area,
    }
}

/// Compute state derivatives for a given state and configuration.
///
/// Forces modeled:
///   1. Gravity - constant, straight down
///   2. Lift    - perpendicular to velocity
///   3. Drag    - opposing velocity
///   4. Thrust  - constant magnitude along the thrust line
///
/// `_t` is unused; the system is autonomous.
#[inline]
pub fn derivatives(_t: f64, state: &State, config: &FlightConfig) -> Deriv {
    let aero = aero_state(state, config);
    let force = resolve_forces(&state.vel, aero.lift, aero.drag, config.thrust, config.thrust_angle);

    Deriv {
        dpos: state.vel,
        dvel: force / config.mass - Vector2::new(0.0, config.gravity),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
