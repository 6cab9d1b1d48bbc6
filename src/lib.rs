//! Planar point-mass flight path simulation.
//!
//! A vehicle flies in the vertical plane under gravity, aerodynamic lift and
//! drag and an optional fixed-direction thrust. Runs end at a time horizon or
//! when the vehicle falls through the floor altitude.

pub mod error;
pub mod physics;
pub mod dynamics;
pub mod vehicle;
pub mod sim;
pub mod io;
pub mod cli;

pub use error::{ConfigError, SimError};

// Flat re-exports for the common entry points
pub mod types {
    pub use crate::dynamics::state::{Deriv, State, G0, RHO0};
    pub use crate::sim::runner::{Method, SimConfig, SimResult, Termination, Trajectory};
    pub use crate::vehicle::{FlightConfig, VehicleParams};
}

pub mod integrator {
    pub use crate::sim::runner::{integrate_adaptive, integrate_fixed_step, simulate, simulate_with};
    pub use crate::sim::integrator::rk4_step;
}
