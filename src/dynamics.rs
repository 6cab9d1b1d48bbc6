pub mod state;
pub mod pointmass;

pub use pointmass::{aero_state, derivatives, AeroState};
pub use state::{Deriv, State};
