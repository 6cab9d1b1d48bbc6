pub mod atmosphere;
pub mod aerodynamics;
pub mod forces;

pub use atmosphere::{Atmosphere, AtmosphereKind};
pub use aerodynamics::{AeroCoefficients, AeroKind, AeroModel, PolarCoefficients};
pub use forces::resolve_forces;
