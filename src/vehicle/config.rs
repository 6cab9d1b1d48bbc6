use crate::dynamics::state::G0;
use crate::error::{check_finite, check_non_negative, check_positive, ConfigError};
use crate::physics::{AeroModel, Atmosphere, PolarCoefficients};

// ---------------------------------------------------------------------------
// Flight configuration: airframe, propulsion, attitude and environment
// ---------------------------------------------------------------------------

/// Validated, read-only input to every derivative evaluation.
/// Angles are radians.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightConfig {
    pub mass: f64,         // kg
    pub area: f64,         // reference area, m^2
    pub gravity: f64,      // m/s^2
    pub thrust: f64,       // N
    pub thrust_angle: f64, // thrust line above horizontal, rad
    pub pitch: f64,        // body pitch attitude, rad
    pub aero: AeroModel,
    pub atmosphere: Atmosphere,
    pub floor: f64,        // ground altitude, m
}

impl FlightConfig {
    /// Check the physical invariants. Every constructor in this crate goes
    /// through here; call it again after mutating fields by hand.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("mass", self.mass)?;
        check_positive("reference area", self.area)?;
        check_non_negative("gravity", self.gravity)?;
        check_non_negative("thrust", self.thrust)?;
        check_finite("thrust angle", self.thrust_angle)?;
        check_finite("pitch", self.pitch)?;
        check_finite("floor altitude", self.floor)?;
        match self.aero {
            AeroModel::Fixed { cl, cd } => {
                check_finite("CL", cl)?;
                check_finite("CD", cd)?;
            }
            AeroModel::Polar(p) => {
                p.validated()?;
            }
        }
        self.atmosphere.validated()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Flight configuration builder
// ---------------------------------------------------------------------------

pub struct FlightConfigBuilder {
    mass: f64,
    area: f64,
    gravity: f64,
    thrust: f64,
    thrust_angle: f64,
    pitch: f64,
    aero: AeroModel,
    atmosphere: Atmosphere,
    floor: f64,
}

impl Default for FlightConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FlightConfigBuilder {
    pub fn new() -> Self {
        Self {
            mass: 1_200.0,
            area: 16.2,
            gravity: G0,
            thrust: 0.0,
            thrust_angle: 0.0,
            pitch: 15f64.to_radians(),
            aero: AeroModel::Polar(PolarCoefficients {
                cd0: 0.02,
                k: 0.045,
                cl_alpha: 5.5,
                alpha0: 2f64.to_radians(),
                cl_max: 1.8,
            }),
            atmosphere: Atmosphere::default(),
            floor: 0.0,
        }
    }

    pub fn mass(mut self, v: f64) -> Self { self.mass = v; self }
    pub fn area(mut self, v: f64) -> Self { self.area = v; self }
    pub fn gravity(mut self, v: f64) -> Self { self.gravity = v; self }
    pub fn thrust(mut self, v: f64) -> Self { self.thrust = v; self }
    pub fn thrust_angle_deg(mut self, v: f64) -> Self { self.thrust_angle = v.to_radians(); self }
    pub fn pitch_deg(mut self, v: f64) -> Self { self.pitch = v.to_radians(); self }
    pub fn aero(mut self, v: AeroModel) -> Self { self.aero = v; self }
    pub fn atmosphere(mut self, v: Atmosphere) -> Self { self.atmosphere = v; self }
    pub fn floor(mut self, v: f64) -> Self { self.floor = v; self }

    pub fn build(self) -> Result<FlightConfig, ConfigError> {
        let config = FlightConfig {
            mass: self.mass,
            area: self.area,
            gravity: self.gravity,
            thrust: self.thrust,
            thrust_angle: self.thrust_angle,
            pitch: self.pitch,
            aero: self.aero,
            atmosphere: self.atmosphere,
            floor: self.floor,
        };
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Preset configurations
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// Light single-engine airframe gliding through a linear-lapse atmosphere.
    pub fn baseline() -> FlightConfig {
        FlightConfig {
            mass: 1_200.0,
            area: 16.2,
            gravity: G0,
            thrust: 0.0,
            thrust_angle: 0.0,
            pitch: 15f64.to_radians(),
            aero: AeroModel::Polar(PolarCoefficients {
                cd0: 0.02,
                k: 0.045,
                cl_alpha: 5.5,
                alpha0: 2f64.to_radians(),
                cl_max: 1.8,
            }),
            atmosphere: Atmosphere::default(),
            floor: 0.0,
        }
    }

    /// Same airframe flying commanded coefficients.
    pub fn baseline_simple() -> FlightConfig {
        FlightConfig {
            aero: AeroModel::Fixed { cl: 0.4, cd: 0.02 },
            ..baseline()
        }
    }
}
