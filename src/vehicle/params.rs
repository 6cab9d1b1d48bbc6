use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dynamics::state::{G0, RHO0};
use crate::error::ConfigError;
use crate::physics::aerodynamics::{AeroKind, AeroModel, PolarCoefficients};
use crate::physics::atmosphere::{Atmosphere, DEFAULT_LAPSE, DEFAULT_SCALE_HEIGHT};

use super::config::FlightConfig;

/// Boundary form of the flight configuration: flat, serde-friendly, angles in
/// degrees and models selected by name. Missing fields take baseline values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VehicleParams {
    pub mass: f64,
    pub area: f64,
    pub gravity: f64,
    pub thrust: f64,
    pub thrust_angle_deg: f64,
    pub pitch_deg: f64,
    pub aero_model: String,
    pub cd0: f64,
    pub k: f64,
    pub cl_cmd: f64,
    pub cl_alpha: f64,
    pub alpha0_deg: f64,
    pub cl_max: f64,
    pub atmosphere: String,
    pub rho0: f64,
    pub lapse: f64,
    pub scale_height: f64,
    pub floor: f64,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            mass: 1_200.0,
            area: 16.2,
            gravity: G0,
            thrust: 0.0,
            thrust_angle_deg: 0.0,
            pitch_deg: 15.0,
            aero_model: "polar".into(),
            cd0: 0.02,
            k: 0.045,
            cl_cmd: 0.4,
            cl_alpha: 5.5,
            alpha0_deg: 2.0,
            cl_max: 1.8,
            atmosphere: "isa_linear".into(),
            rho0: RHO0,
            lapse: DEFAULT_LAPSE,
            scale_height: DEFAULT_SCALE_HEIGHT,
            floor: 0.0,
        }
    }
}

/// Failure loading a parameter file.
#[derive(Debug, thiserror::Error)]
pub enum ParamsError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed parameter file: {0}")]
    Json(#[from] serde_json::Error),
}

impl VehicleParams {
    pub fn from_json_str(text: &str) -> Result<Self, ParamsError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ParamsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Resolve model names and convert to the validated internal form.
    pub fn build(&self) -> Result<FlightConfig, ConfigError> {
        let aero = match self.aero_model.parse::<AeroKind>()? {
            // Commanded lift with zero-lift drag only.
            AeroKind::Simple => AeroModel::Fixed { cl: self.cl_cmd, cd: self.cd0 },
            AeroKind::Polar => AeroModel::Polar(PolarCoefficients {
                cd0: self.cd0,
                k: self.k,
                cl_alpha: self.cl_alpha,
                alpha0: self.alpha0_deg.to_radians(),
                cl_max: self.cl_max,
            }),
        };
        let atmosphere = Atmosphere::from_name(&self.atmosphere, self.rho0, self.lapse, self.scale_height)?;

        let config = FlightConfig {
            mass: self.mass,
            area: self.area,
            gravity: self.gravity,
            thrust: self.thrust,
            thrust_angle: self.thrust_angle_deg.to_radians(),
            pitch: self.pitch_deg.to_radians(),
            aero,
            atmosphere,
            floor: self.floor,
        };
        config.validate()?;
        Ok(config)
    }
}
