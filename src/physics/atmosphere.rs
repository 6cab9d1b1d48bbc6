use std::str::FromStr;

use crate::dynamics::state::RHO0;
use crate::error::{check_non_negative, check_positive, ConfigError};

pub const DEFAULT_LAPSE: f64 = 2.3e-5; // 1/m
pub const DEFAULT_SCALE_HEIGHT: f64 = 8_500.0; // m

// ---------------------------------------------------------------------------
// Air density models
// ---------------------------------------------------------------------------

/// Altitude -> density model, resolved once from configuration.
///
/// Every variant returns a non-negative density for any altitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Atmosphere {
    /// Same density at every altitude.
    Constant { rho0: f64 },
    /// `rho0 * (1 - lapse * h)`, clamped at zero.
    IsaLinear { rho0: f64, lapse: f64 },
    /// `rho0 * exp(-h / scale_height)`.
    Exponential { rho0: f64, scale_height: f64 },
}

/// Model selector as it appears in parameter files and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtmosphereKind {
    Constant,
    IsaLinear,
    Exponential,
}

impl FromStr for AtmosphereKind {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "constant" => Ok(AtmosphereKind::Constant),
            "isa_linear" => Ok(AtmosphereKind::IsaLinear),
            "exponential" | "exp" => Ok(AtmosphereKind::Exponential),
            other => Err(ConfigError::UnknownAtmosphere(other.to_string())),
        }
    }
}

impl Atmosphere {
    /// Build a model by name. `lapse` is ignored by the constant and
    /// exponential variants, `scale_height` by all but the exponential one.
    pub fn from_name(
        name: &str,
        rho0: f64,
        lapse: f64,
        scale_height: f64,
    ) -> Result<Self, ConfigError> {
        let model = match name.parse::<AtmosphereKind>()? {
            AtmosphereKind::Constant => Atmosphere::Constant { rho0 },
            AtmosphereKind::IsaLinear => Atmosphere::IsaLinear { rho0, lapse },
            AtmosphereKind::Exponential => Atmosphere::Exponential { rho0, scale_height },
        };
        model.validated()
    }

    pub fn validated(self) -> Result<Self, ConfigError> {
        match self {
            Atmosphere::Constant { rho0 } => {
                check_non_negative("reference density", rho0)?;
            }
            Atmosphere::IsaLinear { rho0, lapse } => {
                check_non_negative("reference density", rho0)?;
                check_non_negative("lapse rate", lapse)?;
            }
            Atmosphere::Exponential { rho0, scale_height } => {
                check_non_negative("reference density", rho0)?;
                check_positive("scale height", scale_height)?;
            }
        }
        Ok(self)
    }

    pub fn kind(&self) -> AtmosphereKind {
        match self {
            Atmosphere::Constant { .. } => AtmosphereKind::Constant,
            Atmosphere::IsaLinear { .. } => AtmosphereKind::IsaLinear,
            Atmosphere::Exponential { .. } => AtmosphereKind::Exponential,
        }
    }

    /// Air density (kg/m^3) at `altitude_m`.
    #[inline]
    pub fn density(&self, altitude_m: f64) -> f64 {
        match *self {
            Atmosphere::Constant { rho0 } => rho0,
            Atmosphere::IsaLinear { rho0, lapse } => (rho0 * (1.0 - lapse * altitude_m)).max(0.0),
            Atmosphere::Exponential { rho0, scale_height } => {
                rho0 * (-altitude_m / scale_height).exp()
            }
        }
    }
}

impl Default for Atmosphere {
    fn default() -> Self {
        Atmosphere::IsaLinear {
            rho0: RHO0,
            lapse: DEFAULT_LAPSE,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn all_models() -> [Atmosphere; 3] {
        [
            Atmosphere::Constant { rho0: RHO0 },
            Atmosphere::IsaLinear { rho0: RHO0, lapse: DEFAULT_LAPSE },
            Atmosphere::Exponential { rho0: RHO0, scale_height: DEFAULT_SCALE_HEIGHT },
        ]
    }

    #[test]
    fn density_never_negative() {
        for model in all_models() {
            let mut h = 0.0;
            while h <= 200_000.0 {
                assert!(model.density(h) >= 0.0, "{:?} negative at {} m", model, h);
                h += 250.0;
            }
        }
    }

    #[test]
    fn isa_linear_clamps_to_zero() {
        let model = Atmosphere::IsaLinear { rho0: RHO0, lapse: DEFAULT_LAPSE };
        let h_zero = 1.0 / DEFAULT_LAPSE;
        assert_eq!(model.density(h_zero * (1.0 + 1e-9)), 0.0);
        assert_eq!(model.density(50_000.0), 0.0);
        assert!(model.density(h_zero * 0.99) > 0.0);
    }

    #[test]
    fn sea_level_matches_reference() {
        for model in all_models() {
            assert_relative_eq!(model.density(0.0), RHO0);
        }
    }

    #[test]
    fn exponential_drops_by_e_per_scale_height() {
        let model = Atmosphere::Exponential { rho0: RHO0, scale_height: 8_500.0 };
        assert_relative_eq!(model.density(8_500.0), RHO0 / std::f64::consts::E, epsilon = 1e-12);
    }

    #[test]
    fn constant_ignores_altitude() {
        let model = Atmosphere::Constant { rho0: 0.9 };
        assert_eq!(model.density(-100.0), 0.9);
        assert_eq!(model.density(30_000.0), 0.9);
    }

    #[test]
    fn selection_by_name() {
        let m = Atmosphere::from_name("exp", RHO0, 0.0, 7_000.0).unwrap();
        assert_eq!(m.kind(), AtmosphereKind::Exponential);
        let m = Atmosphere::from_name("isa_linear", RHO0, 1e-5, 0.0).unwrap();
        assert_eq!(m, Atmosphere::IsaLinear { rho0: RHO0, lapse: 1e-5 });
    }

    #[test]
    fn unknown_name_is_config_error() {
        let err = Atmosphere::from_name("standard", RHO0, 0.0, 8_500.0).unwrap_err();
        assert_eq!(err, ConfigError::UnknownAtmosphere("standard".into()));
    }

    #[test]
    fn exponential_needs_positive_scale_height() {
        let err = Atmosphere::from_name("exponential", RHO0, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, ConfigError::NonPositive { name: "scale height", .. }));
    }
}
