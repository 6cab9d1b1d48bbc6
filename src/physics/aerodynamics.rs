use std::str::FromStr;

use crate::error::{check_finite, check_non_negative, ConfigError};

// ---------------------------------------------------------------------------
// Lift / drag coefficient models
// ---------------------------------------------------------------------------

/// Coefficient model, resolved once from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AeroModel {
    /// Commanded coefficients, independent of the velocity direction.
    Fixed { cl: f64, cd: f64 },
    /// Linear lift curve with stall saturation and a parabolic drag polar.
    Polar(PolarCoefficients),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarCoefficients {
    pub cd0: f64,      // zero-lift drag
    pub k: f64,        // induced-drag factor
    pub cl_alpha: f64, // lift-curve slope, 1/rad
    pub alpha0: f64,   // zero-lift angle of attack, rad
    pub cl_max: f64,   // |CL| saturation
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AeroKind {
    Simple,
    Polar,
}

impl FromStr for AeroKind {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "simple" => Ok(AeroKind::Simple),
            "polar" => Ok(AeroKind::Polar),
            other => Err(ConfigError::UnknownAeroModel(other.to_string())),
        }
    }
}

/// Lift and drag coefficients at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AeroCoefficients {
    pub cl: f64,
    pub cd: f64,
}

impl PolarCoefficients {
    pub fn validated(self) -> Result<Self, ConfigError> {
        check_finite("CD0", self.cd0)?;
        check_finite("induced-drag factor", self.k)?;
        check_finite("lift-curve slope", self.cl_alpha)?;
        check_finite("zero-lift angle", self.alpha0)?;
        check_non_negative("CL_max", self.cl_max)?;
        Ok(self)
    }

    /// Saturated linear lift: `cl_alpha * (alpha - alpha0)` clamped to
    /// `[-cl_max, cl_max]`.
    #[inline]
    pub fn lift(&self, alpha: f64) -> f64 {
        (self.cl_alpha * (alpha - self.alpha0)).clamp(-self.cl_max, self.cl_max)
    }

    /// Parabolic polar: `cd0 + k * cl^2`.
    #[inline]
    pub fn drag(&self, cl: f64) -> f64 {
        self.cd0 + self.k * cl * cl
    }
}

impl AeroModel {
    pub fn kind(&self) -> AeroKind {
        match self {
            AeroModel::Fixed { .. } => AeroKind::Simple,
            AeroModel::Polar(_) => AeroKind::Polar,
        }
    }

    /// Coefficients for a given pitch attitude and flight-path angle (rad).
    ///
    /// Angle of attack is `pitch - gamma`; the fixed model ignores both.
    #[inline]
    pub fn coefficients(&self, pitch: f64, gamma: f64) -> AeroCoefficients {
        match self {
            AeroModel::Fixed { cl, cd } => AeroCoefficients { cl: *cl, cd: *cd },
            AeroModel::Polar(p) => {
                let cl = p.lift(pitch - gamma);
                AeroCoefficients { cl, cd: p.drag(cl) }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
