use thiserror::Error;

use crate::sim::runner::Trajectory;

/// Invalid configuration, detected before any integration step is taken.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown atmosphere model '{0}' (expected constant, isa_linear or exponential)")]
    UnknownAtmosphere(String),

    #[error("unknown aerodynamic model '{0}' (expected simple or polar)")]
    UnknownAeroModel(String),

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },
}

/// Failure of a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Derivative or state went non-finite. `partial` holds every sample
    /// accepted before the breakdown.
    #[error("non-finite state or derivative at t={time:.6} s")]
    NonFinite { time: f64, partial: Trajectory },

    #[error("step size {h:e} fell below the minimum at t={time:.6} s")]
    StepSizeTooSmall { time: f64, h: f64 },

    #[error("exceeded {0} integration steps")]
    MaxStepsExceeded(u64),
}

impl SimError {
    /// Samples accepted before the failure, if the run got that far.
    pub fn partial_trajectory(&self) -> Option<&Trajectory> {
        match self {
            SimError::NonFinite { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    let value = check_finite(name, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

pub(crate) fn check_non_negative(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    let value = check_finite(name, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

pub(crate) fn check_finite(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { name, value })
    }
}
