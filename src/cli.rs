use std::path::PathBuf;

use clap::Args;

use crate::dynamics::State;
use crate::sim::SimConfig;
use crate::vehicle::{ParamsError, VehicleParams};

/// Flight and solver options shared by the front ends.
#[derive(Args, Debug, Clone)]
pub struct FlightArgs {
    /// Time horizon, s
    #[arg(long, default_value_t = 60.0)]
    pub t_max: f64,

    /// Initial airspeed, m/s
    #[arg(long, default_value_t = 70.0)]
    pub speed0: f64,

    /// Initial flight-path angle, deg
    #[arg(long, default_value_t = 10.0)]
    pub gamma0_deg: f64,

    /// Initial altitude, m
    #[arg(long, default_value_t = 10.0)]
    pub y0: f64,

    /// Aerodynamic model: simple | polar
    #[arg(long)]
    pub model: Option<String>,

    /// Body pitch attitude, deg
    #[arg(long)]
    pub pitch_deg: Option<f64>,

    /// Thrust magnitude, N
    #[arg(long)]
    pub thrust: Option<f64>,

    /// Thrust line above horizontal, deg
    #[arg(long)]
    pub thrust_theta_deg: Option<f64>,

    /// Atmosphere: constant | isa_linear | exponential
    #[arg(long)]
    pub atmosphere: Option<String>,

    /// Fixed step for live runs, s
    #[arg(long, default_value_t = 0.02)]
    pub dt: f64,

    /// JSON parameter file; flags given on the command line override it
    #[arg(long)]
    pub params: Option<PathBuf>,
}

impl FlightArgs {
    /// Parameter file (or baseline defaults) with command-line overrides applied.
    pub fn vehicle_params(&self) -> Result<VehicleParams, ParamsError> {
        let mut params = match &self.params {
            Some(path) => VehicleParams::from_json_file(path)?,
            None => VehicleParams::default(),
        };
        if let Some(model) = &self.model {
            params.aero_model = model.clone();
        }
        if let Some(pitch) = self.pitch_deg {
            params.pitch_deg = pitch;
        }
        if let Some(thrust) = self.thrust {
            params.thrust = thrust;
        }
        if let Some(theta) = self.thrust_theta_deg {
            params.thrust_angle_deg = theta;
        }
        if let Some(atmosphere) = &self.atmosphere {
            params.atmosphere = atmosphere.clone();
        }
        Ok(params)
    }

    pub fn initial_state(&self) -> State {
        State::from_speed_gamma(0.0, self.y0, self.speed0, self.gamma0_deg.to_radians())
    }

    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            t_max: self.t_max,
            dt: self.dt,
            ..SimConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cmd {
        #[command(flatten)]
        flight: FlightArgs,
    }

    fn parse(args: &[&str]) -> FlightArgs {
        Cmd::parse_from(std::iter::once("glide").chain(args.iter().copied())).flight
    }

    #[test]
    fn defaults_fly_the_baseline() {
        let args = parse(&[]);
        assert_eq!(args.vehicle_params().unwrap(), VehicleParams::default());
        assert_eq!(args.sim_config(), SimConfig::default());
        let s0 = args.initial_state();
        assert!((s0.speed() - 70.0).abs() < 1e-12);
        assert_eq!(s0.altitude(), 10.0);
    }

    #[test]
    fn flags_override_the_parameter_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.json");
        std::fs::write(&path, r#"{ "mass": 900.0, "pitch_deg": 5.0, "atmosphere": "constant" }"#).unwrap();

        let args = parse(&["--params", path.to_str().unwrap(), "--pitch-deg", "12", "--model", "simple"]);
        let p = args.vehicle_params().unwrap();
        assert_eq!(p.mass, 900.0);
        assert_eq!(p.pitch_deg, 12.0);
        assert_eq!(p.aero_model, "simple");
        assert_eq!(p.atmosphere, "constant");
    }

    #[test]
    fn solver_flags_reach_the_config() {
        let args = parse(&["--t-max", "120", "--dt", "0.01", "--gamma0-deg=-3"]);
        let sim = args.sim_config();
        assert_eq!(sim.t_max, 120.0);
        assert_eq!(sim.dt, 0.01);
        assert!(args.initial_state().vel.y < 0.0);
    }
}
