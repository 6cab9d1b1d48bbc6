pub mod config;
pub mod params;

pub use config::{presets, FlightConfig, FlightConfigBuilder};
pub use params::{ParamsError, VehicleParams};
