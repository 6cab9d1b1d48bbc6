pub mod csv;
pub mod json;
#[cfg(feature = "plots")]
pub mod plot;

pub use json::FlightSummary;
