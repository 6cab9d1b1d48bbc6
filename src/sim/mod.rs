pub mod integrator;
pub mod runner;
pub mod event;
pub mod observer;

pub use runner::{
    integrate_adaptive, integrate_fixed_step, simulate, simulate_with, Method, SimConfig, SimResult,
    Termination, Trajectory,
};
pub use integrator::{rk4_step, Stats};
pub use event::{Direction, Event};
pub use observer::{NoopObserver, Observer, ProgressLogger};
