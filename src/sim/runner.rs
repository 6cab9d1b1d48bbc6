use crate::dynamics;
use crate::dynamics::state::{Deriv, State};
use crate::error::{check_positive, ConfigError, SimError};
use crate::vehicle::FlightConfig;

use super::event::Event;
use super::integrator::{illinois, rk4_step, Dopri5, Hermite, Stats, Vec4};
use super::observer::{NoopObserver, Observer};

// ---------------------------------------------------------------------------
// Solver settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub t_max: f64,     // horizon, s
    pub dt: f64,        // fixed-step size, s
    pub rtol: f64,      // adaptive relative tolerance
    pub atol: f64,      // adaptive absolute tolerance
    pub max_step: f64,  // adaptive step ceiling, s
    pub max_steps: u64, // hard cap on attempted steps
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            t_max: 60.0,
            dt: 0.02,        // 50 Hz
            rtol: 1e-6,
            atol: 1e-9,
            max_step: 0.1,
            max_steps: 10_000_000,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("time horizon", self.t_max)?;
        check_positive("time step", self.dt)?;
        check_positive("relative tolerance", self.rtol)?;
        check_positive("absolute tolerance", self.atol)?;
        check_positive("maximum step", self.max_step)?;
        Ok(())
    }
}

/// Integration strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Dormand-Prince 5(4) with error control and event root location.
    Adaptive,
    /// Classical RK4 at `SimConfig::dt`, events checked at sample resolution.
    FixedStep,
}

// ---------------------------------------------------------------------------
// Trajectory and run outcome
// ---------------------------------------------------------------------------

/// Time-ordered samples of one run, starting at t = 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    times: Vec<f64>,
    states: Vec<State>,
}

impl Trajectory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            times: Vec::with_capacity(capacity),
            states: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, t: f64, state: State) {
        debug_assert!(self.times.last().map_or(true, |&last| t > last));
        self.times.push(t);
        self.states.push(state);
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &State)> + '_ {
        self.times.iter().copied().zip(self.states.iter())
    }

    pub fn first(&self) -> Option<(f64, &State)> {
        Some((*self.times.first()?, self.states.first()?))
    }

    pub fn last(&self) -> Option<(f64, &State)> {
        Some((*self.times.last()?, self.states.last()?))
    }
}

/// Why a run stopped. Both are successful outcomes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Termination {
    HorizonReached,
    /// A terminal event fired; `index` points into the event list.
    Event { index: usize, time: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimResult {
    pub trajectory: Trajectory,
    pub termination: Termination,
    /// Crossings of non-terminal events as `(event index, time)`.
    pub event_log: Vec<(usize, f64)>,
    pub stats: Stats,
}

impl SimResult {
    pub fn hit_event(&self) -> bool {
        matches!(self.termination, Termination::Event { .. })
    }
}

fn check_inputs(s0: &State, config: &FlightConfig, sim: &SimConfig) -> Result<(), ConfigError> {
    config.validate()?;
    sim.validate()?;
    if !s0.is_finite() {
        return Err(ConfigError::NonFinite {
            name: "initial state",
            value: s0.to_vector().iter().copied().find(|v| !v.is_finite()).unwrap_or(f64::NAN),
        });
    }
    Ok(())
}

fn non_finite(time: f64, partial: Trajectory) -> SimError {
    log::warn!("non-finite state at t={:.6} s after {} samples", time, partial.len());
    SimError::NonFinite { time, partial }
}

// ---------------------------------------------------------------------------
// Fixed-step RK4 with coarse termination
// ---------------------------------------------------------------------------

/// Integrate with classical RK4 at a fixed step.
///
/// Terminal events are checked on the pre-step state only: the run stops on
/// the first sample at or past the event's zero, without refining the
/// crossing inside the step. The last sample is therefore at most one step
/// beyond the true crossing.
pub fn integrate_fixed_step<F, O>(
    rhs: &F,
    s0: &State,
    config: &FlightConfig,
    sim: &SimConfig,
    events: &[Event],
    observer: &mut O,
) -> Result<SimResult, SimError>
where
    F: Fn(f64, &State, &FlightConfig) -> Deriv,
    O: Observer + ?Sized,
{
    check_inputs(s0, config, sim)?;

    let dt = sim.dt;
    let capacity = (sim.t_max / dt).ceil() as usize + 1;
    let mut trajectory = Trajectory::with_capacity(capacity.min(1_000_000));
    let mut stats = Stats::default();
    let mut event_log = Vec::new();

    let mut t = 0.0;
    let mut state = *s0;
    trajectory.push(t, state);

    let initial: Vec<f64> = events.iter().map(|e| e.value(t, &state, config)).collect();
    let mut prev = initial.clone();
    let mut n: u64 = 0;

    log::debug!("fixed-step run: dt={} s, horizon={} s, {} events", dt, sim.t_max, events.len());

    let termination = loop {
        if sim.t_max - t <= dt * 1e-9 {
            break Termination::HorizonReached;
        }

        if let Some(index) = events
            .iter()
            .enumerate()
            .position(|(i, e)| e.terminal && e.direction.reached(e.value(t, &state, config), initial[i]))
        {
            break Termination::Event { index, time: t };
        }

        if n >= sim.max_steps {
            return Err(SimError::MaxStepsExceeded(sim.max_steps));
        }

        state = match rk4_step(rhs, t, &state, config, dt) {
            Some(next) => next,
            None => return Err(non_finite(t + dt, trajectory)),
        };
        n += 1;
        t = n as f64 * dt;
        stats.fn_evals += 4;
        stats.accepted_steps += 1;

        for (i, e) in events.iter().enumerate().filter(|(_, e)| !e.terminal) {
            let g = e.value(t, &state, config);
            if e.direction.crossed(prev[i], g) {
                event_log.push((i, t));
            }
            prev[i] = g;
        }

        trajectory.push(t, state);
        observer.on_step(t, &state);
    };

    log::debug!("fixed-step run finished: {:?}, {} samples", termination, trajectory.len());

    Ok(SimResult { trajectory, termination, event_log, stats })
}

// ---------------------------------------------------------------------------
// Adaptive Dormand-Prince with event location
// ---------------------------------------------------------------------------

/// Smallest step the adaptive engine will attempt, relative to the current time.
const H_MIN_REL: f64 = 1e-12;

/// Integrate with an adaptive Dormand-Prince 5(4) pair.
///
/// A terminal event that changes sign in its required direction during an
/// accepted step is located on the step's cubic Hermite interpolant; the
/// trajectory ends with the interpolated sample at the crossing.
pub fn integrate_adaptive<F, O>(
    rhs: &F,
    s0: &State,
    config: &FlightConfig,
    sim: &SimConfig,
    events: &[Event],
    observer: &mut O,
) -> Result<SimResult, SimError>
where
    F: Fn(f64, &State, &FlightConfig) -> Deriv,
    O: Observer + ?Sized,
{
    check_inputs(s0, config, sim)?;

    let f = |t: f64, y: &Vec4| -> Vec4 { rhs(t, &State::from_vector(y), config).to_vector() };
    let finite = |v: &Vec4| v.iter().all(|x| x.is_finite());

    let mut solver = Dopri5::new(sim.rtol, sim.atol);
    let mut trajectory = Trajectory::with_capacity(((sim.t_max / sim.max_step) as usize + 1).min(1_000_000));
    let mut event_log = Vec::new();

    let mut t = 0.0;
    let mut y = s0.to_vector();
    let mut fy = f(t, &y);
    solver.stats.fn_evals += 1;
    trajectory.push(t, *s0);
    if !finite(&fy) {
        return Err(non_finite(t, trajectory));
    }

    let mut prev: Vec<f64> = events.iter().map(|e| e.value(t, s0, config)).collect();
    let mut h = solver.initial_step(&f, t, &y, &fy, sim.max_step.min(sim.t_max));
    let mut attempts: u64 = 0;
    let mut rejected_last = false;

    log::debug!(
        "adaptive run: rtol={:e} atol={:e} max_step={} s, horizon={} s, h0={:e} s",
        sim.rtol,
        sim.atol,
        sim.max_step,
        sim.t_max,
        h
    );

    let termination = loop {
        let remaining = sim.t_max - t;
        if remaining <= 0.0 {
            break Termination::HorizonReached;
        }

        let h_min = H_MIN_REL * t.abs().max(1.0);
        h = h.min(sim.max_step);
        // Stretch onto the horizon rather than leave a sliver below h_min.
        let last = h >= remaining || remaining - h < h_min;
        if last {
            h = remaining;
        }
        if h < h_min {
            return Err(SimError::StepSizeTooSmall { time: t, h });
        }

        attempts += 1;
        if attempts > sim.max_steps {
            return Err(SimError::MaxStepsExceeded(sim.max_steps));
        }

        let trial = solver.step(&f, t, &y, &fy, h);
        if !finite(&trial.y) || !finite(&trial.f) || trial.error.is_nan() {
            return Err(non_finite(t + h, trajectory));
        }

        if trial.error > 1.0 {
            solver.stats.rejected_steps += 1;
            h *= solver.controller.factor(trial.error).min(1.0);
            rejected_last = true;
            continue;
        }
        solver.stats.accepted_steps += 1;

        let t_new = if last { sim.t_max } else { t + h };
        let s_new = State::from_vector(&trial.y);
        let dense = Hermite { t0: t, t1: t_new, y0: y, y1: trial.y, f0: fy, f1: trial.f };

        // Earliest terminal crossing inside (t, t_new].
        let mut hit: Option<(usize, f64)> = None;
        for (i, e) in events.iter().enumerate() {
            let g_new = e.value(t_new, &s_new, config);
            if e.direction.crossed(prev[i], g_new) {
                let g = |tc: f64| e.value(tc, &State::from_vector(&dense.eval(tc)), config);
                let xtol = 4.0 * f64::EPSILON * t_new.abs().max(1.0);
                let t_root = illinois(g, t, prev[i], t_new, g_new, xtol).clamp(t, t_new);
                if e.terminal {
                    if hit.map_or(true, |(_, th)| t_root < th) {
                        hit = Some((i, t_root));
                    }
                } else {
                    event_log.push((i, t_root));
                }
            }
            prev[i] = g_new;
        }

        if let Some((index, t_hit)) = hit {
            // Non-terminal crossings after the terminal one never happened.
            event_log.retain(|&(_, te)| te <= t_hit);
            let t_hit = if t_hit > t { t_hit } else { t_new };
            let s_hit = if t_hit == t_new { s_new } else { State::from_vector(&dense.eval(t_hit)) };
            trajectory.push(t_hit, s_hit);
            observer.on_step(t_hit, &s_hit);
            break Termination::Event { index, time: t_hit };
        }

        trajectory.push(t_new, s_new);
        observer.on_step(t_new, &s_new);

        t = t_new;
        y = trial.y;
        fy = trial.f;

        let factor = solver.controller.factor(trial.error);
        h *= if rejected_last { factor.min(1.0) } else { factor };
        rejected_last = false;
    };

    event_log.sort_by(|a, b| a.1.total_cmp(&b.1));
    log::debug!(
        "adaptive run finished: {:?}, {} samples, {} accepted / {} rejected steps",
        termination,
        trajectory.len(),
        solver.stats.accepted_steps,
        solver.stats.rejected_steps
    );

    Ok(SimResult { trajectory, termination, event_log, stats: solver.stats })
}

// ---------------------------------------------------------------------------
// Convenience wrappers
// ---------------------------------------------------------------------------

/// Run the point-mass model with the ground-contact event and a custom observer.
pub fn simulate_with(
    config: &FlightConfig,
    s0: &State,
    sim: &SimConfig,
    method: Method,
    observer: &mut dyn Observer,
) -> Result<SimResult, SimError> {
    let events = [Event::ground_contact()];
    match method {
        Method::Adaptive => integrate_adaptive(&dynamics::derivatives, s0, config, sim, &events, observer),
        Method::FixedStep => integrate_fixed_step(&dynamics::derivatives, s0, config, sim, &events, observer),
    }
}

/// Run the point-mass model until ground contact or the horizon.
pub fn simulate(config: &FlightConfig, s0: &State, sim: &SimConfig, method: Method) -> Result<SimResult, SimError> {
    simulate_with(config, s0, sim, method, &mut NoopObserver)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
