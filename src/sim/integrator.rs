use nalgebra::Vector4;

use crate::dynamics::state::{Deriv, State};
use crate::vehicle::FlightConfig;

/// Packed `[x, y, vx, vy]` vector used for stage arithmetic.
pub type Vec4 = Vector4<f64>;

// ---------------------------------------------------------------------------
// Classical 4th-order Runge-Kutta
// ---------------------------------------------------------------------------

/// Single RK4 step: advance state by dt.
///
/// Returns `None` if any stage derivative or the result is non-finite.
pub fn rk4_step<F>(rhs: &F, t: f64, state: &State, config: &FlightConfig, dt: f64) -> Option<State>
where
    F: Fn(f64, &State, &FlightConfig) -> Deriv,
{
    let k1 = rhs(t, state, config);
    let k2 = rhs(t + 0.5 * dt, &state.apply(&k1, dt * 0.5), config);
    let k3 = rhs(t + 0.5 * dt, &state.apply(&k2, dt * 0.5), config);
    let k4 = rhs(t + dt, &state.apply(&k3, dt), config);

    if ![&k1, &k2, &k3, &k4].iter().all(|k| k.is_finite()) {
        return None;
    }

    let next = State {
        pos: state.pos + (k1.dpos + 2.0 * k2.dpos + 2.0 * k3.dpos + k4.dpos) * (dt / 6.0),
        vel: state.vel + (k1.dvel + 2.0 * k2.dvel + 2.0 * k3.dvel + k4.dvel) * (dt / 6.0),
    };
    next.is_finite().then_some(next)
}

// ---------------------------------------------------------------------------
// Dormand-Prince 5(4) embedded pair
// ---------------------------------------------------------------------------

const C: [f64; 7] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];

const A: [[f64; 6]; 7] = [
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0, 0.0],
    [19372.0 / 6561.0, -25360.0 / 2187.0, 64448.0 / 6561.0, -212.0 / 729.0, 0.0, 0.0],
    [9017.0 / 3168.0, -355.0 / 33.0, 46732.0 / 5247.0, 49.0 / 176.0, -5103.0 / 18656.0, 0.0],
    [35.0 / 384.0, 0.0, 500.0 / 1113.0, 125.0 / 192.0, -2187.0 / 6784.0, 11.0 / 84.0],
];

/// 5th-order weights (equal to the last row of `A`, so the final stage is
/// the derivative at the new point).
const B: [f64; 7] = [35.0 / 384.0, 0.0, 500.0 / 1113.0, 125.0 / 192.0, -2187.0 / 6784.0, 11.0 / 84.0, 0.0];

/// Difference between the 5th- and 4th-order weights.
const E: [f64; 7] = [
    -71.0 / 57600.0,
    0.0,
    71.0 / 16695.0,
    -71.0 / 1920.0,
    17253.0 / 339200.0,
    -22.0 / 525.0,
    1.0 / 40.0,
];

const STAGES: usize = 7;
const ERROR_ORDER: f64 = 4.0;

/// Integration statistics for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub fn_evals: u64,
    pub accepted_steps: u64,
    pub rejected_steps: u64,
}

/// One trial step of the embedded pair.
#[derive(Debug, Clone, Copy)]
pub struct TrialStep {
    pub y: Vec4,
    /// Derivative at the new point (first stage of the next step).
    pub f: Vec4,
    /// RMS of the scaled local error; the step is acceptable when <= 1.
    pub error: f64,
}

/// Step-size controller: `h_new = h * safety * err^(-1/5)`, clamped.
#[derive(Debug, Clone, Copy)]
pub struct StepController {
    pub safety: f64,
    pub min_factor: f64,
    pub max_factor: f64,
}

impl Default for StepController {
    fn default() -> Self {
        Self { safety: 0.9, min_factor: 0.2, max_factor: 10.0 }
    }
}

impl StepController {
    pub fn factor(&self, error: f64) -> f64 {
        if error == 0.0 {
            return self.max_factor;
        }
        (self.safety * error.powf(-1.0 / (ERROR_ORDER + 1.0))).clamp(self.min_factor, self.max_factor)
    }
}

#[derive(Debug, Clone)]
pub struct Dopri5 {
    pub rtol: f64,
    pub atol: f64,
    pub controller: StepController,
    k: [Vec4; STAGES],
    pub stats: Stats,
}

impl Dopri5 {
    pub fn new(rtol: f64, atol: f64) -> Self {
        Self {
            rtol,
            atol,
            controller: StepController::default(),
            k: [Vec4::zeros(); STAGES],
            stats: Stats::default(),
        }
    }

    /// Compute all stages from `(t, y)` with step `h`. `f0` is the derivative
    /// at `(t, y)`, carried over from the previous accepted step.
    pub fn step<F>(&mut self, f: &F, t: f64, y: &Vec4, f0: &Vec4, h: f64) -> TrialStep
    where
        F: Fn(f64, &Vec4) -> Vec4,
    {
        self.k[0] = *f0;
        for i in 1..STAGES {
            let mut dy = Vec4::zeros();
            for j in 0..i {
                dy += self.k[j] * A[i][j];
            }
            self.k[i] = f(t + C[i] * h, &(y + dy * h));
        }
        self.stats.fn_evals += (STAGES - 1) as u64;

        let mut y_new = *y;
        let mut err = Vec4::zeros();
        for i in 0..STAGES {
            y_new += self.k[i] * (B[i] * h);
            err += self.k[i] * (E[i] * h);
        }

        TrialStep {
            y: y_new,
            f: self.k[STAGES - 1],
            error: self.error_norm(&err, y, &y_new),
        }
    }

    fn error_norm(&self, err: &Vec4, y: &Vec4, y_new: &Vec4) -> f64 {
        let scaled = err.zip_zip_map(y, y_new, |e, a, b| e / (self.atol + self.rtol * a.abs().max(b.abs())));
        rms(&scaled)
    }

    /// Starting step size from the local derivative scale (Hairer, Norsett &
    /// Wanner, section II.4).
    pub fn initial_step<F>(&mut self, f: &F, t0: f64, y0: &Vec4, f0: &Vec4, h_max: f64) -> f64
    where
        F: Fn(f64, &Vec4) -> Vec4,
    {
        let scale = y0.map(|v| self.atol + self.rtol * v.abs());
        let d0 = rms(&y0.component_div(&scale));
        let d1 = rms(&f0.component_div(&scale));

        let h0 = if d0 < 1e-5 || d1 < 1e-5 { 1e-6 } else { 0.01 * d0 / d1 };
        let y1 = y0 + f0 * h0;
        let f1 = f(t0 + h0, &y1);
        self.stats.fn_evals += 1;
        let d2 = rms(&(f1 - f0).component_div(&scale)) / h0;

        let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
            (h0 * 1e-3).max(1e-6)
        } else {
            (0.01 / d1.max(d2)).powf(1.0 / (ERROR_ORDER + 1.0))
        };

        (100.0 * h0).min(h1).min(h_max)
    }
}

fn rms(v: &Vec4) -> f64 {
    (v.norm_squared() / 4.0).sqrt()
}

// ---------------------------------------------------------------------------
// Dense output between accepted points
// ---------------------------------------------------------------------------

/// Cubic Hermite interpolant over one accepted step.
#[derive(Debug, Clone, Copy)]
pub struct Hermite {
    pub t0: f64,
    pub t1: f64,
    pub y0: Vec4,
    pub y1: Vec4,
    pub f0: Vec4,
    pub f1: Vec4,
}

impl Hermite {
    pub fn eval(&self, t: f64) -> Vec4 {
        let h = self.t1 - self.t0;
        let s = (t - self.t0) / h;
        let s2 = s * s;
        let s3 = s2 * s;
        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;
        self.y0 * h00 + self.f0 * (h10 * h) + self.y1 * h01 + self.f1 * (h11 * h)
    }
}

/// Root of `g` on `[a, b]` by the Illinois variant of regula falsi.
///
/// `ga` and `gb` must bracket zero. Returns the end of the final bracket on
/// `b`'s side, so the returned point has already crossed.
pub fn illinois<G>(g: G, mut a: f64, mut ga: f64, mut b: f64, mut gb: f64, xtol: f64) -> f64
where
    G: Fn(f64) -> f64,
{
    if gb == 0.0 {
        return b;
    }
    let mut side = 0i8;
    for _ in 0..100 {
        if (b - a).abs() <= xtol {
            break;
        }
        let c = (a * gb - b * ga) / (gb - ga);
        let gc = g(c);
        if gc == 0.0 {
            return c;
        }
        if gc.signum() == gb.signum() {
            b = c;
            gb = gc;
            if side == -1 {
                ga *= 0.5;
            }
            side = -1;
        } else {
            a = c;
            ga = gc;
            if side == 1 {
                gb *= 0.5;
            }
            side = 1;
        }
    }
    b
}
