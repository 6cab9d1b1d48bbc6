use nalgebra::{Vector2, Vector4};

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

pub const G0: f64 = 9.80665; // standard gravity, m/s^2
pub const RHO0: f64 = 1.225; // sea-level air density, kg/m^3

/// Added to the speed so direction-dependent terms stay finite at rest.
pub const SPEED_EPS: f64 = 1e-12;

// ---------------------------------------------------------------------------
// Planar point-mass state: position and velocity in the vertical plane
// ---------------------------------------------------------------------------

/// Frame: x downrange, y up (altitude), origin at the initial ground point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    pub pos: Vector2<f64>, // m   [x, y]
    pub vel: Vector2<f64>, // m/s [vx, vy]
}

impl State {
    pub fn new(x: f64, y: f64, vx: f64, vy: f64) -> Self {
        Self {
            pos: Vector2::new(x, y),
            vel: Vector2::new(vx, vy),
        }
    }

    /// Initial state from position, speed and flight-path angle (rad).
    pub fn from_speed_gamma(x0: f64, y0: f64, speed: f64, gamma: f64) -> Self {
        Self::new(x0, y0, speed * gamma.cos(), speed * gamma.sin())
    }

    pub fn altitude(&self) -> f64 {
        self.pos.y
    }

    pub fn speed(&self) -> f64 {
        self.vel.x.hypot(self.vel.y)
    }

    /// Flight-path angle (rad) above the horizontal; 0 at rest.
    pub fn flight_path_angle(&self) -> f64 {
        self.vel.y.atan2(self.vel.x)
    }

    pub fn is_finite(&self) -> bool {
        self.pos.iter().chain(self.vel.iter()).all(|v| v.is_finite())
    }

    /// Advance state by a derivative scaled by dt.
    pub fn apply(&self, d: &Deriv, dt: f64) -> State {
        State {
            pos: self.pos + d.dpos * dt,
            vel: self.vel + d.dvel * dt,
        }
    }

    /// Packed `[x, y, vx, vy]` form used by the Runge-Kutta stage arithmetic.
    pub fn to_vector(&self) -> Vector4<f64> {
        Vector4::new(self.pos.x, self.pos.y, self.vel.x, self.vel.y)
    }

    pub fn from_vector(v: &Vector4<f64>) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

// ---------------------------------------------------------------------------
// State derivative (dp/dt, dv/dt)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deriv {
    pub dpos: Vector2<f64>, // velocity
    pub dvel: Vector2<f64>, // acceleration
}

impl Deriv {
    pub fn to_vector(&self) -> Vector4<f64> {
        Vector4::new(self.dpos.x, self.dpos.y, self.dvel.x, self.dvel.y)
    }

    pub fn is_finite(&self) -> bool {
        self.dpos.iter().chain(self.dvel.iter()).all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn speed_gamma_decomposition() {
        let s = State::from_speed_gamma(0.0, 10.0, 70.0, 10f64.to_radians());
        assert_relative_eq!(s.speed(), 70.0, epsilon = 1e-12);
        assert_relative_eq!(s.flight_path_angle(), 10f64.to_radians(), epsilon = 1e-12);
        assert_relative_eq!(s.altitude(), 10.0);
        assert!(s.vel.x > 0.0 && s.vel.y > 0.0);
    }

    #[test]
    fn flight_path_angle_at_rest_is_zero() {
        let s = State::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(s.flight_path_angle(), 0.0);
    }

    #[test]
    fn vector_packing_preserves_order() {
        let s = State::new(1.0, 2.0, 3.0, 4.0);
        let v = s.to_vector();
        assert_eq!(v, Vector4::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(State::from_vector(&v), s);
    }

    #[test]
    fn non_finite_detected() {
        assert!(State::new(0.0, 1.0, 2.0, 3.0).is_finite());
        assert!(!State::new(0.0, f64::NAN, 2.0, 3.0).is_finite());
        let d = Deriv {
            dpos: Vector2::new(1.0, 1.0),
            dvel: Vector2::new(f64::INFINITY, 0.0),
        };
        assert!(!d.is_finite());
    }
}
