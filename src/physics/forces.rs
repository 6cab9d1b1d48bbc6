use nalgebra::Vector2;

/// Resolve lift, drag and thrust magnitudes into inertial (x, y) force.
///
/// Drag opposes the velocity, lift is the velocity direction rotated +90 deg,
/// thrust acts along the fixed thrust-line angle `theta_t` (rad from
/// horizontal). Gravity is not included.
#[inline]
pub fn resolve_forces(vel: &Vector2<f64>, lift: f64, drag: f64, thrust: f64, theta_t: f64) -> Vector2<f64> {
    let gamma = vel.y.atan2(vel.x);
    let (sin_g, cos_g) = gamma.sin_cos();

    let f_drag = Vector2::new(-drag * cos_g, -drag * sin_g);
    let f_lift = Vector2::new(-lift * sin_g, lift * cos_g);
    let f_thrust = Vector2::new(thrust * theta_t.cos(), thrust * theta_t.sin());

    f_drag + f_lift + f_thrust
}
