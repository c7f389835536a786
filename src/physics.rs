// Direction updates for Monte Carlo transport

use nalgebra::Vector3;

/// Deflect a direction by polar angle `theta` and azimuthal angle `phi`
/// (radians) relative to its current orientation.
///
/// Closed-form update without building a rotation frame; the branch on the
/// sign of `dz` keeps the `1 + |dz|` denominator away from zero. The result is
/// not renormalised.
pub fn deflect(direction: [f64; 3], theta: f64, phi: f64) -> [f64; 3] {
    let [dx, dy, dz] = direction;
    let (sin_theta, cos_theta) = theta.sin_cos();
    let delta1 = sin_theta * phi.cos();
    let delta2 = sin_theta * phi.sin();
    let sign = if dz >= 0.0 { 1.0 } else { -1.0 };

    let b = dx * delta1 + dy * delta2;
    let tmp = cos_theta - b / (1.0 + dz.abs());

    [
        dx * tmp + delta1,
        dy * tmp + delta2,
        dz * cos_theta - sign * b,
    ]
}

/// Rescale a direction to unit length. Zero vectors are returned unchanged.
pub fn normalize(direction: [f64; 3]) -> [f64; 3] {
    let v = Vector3::from(direction);
    match v.try_normalize(0.0) {
        Some(unit) => unit.into(),
        None => direction,
    }
}

/// Advance a position along `direction` by `distance` (cm).
#[inline]
pub fn advance(position: [f64; 3], direction: [f64; 3], distance: f64) -> [f64; 3] {
    (Vector3::from(position) + Vector3::from(direction) * distance).into()
}
