//! Orientation helpers.
//!
//! Conventions: +Y is up and an actor's front is its local -Z axis.

use crate::{
    constants::DIST_EPS,
    types::{Quat, Vec3},
};

/// World-space front (local -Z) of an orientation.
#[inline]
pub fn front(rotation: &Quat) -> Vec3 {
    rotation * Vec3::new(0.0, 0.0, -1.0)
}

/// World-space up (local +Y) of an orientation.
#[inline]
pub fn up(rotation: &Quat) -> Vec3 {
    rotation * Vec3::y()
}

/// Orientation whose front faces from `from` toward `to`, keeping +Y as up.
///
/// Returns `None` if the direction is too short or points straight up/down.
pub fn look_at(from: &Vec3, to: &Vec3) -> Option<Quat> {
    let dir = to - from;
    if dir.norm_squared() <= DIST_EPS * DIST_EPS {
        return None;
    }
    if dir.cross(&Vec3::y()).norm_squared() <= DIST_EPS * DIST_EPS {
        return None;
    }

    // `face_towards` aligns local +Z with its argument; the front is -Z.
    Some(Quat::face_towards(&-dir, &Vec3::y()))
}

/// Per-axis rotation angles in degrees, decomposed in Y-X-Z order.
///
/// `y` (yaw) keeps the full [-180, 180] range; `x` (pitch) is clamped to
/// [-90, 90] so the decomposition never produces NaN near gimbal lock.
pub fn safe_euler_angles(rotation: &Quat) -> Vec3 {
    let q = rotation.into_inner();
    let (w, x, y, z) = (q.w, q.i, q.j, q.k);

    let sin_pitch = (2.0 * (w * x - y * z)).clamp(-1.0, 1.0);
    let pitch = sin_pitch.asin();
    let yaw = (2.0 * (x * z + w * y)).atan2(1.0 - 2.0 * (x * x + y * y));
    let roll = (2.0 * (x * y + w * z)).atan2(1.0 - 2.0 * (x * x + z * z));

    Vec3::new(pitch.to_degrees(), yaw.to_degrees(), roll.to_degrees())
}

/// Angle in degrees between the orientation's up vector and world up.
pub fn tilt_degrees(rotation: &Quat) -> f32 {
    up(rotation).angle(&Vec3::y()).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1.0e-3
    }

    #[test]
    fn identity_front_is_negative_z() {
        let f = front(&Quat::identity());
        assert!(approx(f.z, -1.0));
        assert!(approx(f.x, 0.0));
    }

    #[test]
    fn look_at_front_points_at_target() {
        let from = Vec3::new(1.0, 0.0, 1.0);
        let to = Vec3::new(4.0, 2.0, -3.0);
        let q = look_at(&from, &to).expect("valid direction");
        let expected = (to - from).normalize();
        let f = front(&q);
        assert!((f - expected).norm() < 1.0e-4);
        // Up stays in the vertical plane containing world up.
        assert!(up(&q).y > 0.0);
    }

    #[test]
    fn look_at_rejects_degenerate_directions() {
        let p = Vec3::new(0.0, 1.0, 0.0);
        assert!(look_at(&p, &p).is_none());
        assert!(look_at(&p, &Vec3::new(0.0, 5.0, 0.0)).is_none());
    }

    #[test]
    fn yaw_keeps_full_range() {
        for deg in [-170.0f32, -90.0, -30.0, 0.0, 45.0, 120.0, 179.0] {
            let q = Quat::from_axis_angle(&Vec3::y_axis(), deg.to_radians());
            let e = safe_euler_angles(&q);
            assert!(approx(e.y, deg), "yaw {deg} decoded as {}", e.y);
            assert!(approx(e.x, 0.0));
            assert!(approx(e.z, 0.0));
        }
    }

    #[test]
    fn tilt_measures_deviation_from_world_up() {
        assert!(approx(tilt_degrees(&Quat::identity()), 0.0));
        let rolled = Quat::from_axis_angle(&Vec3::z_axis(), 60f32.to_radians());
        assert!(approx(tilt_degrees(&rolled), 60.0));
        // Pure yaw never tilts.
        let yawed = Quat::from_axis_angle(&Vec3::y_axis(), 2.0);
        assert!(approx(tilt_degrees(&yawed), 0.0));
    }
}
