//! Yaw/pitch conventions for the orbit camera.
//!
//! Angles are in degrees. The camera looks down its local −Z axis; yaw
//! rotates about world +Y, pitch about the yawed local +X, and there is no
//! roll. Positive pitch tilts the view upward, so an orbit camera above its
//! pivot has a negative pitch.

use glam::{EulerRot, Mat3, Quat, Vec3};

/// Build the camera rotation for the given yaw then pitch (degrees).
#[must_use]
pub fn orbit_rotation(yaw: f32, pitch: f32) -> Quat {
    Quat::from_euler(EulerRot::YXZ, yaw.to_radians(), pitch.to_radians(), 0.0)
}

/// The forward (−Z) axis of a rotation.
#[inline]
#[must_use]
pub fn forward(rotation: Quat) -> Vec3 {
    rotation * Vec3::NEG_Z
}

/// Yaw (degrees) of an arbitrary orientation, from its forward axis.
#[must_use]
pub fn yaw_of(rotation: Quat) -> f32 {
    let f = forward(rotation);
    (-f.x).atan2(-f.z).to_degrees()
}

/// Pitch (degrees) of an orientation once the given yaw is removed.
#[must_use]
pub fn pitch_of(rotation: Quat, yaw: f32) -> f32 {
    let without_yaw = orbit_rotation(-yaw, 0.0) * rotation;
    let f = forward(without_yaw);
    f.y.atan2(-f.z).to_degrees()
}

/// Signed turn (degrees) from `from` to `to` along the shorter direction.
///
/// The result lies in `(-180, 180]`; a half turn is always reported as
/// `+180`.
#[must_use]
pub fn shortest_yaw_delta(from: f32, to: f32) -> f32 {
    let remainder = (to - from) % 360.0;
    if remainder > 180.0 {
        remainder - 360.0
    } else if remainder <= -180.0 {
        remainder + 360.0
    } else {
        remainder
    }
}

/// Rotation that makes a camera at `eye` look at `target` with +Y up.
///
/// Falls back to +Z as the reference up axis when looking straight up or
/// down, and to identity when `eye == target`.
#[must_use]
pub fn look_rotation(eye: Vec3, target: Vec3) -> Quat {
    let Some(back) = (eye - target).try_normalize() else {
        return Quat::IDENTITY;
    };
    let right = Vec3::Y
        .cross(back)
        .try_normalize()
        .unwrap_or_else(|| Vec3::Z.cross(back).normalize());
    let up = back.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, up, back)).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-3;

    #[test]
    fn zero_angles_look_down_negative_z() {
        let f = forward(orbit_rotation(0.0, 0.0));
        assert!((f - Vec3::NEG_Z).length() < EPSILON, "got {f:?}");
    }

    #[test]
    fn positive_pitch_looks_up() {
        let f = forward(orbit_rotation(0.0, 30.0));
        assert!(f.y > 0.0);
        let f = forward(orbit_rotation(0.0, -30.0));
        assert!(f.y < 0.0);
    }

    #[test]
    fn decomposition_recovers_yaw_and_pitch() {
        for &(yaw, pitch) in
            &[(0.0, 0.0), (45.0, -30.0), (-120.0, 60.0), (170.0, -80.0)]
        {
            let q = orbit_rotation(yaw, pitch);
            let y = yaw_of(q);
            let p = pitch_of(q, y);
            assert!((y - yaw).abs() < EPSILON, "yaw {yaw} -> {y}");
            assert!((p - pitch).abs() < EPSILON, "pitch {pitch} -> {p}");
        }
    }

    #[test]
    fn shortest_delta_stays_in_half_open_range() {
        let mut from = -720.0_f32;
        while from <= 720.0 {
            let mut to = -720.0_f32;
            while to <= 720.0 {
                let d = shortest_yaw_delta(from, to);
                assert!(d > -180.0 && d <= 180.0, "{from} -> {to} gave {d}");
                let wrapped = (from + d - to).rem_euclid(360.0);
                assert!(
                    wrapped < EPSILON || (360.0 - wrapped) < EPSILON,
                    "{from} + {d} is not equivalent to {to}"
                );
                to += 37.5;
            }
            from += 41.0;
        }
    }

    #[test]
    fn shortest_delta_crosses_the_seam() {
        assert!((shortest_yaw_delta(170.0, -170.0) - 20.0).abs() < EPSILON);
        assert!((shortest_yaw_delta(-170.0, 170.0) + 20.0).abs() < EPSILON);
        assert!((shortest_yaw_delta(0.0, -180.0) - 180.0).abs() < EPSILON);
    }

    #[test]
    fn look_rotation_points_at_target() {
        let eye = Vec3::new(3.0, 4.0, 5.0);
        let target = Vec3::new(-1.0, 0.5, 2.0);
        let f = forward(look_rotation(eye, target));
        let expected = (target - eye).normalize();
        assert!((f - expected).length() < EPSILON);
    }

    #[test]
    fn look_rotation_handles_vertical_view() {
        let f = forward(look_rotation(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO));
        assert!((f - Vec3::NEG_Y).length() < EPSILON);
    }
}
