//! Scene camera.
//!
//! The camera is a position plus an Euler orientation `(pitch, yaw, roll)`
//! stored as `(x, y, z)` in radians. It is only ever moved relative to where
//! it already is: there is no absolute setter.
//!
//! # Angle accumulation
//!
//! By default orientation grows without bound as deltas are added, which is
//! harmless for the sin/cos based rotation matrices but visible when reading
//! the raw angles back. [`AnglePolicy::Wrap`] opts into normalizing each
//! component into `[-π, π]` after every accumulation.

use std::f32::consts::{PI, TAU};

use crate::math::Vec3;

/// How accumulated Euler angles are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnglePolicy {
    /// Keep the raw sum of every delta.
    #[default]
    Accumulate,
    /// Normalize every component into `[-π, π]` after each accumulation.
    Wrap,
}

impl AnglePolicy {
    /// Adds `delta` to `angles` according to this policy.
    pub fn accumulate(self, angles: Vec3, delta: Vec3) -> Vec3 {
        let sum = angles + delta;
        match self {
            AnglePolicy::Accumulate => sum,
            AnglePolicy::Wrap => wrap_angles(sum),
        }
    }
}

/// Normalizes each component into `[-π, π]`.
pub fn wrap_angles(angles: Vec3) -> Vec3 {
    angles.map(|a| {
        let wrapped = (a + PI).rem_euclid(TAU) - PI;
        // rem_euclid can round up to TAU for tiny negative inputs
        if wrapped > PI {
            wrapped - TAU
        } else {
            wrapped
        }
    })
}

/// A camera with a world position and Euler orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    orientation: Vec3,
    angle_policy: AnglePolicy,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl Camera {
    /// Creates a camera at `position` with zero orientation.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            orientation: Vec3::ZERO,
            angle_policy: AnglePolicy::default(),
        }
    }

    pub fn with_angle_policy(mut self, policy: AnglePolicy) -> Self {
        self.angle_policy = policy;
        self.orientation = policy.accumulate(self.orientation, Vec3::ZERO);
        self
    }

    /// Moves the camera by `velocity` (`position += velocity`).
    pub fn move_camera(&mut self, velocity: Vec3) {
        self.position += velocity;
    }

    /// Rotates the camera by `delta` (`orientation += delta`).
    pub fn rotate_camera(&mut self, delta: Vec3) {
        self.orientation = self.angle_policy.accumulate(self.orientation, delta);
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn orientation(&self) -> Vec3 {
        self.orientation
    }

    pub fn angle_policy(&self) -> AnglePolicy {
        self.angle_policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn movement_is_additive_and_commutative() {
        let start = Vec3::new(1.0, 2.0, 3.0);
        let a = Vec3::new(0.5, -1.0, 0.1);
        let b = Vec3::new(-2.0, 4.0, 7.0);

        let mut first = Camera::new(start);
        first.move_camera(a);
        first.move_camera(b);

        let mut second = Camera::new(start);
        second.move_camera(b);
        second.move_camera(a);

        assert_relative_eq!(first.position(), second.position(), epsilon = 1e-6);
        assert_relative_eq!(first.position(), start + a + b, epsilon = 1e-6);
    }

    #[test]
    fn rotation_is_additive() {
        let mut camera = Camera::default();
        camera.rotate_camera(Vec3::new(0.1, 0.2, 0.3));
        camera.rotate_camera(Vec3::new(0.1, 0.2, 0.3));
        assert_relative_eq!(camera.orientation(), Vec3::new(0.2, 0.4, 0.6), epsilon = 1e-6);
        assert_eq!(camera.position(), Vec3::ZERO);
    }

    #[test]
    fn accumulate_policy_grows_without_bound() {
        let mut camera = Camera::default();
        for _ in 0..10 {
            camera.rotate_camera(Vec3::new(PI, 0.0, 0.0));
        }
        assert_relative_eq!(camera.orientation().x, 10.0 * PI, epsilon = 1e-4);
    }

    #[test]
    fn wrap_policy_keeps_angles_in_range() {
        let mut camera = Camera::default().with_angle_policy(AnglePolicy::Wrap);
        for _ in 0..10 {
            camera.rotate_camera(Vec3::new(1.0, -1.0, 0.25));
        }
        let o = camera.orientation();
        for angle in [o.x, o.y, o.z] {
            assert!((-PI..=PI).contains(&angle), "{angle} out of range");
        }
        // 10 rad wraps to 10 - 4π
        assert_relative_eq!(o.x, 10.0 - 2.0 * TAU, epsilon = 1e-4);
        assert_relative_eq!(o.z, 2.5, epsilon = 1e-5);
    }

    #[test]
    fn wrap_angles_is_identity_inside_range() {
        let v = Vec3::new(0.5, -3.0, 3.0);
        assert_relative_eq!(wrap_angles(v), v, epsilon = 1e-6);
    }
}
