//! 3x3 matrix for composing rotations and perspective divisors.
//!
//! # Convention
//! - Stored as three row vectors `a`, `b`, `c`.
//! - Vectors are **column vectors** on the right: `Mat3 * Vec3`.
//! - Transforms chain **right-to-left**: `A * B * v` applies B first, then A.

use std::ops::Mul;

use approx::{AbsDiffEq, RelativeEq};

use super::vec3::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat3 {
    pub const fn from_rows(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    pub const fn identity() -> Self {
        Self::from_rows(Vec3::X, Vec3::Y, Vec3::Z)
    }

    /// Creates a rotation matrix around the X axis.
    pub fn rotation_x(theta: f32) -> Self {
        let (s, c) = theta.sin_cos();
        Self::from_rows(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, c, -s),
            Vec3::new(0.0, s, c),
        )
    }

    /// Creates a rotation matrix around the Y axis.
    pub fn rotation_y(theta: f32) -> Self {
        let (s, c) = theta.sin_cos();
        Self::from_rows(
            Vec3::new(c, 0.0, s),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-s, 0.0, c),
        )
    }

    /// Creates a rotation matrix around the Z axis.
    pub fn rotation_z(theta: f32) -> Self {
        let (s, c) = theta.sin_cos();
        Self::from_rows(
            Vec3::new(c, -s, 0.0),
            Vec3::new(s, c, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        )
    }

    /// Combined rotation for Euler angles `(pitch, yaw, roll)` as `(x, y, z)`.
    ///
    /// Order: `Rx * Ry * Rz`, so Z is applied to a vector first, then Y, then X.
    /// Rotation composition is not commutative; this order is fixed.
    pub fn rotation(rotation: Vec3) -> Self {
        Self::rotation_x(rotation.x) * Self::rotation_y(rotation.y) * Self::rotation_z(rotation.z)
    }

    pub fn rows(&self) -> [Vec3; 3] {
        [self.a, self.b, self.c]
    }

    /// Returns column `col` as a vector.
    pub fn column(&self, col: usize) -> Vec3 {
        Vec3::new(self.get(0, col), self.get(1, col), self.get(2, col))
    }

    /// Access element at [row][col].
    ///
    /// # Panics
    /// Panics if `row` or `col` is greater than 2.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        let r = match row {
            0 => self.a,
            1 => self.b,
            2 => self.c,
            _ => panic!("Mat3 row index out of range: {row}"),
        };
        match col {
            0 => r.x,
            1 => r.y,
            2 => r.z,
            _ => panic!("Mat3 column index out of range: {col}"),
        }
    }

    pub fn transpose(&self) -> Self {
        Self::from_rows(self.column(0), self.column(1), self.column(2))
    }
}

/// Matrix multiplication: Mat3 * Mat3.
impl Mul<Mat3> for Mat3 {
    type Output = Mat3;

    fn mul(self, rhs: Mat3) -> Self::Output {
        let (c0, c1, c2) = (rhs.column(0), rhs.column(1), rhs.column(2));
        let row = |r: Vec3| Vec3::new(r.dot(c0), r.dot(c1), r.dot(c2));
        Mat3::from_rows(row(self.a), row(self.b), row(self.c))
    }
}

/// Transform a vector: Mat3 * Vec3 (column vector).
impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Self::Output {
        Vec3::new(self.a.dot(v), self.b.dot(v), self.c.dot(v))
    }
}

impl AbsDiffEq for Mat3 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.a.abs_diff_eq(&other.a, epsilon)
            && self.b.abs_diff_eq(&other.b, epsilon)
            && self.c.abs_diff_eq(&other.c, epsilon)
    }
}

impl RelativeEq for Mat3 {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.a.relative_eq(&other.a, epsilon, max_relative)
            && self.b.relative_eq(&other.b, epsilon, max_relative)
            && self.c.relative_eq(&other.c, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn zero_angle_rotations_are_identity() {
        assert_eq!(Mat3::rotation_x(0.0), Mat3::identity());
        assert_eq!(Mat3::rotation_y(0.0), Mat3::identity());
        assert_eq!(Mat3::rotation_z(0.0), Mat3::identity());
        assert_eq!(Mat3::rotation(Vec3::ZERO), Mat3::identity());

        let v = Vec3::new(1.5, -7.0, 0.25);
        assert_eq!(Mat3::rotation(Vec3::ZERO) * v, v);
    }

    #[test]
    fn multiplication_is_associative() {
        let a = Mat3::rotation_x(0.3);
        let b = Mat3::rotation_y(-1.2);
        let c = Mat3::rotation(Vec3::new(2.0, 0.7, -5.5));
        assert_relative_eq!((a * b) * c, a * (b * c), epsilon = 1e-5);
    }

    #[test]
    fn rotation_is_not_commutative() {
        let xy = Mat3::rotation_x(FRAC_PI_2) * Mat3::rotation_y(FRAC_PI_2);
        let yx = Mat3::rotation_y(FRAC_PI_2) * Mat3::rotation_x(FRAC_PI_2);
        assert!(!xy.abs_diff_eq(&yx, 1e-3));
    }

    #[test]
    fn quarter_turns_move_axes() {
        assert_relative_eq!(Mat3::rotation_z(FRAC_PI_2) * Vec3::X, Vec3::Y, epsilon = 1e-6);
        assert_relative_eq!(Mat3::rotation_x(FRAC_PI_2) * Vec3::Y, Vec3::Z, epsilon = 1e-6);
        assert_relative_eq!(Mat3::rotation_y(FRAC_PI_2) * Vec3::Z, Vec3::X, epsilon = 1e-6);
    }

    #[test]
    fn combined_rotation_applies_z_first() {
        // Z quarter turn sends X to Y, then the X quarter turn sends Y to Z.
        let m = Mat3::rotation(Vec3::new(FRAC_PI_2, 0.0, FRAC_PI_2));
        assert_relative_eq!(m * Vec3::X, Vec3::Z, epsilon = 1e-6);
    }

    #[test]
    fn rotations_preserve_magnitude() {
        let v = Vec3::new(3.0, -4.0, 12.0);
        let rotated = Mat3::rotation(Vec3::new(0.4, PI * 1.7, -2.9)) * v;
        assert_relative_eq!(rotated.magnitude(), 13.0, epsilon = 1e-4);
    }

    #[test]
    fn transpose_of_rotation_is_its_inverse() {
        let r = Mat3::rotation(Vec3::new(0.1, 0.2, 0.3));
        assert_relative_eq!(r * r.transpose(), Mat3::identity(), epsilon = 1e-6);
        assert_eq!(r.get(1, 2), r.transpose().get(2, 1));
    }
}
