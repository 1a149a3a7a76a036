//! Vector and matrix types for piece placement.
//!
//! Two families live side by side:
//!
//! ```text
//!  exact (integer)                 render (f32)
//!  ┌──────────────┐   to_mat3()    ┌──────────────┐
//!  │ IVec3        │ ─────────────▶ │ Vec3         │
//!  │ Rotation     │                │ Mat3, Mat4   │
//!  └──────────────┘                └──────────────┘
//!  lattice positions and           interpolated animation
//!  the 24 cube symmetries          frames and GPU transforms
//! ```
//!
//! Discrete layer turns only ever touch the integer side, so repeated turns
//! cannot accumulate floating-point drift.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A world axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Left to right.
    X,
    /// Down to up.
    Y,
    /// Back to front.
    Z,
}

/// Integer vector on the piece lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct IVec3 {
    /// X component.
    pub x: i32,
    /// Y component.
    pub y: i32,
    /// Z component.
    pub z: i32,
}

impl IVec3 {
    /// Create a new vector.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0, 0, 0)
    }

    /// Signed unit vector along `axis`.
    #[must_use]
    pub const fn unit(axis: Axis, sign: i32) -> Self {
        match axis {
            Axis::X => Self::new(sign, 0, 0),
            Axis::Y => Self::new(0, sign, 0),
            Axis::Z => Self::new(0, 0, sign),
        }
    }

    /// Component along `axis`.
    #[must_use]
    pub const fn component(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Dot product.
    #[must_use]
    pub const fn dot(&self, other: &Self) -> i32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Number of non-zero components.
    #[must_use]
    pub fn nonzero_count(&self) -> usize {
        usize::from(self.x != 0) + usize::from(self.y != 0) + usize::from(self.z != 0)
    }

    /// Convert to a float vector.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_vec3(&self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

impl fmt::Display for IVec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A 3D vector for positions and directions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl Vec3 {
    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Component along `axis`.
    #[must_use]
    pub const fn component(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Calculate the length (magnitude) of the vector.
    #[must_use]
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Normalize the vector to unit length.
    #[must_use]
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self::new(self.x / len, self.y / len, self.z / len)
        } else {
            *self
        }
    }

    /// Dot product of two vectors.
    #[must_use]
    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Scale vector by a scalar.
    #[must_use]
    pub fn scale(&self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }
}

/// An exact proper rotation of the cube: one of the 24 orientation-preserving
/// symmetries, stored as a row-major integer matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rotation {
    m: [[i32; 3]; 3],
}

impl Rotation {
    /// The identity rotation.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            m: [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
        }
    }

    /// Rotation by `quarter_turns` × 90° counter-clockwise about the unit
    /// vector `axis` (right-hand rule).
    #[must_use]
    pub fn about(axis: IVec3, quarter_turns: i32) -> Self {
        let (cos, sin) = match quarter_turns.rem_euclid(4) {
            0 => (1, 0),
            1 => (0, 1),
            2 => (-1, 0),
            _ => (0, -1),
        };
        let n = [axis.x, axis.y, axis.z];
        #[rustfmt::skip]
        let cross = [
            [0, -n[2], n[1]],
            [n[2], 0, -n[0]],
            [-n[1], n[0], 0],
        ];
        let mut m = [[0; 3]; 3];
        for (r, row) in m.iter_mut().enumerate() {
            for (col, cell) in row.iter_mut().enumerate() {
                let diag = i32::from(r == col);
                *cell = cos * diag + sin * cross[r][col] + (1 - cos) * n[r] * n[col];
            }
        }
        Self { m }
    }

    /// `self ∘ other`: apply `other` first, then `self`.
    #[must_use]
    pub fn compose(&self, other: &Self) -> Self {
        let mut m = [[0; 3]; 3];
        for (r, row) in m.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.m[r][k] * other.m[k][c]).sum();
            }
        }
        Self { m }
    }

    /// Rotate an integer vector.
    #[must_use]
    pub const fn apply(&self, v: IVec3) -> IVec3 {
        let m = &self.m;
        IVec3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// Float copy for rendering.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_mat3(&self) -> Mat3 {
        let mut m = [[0.0; 3]; 3];
        for (r, row) in m.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = self.m[r][c] as f32;
            }
        }
        Mat3 { m }
    }
}

/// A row-major 3x3 float matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    /// Rows.
    pub m: [[f32; 3]; 3],
}

impl Mat3 {
    /// Rotation by `angle` radians counter-clockwise about the unit `axis`.
    #[must_use]
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let n = axis.normalize();
        let (sin, cos) = angle.sin_cos();
        let t = 1.0 - cos;
        #[rustfmt::skip]
        let m = [
            [t * n.x * n.x + cos,       t * n.x * n.y - sin * n.z, t * n.x * n.z + sin * n.y],
            [t * n.x * n.y + sin * n.z, t * n.y * n.y + cos,       t * n.y * n.z - sin * n.x],
            [t * n.x * n.z - sin * n.y, t * n.y * n.z + sin * n.x, t * n.z * n.z + cos],
        ];
        Self { m }
    }
}

/// A 4x4 matrix for transformations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mat4 {
    /// Matrix data in column-major order.
    pub data: [f32; 16],
}

impl Mat4 {
    /// Rigid transform: rotate by `rotation`, then translate by `translation`.
    #[must_use]
    pub fn from_rotation_translation(rotation: &Mat3, translation: Vec3) -> Self {
        let r = &rotation.m;
        #[rustfmt::skip]
        let data = [
            r[0][0], r[1][0], r[2][0], 0.0,
            r[0][1], r[1][1], r[2][1], 0.0,
            r[0][2], r[1][2], r[2][2], 0.0,
            translation.x, translation.y, translation.z, 1.0,
        ];
        Self { data }
    }

    /// Multiply two matrices.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        let mut result = [0.0f32; 16];

        for row in 0..4 {
            for col in 0..4 {
                for k in 0..4 {
                    result[col * 4 + row] +=
                        self.data[k * 4 + row] * other.data[col * 4 + k];
                }
            }
        }

        Self { data: result }
    }

    /// Translation column.
    #[must_use]
    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.data[12], self.data[13], self.data[14])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn approx_vec(a: Vec3, b: Vec3) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
    }

    // ===========================================
    // Vec3 / IVec3 Tests
    // ===========================================

    #[test]
    fn test_vec3_length_and_normalize() {
        let v = Vec3::new(3.0, 4.0, 0.0);
        assert!(approx_eq(v.length(), 5.0));
        assert!(approx_eq(v.normalize().length(), 1.0));
        assert!(approx_eq(Vec3::zero().normalize().length(), 0.0));
    }

    #[test]
    fn test_ivec3_helpers() {
        let v = IVec3::new(1, 0, -1);
        assert_eq!(v.nonzero_count(), 2);
        assert_eq!(v.component(Axis::Z), -1);
        assert_eq!(IVec3::unit(Axis::Y, -1), IVec3::new(0, -1, 0));
        assert_eq!(v.dot(&IVec3::new(1, 1, 1)), 0);
        assert!(approx_vec(v.as_vec3(), Vec3::new(1.0, 0.0, -1.0)));
    }

    // ===========================================
    // Rotation Tests
    // ===========================================

    #[test]
    fn test_rotation_quarter_turn_about_x() {
        // 90° clockwise seen from +X is -1 counter-clockwise quarter turn.
        let r = Rotation::about(IVec3::new(1, 0, 0), -1);
        assert_eq!(r.apply(IVec3::new(1, 1, 1)), IVec3::new(1, 1, -1));
        assert_eq!(r.apply(IVec3::new(0, 0, 1)), IVec3::new(0, 1, 0));
    }

    #[test]
    fn test_rotation_about_y_ccw() {
        let r = Rotation::about(IVec3::new(0, 1, 0), 1);
        assert_eq!(r.apply(IVec3::new(1, 0, 0)), IVec3::new(0, 0, -1));
    }

    #[test]
    fn test_rotation_four_quarters_is_identity() {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            for sign in [-1, 1] {
                let q = Rotation::about(IVec3::unit(axis, sign), 1);
                let full = q.compose(&q).compose(&q).compose(&q);
                assert_eq!(full, Rotation::identity());
            }
        }
    }

    #[test]
    fn test_rotation_group_has_24_elements() {
        let generators = [
            Rotation::about(IVec3::new(1, 0, 0), 1),
            Rotation::about(IVec3::new(0, 1, 0), 1),
        ];
        let mut seen = HashSet::new();
        let mut frontier = vec![Rotation::identity()];
        while let Some(r) = frontier.pop() {
            if seen.insert(r) {
                for g in &generators {
                    frontier.push(g.compose(&r));
                }
            }
        }
        assert_eq!(seen.len(), 24);
        // Proper rotations keep corners on corners.
        for r in &seen {
            assert_eq!(r.apply(IVec3::new(1, 1, 1)).nonzero_count(), 3);
        }
    }

    #[test]
    fn test_rotation_matches_float_axis_angle() {
        let axis = IVec3::new(0, 0, -1);
        let exact = Rotation::about(axis, 1).to_mat3();
        let float = Mat3::from_axis_angle(axis.as_vec3(), std::f32::consts::FRAC_PI_2);
        for r in 0..3 {
            for c in 0..3 {
                assert!(approx_eq(exact.m[r][c], float.m[r][c]), "[{r}][{c}]");
            }
        }
    }

    // ===========================================
    // Mat4 Tests
    // ===========================================

    /// Pure translation to `p`.
    fn point(p: Vec3) -> Mat4 {
        Mat4::from_rotation_translation(&Rotation::identity().to_mat3(), p)
    }

    #[test]
    fn test_mat4_rigid_transform() {
        let rot = Rotation::about(IVec3::new(0, 1, 0), 1).to_mat3();
        let m = Mat4::from_rotation_translation(&rot, Vec3::new(0.0, 2.0, 0.0));
        assert!(approx_vec(m.translation(), Vec3::new(0.0, 2.0, 0.0)));
        let p = m.mul(&point(Vec3::new(1.0, 0.0, 0.0))).translation();
        assert!(approx_vec(p, Vec3::new(0.0, 2.0, -1.0)));
    }

    #[test]
    fn test_mat4_mul_composes_transforms() {
        let a = point(Vec3::new(1.0, 0.0, 0.0));
        let rot = Rotation::about(IVec3::new(0, 0, 1), 1).to_mat3();
        let b = Mat4::from_rotation_translation(&rot, Vec3::zero());
        // b first, then a
        let p = a.mul(&b).mul(&point(Vec3::new(1.0, 0.0, 0.0))).translation();
        assert!(approx_vec(p, Vec3::new(1.0, 1.0, 0.0)));
        assert_eq!(point(Vec3::zero()).mul(&a), a);
    }
}
