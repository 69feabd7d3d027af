//! Coordinate system transforms
//!
//! Several entities store positions in their Object Coordinate System
//! (OCS), the plane defined by the entity's extrusion direction. The OCS
//! axes come from the AutoCAD arbitrary axis algorithm: when the normal is
//! close to the world Z axis the world Y axis is used as reference,
//! otherwise the world Z axis.

use crate::types::{Vector2, Vector3};
use std::ops::Mul;

/// Normals whose x and y components are both below this value use the
/// world Y axis as reference for the OCS x direction.
pub const ARBITRARY_AXIS_THRESHOLD: f64 = 1.0 / 64.0;

/// 3x3 matrix for rotations and coordinate frame changes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3 {
    /// Matrix elements stored in row-major order
    pub m: [[f64; 3]; 3],
}

impl Matrix3 {
    /// Identity matrix
    pub const IDENTITY: Matrix3 = Matrix3 {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Create matrix from rows
    pub fn from_rows(row0: [f64; 3], row1: [f64; 3], row2: [f64; 3]) -> Self {
        Self {
            m: [row0, row1, row2],
        }
    }

    /// Rotation around the Z axis by `angle` radians
    pub fn rotation_z(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::from_rows([cos, -sin, 0.0], [sin, cos, 0.0], [0.0, 0.0, 1.0])
    }

    /// OCS to WCS matrix for the given extrusion direction
    ///
    /// The columns are the OCS x, y and z axes expressed in world
    /// coordinates. The normal does not need to be unit length.
    pub fn arbitrary_axis(normal: Vector3) -> Self {
        let normal = normal.normalize();

        let reference = if normal.x.abs() < ARBITRARY_AXIS_THRESHOLD
            && normal.y.abs() < ARBITRARY_AXIS_THRESHOLD
        {
            Vector3::UNIT_Y
        } else {
            Vector3::UNIT_Z
        };

        let x_dir = reference.cross(&normal).normalize();
        let y_dir = normal.cross(&x_dir).normalize();

        Self::from_rows(
            [x_dir.x, y_dir.x, normal.x],
            [x_dir.y, y_dir.y, normal.y],
            [x_dir.z, y_dir.z, normal.z],
        )
    }

    /// Transpose; for the orthonormal arbitrary axis matrix this is the inverse
    pub fn transpose(&self) -> Self {
        let m = &self.m;
        Self::from_rows(
            [m[0][0], m[1][0], m[2][0]],
            [m[0][1], m[1][1], m[2][1]],
            [m[0][2], m[1][2], m[2][2]],
        )
    }

    /// Multiply a column vector
    pub fn transform_point(&self, v: Vector3) -> Vector3 {
        let m = &self.m;
        Vector3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }
}

impl Default for Matrix3 {
    fn default() -> Self {
        Matrix3::IDENTITY
    }
}

impl Mul for Matrix3 {
    type Output = Matrix3;

    fn mul(self, other: Matrix3) -> Matrix3 {
        let mut result = [[0.0; 3]; 3];
        for (i, row) in result.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.m[i][k] * other.m[k][j]).sum();
            }
        }
        Matrix3 { m: result }
    }
}

impl Mul<Vector3> for Matrix3 {
    type Output = Vector3;

    fn mul(self, v: Vector3) -> Vector3 {
        self.transform_point(v)
    }
}

fn is_world_z(normal: Vector3) -> bool {
    let n = normal.normalize();
    n.x == 0.0 && n.y == 0.0 && n.z > 0.0
}

/// Express a world point in the OCS of `normal`
///
/// The identity when the normal is the world Z axis.
pub fn world_to_object(point: Vector3, normal: Vector3) -> Vector3 {
    if is_world_z(normal) {
        return point;
    }
    Matrix3::arbitrary_axis(normal).transpose().transform_point(point)
}

/// Express an OCS point of `normal` in world coordinates
///
/// The identity when the normal is the world Z axis.
pub fn object_to_world(point: Vector3, normal: Vector3) -> Vector3 {
    if is_world_z(normal) {
        return point;
    }
    Matrix3::arbitrary_axis(normal).transform_point(point)
}

/// Rotate a 2D point around `center` by `angle` radians
pub fn rotate_point_2d(point: Vector2, center: Vector2, angle: f64) -> Vector2 {
    center + (point - center).rotate(angle)
}

/// Normalize an angle in radians to `[0, 2π)`
pub fn normalize_angle(angle: f64) -> f64 {
    let tau = std::f64::consts::TAU;
    let a = angle % tau;
    if a < 0.0 {
        a + tau
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_identity_for_world_z() {
        let p = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(world_to_object(p, Vector3::UNIT_Z), p);
        assert_eq!(object_to_world(p, Vector3::UNIT_Z), p);
        assert_eq!(world_to_object(p, Vector3::new(0.0, 0.0, 5.0)), p);
    }

    #[test]
    fn test_arbitrary_axis_for_world_x() {
        // Normal along X: reference is world Z, so OCS x = Z × X = Y.
        let m = Matrix3::arbitrary_axis(Vector3::UNIT_X);
        let x_axis = m.transform_point(Vector3::UNIT_X);
        assert!(x_axis.approx_eq(&Vector3::UNIT_Y, 1e-15));
        let z_axis = m.transform_point(Vector3::UNIT_Z);
        assert!(z_axis.approx_eq(&Vector3::UNIT_X, 1e-15));
    }

    #[test]
    fn test_negative_z_normal_flips_x() {
        let p = world_to_object(Vector3::new(1.0, 2.0, 3.0), -Vector3::UNIT_Z);
        assert!(p.approx_eq(&Vector3::new(-1.0, 2.0, -3.0), 1e-12));
    }

    #[test]
    fn test_matrix_multiplication_identity() {
        let r = Matrix3::rotation_z(0.3);
        assert_eq!(r * Matrix3::IDENTITY, r);
    }

    #[test]
    fn test_normalize_angle() {
        let tau = std::f64::consts::TAU;
        assert!((normalize_angle(-0.5) - (tau - 0.5)).abs() < 1e-12);
        assert_eq!(normalize_angle(0.0), 0.0);
        assert!(normalize_angle(tau) < 1e-12);
    }

    fn component() -> impl Strategy<Value = f64> {
        -1000.0f64..1000.0
    }

    proptest! {
        #[test]
        fn prop_object_world_roundtrip(
            px in component(), py in component(), pz in component(),
            nx in -1.0f64..1.0, ny in -1.0f64..1.0, nz in -1.0f64..1.0,
        ) {
            let normal = Vector3::new(nx, ny, nz);
            prop_assume!(normal.length() > 1e-3);
            let p = Vector3::new(px, py, pz);
            let back = object_to_world(world_to_object(p, normal), normal);
            let tolerance = 1e-12 * p.length().max(1.0);
            prop_assert!(back.approx_eq(&p, tolerance), "{} vs {}", back, p);
        }
    }
}
