//! Solid entity (filled triangle or quadrilateral)

use super::EntityCommon;
use crate::types::Vector3;

/// A filled 2D shape with three or four corners
///
/// Corners are in the OCS of `normal`. The fourth corner equals the third
/// for triangles.
#[derive(Debug, Clone, PartialEq)]
pub struct Solid {
    pub common: EntityCommon,
    pub first_corner: Vector3,
    pub second_corner: Vector3,
    pub third_corner: Vector3,
    pub fourth_corner: Vector3,
    /// Normal vector
    pub normal: Vector3,
    /// Thickness
    pub thickness: f64,
}

impl Solid {
    /// Create a quadrilateral solid
    pub fn new(first: Vector3, second: Vector3, third: Vector3, fourth: Vector3) -> Self {
        Solid {
            common: EntityCommon::new(),
            first_corner: first,
            second_corner: second,
            third_corner: third,
            fourth_corner: fourth,
            normal: Vector3::UNIT_Z,
            thickness: 0.0,
        }
    }

    /// Create a triangular solid
    pub fn triangle(first: Vector3, second: Vector3, third: Vector3) -> Self {
        Self::new(first, second, third, third)
    }
}

impl_entity!(Solid, "SOLID");
