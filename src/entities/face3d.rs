//! 3D face entity

use super::EntityCommon;
use crate::types::Vector3;
use bitflags::bitflags;

bitflags! {
    /// Invisible edge flags (group code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct InvisibleEdgeFlags: i16 {
        const FIRST = 1;
        const SECOND = 2;
        const THIRD = 4;
        const FOURTH = 8;
    }
}

/// A three- or four-sided face in world space
#[derive(Debug, Clone, PartialEq)]
pub struct Face3D {
    pub common: EntityCommon,
    pub first_corner: Vector3,
    pub second_corner: Vector3,
    pub third_corner: Vector3,
    pub fourth_corner: Vector3,
    pub invisible_edges: InvisibleEdgeFlags,
}

impl Face3D {
    /// Create a quadrilateral face
    pub fn new(first: Vector3, second: Vector3, third: Vector3, fourth: Vector3) -> Self {
        Face3D {
            common: EntityCommon::new(),
            first_corner: first,
            second_corner: second,
            third_corner: third,
            fourth_corner: fourth,
            invisible_edges: InvisibleEdgeFlags::empty(),
        }
    }

    /// Create a triangular face
    pub fn triangle(first: Vector3, second: Vector3, third: Vector3) -> Self {
        Self::new(first, second, third, third)
    }
}

impl_entity!(Face3D, "3DFACE");
