//! XLine entity (construction line)

use super::EntityCommon;
use crate::types::Vector3;

/// A line extending to infinity in both directions
#[derive(Debug, Clone, PartialEq)]
pub struct XLine {
    pub common: EntityCommon,
    /// Point the line passes through (in WCS)
    pub base_point: Vector3,
    /// Unit direction vector (in WCS)
    pub direction: Vector3,
}

impl XLine {
    /// Create a new construction line
    pub fn new(base_point: Vector3, direction: Vector3) -> Self {
        XLine {
            common: EntityCommon::new(),
            base_point,
            direction: direction.normalize(),
        }
    }
}

impl Default for XLine {
    fn default() -> Self {
        Self::new(Vector3::ZERO, Vector3::UNIT_X)
    }
}

impl_entity!(XLine, "XLINE");
