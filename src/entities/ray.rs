//! Ray entity (semi-infinite line)

use super::EntityCommon;
use crate::types::Vector3;

/// A line starting at a base point and extending to infinity
#[derive(Debug, Clone, PartialEq)]
pub struct Ray {
    pub common: EntityCommon,
    /// Start point (in WCS)
    pub base_point: Vector3,
    /// Unit direction vector (in WCS)
    pub direction: Vector3,
}

impl Ray {
    /// Create a new ray
    pub fn new(base_point: Vector3, direction: Vector3) -> Self {
        Ray {
            common: EntityCommon::new(),
            base_point,
            direction: direction.normalize(),
        }
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Vector3::ZERO, Vector3::UNIT_X)
    }
}

impl_entity!(Ray, "RAY");
