//! Point entity

use super::EntityCommon;
use crate::types::Vector3;

/// A point entity
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    /// Common entity data
    pub common: EntityCommon,
    /// Location (in WCS)
    pub location: Vector3,
    /// Thickness (extrusion in the normal direction)
    pub thickness: f64,
    /// Angle of the X axis used when the point is displayed, in radians
    pub rotation: f64,
    /// Normal vector
    pub normal: Vector3,
}

impl Point {
    /// Create a new point at the origin
    pub fn new() -> Self {
        Point {
            common: EntityCommon::new(),
            location: Vector3::ZERO,
            thickness: 0.0,
            rotation: 0.0,
            normal: Vector3::UNIT_Z,
        }
    }

    /// Create a point at a location
    pub fn at(location: Vector3) -> Self {
        Point {
            location,
            ..Self::new()
        }
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new()
    }
}

impl_entity!(Point, "POINT");
