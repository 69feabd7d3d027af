//! Circle entity

use super::EntityCommon;
use crate::types::Vector3;

/// A circle entity
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    /// Common entity data
    pub common: EntityCommon,
    /// Center point of the circle (in WCS)
    pub center: Vector3,
    /// Radius of the circle
    pub radius: f64,
    /// Thickness (extrusion in the normal direction)
    pub thickness: f64,
    /// Normal vector
    pub normal: Vector3,
}

impl Circle {
    /// Create a new circle at the origin with radius 1
    pub fn new() -> Self {
        Circle {
            common: EntityCommon::new(),
            center: Vector3::ZERO,
            radius: 1.0,
            thickness: 0.0,
            normal: Vector3::UNIT_Z,
        }
    }

    /// Create a new circle with center and radius
    pub fn from_center_radius(center: Vector3, radius: f64) -> Self {
        Circle {
            center,
            radius,
            ..Self::new()
        }
    }

    /// Builder: set the normal vector
    pub fn with_normal(mut self, normal: Vector3) -> Self {
        self.normal = normal;
        self
    }

    /// Get the diameter of the circle
    pub fn diameter(&self) -> f64 {
        self.radius * 2.0
    }
}

impl Default for Circle {
    fn default() -> Self {
        Self::new()
    }
}

impl_entity!(Circle, "CIRCLE");
