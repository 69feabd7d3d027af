//! Arc entity

use super::EntityCommon;
use crate::types::Vector3;

/// A circular arc, counter-clockwise from start to end angle
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub common: EntityCommon,
    /// Center point (in WCS)
    pub center: Vector3,
    /// Radius
    pub radius: f64,
    /// Start angle in radians, measured in the OCS
    pub start_angle: f64,
    /// End angle in radians, measured in the OCS
    pub end_angle: f64,
    /// Thickness
    pub thickness: f64,
    /// Normal vector
    pub normal: Vector3,
}

impl Arc {
    /// Create a new unit arc spanning a quarter turn
    pub fn new() -> Self {
        Arc {
            common: EntityCommon::new(),
            center: Vector3::ZERO,
            radius: 1.0,
            start_angle: 0.0,
            end_angle: std::f64::consts::FRAC_PI_2,
            thickness: 0.0,
            normal: Vector3::UNIT_Z,
        }
    }

    /// Create an arc from center, radius and angles (radians)
    pub fn from_center_radius_angles(center: Vector3, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Arc {
            center,
            radius,
            start_angle,
            end_angle,
            ..Self::new()
        }
    }

    /// Builder: set the normal vector
    pub fn with_normal(mut self, normal: Vector3) -> Self {
        self.normal = normal;
        self
    }
}

impl Default for Arc {
    fn default() -> Self {
        Self::new()
    }
}

impl_entity!(Arc, "ARC");
