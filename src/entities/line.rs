//! Line entity

use super::EntityCommon;
use crate::types::Vector3;

/// A line segment between two points
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Common entity data
    pub common: EntityCommon,
    /// Start point (in WCS)
    pub start: Vector3,
    /// End point (in WCS)
    pub end: Vector3,
    /// Thickness
    pub thickness: f64,
    /// Normal vector
    pub normal: Vector3,
}

impl Line {
    /// Create a new line from the origin to the origin
    pub fn new() -> Self {
        Line {
            common: EntityCommon::new(),
            start: Vector3::ZERO,
            end: Vector3::ZERO,
            thickness: 0.0,
            normal: Vector3::UNIT_Z,
        }
    }

    /// Create a line between two points
    pub fn from_points(start: Vector3, end: Vector3) -> Self {
        Line {
            start,
            end,
            ..Self::new()
        }
    }

    /// Length of the segment
    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::new()
    }
}

impl_entity!(Line, "LINE");
