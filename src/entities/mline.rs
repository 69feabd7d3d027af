//! MLine (multiline) entity.
//!
//! A set of parallel lines following the elements of an
//! [`MLineStyle`](crate::objects::MLineStyle).

use super::EntityCommon;
use crate::types::{Handle, Vector2, Vector3};
use bitflags::bitflags;

/// Justification for MLine entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum MLineJustification {
    /// Justify to top line.
    Top = 0,
    /// Justify to zero offset (center).
    #[default]
    Zero = 1,
    /// Justify to bottom line.
    Bottom = 2,
}

impl From<i16> for MLineJustification {
    fn from(value: i16) -> Self {
        match value {
            0 => Self::Top,
            2 => Self::Bottom,
            _ => Self::Zero,
        }
    }
}

bitflags! {
    /// Flags for MLine entity.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MLineFlags: i16 {
        /// Has at least one vertex.
        const HAS_VERTICES = 1;
        /// MLine is closed.
        const CLOSED = 2;
        /// Suppress start caps.
        const NO_START_CAPS = 4;
        /// Suppress end caps.
        const NO_END_CAPS = 8;
    }
}

/// Parameters of one style element at a vertex.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MLineSegment {
    /// Element parameters (group code 41)
    pub parameters: Vec<f64>,
    /// Area fill parameters (group code 42)
    pub area_fill_parameters: Vec<f64>,
}

/// A vertex of an MLine, in the OCS of the entity.
#[derive(Debug, Clone, PartialEq)]
pub struct MLineVertex {
    pub position: Vector2,
    /// Direction of the segment starting here
    pub direction: Vector2,
    /// Miter direction
    pub miter: Vector2,
    /// One entry per style element
    pub segments: Vec<MLineSegment>,
}

impl MLineVertex {
    pub fn new(position: Vector2, direction: Vector2, miter: Vector2) -> Self {
        Self {
            position,
            direction,
            miter,
            segments: Vec::new(),
        }
    }
}

/// Multiline entity.
#[derive(Debug, Clone, PartialEq)]
pub struct MLine {
    pub common: EntityCommon,
    /// Name of the style (MLINESTYLE object)
    pub style_name: String,
    /// Handle of the style object
    pub style_handle: Handle,
    /// Scale factor applied to element offsets
    pub scale: f64,
    pub justification: MLineJustification,
    pub flags: MLineFlags,
    pub vertices: Vec<MLineVertex>,
    /// Elevation along the normal
    pub elevation: f64,
    pub normal: Vector3,
}

impl MLine {
    /// Creates an empty multiline using the `Standard` style.
    pub fn new() -> Self {
        Self {
            common: EntityCommon::new(),
            style_name: "Standard".to_string(),
            style_handle: Handle::NULL,
            scale: 1.0,
            justification: MLineJustification::Zero,
            flags: MLineFlags::HAS_VERTICES,
            vertices: Vec::new(),
            elevation: 0.0,
            normal: Vector3::UNIT_Z,
        }
    }

    /// Creates a multiline through the given points.
    ///
    /// Directions and miters are derived from the polyline; each vertex gets
    /// `element_count` segments with the given offsets as parameters.
    pub fn from_points(points: &[Vector2], offsets: &[f64], closed: bool) -> Self {
        let mut mline = Self::new();
        mline.flags.set(MLineFlags::CLOSED, closed);
        let n = points.len();
        for (i, &p) in points.iter().enumerate() {
            let next = if i + 1 < n {
                points[i + 1]
            } else if closed && n > 1 {
                points[0]
            } else if n > 1 {
                p + (p - points[i - 1])
            } else {
                p + Vector2::UNIT_X
            };
            let direction = (next - p).normalize();
            let prev_direction = if i > 0 {
                (p - points[i - 1]).normalize()
            } else if closed && n > 1 {
                (p - points[n - 1]).normalize()
            } else {
                direction
            };
            let bisector = Vector2::new(
                -(direction.y + prev_direction.y),
                direction.x + prev_direction.x,
            )
            .normalize();
            let mut vertex = MLineVertex::new(p, direction, bisector);
            vertex.segments = offsets
                .iter()
                .map(|&offset| MLineSegment {
                    parameters: vec![offset, 0.0],
                    area_fill_parameters: Vec::new(),
                })
                .collect();
            mline.vertices.push(vertex);
        }
        mline
    }

    /// Checks whether the multiline is closed.
    pub fn is_closed(&self) -> bool {
        self.flags.contains(MLineFlags::CLOSED)
    }
}

impl Default for MLine {
    fn default() -> Self {
        Self::new()
    }
}

impl_entity!(MLine, "MLINE");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_directions() {
        let points = [Vector2::new(0.0, 0.0), Vector2::new(10.0, 0.0), Vector2::new(10.0, 10.0)];
        let mline = MLine::from_points(&points, &[0.5, -0.5], false);
        assert_eq!(mline.vertices.len(), 3);
        assert_eq!(mline.vertices[0].direction, Vector2::UNIT_X);
        assert_eq!(mline.vertices[1].direction, Vector2::UNIT_Y);
        assert_eq!(mline.vertices[0].segments.len(), 2);
        assert!(!mline.is_closed());
    }
}
