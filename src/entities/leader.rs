//! Leader entity - Leader annotation line with arrow

use super::EntityCommon;
use crate::types::{Color, Handle, Vector3};

/// Leader path type (group code 72)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeaderPathType {
    /// Straight line segments
    #[default]
    StraightLine = 0,
    /// Spline path
    Spline = 1,
}

impl LeaderPathType {
    /// Create from DXF value
    pub fn from_value(value: i16) -> Self {
        match value {
            1 => LeaderPathType::Spline,
            _ => LeaderPathType::StraightLine,
        }
    }
}

/// Leader creation type (group code 73)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeaderCreationType {
    #[default]
    WithText = 0,
    WithTolerance = 1,
    WithBlock = 2,
    NoAnnotation = 3,
}

impl LeaderCreationType {
    /// Create from DXF value
    pub fn from_value(value: i16) -> Self {
        match value {
            1 => LeaderCreationType::WithTolerance,
            2 => LeaderCreationType::WithBlock,
            3 => LeaderCreationType::NoAnnotation,
            _ => LeaderCreationType::WithText,
        }
    }
}

/// Hookline direction (group code 74)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HooklineDirection {
    /// Direction opposite to horizontal
    #[default]
    Opposite = 0,
    /// Direction same as horizontal
    Same = 1,
}

impl HooklineDirection {
    /// Create from DXF value
    pub fn from_value(value: i16) -> Self {
        match value {
            1 => HooklineDirection::Same,
            _ => HooklineDirection::Opposite,
        }
    }
}

/// Leader entity - an annotation leader line with arrow
///
/// The leader is a series of line segments or a spline path, with the
/// arrowhead at the first vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Leader {
    /// Common entity properties
    pub common: EntityCommon,
    /// Dimension style name
    pub dimension_style: String,
    /// Arrowhead enabled
    pub arrow_enabled: bool,
    pub path_type: LeaderPathType,
    pub creation_type: LeaderCreationType,
    pub hookline_direction: HooklineDirection,
    /// Hookline enabled
    pub hookline_enabled: bool,
    /// Text annotation height
    pub text_height: f64,
    /// Text annotation width
    pub text_width: f64,
    /// Leader vertices in WCS, arrow point first
    pub vertices: Vec<Vector3>,
    /// Color used when the dimension style's color is ByBlock
    pub override_color: Color,
    /// Handle to associated annotation entity
    pub annotation_handle: Handle,
    /// Normal vector (extrusion direction)
    pub normal: Vector3,
}

impl Leader {
    /// Create a new empty leader
    pub fn new() -> Self {
        Self {
            common: EntityCommon::default(),
            dimension_style: "Standard".to_string(),
            arrow_enabled: true,
            path_type: LeaderPathType::StraightLine,
            creation_type: LeaderCreationType::NoAnnotation,
            hookline_direction: HooklineDirection::Opposite,
            hookline_enabled: false,
            text_height: 0.0,
            text_width: 0.0,
            vertices: Vec::new(),
            override_color: Color::ByLayer,
            annotation_handle: Handle::NULL,
            normal: Vector3::UNIT_Z,
        }
    }

    /// Create a leader from a list of vertices
    pub fn from_vertices(vertices: Vec<Vector3>) -> Self {
        Self {
            vertices,
            ..Self::new()
        }
    }

    /// Add a vertex to the leader path
    pub fn add_vertex(&mut self, vertex: Vector3) {
        self.vertices.push(vertex);
    }
}

impl Default for Leader {
    fn default() -> Self {
        Self::new()
    }
}

impl_entity!(Leader, "LEADER");
