//! Lightweight polyline entity

use super::EntityCommon;
use crate::types::{Vector2, Vector3};

/// A vertex of a lightweight polyline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LwVertex {
    /// Location (in OCS)
    pub location: Vector2,
    /// Start width
    pub start_width: f64,
    /// End width
    pub end_width: f64,
    /// Bulge (tangent of a quarter of the arc angle)
    pub bulge: f64,
}

impl LwVertex {
    /// Create a straight vertex
    pub fn new(location: Vector2) -> Self {
        LwVertex {
            location,
            start_width: 0.0,
            end_width: 0.0,
            bulge: 0.0,
        }
    }

    /// Create a vertex that starts an arc segment
    pub fn with_bulge(location: Vector2, bulge: f64) -> Self {
        LwVertex {
            bulge,
            ..Self::new(location)
        }
    }
}

/// A 2D polyline stored with all its vertices inline (`LWPOLYLINE`)
#[derive(Debug, Clone, PartialEq)]
pub struct LwPolyline {
    pub common: EntityCommon,
    /// Vertices
    pub vertices: Vec<LwVertex>,
    /// Closed flag (70 bit 1)
    pub is_closed: bool,
    /// Continuous linetype pattern (70 bit 128)
    pub plinegen: bool,
    /// Constant width
    pub constant_width: f64,
    /// Elevation along the normal
    pub elevation: f64,
    /// Thickness
    pub thickness: f64,
    /// Normal vector
    pub normal: Vector3,
}

impl LwPolyline {
    /// Create an empty polyline
    pub fn new() -> Self {
        LwPolyline {
            common: EntityCommon::new(),
            vertices: Vec::new(),
            is_closed: false,
            plinegen: false,
            constant_width: 0.0,
            elevation: 0.0,
            thickness: 0.0,
            normal: Vector3::UNIT_Z,
        }
    }

    /// Create a polyline through straight vertices
    pub fn from_points(points: impl IntoIterator<Item = Vector2>, closed: bool) -> Self {
        LwPolyline {
            vertices: points.into_iter().map(LwVertex::new).collect(),
            is_closed: closed,
            ..Self::new()
        }
    }

    /// Add a vertex
    pub fn add_vertex(&mut self, vertex: LwVertex) {
        self.vertices.push(vertex);
    }

    /// Raw code-70 flags
    pub fn flags(&self) -> i16 {
        let mut flags = 0;
        if self.is_closed {
            flags |= 1;
        }
        if self.plinegen {
            flags |= 128;
        }
        flags
    }
}

impl Default for LwPolyline {
    fn default() -> Self {
        Self::new()
    }
}

impl_entity!(LwPolyline, "LWPOLYLINE");
