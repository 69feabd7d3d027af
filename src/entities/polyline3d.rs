//! 3D polyline entity

use super::EntityCommon;
use crate::types::{Handle, Vector3};

/// A vertex of a 3D polyline
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex3D {
    /// Handle of the `VERTEX` record
    pub handle: Handle,
    /// Location (in WCS)
    pub location: Vector3,
}

impl Vertex3D {
    /// Create a vertex
    pub fn new(location: Vector3) -> Self {
        Vertex3D {
            handle: Handle::NULL,
            location,
        }
    }
}

/// A polyline with vertices in world space
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline3D {
    pub common: EntityCommon,
    /// Vertices
    pub vertices: Vec<Vertex3D>,
    /// Closed flag
    pub is_closed: bool,
    /// Handle of the terminating `SEQEND`
    pub seqend_handle: Handle,
}

impl Polyline3D {
    /// Create an empty 3D polyline
    pub fn new() -> Self {
        Polyline3D {
            common: EntityCommon::new(),
            vertices: Vec::new(),
            is_closed: false,
            seqend_handle: Handle::NULL,
        }
    }

    /// Create an open polyline through the given points
    pub fn from_points(points: impl IntoIterator<Item = Vector3>) -> Self {
        Polyline3D {
            vertices: points.into_iter().map(Vertex3D::new).collect(),
            ..Self::new()
        }
    }

    /// Raw code-70 flags: always 3D, plus closed
    pub fn flags(&self) -> i16 {
        if self.is_closed {
            8 | 1
        } else {
            8
        }
    }
}

impl Default for Polyline3D {
    fn default() -> Self {
        Self::new()
    }
}

impl_entity!(Polyline3D, "POLYLINE");
