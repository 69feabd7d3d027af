//! Polyface mesh entity

use super::EntityCommon;
use crate::types::{Handle, Vector3};

/// A position vertex of a polyface mesh
#[derive(Debug, Clone, PartialEq)]
pub struct PolyfaceVertex {
    pub handle: Handle,
    /// Location (in WCS)
    pub location: Vector3,
}

impl PolyfaceVertex {
    pub fn new(location: Vector3) -> Self {
        PolyfaceVertex {
            handle: Handle::NULL,
            location,
        }
    }
}

/// A face record referencing up to four vertices
///
/// Indices are one-based; a negative index hides the edge that starts at
/// that vertex and zero marks an unused slot.
#[derive(Debug, Clone, PartialEq)]
pub struct PolyfaceFace {
    pub handle: Handle,
    pub indices: [i16; 4],
}

impl PolyfaceFace {
    /// Create a triangle face
    pub fn triangle(a: i16, b: i16, c: i16) -> Self {
        PolyfaceFace {
            handle: Handle::NULL,
            indices: [a, b, c, 0],
        }
    }

    /// Create a quad face
    pub fn quad(a: i16, b: i16, c: i16, d: i16) -> Self {
        PolyfaceFace {
            handle: Handle::NULL,
            indices: [a, b, c, d],
        }
    }
}

/// A mesh of vertices and faces stored as a `POLYLINE` with flag 64
#[derive(Debug, Clone, PartialEq)]
pub struct PolyfaceMesh {
    pub common: EntityCommon,
    pub vertices: Vec<PolyfaceVertex>,
    pub faces: Vec<PolyfaceFace>,
    /// Handle of the terminating `SEQEND`
    pub seqend_handle: Handle,
}

impl PolyfaceMesh {
    /// Create an empty mesh
    pub fn new() -> Self {
        PolyfaceMesh {
            common: EntityCommon::new(),
            vertices: Vec::new(),
            faces: Vec::new(),
            seqend_handle: Handle::NULL,
        }
    }

    /// Create a mesh from vertex locations and faces
    pub fn from_parts(locations: impl IntoIterator<Item = Vector3>, faces: Vec<PolyfaceFace>) -> Self {
        PolyfaceMesh {
            vertices: locations.into_iter().map(PolyfaceVertex::new).collect(),
            faces,
            ..Self::new()
        }
    }
}

impl Default for PolyfaceMesh {
    fn default() -> Self {
        Self::new()
    }
}

impl_entity!(PolyfaceMesh, "POLYLINE");
