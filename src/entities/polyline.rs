//! 2D (heavy) polyline entity

use super::EntityCommon;
use crate::types::{Handle, Vector2, Vector3};
use bitflags::bitflags;

bitflags! {
    /// Polyline flags (group code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PolylineFlags: i16 {
        const CLOSED = 1;
        const CURVE_FIT = 2;
        const SPLINE_FIT = 4;
        const POLYLINE_3D = 8;
        const POLYGON_MESH = 16;
        const CLOSED_N = 32;
        const POLYFACE_MESH = 64;
        const CONTINUOUS_LINETYPE = 128;
    }
}

bitflags! {
    /// Vertex flags (group code 70 on `VERTEX`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct VertexFlags: i16 {
        const EXTRA_VERTEX = 1;
        const CURVE_FIT_TANGENT = 2;
        const SPLINE_VERTEX = 8;
        const SPLINE_FRAME_CONTROL = 16;
        const POLYLINE_3D_VERTEX = 32;
        const POLYGON_MESH_VERTEX = 64;
        const POLYFACE_MESH_VERTEX = 128;
    }
}

/// A vertex of a 2D polyline, written as its own `VERTEX` record
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex2D {
    /// Handle of the `VERTEX` record
    pub handle: Handle,
    /// Location (in OCS)
    pub location: Vector2,
    /// Start width
    pub start_width: f64,
    /// End width
    pub end_width: f64,
    /// Bulge
    pub bulge: f64,
    /// Vertex flags
    pub flags: VertexFlags,
}

impl Vertex2D {
    /// Create a straight vertex
    pub fn new(location: Vector2) -> Self {
        Vertex2D {
            handle: Handle::NULL,
            location,
            start_width: 0.0,
            end_width: 0.0,
            bulge: 0.0,
            flags: VertexFlags::empty(),
        }
    }

    /// Create a vertex starting an arc segment
    pub fn with_bulge(location: Vector2, bulge: f64) -> Self {
        Vertex2D {
            bulge,
            ..Self::new(location)
        }
    }
}

/// A 2D polyline made of `VERTEX` sub-entities terminated by `SEQEND`
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline2D {
    pub common: EntityCommon,
    /// Vertices
    pub vertices: Vec<Vertex2D>,
    /// Polyline flags
    pub flags: PolylineFlags,
    /// Default start width
    pub start_width: f64,
    /// Default end width
    pub end_width: f64,
    /// Elevation along the normal
    pub elevation: f64,
    /// Thickness
    pub thickness: f64,
    /// Normal vector
    pub normal: Vector3,
    /// Handle of the terminating `SEQEND`
    pub seqend_handle: Handle,
}

impl Polyline2D {
    /// Create an empty polyline
    pub fn new() -> Self {
        Polyline2D {
            common: EntityCommon::new(),
            vertices: Vec::new(),
            flags: PolylineFlags::empty(),
            start_width: 0.0,
            end_width: 0.0,
            elevation: 0.0,
            thickness: 0.0,
            normal: Vector3::UNIT_Z,
            seqend_handle: Handle::NULL,
        }
    }

    /// Create a polyline through straight vertices
    pub fn from_points(points: impl IntoIterator<Item = Vector2>, closed: bool) -> Self {
        let mut polyline = Self::new();
        polyline.vertices = points.into_iter().map(Vertex2D::new).collect();
        polyline.flags.set(PolylineFlags::CLOSED, closed);
        polyline
    }

    /// Check if the polyline is closed
    pub fn is_closed(&self) -> bool {
        self.flags.contains(PolylineFlags::CLOSED)
    }
}

impl Default for Polyline2D {
    fn default() -> Self {
        Self::new()
    }
}

impl_entity!(Polyline2D, "POLYLINE");
