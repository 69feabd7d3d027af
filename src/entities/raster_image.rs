//! RasterImage entity implementation.
//!
//! The RasterImage entity displays an external raster image file
//! (BMP, JPEG, PNG, TIFF, etc.) within a drawing. The file itself is
//! described by an [`ImageDefinition`](crate::objects::ImageDefinition)
//! object.

use super::EntityCommon;
use crate::types::{Handle, Vector2, Vector3};
use bitflags::bitflags;

// ============================================================================
// Enums
// ============================================================================

/// Clipping boundary type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum ClipType {
    /// Rectangular clipping (two opposite corners).
    #[default]
    Rectangular = 1,
    /// Polygonal clipping (three or more vertices).
    Polygonal = 2,
}

impl From<i16> for ClipType {
    fn from(value: i16) -> Self {
        match value {
            2 => Self::Polygonal,
            _ => Self::Rectangular,
        }
    }
}

// ============================================================================
// Bitflags
// ============================================================================

bitflags! {
    /// Image display flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ImageDisplayFlags: i16 {
        /// Show image.
        const SHOW_IMAGE = 1;
        /// Show image when not aligned with screen.
        const SHOW_NOT_ALIGNED = 2;
        /// Use clipping boundary.
        const USE_CLIPPING_BOUNDARY = 4;
        /// Transparency is on.
        const TRANSPARENCY_ON = 8;
    }
}

// ============================================================================
// RasterImage
// ============================================================================

/// Raster image entity.
///
/// The placement is given by its lower-left corner, its size in drawing
/// units and a rotation in the plane of `normal`. The writer derives the
/// DXF pixel vectors from these and from the definition's pixel size.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub common: EntityCommon,
    /// Lower-left corner (in WCS)
    pub position: Vector3,
    /// Width in drawing units
    pub width: f64,
    /// Height in drawing units
    pub height: f64,
    /// Rotation in radians
    pub rotation: f64,
    pub normal: Vector3,
    /// Image definition object
    pub definition: Handle,
    /// Reactor linking the definition back to this image
    pub definition_reactor: Handle,
    pub display_flags: ImageDisplayFlags,
    /// Clipping enabled
    pub clipping: bool,
    /// Brightness (0-100)
    pub brightness: u8,
    /// Contrast (0-100)
    pub contrast: u8,
    /// Fade (0-100)
    pub fade: u8,
    pub clip_type: ClipType,
    /// Clip boundary vertices in pixel coordinates
    pub clip_vertices: Vec<Vector2>,
}

impl RasterImage {
    /// Creates an image placed at `position` with the given size.
    pub fn new(definition: Handle, position: Vector3, width: f64, height: f64) -> Self {
        Self {
            common: EntityCommon::new(),
            position,
            width,
            height,
            rotation: 0.0,
            normal: Vector3::UNIT_Z,
            definition,
            definition_reactor: Handle::NULL,
            display_flags: ImageDisplayFlags::SHOW_IMAGE | ImageDisplayFlags::SHOW_NOT_ALIGNED,
            clipping: false,
            brightness: 50,
            contrast: 50,
            fade: 0,
            clip_type: ClipType::Rectangular,
            clip_vertices: Vec::new(),
        }
    }

    /// Sets the rotation (radians).
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Clip boundary to write, defaulting to the full image rectangle.
    pub fn clip_boundary(&self, pixel_size: Vector2) -> Vec<Vector2> {
        if self.clip_vertices.is_empty() {
            vec![
                Vector2::new(-0.5, -0.5),
                Vector2::new(pixel_size.x - 0.5, pixel_size.y - 0.5),
            ]
        } else {
            self.clip_vertices.clone()
        }
    }
}

impl_entity!(RasterImage, "IMAGE");
