//! Viewport entity (paper space viewport)

use super::EntityCommon;
use crate::types::{Handle, Vector2, Vector3};
use bitflags::bitflags;

bitflags! {
    /// Viewport status flags (group code 90)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ViewportStatusFlags: i32 {
        const PERSPECTIVE = 0x1;
        const FRONT_CLIPPING = 0x2;
        const BACK_CLIPPING = 0x4;
        const UCS_FOLLOW = 0x8;
        const FRONT_CLIP_NOT_AT_EYE = 0x10;
        const UCS_ICON_VISIBLE = 0x20;
        const UCS_ICON_AT_ORIGIN = 0x40;
        const FAST_ZOOM = 0x80;
        const SNAP_ON = 0x100;
        const GRID_ON = 0x200;
        const ISOMETRIC_SNAP = 0x400;
        const HIDE_PLOT = 0x800;
        const ISO_PAIR_TOP = 0x1000;
        const ISO_PAIR_RIGHT = 0x2000;
        const ZOOM_LOCKING = 0x4000;
        const CURRENTLY_ALWAYS_ENABLED = 0x8000;
        const NON_RECTANGULAR_CLIPPING = 0x10000;
        const VIEWPORT_OFF = 0x20000;
    }
}

/// A window onto model space placed in a paper space layout
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub common: EntityCommon,
    /// Center in paper space
    pub center: Vector3,
    /// Width in paper space units
    pub width: f64,
    /// Height in paper space units
    pub height: f64,
    /// Status (group code 68): 0 off, positive = stacking order
    pub status: i16,
    /// Viewport id (group code 69); id 1 is the layout's own paper view
    pub id: i16,
    /// View center in model space (DCS)
    pub view_center: Vector2,
    pub snap_base: Vector2,
    pub snap_spacing: Vector2,
    pub grid_spacing: Vector2,
    /// View direction from target (in WCS)
    pub view_direction: Vector3,
    /// View target point (in WCS)
    pub view_target: Vector3,
    /// Perspective lens length
    pub lens_length: f64,
    pub front_clip_plane: f64,
    pub back_clip_plane: f64,
    /// Height of the model space view
    pub view_height: f64,
    /// Snap angle in radians
    pub snap_angle: f64,
    /// Twist angle in radians
    pub twist_angle: f64,
    /// Circle zoom percent
    pub circle_zoom: i16,
    pub flags: ViewportStatusFlags,
    /// Clipping boundary entity, when non-rectangular
    pub clip_boundary: Handle,
    /// Plot style sheet name
    pub style_sheet: String,
    /// Render mode (group code 281)
    pub render_mode: i16,
    /// UCS per viewport (group code 71)
    pub ucs_per_viewport: bool,
    /// UCS icon display (group code 74)
    pub ucs_icon_visible: bool,
    pub ucs_origin: Vector3,
    pub ucs_x_axis: Vector3,
    pub ucs_y_axis: Vector3,
    /// Orthographic type (group code 79)
    pub ortho_type: i16,
}

impl Viewport {
    /// Create a viewport with default view settings
    pub fn new() -> Self {
        Viewport {
            common: EntityCommon::new(),
            center: Vector3::ZERO,
            width: 297.0,
            height: 210.0,
            status: 1,
            id: 2,
            view_center: Vector2::ZERO,
            snap_base: Vector2::ZERO,
            snap_spacing: Vector2::new(10.0, 10.0),
            grid_spacing: Vector2::new(10.0, 10.0),
            view_direction: Vector3::UNIT_Z,
            view_target: Vector3::ZERO,
            lens_length: 50.0,
            front_clip_plane: 0.0,
            back_clip_plane: 0.0,
            view_height: 250.0,
            snap_angle: 0.0,
            twist_angle: 0.0,
            circle_zoom: 1000,
            flags: ViewportStatusFlags::UCS_ICON_VISIBLE
                | ViewportStatusFlags::FAST_ZOOM
                | ViewportStatusFlags::CURRENTLY_ALWAYS_ENABLED,
            clip_boundary: Handle::NULL,
            style_sheet: String::new(),
            render_mode: 0,
            ucs_per_viewport: true,
            ucs_icon_visible: false,
            ucs_origin: Vector3::ZERO,
            ucs_x_axis: Vector3::UNIT_X,
            ucs_y_axis: Vector3::UNIT_Y,
            ortho_type: 0,
        }
    }

    /// The paper view of a layout (id 1)
    pub fn paper_view(center: Vector3, width: f64, height: f64) -> Self {
        Viewport {
            center,
            width,
            height,
            id: 1,
            view_center: center.xy(),
            view_height: height,
            ..Self::new()
        }
    }

    /// Builder: set the model space view
    pub fn with_view(mut self, view_center: Vector2, view_height: f64) -> Self {
        self.view_center = view_center;
        self.view_height = view_height;
        self
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl_entity!(Viewport, "VIEWPORT");
