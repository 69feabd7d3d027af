//! Viewport configuration table entry

use crate::types::{Handle, Vector2, Vector3};
use crate::xdata::ExtendedData;

/// A tiled viewport configuration
#[derive(Debug, Clone, PartialEq)]
pub struct VPort {
    /// Unique handle
    pub handle: Handle,
    /// Configuration name ("*Active" for the current one)
    pub name: String,
    /// Standard flags (group code 70)
    pub flags: i16,
    pub lower_left: Vector2,
    pub upper_right: Vector2,
    pub view_center: Vector2,
    pub snap_base: Vector2,
    pub snap_spacing: Vector2,
    pub grid_spacing: Vector2,
    pub view_direction: Vector3,
    pub view_target: Vector3,
    pub view_height: f64,
    pub aspect_ratio: f64,
    pub lens_length: f64,
    pub front_clip: f64,
    pub back_clip: f64,
    /// Snap rotation angle in radians
    pub snap_rotation: f64,
    /// View twist angle in radians
    pub twist_angle: f64,
    pub view_mode: i16,
    pub circle_zoom_percent: i16,
    pub fast_zoom: bool,
    pub ucs_icon: i16,
    pub snap_on: bool,
    pub grid_on: bool,
    pub snap_style: i16,
    pub snap_isopair: i16,
    pub extended_data: ExtendedData,
}

impl VPort {
    /// Create a new viewport configuration
    pub fn new(name: impl Into<String>) -> Self {
        VPort {
            handle: Handle::NULL,
            name: name.into(),
            flags: 0,
            lower_left: Vector2::ZERO,
            upper_right: Vector2::new(1.0, 1.0),
            view_center: Vector2::ZERO,
            snap_base: Vector2::ZERO,
            snap_spacing: Vector2::new(0.5, 0.5),
            grid_spacing: Vector2::new(0.5, 0.5),
            view_direction: Vector3::UNIT_Z,
            view_target: Vector3::ZERO,
            view_height: 10.0,
            aspect_ratio: 1.0,
            lens_length: 50.0,
            front_clip: 0.0,
            back_clip: 0.0,
            snap_rotation: 0.0,
            twist_angle: 0.0,
            view_mode: 0,
            circle_zoom_percent: 1000,
            fast_zoom: true,
            ucs_icon: 3,
            snap_on: false,
            grid_on: false,
            snap_style: 0,
            snap_isopair: 0,
            extended_data: ExtendedData::new(),
        }
    }

    /// Create the "*Active" viewport configuration
    pub fn active() -> Self {
        Self::new("*Active")
    }
}

impl_table_entry!(VPort, |entry: &VPort| entry.name.eq_ignore_ascii_case("*Active"));
