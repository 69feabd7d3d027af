//! View table entry

use crate::types::{Handle, Vector2, Vector3};
use crate::xdata::ExtendedData;

/// A named view
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    /// Unique handle
    pub handle: Handle,
    /// View name
    pub name: String,
    /// Standard flags (group code 70)
    pub flags: i16,
    /// View center in DCS
    pub center: Vector2,
    pub height: f64,
    pub width: f64,
    /// View direction from target
    pub direction: Vector3,
    pub target: Vector3,
    pub lens_length: f64,
    pub front_clip: f64,
    pub back_clip: f64,
    /// Twist angle in radians
    pub twist_angle: f64,
    /// View mode (VIEWMODE)
    pub view_mode: i16,
    pub extended_data: ExtendedData,
}

impl View {
    /// Create a new view
    pub fn new(name: impl Into<String>) -> Self {
        View {
            handle: Handle::NULL,
            name: name.into(),
            flags: 0,
            center: Vector2::ZERO,
            height: 1.0,
            width: 1.0,
            direction: Vector3::UNIT_Z,
            target: Vector3::ZERO,
            lens_length: 50.0,
            front_clip: 0.0,
            back_clip: 0.0,
            twist_angle: 0.0,
            view_mode: 0,
            extended_data: ExtendedData::new(),
        }
    }

    /// Builder: set center and size
    pub fn with_window(mut self, center: Vector2, width: f64, height: f64) -> Self {
        self.center = center;
        self.width = width;
        self.height = height;
        self
    }
}

impl_table_entry!(View);
