//! User coordinate system table entry

use crate::types::{Handle, Vector3};
use crate::xdata::ExtendedData;

/// A named user coordinate system
#[derive(Debug, Clone, PartialEq)]
pub struct Ucs {
    /// Unique handle
    pub handle: Handle,
    /// UCS name
    pub name: String,
    /// Standard flags (group code 70)
    pub flags: i16,
    pub origin: Vector3,
    pub x_axis: Vector3,
    pub y_axis: Vector3,
    pub elevation: f64,
    pub extended_data: ExtendedData,
}

impl Ucs {
    /// Create a new UCS aligned with the world axes
    pub fn new(name: impl Into<String>) -> Self {
        Ucs {
            handle: Handle::NULL,
            name: name.into(),
            flags: 0,
            origin: Vector3::ZERO,
            x_axis: Vector3::UNIT_X,
            y_axis: Vector3::UNIT_Y,
            elevation: 0.0,
            extended_data: ExtendedData::new(),
        }
    }

    /// Create a UCS from an origin and two axes
    pub fn from_origin_axes(
        name: impl Into<String>,
        origin: Vector3,
        x_axis: Vector3,
        y_axis: Vector3,
    ) -> Self {
        Ucs {
            origin,
            x_axis: x_axis.normalize(),
            y_axis: y_axis.normalize(),
            ..Self::new(name)
        }
    }

    pub fn z_axis(&self) -> Vector3 {
        self.x_axis.cross(&self.y_axis).normalize()
    }
}

impl_table_entry!(Ucs);
