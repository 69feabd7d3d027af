//! DXF stream writer trait and common helpers

use crate::error::Result;
use crate::types::{Color, Handle, Vector2, Vector3};

/// Trait for writing DXF code/value pairs
///
/// Each call appends exactly one pair. No validation of the code against the
/// value type is done at this level.
pub trait DxfStreamWriter {
    /// Write a code/value pair with a string value
    fn write_string(&mut self, code: i32, value: &str) -> Result<()>;

    /// Write a code/value pair with a byte value (codes 280-289)
    fn write_byte(&mut self, code: i32, value: u8) -> Result<()>;

    fn write_i16(&mut self, code: i32, value: i16) -> Result<()>;

    fn write_i32(&mut self, code: i32, value: i32) -> Result<()>;

    fn write_i64(&mut self, code: i32, value: i64) -> Result<()>;

    fn write_double(&mut self, code: i32, value: f64) -> Result<()>;

    /// Write a code/value pair with a boolean value (codes 290-299)
    fn write_bool(&mut self, code: i32, value: bool) -> Result<()>;

    /// Write a handle as uppercase hex
    fn write_handle(&mut self, code: i32, handle: Handle) -> Result<()>;

    /// Write binary data
    fn write_binary(&mut self, code: i32, data: &[u8]) -> Result<()>;

    fn flush(&mut self) -> Result<()>;
}

/// Extension trait for convenient writing operations
pub trait DxfStreamWriterExt: DxfStreamWriter {
    /// Write a 2D point (codes 10/20 or similar)
    fn write_point2d(&mut self, x_code: i32, point: Vector2) -> Result<()> {
        self.write_double(x_code, point.x)?;
        self.write_double(x_code + 10, point.y)?;
        Ok(())
    }

    /// Write a 3D point (codes 10/20/30 or similar)
    fn write_point3d(&mut self, x_code: i32, point: Vector3) -> Result<()> {
        self.write_double(x_code, point.x)?;
        self.write_double(x_code + 10, point.y)?;
        self.write_double(x_code + 20, point.z)?;
        Ok(())
    }

    /// Write an extrusion direction (210/220/230)
    fn write_normal(&mut self, normal: Vector3) -> Result<()> {
        self.write_point3d(210, normal)
    }

    /// Write a color index; true colors are written as their approximation
    fn write_color(&mut self, code: i32, color: Color) -> Result<()> {
        self.write_i16(code, color.approximate_index())
    }

    /// Write a subclass marker
    fn write_subclass(&mut self, marker: &str) -> Result<()> {
        self.write_string(100, marker)
    }

    /// Write a boolean as a 16-bit integer (for codes that take 0/1 as i16)
    fn write_flag(&mut self, code: i32, value: bool) -> Result<()> {
        self.write_i16(code, value as i16)
    }

    /// Write an angle stored in radians as degrees
    fn write_angle(&mut self, code: i32, radians: f64) -> Result<()> {
        self.write_double(code, radians.to_degrees())
    }
}

// Auto-implement the extension trait for all stream writers
impl<T: DxfStreamWriter + ?Sized> DxfStreamWriterExt for T {}
