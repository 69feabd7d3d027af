//! Binary DXF writer

use super::stream_writer::DxfStreamWriter;
use crate::error::Result;
use crate::io::dxf::BINARY_SENTINEL;
use crate::types::Handle;
use byteorder::{LittleEndian, WriteBytesExt};
use encoding_rs::Encoding;
use std::io::Write;

/// Largest chunk written under one binary code
const MAX_CHUNK: usize = 127;

/// Binary DXF stream writer
///
/// Codes are little-endian 16-bit integers; the value width follows the
/// group code value type.
pub struct DxfBinaryWriter<W: Write> {
    writer: W,
    encoding: Option<&'static Encoding>,
}

impl<W: Write> DxfBinaryWriter<W> {
    /// Create a new binary DXF writer; the sentinel is written immediately
    pub fn new(mut writer: W) -> Result<Self> {
        writer.write_all(BINARY_SENTINEL)?;
        Ok(Self {
            writer,
            encoding: None,
        })
    }

    /// Encode strings with a code page instead of UTF-8
    pub fn with_encoding(mut self, encoding: Option<&'static Encoding>) -> Self {
        self.encoding = encoding.filter(|e| *e != encoding_rs::UTF_8);
        self
    }

    fn write_code(&mut self, code: i32) -> Result<()> {
        self.writer.write_i16::<LittleEndian>(code as i16)?;
        Ok(())
    }

    /// Write a NUL-terminated string
    fn write_null_string(&mut self, value: &str) -> Result<()> {
        match self.encoding {
            Some(encoding) => {
                let (bytes, _, _) = encoding.encode(value);
                self.writer.write_all(&bytes)?;
            }
            None => self.writer.write_all(value.as_bytes())?,
        }
        self.writer.write_u8(0)?;
        Ok(())
    }

    /// Get the inner writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DxfStreamWriter for DxfBinaryWriter<W> {
    fn write_string(&mut self, code: i32, value: &str) -> Result<()> {
        self.write_code(code)?;
        self.write_null_string(value)
    }

    fn write_byte(&mut self, code: i32, value: u8) -> Result<()> {
        self.write_code(code)?;
        // Codes 280-289 are stored as 16-bit integers
        self.writer.write_i16::<LittleEndian>(value as i16)?;
        Ok(())
    }

    fn write_i16(&mut self, code: i32, value: i16) -> Result<()> {
        self.write_code(code)?;
        self.writer.write_i16::<LittleEndian>(value)?;
        Ok(())
    }

    fn write_i32(&mut self, code: i32, value: i32) -> Result<()> {
        self.write_code(code)?;
        self.writer.write_i32::<LittleEndian>(value)?;
        Ok(())
    }

    fn write_i64(&mut self, code: i32, value: i64) -> Result<()> {
        self.write_code(code)?;
        self.writer.write_i64::<LittleEndian>(value)?;
        Ok(())
    }

    fn write_double(&mut self, code: i32, value: f64) -> Result<()> {
        self.write_code(code)?;
        self.writer.write_f64::<LittleEndian>(value)?;
        Ok(())
    }

    fn write_bool(&mut self, code: i32, value: bool) -> Result<()> {
        self.write_code(code)?;
        self.writer.write_u8(value as u8)?;
        Ok(())
    }

    fn write_handle(&mut self, code: i32, handle: Handle) -> Result<()> {
        self.write_code(code)?;
        // Handles stay hex strings in binary files
        let hex = format!("{:X}", handle.value());
        self.write_null_string(&hex)
    }

    fn write_binary(&mut self, code: i32, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            self.write_code(code)?;
            self.writer.write_u8(0)?;
            return Ok(());
        }
        for chunk in data.chunks(MAX_CHUNK) {
            self.write_code(code)?;
            self.writer.write_u8(chunk.len() as u8)?;
            self.writer.write_all(chunk)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
