//! ASCII DXF writer

use super::number_format::NumberFormat;
use super::stream_writer::DxfStreamWriter;
use crate::error::Result;
use crate::types::Handle;
use encoding_rs::Encoding;
use std::borrow::Cow;
use std::io::Write;

/// ASCII DXF stream writer
///
/// Every pair is two CRLF-terminated lines: the code right-aligned in three
/// columns, then the value.
pub struct DxfTextWriter<W: Write> {
    writer: W,
    number_format: NumberFormat,
    /// Single-byte code page for pre-2007 files; `None` writes UTF-8
    encoding: Option<&'static Encoding>,
}

impl<W: Write> DxfTextWriter<W> {
    /// Create a UTF-8 writer
    pub fn new(writer: W, number_format: NumberFormat) -> Self {
        Self {
            writer,
            number_format,
            encoding: None,
        }
    }

    /// Encode strings with a code page instead of UTF-8
    pub fn with_encoding(mut self, encoding: Option<&'static Encoding>) -> Self {
        self.encoding = encoding.filter(|e| *e != encoding_rs::UTF_8);
        self
    }

    fn write_code(&mut self, code: i32) -> Result<()> {
        write!(self.writer, "{:>3}\r\n", code)?;
        Ok(())
    }

    fn write_line(&mut self, value: &str) -> Result<()> {
        let escaped = escape_control_characters(value);
        match self.encoding {
            Some(encoding) => {
                let (bytes, _, _) = encoding.encode(&escaped);
                self.writer.write_all(&bytes)?;
            }
            None => self.writer.write_all(escaped.as_bytes())?,
        }
        self.writer.write_all(b"\r\n")?;
        Ok(())
    }

    /// Get the inner writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Escape characters that would break the line structure
///
/// `^` becomes `^ `, line feed `^J` and carriage return `^M`.
fn escape_control_characters(value: &str) -> Cow<'_, str> {
    if !value.contains(['^', '\n', '\r']) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        match c {
            '^' => escaped.push_str("^ "),
            '\n' => escaped.push_str("^J"),
            '\r' => escaped.push_str("^M"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

impl<W: Write> DxfStreamWriter for DxfTextWriter<W> {
    fn write_string(&mut self, code: i32, value: &str) -> Result<()> {
        self.write_code(code)?;
        self.write_line(value)
    }

    fn write_byte(&mut self, code: i32, value: u8) -> Result<()> {
        self.write_code(code)?;
        write!(self.writer, "{}\r\n", value)?;
        Ok(())
    }

    fn write_i16(&mut self, code: i32, value: i16) -> Result<()> {
        self.write_code(code)?;
        write!(self.writer, "{}\r\n", value)?;
        Ok(())
    }

    fn write_i32(&mut self, code: i32, value: i32) -> Result<()> {
        self.write_code(code)?;
        write!(self.writer, "{}\r\n", value)?;
        Ok(())
    }

    fn write_i64(&mut self, code: i32, value: i64) -> Result<()> {
        self.write_code(code)?;
        write!(self.writer, "{}\r\n", value)?;
        Ok(())
    }

    fn write_double(&mut self, code: i32, value: f64) -> Result<()> {
        self.write_code(code)?;
        let text = self.number_format.format(value);
        write!(self.writer, "{}\r\n", text)?;
        Ok(())
    }

    fn write_bool(&mut self, code: i32, value: bool) -> Result<()> {
        self.write_code(code)?;
        write!(self.writer, "{}\r\n", value as u8)?;
        Ok(())
    }

    fn write_handle(&mut self, code: i32, handle: Handle) -> Result<()> {
        self.write_code(code)?;
        write!(self.writer, "{:X}\r\n", handle.value())?;
        Ok(())
    }

    fn write_binary(&mut self, code: i32, data: &[u8]) -> Result<()> {
        self.write_code(code)?;
        for byte in data {
            write!(self.writer, "{:02X}", byte)?;
        }
        self.writer.write_all(b"\r\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::stream_writer::DxfStreamWriterExt;
    use super::*;
    use crate::types::Vector3;

    fn written(f: impl FnOnce(&mut DxfTextWriter<&mut Vec<u8>>)) -> String {
        let mut buf = Vec::new();
        {
            let mut writer = DxfTextWriter::new(&mut buf, NumberFormat::INVARIANT);
            f(&mut writer);
        }
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_write_string() {
        let output = written(|w| w.write_string(0, "LINE").unwrap());
        assert_eq!(output, "  0\r\nLINE\r\n");
    }

    #[test]
    fn test_write_code_formatting() {
        let output = written(|w| {
            w.write_i16(5, 100).unwrap();
            w.write_i16(62, 7).unwrap();
            w.write_i16(100, 1).unwrap();
            w.write_string(1001, "ACAD").unwrap();
        });
        assert!(output.starts_with("  5\r\n100\r\n"));
        assert!(output.contains(" 62\r\n7\r\n"));
        assert!(output.contains("100\r\n1\r\n"));
        assert!(output.ends_with("1001\r\nACAD\r\n"));
    }

    #[test]
    fn test_write_point3d() {
        let output = written(|w| w.write_point3d(10, Vector3::new(1.0, 2.5, 3.0)).unwrap());
        assert_eq!(output, " 10\r\n1.0\r\n 20\r\n2.5\r\n 30\r\n3.0\r\n");
    }

    #[test]
    fn test_write_handle() {
        let output = written(|w| w.write_handle(5, Handle::new(255)).unwrap());
        assert_eq!(output, "  5\r\nFF\r\n");
    }

    #[test]
    fn test_escapes_line_breaks_and_caret() {
        let output = written(|w| w.write_string(1, "a^b\nc").unwrap());
        assert_eq!(output, "  1\r\na^ b^Jc\r\n");
    }

    #[test]
    fn test_fixed_number_format() {
        let mut buf = Vec::new();
        {
            let mut writer = DxfTextWriter::new(&mut buf, NumberFormat::fixed(2));
            writer.write_double(40, 1.0 / 3.0).unwrap();
        }
        assert_eq!(String::from_utf8(buf).unwrap(), " 40\r\n0.33\r\n");
    }

    #[test]
    fn test_code_page_encoding() {
        let mut buf = Vec::new();
        {
            let mut writer = DxfTextWriter::new(&mut buf, NumberFormat::INVARIANT)
                .with_encoding(Some(encoding_rs::WINDOWS_1252));
            writer.write_string(1, "é").unwrap();
        }
        assert_eq!(buf, b"  1\r\n\xE9\r\n");
    }
}
