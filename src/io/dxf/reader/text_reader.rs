//! DXF ASCII text reader

use super::stream_reader::{DxfCodePair, DxfStreamReader};
use crate::error::{DxfError, Result};
use crate::io::dxf::GroupCodeValueType;
use encoding_rs::Encoding;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};

/// DXF ASCII text file reader
pub struct DxfTextReader<R: Read + Seek> {
    reader: BufReader<R>,
    line_number: usize,
    peeked_pair: Option<DxfCodePair>,
    /// Non-UTF8 fallback encoding.  `None` means use Latin-1 (byte-to-char).
    encoding: Option<&'static Encoding>,
    buffer: Vec<u8>,
}

impl<R: Read + Seek> DxfTextReader<R> {
    /// Create a new DXF text reader
    pub fn new(reader: BufReader<R>) -> Self {
        Self {
            reader,
            line_number: 0,
            peeked_pair: None,
            encoding: None,
            buffer: Vec::with_capacity(256),
        }
    }

    /// Read a single line without its line terminator.
    /// Uses the configured encoding for fallback, or Latin-1 if none set.
    fn read_line(&mut self) -> Result<Option<String>> {
        self.buffer.clear();
        if self.reader.read_until(b'\n', &mut self.buffer)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        while matches!(self.buffer.last(), Some(b'\n' | b'\r')) {
            self.buffer.pop();
        }

        let line = match std::str::from_utf8(&self.buffer) {
            Ok(s) => s.to_string(),
            Err(_) => match self.encoding {
                Some(enc) => enc.decode(&self.buffer).0.into_owned(),
                // Latin-1 is a 1:1 mapping of bytes 0-255 to Unicode code points
                None => self.buffer.iter().map(|&b| b as char).collect(),
            },
        };
        Ok(Some(line))
    }

    /// Read a code/value pair from the stream
    fn read_pair_internal(&mut self) -> Result<Option<DxfCodePair>> {
        let code_line = match self.read_line()? {
            Some(line) => line,
            None => return Ok(None),
        };
        let code = code_line.trim().parse::<i32>().map_err(|_| {
            DxfError::Parse(format!(
                "invalid group code at line {}: '{}'",
                self.line_number, code_line
            ))
        })?;

        let value_line = self.read_line()?.ok_or_else(|| {
            DxfError::Parse(format!(
                "unexpected end of file after code {} at line {}",
                code, self.line_number
            ))
        })?;

        let pair = match GroupCodeValueType::from_code(code) {
            GroupCodeValueType::String => DxfCodePair::new(code, unescape_control(&value_line)),
            _ => DxfCodePair::new(code, value_line),
        };
        if pair.is_malformed() {
            return Err(DxfError::Parse(format!(
                "invalid value for code {} at line {}: '{}'",
                code, self.line_number, pair.value_string
            )));
        }
        Ok(Some(pair))
    }
}

/// Undo the `^J`, `^M`, `^I` and `^ ` escapes of string values
fn unescape_control(value: &str) -> String {
    if !value.contains('^') {
        return value.to_string();
    }
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '^' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('J') => result.push('\n'),
            Some('M') => result.push('\r'),
            Some('I') => result.push('\t'),
            Some(' ') => result.push('^'),
            Some(other) => {
                result.push('^');
                result.push(other);
            }
            None => result.push('^'),
        }
    }
    result
}

impl<R: Read + Seek> DxfStreamReader for DxfTextReader<R> {
    fn read_pair(&mut self) -> Result<Option<DxfCodePair>> {
        if let Some(pair) = self.peeked_pair.take() {
            return Ok(Some(pair));
        }
        self.read_pair_internal()
    }

    fn peek_code(&mut self) -> Result<Option<i32>> {
        if let Some(ref pair) = self.peeked_pair {
            return Ok(Some(pair.code));
        }
        match self.read_pair_internal()? {
            Some(pair) => {
                let code = pair.code;
                self.peeked_pair = Some(pair);
                Ok(Some(code))
            }
            None => Ok(None),
        }
    }

    fn push_back(&mut self, pair: DxfCodePair) {
        self.peeked_pair = Some(pair);
    }

    fn reset(&mut self) -> Result<()> {
        self.reader.seek(SeekFrom::Start(0))?;
        self.line_number = 0;
        self.peeked_pair = None;
        Ok(())
    }

    fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.encoding = Some(encoding);
    }
}
