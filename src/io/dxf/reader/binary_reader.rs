//! Binary DXF reader

use super::stream_reader::{DxfCodePair, DxfStreamReader};
use crate::error::{DxfError, Result};
use crate::io::dxf::{GroupCodeValueType, BINARY_SENTINEL};
use byteorder::{LittleEndian, ReadBytesExt};
use encoding_rs::Encoding;
use std::io::{BufRead, BufReader, ErrorKind, Read, Seek, SeekFrom};

/// Binary DXF stream reader
///
/// Mirrors the binary writer: 16-bit codes, NUL-terminated strings and
/// handles, length-prefixed chunks, and fixed-width numbers.
pub struct DxfBinaryReader<R: Read + Seek> {
    reader: BufReader<R>,
    peeked_pair: Option<DxfCodePair>,
    encoding: Option<&'static Encoding>,
}

impl<R: Read + Seek> DxfBinaryReader<R> {
    /// Create a reader and consume the sentinel
    pub fn new(reader: BufReader<R>) -> Result<Self> {
        let mut reader = Self {
            reader,
            peeked_pair: None,
            encoding: None,
        };
        reader.skip_sentinel()?;
        Ok(reader)
    }

    fn skip_sentinel(&mut self) -> Result<()> {
        self.reader.seek(SeekFrom::Start(0))?;
        let mut sentinel = [0u8; BINARY_SENTINEL.len()];
        self.reader.read_exact(&mut sentinel)?;
        if sentinel != BINARY_SENTINEL {
            return Err(DxfError::Parse("missing binary DXF sentinel".to_string()));
        }
        Ok(())
    }

    fn read_null_string(&mut self) -> Result<String> {
        let mut bytes = Vec::new();
        self.reader.read_until(0, &mut bytes)?;
        if bytes.pop() != Some(0) {
            return Err(DxfError::Parse("unterminated string in binary DXF".to_string()));
        }
        let text = match std::str::from_utf8(&bytes) {
            Ok(s) => s.to_string(),
            Err(_) => match self.encoding {
                Some(enc) => enc.decode(&bytes).0.into_owned(),
                None => String::from_utf8_lossy(&bytes).into_owned(),
            },
        };
        Ok(text)
    }

    fn read_pair_internal(&mut self) -> Result<Option<DxfCodePair>> {
        let code = match self.reader.read_i16::<LittleEndian>() {
            Ok(code) => code as i32,
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let pair = match GroupCodeValueType::from_code(code) {
            GroupCodeValueType::String | GroupCodeValueType::Handle => {
                DxfCodePair::new(code, self.read_null_string()?)
            }
            GroupCodeValueType::Double => {
                DxfCodePair::from_double(code, self.reader.read_f64::<LittleEndian>()?)
            }
            GroupCodeValueType::Int16 | GroupCodeValueType::Byte => {
                DxfCodePair::from_int(code, self.reader.read_i16::<LittleEndian>()? as i64)
            }
            GroupCodeValueType::Int32 => {
                DxfCodePair::from_int(code, self.reader.read_i32::<LittleEndian>()? as i64)
            }
            GroupCodeValueType::Int64 => {
                DxfCodePair::from_int(code, self.reader.read_i64::<LittleEndian>()?)
            }
            GroupCodeValueType::Bool => DxfCodePair::from_bool(code, self.reader.read_u8()? != 0),
            GroupCodeValueType::Chunk => {
                let length = self.reader.read_u8()? as usize;
                let mut data = vec![0u8; length];
                self.reader.read_exact(&mut data)?;
                DxfCodePair::from_bytes(code, &data)
            }
            GroupCodeValueType::Unknown => return Err(DxfError::InvalidDxfCode(code)),
        };
        Ok(Some(pair))
    }
}

impl<R: Read + Seek> DxfStreamReader for DxfBinaryReader<R> {
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
        self.peeked_pair = None;
        self.skip_sentinel()
    }

    fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.encoding = Some(encoding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::dxf::{DxfBinaryWriter, DxfStreamWriter};
    use crate::types::Handle;
    use std::io::Cursor;

    fn open(bytes: Vec<u8>) -> DxfBinaryReader<Cursor<Vec<u8>>> {
        DxfBinaryReader::new(BufReader::new(Cursor::new(bytes))).unwrap()
    }

    #[test]
    fn test_reads_what_the_writer_wrote() {
        let mut buf = Vec::new();
        {
            let mut writer = DxfBinaryWriter::new(&mut buf).unwrap();
            writer.write_string(0, "SECTION").unwrap();
            writer.write_handle(5, Handle::new(0x2A)).unwrap();
            writer.write_double(10, 1.5).unwrap();
            writer.write_i16(70, -3).unwrap();
            writer.write_byte(280, 1).unwrap();
            writer.write_i32(90, 70000).unwrap();
            writer.write_bool(290, true).unwrap();
            writer.write_binary(310, &[1, 2, 3]).unwrap();
        }
        let mut reader = open(buf);
        assert_eq!(reader.read_pair().unwrap().unwrap().as_str(), "SECTION");
        assert_eq!(reader.read_pair().unwrap().unwrap().as_handle(), Handle::new(0x2A));
        assert_eq!(reader.read_pair().unwrap().unwrap().as_double(), 1.5);
        assert_eq!(reader.read_pair().unwrap().unwrap().as_i16(), -3);
        assert_eq!(reader.read_pair().unwrap().unwrap().as_i16(), 1);
        assert_eq!(reader.read_pair().unwrap().unwrap().as_i32(), 70000);
        assert!(reader.read_pair().unwrap().unwrap().as_bool());
        assert_eq!(reader.read_pair().unwrap().unwrap().as_bytes(), vec![1, 2, 3]);
        assert!(reader.read_pair().unwrap().is_none());
    }

    #[test]
    fn test_reset_returns_to_first_pair() {
        let mut buf = Vec::new();
        {
            let mut writer = DxfBinaryWriter::new(&mut buf).unwrap();
            writer.write_string(0, "SECTION").unwrap();
            writer.write_string(2, "HEADER").unwrap();
        }
        let mut reader = open(buf);
        assert_eq!(reader.peek_code().unwrap(), Some(0));
        reader.read_pair().unwrap();
        reader.read_pair().unwrap();
        reader.reset().unwrap();
        assert_eq!(reader.read_pair().unwrap().unwrap().as_str(), "SECTION");
    }

    #[test]
    fn test_missing_sentinel() {
        let result = DxfBinaryReader::new(BufReader::new(Cursor::new(b"  0\r\nSECTION\r\n".to_vec())));
        assert!(result.is_err());
    }
}
