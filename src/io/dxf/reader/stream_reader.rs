//! DXF stream reader trait and common types

use crate::error::Result;
use crate::io::dxf::GroupCodeValueType;
use crate::types::{Handle, Vector2, Vector3};
use encoding_rs::Encoding;

/// A DXF code/value pair
#[derive(Debug, Clone, PartialEq)]
pub struct DxfCodePair {
    /// The DXF group code
    pub code: i32,

    /// The value type fixed by the code
    pub value_type: GroupCodeValueType,

    /// String representation of the value
    pub value_string: String,

    /// Integer value (if applicable)
    pub value_int: Option<i64>,

    /// Floating-point value (if applicable)
    pub value_double: Option<f64>,

    /// Boolean value (if applicable)
    pub value_bool: Option<bool>,
}

impl DxfCodePair {
    /// Create a pair from its text representation
    ///
    /// Numeric values that fail to parse are left as `None`; text readers
    /// check [`DxfCodePair::is_malformed`] to report them.
    pub fn new(code: i32, value_string: String) -> Self {
        let value_type = GroupCodeValueType::from_code(code);
        let trimmed = value_string.trim();

        let value_int = if value_type.is_integer() {
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|v| v as i64))
        } else {
            None
        };
        let value_double = match value_type {
            GroupCodeValueType::Double => trimmed.parse::<f64>().ok(),
            _ => None,
        };
        let value_bool = match value_type {
            GroupCodeValueType::Bool => trimmed.parse::<i32>().ok().map(|v| v != 0),
            _ => None,
        };

        Self {
            code,
            value_type,
            value_string,
            value_int,
            value_double,
            value_bool,
        }
    }

    /// Pair holding an integer read from a binary stream
    pub fn from_int(code: i32, value: i64) -> Self {
        Self {
            code,
            value_type: GroupCodeValueType::from_code(code),
            value_string: value.to_string(),
            value_int: Some(value),
            value_double: None,
            value_bool: None,
        }
    }

    /// Pair holding a double read from a binary stream
    pub fn from_double(code: i32, value: f64) -> Self {
        Self {
            code,
            value_type: GroupCodeValueType::from_code(code),
            value_string: value.to_string(),
            value_int: None,
            value_double: Some(value),
            value_bool: None,
        }
    }

    /// Pair holding a boolean read from a binary stream
    pub fn from_bool(code: i32, value: bool) -> Self {
        Self {
            code,
            value_type: GroupCodeValueType::from_code(code),
            value_string: (value as u8).to_string(),
            value_int: None,
            value_double: None,
            value_bool: Some(value),
        }
    }

    /// Pair holding a binary chunk; stored as uppercase hex like text files
    pub fn from_bytes(code: i32, bytes: &[u8]) -> Self {
        let hex: String = bytes.iter().map(|b| format!("{:02X}", b)).collect();
        Self::new(code, hex)
    }

    /// Whether a numeric value could not be parsed
    pub fn is_malformed(&self) -> bool {
        match self.value_type {
            GroupCodeValueType::Double => self.value_double.is_none(),
            GroupCodeValueType::Bool => self.value_bool.is_none(),
            t if t.is_integer() => self.value_int.is_none(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value_string
    }

    /// Get value as i16, 0 when not an integer
    pub fn as_i16(&self) -> i16 {
        self.value_int
            .and_then(|v| i16::try_from(v).ok())
            .unwrap_or_default()
    }

    /// Get value as i32, 0 when not an integer
    pub fn as_i32(&self) -> i32 {
        self.value_int
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or_default()
    }

    /// Get value as double; integers are widened
    pub fn as_double(&self) -> f64 {
        self.value_double
            .or_else(|| self.value_int.map(|v| v as f64))
            .unwrap_or_default()
    }

    /// Get value as an angle in radians, converting from the stored degrees
    pub fn as_angle(&self) -> f64 {
        self.as_double().to_radians()
    }

    /// Get value as boolean; integer flags count as true when non-zero
    pub fn as_bool(&self) -> bool {
        self.value_bool
            .or_else(|| self.value_int.map(|v| v != 0))
            .unwrap_or(false)
    }

    /// Get value as a handle, null when the text is not hexadecimal
    pub fn as_handle(&self) -> Handle {
        Handle::from_hex(self.value_string.trim()).unwrap_or(Handle::NULL)
    }

    /// Decode a hex chunk back into bytes
    pub fn as_bytes(&self) -> Vec<u8> {
        let hex = self.value_string.trim().as_bytes();
        hex.chunks(2)
            .filter_map(|pair| std::str::from_utf8(pair).ok())
            .filter_map(|pair| u8::from_str_radix(pair, 16).ok())
            .collect()
    }

    /// Store a coordinate in the matching axis of `point`
    ///
    /// Returns false when the code is not a coordinate code.
    pub fn apply_to(&self, point: &mut Vector3) -> bool {
        match GroupCodeValueType::coordinate_axis(self.code) {
            Some(0) => point.x = self.as_double(),
            Some(1) => point.y = self.as_double(),
            Some(2) => point.z = self.as_double(),
            _ => return false,
        }
        true
    }

    /// Store a coordinate in the matching axis of a 2D `point`
    pub fn apply_to_2d(&self, point: &mut Vector2) -> bool {
        match GroupCodeValueType::coordinate_axis(self.code) {
            Some(0) => point.x = self.as_double(),
            Some(1) => point.y = self.as_double(),
            _ => return false,
        }
        true
    }
}

/// Trait for reading DXF code/value pairs from a stream
pub trait DxfStreamReader {
    /// Read the next code/value pair
    fn read_pair(&mut self) -> Result<Option<DxfCodePair>>;

    /// Peek at the next code without consuming it
    fn peek_code(&mut self) -> Result<Option<i32>>;

    /// Push a pair back to be read again on next read_pair call
    fn push_back(&mut self, pair: DxfCodePair);

    /// Reset the reader to the first pair
    fn reset(&mut self) -> Result<()>;

    /// Code page used for text that is not valid UTF-8
    fn set_encoding(&mut self, encoding: &'static Encoding);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_values_are_typed() {
        let pair = DxfCodePair::new(70, " 42".to_string());
        assert_eq!(pair.as_i16(), 42);
        assert!(!pair.is_malformed());

        let pair = DxfCodePair::new(40, "2.5".to_string());
        assert_eq!(pair.as_double(), 2.5);

        let pair = DxfCodePair::new(290, "1".to_string());
        assert!(pair.as_bool());

        let pair = DxfCodePair::new(10, "abc".to_string());
        assert!(pair.is_malformed());
    }

    #[test]
    fn test_handles_and_chunks() {
        assert_eq!(DxfCodePair::new(5, "1F".into()).as_handle(), Handle::new(0x1F));
        assert_eq!(DxfCodePair::new(330, "zz".into()).as_handle(), Handle::NULL);

        let chunk = DxfCodePair::from_bytes(310, &[0x00, 0xAB, 0x10]);
        assert_eq!(chunk.as_str(), "00AB10");
        assert_eq!(chunk.as_bytes(), vec![0x00, 0xAB, 0x10]);
    }

    #[test]
    fn test_coordinates() {
        let mut point = Vector3::ZERO;
        assert!(DxfCodePair::from_double(11, 1.0).apply_to(&mut point));
        assert!(DxfCodePair::from_double(21, 2.0).apply_to(&mut point));
        assert!(DxfCodePair::from_double(31, 3.0).apply_to(&mut point));
        assert!(!DxfCodePair::from_double(40, 4.0).apply_to(&mut point));
        assert_eq!(point, Vector3::new(1.0, 2.0, 3.0));

        let mut normal = Vector3::ZERO;
        DxfCodePair::from_double(230, 1.0).apply_to(&mut normal);
        assert_eq!(normal, Vector3::UNIT_Z);
    }
}
