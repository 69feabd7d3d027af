//! Group code value types
//!
//! The type of a DXF value is fixed by its group code. Text files store every
//! value as a line of text; binary files store the value in the width given
//! here.

/// Storage type of the value that follows a group code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupCodeValueType {
    /// Text, NUL-terminated in binary files
    String,
    /// Hexadecimal handle, stored as text
    Handle,
    /// 64-bit float
    Double,
    /// 16-bit integer
    Int16,
    /// 32-bit integer
    Int32,
    /// 64-bit integer
    Int64,
    /// 8-bit integer, stored as 16 bits in binary files
    Byte,
    /// Boolean, one byte in binary files
    Bool,
    /// Length-prefixed binary chunk
    Chunk,
    /// Code outside every known range
    Unknown,
}

impl GroupCodeValueType {
    /// Value type for a group code
    pub fn from_code(code: i32) -> Self {
        use GroupCodeValueType::*;
        match code {
            0..=4 | 6..=9 => String,
            5 => Handle,
            10..=59 => Double,
            60..=79 => Int16,
            90..=99 => Int32,
            100..=102 => String,
            105 => Handle,
            110..=149 => Double,
            160..=169 => Int64,
            170..=179 => Int16,
            210..=239 => Double,
            270..=279 => Int16,
            280..=289 => Byte,
            290..=299 => Bool,
            300..=309 => String,
            310..=319 => Chunk,
            320..=369 => Handle,
            370..=389 => Int16,
            390..=399 => Handle,
            400..=409 => Int16,
            410..=419 => String,
            420..=429 => Int32,
            430..=439 => String,
            440..=449 => Int32,
            450..=459 => Int32,
            460..=469 => Double,
            470..=479 => String,
            480..=481 => Handle,
            999 => String,
            1000..=1003 => String,
            1004 => Chunk,
            1005 => Handle,
            1010..=1059 => Double,
            1060..=1070 => Int16,
            1071 => Int32,
            _ => Unknown,
        }
    }

    /// Whether the value is parsed as an integer
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            GroupCodeValueType::Int16
                | GroupCodeValueType::Int32
                | GroupCodeValueType::Int64
                | GroupCodeValueType::Byte
        )
    }

    /// Axis (0 = x, 1 = y, 2 = z) of a coordinate code, if it is one
    pub fn coordinate_axis(code: i32) -> Option<usize> {
        match code {
            10..=39 => Some(((code - 10) / 10) as usize),
            110..=139 => Some(((code - 110) / 10) as usize),
            210..=239 => Some(((code - 210) / 10) as usize),
            1010..=1039 => Some(((code - 1010) / 10) as usize),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_types() {
        assert_eq!(GroupCodeValueType::from_code(0), GroupCodeValueType::String);
        assert_eq!(GroupCodeValueType::from_code(5), GroupCodeValueType::Handle);
        assert_eq!(GroupCodeValueType::from_code(10), GroupCodeValueType::Double);
        assert_eq!(GroupCodeValueType::from_code(62), GroupCodeValueType::Int16);
        assert_eq!(GroupCodeValueType::from_code(90), GroupCodeValueType::Int32);
        assert_eq!(GroupCodeValueType::from_code(105), GroupCodeValueType::Handle);
        assert_eq!(GroupCodeValueType::from_code(281), GroupCodeValueType::Byte);
        assert_eq!(GroupCodeValueType::from_code(290), GroupCodeValueType::Bool);
        assert_eq!(GroupCodeValueType::from_code(330), GroupCodeValueType::Handle);
        assert_eq!(GroupCodeValueType::from_code(370), GroupCodeValueType::Int16);
        assert_eq!(GroupCodeValueType::from_code(420), GroupCodeValueType::Int32);
        assert_eq!(GroupCodeValueType::from_code(1071), GroupCodeValueType::Int32);
        assert_eq!(GroupCodeValueType::from_code(1004), GroupCodeValueType::Chunk);
        assert_eq!(GroupCodeValueType::from_code(-5), GroupCodeValueType::Unknown);
    }

    #[test]
    fn test_coordinate_axis() {
        assert_eq!(GroupCodeValueType::coordinate_axis(10), Some(0));
        assert_eq!(GroupCodeValueType::coordinate_axis(21), Some(1));
        assert_eq!(GroupCodeValueType::coordinate_axis(230), Some(2));
        assert_eq!(GroupCodeValueType::coordinate_axis(40), None);
    }
}
