//! Handle type for DXF objects
//!
//! Every persisted record carries a handle. On the wire a handle is an
//! uppercase hexadecimal string without prefix (`"1F"`), and `"0"` means
//! "no object".

use std::fmt;

/// A unique identifier for a record in a drawing
///
/// Handles are the keys of the document arenas: owners, reactors and
/// references between records are all expressed as handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u64);

impl Handle {
    /// The null handle (0)
    pub const NULL: Handle = Handle(0);

    /// Create a new handle from a u64 value
    #[inline]
    pub const fn new(value: u64) -> Self {
        Handle(value)
    }

    /// Get the raw u64 value
    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Check if this is the null handle
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Check if this is a non-null handle
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.0 != 0
    }

    /// Parse the hexadecimal wire form
    pub fn from_hex(text: &str) -> Option<Self> {
        u64::from_str_radix(text.trim(), 16).ok().map(Handle)
    }

    /// Hexadecimal wire form (`"0"` for the null handle)
    pub fn to_hex(&self) -> String {
        format!("{:X}", self.0)
    }
}

impl Default for Handle {
    fn default() -> Self {
        Handle::NULL
    }
}

impl From<u64> for Handle {
    fn from(value: u64) -> Self {
        Handle(value)
    }
}

impl From<Handle> for u64 {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#X}", self.0)
    }
}

impl fmt::UpperHex for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_handle() {
        assert!(Handle::NULL.is_null());
        assert!(!Handle::NULL.is_valid());
        assert_eq!(Handle::NULL.to_hex(), "0");
    }

    #[test]
    fn test_handle_hex_forms() {
        let handle = Handle::new(0xABCD);
        assert_eq!(handle.to_hex(), "ABCD");
        assert_eq!(format!("{}", handle), "0xABCD");
        assert_eq!(Handle::from_hex("abcd"), Some(handle));
        assert_eq!(Handle::from_hex(" 1F "), Some(Handle::new(0x1F)));
        assert_eq!(Handle::from_hex("xyz"), None);
    }

    #[test]
    fn test_handle_ordering() {
        assert!(Handle::new(100) < Handle::new(200));
    }
}
