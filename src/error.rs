//! Error types for the DXF codec

use std::io;
use thiserror::Error;

/// Main error type for reading and writing DXF streams
///
/// Every writer error is fatal: the write call returns at the first error
/// and whatever was already flushed to the destination is not a valid file.
#[derive(Debug, Error)]
pub enum DxfError {
    /// IO error while creating or writing the stream
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Illegal section/table/block sequencing
    #[error("Structure error: {0}")]
    Structure(String),

    /// Target version cannot be written, or file version cannot be read
    #[error("Unsupported DXF version: {0}")]
    UnsupportedVersion(String),

    /// Entity kind outside the encoder dispatch set
    #[error("Unsupported entity: {0}")]
    UnsupportedEntity(String),

    /// A record references something the document does not contain
    #[error("Missing {kind}: {name}")]
    MissingReference {
        /// What was looked up ("block", "text style", ...)
        kind: &'static str,
        /// Name or handle that was not found
        name: String,
    },

    /// Invalid handle reference
    #[error("Invalid handle: {0:#X}")]
    InvalidHandle(u64),

    /// Malformed input while reading
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid DXF code encountered
    #[error("Invalid DXF code: {0}")]
    InvalidDxfCode(i32),

    /// Text could not be encoded or decoded
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, DxfError>;

impl DxfError {
    /// Shorthand for a structural misuse error
    pub fn structure(message: impl Into<String>) -> Self {
        DxfError::Structure(message.into())
    }

    /// Shorthand for a missing reference
    pub fn missing(kind: &'static str, name: impl Into<String>) -> Self {
        DxfError::MissingReference {
            kind,
            name: name.into(),
        }
    }
}

impl From<String> for DxfError {
    fn from(s: String) -> Self {
        DxfError::Custom(s)
    }
}

impl From<&str> for DxfError {
    fn from(s: &str) -> Self {
        DxfError::Custom(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DxfError::UnsupportedVersion("AC1009".to_string());
        assert_eq!(err.to_string(), "Unsupported DXF version: AC1009");

        let err = DxfError::missing("block", "DOOR");
        assert_eq!(err.to_string(), "Missing block: DOOR");

        let err = DxfError::InvalidHandle(0x1F);
        assert_eq!(err.to_string(), "Invalid handle: 0x1F");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let dxf_err: DxfError = io_err.into();
        assert!(matches!(dxf_err, DxfError::Io(_)));
    }

    #[test]
    fn test_structure_shorthand() {
        let err = DxfError::structure("section already open");
        assert!(matches!(err, DxfError::Structure(ref m) if m == "section already open"));
    }
}
