//! DXF file versions

use std::fmt;

/// DXF file version, ordered from oldest to newest
///
/// The writer supports AC1015 (AutoCAD 2000) and later. Several encoding
/// decisions compare versions: text escaping below AC1021, gradient hatches
/// and class instance counts above AC1015.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DxfVersion {
    /// Unrecognized `$ACADVER` value
    Unknown,
    /// AutoCAD R12
    AC1009,
    /// AutoCAD R13
    AC1012,
    /// AutoCAD R14
    AC1014,
    /// AutoCAD 2000
    AC1015,
    /// AutoCAD 2004
    AC1018,
    /// AutoCAD 2007
    AC1021,
    /// AutoCAD 2010
    AC1024,
    /// AutoCAD 2013
    AC1027,
    /// AutoCAD 2018
    AC1032,
}

impl DxfVersion {
    /// Oldest version the writer accepts
    pub const MIN_WRITABLE: DxfVersion = DxfVersion::AC1015;

    /// Parse an `$ACADVER` string
    pub fn from_version_string(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "AC1009" => DxfVersion::AC1009,
            "AC1012" => DxfVersion::AC1012,
            "AC1014" => DxfVersion::AC1014,
            "AC1015" => DxfVersion::AC1015,
            "AC1018" => DxfVersion::AC1018,
            "AC1021" => DxfVersion::AC1021,
            "AC1024" => DxfVersion::AC1024,
            "AC1027" => DxfVersion::AC1027,
            "AC1032" => DxfVersion::AC1032,
            _ => DxfVersion::Unknown,
        }
    }

    /// `$ACADVER` string
    pub fn to_dxf_string(self) -> &'static str {
        match self {
            DxfVersion::Unknown => "UNKNOWN",
            DxfVersion::AC1009 => "AC1009",
            DxfVersion::AC1012 => "AC1012",
            DxfVersion::AC1014 => "AC1014",
            DxfVersion::AC1015 => "AC1015",
            DxfVersion::AC1018 => "AC1018",
            DxfVersion::AC1021 => "AC1021",
            DxfVersion::AC1024 => "AC1024",
            DxfVersion::AC1027 => "AC1027",
            DxfVersion::AC1032 => "AC1032",
        }
    }

    /// Whether strings are stored in a single-byte code page
    pub fn uses_code_page(self) -> bool {
        self < DxfVersion::AC1021
    }

    /// Whether the writer can produce this version
    pub fn is_writable(self) -> bool {
        self >= DxfVersion::MIN_WRITABLE
    }
}

impl Default for DxfVersion {
    fn default() -> Self {
        DxfVersion::AC1032
    }
}

impl fmt::Display for DxfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_dxf_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_ordering() {
        assert!(DxfVersion::AC1015 < DxfVersion::AC1018);
        assert!(DxfVersion::AC1018 < DxfVersion::AC1021);
        assert!(DxfVersion::Unknown < DxfVersion::AC1009);
    }

    #[test]
    fn test_version_strings() {
        assert_eq!(DxfVersion::from_version_string("ac1027"), DxfVersion::AC1027);
        assert_eq!(DxfVersion::AC1018.to_dxf_string(), "AC1018");
        assert_eq!(DxfVersion::from_version_string("AC9999"), DxfVersion::Unknown);
    }

    #[test]
    fn test_writable_versions() {
        assert!(!DxfVersion::AC1014.is_writable());
        assert!(DxfVersion::AC1015.is_writable());
        assert!(DxfVersion::AC1018.uses_code_page());
        assert!(!DxfVersion::AC1021.uses_code_page());
    }
}
