//! Application ID table entry

use crate::types::Handle;
use crate::xdata::ExtendedData;

/// An application ID table entry
///
/// Every application name used in extended data must be registered here.
#[derive(Debug, Clone, PartialEq)]
pub struct AppId {
    /// Unique handle
    pub handle: Handle,
    /// Application name
    pub name: String,
    /// Standard flags (group code 70)
    pub flags: i16,
    pub extended_data: ExtendedData,
}

impl AppId {
    /// Create a new application ID
    pub fn new(name: impl Into<String>) -> Self {
        AppId {
            handle: Handle::NULL,
            name: name.into(),
            flags: 0,
            extended_data: ExtendedData::new(),
        }
    }

    /// Create the standard "ACAD" application ID
    pub fn acad() -> Self {
        Self::new("ACAD")
    }
}

impl_table_entry!(AppId, |entry: &AppId| entry.name.eq_ignore_ascii_case("ACAD"));
