//! Extended Data (XDATA) support
//!
//! Extended data is application-specific data attached to entities, table
//! records and objects. It is written after the record's own codes as a
//! `1001 <application>` tag followed by typed values using group codes
//! 1000-1071.

use crate::types::{Handle, Vector3};

/// Extended data value types
#[derive(Debug, Clone, PartialEq)]
pub enum XDataValue {
    /// String value (group code 1000)
    String(String),
    /// Control string (group code 1002), `"{"` or `"}"`
    ControlString(String),
    /// Layer name (group code 1003)
    LayerName(String),
    /// Binary data (group code 1004)
    BinaryData(Vec<u8>),
    /// Database handle (group code 1005)
    Handle(Handle),
    /// 3D point (group codes 1010, 1020, 1030)
    Point3D(Vector3),
    /// 3D position (group codes 1011, 1021, 1031)
    Position3D(Vector3),
    /// 3D displacement (group codes 1012, 1022, 1032)
    Displacement3D(Vector3),
    /// 3D direction (group codes 1013, 1023, 1033)
    Direction3D(Vector3),
    /// Real value (group code 1040)
    Real(f64),
    /// Distance (group code 1041)
    Distance(f64),
    /// Scale factor (group code 1042)
    ScaleFactor(f64),
    /// 16-bit integer (group code 1070)
    Integer16(i16),
    /// 32-bit integer (group code 1071)
    Integer32(i32),
}

impl XDataValue {
    /// Group code of the value (the x code for points)
    pub fn code(&self) -> i32 {
        match self {
            XDataValue::String(_) => 1000,
            XDataValue::ControlString(_) => 1002,
            XDataValue::LayerName(_) => 1003,
            XDataValue::BinaryData(_) => 1004,
            XDataValue::Handle(_) => 1005,
            XDataValue::Point3D(_) => 1010,
            XDataValue::Position3D(_) => 1011,
            XDataValue::Displacement3D(_) => 1012,
            XDataValue::Direction3D(_) => 1013,
            XDataValue::Real(_) => 1040,
            XDataValue::Distance(_) => 1041,
            XDataValue::ScaleFactor(_) => 1042,
            XDataValue::Integer16(_) => 1070,
            XDataValue::Integer32(_) => 1071,
        }
    }
}

/// Extended data record for a single application
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedDataRecord {
    /// Registered application name (group code 1001)
    pub application_name: String,
    /// Extended data values, in write order
    pub values: Vec<XDataValue>,
}

impl ExtendedDataRecord {
    /// Create a new extended data record
    pub fn new(application_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
            values: Vec::new(),
        }
    }

    /// Builder-style value append
    pub fn with_value(mut self, value: XDataValue) -> Self {
        self.values.push(value);
        self
    }

    /// Add a value to the record
    pub fn add_value(&mut self, value: XDataValue) {
        self.values.push(value);
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the record has no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Extended data attached to one record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtendedData {
    records: Vec<ExtendedDataRecord>,
}

impl ExtendedData {
    /// Create an empty collection
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Add a record; a record for the same application replaces the old one
    pub fn add_record(&mut self, record: ExtendedDataRecord) {
        match self
            .records
            .iter_mut()
            .find(|r| r.application_name.eq_ignore_ascii_case(&record.application_name))
        {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    /// All records, in write order
    pub fn records(&self) -> &[ExtendedDataRecord] {
        &self.records
    }

    /// Record of an application (case-insensitive)
    pub fn get_record(&self, application_name: &str) -> Option<&ExtendedDataRecord> {
        self.records
            .iter()
            .find(|r| r.application_name.eq_ignore_ascii_case(application_name))
    }

    /// Remove and return the record of an application
    pub fn take_record(&mut self, application_name: &str) -> Option<ExtendedDataRecord> {
        let index = self
            .records
            .iter()
            .position(|r| r.application_name.eq_ignore_ascii_case(application_name))?;
        Some(self.records.remove(index))
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xdata_record_creation() {
        let record = ExtendedDataRecord::new("MYAPP").with_value(XDataValue::String("test".into()));
        assert_eq!(record.application_name, "MYAPP");
        assert_eq!(record.len(), 1);
        assert_eq!(record.values[0].code(), 1000);
    }

    #[test]
    fn test_xdata_collection_replaces_same_application() {
        let mut xdata = ExtendedData::new();
        xdata.add_record(ExtendedDataRecord::new("APP1").with_value(XDataValue::Real(1.0)));
        xdata.add_record(ExtendedDataRecord::new("app1").with_value(XDataValue::Real(2.0)));
        assert_eq!(xdata.len(), 1);
        assert_eq!(xdata.get_record("APP1").map(|r| r.values[0].clone()), Some(XDataValue::Real(2.0)));
        assert!(xdata.take_record("APP1").is_some());
        assert!(xdata.is_empty());
    }
}
