//! Symbol tables and their records

use crate::error::{DxfError, Result};
use crate::types::Handle;
use crate::xdata::ExtendedData;
use indexmap::IndexMap;

/// Implements [`TableEntry`] for a record with `handle`, `name` and
/// `extended_data` fields.
macro_rules! impl_table_entry {
    ($ty:ty) => {
        impl_table_entry!($ty, |_entry: &$ty| false);
    };
    ($ty:ty, $standard:expr) => {
        impl $crate::tables::TableEntry for $ty {
            fn handle(&self) -> $crate::types::Handle {
                self.handle
            }

            fn set_handle(&mut self, handle: $crate::types::Handle) {
                self.handle = handle;
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn set_name(&mut self, name: String) {
                self.name = name;
            }

            fn extended_data(&self) -> &$crate::xdata::ExtendedData {
                &self.extended_data
            }

            fn extended_data_mut(&mut self) -> &mut $crate::xdata::ExtendedData {
                &mut self.extended_data
            }

            fn is_standard(&self) -> bool {
                let standard = $standard;
                standard(self)
            }
        }
    };
}

pub mod appid;
pub mod block_record;
pub mod dimstyle;
pub mod layer;
pub mod linetype;
pub mod textstyle;
pub mod ucs;
pub mod view;
pub mod vport;

pub use appid::AppId;
pub use block_record::{BlockFlags, BlockRecord, MODEL_SPACE, PAPER_SPACE};
pub use dimstyle::DimStyle;
pub use layer::{Layer, LayerFlags};
pub use linetype::{LineType, LineTypeElement, LineTypeShape};
pub use textstyle::{TextGenerationFlags, TextStyle};
pub use ucs::Ucs;
pub use view::View;
pub use vport::VPort;

/// Base trait for all table entries
pub trait TableEntry {
    /// Get the entry's unique handle
    fn handle(&self) -> Handle;

    /// Set the entry's handle
    fn set_handle(&mut self, handle: Handle);

    /// Get the entry's name
    fn name(&self) -> &str;

    /// Set the entry's name
    fn set_name(&mut self, name: String);

    /// Extended data written after the record
    fn extended_data(&self) -> &ExtendedData;

    fn extended_data_mut(&mut self) -> &mut ExtendedData;

    /// Check if this is a standard/default entry
    fn is_standard(&self) -> bool {
        false
    }
}


/// Generic table for storing named entries
#[derive(Debug, Clone)]
pub struct Table<T: TableEntry> {
    /// Entries stored by name (case-insensitive), in insertion order
    entries: IndexMap<String, T>,
    /// Table handle
    handle: Handle,
}

impl<T: TableEntry> Table<T> {
    /// Create a new empty table
    pub fn new() -> Self {
        Table {
            entries: IndexMap::new(),
            handle: Handle::NULL,
        }
    }

    /// Create a table with a specific handle
    pub fn with_handle(handle: Handle) -> Self {
        Table {
            entries: IndexMap::new(),
            handle,
        }
    }

    /// Get the table's handle
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Set the table's handle
    pub fn set_handle(&mut self, handle: Handle) {
        self.handle = handle;
    }

    /// Add an entry to the table
    pub fn add(&mut self, entry: T) -> Result<()> {
        let name = entry.name().to_uppercase();
        if self.entries.contains_key(&name) {
            return Err(DxfError::Custom(format!(
                "Entry '{}' already exists in table",
                entry.name()
            )));
        }
        self.entries.insert(name, entry);
        Ok(())
    }

    /// Add an entry, replacing an existing one with the same name
    pub fn insert(&mut self, entry: T) -> Option<T> {
        self.entries.insert(entry.name().to_uppercase(), entry)
    }

    /// Get an entry by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(&name.to_uppercase())
    }

    /// Get a mutable entry by name (case-insensitive)
    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.entries.get_mut(&name.to_uppercase())
    }

    /// Get an entry by its handle
    pub fn get_by_handle(&self, handle: Handle) -> Option<&T> {
        self.entries.values().find(|e| e.handle() == handle)
    }

    /// Get a mutable entry by its handle
    pub fn get_by_handle_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.entries.values_mut().find(|e| e.handle() == handle)
    }

    /// Remove an entry by name (case-insensitive)
    pub fn remove(&mut self, name: &str) -> Option<T> {
        self.entries.shift_remove(&name.to_uppercase())
    }

    /// Check if an entry exists (case-insensitive)
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_uppercase())
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    /// Iterate over all entries mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.values_mut()
    }

    /// Get all entry names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|e| e.name())
    }
}

impl<T: TableEntry> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_add_and_get() {
        let mut table = Table::new();
        assert!(table.add(AppId::new("Test")).is_ok());
        assert!(table.contains("Test"));
        assert!(table.contains("test"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_table_duplicate_entry() {
        let mut table = Table::new();
        assert!(table.add(AppId::new("Test")).is_ok());
        assert!(table.add(AppId::new("test")).is_err());
    }

    #[test]
    fn test_table_insert_replaces() {
        let mut table = Table::new();
        table.add(AppId::new("ACAD")).unwrap();
        let mut replacement = AppId::new("acad");
        replacement.handle = Handle::new(0x12);
        assert!(table.insert(replacement).is_some());
        assert_eq!(table.len(), 1);
        assert!(table.get_by_handle(Handle::new(0x12)).is_some());
    }

    #[test]
    fn test_table_keeps_insertion_order() {
        let mut table = Table::new();
        for name in ["B", "A", "C"] {
            table.add(AppId::new(name)).unwrap();
        }
        let names: Vec<_> = table.names().collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }
}
