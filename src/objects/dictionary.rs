//! Dictionary object

use crate::types::Handle;
use indexmap::IndexMap;

/// Duplicate record cloning flag (code 281)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DictionaryCloning {
    NotApplicable = 0,
    #[default]
    KeepExisting = 1,
    UseClone = 2,
    XrefPrefixName = 3,
    PrefixName = 4,
    UnmangleName = 5,
}

impl DictionaryCloning {
    pub fn from_code(code: i16) -> Self {
        match code {
            0 => Self::NotApplicable,
            2 => Self::UseClone,
            3 => Self::XrefPrefixName,
            4 => Self::PrefixName,
            5 => Self::UnmangleName,
            _ => Self::KeepExisting,
        }
    }

    pub fn to_code(self) -> i16 {
        self as i16
    }
}

/// Dictionary object: named entries pointing at other objects
///
/// Entries keep their insertion order, which is also the output order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dictionary {
    /// Unique handle
    pub handle: Handle,
    /// Owner handle; null for the root dictionary
    pub owner: Handle,
    pub reactors: Vec<Handle>,
    /// Entries by name
    pub entries: IndexMap<String, Handle>,
    pub cloning: DictionaryCloning,
    /// Entries are owned by the dictionary (written under 360 instead of 350)
    pub hard_owner: bool,
}

impl Dictionary {
    pub const OBJECT_TYPE: &'static str = "DICTIONARY";

    pub fn new() -> Self {
        Self {
            handle: Handle::NULL,
            owner: Handle::NULL,
            reactors: Vec::new(),
            entries: IndexMap::new(),
            cloning: DictionaryCloning::KeepExisting,
            hard_owner: false,
        }
    }

    /// Add or replace an entry
    pub fn add_entry(&mut self, key: impl Into<String>, handle: Handle) {
        self.entries.insert(key.into(), handle);
    }

    pub fn get(&self, key: &str) -> Option<Handle> {
        self.entries.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}
