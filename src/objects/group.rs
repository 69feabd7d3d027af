//! Group object - named collection of entities

use crate::types::Handle;

/// A named group of entities
///
/// Groups are stored in the `ACAD_GROUP` dictionary under their name; the
/// member order is preserved on output.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Unique handle
    pub handle: Handle,
    /// Owner handle (the group dictionary)
    pub owner: Handle,
    pub reactors: Vec<Handle>,
    /// Group name, the key in the group dictionary
    pub name: String,
    /// Group description (code 300)
    pub description: String,
    /// Member entities (code 340)
    pub entities: Vec<Handle>,
    /// Group is selectable (code 71)
    pub selectable: bool,
}

impl Group {
    pub const OBJECT_TYPE: &'static str = "GROUP";

    /// Create a new named group
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            handle: Handle::NULL,
            owner: Handle::NULL,
            reactors: Vec::new(),
            name: name.into(),
            description: String::new(),
            entities: Vec::new(),
            selectable: true,
        }
    }

    /// Unnamed groups have empty names or names starting with "*"
    pub fn is_unnamed(&self) -> bool {
        self.name.is_empty() || self.name.starts_with('*')
    }

    /// Add an entity, ignoring duplicates
    pub fn add_entity(&mut self, handle: Handle) {
        if !self.entities.contains(&handle) {
            self.entities.push(handle);
        }
    }

    pub fn add_entities(&mut self, handles: impl IntoIterator<Item = Handle>) {
        for handle in handles {
            self.add_entity(handle);
        }
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.entities.contains(&handle)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Builder: set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_keep_order_without_duplicates() {
        let mut group = Group::new("Doors");
        group.add_entities([Handle::new(0x30), Handle::new(0x20), Handle::new(0x30)]);
        assert_eq!(group.entities, vec![Handle::new(0x30), Handle::new(0x20)]);
        assert!(!group.is_unnamed());
        assert!(Group::new("*A1").is_unnamed());
    }
}
