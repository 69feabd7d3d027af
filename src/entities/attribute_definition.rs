//! Attribute definition entity, the template for block attributes

use super::text::TextProperties;
use super::EntityCommon;
use crate::types::Vector3;

/// Attribute flags (group code 70)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttributeFlags {
    /// Attribute is invisible
    pub invisible: bool,
    /// Attribute is constant (value cannot be changed)
    pub constant: bool,
    /// Verification required on input
    pub verify: bool,
    /// Attribute is preset (no prompt during insertion)
    pub preset: bool,
}

impl AttributeFlags {
    /// Create from the raw code-70 value
    pub fn from_bits(bits: i16) -> Self {
        Self {
            invisible: bits & 1 != 0,
            constant: bits & 2 != 0,
            verify: bits & 4 != 0,
            preset: bits & 8 != 0,
        }
    }

    /// Convert to the raw code-70 value
    pub fn to_bits(&self) -> i16 {
        let mut bits = 0;
        if self.invisible {
            bits |= 1;
        }
        if self.constant {
            bits |= 2;
        }
        if self.verify {
            bits |= 4;
        }
        if self.preset {
            bits |= 8;
        }
        bits
    }
}

/// Attribute definition (`ATTDEF`) placed inside a block
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDefinition {
    pub common: EntityCommon,
    /// Default value and text layout
    pub properties: TextProperties,
    /// Attribute tag
    pub tag: String,
    /// Prompt shown when the block is inserted
    pub prompt: String,
    pub flags: AttributeFlags,
    /// Field length (group code 73)
    pub field_length: i16,
    /// Lock position flag, written from AC1018
    pub lock_position: bool,
}

impl AttributeDefinition {
    /// Create a new attribute definition
    pub fn new(tag: impl Into<String>, prompt: impl Into<String>, default_value: impl Into<String>) -> Self {
        AttributeDefinition {
            common: EntityCommon::new(),
            properties: TextProperties::new(default_value, Vector3::ZERO),
            tag: tag.into(),
            prompt: prompt.into(),
            flags: AttributeFlags::default(),
            field_length: 0,
            lock_position: false,
        }
    }

    /// Builder: set the insertion point
    pub fn at(mut self, insertion_point: Vector3) -> Self {
        self.properties.insertion_point = insertion_point;
        self
    }

    /// Builder: set the text height
    pub fn with_height(mut self, height: f64) -> Self {
        self.properties.height = height;
        self
    }
}

impl Default for AttributeDefinition {
    fn default() -> Self {
        Self::new("", "", "")
    }
}

impl_entity!(AttributeDefinition, "ATTDEF");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_roundtrip() {
        for bits in 0..16 {
            assert_eq!(AttributeFlags::from_bits(bits).to_bits(), bits);
        }
    }
}
