//! Attribute entity, an attribute value attached to an insert

use super::attribute_definition::{AttributeDefinition, AttributeFlags};
use super::text::TextProperties;
use super::EntityCommon;
use crate::types::Vector3;

/// Attribute (`ATTRIB`) owned by an [`Insert`](super::Insert)
///
/// Attributes are written right after their insert and before its `SEQEND`.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub common: EntityCommon,
    /// Value and text layout
    pub properties: TextProperties,
    /// Attribute tag
    pub tag: String,
    pub flags: AttributeFlags,
    /// Field length (group code 73)
    pub field_length: i16,
    /// Lock position flag, written from AC1018
    pub lock_position: bool,
}

impl Attribute {
    /// Create an attribute with a tag and value
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            common: EntityCommon::new(),
            properties: TextProperties::new(value, Vector3::ZERO),
            tag: tag.into(),
            flags: AttributeFlags::default(),
            field_length: 0,
            lock_position: false,
        }
    }

    /// Create an attribute from its definition, using the definition's
    /// default value and layout
    pub fn from_definition(definition: &AttributeDefinition) -> Self {
        Attribute {
            common: EntityCommon {
                layer: definition.common.layer.clone(),
                ..EntityCommon::new()
            },
            properties: definition.properties.clone(),
            tag: definition.tag.clone(),
            flags: definition.flags,
            field_length: definition.field_length,
            lock_position: definition.lock_position,
        }
    }

    /// Builder: set the insertion point
    pub fn at(mut self, insertion_point: Vector3) -> Self {
        self.properties.insertion_point = insertion_point;
        self
    }

    /// Attribute value
    pub fn value(&self) -> &str {
        &self.properties.value
    }
}

impl_entity!(Attribute, "ATTRIB");
