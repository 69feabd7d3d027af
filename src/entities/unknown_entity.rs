//! Placeholder for entity kinds without a model

use super::{Entity, EntityCommon};

/// An entity whose kind is not modelled
///
/// The reader produces these for records it cannot interpret so that the
/// rest of the drawing stays usable. They cannot be written back.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownEntity {
    pub common: EntityCommon,
    /// Record name as read (`0` group)
    pub dxf_name: String,
}

impl UnknownEntity {
    pub fn new(dxf_name: impl Into<String>) -> Self {
        UnknownEntity {
            common: EntityCommon::new(),
            dxf_name: dxf_name.into(),
        }
    }
}

impl Entity for UnknownEntity {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn entity_type(&self) -> &'static str {
        "UNKNOWN"
    }
}
