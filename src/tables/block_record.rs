//! Block record table entry

use crate::types::{DrawingUnits, Handle, Vector3};
use crate::xdata::ExtendedData;

/// Name of the model space block record
pub const MODEL_SPACE: &str = "*Model_Space";
/// Name of the first paper space block record; further layouts append a number
pub const PAPER_SPACE: &str = "*Paper_Space";

/// Block type flags (group code 70 of the BLOCK entity)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockFlags {
    pub anonymous: bool,
    pub has_attributes: bool,
    pub is_xref: bool,
    pub is_xref_overlay: bool,
}

impl BlockFlags {
    pub fn from_bits(bits: i16) -> Self {
        BlockFlags {
            anonymous: bits & 1 != 0,
            has_attributes: bits & 2 != 0,
            is_xref: bits & 4 != 0,
            is_xref_overlay: bits & 8 != 0,
        }
    }

    pub fn to_bits(self) -> i16 {
        (self.anonymous as i16)
            | (self.has_attributes as i16) << 1
            | (self.is_xref as i16) << 2
            | (self.is_xref_overlay as i16) << 3
    }
}

/// A block record table entry together with its block definition
///
/// The record owns its entities by handle; the entities themselves live in
/// the document's entity arena.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockRecord {
    /// Unique handle of the record
    pub handle: Handle,
    /// Handle of the BLOCK entity
    pub block_entity_handle: Handle,
    /// Handle of the ENDBLK entity
    pub block_end_handle: Handle,
    /// Block name
    pub name: String,
    pub flags: BlockFlags,
    /// Layout object, for model and paper space records
    pub layout: Handle,
    /// Insertion units of the block
    pub units: DrawingUnits,
    pub explodable: bool,
    pub scale_uniformly: bool,
    /// Block base point
    pub base_point: Vector3,
    /// External reference path
    pub xref_path: String,
    /// Block description
    pub description: String,
    /// Layer of the BLOCK and ENDBLK entities
    pub layer: String,
    /// Entities owned by this block, in drawing order
    pub entities: Vec<Handle>,
    pub extended_data: ExtendedData,
}

impl BlockRecord {
    /// Create a new block record
    pub fn new(name: impl Into<String>) -> Self {
        BlockRecord {
            handle: Handle::NULL,
            block_entity_handle: Handle::NULL,
            block_end_handle: Handle::NULL,
            name: name.into(),
            flags: BlockFlags::default(),
            layout: Handle::NULL,
            units: DrawingUnits::Unitless,
            explodable: true,
            scale_uniformly: false,
            base_point: Vector3::ZERO,
            xref_path: String::new(),
            description: String::new(),
            layer: "0".to_string(),
            entities: Vec::new(),
            extended_data: ExtendedData::new(),
        }
    }

    pub fn model_space() -> Self {
        Self::new(MODEL_SPACE)
    }

    pub fn paper_space() -> Self {
        Self::new(PAPER_SPACE)
    }

    /// Builder: set the insertion units
    pub fn with_units(mut self, units: DrawingUnits) -> Self {
        self.units = units;
        self
    }

    /// Builder: set the base point
    pub fn with_base_point(mut self, base_point: Vector3) -> Self {
        self.base_point = base_point;
        self
    }

    pub fn is_model_space(&self) -> bool {
        self.name.eq_ignore_ascii_case(MODEL_SPACE)
    }

    /// Any paper space record, including `*Paper_SpaceN`
    pub fn is_paper_space(&self) -> bool {
        self.name
            .get(..PAPER_SPACE.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(PAPER_SPACE))
    }

    /// Model and paper space records, whose entities go in ENTITIES or
    /// belong to layouts
    pub fn is_layout_block(&self) -> bool {
        self.is_model_space() || self.is_paper_space()
    }
}

impl_table_entry!(BlockRecord, |entry: &BlockRecord| entry.is_layout_block());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_block_names() {
        assert!(BlockRecord::model_space().is_model_space());
        assert!(BlockRecord::paper_space().is_paper_space());
        assert!(BlockRecord::new("*Paper_Space3").is_paper_space());
        assert!(!BlockRecord::new("Door").is_layout_block());
    }

    #[test]
    fn test_flag_bits() {
        let flags = BlockFlags::from_bits(3);
        assert!(flags.anonymous && flags.has_attributes);
        assert_eq!(flags.to_bits(), 3);
    }
}
