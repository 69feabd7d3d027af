//! Insert entity (block reference)

use super::attribute_entity::Attribute;
use super::EntityCommon;
use crate::types::{Handle, Vector3};

/// Insert entity - a reference to a block definition
///
/// An Insert entity places an instance of a block at a specified location
/// with optional scaling, rotation, and array properties. Scale factors are
/// expressed in the block's own units; the writer converts them to the
/// units of the owner.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub common: EntityCommon,
    /// Block name (references a BlockRecord)
    pub block_name: String,
    /// Insertion point (in WCS)
    pub insert_point: Vector3,
    /// X scale factor
    pub x_scale: f64,
    /// Y scale factor
    pub y_scale: f64,
    /// Z scale factor
    pub z_scale: f64,
    /// Rotation angle in radians
    pub rotation: f64,
    /// Normal vector (extrusion direction)
    pub normal: Vector3,
    /// Column count (for array inserts)
    pub column_count: i16,
    /// Row count (for array inserts)
    pub row_count: i16,
    /// Column spacing (for array inserts)
    pub column_spacing: f64,
    /// Row spacing (for array inserts)
    pub row_spacing: f64,
    /// Attribute values
    pub attributes: Vec<Attribute>,
    /// Handle of the `SEQEND` closing the attribute list
    pub seqend_handle: Handle,
}

impl Insert {
    /// Create a new insert entity
    pub fn new(block_name: impl Into<String>, insert_point: Vector3) -> Self {
        Self {
            common: EntityCommon::default(),
            block_name: block_name.into(),
            insert_point,
            x_scale: 1.0,
            y_scale: 1.0,
            z_scale: 1.0,
            rotation: 0.0,
            normal: Vector3::UNIT_Z,
            column_count: 1,
            row_count: 1,
            column_spacing: 0.0,
            row_spacing: 0.0,
            attributes: Vec::new(),
            seqend_handle: Handle::NULL,
        }
    }

    /// Builder: Set the scale factors
    pub fn with_scale(mut self, x: f64, y: f64, z: f64) -> Self {
        self.x_scale = x;
        self.y_scale = y;
        self.z_scale = z;
        self
    }

    /// Builder: Set a uniform scale
    pub fn with_uniform_scale(self, scale: f64) -> Self {
        self.with_scale(scale, scale, scale)
    }

    /// Builder: Set the rotation angle (radians)
    pub fn with_rotation(mut self, angle: f64) -> Self {
        self.rotation = angle;
        self
    }

    /// Builder: Set the normal vector
    pub fn with_normal(mut self, normal: Vector3) -> Self {
        self.normal = normal;
        self
    }

    /// Builder: Add an attribute
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Check whether this insert is an array
    pub fn is_array(&self) -> bool {
        self.column_count > 1 || self.row_count > 1
    }

    /// Look up an attribute by tag (case-insensitive)
    pub fn attribute(&self, tag: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.tag.eq_ignore_ascii_case(tag))
    }
}

impl_entity!(Insert, "INSERT");
