//! Text entity and the text layout shared with attributes

use super::EntityCommon;
use crate::types::Vector3;
use bitflags::bitflags;

/// Text horizontal alignment (group code 72)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum TextHorizontalAlignment {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
    /// Fit between two points, adjusting height
    Aligned = 3,
    /// Centered horizontally and vertically
    Middle = 4,
    /// Fit between two points, keeping height
    Fit = 5,
}

impl From<i16> for TextHorizontalAlignment {
    fn from(value: i16) -> Self {
        match value {
            1 => Self::Center,
            2 => Self::Right,
            3 => Self::Aligned,
            4 => Self::Middle,
            5 => Self::Fit,
            _ => Self::Left,
        }
    }
}

/// Text vertical alignment (group code 73, or 74 on attributes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum TextVerticalAlignment {
    #[default]
    Baseline = 0,
    Bottom = 1,
    Middle = 2,
    Top = 3,
}

impl From<i16> for TextVerticalAlignment {
    fn from(value: i16) -> Self {
        match value {
            1 => Self::Bottom,
            2 => Self::Middle,
            3 => Self::Top,
            _ => Self::Baseline,
        }
    }
}

bitflags! {
    /// Text generation flags (group code 71)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TextMirrorFlags: i16 {
        /// Mirrored in X
        const BACKWARD = 2;
        /// Mirrored in Y
        const UPSIDE_DOWN = 4;
    }
}

/// Layout of a single line of text
///
/// Shared by [`Text`], attribute definitions and attributes, which all
/// write the same `AcDbText` codes.
#[derive(Debug, Clone, PartialEq)]
pub struct TextProperties {
    /// Text content
    pub value: String,
    /// Insertion point (in WCS)
    pub insertion_point: Vector3,
    /// Second alignment point (in WCS), used by non-default alignments
    pub alignment_point: Option<Vector3>,
    /// Text height
    pub height: f64,
    /// Rotation angle in radians
    pub rotation: f64,
    /// Width scale factor
    pub width_factor: f64,
    /// Oblique angle in radians
    pub oblique_angle: f64,
    /// Text style name
    pub style: String,
    /// Thickness
    pub thickness: f64,
    /// Mirror flags
    pub mirror: TextMirrorFlags,
    pub horizontal_alignment: TextHorizontalAlignment,
    pub vertical_alignment: TextVerticalAlignment,
    /// Normal vector
    pub normal: Vector3,
}

impl TextProperties {
    /// Default layout for a value at a point
    pub fn new(value: impl Into<String>, insertion_point: Vector3) -> Self {
        TextProperties {
            value: value.into(),
            insertion_point,
            alignment_point: None,
            height: 1.0,
            rotation: 0.0,
            width_factor: 1.0,
            oblique_angle: 0.0,
            style: "Standard".to_string(),
            thickness: 0.0,
            mirror: TextMirrorFlags::empty(),
            horizontal_alignment: TextHorizontalAlignment::Left,
            vertical_alignment: TextVerticalAlignment::Baseline,
            normal: Vector3::UNIT_Z,
        }
    }

    /// Check if the layout uses the default left/baseline alignment
    pub fn is_default_alignment(&self) -> bool {
        self.horizontal_alignment == TextHorizontalAlignment::Left
            && self.vertical_alignment == TextVerticalAlignment::Baseline
    }
}

impl Default for TextProperties {
    fn default() -> Self {
        Self::new("", Vector3::ZERO)
    }
}

/// A single-line text entity
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    /// Common entity data
    pub common: EntityCommon,
    /// Value and layout
    pub properties: TextProperties,
}

impl Text {
    /// Create a new empty text entity
    pub fn new() -> Self {
        Text {
            common: EntityCommon::new(),
            properties: TextProperties::default(),
        }
    }

    /// Create a text with a value at a position
    pub fn with_value(value: impl Into<String>, position: Vector3) -> Self {
        Text {
            common: EntityCommon::new(),
            properties: TextProperties::new(value, position),
        }
    }

    /// Builder: set the text height
    pub fn with_height(mut self, height: f64) -> Self {
        self.properties.height = height;
        self
    }

    /// Builder: set the rotation angle (radians)
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.properties.rotation = rotation;
        self
    }

    /// Builder: set both alignments and the alignment point
    pub fn with_alignment(
        mut self,
        horizontal: TextHorizontalAlignment,
        vertical: TextVerticalAlignment,
        alignment_point: Vector3,
    ) -> Self {
        self.properties.horizontal_alignment = horizontal;
        self.properties.vertical_alignment = vertical;
        self.properties.alignment_point = Some(alignment_point);
        self
    }

    /// Text content
    pub fn value(&self) -> &str {
        &self.properties.value
    }
}

impl Default for Text {
    fn default() -> Self {
        Self::new()
    }
}

impl_entity!(Text, "TEXT");
