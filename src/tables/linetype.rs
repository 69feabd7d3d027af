//! Line type table entry

use crate::types::{Handle, Vector2};
use crate::xdata::ExtendedData;

/// Embedded text or shape of a complex line type segment
#[derive(Debug, Clone, PartialEq)]
pub enum LineTypeShape {
    /// Text string drawn with a text style
    Text { text: String, style: Handle },
    /// Shape number from a shape file style
    Shape { number: i16, style: Handle },
}

/// A segment of a line type pattern
#[derive(Debug, Clone, PartialEq)]
pub struct LineTypeElement {
    /// Dash length; positive = dash, negative = space, zero = dot
    pub length: f64,
    /// Embedded text or shape
    pub shape: Option<LineTypeShape>,
    /// Scale of the embedded shape
    pub scale: f64,
    /// Rotation of the embedded shape in radians
    pub rotation: f64,
    /// Rotation is absolute rather than relative to the line
    pub absolute_rotation: bool,
    /// Offset of the embedded shape
    pub offset: Vector2,
}

impl LineTypeElement {
    /// Create a plain segment
    pub fn new(length: f64) -> Self {
        LineTypeElement {
            length,
            shape: None,
            scale: 1.0,
            rotation: 0.0,
            absolute_rotation: false,
            offset: Vector2::ZERO,
        }
    }

    pub fn dash(length: f64) -> Self {
        Self::new(length.abs())
    }

    pub fn space(length: f64) -> Self {
        Self::new(-length.abs())
    }

    pub fn dot() -> Self {
        Self::new(0.0)
    }

    /// Segment carrying a text string
    pub fn with_text(length: f64, text: impl Into<String>, style: Handle) -> Self {
        LineTypeElement {
            shape: Some(LineTypeShape::Text {
                text: text.into(),
                style,
            }),
            ..Self::new(length)
        }
    }

    /// Complex segment flags (group code 74)
    pub fn complex_flags(&self) -> i16 {
        let mut flags = 0;
        if self.absolute_rotation {
            flags |= 1;
        }
        match self.shape {
            Some(LineTypeShape::Text { .. }) => flags |= 2,
            Some(LineTypeShape::Shape { .. }) => flags |= 4,
            None => {}
        }
        flags
    }
}

/// A line type table entry
#[derive(Debug, Clone, PartialEq)]
pub struct LineType {
    /// Unique handle
    pub handle: Handle,
    /// Line type name
    pub name: String,
    /// Standard flags (group code 70)
    pub flags: i16,
    /// Description shown in the line type dialog
    pub description: String,
    /// Pattern segments
    pub elements: Vec<LineTypeElement>,
    pub extended_data: ExtendedData,
}

impl LineType {
    /// Create a new continuous line type
    pub fn new(name: impl Into<String>) -> Self {
        LineType {
            handle: Handle::NULL,
            name: name.into(),
            flags: 0,
            description: String::new(),
            elements: Vec::new(),
            extended_data: ExtendedData::new(),
        }
    }

    pub fn continuous() -> Self {
        let mut lt = Self::new("Continuous");
        lt.description = "Solid line".to_string();
        lt
    }

    pub fn by_layer() -> Self {
        Self::new("ByLayer")
    }

    pub fn by_block() -> Self {
        Self::new("ByBlock")
    }

    /// Create a dashed line type
    pub fn dashed() -> Self {
        let mut lt = LineType::new("Dashed");
        lt.description = "__ __ __ __ __ __".to_string();
        lt.add_element(LineTypeElement::dash(0.5));
        lt.add_element(LineTypeElement::space(0.25));
        lt
    }

    pub fn add_element(&mut self, element: LineTypeElement) {
        self.elements.push(element);
    }

    /// Total pattern length: the sum of absolute segment lengths
    pub fn pattern_length(&self) -> f64 {
        self.elements.iter().map(|e| e.length.abs()).sum()
    }

    pub fn is_continuous(&self) -> bool {
        self.elements.is_empty()
    }
}

impl_table_entry!(LineType, |entry: &LineType| {
    ["Continuous", "ByLayer", "ByBlock"]
        .iter()
        .any(|name| entry.name.eq_ignore_ascii_case(name))
});
