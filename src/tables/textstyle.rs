//! Text style table entry

use crate::types::Handle;
use crate::xdata::ExtendedData;

/// Text generation flags (group code 71)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextGenerationFlags {
    /// Text is backward (mirrored in X)
    pub backward: bool,
    /// Text is upside down (mirrored in Y)
    pub upside_down: bool,
}

impl TextGenerationFlags {
    pub fn from_bits(bits: i16) -> Self {
        TextGenerationFlags {
            backward: bits & 2 != 0,
            upside_down: bits & 4 != 0,
        }
    }

    pub fn to_bits(self) -> i16 {
        let mut bits = 0;
        if self.backward {
            bits |= 2;
        }
        if self.upside_down {
            bits |= 4;
        }
        bits
    }
}

/// A text style table entry
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Unique handle
    pub handle: Handle,
    /// Style name
    pub name: String,
    /// Vertical text
    pub is_vertical: bool,
    /// Style describes a shape file rather than a font
    pub is_shape_file: bool,
    /// Fixed text height (0 = variable)
    pub height: f64,
    pub width_factor: f64,
    /// Oblique angle in radians
    pub oblique_angle: f64,
    pub generation: TextGenerationFlags,
    /// Last height used
    pub last_height: f64,
    /// Primary font file name
    pub font_file: String,
    /// Big font file name
    pub big_font_file: String,
    /// TrueType font family; written as `ACAD` extended data
    pub font_family: Option<String>,
    /// TrueType font flags (pitch, family, charset, italic, bold)
    pub font_flags: i32,
    pub extended_data: ExtendedData,
}

impl TextStyle {
    /// Create a new text style
    pub fn new(name: impl Into<String>) -> Self {
        TextStyle {
            handle: Handle::NULL,
            name: name.into(),
            is_vertical: false,
            is_shape_file: false,
            height: 0.0,
            width_factor: 1.0,
            oblique_angle: 0.0,
            generation: TextGenerationFlags::default(),
            last_height: 2.5,
            font_file: "txt".to_string(),
            big_font_file: String::new(),
            font_family: None,
            font_flags: 0,
            extended_data: ExtendedData::new(),
        }
    }

    /// Create the standard "Standard" text style
    pub fn standard() -> Self {
        Self::new("Standard")
    }

    /// Builder: use a TrueType font
    pub fn with_true_type(mut self, font_file: impl Into<String>, family: impl Into<String>) -> Self {
        self.font_file = font_file.into();
        self.font_family = Some(family.into());
        self.font_flags = 0x22;
        self
    }

    /// Standard flags (group code 70)
    pub fn flags(&self) -> i16 {
        let mut flags = 0;
        if self.is_shape_file {
            flags |= 1;
        }
        if self.is_vertical {
            flags |= 4;
        }
        flags
    }
}

impl_table_entry!(TextStyle, |entry: &TextStyle| entry.name.eq_ignore_ascii_case("Standard"));
