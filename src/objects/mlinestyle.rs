//! MLineStyle object - multiline style definition

use crate::types::{Color, Handle};

/// Multiline style flags (code 70)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MLineStyleFlags {
    pub fill_on: bool,
    /// Display miters at joints
    pub display_joints: bool,
    pub start_square_cap: bool,
    pub start_inner_arcs_cap: bool,
    pub start_round_cap: bool,
    pub end_square_cap: bool,
    pub end_inner_arcs_cap: bool,
    pub end_round_cap: bool,
}

impl MLineStyleFlags {
    pub fn from_bits(bits: i16) -> Self {
        Self {
            fill_on: (bits & 1) != 0,
            display_joints: (bits & 2) != 0,
            start_square_cap: (bits & 16) != 0,
            start_inner_arcs_cap: (bits & 32) != 0,
            start_round_cap: (bits & 64) != 0,
            end_square_cap: (bits & 256) != 0,
            end_inner_arcs_cap: (bits & 512) != 0,
            end_round_cap: (bits & 1024) != 0,
        }
    }

    pub fn to_bits(self) -> i16 {
        let mut bits = 0;
        if self.fill_on { bits |= 1; }
        if self.display_joints { bits |= 2; }
        if self.start_square_cap { bits |= 16; }
        if self.start_inner_arcs_cap { bits |= 32; }
        if self.start_round_cap { bits |= 64; }
        if self.end_square_cap { bits |= 256; }
        if self.end_inner_arcs_cap { bits |= 512; }
        if self.end_round_cap { bits |= 1024; }
        bits
    }
}

/// One line of a multiline style
#[derive(Debug, Clone, PartialEq)]
pub struct MLineStyleElement {
    /// Offset from the center line
    pub offset: f64,
    pub color: Color,
    pub line_type: String,
}

impl MLineStyleElement {
    pub fn new(offset: f64) -> Self {
        Self {
            offset,
            color: Color::ByLayer,
            line_type: "BYLAYER".to_string(),
        }
    }

    pub fn with_color(offset: f64, color: Color) -> Self {
        Self {
            color,
            ..Self::new(offset)
        }
    }
}

/// Multiline style object
///
/// Stored in the `ACAD_MLINESTYLE` dictionary. MLINE entities take their
/// element count from the style they reference.
#[derive(Debug, Clone, PartialEq)]
pub struct MLineStyle {
    /// Unique handle
    pub handle: Handle,
    /// Owner handle
    pub owner: Handle,
    pub reactors: Vec<Handle>,
    /// Style name (code 2)
    pub name: String,
    /// Style description (code 3)
    pub description: String,
    pub flags: MLineStyleFlags,
    /// Fill color (code 62)
    pub fill_color: Color,
    /// Start cap angle in radians (code 51)
    pub start_angle: f64,
    /// End cap angle in radians (code 52)
    pub end_angle: f64,
    pub elements: Vec<MLineStyleElement>,
}

impl MLineStyle {
    pub const OBJECT_TYPE: &'static str = "MLINESTYLE";
    pub const DEFAULT_NAME: &'static str = "Standard";

    /// Create a new multiline style
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            handle: Handle::NULL,
            owner: Handle::NULL,
            reactors: Vec::new(),
            name: name.into(),
            description: String::new(),
            flags: MLineStyleFlags::default(),
            fill_color: Color::ByLayer,
            start_angle: std::f64::consts::FRAC_PI_2,
            end_angle: std::f64::consts::FRAC_PI_2,
            elements: Vec::new(),
        }
    }

    /// The "Standard" style with two elements at +/-0.5
    pub fn standard() -> Self {
        let mut style = Self::new(Self::DEFAULT_NAME);
        style.add_element(MLineStyleElement::new(0.5));
        style.add_element(MLineStyleElement::new(-0.5));
        style
    }

    pub fn add_element(&mut self, element: MLineStyleElement) {
        self.elements.push(element);
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Distance between the outermost elements
    pub fn width(&self) -> f64 {
        let offsets = self.elements.iter().map(|e| e.offset);
        let max = offsets.clone().fold(f64::NEG_INFINITY, f64::max);
        let min = offsets.fold(f64::INFINITY, f64::min);
        if max.is_finite() {
            max - min
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_style() {
        let style = MLineStyle::standard();
        assert_eq!(style.element_count(), 2);
        assert!((style.width() - 1.0).abs() < 1e-12);
        assert_eq!(MLineStyle::new("Empty").width(), 0.0);
    }

    #[test]
    fn test_flags_bits() {
        let flags = MLineStyleFlags::from_bits(1 | 16 | 256);
        assert!(flags.fill_on && flags.start_square_cap && flags.end_square_cap);
        assert_eq!(flags.to_bits(), 273);
    }
}
