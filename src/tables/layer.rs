//! Layer table entry

use crate::types::{Color, Handle, LineWeight, Transparency};
use crate::xdata::ExtendedData;

/// Layer state flags (group code 70)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerFlags {
    /// Layer is frozen (bit 1)
    pub frozen: bool,
    /// Layer is frozen in new viewports (bit 2)
    pub frozen_in_new_viewports: bool,
    /// Layer is locked (bit 4)
    pub locked: bool,
}

impl LayerFlags {
    /// Decode from the raw code 70 value
    pub fn from_bits(bits: i16) -> Self {
        LayerFlags {
            frozen: bits & 1 != 0,
            frozen_in_new_viewports: bits & 2 != 0,
            locked: bits & 4 != 0,
        }
    }

    /// Encode as the raw code 70 value
    pub fn to_bits(self) -> i16 {
        let mut bits = 0;
        if self.frozen {
            bits |= 1;
        }
        if self.frozen_in_new_viewports {
            bits |= 2;
        }
        if self.locked {
            bits |= 4;
        }
        bits
    }
}

/// A layer table entry
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Unique handle
    pub handle: Handle,
    /// Layer name
    pub name: String,
    pub flags: LayerFlags,
    /// Layer is off; written as a negative color index
    pub hidden: bool,
    /// Layer color
    pub color: Color,
    /// Line type name
    pub line_type: String,
    pub line_weight: LineWeight,
    /// Is this layer plotted?
    pub is_plottable: bool,
    /// Plot style name object (code 390)
    pub plot_style_handle: Handle,
    /// Layer transparency, stored as `AcCmTransparency` extended data
    pub transparency: Transparency,
    pub extended_data: ExtendedData,
}

impl Layer {
    /// Create a new layer
    pub fn new(name: impl Into<String>) -> Self {
        Layer {
            handle: Handle::NULL,
            name: name.into(),
            flags: LayerFlags::default(),
            hidden: false,
            color: Color::WHITE,
            line_type: "Continuous".to_string(),
            line_weight: LineWeight::Default,
            is_plottable: true,
            plot_style_handle: Handle::NULL,
            transparency: Transparency::ByLayer,
            extended_data: ExtendedData::new(),
        }
    }

    /// Create the standard layer "0"
    pub fn layer_0() -> Self {
        Self::new("0")
    }

    /// Builder: set the color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Builder: set the line type
    pub fn with_line_type(mut self, line_type: impl Into<String>) -> Self {
        self.line_type = line_type.into();
        self
    }

    /// Color index written under code 62; negative when the layer is off
    pub fn signed_color_index(&self) -> i16 {
        let index = self.color.approximate_index();
        if self.hidden {
            -index
        } else {
            index
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.flags.frozen
    }

    pub fn is_locked(&self) -> bool {
        self.flags.locked
    }
}

impl_table_entry!(Layer, |entry: &Layer| entry.name == "0");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_layer_negates_color() {
        let mut layer = Layer::new("Hidden").with_color(Color::RED);
        assert_eq!(layer.signed_color_index(), 1);
        layer.hidden = true;
        assert_eq!(layer.signed_color_index(), -1);
    }

    #[test]
    fn test_flags_bits() {
        let flags = LayerFlags::from_bits(5);
        assert!(flags.frozen);
        assert!(flags.locked);
        assert!(!flags.frozen_in_new_viewports);
        assert_eq!(flags.to_bits(), 5);
    }
}
