//! Color representation for CAD entities

use std::fmt;

/// A color as stored on entities, layers and styles
///
/// On the wire an indexed color is written with code 62 (or 63 in hatch
/// gradients). A true color additionally carries a packed `0x00RRGGBB`
/// value under code 420 (or 421), while code 62 holds the nearest index so
/// that older readers still get a usable color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// Color by layer (index 256)
    #[default]
    ByLayer,
    /// Color by block (index 0)
    ByBlock,
    /// AutoCAD Color Index (1-255)
    Index(u8),
    /// True color with RGB values
    Rgb { r: u8, g: u8, b: u8 },
}

impl Color {
    /// Create a color from an AutoCAD Color Index
    ///
    /// The sign is ignored: layers encode "hidden" as a negative index and
    /// that flag is handled by the layer itself.
    pub fn from_index(index: i16) -> Self {
        match index.unsigned_abs() {
            0 => Color::ByBlock,
            256 => Color::ByLayer,
            i @ 1..=255 => Color::Index(i as u8),
            _ => Color::Index(7),
        }
    }

    /// Create a true color from RGB values
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    /// Create a true color from a packed `0x00RRGGBB` value
    pub fn from_true_color(value: i32) -> Self {
        Color::Rgb {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// Packed `0x00RRGGBB` value, only for true colors
    pub fn true_color(&self) -> Option<i32> {
        match self {
            Color::Rgb { r, g, b } => Some(((*r as i32) << 16) | ((*g as i32) << 8) | (*b as i32)),
            _ => None,
        }
    }

    /// Check whether this is a true color
    pub fn is_true_color(&self) -> bool {
        matches!(self, Color::Rgb { .. })
    }

    /// Common color constants
    pub const RED: Color = Color::Index(1);
    pub const YELLOW: Color = Color::Index(2);
    pub const GREEN: Color = Color::Index(3);
    pub const CYAN: Color = Color::Index(4);
    pub const BLUE: Color = Color::Index(5);
    pub const MAGENTA: Color = Color::Index(6);
    pub const WHITE: Color = Color::Index(7);

    /// Color index written under code 62
    ///
    /// True colors are approximated to one of the seven basic indices.
    pub fn approximate_index(&self) -> i16 {
        match self {
            Color::ByBlock => 0,
            Color::ByLayer => 256,
            Color::Index(i) => *i as i16,
            Color::Rgb { r, g, b } => {
                let (r, g, b) = (*r as u16, *g as u16, *b as u16);
                let brightness = (r + g + b) / 3;
                if brightness < 32 {
                    8
                } else if brightness > 224 {
                    7
                } else if r > 128 && g > 128 && b < 96 {
                    2
                } else if g > 128 && b > 128 && r < 96 {
                    4
                } else if r > 128 && b > 128 && g < 96 {
                    6
                } else if r >= g && r >= b {
                    1
                } else if g >= r && g >= b {
                    3
                } else {
                    5
                }
            }
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::ByLayer => write!(f, "ByLayer"),
            Color::ByBlock => write!(f, "ByBlock"),
            Color::Index(i) => write!(f, "Index({})", i),
            Color::Rgb { r, g, b } => write!(f, "RGB({}, {}, {})", r, g, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_index() {
        assert_eq!(Color::from_index(0), Color::ByBlock);
        assert_eq!(Color::from_index(256), Color::ByLayer);
        assert_eq!(Color::from_index(3), Color::GREEN);
        assert_eq!(Color::from_index(-3), Color::GREEN);
    }

    #[test]
    fn test_true_color_packing() {
        let color = Color::from_rgb(0x12, 0x34, 0x56);
        assert_eq!(color.true_color(), Some(0x123456));
        assert_eq!(Color::from_true_color(0x123456), color);
        assert_eq!(Color::RED.true_color(), None);
    }

    #[test]
    fn test_approximate_index() {
        assert_eq!(Color::ByLayer.approximate_index(), 256);
        assert_eq!(Color::ByBlock.approximate_index(), 0);
        assert_eq!(Color::from_rgb(200, 10, 10).approximate_index(), 1);
        assert_eq!(Color::from_rgb(250, 250, 250).approximate_index(), 7);
    }

    #[test]
    fn test_default_color() {
        assert_eq!(Color::default(), Color::ByLayer);
    }
}
