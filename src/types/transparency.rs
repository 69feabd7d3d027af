//! Transparency representation for CAD entities and layers

use std::fmt;

const BY_BLOCK_FLAG: i32 = 0x0100_0000;
const VALUE_FLAG: i32 = 0x0200_0000;

/// Transparency written under code 440 (entities) or inside the
/// `AcCmTransparency` extended data of a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transparency {
    /// Use the layer's transparency; never written
    #[default]
    ByLayer,
    /// Use the block's transparency
    ByBlock,
    /// Explicit transparency percentage (0 = opaque, 90 = maximum)
    Value(u8),
}

impl Transparency {
    /// Opaque explicit transparency
    pub const OPAQUE: Transparency = Transparency::Value(0);

    /// Create an explicit transparency, clamped to the 0-90 range
    pub fn from_percent(percent: u8) -> Self {
        Transparency::Value(percent.min(90))
    }

    /// Packed alpha value as stored in the file
    ///
    /// The high byte is the type (1 = by block, 2 = explicit) and the low
    /// byte the opacity (255 = opaque).
    pub fn to_alpha_value(&self) -> i32 {
        match self {
            Transparency::ByLayer => 0,
            Transparency::ByBlock => BY_BLOCK_FLAG,
            Transparency::Value(percent) => {
                let alpha = (255.0 * (100.0 - *percent as f64) / 100.0) as i32;
                VALUE_FLAG | alpha
            }
        }
    }

    /// Decode a packed alpha value
    pub fn from_alpha_value(value: i32) -> Self {
        match (value >> 24) & 0xFF {
            1 => Transparency::ByBlock,
            2 | 3 => {
                let alpha = (value & 0xFF) as f64;
                let percent = (100.0 - alpha * 100.0 / 255.0).round();
                Transparency::Value(percent.clamp(0.0, 90.0) as u8)
            }
            _ => Transparency::ByLayer,
        }
    }

    /// Check whether this is the by-layer default
    pub fn is_by_layer(&self) -> bool {
        matches!(self, Transparency::ByLayer)
    }
}

impl fmt::Display for Transparency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transparency::ByLayer => write!(f, "ByLayer"),
            Transparency::ByBlock => write!(f, "ByBlock"),
            Transparency::Value(p) => write!(f, "{}%", p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_value_encoding() {
        assert_eq!(Transparency::OPAQUE.to_alpha_value(), 0x0200_00FF);
        assert_eq!(Transparency::ByBlock.to_alpha_value(), 0x0100_0000);
        assert_eq!(Transparency::Value(50).to_alpha_value(), 0x0200_007F);
    }

    #[test]
    fn test_alpha_value_roundtrip() {
        for percent in 0..=90u8 {
            let t = Transparency::Value(percent);
            assert_eq!(Transparency::from_alpha_value(t.to_alpha_value()), t);
        }
        assert_eq!(Transparency::from_alpha_value(0x0100_0000), Transparency::ByBlock);
        assert_eq!(Transparency::from_alpha_value(0), Transparency::ByLayer);
    }

    #[test]
    fn test_from_percent_clamps() {
        assert_eq!(Transparency::from_percent(120), Transparency::Value(90));
    }
}
