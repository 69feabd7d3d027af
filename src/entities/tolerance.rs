//! Tolerance entity (feature control frame)

use super::EntityCommon;
use crate::types::Vector3;

/// Geometric tolerance frame
///
/// The text uses the control codes of the `FCF` format, e.g. `{\Fgdt;j}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tolerance {
    pub common: EntityCommon,
    /// Dimension style name
    pub dimension_style: String,
    /// Insertion point (in WCS)
    pub insertion_point: Vector3,
    /// Frame text
    pub text: String,
    /// X axis direction (in WCS)
    pub direction: Vector3,
    pub normal: Vector3,
}

impl Tolerance {
    /// Create a tolerance frame at a point
    pub fn new(text: impl Into<String>, insertion_point: Vector3) -> Self {
        Tolerance {
            common: EntityCommon::new(),
            dimension_style: "Standard".to_string(),
            insertion_point,
            text: text.into(),
            direction: Vector3::UNIT_X,
            normal: Vector3::UNIT_Z,
        }
    }
}

impl_entity!(Tolerance, "TOLERANCE");
