//! Dimension entity types

use super::{Entity, EntityCommon};
use crate::types::Vector3;

/// Dimension type (low bits of group code 70)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionType {
    /// Rotated, horizontal, or vertical linear dimension
    Linear = 0,
    /// Aligned dimension
    Aligned = 1,
    /// Angular 2 lines dimension
    Angular = 2,
    /// Diameter dimension
    Diameter = 3,
    /// Radius dimension
    Radius = 4,
    /// Angular 3 points dimension
    Angular3Point = 5,
    /// Ordinate dimension
    Ordinate = 6,
}

impl DimensionType {
    /// Dimension type from the raw code-70 value, ignoring the flag bits
    pub fn from_flags(flags: i16) -> Option<Self> {
        match flags & 0x0F {
            0 => Some(Self::Linear),
            1 => Some(Self::Aligned),
            2 => Some(Self::Angular),
            3 => Some(Self::Diameter),
            4 => Some(Self::Radius),
            5 => Some(Self::Angular3Point),
            6 => Some(Self::Ordinate),
            _ => None,
        }
    }
}

/// Attachment point type for dimension text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttachmentPointType {
    TopLeft = 1,
    TopCenter = 2,
    TopRight = 3,
    MiddleLeft = 4,
    #[default]
    MiddleCenter = 5,
    MiddleRight = 6,
    BottomLeft = 7,
    BottomCenter = 8,
    BottomRight = 9,
}

impl AttachmentPointType {
    pub fn from_value(value: i16) -> Self {
        match value {
            1 => Self::TopLeft,
            2 => Self::TopCenter,
            3 => Self::TopRight,
            4 => Self::MiddleLeft,
            6 => Self::MiddleRight,
            7 => Self::BottomLeft,
            8 => Self::BottomCenter,
            9 => Self::BottomRight,
            _ => Self::MiddleCenter,
        }
    }
}

/// Base dimension entity
///
/// All dimension types share common properties and behavior.
/// Specific dimension types extend this base with additional properties.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionBase {
    pub common: EntityCommon,
    /// Definition point (in WCS); its meaning depends on the dimension type
    pub definition_point: Vector3,
    /// Middle point of dimension text (in WCS)
    pub text_middle_point: Vector3,
    /// Text position was moved by the user (flag 128)
    pub user_text_position: bool,
    /// Attachment point
    pub attachment_point: AttachmentPointType,
    /// Line spacing style: 1 at least, 2 exact
    pub line_spacing_style: i16,
    /// Line spacing factor
    pub line_spacing_factor: f64,
    /// Text explicitly entered by the user, `<>` stands for the measurement
    pub user_text: Option<String>,
    /// Normal vector (extrusion direction)
    pub normal: Vector3,
    /// Rotation angle of dimension text in radians
    pub text_rotation: f64,
    /// Horizontal direction for the dimension entity in radians
    pub horizontal_direction: f64,
    /// Dimension style name
    pub style_name: String,
    /// Actual measurement
    pub actual_measurement: f64,
    /// Anonymous block (`*D<n>`) holding the dimension geometry
    pub block_name: String,
}

impl DimensionBase {
    /// Create a new dimension base
    pub fn new() -> Self {
        Self {
            common: EntityCommon::default(),
            definition_point: Vector3::ZERO,
            text_middle_point: Vector3::ZERO,
            user_text_position: false,
            attachment_point: AttachmentPointType::MiddleCenter,
            line_spacing_style: 1,
            line_spacing_factor: 1.0,
            user_text: None,
            normal: Vector3::UNIT_Z,
            text_rotation: 0.0,
            horizontal_direction: 0.0,
            style_name: "Standard".to_string(),
            actual_measurement: 0.0,
            block_name: String::new(),
        }
    }

    /// Builder: Set the text override
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.user_text = Some(text.into());
        self
    }

    /// Builder: Set the style name
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style_name = style.into();
        self
    }
}

impl Default for DimensionBase {
    fn default() -> Self {
        Self::new()
    }
}

/// Aligned dimension entity
///
/// Measures the distance between two points along a line parallel to those
/// points. The base definition point lies on the dimension line.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionAligned {
    pub base: DimensionBase,
    /// First extension line origin (in WCS)
    pub first_point: Vector3,
    /// Second extension line origin (in WCS)
    pub second_point: Vector3,
}

impl DimensionAligned {
    /// Create a new aligned dimension, offset from the measured points
    pub fn new(first_point: Vector3, second_point: Vector3, offset: f64) -> Self {
        let mut dim = Self {
            base: DimensionBase::new(),
            first_point,
            second_point,
        };
        dim.base.actual_measurement = dim.measurement();
        dim.set_offset(offset);
        dim
    }

    /// Get the measurement value
    pub fn measurement(&self) -> f64 {
        self.first_point.distance(&self.second_point)
    }

    /// Set the offset distance from the measured points
    pub fn set_offset(&mut self, offset: f64) {
        let dir = self.second_point - self.first_point;
        let perpendicular = Vector3::new(-dir.y, dir.x, 0.0).normalize();
        self.base.definition_point = self.second_point + perpendicular * offset;
        let middle = (self.first_point + self.second_point) * 0.5;
        self.base.text_middle_point = middle + perpendicular * offset;
    }
}

/// Linear dimension entity
///
/// Measures the distance between two points projected on a rotated axis.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionLinear {
    pub base: DimensionBase,
    /// First extension line origin (in WCS)
    pub first_point: Vector3,
    /// Second extension line origin (in WCS)
    pub second_point: Vector3,
    /// Rotation angle of the dimension line in radians
    pub rotation: f64,
    /// Oblique angle of the extension lines in radians
    pub ext_line_rotation: f64,
}

impl DimensionLinear {
    /// Create a new linear dimension along `rotation`
    pub fn new(first_point: Vector3, second_point: Vector3, rotation: f64, offset: f64) -> Self {
        let mut dim = Self {
            base: DimensionBase::new(),
            first_point,
            second_point,
            rotation,
            ext_line_rotation: 0.0,
        };
        dim.base.actual_measurement = dim.measurement();
        dim.set_offset(offset);
        dim
    }

    /// Create a horizontal linear dimension
    pub fn horizontal(first_point: Vector3, second_point: Vector3, offset: f64) -> Self {
        Self::new(first_point, second_point, 0.0, offset)
    }

    /// Create a vertical linear dimension
    pub fn vertical(first_point: Vector3, second_point: Vector3, offset: f64) -> Self {
        Self::new(first_point, second_point, std::f64::consts::FRAC_PI_2, offset)
    }

    /// Get the measurement value (projected onto rotation axis)
    pub fn measurement(&self) -> f64 {
        let axis = Vector3::new(self.rotation.cos(), self.rotation.sin(), 0.0);
        (self.second_point - self.first_point).dot(&axis).abs()
    }

    /// Set the offset distance
    pub fn set_offset(&mut self, offset: f64) {
        let axis_y = Vector3::new(-self.rotation.sin(), self.rotation.cos(), 0.0);
        self.base.definition_point = self.second_point + axis_y * offset;
        let middle = (self.first_point + self.second_point) * 0.5;
        self.base.text_middle_point = middle + axis_y * offset;
    }
}

/// Radius dimension entity
///
/// The base definition point is the center of the arc or circle.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionRadius {
    pub base: DimensionBase,
    /// Point on the arc/circle (in WCS)
    pub point_on_arc: Vector3,
    /// Leader length
    pub leader_length: f64,
}

impl DimensionRadius {
    /// Create a new radius dimension
    pub fn new(center: Vector3, point_on_arc: Vector3) -> Self {
        let mut base = DimensionBase::new();
        base.definition_point = center;
        base.text_middle_point = point_on_arc;
        base.actual_measurement = center.distance(&point_on_arc);
        Self {
            base,
            point_on_arc,
            leader_length: 0.0,
        }
    }

    pub fn measurement(&self) -> f64 {
        self.base.definition_point.distance(&self.point_on_arc)
    }
}

/// Diameter dimension entity
///
/// The base definition point and `far_point` are opposite points on the
/// circle.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionDiameter {
    pub base: DimensionBase,
    /// Point on the circle opposite the definition point (in WCS)
    pub far_point: Vector3,
    /// Leader length
    pub leader_length: f64,
}

impl DimensionDiameter {
    /// Create a new diameter dimension through `point_on_arc`
    pub fn new(center: Vector3, point_on_arc: Vector3) -> Self {
        let mut base = DimensionBase::new();
        base.definition_point = center * 2.0 - point_on_arc;
        base.text_middle_point = center;
        base.actual_measurement = 2.0 * center.distance(&point_on_arc);
        Self {
            base,
            far_point: point_on_arc,
            leader_length: 0.0,
        }
    }

    pub fn measurement(&self) -> f64 {
        self.base.definition_point.distance(&self.far_point)
    }

    /// Center of the measured circle
    pub fn center(&self) -> Vector3 {
        (self.base.definition_point + self.far_point) * 0.5
    }
}

/// Angular 2-line dimension entity
///
/// The base definition point is the end of the second line.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionAngular2Ln {
    pub base: DimensionBase,
    /// Start of the first line (in WCS)
    pub first_line_start: Vector3,
    /// End of the first line (in WCS)
    pub first_line_end: Vector3,
    /// Start of the second line (in WCS)
    pub second_line_start: Vector3,
    /// Point on the dimension arc (in WCS)
    pub dimension_arc: Vector3,
}

impl DimensionAngular2Ln {
    /// Create a new angular dimension between two lines
    pub fn new(first_line: (Vector3, Vector3), second_line: (Vector3, Vector3), arc_point: Vector3) -> Self {
        let mut base = DimensionBase::new();
        base.definition_point = second_line.1;
        base.text_middle_point = arc_point;
        let mut dim = Self {
            base,
            first_line_start: first_line.0,
            first_line_end: first_line.1,
            second_line_start: second_line.0,
            dimension_arc: arc_point,
        };
        dim.base.actual_measurement = dim.measurement_radians();
        dim
    }

    /// Get the angle measurement in radians
    pub fn measurement_radians(&self) -> f64 {
        let v1 = (self.first_line_end - self.first_line_start).normalize();
        let v2 = (self.base.definition_point - self.second_line_start).normalize();
        v1.dot(&v2).clamp(-1.0, 1.0).acos()
    }
}

/// Angular 3-point dimension entity
///
/// The base definition point lies on the dimension arc.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionAngular3Pt {
    pub base: DimensionBase,
    /// Point on the first leg (in WCS)
    pub first_point: Vector3,
    /// Point on the second leg (in WCS)
    pub second_point: Vector3,
    /// Angle vertex (in WCS)
    pub angle_vertex: Vector3,
}

impl DimensionAngular3Pt {
    /// Create a new angular 3-point dimension
    pub fn new(vertex: Vector3, first_point: Vector3, second_point: Vector3, arc_point: Vector3) -> Self {
        let mut base = DimensionBase::new();
        base.definition_point = arc_point;
        base.text_middle_point = arc_point;
        let mut dim = Self {
            base,
            first_point,
            second_point,
            angle_vertex: vertex,
        };
        dim.base.actual_measurement = dim.measurement_radians();
        dim
    }

    /// Get the angle measurement in radians
    pub fn measurement_radians(&self) -> f64 {
        let v1 = (self.first_point - self.angle_vertex).normalize();
        let v2 = (self.second_point - self.angle_vertex).normalize();
        v1.dot(&v2).clamp(-1.0, 1.0).acos()
    }
}

/// Ordinate dimension entity
///
/// The base definition point is the origin the ordinate is measured from.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionOrdinate {
    pub base: DimensionBase,
    /// Feature location point (in WCS)
    pub feature_location: Vector3,
    /// Leader endpoint (in WCS)
    pub leader_endpoint: Vector3,
    /// True if this is an X-ordinate, false for Y-ordinate
    pub is_ordinate_type_x: bool,
    /// Rotation of the ordinate axes in radians
    pub rotation: f64,
}

impl DimensionOrdinate {
    /// Create a new ordinate dimension measured from the world origin
    pub fn new(feature_location: Vector3, leader_endpoint: Vector3, is_x_type: bool) -> Self {
        let mut base = DimensionBase::new();
        base.text_middle_point = leader_endpoint;
        let mut dim = Self {
            base,
            feature_location,
            leader_endpoint,
            is_ordinate_type_x: is_x_type,
            rotation: 0.0,
        };
        dim.base.actual_measurement = dim.measurement();
        dim
    }

    /// Create a new X-ordinate dimension
    pub fn x_ordinate(feature_location: Vector3, leader_endpoint: Vector3) -> Self {
        Self::new(feature_location, leader_endpoint, true)
    }

    /// Create a new Y-ordinate dimension
    pub fn y_ordinate(feature_location: Vector3, leader_endpoint: Vector3) -> Self {
        Self::new(feature_location, leader_endpoint, false)
    }

    /// Get the ordinate measurement
    pub fn measurement(&self) -> f64 {
        let local = (self.feature_location - self.base.definition_point).xy().rotate(-self.rotation);
        if self.is_ordinate_type_x {
            local.x
        } else {
            local.y
        }
    }
}

/// Unified dimension enum for all dimension types
#[derive(Debug, Clone, PartialEq)]
pub enum Dimension {
    Aligned(DimensionAligned),
    Linear(DimensionLinear),
    Radius(DimensionRadius),
    Diameter(DimensionDiameter),
    Angular2Ln(DimensionAngular2Ln),
    Angular3Pt(DimensionAngular3Pt),
    Ordinate(DimensionOrdinate),
}

impl Dimension {
    /// Get the base dimension data
    pub fn base(&self) -> &DimensionBase {
        match self {
            Dimension::Aligned(d) => &d.base,
            Dimension::Linear(d) => &d.base,
            Dimension::Radius(d) => &d.base,
            Dimension::Diameter(d) => &d.base,
            Dimension::Angular2Ln(d) => &d.base,
            Dimension::Angular3Pt(d) => &d.base,
            Dimension::Ordinate(d) => &d.base,
        }
    }

    /// Get mutable base dimension data
    pub fn base_mut(&mut self) -> &mut DimensionBase {
        match self {
            Dimension::Aligned(d) => &mut d.base,
            Dimension::Linear(d) => &mut d.base,
            Dimension::Radius(d) => &mut d.base,
            Dimension::Diameter(d) => &mut d.base,
            Dimension::Angular2Ln(d) => &mut d.base,
            Dimension::Angular3Pt(d) => &mut d.base,
            Dimension::Ordinate(d) => &mut d.base,
        }
    }

    /// Dimension type written in the low bits of code 70
    pub fn dimension_type(&self) -> DimensionType {
        match self {
            Dimension::Aligned(_) => DimensionType::Aligned,
            Dimension::Linear(_) => DimensionType::Linear,
            Dimension::Radius(_) => DimensionType::Radius,
            Dimension::Diameter(_) => DimensionType::Diameter,
            Dimension::Angular2Ln(_) => DimensionType::Angular,
            Dimension::Angular3Pt(_) => DimensionType::Angular3Point,
            Dimension::Ordinate(_) => DimensionType::Ordinate,
        }
    }

    /// Full code-70 value: type, block reference bit (32), X-ordinate bit
    /// (64) and user text position bit (128)
    pub fn flags(&self) -> i16 {
        let mut flags = self.dimension_type() as i16 | 32;
        if let Dimension::Ordinate(d) = self {
            if d.is_ordinate_type_x {
                flags |= 64;
            }
        }
        if self.base().user_text_position {
            flags |= 128;
        }
        flags
    }

    /// Get the measurement value (radians for angular dimensions)
    pub fn measurement(&self) -> f64 {
        match self {
            Dimension::Aligned(d) => d.measurement(),
            Dimension::Linear(d) => d.measurement(),
            Dimension::Radius(d) => d.measurement(),
            Dimension::Diameter(d) => d.measurement(),
            Dimension::Angular2Ln(d) => d.measurement_radians(),
            Dimension::Angular3Pt(d) => d.measurement_radians(),
            Dimension::Ordinate(d) => d.measurement(),
        }
    }
}

impl Entity for Dimension {
    fn common(&self) -> &EntityCommon {
        &self.base().common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.base_mut().common
    }

    fn entity_type(&self) -> &'static str {
        "DIMENSION"
    }
}

macro_rules! impl_from_dimension {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Dimension {
                fn from(dimension: $ty) -> Self {
                    Dimension::$variant(dimension)
                }
            }
        )*
    };
}

impl_from_dimension!(
    Aligned(DimensionAligned),
    Linear(DimensionLinear),
    Radius(DimensionRadius),
    Diameter(DimensionDiameter),
    Angular2Ln(DimensionAngular2Ln),
    Angular3Pt(DimensionAngular3Pt),
    Ordinate(DimensionOrdinate),
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_measurement() {
        let dim = DimensionLinear::horizontal(Vector3::ZERO, Vector3::new(3.0, 4.0, 0.0), 1.0);
        assert!((dim.measurement() - 3.0).abs() < 1e-12);
        assert_eq!(dim.base.definition_point, Vector3::new(3.0, 5.0, 0.0));
    }

    #[test]
    fn test_flags() {
        let x: Dimension = DimensionOrdinate::x_ordinate(Vector3::ZERO, Vector3::new(0.0, 5.0, 0.0)).into();
        assert_eq!(x.flags(), 6 | 32 | 64);

        let mut aligned: Dimension = DimensionAligned::new(Vector3::ZERO, Vector3::UNIT_X, 1.0).into();
        aligned.base_mut().user_text_position = true;
        assert_eq!(aligned.flags(), 1 | 32 | 128);
    }

    #[test]
    fn test_type_from_flags() {
        assert_eq!(DimensionType::from_flags(6 | 32 | 64), Some(DimensionType::Ordinate));
        assert_eq!(DimensionType::from_flags(32), Some(DimensionType::Linear));
        assert_eq!(DimensionType::from_flags(9), None);
    }

    #[test]
    fn test_diameter_center() {
        let dim = DimensionDiameter::new(Vector3::new(1.0, 1.0, 0.0), Vector3::new(3.0, 1.0, 0.0));
        assert_eq!(dim.center(), Vector3::new(1.0, 1.0, 0.0));
        assert!((dim.measurement() - 4.0).abs() < 1e-12);
    }
}
