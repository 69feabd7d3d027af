//! Hatch entity and boundary path types

use super::EntityCommon;
use crate::types::{Color, Handle, Vector2, Vector3};
use bitflags::bitflags;

/// Hatch pattern type (group code 76)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HatchPatternType {
    /// User-defined pattern
    UserDefined = 0,
    /// Predefined pattern
    #[default]
    Predefined = 1,
    /// Custom pattern
    Custom = 2,
}

impl HatchPatternType {
    pub fn from_value(value: i16) -> Self {
        match value {
            0 => Self::UserDefined,
            2 => Self::Custom,
            _ => Self::Predefined,
        }
    }
}

/// Hatch style type (group code 75)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HatchStyleType {
    /// Hatch "odd parity" area (normal)
    #[default]
    Normal = 0,
    /// Hatch outermost area only
    Outer = 1,
    /// Hatch through entire area
    Ignore = 2,
}

impl HatchStyleType {
    pub fn from_value(value: i16) -> Self {
        match value {
            1 => Self::Outer,
            2 => Self::Ignore,
            _ => Self::Normal,
        }
    }
}

bitflags! {
    /// Boundary path flags (group code 92)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BoundaryPathFlags: i32 {
        const EXTERNAL = 1;
        const POLYLINE = 2;
        const DERIVED = 4;
        const TEXTBOX = 8;
        const OUTERMOST = 16;
        const NOT_CLOSED = 32;
        const SELF_INTERSECTING = 64;
        const TEXT_ISLAND = 128;
        const DUPLICATE = 256;
    }
}

/// Line edge in a boundary path
#[derive(Debug, Clone, PartialEq)]
pub struct LineEdge {
    /// Start point (in OCS)
    pub start: Vector2,
    /// End point (in OCS)
    pub end: Vector2,
}

/// Circular arc edge in a boundary path
#[derive(Debug, Clone, PartialEq)]
pub struct CircularArcEdge {
    /// Center point (in OCS)
    pub center: Vector2,
    pub radius: f64,
    /// Start angle in radians
    pub start_angle: f64,
    /// End angle in radians
    pub end_angle: f64,
    pub counter_clockwise: bool,
}

/// Elliptic arc edge in a boundary path
#[derive(Debug, Clone, PartialEq)]
pub struct EllipticArcEdge {
    /// Center point (in OCS)
    pub center: Vector2,
    /// Endpoint of major axis relative to center (in OCS)
    pub major_axis_endpoint: Vector2,
    /// Ratio of minor axis to major axis
    pub minor_axis_ratio: f64,
    /// Start angle in radians
    pub start_angle: f64,
    /// End angle in radians
    pub end_angle: f64,
    pub counter_clockwise: bool,
}

/// Spline edge in a boundary path
#[derive(Debug, Clone, PartialEq)]
pub struct SplineEdge {
    pub degree: i32,
    pub rational: bool,
    pub periodic: bool,
    pub knots: Vec<f64>,
    /// Control points (X, Y, weight)
    pub control_points: Vec<Vector3>,
    /// Fit points, written from AC1024
    pub fit_points: Vec<Vector2>,
    pub start_tangent: Vector2,
    pub end_tangent: Vector2,
}

/// Polyline edge in a boundary path
#[derive(Debug, Clone, PartialEq)]
pub struct PolylineEdge {
    /// Vertices (X, Y, bulge)
    pub vertices: Vec<Vector3>,
    pub is_closed: bool,
}

impl PolylineEdge {
    /// Create a new polyline edge without bulges
    pub fn new(vertices: Vec<Vector2>, is_closed: bool) -> Self {
        Self {
            vertices: vertices.into_iter().map(|v| Vector3::new(v.x, v.y, 0.0)).collect(),
            is_closed,
        }
    }

    /// Add a vertex with bulge
    pub fn add_vertex(&mut self, point: Vector2, bulge: f64) {
        self.vertices.push(Vector3::new(point.x, point.y, bulge));
    }

    /// Check if the polyline has any bulges
    pub fn has_bulge(&self) -> bool {
        self.vertices.iter().any(|v| v.z != 0.0)
    }
}

/// Boundary path edge
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryEdge {
    Line(LineEdge),
    CircularArc(CircularArcEdge),
    EllipticArc(EllipticArcEdge),
    Spline(SplineEdge),
    Polyline(PolylineEdge),
}

/// Boundary path (loop) of a hatch
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundaryPath {
    pub flags: BoundaryPathFlags,
    /// Edges that form the boundary
    pub edges: Vec<BoundaryEdge>,
    /// Handles of associated boundary objects (for associative hatches)
    pub boundary_handles: Vec<Handle>,
}

impl BoundaryPath {
    /// Create a new boundary path
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an external boundary path
    pub fn external() -> Self {
        Self {
            flags: BoundaryPathFlags::EXTERNAL,
            ..Self::default()
        }
    }

    /// Create an external path from a closed polyline
    pub fn polyline(vertices: Vec<Vector2>) -> Self {
        let mut path = Self::external();
        path.add_edge(BoundaryEdge::Polyline(PolylineEdge::new(vertices, true)));
        path
    }

    /// Add an edge to the boundary
    pub fn add_edge(&mut self, edge: BoundaryEdge) {
        if matches!(edge, BoundaryEdge::Polyline(_)) {
            self.flags |= BoundaryPathFlags::POLYLINE;
        }
        self.edges.push(edge);
    }

    /// The single polyline edge, when this is a polyline boundary
    pub fn as_polyline(&self) -> Option<&PolylineEdge> {
        match self.edges.as_slice() {
            [BoundaryEdge::Polyline(p)] if self.flags.contains(BoundaryPathFlags::POLYLINE) => Some(p),
            _ => None,
        }
    }
}

/// Hatch pattern line
///
/// `base_point` is relative to the pattern origin and `offset` is expressed
/// along and across the line direction; both are unscaled.
#[derive(Debug, Clone, PartialEq)]
pub struct HatchPatternLine {
    /// Line angle in radians, relative to the pattern angle
    pub angle: f64,
    pub base_point: Vector2,
    pub offset: Vector2,
    /// Dash lengths (positive = dash, negative = space)
    pub dash_lengths: Vec<f64>,
}

/// Hatch pattern
#[derive(Debug, Clone, PartialEq)]
pub struct HatchPattern {
    pub name: String,
    pub description: String,
    pub lines: Vec<HatchPatternLine>,
}

impl HatchPattern {
    /// Create a new pattern without lines
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            lines: Vec::new(),
        }
    }

    /// Create a solid fill pattern
    pub fn solid() -> Self {
        Self::new("SOLID")
    }

    /// The ANSI31 pattern (45° lines 3.175 apart)
    pub fn ansi31() -> Self {
        let mut pattern = Self::new("ANSI31");
        pattern.description = "ANSI Iron, Brick, Stone masonry".to_string();
        pattern.add_line(HatchPatternLine {
            angle: std::f64::consts::FRAC_PI_4,
            base_point: Vector2::ZERO,
            offset: Vector2::new(0.0, 3.175),
            dash_lengths: Vec::new(),
        });
        pattern
    }

    /// Add a pattern line
    pub fn add_line(&mut self, line: HatchPatternLine) {
        self.lines.push(line);
    }
}

/// Gradient color with value
#[derive(Debug, Clone, PartialEq)]
pub struct GradientColorEntry {
    /// Gradient value (position 0.0 - 1.0)
    pub value: f64,
    pub color: Color,
}

/// Gradient color pattern
#[derive(Debug, Clone, PartialEq)]
pub struct HatchGradientPattern {
    /// Gradient angle in radians
    pub angle: f64,
    /// Gradient shift (0.0 - 1.0)
    pub shift: f64,
    /// Single color gradient flag
    pub is_single_color: bool,
    /// Color tint (for single color gradients)
    pub color_tint: f64,
    pub colors: Vec<GradientColorEntry>,
    /// Gradient name (e.g., "LINEAR", "CYLINDER", etc.)
    pub name: String,
}

impl HatchGradientPattern {
    /// Two-color linear gradient
    pub fn linear(first: Color, second: Color) -> Self {
        let mut gradient = Self {
            angle: 0.0,
            shift: 0.0,
            is_single_color: false,
            color_tint: 0.0,
            colors: Vec::new(),
            name: "LINEAR".to_string(),
        };
        gradient.add_color(0.0, first);
        gradient.add_color(1.0, second);
        gradient
    }

    /// Add a color to the gradient
    pub fn add_color(&mut self, value: f64, color: Color) {
        self.colors.push(GradientColorEntry { value, color });
    }
}

/// Hatch entity
///
/// Represents a filled or patterned area defined by boundary paths.
#[derive(Debug, Clone, PartialEq)]
pub struct Hatch {
    pub common: EntityCommon,
    /// Elevation of the hatch
    pub elevation: f64,
    /// Normal vector (extrusion direction)
    pub normal: Vector3,
    pub pattern: HatchPattern,
    pub is_solid: bool,
    /// Is associative (linked to boundary objects)
    pub is_associative: bool,
    pub pattern_type: HatchPatternType,
    /// Pattern angle in radians
    pub pattern_angle: f64,
    pub pattern_scale: f64,
    /// Is pattern double (for pattern fill only)
    pub is_double: bool,
    pub style: HatchStyleType,
    /// Boundary paths (loops)
    pub paths: Vec<BoundaryPath>,
    /// Gradient fill, when present
    pub gradient: Option<HatchGradientPattern>,
}

impl Hatch {
    /// Create a new solid hatch without boundaries
    pub fn new() -> Self {
        Self {
            common: EntityCommon::default(),
            elevation: 0.0,
            normal: Vector3::UNIT_Z,
            pattern: HatchPattern::solid(),
            is_solid: true,
            is_associative: false,
            pattern_type: HatchPatternType::Predefined,
            pattern_angle: 0.0,
            pattern_scale: 1.0,
            is_double: false,
            style: HatchStyleType::Normal,
            paths: Vec::new(),
            gradient: None,
        }
    }

    /// Create a solid fill hatch
    pub fn solid() -> Self {
        Self::new()
    }

    /// Create a hatch with a line pattern
    pub fn with_pattern(pattern: HatchPattern, angle: f64, scale: f64) -> Self {
        Self {
            pattern,
            is_solid: false,
            pattern_angle: angle,
            pattern_scale: scale,
            ..Self::new()
        }
    }

    /// Builder: add a gradient fill
    pub fn with_gradient(mut self, gradient: HatchGradientPattern) -> Self {
        self.gradient = Some(gradient);
        self
    }

    /// Add a boundary path
    pub fn add_path(&mut self, path: BoundaryPath) {
        self.paths.push(path);
    }
}

impl Default for Hatch {
    fn default() -> Self {
        Self::new()
    }
}

impl_entity!(Hatch, "HATCH");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polyline_path_flags() {
        let path = BoundaryPath::polyline(vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 1.0),
        ]);
        assert!(path.flags.contains(BoundaryPathFlags::EXTERNAL | BoundaryPathFlags::POLYLINE));
        assert!(path.as_polyline().is_some());
    }

    #[test]
    fn test_edge_path_is_not_polyline() {
        let mut path = BoundaryPath::external();
        path.add_edge(BoundaryEdge::Line(LineEdge {
            start: Vector2::ZERO,
            end: Vector2::UNIT_X,
        }));
        assert!(path.as_polyline().is_none());
    }
}
