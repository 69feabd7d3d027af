//! Spline entity (NURBS curve)

use super::EntityCommon;
use crate::types::Vector3;
use bitflags::bitflags;

bitflags! {
    /// Spline flags (group code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SplineFlags: i16 {
        const CLOSED = 1;
        const PERIODIC = 2;
        const RATIONAL = 4;
        const PLANAR = 8;
        const LINEAR = 16;
    }
}

/// A spline entity (NURBS curve)
#[derive(Debug, Clone, PartialEq)]
pub struct Spline {
    /// Common entity data
    pub common: EntityCommon,
    /// Degree of the spline (typically 3 for cubic)
    pub degree: i16,
    pub flags: SplineFlags,
    /// Knot values
    pub knots: Vec<f64>,
    /// Control points (in WCS)
    pub control_points: Vec<Vector3>,
    /// Weights, one per control point for rational splines
    pub weights: Vec<f64>,
    /// Fit points (in WCS)
    pub fit_points: Vec<Vector3>,
    pub knot_tolerance: f64,
    pub control_point_tolerance: f64,
    pub fit_tolerance: f64,
    /// Start tangent, when fit data defines one
    pub start_tangent: Option<Vector3>,
    /// End tangent, when fit data defines one
    pub end_tangent: Option<Vector3>,
    /// Normal vector
    pub normal: Vector3,
}

impl Spline {
    /// Create a new empty cubic spline
    pub fn new() -> Self {
        Spline {
            common: EntityCommon::new(),
            degree: 3,
            flags: SplineFlags::empty(),
            knots: Vec::new(),
            control_points: Vec::new(),
            weights: Vec::new(),
            fit_points: Vec::new(),
            knot_tolerance: 0.0000001,
            control_point_tolerance: 0.0000001,
            fit_tolerance: 0.0000000001,
            start_tangent: None,
            end_tangent: None,
            normal: Vector3::UNIT_Z,
        }
    }

    /// Create a spline from control points with a uniform clamped knot vector
    pub fn from_control_points(degree: i16, control_points: Vec<Vector3>) -> Self {
        let knots = clamped_knots(degree as usize, control_points.len());
        Spline {
            degree,
            control_points,
            knots,
            ..Self::new()
        }
    }

    /// Create a spline from fit points
    pub fn from_fit_points(fit_points: Vec<Vector3>) -> Self {
        Spline {
            fit_points,
            ..Self::new()
        }
    }

    /// Check if weights must be written
    pub fn is_rational(&self) -> bool {
        self.flags.contains(SplineFlags::RATIONAL)
    }
}

impl Default for Spline {
    fn default() -> Self {
        Self::new()
    }
}

impl_entity!(Spline, "SPLINE");

/// Uniform knot vector clamped at both ends
fn clamped_knots(degree: usize, count: usize) -> Vec<f64> {
    if count <= degree {
        return Vec::new();
    }
    let spans = count - degree;
    let mut knots = Vec::with_capacity(count + degree + 1);
    knots.extend(std::iter::repeat(0.0).take(degree));
    knots.extend((0..=spans).map(|i| i as f64 / spans as f64));
    knots.extend(std::iter::repeat(1.0).take(degree));
    knots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_knot_count() {
        let points = vec![Vector3::ZERO; 5];
        let spline = Spline::from_control_points(3, points);
        assert_eq!(spline.knots.len(), 5 + 3 + 1);
        assert_eq!(spline.knots[0], 0.0);
        assert_eq!(spline.knots[8], 1.0);
    }
}
