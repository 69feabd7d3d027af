//! Ellipse entity

use super::EntityCommon;
use crate::types::transform::normalize_angle;
use crate::types::Vector3;
use std::f64::consts::TAU;

/// An ellipse or elliptical arc
///
/// The arc is described by geometric angles measured from the major axis.
/// DXF stores eccentric-anomaly parameters instead, see
/// [`Ellipse::parameter_at`] and [`Ellipse::angle_at`].
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    pub common: EntityCommon,
    /// Center point (in WCS)
    pub center: Vector3,
    /// Full length of the major axis
    pub major_axis: f64,
    /// Full length of the minor axis
    pub minor_axis: f64,
    /// Rotation of the major axis in the OCS, in radians
    pub rotation: f64,
    /// Start angle in radians
    pub start_angle: f64,
    /// End angle in radians
    pub end_angle: f64,
    /// Normal vector
    pub normal: Vector3,
}

impl Ellipse {
    /// Create a full ellipse
    pub fn new(center: Vector3, major_axis: f64, minor_axis: f64) -> Self {
        Ellipse {
            common: EntityCommon::new(),
            center,
            major_axis,
            minor_axis,
            rotation: 0.0,
            start_angle: 0.0,
            end_angle: TAU,
            normal: Vector3::UNIT_Z,
        }
    }

    /// Builder: set the major axis rotation
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder: turn the ellipse into an arc
    pub fn with_angles(mut self, start_angle: f64, end_angle: f64) -> Self {
        self.start_angle = start_angle;
        self.end_angle = end_angle;
        self
    }

    /// Minor to major axis ratio
    pub fn ratio(&self) -> f64 {
        self.minor_axis / self.major_axis
    }

    /// Check whether start and end angles describe a closed ellipse
    pub fn is_full(&self) -> bool {
        let delta = normalize_angle(self.end_angle - self.start_angle);
        delta < 1e-12 || TAU - delta < 1e-12
    }

    /// Eccentric-anomaly parameter of the point at a geometric angle
    pub fn parameter_at(&self, angle: f64) -> f64 {
        let a = self.major_axis * 0.5;
        let b = self.minor_axis * 0.5;
        let (sin, cos) = angle.sin_cos();
        let radius = a * b / ((b * cos).powi(2) + (a * sin).powi(2)).sqrt();
        let px = radius * cos;
        let py = radius * sin;
        (py / b).atan2(px / a)
    }

    /// Geometric angle of the point at an eccentric-anomaly parameter
    pub fn angle_at(&self, parameter: f64) -> f64 {
        let a = self.major_axis * 0.5;
        let b = self.minor_axis * 0.5;
        (b * parameter.sin()).atan2(a * parameter.cos())
    }
}

impl Default for Ellipse {
    fn default() -> Self {
        Self::new(Vector3::ZERO, 2.0, 1.0)
    }
}

impl_entity!(Ellipse, "ELLIPSE");

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_full_ellipse() {
        let e = Ellipse::new(Vector3::ZERO, 4.0, 2.0);
        assert!(e.is_full());
        assert!(!e.clone().with_angles(0.0, FRAC_PI_2).is_full());
        assert!(e.with_angles(1.0, 1.0 + TAU).is_full());
    }

    #[test]
    fn test_parameter_on_axes() {
        let e = Ellipse::new(Vector3::ZERO, 4.0, 2.0);
        assert!(e.parameter_at(0.0).abs() < 1e-12);
        assert!((e.parameter_at(FRAC_PI_2) - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_parameter_angle_inverse() {
        let e = Ellipse::new(Vector3::ZERO, 10.0, 3.0);
        for angle in [0.3, 1.2, 2.5, -0.7] {
            let back = e.angle_at(e.parameter_at(angle));
            assert!((back - angle).abs() < 1e-9, "{angle} -> {back}");
        }
    }
}
