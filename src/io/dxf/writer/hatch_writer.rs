//! HATCH encoder

use super::section_writer::SectionWriter;
use super::stream_writer::{DxfStreamWriter, DxfStreamWriterExt};
use crate::entities::{BoundaryEdge, BoundaryPath, Hatch, HatchGradientPattern, PolylineEdge};
use crate::error::{DxfError, Result};
use crate::types::{DxfVersion, Vector2, Vector3};

/// Code 47: pixel size used to compute the pattern
const PIXEL_SIZE: f64 = 0.0;
/// Seed points written under code 98 and then 10/20
const SEED_POINTS: [Vector2; 1] = [Vector2::ZERO];

impl<'a, W: DxfStreamWriter> SectionWriter<'a, W> {
    pub(super) fn write_hatch(&mut self, hatch: &Hatch) -> Result<()> {
        self.write_entity_header("HATCH", &hatch.common)?;
        self.writer.write_subclass("AcDbHatch")?;
        self.writer
            .write_point3d(10, Vector3::new(0.0, 0.0, hatch.elevation))?;
        self.writer.write_normal(hatch.normal)?;
        self.write_str(2, &hatch.pattern.name)?;
        self.writer.write_flag(70, hatch.is_solid)?;
        self.writer.write_flag(71, hatch.is_associative)?;

        self.writer.write_i32(91, hatch.paths.len() as i32)?;
        for path in &hatch.paths {
            self.write_boundary_path(path)?;
        }

        self.writer.write_i16(75, hatch.style as i16)?;
        self.writer.write_i16(76, hatch.pattern_type as i16)?;
        if !hatch.is_solid {
            self.write_pattern(hatch)?;
        }

        self.writer.write_double(47, PIXEL_SIZE)?;
        self.writer.write_i32(98, SEED_POINTS.len() as i32)?;
        for seed in SEED_POINTS {
            self.writer.write_point2d(10, seed)?;
        }

        if let Some(gradient) = &hatch.gradient {
            if self.version > DxfVersion::AC1015 {
                self.write_gradient(gradient)?;
            }
        }
        Ok(())
    }

    fn write_boundary_path(&mut self, path: &BoundaryPath) -> Result<()> {
        self.writer.write_i32(92, path.flags.bits())?;
        match path.as_polyline() {
            Some(polyline) => self.write_polyline_path(polyline)?,
            None => {
                self.writer.write_i32(93, path.edges.len() as i32)?;
                for edge in &path.edges {
                    self.write_edge(edge)?;
                }
            }
        }
        self.writer.write_i32(97, path.boundary_handles.len() as i32)?;
        for handle in &path.boundary_handles {
            self.writer.write_handle(330, *handle)?;
        }
        Ok(())
    }

    fn write_polyline_path(&mut self, polyline: &PolylineEdge) -> Result<()> {
        let has_bulge = polyline.has_bulge();
        self.writer.write_flag(72, has_bulge)?;
        self.writer.write_flag(73, polyline.is_closed)?;
        self.writer.write_i32(93, polyline.vertices.len() as i32)?;
        for vertex in &polyline.vertices {
            self.writer.write_double(10, vertex.x)?;
            self.writer.write_double(20, vertex.y)?;
            if has_bulge {
                self.writer.write_double(42, vertex.z)?;
            }
        }
        Ok(())
    }

    fn write_edge(&mut self, edge: &BoundaryEdge) -> Result<()> {
        match edge {
            BoundaryEdge::Line(line) => {
                self.writer.write_i16(72, 1)?;
                self.writer.write_point2d(10, line.start)?;
                self.writer.write_point2d(11, line.end)?;
            }
            BoundaryEdge::CircularArc(arc) => {
                self.writer.write_i16(72, 2)?;
                self.writer.write_point2d(10, arc.center)?;
                self.writer.write_double(40, arc.radius)?;
                self.writer.write_angle(50, arc.start_angle)?;
                self.writer.write_angle(51, arc.end_angle)?;
                self.writer.write_flag(73, arc.counter_clockwise)?;
            }
            BoundaryEdge::EllipticArc(ellipse) => {
                self.writer.write_i16(72, 3)?;
                self.writer.write_point2d(10, ellipse.center)?;
                self.writer.write_point2d(11, ellipse.major_axis_endpoint)?;
                self.writer.write_double(40, ellipse.minor_axis_ratio)?;
                self.writer.write_angle(50, ellipse.start_angle)?;
                self.writer.write_angle(51, ellipse.end_angle)?;
                self.writer.write_flag(73, ellipse.counter_clockwise)?;
            }
            BoundaryEdge::Spline(spline) => {
                self.writer.write_i16(72, 4)?;
                self.writer.write_i32(94, spline.degree)?;
                self.writer.write_flag(73, spline.rational)?;
                self.writer.write_flag(74, spline.periodic)?;
                self.writer.write_i32(95, spline.knots.len() as i32)?;
                self.writer.write_i32(96, spline.control_points.len() as i32)?;
                for knot in &spline.knots {
                    self.writer.write_double(40, *knot)?;
                }
                for point in &spline.control_points {
                    self.writer.write_double(10, point.x)?;
                    self.writer.write_double(20, point.y)?;
                    if spline.rational {
                        self.writer.write_double(42, point.z)?;
                    }
                }
                if self.version >= DxfVersion::AC1024 {
                    self.writer.write_i32(97, spline.fit_points.len() as i32)?;
                    for point in &spline.fit_points {
                        self.writer.write_point2d(11, *point)?;
                    }
                    self.writer.write_point2d(12, spline.start_tangent)?;
                    self.writer.write_point2d(13, spline.end_tangent)?;
                }
            }
            BoundaryEdge::Polyline(_) => {
                return Err(DxfError::structure(
                    "a polyline edge must be the only edge of a polyline boundary",
                ));
            }
        }
        Ok(())
    }

    fn write_pattern(&mut self, hatch: &Hatch) -> Result<()> {
        let scale = hatch.pattern_scale;
        let angle = hatch.pattern_angle;
        self.writer.write_angle(52, angle)?;
        self.writer.write_double(41, scale)?;
        self.writer.write_flag(77, hatch.is_double)?;
        self.writer.write_i16(78, hatch.pattern.lines.len() as i16)?;
        for line in &hatch.pattern.lines {
            let total = line.angle + angle;
            let base = line.base_point.rotate(angle) * scale;
            let offset = line.offset.rotate(total) * scale;
            self.writer.write_angle(53, total)?;
            self.writer.write_double(43, base.x)?;
            self.writer.write_double(44, base.y)?;
            self.writer.write_double(45, offset.x)?;
            self.writer.write_double(46, offset.y)?;
            self.writer.write_i16(79, line.dash_lengths.len() as i16)?;
            for dash in &line.dash_lengths {
                self.writer.write_double(49, dash * scale)?;
            }
        }
        Ok(())
    }

    fn write_gradient(&mut self, gradient: &HatchGradientPattern) -> Result<()> {
        self.writer.write_i32(450, 1)?;
        self.writer.write_i32(451, 0)?;
        self.writer.write_i32(452, gradient.is_single_color as i32)?;
        self.writer.write_i32(453, 2)?;
        self.writer.write_double(460, gradient.angle)?;
        self.writer.write_double(461, gradient.shift)?;
        self.writer.write_double(462, gradient.color_tint)?;
        for entry in &gradient.colors {
            self.writer.write_double(463, entry.value)?;
            self.writer.write_color(63, entry.color)?;
            if let Some(rgb) = entry.color.true_color() {
                self.writer.write_i32(421, rgb)?;
            }
        }
        self.write_str(470, &gradient.name)
    }
}

#[cfg(test)]
mod tests {
    use super::super::section_writer::render_entity;
    use crate::document::CadDocument;
    use crate::entities::*;
    use crate::types::{Color, DxfVersion, Vector2};

    fn square() -> BoundaryPath {
        BoundaryPath::polyline(vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(0.0, 1.0),
        ])
    }

    fn render(hatch: Hatch, version: DxfVersion) -> Vec<(i32, String)> {
        let mut doc = CadDocument::new();
        let handle = doc.add_entity(hatch);
        render_entity(&doc, version, doc.entity(handle).unwrap()).unwrap()
    }

    fn p(code: i32, value: &str) -> (i32, String) {
        (code, value.to_string())
    }

    #[test]
    fn test_solid_hatch_seed_point() {
        let mut hatch = Hatch::solid();
        hatch.add_path(square());
        let pairs = render(hatch, DxfVersion::AC1032);
        let at = pairs.iter().position(|x| x == &p(47, "0.0")).unwrap();
        assert_eq!(
            &pairs[at..at + 4],
            &[p(47, "0.0"), p(98, "1"), p(10, "0.0"), p(20, "0.0")]
        );
        assert!(pairs.contains(&p(70, "1")));
        assert!(!pairs.iter().any(|x| x.0 == 52));
    }

    #[test]
    fn test_polyline_path() {
        let mut hatch = Hatch::solid();
        hatch.add_path(square());
        let pairs = render(hatch, DxfVersion::AC1032);
        let at = pairs.iter().position(|x| x.0 == 92).unwrap();
        assert_eq!(
            &pairs[at..at + 4],
            &[p(92, "3"), p(72, "0"), p(73, "1"), p(93, "4")]
        );
        assert_eq!(pairs.iter().filter(|x| x.0 == 42).count(), 0);
    }

    #[test]
    fn test_pattern_lines_are_rotated_and_scaled() {
        let mut hatch = Hatch::with_pattern(HatchPattern::ansi31(), 0.0, 2.0);
        hatch.add_path(square());
        let pairs = render(hatch, DxfVersion::AC1032);
        let angle: f64 = pairs.iter().find(|x| x.0 == 53).unwrap().1.parse().unwrap();
        assert!((angle - 45.0).abs() < 1e-9);
        let dx: f64 = pairs.iter().find(|x| x.0 == 45).unwrap().1.parse().unwrap();
        let dy: f64 = pairs.iter().find(|x| x.0 == 46).unwrap().1.parse().unwrap();
        let expected = Vector2::new(0.0, 6.35).rotate(std::f64::consts::FRAC_PI_4);
        assert!((dx - expected.x).abs() < 1e-9);
        assert!((dy - expected.y).abs() < 1e-9);
    }

    #[test]
    fn test_gradient_needs_2004() {
        let mut hatch = Hatch::solid().with_gradient(HatchGradientPattern::linear(
            Color::from_index(1),
            Color::from_rgb(0, 0, 255),
        ));
        hatch.add_path(square());
        let old = render(hatch.clone(), DxfVersion::AC1015);
        assert!(!old.iter().any(|x| x.0 == 450));
        let new = render(hatch, DxfVersion::AC1018);
        assert!(new.contains(&p(450, "1")));
        assert!(new.contains(&p(453, "2")));
        assert!(new.contains(&p(421, "255")));
        assert_eq!(new.last().unwrap(), &p(470, "LINEAR"));
    }

    #[test]
    fn test_stray_polyline_edge_is_rejected() {
        let mut path = BoundaryPath::external();
        path.edges.push(BoundaryEdge::Line(LineEdge {
            start: Vector2::ZERO,
            end: Vector2::UNIT_X,
        }));
        path.edges
            .push(BoundaryEdge::Polyline(PolylineEdge::new(vec![Vector2::ZERO], false)));
        let mut hatch = Hatch::solid();
        hatch.add_path(path);
        let mut doc = CadDocument::new();
        let handle = doc.add_entity(hatch);
        assert!(render_entity(&doc, DxfVersion::AC1032, doc.entity(handle).unwrap()).is_err());
    }
}
