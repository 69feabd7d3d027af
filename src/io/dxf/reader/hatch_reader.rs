//! HATCH decoder
//!
//! Boundary paths and pattern lines reuse codes such as 10, 72 and 97 with a
//! meaning that depends on their position, so they are read in stream order
//! from the count that announces them.

use super::section_reader::SectionReader;
use super::stream_reader::DxfCodePair;
use crate::entities::*;
use crate::error::{DxfError, Result};
use crate::types::{Color, DxfVersion, Vector2, Vector3};

impl<'a> SectionReader<'a> {
    pub(super) fn read_hatch(&mut self) -> Result<EntityType> {
        let mut hatch = Hatch::new();
        let mut common = EntityCommon::new();
        let mut elevation = Vector3::ZERO;
        self.read_entity_record(&mut common, |r, _, pair| {
            match pair.code {
                10 | 20 | 30 => {
                    pair.apply_to(&mut elevation);
                }
                210 | 220 | 230 => {
                    pair.apply_to(&mut hatch.normal);
                }
                2 => hatch.pattern.name = r.string(pair),
                70 => hatch.is_solid = pair.as_bool(),
                71 => hatch.is_associative = pair.as_bool(),
                91 => {
                    for _ in 0..pair.as_i32() {
                        hatch.paths.push(r.read_boundary_path()?);
                    }
                }
                75 => hatch.style = HatchStyleType::from_value(pair.as_i16()),
                76 => hatch.pattern_type = HatchPatternType::from_value(pair.as_i16()),
                52 => hatch.pattern_angle = pair.as_angle(),
                41 => hatch.pattern_scale = pair.as_double(),
                77 => hatch.is_double = pair.as_bool(),
                78 => {
                    hatch.pattern.lines =
                        r.read_pattern_lines(pair.as_i16(), hatch.pattern_angle, hatch.pattern_scale)?;
                }
                98 => {
                    for _ in 0..pair.as_i32() {
                        if r.take(10)?.is_none() {
                            break;
                        }
                        r.take(20)?;
                    }
                }
                450..=470 | 63 | 421 => read_gradient_field(&mut hatch.gradient, r, pair),
                _ => {}
            }
            Ok(())
        })?;
        hatch.elevation = elevation.z;
        hatch.common = common;
        Ok(hatch.into())
    }

    fn read_boundary_path(&mut self) -> Result<BoundaryPath> {
        let mut path = BoundaryPath::new();
        path.flags = BoundaryPathFlags::from_bits_truncate(self.take_i32(92)?);
        if path.flags.contains(BoundaryPathFlags::POLYLINE) {
            let has_bulge = self.take_bool(72)?;
            let is_closed = self.take_bool(73)?;
            let mut vertices = Vec::new();
            for _ in 0..self.take_i32(93)? {
                let Some(x) = self.take(10)? else {
                    break;
                };
                let y = self.take_double(20)?;
                let bulge = if has_bulge { self.take_double(42)? } else { 0.0 };
                vertices.push(Vector3::new(x.as_double(), y, bulge));
            }
            path.edges
                .push(BoundaryEdge::Polyline(PolylineEdge { vertices, is_closed }));
        } else {
            for _ in 0..self.take_i32(93)? {
                match self.read_boundary_edge()? {
                    Some(edge) => path.edges.push(edge),
                    None => break,
                }
            }
        }
        for _ in 0..self.take_i32(97)? {
            match self.take(330)? {
                Some(pair) => path.boundary_handles.push(pair.as_handle()),
                None => break,
            }
        }
        Ok(path)
    }

    fn read_boundary_edge(&mut self) -> Result<Option<BoundaryEdge>> {
        let Some(kind) = self.take(72)? else {
            return Ok(None);
        };
        let edge = match kind.as_i16() {
            1 => BoundaryEdge::Line(LineEdge {
                start: self.take_point2d(10)?,
                end: self.take_point2d(11)?,
            }),
            2 => BoundaryEdge::CircularArc(CircularArcEdge {
                center: self.take_point2d(10)?,
                radius: self.take_double(40)?,
                start_angle: self.take_double(50)?.to_radians(),
                end_angle: self.take_double(51)?.to_radians(),
                counter_clockwise: self.take_bool(73)?,
            }),
            3 => BoundaryEdge::EllipticArc(EllipticArcEdge {
                center: self.take_point2d(10)?,
                major_axis_endpoint: self.take_point2d(11)?,
                minor_axis_ratio: self.take_double(40)?,
                start_angle: self.take_double(50)?.to_radians(),
                end_angle: self.take_double(51)?.to_radians(),
                counter_clockwise: self.take_bool(73)?,
            }),
            4 => BoundaryEdge::Spline(self.read_spline_edge()?),
            other => {
                return Err(DxfError::Parse(format!("unknown hatch edge type {}", other)));
            }
        };
        Ok(Some(edge))
    }

    fn read_spline_edge(&mut self) -> Result<SplineEdge> {
        let degree = self.take_i32(94)?;
        let rational = self.take_bool(73)?;
        let periodic = self.take_bool(74)?;
        let knot_count = self.take_i32(95)?;
        let point_count = self.take_i32(96)?;

        let mut knots = Vec::new();
        for _ in 0..knot_count {
            match self.take(40)? {
                Some(knot) => knots.push(knot.as_double()),
                None => break,
            }
        }
        let mut control_points = Vec::new();
        for _ in 0..point_count {
            let Some(x) = self.take(10)? else {
                break;
            };
            let y = self.take_double(20)?;
            let weight = match self.take(42)? {
                Some(weight) => weight.as_double(),
                None => 1.0,
            };
            control_points.push(Vector3::new(x.as_double(), y, weight));
        }

        let mut edge = SplineEdge {
            degree,
            rational,
            periodic,
            knots,
            control_points,
            fit_points: Vec::new(),
            start_tangent: Vector2::ZERO,
            end_tangent: Vector2::ZERO,
        };
        if self.version >= DxfVersion::AC1024 {
            for _ in 0..self.take_i32(97)? {
                if self.reader.peek_code()? != Some(11) {
                    break;
                }
                edge.fit_points.push(self.take_point2d(11)?);
            }
            edge.start_tangent = self.take_point2d(12)?;
            edge.end_tangent = self.take_point2d(13)?;
        }
        Ok(edge)
    }

    /// Pattern lines as written: rotated by the pattern angle and scaled
    fn read_pattern_lines(
        &mut self,
        count: i16,
        angle: f64,
        scale: f64,
    ) -> Result<Vec<HatchPatternLine>> {
        let scale = if scale == 0.0 { 1.0 } else { scale };
        let mut lines = Vec::new();
        for _ in 0..count {
            let Some(line_angle) = self.take(53)? else {
                break;
            };
            let total = line_angle.as_angle();
            let base = Vector2::new(self.take_double(43)?, self.take_double(44)?);
            let offset = Vector2::new(self.take_double(45)?, self.take_double(46)?);
            let mut dash_lengths = Vec::new();
            for _ in 0..self.take_i32(79)? {
                match self.take(49)? {
                    Some(dash) => dash_lengths.push(dash.as_double() / scale),
                    None => break,
                }
            }
            lines.push(HatchPatternLine {
                angle: total - angle,
                base_point: (base / scale).rotate(-angle),
                offset: (offset / scale).rotate(-total),
                dash_lengths,
            });
        }
        Ok(lines)
    }

    // ─── Positional pairs ───

    /// Next pair when it carries `code`; anything else stays unread
    fn take(&mut self, code: i32) -> Result<Option<DxfCodePair>> {
        if self.reader.peek_code()? == Some(code) {
            self.reader.read_pair()
        } else {
            Ok(None)
        }
    }

    fn take_double(&mut self, code: i32) -> Result<f64> {
        Ok(self.take(code)?.map_or(0.0, |pair| pair.as_double()))
    }

    fn take_i32(&mut self, code: i32) -> Result<i32> {
        Ok(self.take(code)?.map_or(0, |pair| pair.as_i32()))
    }

    fn take_bool(&mut self, code: i32) -> Result<bool> {
        Ok(self.take(code)?.is_some_and(|pair| pair.as_bool()))
    }

    fn take_point2d(&mut self, x_code: i32) -> Result<Vector2> {
        let x = self.take_double(x_code)?;
        let y = self.take_double(x_code + 10)?;
        Ok(Vector2::new(x, y))
    }
}

/// Gradient pairs after the seed points; `450 0` means no gradient
fn read_gradient_field(
    gradient: &mut Option<HatchGradientPattern>,
    r: &SectionReader<'_>,
    pair: &DxfCodePair,
) {
    if pair.code == 450 {
        *gradient = (pair.as_i32() != 0).then(|| HatchGradientPattern {
            angle: 0.0,
            shift: 0.0,
            is_single_color: false,
            color_tint: 0.0,
            colors: Vec::new(),
            name: String::new(),
        });
        return;
    }
    let Some(gradient) = gradient.as_mut() else {
        return;
    };
    match pair.code {
        452 => gradient.is_single_color = pair.as_i32() != 0,
        460 => gradient.angle = pair.as_double(),
        461 => gradient.shift = pair.as_double(),
        462 => gradient.color_tint = pair.as_double(),
        463 => gradient.add_color(pair.as_double(), Color::ByLayer),
        63 => {
            if let Some(entry) = gradient.colors.last_mut() {
                entry.color = Color::from_index(pair.as_i16());
            }
        }
        421 => {
            if let Some(entry) = gradient.colors.last_mut() {
                entry.color = Color::from_true_color(pair.as_i32());
            }
        }
        470 => gradient.name = r.string(pair),
        _ => {}
    }
}
