//! DIMENSION decoder

use super::section_reader::SectionReader;
use crate::entities::*;
use crate::error::Result;
use crate::types::transform::normalize_angle;
use crate::types::{object_to_world, Vector3};

/// Points of the type-specific subclasses, by their group code
#[derive(Debug, Default)]
struct DimensionPoints {
    p13: Vector3,
    p14: Vector3,
    p15: Vector3,
    p16: Vector3,
    leader_length: f64,
    rotation: f64,
    ext_line_rotation: f64,
}

impl<'a> SectionReader<'a> {
    pub(super) fn read_dimension(&mut self) -> Result<EntityType> {
        let mut base = DimensionBase::new();
        let mut common = EntityCommon::new();
        let mut flags = 0;
        let mut direction_degrees = 0.0;
        let mut points = DimensionPoints::default();
        self.read_entity_record(&mut common, |r, _, pair| {
            match pair.code {
                2 => base.block_name = r.string(pair),
                10 | 20 | 30 => {
                    pair.apply_to(&mut base.definition_point);
                }
                11 | 21 | 31 => {
                    pair.apply_to(&mut base.text_middle_point);
                }
                70 => flags = pair.as_i16(),
                71 => base.attachment_point = AttachmentPointType::from_value(pair.as_i16()),
                72 => base.line_spacing_style = pair.as_i16(),
                41 => base.line_spacing_factor = pair.as_double(),
                42 => base.actual_measurement = pair.as_double(),
                1 => base.user_text = Some(r.string(pair)),
                53 => base.text_rotation = pair.as_angle(),
                51 => direction_degrees = pair.as_double(),
                210 | 220 | 230 => {
                    pair.apply_to(&mut base.normal);
                }
                3 => base.style_name = r.string(pair),
                13 | 23 | 33 => {
                    pair.apply_to(&mut points.p13);
                }
                14 | 24 | 34 => {
                    pair.apply_to(&mut points.p14);
                }
                15 | 25 | 35 => {
                    pair.apply_to(&mut points.p15);
                }
                16 | 26 | 36 => {
                    pair.apply_to(&mut points.p16);
                }
                40 => points.leader_length = pair.as_double(),
                50 => points.rotation = pair.as_angle(),
                52 => points.ext_line_rotation = pair.as_angle(),
                _ => {}
            }
            Ok(())
        })?;

        base.common = common;
        base.text_middle_point = object_to_world(base.text_middle_point, base.normal);
        base.user_text_position = flags & 128 != 0;

        let Some(kind) = DimensionType::from_flags(flags) else {
            let mut unknown = UnknownEntity::new("DIMENSION");
            unknown.common = base.common;
            self.record_unknown("DIMENSION");
            return Ok(unknown.into());
        };
        if kind != DimensionType::Ordinate {
            base.horizontal_direction = direction_degrees.to_radians();
        }

        let dimension = match kind {
            DimensionType::Linear => Dimension::Linear(DimensionLinear {
                base,
                first_point: points.p13,
                second_point: points.p14,
                rotation: points.rotation,
                ext_line_rotation: points.ext_line_rotation,
            }),
            DimensionType::Aligned => Dimension::Aligned(DimensionAligned {
                base,
                first_point: points.p13,
                second_point: points.p14,
            }),
            DimensionType::Radius => Dimension::Radius(DimensionRadius {
                base,
                point_on_arc: points.p15,
                leader_length: points.leader_length,
            }),
            DimensionType::Diameter => Dimension::Diameter(DimensionDiameter {
                base,
                far_point: points.p15,
                leader_length: points.leader_length,
            }),
            DimensionType::Angular => Dimension::Angular2Ln(DimensionAngular2Ln {
                base,
                first_line_start: points.p13,
                first_line_end: points.p14,
                second_line_start: points.p15,
                dimension_arc: points.p16,
            }),
            DimensionType::Angular3Point => Dimension::Angular3Pt(DimensionAngular3Pt {
                base,
                first_point: points.p13,
                second_point: points.p14,
                angle_vertex: points.p15,
            }),
            // Code 51 holds the ordinate axes as 360 minus their rotation
            DimensionType::Ordinate => Dimension::Ordinate(DimensionOrdinate {
                base,
                feature_location: points.p13,
                leader_endpoint: points.p14,
                is_ordinate_type_x: flags & 64 != 0,
                rotation: normalize_angle((360.0 - direction_degrees).to_radians()),
            }),
        };
        Ok(EntityType::Dimension(dimension))
    }
}

#[cfg(test)]
mod tests {
    use super::super::DxfReader;
    use crate::document::CadDocument;
    use crate::entities::*;
    use crate::io::dxf::DxfWriter;
    use crate::types::Vector3;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_6};
    use std::io::Cursor;

    fn read_back(dimension: impl Into<Dimension>) -> Dimension {
        let mut doc = CadDocument::new();
        let handle = doc.add_entity(EntityType::Dimension(dimension.into()));
        let buf = DxfWriter::new(&doc).write_to_vec().unwrap();
        let read = DxfReader::from_reader(Cursor::new(buf)).unwrap().read().unwrap();
        match read.entity(handle) {
            Some(EntityType::Dimension(dimension)) => dimension.clone(),
            other => panic!("expected a dimension, found {:?}", other),
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_linear_and_aligned() {
        let mut linear = DimensionLinear::new(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(10.0, 4.0, 0.0),
            FRAC_PI_6,
            2.0,
        );
        linear.ext_line_rotation = FRAC_PI_4;
        linear.base.user_text = Some("<> mm".to_string());
        let Dimension::Linear(read) = read_back(linear.clone()) else {
            panic!("linear dimension expected");
        };
        assert_eq!(read.first_point, linear.first_point);
        assert_eq!(read.second_point, linear.second_point);
        assert!(close(read.rotation, FRAC_PI_6));
        assert!(close(read.ext_line_rotation, FRAC_PI_4));
        assert_eq!(read.base.definition_point, linear.base.definition_point);
        assert_eq!(read.base.user_text.as_deref(), Some("<> mm"));
        assert_eq!(read.base.style_name, "Standard");
        assert!(close(read.base.actual_measurement, linear.measurement()));

        let aligned = DimensionAligned::new(Vector3::ZERO, Vector3::new(3.0, 4.0, 0.0), 1.0);
        let Dimension::Aligned(read) = read_back(aligned.clone()) else {
            panic!("aligned dimension expected");
        };
        assert_eq!(read.second_point, aligned.second_point);
        assert!(close(read.measurement(), 5.0));
    }

    #[test]
    fn test_radial_kinds() {
        let mut radius = DimensionRadius::new(Vector3::new(1.0, 1.0, 0.0), Vector3::new(4.0, 5.0, 0.0));
        radius.leader_length = 0.75;
        let Dimension::Radius(read) = read_back(radius.clone()) else {
            panic!("radius dimension expected");
        };
        assert_eq!(read.point_on_arc, radius.point_on_arc);
        assert_eq!(read.leader_length, 0.75);
        assert_eq!(read.base.definition_point, radius.base.definition_point);

        let diameter = DimensionDiameter::new(Vector3::ZERO, Vector3::new(0.0, 2.0, 0.0));
        let Dimension::Diameter(read) = read_back(diameter.clone()) else {
            panic!("diameter dimension expected");
        };
        assert_eq!(read.far_point, diameter.far_point);
        assert!(close(read.measurement(), diameter.measurement()));
    }

    #[test]
    fn test_angular_kinds() {
        let two_lines = DimensionAngular2Ln::new(
            (Vector3::ZERO, Vector3::new(5.0, 0.0, 0.0)),
            (Vector3::ZERO, Vector3::new(0.0, 5.0, 0.0)),
            Vector3::new(3.0, 3.0, 0.0),
        );
        let Dimension::Angular2Ln(read) = read_back(two_lines.clone()) else {
            panic!("two-line angular dimension expected");
        };
        assert_eq!(read.first_line_start, two_lines.first_line_start);
        assert_eq!(read.first_line_end, two_lines.first_line_end);
        assert_eq!(read.second_line_start, two_lines.second_line_start);
        assert_eq!(read.dimension_arc, two_lines.dimension_arc);
        assert_eq!(read.base.definition_point, two_lines.base.definition_point);
        assert!(close(read.measurement_radians(), FRAC_PI_2));

        let three_points = DimensionAngular3Pt::new(
            Vector3::ZERO,
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(2.0, 1.0, 0.0),
        );
        let Dimension::Angular3Pt(read) = read_back(three_points.clone()) else {
            panic!("three-point angular dimension expected");
        };
        assert_eq!(read.angle_vertex, Vector3::ZERO);
        assert_eq!(read.second_point, three_points.second_point);
        assert!(close(read.measurement_radians(), FRAC_PI_4));
    }

    #[test]
    fn test_ordinate_rotation_and_axis() {
        let mut ordinate =
            DimensionOrdinate::y_ordinate(Vector3::new(2.0, 3.0, 0.0), Vector3::new(6.0, 3.0, 0.0));
        ordinate.rotation = FRAC_PI_6;
        let Dimension::Ordinate(read) = read_back(ordinate.clone()) else {
            panic!("ordinate dimension expected");
        };
        assert!(!read.is_ordinate_type_x);
        assert!(close(read.rotation, FRAC_PI_6));
        assert_eq!(read.feature_location, ordinate.feature_location);
        assert_eq!(read.leader_endpoint, ordinate.leader_endpoint);
        assert_eq!(read.base.horizontal_direction, 0.0);

        let x = DimensionOrdinate::x_ordinate(Vector3::new(2.0, 3.0, 0.0), Vector3::new(2.0, 7.0, 0.0));
        let Dimension::Ordinate(read) = read_back(x) else {
            panic!("ordinate dimension expected");
        };
        assert!(read.is_ordinate_type_x);
        assert!(close(read.rotation, 0.0));
    }

    #[test]
    fn test_text_position_in_world_coordinates() {
        let mut aligned = DimensionAligned::new(Vector3::ZERO, Vector3::new(0.0, 0.0, 4.0), 1.0);
        aligned.base.normal = Vector3::new(1.0, 0.0, 0.0);
        aligned.base.text_middle_point = Vector3::new(-1.0, 0.5, 2.0);
        aligned.base.user_text_position = true;
        let Dimension::Aligned(read) = read_back(aligned.clone()) else {
            panic!("aligned dimension expected");
        };
        assert!(read.base.user_text_position);
        assert!(read
            .base
            .text_middle_point
            .approx_eq(&aligned.base.text_middle_point, 1e-9));
    }
}
