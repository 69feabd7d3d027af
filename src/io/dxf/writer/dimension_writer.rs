//! DIMENSION encoder

use super::section_writer::SectionWriter;
use super::stream_writer::{DxfStreamWriter, DxfStreamWriterExt};
use crate::entities::Dimension;
use crate::error::{DxfError, Result};
use crate::types::{world_to_object, DxfVersion};

impl<'a, W: DxfStreamWriter> SectionWriter<'a, W> {
    pub(super) fn write_dimension(&mut self, dimension: &Dimension) -> Result<()> {
        let base = dimension.base();
        if !self.document.dim_styles.contains(&base.style_name) {
            return Err(DxfError::missing("dimension style", &base.style_name));
        }

        self.write_entity_header("DIMENSION", &base.common)?;
        self.writer.write_subclass("AcDbDimension")?;
        if self.version >= DxfVersion::AC1024 {
            self.writer.write_byte(280, 0)?;
        }
        self.write_str(2, &base.block_name)?;
        self.writer.write_point3d(10, base.definition_point)?;
        self.writer
            .write_point3d(11, world_to_object(base.text_middle_point, base.normal))?;
        self.writer.write_i16(70, dimension.flags())?;
        self.writer.write_i16(71, base.attachment_point as i16)?;
        self.writer.write_i16(72, base.line_spacing_style)?;
        self.writer.write_double(41, base.line_spacing_factor)?;
        self.writer.write_double(42, base.actual_measurement)?;
        if let Some(text) = &base.user_text {
            self.write_str(1, text)?;
        }
        self.writer.write_angle(53, base.text_rotation)?;
        match dimension {
            Dimension::Ordinate(ordinate) => {
                self.writer
                    .write_double(51, 360.0 - ordinate.rotation.to_degrees())?;
            }
            _ => self.writer.write_angle(51, base.horizontal_direction)?,
        }
        self.writer.write_normal(base.normal)?;
        self.write_str(3, &base.style_name)?;

        match dimension {
            Dimension::Aligned(aligned) => {
                self.writer.write_subclass("AcDbAlignedDimension")?;
                self.writer.write_point3d(13, aligned.first_point)?;
                self.writer.write_point3d(14, aligned.second_point)
            }
            Dimension::Linear(linear) => {
                self.writer.write_subclass("AcDbAlignedDimension")?;
                self.writer.write_point3d(13, linear.first_point)?;
                self.writer.write_point3d(14, linear.second_point)?;
                self.writer.write_angle(50, linear.rotation)?;
                self.writer.write_angle(52, linear.ext_line_rotation)?;
                self.writer.write_subclass("AcDbRotatedDimension")
            }
            Dimension::Radius(radius) => {
                self.writer.write_subclass("AcDbRadialDimension")?;
                self.writer.write_point3d(15, radius.point_on_arc)?;
                self.writer.write_double(40, radius.leader_length)
            }
            Dimension::Diameter(diameter) => {
                self.writer.write_subclass("AcDbDiametricDimension")?;
                self.writer.write_point3d(15, diameter.far_point)?;
                self.writer.write_double(40, diameter.leader_length)
            }
            Dimension::Angular3Pt(angular) => {
                self.writer.write_subclass("AcDb3PointAngularDimension")?;
                self.writer.write_point3d(13, angular.first_point)?;
                self.writer.write_point3d(14, angular.second_point)?;
                self.writer.write_point3d(15, angular.angle_vertex)
            }
            Dimension::Angular2Ln(angular) => {
                self.writer.write_subclass("AcDb2LineAngularDimension")?;
                self.writer.write_point3d(13, angular.first_line_start)?;
                self.writer.write_point3d(14, angular.first_line_end)?;
                self.writer.write_point3d(15, angular.second_line_start)?;
                self.writer.write_point3d(16, angular.dimension_arc)
            }
            Dimension::Ordinate(ordinate) => {
                self.writer.write_subclass("AcDbOrdinateDimension")?;
                self.writer.write_point3d(13, ordinate.feature_location)?;
                self.writer.write_point3d(14, ordinate.leader_endpoint)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::section_writer::render_entity;
    use crate::document::CadDocument;
    use crate::entities::*;
    use crate::error::DxfError;
    use crate::types::{DxfVersion, Vector3};

    fn value(pairs: &[(i32, String)], code: i32) -> Option<String> {
        pairs.iter().find(|p| p.0 == code).map(|p| p.1.clone())
    }

    fn render(dimension: Dimension, version: DxfVersion) -> crate::error::Result<Vec<(i32, String)>> {
        let mut doc = CadDocument::new();
        let handle = doc.add_entity(dimension);
        render_entity(&doc, version, doc.entity(handle).unwrap())
    }

    #[test]
    fn test_ordinate_direction() {
        let mut ordinate =
            DimensionOrdinate::x_ordinate(Vector3::new(5.0, 5.0, 0.0), Vector3::new(5.0, 10.0, 0.0));
        ordinate.rotation = 30f64.to_radians();
        let pairs = render(Dimension::Ordinate(ordinate), DxfVersion::AC1032).unwrap();
        let direction: f64 = value(&pairs, 51).unwrap().parse().unwrap();
        assert!((direction - 330.0).abs() < 1e-9);
        // ordinate type 6, block reference 32, X type 64
        assert_eq!(value(&pairs, 70).as_deref(), Some("102"));
        assert!(pairs.contains(&(100, "AcDbOrdinateDimension".to_string())));
    }

    #[test]
    fn test_linear_subclasses() {
        let linear = DimensionLinear::horizontal(Vector3::ZERO, Vector3::new(10.0, 0.0, 0.0), 2.0);
        let pairs = render(Dimension::Linear(linear), DxfVersion::AC1032).unwrap();
        let markers: Vec<&str> = pairs
            .iter()
            .filter(|p| p.0 == 100)
            .map(|p| p.1.as_str())
            .collect();
        assert_eq!(
            markers,
            [
                "AcDbEntity",
                "AcDbDimension",
                "AcDbAlignedDimension",
                "AcDbRotatedDimension"
            ]
        );
        assert_eq!(value(&pairs, 280).as_deref(), Some("0"));
    }

    #[test]
    fn test_version_gated_flag() {
        let aligned = DimensionAligned::new(Vector3::ZERO, Vector3::new(3.0, 4.0, 0.0), 1.0);
        let pairs = render(Dimension::Aligned(aligned), DxfVersion::AC1018).unwrap();
        assert_eq!(value(&pairs, 280), None);
    }

    fn subclass_tail(pairs: &[(i32, String)], subclass: &str) -> Vec<(i32, String)> {
        let at = pairs
            .iter()
            .position(|p| *p == (100, subclass.to_string()))
            .unwrap_or_else(|| panic!("{subclass} missing"));
        pairs[at + 1..].to_vec()
    }

    fn p(code: i32, value: &str) -> (i32, String) {
        (code, value.to_string())
    }

    #[test]
    fn test_radius_points() {
        let mut radius = DimensionRadius::new(Vector3::new(1.0, 1.0, 0.0), Vector3::new(4.0, 5.0, 0.0));
        radius.leader_length = 0.5;
        let pairs = render(Dimension::Radius(radius), DxfVersion::AC1032).unwrap();
        assert_eq!(value(&pairs, 70).as_deref(), Some("36"));
        assert_eq!(value(&pairs, 10).as_deref(), Some("1.0"));
        assert_eq!(value(&pairs, 42).as_deref(), Some("5.0"));
        assert_eq!(
            subclass_tail(&pairs, "AcDbRadialDimension"),
            [p(15, "4.0"), p(25, "5.0"), p(35, "0.0"), p(40, "0.5")]
        );
    }

    #[test]
    fn test_diameter_points() {
        let diameter = DimensionDiameter::new(Vector3::new(2.0, 0.0, 0.0), Vector3::new(2.0, 3.0, 0.0));
        let pairs = render(Dimension::Diameter(diameter), DxfVersion::AC1032).unwrap();
        assert_eq!(value(&pairs, 70).as_deref(), Some("35"));
        // The definition point is opposite the far point through the center
        assert_eq!(value(&pairs, 20).as_deref(), Some("-3.0"));
        assert_eq!(
            subclass_tail(&pairs, "AcDbDiametricDimension"),
            [p(15, "2.0"), p(25, "3.0"), p(35, "0.0"), p(40, "0.0")]
        );
    }

    #[test]
    fn test_three_point_angular() {
        let angular = DimensionAngular3Pt::new(
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(5.0, 1.0, 0.0),
            Vector3::new(1.0, 5.0, 0.0),
            Vector3::new(3.0, 3.0, 0.0),
        );
        let pairs = render(Dimension::Angular3Pt(angular), DxfVersion::AC1018).unwrap();
        assert_eq!(value(&pairs, 70).as_deref(), Some("37"));
        assert_eq!(
            subclass_tail(&pairs, "AcDb3PointAngularDimension"),
            [
                p(13, "5.0"),
                p(23, "1.0"),
                p(33, "0.0"),
                p(14, "1.0"),
                p(24, "5.0"),
                p(34, "0.0"),
                p(15, "1.0"),
                p(25, "1.0"),
                p(35, "0.0"),
            ]
        );
    }

    #[test]
    fn test_two_line_angular() {
        let angular = DimensionAngular2Ln::new(
            (Vector3::ZERO, Vector3::new(4.0, 0.0, 0.0)),
            (Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, 4.0, 0.0)),
            Vector3::new(2.0, 2.0, 0.0),
        );
        let pairs = render(Dimension::Angular2Ln(angular), DxfVersion::AC1032).unwrap();
        assert_eq!(value(&pairs, 70).as_deref(), Some("34"));
        // Code 10 is the end of the second line
        assert_eq!(value(&pairs, 20).as_deref(), Some("4.0"));
        assert_eq!(
            subclass_tail(&pairs, "AcDb2LineAngularDimension"),
            [
                p(13, "0.0"),
                p(23, "0.0"),
                p(33, "0.0"),
                p(14, "4.0"),
                p(24, "0.0"),
                p(34, "0.0"),
                p(15, "0.0"),
                p(25, "1.0"),
                p(35, "0.0"),
                p(16, "2.0"),
                p(26, "2.0"),
                p(36, "0.0"),
            ]
        );
    }

    #[test]
    fn test_missing_style() {
        let mut radius = DimensionRadius::new(Vector3::ZERO, Vector3::new(1.0, 0.0, 0.0));
        radius.base.style_name = "NOPE".to_string();
        let result = render(Dimension::Radius(radius), DxfVersion::AC1032);
        assert!(matches!(result, Err(DxfError::MissingReference { .. })));
    }
}
