//! Documents used across the integration tests

#![allow(dead_code)]

use dxf_codec::entities::*;
use dxf_codec::objects::ImageDefinition;
use dxf_codec::tables::{Layer, LineType, LineTypeElement};
use dxf_codec::types::{Color, DrawingUnits, Transparency, Vector2, Vector3};
use dxf_codec::xdata::{ExtendedDataRecord, XDataValue};
use dxf_codec::{BlockRecord, CadDocument};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

/// One entity of every kind the reader understands, on a few layers and in
/// a block with attributes
pub fn every_readable_entity() -> CadDocument {
    let mut doc = CadDocument::new();

    let mut walls = Layer::new("Walls").with_color(Color::RED);
    walls.transparency = Transparency::from_percent(40);
    doc.add_layer(walls).unwrap();
    let mut hidden = Layer::new("Hidden").with_color(Color::GREEN);
    hidden.hidden = true;
    doc.add_layer(hidden).unwrap();

    let mut dashed = LineType::new("DASHED");
    dashed.description = "Dashed __ __ __".to_string();
    dashed.add_element(LineTypeElement::dash(0.5));
    dashed.add_element(LineTypeElement::space(0.25));
    doc.add_line_type(dashed).unwrap();

    doc.add_block(BlockRecord::new("Tag")).unwrap();
    doc.add_entity_to_block("Tag", Circle::from_center_radius(Vector3::ZERO, 1.0))
        .unwrap();
    doc.add_entity_to_block(
        "Tag",
        AttributeDefinition::new("ID", "Identifier", "0").at(Vector3::new(0.0, -1.5, 0.0)),
    )
    .unwrap();

    let mut point = Point::at(Vector3::new(1.0, 2.0, 0.0));
    point.common.layer = "Walls".to_string();
    doc.add_entity(point);

    let mut line = Line::from_points(Vector3::ZERO, Vector3::new(10.0, 10.0, 0.0));
    line.common.line_type = "DASHED".to_string();
    line.common.extended_data.add_record(
        ExtendedDataRecord::new("ACAD")
            .with_value(XDataValue::String("note".to_string()))
            .with_value(XDataValue::Integer16(7)),
    );
    doc.add_entity(line);

    doc.add_entity(Ray::new(Vector3::ZERO, Vector3::UNIT_X));
    doc.add_entity(XLine::new(Vector3::new(0.0, 5.0, 0.0), Vector3::UNIT_Y));
    doc.add_entity(Circle::from_center_radius(Vector3::new(20.0, 0.0, 0.0), 5.0));
    doc.add_entity(
        Arc::from_center_radius_angles(Vector3::new(30.0, 0.0, 0.0), 4.0, 0.0, FRAC_PI_2)
            .with_normal(Vector3::new(0.0, 0.0, -1.0)),
    );
    doc.add_entity(
        Ellipse::new(Vector3::new(40.0, 0.0, 0.0), 8.0, 4.0).with_angles(0.0, PI),
    );

    doc.add_entity(LwPolyline::from_points(
        [
            Vector2::new(0.0, 20.0),
            Vector2::new(5.0, 20.0),
            Vector2::new(5.0, 25.0),
        ],
        false,
    ));
    doc.add_entity(Polyline2D::from_points(
        [Vector2::new(10.0, 20.0), Vector2::new(15.0, 22.0)],
        false,
    ));
    doc.add_entity(Polyline3D::from_points([
        Vector3::new(20.0, 20.0, 0.0),
        Vector3::new(22.0, 24.0, 3.0),
    ]));
    doc.add_entity(PolyfaceMesh::from_parts(
        [
            Vector3::new(30.0, 20.0, 0.0),
            Vector3::new(32.0, 20.0, 0.0),
            Vector3::new(32.0, 22.0, 1.0),
            Vector3::new(30.0, 22.0, 1.0),
        ],
        vec![PolyfaceFace::quad(1, 2, 3, 4)],
    ));

    doc.add_entity(Text::with_value("Plan", Vector3::new(0.0, 40.0, 0.0)).with_height(2.5));
    doc.add_entity(
        MText::with_value("First line\\PSecond line", Vector3::new(10.0, 40.0, 0.0))
            .with_width(20.0),
    );
    doc.add_entity(
        Insert::new("Tag", Vector3::new(30.0, 40.0, 0.0))
            .with_attribute(Attribute::new("ID", "A-1").at(Vector3::new(30.0, 38.5, 0.0))),
    );

    doc.add_entity(Solid::triangle(
        Vector3::new(0.0, 60.0, 0.0),
        Vector3::new(4.0, 60.0, 0.0),
        Vector3::new(2.0, 63.0, 0.0),
    ));
    doc.add_entity(Face3D::new(
        Vector3::new(10.0, 60.0, 0.0),
        Vector3::new(14.0, 60.0, 0.0),
        Vector3::new(14.0, 64.0, 2.0),
        Vector3::new(10.0, 64.0, 2.0),
    ));

    let mut spline = Spline::new();
    spline.degree = 3;
    spline.knots = vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];
    spline.control_points = vec![
        Vector3::new(20.0, 60.0, 0.0),
        Vector3::new(22.0, 64.0, 0.0),
        Vector3::new(26.0, 64.0, 0.0),
        Vector3::new(28.0, 60.0, 0.0),
    ];
    doc.add_entity(spline);

    let mut hatch = Hatch::with_pattern(HatchPattern::ansi31(), FRAC_PI_4, 2.0);
    hatch.add_path(BoundaryPath::polyline(vec![
        Vector2::new(0.0, 80.0),
        Vector2::new(10.0, 80.0),
        Vector2::new(10.0, 90.0),
        Vector2::new(0.0, 90.0),
    ]));
    doc.add_entity(hatch);

    doc.add_entity(Dimension::from(DimensionAligned::new(
        Vector3::new(20.0, 80.0, 0.0),
        Vector3::new(30.0, 85.0, 0.0),
        2.0,
    )));
    doc.add_entity(Leader::from_vertices(vec![
        Vector3::new(40.0, 80.0, 0.0),
        Vector3::new(44.0, 84.0, 0.0),
        Vector3::new(48.0, 84.0, 0.0),
    ]));
    doc.add_entity(Tolerance::new("%%v0.1", Vector3::new(50.0, 80.0, 0.0)));
    doc.add_entity(MLine::from_points(
        &[Vector2::new(0.0, 100.0), Vector2::new(10.0, 100.0), Vector2::new(10.0, 110.0)],
        &[0.5, -0.5],
        false,
    ));

    let definition = doc.add_image_definition(ImageDefinition::new("aerial.png", 640.0, 480.0));
    doc.add_entity(RasterImage::new(definition, Vector3::new(20.0, 100.0, 0.0), 32.0, 24.0));

    doc
}

/// Scenario of a block drawn in inches inserted into a millimetre drawing
pub fn inch_block_in_mm_drawing() -> (CadDocument, dxf_codec::Handle) {
    let mut doc = CadDocument::new();
    doc.header.insertion_units = DrawingUnits::Millimeters;
    doc.add_block(BlockRecord::new("BOLT").with_units(DrawingUnits::Inches))
        .unwrap();
    doc.add_entity_to_block("BOLT", Circle::from_center_radius(Vector3::ZERO, 0.25))
        .unwrap();
    let handle = doc.add_entity(Insert::new("BOLT", Vector3::new(100.0, 50.0, 0.0)));
    (doc, handle)
}
