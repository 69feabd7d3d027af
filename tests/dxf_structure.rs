//! Shape of the written group-code stream

mod common;

use common::builders::{every_readable_entity, inch_block_in_mm_drawing};
use common::{named_record, p, pairs, records, section, section_names, table, value, write_binary, write_text};
use dxf_codec::entities::UnknownEntity;
use dxf_codec::tables::Layer;
use dxf_codec::types::Color;
use dxf_codec::{CadDocument, Circle, DxfError, DxfVersion, DxfWriter, DxfWriterConfiguration, Vector3};

#[test]
fn sections_come_in_order() {
    let doc = every_readable_entity();
    for version in common::WRITABLE_VERSIONS {
        let pairs = pairs(&write_text(&doc, version));
        assert_eq!(
            section_names(&pairs),
            ["HEADER", "CLASSES", "TABLES", "BLOCKS", "ENTITIES", "OBJECTS"]
        );
        assert_eq!(pairs.last(), Some(&p(0, "EOF")));
    }
}

#[test]
fn every_opener_has_its_closer() {
    let doc = every_readable_entity();
    let pairs = pairs(&write_text(&doc, DxfVersion::AC1027));
    for (open, close) in [("SECTION", "ENDSEC"), ("TABLE", "ENDTAB"), ("BLOCK", "ENDBLK")] {
        let mut depth = 0i32;
        for pair in pairs.iter().filter(|x| x.0 == 0) {
            if pair.1 == open {
                depth += 1;
                assert_eq!(depth, 1, "nested {open}");
            } else if pair.1 == close {
                depth -= 1;
                assert_eq!(depth, 0, "{close} without {open}");
            }
        }
        assert_eq!(depth, 0, "{open} left open");
    }
}

#[test]
fn header_names_the_target_version() {
    let doc = CadDocument::new();
    for version in common::WRITABLE_VERSIONS {
        let pairs = pairs(&write_text(&doc, version));
        let header = section(&pairs, "HEADER");
        let at = header.iter().position(|x| *x == p(9, "$ACADVER")).unwrap();
        assert_eq!(header[at + 1], p(1, &version.to_string()));
    }
}

#[test]
fn circle_record_at_ac1027() {
    let mut doc = CadDocument::new();
    let handle = doc.add_entity(Circle::from_center_radius(Vector3::new(1.0, 2.0, 3.0), 5.0));
    let pairs = pairs(&write_text(&doc, DxfVersion::AC1027));
    let entities = section(&pairs, "ENTITIES");
    let circle = records(entities)
        .into_iter()
        .find(|r| r[0] == p(0, "CIRCLE"))
        .unwrap();

    let codes: Vec<i32> = circle.iter().map(|x| x.0).collect();
    assert_eq!(
        codes,
        [0, 5, 330, 100, 8, 62, 6, 370, 48, 60, 100, 10, 20, 30, 40, 39, 210, 220, 230]
    );
    assert_eq!(value(circle, 5), Some(format!("{:X}", handle.value()).as_str()));
    assert_eq!(circle[3], p(100, "AcDbEntity"));
    assert_eq!(value(circle, 48), Some("1.0"));
    assert_eq!(value(circle, 60), Some("0"));
    assert_eq!(circle[10], p(100, "AcDbCircle"));
    assert_eq!(
        &circle[11..],
        &[
            p(10, "1.0"),
            p(20, "2.0"),
            p(30, "3.0"),
            p(40, "5.0"),
            p(39, "0.0"),
            p(210, "0.0"),
            p(220, "0.0"),
            p(230, "1.0"),
        ]
    );
}

#[test]
fn inch_block_in_mm_drawing_scales_by_25_4() {
    let (doc, handle) = inch_block_in_mm_drawing();
    let pairs = pairs(&write_text(&doc, DxfVersion::AC1032));
    let hex = format!("{:X}", handle.value());
    let insert = records(section(&pairs, "ENTITIES"))
        .into_iter()
        .find(|r| r[0] == p(0, "INSERT") && r.contains(&p(5, &hex)))
        .unwrap();
    for code in [41, 42, 43] {
        let scale: f64 = value(insert, code).unwrap().parse().unwrap();
        assert!((scale - 25.4).abs() < 1e-9, "code {code} is {scale}");
    }
}

#[test]
fn hidden_layer_writes_negative_color() {
    let mut doc = CadDocument::new();
    let mut layer = Layer::new("Hidden").with_color(Color::from_index(3));
    layer.hidden = true;
    doc.add_layer(layer).unwrap();

    let pairs = pairs(&write_text(&doc, DxfVersion::AC1032));
    let record = named_record(table(&pairs, "LAYER"), "LAYER", "Hidden");
    assert_eq!(value(record, 62), Some("-3"));
}

#[test]
fn layer_transparency_travels_as_xdata() {
    let doc = every_readable_entity();
    let pairs = pairs(&write_text(&doc, DxfVersion::AC1032));
    let record = named_record(table(&pairs, "LAYER"), "LAYER", "Walls");
    let at = record
        .iter()
        .position(|x| *x == p(1001, "AcCmTransparency"))
        .expect("transparency xdata");
    assert_eq!(record[at + 1].0, 1071);
}

#[test]
fn block_units_xdata_only_before_ac1021() {
    let (doc, _) = inch_block_in_mm_drawing();
    for (version, expected) in [
        (DxfVersion::AC1015, true),
        (DxfVersion::AC1018, true),
        (DxfVersion::AC1021, false),
        (DxfVersion::AC1032, false),
    ] {
        let pairs = pairs(&write_text(&doc, version));
        let record = named_record(table(&pairs, "BLOCK_RECORD"), "BLOCK_RECORD", "BOLT");
        let found = record.contains(&p(1000, "DesignCenter Data"));
        assert_eq!(found, expected, "at {version}");
    }
}

#[test]
fn layouts_write_shade_plot_flag() {
    let doc = CadDocument::new();
    let pairs = pairs(&write_text(&doc, DxfVersion::AC1032));
    let layouts: Vec<_> = records(section(&pairs, "OBJECTS"))
        .into_iter()
        .filter(|r| r[0] == p(0, "LAYOUT"))
        .collect();
    assert!(!layouts.is_empty());
    for layout in layouts {
        assert_eq!(value(layout, 74), Some("5"));
    }
}

#[test]
fn characters_escape_before_ac1021() {
    let mut doc = CadDocument::new();
    doc.add_layer(Layer::new("Ω-漢")).unwrap();

    let old = write_text(&doc, DxfVersion::AC1018);
    assert!(old.contains("\\U+03A9-\\U+6F22"));
    assert!(!old.contains('Ω'));

    let new = write_text(&doc, DxfVersion::AC1032);
    assert!(new.contains("Ω-漢"));
    assert!(!new.contains("\\U+"));
}

#[test]
fn numbers_ignore_locale() {
    let doc = every_readable_entity();
    let text = write_text(&doc, DxfVersion::AC1032);
    for pair in pairs(&text).into_iter().filter(|x| (10..=59).contains(&x.0)) {
        assert!(!pair.1.contains(','), "{pair:?}");
        assert!(pair.1.parse::<f64>().is_ok(), "{pair:?}");
    }
}

#[test]
fn binary_output_starts_with_sentinel() {
    let doc = CadDocument::new();
    let bytes = write_binary(&doc, DxfVersion::AC1032);
    assert!(bytes.starts_with(b"AutoCAD Binary DXF\r\n\x1a\x00"));
    assert_eq!(&bytes[bytes.len() - 4..], b"EOF\0");
}

#[test]
fn old_versions_are_refused() {
    let doc = CadDocument::new();
    for version in [DxfVersion::AC1009, DxfVersion::AC1012, DxfVersion::AC1014] {
        let result = DxfWriter::new(&doc)
            .with_configuration(DxfWriterConfiguration {
                version: Some(version),
                ..Default::default()
            })
            .write_to_vec();
        assert!(matches!(result, Err(DxfError::UnsupportedVersion(_))), "{version}");
    }
}

#[test]
fn unknown_entities_are_refused() {
    let mut doc = CadDocument::new();
    doc.add_entity(UnknownEntity::new("HELIX"));
    let result = DxfWriter::new(&doc).write_to_vec();
    assert!(matches!(result, Err(DxfError::UnsupportedEntity(name)) if name == "HELIX"));
}
