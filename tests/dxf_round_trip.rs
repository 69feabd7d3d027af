//! Write a document, read it back and compare

mod common;

use common::builders::{every_readable_entity, inch_block_in_mm_drawing};
use common::{pairs, read_bytes, round_trip, section, write_binary, write_text, WRITABLE_VERSIONS};
use dxf_codec::entities::{EntityType, LwPolyline, Text};
use dxf_codec::notification::NotificationType;
use dxf_codec::types::Transparency;
use dxf_codec::{
    CadDocument, Circle, DxfError, DxfReader, DxfVersion, DxfWriter, DxfWriterConfiguration, Line, Vector2,
    Vector3,
};
use std::collections::BTreeMap;

fn kinds(doc: &CadDocument) -> BTreeMap<String, usize> {
    let mut map = BTreeMap::new();
    for entity in doc.entities() {
        let kind = match entity {
            EntityType::Polyline2D(_) => "POLYLINE (2D)",
            EntityType::Polyline3D(_) => "POLYLINE (3D)",
            EntityType::PolyfaceMesh(_) => "POLYLINE (polyface)",
            other => other.dxf_name(),
        };
        *map.entry(kind.to_string()).or_insert(0) += 1;
    }
    map
}

/// Text output prints negative zero as `0.0`, binary keeps the sign
fn debug_text(entity: &EntityType) -> String {
    format!("{entity:?}").replace("-0.0", "0.0")
}

#[test]
fn every_version_reads_back_the_same_entities() {
    let doc = every_readable_entity();
    for version in WRITABLE_VERSIONS {
        let read = round_trip(&doc, version);
        assert_eq!(read.header.version, version);
        assert_eq!(kinds(&read), kinds(&doc), "entity kinds differ at {version}");
        for entity in doc.entities() {
            let read_entity = read
                .entity(entity.handle())
                .unwrap_or_else(|| panic!("{} {} lost at {version}", entity.dxf_name(), entity.handle()));
            assert_eq!(read_entity.common().owner, entity.common().owner);
            assert_eq!(read_entity.common().layer, entity.common().layer);
        }
        assert!(
            !read.notifications.has_type(NotificationType::NotImplemented),
            "unexpected notifications at {version}: {:?}",
            read.notifications.iter().collect::<Vec<_>>()
        );
    }
}

#[test]
fn binary_and_text_read_the_same_document() {
    let doc = every_readable_entity();
    for version in [DxfVersion::AC1015, DxfVersion::AC1032] {
        let from_text = round_trip(&doc, version);
        let from_binary = read_bytes(write_binary(&doc, version));
        assert_eq!(kinds(&from_text), kinds(&from_binary));
        for entity in from_text.entities() {
            let other = from_binary.entity(entity.handle()).unwrap();
            assert_eq!(debug_text(entity), debug_text(other));
        }
        assert_eq!(from_text.layers.len(), from_binary.layers.len());
    }
}

#[test]
fn rewriting_a_read_document_keeps_the_entities_section() {
    let mut doc = CadDocument::new();
    doc.add_entity(Line::from_points(Vector3::ZERO, Vector3::new(3.5, -2.25, 0.0)));
    doc.add_entity(Circle::from_center_radius(Vector3::new(1.0, 2.0, 3.0), 5.0));
    doc.add_entity(LwPolyline::from_points(
        [Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.5)],
        true,
    ));
    for version in [DxfVersion::AC1018, DxfVersion::AC1032] {
        let first = write_text(&doc, version);
        let second = write_text(&read_bytes(first.clone().into_bytes()), version);
        assert_eq!(
            section(&pairs(&first), "ENTITIES"),
            section(&pairs(&second), "ENTITIES"),
            "rewrite differs at {version}"
        );
    }
}

#[test]
fn layers_and_blocks_survive() {
    let doc = every_readable_entity();
    let read = round_trip(&doc, DxfVersion::AC1024);

    let walls = read.layers.get("Walls").unwrap();
    assert_eq!(walls.transparency, Transparency::from_percent(40));
    assert!(walls.extended_data.is_empty());
    let hidden = read.layers.get("Hidden").unwrap();
    assert!(hidden.hidden);
    assert_eq!(hidden.color, doc.layers.get("Hidden").unwrap().color);

    let dashed = read.line_types.get("DASHED").unwrap();
    assert_eq!(dashed.elements.len(), 2);

    let tag = read.block_records.get("Tag").unwrap();
    assert_eq!(tag.entities.len(), 2);
    assert!(tag.flags.has_attributes);
    assert_eq!(
        tag.block_entity_handle,
        doc.block_records.get("Tag").unwrap().block_entity_handle
    );
}

#[test]
fn insert_scale_is_restored_to_block_units() {
    let (doc, handle) = inch_block_in_mm_drawing();
    let read = round_trip(&doc, DxfVersion::AC1032);
    let Some(EntityType::Insert(insert)) = read.entity(handle) else {
        panic!("insert missing");
    };
    assert!((insert.x_scale - 1.0).abs() < 1e-12);
    assert!((insert.y_scale - 1.0).abs() < 1e-12);
    assert!((insert.z_scale - 1.0).abs() < 1e-12);
}

#[test]
fn new_handles_do_not_collide_after_read() {
    let doc = every_readable_entity();
    let mut read = round_trip(&doc, DxfVersion::AC1032);
    let fresh = read.allocate_handle();
    assert!(read.entity(fresh).is_none());
    assert!(read.object(fresh).is_none());
}

#[test]
fn file_round_trip() {
    let doc = every_readable_entity();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drawing.dxf");
    DxfWriter::new(&doc).write_to_file(&path).unwrap();

    let read = DxfReader::from_file(&path).unwrap().read().unwrap();
    assert_eq!(read.entity_count(), doc.entity_count());
    assert_eq!(read.header.version, doc.header.version);
}

#[test]
fn unknown_entities_read_but_do_not_write() {
    let text = "  0\r\nSECTION\r\n  2\r\nENTITIES\r\n  0\r\nWIPEOUT\r\n  5\r\n40\r\n  8\r\n0\r\n  0\r\nENDSEC\r\n  0\r\nEOF\r\n";
    let read = read_bytes(text.as_bytes().to_vec());
    assert_eq!(read.entity_count(), 1);
    assert_eq!(read.notifications.of_type(NotificationType::NotImplemented).len(), 1);
    let result = DxfWriter::new(&read)
        .with_configuration(DxfWriterConfiguration {
            version: Some(DxfVersion::AC1032),
            ..Default::default()
        })
        .write_to_vec();
    assert!(matches!(result, Err(DxfError::UnsupportedEntity(name)) if name == "WIPEOUT"));
}

#[test]
fn characters_outside_the_code_page_survive() {
    let mut doc = CadDocument::new();
    doc.header.code_page = "ANSI_1251".to_string();
    let handle = doc.add_entity(Text::with_value("café Жук 😀", Vector3::ZERO));
    for version in [DxfVersion::AC1015, DxfVersion::AC1018] {
        let read = round_trip(&doc, version);
        let Some(EntityType::Text(text)) = read.entity(handle) else {
            panic!("text missing at {version}");
        };
        assert_eq!(text.value(), "café Жук 😀", "at {version}");
    }
}
