mod common;

use common::{read_bytes, round_trip, write_binary};
use dxf_codec::entities::{EntityType, Text};
use dxf_codec::{CadDocument, Circle, DxfVersion, Vector3};
use proptest::prelude::*;

fn component() -> impl Strategy<Value = f64> {
    -1.0e4f64..1.0e4
}

fn unit_component() -> impl Strategy<Value = f64> {
    -1.0f64..1.0
}

/// Printable text from any plane, without the escape introducers
fn text() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        any::<char>().prop_filter("printable", |c| !c.is_control() && *c != '\\' && *c != '^'),
        1..40,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

fn read_circle(doc: &CadDocument) -> Circle {
    match doc.entities().next() {
        Some(EntityType::Circle(circle)) => circle.clone(),
        other => panic!("expected a circle, found {other:?}"),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn circle_survives_any_extrusion(
        x in component(), y in component(), z in component(),
        nx in unit_component(), ny in unit_component(), nz in unit_component(),
        radius in 0.001f64..1.0e3,
    ) {
        let normal = Vector3::new(nx, ny, nz);
        prop_assume!(normal.length() > 1e-3);
        let center = Vector3::new(x, y, z);

        let mut doc = CadDocument::new();
        doc.add_entity(Circle::from_center_radius(center, radius).with_normal(normal));

        for read in [
            round_trip(&doc, DxfVersion::AC1032),
            read_bytes(write_binary(&doc, DxfVersion::AC1015)),
        ] {
            let circle = read_circle(&read);
            let tolerance = 1e-9 * center.length().max(1.0);
            prop_assert!(circle.center.approx_eq(&center, tolerance), "{} vs {}", circle.center, center);
            prop_assert_eq!(circle.radius, radius);
            prop_assert!(circle.normal.normalize().approx_eq(&normal.normalize(), 1e-12));
        }
    }

    #[test]
    fn text_values_survive_every_encoding(value in text()) {
        let mut doc = CadDocument::new();
        doc.add_entity(Text::with_value(value.clone(), Vector3::ZERO));

        for version in [DxfVersion::AC1015, DxfVersion::AC1018, DxfVersion::AC1021, DxfVersion::AC1032] {
            let read = round_trip(&doc, version);
            let first = read.entities().next();
            match first {
                Some(EntityType::Text(text)) => prop_assert_eq!(text.value(), value.as_str()),
                other => prop_assert!(false, "expected text at {}, found {:?}", version, other),
            }
        }
    }
}
