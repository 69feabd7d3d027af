//! DXF class definitions (CLASSES section)
//!
//! Object and entity kinds that are not part of the original DXF object
//! set are announced in the CLASSES section. Only classes with at least one
//! instance in the document are written.

use crate::document::CadDocument;
use once_cell::sync::Lazy;

/// A class record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DxfClass {
    /// DXF record name (code 1)
    pub dxf_name: String,
    /// C++ class name (code 2)
    pub cpp_name: String,
    /// Application name (code 3)
    pub app_name: String,
    /// Proxy capabilities flags (code 90)
    pub proxy_flags: i32,
    /// Number of instances in the document (code 91)
    pub instance_count: i32,
    /// Class was loaded as a proxy (code 280)
    pub was_a_proxy: bool,
    /// Class describes an entity (code 281)
    pub is_entity: bool,
}

impl DxfClass {
    fn known(dxf_name: &str, cpp_name: &str, app_name: &str, proxy_flags: i32, is_entity: bool) -> Self {
        DxfClass {
            dxf_name: dxf_name.to_string(),
            cpp_name: cpp_name.to_string(),
            app_name: app_name.to_string(),
            proxy_flags,
            instance_count: 0,
            was_a_proxy: false,
            is_entity,
        }
    }
}

const OBJECT_DBX: &str = "ObjectDBX Classes";
const ISM: &str = "ISM";

/// Classes this crate can produce instances of
static KNOWN_CLASSES: Lazy<Vec<DxfClass>> = Lazy::new(|| {
    vec![
        DxfClass::known("LWPOLYLINE", "AcDbPolyline", OBJECT_DBX, 0, true),
        DxfClass::known("HATCH", "AcDbHatch", OBJECT_DBX, 2047, true),
        DxfClass::known("IMAGE", "AcDbRasterImage", ISM, 2175, true),
        DxfClass::known("LAYOUT", "AcDbLayout", OBJECT_DBX, 0, false),
        DxfClass::known("IMAGEDEF", "AcDbRasterImageDef", ISM, 0, false),
        DxfClass::known("IMAGEDEF_REACTOR", "AcDbRasterImageDefReactor", ISM, 1, false),
        DxfClass::known("RASTERVARIABLES", "AcDbRasterVariables", ISM, 0, false),
    ]
});

/// Look up the class record for a DXF name
pub fn class_for(dxf_name: &str) -> Option<&'static DxfClass> {
    KNOWN_CLASSES.iter().find(|c| c.dxf_name == dxf_name)
}

/// Classes with at least one instance in `document`, with their counts
pub fn classes_in_use(document: &CadDocument) -> Vec<DxfClass> {
    let names = document
        .entities()
        .map(|e| e.dxf_name())
        .chain(document.objects().map(|o| o.dxf_name()));

    let mut counts = vec![0i32; KNOWN_CLASSES.len()];
    for name in names {
        if let Some(index) = KNOWN_CLASSES.iter().position(|c| c.dxf_name == name) {
            counts[index] += 1;
        }
    }

    KNOWN_CLASSES
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(class, count)| DxfClass {
            instance_count: count,
            ..class.clone()
        })
        .collect()
}
