//! CAD entity types and traits
//!
//! Entities live in the document's arena keyed by [`Handle`]. Every variant
//! of [`EntityType`] has exactly one encoder in the DXF writer, so adding a
//! variant here is a compile error until it is written out.

use crate::types::{Color, Handle, LineWeight, Transparency};
use crate::xdata::ExtendedData;

/// Implements [`Entity`] for a struct that stores its shared data in a
/// `common` field.
macro_rules! impl_entity {
    ($ty:ty, $name:literal) => {
        impl $crate::entities::Entity for $ty {
            fn common(&self) -> &$crate::entities::EntityCommon {
                &self.common
            }

            fn common_mut(&mut self) -> &mut $crate::entities::EntityCommon {
                &mut self.common
            }

            fn entity_type(&self) -> &'static str {
                $name
            }
        }
    };
}

pub mod arc;
pub mod attribute_definition;
pub mod attribute_entity;
pub mod circle;
pub mod dimension;
pub mod ellipse;
pub mod face3d;
pub mod hatch;
pub mod insert;
pub mod leader;
pub mod line;
pub mod lwpolyline;
pub mod mline;
pub mod mtext;
pub mod point;
pub mod polyface_mesh;
pub mod polyline;
pub mod polyline3d;
pub mod raster_image;
pub mod ray;
pub mod solid;
pub mod spline;
pub mod text;
pub mod tolerance;
pub mod unknown_entity;
pub mod viewport;
pub mod xline;

pub use arc::Arc;
pub use attribute_definition::{AttributeDefinition, AttributeFlags};
pub use attribute_entity::Attribute;
pub use circle::Circle;
pub use dimension::*;
pub use ellipse::Ellipse;
pub use face3d::{Face3D, InvisibleEdgeFlags};
pub use hatch::*;
pub use insert::Insert;
pub use leader::{HooklineDirection, Leader, LeaderCreationType, LeaderPathType};
pub use line::Line;
pub use lwpolyline::{LwPolyline, LwVertex};
pub use mline::{MLine, MLineFlags, MLineJustification, MLineSegment, MLineVertex};
pub use mtext::{AttachmentPoint, DrawingDirection, MText};
pub use point::Point;
pub use polyface_mesh::{PolyfaceFace, PolyfaceMesh, PolyfaceVertex};
pub use polyline::{Polyline2D, PolylineFlags, Vertex2D, VertexFlags};
pub use polyline3d::{Polyline3D, Vertex3D};
pub use raster_image::{ClipType, ImageDisplayFlags, RasterImage};
pub use ray::Ray;
pub use solid::Solid;
pub use spline::{Spline, SplineFlags};
pub use text::{Text, TextHorizontalAlignment, TextMirrorFlags, TextProperties, TextVerticalAlignment};
pub use tolerance::Tolerance;
pub use unknown_entity::UnknownEntity;
pub use viewport::{Viewport, ViewportStatusFlags};
pub use xline::XLine;

/// Base trait for all CAD entities
pub trait Entity {
    /// Shared entity data
    fn common(&self) -> &EntityCommon;

    /// Mutable shared entity data
    fn common_mut(&mut self) -> &mut EntityCommon;

    /// DXF record name (`LINE`, `CIRCLE`, ...)
    fn entity_type(&self) -> &'static str;

    /// Get the entity's unique handle
    fn handle(&self) -> Handle {
        self.common().handle
    }

    /// Set the entity's handle
    fn set_handle(&mut self, handle: Handle) {
        self.common_mut().handle = handle;
    }

    /// Handle of the owning block record
    fn owner(&self) -> Handle {
        self.common().owner
    }

    /// Get the entity's layer name
    fn layer(&self) -> &str {
        &self.common().layer
    }

    /// Set the entity's layer name
    fn set_layer(&mut self, layer: String) {
        self.common_mut().layer = layer;
    }

    /// Get the entity's color
    fn color(&self) -> Color {
        self.common().color
    }

    /// Set the entity's color
    fn set_color(&mut self, color: Color) {
        self.common_mut().color = color;
    }

    /// Get the entity's line weight
    fn line_weight(&self) -> LineWeight {
        self.common().line_weight
    }

    /// Get the entity's transparency
    fn transparency(&self) -> Transparency {
        self.common().transparency
    }

    /// Check if the entity is invisible
    fn is_invisible(&self) -> bool {
        self.common().invisible
    }
}

/// Common entity data shared by all entities
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCommon {
    /// Unique handle
    pub handle: Handle,
    /// Owning block record (or insert/polyline for sub-entities)
    pub owner: Handle,
    /// Layer name
    pub layer: String,
    /// Color
    pub color: Color,
    /// Line type name
    pub line_type: String,
    /// Line type scale
    pub line_type_scale: f64,
    /// Line weight
    pub line_weight: LineWeight,
    /// Transparency
    pub transparency: Transparency,
    /// Visibility flag
    pub invisible: bool,
    /// Persistent reactors (`102 {ACAD_REACTORS`)
    pub reactors: Vec<Handle>,
    /// Extended data (XDATA)
    pub extended_data: ExtendedData,
}

impl EntityCommon {
    /// Create new common entity data with defaults
    pub fn new() -> Self {
        EntityCommon {
            handle: Handle::NULL,
            owner: Handle::NULL,
            layer: "0".to_string(),
            color: Color::ByLayer,
            line_type: "ByLayer".to_string(),
            line_type_scale: 1.0,
            line_weight: LineWeight::ByLayer,
            transparency: Transparency::ByLayer,
            invisible: false,
            reactors: Vec::new(),
            extended_data: ExtendedData::new(),
        }
    }

    /// Create with a specific layer
    pub fn with_layer(layer: impl Into<String>) -> Self {
        EntityCommon {
            layer: layer.into(),
            ..Self::new()
        }
    }
}

impl Default for EntityCommon {
    fn default() -> Self {
        Self::new()
    }
}

/// Enumeration of all entity types for type-safe storage
#[derive(Debug, Clone)]
pub enum EntityType {
    Point(Point),
    Line(Line),
    Ray(Ray),
    XLine(XLine),
    Circle(Circle),
    Arc(Arc),
    Ellipse(Ellipse),
    LwPolyline(LwPolyline),
    /// 2D Polyline entity (heavy polyline)
    Polyline2D(Polyline2D),
    Polyline3D(Polyline3D),
    PolyfaceMesh(PolyfaceMesh),
    Text(Text),
    MText(MText),
    AttributeDefinition(AttributeDefinition),
    Spline(Spline),
    Hatch(Hatch),
    Dimension(Dimension),
    /// Block reference, with its attributes
    Insert(Insert),
    Solid(Solid),
    Face3D(Face3D),
    Leader(Leader),
    Tolerance(Tolerance),
    MLine(MLine),
    Viewport(Viewport),
    RasterImage(RasterImage),
    /// Entity kind this crate does not model
    Unknown(UnknownEntity),
}

macro_rules! dispatch {
    ($value:expr, $e:ident => $body:expr) => {
        match $value {
            EntityType::Point($e) => $body,
            EntityType::Line($e) => $body,
            EntityType::Ray($e) => $body,
            EntityType::XLine($e) => $body,
            EntityType::Circle($e) => $body,
            EntityType::Arc($e) => $body,
            EntityType::Ellipse($e) => $body,
            EntityType::LwPolyline($e) => $body,
            EntityType::Polyline2D($e) => $body,
            EntityType::Polyline3D($e) => $body,
            EntityType::PolyfaceMesh($e) => $body,
            EntityType::Text($e) => $body,
            EntityType::MText($e) => $body,
            EntityType::AttributeDefinition($e) => $body,
            EntityType::Spline($e) => $body,
            EntityType::Hatch($e) => $body,
            EntityType::Dimension($e) => $body,
            EntityType::Insert($e) => $body,
            EntityType::Solid($e) => $body,
            EntityType::Face3D($e) => $body,
            EntityType::Leader($e) => $body,
            EntityType::Tolerance($e) => $body,
            EntityType::MLine($e) => $body,
            EntityType::Viewport($e) => $body,
            EntityType::RasterImage($e) => $body,
            EntityType::Unknown($e) => $body,
        }
    };
}

impl EntityType {
    /// Get a reference to the entity trait object
    pub fn as_entity(&self) -> &dyn Entity {
        dispatch!(self, e => e)
    }

    /// Get a mutable reference to the entity trait object
    pub fn as_entity_mut(&mut self) -> &mut dyn Entity {
        dispatch!(self, e => e)
    }

    /// Shared entity data
    pub fn common(&self) -> &EntityCommon {
        self.as_entity().common()
    }

    /// Mutable shared entity data
    pub fn common_mut(&mut self) -> &mut EntityCommon {
        self.as_entity_mut().common_mut()
    }

    /// Entity handle
    pub fn handle(&self) -> Handle {
        self.common().handle
    }

    /// DXF record name; for unknown entities, the name they were read with
    pub fn dxf_name(&self) -> &str {
        match self {
            EntityType::Unknown(e) => &e.dxf_name,
            other => other.as_entity().entity_type(),
        }
    }

    /// Assign handles to owned sub-entities (vertices, attributes, SEQEND)
    /// and point their owner at this entity.
    pub(crate) fn assign_sub_handles(&mut self, mut next: impl FnMut() -> Handle) {
        self.for_each_sub_handle(|handle| *handle = next());
    }

    /// Give sub-entities read without a `5` pair a fresh handle
    pub(crate) fn assign_missing_sub_handles(&mut self, mut next: impl FnMut() -> Handle) {
        self.for_each_sub_handle(|handle| {
            if handle.is_null() {
                *handle = next();
            }
        });
    }

    /// Handles of vertices, faces, attributes and SEQEND markers
    pub(crate) fn sub_handles(&self) -> Vec<Handle> {
        let mut handles = Vec::new();
        match self {
            EntityType::Polyline2D(p) => {
                handles.extend(p.vertices.iter().map(|v| v.handle));
                handles.push(p.seqend_handle);
            }
            EntityType::Polyline3D(p) => {
                handles.extend(p.vertices.iter().map(|v| v.handle));
                handles.push(p.seqend_handle);
            }
            EntityType::PolyfaceMesh(p) => {
                handles.extend(p.vertices.iter().map(|v| v.handle));
                handles.extend(p.faces.iter().map(|f| f.handle));
                handles.push(p.seqend_handle);
            }
            EntityType::Insert(insert) => {
                handles.extend(insert.attributes.iter().map(|a| a.common.handle));
                handles.push(insert.seqend_handle);
            }
            _ => {}
        }
        handles
    }

    fn for_each_sub_handle(&mut self, mut visit: impl FnMut(&mut Handle)) {
        let parent = self.handle();
        match self {
            EntityType::Polyline2D(p) => {
                p.vertices.iter_mut().for_each(|v| visit(&mut v.handle));
                visit(&mut p.seqend_handle);
            }
            EntityType::Polyline3D(p) => {
                p.vertices.iter_mut().for_each(|v| visit(&mut v.handle));
                visit(&mut p.seqend_handle);
            }
            EntityType::PolyfaceMesh(p) => {
                p.vertices.iter_mut().for_each(|v| visit(&mut v.handle));
                p.faces.iter_mut().for_each(|f| visit(&mut f.handle));
                visit(&mut p.seqend_handle);
            }
            EntityType::Insert(insert) => {
                for attribute in &mut insert.attributes {
                    visit(&mut attribute.common.handle);
                    attribute.common.owner = parent;
                }
                if insert.attributes.is_empty() {
                    insert.seqend_handle = Handle::NULL;
                } else {
                    visit(&mut insert.seqend_handle);
                }
            }
            _ => {}
        }
    }
}

macro_rules! impl_from_entity {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for EntityType {
                fn from(entity: $variant) -> Self {
                    EntityType::$variant(entity)
                }
            }
        )*
    };
}

impl_from_entity!(
    Point,
    Line,
    Ray,
    XLine,
    Circle,
    Arc,
    Ellipse,
    LwPolyline,
    Polyline2D,
    Polyline3D,
    PolyfaceMesh,
    Text,
    MText,
    AttributeDefinition,
    Spline,
    Hatch,
    Dimension,
    Insert,
    Solid,
    Face3D,
    Leader,
    Tolerance,
    MLine,
    Viewport,
    RasterImage,
);

impl From<UnknownEntity> for EntityType {
    fn from(entity: UnknownEntity) -> Self {
        EntityType::Unknown(entity)
    }
}
