//! # dxf-codec
//!
//! Reads and writes CAD drawings in the DXF group-code format, text or
//! binary, from `AC1015` through `AC1032`.
//!
//! A [`CadDocument`] is an arena of tables, entities and objects keyed by
//! [`Handle`]. [`DxfWriter`] serializes it for a target version, converting
//! what the version cannot express, and [`DxfReader`] rebuilds a document
//! from what the writer produces.
//!
//! ```rust,no_run
//! use dxf_codec::{CadDocument, DxfReader, DxfWriter, Line, Vector3};
//!
//! let mut doc = CadDocument::new();
//! doc.add_entity(Line::from_points(Vector3::ZERO, Vector3::new(10.0, 0.0, 0.0)));
//! DxfWriter::new(&doc).write_to_file("line.dxf")?;
//!
//! let read = DxfReader::from_file("line.dxf")?.read()?;
//! assert_eq!(read.model_space_entities().count(), 1);
//! # Ok::<(), dxf_codec::DxfError>(())
//! ```

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod classes;
pub mod document;
pub mod entities;
pub mod error;
pub mod io;
pub mod notification;
pub mod objects;
pub mod tables;
pub mod types;
pub mod xdata;

pub use document::CadDocument;
pub use entities::{
    Arc, Circle, Ellipse, Entity, EntityType, Insert, Line, LwPolyline, MText, Point, Polyline2D,
    Polyline3D, Spline, Text,
};
pub use error::{DxfError, Result};
pub use io::dxf::{DxfReader, DxfReaderConfiguration, DxfWriter, DxfWriterConfiguration};
pub use notification::{Notification, NotificationType};
pub use tables::{
    AppId, BlockRecord, DimStyle, Layer, LineType, Table, TableEntry, TextStyle, Ucs, VPort, View,
};
pub use types::{Color, DxfVersion, Handle, LineWeight, Transparency, Vector2, Vector3};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
