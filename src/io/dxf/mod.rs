//! DXF (Drawing Exchange Format) reading and writing

mod code_page;
mod group_code;
mod reader;
mod writer;

pub use code_page::encoding_from_code_page;
pub use group_code::GroupCodeValueType;
pub use reader::{DxfCodePair, DxfReader, DxfReaderConfiguration};
pub use writer::{
    encode_non_ascii, DxfBinaryWriter, DxfStreamWriter, DxfStreamWriterExt, DxfTextWriter,
    DxfWriter, DxfWriterConfiguration, NumberFormat, SectionWriter, StructureState, TextEncoder,
};

use std::fmt;

/// Sentinel at the start of a binary DXF file
pub(crate) const BINARY_SENTINEL: &[u8] = b"AutoCAD Binary DXF\r\n\x1a\x00";

/// Top-level section of a DXF file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Header,
    Classes,
    Tables,
    Blocks,
    Entities,
    Objects,
    Thumbnail,
    AcdsData,
}

impl Section {
    /// Name written after `2` in the section start
    pub fn name(self) -> &'static str {
        match self {
            Section::Header => "HEADER",
            Section::Classes => "CLASSES",
            Section::Tables => "TABLES",
            Section::Blocks => "BLOCKS",
            Section::Entities => "ENTITIES",
            Section::Objects => "OBJECTS",
            Section::Thumbnail => "THUMBNAILIMAGE",
            Section::AcdsData => "ACDSDATA",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.trim() {
            "HEADER" => Section::Header,
            "CLASSES" => Section::Classes,
            "TABLES" => Section::Tables,
            "BLOCKS" => Section::Blocks,
            "ENTITIES" => Section::Entities,
            "OBJECTS" => Section::Objects,
            "THUMBNAILIMAGE" => Section::Thumbnail,
            "ACDSDATA" => Section::AcdsData,
            _ => return None,
        })
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Symbol table inside the TABLES section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    AppId,
    VPort,
    LineType,
    Layer,
    Style,
    DimStyle,
    View,
    Ucs,
    BlockRecord,
}

impl TableKind {
    /// Write order of the tables
    pub const ALL: [TableKind; 9] = [
        TableKind::AppId,
        TableKind::VPort,
        TableKind::LineType,
        TableKind::Layer,
        TableKind::Style,
        TableKind::DimStyle,
        TableKind::View,
        TableKind::Ucs,
        TableKind::BlockRecord,
    ];

    /// Table name, also the record name of its entries
    pub fn name(self) -> &'static str {
        match self {
            TableKind::AppId => "APPID",
            TableKind::VPort => "VPORT",
            TableKind::LineType => "LTYPE",
            TableKind::Layer => "LAYER",
            TableKind::Style => "STYLE",
            TableKind::DimStyle => "DIMSTYLE",
            TableKind::View => "VIEW",
            TableKind::Ucs => "UCS",
            TableKind::BlockRecord => "BLOCK_RECORD",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        TableKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name.trim())
    }

    /// Record subclass marker
    pub fn subclass(self) -> &'static str {
        match self {
            TableKind::AppId => "AcDbRegAppTableRecord",
            TableKind::VPort => "AcDbViewportTableRecord",
            TableKind::LineType => "AcDbLinetypeTableRecord",
            TableKind::Layer => "AcDbLayerTableRecord",
            TableKind::Style => "AcDbTextStyleTableRecord",
            TableKind::DimStyle => "AcDbDimStyleTableRecord",
            TableKind::View => "AcDbViewTableRecord",
            TableKind::Ucs => "AcDbUCSTableRecord",
            TableKind::BlockRecord => "AcDbBlockTableRecord",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_names() {
        for section in [Section::Header, Section::Blocks, Section::Thumbnail] {
            assert_eq!(Section::from_name(section.name()), Some(section));
        }
        assert_eq!(Section::from_name("NOPE"), None);
    }

    #[test]
    fn test_table_order() {
        let names: Vec<_> = TableKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(
            names,
            ["APPID", "VPORT", "LTYPE", "LAYER", "STYLE", "DIMSTYLE", "VIEW", "UCS", "BLOCK_RECORD"]
        );
        assert_eq!(TableKind::from_name("LTYPE"), Some(TableKind::LineType));
    }
}
