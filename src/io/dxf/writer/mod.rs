//! DXF writer module

mod binary_writer;
mod dimension_writer;
mod entity_writer;
mod hatch_writer;
mod number_format;
mod object_writer;
mod section_writer;
mod stream_writer;
mod structure;
mod table_writer;
mod text_encoder;
mod text_writer;

pub use binary_writer::DxfBinaryWriter;
pub use number_format::NumberFormat;
pub use section_writer::SectionWriter;
pub use stream_writer::{DxfStreamWriter, DxfStreamWriterExt};
pub use structure::StructureState;
pub use text_encoder::{encode_non_ascii, TextEncoder};
pub use text_writer::DxfTextWriter;

pub(crate) use table_writer::{DESIGN_CENTER_DATA, TRANSPARENCY_APP};
pub(crate) use text_encoder::decode_non_ascii;

use crate::document::CadDocument;
use crate::error::{DxfError, Result};
use crate::io::dxf::encoding_from_code_page;
use crate::types::DxfVersion;
use encoding_rs::Encoding;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Options for a single write
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DxfWriterConfiguration {
    /// Target version; `None` uses the document header version
    pub version: Option<DxfVersion>,
    /// Write the binary variant
    pub binary: bool,
    /// Formatting of real values in text files
    pub number_format: NumberFormat,
    /// Write the document comments (code 999) before the HEADER section
    pub write_comments: bool,
}

impl Default for DxfWriterConfiguration {
    fn default() -> Self {
        DxfWriterConfiguration {
            version: None,
            binary: false,
            number_format: NumberFormat::INVARIANT,
            write_comments: true,
        }
    }
}

/// DXF file writer
///
/// The document is borrowed for the whole write.
pub struct DxfWriter<'a> {
    document: &'a CadDocument,
    configuration: DxfWriterConfiguration,
}

impl<'a> DxfWriter<'a> {
    /// Create a writer for ASCII output
    pub fn new(document: &'a CadDocument) -> Self {
        Self {
            document,
            configuration: DxfWriterConfiguration::default(),
        }
    }

    pub fn with_configuration(mut self, configuration: DxfWriterConfiguration) -> Self {
        self.configuration = configuration;
        self
    }

    /// Version the file will be written as
    pub fn version(&self) -> DxfVersion {
        self.configuration
            .version
            .unwrap_or(self.document.header.version)
    }

    /// Write to a file
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_to_writer(file)
    }

    /// Write to any writer
    pub fn write_to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let version = self.version();
        if !version.is_writable() {
            return Err(DxfError::UnsupportedVersion(format!(
                "{} (oldest writable version is {})",
                version,
                DxfVersion::MIN_WRITABLE
            )));
        }

        let writer = BufWriter::new(writer);
        let encoding = self.encoding(version);
        if self.configuration.binary {
            let mut stream = DxfBinaryWriter::new(writer)?.with_encoding(encoding);
            self.write_dxf(&mut stream, version)?;
            stream.flush()?;
        } else {
            let mut stream = DxfTextWriter::new(writer, self.configuration.number_format)
                .with_encoding(encoding);
            self.write_dxf(&mut stream, version)?;
            stream.flush()?;
        }

        info!(
            version = %version,
            entities = self.document.entity_count(),
            binary = self.configuration.binary,
            "DXF written"
        );
        Ok(())
    }

    /// Write to a byte vector
    pub fn write_to_vec(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_to_writer(&mut buffer)?;
        Ok(buffer)
    }

    /// Byte encoding of strings: the header code page before AC1021
    fn encoding(&self, version: DxfVersion) -> Option<&'static Encoding> {
        if version.uses_code_page() {
            encoding_from_code_page(&self.document.header.code_page)
        } else {
            None
        }
    }

    fn write_dxf<W: DxfStreamWriter>(&self, writer: &mut W, version: DxfVersion) -> Result<()> {
        let mut sections = SectionWriter::new(writer, self.document, version);
        if self.configuration.write_comments {
            sections.write_comments(&self.document.comments)?;
        }
        sections.write_header()?;
        sections.write_classes()?;
        sections.write_tables()?;
        sections.write_blocks()?;
        sections.write_entities()?;
        sections.write_objects()?;
        sections.write_eof()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_old_versions() {
        let doc = CadDocument::new();
        let configuration = DxfWriterConfiguration {
            version: Some(DxfVersion::AC1014),
            ..Default::default()
        };
        let result = DxfWriter::new(&doc)
            .with_configuration(configuration)
            .write_to_vec();
        assert!(matches!(result, Err(DxfError::UnsupportedVersion(_))));
    }

    #[test]
    fn test_version_override() {
        let doc = CadDocument::new();
        let writer = DxfWriter::new(&doc).with_configuration(DxfWriterConfiguration {
            version: Some(DxfVersion::AC1018),
            ..Default::default()
        });
        assert_eq!(writer.version(), DxfVersion::AC1018);
        let text = String::from_utf8(writer.write_to_vec().unwrap()).unwrap();
        assert!(text.contains("$ACADVER\r\n  1\r\nAC1018\r\n"));
        assert!(text.ends_with("  0\r\nEOF\r\n"));
    }

    #[test]
    fn test_comments_can_be_skipped() {
        let mut doc = CadDocument::new();
        doc.comments.push("made by tests".to_string());
        let with = String::from_utf8(DxfWriter::new(&doc).write_to_vec().unwrap()).unwrap();
        assert!(with.starts_with("999\r\nmade by tests\r\n"));

        let without = DxfWriter::new(&doc)
            .with_configuration(DxfWriterConfiguration {
                write_comments: false,
                ..Default::default()
            })
            .write_to_vec()
            .unwrap();
        assert!(String::from_utf8(without).unwrap().starts_with("  0\r\nSECTION\r\n"));
    }
}
