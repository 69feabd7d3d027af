//! DXF file reader
//!
//! The reader is the mirror image of the writer: it accepts what
//! [`DxfWriter`](super::DxfWriter) produces, text or binary, and rebuilds a
//! [`CadDocument`]. Records it does not model are kept as unknown entities
//! or skipped, with a notification on the document.

mod binary_reader;
mod dimension_reader;
mod entity_reader;
mod hatch_reader;
mod object_reader;
mod section_reader;
mod stream_reader;
mod table_reader;
mod text_reader;

pub use binary_reader::DxfBinaryReader;
pub use stream_reader::{DxfCodePair, DxfStreamReader};
pub use text_reader::DxfTextReader;

use section_reader::SectionReader;

use super::{encoding_from_code_page, Section, BINARY_SENTINEL};
use crate::document::CadDocument;
use crate::error::Result;
use crate::notification::NotificationType;
use crate::types::DxfVersion;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, info, warn};

/// Configuration for the DXF reader.
#[derive(Debug, Clone, Default)]
pub struct DxfReaderConfiguration {
    /// When `true`, an error inside a section is recorded as a notification
    /// and the rest of that section is skipped instead of aborting the read.
    ///
    /// Default: `false`.
    pub failsafe: bool,
}

/// DXF file reader
pub struct DxfReader {
    reader: Box<dyn DxfStreamReader>,
    version: DxfVersion,
    config: DxfReaderConfiguration,
}

impl DxfReader {
    /// Create a new DXF reader from any seekable source
    pub fn from_reader<R: Read + Seek + 'static>(reader: R) -> Result<Self> {
        let mut buf_reader = BufReader::new(reader);
        let reader: Box<dyn DxfStreamReader> = if Self::is_binary(&mut buf_reader)? {
            Box::new(DxfBinaryReader::new(buf_reader)?)
        } else {
            Box::new(DxfTextReader::new(buf_reader))
        };
        Ok(Self {
            reader,
            version: DxfVersion::Unknown,
            config: DxfReaderConfiguration::default(),
        })
    }

    /// Create a new DXF reader from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_reader(File::open(path)?)
    }

    /// Check if a stream starts with the binary sentinel; rewinds afterwards
    fn is_binary<R: Read + Seek>(reader: &mut R) -> Result<bool> {
        let mut buffer = [0u8; BINARY_SENTINEL.len()];
        let mut filled = 0;
        while filled < buffer.len() {
            match reader.read(&mut buffer[filled..])? {
                0 => break,
                n => filled += n,
            }
        }
        reader.seek(SeekFrom::Start(0))?;
        Ok(filled == buffer.len() && buffer == BINARY_SENTINEL)
    }

    /// Set the reader configuration.
    pub fn with_configuration(mut self, config: DxfReaderConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Read the whole stream into a document
    pub fn read(mut self) -> Result<CadDocument> {
        self.read_version()?;

        let mut document = CadDocument::empty();
        document.header.version = self.version;

        while let Some(pair) = self.reader.read_pair()? {
            match (pair.code, pair.as_str()) {
                (0, "SECTION") => {}
                (0, "EOF") => break,
                (999, comment) => {
                    document.comments.push(comment.to_string());
                    continue;
                }
                _ => continue,
            }

            let name = match self.reader.read_pair()? {
                Some(name) if name.code == 2 => name.value_string,
                Some(other) => {
                    self.reader.push_back(other);
                    continue;
                }
                None => break,
            };

            let result = match Section::from_name(&name) {
                Some(section @ (Section::Thumbnail | Section::AcdsData)) => {
                    debug!(%section, "skipping section");
                    self.skip_section()
                }
                Some(section) => self.read_section(section, &mut document),
                None => {
                    warn!(section = %name, "unknown section skipped");
                    document.notifications.notify(
                        NotificationType::NotSupported,
                        format!("unknown section {} skipped", name),
                    );
                    self.skip_section()
                }
            };

            if let Err(error) = result {
                if !self.config.failsafe {
                    return Err(error);
                }
                warn!(section = %name, %error, "section could not be read");
                document.notifications.notify(
                    NotificationType::Error,
                    format!("error reading {} section: {}", name, error),
                );
                self.skip_section()?;
            }
        }

        document.finish_read();
        info!(
            version = %document.header.version,
            entities = document.entity_count(),
            "read DXF document"
        );
        Ok(document)
    }

    fn read_section(&mut self, section: Section, document: &mut CadDocument) -> Result<()> {
        debug!(%section, "reading section");
        let mut reader = SectionReader::new(self.reader.as_mut(), document);
        match section {
            Section::Header => reader.read_header(),
            Section::Classes => reader.read_classes(),
            Section::Tables => reader.read_tables(),
            Section::Blocks => reader.read_blocks(),
            Section::Entities => reader.read_entities(),
            Section::Objects => reader.read_objects(),
            Section::Thumbnail | Section::AcdsData => Ok(()),
        }
    }

    /// Pre-scan the HEADER section for $ACADVER and $DWGCODEPAGE.
    ///
    /// Sets the stream encoding for versions that store text in a code page,
    /// then rewinds the stream.
    fn read_version(&mut self) -> Result<()> {
        let mut code_page: Option<String> = None;
        let mut in_header = false;

        // A malformed value ends the scan; the full read reports it
        while let Ok(Some(pair)) = self.reader.read_pair() {
            match (pair.code, pair.as_str()) {
                (2, "HEADER") => in_header = true,
                (0, "ENDSEC") if in_header => break,
                (9, "$ACADVER") if in_header => {
                    if let Ok(Some(value)) = self.reader.read_pair() {
                        self.version = DxfVersion::from_version_string(value.as_str());
                    }
                }
                (9, "$DWGCODEPAGE") if in_header => {
                    if let Ok(Some(value)) = self.reader.read_pair() {
                        code_page = Some(value.value_string);
                    }
                }
                (0, "SECTION") | (999, _) => {}
                _ if !in_header => break,
                _ => {}
            }
        }

        if self.version.uses_code_page() {
            if let Some(encoding) = code_page.as_deref().and_then(encoding_from_code_page) {
                debug!(code_page = ?code_page, "decoding text with code page");
                self.reader.set_encoding(encoding);
            }
        }

        self.reader.reset()
    }

    /// Skip the current section
    fn skip_section(&mut self) -> Result<()> {
        while let Some(pair) = self.reader.read_pair()? {
            if pair.code == 0 && pair.as_str() == "ENDSEC" {
                break;
            }
        }
        Ok(())
    }
}
