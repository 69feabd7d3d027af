//! DXF section writers
//!
//! [`SectionWriter`] walks the document and writes HEADER, CLASSES, TABLES,
//! BLOCKS, ENTITIES and OBJECTS. Entity, table and object encoders live in
//! sibling modules as further `impl` blocks of the same type.

use super::stream_writer::{DxfStreamWriter, DxfStreamWriterExt};
use super::structure::StructureState;
use super::text_encoder::TextEncoder;
use crate::classes::classes_in_use;
use crate::document::{CadDocument, HeaderValue};
use crate::entities::EntityType;
use crate::error::{DxfError, Result};
use crate::io::dxf::{encoding_from_code_page, Section, TableKind};
use crate::objects::ObjectType;
use crate::tables::{BlockRecord, MODEL_SPACE, PAPER_SPACE};
use crate::types::{DrawingUnits, DxfVersion, Handle};
use crate::xdata::{ExtendedData, ExtendedDataRecord, XDataValue};
use ahash::AHashMap;
use tracing::{debug, trace};

/// Writes all DXF sections of one document
pub struct SectionWriter<'a, W: DxfStreamWriter> {
    pub(super) writer: &'a mut W,
    pub(super) document: &'a CadDocument,
    pub(super) version: DxfVersion,
    pub(super) encoder: TextEncoder,
    pub(super) state: StructureState,
    /// Block records by handle, for owner lookups
    records: AHashMap<Handle, &'a BlockRecord>,
}

impl<'a, W: DxfStreamWriter> SectionWriter<'a, W> {
    pub fn new(writer: &'a mut W, document: &'a CadDocument, version: DxfVersion) -> Self {
        let records = document
            .block_records
            .iter()
            .map(|record| (record.handle, record))
            .collect();
        Self {
            writer,
            document,
            version,
            encoder: TextEncoder::new(version)
                .with_code_page(encoding_from_code_page(&document.header.code_page)),
            state: StructureState::new(),
            records,
        }
    }

    /// Write a string value through the `\U+XXXX` escaping layer
    pub fn write_str(&mut self, code: i32, value: &str) -> Result<()> {
        let encoded = self.encoder.encode(value);
        self.writer.write_string(code, &encoded)
    }

    pub fn write_comments(&mut self, comments: &[String]) -> Result<()> {
        for comment in comments {
            self.write_str(999, comment)?;
        }
        Ok(())
    }

    // ─── Structure ───

    pub fn begin_section(&mut self, section: Section) -> Result<()> {
        self.state.begin_section(section)?;
        debug!(section = %section, "writing section");
        self.writer.write_string(0, "SECTION")?;
        self.writer.write_string(2, section.name())
    }

    pub fn end_section(&mut self) -> Result<()> {
        self.state.end_section()?;
        self.writer.write_string(0, "ENDSEC")
    }

    pub fn begin_table(&mut self, kind: TableKind, handle: Handle, count: usize) -> Result<()> {
        let count = i16::try_from(count).map_err(|_| {
            DxfError::structure(format!("{kind} table has {count} records, more than a 16-bit count holds"))
        })?;
        self.state.begin_table(kind)?;
        debug!(table = %kind, count, "writing table");
        self.writer.write_string(0, "TABLE")?;
        self.writer.write_string(2, kind.name())?;
        self.writer.write_handle(5, handle)?;
        self.writer.write_handle(330, Handle::NULL)?;
        self.writer.write_subclass("AcDbSymbolTable")?;
        self.writer.write_i16(70, count)?;
        if kind == TableKind::DimStyle {
            self.writer.write_subclass("AcDbDimStyleTable")?;
        }
        Ok(())
    }

    pub fn end_table(&mut self) -> Result<()> {
        self.state.end_table()?;
        self.writer.write_string(0, "ENDTAB")
    }

    /// Write the `BLOCK` record that opens a block definition
    pub fn begin_block(&mut self, record: &BlockRecord) -> Result<()> {
        self.state.begin_block()?;
        self.writer.write_string(0, "BLOCK")?;
        self.writer.write_handle(5, record.block_entity_handle)?;
        self.writer.write_handle(330, record.handle)?;
        self.writer.write_subclass("AcDbEntity")?;
        if record.is_paper_space() {
            self.writer.write_i16(67, 1)?;
        }
        self.write_str(8, &record.layer)?;
        self.writer.write_subclass("AcDbBlockBegin")?;
        self.write_str(2, &record.name)?;
        self.writer.write_i16(70, record.flags.to_bits())?;
        self.writer.write_point3d(10, record.base_point)?;
        self.write_str(3, &record.name)?;
        self.write_str(1, &record.xref_path)?;
        if !record.description.is_empty() {
            self.write_str(4, &record.description)?;
        }
        Ok(())
    }

    /// Write the `ENDBLK` record that closes a block definition
    pub fn end_block(&mut self, record: &BlockRecord) -> Result<()> {
        self.state.end_block()?;
        self.writer.write_string(0, "ENDBLK")?;
        self.writer.write_handle(5, record.block_end_handle)?;
        self.writer.write_handle(330, record.handle)?;
        self.writer.write_subclass("AcDbEntity")?;
        if record.is_paper_space() {
            self.writer.write_i16(67, 1)?;
        }
        self.write_str(8, &record.layer)?;
        self.writer.write_subclass("AcDbBlockEnd")
    }

    /// Close the file; every section must have been closed
    pub fn write_eof(&mut self) -> Result<()> {
        self.state.finish()?;
        self.writer.write_string(0, "EOF")
    }

    // ─── HEADER ───

    pub fn write_header(&mut self) -> Result<()> {
        self.begin_section(Section::Header)?;
        let header = &self.document.header;
        let version = self.version;

        self.write_header_variable("$ACADVER", |w| w.write_str(1, version.to_dxf_string()))?;
        self.write_header_variable("$ACADMAINTVER", |w| w.writer.write_i16(70, 0))?;
        self.write_header_variable("$DWGCODEPAGE", |w| w.write_str(3, &header.code_page))?;
        if version >= DxfVersion::AC1018 {
            self.write_header_variable("$LASTSAVEDBY", |w| w.write_str(1, &header.last_saved_by))?;
        }
        self.write_header_variable("$INSBASE", |w| {
            w.writer.write_point3d(10, header.insertion_base)
        })?;
        self.write_header_variable("$EXTMIN", |w| w.writer.write_point3d(10, header.ext_min))?;
        self.write_header_variable("$EXTMAX", |w| w.writer.write_point3d(10, header.ext_max))?;
        self.write_header_variable("$LIMMIN", |w| w.writer.write_point2d(10, header.lim_min))?;
        self.write_header_variable("$LIMMAX", |w| w.writer.write_point2d(10, header.lim_max))?;
        self.write_header_variable("$LTSCALE", |w| w.writer.write_double(40, header.linetype_scale))?;
        self.write_header_variable("$TEXTSIZE", |w| w.writer.write_double(40, header.text_size))?;
        self.write_header_variable("$TEXTSTYLE", |w| w.write_str(7, &header.text_style))?;
        self.write_header_variable("$CLAYER", |w| w.write_str(8, &header.current_layer))?;
        self.write_header_variable("$CELTYPE", |w| w.write_str(6, &header.current_line_type))?;
        self.write_header_variable("$CECOLOR", |w| {
            w.writer.write_color(62, header.current_color)?;
            if let Some(true_color) = header.current_color.true_color() {
                w.writer.write_i32(420, true_color)?;
            }
            Ok(())
        })?;
        self.write_header_variable("$DIMSTYLE", |w| w.write_str(2, &header.dim_style))?;
        self.write_header_variable("$LUNITS", |w| w.writer.write_i16(70, header.linear_unit_format))?;
        self.write_header_variable("$LUPREC", |w| {
            w.writer.write_i16(70, header.linear_unit_precision)
        })?;
        self.write_header_variable("$AUNITS", |w| {
            w.writer.write_i16(70, header.angular_unit_format)
        })?;
        self.write_header_variable("$AUPREC", |w| {
            w.writer.write_i16(70, header.angular_unit_precision)
        })?;
        self.write_header_variable("$PDMODE", |w| w.writer.write_i16(70, header.point_display_mode))?;
        self.write_header_variable("$PDSIZE", |w| {
            w.writer.write_double(40, header.point_display_size)
        })?;
        self.write_header_variable("$CMLSTYLE", |w| w.write_str(2, &header.mline_style))?;
        self.write_header_variable("$CMLJUST", |w| {
            w.writer.write_i16(70, header.mline_justification)
        })?;
        self.write_header_variable("$CMLSCALE", |w| w.writer.write_double(40, header.mline_scale))?;
        self.write_header_variable("$ANGBASE", |w| w.writer.write_double(50, header.angle_base))?;
        self.write_header_variable("$ANGDIR", |w| w.writer.write_i16(70, header.angle_direction))?;
        let seed = Handle::new(self.document.next_handle());
        self.write_header_variable("$HANDSEED", |w| w.writer.write_handle(5, seed))?;
        self.write_header_variable("$INSUNITS", |w| {
            w.writer.write_i16(70, header.insertion_units.as_i16())
        })?;
        self.write_header_variable("$CELWEIGHT", |w| {
            w.writer.write_i16(370, header.current_line_weight.value())
        })?;
        self.write_header_variable("$LWDISPLAY", |w| {
            w.writer.write_bool(290, header.lineweight_display)
        })?;
        self.write_header_variable("$EXTNAMES", |w| w.writer.write_bool(290, header.extended_names))?;
        self.write_header_variable("$MEASUREMENT", |w| w.writer.write_i16(70, header.measurement))?;

        for (name, value) in &header.custom_variables {
            self.write_header_variable(name, |w| w.write_header_value(value))?;
        }

        self.end_section()
    }

    fn write_header_variable<F>(&mut self, name: &str, write_value: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.writer.write_string(9, name)?;
        write_value(self)
    }

    fn write_header_value(&mut self, value: &HeaderValue) -> Result<()> {
        match value {
            HeaderValue::String(s) => self.write_str(1, s),
            HeaderValue::Int16(v) => self.writer.write_i16(70, *v),
            HeaderValue::Int32(v) => self.writer.write_i32(90, *v),
            HeaderValue::Double(v) => self.writer.write_double(40, *v),
            HeaderValue::Point2(p) => self.writer.write_point2d(10, *p),
            HeaderValue::Point3(p) => self.writer.write_point3d(10, *p),
            HeaderValue::Handle(h) => self.writer.write_handle(5, *h),
            HeaderValue::Bool(b) => self.writer.write_bool(290, *b),
        }
    }

    // ─── CLASSES ───

    pub fn write_classes(&mut self) -> Result<()> {
        self.begin_section(Section::Classes)?;
        for class in classes_in_use(self.document) {
            self.writer.write_string(0, "CLASS")?;
            self.write_str(1, &class.dxf_name)?;
            self.write_str(2, &class.cpp_name)?;
            self.write_str(3, &class.app_name)?;
            self.writer.write_i32(90, class.proxy_flags)?;
            if self.version > DxfVersion::AC1015 {
                self.writer.write_i32(91, class.instance_count)?;
            }
            self.writer.write_byte(280, class.was_a_proxy as u8)?;
            self.writer.write_byte(281, class.is_entity as u8)?;
        }
        self.end_section()
    }

    // ─── BLOCKS / ENTITIES ───

    pub fn write_blocks(&mut self) -> Result<()> {
        self.begin_section(Section::Blocks)?;
        let document = self.document;
        for record in document.block_records.iter() {
            self.begin_block(record)?;
            if !writes_in_entities(record) {
                for entity in self.block_entities(record) {
                    self.write_entity(entity)?;
                }
            }
            self.end_block(record)?;
        }
        self.end_section()
    }

    pub fn write_entities(&mut self) -> Result<()> {
        self.begin_section(Section::Entities)?;
        let document = self.document;
        for name in [MODEL_SPACE, PAPER_SPACE] {
            if let Some(record) = document.block_records.get(name) {
                for entity in self.block_entities(record) {
                    self.write_entity(entity)?;
                }
            }
        }
        self.end_section()
    }

    /// Entities of a block in write order; a layout's own viewport comes first
    fn block_entities(&self, record: &'a BlockRecord) -> Vec<&'a EntityType> {
        let document = self.document;
        let layout_viewport = match document.object(record.layout) {
            Some(ObjectType::Layout(layout)) if record.is_paper_space() => layout.viewport,
            _ => Handle::NULL,
        };
        let mut entities = Vec::with_capacity(record.entities.len());
        if let Some(viewport) = document.entity(layout_viewport) {
            entities.push(viewport);
        }
        entities.extend(
            record
                .entities
                .iter()
                .filter(|h| layout_viewport.is_null() || **h != layout_viewport)
                .filter_map(|h| document.entity(*h)),
        );
        entities
    }

    // ─── Shared helpers ───

    pub(super) fn owner_record(&self, owner: Handle) -> Option<&'a BlockRecord> {
        self.records.get(&owner).copied()
    }

    /// Whether an owner handle is a paper space block record
    pub(super) fn is_paper_space(&self, owner: Handle) -> bool {
        self.owner_record(owner)
            .is_some_and(|record| record.is_paper_space())
    }

    /// Units that entities owned by `owner` are drawn in
    pub(super) fn owner_units(&self, owner: Handle) -> DrawingUnits {
        match self.owner_record(owner) {
            Some(record) if !record.is_layout_block() => record.units,
            _ => self.document.header.insertion_units,
        }
    }

    pub(super) fn write_reactors(&mut self, reactors: &[Handle]) -> Result<()> {
        if reactors.is_empty() {
            return Ok(());
        }
        self.writer.write_string(102, "{ACAD_REACTORS")?;
        for reactor in reactors {
            self.writer.write_handle(330, *reactor)?;
        }
        self.writer.write_string(102, "}")
    }

    /// Write extended data records
    pub(super) fn write_xdata(&mut self, xdata: &ExtendedData) -> Result<()> {
        for record in xdata.records() {
            self.write_xdata_record(record)?;
        }
        Ok(())
    }

    pub(super) fn write_xdata_record(&mut self, record: &ExtendedDataRecord) -> Result<()> {
        self.write_str(1001, &record.application_name)?;
        for value in &record.values {
            match value {
                XDataValue::String(s) => self.write_str(1000, s)?,
                XDataValue::ControlString(s) => self.writer.write_string(1002, s)?,
                XDataValue::LayerName(s) => self.write_str(1003, s)?,
                XDataValue::BinaryData(data) => self.writer.write_binary(1004, data)?,
                XDataValue::Handle(h) => self.writer.write_handle(1005, *h)?,
                XDataValue::Point3D(p) => self.writer.write_point3d(1010, *p)?,
                XDataValue::Position3D(p) => self.writer.write_point3d(1011, *p)?,
                XDataValue::Displacement3D(p) => self.writer.write_point3d(1012, *p)?,
                XDataValue::Direction3D(p) => self.writer.write_point3d(1013, *p)?,
                XDataValue::Real(r) => self.writer.write_double(1040, *r)?,
                XDataValue::Distance(d) => self.writer.write_double(1041, *d)?,
                XDataValue::ScaleFactor(s) => self.writer.write_double(1042, *s)?,
                XDataValue::Integer16(i) => self.writer.write_i16(1070, *i)?,
                XDataValue::Integer32(i) => self.writer.write_i32(1071, *i)?,
            }
        }
        Ok(())
    }

    pub(super) fn trace_entity(&self, entity: &EntityType) {
        trace!(handle = %entity.handle(), kind = entity.dxf_name(), "writing entity");
    }
}

/// `*Model_Space` and the active `*Paper_Space` keep their entities in the
/// ENTITIES section
fn writes_in_entities(record: &BlockRecord) -> bool {
    record.name.eq_ignore_ascii_case(MODEL_SPACE) || record.name.eq_ignore_ascii_case(PAPER_SPACE)
}

/// Render through a text stream into a string
#[cfg(test)]
pub(super) fn render<T>(
    document: &CadDocument,
    version: DxfVersion,
    f: impl FnOnce(&mut SectionWriter<'_, super::DxfTextWriter<&mut Vec<u8>>>) -> T,
) -> (T, String) {
    let mut buf = Vec::new();
    let result = {
        let mut stream =
            super::DxfTextWriter::new(&mut buf, super::NumberFormat::INVARIANT);
        let mut sections = SectionWriter::new(&mut stream, document, version);
        f(&mut sections)
    };
    (result, String::from_utf8(buf).expect("text output is UTF-8"))
}

/// Render one entity inside an ENTITIES section and return its code pairs
#[cfg(test)]
pub(super) fn render_entity(
    document: &CadDocument,
    version: DxfVersion,
    entity: &EntityType,
) -> Result<Vec<(i32, String)>> {
    let (result, text) = render(document, version, |w| {
        w.begin_section(Section::Entities)?;
        w.write_entity(entity)?;
        w.end_section()
    });
    result?;
    let mut pairs = text_pairs(&text);
    // drop SECTION/ENTITIES and ENDSEC
    pairs.drain(..2);
    pairs.pop();
    Ok(pairs)
}

/// Split text DXF output into code/value pairs
#[cfg(test)]
pub(super) fn text_pairs(text: &str) -> Vec<(i32, String)> {
    let lines: Vec<&str> = text.split("\r\n").collect();
    lines
        .chunks(2)
        .filter(|chunk| chunk.len() == 2)
        .map(|chunk| (chunk[0].trim().parse().expect("numeric code"), chunk[1].to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_header() {
        let doc = CadDocument::new();
        let (result, text) = render(&doc, DxfVersion::AC1032, |w| {
            w.begin_section(Section::Tables)?;
            w.begin_table(TableKind::DimStyle, Handle::new(0xA), 1)?;
            w.end_table()?;
            w.end_section()
        });
        result.unwrap();
        assert_eq!(
            text,
            "  0\r\nSECTION\r\n  2\r\nTABLES\r\n\
             \x20 0\r\nTABLE\r\n  2\r\nDIMSTYLE\r\n  5\r\nA\r\n330\r\n0\r\n\
             100\r\nAcDbSymbolTable\r\n 70\r\n1\r\n100\r\nAcDbDimStyleTable\r\n\
             \x20 0\r\nENDTAB\r\n  0\r\nENDSEC\r\n"
        );
    }

    #[test]
    fn test_table_count_must_fit_16_bits() {
        let doc = CadDocument::new();
        let (result, text) = render(&doc, DxfVersion::AC1032, |w| {
            w.begin_section(Section::Tables)?;
            w.begin_table(TableKind::AppId, Handle::new(0x9), 40_000)
        });
        assert!(matches!(result, Err(DxfError::Structure(message)) if message.contains("40000")));
        assert!(!text.contains("TABLE\r\n  2"));

        let (result, text) = render(&doc, DxfVersion::AC1032, |w| {
            w.begin_section(Section::Tables)?;
            w.begin_table(TableKind::AppId, Handle::new(0x9), i16::MAX as usize)
        });
        result.unwrap();
        assert!(text.ends_with(" 70\r\n32767\r\n"));
    }

    #[test]
    fn test_misuse_is_reported() {
        let doc = CadDocument::new();
        let (result, _) = render(&doc, DxfVersion::AC1032, |w| {
            w.begin_section(Section::Entities)?;
            w.begin_section(Section::Objects)
        });
        assert!(matches!(result, Err(DxfError::Structure(_))));

        let (result, _) = render(&doc, DxfVersion::AC1032, |w| {
            w.begin_section(Section::Header)?;
            w.write_eof()
        });
        assert!(matches!(result, Err(DxfError::Structure(_))));
    }

    #[test]
    fn test_entity_outside_entities_is_rejected() {
        let mut doc = CadDocument::new();
        let handle = doc.add_entity(crate::entities::Point::at(crate::types::Vector3::ZERO));
        let entity = doc.entity(handle).unwrap();
        let (result, text) = render(&doc, DxfVersion::AC1032, |w| {
            w.begin_section(Section::Objects)?;
            w.write_entity(entity)
        });
        assert!(matches!(result, Err(DxfError::Structure(_))));
        assert!(!text.contains("POINT"));
    }

    #[test]
    fn test_comments_are_escaped_for_old_versions() {
        let doc = CadDocument::new();
        let (result, text) = render(&doc, DxfVersion::AC1015, |w| {
            w.write_comments(&["Ω".to_string()])
        });
        result.unwrap();
        assert_eq!(text, "999\r\n\\U+03A9\r\n");
    }

    #[test]
    fn test_header_handle_seed_and_custom_variables() {
        let mut doc = CadDocument::new();
        doc.header
            .custom_variables
            .insert("$USERI1".to_string(), HeaderValue::Int16(7));
        let (result, text) = render(&doc, DxfVersion::AC1032, |w| w.write_header());
        result.unwrap();
        let pairs = text_pairs(&text);
        let seed = pairs
            .iter()
            .position(|p| p.1 == "$HANDSEED")
            .map(|i| pairs[i + 1].clone())
            .unwrap();
        assert_eq!(seed, (5, format!("{:X}", doc.next_handle())));
        let user = pairs.iter().position(|p| p.1 == "$USERI1").unwrap();
        assert_eq!(pairs[user + 1], (70, "7".to_string()));
        assert_eq!(pairs.last().unwrap(), &(0, "ENDSEC".to_string()));
    }

    #[test]
    fn test_last_saved_by_needs_2004() {
        let doc = CadDocument::new();
        let (_, text) = render(&doc, DxfVersion::AC1015, |w| w.write_header());
        assert!(!text.contains("$LASTSAVEDBY"));
        let (_, text) = render(&doc, DxfVersion::AC1018, |w| w.write_header());
        assert!(text.contains("$LASTSAVEDBY"));
    }
}
