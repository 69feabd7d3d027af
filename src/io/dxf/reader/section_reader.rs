//! DXF section readers
//!
//! [`SectionReader`] rebuilds one section at a time into the document. Table,
//! entity and object decoders live in sibling modules as further `impl`
//! blocks of the same type.

use super::stream_reader::{DxfCodePair, DxfStreamReader};
use crate::document::{CadDocument, HeaderValue};
use crate::entities::{EntityCommon, EntityType};
use crate::error::{DxfError, Result};
use crate::io::dxf::writer::decode_non_ascii;
use crate::io::dxf::GroupCodeValueType;
use crate::notification::NotificationType;
use crate::tables::{BlockFlags, BlockRecord, MODEL_SPACE, PAPER_SPACE};
use crate::types::units::conversion_factor;
use crate::types::{
    Color, DrawingUnits, DxfVersion, Handle, LineWeight, Transparency, Vector3,
};
use crate::xdata::{ExtendedData, ExtendedDataRecord, XDataValue};
use indexmap::IndexMap;
use tracing::{debug, trace, warn};

/// Reads DXF sections into a document
pub struct SectionReader<'a> {
    pub(super) reader: &'a mut dyn DxfStreamReader,
    pub(super) document: &'a mut CadDocument,
    pub(super) version: DxfVersion,
    /// `67 1` seen on the entity record being read
    pub(super) paper_space: bool,
    /// Records of kinds that are not modelled, counted per kind
    unknown: IndexMap<String, usize>,
}

impl<'a> SectionReader<'a> {
    pub fn new(reader: &'a mut dyn DxfStreamReader, document: &'a mut CadDocument) -> Self {
        let version = document.header.version;
        // Handles allocated while reading must not collide with those in the file
        document.update_next_handle();
        Self {
            reader,
            document,
            version,
            paper_space: false,
            unknown: IndexMap::new(),
        }
    }

    /// Next pair; the end of the stream inside a section is an error
    pub(super) fn next_pair(&mut self) -> Result<DxfCodePair> {
        self.reader
            .read_pair()?
            .ok_or_else(|| DxfError::Parse("unexpected end of file inside a section".to_string()))
    }

    /// String value with `\U+XXXX` escapes resolved for code page versions
    pub(super) fn string(&self, pair: &DxfCodePair) -> String {
        self.decode_text(pair.as_str())
    }

    pub(super) fn decode_text(&self, text: &str) -> String {
        if self.version.uses_code_page() {
            decode_non_ascii(text).into_owned()
        } else {
            text.to_string()
        }
    }

    pub(super) fn notify(&mut self, kind: NotificationType, message: impl Into<String>) {
        let message = message.into();
        warn!(%kind, "{}", message);
        self.document.notifications.notify(kind, message);
    }

    pub(super) fn record_unknown(&mut self, kind: &str) {
        *self.unknown.entry(kind.to_string()).or_default() += 1;
    }

    /// One notification per unmodelled kind met in the section
    pub(super) fn flush_unknown(&mut self, section: &str) {
        let unknown = std::mem::take(&mut self.unknown);
        for (kind, count) in unknown {
            self.notify(
                NotificationType::NotImplemented,
                format!("{} {} record(s) in {} not interpreted", count, kind, section),
            );
        }
    }

    // ─── HEADER ───

    pub fn read_header(&mut self) -> Result<()> {
        let mut skipped = Vec::new();
        loop {
            let pair = self.next_pair()?;
            match pair.code {
                0 if pair.as_str() == "ENDSEC" => break,
                0 => {
                    return Err(DxfError::structure(format!(
                        "unexpected {} in HEADER",
                        pair.as_str()
                    )))
                }
                9 => {
                    let name = pair.value_string;
                    let values = self.read_header_values()?;
                    if !self.apply_header_variable(&name, &values) {
                        skipped.push(name);
                    }
                }
                _ => {}
            }
        }
        debug!(
            custom = self.document.header.custom_variables.len(),
            skipped = skipped.len(),
            "read header"
        );
        if !skipped.is_empty() {
            self.notify(
                NotificationType::NotSupported,
                format!("header variables not kept: {}", skipped.join(", ")),
            );
        }
        Ok(())
    }

    /// Value pairs of one header variable, up to the next `9` or `0`
    fn read_header_values(&mut self) -> Result<Vec<DxfCodePair>> {
        let mut values = Vec::new();
        loop {
            let pair = self.next_pair()?;
            if pair.code == 0 || pair.code == 9 {
                self.reader.push_back(pair);
                return Ok(values);
            }
            values.push(pair);
        }
    }

    /// Store one header variable; false when it cannot be represented
    fn apply_header_variable(&mut self, name: &str, values: &[DxfCodePair]) -> bool {
        let Some(first) = values.first() else {
            return false;
        };
        let text = self.string(first);
        let point3 = header_point(values);
        let header = &mut self.document.header;
        match name {
            "$ACADVER" => header.version = DxfVersion::from_version_string(first.as_str()),
            "$ACADMAINTVER" => {}
            "$DWGCODEPAGE" => header.code_page = text,
            "$LASTSAVEDBY" => header.last_saved_by = text,
            "$INSBASE" => header.insertion_base = point3,
            "$EXTMIN" => header.ext_min = point3,
            "$EXTMAX" => header.ext_max = point3,
            "$LIMMIN" => header.lim_min = point3.xy(),
            "$LIMMAX" => header.lim_max = point3.xy(),
            "$LTSCALE" => header.linetype_scale = first.as_double(),
            "$TEXTSIZE" => header.text_size = first.as_double(),
            "$TEXTSTYLE" => header.text_style = text,
            "$CLAYER" => header.current_layer = text,
            "$CELTYPE" => header.current_line_type = text,
            "$CECOLOR" => {
                header.current_color = Color::from_index(first.as_i16());
                if let Some(true_color) = values.iter().find(|v| v.code == 420) {
                    header.current_color = Color::from_true_color(true_color.as_i32());
                }
            }
            "$DIMSTYLE" => header.dim_style = text,
            "$LUNITS" => header.linear_unit_format = first.as_i16(),
            "$LUPREC" => header.linear_unit_precision = first.as_i16(),
            "$AUNITS" => header.angular_unit_format = first.as_i16(),
            "$AUPREC" => header.angular_unit_precision = first.as_i16(),
            "$PDMODE" => header.point_display_mode = first.as_i16(),
            "$PDSIZE" => header.point_display_size = first.as_double(),
            "$CMLSTYLE" => header.mline_style = text,
            "$CMLJUST" => header.mline_justification = first.as_i16(),
            "$CMLSCALE" => header.mline_scale = first.as_double(),
            "$ANGBASE" => header.angle_base = first.as_double(),
            "$ANGDIR" => header.angle_direction = first.as_i16(),
            "$HANDSEED" => header.handle_seed = first.as_handle(),
            "$INSUNITS" => header.insertion_units = DrawingUnits::from_i16(first.as_i16()),
            "$CELWEIGHT" => header.current_line_weight = LineWeight::from_value(first.as_i16()),
            "$LWDISPLAY" => header.lineweight_display = first.as_bool(),
            "$EXTNAMES" => header.extended_names = first.as_bool(),
            "$MEASUREMENT" => header.measurement = first.as_i16(),
            _ => {
                let value = match (first.code, first.value_type) {
                    (1, _) => HeaderValue::String(text),
                    (70, _) => HeaderValue::Int16(first.as_i16()),
                    (90, _) => HeaderValue::Int32(first.as_i32()),
                    (40, _) => HeaderValue::Double(first.as_double()),
                    (10, _) if values.iter().any(|v| v.code == 30) => HeaderValue::Point3(point3),
                    (10, _) => HeaderValue::Point2(point3.xy()),
                    (5, GroupCodeValueType::Handle) => HeaderValue::Handle(first.as_handle()),
                    (290, _) => HeaderValue::Bool(first.as_bool()),
                    _ => return false,
                };
                header.custom_variables.insert(name.to_string(), value);
            }
        }
        true
    }

    // ─── CLASSES ───

    /// Read the class list; classes are derived from the objects on write,
    /// so they are only logged
    pub fn read_classes(&mut self) -> Result<()> {
        let mut count = 0;
        loop {
            let pair = self.next_pair()?;
            match (pair.code, pair.as_str()) {
                (0, "ENDSEC") => break,
                (0, "CLASS") => count += 1,
                (1, name) => trace!(class = name, "read class"),
                _ => {}
            }
        }
        debug!(count, "read classes");
        Ok(())
    }

    // ─── BLOCKS ───

    pub fn read_blocks(&mut self) -> Result<()> {
        let mut count = 0;
        loop {
            let pair = self.next_pair()?;
            match (pair.code, pair.as_str()) {
                (0, "ENDSEC") => break,
                (0, "BLOCK") => {
                    self.read_block()?;
                    count += 1;
                }
                (0, other) => {
                    return Err(DxfError::structure(format!("unexpected {} in BLOCKS", other)))
                }
                _ => {}
            }
        }
        self.flush_unknown("BLOCKS");
        debug!(count, "read blocks");
        Ok(())
    }

    /// Read one BLOCK ... ENDBLK definition with its entities
    fn read_block(&mut self) -> Result<()> {
        let mut common = EntityCommon::new();
        let mut name = String::new();
        let mut flags = 0;
        let mut base_point = Vector3::ZERO;
        let mut xref_path = String::new();
        let mut description = String::new();
        self.read_entity_record(&mut common, |r, _, pair| {
            match pair.code {
                2 => name = r.string(pair),
                70 => flags = pair.as_i16(),
                10 | 20 | 30 => {
                    pair.apply_to(&mut base_point);
                }
                1 => xref_path = r.string(pair),
                4 => description = r.string(pair),
                _ => {}
            }
            Ok(())
        })?;

        let record_handle = self.block_record_for(&name, common.owner);
        if let Some(record) = self.document.block_records.get_by_handle_mut(record_handle) {
            if !common.handle.is_null() {
                record.block_entity_handle = common.handle;
            }
            record.flags = BlockFlags::from_bits(flags);
            record.base_point = base_point;
            record.xref_path = xref_path;
            record.description = description;
            record.layer = common.layer;
        }

        loop {
            let pair = self.next_pair()?;
            if pair.code != 0 {
                continue;
            }
            match pair.as_str() {
                "ENDBLK" => {
                    let mut end = EntityCommon::new();
                    self.read_entity_record(&mut end, |_, _, _| Ok(()))?;
                    if let Some(record) = self.document.block_records.get_by_handle_mut(record_handle) {
                        record.block_end_handle = end.handle;
                    }
                    return Ok(());
                }
                "ENDSEC" => {
                    return Err(DxfError::structure(format!("block {} has no ENDBLK", name)))
                }
                kind => {
                    let entity = self.read_entity(kind)?;
                    self.store_entity(entity, Some(record_handle));
                }
            }
        }
    }

    /// Handle of the record a BLOCK belongs to; created when the table lacks it
    fn block_record_for(&mut self, name: &str, owner: Handle) -> Handle {
        if let Some(record) = self.document.block_records.get_by_handle(owner) {
            return record.handle;
        }
        if let Some(record) = self.document.block_records.get(name) {
            return record.handle;
        }
        let mut record = BlockRecord::new(name);
        record.handle = if owner.is_null() {
            self.document.allocate_handle()
        } else {
            owner
        };
        let handle = record.handle;
        self.document.block_records.insert(record);
        handle
    }

    // ─── ENTITIES ───

    pub fn read_entities(&mut self) -> Result<()> {
        let mut count = 0;
        loop {
            let pair = self.next_pair()?;
            match (pair.code, pair.as_str()) {
                (0, "ENDSEC") => break,
                (0, kind) => {
                    let kind = kind.to_string();
                    let entity = self.read_entity(&kind)?;
                    self.store_entity(entity, None);
                    count += 1;
                }
                _ => {}
            }
        }
        self.flush_unknown("ENTITIES");
        debug!(count, "read entities");
        Ok(())
    }

    /// Give an entity its owner and handles, then add it to the document
    ///
    /// Inside a block the owner is that block's record. In the ENTITIES
    /// section it is the record named by `330`, or model or paper space by
    /// the `67` flag.
    fn store_entity(&mut self, mut entity: EntityType, block: Option<Handle>) {
        let owner = match block {
            Some(record) => record,
            None => {
                let named = entity.common().owner;
                if self.document.block_records.get_by_handle(named).is_some() {
                    named
                } else {
                    let space = if self.paper_space { PAPER_SPACE } else { MODEL_SPACE };
                    self.document
                        .block_records
                        .get(space)
                        .map(|r| r.handle)
                        .unwrap_or(Handle::NULL)
                }
            }
        };
        entity.common_mut().owner = owner;
        if entity.handle().is_null() {
            entity.common_mut().handle = self.document.allocate_handle();
        }
        let document = &mut *self.document;
        entity.assign_missing_sub_handles(|| document.allocate_handle());

        if let EntityType::Insert(insert) = &mut entity {
            let block_units = self
                .document
                .block_records
                .get(&insert.block_name)
                .map(|b| b.units)
                .unwrap_or_default();
            let factor = conversion_factor(block_units, self.owner_units(owner));
            if factor != 0.0 && factor != 1.0 {
                insert.x_scale /= factor;
                insert.y_scale /= factor;
                insert.z_scale /= factor;
            }
        }

        self.document.insert_entity(entity);
    }

    /// Units that entities owned by `owner` are drawn in
    fn owner_units(&self, owner: Handle) -> DrawingUnits {
        match self.document.block_records.get_by_handle(owner) {
            Some(record) if !record.is_layout_block() => record.units,
            _ => self.document.header.insertion_units,
        }
    }

    // ─── Shared record helpers ───

    /// Read the pairs of one entity record up to the next `0` pair
    ///
    /// Common entity data, reactors and extended data are stored in
    /// `common`; every other pair goes to `read_field` together with the
    /// current subclass marker.
    pub(super) fn read_entity_record<F>(
        &mut self,
        common: &mut EntityCommon,
        mut read_field: F,
    ) -> Result<()>
    where
        F: FnMut(&mut Self, &str, &DxfCodePair) -> Result<()>,
    {
        let mut subclass = String::new();
        while let Some(pair) = self.reader.read_pair()? {
            match pair.code {
                0 => {
                    self.reader.push_back(pair);
                    break;
                }
                100 => subclass = pair.value_string,
                102 => self.read_application_group(&pair, &mut common.reactors)?,
                1001 => {
                    self.reader.push_back(pair);
                    common.extended_data = self.read_extended_data()?;
                }
                5 if subclass.is_empty() => common.handle = pair.as_handle(),
                330 if subclass.is_empty() => common.owner = pair.as_handle(),
                _ if subclass.is_empty() || subclass == "AcDbEntity" => {
                    if !self.read_common_field(common, &pair) {
                        read_field(self, &subclass, &pair)?;
                    }
                }
                _ => read_field(self, &subclass, &pair)?,
            }
        }
        Ok(())
    }

    fn read_common_field(&mut self, common: &mut EntityCommon, pair: &DxfCodePair) -> bool {
        match pair.code {
            8 => common.layer = self.string(pair),
            6 => common.line_type = self.string(pair),
            62 => common.color = Color::from_index(pair.as_i16()),
            420 => common.color = Color::from_true_color(pair.as_i32()),
            440 => common.transparency = Transparency::from_alpha_value(pair.as_i32()),
            370 => common.line_weight = LineWeight::from_value(pair.as_i16()),
            48 => common.line_type_scale = pair.as_double(),
            60 => common.invisible = pair.as_i16() != 0,
            67 => self.paper_space = pair.as_i16() == 1,
            _ => return false,
        }
        true
    }

    /// Read a `102 {...` group; reactor handles are kept, other groups skipped
    pub(super) fn read_application_group(
        &mut self,
        start: &DxfCodePair,
        reactors: &mut Vec<Handle>,
    ) -> Result<()> {
        if start.as_str() == "}" {
            return Ok(());
        }
        let keep = start.as_str() == "{ACAD_REACTORS";
        loop {
            let pair = self.next_pair()?;
            match pair.code {
                102 => return Ok(()),
                0 => {
                    self.reader.push_back(pair);
                    return Ok(());
                }
                330 if keep => reactors.push(pair.as_handle()),
                _ => {}
            }
        }
    }

    /// Read extended data records; the next pair must be a `1001`
    pub(super) fn read_extended_data(&mut self) -> Result<ExtendedData> {
        let mut xdata = ExtendedData::new();
        let mut current: Option<ExtendedDataRecord> = None;
        while let Some(pair) = self.reader.read_pair()? {
            let value = match pair.code {
                1001 => {
                    if let Some(record) = current.take() {
                        xdata.add_record(record);
                    }
                    current = Some(ExtendedDataRecord::new(self.string(&pair)));
                    continue;
                }
                1000 => XDataValue::String(self.string(&pair)),
                1002 => XDataValue::ControlString(pair.value_string),
                1003 => XDataValue::LayerName(self.string(&pair)),
                1004 => XDataValue::BinaryData(pair.as_bytes()),
                1005 => XDataValue::Handle(pair.as_handle()),
                1010..=1013 => {
                    let point = self.read_xdata_point(&pair)?;
                    match pair.code {
                        1010 => XDataValue::Point3D(point),
                        1011 => XDataValue::Position3D(point),
                        1012 => XDataValue::Displacement3D(point),
                        _ => XDataValue::Direction3D(point),
                    }
                }
                1040 => XDataValue::Real(pair.as_double()),
                1041 => XDataValue::Distance(pair.as_double()),
                1042 => XDataValue::ScaleFactor(pair.as_double()),
                1070 => XDataValue::Integer16(pair.as_i16()),
                1071 => XDataValue::Integer32(pair.as_i32()),
                _ => {
                    self.reader.push_back(pair);
                    break;
                }
            };
            match current.as_mut() {
                Some(record) => record.add_value(value),
                None => {
                    return Err(DxfError::Parse(format!(
                        "extended data value {} before any application name",
                        value.code()
                    )))
                }
            }
        }
        if let Some(record) = current {
            xdata.add_record(record);
        }
        Ok(xdata)
    }

    /// Y and Z of an extended data point follow its X under code + 10 and + 20
    fn read_xdata_point(&mut self, x: &DxfCodePair) -> Result<Vector3> {
        let mut point = Vector3::new(x.as_double(), 0.0, 0.0);
        for offset in [10, 20] {
            if self.reader.peek_code()? != Some(x.code + offset) {
                break;
            }
            let pair = self.next_pair()?;
            pair.apply_to(&mut point);
        }
        Ok(point)
    }
}

/// Point value of a header variable (10/20/30)
fn header_point(values: &[DxfCodePair]) -> Vector3 {
    let mut point = Vector3::ZERO;
    for value in values.iter().filter(|v| matches!(v.code, 10 | 20 | 30)) {
        value.apply_to(&mut point);
    }
    point
}
