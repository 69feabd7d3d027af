//! TABLES section decoders

use super::section_reader::SectionReader;
use super::stream_reader::DxfCodePair;
use crate::error::{DxfError, Result};
use crate::io::dxf::writer::{DESIGN_CENTER_DATA, TRANSPARENCY_APP};
use crate::io::dxf::TableKind;
use crate::notification::NotificationType;
use crate::tables::*;
use crate::types::{Color, DrawingUnits, Handle, LineWeight, Transparency, Vector2, Vector3};
use crate::xdata::XDataValue;
use tracing::debug;

impl<'a> SectionReader<'a> {
    pub fn read_tables(&mut self) -> Result<()> {
        loop {
            let pair = self.next_pair()?;
            match (pair.code, pair.as_str()) {
                (0, "ENDSEC") => return Ok(()),
                (0, "TABLE") => self.read_table()?,
                (0, other) => {
                    return Err(DxfError::structure(format!("unexpected {} in TABLES", other)))
                }
                _ => {}
            }
        }
    }

    fn read_table(&mut self) -> Result<()> {
        let name = self.next_pair()?;
        if name.code != 2 {
            return Err(DxfError::Parse(format!(
                "table name expected, found code {}",
                name.code
            )));
        }
        let Some(kind) = TableKind::from_name(name.as_str()) else {
            self.notify(
                NotificationType::NotSupported,
                format!("table {} skipped", name.as_str()),
            );
            return self.skip_table();
        };

        let handle = self.read_table_header()?;
        let count = match kind {
            TableKind::AppId => {
                let entries = self.read_records(kind, || AppId::new(""), |_, app, pair| {
                    if pair.code == 70 {
                        app.flags = pair.as_i16();
                    }
                    Ok(())
                })?;
                store(&mut self.document.app_ids, handle, entries)
            }
            TableKind::VPort => {
                let entries = self.read_records(kind, || VPort::new(""), Self::read_vport)?;
                store(&mut self.document.vports, handle, entries)
            }
            TableKind::LineType => {
                let entries =
                    self.read_records(kind, || LineType::new(""), Self::read_line_type)?;
                store(&mut self.document.line_types, handle, entries)
            }
            TableKind::Layer => {
                let mut entries = self.read_records(kind, || Layer::new(""), Self::read_layer)?;
                entries.iter_mut().for_each(normalize_layer);
                store(&mut self.document.layers, handle, entries)
            }
            TableKind::Style => {
                let mut entries =
                    self.read_records(kind, || TextStyle::new(""), Self::read_text_style)?;
                entries.iter_mut().for_each(normalize_text_style);
                store(&mut self.document.text_styles, handle, entries)
            }
            TableKind::DimStyle => {
                let entries =
                    self.read_records(kind, || DimStyle::new(""), Self::read_dim_style)?;
                store(&mut self.document.dim_styles, handle, entries)
            }
            TableKind::View => {
                let entries = self.read_records(kind, || View::new(""), Self::read_view)?;
                store(&mut self.document.views, handle, entries)
            }
            TableKind::Ucs => {
                let entries = self.read_records(kind, || Ucs::new(""), Self::read_ucs)?;
                store(&mut self.document.ucss, handle, entries)
            }
            TableKind::BlockRecord => {
                let mut entries =
                    self.read_records(kind, || BlockRecord::new(""), Self::read_block_record)?;
                entries.iter_mut().for_each(normalize_block_record);
                store(&mut self.document.block_records, handle, entries)
            }
        };
        debug!(table = %kind, count, "read table");
        Ok(())
    }

    /// Table handle from the pairs between the name and the first record
    fn read_table_header(&mut self) -> Result<Handle> {
        let mut handle = Handle::NULL;
        loop {
            let pair = self.next_pair()?;
            match pair.code {
                0 => {
                    self.reader.push_back(pair);
                    return Ok(handle);
                }
                5 => handle = pair.as_handle(),
                102 => self.read_application_group(&pair, &mut Vec::new())?,
                _ => {}
            }
        }
    }

    fn skip_table(&mut self) -> Result<()> {
        loop {
            let pair = self.next_pair()?;
            if pair.code == 0 && pair.as_str() == "ENDTAB" {
                return Ok(());
            }
        }
    }

    /// Read the records of one table up to `ENDTAB`
    ///
    /// Handle, name and extended data are stored on the entry; every other
    /// pair goes to `read_field`.
    fn read_records<T, N, F>(&mut self, kind: TableKind, new_entry: N, mut read_field: F) -> Result<Vec<T>>
    where
        T: TableEntry,
        N: Fn() -> T,
        F: FnMut(&mut Self, &mut T, &DxfCodePair) -> Result<()>,
    {
        let mut entries = Vec::new();
        loop {
            let pair = self.next_pair()?;
            match (pair.code, pair.as_str()) {
                (0, "ENDTAB") => return Ok(entries),
                (0, record) if record == kind.name() => {}
                (0, other) => {
                    return Err(DxfError::structure(format!(
                        "unexpected {} in table {}",
                        other, kind
                    )))
                }
                _ => continue,
            }

            let mut entry = new_entry();
            loop {
                let pair = self.next_pair()?;
                match pair.code {
                    0 => {
                        self.reader.push_back(pair);
                        break;
                    }
                    5 | 105 => entry.set_handle(pair.as_handle()),
                    2 => entry.set_name(self.string(&pair)),
                    100 | 330 => {}
                    102 => self.read_application_group(&pair, &mut Vec::new())?,
                    1001 => {
                        self.reader.push_back(pair);
                        *entry.extended_data_mut() = self.read_extended_data()?;
                    }
                    _ => read_field(self, &mut entry, &pair)?,
                }
            }
            entries.push(entry);
        }
    }

    fn read_vport(&mut self, vport: &mut VPort, pair: &DxfCodePair) -> Result<()> {
        match pair.code {
            70 => vport.flags = pair.as_i16(),
            10 | 20 => set_axis_2d(&mut vport.lower_left, pair),
            11 | 21 => set_axis_2d(&mut vport.upper_right, pair),
            12 | 22 => set_axis_2d(&mut vport.view_center, pair),
            13 | 23 => set_axis_2d(&mut vport.snap_base, pair),
            14 | 24 => set_axis_2d(&mut vport.snap_spacing, pair),
            15 | 25 => set_axis_2d(&mut vport.grid_spacing, pair),
            16 | 26 | 36 => set_axis(&mut vport.view_direction, pair),
            17 | 27 | 37 => set_axis(&mut vport.view_target, pair),
            40 => vport.view_height = pair.as_double(),
            41 => vport.aspect_ratio = pair.as_double(),
            42 => vport.lens_length = pair.as_double(),
            43 => vport.front_clip = pair.as_double(),
            44 => vport.back_clip = pair.as_double(),
            50 => vport.snap_rotation = pair.as_angle(),
            51 => vport.twist_angle = pair.as_angle(),
            71 => vport.view_mode = pair.as_i16(),
            72 => vport.circle_zoom_percent = pair.as_i16(),
            73 => vport.fast_zoom = pair.as_bool(),
            74 => vport.ucs_icon = pair.as_i16(),
            75 => vport.snap_on = pair.as_bool(),
            76 => vport.grid_on = pair.as_bool(),
            77 => vport.snap_style = pair.as_i16(),
            78 => vport.snap_isopair = pair.as_i16(),
            _ => {}
        }
        Ok(())
    }

    /// Pattern elements start at each `49`; the `74` flags decide whether
    /// the element carries text or a shape
    fn read_line_type(&mut self, line_type: &mut LineType, pair: &DxfCodePair) -> Result<()> {
        if pair.code == 49 {
            line_type.elements.push(LineTypeElement::new(pair.as_double()));
            return Ok(());
        }
        let text = self.string(pair);
        let Some(element) = line_type.elements.last_mut() else {
            match pair.code {
                70 => line_type.flags = pair.as_i16(),
                3 => line_type.description = text,
                _ => {}
            }
            return Ok(());
        };
        match pair.code {
            74 => {
                let flags = pair.as_i16();
                element.absolute_rotation = flags & 1 != 0;
                element.shape = if flags & 2 != 0 {
                    Some(LineTypeShape::Text {
                        text: String::new(),
                        style: Handle::NULL,
                    })
                } else if flags & 4 != 0 {
                    Some(LineTypeShape::Shape {
                        number: 0,
                        style: Handle::NULL,
                    })
                } else {
                    None
                };
            }
            75 => {
                if let Some(LineTypeShape::Shape { number, .. }) = &mut element.shape {
                    *number = pair.as_i16();
                }
            }
            340 => match &mut element.shape {
                Some(LineTypeShape::Text { style, .. } | LineTypeShape::Shape { style, .. }) => {
                    *style = pair.as_handle()
                }
                None => {}
            },
            9 => {
                if let Some(LineTypeShape::Text { text: value, .. }) = &mut element.shape {
                    *value = text;
                }
            }
            46 => element.scale = pair.as_double(),
            50 => element.rotation = pair.as_angle(),
            44 => element.offset.x = pair.as_double(),
            45 => element.offset.y = pair.as_double(),
            _ => {}
        }
        Ok(())
    }

    fn read_layer(&mut self, layer: &mut Layer, pair: &DxfCodePair) -> Result<()> {
        match pair.code {
            70 => layer.flags = LayerFlags::from_bits(pair.as_i16()),
            62 => {
                let index = pair.as_i16();
                layer.hidden = index < 0;
                if !layer.color.is_true_color() {
                    layer.color = Color::from_index(index);
                }
            }
            420 => layer.color = Color::from_true_color(pair.as_i32()),
            6 => layer.line_type = self.string(pair),
            290 => layer.is_plottable = pair.as_bool(),
            370 => layer.line_weight = LineWeight::from_value(pair.as_i16()),
            390 => layer.plot_style_handle = pair.as_handle(),
            _ => {}
        }
        Ok(())
    }

    fn read_text_style(&mut self, style: &mut TextStyle, pair: &DxfCodePair) -> Result<()> {
        match pair.code {
            70 => {
                let flags = pair.as_i16();
                style.is_shape_file = flags & 1 != 0;
                style.is_vertical = flags & 4 != 0;
            }
            40 => style.height = pair.as_double(),
            41 => style.width_factor = pair.as_double(),
            50 => style.oblique_angle = pair.as_angle(),
            71 => style.generation = TextGenerationFlags::from_bits(pair.as_i16()),
            42 => style.last_height = pair.as_double(),
            3 => style.font_file = self.string(pair),
            4 => style.big_font_file = self.string(pair),
            _ => {}
        }
        Ok(())
    }

    fn read_dim_style(&mut self, style: &mut DimStyle, pair: &DxfCodePair) -> Result<()> {
        match pair.code {
            70 => style.flags = pair.as_i16(),
            3 => style.dimpost = self.string(pair),
            4 => style.dimapost = self.string(pair),
            40 => style.dimscale = pair.as_double(),
            41 => style.dimasz = pair.as_double(),
            42 => style.dimexo = pair.as_double(),
            43 => style.dimdli = pair.as_double(),
            44 => style.dimexe = pair.as_double(),
            45 => style.dimrnd = pair.as_double(),
            46 => style.dimdle = pair.as_double(),
            47 => style.dimtp = pair.as_double(),
            48 => style.dimtm = pair.as_double(),
            49 => style.dimfxl = pair.as_double(),
            50 => style.dimjogang = pair.as_angle(),
            69 => style.dimtfill = pair.as_i16(),
            140 => style.dimtxt = pair.as_double(),
            141 => style.dimcen = pair.as_double(),
            142 => style.dimtsz = pair.as_double(),
            143 => style.dimaltf = pair.as_double(),
            144 => style.dimlfac = pair.as_double(),
            145 => style.dimtvp = pair.as_double(),
            146 => style.dimtfac = pair.as_double(),
            147 => style.dimgap = pair.as_double(),
            148 => style.dimaltrnd = pair.as_double(),
            71 => style.dimtol = pair.as_bool(),
            72 => style.dimlim = pair.as_bool(),
            73 => style.dimtih = pair.as_bool(),
            74 => style.dimtoh = pair.as_bool(),
            75 => style.dimse1 = pair.as_bool(),
            76 => style.dimse2 = pair.as_bool(),
            77 => style.dimtad = pair.as_i16(),
            78 => style.dimzin = pair.as_i16(),
            79 => style.dimazin = pair.as_i16(),
            90 => style.dimarcsym = pair.as_i16(),
            170 => style.dimalt = pair.as_bool(),
            171 => style.dimaltd = pair.as_i16(),
            172 => style.dimtofl = pair.as_bool(),
            173 => style.dimsah = pair.as_bool(),
            174 => style.dimtix = pair.as_bool(),
            175 => style.dimsoxd = pair.as_bool(),
            176 => style.dimclrd = pair.as_i16(),
            177 => style.dimclre = pair.as_i16(),
            178 => style.dimclrt = pair.as_i16(),
            179 => style.dimadec = pair.as_i16(),
            271 => style.dimdec = pair.as_i16(),
            272 => style.dimtdec = pair.as_i16(),
            273 => style.dimaltu = pair.as_i16(),
            274 => style.dimalttd = pair.as_i16(),
            275 => style.dimaunit = pair.as_i16(),
            276 => style.dimfrac = pair.as_i16(),
            277 => style.dimlunit = pair.as_i16(),
            278 => style.dimdsep = pair.as_i16(),
            279 => style.dimtmove = pair.as_i16(),
            280 => style.dimjust = pair.as_i16(),
            281 => style.dimsd1 = pair.as_bool(),
            282 => style.dimsd2 = pair.as_bool(),
            283 => style.dimtolj = pair.as_i16(),
            284 => style.dimtzin = pair.as_i16(),
            285 => style.dimaltz = pair.as_i16(),
            286 => style.dimalttz = pair.as_i16(),
            288 => style.dimupt = pair.as_bool(),
            289 => style.dimatfit = pair.as_i16(),
            290 => style.dimfxlon = pair.as_bool(),
            340 => {
                let handle = pair.as_handle();
                match self.document.text_styles.get_by_handle(handle) {
                    Some(text_style) => style.dimtxsty = text_style.name.clone(),
                    None => self.notify(
                        NotificationType::Warning,
                        format!(
                            "dimension style {} refers to unknown text style {}",
                            style.name,
                            handle.to_hex()
                        ),
                    ),
                }
            }
            341 => style.dimldrblk = pair.as_handle(),
            342 => style.dimblk = pair.as_handle(),
            343 => style.dimblk1 = pair.as_handle(),
            344 => style.dimblk2 = pair.as_handle(),
            371 => style.dimlwd = pair.as_i16(),
            372 => style.dimlwe = pair.as_i16(),
            _ => {}
        }
        Ok(())
    }

    fn read_view(&mut self, view: &mut View, pair: &DxfCodePair) -> Result<()> {
        match pair.code {
            70 => view.flags = pair.as_i16(),
            40 => view.height = pair.as_double(),
            41 => view.width = pair.as_double(),
            10 | 20 => set_axis_2d(&mut view.center, pair),
            11 | 21 | 31 => set_axis(&mut view.direction, pair),
            12 | 22 | 32 => set_axis(&mut view.target, pair),
            42 => view.lens_length = pair.as_double(),
            43 => view.front_clip = pair.as_double(),
            44 => view.back_clip = pair.as_double(),
            50 => view.twist_angle = pair.as_angle(),
            71 => view.view_mode = pair.as_i16(),
            _ => {}
        }
        Ok(())
    }

    fn read_ucs(&mut self, ucs: &mut Ucs, pair: &DxfCodePair) -> Result<()> {
        match pair.code {
            70 => ucs.flags = pair.as_i16(),
            10 | 20 | 30 => set_axis(&mut ucs.origin, pair),
            11 | 21 | 31 => set_axis(&mut ucs.x_axis, pair),
            12 | 22 | 32 => set_axis(&mut ucs.y_axis, pair),
            146 => ucs.elevation = pair.as_double(),
            _ => {}
        }
        Ok(())
    }

    fn read_block_record(&mut self, record: &mut BlockRecord, pair: &DxfCodePair) -> Result<()> {
        match pair.code {
            340 => record.layout = pair.as_handle(),
            70 => record.units = DrawingUnits::from_i16(pair.as_i16()),
            280 => record.explodable = pair.as_bool(),
            281 => record.scale_uniformly = pair.as_bool(),
            _ => {}
        }
        Ok(())
    }
}

fn set_axis(point: &mut Vector3, pair: &DxfCodePair) {
    pair.apply_to(point);
}

fn set_axis_2d(point: &mut Vector2, pair: &DxfCodePair) {
    pair.apply_to_2d(point);
}

/// Store read entries; a record read twice keeps the last copy
fn store<T: TableEntry>(table: &mut Table<T>, handle: Handle, entries: Vec<T>) -> usize {
    if !handle.is_null() {
        table.set_handle(handle);
    }
    let count = entries.len();
    for entry in entries {
        table.insert(entry);
    }
    count
}

/// Move the `AcCmTransparency` record back into the layer transparency
fn normalize_layer(layer: &mut Layer) {
    let Some(record) = layer.extended_data.take_record(TRANSPARENCY_APP) else {
        return;
    };
    if let Some(XDataValue::Integer32(alpha)) = record.values.first() {
        layer.transparency = Transparency::from_alpha_value(*alpha);
    }
}

/// Move the `ACAD` family record back into the font fields
fn normalize_text_style(style: &mut TextStyle) {
    let is_family = matches!(
        style.extended_data.get_record("ACAD").map(|r| r.values.as_slice()),
        Some([XDataValue::String(_), XDataValue::Integer32(_), ..])
    );
    if !is_family {
        return;
    }
    if let Some(record) = style.extended_data.take_record("ACAD") {
        if let [XDataValue::String(family), XDataValue::Integer32(flags), ..] = record.values.as_slice() {
            style.font_family = Some(family.clone());
            style.font_flags = *flags;
        }
    }
}

/// Take the block units from the `DesignCenter Data` record
fn normalize_block_record(record: &mut BlockRecord) {
    let units = match record.extended_data.get_record("ACAD").map(|r| r.values.as_slice()) {
        Some([XDataValue::String(marker), .., XDataValue::Integer16(units), XDataValue::ControlString(_)])
            if marker == DESIGN_CENTER_DATA =>
        {
            *units
        }
        _ => return,
    };
    record.extended_data.take_record("ACAD");
    record.units = DrawingUnits::from_i16(units);
}

#[cfg(test)]
mod tests {
    use super::super::DxfReader;
    use crate::document::CadDocument;
    use crate::io::dxf::{DxfWriter, DxfWriterConfiguration};
    use crate::tables::*;
    use crate::types::{Color, DrawingUnits, DxfVersion, Transparency};
    use std::io::Cursor;

    fn round_trip(doc: &CadDocument, version: DxfVersion) -> CadDocument {
        let config = DxfWriterConfiguration {
            version: Some(version),
            ..Default::default()
        };
        let buf = DxfWriter::new(doc)
            .with_configuration(config)
            .write_to_vec()
            .unwrap();
        DxfReader::from_reader(Cursor::new(buf)).unwrap().read().unwrap()
    }

    #[test]
    fn test_layer_round_trip() {
        let mut doc = CadDocument::new();
        let mut layer = Layer::new("Walls").with_color(Color::RED).with_line_type("Continuous");
        layer.hidden = true;
        layer.transparency = Transparency::from_percent(50);
        layer.flags.locked = true;
        doc.add_layer(layer).unwrap();

        let read = round_trip(&doc, DxfVersion::AC1032);
        let walls = read.layers.get("Walls").unwrap();
        assert_eq!(walls, doc.layers.get("Walls").unwrap());
        assert!(walls.extended_data.is_empty());
    }

    #[test]
    fn test_text_style_and_dimstyle() {
        let mut doc = CadDocument::new();
        doc.add_text_style(TextStyle::new("Arial").with_true_type("arial.ttf", "Arial"))
            .unwrap();
        doc.add_dim_style(DimStyle::new("Metric").with_text_style("Arial"))
            .unwrap();

        let read = round_trip(&doc, DxfVersion::AC1032);
        let arial = read.text_styles.get("Arial").unwrap();
        assert_eq!(arial.font_family.as_deref(), Some("Arial"));
        assert_eq!(arial, doc.text_styles.get("Arial").unwrap());
        assert_eq!(read.dim_styles.get("Metric").unwrap().dimtxsty, "Arial");
    }

    #[test]
    fn test_block_units_from_design_center_data() {
        let mut doc = CadDocument::new();
        doc.add_block(BlockRecord::new("Door").with_units(DrawingUnits::Inches))
            .unwrap();

        for version in [DxfVersion::AC1018, DxfVersion::AC1032] {
            let read = round_trip(&doc, version);
            let door = read.block_records.get("Door").unwrap();
            assert_eq!(door.units, DrawingUnits::Inches);
            assert!(door.extended_data.is_empty());
        }
    }

    #[test]
    fn test_line_type_elements() {
        let mut doc = CadDocument::new();
        let style = doc.text_styles.get("Standard").unwrap().handle;
        let mut line_type = LineType::new("Gas");
        line_type.description = "Gas line ---- GAS ----".to_string();
        line_type.add_element(LineTypeElement::dash(0.5));
        line_type.add_element(LineTypeElement::with_text(-0.2, "GAS", style));
        doc.add_line_type(line_type).unwrap();

        let read = round_trip(&doc, DxfVersion::AC1032);
        assert_eq!(read.line_types.get("Gas"), doc.line_types.get("Gas"));
    }

    #[test]
    fn test_table_handles_survive() {
        let doc = CadDocument::new();
        let read = round_trip(&doc, DxfVersion::AC1032);
        assert_eq!(read.layers.handle(), doc.layers.handle());
        assert_eq!(
            read.vports.get("*Active").unwrap().handle,
            doc.vports.get("*Active").unwrap().handle
        );
        assert_eq!(read.app_ids.len(), doc.app_ids.len());
    }
}
