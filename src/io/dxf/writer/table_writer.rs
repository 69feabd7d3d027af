//! TABLES section encoders

use super::section_writer::SectionWriter;
use super::stream_writer::{DxfStreamWriter, DxfStreamWriterExt};
use crate::error::{DxfError, Result};
use crate::io::dxf::{Section, TableKind};
use crate::tables::*;
use crate::types::DxfVersion;
use crate::xdata::{ExtendedDataRecord, XDataValue};

/// Application name of the layer transparency record
pub(crate) const TRANSPARENCY_APP: &str = "AcCmTransparency";
/// Marker string of the block units record
pub(crate) const DESIGN_CENTER_DATA: &str = "DesignCenter Data";

impl<'a, W: DxfStreamWriter> SectionWriter<'a, W> {
    pub fn write_tables(&mut self) -> Result<()> {
        self.begin_section(Section::Tables)?;
        let document = self.document;
        for kind in TableKind::ALL {
            match kind {
                TableKind::AppId => self.write_table(kind, &document.app_ids, |w, app| {
                    w.writer.write_i16(70, app.flags)
                })?,
                TableKind::VPort => self.write_table(kind, &document.vports, Self::write_vport)?,
                TableKind::LineType => {
                    self.write_table(kind, &document.line_types, Self::write_line_type)?
                }
                TableKind::Layer => self.write_table(kind, &document.layers, Self::write_layer)?,
                TableKind::Style => {
                    self.write_table(kind, &document.text_styles, Self::write_text_style)?
                }
                TableKind::DimStyle => {
                    self.write_table(kind, &document.dim_styles, Self::write_dim_style)?
                }
                TableKind::View => self.write_table(kind, &document.views, Self::write_view)?,
                TableKind::Ucs => self.write_table(kind, &document.ucss, Self::write_ucs)?,
                TableKind::BlockRecord => {
                    self.write_table(kind, &document.block_records, Self::write_block_record)?
                }
            }
        }
        self.end_section()
    }

    fn write_table<T, F>(&mut self, kind: TableKind, table: &'a Table<T>, write_record: F) -> Result<()>
    where
        T: TableEntry,
        F: Fn(&mut Self, &'a T) -> Result<()>,
    {
        self.begin_table(kind, table.handle(), table.len())?;
        for entry in table.iter() {
            self.writer.write_string(0, kind.name())?;
            let handle_code = if kind == TableKind::DimStyle { 105 } else { 5 };
            self.writer.write_handle(handle_code, entry.handle())?;
            self.writer.write_handle(330, table.handle())?;
            self.writer.write_subclass("AcDbSymbolTableRecord")?;
            self.writer.write_subclass(kind.subclass())?;
            self.write_str(2, entry.name())?;
            write_record(self, entry)?;
            self.write_xdata(entry.extended_data())?;
        }
        self.end_table()
    }

    fn write_vport(&mut self, vport: &VPort) -> Result<()> {
        self.writer.write_i16(70, vport.flags)?;
        self.writer.write_point2d(10, vport.lower_left)?;
        self.writer.write_point2d(11, vport.upper_right)?;
        self.writer.write_point2d(12, vport.view_center)?;
        self.writer.write_point2d(13, vport.snap_base)?;
        self.writer.write_point2d(14, vport.snap_spacing)?;
        self.writer.write_point2d(15, vport.grid_spacing)?;
        self.writer.write_point3d(16, vport.view_direction)?;
        self.writer.write_point3d(17, vport.view_target)?;
        self.writer.write_double(40, vport.view_height)?;
        self.writer.write_double(41, vport.aspect_ratio)?;
        self.writer.write_double(42, vport.lens_length)?;
        self.writer.write_double(43, vport.front_clip)?;
        self.writer.write_double(44, vport.back_clip)?;
        self.writer.write_angle(50, vport.snap_rotation)?;
        self.writer.write_angle(51, vport.twist_angle)?;
        self.writer.write_i16(71, vport.view_mode)?;
        self.writer.write_i16(72, vport.circle_zoom_percent)?;
        self.writer.write_flag(73, vport.fast_zoom)?;
        self.writer.write_i16(74, vport.ucs_icon)?;
        self.writer.write_flag(75, vport.snap_on)?;
        self.writer.write_flag(76, vport.grid_on)?;
        self.writer.write_i16(77, vport.snap_style)?;
        self.writer.write_i16(78, vport.snap_isopair)
    }

    fn write_line_type(&mut self, line_type: &LineType) -> Result<()> {
        self.writer.write_i16(70, line_type.flags)?;
        self.write_str(3, &line_type.description)?;
        self.writer.write_i16(72, 65)?;
        self.writer.write_i16(73, line_type.elements.len() as i16)?;
        self.writer.write_double(40, line_type.pattern_length())?;
        for element in &line_type.elements {
            self.writer.write_double(49, element.length)?;
            self.writer.write_i16(74, element.complex_flags())?;
            let Some(shape) = &element.shape else {
                continue;
            };
            let (number, style) = match shape {
                LineTypeShape::Text { style, .. } => (0, *style),
                LineTypeShape::Shape { number, style } => (*number, *style),
            };
            self.writer.write_i16(75, number)?;
            self.writer.write_handle(340, style)?;
            self.writer.write_double(46, element.scale)?;
            self.writer.write_angle(50, element.rotation)?;
            self.writer.write_double(44, element.offset.x)?;
            self.writer.write_double(45, element.offset.y)?;
            if let LineTypeShape::Text { text, .. } = shape {
                self.write_str(9, text)?;
            }
        }
        Ok(())
    }

    fn write_layer(&mut self, layer: &Layer) -> Result<()> {
        self.writer.write_i16(70, layer.flags.to_bits())?;
        self.writer.write_i16(62, layer.signed_color_index())?;
        if let Some(true_color) = layer.color.true_color() {
            self.writer.write_i32(420, true_color)?;
        }
        self.write_str(6, &layer.line_type)?;
        self.writer.write_bool(290, layer.is_plottable)?;
        self.writer.write_i16(370, layer.line_weight.value())?;
        self.writer.write_handle(390, layer.plot_style_handle)?;
        if !layer.transparency.is_by_layer() {
            self.writer.write_string(1001, TRANSPARENCY_APP)?;
            self.writer
                .write_i32(1071, layer.transparency.to_alpha_value())?;
        }
        Ok(())
    }

    fn write_text_style(&mut self, style: &TextStyle) -> Result<()> {
        self.writer.write_i16(70, style.flags())?;
        self.writer.write_double(40, style.height)?;
        self.writer.write_double(41, style.width_factor)?;
        self.writer.write_angle(50, style.oblique_angle)?;
        self.writer.write_i16(71, style.generation.to_bits())?;
        self.writer.write_double(42, style.last_height)?;
        self.write_str(3, &style.font_file)?;
        self.write_str(4, &style.big_font_file)?;
        if let Some(family) = &style.font_family {
            self.writer.write_string(1001, "ACAD")?;
            self.write_str(1000, family)?;
            self.writer.write_i32(1071, style.font_flags)?;
        }
        Ok(())
    }

    fn write_dim_style(&mut self, style: &DimStyle) -> Result<()> {
        let document = self.document;
        let text_style = document
            .text_styles
            .get(&style.dimtxsty)
            .ok_or_else(|| DxfError::missing("text style", &style.dimtxsty))?;
        let extended = self.version >= DxfVersion::AC1021;

        self.writer.write_i16(70, style.flags)?;
        self.write_str(3, &style.dimpost)?;
        self.write_str(4, &style.dimapost)?;
        self.writer.write_double(40, style.dimscale)?;
        self.writer.write_double(41, style.dimasz)?;
        self.writer.write_double(42, style.dimexo)?;
        self.writer.write_double(43, style.dimdli)?;
        self.writer.write_double(44, style.dimexe)?;
        self.writer.write_double(45, style.dimrnd)?;
        self.writer.write_double(46, style.dimdle)?;
        self.writer.write_double(47, style.dimtp)?;
        self.writer.write_double(48, style.dimtm)?;
        if extended {
            self.writer.write_double(49, style.dimfxl)?;
            self.writer.write_angle(50, style.dimjogang)?;
            self.writer.write_i16(69, style.dimtfill)?;
        }
        self.writer.write_double(140, style.dimtxt)?;
        self.writer.write_double(141, style.dimcen)?;
        self.writer.write_double(142, style.dimtsz)?;
        self.writer.write_double(143, style.dimaltf)?;
        self.writer.write_double(144, style.dimlfac)?;
        self.writer.write_double(145, style.dimtvp)?;
        self.writer.write_double(146, style.dimtfac)?;
        self.writer.write_double(147, style.dimgap)?;
        self.writer.write_double(148, style.dimaltrnd)?;
        self.writer.write_flag(71, style.dimtol)?;
        self.writer.write_flag(72, style.dimlim)?;
        self.writer.write_flag(73, style.dimtih)?;
        self.writer.write_flag(74, style.dimtoh)?;
        self.writer.write_flag(75, style.dimse1)?;
        self.writer.write_flag(76, style.dimse2)?;
        self.writer.write_i16(77, style.dimtad)?;
        self.writer.write_i16(78, style.dimzin)?;
        self.writer.write_i16(79, style.dimazin)?;
        if extended {
            self.writer.write_i32(90, style.dimarcsym as i32)?;
        }
        self.writer.write_flag(170, style.dimalt)?;
        self.writer.write_i16(171, style.dimaltd)?;
        self.writer.write_flag(172, style.dimtofl)?;
        self.writer.write_flag(173, style.dimsah)?;
        self.writer.write_flag(174, style.dimtix)?;
        self.writer.write_flag(175, style.dimsoxd)?;
        self.writer.write_i16(176, style.dimclrd)?;
        self.writer.write_i16(177, style.dimclre)?;
        self.writer.write_i16(178, style.dimclrt)?;
        self.writer.write_i16(179, style.dimadec)?;
        self.writer.write_i16(271, style.dimdec)?;
        self.writer.write_i16(272, style.dimtdec)?;
        self.writer.write_i16(273, style.dimaltu)?;
        self.writer.write_i16(274, style.dimalttd)?;
        self.writer.write_i16(275, style.dimaunit)?;
        self.writer.write_i16(276, style.dimfrac)?;
        self.writer.write_i16(277, style.dimlunit)?;
        self.writer.write_i16(278, style.dimdsep)?;
        self.writer.write_i16(279, style.dimtmove)?;
        self.writer.write_byte(280, style.dimjust as u8)?;
        self.writer.write_byte(281, style.dimsd1 as u8)?;
        self.writer.write_byte(282, style.dimsd2 as u8)?;
        self.writer.write_byte(283, style.dimtolj as u8)?;
        self.writer.write_byte(284, style.dimtzin as u8)?;
        self.writer.write_byte(285, style.dimaltz as u8)?;
        self.writer.write_byte(286, style.dimalttz as u8)?;
        self.writer.write_byte(288, style.dimupt as u8)?;
        self.writer.write_byte(289, style.dimatfit as u8)?;
        if extended {
            self.writer.write_bool(290, style.dimfxlon)?;
        }
        self.writer.write_handle(340, text_style.handle)?;
        for (code, block) in [
            (341, style.dimldrblk),
            (342, style.dimblk),
            (343, style.dimblk1),
            (344, style.dimblk2),
        ] {
            if !block.is_null() {
                self.writer.write_handle(code, block)?;
            }
        }
        self.writer.write_i16(371, style.dimlwd)?;
        self.writer.write_i16(372, style.dimlwe)
    }

    fn write_view(&mut self, view: &View) -> Result<()> {
        self.writer.write_i16(70, view.flags)?;
        self.writer.write_double(40, view.height)?;
        self.writer.write_point2d(10, view.center)?;
        self.writer.write_double(41, view.width)?;
        self.writer.write_point3d(11, view.direction)?;
        self.writer.write_point3d(12, view.target)?;
        self.writer.write_double(42, view.lens_length)?;
        self.writer.write_double(43, view.front_clip)?;
        self.writer.write_double(44, view.back_clip)?;
        self.writer.write_angle(50, view.twist_angle)?;
        self.writer.write_i16(71, view.view_mode)
    }

    fn write_ucs(&mut self, ucs: &Ucs) -> Result<()> {
        self.writer.write_i16(70, ucs.flags)?;
        self.writer.write_point3d(10, ucs.origin)?;
        self.writer.write_point3d(11, ucs.x_axis)?;
        self.writer.write_point3d(12, ucs.y_axis)?;
        self.writer.write_i16(79, 0)?;
        self.writer.write_double(146, ucs.elevation)
    }

    fn write_block_record(&mut self, record: &BlockRecord) -> Result<()> {
        self.writer.write_handle(340, record.layout)?;
        if record.is_layout_block() {
            return Ok(());
        }
        self.writer.write_i16(70, record.units.as_i16())?;
        self.writer.write_byte(280, record.explodable as u8)?;
        self.writer.write_byte(281, record.scale_uniformly as u8)?;
        if self.version < DxfVersion::AC1021 {
            let record = design_center_record(record);
            self.write_xdata_record(&record)?;
        }
        Ok(())
    }
}

/// `ACAD` record carrying the block units for readers before AutoCAD 2007
fn design_center_record(record: &BlockRecord) -> ExtendedDataRecord {
    ExtendedDataRecord::new("ACAD")
        .with_value(XDataValue::String(DESIGN_CENTER_DATA.to_string()))
        .with_value(XDataValue::ControlString("{".to_string()))
        .with_value(XDataValue::Integer16(1))
        .with_value(XDataValue::Integer16(record.units.as_i16()))
        .with_value(XDataValue::ControlString("}".to_string()))
}

#[cfg(test)]
mod tests {
    use super::super::section_writer::{render, text_pairs};
    use crate::document::CadDocument;
    use crate::error::DxfError;
    use crate::tables::*;
    use crate::types::{Color, DrawingUnits, DxfVersion, Transparency};

    fn tables(doc: &CadDocument, version: DxfVersion) -> crate::error::Result<Vec<(i32, String)>> {
        let (result, text) = render(doc, version, |w| w.write_tables());
        result.map(|_| text_pairs(&text))
    }

    fn record<'p>(pairs: &'p [(i32, String)], kind: &str, name: &str) -> &'p [(i32, String)] {
        let starts: Vec<usize> = pairs
            .iter()
            .enumerate()
            .filter(|(_, p)| p.0 == 0 && p.1 == kind)
            .map(|(i, _)| i)
            .collect();
        for start in starts {
            let end = pairs[start + 1..]
                .iter()
                .position(|p| p.0 == 0)
                .map(|i| start + 1 + i)
                .unwrap_or(pairs.len());
            if pairs[start..end].iter().any(|p| p.0 == 2 && p.1 == name) {
                return &pairs[start..end];
            }
        }
        panic!("no {kind} record named {name}");
    }

    fn p(code: i32, value: &str) -> (i32, String) {
        (code, value.to_string())
    }

    #[test]
    fn test_table_order() {
        let doc = CadDocument::new();
        let pairs = tables(&doc, DxfVersion::AC1032).unwrap();
        let names: Vec<&str> = pairs
            .windows(2)
            .filter(|w| w[0] == p(0, "TABLE"))
            .map(|w| w[1].1.as_str())
            .collect();
        assert_eq!(
            names,
            ["APPID", "VPORT", "LTYPE", "LAYER", "STYLE", "DIMSTYLE", "VIEW", "UCS", "BLOCK_RECORD"]
        );
    }

    #[test]
    fn test_hidden_layer_and_transparency() {
        let mut doc = CadDocument::new();
        let mut layer = Layer::new("Walls").with_color(Color::RED);
        layer.hidden = true;
        layer.transparency = Transparency::from_percent(50);
        doc.add_layer(layer).unwrap();
        let pairs = tables(&doc, DxfVersion::AC1032).unwrap();
        let walls = record(&pairs, "LAYER", "Walls");
        assert!(walls.contains(&p(62, "-1")));
        let at = walls.iter().position(|x| x == &p(1001, "AcCmTransparency")).unwrap();
        let alpha = Transparency::from_percent(50).to_alpha_value();
        assert_eq!(walls[at + 1], p(1071, &alpha.to_string()));
    }

    #[test]
    fn test_dimstyle_uses_105_and_resolves_text_style() {
        let doc = CadDocument::new();
        let pairs = tables(&doc, DxfVersion::AC1032).unwrap();
        let standard = record(&pairs, "DIMSTYLE", "Standard");
        assert_eq!(standard[1].0, 105);
        let style = doc.text_styles.get("Standard").unwrap().handle;
        assert!(standard.contains(&p(340, &style.to_hex())));
        assert!(standard.iter().any(|x| x.0 == 290));

        let old = tables(&doc, DxfVersion::AC1015).unwrap();
        let standard = record(&old, "DIMSTYLE", "Standard");
        assert!(!standard.iter().any(|x| x.0 == 290 || x.0 == 49));
    }

    #[test]
    fn test_dimstyle_missing_text_style() {
        let mut doc = CadDocument::new();
        doc.add_dim_style(DimStyle::new("Broken").with_text_style("Nowhere"))
            .unwrap();
        let result = tables(&doc, DxfVersion::AC1032);
        assert!(matches!(result, Err(DxfError::MissingReference { .. })));
    }

    #[test]
    fn test_block_record_units() {
        let mut doc = CadDocument::new();
        doc.add_block(BlockRecord::new("Door").with_units(DrawingUnits::Inches))
            .unwrap();

        let pairs = tables(&doc, DxfVersion::AC1018).unwrap();
        let door = record(&pairs, "BLOCK_RECORD", "Door");
        assert!(door.contains(&p(70, "1")));
        let at = door.iter().position(|x| x == &p(1001, "ACAD")).unwrap();
        assert_eq!(
            &door[at..at + 6],
            &[
                p(1001, "ACAD"),
                p(1000, "DesignCenter Data"),
                p(1002, "{"),
                p(1070, "1"),
                p(1070, "1"),
                p(1002, "}"),
            ]
        );

        let pairs = tables(&doc, DxfVersion::AC1021).unwrap();
        let door = record(&pairs, "BLOCK_RECORD", "Door");
        assert!(!door.contains(&p(1001, "ACAD")));

        let model = record(&pairs, "BLOCK_RECORD", "*Model_Space");
        assert!(!model.iter().any(|x| x.0 == 70));
    }

    #[test]
    fn test_true_type_style() {
        let mut doc = CadDocument::new();
        doc.add_text_style(TextStyle::new("Arial").with_true_type("arial.ttf", "Arial"))
            .unwrap();
        let pairs = tables(&doc, DxfVersion::AC1032).unwrap();
        let arial = record(&pairs, "STYLE", "Arial");
        let tail = &arial[arial.len() - 3..];
        assert_eq!(tail, &[p(1001, "ACAD"), p(1000, "Arial"), p(1071, "34")]);
    }
}
