//! OBJECTS section encoders

use super::section_writer::SectionWriter;
use super::stream_writer::{DxfStreamWriter, DxfStreamWriterExt};
use crate::error::{DxfError, Result};
use crate::io::dxf::Section;
use crate::objects::*;
use tracing::trace;

/// Code 74 plot type: plot the layout itself
const PLOT_TYPE_LAYOUT: i16 = 5;
/// Code 75 standard scale type: 1:1
const STANDARD_SCALE_ONE_TO_ONE: i16 = 16;

impl<'a, W: DxfStreamWriter> SectionWriter<'a, W> {
    /// Write the root dictionary followed by every other object in arena order
    pub fn write_objects(&mut self) -> Result<()> {
        self.begin_section(Section::Objects)?;
        let document = self.document;
        let root = document.root_dictionary();
        let root_object = document
            .object(root)
            .ok_or_else(|| DxfError::missing("root dictionary", root.to_hex()))?;
        self.write_object(root_object)?;
        for object in document.objects().filter(|o| o.handle() != root) {
            self.write_object(object)?;
        }
        self.end_section()
    }

    fn write_object(&mut self, object: &ObjectType) -> Result<()> {
        trace!(handle = %object.handle(), kind = object.dxf_name(), "writing object");
        self.writer.write_string(0, object.dxf_name())?;
        self.writer.write_handle(5, object.handle())?;
        self.write_reactors(object.reactors())?;
        self.writer.write_handle(330, object.owner())?;

        match object {
            ObjectType::Dictionary(dictionary) => self.write_dictionary(dictionary),
            ObjectType::Layout(layout) => self.write_layout(layout),
            ObjectType::Group(group) => self.write_group(group),
            ObjectType::MLineStyle(style) => self.write_mline_style(style),
            ObjectType::ImageDefinition(definition) => self.write_image_definition(definition),
            ObjectType::ImageDefinitionReactor(reactor) => {
                self.writer.write_subclass("AcDbRasterImageDefReactor")?;
                self.writer.write_i32(90, 2)?;
                self.writer.write_handle(330, reactor.image_handle)
            }
            ObjectType::RasterVariables(variables) => {
                self.writer.write_subclass("AcDbRasterVariables")?;
                self.writer.write_i32(90, 0)?;
                self.writer.write_flag(70, variables.display_frame)?;
                self.writer.write_flag(71, variables.high_quality)?;
                self.writer.write_i16(72, variables.units as i16)
            }
        }
    }

    fn write_dictionary(&mut self, dictionary: &Dictionary) -> Result<()> {
        self.writer.write_subclass("AcDbDictionary")?;
        self.writer.write_byte(280, dictionary.hard_owner as u8)?;
        self.writer.write_i16(281, dictionary.cloning.to_code())?;
        let entry_code = if dictionary.hard_owner { 360 } else { 350 };
        for (name, handle) in &dictionary.entries {
            self.write_str(3, name)?;
            self.writer.write_handle(entry_code, *handle)?;
        }
        Ok(())
    }

    fn write_layout(&mut self, layout: &Layout) -> Result<()> {
        let plot = &layout.plot_settings;
        self.writer.write_subclass("AcDbPlotSettings")?;
        self.write_str(1, &plot.page_name)?;
        self.write_str(2, &plot.printer_name)?;
        self.write_str(4, &plot.paper_size)?;
        self.write_str(6, &plot.plot_view_name)?;
        self.writer.write_double(40, plot.margins.left)?;
        self.writer.write_double(41, plot.margins.bottom)?;
        self.writer.write_double(42, plot.margins.right)?;
        self.writer.write_double(43, plot.margins.top)?;
        self.writer.write_double(44, plot.paper_width)?;
        self.writer.write_double(45, plot.paper_height)?;
        self.writer.write_double(46, plot.origin_x)?;
        self.writer.write_double(47, plot.origin_y)?;
        self.writer.write_double(48, plot.window_lower_left.0)?;
        self.writer.write_double(49, plot.window_lower_left.1)?;
        self.writer.write_double(140, plot.window_upper_right.0)?;
        self.writer.write_double(141, plot.window_upper_right.1)?;
        self.writer.write_double(142, plot.scale_numerator)?;
        self.writer.write_double(143, plot.scale_denominator)?;
        self.writer.write_i16(70, plot.flags.to_bits())?;
        self.writer.write_i16(72, plot.paper_units.to_code())?;
        self.writer.write_i16(73, plot.rotation.to_code())?;
        self.writer.write_i16(74, PLOT_TYPE_LAYOUT)?;
        self.write_str(7, &plot.current_style_sheet)?;
        self.writer.write_i16(75, STANDARD_SCALE_ONE_TO_ONE)?;
        self.writer.write_double(147, plot.print_scale)?;
        self.writer.write_double(148, plot.paper_image_origin.0)?;
        self.writer.write_double(149, plot.paper_image_origin.1)?;

        self.writer.write_subclass("AcDbLayout")?;
        self.write_str(1, &layout.name)?;
        self.writer.write_i16(70, layout.flags)?;
        self.writer.write_i16(71, layout.tab_order)?;
        self.writer.write_point2d(10, layout.min_limits)?;
        self.writer.write_point2d(11, layout.max_limits)?;
        self.writer.write_point3d(12, layout.insertion_base)?;
        self.writer.write_point3d(14, layout.min_extents)?;
        self.writer.write_point3d(15, layout.max_extents)?;
        self.writer.write_double(146, layout.elevation)?;
        self.writer.write_point3d(13, layout.ucs_origin)?;
        self.writer.write_point3d(16, layout.ucs_x_axis)?;
        self.writer.write_point3d(17, layout.ucs_y_axis)?;
        self.writer.write_i16(76, 0)?;
        self.writer.write_handle(330, layout.block_record)
    }

    fn write_group(&mut self, group: &Group) -> Result<()> {
        self.writer.write_subclass("AcDbGroup")?;
        self.write_str(300, &group.description)?;
        self.writer.write_flag(70, group.is_unnamed())?;
        self.writer.write_flag(71, group.selectable)?;
        for member in &group.entities {
            self.writer.write_handle(340, *member)?;
        }
        Ok(())
    }

    fn write_mline_style(&mut self, style: &MLineStyle) -> Result<()> {
        self.writer.write_subclass("AcDbMlineStyle")?;
        self.write_str(2, &style.name)?;
        self.writer.write_i16(70, style.flags.to_bits())?;
        self.write_str(3, &style.description)?;
        self.writer.write_color(62, style.fill_color)?;
        self.writer.write_angle(51, style.start_angle)?;
        self.writer.write_angle(52, style.end_angle)?;
        self.writer.write_i16(71, style.elements.len() as i16)?;
        for element in &style.elements {
            self.writer.write_double(49, element.offset)?;
            self.writer.write_color(62, element.color)?;
            self.write_str(6, &element.line_type)?;
        }
        Ok(())
    }

    fn write_image_definition(&mut self, definition: &ImageDefinition) -> Result<()> {
        self.writer.write_subclass("AcDbRasterImageDef")?;
        self.writer.write_i32(90, 0)?;
        self.write_str(1, &definition.file_name)?;
        self.writer.write_point2d(10, definition.size_in_pixels)?;
        self.writer.write_point2d(11, definition.pixel_size)?;
        self.writer.write_byte(280, definition.is_loaded as u8)?;
        self.writer
            .write_byte(281, definition.resolution_unit.to_code() as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::super::section_writer::{render, text_pairs};
    use crate::document::{CadDocument, ACAD_GROUP, ACAD_LAYOUT};
    use crate::entities::Line;
    use crate::objects::*;
    use crate::types::{DxfVersion, Vector3};

    fn objects(doc: &CadDocument) -> Vec<(i32, String)> {
        let (result, text) = render(doc, DxfVersion::AC1032, |w| w.write_objects());
        result.unwrap();
        text_pairs(&text)
    }

    fn p(code: i32, value: &str) -> (i32, String) {
        (code, value.to_string())
    }

    /// Pairs of the object whose `5` handle is `handle`
    fn object_pairs(pairs: &[(i32, String)], handle: &str) -> Vec<(i32, String)> {
        let start = pairs
            .windows(2)
            .position(|w| w[0].0 == 0 && w[1] == p(5, handle))
            .expect("object present");
        let end = pairs[start + 1..]
            .iter()
            .position(|x| x.0 == 0)
            .map(|i| start + 1 + i)
            .unwrap_or(pairs.len());
        pairs[start..end].to_vec()
    }

    #[test]
    fn test_root_dictionary_first() {
        let doc = CadDocument::new();
        let pairs = objects(&doc);
        assert_eq!(pairs[2], p(0, "DICTIONARY"));
        assert_eq!(pairs[3], p(5, &doc.root_dictionary().to_hex()));
        let root = object_pairs(&pairs, &doc.root_dictionary().to_hex());
        assert!(root.contains(&p(330, "0")));
        let names: Vec<&str> = root
            .iter()
            .filter(|x| x.0 == 3)
            .map(|x| x.1.as_str())
            .collect();
        assert!(names.contains(&ACAD_GROUP));
        assert!(names.contains(&ACAD_LAYOUT));
    }

    #[test]
    fn test_layout_plot_type() {
        let mut doc = CadDocument::new();
        let handle = doc.add_layout("Sheet 1").unwrap();
        let pairs = objects(&doc);
        let layout = object_pairs(&pairs, &handle.to_hex());
        assert_eq!(layout[0], p(0, "LAYOUT"));
        let at = layout.iter().position(|x| x.0 == 74).unwrap();
        assert_eq!(layout[at], p(74, "5"));
        assert_eq!(layout[at + 2], p(75, "16"));
        assert!(layout.contains(&p(1, "Sheet 1")));
        let Some(ObjectType::Layout(stored)) = doc.object(handle) else {
            panic!("layout expected");
        };
        assert_eq!(
            layout.last().unwrap(),
            &p(330, &stored.block_record.to_hex())
        );
    }

    #[test]
    fn test_group_members_in_order() {
        let mut doc = CadDocument::new();
        let a = doc.add_entity(Line::from_points(Vector3::ZERO, Vector3::UNIT_X));
        let b = doc.add_entity(Line::from_points(Vector3::ZERO, Vector3::UNIT_Y));
        let group = doc.add_group("PAIR", [b, a]).unwrap();
        let pairs = objects(&doc);
        let group = object_pairs(&pairs, &group.to_hex());
        let members: Vec<String> = group
            .iter()
            .filter(|x| x.0 == 340)
            .map(|x| x.1.clone())
            .collect();
        assert_eq!(members, [b.to_hex(), a.to_hex()]);
        assert!(group.contains(&p(70, "0")));
        assert!(group.contains(&p(71, "1")));
    }

    #[test]
    fn test_mline_style_elements() {
        let doc = CadDocument::new();
        let pairs = objects(&doc);
        let at = pairs.iter().position(|x| x == &p(0, "MLINESTYLE")).unwrap();
        let style = &pairs[at..];
        assert!(style.contains(&p(100, "AcDbMlineStyle")));
        assert!(style.contains(&p(71, "2")));
        assert!(style.contains(&p(49, "0.5")));
        assert!(style.contains(&p(49, "-0.5")));
        let start: f64 = style.iter().find(|x| x.0 == 51).unwrap().1.parse().unwrap();
        assert!((start - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_image_definition_objects() {
        let mut doc = CadDocument::new();
        let handle = doc.add_image_definition(ImageDefinition::new("site.png", 640.0, 480.0));
        let pairs = objects(&doc);
        let definition = object_pairs(&pairs, &handle.to_hex());
        assert!(definition.contains(&p(100, "AcDbRasterImageDef")));
        assert!(definition.contains(&p(1, "site.png")));
        assert!(definition.contains(&p(10, "640.0")));
        assert!(definition.contains(&p(21, "1.0")));
        assert!(pairs.contains(&p(0, "RASTERVARIABLES")));
    }
}
