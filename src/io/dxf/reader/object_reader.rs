//! OBJECTS section decoders

use super::section_reader::SectionReader;
use super::stream_reader::DxfCodePair;
use crate::error::{DxfError, Result};
use crate::objects::*;
use crate::types::{Color, Handle, ImageUnits};
use tracing::{debug, trace};

/// Handle, owner and reactors every object record starts with
#[derive(Debug, Default)]
struct ObjectHeader {
    handle: Handle,
    owner: Handle,
    reactors: Vec<Handle>,
}

impl<'a> SectionReader<'a> {
    pub fn read_objects(&mut self) -> Result<()> {
        let mut count = 0;
        loop {
            let pair = self.next_pair()?;
            match (pair.code, pair.as_str()) {
                (0, "ENDSEC") => break,
                (0, kind) => {
                    let kind = kind.to_string();
                    if let Some(object) = self.read_object(&kind)? {
                        trace!(handle = %object.handle(), kind = object.dxf_name(), "read object");
                        self.document.insert_object(object);
                        count += 1;
                    }
                }
                _ => {}
            }
        }
        self.flush_unknown("OBJECTS");
        debug!(count, "read objects");
        Ok(())
    }

    /// Read one object record after its `0` pair; `None` for kinds that are
    /// not modelled
    fn read_object(&mut self, kind: &str) -> Result<Option<ObjectType>> {
        let object: ObjectType = match kind {
            "DICTIONARY" => self.read_dictionary()?.into(),
            "LAYOUT" => self.read_layout()?.into(),
            "GROUP" => self.read_group()?.into(),
            "MLINESTYLE" => self.read_mline_style()?.into(),
            "IMAGEDEF" => self.read_image_definition()?.into(),
            "IMAGEDEF_REACTOR" => {
                let mut reactor = ImageDefinitionReactor::new(Handle::NULL);
                let header = self.read_object_record(|_, subclass, pair| {
                    if subclass == "AcDbRasterImageDefReactor" && pair.code == 330 {
                        reactor.image_handle = pair.as_handle();
                    }
                    Ok(())
                })?;
                reactor.handle = header.handle;
                reactor.owner = header.owner;
                reactor.into()
            }
            "RASTERVARIABLES" => {
                let mut variables = RasterVariables::new();
                let header = self.read_object_record(|_, _, pair| {
                    match pair.code {
                        70 => variables.display_frame = pair.as_bool(),
                        71 => variables.high_quality = pair.as_bool(),
                        72 => variables.units = ImageUnits::from_i16(pair.as_i16()),
                        _ => {}
                    }
                    Ok(())
                })?;
                variables.handle = header.handle;
                variables.owner = header.owner;
                variables.reactors = header.reactors;
                variables.into()
            }
            _ => {
                self.read_object_record(|_, _, _| Ok(()))?;
                self.record_unknown(kind);
                return Ok(None);
            }
        };
        if object.handle().is_null() {
            return Err(DxfError::structure(format!("{} object without a handle", kind)));
        }
        Ok(Some(object))
    }

    /// Read the pairs of one object record up to the next `0` pair
    ///
    /// Extended data on objects is not kept.
    fn read_object_record<F>(&mut self, mut read_field: F) -> Result<ObjectHeader>
    where
        F: FnMut(&mut Self, &str, &DxfCodePair) -> Result<()>,
    {
        let mut header = ObjectHeader::default();
        let mut subclass = String::new();
        while let Some(pair) = self.reader.read_pair()? {
            match pair.code {
                0 => {
                    self.reader.push_back(pair);
                    break;
                }
                100 => subclass = pair.value_string,
                102 => self.read_application_group(&pair, &mut header.reactors)?,
                1001 => {
                    self.reader.push_back(pair);
                    self.read_extended_data()?;
                }
                5 if subclass.is_empty() => header.handle = pair.as_handle(),
                330 if subclass.is_empty() => header.owner = pair.as_handle(),
                _ => read_field(self, &subclass, &pair)?,
            }
        }
        Ok(header)
    }

    fn read_dictionary(&mut self) -> Result<Dictionary> {
        let mut dictionary = Dictionary::new();
        let mut key: Option<String> = None;
        let header = self.read_object_record(|r, _, pair| {
            match pair.code {
                280 => dictionary.hard_owner = pair.as_bool(),
                281 => dictionary.cloning = DictionaryCloning::from_code(pair.as_i16()),
                3 => key = Some(r.string(pair)),
                350 | 360 => {
                    if pair.code == 360 {
                        dictionary.hard_owner = true;
                    }
                    if let Some(key) = key.take() {
                        dictionary.add_entry(key, pair.as_handle());
                    }
                }
                _ => {}
            }
            Ok(())
        })?;
        dictionary.handle = header.handle;
        dictionary.owner = header.owner;
        dictionary.reactors = header.reactors;
        Ok(dictionary)
    }

    fn read_layout(&mut self) -> Result<Layout> {
        let mut layout = Layout::new("");
        let header = self.read_object_record(|r, subclass, pair| {
            if subclass == "AcDbPlotSettings" {
                read_plot_settings(r, &mut layout.plot_settings, pair);
                return Ok(());
            }
            match pair.code {
                1 => layout.name = r.string(pair),
                70 => layout.flags = pair.as_i16(),
                71 => layout.tab_order = pair.as_i16(),
                10 | 20 => {
                    pair.apply_to_2d(&mut layout.min_limits);
                }
                11 | 21 => {
                    pair.apply_to_2d(&mut layout.max_limits);
                }
                12 | 22 | 32 => {
                    pair.apply_to(&mut layout.insertion_base);
                }
                14 | 24 | 34 => {
                    pair.apply_to(&mut layout.min_extents);
                }
                15 | 25 | 35 => {
                    pair.apply_to(&mut layout.max_extents);
                }
                146 => layout.elevation = pair.as_double(),
                13 | 23 | 33 => {
                    pair.apply_to(&mut layout.ucs_origin);
                }
                16 | 26 | 36 => {
                    pair.apply_to(&mut layout.ucs_x_axis);
                }
                17 | 27 | 37 => {
                    pair.apply_to(&mut layout.ucs_y_axis);
                }
                330 => layout.block_record = pair.as_handle(),
                331 => layout.viewport = pair.as_handle(),
                _ => {}
            }
            Ok(())
        })?;
        layout.handle = header.handle;
        layout.owner = header.owner;
        layout.reactors = header.reactors;
        Ok(layout)
    }

    fn read_group(&mut self) -> Result<Group> {
        let mut group = Group::new("");
        let header = self.read_object_record(|r, _, pair| {
            match pair.code {
                300 => group.description = r.string(pair),
                71 => group.selectable = pair.as_bool(),
                340 => group.entities.push(pair.as_handle()),
                _ => {}
            }
            Ok(())
        })?;
        group.handle = header.handle;
        group.owner = header.owner;
        group.reactors = header.reactors;
        Ok(group)
    }

    fn read_mline_style(&mut self) -> Result<MLineStyle> {
        let mut style = MLineStyle::new("");
        let header = self.read_object_record(|r, _, pair| {
            match pair.code {
                2 => style.name = r.string(pair),
                70 => style.flags = MLineStyleFlags::from_bits(pair.as_i16()),
                3 => style.description = r.string(pair),
                51 => style.start_angle = pair.as_angle(),
                52 => style.end_angle = pair.as_angle(),
                49 => style.elements.push(MLineStyleElement::new(pair.as_double())),
                // 62 before the first element is the fill color
                62 => match style.elements.last_mut() {
                    Some(element) => element.color = Color::from_index(pair.as_i16()),
                    None => style.fill_color = Color::from_index(pair.as_i16()),
                },
                6 => {
                    if let Some(element) = style.elements.last_mut() {
                        element.line_type = r.string(pair);
                    }
                }
                _ => {}
            }
            Ok(())
        })?;
        style.handle = header.handle;
        style.owner = header.owner;
        style.reactors = header.reactors;
        Ok(style)
    }

    fn read_image_definition(&mut self) -> Result<ImageDefinition> {
        let mut definition = ImageDefinition::new("", 0.0, 0.0);
        let header = self.read_object_record(|r, _, pair| {
            match pair.code {
                1 => definition.file_name = r.string(pair),
                10 | 20 => {
                    pair.apply_to_2d(&mut definition.size_in_pixels);
                }
                11 | 21 => {
                    pair.apply_to_2d(&mut definition.pixel_size);
                }
                280 => definition.is_loaded = pair.as_bool(),
                281 => definition.resolution_unit = ResolutionUnit::from_code(pair.as_i16()),
                _ => {}
            }
            Ok(())
        })?;
        definition.handle = header.handle;
        definition.owner = header.owner;
        definition.reactors = header.reactors;
        Ok(definition)
    }
}

/// Fields of the `AcDbPlotSettings` subclass of a layout
fn read_plot_settings(reader: &SectionReader<'_>, plot: &mut PlotSettings, pair: &DxfCodePair) {
    match pair.code {
        1 => plot.page_name = reader.string(pair),
        2 => plot.printer_name = reader.string(pair),
        4 => plot.paper_size = reader.string(pair),
        6 => plot.plot_view_name = reader.string(pair),
        7 => plot.current_style_sheet = reader.string(pair),
        40 => plot.margins.left = pair.as_double(),
        41 => plot.margins.bottom = pair.as_double(),
        42 => plot.margins.right = pair.as_double(),
        43 => plot.margins.top = pair.as_double(),
        44 => plot.paper_width = pair.as_double(),
        45 => plot.paper_height = pair.as_double(),
        46 => plot.origin_x = pair.as_double(),
        47 => plot.origin_y = pair.as_double(),
        48 => plot.window_lower_left.0 = pair.as_double(),
        49 => plot.window_lower_left.1 = pair.as_double(),
        140 => plot.window_upper_right.0 = pair.as_double(),
        141 => plot.window_upper_right.1 = pair.as_double(),
        142 => plot.scale_numerator = pair.as_double(),
        143 => plot.scale_denominator = pair.as_double(),
        70 => plot.flags = PlotFlags::from_bits(pair.as_i16()),
        72 => plot.paper_units = PlotPaperUnits::from_code(pair.as_i16()),
        73 => plot.rotation = PlotRotation::from_code(pair.as_i16()),
        147 => plot.print_scale = pair.as_double(),
        148 => plot.paper_image_origin.0 = pair.as_double(),
        149 => plot.paper_image_origin.1 = pair.as_double(),
        _ => {}
    }
}
