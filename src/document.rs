//! CAD document structure
//!
//! The document is an arena: entities and objects are stored by handle, and
//! everything that refers to another record (owners, reactors, block entity
//! lists, dictionary entries) holds a [`Handle`] key into it.

use crate::entities::{EntityType, Viewport};
use crate::error::{DxfError, Result};
use crate::notification::NotificationCollection;
use crate::objects::{
    Dictionary, Group, ImageDefinition, ImageDefinitionReactor, Layout, MLineStyle, ObjectType,
    RasterVariables,
};
use crate::tables::*;
use crate::types::units::conversion_factor;
use crate::types::{Color, DrawingUnits, DxfVersion, Handle, LineWeight, Vector2, Vector3};
use ahash::AHashSet;
use indexmap::IndexMap;

/// Well-known table handles
const HANDLE_BLOCK_RECORD_TABLE: u64 = 0x1;
const HANDLE_LAYER_TABLE: u64 = 0x2;
const HANDLE_STYLE_TABLE: u64 = 0x3;
const HANDLE_LTYPE_TABLE: u64 = 0x5;
const HANDLE_VIEW_TABLE: u64 = 0x6;
const HANDLE_UCS_TABLE: u64 = 0x7;
const HANDLE_VPORT_TABLE: u64 = 0x8;
const HANDLE_APPID_TABLE: u64 = 0x9;
const HANDLE_DIMSTYLE_TABLE: u64 = 0xA;
/// First handle handed out to records
const FIRST_FREE_HANDLE: u64 = 0x10;

pub const ACAD_GROUP: &str = "ACAD_GROUP";
pub const ACAD_LAYOUT: &str = "ACAD_LAYOUT";
pub const ACAD_MLINESTYLE: &str = "ACAD_MLINESTYLE";
pub const ACAD_IMAGE_DICT: &str = "ACAD_IMAGE_DICT";
pub const ACAD_IMAGE_VARS: &str = "ACAD_IMAGE_VARS";

/// Value of a header variable that has no dedicated field
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    /// String (code 1)
    String(String),
    /// 16-bit integer (code 70)
    Int16(i16),
    /// 32-bit integer (code 90)
    Int32(i32),
    /// Real (code 40)
    Double(f64),
    /// 2D point (codes 10/20)
    Point2(Vector2),
    /// 3D point (codes 10/20/30)
    Point3(Vector3),
    /// Handle (code 5)
    Handle(Handle),
    /// Boolean (code 290)
    Bool(bool),
}

/// Drawing settings written to the HEADER section
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderVariables {
    /// $ACADVER
    pub version: DxfVersion,
    /// $DWGCODEPAGE
    pub code_page: String,
    /// $HANDSEED as read; the writer derives it from the document
    pub handle_seed: Handle,
    /// $INSUNITS
    pub insertion_units: DrawingUnits,
    /// $INSBASE
    pub insertion_base: Vector3,
    /// $EXTMIN
    pub ext_min: Vector3,
    /// $EXTMAX
    pub ext_max: Vector3,
    /// $LIMMIN
    pub lim_min: Vector2,
    /// $LIMMAX
    pub lim_max: Vector2,
    /// $CLAYER
    pub current_layer: String,
    /// $CELTYPE
    pub current_line_type: String,
    /// $CECOLOR
    pub current_color: Color,
    /// $CELWEIGHT
    pub current_line_weight: LineWeight,
    /// $LTSCALE
    pub linetype_scale: f64,
    /// $TEXTSIZE
    pub text_size: f64,
    /// $TEXTSTYLE
    pub text_style: String,
    /// $DIMSTYLE
    pub dim_style: String,
    /// $ANGBASE, in radians
    pub angle_base: f64,
    /// $ANGDIR (0 = counter-clockwise)
    pub angle_direction: i16,
    /// $LUNITS
    pub linear_unit_format: i16,
    /// $LUPREC
    pub linear_unit_precision: i16,
    /// $AUNITS
    pub angular_unit_format: i16,
    /// $AUPREC
    pub angular_unit_precision: i16,
    /// $PDMODE
    pub point_display_mode: i16,
    /// $PDSIZE
    pub point_display_size: f64,
    /// $CMLSTYLE
    pub mline_style: String,
    /// $CMLSCALE
    pub mline_scale: f64,
    /// $CMLJUST
    pub mline_justification: i16,
    /// $LWDISPLAY
    pub lineweight_display: bool,
    /// $EXTNAMES
    pub extended_names: bool,
    /// $MEASUREMENT (0 = English, 1 = Metric)
    pub measurement: i16,
    /// $LASTSAVEDBY
    pub last_saved_by: String,
    /// Any other variable, keyed by name including the `$`
    pub custom_variables: IndexMap<String, HeaderValue>,
}

impl Default for HeaderVariables {
    fn default() -> Self {
        HeaderVariables {
            version: DxfVersion::AC1032,
            code_page: "ANSI_1252".to_string(),
            handle_seed: Handle::NULL,
            insertion_units: DrawingUnits::Unitless,
            insertion_base: Vector3::ZERO,
            ext_min: Vector3::ZERO,
            ext_max: Vector3::ZERO,
            lim_min: Vector2::ZERO,
            lim_max: Vector2::new(12.0, 9.0),
            current_layer: "0".to_string(),
            current_line_type: "ByLayer".to_string(),
            current_color: Color::ByLayer,
            current_line_weight: LineWeight::ByLayer,
            linetype_scale: 1.0,
            text_size: 2.5,
            text_style: "Standard".to_string(),
            dim_style: "Standard".to_string(),
            angle_base: 0.0,
            angle_direction: 0,
            linear_unit_format: 2,
            linear_unit_precision: 4,
            angular_unit_format: 0,
            angular_unit_precision: 0,
            point_display_mode: 0,
            point_display_size: 0.0,
            mline_style: MLineStyle::DEFAULT_NAME.to_string(),
            mline_scale: 1.0,
            mline_justification: 0,
            lineweight_display: false,
            extended_names: true,
            measurement: 1,
            last_saved_by: String::new(),
            custom_variables: IndexMap::new(),
        }
    }
}

/// A CAD document containing all drawing data
#[derive(Debug, Clone)]
pub struct CadDocument {
    /// Header variables
    pub header: HeaderVariables,
    /// Comments written as code 999 at the top of the file
    pub comments: Vec<String>,

    pub app_ids: Table<AppId>,
    pub vports: Table<VPort>,
    pub line_types: Table<LineType>,
    pub layers: Table<Layer>,
    pub text_styles: Table<TextStyle>,
    pub dim_styles: Table<DimStyle>,
    pub views: Table<View>,
    pub ucss: Table<Ucs>,
    pub block_records: Table<BlockRecord>,

    /// Notifications collected during the last read
    pub notifications: NotificationCollection,

    entities: IndexMap<Handle, EntityType>,
    objects: IndexMap<Handle, ObjectType>,
    root_dictionary: Handle,
    next_handle: u64,
}

impl CadDocument {
    /// Create a document with the standard records every drawing needs
    pub fn new() -> Self {
        let mut doc = Self::empty();
        doc.initialize_defaults();
        doc
    }

    /// Create a document targeting a specific version
    pub fn with_version(version: DxfVersion) -> Self {
        let mut doc = Self::new();
        doc.header.version = version;
        doc
    }

    /// A document with empty tables and no objects; used by the reader
    pub(crate) fn empty() -> Self {
        CadDocument {
            header: HeaderVariables::default(),
            comments: Vec::new(),
            app_ids: Table::with_handle(Handle::new(HANDLE_APPID_TABLE)),
            vports: Table::with_handle(Handle::new(HANDLE_VPORT_TABLE)),
            line_types: Table::with_handle(Handle::new(HANDLE_LTYPE_TABLE)),
            layers: Table::with_handle(Handle::new(HANDLE_LAYER_TABLE)),
            text_styles: Table::with_handle(Handle::new(HANDLE_STYLE_TABLE)),
            dim_styles: Table::with_handle(Handle::new(HANDLE_DIMSTYLE_TABLE)),
            views: Table::with_handle(Handle::new(HANDLE_VIEW_TABLE)),
            ucss: Table::with_handle(Handle::new(HANDLE_UCS_TABLE)),
            block_records: Table::with_handle(Handle::new(HANDLE_BLOCK_RECORD_TABLE)),
            notifications: NotificationCollection::new(),
            entities: IndexMap::new(),
            objects: IndexMap::new(),
            root_dictionary: Handle::NULL,
            next_handle: FIRST_FREE_HANDLE,
        }
    }

    fn initialize_defaults(&mut self) {
        let mut next = self.next_handle;

        add_entry(&mut self.layers, Layer::layer_0(), &mut next).ok();
        add_entry(&mut self.line_types, LineType::by_block(), &mut next).ok();
        add_entry(&mut self.line_types, LineType::by_layer(), &mut next).ok();
        add_entry(&mut self.line_types, LineType::continuous(), &mut next).ok();
        add_entry(&mut self.text_styles, TextStyle::standard(), &mut next).ok();
        add_entry(&mut self.dim_styles, DimStyle::standard(), &mut next).ok();
        add_entry(&mut self.app_ids, AppId::acad(), &mut next).ok();
        add_entry(&mut self.vports, VPort::active(), &mut next).ok();
        self.next_handle = next;

        // Named object dictionary and its standard children
        let root = self.allocate_handle();
        let mut root_dict = Dictionary::new();
        root_dict.handle = root;
        self.objects.insert(root, root_dict.into());
        self.root_dictionary = root;

        for name in [ACAD_GROUP, ACAD_LAYOUT, ACAD_MLINESTYLE] {
            self.add_root_dictionary(name);
        }
        self.add_mline_style(MLineStyle::standard()).ok();

        self.add_layout_block(BlockRecord::model_space(), Layout::model())
            .ok();
        self.add_layout_block(BlockRecord::paper_space(), Layout::new("Layout1"))
            .ok();
    }

    /// Allocate a new unique handle
    pub fn allocate_handle(&mut self) -> Handle {
        let handle = Handle::new(self.next_handle);
        self.next_handle += 1;
        handle
    }

    /// Next handle value, written as `$HANDSEED`
    pub fn next_handle(&self) -> u64 {
        self.next_handle
    }

    pub fn version(&self) -> DxfVersion {
        self.header.version
    }

    /// Handle of the named object dictionary
    pub fn root_dictionary(&self) -> Handle {
        self.root_dictionary
    }

    // ─── Entities ───

    /// Add an entity to model space
    pub fn add_entity(&mut self, entity: impl Into<EntityType>) -> Handle {
        let owner = self
            .block_records
            .get(MODEL_SPACE)
            .map(|r| r.handle)
            .unwrap_or(Handle::NULL);
        self.insert_owned_entity(owner, entity.into())
    }

    /// Add an entity to the first paper space layout
    pub fn add_paper_space_entity(&mut self, entity: impl Into<EntityType>) -> Handle {
        let owner = self
            .block_records
            .get(PAPER_SPACE)
            .map(|r| r.handle)
            .unwrap_or(Handle::NULL);
        self.insert_owned_entity(owner, entity.into())
    }

    /// Add an entity to a block definition
    pub fn add_entity_to_block(
        &mut self,
        block_name: &str,
        entity: impl Into<EntityType>,
    ) -> Result<Handle> {
        let entity = entity.into();
        let record = self
            .block_records
            .get_mut(block_name)
            .ok_or_else(|| DxfError::missing("block", block_name))?;
        if matches!(entity, EntityType::AttributeDefinition(_)) {
            record.flags.has_attributes = true;
        }
        let owner = record.handle;
        Ok(self.insert_owned_entity(owner, entity))
    }

    fn insert_owned_entity(&mut self, owner: Handle, mut entity: EntityType) -> Handle {
        let handle = if entity.handle().is_null() {
            let h = self.allocate_handle();
            entity.common_mut().handle = h;
            h
        } else {
            entity.handle()
        };
        entity.common_mut().owner = owner;

        let next = &mut self.next_handle;
        entity.assign_sub_handles(|| {
            let h = Handle::new(*next);
            *next += 1;
            h
        });

        if let EntityType::RasterImage(image) = &mut entity {
            if image.definition_reactor.is_null() && !image.definition.is_null() {
                image.definition_reactor = self.add_image_reactor(image.definition, handle);
            }
        }

        if let Some(record) = self.block_records.get_by_handle_mut(owner) {
            record.entities.push(handle);
        }
        self.entities.insert(handle, entity);
        handle
    }

    /// Create the reactor that ties an image to its definition
    fn add_image_reactor(&mut self, definition: Handle, image: Handle) -> Handle {
        let reactor_handle = self.allocate_handle();
        let mut reactor = ImageDefinitionReactor::new(image);
        reactor.handle = reactor_handle;
        if let Some(ObjectType::ImageDefinition(def)) = self.objects.get_mut(&definition) {
            def.reactors.push(reactor_handle);
        }
        self.objects.insert(reactor_handle, reactor.into());
        reactor_handle
    }

    /// Store an entity read from a file under its own handle
    pub(crate) fn insert_entity(&mut self, entity: EntityType) -> Handle {
        let handle = entity.handle();
        let owner = entity.common().owner;
        if let Some(record) = self.block_records.get_by_handle_mut(owner) {
            record.entities.push(handle);
        }
        self.entities.insert(handle, entity);
        handle
    }

    pub fn entity(&self, handle: Handle) -> Option<&EntityType> {
        self.entities.get(&handle)
    }

    pub fn entity_mut(&mut self, handle: Handle) -> Option<&mut EntityType> {
        self.entities.get_mut(&handle)
    }

    /// Remove an entity and its entry in the owning block record
    pub fn remove_entity(&mut self, handle: Handle) -> Option<EntityType> {
        let entity = self.entities.shift_remove(&handle)?;
        if let Some(record) = self.block_records.get_by_handle_mut(entity.common().owner) {
            record.entities.retain(|h| *h != handle);
        }
        Some(entity)
    }

    /// All entities, in insertion order
    pub fn entities(&self) -> impl Iterator<Item = &EntityType> {
        self.entities.values()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Entities of a block record, in drawing order
    pub fn entities_in<'a>(&'a self, block_name: &str) -> impl Iterator<Item = &'a EntityType> + 'a {
        let handles: &'a [Handle] = self
            .block_records
            .get(block_name)
            .map(|record| record.entities.as_slice())
            .unwrap_or(&[]);
        handles.iter().filter_map(move |h| self.entities.get(h))
    }

    pub fn model_space_entities(&self) -> impl Iterator<Item = &EntityType> {
        self.entities_in(MODEL_SPACE)
    }

    // ─── Tables ───

    /// Add a block definition; its BLOCK and ENDBLK handles are assigned here
    pub fn add_block(&mut self, mut record: BlockRecord) -> Result<Handle> {
        if self.block_records.contains(&record.name) {
            return Err(DxfError::Custom(format!(
                "Block '{}' already exists",
                record.name
            )));
        }
        record.block_entity_handle = self.allocate_handle();
        record.block_end_handle = self.allocate_handle();
        let mut next = self.next_handle;
        let handle = add_entry(&mut self.block_records, record, &mut next)?;
        self.next_handle = next;
        Ok(handle)
    }

    pub fn add_layer(&mut self, layer: Layer) -> Result<Handle> {
        add_entry(&mut self.layers, layer, &mut self.next_handle)
    }

    pub fn add_line_type(&mut self, line_type: LineType) -> Result<Handle> {
        add_entry(&mut self.line_types, line_type, &mut self.next_handle)
    }

    pub fn add_text_style(&mut self, style: TextStyle) -> Result<Handle> {
        add_entry(&mut self.text_styles, style, &mut self.next_handle)
    }

    pub fn add_dim_style(&mut self, style: DimStyle) -> Result<Handle> {
        add_entry(&mut self.dim_styles, style, &mut self.next_handle)
    }

    pub fn add_app_id(&mut self, app_id: AppId) -> Result<Handle> {
        add_entry(&mut self.app_ids, app_id, &mut self.next_handle)
    }

    pub fn add_ucs(&mut self, ucs: Ucs) -> Result<Handle> {
        add_entry(&mut self.ucss, ucs, &mut self.next_handle)
    }

    pub fn add_view(&mut self, view: View) -> Result<Handle> {
        add_entry(&mut self.views, view, &mut self.next_handle)
    }

    pub fn add_vport(&mut self, vport: VPort) -> Result<Handle> {
        add_entry(&mut self.vports, vport, &mut self.next_handle)
    }

    // ─── Objects ───

    /// Create an empty dictionary under the root dictionary
    fn add_root_dictionary(&mut self, name: &str) -> Handle {
        let handle = self.allocate_handle();
        let mut dict = Dictionary::new();
        dict.handle = handle;
        dict.owner = self.root_dictionary;
        self.objects.insert(handle, dict.into());
        if let Some(root) = self.dictionary_mut(self.root_dictionary) {
            root.add_entry(name, handle);
        }
        handle
    }

    /// Handle of a dictionary stored in the root dictionary
    pub fn named_dictionary(&self, name: &str) -> Option<Handle> {
        self.dictionary(self.root_dictionary)?.get(name)
    }

    /// Store `object` under `name` in the root child dictionary `dictionary`
    fn add_dictionary_object(
        &mut self,
        dictionary: &str,
        name: &str,
        mut object: ObjectType,
    ) -> Result<Handle> {
        let dict_handle = match self.named_dictionary(dictionary) {
            Some(h) => h,
            None => self.add_root_dictionary(dictionary),
        };
        if self
            .dictionary(dict_handle)
            .is_some_and(|d| d.contains(name))
        {
            return Err(DxfError::Custom(format!(
                "'{}' already exists in {}",
                name, dictionary
            )));
        }
        let handle = self.allocate_handle();
        object.set_handle(handle);
        object.set_owner(dict_handle);
        self.objects.insert(handle, object);
        if let Some(dict) = self.dictionary_mut(dict_handle) {
            dict.add_entry(name, handle);
        }
        Ok(handle)
    }

    /// Create a named group of existing entities
    pub fn add_group(
        &mut self,
        name: &str,
        members: impl IntoIterator<Item = Handle>,
    ) -> Result<Handle> {
        let mut group = Group::new(name);
        for member in members {
            if !self.entities.contains_key(&member) {
                return Err(DxfError::InvalidHandle(member.value()));
            }
            group.add_entity(member);
        }
        let entities = group.entities.clone();
        let handle = self.add_dictionary_object(ACAD_GROUP, name, group.into())?;
        for member in entities {
            if let Some(entity) = self.entities.get_mut(&member) {
                entity.common_mut().reactors.push(handle);
            }
        }
        Ok(handle)
    }

    pub fn add_mline_style(&mut self, style: MLineStyle) -> Result<Handle> {
        let name = style.name.clone();
        self.add_dictionary_object(ACAD_MLINESTYLE, &name, style.into())
    }

    /// Add an image definition, creating the image dictionary and the raster
    /// variables on first use
    pub fn add_image_definition(&mut self, definition: ImageDefinition) -> Handle {
        if self.named_dictionary(ACAD_IMAGE_VARS).is_none() {
            let handle = self.allocate_handle();
            let mut vars = RasterVariables::new();
            vars.handle = handle;
            vars.owner = self.root_dictionary;
            self.objects.insert(handle, vars.into());
            if let Some(root) = self.dictionary_mut(self.root_dictionary) {
                root.add_entry(ACAD_IMAGE_VARS, handle);
            }
        }

        let mut name = definition.name.clone();
        let mut suffix = 1;
        while self
            .named_dictionary(ACAD_IMAGE_DICT)
            .and_then(|h| self.dictionary(h))
            .is_some_and(|d| d.contains(&name))
        {
            name = format!("{}_{}", definition.name, suffix);
            suffix += 1;
        }
        let mut definition = definition;
        definition.name = name.clone();
        // The name is unique at this point
        self.add_dictionary_object(ACAD_IMAGE_DICT, &name, definition.into())
            .unwrap_or(Handle::NULL)
    }

    /// Add a paper space layout backed by a new `*Paper_SpaceN` block record
    pub fn add_layout(&mut self, name: &str) -> Result<Handle> {
        if self.layouts().any(|l| l.name.eq_ignore_ascii_case(name)) {
            return Err(DxfError::Custom(format!("Layout '{}' already exists", name)));
        }
        let mut index = 0;
        while self
            .block_records
            .contains(&format!("{}{}", PAPER_SPACE, index))
        {
            index += 1;
        }
        let record = BlockRecord::new(format!("{}{}", PAPER_SPACE, index));
        let mut layout = Layout::new(name);
        layout.tab_order = self.layouts().count() as i16;
        self.add_layout_block(record, layout)
    }

    fn add_layout_block(&mut self, record: BlockRecord, mut layout: Layout) -> Result<Handle> {
        let is_model = record.is_model_space();
        let record_handle = self.add_block(record)?;
        layout.block_record = record_handle;
        let name = layout.name.clone();
        let layout_handle = self.add_dictionary_object(ACAD_LAYOUT, &name, layout.into())?;
        if let Some(record) = self.block_records.get_by_handle_mut(record_handle) {
            record.layout = layout_handle;
        }

        if !is_model {
            let viewport = Viewport::paper_view(Vector3::new(5.25, 4.0, 0.0), 12.0, 9.0);
            let viewport_handle = self.insert_owned_entity(record_handle, viewport.into());
            if let Some(ObjectType::Layout(layout)) = self.objects.get_mut(&layout_handle) {
                layout.viewport = viewport_handle;
            }
        }
        Ok(layout_handle)
    }

    /// Store an object read from a file under its own handle
    pub(crate) fn insert_object(&mut self, object: ObjectType) -> Handle {
        let handle = object.handle();
        if self.root_dictionary.is_null() {
            if let ObjectType::Dictionary(dict) = &object {
                if dict.owner.is_null() {
                    self.root_dictionary = handle;
                }
            }
        }
        self.objects.insert(handle, object);
        handle
    }

    pub fn object(&self, handle: Handle) -> Option<&ObjectType> {
        self.objects.get(&handle)
    }

    /// All objects, in insertion order
    pub fn objects(&self) -> impl Iterator<Item = &ObjectType> {
        self.objects.values()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn dictionary(&self, handle: Handle) -> Option<&Dictionary> {
        match self.objects.get(&handle) {
            Some(ObjectType::Dictionary(dict)) => Some(dict),
            _ => None,
        }
    }

    pub(crate) fn object_mut(&mut self, handle: Handle) -> Option<&mut ObjectType> {
        self.objects.get_mut(&handle)
    }

    fn dictionary_mut(&mut self, handle: Handle) -> Option<&mut Dictionary> {
        match self.objects.get_mut(&handle) {
            Some(ObjectType::Dictionary(dict)) => Some(dict),
            _ => None,
        }
    }

    pub fn layouts(&self) -> impl Iterator<Item = &Layout> {
        self.objects.values().filter_map(|o| match o {
            ObjectType::Layout(layout) => Some(layout),
            _ => None,
        })
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.objects.values().filter_map(|o| match o {
            ObjectType::Group(group) => Some(group),
            _ => None,
        })
    }

    pub fn mline_styles(&self) -> impl Iterator<Item = &MLineStyle> {
        self.objects.values().filter_map(|o| match o {
            ObjectType::MLineStyle(style) => Some(style),
            _ => None,
        })
    }

    /// MLine style by name (case-insensitive)
    pub fn mline_style(&self, name: &str) -> Option<&MLineStyle> {
        self.mline_styles()
            .find(|style| style.name.eq_ignore_ascii_case(name))
    }

    pub fn image_definitions(&self) -> impl Iterator<Item = &ImageDefinition> {
        self.objects.values().filter_map(|o| match o {
            ObjectType::ImageDefinition(def) => Some(def),
            _ => None,
        })
    }

    pub fn raster_variables(&self) -> Option<&RasterVariables> {
        self.objects.values().find_map(|o| match o {
            ObjectType::RasterVariables(vars) => Some(vars),
            _ => None,
        })
    }

    pub fn raster_variables_mut(&mut self) -> Option<&mut RasterVariables> {
        self.objects.values_mut().find_map(|o| match o {
            ObjectType::RasterVariables(vars) => Some(vars),
            _ => None,
        })
    }

    /// Bring `next_handle` above every handle in use after a read
    pub(crate) fn update_next_handle(&mut self) {
        let tables = [
            self.app_ids.iter().map(|e| e.handle).max(),
            self.vports.iter().map(|e| e.handle).max(),
            self.line_types.iter().map(|e| e.handle).max(),
            self.layers.iter().map(|e| e.handle).max(),
            self.text_styles.iter().map(|e| e.handle).max(),
            self.dim_styles.iter().map(|e| e.handle).max(),
            self.views.iter().map(|e| e.handle).max(),
            self.ucss.iter().map(|e| e.handle).max(),
            self.block_records
                .iter()
                .flat_map(|e| [e.handle, e.block_entity_handle, e.block_end_handle])
                .max(),
        ];
        let max = tables
            .into_iter()
            .flatten()
            .chain(self.entities.keys().copied())
            .chain(self.entities.values().flat_map(|e| e.sub_handles()))
            .chain(self.objects.keys().copied())
            .chain(std::iter::once(self.header.handle_seed))
            .map(|h| h.value())
            .max()
            .unwrap_or(0);
        self.next_handle = self.next_handle.max(max + 1);
    }
}

impl CadDocument {
    /// Rebuild what a file only stores implicitly, once every section is read
    ///
    /// Group and image definition names live in their dictionaries, a layout's
    /// viewport is the first viewport of its block, and a file without a
    /// model space record still gets one.
    pub(crate) fn finish_read(&mut self) {
        self.update_next_handle();

        if !self.block_records.contains(MODEL_SPACE) {
            let mut record = BlockRecord::model_space();
            record.handle = self.allocate_handle();
            let owner = record.handle;
            for (handle, entity) in self.entities.iter_mut() {
                if entity.common().owner.is_null() {
                    entity.common_mut().owner = owner;
                    record.entities.push(*handle);
                }
            }
            self.block_records.insert(record);
        }
        let mut next = self.next_handle;
        for record in self.block_records.iter_mut() {
            for handle in [&mut record.block_entity_handle, &mut record.block_end_handle] {
                if handle.is_null() {
                    *handle = Handle::new(next);
                    next += 1;
                }
            }
        }
        self.next_handle = next;

        self.name_dictionary_entries();
        self.restore_image_units();
        self.link_layout_viewports();
        self.prune_dictionaries();
    }

    fn name_dictionary_entries(&mut self) {
        for dictionary in [ACAD_GROUP, ACAD_IMAGE_DICT] {
            let entries = match self.named_dictionary(dictionary).and_then(|h| self.dictionary(h)) {
                Some(dict) => dict.entries.clone(),
                None => continue,
            };
            for (name, handle) in entries {
                match self.objects.get_mut(&handle) {
                    Some(ObjectType::Group(group)) => group.name = name,
                    Some(ObjectType::ImageDefinition(definition)) => definition.name = name,
                    _ => {}
                }
            }
        }
    }

    /// Image sizes are read in raster units
    fn restore_image_units(&mut self) {
        let Some(units) = self.raster_variables().map(|vars| vars.units.drawing_units()) else {
            return;
        };
        let factor = conversion_factor(units, self.header.insertion_units);
        if factor == 1.0 || factor == 0.0 {
            return;
        }
        for entity in self.entities.values_mut() {
            if let EntityType::RasterImage(image) = entity {
                image.width /= factor;
                image.height /= factor;
            }
        }
    }

    fn link_layout_viewports(&mut self) {
        let mut links = Vec::new();
        for layout in self.layouts().filter(|l| l.viewport.is_null()) {
            let Some(record) = self.block_records.get_by_handle(layout.block_record) else {
                continue;
            };
            let viewport = record
                .entities
                .iter()
                .find(|h| matches!(self.entities.get(*h), Some(EntityType::Viewport(_))));
            if let Some(viewport) = viewport {
                links.push((layout.handle, *viewport));
            }
        }
        for (layout, viewport) in links {
            if let Some(ObjectType::Layout(layout)) = self.objects.get_mut(&layout) {
                layout.viewport = viewport;
            }
        }
    }

    /// Drop dictionary entries whose object was not read
    fn prune_dictionaries(&mut self) {
        let known: AHashSet<Handle> = self.objects.keys().copied().collect();
        for object in self.objects.values_mut() {
            if let ObjectType::Dictionary(dict) = object {
                dict.entries.retain(|_, handle| known.contains(handle));
            }
        }
    }
}

impl Default for CadDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// Assign a handle to a table entry and add it
fn add_entry<T: TableEntry>(table: &mut Table<T>, mut entry: T, next: &mut u64) -> Result<Handle> {
    if table.contains(entry.name()) {
        return Err(DxfError::Custom(format!(
            "Entry '{}' already exists in table",
            entry.name()
        )));
    }
    let handle = Handle::new(*next);
    *next += 1;
    entry.set_handle(handle);
    table.add(entry)?;
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AttributeDefinition, Insert, Line, Polyline3D, RasterImage};

    #[test]
    fn test_default_records() {
        let doc = CadDocument::new();
        assert!(doc.layers.contains("0"));
        for name in ["ByBlock", "ByLayer", "Continuous"] {
            assert!(doc.line_types.contains(name));
        }
        assert!(doc.text_styles.contains("Standard"));
        assert!(doc.dim_styles.contains("Standard"));
        assert!(doc.app_ids.contains("ACAD"));
        assert!(doc.vports.contains("*Active"));
        assert!(doc.block_records.contains(MODEL_SPACE));
        assert!(doc.block_records.contains(PAPER_SPACE));

        let names: Vec<_> = doc.layouts().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Model", "Layout1"]);
        assert!(doc.mline_style("standard").is_some());
        assert!(doc.named_dictionary(ACAD_GROUP).is_some());
    }

    #[test]
    fn test_layout_records_point_at_each_other() {
        let doc = CadDocument::new();
        for layout in doc.layouts() {
            let record = doc.block_records.get_by_handle(layout.block_record).unwrap();
            assert_eq!(record.layout, layout.handle);
        }
        let paper = doc.block_records.get(PAPER_SPACE).unwrap();
        let first = doc.entity(paper.entities[0]).unwrap();
        assert!(matches!(first, EntityType::Viewport(v) if v.id == 1));
    }

    #[test]
    fn test_add_entity_assigns_handle_and_owner() {
        let mut doc = CadDocument::new();
        let seed = doc.next_handle();
        let handle = doc.add_entity(Line::from_points(Vector3::ZERO, Vector3::UNIT_X));
        assert_eq!(handle.value(), seed);

        let model = doc.block_records.get(MODEL_SPACE).unwrap();
        assert_eq!(doc.entity(handle).unwrap().common().owner, model.handle);
        assert_eq!(doc.model_space_entities().count(), 1);
    }

    #[test]
    fn test_sub_handles_assigned() {
        let mut doc = CadDocument::new();
        let poly = Polyline3D::from_points([Vector3::ZERO, Vector3::UNIT_X]);
        let handle = doc.add_entity(poly);
        match doc.entity(handle).unwrap() {
            EntityType::Polyline3D(p) => {
                assert!(p.vertices.iter().all(|v| !v.handle.is_null()));
                assert!(!p.seqend_handle.is_null());
                assert_ne!(p.vertices[0].handle, p.vertices[1].handle);
            }
            other => panic!("unexpected entity {:?}", other),
        }
    }

    #[test]
    fn test_add_entity_to_missing_block() {
        let mut doc = CadDocument::new();
        let err = doc
            .add_entity_to_block("Nope", Line::new())
            .unwrap_err();
        assert!(matches!(err, DxfError::MissingReference { .. }));
    }

    #[test]
    fn test_attribute_definition_marks_block() {
        let mut doc = CadDocument::new();
        doc.add_block(BlockRecord::new("Tag")).unwrap();
        doc.add_entity_to_block("Tag", AttributeDefinition::new("ID", "Id?", "0"))
            .unwrap();
        assert!(doc.block_records.get("Tag").unwrap().flags.has_attributes);
        assert_eq!(doc.entities_in("Tag").count(), 1);

        let insert = doc.add_entity(Insert::new("Tag", Vector3::ZERO));
        assert_eq!(doc.entity(insert).unwrap().dxf_name(), "INSERT");
    }

    #[test]
    fn test_duplicate_block_rejected() {
        let mut doc = CadDocument::new();
        doc.add_block(BlockRecord::new("A")).unwrap();
        assert!(doc.add_block(BlockRecord::new("a")).is_err());
    }

    #[test]
    fn test_group_registers_reactors() {
        let mut doc = CadDocument::new();
        let a = doc.add_entity(Line::new());
        let b = doc.add_entity(Line::new());
        let group = doc.add_group("Pair", [a, b]).unwrap();

        assert_eq!(doc.groups().count(), 1);
        assert_eq!(doc.entity(a).unwrap().common().reactors, vec![group]);
        assert!(doc.add_group("Bad", [Handle::new(0xFFFF)]).is_err());
    }

    #[test]
    fn test_image_definition_and_reactor() {
        let mut doc = CadDocument::new();
        let def = doc.add_image_definition(ImageDefinition::new("site.png", 100.0, 50.0));
        assert!(doc.named_dictionary(ACAD_IMAGE_DICT).is_some());
        assert!(doc.raster_variables().is_some());

        let image = doc.add_entity(RasterImage::new(def, Vector3::ZERO, 10.0, 5.0));
        let reactor = match doc.entity(image).unwrap() {
            EntityType::RasterImage(img) => img.definition_reactor,
            _ => Handle::NULL,
        };
        assert!(!reactor.is_null());
        let def = doc.image_definitions().next().unwrap();
        assert_eq!(def.reactors, vec![reactor]);
    }

    #[test]
    fn test_add_layout_creates_paper_space_block() {
        let mut doc = CadDocument::new();
        let handle = doc.add_layout("Sheet 2").unwrap();
        assert!(doc.block_records.contains("*Paper_Space0"));
        match doc.object(handle).unwrap() {
            ObjectType::Layout(layout) => {
                assert_eq!(layout.tab_order, 2);
                assert!(!layout.viewport.is_null());
            }
            _ => panic!("expected layout"),
        }
        assert!(doc.add_layout("sheet 2").is_err());
    }
}
