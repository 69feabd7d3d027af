//! Raster image definition objects

use crate::types::{Handle, ImageUnits, Vector2};

/// Resolution unit of an image definition (code 281)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionUnit {
    #[default]
    None = 0,
    Centimeters = 2,
    Inches = 5,
}

impl ResolutionUnit {
    pub fn from_code(code: i16) -> Self {
        match code {
            2 => ResolutionUnit::Centimeters,
            5 => ResolutionUnit::Inches,
            _ => ResolutionUnit::None,
        }
    }

    pub fn to_code(self) -> i16 {
        self as i16
    }
}

/// Links an image definition to one IMAGE entity that references it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDefinitionReactor {
    /// Unique handle
    pub handle: Handle,
    /// Owner handle (the IMAGE entity)
    pub owner: Handle,
    /// The image entity
    pub image_handle: Handle,
}

impl ImageDefinitionReactor {
    pub const OBJECT_TYPE: &'static str = "IMAGEDEF_REACTOR";

    pub fn new(image_handle: Handle) -> Self {
        Self {
            handle: Handle::NULL,
            owner: image_handle,
            image_handle,
        }
    }
}

/// Raster image definition
///
/// Stored in the `ACAD_IMAGE_DICT` dictionary. The reactors list holds the
/// handles of the image reactors pointing back at this definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDefinition {
    /// Unique handle
    pub handle: Handle,
    /// Owner handle (the image dictionary)
    pub owner: Handle,
    pub reactors: Vec<Handle>,
    /// Name under which the definition is stored in the image dictionary
    pub name: String,
    /// Image file path (code 1)
    pub file_name: String,
    /// Image size in pixels (codes 10, 20)
    pub size_in_pixels: Vector2,
    /// Size of one pixel in AutoCAD units (codes 11, 21)
    pub pixel_size: Vector2,
    /// Image is loaded (code 280)
    pub is_loaded: bool,
    pub resolution_unit: ResolutionUnit,
}

impl ImageDefinition {
    pub const OBJECT_TYPE: &'static str = "IMAGEDEF";

    pub fn new(file_name: impl Into<String>, width_px: f64, height_px: f64) -> Self {
        let file_name = file_name.into();
        let name = std::path::Path::new(&file_name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.clone());
        Self {
            handle: Handle::NULL,
            owner: Handle::NULL,
            reactors: Vec::new(),
            name,
            file_name,
            size_in_pixels: Vector2::new(width_px, height_px),
            pixel_size: Vector2::new(1.0, 1.0),
            is_loaded: true,
            resolution_unit: ResolutionUnit::None,
        }
    }
}

/// Raster display settings shared by all images (`ACAD_IMAGE_VARS`)
#[derive(Debug, Clone, PartialEq)]
pub struct RasterVariables {
    /// Unique handle
    pub handle: Handle,
    /// Owner handle (the root dictionary)
    pub owner: Handle,
    pub reactors: Vec<Handle>,
    /// Image frame display (code 70)
    pub display_frame: bool,
    /// High display quality (code 71)
    pub high_quality: bool,
    /// Units for inserting images (code 72)
    pub units: ImageUnits,
}

impl RasterVariables {
    pub const OBJECT_TYPE: &'static str = "RASTERVARIABLES";

    pub fn new() -> Self {
        Self {
            handle: Handle::NULL,
            owner: Handle::NULL,
            reactors: Vec::new(),
            display_frame: true,
            high_quality: true,
            units: ImageUnits::Unitless,
        }
    }
}

impl Default for RasterVariables {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_name_from_file_stem() {
        let def = ImageDefinition::new("images/site_plan.png", 640.0, 480.0);
        assert_eq!(def.name, "site_plan");
        assert_eq!(def.size_in_pixels, Vector2::new(640.0, 480.0));
    }

    #[test]
    fn test_resolution_unit_codes() {
        assert_eq!(ResolutionUnit::from_code(5), ResolutionUnit::Inches);
        assert_eq!(ResolutionUnit::from_code(3), ResolutionUnit::None);
        assert_eq!(ResolutionUnit::Centimeters.to_code(), 2);
    }
}
