//! Layout object

use super::PlotSettings;
use crate::types::{Handle, Vector2, Vector3};

/// A layout: a named plot configuration bound to a model or paper space
/// block record
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Unique handle
    pub handle: Handle,
    /// Owner handle (the layout dictionary)
    pub owner: Handle,
    pub reactors: Vec<Handle>,
    /// `AcDbPlotSettings` data
    pub plot_settings: PlotSettings,
    /// Layout name
    pub name: String,
    /// Layout flags (code 70)
    pub flags: i16,
    /// Tab order (code 71)
    pub tab_order: i16,
    pub min_limits: Vector2,
    pub max_limits: Vector2,
    pub insertion_base: Vector3,
    pub min_extents: Vector3,
    pub max_extents: Vector3,
    pub elevation: f64,
    pub ucs_origin: Vector3,
    pub ucs_x_axis: Vector3,
    pub ucs_y_axis: Vector3,
    /// Block record this layout belongs to
    pub block_record: Handle,
    /// Paper space viewport (id 1) of this layout
    pub viewport: Handle,
}

impl Layout {
    pub const OBJECT_TYPE: &'static str = "LAYOUT";
    pub const MODEL_NAME: &'static str = "Model";

    /// Create a new layout
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            handle: Handle::NULL,
            owner: Handle::NULL,
            reactors: Vec::new(),
            plot_settings: PlotSettings::new(""),
            name,
            flags: 0,
            tab_order: 1,
            min_limits: Vector2::ZERO,
            max_limits: Vector2::new(12.0, 9.0),
            insertion_base: Vector3::ZERO,
            min_extents: Vector3::ZERO,
            max_extents: Vector3::ZERO,
            elevation: 0.0,
            ucs_origin: Vector3::ZERO,
            ucs_x_axis: Vector3::UNIT_X,
            ucs_y_axis: Vector3::UNIT_Y,
            block_record: Handle::NULL,
            viewport: Handle::NULL,
        }
    }

    /// The model layout (tab order 0, model type plot flag)
    pub fn model() -> Self {
        let mut layout = Self::new(Self::MODEL_NAME);
        layout.tab_order = 0;
        layout.flags = 1;
        layout.plot_settings.flags.model_type = true;
        layout
    }

    pub fn is_model(&self) -> bool {
        self.name.eq_ignore_ascii_case(Self::MODEL_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_layout() {
        let layout = Layout::model();
        assert!(layout.is_model());
        assert_eq!(layout.tab_order, 0);
        assert!(layout.plot_settings.flags.model_type);
        assert!(!Layout::new("Layout1").is_model());
    }
}
