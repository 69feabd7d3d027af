//! Non-graphical objects (OBJECTS section)
//!
//! Objects live in the document's object arena keyed by handle. They are
//! reached from the root dictionary, either directly or through the
//! dictionaries it owns.

mod dictionary;
mod group;
mod image_definition;
mod layout;
mod mlinestyle;
mod plot_settings;

pub use dictionary::{Dictionary, DictionaryCloning};
pub use group::Group;
pub use image_definition::{
    ImageDefinition, ImageDefinitionReactor, RasterVariables, ResolutionUnit,
};
pub use layout::Layout;
pub use mlinestyle::{MLineStyle, MLineStyleElement, MLineStyleFlags};
pub use plot_settings::{PaperMargin, PlotFlags, PlotPaperUnits, PlotRotation, PlotSettings};

use crate::types::Handle;

/// Object types
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectType {
    Dictionary(Dictionary),
    Layout(Layout),
    Group(Group),
    MLineStyle(MLineStyle),
    ImageDefinition(ImageDefinition),
    ImageDefinitionReactor(ImageDefinitionReactor),
    RasterVariables(RasterVariables),
}

macro_rules! each_object {
    ($self:expr, $obj:ident => $body:expr) => {
        match $self {
            ObjectType::Dictionary($obj) => $body,
            ObjectType::Layout($obj) => $body,
            ObjectType::Group($obj) => $body,
            ObjectType::MLineStyle($obj) => $body,
            ObjectType::ImageDefinition($obj) => $body,
            ObjectType::ImageDefinitionReactor($obj) => $body,
            ObjectType::RasterVariables($obj) => $body,
        }
    };
}

impl ObjectType {
    pub fn handle(&self) -> Handle {
        each_object!(self, o => o.handle)
    }

    pub fn set_handle(&mut self, handle: Handle) {
        each_object!(self, o => o.handle = handle)
    }

    pub fn owner(&self) -> Handle {
        each_object!(self, o => o.owner)
    }

    pub fn set_owner(&mut self, owner: Handle) {
        each_object!(self, o => o.owner = owner)
    }

    /// Reactor handles written in the `{ACAD_REACTORS` group
    pub fn reactors(&self) -> &[Handle] {
        match self {
            ObjectType::Dictionary(o) => &o.reactors,
            ObjectType::Layout(o) => &o.reactors,
            ObjectType::Group(o) => &o.reactors,
            ObjectType::MLineStyle(o) => &o.reactors,
            ObjectType::ImageDefinition(o) => &o.reactors,
            ObjectType::RasterVariables(o) => &o.reactors,
            ObjectType::ImageDefinitionReactor(_) => &[],
        }
    }

    /// DXF object name
    pub fn dxf_name(&self) -> &'static str {
        match self {
            ObjectType::Dictionary(_) => Dictionary::OBJECT_TYPE,
            ObjectType::Layout(_) => Layout::OBJECT_TYPE,
            ObjectType::Group(_) => Group::OBJECT_TYPE,
            ObjectType::MLineStyle(_) => MLineStyle::OBJECT_TYPE,
            ObjectType::ImageDefinition(_) => ImageDefinition::OBJECT_TYPE,
            ObjectType::ImageDefinitionReactor(_) => ImageDefinitionReactor::OBJECT_TYPE,
            ObjectType::RasterVariables(_) => RasterVariables::OBJECT_TYPE,
        }
    }
}

macro_rules! impl_from_object {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for ObjectType {
                fn from(object: $variant) -> Self {
                    ObjectType::$variant(object)
                }
            }
        )*
    };
}

impl_from_object!(
    Dictionary,
    Layout,
    Group,
    MLineStyle,
    ImageDefinition,
    ImageDefinitionReactor,
    RasterVariables,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_accessors() {
        let mut object: ObjectType = Group::new("G").into();
        object.set_handle(Handle::new(0x40));
        object.set_owner(Handle::new(0x0D));
        assert_eq!(object.handle(), Handle::new(0x40));
        assert_eq!(object.owner(), Handle::new(0x0D));
        assert_eq!(object.dxf_name(), "GROUP");
        assert!(object.reactors().is_empty());
    }
}
