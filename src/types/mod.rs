//! Value types shared by the document model and the codec

mod color;
mod handle;
mod line_weight;
pub mod transform;
mod transparency;
pub mod units;
mod vector;
mod version;

pub use color::Color;
pub use handle::Handle;
pub use line_weight::LineWeight;
pub use transform::{object_to_world, world_to_object, Matrix3};
pub use transparency::Transparency;
pub use units::{DrawingUnits, ImageUnits};
pub use vector::{Vector2, Vector3};
pub use version::DxfVersion;
