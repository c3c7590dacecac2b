mod observation;
mod patch_set;

pub use observation::{GeometryError, ObservedSurface, visible_surface};
pub use patch_set::SurfacePatchSet;
