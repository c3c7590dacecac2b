mod field_status;
mod field_type;
mod status_store;

pub use field_status::GlobalRadiationFieldStatus;
pub use field_type::RadiationFieldType;
pub use status_store::{FieldResearched, RadiationFieldStatusStore, VisibilityChange};
