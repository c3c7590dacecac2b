mod equipment_state;
mod tracker;

pub use equipment_state::{EquipmentEntry, EquipmentState};
pub use tracker::EquipmentStateTracker;
