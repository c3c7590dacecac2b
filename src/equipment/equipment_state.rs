use strum_macros::{Display, EnumIter, EnumString};

/// Operational state of one piece of equipment on a vessel.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EquipmentState {
    Nominal,
    Off,
    Warning,
    Failure,
    Unknown,
}

/// One equipment id together with its last reported state.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct EquipmentEntry {
    id: String,
    state: EquipmentState,
}

impl EquipmentEntry {
    pub fn new(id: &str, state: EquipmentState) -> Self { Self { id: id.to_string(), state } }

    pub fn id(&self) -> &str { &self.id }

    pub fn state(&self) -> EquipmentState { self.state }

    /// `true` if this entry is the given equipment and it works as intended.
    pub fn is_nominal(&self, equipment_id: &str) -> bool {
        self.id == equipment_id && self.state == EquipmentState::Nominal
    }
}
