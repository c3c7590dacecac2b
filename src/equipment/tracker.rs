use super::{EquipmentEntry, EquipmentState};
use crate::host::{EquipmentSnapshot, VesselId};
use crate::persistence::ConfigNode;
use crate::warn;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Latest equipment states reported for every vessel.
///
/// Fed by the host's experiment state events and queried once per sun
/// observation pass.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EquipmentStateTracker {
    states: BTreeMap<VesselId, Vec<EquipmentEntry>>,
}

impl EquipmentStateTracker {
    const NODE_NAME: &'static str = "EquipmentStates";
    const VESSEL_NODE: &'static str = "VESSEL";
    const EQUIPMENT_NODE: &'static str = "EQUIPMENT";

    pub fn new() -> Self { Self::default() }

    /// Records the state of one equipment id on a vessel, replacing the
    /// previous state of that id.
    pub fn update(&mut self, vessel: VesselId, equipment_id: &str, state: EquipmentState) {
        let entries = self.states.entry(vessel).or_default();
        if let Some(entry) = entries.iter_mut().find(|e| e.id() == equipment_id) {
            *entry = EquipmentEntry::new(equipment_id, state);
        } else {
            entries.push(EquipmentEntry::new(equipment_id, state));
        }
    }

    /// Forgets everything known about a vessel.
    pub fn remove(&mut self, vessel: VesselId) { self.states.remove(&vessel); }

    pub fn clear(&mut self) { self.states.clear(); }

    pub fn get(&self, vessel: VesselId) -> Option<&[EquipmentEntry]> {
        self.states.get(&vessel).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize { self.states.len() }

    pub fn is_empty(&self) -> bool { self.states.is_empty() }

    /// Writes every vessel into an `EquipmentStates` child of `node`.
    pub fn save(&self, node: &mut ConfigNode) {
        let root = node.add_node(Self::NODE_NAME);
        for (vessel, entries) in &self.states {
            let vessel_node = root.add_node(Self::VESSEL_NODE);
            vessel_node.add_value("id", vessel.0);
            for entry in entries {
                let equipment_node = vessel_node.add_node(Self::EQUIPMENT_NODE);
                equipment_node.add_value("id", entry.id().to_string());
                equipment_node.add_value("state", entry.state().to_string());
            }
        }
    }

    /// Replaces all tracked states with the content saved under `node`.
    /// Vessels without a readable id are dropped, unreadable states become
    /// [`EquipmentState::Unknown`].
    pub fn load(&mut self, node: &ConfigNode) {
        self.states.clear();
        let Some(root) = node.node(Self::NODE_NAME) else { return };
        for vessel_node in root.nodes_named(Self::VESSEL_NODE) {
            let Ok(Some(id)) = vessel_node.read_value::<u64>("id") else {
                warn!("Dropping saved equipment states of a vessel without valid id.");
                continue;
            };
            let vessel = VesselId(id);
            for equipment_node in vessel_node.nodes_named(Self::EQUIPMENT_NODE) {
                let Some(equipment_id) = equipment_node.value("id") else { continue };
                let state = equipment_node
                    .value("state")
                    .and_then(|s| EquipmentState::from_str(s.trim()).ok())
                    .unwrap_or(EquipmentState::Unknown);
                self.update(vessel, equipment_id, state);
            }
        }
    }
}

impl EquipmentSnapshot for EquipmentStateTracker {
    fn equipment_states(&self) -> impl Iterator<Item = (VesselId, &[EquipmentEntry])> + '_ {
        self.states.iter().map(|(vessel, entries)| (*vessel, entries.as_slice()))
    }
}
