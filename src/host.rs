//! Identities and collaborator interfaces of the host simulation.
//!
//! The host owns bodies, vessels, the stock ephemeris and the radiation model.
//! This crate only queries it through the traits below and pushes results back.

use crate::equipment::EquipmentEntry;
use crate::radiation::RadiationFieldType;
use crate::util::Vec3D;
use std::fmt::{Display, Formatter};

/// Stable index of a celestial body, as assigned by the host.
///
/// Host indices are never negative, so a body that can be tracked can also
/// be saved and restored.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct BodyId(pub u32);

impl BodyId {
    pub fn index(self) -> u32 { self.0 }
}

impl Display for BodyId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "body#{}", self.0) }
}

/// Persistent identity of a vessel.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct VesselId(pub u64);

impl Display for VesselId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{:016x}", self.0) }
}

/// Built-in position queries of the host, used by the stock evaluator.
pub trait StockEphemeris {
    /// World-space position of `body` at universal time `ut`.
    fn body_position(&self, body: BodyId, ut: f64) -> Vec3D<f64>;
    /// World-space position of `vessel` at universal time `ut`, `None` if the
    /// vessel is unknown to the host.
    fn vessel_position(&self, vessel: VesselId, ut: f64) -> Option<Vec3D<f64>>;
}

/// Host surface needed by one sun observation pass.
pub trait ObservationHost {
    /// Parent star of the body the vessel currently orbits, `None` if the
    /// vessel cannot be found.
    fn vessel_star(&self, vessel: VesselId) -> Option<BodyId>;
    /// Display name of a body, only used for log output.
    fn body_name(&self, body: BodyId) -> String;
    /// Current universal time in seconds.
    fn universal_time(&self) -> f64;
    /// Receives the observed fraction of a star's surface, in `[0, 1]`.
    fn set_storm_observation_quality(&mut self, star: BodyId, quality: f32);
}

/// Host radiation model, receiving belt and magnetopause visibility.
pub trait RadiationFieldHost {
    /// All bodies known to the host.
    fn bodies(&self) -> Vec<BodyId>;
    /// Sandbox games reveal every radiation field from the start.
    fn is_sandbox(&self) -> bool;
    fn set_field_visible(&mut self, body: BodyId, field: RadiationFieldType, visible: bool);
}

/// Read-only equipment state snapshot: every vessel with its equipment list.
pub trait EquipmentSnapshot {
    fn equipment_states(&self) -> impl Iterator<Item = (VesselId, &[EquipmentEntry])> + '_;
}
