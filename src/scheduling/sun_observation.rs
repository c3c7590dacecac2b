use crate::config::Configuration;
use crate::evaluation::{EvaluationContext, EvaluatorSelector};
use crate::host::{BodyId, EquipmentSnapshot, ObservationHost, VesselId};
use crate::surface::{GeometryError, SurfacePatchSet, visible_surface};
use crate::{event, obs, warn};
use itertools::Itertools;
use std::sync::Arc;
use std::time::Duration;

/// Result of one sun observation pass.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ObservationPassReport {
    /// Stars whose observation quality was forwarded, with the forwarded value.
    pub updated: Vec<(BodyId, f32)>,
    /// Stars that had observers but could not be evaluated this pass.
    pub skipped: Vec<(BodyId, GeometryError)>,
}

/// Periodically determines how much of every star's surface is watched by
/// vessels running nominal sun observation equipment.
///
/// Driven by the host's update callback. Passes run at most once per
/// [`SunObservationScheduler::UPDATE_INTERVAL`] of host time.
pub struct SunObservationScheduler {
    config: Arc<Configuration>,
    /// Host time of the last pass.
    last_run: Duration,
}

impl SunObservationScheduler {
    /// Minimum host time between two observation passes.
    pub const UPDATE_INTERVAL: Duration = Duration::from_secs(10);

    /// Creates a scheduler whose first pass is due one interval after `start`.
    pub fn new(config: Arc<Configuration>, start: Duration) -> Self { Self { config, last_run: start } }

    pub fn last_run(&self) -> Duration { self.last_run }

    /// Restarts the interval at `now` without running a pass.
    pub fn reset(&mut self, now: Duration) { self.last_run = now; }

    /// `true` once the interval has elapsed, or if the host clock went back
    /// behind the last pass (a reload of an earlier save).
    pub fn is_due(&self, now: Duration) -> bool {
        now < self.last_run || now >= self.last_run + Self::UPDATE_INTERVAL
    }

    /// Runs a pass if the interval has elapsed since the last one or the
    /// clock was rewound, see [`SunObservationScheduler::is_due`].
    ///
    /// # Returns
    /// The pass report, or `None` if the tick came too early.
    pub fn tick<E, H>(
        &mut self,
        now: Duration,
        evaluators: &EvaluatorSelector,
        equipment: &E,
        host: &mut H,
    ) -> Option<ObservationPassReport>
    where
        E: EquipmentSnapshot,
        H: ObservationHost,
    {
        if !self.is_due(now) {
            return None;
        }
        self.last_run = now;
        Some(self.run_pass(evaluators, equipment, host))
    }

    /// Groups every vessel with nominal sun observation equipment by the
    /// star it currently belongs to. Vessels the host cannot resolve are left out.
    pub fn group_observers<E, H>(&self, equipment: &E, host: &H) -> Vec<(BodyId, Vec<VesselId>)>
    where
        E: EquipmentSnapshot,
        H: ObservationHost,
    {
        let equipment_id = self.config.sun_observation_equipment();
        equipment
            .equipment_states()
            .filter(|(_, entries)| entries.iter().any(|e| e.is_nominal(equipment_id)))
            .filter_map(|(vessel, _)| host.vessel_star(vessel).map(|star| (star, vessel)))
            .into_group_map()
            .into_iter()
            .sorted_by_key(|(star, _)| *star)
            .collect()
    }

    /// Evaluates and forwards the observation quality of every star that has
    /// at least one observer. A star that fails is skipped, the others proceed.
    pub fn run_pass<E, H>(&self, evaluators: &EvaluatorSelector, equipment: &E, host: &mut H) -> ObservationPassReport
    where
        E: EquipmentSnapshot,
        H: ObservationHost,
    {
        let mut report = ObservationPassReport::default();
        let groups = self.group_observers(equipment, host);
        if groups.is_empty() {
            event!("No active sun observers.");
            return report;
        }

        let patches = SurfacePatchSet::shared(self.config.surface_patch_count());
        let ut = host.universal_time();
        for (star, vessels) in groups {
            let context = EvaluationContext::new(evaluators.get(), Some(star), ut);
            match Self::observe_star(&context, star, &vessels, self.config.min_sun_observation_angle(), patches) {
                Ok(fraction) => {
                    #[allow(clippy::cast_possible_truncation)]
                    let quality = fraction as f32;
                    host.set_storm_observation_quality(star, quality);
                    obs!(
                        "Solar surface observation for {}: {:.2}% by {} observers ({}).",
                        host.body_name(star),
                        fraction * 100.0,
                        vessels.len(),
                        context.evaluator_name()
                    );
                    report.updated.push((star, quality));
                }
                Err(e) => {
                    warn!("Skipping solar surface observation for {}: {e}", host.body_name(star));
                    report.skipped.push((star, e));
                }
            }
        }
        report
    }

    fn observe_star(
        context: &EvaluationContext,
        star: BodyId,
        vessels: &[VesselId],
        min_angle: f64,
        patches: &SurfacePatchSet,
    ) -> Result<f64, GeometryError> {
        let star_position = context.body_position(star);
        let observers: Vec<_> = vessels
            .iter()
            .filter_map(|vessel| {
                let position = context.vessel_position(*vessel);
                if position.is_none() {
                    warn!("No position for observer {vessel}, leaving it out.");
                }
                position
            })
            .collect();
        visible_surface(&observers, star_position, min_angle, patches)
    }
}
